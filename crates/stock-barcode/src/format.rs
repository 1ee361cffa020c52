//! 條碼格式辨識

use once_cell::sync::Lazy;
use regex::Regex;
use stock_core::BarcodeFormat;

/// 依序比對的格式樣式
///
/// 數字類格式只接受 ASCII 數字。
/// 8 位數字一律先比對為 UPC-E，EAN-8 不會被選中；
/// 純數字字串先符合 CODE-39，ITF 不會被選中。
static FORMAT_PATTERNS: Lazy<Vec<(BarcodeFormat, Regex)>> = Lazy::new(|| {
    [
        (BarcodeFormat::UpcA, r"^[0-9]{12}$"),
        (BarcodeFormat::UpcE, r"^[0-9]{8}$"),
        (BarcodeFormat::Ean13, r"^[0-9]{13}$"),
        (BarcodeFormat::Ean8, r"^[0-9]{8}$"),
        (BarcodeFormat::Code39, r"^[A-Z0-9\-. $/+%]+$"),
        (BarcodeFormat::Codabar, r"^[A-D][0-9\-:$/.+]+[A-D]$"),
        (BarcodeFormat::Itf, r"^([0-9]{2})+$"),
        (BarcodeFormat::Code128, r"^[\x20-\x7E]+$"),
    ]
    .into_iter()
    .map(|(format, pattern)| {
        let regex = Regex::new(pattern).expect("barcode format pattern is invalid");
        (format, regex)
    })
    .collect()
});

/// 辨識條碼格式，無法辨識時回傳 `BarcodeFormat::Unknown`
pub fn detect_format(code: &str) -> BarcodeFormat {
    FORMAT_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(code))
        .map(|(format, _)| *format)
        .unwrap_or(BarcodeFormat::Unknown)
}
