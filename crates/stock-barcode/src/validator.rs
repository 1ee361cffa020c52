//! 條碼檢查碼驗證與格式化

use serde::{Deserialize, Serialize};
use stock_core::{BarcodeFormat, Result, StockError};

use crate::format::detect_format;

/// 驗證結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeValidation {
    pub is_valid: bool,
    pub format: BarcodeFormat,
    pub error: Option<String>,
}

impl BarcodeValidation {
    fn valid(format: BarcodeFormat) -> Self {
        Self {
            is_valid: true,
            format,
            error: None,
        }
    }

    fn invalid(format: BarcodeFormat, error: String) -> Self {
        Self {
            is_valid: false,
            format,
            error: Some(error),
        }
    }
}

/// 驗證條碼
///
/// UPC-A 與 EAN-13 另需通過檢查碼驗證，其他可辨識格式不驗證檢查碼。
pub fn validate_barcode(code: &str) -> BarcodeValidation {
    if code.is_empty() {
        return BarcodeValidation::invalid(BarcodeFormat::Unknown, "條碼為空".to_string());
    }

    let format = detect_format(code);

    match format {
        BarcodeFormat::Unknown => {
            BarcodeValidation::invalid(format, format!("無法辨識的條碼格式: {}", code))
        }
        BarcodeFormat::UpcA | BarcodeFormat::Ean13 => {
            if has_valid_check_digit(code) {
                BarcodeValidation::valid(format)
            } else {
                BarcodeValidation::invalid(format, format!("{} 檢查碼錯誤: {}", format, code))
            }
        }
        _ => BarcodeValidation::valid(format),
    }
}

/// 為 11 位數字補上 UPC-A 檢查碼
pub fn generate_upca_check_digit(code: &str) -> Result<String> {
    append_check_digit(code, 11)
}

/// 為 12 位數字補上 EAN-13 檢查碼
pub fn generate_ean13_check_digit(code: &str) -> Result<String> {
    append_check_digit(code, 12)
}

/// 依格式插入空白
///
/// UPC-A: `X XXXXX XXXXX X`；EAN-13: `X XXXXXX XXXXXX`；UPC-E: `X XXXXXX X`。
pub fn format_for_display(code: &str) -> String {
    match detect_format(code) {
        BarcodeFormat::UpcA => {
            format!("{} {} {} {}", &code[..1], &code[1..6], &code[6..11], &code[11..])
        }
        BarcodeFormat::Ean13 => format!("{} {} {}", &code[..1], &code[1..7], &code[7..]),
        BarcodeFormat::UpcE => format!("{} {} {}", &code[..1], &code[1..7], &code[7..]),
        _ => code.to_string(),
    }
}

/// 移除空白與連字號
pub fn clean_barcode(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn append_check_digit(code: &str, expected: usize) -> Result<String> {
    let digits = parse_digits(code)
        .filter(|d| d.len() == expected)
        .ok_or_else(|| StockError::InvalidCheckDigitInput {
            input: code.to_string(),
            expected,
        })?;

    Ok(format!("{}{}", code, mod10_check_digit(&digits)))
}

fn has_valid_check_digit(code: &str) -> bool {
    match parse_digits(code) {
        Some(digits) => match digits.split_last() {
            Some((check, payload)) => *check == mod10_check_digit(payload),
            None => false,
        },
        None => false,
    }
}

fn parse_digits(code: &str) -> Option<Vec<u32>> {
    code.chars().map(|c| c.to_digit(10)).collect()
}

/// GS1 模 10 檢查碼：自最右側資料位起，權重依序為 3、1 交替
fn mod10_check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();

    (10 - sum % 10) % 10
}
