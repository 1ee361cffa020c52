//! 內部條碼產生器

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock_core::Result;

use crate::validator::generate_upca_check_digit;

/// 內部使用的 UPC-A 前綴（2 開頭為店內自用碼段）
const DEFAULT_SKU_PREFIX: char = '2';

/// 批號條碼的雜湊模數
const BATCH_HASH_MODULUS: i64 = 1_000_000;

/// 條碼產生器
pub struct BarcodeGenerator<R: Rng = StdRng> {
    rng: R,
}

impl BarcodeGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for BarcodeGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BarcodeGenerator<R> {
    /// 使用指定的亂數來源（測試時可固定種子）
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 產生內部 SKU 條碼：前綴 + 5 位廠商碼 + 5 位商品碼 + 檢查碼
    pub fn internal_sku(&mut self, prefix: Option<char>) -> Result<String> {
        let prefix = prefix.unwrap_or(DEFAULT_SKU_PREFIX);
        let manufacturer: u32 = self.rng.gen_range(0..100_000);
        let product: u32 = self.rng.gen_range(0..100_000);

        let barcode = generate_upca_check_digit(&format!("{}{:05}{:05}", prefix, manufacturer, product))?;
        tracing::debug!("產生內部條碼 {}", barcode);
        Ok(barcode)
    }

    /// 批號條碼：`BATCH` + 6 位雜湊值
    pub fn batch_barcode(&self, item_id: &str, batch_number: &str) -> String {
        let hash = string_hash(&format!("{}-{}", item_id, batch_number));
        format!("BATCH{:06}", i64::from(hash).abs() % BATCH_HASH_MODULUS)
    }

    /// 儲位條碼：`LOC` + 4 位儲位編號，可附區域 `Z` 與層架 `S`
    pub fn location_barcode(&self, location_id: &str, zone: Option<&str>, shelf: Option<&str>) -> String {
        let mut barcode = format!("LOC{:0>4}", location_id);

        if let Some(zone) = zone {
            barcode.push('Z');
            barcode.push_str(zone);
        }
        if let Some(shelf) = shelf {
            barcode.push('S');
            barcode.push_str(shelf);
        }

        barcode
    }
}

/// 32 位字串雜湊：h = h * 31 + c（以 UTF-16 編碼單位計算，溢位環繞）
fn string_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}
