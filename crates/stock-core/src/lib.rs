//! # Stock Core
//!
//! 庫存預測引擎的核心資料模型與類型定義

pub mod barcode;
pub mod clock;
pub mod config;
pub mod item;
pub mod movement;
pub mod recipe;
pub mod unit;
pub mod waste;

// Re-export 主要類型
pub use barcode::{BarcodeFormat, BarcodeLog, ScanResult, ScanSession, ScanSessionType};
pub use clock::{Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, UuidGenerator};
pub use config::{ForecastConfig, ValuationMethod};
pub use item::{InventoryItem, LocationStock};
pub use movement::{MovementReference, MovementType, StockEffect, StockMovement};
pub use recipe::{Recipe, RecipeIngredient};
pub use unit::{UnitOfMeasurement, UnitType};
pub use waste::WasteLog;

/// 庫存引擎錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StockError {
    #[error("找不到計量單位: {0}")]
    UnitNotFound(String),

    #[error("計量單位類型不相容: {from} ({from_type}) → {to} ({to_type})")]
    IncompatibleUnits {
        from: String,
        from_type: UnitType,
        to: String,
        to_type: UnitType,
    },

    #[error("無效的換算係數: {0}")]
    InvalidConversionFactor(String),

    #[error("無效的條碼: {0}")]
    InvalidBarcode(String),

    #[error("檢查碼輸入必須為 {expected} 位數字: {input}")]
    InvalidCheckDigitInput { input: String, expected: usize },

    #[error("{field} 不可為負數: {value}")]
    NegativeValue { field: String, value: String },

    #[error("找不到掃描工作階段: {0}")]
    SessionNotFound(String),

    #[error("掃描工作階段已結束: {0}")]
    SessionEnded(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, StockError>;
