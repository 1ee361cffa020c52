//! # Stock Calculation Engine
//!
//! 庫存計算引擎：帳面庫存、用量預測、補貨、計價、ABC 分類、報廢分析與食譜成本。
//! 所有函數皆為純函數，輸入為呼叫端提供的快照與明確的計算時點 `as_of`。

pub mod alerts;
pub mod classification;
pub mod forecasting;
pub mod ledger;
pub mod recipe;
pub mod shrinkage;
pub mod units;
pub mod valuation;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Re-export 主要類型
pub use alerts::{StockAlert, StockAlertCalculator, StockAlertKind};
pub use classification::{AbcClass, AbcClassificationEntry, AbcClassifier, AbcSummary};
pub use forecasting::{ForecastCalculator, OptimalStockLevels};
pub use ledger::{LedgerCalculator, StockVariance};
pub use recipe::{IngredientCost, IngredientCostSource, RecipeCost, RecipeCostCalculator};
pub use shrinkage::{ShrinkageAnalyzer, ShrinkageMetrics, WasteByReason};
pub use units::{ConversionOutcome, UnitConverter};
pub use valuation::{TurnoverMetrics, ValuationCalculator};

/// 計算警告（降級結果或資料異常）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcWarning {
    pub item_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CalcWarning {
    pub fn new(item_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            item_id,
            message,
            severity,
        }
    }

    pub fn info(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Info)
    }

    pub fn warning(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Warning)
    }

    pub fn error(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// 十進位平方根（經由 f64 計算，負數與無法表示時回傳 0）
pub(crate) fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}

/// 安全除法：分母為 0 時回傳 0
pub(crate) fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
