//! ABC 分類（柏拉圖分析）

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use stock_core::{InventoryItem, StockMovement};

use crate::ledger::LedgerCalculator;
use crate::safe_div;

/// 年度價值的觀察期（天）
const ANNUAL_WINDOW_DAYS: u32 = 365;

/// ABC 等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    /// 累計價值前 80%
    A,
    /// 累計價值 80% - 95%
    B,
    /// 其餘
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        };
        f.write_str(label)
    }
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcClassificationEntry {
    pub item_id: String,
    pub classification: AbcClass,
    /// 年度耗用價值
    pub annual_value: Decimal,
}

/// 各等級彙總
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbcSummary {
    pub a_count: usize,
    pub b_count: usize,
    pub c_count: usize,
    pub a_value: Decimal,
    pub b_value: Decimal,
    pub c_value: Decimal,
    pub total_value: Decimal,
}

impl AbcSummary {
    /// 等級品項數
    pub fn count(&self, class: AbcClass) -> usize {
        match class {
            AbcClass::A => self.a_count,
            AbcClass::B => self.b_count,
            AbcClass::C => self.c_count,
        }
    }

    /// 等級價值佔比（%）
    pub fn value_share(&self, class: AbcClass) -> Decimal {
        let value = match class {
            AbcClass::A => self.a_value,
            AbcClass::B => self.b_value,
            AbcClass::C => self.c_value,
        };
        safe_div(value, self.total_value) * Decimal::ONE_HUNDRED
    }
}

/// ABC 分類器
pub struct AbcClassifier;

impl AbcClassifier {
    /// 依年度耗用價值分類
    ///
    /// 價值相同的品項維持輸入順序。
    pub fn classify(
        items: &[InventoryItem],
        movements: &[StockMovement],
        as_of: DateTime<Utc>,
    ) -> Vec<AbcClassificationEntry> {
        let mut values: Vec<(String, Decimal)> = items
            .par_iter()
            .map(|item| (item.id.clone(), Self::annual_value(item, movements, as_of)))
            .collect();

        values.sort_by(|a, b| b.1.cmp(&a.1));

        let total: Decimal = values.iter().map(|(_, value)| *value).sum();
        let a_limit = total * Decimal::from(80);
        let b_limit = total * Decimal::from(95);

        let mut cumulative = Decimal::ZERO;
        values
            .into_iter()
            .map(|(item_id, annual_value)| {
                cumulative += annual_value;
                let scaled = cumulative * Decimal::ONE_HUNDRED;

                let classification = if total.is_zero() {
                    AbcClass::C
                } else if scaled <= a_limit {
                    AbcClass::A
                } else if scaled <= b_limit {
                    AbcClass::B
                } else {
                    AbcClass::C
                };

                tracing::debug!(
                    "品項 {} 年度價值 {}，累計 {} / {} → {}",
                    item_id,
                    annual_value,
                    cumulative,
                    total,
                    classification
                );

                AbcClassificationEntry {
                    item_id,
                    classification,
                    annual_value,
                }
            })
            .collect()
    }

    /// 年度耗用價值 = 年平均每日用量 × 365 × 成本價
    ///
    /// 以一年期用量直接乘成本價，避免先除後乘的捨入誤差。
    pub fn annual_value(item: &InventoryItem, movements: &[StockMovement], as_of: DateTime<Utc>) -> Decimal {
        LedgerCalculator::usage_in_window(&item.id, movements, ANNUAL_WINDOW_DAYS, as_of) * item.cost_price
    }

    /// 彙總各等級品項數與價值
    pub fn summarize(entries: &[AbcClassificationEntry]) -> AbcSummary {
        entries.iter().fold(AbcSummary::default(), |mut summary, entry| {
            match entry.classification {
                AbcClass::A => {
                    summary.a_count += 1;
                    summary.a_value += entry.annual_value;
                }
                AbcClass::B => {
                    summary.b_count += 1;
                    summary.b_value += entry.annual_value;
                }
                AbcClass::C => {
                    summary.c_count += 1;
                    summary.c_value += entry.annual_value;
                }
            }
            summary.total_value += entry.annual_value;
            summary
        })
    }
}
