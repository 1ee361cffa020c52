//! 報廢與損耗分析

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stock_core::{StockMovement, WasteLog};

use crate::ledger::LedgerCalculator;
use crate::safe_div;

/// 損耗指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShrinkageMetrics {
    /// 損耗率（報廢量 / 進貨量 × 100）
    pub shrinkage_rate: Decimal,
    /// 損耗金額
    pub shrinkage_value: Decimal,
}

/// 依報廢原因彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteByReason {
    pub reason_id: String,
    pub quantity: Decimal,
    pub total_cost: Decimal,
    pub entries: usize,
}

/// 損耗分析器
pub struct ShrinkageAnalyzer;

impl ShrinkageAnalyzer {
    /// 計算期間內的損耗率與損耗金額
    pub fn shrinkage_rate(
        item_id: &str,
        waste_logs: &[WasteLog],
        movements: &[StockMovement],
        period_days: u32,
        as_of: DateTime<Utc>,
    ) -> ShrinkageMetrics {
        let (waste_quantity, shrinkage_value) = waste_logs
            .iter()
            .filter(|log| log.item_id == item_id)
            .filter(|log| LedgerCalculator::within_window(log.waste_date, as_of, period_days))
            .fold((Decimal::ZERO, Decimal::ZERO), |(quantity, value), log| {
                (quantity + log.quantity, value + log.total_cost)
            });

        let purchased = LedgerCalculator::purchases_in_window(item_id, movements, period_days, as_of);

        ShrinkageMetrics {
            shrinkage_rate: safe_div(waste_quantity, purchased) * Decimal::ONE_HUNDRED,
            shrinkage_value,
        }
    }

    /// 依報廢原因彙總期間內的報廢量與金額，金額高者在前
    pub fn waste_by_reason(
        waste_logs: &[WasteLog],
        period_days: u32,
        as_of: DateTime<Utc>,
    ) -> Vec<WasteByReason> {
        let mut order: Vec<String> = Vec::new();
        let mut totals: HashMap<String, WasteByReason> = HashMap::new();

        for log in waste_logs
            .iter()
            .filter(|log| LedgerCalculator::within_window(log.waste_date, as_of, period_days))
        {
            let entry = totals.entry(log.reason_id.clone()).or_insert_with(|| {
                order.push(log.reason_id.clone());
                WasteByReason {
                    reason_id: log.reason_id.clone(),
                    quantity: Decimal::ZERO,
                    total_cost: Decimal::ZERO,
                    entries: 0,
                }
            });
            entry.quantity += log.quantity;
            entry.total_cost += log.total_cost;
            entry.entries += 1;
        }

        let mut result: Vec<WasteByReason> = order
            .into_iter()
            .filter_map(|reason| totals.remove(&reason))
            .collect();
        result.sort_by(|a, b| b.total_cost.cmp(&a.total_cost));
        result
    }
}
