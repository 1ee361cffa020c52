//! 庫存計價與周轉率

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{InventoryItem, MovementType, StockMovement, ValuationMethod};

use crate::ledger::LedgerCalculator;
use crate::safe_div;

/// 周轉指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnoverMetrics {
    /// 周轉率（期間用量 / 現有庫存）
    pub turnover_rate: Decimal,
    /// 周轉天數
    pub days_to_turnover: Decimal,
}

/// 計價計算器
pub struct ValuationCalculator;

impl ValuationCalculator {
    /// 加權平均成本
    ///
    /// 現有庫存以成本價視為一批，每筆進貨異動各為一批，進貨數量取絕對值。
    /// 未記錄單位成本的進貨以成本價計。
    pub fn weighted_average_cost(item: &InventoryItem, movements: &[StockMovement]) -> Decimal {
        let mut total_quantity = item.current_stock;
        let mut total_value = item.current_stock * item.cost_price;

        for movement in LedgerCalculator::movements_for_item(&item.id, movements)
            .filter(|m| m.movement_type == MovementType::Purchase)
        {
            let quantity = movement.quantity.abs();
            let unit_cost = movement.unit_cost.unwrap_or(item.cost_price);
            total_quantity += quantity;
            total_value += quantity * unit_cost;
        }

        if total_quantity.is_zero() {
            return item.cost_price;
        }

        total_value / total_quantity
    }

    /// 周轉率
    pub fn turnover_rate(
        item: &InventoryItem,
        movements: &[StockMovement],
        period_days: u32,
        as_of: DateTime<Utc>,
    ) -> TurnoverMetrics {
        let usage = LedgerCalculator::usage_in_window(&item.id, movements, period_days, as_of);
        let turnover_rate = safe_div(usage, item.current_stock);
        let days_to_turnover = safe_div(Decimal::from(period_days), turnover_rate);

        TurnoverMetrics {
            turnover_rate,
            days_to_turnover,
        }
    }

    /// 計價單位成本
    ///
    /// FIFO 以最後進貨成本、LIFO 以平均成本近似，不做分層計價。
    pub fn unit_cost(item: &InventoryItem, method: ValuationMethod) -> Decimal {
        match method {
            ValuationMethod::CurrentCost => item.cost_price,
            ValuationMethod::AverageCost | ValuationMethod::Lifo => {
                item.average_cost.unwrap_or(item.cost_price)
            }
            ValuationMethod::Fifo => item.last_cost_price.unwrap_or(item.cost_price),
        }
    }

    /// 庫存總價值
    pub fn inventory_value(items: &[InventoryItem], method: ValuationMethod) -> Decimal {
        items
            .iter()
            .map(|item| item.current_stock * Self::unit_cost(item, method))
            .sum()
    }

    /// 年持有成本
    pub fn carrying_cost(inventory_value: Decimal, rate: Decimal) -> Decimal {
        inventory_value * rate
    }
}
