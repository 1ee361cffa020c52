//! 帳面庫存與盤點差異計算

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{InventoryItem, MovementType, StockMovement};

use crate::safe_div;

/// 盤點差異
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockVariance {
    /// 數量差異（實盤 - 帳面）
    pub quantity_variance: Decimal,
    /// 金額差異
    pub value_variance: Decimal,
    /// 差異百分比
    pub percentage_variance: Decimal,
}

/// 帳面庫存計算器
pub struct LedgerCalculator;

impl LedgerCalculator {
    /// 計算帳面庫存
    ///
    /// 以 `item.current_stock` 為最近一次盤點的錨點，依序累加該品項的異動。
    /// 結果低於 0 時以 0 計。
    pub fn theoretical_stock(item: &InventoryItem, movements: &[StockMovement]) -> Decimal {
        let projected = Self::movements_for_item(&item.id, movements)
            .fold(item.current_stock, |stock, m| stock + m.signed_effect());

        if projected < Decimal::ZERO {
            tracing::debug!(
                "品項 {} 帳面庫存為負 ({})，以 0 計",
                item.id,
                projected
            );
            Decimal::ZERO
        } else {
            projected
        }
    }

    /// 計算盤點差異
    pub fn stock_variance(actual: Decimal, theoretical: Decimal, cost_price: Decimal) -> StockVariance {
        let quantity_variance = actual - theoretical;

        StockVariance {
            quantity_variance,
            value_variance: quantity_variance * cost_price,
            percentage_variance: safe_div(quantity_variance, theoretical) * Decimal::ONE_HUNDRED,
        }
    }

    /// 篩選指定品項的異動（保持原順序）
    pub fn movements_for_item<'a>(
        item_id: &'a str,
        movements: &'a [StockMovement],
    ) -> impl Iterator<Item = &'a StockMovement> + 'a {
        movements.iter().filter(move |m| m.item_id == item_id)
    }

    /// 時間是否落在 `[as_of - days, as_of]` 區間內
    pub fn within_window(timestamp: DateTime<Utc>, as_of: DateTime<Utc>, days: u32) -> bool {
        let start = as_of - Duration::days(i64::from(days));
        timestamp >= start && timestamp <= as_of
    }

    /// 指定品項在觀察期內的異動
    pub fn movements_in_window<'a>(
        item_id: &'a str,
        movements: &'a [StockMovement],
        days: u32,
        as_of: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a StockMovement> + 'a {
        Self::movements_for_item(item_id, movements)
            .filter(move |m| Self::within_window(m.created_at, as_of, days))
    }

    /// 觀察期內的用量合計（銷售與耗用的絕對值）
    pub fn usage_in_window(
        item_id: &str,
        movements: &[StockMovement],
        days: u32,
        as_of: DateTime<Utc>,
    ) -> Decimal {
        Self::movements_in_window(item_id, movements, days, as_of)
            .filter(|m| m.is_usage())
            .map(|m| m.quantity.abs())
            .sum()
    }

    /// 觀察期內的進貨量合計
    pub fn purchases_in_window(
        item_id: &str,
        movements: &[StockMovement],
        days: u32,
        as_of: DateTime<Utc>,
    ) -> Decimal {
        Self::movements_in_window(item_id, movements, days, as_of)
            .filter(|m| m.movement_type == MovementType::Purchase)
            .map(|m| m.quantity.abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
    }

    fn item(stock: Decimal) -> InventoryItem {
        InventoryItem::new(
            "ITEM-RICE".to_string(),
            "DRY-010".to_string(),
            "Jasmine Rice".to_string(),
            "kg".to_string(),
            dec!(1.80),
            stock,
        )
    }

    fn movement(movement_type: MovementType, quantity: Decimal, days_ago: i64) -> StockMovement {
        StockMovement::new(
            "ITEM-RICE".to_string(),
            "DRY-STORE".to_string(),
            movement_type,
            quantity,
            as_of() - Duration::days(days_ago),
        )
    }

    #[test]
    fn test_theoretical_stock_purchase_then_consumption() {
        let movements = vec![
            movement(MovementType::Purchase, dec!(50), 2),
            movement(MovementType::Consumption, dec!(-5), 1),
        ];

        assert_eq!(LedgerCalculator::theoretical_stock(&item(dec!(0)), &movements), dec!(45));
    }

    #[test]
    fn test_theoretical_stock_ignores_stored_sign_on_decreases() {
        let movements = vec![
            movement(MovementType::Sale, dec!(3), 3),
            movement(MovementType::Waste, dec!(-2), 2),
            movement(MovementType::Transfer, dec!(1), 1),
            movement(MovementType::Return, dec!(4), 1),
            movement(MovementType::Count, dec!(999), 0),
        ];

        // 20 - 3 - 2 - 1 + 4，盤點異動不參與累加
        assert_eq!(LedgerCalculator::theoretical_stock(&item(dec!(20)), &movements), dec!(18));
    }

    #[test]
    fn test_theoretical_stock_clamped_at_zero() {
        let movements = vec![movement(MovementType::Consumption, dec!(-30), 1)];
        assert_eq!(LedgerCalculator::theoretical_stock(&item(dec!(10)), &movements), Decimal::ZERO);
    }

    #[test]
    fn test_theoretical_stock_skips_other_items() {
        let mut other = movement(MovementType::Purchase, dec!(100), 1);
        other.item_id = "ITEM-OIL".to_string();

        assert_eq!(LedgerCalculator::theoretical_stock(&item(dec!(7)), &[other]), dec!(7));
    }

    #[test]
    fn test_stock_variance() {
        let variance = LedgerCalculator::stock_variance(dec!(24.8), dec!(25.5), dec!(8.5));

        assert_eq!(variance.quantity_variance, dec!(-0.7));
        assert_eq!(variance.value_variance, dec!(-5.95));
        assert_eq!(variance.percentage_variance.round_dp(2), dec!(-2.75));
    }

    #[test]
    fn test_stock_variance_zero_theoretical() {
        let variance = LedgerCalculator::stock_variance(dec!(3), Decimal::ZERO, dec!(2));

        assert_eq!(variance.quantity_variance, dec!(3));
        assert_eq!(variance.value_variance, dec!(6));
        assert_eq!(variance.percentage_variance, Decimal::ZERO);
    }

    #[test]
    fn test_usage_and_purchases_in_window() {
        let movements = vec![
            movement(MovementType::Sale, dec!(-4), 5),
            movement(MovementType::Consumption, dec!(6), 10),
            movement(MovementType::Consumption, dec!(-100), 45),
            movement(MovementType::Purchase, dec!(25), 3),
            movement(MovementType::Purchase, dec!(25), 31),
        ];

        assert_eq!(LedgerCalculator::usage_in_window("ITEM-RICE", &movements, 30, as_of()), dec!(10));
        assert_eq!(LedgerCalculator::purchases_in_window("ITEM-RICE", &movements, 30, as_of()), dec!(25));
    }

    #[test]
    fn test_within_window_bounds() {
        let now = as_of();
        assert!(LedgerCalculator::within_window(now, now, 30));
        assert!(LedgerCalculator::within_window(now - Duration::days(30), now, 30));
        assert!(!LedgerCalculator::within_window(now - Duration::days(31), now, 30));
        assert!(!LedgerCalculator::within_window(now + Duration::seconds(1), now, 30));
    }
}
