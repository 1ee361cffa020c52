//! 用量預測與補貨計算

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{ForecastConfig, InventoryItem, StockMovement};

use crate::ledger::LedgerCalculator;
use crate::{decimal_sqrt, safe_div};

/// 每年天數（年需求量換算）
const DAYS_PER_YEAR: u32 = 365;

/// 服務水準 → 標準常態分位數（z 值）對照表
const Z_SCORE_TABLE: [(Decimal, Decimal); 11] = [
    (Decimal::from_parts(50, 0, 0, false, 2), Decimal::from_parts(0, 0, 0, false, 2)),
    (Decimal::from_parts(75, 0, 0, false, 2), Decimal::from_parts(67, 0, 0, false, 2)),
    (Decimal::from_parts(80, 0, 0, false, 2), Decimal::from_parts(84, 0, 0, false, 2)),
    (Decimal::from_parts(85, 0, 0, false, 2), Decimal::from_parts(104, 0, 0, false, 2)),
    (Decimal::from_parts(90, 0, 0, false, 2), Decimal::from_parts(128, 0, 0, false, 2)),
    (Decimal::from_parts(95, 0, 0, false, 2), Decimal::from_parts(165, 0, 0, false, 2)),
    (Decimal::from_parts(975, 0, 0, false, 3), Decimal::from_parts(196, 0, 0, false, 2)),
    (Decimal::from_parts(98, 0, 0, false, 2), Decimal::from_parts(205, 0, 0, false, 2)),
    (Decimal::from_parts(99, 0, 0, false, 2), Decimal::from_parts(233, 0, 0, false, 2)),
    (Decimal::from_parts(995, 0, 0, false, 3), Decimal::from_parts(258, 0, 0, false, 2)),
    (Decimal::from_parts(999, 0, 0, false, 3), Decimal::from_parts(309, 0, 0, false, 2)),
];

/// 最適庫存水位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalStockLevels {
    pub reorder_point: Decimal,
    pub safety_stock: Decimal,
    pub maximum_stock: Decimal,
}

/// 預測計算器
pub struct ForecastCalculator;

impl ForecastCalculator {
    /// 平均每日用量
    ///
    /// 觀察期 `[as_of - window_days, as_of]` 內銷售與耗用的絕對值合計 ÷ 天數。
    pub fn average_daily_usage(
        item_id: &str,
        movements: &[StockMovement],
        window_days: u32,
        as_of: DateTime<Utc>,
    ) -> Decimal {
        if window_days == 0 {
            return Decimal::ZERO;
        }

        let usage = LedgerCalculator::usage_in_window(item_id, movements, window_days, as_of);
        usage / Decimal::from(window_days)
    }

    /// 經濟訂購量
    /// EOQ = sqrt(2 * 年需求量 * 訂購成本 / 持有成本)
    pub fn economic_order_quantity(
        item: &InventoryItem,
        avg_daily_usage: Decimal,
        config: &ForecastConfig,
    ) -> Decimal {
        let annual_demand = avg_daily_usage * Decimal::from(DAYS_PER_YEAR);
        let holding_cost = item.cost_price * config.holding_cost_rate;

        if holding_cost <= Decimal::ZERO || annual_demand <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        decimal_sqrt(Decimal::TWO * annual_demand * config.ordering_cost / holding_cost)
    }

    /// 建議再訂購量
    ///
    /// 品項有手動設定的再訂購量（> 0）時直接採用。
    pub fn reorder_quantity(
        item: &InventoryItem,
        avg_daily_usage: Decimal,
        config: &ForecastConfig,
    ) -> Decimal {
        if let Some(manual) = item.manual_reorder_quantity() {
            return manual;
        }

        let demand_during_lead_time = avg_daily_usage * Decimal::from(config.lead_time_days);
        let safety_stock = avg_daily_usage * Decimal::from(config.safety_stock_days);
        let reorder_point = demand_during_lead_time + safety_stock;

        let eoq = Self::economic_order_quantity(item, avg_daily_usage, config);

        let max_stock_order = match item.maximum_stock {
            Some(maximum) => maximum - item.current_stock,
            None => eoq,
        };

        let quantity = eoq
            .max(max_stock_order)
            .max(reorder_point - item.current_stock);

        tracing::debug!(
            "品項 {} 再訂購量: EOQ {}, 補至上限 {}, 再訂購點 {} → {}",
            item.id,
            eoq,
            max_stock_order,
            reorder_point,
            quantity
        );

        quantity.max(Decimal::ZERO)
    }

    /// 最適庫存水位（安全庫存、再訂購點、最高庫存）
    pub fn optimal_stock_levels(
        item: &InventoryItem,
        movements: &[StockMovement],
        config: &ForecastConfig,
        as_of: DateTime<Utc>,
    ) -> OptimalStockLevels {
        let avg_daily_usage =
            Self::average_daily_usage(&item.id, movements, config.usage_window_days, as_of);
        let lead_time = Decimal::from(config.lead_time_days);
        let demand_during_lead_time = avg_daily_usage * lead_time;

        let usage: Vec<Decimal> = LedgerCalculator::movements_for_item(&item.id, movements)
            .filter(|m| m.is_usage())
            .map(|m| m.quantity.abs())
            .collect();
        let std_dev = Self::population_std_dev(&usage);

        let safety_stock =
            (Self::z_score(config.service_level) * std_dev * decimal_sqrt(lead_time)).max(Decimal::ZERO);
        let reorder_point = (demand_during_lead_time + safety_stock).max(Decimal::ZERO);
        let maximum_stock =
            (reorder_point + Self::reorder_quantity(item, avg_daily_usage, config)).max(Decimal::ZERO);

        OptimalStockLevels {
            reorder_point,
            safety_stock,
            maximum_stock,
        }
    }

    /// 預測缺貨日期
    ///
    /// 平均用量或現有庫存不為正時回傳 `None`。
    pub fn predict_stockout_date(
        item: &InventoryItem,
        movements: &[StockMovement],
        config: &ForecastConfig,
        as_of: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let avg_daily_usage =
            Self::average_daily_usage(&item.id, movements, config.usage_window_days, as_of);

        if avg_daily_usage <= Decimal::ZERO || item.current_stock <= Decimal::ZERO {
            return None;
        }

        let days = (item.current_stock / avg_daily_usage).floor().to_i64()?;
        Duration::try_days(days).and_then(|d| as_of.checked_add_signed(d))
    }

    /// 現有庫存可支應天數
    pub fn days_of_cover(item: &InventoryItem, avg_daily_usage: Decimal) -> Option<Decimal> {
        if avg_daily_usage <= Decimal::ZERO {
            return None;
        }

        Some(item.current_stock.max(Decimal::ZERO) / avg_daily_usage)
    }

    /// 服務水準對應的 z 值（查表並線性插值，超出範圍取端點）
    pub fn z_score(service_level: Decimal) -> Decimal {
        let (first_level, first_z) = Z_SCORE_TABLE[0];
        if service_level <= first_level {
            return first_z;
        }

        for window in Z_SCORE_TABLE.windows(2) {
            let (low_level, low_z) = window[0];
            let (high_level, high_z) = window[1];

            if service_level <= high_level {
                let ratio = safe_div(service_level - low_level, high_level - low_level);
                return low_z + (high_z - low_z) * ratio;
            }
        }

        Z_SCORE_TABLE[Z_SCORE_TABLE.len() - 1].1
    }

    /// 母體標準差
    fn population_std_dev(values: &[Decimal]) -> Decimal {
        if values.is_empty() {
            return Decimal::ZERO;
        }

        let count = Decimal::from(values.len());
        let mean = values.iter().copied().sum::<Decimal>() / count;
        let variance = values
            .iter()
            .map(|v| (*v - mean) * (*v - mean))
            .sum::<Decimal>()
            / count;

        decimal_sqrt(variance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use stock_core::MovementType;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
    }

    fn flour(stock: Decimal) -> InventoryItem {
        InventoryItem::new(
            "ITEM-FLOUR".to_string(),
            "DRY-001".to_string(),
            "Bread Flour".to_string(),
            "kg".to_string(),
            dec!(5),
            stock,
        )
    }

    fn usage(quantity: Decimal, days_ago: i64) -> StockMovement {
        StockMovement::new(
            "ITEM-FLOUR".to_string(),
            "DRY-STORE".to_string(),
            MovementType::Consumption,
            quantity,
            as_of() - Duration::days(days_ago),
        )
    }

    #[test]
    fn test_average_daily_usage() {
        let movements = vec![
            usage(dec!(-30), 2),
            usage(dec!(-30), 20),
            usage(dec!(-500), 40), // 觀察期外
            StockMovement::new(
                "ITEM-FLOUR".to_string(),
                "DRY-STORE".to_string(),
                MovementType::Purchase,
                dec!(200),
                as_of() - Duration::days(1),
            ),
        ];

        let rate = ForecastCalculator::average_daily_usage("ITEM-FLOUR", &movements, 30, as_of());
        assert_eq!(rate, dec!(2));
    }

    #[test]
    fn test_average_daily_usage_zero_window() {
        let movements = vec![usage(dec!(-30), 0)];
        assert_eq!(
            ForecastCalculator::average_daily_usage("ITEM-FLOUR", &movements, 0, as_of()),
            Decimal::ZERO
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(2))]
    #[case(dec!(250))]
    fn test_manual_reorder_quantity_wins(#[case] avg_daily_usage: Decimal) {
        let item = flour(dec!(10)).with_reorder_quantity(dec!(50));
        let config = ForecastConfig::default();

        assert_eq!(ForecastCalculator::reorder_quantity(&item, avg_daily_usage, &config), dec!(50));
    }

    #[test]
    fn test_reorder_quantity_uses_eoq() {
        // 年需求 730，持有成本 5 × 0.20 = 1，EOQ = sqrt(2 × 730 × 50 / 1) ≈ 270.19
        let item = flour(dec!(10));
        let config = ForecastConfig::default();

        let quantity = ForecastCalculator::reorder_quantity(&item, dec!(2), &config);
        assert_eq!(quantity.round_dp(2), dec!(270.19));
    }

    #[test]
    fn test_reorder_quantity_fills_to_maximum() {
        let item = flour(dec!(10)).with_maximum_stock(dec!(400));
        let config = ForecastConfig::default();

        assert_eq!(ForecastCalculator::reorder_quantity(&item, dec!(2), &config), dec!(390));
    }

    #[test]
    fn test_reorder_quantity_without_holding_cost() {
        // 成本價為 0 時 EOQ 為 0，取再訂購點缺口
        let mut item = flour(dec!(5));
        item.cost_price = Decimal::ZERO;
        let config = ForecastConfig::default();

        // 再訂購點 = 2 × 7 + 2 × 3 = 20，缺口 15
        assert_eq!(ForecastCalculator::reorder_quantity(&item, dec!(2), &config), dec!(15));
    }

    #[test]
    fn test_reorder_quantity_never_negative() {
        let item = flour(dec!(500)).with_maximum_stock(dec!(100));
        let config = ForecastConfig::default();

        assert_eq!(ForecastCalculator::reorder_quantity(&item, Decimal::ZERO, &config), Decimal::ZERO);
    }

    #[test]
    fn test_optimal_stock_levels() {
        let item = flour(dec!(10)).with_reorder_quantity(dec!(40));
        let movements = vec![usage(dec!(-4), 3), usage(dec!(-6), 10)];
        let config = ForecastConfig::default();

        let levels = ForecastCalculator::optimal_stock_levels(&item, &movements, &config, as_of());

        // σ = 1，安全庫存 = 1.65 × 1 × √7 ≈ 4.3655
        assert!((levels.safety_stock - dec!(4.3655)).abs() < dec!(0.001));
        // 再訂購點 = 10/30 × 7 + 安全庫存
        let expected_rop = dec!(10) / dec!(30) * dec!(7) + levels.safety_stock;
        assert!((levels.reorder_point - expected_rop).abs() < dec!(0.000001));
        assert_eq!(levels.maximum_stock, levels.reorder_point + dec!(40));
    }

    #[test]
    fn test_optimal_stock_levels_without_history() {
        let item = flour(dec!(10)).with_reorder_quantity(dec!(40));
        let levels = ForecastCalculator::optimal_stock_levels(&item, &[], &ForecastConfig::default(), as_of());

        assert_eq!(levels.safety_stock, Decimal::ZERO);
        assert_eq!(levels.reorder_point, Decimal::ZERO);
        assert_eq!(levels.maximum_stock, dec!(40));
    }

    #[test]
    fn test_predict_stockout_date() {
        // 平均用量 2/天，庫存 15 → 7 天後
        let item = flour(dec!(15));
        let movements = vec![usage(dec!(-60), 5)];

        let date = ForecastCalculator::predict_stockout_date(&item, &movements, &ForecastConfig::default(), as_of());
        assert_eq!(date, Some(as_of() + Duration::days(7)));
    }

    #[test]
    fn test_predict_stockout_date_none() {
        let config = ForecastConfig::default();

        // 無用量
        assert_eq!(ForecastCalculator::predict_stockout_date(&flour(dec!(15)), &[], &config, as_of()), None);

        // 無庫存
        let movements = vec![usage(dec!(-60), 5)];
        assert_eq!(
            ForecastCalculator::predict_stockout_date(&flour(dec!(0)), &movements, &config, as_of()),
            None
        );
    }

    #[test]
    fn test_days_of_cover() {
        assert_eq!(ForecastCalculator::days_of_cover(&flour(dec!(15)), dec!(2)), Some(dec!(7.5)));
        assert_eq!(ForecastCalculator::days_of_cover(&flour(dec!(15)), Decimal::ZERO), None);
    }

    #[rstest]
    #[case(dec!(0.95), dec!(1.65))]
    #[case(dec!(0.90), dec!(1.28))]
    #[case(dec!(0.99), dec!(2.33))]
    #[case(dec!(0.925), dec!(1.465))]
    #[case(dec!(0.30), dec!(0))]
    #[case(dec!(0.9999), dec!(3.09))]
    fn test_z_score(#[case] service_level: Decimal, #[case] expected: Decimal) {
        assert_eq!(ForecastCalculator::z_score(service_level), expected);
    }
}
