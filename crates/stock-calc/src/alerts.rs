//! 庫存警示

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{ForecastConfig, InventoryItem, MovementType, StockMovement};

use crate::forecasting::ForecastCalculator;
use crate::ledger::LedgerCalculator;
use crate::WarningSeverity;

/// 警示類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockAlertKind {
    OutOfStock,
    BelowMinimum,
    ReorderPointReached,
    Overstock,
    ExpiringSoon,
    PredictedStockout,
}

/// 庫存警示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub item_id: String,
    pub kind: StockAlertKind,
    pub severity: WarningSeverity,
    pub message: String,
}

impl StockAlert {
    fn new(item: &InventoryItem, kind: StockAlertKind, severity: WarningSeverity, message: String) -> Self {
        Self {
            item_id: item.id.clone(),
            kind,
            severity,
            message,
        }
    }
}

/// 警示計算器
pub struct StockAlertCalculator;

impl StockAlertCalculator {
    /// 檢查所有品項，回傳依嚴重度排序的警示（同等級維持品項順序）
    pub fn evaluate(
        items: &[InventoryItem],
        movements: &[StockMovement],
        config: &ForecastConfig,
        as_of: DateTime<Utc>,
    ) -> Vec<StockAlert> {
        let mut alerts: Vec<StockAlert> = items
            .iter()
            .flat_map(|item| Self::evaluate_item(item, movements, config, as_of))
            .collect();

        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }

    /// 檢查單一品項
    pub fn evaluate_item(
        item: &InventoryItem,
        movements: &[StockMovement],
        config: &ForecastConfig,
        as_of: DateTime<Utc>,
    ) -> Vec<StockAlert> {
        let mut alerts = Vec::new();
        let stock = item.current_stock;

        if stock <= Decimal::ZERO {
            alerts.push(StockAlert::new(
                item,
                StockAlertKind::OutOfStock,
                WarningSeverity::Error,
                format!("{} 已無庫存", item.name),
            ));
        } else if item.is_below_minimum() {
            alerts.push(StockAlert::new(
                item,
                StockAlertKind::BelowMinimum,
                WarningSeverity::Warning,
                format!("{} 庫存 {} 低於安全存量 {}", item.name, stock, item.minimum_stock),
            ));
        } else if item.reorder_point > Decimal::ZERO && stock <= item.reorder_point {
            alerts.push(StockAlert::new(
                item,
                StockAlertKind::ReorderPointReached,
                WarningSeverity::Info,
                format!("{} 庫存 {} 已達再訂購點 {}", item.name, stock, item.reorder_point),
            ));
        }

        if let Some(maximum) = item.maximum_stock {
            if stock > maximum {
                alerts.push(StockAlert::new(
                    item,
                    StockAlertKind::Overstock,
                    WarningSeverity::Info,
                    format!("{} 庫存 {} 超過最高存量 {}", item.name, stock, maximum),
                ));
            }
        }

        if item.is_perishable {
            alerts.extend(Self::expiring_batches(item, movements, config, as_of));
        }

        if stock > Decimal::ZERO {
            let horizon = as_of + Duration::days(i64::from(config.lead_time_days));
            if let Some(date) = ForecastCalculator::predict_stockout_date(item, movements, config, as_of) {
                if date <= horizon {
                    alerts.push(StockAlert::new(
                        item,
                        StockAlertKind::PredictedStockout,
                        WarningSeverity::Warning,
                        format!("{} 預計於 {} 缺貨，早於補貨提前期", item.name, date.date_naive()),
                    ));
                }
            }
        }

        alerts
    }

    /// 即將到期的進貨批次
    fn expiring_batches<'a>(
        item: &'a InventoryItem,
        movements: &'a [StockMovement],
        config: &ForecastConfig,
        as_of: DateTime<Utc>,
    ) -> impl Iterator<Item = StockAlert> + 'a {
        let today = as_of.date_naive();
        let warning_days = i64::from(config.expiry_warning_days);

        LedgerCalculator::movements_for_item(&item.id, movements)
            .filter(|m| m.movement_type == MovementType::Purchase)
            .filter_map(move |m| {
                let expiration = m.expiration_date?;
                let days_left = (expiration - today).num_days();
                if !(0..=warning_days).contains(&days_left) {
                    return None;
                }

                let batch = m.batch_number.as_deref().unwrap_or("-");
                Some(StockAlert::new(
                    item,
                    StockAlertKind::ExpiringSoon,
                    WarningSeverity::Warning,
                    format!("{} 批號 {} 將於 {} 天後到期 ({})", item.name, batch, days_left, expiration),
                ))
            })
    }
}
