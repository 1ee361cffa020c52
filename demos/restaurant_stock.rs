//! 餐廳庫存示例：預測補貨、ABC 分類、警示與盤點掃描

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use stock::barcode::{format_for_display, BarcodeGenerator};
use stock::calc::{AbcClassifier, ForecastCalculator, StockAlertCalculator, ValuationCalculator};
use stock::model::{
    ForecastConfig, InventoryItem, MovementType, ScanSessionType, StockMovement, SystemClock,
    UuidGenerator, ValuationMethod,
};
use stock::scan::{InMemorySessionRepository, ScanSessionManager};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stock_calc=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    tracing::info!("餐廳庫存示例啟動");
    println!("=== 餐廳庫存示例 ===\n");

    let now = Utc::now();
    let config = ForecastConfig::default().with_lead_time_days(3);
    config.validate()?;
    tracing::info!("預測配置: 前置時間 {} 天, 服務水準 {}", config.lead_time_days, config.service_level);

    let mut generator = BarcodeGenerator::new();

    let items = vec![
        InventoryItem::new(
            "ITEM-SALMON".to_string(),
            "FISH-002".to_string(),
            "Atlantic Salmon".to_string(),
            "kg".to_string(),
            Decimal::from(22),
            Decimal::from(9),
        )
        .with_barcode(generator.internal_sku(None)?)
        .with_minimum_stock(Decimal::from(4))
        .with_reorder_point(Decimal::from(10))
        .as_perishable(4),
        InventoryItem::new(
            "ITEM-RICE".to_string(),
            "DRY-010".to_string(),
            "Jasmine Rice".to_string(),
            "kg".to_string(),
            Decimal::new(180, 2),
            Decimal::from(60),
        )
        .with_barcode(generator.internal_sku(None)?)
        .with_maximum_stock(Decimal::from(80)),
    ];

    let movements = vec![
        StockMovement::new(
            "ITEM-SALMON".to_string(),
            "WALK-IN".to_string(),
            MovementType::Consumption,
            Decimal::from(-36),
            now - Duration::days(6),
        ),
        StockMovement::new(
            "ITEM-RICE".to_string(),
            "DRY-STORE".to_string(),
            MovementType::Consumption,
            Decimal::from(-45),
            now - Duration::days(12),
        ),
    ];

    println!("補貨建議:");
    for item in &items {
        let usage = ForecastCalculator::average_daily_usage(&item.id, &movements, config.usage_window_days, now);
        let quantity = ForecastCalculator::reorder_quantity(item, usage, &config);
        let stockout = ForecastCalculator::predict_stockout_date(item, &movements, &config, now);

        println!(
            "  - {} [{}]: 日均用量 {}, 建議訂購 {}, 預計缺貨 {:?}",
            item.name,
            item.barcode.as_deref().map(format_for_display).unwrap_or_default(),
            usage.round_dp(2),
            quantity.round_dp(1),
            stockout.map(|d| d.date_naive())
        );
    }

    println!("\nABC 分類:");
    for entry in AbcClassifier::classify(&items, &movements, now) {
        println!("  - {}: {} (年度價值 {})", entry.item_id, entry.classification, entry.annual_value);
    }

    let value = ValuationCalculator::inventory_value(&items, ValuationMethod::AverageCost);
    println!(
        "\n庫存價值: {}，年持有成本: {}",
        value,
        ValuationCalculator::carrying_cost(value, config.carrying_cost_rate)
    );

    println!("\n警示:");
    for alert in StockAlertCalculator::evaluate(&items, &movements, &config, now) {
        println!("  - [{:?}] {}", alert.severity, alert.message);
    }

    tracing::info!("開始盤點掃描");
    let manager = ScanSessionManager::new(InMemorySessionRepository::new(), SystemClock, UuidGenerator);
    let session = manager.start_session(ScanSessionType::Count, "WALK-IN".to_string(), "chef-01".to_string());
    let lookup = |code: &str| {
        items
            .iter()
            .find(|i| i.barcode.as_deref() == Some(code))
            .map(|i| i.id.clone())
    };

    for item in &items {
        if let Some(barcode) = &item.barcode {
            manager.record_scan(&session.id, barcode, lookup);
        }
    }
    manager.record_scan(&session.id, "NOT-A-CODE?", lookup);
    manager.end_session(&session.id);

    if let Some(stats) = manager.session_stats(&session.id) {
        println!(
            "\n盤點掃描: 共 {} 筆，成功 {} 筆，品項 {} 個",
            stats.total_scans, stats.successful_scans, stats.unique_items
        );
    }

    tracing::info!("示例結束");
    Ok(())
}
