//! 集成測試

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use stock::barcode::{clean_barcode, format_for_display, validate_barcode, BarcodeGenerator};
use stock::calc::{
    AbcClass, AbcClassifier, ForecastCalculator, IngredientCostSource, LedgerCalculator,
    RecipeCostCalculator, ShrinkageAnalyzer, StockAlertCalculator, StockAlertKind,
    ValuationCalculator,
};
use stock::model::*;
use stock::scan::{analyze_scan_performance, InMemorySessionRepository, ScanSessionManager};

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 22, 0, 0).unwrap()
}

fn tomato(stock: Decimal) -> InventoryItem {
    InventoryItem::new(
        "ITEM-TOMATO".to_string(),
        "PROD-014".to_string(),
        "Roma Tomato".to_string(),
        "kg".to_string(),
        dec!(8.5),
        stock,
    )
    .with_barcode("036000291452".to_string())
}

fn movement(item_id: &str, movement_type: MovementType, quantity: Decimal, days_ago: i64) -> StockMovement {
    StockMovement::new(
        item_id.to_string(),
        "WALK-IN".to_string(),
        movement_type,
        quantity,
        as_of() - Duration::days(days_ago),
    )
}

#[test]
fn test_upca_checksum_property() {
    assert!(validate_barcode("036000291452").is_valid);
    assert!(!validate_barcode("036000291453").is_valid);
}

#[test]
fn test_theoretical_stock_property() {
    let item = tomato(Decimal::ZERO);
    let movements = vec![
        movement("ITEM-TOMATO", MovementType::Purchase, dec!(50), 2),
        movement("ITEM-TOMATO", MovementType::Consumption, dec!(-5), 1),
    ];

    assert_eq!(LedgerCalculator::theoretical_stock(&item, &movements), dec!(45));
}

#[test]
fn test_stock_variance_property() {
    let variance = LedgerCalculator::stock_variance(dec!(24.8), dec!(25.5), dec!(8.5));

    assert_eq!(variance.quantity_variance, dec!(-0.7));
    assert_eq!(variance.value_variance, dec!(-5.95));
    assert_eq!(variance.percentage_variance.round_dp(2), dec!(-2.75));
}

#[rstest]
#[case(dec!(0))]
#[case(dec!(0.4))]
#[case(dec!(12))]
#[case(dec!(9999))]
fn test_manual_reorder_quantity_property(#[case] usage: Decimal) {
    let item = tomato(dec!(3)).with_reorder_quantity(dec!(50)).with_maximum_stock(dec!(500));
    let config = ForecastConfig::default();

    assert_eq!(ForecastCalculator::reorder_quantity(&item, usage, &config), dec!(50));
}

#[test]
fn test_abc_property() {
    let ids = ["I1", "I2", "I3", "I4", "I5", "I6"];
    let quantities = [dec!(100), dec!(50), dec!(30), dec!(10), dec!(5), dec!(5)];

    let items: Vec<InventoryItem> = ids
        .iter()
        .map(|id| {
            InventoryItem::new(
                id.to_string(),
                format!("SKU-{}", id),
                id.to_string(),
                "each".to_string(),
                dec!(10),
                Decimal::ZERO,
            )
        })
        .collect();
    let movements: Vec<StockMovement> = ids
        .iter()
        .zip(quantities)
        .map(|(id, q)| movement(id, MovementType::Sale, -q, 100))
        .collect();

    let entries = AbcClassifier::classify(&items, &movements, as_of());
    let total: Decimal = entries.iter().map(|e| e.annual_value).sum();
    assert_eq!(total, dec!(2000));

    let class_a: Vec<&str> = entries
        .iter()
        .filter(|e| e.classification == AbcClass::A)
        .map(|e| e.item_id.as_str())
        .collect();
    assert_eq!(class_a, vec!["I1", "I2"]);
}

#[test]
fn test_end_session_twice_property() {
    let manager = ScanSessionManager::new(
        InMemorySessionRepository::new(),
        FixedClock::new(as_of()),
        SequentialIdGenerator::new("CNT".to_string()),
    );
    let session = manager.start_session(ScanSessionType::Count, "WALK-IN".to_string(), "chef".to_string());

    manager.clock().advance(Duration::minutes(10));
    let first = manager.end_session(&session.id).unwrap();
    manager.clock().advance(Duration::minutes(10));
    let second = manager.end_session(&session.id).unwrap();

    assert_eq!(first.end_time, Some(as_of() + Duration::minutes(10)));
    assert_eq!(second.end_time, first.end_time);
}

/// 盤點流程：掃描條碼、計算帳面庫存、比對差異
#[test]
fn test_count_session_to_variance() -> anyhow::Result<()> {
    let item = tomato(dec!(10));
    let movements = vec![
        movement("ITEM-TOMATO", MovementType::Purchase, dec!(20), 3),
        movement("ITEM-TOMATO", MovementType::Consumption, dec!(-4.5), 1),
    ];

    let barcode_index: HashMap<String, String> = [(item.barcode.clone().unwrap_or_default(), item.id.clone())]
        .into_iter()
        .collect();

    let manager = ScanSessionManager::new(
        InMemorySessionRepository::new(),
        FixedClock::new(as_of()),
        SequentialIdGenerator::new("CNT".to_string()),
    );
    let session = manager.start_session(ScanSessionType::Count, "WALK-IN".to_string(), "chef".to_string());
    let lookup = |code: &str| barcode_index.get(code).cloned();

    manager
        .record_scan(&session.id, "0 36000 29145 2", lookup)
        .ok_or_else(|| anyhow::anyhow!("scan not recorded"))?;
    manager
        .record_scan(&session.id, "999", lookup)
        .ok_or_else(|| anyhow::anyhow!("scan not recorded"))?;

    manager.clock().advance(Duration::minutes(18));
    manager.end_session(&session.id);
    let stats = manager
        .session_stats(&session.id)
        .ok_or_else(|| anyhow::anyhow!("missing session"))?;
    assert_eq!(stats.successful_scans, 1);
    assert_eq!(stats.failed_scans, 1);
    assert_eq!(stats.duration_minutes, 18);

    let theoretical = LedgerCalculator::theoretical_stock(&item, &movements);
    assert_eq!(theoretical, dec!(25.5));

    let variance = LedgerCalculator::stock_variance(dec!(24.8), theoretical, item.cost_price);
    assert_eq!(variance.value_variance, dec!(-5.95));

    // 盤點後以實盤數重新定錨
    let counted = item.with_current_stock(dec!(24.8));
    assert_eq!(LedgerCalculator::theoretical_stock(&counted, &[]), dec!(24.8));

    Ok(())
}

#[test]
fn test_generated_sku_scans_successfully() -> anyhow::Result<()> {
    let mut generator = BarcodeGenerator::with_rng(StdRng::seed_from_u64(7));
    let sku = generator.internal_sku(None)?;

    let display = format_for_display(&sku);
    assert_eq!(clean_barcode(&display), sku);

    let manager = ScanSessionManager::new(
        InMemorySessionRepository::new(),
        FixedClock::new(as_of()),
        SequentialIdGenerator::new("RCV".to_string()),
    );
    let session = manager.start_session(ScanSessionType::Receive, "DOCK".to_string(), "porter".to_string());
    let scan = manager
        .record_scan(&session.id, &display, |code| (code == sku).then(|| "ITEM-NEW".to_string()))
        .ok_or_else(|| anyhow::anyhow!("scan not recorded"))?;

    assert!(scan.success);
    assert_eq!(scan.format, BarcodeFormat::UpcA);
    assert_eq!(scan.item_id.as_deref(), Some("ITEM-NEW"));
    Ok(())
}

#[test]
fn test_recipe_cost_with_conversion_and_fallback() {
    let units = vec![
        UnitOfMeasurement::new("kg".to_string(), "Kilogram".to_string(), UnitType::Weight, dec!(1000)),
        UnitOfMeasurement::new("g".to_string(), "Gram".to_string(), UnitType::Weight, dec!(1)),
    ];
    let items = vec![tomato(dec!(10))];
    let recipe = Recipe::new(
        "RCP-SALSA".to_string(),
        "MENU-SALSA".to_string(),
        "Fresh Salsa".to_string(),
        dec!(2),
    )
    .with_ingredient(RecipeIngredient::new("ITEM-TOMATO".to_string(), dec!(400), "g".to_string()))
    .with_ingredient(
        RecipeIngredient::new("ITEM-CILANTRO".to_string(), dec!(1), "bunch".to_string()).with_cost(dec!(0.6)),
    );

    let cost = RecipeCostCalculator::calculate(&recipe, &items, &units);

    assert_eq!(cost.total_cost, dec!(4));
    assert_eq!(cost.cost_per_serving, dec!(2));
    assert_eq!(cost.ingredient_costs[1].source, IngredientCostSource::StoredCost);
    assert_eq!(cost.warnings.len(), 1);
    assert_eq!(RecipeCostCalculator::food_cost_percentage(cost.cost_per_serving, dec!(8)), dec!(25));
}

#[test]
fn test_forecast_valuation_and_alerts_together() {
    let item = tomato(dec!(12)).with_minimum_stock(dec!(5)).with_reorder_point(dec!(15));
    let movements = vec![
        movement("ITEM-TOMATO", MovementType::Purchase, dec!(40), 20).with_unit_cost(dec!(9.5)),
        movement("ITEM-TOMATO", MovementType::Consumption, dec!(-30), 10),
        movement("ITEM-TOMATO", MovementType::Sale, dec!(-30), 4),
    ];
    let waste = vec![WasteLog::new(
        "ITEM-TOMATO".to_string(),
        dec!(2),
        dec!(8.5),
        "SPOILED".to_string(),
        as_of() - Duration::days(2),
    )];
    let config = ForecastConfig::default();

    let usage = ForecastCalculator::average_daily_usage(&item.id, &movements, config.usage_window_days, as_of());
    assert_eq!(usage, dec!(2));
    assert_eq!(
        ForecastCalculator::predict_stockout_date(&item, &movements, &config, as_of()),
        Some(as_of() + Duration::days(6))
    );

    // (12 × 8.5 + 40 × 9.5) / 52
    let wac = ValuationCalculator::weighted_average_cost(&item, &movements);
    assert_eq!(wac.round_dp(4), dec!(9.2692));

    let shrinkage = ShrinkageAnalyzer::shrinkage_rate(&item.id, &waste, &movements, 30, as_of());
    assert_eq!(shrinkage.shrinkage_rate, dec!(5));
    assert_eq!(shrinkage.shrinkage_value, dec!(17));

    let alerts = StockAlertCalculator::evaluate(&[item], &movements, &config, as_of());
    let kinds: Vec<StockAlertKind> = alerts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![StockAlertKind::PredictedStockout, StockAlertKind::ReorderPointReached]);
}

#[test]
fn test_scan_logs_feed_analytics() {
    let logs = vec![
        BarcodeLog::success("036000291452".to_string(), Some("ITEM-TOMATO".to_string()), as_of()),
        BarcodeLog::failure("03600029145".to_string(), "checksum".to_string(), as_of() + Duration::hours(1)),
    ];

    let performance = analyze_scan_performance(&logs);
    assert_eq!(performance.success_rate, dec!(50));
    assert_eq!(performance.average_scans_per_hour, dec!(2));
}

#[test]
fn test_boundary_shapes_serialize() -> anyhow::Result<()> {
    assert_eq!(serde_json::to_string(&BarcodeFormat::Ean13)?, "\"EAN-13\"");
    assert_eq!(serde_json::to_string(&MovementType::Consumption)?, "\"consumption\"");

    let config = ForecastConfig::from_json(r#"{"lead_time_days": 2, "service_level": "0.99"}"#)?;
    assert_eq!(config.lead_time_days, 2);
    assert_eq!(ForecastCalculator::z_score(config.service_level), dec!(2.33));
    Ok(())
}
