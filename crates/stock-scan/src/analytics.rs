//! 掃描紀錄分析

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use stock_core::BarcodeLog;

/// 熱門品項筆數
const TOP_ITEMS_LIMIT: usize = 10;

/// 尖峰時段筆數
const PEAK_HOURS_LIMIT: usize = 5;

const SECONDS_PER_HOUR: i64 = 3600;

/// 品項掃描次數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemScanCount {
    pub item_id: String,
    pub count: usize,
}

/// 錯誤訊息出現次數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCount {
    pub message: String,
    pub count: usize,
}

/// 每小時掃描次數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    /// 0-23
    pub hour: u32,
    pub count: usize,
}

/// 掃描成效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPerformance {
    /// 成功率（%）
    pub success_rate: Decimal,
    pub average_scans_per_hour: Decimal,
    pub top_scanned_items: Vec<ItemScanCount>,
    pub errors_by_type: Vec<ErrorCount>,
}

/// 掃描效率報告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub total_scans: usize,
    pub unique_items: usize,
    pub average_scans_per_item: Decimal,
    pub peak_scanning_hours: Vec<HourCount>,
}

/// 分析掃描成效
pub fn analyze_scan_performance(logs: &[BarcodeLog]) -> ScanPerformance {
    let total = logs.len();
    if total == 0 {
        return ScanPerformance {
            success_rate: Decimal::ZERO,
            average_scans_per_hour: Decimal::ZERO,
            top_scanned_items: Vec::new(),
            errors_by_type: Vec::new(),
        };
    }

    let successful = logs.iter().filter(|log| log.success).count();
    let success_rate = Decimal::from(successful) * Decimal::ONE_HUNDRED / Decimal::from(total);

    let top_scanned_items = count_in_order(logs.iter().filter_map(|log| log.item_id.as_deref()))
        .into_iter()
        .take(TOP_ITEMS_LIMIT)
        .map(|(item_id, count)| ItemScanCount { item_id, count })
        .collect();

    let errors_by_type = count_in_order(
        logs.iter()
            .filter(|log| !log.success)
            .filter_map(|log| log.error_message.as_deref()),
    )
    .into_iter()
    .map(|(message, count)| ErrorCount { message, count })
    .collect();

    ScanPerformance {
        success_rate,
        average_scans_per_hour: scans_per_hour(logs),
        top_scanned_items,
        errors_by_type,
    }
}

/// 期間 `[as_of - period_days, as_of]` 內的掃描效率
pub fn efficiency_report(logs: &[BarcodeLog], period_days: u32, as_of: DateTime<Utc>) -> EfficiencyReport {
    let start = as_of - chrono::Duration::days(i64::from(period_days));
    let recent: Vec<&BarcodeLog> = logs
        .iter()
        .filter(|log| log.scanned_at >= start && log.scanned_at <= as_of)
        .collect();

    let total_scans = recent.len();
    let unique_items = recent
        .iter()
        .filter_map(|log| log.item_id.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let average_scans_per_item = if unique_items == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(total_scans) / Decimal::from(unique_items)
    };

    let mut histogram = [0usize; 24];
    for log in &recent {
        histogram[log.scanned_at.hour() as usize] += 1;
    }

    let mut hours: Vec<HourCount> = histogram
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(hour, count)| HourCount {
            hour: hour as u32,
            count: *count,
        })
        .collect();
    hours.sort_by(|a, b| b.count.cmp(&a.count));
    hours.truncate(PEAK_HOURS_LIMIT);

    EfficiencyReport {
        total_scans,
        unique_items,
        average_scans_per_item,
        peak_scanning_hours: hours,
    }
}

/// 總筆數 / 最早與最晚紀錄間隔的小時數
fn scans_per_hour(logs: &[BarcodeLog]) -> Decimal {
    let earliest = logs.iter().map(|log| log.scanned_at).min();
    let latest = logs.iter().map(|log| log.scanned_at).max();

    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return Decimal::ZERO;
    };

    let seconds = (latest - earliest).num_seconds();
    if seconds <= 0 {
        return Decimal::ZERO;
    }

    let hours = Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR);
    Decimal::from(logs.len()) / hours
}

/// 計數並依次數遞減排序，次數相同者依首次出現順序
fn count_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut result: Vec<(String, usize)> = Vec::new();

    for value in values {
        let slot = *slots.entry(value).or_insert_with(|| {
            result.push((value.to_string(), 0));
            result.len() - 1
        });
        result[slot].1 += 1;
    }

    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}
