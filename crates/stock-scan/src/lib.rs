//! # Stock Scan
//!
//! 掃描工作階段管理與歷史掃描紀錄分析。
//! 工作階段狀態由注入的儲存庫保管，同一工作階段的修改以鎖互斥。

pub mod analytics;
pub mod session;

// Re-export 主要類型
pub use analytics::{
    analyze_scan_performance, efficiency_report, EfficiencyReport, ErrorCount, HourCount,
    ItemScanCount, ScanPerformance,
};
pub use session::{InMemorySessionRepository, ScanSessionManager, SessionRepository, SessionStats};
