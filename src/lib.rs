//! # Stock
//!
//! 餐廳庫存預測、庫存控管與條碼引擎。
//!
//! - [`model`]：資料模型、配置與錯誤類型
//! - [`calc`]：帳面庫存、預測、計價、分類、損耗、食譜成本與警示
//! - [`barcode`]：條碼辨識、驗證與產生
//! - [`scan`]：掃描工作階段與掃描分析

pub use stock_barcode as barcode;
pub use stock_calc as calc;
pub use stock_core as model;
pub use stock_scan as scan;

pub use stock_core::{Result, StockError};
