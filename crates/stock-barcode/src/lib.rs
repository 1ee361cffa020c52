//! # Stock Barcode
//!
//! 條碼格式辨識、檢查碼驗證、顯示格式化與內部條碼產生。

pub mod format;
pub mod generator;
pub mod validator;

pub use format::detect_format;
pub use generator::BarcodeGenerator;
pub use validator::{
    clean_barcode, format_for_display, generate_ean13_check_digit, generate_upca_check_digit,
    validate_barcode, BarcodeValidation,
};
