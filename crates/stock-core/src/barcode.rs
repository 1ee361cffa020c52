//! 條碼與掃描模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// 條碼格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "UPC-A")]
    UpcA,
    #[serde(rename = "UPC-E")]
    UpcE,
    #[serde(rename = "EAN-13")]
    Ean13,
    #[serde(rename = "EAN-8")]
    Ean8,
    #[serde(rename = "CODE-39")]
    Code39,
    #[serde(rename = "CODABAR")]
    Codabar,
    #[serde(rename = "ITF")]
    Itf,
    #[serde(rename = "CODE-128")]
    Code128,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl BarcodeFormat {
    /// 格式顯示名稱
    pub fn as_str(self) -> &'static str {
        match self {
            BarcodeFormat::UpcA => "UPC-A",
            BarcodeFormat::UpcE => "UPC-E",
            BarcodeFormat::Ean13 => "EAN-13",
            BarcodeFormat::Ean8 => "EAN-8",
            BarcodeFormat::Code39 => "CODE-39",
            BarcodeFormat::Codabar => "CODABAR",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Code128 => "CODE-128",
            BarcodeFormat::Unknown => "UNKNOWN",
        }
    }

    /// 是否需要檢查碼驗證
    pub fn has_checksum(self) -> bool {
        matches!(self, BarcodeFormat::UpcA | BarcodeFormat::Ean13)
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 掃描工作階段類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSessionType {
    /// 盤點
    Count,
    /// 收貨
    Receive,
    /// 調撥
    Transfer,
}

/// 單次掃描結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// 條碼內容
    pub barcode: String,

    /// 偵測到的格式
    pub format: BarcodeFormat,

    /// 對應的庫存品項ID
    pub item_id: Option<String>,

    /// 是否成功
    pub success: bool,

    /// 掃描時間
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// 成功的掃描
    pub fn matched(barcode: String, format: BarcodeFormat, item_id: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            barcode,
            format,
            item_id: Some(item_id),
            success: true,
            timestamp,
        }
    }

    /// 失敗的掃描
    pub fn failed(barcode: String, format: BarcodeFormat, timestamp: DateTime<Utc>) -> Self {
        Self {
            barcode,
            format,
            item_id: None,
            success: false,
            timestamp,
        }
    }
}

/// 掃描工作階段
///
/// 狀態：進行中（接受掃描）→ 已結束（唯讀）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    /// 工作階段ID
    pub id: String,

    /// 類型
    pub session_type: ScanSessionType,

    /// 儲位ID
    pub location_id: String,

    /// 操作人員
    pub user_id: String,

    /// 開始時間
    pub start_time: DateTime<Utc>,

    /// 結束時間
    pub end_time: Option<DateTime<Utc>>,

    /// 掃描紀錄（依加入順序）
    pub scans: Vec<ScanResult>,

    /// 是否進行中
    pub is_active: bool,
}

impl ScanSession {
    /// 創建新的工作階段
    pub fn new(
        id: String,
        session_type: ScanSessionType,
        location_id: String,
        user_id: String,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_type,
            location_id,
            user_id,
            start_time,
            end_time: None,
            scans: Vec::new(),
            is_active: true,
        }
    }

    /// 成功掃描數
    pub fn successful_scans(&self) -> usize {
        self.scans.iter().filter(|s| s.success).count()
    }

    /// 成功掃描中不重複的品項數
    pub fn unique_items(&self) -> usize {
        self.scans
            .iter()
            .filter(|s| s.success)
            .filter_map(|s| s.item_id.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// 歷史掃描紀錄（供分析使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeLog {
    /// 紀錄ID
    pub id: Uuid,

    /// 條碼內容
    pub barcode: String,

    /// 對應的庫存品項ID
    pub item_id: Option<String>,

    /// 是否成功
    pub success: bool,

    /// 錯誤訊息
    pub error_message: Option<String>,

    /// 掃描時間
    pub scanned_at: DateTime<Utc>,

    /// 操作人員
    pub user_id: Option<String>,
}

impl BarcodeLog {
    /// 成功的掃描紀錄
    pub fn success(barcode: String, item_id: Option<String>, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode,
            item_id,
            success: true,
            error_message: None,
            scanned_at,
            user_id: None,
        }
    }

    /// 失敗的掃描紀錄
    pub fn failure(barcode: String, error_message: String, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode,
            item_id: None,
            success: false,
            error_message: Some(error_message),
            scanned_at,
            user_id: None,
        }
    }

    /// 建構器模式：設置操作人員
    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_and_serde() {
        assert_eq!(BarcodeFormat::UpcA.to_string(), "UPC-A");
        assert_eq!(BarcodeFormat::Code128.to_string(), "CODE-128");
        assert_eq!(serde_json::to_string(&BarcodeFormat::Ean13).unwrap(), "\"EAN-13\"");
        assert!(BarcodeFormat::Ean13.has_checksum());
        assert!(!BarcodeFormat::Ean8.has_checksum());
    }

    #[test]
    fn test_session_counters() {
        let now = Utc::now();
        let mut session = ScanSession::new(
            "SCAN-1".to_string(),
            ScanSessionType::Count,
            "WALK-IN".to_string(),
            "user-1".to_string(),
            now,
        );
        session.scans.push(ScanResult::matched("036000291452".to_string(), BarcodeFormat::UpcA, "ITEM-A".to_string(), now));
        session.scans.push(ScanResult::matched("036000291452".to_string(), BarcodeFormat::UpcA, "ITEM-A".to_string(), now));
        session.scans.push(ScanResult::failed("??".to_string(), BarcodeFormat::Unknown, now));

        assert!(session.is_active);
        assert_eq!(session.successful_scans(), 2);
        assert_eq!(session.unique_items(), 1);
    }
}
