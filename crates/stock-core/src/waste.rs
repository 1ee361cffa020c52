//! 報廢紀錄模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 報廢紀錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteLog {
    /// 紀錄ID
    pub id: Uuid,

    /// 品項ID
    pub item_id: String,

    /// 報廢數量
    pub quantity: Decimal,

    /// 單位成本
    pub unit_cost: Decimal,

    /// 總成本（數量 × 單位成本）
    pub total_cost: Decimal,

    /// 報廢原因ID
    pub reason_id: String,

    /// 報廢日期
    pub waste_date: DateTime<Utc>,

    /// 登錄人員
    pub recorded_by: String,

    /// 核准人員
    pub approved_by: Option<String>,

    /// 核准時間
    pub approved_at: Option<DateTime<Utc>>,
}

impl WasteLog {
    /// 創建新的報廢紀錄，總成本由數量與單位成本計算
    pub fn new(
        item_id: String,
        quantity: Decimal,
        unit_cost: Decimal,
        reason_id: String,
        waste_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            quantity,
            unit_cost,
            total_cost: quantity * unit_cost,
            reason_id,
            waste_date,
            recorded_by: String::new(),
            approved_by: None,
            approved_at: None,
        }
    }

    /// 建構器模式：設置登錄人員
    pub fn with_recorded_by(mut self, user_id: String) -> Self {
        self.recorded_by = user_id;
        self
    }

    /// 核准報廢
    pub fn approve(&mut self, approver: String, at: DateTime<Utc>) {
        self.approved_by = Some(approver);
        self.approved_at = Some(at);
    }

    /// 是否已核准
    pub fn is_approved(&self) -> bool {
        self.approved_by.is_some()
    }

    /// 檢查總成本是否等於數量 × 單位成本
    pub fn is_consistent(&self) -> bool {
        self.total_cost == self.quantity * self.unit_cost
    }
}
