//! 庫存異動模型

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 異動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// 進貨
    Purchase,
    /// 銷售
    Sale,
    /// 調整
    Adjustment,
    /// 調撥（移出）
    Transfer,
    /// 報廢
    Waste,
    /// 退貨
    Return,
    /// 生產入庫
    Production,
    /// 耗用
    Consumption,
    /// 盤點
    Count,
}

/// 異動對帳面庫存的影響方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    Increase,
    Decrease,
    /// 盤點：重新定錨 `current_stock`，不參與累加
    Neutral,
}

impl MovementType {
    /// 異動對帳面庫存的影響方向
    pub fn stock_effect(self) -> StockEffect {
        match self {
            MovementType::Purchase
            | MovementType::Adjustment
            | MovementType::Return
            | MovementType::Production => StockEffect::Increase,
            MovementType::Sale
            | MovementType::Consumption
            | MovementType::Waste
            | MovementType::Transfer => StockEffect::Decrease,
            MovementType::Count => StockEffect::Neutral,
        }
    }

    /// 是否為用量（銷售或耗用）
    pub fn is_usage(self) -> bool {
        matches!(self, MovementType::Sale | MovementType::Consumption)
    }
}

/// 異動來源單據
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReference {
    /// 單據ID
    pub id: String,
    /// 單據類型（如 purchase_order、pos_sale）
    pub reference_type: String,
}

/// 庫存異動（只增不改的帳本紀錄）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    /// 異動ID
    pub id: Uuid,

    /// 品項ID
    pub item_id: String,

    /// 儲位ID
    pub location_id: String,

    /// 異動類型
    pub movement_type: MovementType,

    /// 異動數量（含正負號）
    pub quantity: Decimal,

    /// 單位成本
    pub unit_cost: Option<Decimal>,

    /// 總成本
    pub total_cost: Option<Decimal>,

    /// 來源單據
    pub reference: Option<MovementReference>,

    /// 批號
    pub batch_number: Option<String>,

    /// 有效日期
    pub expiration_date: Option<NaiveDate>,

    /// 操作人員
    pub user_id: String,

    /// 是否已核准
    pub is_approved: bool,

    /// 建立時間
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// 創建新的庫存異動
    pub fn new(
        item_id: String,
        location_id: String,
        movement_type: MovementType,
        quantity: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            location_id,
            movement_type,
            quantity,
            unit_cost: None,
            total_cost: None,
            reference: None,
            batch_number: None,
            expiration_date: None,
            user_id: String::new(),
            is_approved: true,
            created_at,
        }
    }

    /// 建構器模式：設置單位成本（同時計算總成本）
    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self.total_cost = Some(self.quantity.abs() * unit_cost);
        self
    }

    /// 建構器模式：設置來源單據
    pub fn with_reference(mut self, id: String, reference_type: String) -> Self {
        self.reference = Some(MovementReference { id, reference_type });
        self
    }

    /// 建構器模式：設置批號與有效日期
    pub fn with_batch(mut self, batch_number: String, expiration_date: Option<NaiveDate>) -> Self {
        self.batch_number = Some(batch_number);
        self.expiration_date = expiration_date;
        self
    }

    /// 建構器模式：設置操作人員
    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = user_id;
        self
    }

    /// 建構器模式：設置為待核准
    pub fn pending_approval(mut self) -> Self {
        self.is_approved = false;
        self
    }

    /// 對帳面庫存的帶號影響量
    ///
    /// 減少類異動不論儲存的正負號，一律以絕對值扣除。
    pub fn signed_effect(&self) -> Decimal {
        match self.movement_type.stock_effect() {
            StockEffect::Increase => self.quantity,
            StockEffect::Decrease => -self.quantity.abs(),
            StockEffect::Neutral => Decimal::ZERO,
        }
    }

    /// 是否為用量異動
    pub fn is_usage(&self) -> bool {
        self.movement_type.is_usage()
    }
}
