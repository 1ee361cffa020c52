//! 庫存品項模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, StockError};

/// 各儲位庫存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStock {
    /// 儲位ID
    pub location_id: String,

    /// 現有數量
    pub quantity: Decimal,

    /// 已保留數量（鎖定）
    pub reserved_quantity: Decimal,

    /// 最後更新時間
    pub last_updated: DateTime<Utc>,
}

impl LocationStock {
    pub fn new(location_id: String, quantity: Decimal, last_updated: DateTime<Utc>) -> Self {
        Self {
            location_id,
            quantity,
            reserved_quantity: Decimal::ZERO,
            last_updated,
        }
    }

    /// 建構器模式：設置保留數量
    pub fn with_reserved_quantity(mut self, reserved: Decimal) -> Self {
        self.reserved_quantity = reserved;
        self
    }

    /// 可用數量（現有 - 保留），不低於 0
    pub fn available(&self) -> Decimal {
        (self.quantity - self.reserved_quantity).max(Decimal::ZERO)
    }
}

/// 庫存品項
///
/// `current_stock` 為最近一次盤點的錨點數量；盤點後的異動由
/// 帳面庫存計算（`theoretical_stock`）推算。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// 品項ID
    pub id: String,

    /// 料號
    pub sku: String,

    /// 條碼
    pub barcode: Option<String>,

    /// 名稱
    pub name: String,

    /// 主要計量單位ID
    pub primary_unit: String,

    /// 次要計量單位ID
    pub secondary_unit: Option<String>,

    /// 主要/次要單位換算係數
    pub conversion_factor: Option<Decimal>,

    /// 成本價
    pub cost_price: Decimal,

    /// 平均成本
    pub average_cost: Option<Decimal>,

    /// 最後進貨成本
    pub last_cost_price: Option<Decimal>,

    /// 現有庫存
    pub current_stock: Decimal,

    /// 最低庫存
    pub minimum_stock: Decimal,

    /// 最高庫存
    pub maximum_stock: Option<Decimal>,

    /// 再訂購點
    pub reorder_point: Decimal,

    /// 再訂購量（手動設定時優先）
    pub reorder_quantity: Option<Decimal>,

    /// 是否易腐
    pub is_perishable: bool,

    /// 保存期限（天）
    pub shelf_life_days: Option<u32>,

    /// 是否追蹤效期
    pub expiration_tracking: bool,

    /// 各儲位庫存
    pub locations: Vec<LocationStock>,
}

impl InventoryItem {
    /// 創建新的庫存品項
    pub fn new(
        id: String,
        sku: String,
        name: String,
        primary_unit: String,
        cost_price: Decimal,
        current_stock: Decimal,
    ) -> Self {
        Self {
            id,
            sku,
            barcode: None,
            name,
            primary_unit,
            secondary_unit: None,
            conversion_factor: None,
            cost_price,
            average_cost: None,
            last_cost_price: None,
            current_stock,
            minimum_stock: Decimal::ZERO,
            maximum_stock: None,
            reorder_point: Decimal::ZERO,
            reorder_quantity: None,
            is_perishable: false,
            shelf_life_days: None,
            expiration_tracking: false,
            locations: Vec::new(),
        }
    }

    /// 建構器模式：設置條碼
    pub fn with_barcode(mut self, barcode: String) -> Self {
        self.barcode = Some(barcode);
        self
    }

    /// 建構器模式：設置次要單位與換算係數
    pub fn with_secondary_unit(mut self, unit: String, conversion_factor: Decimal) -> Self {
        self.secondary_unit = Some(unit);
        self.conversion_factor = Some(conversion_factor);
        self
    }

    /// 建構器模式：設置平均成本
    pub fn with_average_cost(mut self, cost: Decimal) -> Self {
        self.average_cost = Some(cost);
        self
    }

    /// 建構器模式：設置最後進貨成本
    pub fn with_last_cost_price(mut self, cost: Decimal) -> Self {
        self.last_cost_price = Some(cost);
        self
    }

    /// 建構器模式：設置現有庫存
    pub fn with_current_stock(mut self, stock: Decimal) -> Self {
        self.current_stock = stock;
        self
    }

    /// 建構器模式：設置最低庫存
    pub fn with_minimum_stock(mut self, stock: Decimal) -> Self {
        self.minimum_stock = stock;
        self
    }

    /// 建構器模式：設置最高庫存
    pub fn with_maximum_stock(mut self, stock: Decimal) -> Self {
        self.maximum_stock = Some(stock);
        self
    }

    /// 建構器模式：設置再訂購點
    pub fn with_reorder_point(mut self, point: Decimal) -> Self {
        self.reorder_point = point;
        self
    }

    /// 建構器模式：設置再訂購量
    pub fn with_reorder_quantity(mut self, quantity: Decimal) -> Self {
        self.reorder_quantity = Some(quantity);
        self
    }

    /// 建構器模式：設置為易腐品
    pub fn as_perishable(mut self, shelf_life_days: u32) -> Self {
        self.is_perishable = true;
        self.shelf_life_days = Some(shelf_life_days);
        self.expiration_tracking = true;
        self
    }

    /// 建構器模式：添加儲位庫存
    pub fn with_location(mut self, location: LocationStock) -> Self {
        self.locations.push(location);
        self
    }

    /// 手動設定的再訂購量（僅在 > 0 時有效）
    pub fn manual_reorder_quantity(&self) -> Option<Decimal> {
        self.reorder_quantity.filter(|q| *q > Decimal::ZERO)
    }

    /// 各儲位庫存合計
    pub fn total_location_stock(&self) -> Decimal {
        self.locations.iter().map(|l| l.quantity).sum()
    }

    /// 各儲位可用庫存合計
    pub fn available_stock(&self) -> Decimal {
        self.locations.iter().map(LocationStock::available).sum()
    }

    /// 檢查庫存是否低於最低庫存
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock < self.minimum_stock
    }

    /// 驗證價格與庫存欄位皆不為負
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("cost_price", Some(self.cost_price)),
            ("average_cost", self.average_cost),
            ("last_cost_price", self.last_cost_price),
            ("current_stock", Some(self.current_stock)),
            ("minimum_stock", Some(self.minimum_stock)),
            ("maximum_stock", self.maximum_stock),
            ("reorder_point", Some(self.reorder_point)),
            ("reorder_quantity", self.reorder_quantity),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(StockError::NegativeValue {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
