//! 計量單位模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 計量單位類型（僅同類型之間可換算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// 重量
    Weight,
    /// 容量
    Volume,
    /// 個數
    Count,
    /// 長度
    Length,
    /// 面積
    Area,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitType::Weight => "weight",
            UnitType::Volume => "volume",
            UnitType::Count => "count",
            UnitType::Length => "length",
            UnitType::Area => "area",
        };
        f.write_str(name)
    }
}

/// 計量單位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeasurement {
    /// 單位ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 縮寫
    pub abbreviation: String,

    /// 單位類型
    pub unit_type: UnitType,

    /// 相對於同類型基準單位的換算係數
    pub conversion_factor: Decimal,
}

impl UnitOfMeasurement {
    /// 創建新的計量單位
    pub fn new(id: String, name: String, unit_type: UnitType, conversion_factor: Decimal) -> Self {
        let abbreviation = id.clone();
        Self {
            id,
            name,
            abbreviation,
            unit_type,
            conversion_factor,
        }
    }

    /// 建構器模式：設置縮寫
    pub fn with_abbreviation(mut self, abbreviation: String) -> Self {
        self.abbreviation = abbreviation;
        self
    }

    /// 是否可與另一單位互相換算
    pub fn is_compatible_with(&self, other: &UnitOfMeasurement) -> bool {
        self.unit_type == other.unit_type
    }

    /// 是否為基準單位
    pub fn is_base_unit(&self) -> bool {
        self.conversion_factor == Decimal::ONE
    }
}
