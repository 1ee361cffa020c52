//! 預測參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, StockError};

/// 庫存預測與補貨參數
///
/// 經濟訂購量（EOQ）的訂購成本與持有成本率為必要配置，不寫死在公式中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 提前期（天）
    pub lead_time_days: u32,

    /// 安全庫存天數
    pub safety_stock_days: u32,

    /// 每次訂購成本
    pub ordering_cost: Decimal,

    /// 年持有成本率（佔成本價比例）
    pub holding_cost_rate: Decimal,

    /// 服務水準（0-1）
    pub service_level: Decimal,

    /// 平均用量的觀察期（天）
    pub usage_window_days: u32,

    /// 年庫存持有成本率（庫存價值比例）
    pub carrying_cost_rate: Decimal,

    /// 效期提醒天數
    pub expiry_warning_days: u32,
}

impl ForecastConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            lead_time_days: 7,
            safety_stock_days: 3,
            ordering_cost: Decimal::from(50),
            holding_cost_rate: Decimal::new(20, 2),
            service_level: Decimal::new(95, 2),
            usage_window_days: 30,
            carrying_cost_rate: Decimal::new(25, 2),
            expiry_warning_days: 3,
        }
    }

    /// 從 JSON 載入配置（未提供的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| StockError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置提前期
    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    /// 建構器模式：設置安全庫存天數
    pub fn with_safety_stock_days(mut self, days: u32) -> Self {
        self.safety_stock_days = days;
        self
    }

    /// 建構器模式：設置訂購成本
    pub fn with_ordering_cost(mut self, cost: Decimal) -> Self {
        self.ordering_cost = cost;
        self
    }

    /// 建構器模式：設置持有成本率
    pub fn with_holding_cost_rate(mut self, rate: Decimal) -> Self {
        self.holding_cost_rate = rate;
        self
    }

    /// 建構器模式：設置服務水準
    pub fn with_service_level(mut self, level: Decimal) -> Self {
        self.service_level = level;
        self
    }

    /// 建構器模式：設置用量觀察期
    pub fn with_usage_window_days(mut self, days: u32) -> Self {
        self.usage_window_days = days;
        self
    }

    /// 建構器模式：設置庫存持有成本率
    pub fn with_carrying_cost_rate(mut self, rate: Decimal) -> Self {
        self.carrying_cost_rate = rate;
        self
    }

    /// 建構器模式：設置效期提醒天數
    pub fn with_expiry_warning_days(mut self, days: u32) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// 檢查配置是否合理
    pub fn validate(&self) -> Result<()> {
        if self.ordering_cost < Decimal::ZERO {
            return Err(StockError::InvalidConfig(format!(
                "訂購成本不可為負數: {}",
                self.ordering_cost
            )));
        }

        if self.holding_cost_rate < Decimal::ZERO || self.carrying_cost_rate < Decimal::ZERO {
            return Err(StockError::InvalidConfig("成本率不可為負數".to_string()));
        }

        if self.service_level <= Decimal::ZERO || self.service_level >= Decimal::ONE {
            return Err(StockError::InvalidConfig(format!(
                "服務水準必須介於 0 與 1 之間: {}",
                self.service_level
            )));
        }

        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 庫存計價方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    /// 現行成本
    CurrentCost,
    /// 平均成本
    AverageCost,
    /// 先進先出（以最後進貨成本近似）
    Fifo,
    /// 後進先出（以平均成本近似）
    Lifo,
}
