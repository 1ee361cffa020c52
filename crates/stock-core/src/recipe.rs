//! 食譜模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 食譜材料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// 庫存品項ID
    pub item_id: String,

    /// 用量
    pub quantity: Decimal,

    /// 用量單位ID
    pub unit: String,

    /// 已儲存的成本（找不到庫存品項時使用）
    pub cost: Decimal,
}

impl RecipeIngredient {
    pub fn new(item_id: String, quantity: Decimal, unit: String) -> Self {
        Self {
            item_id,
            quantity,
            unit,
            cost: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置已儲存的成本
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = cost;
        self
    }
}

/// 食譜
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// 食譜ID
    pub id: String,

    /// 菜單品項ID
    pub menu_item_id: String,

    /// 名稱
    pub name: String,

    /// 材料
    pub ingredients: Vec<RecipeIngredient>,

    /// 份數
    pub servings: Decimal,

    /// 總成本
    pub total_cost: Decimal,

    /// 每份成本
    pub cost_per_serving: Decimal,
}

impl Recipe {
    /// 創建新的食譜
    pub fn new(id: String, menu_item_id: String, name: String, servings: Decimal) -> Self {
        Self {
            id,
            menu_item_id,
            name,
            ingredients: Vec::new(),
            servings,
            total_cost: Decimal::ZERO,
            cost_per_serving: Decimal::ZERO,
        }
    }

    /// 建構器模式：添加材料
    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// 更新成本欄位（由食譜成本計算結果回寫）
    pub fn apply_costs(&mut self, total_cost: Decimal, cost_per_serving: Decimal) {
        self.total_cost = total_cost;
        self.cost_per_serving = cost_per_serving;
    }
}
