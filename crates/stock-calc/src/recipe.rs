//! 食譜成本計算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{InventoryItem, Recipe, UnitOfMeasurement};

use crate::units::{ConversionOutcome, UnitConverter};
use crate::{safe_div, CalcWarning};

/// 食材成本來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientCostSource {
    /// 依庫存品項成本價計算
    Inventory,
    /// 找到品項但單位換算失敗，以未換算數量計算
    Unconverted,
    /// 找不到品項，沿用食譜上儲存的成本
    StoredCost,
}

/// 單一食材成本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    pub item_id: String,
    /// 換算為品項主要單位後的數量
    pub quantity: Decimal,
    pub cost: Decimal,
    pub source: IngredientCostSource,
}

/// 食譜成本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCost {
    pub total_cost: Decimal,
    pub cost_per_serving: Decimal,
    pub ingredient_costs: Vec<IngredientCost>,
    pub warnings: Vec<CalcWarning>,
}

impl RecipeCost {
    /// 是否有任何食材成本為降級結果
    pub fn is_degraded(&self) -> bool {
        self.ingredient_costs
            .iter()
            .any(|c| c.source != IngredientCostSource::Inventory)
    }
}

/// 食譜成本計算器
pub struct RecipeCostCalculator;

impl RecipeCostCalculator {
    /// 計算食譜總成本與每份成本
    pub fn calculate(
        recipe: &Recipe,
        items: &[InventoryItem],
        units: &[UnitOfMeasurement],
    ) -> RecipeCost {
        let mut ingredient_costs = Vec::with_capacity(recipe.ingredients.len());
        let mut warnings = Vec::new();

        for ingredient in &recipe.ingredients {
            let Some(item) = items.iter().find(|i| i.id == ingredient.item_id) else {
                tracing::warn!(
                    "食譜 {} 的食材 {} 不在庫存中，沿用儲存成本 {}",
                    recipe.id,
                    ingredient.item_id,
                    ingredient.cost
                );
                warnings.push(CalcWarning::warning(
                    ingredient.item_id.clone(),
                    format!("食材不在庫存中，沿用食譜儲存成本 {}", ingredient.cost),
                ));
                ingredient_costs.push(IngredientCost {
                    item_id: ingredient.item_id.clone(),
                    quantity: ingredient.quantity,
                    cost: ingredient.cost,
                    source: IngredientCostSource::StoredCost,
                });
                continue;
            };

            let outcome = UnitConverter::convert_quantity(
                ingredient.quantity,
                &ingredient.unit,
                &item.primary_unit,
                units,
            );

            let source = match &outcome {
                ConversionOutcome::Converted(_) => IngredientCostSource::Inventory,
                ConversionOutcome::Unconverted { reason, .. } => {
                    warnings.push(CalcWarning::warning(
                        item.id.clone(),
                        format!("單位換算失敗，以未換算數量計價: {}", reason),
                    ));
                    IngredientCostSource::Unconverted
                }
            };

            let quantity = outcome.quantity();
            ingredient_costs.push(IngredientCost {
                item_id: item.id.clone(),
                quantity,
                cost: quantity * item.cost_price,
                source,
            });
        }

        let total_cost: Decimal = ingredient_costs.iter().map(|c| c.cost).sum();
        let cost_per_serving = if recipe.servings > Decimal::ZERO {
            total_cost / recipe.servings
        } else {
            total_cost
        };

        RecipeCost {
            total_cost,
            cost_per_serving,
            ingredient_costs,
            warnings,
        }
    }

    /// 計算並寫回食譜的總成本與每份成本
    pub fn apply(recipe: &mut Recipe, items: &[InventoryItem], units: &[UnitOfMeasurement]) -> RecipeCost {
        let cost = Self::calculate(recipe, items, units);
        recipe.apply_costs(cost.total_cost, cost.cost_per_serving);
        cost
    }

    /// 食材成本率（%），售價不為正時回傳 0
    pub fn food_cost_percentage(cost_per_serving: Decimal, menu_price: Decimal) -> Decimal {
        if menu_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        safe_div(cost_per_serving, menu_price) * Decimal::ONE_HUNDRED
    }
}
