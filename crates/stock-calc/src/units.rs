//! 計量單位換算

use rust_decimal::Decimal;
use stock_core::{Result, StockError, UnitOfMeasurement};

/// 換算結果
///
/// 換算失敗時保留原數量並附上原因，由呼叫端決定是否採信。
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Converted(Decimal),
    Unconverted { quantity: Decimal, reason: StockError },
}

impl ConversionOutcome {
    /// 取得數量（失敗時為未換算的原數量）
    pub fn quantity(&self) -> Decimal {
        match self {
            ConversionOutcome::Converted(quantity) => *quantity,
            ConversionOutcome::Unconverted { quantity, .. } => *quantity,
        }
    }

    /// 是否為降級結果
    pub fn is_degraded(&self) -> bool {
        matches!(self, ConversionOutcome::Unconverted { .. })
    }
}

/// 單位換算器
pub struct UnitConverter;

impl UnitConverter {
    /// 換算數量；失敗時回傳原數量並記錄警告
    pub fn convert_quantity(
        quantity: Decimal,
        from_unit: &str,
        to_unit: &str,
        units: &[UnitOfMeasurement],
    ) -> ConversionOutcome {
        match Self::try_convert_quantity(quantity, from_unit, to_unit, units) {
            Ok(converted) => ConversionOutcome::Converted(converted),
            Err(reason) => {
                tracing::warn!(
                    "單位換算失敗，沿用原數量 {} ({} → {}): {}",
                    quantity,
                    from_unit,
                    to_unit,
                    reason
                );
                ConversionOutcome::Unconverted { quantity, reason }
            }
        }
    }

    /// 換算數量（嚴格版本）
    pub fn try_convert_quantity(
        quantity: Decimal,
        from_unit: &str,
        to_unit: &str,
        units: &[UnitOfMeasurement],
    ) -> Result<Decimal> {
        if from_unit == to_unit {
            return Ok(quantity);
        }

        let from = Self::find_unit(from_unit, units)?;
        let to = Self::find_unit(to_unit, units)?;

        if !from.is_compatible_with(to) {
            return Err(StockError::IncompatibleUnits {
                from: from.id.clone(),
                from_type: from.unit_type,
                to: to.id.clone(),
                to_type: to.unit_type,
            });
        }

        if to.conversion_factor.is_zero() {
            return Err(StockError::InvalidConversionFactor(to.id.clone()));
        }

        let base_quantity = quantity * from.conversion_factor;
        Ok(base_quantity / to.conversion_factor)
    }

    fn find_unit<'a>(id: &str, units: &'a [UnitOfMeasurement]) -> Result<&'a UnitOfMeasurement> {
        units
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| StockError::UnitNotFound(id.to_string()))
    }
}
