//! Ingredient cost function
//!
//! Prices a quantity of an ingredient from its pack size and pack price.

use crate::conversion::{convert, resolve_density, Unit};
use crate::error::{CostError, CostResult};
use crate::models::Ingredient;

/// Cost of `quantity` `unit` of an ingredient
///
/// The quantity is converted into the pack unit (using the ingredient's
/// resolved density when mass and volume meet) and priced at
/// `pack_price / pack_quantity` per pack unit.
pub fn cost_of(quantity: f64, unit: Unit, ingredient: &Ingredient) -> CostResult<f64> {
    if let Some(reason) = ingredient.validation_error() {
        return Err(CostError::InvalidIngredient {
            ingredient_id: ingredient.id.clone(),
            reason,
        });
    }

    let converted = convert(
        quantity,
        unit,
        ingredient.pack_unit,
        resolve_density(ingredient),
    )?;

    let cost = converted * (ingredient.pack_price / ingredient.pack_quantity);
    if !cost.is_finite() {
        return Err(CostError::InvalidIngredient {
            ingredient_id: ingredient.id.clone(),
            reason: format!(
                "cost of {} {} is not a finite number (pack {} {} at {})",
                quantity, unit, ingredient.pack_quantity, ingredient.pack_unit, ingredient.pack_price
            ),
        });
    }
    Ok(cost)
}
