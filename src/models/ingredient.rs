//! Ingredient model
//!
//! An ingredient as purchased: pack size, pack price, optional density and
//! declared allergens.

use serde::{Deserialize, Serialize};

use super::AllergenField;
use crate::conversion::Unit;

/// Ingredient identifier
pub type IngredientId = String;

/// An ingredient snapshot used for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    /// Size of one purchasable pack, in `pack_unit`
    pub pack_quantity: f64,
    pub pack_unit: Unit,
    /// Price of one pack (currency-agnostic)
    pub pack_price: f64,
    /// Grams per milliliter, overriding the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_g_per_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<AllergenField>,
}

impl Ingredient {
    /// Create an ingredient with no density override and no allergens
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pack_quantity: f64,
        pack_unit: Unit,
        pack_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pack_quantity,
            pack_unit,
            pack_price,
            density_g_per_ml: None,
            allergens: None,
        }
    }

    pub fn with_density(mut self, density_g_per_ml: f64) -> Self {
        self.density_g_per_ml = Some(density_g_per_ml);
        self
    }

    pub fn with_allergens(mut self, allergens: AllergenField) -> Self {
        self.allergens = Some(allergens);
        self
    }

    /// Reason this record cannot be costed, if any
    pub fn validation_error(&self) -> Option<String> {
        if !self.pack_quantity.is_finite() || self.pack_quantity <= 0.0 {
            return Some(format!(
                "pack quantity must be greater than 0 (got {})",
                self.pack_quantity
            ));
        }
        if !self.pack_price.is_finite() || self.pack_price < 0.0 {
            return Some(format!(
                "pack price must be a non-negative number (got {})",
                self.pack_price
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "butter",
            "name": "Butter",
            "packQuantity": 500,
            "packUnit": "g",
            "packPrice": 2.5,
            "densityGPerMl": 0.911,
            "allergens": ["milk"]
        }"#;
        let ingredient: Ingredient = serde_json::from_str(json).unwrap();
        assert_eq!(ingredient.pack_unit, Unit::Gram);
        assert_eq!(ingredient.density_g_per_ml, Some(0.911));
        assert_eq!(
            ingredient.allergens,
            Some(AllergenField::List(vec!["milk".to_string()]))
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": "f", "name": "Flour", "packQuantity": 16, "packUnit": "kg", "packPrice": 12}"#;
        let ingredient: Ingredient = serde_json::from_str(json).unwrap();
        assert_eq!(ingredient.density_g_per_ml, None);
        assert_eq!(ingredient.allergens, None);
    }

    #[test]
    fn test_validation_error() {
        let ok = Ingredient::new("a", "A", 1.0, Unit::Gram, 1.0);
        assert!(ok.validation_error().is_none());

        let zero_pack = Ingredient::new("a", "A", 0.0, Unit::Gram, 1.0);
        assert!(zero_pack.validation_error().is_some());

        let negative_price = Ingredient::new("a", "A", 1.0, Unit::Gram, -1.0);
        assert!(negative_price.validation_error().is_some());
    }
}
