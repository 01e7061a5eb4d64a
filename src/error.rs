//! Costing error types

use thiserror::Error;

use crate::conversion::ConversionError;
use crate::models::{IngredientId, RecipeId};

/// Errors raised while costing ingredients and rolling up recipes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Invalid ingredient '{ingredient_id}': {reason}")]
    InvalidIngredient {
        ingredient_id: IngredientId,
        reason: String,
    },

    #[error("Invalid recipe '{recipe_id}': {reason}")]
    InvalidRecipe { recipe_id: RecipeId, reason: String },

    #[error("Recipe '{recipe_id}' references missing ingredient '{ingredient_id}'")]
    MissingIngredient {
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    },

    #[error("Recipe '{recipe_id}' references missing sub-recipe '{sub_recipe_id}'")]
    MissingSubRecipe {
        recipe_id: RecipeId,
        sub_recipe_id: RecipeId,
    },

    #[error("Cyclic recipe graph: {}", .path.join(" -> "))]
    CyclicRecipeGraph { path: Vec<RecipeId> },

    #[error("Unknown recipe '{0}'")]
    UnknownRecipe(RecipeId),

    #[error("Unknown ingredient '{0}'")]
    UnknownIngredient(IngredientId),
}

impl CostError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CostError::Conversion(ConversionError::DensityRequired { .. }) => "density_required",
            CostError::Conversion(ConversionError::IncompatibleUnits { .. }) => {
                "incompatible_units"
            }
            CostError::Conversion(ConversionError::InvalidQuantity { .. }) => "invalid_quantity",
            CostError::Conversion(ConversionError::InvalidDensity { .. }) => "invalid_density",
            CostError::Conversion(ConversionError::NonFiniteResult { .. }) => {
                "non_finite_result"
            }
            CostError::InvalidIngredient { .. } => "invalid_ingredient",
            CostError::InvalidRecipe { .. } => "invalid_recipe",
            CostError::MissingIngredient { .. } => "missing_ingredient",
            CostError::MissingSubRecipe { .. } => "missing_sub_recipe",
            CostError::CyclicRecipeGraph { .. } => "cyclic_recipe_graph",
            CostError::UnknownRecipe(_) => "unknown_recipe",
            CostError::UnknownIngredient(_) => "unknown_ingredient",
        }
    }

    /// Errors that abort a whole rollup rather than a single line
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CostError::CyclicRecipeGraph { .. } | CostError::UnknownRecipe(_)
        )
    }
}

/// Result type for costing operations
pub type CostResult<T> = Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Unit;

    #[test]
    fn test_conversion_error_is_transparent() {
        let err: CostError = ConversionError::DensityRequired {
            from: Unit::Gram,
            to: Unit::Cup,
        }
        .into();
        assert_eq!(err.to_string(), "Density required to convert g to cup");
        assert_eq!(err.kind(), "density_required");
    }

    #[test]
    fn test_cycle_message() {
        let err = CostError::CyclicRecipeGraph {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic recipe graph: a -> b -> a");
        assert!(err.is_fatal());
    }
}
