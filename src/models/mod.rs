//! Data models
//!
//! Plain records for ingredients and recipes as supplied by the caller.

mod allergen_field;
mod ingredient;
mod recipe;

pub use allergen_field::AllergenField;
pub use ingredient::{Ingredient, IngredientId};
pub use recipe::{Recipe, RecipeId, RecipeItem, RecipeSection, RecipeSubRecipe};
