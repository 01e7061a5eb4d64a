//! Recipe model
//!
//! A recipe yields a quantity of output from ingredient lines and from other
//! recipes used as sub-recipes.

use serde::{Deserialize, Serialize};

use super::{AllergenField, IngredientId};
use crate::conversion::Unit;

/// Recipe identifier
pub type RecipeId = String;

/// One ingredient's usage within a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeItem {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
    pub unit: Unit,
}

/// A named group of lines ("Dough", "Filling")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSection {
    pub name: String,
    #[serde(default)]
    pub items: Vec<RecipeItem>,
}

/// Another recipe's output consumed by this recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSubRecipe {
    pub sub_recipe_id: RecipeId,
    pub quantity: f64,
    pub unit: Unit,
}

/// A recipe snapshot used for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub yield_quantity: f64,
    pub yield_unit: Unit,
    /// Lines outside any section
    #[serde(default)]
    pub items: Vec<RecipeItem>,
    #[serde(default)]
    pub sections: Vec<RecipeSection>,
    #[serde(default)]
    pub sub_recipes: Vec<RecipeSubRecipe>,
    /// Allergens declared on the recipe itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<AllergenField>,
    /// Density of the output, used when a parent measures it across mass/volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_g_per_ml: Option<f64>,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        yield_quantity: f64,
        yield_unit: Unit,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            yield_quantity,
            yield_unit,
            items: Vec::new(),
            sections: Vec::new(),
            sub_recipes: Vec::new(),
            allergens: None,
            density_g_per_ml: None,
        }
    }

    pub fn with_item(mut self, ingredient_id: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        self.items.push(RecipeItem {
            ingredient_id: ingredient_id.into(),
            quantity,
            unit,
        });
        self
    }

    pub fn with_section(mut self, name: impl Into<String>, items: Vec<RecipeItem>) -> Self {
        self.sections.push(RecipeSection {
            name: name.into(),
            items,
        });
        self
    }

    pub fn with_sub_recipe(
        mut self,
        sub_recipe_id: impl Into<String>,
        quantity: f64,
        unit: Unit,
    ) -> Self {
        self.sub_recipes.push(RecipeSubRecipe {
            sub_recipe_id: sub_recipe_id.into(),
            quantity,
            unit,
        });
        self
    }

    pub fn with_allergens(mut self, allergens: AllergenField) -> Self {
        self.allergens = Some(allergens);
        self
    }

    pub fn with_density(mut self, density_g_per_ml: f64) -> Self {
        self.density_g_per_ml = Some(density_g_per_ml);
        self
    }

    /// Every ingredient line: direct items first, then each section in order
    pub fn all_items(&self) -> impl Iterator<Item = &RecipeItem> + '_ {
        self.items
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.items.iter()))
    }

    /// Whether the recipe lists the ingredient directly (sub-recipes not searched)
    pub fn uses_ingredient(&self, ingredient_id: &str) -> bool {
        self.all_items().any(|item| item.ingredient_id == ingredient_id)
    }

    /// Ids of the recipes this one consumes directly
    pub fn sub_recipe_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.sub_recipes.iter().map(|s| s.sub_recipe_id.as_str())
    }
}
