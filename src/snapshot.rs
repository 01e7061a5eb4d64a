//! Costing snapshot
//!
//! The ingredient and recipe records one computation works against, loaded
//! from a JSON file and keyed by id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::allergens::collect_allergens_by_id;
use crate::costing::{rollup_cost_by_id, CostBreakdown, RollupMode};
use crate::error::CostResult;
use crate::graph;
use crate::models::{Ingredient, IngredientId, Recipe, RecipeId};

/// Errors raised while building or loading a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate ingredient id '{0}'")]
    DuplicateIngredient(IngredientId),

    #[error("Duplicate recipe id '{0}'")]
    DuplicateRecipe(RecipeId),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Environment variable overriding the snapshot location
pub const SNAPSHOT_PATH_ENV: &str = "BAKECOST_SNAPSHOT_PATH";

/// Get the snapshot path from environment or use `data/snapshot.json` at the
/// project root
pub fn get_snapshot_path() -> PathBuf {
    std::env::var(SNAPSHOT_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("snapshot.json");
            path
        })
}

/// On-disk layout: plain record lists
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

/// Id-keyed ingredient and recipe records
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    ingredients: HashMap<IngredientId, Ingredient>,
    recipes: HashMap<RecipeId, Recipe>,
}

impl Snapshot {
    /// Build a snapshot from records, rejecting duplicate ids
    pub fn new(ingredients: Vec<Ingredient>, recipes: Vec<Recipe>) -> SnapshotResult<Self> {
        let mut ingredient_map = HashMap::with_capacity(ingredients.len());
        for ingredient in ingredients {
            if ingredient_map.contains_key(&ingredient.id) {
                return Err(SnapshotError::DuplicateIngredient(ingredient.id));
            }
            ingredient_map.insert(ingredient.id.clone(), ingredient);
        }

        let mut recipe_map = HashMap::with_capacity(recipes.len());
        for recipe in recipes {
            if recipe_map.contains_key(&recipe.id) {
                return Err(SnapshotError::DuplicateRecipe(recipe.id));
            }
            recipe_map.insert(recipe.id.clone(), recipe);
        }

        Ok(Self {
            ingredients: ingredient_map,
            recipes: recipe_map,
        })
    }

    /// Parse a snapshot document
    pub fn from_json_str(json: &str) -> SnapshotResult<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Self::new(file.ingredients, file.recipes)
    }

    /// Load a snapshot file from disk
    pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded snapshot from {:?}: {} ingredients, {} recipes",
            path,
            snapshot.ingredient_count(),
            snapshot.recipe_count()
        );
        Ok(snapshot)
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn ingredients(&self) -> &HashMap<IngredientId, Ingredient> {
        &self.ingredients
    }

    pub fn recipes(&self) -> &HashMap<RecipeId, Recipe> {
        &self.recipes
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Cost rollup of a stored recipe
    pub fn rollup_cost(&self, recipe_id: &str, mode: RollupMode) -> CostResult<CostBreakdown> {
        rollup_cost_by_id(recipe_id, &self.ingredients, &self.recipes, mode)
    }

    /// Allergens of a stored recipe
    pub fn collect_allergens(&self, recipe_id: &str) -> CostResult<Vec<String>> {
        collect_allergens_by_id(recipe_id, &self.ingredients, &self.recipes)
    }

    pub fn would_create_cycle(&self, recipe_id: &str, sub_recipe_id: &str) -> bool {
        graph::would_create_cycle(&self.recipes, recipe_id, sub_recipe_id)
    }

    pub fn affected_recipes(&self, ingredient_id: &str) -> Vec<RecipeId> {
        graph::affected_recipes(ingredient_id, &self.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Unit;
    use std::io::Write;

    const SHORTBREAD: &str = r#"{
        "ingredients": [
            { "id": "butter", "name": "Butter", "packQuantity": 500, "packUnit": "g",
              "packPrice": 2.5, "densityGPerMl": 0.911, "allergens": ["milk"] },
            { "id": "flour", "name": "Plain flour", "packQuantity": 1.5, "packUnit": "kg",
              "packPrice": 1.2, "allergens": "[\"gluten\"]" },
            { "id": "sugar", "name": "Caster sugar", "packQuantity": 1, "packUnit": "kg",
              "packPrice": 1.0 }
        ],
        "recipes": [
            { "id": "shortbread", "name": "Shortbread", "yieldQuantity": 12, "yieldUnit": "each",
              "items": [
                { "ingredientId": "butter", "quantity": 250, "unit": "g" },
                { "ingredientId": "flour", "quantity": 375, "unit": "g" },
                { "ingredientId": "sugar", "quantity": 125, "unit": "g" }
              ] }
        ]
    }"#;

    #[test]
    fn test_from_json_str() {
        let snapshot = Snapshot::from_json_str(SHORTBREAD).unwrap();
        assert_eq!(snapshot.ingredient_count(), 3);
        assert_eq!(snapshot.recipe_count(), 1);
        assert_eq!(snapshot.ingredient("butter").unwrap().density_g_per_ml, Some(0.911));
        assert!(snapshot.recipe("missing").is_none());
    }

    #[test]
    fn test_rollup_and_allergens() {
        let snapshot = Snapshot::from_json_str(SHORTBREAD).unwrap();

        let breakdown = snapshot.rollup_cost("shortbread", RollupMode::Strict).unwrap();
        // 1.25 butter + 0.30 flour + 0.125 sugar
        assert!((breakdown.total_cost - 1.675).abs() < 1e-9);
        assert!((breakdown.cost_per_output_unit - 1.675 / 12.0).abs() < 1e-9);

        assert_eq!(
            snapshot.collect_allergens("shortbread").unwrap(),
            vec!["gluten", "milk"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Snapshot::new(
            vec![
                Ingredient::new("a", "A", 1.0, Unit::Gram, 1.0),
                Ingredient::new("a", "A again", 1.0, Unit::Gram, 1.0),
            ],
            Vec::new(),
        );
        assert!(matches!(result, Err(SnapshotError::DuplicateIngredient(id)) if id == "a"));

        let result = Snapshot::new(
            Vec::new(),
            vec![
                Recipe::new("r", "R", 1.0, Unit::Each),
                Recipe::new("r", "R again", 1.0, Unit::Each),
            ],
        );
        assert!(matches!(result, Err(SnapshotError::DuplicateRecipe(id)) if id == "r"));
    }

    #[test]
    fn test_bad_json_and_unknown_unit() {
        assert!(matches!(
            Snapshot::from_json_str("{ not json"),
            Err(SnapshotError::Json(_))
        ));

        let bad_unit = r#"{ "ingredients": [
            { "id": "x", "name": "X", "packQuantity": 1, "packUnit": "bushel", "packPrice": 1 }
        ] }"#;
        let err = Snapshot::from_json_str(bad_unit).unwrap_err();
        assert!(err.to_string().contains("bushel"));
    }

    #[test]
    fn test_empty_document() {
        let snapshot = Snapshot::from_json_str("{}").unwrap();
        assert_eq!(snapshot.ingredient_count(), 0);
        assert_eq!(snapshot.recipe_count(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHORTBREAD.as_bytes()).unwrap();

        let snapshot = Snapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.recipe_count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Snapshot::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }

    #[test]
    fn test_graph_wrappers() {
        let snapshot = Snapshot::from_json_str(SHORTBREAD).unwrap();
        assert!(snapshot.would_create_cycle("shortbread", "shortbread"));
        assert_eq!(snapshot.affected_recipes("butter"), vec!["shortbread"]);
    }
}
