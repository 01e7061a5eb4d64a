//! Allergen aggregation
//!
//! Unions the allergens of every ingredient reachable from a recipe, through
//! nested sub-recipes, plus those declared on the recipes themselves.

use std::collections::{BTreeSet, HashMap};

use crate::error::{CostError, CostResult};
use crate::models::{AllergenField, Ingredient, IngredientId, Recipe, RecipeId};

/// Normalize a stored allergen field into trimmed, non-empty labels
///
/// A JSON-encoded string that does not parse as a list of strings yields no
/// labels rather than an error.
pub fn normalize_allergens(field: Option<&AllergenField>) -> Vec<String> {
    let labels = match field {
        None => return Vec::new(),
        Some(AllergenField::List(labels)) => labels.clone(),
        Some(AllergenField::Encoded(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Option<Vec<String>>>(raw) {
                Ok(parsed) => parsed.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!("Ignoring unparsable allergen list '{}': {}", raw, e);
                    return Vec::new();
                }
            }
        }
    };

    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Sorted, de-duplicated allergens of a recipe and everything it contains
///
/// A missing ingredient or sub-recipe is an error: an allergen list with a
/// silently skipped component would understate what the product contains.
pub fn collect_allergens(
    recipe: &Recipe,
    ingredients: &HashMap<IngredientId, Ingredient>,
    recipes: &HashMap<RecipeId, Recipe>,
) -> CostResult<Vec<String>> {
    let mut walk = AllergenWalk {
        ingredients,
        recipes,
        path: Vec::new(),
        finished: HashMap::new(),
    };
    let set = walk.recipe(recipe)?;
    Ok(set.into_iter().collect())
}

/// Allergens of the recipe stored under `recipe_id`
pub fn collect_allergens_by_id(
    recipe_id: &str,
    ingredients: &HashMap<IngredientId, Ingredient>,
    recipes: &HashMap<RecipeId, Recipe>,
) -> CostResult<Vec<String>> {
    let recipe = recipes
        .get(recipe_id)
        .ok_or_else(|| CostError::UnknownRecipe(recipe_id.to_string()))?;
    collect_allergens(recipe, ingredients, recipes)
}

struct AllergenWalk<'a> {
    ingredients: &'a HashMap<IngredientId, Ingredient>,
    recipes: &'a HashMap<RecipeId, Recipe>,
    path: Vec<RecipeId>,
    finished: HashMap<RecipeId, BTreeSet<String>>,
}

impl<'a> AllergenWalk<'a> {
    fn recipe(&mut self, recipe: &Recipe) -> CostResult<BTreeSet<String>> {
        self.path.push(recipe.id.clone());
        let result = self.union(recipe);
        self.path.pop();
        result
    }

    fn union(&mut self, recipe: &Recipe) -> CostResult<BTreeSet<String>> {
        let mut set: BTreeSet<String> = normalize_allergens(recipe.allergens.as_ref())
            .into_iter()
            .collect();

        for item in recipe.all_items() {
            let ingredient = self.ingredients.get(&item.ingredient_id).ok_or_else(|| {
                CostError::MissingIngredient {
                    recipe_id: recipe.id.clone(),
                    ingredient_id: item.ingredient_id.clone(),
                }
            })?;
            set.extend(normalize_allergens(ingredient.allergens.as_ref()));
        }

        for sub_id in recipe.sub_recipe_ids() {
            if let Some(start) = self.path.iter().position(|id| id == sub_id) {
                let mut cycle = self.path[start..].to_vec();
                cycle.push(sub_id.to_string());
                return Err(CostError::CyclicRecipeGraph { path: cycle });
            }

            if let Some(done) = self.finished.get(sub_id) {
                set.extend(done.iter().cloned());
                continue;
            }

            let recipes = self.recipes;
            let sub = recipes
                .get(sub_id)
                .ok_or_else(|| CostError::MissingSubRecipe {
                    recipe_id: recipe.id.clone(),
                    sub_recipe_id: sub_id.to_string(),
                })?;

            let sub_set = self.recipe(sub)?;
            set.extend(sub_set.iter().cloned());
            self.finished.insert(sub.id.clone(), sub_set);
        }

        Ok(set)
    }
}
