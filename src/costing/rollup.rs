//! Recipe cost rollup
//!
//! Sums a recipe's ingredient lines and the cost of the sub-recipe output it
//! consumes, recursing through nested sub-recipes. The current traversal path
//! is threaded through the recursion so a recipe that re-enters itself fails
//! with `CyclicRecipeGraph` instead of recursing forever.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ingredient::cost_of;
use crate::conversion::{convert, Unit};
use crate::error::{CostError, CostResult};
use crate::models::{Ingredient, IngredientId, Recipe, RecipeId, RecipeItem, RecipeSubRecipe};

/// How line-level failures are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupMode {
    /// Record failed lines as warnings and total the rest
    #[default]
    Lenient,
    /// Fail on the first line that cannot be costed
    Strict,
}

/// Kind of recipe line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Ingredient,
    SubRecipe,
}

/// Cost contributed by one line
#[derive(Debug, Clone, PartialEq)]
pub struct LineCost {
    pub kind: LineKind,
    /// Ingredient or sub-recipe id
    pub reference_id: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cost: f64,
}

/// A line that could not be costed
#[derive(Debug, Clone, PartialEq)]
pub struct LineWarning {
    /// Recipe the failing line belongs to (may be a nested sub-recipe)
    pub recipe_id: RecipeId,
    pub kind: LineKind,
    pub reference_id: String,
    pub error: CostError,
}

/// Result of a recipe cost rollup
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub recipe_id: RecipeId,
    pub total_cost: f64,
    pub cost_per_output_unit: f64,
    pub yield_quantity: f64,
    pub yield_unit: Unit,
    pub lines: Vec<LineCost>,
    pub warnings: Vec<LineWarning>,
}

impl CostBreakdown {
    /// True when every line, including nested ones, was costed
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Roll up a recipe's cost, recording failed lines as warnings
pub fn rollup_cost(
    recipe: &Recipe,
    ingredients: &HashMap<IngredientId, Ingredient>,
    recipes: &HashMap<RecipeId, Recipe>,
) -> CostResult<CostBreakdown> {
    rollup_cost_with_mode(recipe, ingredients, recipes, RollupMode::Lenient)
}

/// Roll up a recipe's cost with explicit handling of failed lines
pub fn rollup_cost_with_mode(
    recipe: &Recipe,
    ingredients: &HashMap<IngredientId, Ingredient>,
    recipes: &HashMap<RecipeId, Recipe>,
    mode: RollupMode,
) -> CostResult<CostBreakdown> {
    Rollup::new(ingredients, recipes, mode).recipe(recipe)
}

/// Roll up the recipe stored under `recipe_id`
pub fn rollup_cost_by_id(
    recipe_id: &str,
    ingredients: &HashMap<IngredientId, Ingredient>,
    recipes: &HashMap<RecipeId, Recipe>,
    mode: RollupMode,
) -> CostResult<CostBreakdown> {
    let recipe = recipes
        .get(recipe_id)
        .ok_or_else(|| CostError::UnknownRecipe(recipe_id.to_string()))?;
    rollup_cost_with_mode(recipe, ingredients, recipes, mode)
}

/// Traversal state for one top-level rollup
struct Rollup<'a> {
    ingredients: &'a HashMap<IngredientId, Ingredient>,
    recipes: &'a HashMap<RecipeId, Recipe>,
    mode: RollupMode,
    /// Recipes currently being rolled up, outermost first
    path: Vec<RecipeId>,
    /// Finished sub-recipes, so shared ones are costed once
    finished: HashMap<RecipeId, CostBreakdown>,
    /// Sub-recipes whose nested warnings were already handed to a parent
    reported: HashSet<RecipeId>,
}

impl<'a> Rollup<'a> {
    fn new(
        ingredients: &'a HashMap<IngredientId, Ingredient>,
        recipes: &'a HashMap<RecipeId, Recipe>,
        mode: RollupMode,
    ) -> Self {
        Self {
            ingredients,
            recipes,
            mode,
            path: Vec::new(),
            finished: HashMap::new(),
            reported: HashSet::new(),
        }
    }

    fn recipe(&mut self, recipe: &Recipe) -> CostResult<CostBreakdown> {
        if !recipe.yield_quantity.is_finite() || recipe.yield_quantity <= 0.0 {
            return Err(CostError::InvalidRecipe {
                recipe_id: recipe.id.clone(),
                reason: format!(
                    "yield quantity must be greater than 0 (got {})",
                    recipe.yield_quantity
                ),
            });
        }

        self.path.push(recipe.id.clone());
        let result = self.sum_lines(recipe);
        self.path.pop();
        result
    }

    fn sum_lines(&mut self, recipe: &Recipe) -> CostResult<CostBreakdown> {
        let mut total_cost = 0.0;
        let mut lines = Vec::new();
        let mut warnings = Vec::new();

        for item in recipe.all_items() {
            match self.item_cost(recipe, item) {
                Ok(cost) => {
                    total_cost += cost;
                    lines.push(LineCost {
                        kind: LineKind::Ingredient,
                        reference_id: item.ingredient_id.clone(),
                        quantity: item.quantity,
                        unit: item.unit,
                        cost,
                    });
                }
                Err(error) => self.line_failed(
                    recipe,
                    LineKind::Ingredient,
                    &item.ingredient_id,
                    error,
                    &mut warnings,
                )?,
            }
        }

        for link in &recipe.sub_recipes {
            match self.sub_recipe_cost(recipe, link) {
                Ok((cost, nested_warnings)) => {
                    total_cost += cost;
                    warnings.extend(nested_warnings);
                    lines.push(LineCost {
                        kind: LineKind::SubRecipe,
                        reference_id: link.sub_recipe_id.clone(),
                        quantity: link.quantity,
                        unit: link.unit,
                        cost,
                    });
                }
                Err(error) => self.line_failed(
                    recipe,
                    LineKind::SubRecipe,
                    &link.sub_recipe_id,
                    error,
                    &mut warnings,
                )?,
            }
        }

        let cost_per_output_unit = total_cost / recipe.yield_quantity;
        if !total_cost.is_finite() || !cost_per_output_unit.is_finite() {
            return Err(CostError::InvalidRecipe {
                recipe_id: recipe.id.clone(),
                reason: format!(
                    "cost of {} per {} {} is not a finite number",
                    total_cost, recipe.yield_quantity, recipe.yield_unit
                ),
            });
        }

        tracing::debug!(
            "Rolled up recipe '{}': total {:.4}, {:.4} per {} ({} lines, {} warnings)",
            recipe.id,
            total_cost,
            cost_per_output_unit,
            recipe.yield_unit,
            lines.len(),
            warnings.len()
        );

        Ok(CostBreakdown {
            recipe_id: recipe.id.clone(),
            total_cost,
            cost_per_output_unit,
            yield_quantity: recipe.yield_quantity,
            yield_unit: recipe.yield_unit,
            lines,
            warnings,
        })
    }

    fn item_cost(&self, recipe: &Recipe, item: &RecipeItem) -> CostResult<f64> {
        let ingredient = self.ingredients.get(&item.ingredient_id).ok_or_else(|| {
            CostError::MissingIngredient {
                recipe_id: recipe.id.clone(),
                ingredient_id: item.ingredient_id.clone(),
            }
        })?;
        cost_of(item.quantity, item.unit, ingredient)
    }

    /// Cost of the sub-recipe output consumed by `link`, plus the sub-recipe's
    /// own warnings
    fn sub_recipe_cost(
        &mut self,
        parent: &Recipe,
        link: &RecipeSubRecipe,
    ) -> CostResult<(f64, Vec<LineWarning>)> {
        if let Some(start) = self.path.iter().position(|id| *id == link.sub_recipe_id) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(link.sub_recipe_id.clone());
            return Err(CostError::CyclicRecipeGraph { path: cycle });
        }

        let recipes = self.recipes;
        let sub = recipes.get(&link.sub_recipe_id).ok_or_else(|| {
            CostError::MissingSubRecipe {
                recipe_id: parent.id.clone(),
                sub_recipe_id: link.sub_recipe_id.clone(),
            }
        })?;

        let breakdown = match self.finished.get(&sub.id) {
            Some(done) => done.clone(),
            None => {
                let done = self.recipe(sub)?;
                self.finished.insert(sub.id.clone(), done.clone());
                done
            }
        };

        let quantity = convert(link.quantity, link.unit, sub.yield_unit, sub.density_g_per_ml)?;
        let warnings = if self.reported.insert(sub.id.clone()) {
            breakdown.warnings
        } else {
            Vec::new()
        };
        Ok((quantity * breakdown.cost_per_output_unit, warnings))
    }

    fn line_failed(
        &self,
        recipe: &Recipe,
        kind: LineKind,
        reference_id: &str,
        error: CostError,
        warnings: &mut Vec<LineWarning>,
    ) -> CostResult<()> {
        if error.is_fatal() || self.mode == RollupMode::Strict {
            return Err(error);
        }

        tracing::warn!(
            "Skipping line '{}' of recipe '{}': {}",
            reference_id,
            recipe.id,
            error
        );

        warnings.push(LineWarning {
            recipe_id: recipe.id.clone(),
            kind,
            reference_id: reference_id.to_string(),
            error,
        });
        Ok(())
    }
}
