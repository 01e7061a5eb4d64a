//! Costing Tools
//!
//! Conversions, ingredient and recipe costing, allergens and recipe graph
//! queries over a loaded snapshot.

use serde::Serialize;

use crate::conversion::{self, can_convert, resolve_density, Unit};
use crate::costing::{self, CostBreakdown, LineKind, LineWarning, RollupMode};
use crate::snapshot::Snapshot;

/// Response for convert_units
#[derive(Debug, Serialize)]
pub struct ConvertUnitsResponse {
    pub quantity: f64,
    pub from: Unit,
    pub to: Unit,
    pub density_g_per_ml: Option<f64>,
    pub result: f64,
}

/// Response for ingredient_cost
#[derive(Debug, Serialize)]
pub struct IngredientCostResponse {
    pub ingredient_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cost: f64,
    pub pack_quantity: f64,
    pub pack_unit: Unit,
    pub pack_price: f64,
    /// Density applied if the conversion crossed mass and volume
    pub density_g_per_ml: Option<f64>,
}

/// One costed line of a recipe
#[derive(Debug, Serialize)]
pub struct LineCostDetail {
    pub kind: LineKind,
    pub reference_id: String,
    pub name: Option<String>,
    pub quantity: f64,
    pub unit: Unit,
    pub cost: f64,
}

/// One line that could not be costed
#[derive(Debug, Serialize)]
pub struct LineWarningDetail {
    pub recipe_id: String,
    pub kind: LineKind,
    pub reference_id: String,
    pub error_kind: &'static str,
    pub message: String,
}

impl From<&LineWarning> for LineWarningDetail {
    fn from(warning: &LineWarning) -> Self {
        Self {
            recipe_id: warning.recipe_id.clone(),
            kind: warning.kind,
            reference_id: warning.reference_id.clone(),
            error_kind: warning.error.kind(),
            message: warning.error.to_string(),
        }
    }
}

/// Response for recipe_cost
#[derive(Debug, Serialize)]
pub struct RecipeCostResponse {
    pub recipe_id: String,
    pub name: String,
    pub mode: RollupMode,
    pub total_cost: f64,
    pub cost_per_output_unit: f64,
    pub yield_quantity: f64,
    pub yield_unit: Unit,
    /// False when any line, including nested ones, failed
    pub complete: bool,
    pub lines: Vec<LineCostDetail>,
    pub warnings: Vec<LineWarningDetail>,
}

/// Response for recipe_allergens
#[derive(Debug, Serialize)]
pub struct RecipeAllergensResponse {
    pub recipe_id: String,
    pub allergens: Vec<String>,
    pub count: usize,
}

/// Response for check_sub_recipe
#[derive(Debug, Serialize)]
pub struct CheckSubRecipeResponse {
    pub recipe_id: String,
    pub sub_recipe_id: String,
    pub would_create_cycle: bool,
}

/// Response for affected_recipes
#[derive(Debug, Serialize)]
pub struct AffectedRecipesResponse {
    pub ingredient_id: String,
    /// Sub-recipes listed before the recipes that use them
    pub recipes: Vec<String>,
    pub count: usize,
}

fn parse_unit(token: &str) -> Result<Unit, String> {
    token.parse::<Unit>().map_err(|e| e.to_string())
}

/// Convert a quantity between units
pub fn convert_units(
    quantity: f64,
    from: &str,
    to: &str,
    density_g_per_ml: Option<f64>,
) -> Result<ConvertUnitsResponse, String> {
    let from = parse_unit(from)?;
    let to = parse_unit(to)?;

    let result = conversion::convert(quantity, from, to, density_g_per_ml)
        .map_err(|e| format!("Failed to convert: {}", e))?;

    Ok(ConvertUnitsResponse {
        quantity,
        from,
        to,
        density_g_per_ml,
        result,
    })
}

/// Cost of a quantity of one ingredient
pub fn ingredient_cost(
    snapshot: &Snapshot,
    ingredient_id: &str,
    quantity: f64,
    unit: &str,
) -> Result<IngredientCostResponse, String> {
    let unit = parse_unit(unit)?;
    let ingredient = snapshot
        .ingredient(ingredient_id)
        .ok_or_else(|| format!("Ingredient not found: {}", ingredient_id))?;

    let cost = costing::cost_of(quantity, unit, ingredient)
        .map_err(|e| format!("Failed to cost ingredient: {}", e))?;

    let density_g_per_ml = if can_convert(unit, ingredient.pack_unit, false) {
        None
    } else {
        resolve_density(ingredient)
    };

    Ok(IngredientCostResponse {
        ingredient_id: ingredient.id.clone(),
        name: ingredient.name.clone(),
        quantity,
        unit,
        cost,
        pack_quantity: ingredient.pack_quantity,
        pack_unit: ingredient.pack_unit,
        pack_price: ingredient.pack_price,
        density_g_per_ml,
    })
}

fn line_name(snapshot: &Snapshot, kind: LineKind, reference_id: &str) -> Option<String> {
    match kind {
        LineKind::Ingredient => snapshot.ingredient(reference_id).map(|i| i.name.clone()),
        LineKind::SubRecipe => snapshot.recipe(reference_id).map(|r| r.name.clone()),
    }
}

fn recipe_cost_response(
    snapshot: &Snapshot,
    name: String,
    mode: RollupMode,
    breakdown: CostBreakdown,
) -> RecipeCostResponse {
    let complete = breakdown.is_complete();
    let lines = breakdown
        .lines
        .iter()
        .map(|line| LineCostDetail {
            kind: line.kind,
            reference_id: line.reference_id.clone(),
            name: line_name(snapshot, line.kind, &line.reference_id),
            quantity: line.quantity,
            unit: line.unit,
            cost: line.cost,
        })
        .collect();
    let warnings = breakdown.warnings.iter().map(LineWarningDetail::from).collect();

    RecipeCostResponse {
        recipe_id: breakdown.recipe_id,
        name,
        mode,
        total_cost: breakdown.total_cost,
        cost_per_output_unit: breakdown.cost_per_output_unit,
        yield_quantity: breakdown.yield_quantity,
        yield_unit: breakdown.yield_unit,
        complete,
        lines,
        warnings,
    }
}

/// Full cost breakdown of a recipe
pub fn recipe_cost(
    snapshot: &Snapshot,
    recipe_id: &str,
    strict: bool,
) -> Result<RecipeCostResponse, String> {
    let recipe = snapshot
        .recipe(recipe_id)
        .ok_or_else(|| format!("Recipe not found: {}", recipe_id))?;
    let mode = if strict {
        RollupMode::Strict
    } else {
        RollupMode::Lenient
    };

    let breakdown = snapshot
        .rollup_cost(recipe_id, mode)
        .map_err(|e| format!("Failed to cost recipe: {}", e))?;

    Ok(recipe_cost_response(snapshot, recipe.name.clone(), mode, breakdown))
}

/// Allergens of a recipe and everything it contains
pub fn recipe_allergens(
    snapshot: &Snapshot,
    recipe_id: &str,
) -> Result<RecipeAllergensResponse, String> {
    let allergens = snapshot
        .collect_allergens(recipe_id)
        .map_err(|e| format!("Failed to collect allergens: {}", e))?;

    Ok(RecipeAllergensResponse {
        recipe_id: recipe_id.to_string(),
        count: allergens.len(),
        allergens,
    })
}

/// Whether linking a sub-recipe would create a cycle
pub fn check_sub_recipe(
    snapshot: &Snapshot,
    recipe_id: &str,
    sub_recipe_id: &str,
) -> Result<CheckSubRecipeResponse, String> {
    if snapshot.recipe(recipe_id).is_none() {
        return Err(format!("Recipe not found: {}", recipe_id));
    }
    if snapshot.recipe(sub_recipe_id).is_none() {
        return Err(format!("Sub-recipe not found: {}", sub_recipe_id));
    }

    Ok(CheckSubRecipeResponse {
        recipe_id: recipe_id.to_string(),
        sub_recipe_id: sub_recipe_id.to_string(),
        would_create_cycle: snapshot.would_create_cycle(recipe_id, sub_recipe_id),
    })
}

/// Recipes whose cost depends on an ingredient, in recompute order
pub fn affected_recipes(
    snapshot: &Snapshot,
    ingredient_id: &str,
) -> Result<AffectedRecipesResponse, String> {
    if snapshot.ingredient(ingredient_id).is_none() {
        return Err(format!("Ingredient not found: {}", ingredient_id));
    }

    let recipes = snapshot.affected_recipes(ingredient_id);
    Ok(AffectedRecipesResponse {
        ingredient_id: ingredient_id.to_string(),
        count: recipes.len(),
        recipes,
    })
}
