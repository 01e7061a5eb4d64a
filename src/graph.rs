//! Recipe graph utilities
//!
//! Queries over the sub-recipe links between recipes: cycle checks for a
//! prospective link, and the set of recipes whose cost depends on an
//! ingredient, in the order they should be recomputed.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{Recipe, RecipeId};

/// Whether linking `sub_recipe_id` under `recipe_id` would close a cycle
///
/// True when `recipe_id` is reachable from `sub_recipe_id` through existing
/// links, which includes a recipe linking to itself. Links to unknown recipes
/// are not followed.
pub fn would_create_cycle(
    recipes: &HashMap<RecipeId, Recipe>,
    recipe_id: &str,
    sub_recipe_id: &str,
) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut to_check = vec![sub_recipe_id];

    while let Some(current) = to_check.pop() {
        if current == recipe_id {
            return true;
        }

        if !visited.insert(current) {
            continue;
        }

        if let Some(recipe) = recipes.get(current) {
            to_check.extend(recipe.sub_recipe_ids());
        }
    }

    false
}

/// Every recipe that uses the ingredient, directly or through sub-recipes
///
/// Sub-recipes come before the recipes that consume them; recipes with no
/// ordering constraint between them are sorted by id.
pub fn affected_recipes(ingredient_id: &str, recipes: &HashMap<RecipeId, Recipe>) -> Vec<RecipeId> {
    // child -> recipes that consume it
    let mut consumers: HashMap<&str, Vec<&str>> = HashMap::new();
    for recipe in recipes.values() {
        for sub_id in recipe.sub_recipe_ids() {
            consumers.entry(sub_id).or_default().push(recipe.id.as_str());
        }
    }

    let mut affected: BTreeSet<&str> = recipes
        .values()
        .filter(|r| r.uses_ingredient(ingredient_id))
        .map(|r| r.id.as_str())
        .collect();

    let mut to_check: Vec<&str> = affected.iter().copied().collect();
    while let Some(current) = to_check.pop() {
        if let Some(parents) = consumers.get(current) {
            for &parent in parents {
                if affected.insert(parent) {
                    to_check.push(parent);
                }
            }
        }
    }

    topological_order(&affected, recipes)
}

/// Kahn's algorithm restricted to `ids`, dependencies first
fn topological_order(ids: &BTreeSet<&str>, recipes: &HashMap<RecipeId, Recipe>) -> Vec<RecipeId> {
    let mut dependencies: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for &id in ids {
        dependencies.entry(id).or_default();
        dependents.entry(id).or_default();
    }

    for &id in ids {
        let Some(recipe) = recipes.get(id) else {
            continue;
        };
        for sub_id in recipe.sub_recipe_ids().filter(|s| ids.contains(s) && *s != id) {
            dependencies.entry(id).or_default().insert(sub_id);
            dependents.entry(sub_id).or_default().insert(id);
        }
    }

    let mut ready: BTreeSet<&str> = dependencies
        .iter()
        .filter(|(_, deps)| deps.is_empty())
        .map(|(&id, _)| id)
        .collect();
    let mut result: Vec<RecipeId> = Vec::with_capacity(ids.len());
    let mut emitted: HashSet<&str> = HashSet::new();

    while let Some(id) = ready.pop_first() {
        result.push(id.to_string());
        emitted.insert(id);

        if let Some(parents) = dependents.get(id) {
            for &parent in parents {
                if let Some(deps) = dependencies.get_mut(parent) {
                    deps.remove(id);
                    if deps.is_empty() && !emitted.contains(parent) {
                        ready.insert(parent);
                    }
                }
            }
        }
    }

    // Recipes caught in a cycle never become ready; append them in id order
    if result.len() < ids.len() {
        tracing::warn!(
            "Recipe graph contains a cycle; {} recipe(s) left unordered",
            ids.len() - result.len()
        );
        for &id in ids {
            if !emitted.contains(id) {
                result.push(id.to_string());
            }
        }
    }

    result
}
