//! Algebraic properties of conversion, costing and aggregation

use std::collections::HashMap;

use bakecost::conversion::{convert, ConversionError, Domain, Unit};
use bakecost::costing::{cost_of, rollup_cost, rollup_cost_with_mode, RollupMode};
use bakecost::models::{AllergenField, Ingredient, IngredientId, Recipe, RecipeId};
use bakecost::{collect_allergens, CostError};
use proptest::prelude::*;

fn units_in(domain: Domain) -> Vec<Unit> {
    Unit::ALL
        .iter()
        .copied()
        .filter(|u| u.domain() == domain)
        .collect()
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn pantry() -> HashMap<IngredientId, Ingredient> {
    [
        Ingredient::new("butter", "Butter", 500.0, Unit::Gram, 2.5)
            .with_density(0.911)
            .with_allergens(AllergenField::list(["milk"])),
        Ingredient::new("flour", "Plain flour", 1.5, Unit::Kilogram, 1.2)
            .with_allergens(AllergenField::Encoded(r#"["gluten"]"#.to_string())),
        Ingredient::new("milk", "Milk", 2.0, Unit::Liter, 1.6)
            .with_allergens(AllergenField::list(["milk"])),
        Ingredient::new("eggs", "Eggs", 12.0, Unit::Each, 3.6)
            .with_allergens(AllergenField::list(["eggs"])),
        Ingredient::new("almonds", "Ground almonds", 200.0, Unit::Gram, 3.0)
            .with_allergens(AllergenField::list(["tree nuts"])),
        Ingredient::new("sugar", "Caster sugar", 1.0, Unit::Kilogram, 1.1),
    ]
    .into_iter()
    .map(|i| (i.id.clone(), i))
    .collect()
}

const PANTRY_IDS: [&str; 6] = ["butter", "flour", "milk", "eggs", "almonds", "sugar"];

/// Quantity in a unit native to each pantry ingredient
fn native_unit(id: &str) -> Unit {
    match id {
        "milk" => Unit::Milliliter,
        "eggs" => Unit::Each,
        _ => Unit::Gram,
    }
}

fn recipe_map(recipes: Vec<Recipe>) -> HashMap<RecipeId, Recipe> {
    recipes.into_iter().map(|r| (r.id.clone(), r)).collect()
}

#[test]
fn test_reference_butter_example() {
    let pantry = pantry();
    let butter = &pantry["butter"];
    assert!((cost_of(250.0, Unit::Gram, butter).unwrap() - 1.25).abs() < 1e-9);

    let recipe = Recipe::new("r", "Butter portion", 10.0, Unit::Each).with_item("butter", 250.0, Unit::Gram);
    let breakdown = rollup_cost(&recipe, &pantry, &HashMap::new()).unwrap();
    assert!((breakdown.total_cost - 1.25).abs() < 1e-9);
    assert!((breakdown.cost_per_output_unit - 0.125).abs() < 1e-9);
}

#[test]
fn test_lenient_and_strict_missing_ingredient() {
    let recipe = Recipe::new("r", "R", 1.0, Unit::Each)
        .with_item("butter", 250.0, Unit::Gram)
        .with_item("vanilla pod", 1.0, Unit::Each);

    let lenient = rollup_cost(&recipe, &pantry(), &HashMap::new()).unwrap();
    assert!((lenient.total_cost - 1.25).abs() < 1e-9);
    assert!(!lenient.is_complete());

    let strict = rollup_cost_with_mode(&recipe, &pantry(), &HashMap::new(), RollupMode::Strict);
    assert!(matches!(strict, Err(CostError::MissingIngredient { .. })));
}

proptest! {
    #[test]
    fn identity_conversion(unit in prop::sample::select(Unit::ALL.to_vec()), q in 0.0_f64..1e6) {
        prop_assert_eq!(convert(q, unit, unit, None).unwrap(), q);
    }

    #[test]
    fn within_domain_round_trip(
        domain in prop::sample::select(vec![Domain::Mass, Domain::Volume, Domain::Count]),
        a in 0usize..16,
        b in 0usize..16,
        q in 0.0_f64..1e6,
    ) {
        let units = units_in(domain);
        let from = units[a % units.len()];
        let to = units[b % units.len()];

        let there = convert(q, from, to, None).unwrap();
        let back = convert(there, to, from, None).unwrap();
        prop_assert!(nearly_equal(back, q), "{} {} -> {} -> {}", q, from, to, back);
    }

    #[test]
    fn cross_domain_round_trip_with_density(
        mass in prop::sample::select(units_in(Domain::Mass)),
        volume in prop::sample::select(units_in(Domain::Volume)),
        density in 0.1_f64..3.0,
        q in 0.0_f64..1e5,
    ) {
        let ml = convert(q, mass, volume, Some(density)).unwrap();
        let back = convert(ml, volume, mass, Some(density)).unwrap();
        prop_assert!(nearly_equal(back, q));
    }

    #[test]
    fn cross_domain_requires_density(
        mass in prop::sample::select(units_in(Domain::Mass)),
        volume in prop::sample::select(units_in(Domain::Volume)),
        q in 0.0_f64..1e5,
    ) {
        let is_density_required = matches!(
            convert(q, mass, volume, None),
            Err(ConversionError::DensityRequired { .. })
        );
        prop_assert!(is_density_required);
    }

    #[test]
    fn count_never_converts(
        count in prop::sample::select(units_in(Domain::Count)),
        other in prop::sample::select(
            Unit::ALL.iter().copied().filter(|u| u.domain() != Domain::Count).collect::<Vec<_>>()
        ),
        density in prop::option::of(0.1_f64..3.0),
    ) {
        let is_incompatible = matches!(
            convert(1.0, count, other, density),
            Err(ConversionError::IncompatibleUnits { .. })
        );
        prop_assert!(is_incompatible);
        let is_incompatible = matches!(
            convert(1.0, other, count, density),
            Err(ConversionError::IncompatibleUnits { .. })
        );
        prop_assert!(is_incompatible);
    }

    #[test]
    fn cost_is_linear(
        id in prop::sample::select(PANTRY_IDS.to_vec()),
        q in 0.0_f64..1e4,
        k in 0.0_f64..100.0,
    ) {
        let pantry = pantry();
        let ingredient = &pantry[id];
        let unit = native_unit(id);

        let scaled = cost_of(k * q, unit, ingredient).unwrap();
        let base = cost_of(q, unit, ingredient).unwrap();
        prop_assert!(nearly_equal(scaled, k * base));
    }

    #[test]
    fn rollup_is_additive(
        lines in prop::collection::vec((prop::sample::select(PANTRY_IDS.to_vec()), 0.0_f64..2000.0), 0..12),
        yield_quantity in 0.5_f64..50.0,
    ) {
        let pantry = pantry();
        let mut recipe = Recipe::new("r", "Random bake", yield_quantity, Unit::Each);
        let mut expected = 0.0;
        for (id, q) in &lines {
            recipe = recipe.with_item(*id, *q, native_unit(id));
            expected += cost_of(*q, native_unit(id), &pantry[*id]).unwrap();
        }

        let breakdown = rollup_cost(&recipe, &pantry, &HashMap::new()).unwrap();
        prop_assert!(breakdown.is_complete());
        prop_assert!(nearly_equal(breakdown.total_cost, expected));
        prop_assert!(nearly_equal(breakdown.cost_per_output_unit, expected / yield_quantity));
    }

    #[test]
    fn sub_recipe_composition(
        butter in 0.0_f64..1000.0,
        flour in 0.0_f64..1000.0,
        sub_yield in 0.1_f64..5.0,
        used_grams in 0.0_f64..5000.0,
    ) {
        let pantry = pantry();
        let dough = Recipe::new("dough", "Dough", sub_yield, Unit::Kilogram)
            .with_item("butter", butter, Unit::Gram)
            .with_item("flour", flour, Unit::Gram);
        let pie = Recipe::new("pie", "Pie", 1.0, Unit::Each).with_sub_recipe("dough", used_grams, Unit::Gram);
        let recipes = recipe_map(vec![dough.clone(), pie.clone()]);

        let inner = rollup_cost(&dough, &pantry, &recipes).unwrap();
        let outer = rollup_cost(&pie, &pantry, &recipes).unwrap();

        let expected = used_grams / 1000.0 * inner.cost_per_output_unit;
        prop_assert!(nearly_equal(outer.total_cost, expected));
    }

    #[test]
    fn allergens_are_a_sorted_superset(
        inner_ids in prop::collection::vec(prop::sample::select(PANTRY_IDS.to_vec()), 0..6),
        outer_ids in prop::collection::vec(prop::sample::select(PANTRY_IDS.to_vec()), 0..6),
    ) {
        let pantry = pantry();
        let mut inner = Recipe::new("inner", "Inner", 1.0, Unit::Each);
        for id in &inner_ids {
            inner = inner.with_item(*id, 1.0, native_unit(id));
        }
        let mut outer = Recipe::new("outer", "Outer", 1.0, Unit::Each).with_sub_recipe("inner", 1.0, Unit::Each);
        for id in &outer_ids {
            outer = outer.with_item(*id, 1.0, native_unit(id));
        }
        let recipes = recipe_map(vec![inner.clone(), outer.clone()]);

        let inner_set = collect_allergens(&inner, &pantry, &recipes).unwrap();
        let outer_set = collect_allergens(&outer, &pantry, &recipes).unwrap();
        let again = collect_allergens(&outer, &pantry, &recipes).unwrap();

        prop_assert!(inner_set.iter().all(|a| outer_set.contains(a)));
        prop_assert_eq!(&outer_set, &again);
        prop_assert!(outer_set.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn cyclic_graphs_terminate(edges in prop::collection::vec((0usize..5, 0usize..5), 0..12)) {
        let pantry = pantry();
        let mut recipes: Vec<Recipe> = (0..5)
            .map(|i| Recipe::new(format!("r{}", i), format!("Recipe {}", i), 1.0, Unit::Each)
                .with_item("sugar", 10.0, Unit::Gram))
            .collect();
        for (from, to) in &edges {
            let linked = recipes[*from].clone().with_sub_recipe(format!("r{}", to), 1.0, Unit::Each);
            recipes[*from] = linked;
        }
        let recipes = recipe_map(recipes);

        for recipe in recipes.values() {
            let cyclic = reachable_cycle(&recipes, &recipe.id);

            match rollup_cost(recipe, &pantry, &recipes) {
                Ok(breakdown) => {
                    prop_assert!(!cyclic);
                    prop_assert!(breakdown.is_complete());
                }
                Err(CostError::CyclicRecipeGraph { path }) => {
                    prop_assert!(cyclic);
                    prop_assert!(path.len() >= 2);
                    prop_assert_eq!(path.first(), path.last());
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }

            let allergens = collect_allergens(recipe, &pantry, &recipes);
            prop_assert_eq!(allergens.is_err(), cyclic);
        }
    }
}

/// Whether any cycle is reachable from `start`
fn reachable_cycle(recipes: &HashMap<RecipeId, Recipe>, start: &str) -> bool {
    fn visit<'a>(
        recipes: &'a HashMap<RecipeId, Recipe>,
        id: &'a str,
        path: &mut Vec<&'a str>,
    ) -> bool {
        if path.contains(&id) {
            return true;
        }
        path.push(id);
        let found = recipes
            .get(id)
            .map(|r| r.sub_recipe_ids().any(|sub| visit(recipes, sub, path)))
            .unwrap_or(false);
        path.pop();
        found
    }
    visit(recipes, start, &mut Vec::new())
}
