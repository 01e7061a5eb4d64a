//! Ingredient density lookup
//!
//! Densities are grams per milliliter. An explicit density on the ingredient
//! record wins; otherwise the built-in table of common bakery ingredients is
//! consulted by name.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::Ingredient;

/// Common ingredient densities in g/ml, keyed by lower-case name
const COMMON_DENSITIES: &[(&str, f64)] = &[
    // Liquids
    ("water", 1.0),
    ("milk", 1.03),
    ("whole milk", 1.03),
    ("skimmed milk", 1.035),
    ("semi-skimmed milk", 1.033),
    ("buttermilk", 1.03),
    ("single cream", 1.01),
    ("double cream", 0.99),
    ("heavy cream", 0.99),
    ("whipping cream", 0.99),
    ("sour cream", 1.0),
    ("yogurt", 1.03),
    ("greek yogurt", 1.06),
    ("lemon juice", 1.03),
    ("orange juice", 1.04),
    ("vanilla extract", 0.88),
    ("egg", 1.03),
    ("egg white", 1.04),
    ("egg yolk", 1.03),
    // Fats and oils
    ("butter", 0.911),
    ("unsalted butter", 0.911),
    ("salted butter", 0.911),
    ("margarine", 0.96),
    ("lard", 0.92),
    ("vegetable shortening", 0.8),
    ("vegetable oil", 0.92),
    ("sunflower oil", 0.92),
    ("rapeseed oil", 0.92),
    ("olive oil", 0.91),
    ("coconut oil", 0.92),
    // Syrups
    ("honey", 1.42),
    ("golden syrup", 1.43),
    ("maple syrup", 1.32),
    ("corn syrup", 1.38),
    ("molasses", 1.4),
    ("black treacle", 1.4),
    // Flours and starches
    ("flour", 0.53),
    ("plain flour", 0.53),
    ("all-purpose flour", 0.53),
    ("self-raising flour", 0.53),
    ("bread flour", 0.55),
    ("strong white flour", 0.55),
    ("cake flour", 0.47),
    ("wholemeal flour", 0.51),
    ("whole wheat flour", 0.51),
    ("rye flour", 0.43),
    ("cornflour", 0.54),
    ("cornstarch", 0.54),
    ("ground almonds", 0.41),
    ("rolled oats", 0.38),
    // Sugars
    ("sugar", 0.85),
    ("granulated sugar", 0.85),
    ("caster sugar", 0.81),
    ("brown sugar", 0.93),
    ("light brown sugar", 0.93),
    ("dark brown sugar", 0.93),
    ("icing sugar", 0.51),
    ("powdered sugar", 0.51),
    // Leaveners, salt and powders
    ("salt", 1.22),
    ("table salt", 1.22),
    ("baking powder", 0.9),
    ("baking soda", 1.1),
    ("bicarbonate of soda", 1.1),
    ("dried yeast", 0.64),
    ("instant yeast", 0.64),
    ("cocoa powder", 0.36),
    ("ground cinnamon", 0.56),
];

static DENSITY_TABLE: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| COMMON_DENSITIES.iter().copied().collect());

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Look up a density by ingredient name in the built-in table
///
/// Matching is case-insensitive on the trimmed name; a single plural or
/// singular variation ("eggs" -> "egg") is tried when the exact name misses.
pub fn lookup_density(name: &str) -> Option<f64> {
    let key = normalize_name(name);
    if key.is_empty() {
        return None;
    }

    if let Some(&density) = DENSITY_TABLE.get(key.as_str()) {
        return Some(density);
    }

    if let Some(singular) = key.strip_suffix('s') {
        if let Some(&density) = DENSITY_TABLE.get(singular) {
            return Some(density);
        }
    }

    DENSITY_TABLE.get(format!("{key}s").as_str()).copied()
}

/// Resolve the density to use for an ingredient, if any is known
pub fn resolve_density(ingredient: &Ingredient) -> Option<f64> {
    match ingredient.density_g_per_ml {
        Some(d) if d.is_finite() && d > 0.0 => Some(d),
        _ => lookup_density(&ingredient.name),
    }
}

/// Number of entries in the built-in table
pub fn known_density_count() -> usize {
    DENSITY_TABLE.len()
}
