//! Print the cost breakdown and allergens of one recipe
//!
//! Usage: cost_report <recipe-id> [--strict]

use tracing_subscriber::EnvFilter;

use bakecost::costing::{LineKind, RollupMode};
use bakecost::snapshot::{get_snapshot_path, Snapshot};

fn usage() -> String {
    "Usage: cost_report <recipe-id> [--strict]".to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bakecost=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut recipe_id = None;
    let mut mode = RollupMode::Lenient;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => mode = RollupMode::Strict,
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            _ if recipe_id.is_none() => recipe_id = Some(arg),
            _ => return Err(usage().into()),
        }
    }
    let recipe_id = recipe_id.ok_or_else(usage)?;

    let snapshot_path = get_snapshot_path();
    let snapshot = Snapshot::load(&snapshot_path)?;

    let recipe = snapshot
        .recipe(&recipe_id)
        .ok_or_else(|| format!("Recipe not found: {}", recipe_id))?;
    let breakdown = snapshot.rollup_cost(&recipe_id, mode)?;

    println!("{} ({})", recipe.name, recipe.id);
    println!("Yield: {} {}", breakdown.yield_quantity, breakdown.yield_unit);
    println!();

    for line in &breakdown.lines {
        let (label, name) = match line.kind {
            LineKind::Ingredient => (
                "ingredient",
                snapshot.ingredient(&line.reference_id).map(|i| i.name.as_str()),
            ),
            LineKind::SubRecipe => (
                "sub-recipe",
                snapshot.recipe(&line.reference_id).map(|r| r.name.as_str()),
            ),
        };
        println!(
            "  {:<10} {:<28} {:>10.3} {:<6} {:>10.4}",
            label,
            name.unwrap_or(line.reference_id.as_str()),
            line.quantity,
            line.unit,
            line.cost
        );
    }

    println!();
    println!("Total: {:.4}", breakdown.total_cost);
    println!(
        "Per {}: {:.4}",
        breakdown.yield_unit, breakdown.cost_per_output_unit
    );

    if !breakdown.is_complete() {
        println!();
        println!("Cost is incomplete — see warnings:");
        for warning in &breakdown.warnings {
            println!(
                "  [{}] {}: {}",
                warning.recipe_id,
                warning.reference_id,
                warning.error
            );
        }
    }

    println!();
    match snapshot.collect_allergens(&recipe_id) {
        Ok(allergens) if allergens.is_empty() => println!("Allergens: none declared"),
        Ok(allergens) => println!("Allergens: {}", allergens.join(", ")),
        Err(e) => println!("Allergens: unavailable ({})", e),
    }

    Ok(())
}
