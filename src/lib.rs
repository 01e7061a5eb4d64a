//! Bakecost Library
//!
//! Ingredient costing, recursive recipe cost rollup and allergen aggregation
//! for a bakery, with an MCP server front end.

pub mod allergens;
pub mod build_info;
pub mod conversion;
pub mod costing;
pub mod error;
pub mod graph;
pub mod mcp;
pub mod models;
pub mod snapshot;
pub mod tools;

pub use allergens::{collect_allergens, normalize_allergens};
pub use conversion::{convert, ConversionError, Domain, Unit};
pub use costing::{cost_of, rollup_cost, rollup_cost_with_mode, CostBreakdown, RollupMode};
pub use error::{CostError, CostResult};
pub use graph::{affected_recipes, would_create_cycle};
pub use models::{AllergenField, Ingredient, Recipe};
pub use snapshot::{Snapshot, SnapshotError};
