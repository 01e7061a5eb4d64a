//! Costing module
//!
//! Ingredient pricing and recursive recipe cost rollup.

pub mod ingredient;
pub mod rollup;

pub use ingredient::cost_of;
pub use rollup::{
    rollup_cost, rollup_cost_by_id, rollup_cost_with_mode, CostBreakdown, LineCost, LineKind,
    LineWarning, RollupMode,
};
