//! Bakecost Tools module
//!
//! MCP tool implementations for the costing engine.

pub mod costing;
pub mod status;
