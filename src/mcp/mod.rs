//! Bakecost MCP module
//!
//! Stdio MCP server exposing the costing tools.

mod server;

pub use server::BakecostService;
