//! Unit conversion module
//!
//! Unit table, density resolution, and the converter built on them.

pub mod converter;
pub mod density;
pub mod units;

pub use converter::{can_convert, convert, from_base, to_base, ConversionError, ConversionResult};
pub use density::{lookup_density, resolve_density};
pub use units::{Domain, Unit, UnknownUnit};
