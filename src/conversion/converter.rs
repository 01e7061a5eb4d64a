//! Unit conversion functions
//!
//! Converts quantities between units through the base unit of each domain.
//! Mass and volume only meet through an explicit density; count units never
//! leave the count domain.

use thiserror::Error;

use super::units::{Domain, Unit};

/// Conversion failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Density required to convert {from} to {to}")]
    DensityRequired { from: Unit, to: Unit },

    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: Unit, to: Unit },

    #[error("Invalid quantity {quantity}: must be finite and non-negative")]
    InvalidQuantity { quantity: f64 },

    #[error("Invalid density {density}: must be finite and positive")]
    InvalidDensity { density: f64 },

    #[error("Converting {quantity} {from} to {to} does not give a finite amount")]
    NonFiniteResult { quantity: f64, from: Unit, to: Unit },
}

/// Result type for conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Express a quantity in its domain's base unit
pub fn to_base(quantity: f64, unit: Unit) -> (f64, Domain) {
    (quantity * unit.to_base_factor(), unit.domain())
}

/// Express a base-unit amount in `unit` (which must share the domain)
pub fn from_base(amount: f64, unit: Unit) -> f64 {
    amount / unit.to_base_factor()
}

/// Convert `quantity` from one unit to another
///
/// `density` is in grams per milliliter and is only consulted when crossing
/// between mass and volume. It is never defaulted: a caller that wants water
/// density passes `Some(1.0)`.
pub fn convert(quantity: f64, from: Unit, to: Unit, density: Option<f64>) -> ConversionResult<f64> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ConversionError::InvalidQuantity { quantity });
    }

    if from == to {
        return Ok(quantity);
    }

    let (base_amount, base_domain) = to_base(quantity, from);
    let target_domain = to.domain();

    let converted = if base_domain == target_domain {
        from_base(base_amount, to)
    } else {
        let crossed = match (base_domain, target_domain) {
            (Domain::Mass, Domain::Volume) => base_amount / checked_density(from, to, density)?,
            (Domain::Volume, Domain::Mass) => base_amount * checked_density(from, to, density)?,
            _ => return Err(ConversionError::IncompatibleUnits { from, to }),
        };
        from_base(crossed, to)
    };

    if !converted.is_finite() {
        return Err(ConversionError::NonFiniteResult { quantity, from, to });
    }
    Ok(converted)
}

fn checked_density(from: Unit, to: Unit, density: Option<f64>) -> ConversionResult<f64> {
    match density {
        None => Err(ConversionError::DensityRequired { from, to }),
        Some(d) if d.is_finite() && d > 0.0 => Ok(d),
        Some(d) => Err(ConversionError::InvalidDensity { density: d }),
    }
}

/// Whether a conversion between two units is possible at all
///
/// Mass/volume pairs report `true` only when a density is available.
pub fn can_convert(from: Unit, to: Unit, has_density: bool) -> bool {
    match (from.domain(), to.domain()) {
        (a, b) if a == b => true,
        (Domain::Mass, Domain::Volume) | (Domain::Volume, Domain::Mass) => has_density,
        _ => false,
    }
}
