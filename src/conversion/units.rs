//! Unit types and conversion constants
//!
//! Every supported unit, the measurement domain it belongs to, and its factor to
//! that domain's base unit (g, ml, or one counted piece).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Measurement domain of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Mass units, based on grams
    Mass,
    /// Volume units, based on milliliters
    Volume,
    /// Discrete pieces (each, slices)
    Count,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Mass => "mass",
            Domain::Volume => "volume",
            Domain::Count => "count",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per avoirdupois ounce
pub const G_PER_OZ: f64 = 28.349523125;
/// Grams per avoirdupois pound
pub const G_PER_LB: f64 = 453.59237;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

/// A supported measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Teaspoon,
    Tablespoon,
    Cup,
    FluidOunce,
    Pint,
    Quart,
    Gallon,
    Each,
    Slices,
}

impl Unit {
    /// Every unit in the table
    pub const ALL: [Unit; 16] = [
        Unit::Milligram,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Ounce,
        Unit::Pound,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
        Unit::FluidOunce,
        Unit::Pint,
        Unit::Quart,
        Unit::Gallon,
        Unit::Each,
        Unit::Slices,
    ];

    pub fn domain(&self) -> Domain {
        match self {
            Unit::Milligram | Unit::Gram | Unit::Kilogram | Unit::Ounce | Unit::Pound => {
                Domain::Mass
            }
            Unit::Milliliter
            | Unit::Liter
            | Unit::Teaspoon
            | Unit::Tablespoon
            | Unit::Cup
            | Unit::FluidOunce
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon => Domain::Volume,
            Unit::Each | Unit::Slices => Domain::Count,
        }
    }

    /// Quantity of the domain's base unit in one of this unit
    pub fn to_base_factor(&self) -> f64 {
        match self {
            Unit::Milligram => G_PER_MG,
            Unit::Gram => 1.0,
            Unit::Kilogram => G_PER_KG,
            Unit::Ounce => G_PER_OZ,
            Unit::Pound => G_PER_LB,
            Unit::Milliliter => 1.0,
            Unit::Liter => ML_PER_LITER,
            Unit::Teaspoon => ML_PER_TSP,
            Unit::Tablespoon => ML_PER_TBSP,
            Unit::Cup => ML_PER_CUP,
            Unit::FluidOunce => ML_PER_FL_OZ,
            Unit::Pint => ML_PER_PINT,
            Unit::Quart => ML_PER_QUART,
            Unit::Gallon => ML_PER_GALLON,
            Unit::Each | Unit::Slices => 1.0,
        }
    }

    /// Canonical token, as stored in ingredient and recipe records
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Milligram => "mg",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::Cup => "cup",
            Unit::FluidOunce => "floz",
            Unit::Pint => "pint",
            Unit::Quart => "quart",
            Unit::Gallon => "gallon",
            Unit::Each => "each",
            Unit::Slices => "slices",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unit text that matches nothing in the table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown unit: '{0}'")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let trimmed = lower.trim();

        let unit = match trimmed {
            "mg" | "milligram" | "milligrams" => Unit::Milligram,
            "g" | "gram" | "grams" | "gr" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => Unit::Kilogram,
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Unit::Milliliter
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
            "tbsp" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
            "cup" | "cups" => Unit::Cup,
            "floz" | "fl oz" | "fl. oz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
            "pint" | "pints" | "pt" => Unit::Pint,
            "quart" | "quarts" | "qt" => Unit::Quart,
            "gallon" | "gallons" | "gal" => Unit::Gallon,
            "each" | "ea" | "piece" | "pieces" | "item" | "items" | "count" | "unit"
            | "units" => Unit::Each,
            "slices" | "slice" => Unit::Slices,
            _ => return Err(UnknownUnit(s.to_string())),
        };

        Ok(unit)
    }
}

impl TryFrom<String> for Unit {
    type Error = UnknownUnit;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}
