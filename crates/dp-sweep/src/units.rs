//! Unit-aware text input for sweep parameters.
//!
//! Every field has a display unit (psig, inches, kg/m³, cP, g/mol, inH2O).
//! A bare number is read in that unit; a recognized unit suffix is converted
//! into it. Values are returned in the display unit, not SI, because the
//! parameter model stores what the engineer sees.

use dp_core::units::constants::{INCH_M, PSI_PA};
use std::fmt;
use thiserror::Error;

/// Dimension/quantity family for a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Gauge pressure (display: psig)
    GaugePressure,
    /// Differential pressure (display: inches of water)
    Differential,
    /// Pipe or bore diameter (display: inches)
    Diameter,
    /// Density (display: kg/m³)
    Density,
    /// Dynamic viscosity (display: cP)
    Viscosity,
    /// Molecular weight (display: g/mol)
    MolecularWeight,
    /// Plain number
    Dimensionless,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GaugePressure => write!(f, "Gauge Pressure"),
            Self::Differential => write!(f, "Differential Pressure"),
            Self::Diameter => write!(f, "Diameter"),
            Self::Density => write!(f, "Density"),
            Self::Viscosity => write!(f, "Viscosity"),
            Self::MolecularWeight => write!(f, "Molecular Weight"),
            Self::Dimensionless => write!(f, "Dimensionless"),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Input text did not parse to a number + optional unit
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Unit not recognized for this quantity
    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: String },
    /// Unit not allowed for this quantity
    #[error("Ambiguous unit '{unit}': {reason}")]
    AmbiguousUnit { unit: String, reason: String },
}

/// Parse a value from user input text into the quantity's display unit.
pub fn parse_quantity(raw_text: &str, quantity: Quantity) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(raw_text)?;
    let unit_key = unit.to_lowercase();

    let converted = match quantity {
        Quantity::GaugePressure => match unit_key.as_str() {
            "" | "psig" => value,
            "kpag" => value * 1e3 / PSI_PA,
            "barg" => value * 1e5 / PSI_PA,
            "psi" | "psia" | "kpa" | "bar" => {
                return Err(UnitError::AmbiguousUnit {
                    unit,
                    reason: "Upstream pressure is gauge: use 'psig', 'kPag' or 'barg'".to_string(),
                });
            }
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::Differential => match unit_key.as_str() {
            "" | "inh2o" | "inwc" | "in h2o" | "\"h2o" => value,
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::Diameter => match unit_key.as_str() {
            "" | "in" | "inch" | "\"" => value,
            "mm" => value * 1e-3 / INCH_M,
            "m" => value / INCH_M,
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::Density => match unit_key.as_str() {
            "" | "kg/m3" | "kg/m^3" | "kg/m³" => value,
            "lbm/ft3" | "lbm/ft^3" => value * 16.018_46,
            "g/cm3" | "g/cm^3" => value * 1e3,
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::Viscosity => match unit_key.as_str() {
            "" | "cp" | "mpa.s" | "mpa·s" => value,
            "pa.s" | "pa·s" => value * 1e3,
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::MolecularWeight => match unit_key.as_str() {
            "" | "g/mol" | "kg/kmol" => value,
            _ => return Err(unknown(unit, quantity)),
        },
        Quantity::Dimensionless => match unit_key.as_str() {
            "" => value,
            _ => return Err(unknown(unit, quantity)),
        },
    };

    Ok(converted)
}

fn unknown(unit: String, quantity: Quantity) -> UnitError {
    UnitError::UnknownUnit {
        unit,
        quantity: quantity.to_string(),
    }
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "100psig" -> (100.0, "psig")
/// - "19.3 mm" -> (19.3, "mm")
/// - "775" -> (775.0, "")
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();

    // Find where the numeric part ends
    let split_idx = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'e' && c != 'E')
        .unwrap_or(trimmed.len());

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let num_part = num_part.trim();
    let unit_part = unit_part.trim();

    let value: f64 = num_part.parse().map_err(|_| {
        UnitError::ParseError(format!("Could not parse numeric value from '{}'", input))
    })?;

    if !value.is_finite() {
        return Err(UnitError::ParseError(format!(
            "Value '{}' is not finite",
            input
        )));
    }

    Ok((value, unit_part.to_string()))
}
