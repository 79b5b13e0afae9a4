//! Sweep and input errors.

use crate::phase::PhaseMode;
use crate::units::UnitError;
use dp_core::DpError;
use dp_meters::MeterError;
use thiserror::Error;

/// Result type for parameter input handling.
pub type InputResult<T> = Result<T, InputError>;

/// A raw parameter value that cannot enter the parameter model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Text did not parse, or carried a unit this field does not accept.
    #[error("{field}: {source}")]
    Unit {
        field: &'static str,
        #[source]
        source: UnitError,
    },

    /// Parsed, but zero, negative or non-finite.
    #[error("{field} must be a positive finite number (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Invalid dP range {min}..{max}: {reason}")]
    InvalidRange {
        min: f64,
        max: f64,
        reason: &'static str,
    },

    /// Selection text is not in the catalog.
    #[error("{0}")]
    UnknownChoice(#[from] MeterError),

    #[error("{field} is disabled in {phase} mode")]
    FieldDisabled {
        field: &'static str,
        phase: PhaseMode,
    },
}

impl InputError {
    pub(crate) fn from_core(field: &'static str, err: DpError) -> Self {
        match err {
            DpError::NonFinite { value, .. } | DpError::NonPositive { value, .. } => {
                InputError::NonPositive { field, value }
            }
            DpError::InvalidArg { what } | DpError::Invariant { what } => InputError::Unit {
                field,
                source: UnitError::ParseError(what.to_string()),
            },
        }
    }
}

/// Why a single sweep point has no flow values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("Meter solver failed: {0}")]
    Solver(#[from] MeterError),

    #[error("Unit conversion failed: {0}")]
    Conversion(#[from] DpError),
}

/// Error in sweep configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid sweep configuration: {what}")]
    InvalidConfiguration { what: String },
}
