//! Error types for meter solver calls.

use dp_core::error::DpError;
use thiserror::Error;

/// Errors that a meter solver call can report for one operating point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeterError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Infeasible geometry: diameter ratio {beta:.4} must lie in (0, 1)")]
    InfeasibleGeometry { beta: f64 },

    #[error("Choked flow: pressure ratio {ratio:.4} below critical ratio {critical:.4}")]
    Choked { ratio: f64, critical: f64 },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown {what}: '{text}'")]
    UnknownChoice { what: &'static str, text: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type MeterResult<T> = Result<T, MeterError>;

impl From<DpError> for MeterError {
    fn from(e: DpError) -> Self {
        match e {
            DpError::NonFinite { what, .. } | DpError::NonPositive { what, .. } => {
                MeterError::NonPhysical { what }
            }
            DpError::InvalidArg { what } | DpError::Invariant { what } => {
                MeterError::InvalidArg { what }
            }
        }
    }
}
