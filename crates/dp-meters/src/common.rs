//! Common utilities for meter calculations.

use crate::error::{MeterError, MeterResult};
use dp_core::numeric::ensure_finite;

/// Small epsilon for pressure differences (Pa)
pub const EPSILON_PRESSURE: f64 = 1e-3;

/// Ensure a value is finite, returning MeterError if not.
pub fn check_finite(value: f64, what: &'static str) -> MeterResult<()> {
    ensure_finite(value, what).map_err(|_| MeterError::NonPhysical { what })?;
    Ok(())
}

/// Critical (choking) pressure ratio `(2/(k+1))^(k/(k-1))`.
///
/// The `k → 1` limit is `exp(-1/2)`.
pub fn critical_pressure_ratio(k: f64) -> f64 {
    if (k - 1.0).abs() < 1e-9 {
        (-0.5_f64).exp()
    } else {
        (2.0 / (k + 1.0)).powf(k / (k - 1.0))
    }
}
