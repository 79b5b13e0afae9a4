//! Differential-pressure sweep definition.
//!
//! Points are log-spaced: flow goes roughly with √ΔP, so the low end of the
//! range needs denser sampling than a linear grid gives.

use crate::conversions::GasFlowUnit;
use crate::error::SweepError;
use crate::parameters::DpRange;
use std::fmt;

/// Default number of intervals; a sweep has `steps + 1` points.
pub const DEFAULT_STEPS: usize = 25;

/// Largest accepted number of intervals.
pub const MAX_STEPS: usize = 1000;

/// Per-deployment sweep settings, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSettings {
    steps: usize,
    gas_unit: GasFlowUnit,
}

impl SweepSettings {
    pub fn new(steps: usize, gas_unit: GasFlowUnit) -> Result<Self, SweepError> {
        if steps == 0 || steps > MAX_STEPS {
            return Err(SweepError::InvalidConfiguration {
                what: format!("sweep steps must be within 1..={MAX_STEPS} (got {steps})"),
            });
        }
        Ok(Self { steps, gas_unit })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn num_points(&self) -> usize {
        self.steps + 1
    }

    pub fn gas_unit(&self) -> GasFlowUnit {
        self.gas_unit
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            gas_unit: GasFlowUnit::default(),
        }
    }
}

/// `steps + 1` points from `range.min()` to `range.max()`, both exact.
///
/// `dp_i = 10^(lerp(log10 min, log10 max, i / steps))`
pub fn log_points(range: DpRange, steps: usize) -> Vec<f64> {
    if steps == 0 {
        return vec![range.min()];
    }

    let log_min = range.min().log10();
    let log_max = range.max().log10();

    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let log_val = log_min + (log_max - log_min) * t;
        points.push(10f64.powf(log_val));
    }

    // Ensure exact endpoints
    points[0] = range.min();
    points[steps] = range.max();
    points
}

impl fmt::Display for SweepSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} log-spaced points, gas flow in {}",
            self.num_points(),
            self.gas_unit
        )
    }
}
