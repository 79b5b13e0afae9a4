//! The meter solver seam.

use crate::catalog::MeterSelection;
use crate::error::MeterResult;
use dp_core::units::{Density, DynVisc, Length, MassRate, Pressure};

/// Everything one solver call needs, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterInputs {
    /// Pipe inside diameter
    pub pipe_diameter: Length,
    /// Meter bore (throat) diameter
    pub bore_diameter: Length,
    /// Absolute pressure upstream of the meter
    pub upstream_pressure: Pressure,
    /// Absolute pressure at the downstream tap
    pub downstream_pressure: Pressure,
    /// Upstream fluid density
    pub density: Density,
    pub viscosity: DynVisc,
    pub isentropic_exponent: f64,
    /// Meter type, taps and (eccentric meters only) tap position
    pub selection: MeterSelection,
}

impl MeterInputs {
    /// Diameter ratio `d/D`.
    pub fn beta(&self) -> f64 {
        self.bore_diameter.value / self.pipe_diameter.value
    }

    /// `P1 - P2` in Pa.
    pub fn differential_pa(&self) -> f64 {
        self.upstream_pressure.value - self.downstream_pressure.value
    }
}

/// A differential-pressure meter solver.
///
/// Given one operating point it returns the mass flow rate through the meter,
/// or an error for that point alone (choked flow, infeasible geometry,
/// non-convergence). Implementations must be deterministic: the same inputs
/// always yield the same result.
pub trait MeterSolver {
    /// Solver name for logging.
    fn name(&self) -> &str {
        "meter solver"
    }

    /// Compute mass flow rate (kg/s) for one operating point.
    fn mass_flow(&self, inputs: &MeterInputs) -> MeterResult<MassRate>;
}

impl<F> MeterSolver for F
where
    F: Fn(&MeterInputs) -> MeterResult<MassRate>,
{
    fn mass_flow(&self, inputs: &MeterInputs) -> MeterResult<MassRate> {
        self(inputs)
    }
}
