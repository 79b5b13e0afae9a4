//! Reference meter solver with fixed, family-level discharge coefficients.

use crate::catalog::{MeterFamily, MeterType};
use crate::common::{EPSILON_PRESSURE, check_finite, critical_pressure_ratio};
use crate::error::{MeterError, MeterResult};
use crate::traits::{MeterInputs, MeterSolver};
use dp_core::units::{MassRate, kgps};
use std::f64::consts::PI;

/// Simple differential-pressure meter model.
///
/// Uses a constant discharge coefficient per meter family, the velocity of
/// approach factor, and an expansibility factor. There is no Reynolds-number
/// correction, so viscosity does not enter the result. Useful as a
/// deterministic stand-in when no standards-grade solver is wired in.
#[derive(Debug, Clone, Default)]
pub struct NominalCoefficientMeter {
    /// Overrides the family coefficient for every meter type
    pub discharge_coefficient: Option<f64>,
}

impl NominalCoefficientMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed discharge coefficient regardless of meter type.
    pub fn with_discharge_coefficient(cd: f64) -> Self {
        Self {
            discharge_coefficient: Some(cd),
        }
    }

    /// Discharge coefficient used for a meter type.
    pub fn coefficient_for(&self, meter: MeterType) -> f64 {
        if let Some(cd) = self.discharge_coefficient {
            return cd;
        }
        match meter.family() {
            MeterFamily::Orifice | MeterFamily::Unspecified => 0.61,
            MeterFamily::Nozzle => 0.98,
            MeterFamily::Venturi => 0.985,
            MeterFamily::Cone => 0.80,
            MeterFamily::Wedge => 0.73,
        }
    }
}

/// ISO 5167-2 plate expansibility.
fn orifice_expansibility(beta: f64, pressure_ratio: f64, k: f64) -> f64 {
    let beta4 = beta.powi(4);
    1.0 - (0.351 + 0.256 * beta4 + 0.93 * beta4 * beta4) * (1.0 - pressure_ratio.powf(1.0 / k))
}

/// Isentropic expansibility for nozzles, venturis and other smooth restrictions.
fn nozzle_expansibility(beta: f64, tau: f64, k: f64) -> f64 {
    if (1.0 - tau).abs() < 1e-12 {
        return 1.0;
    }
    let beta4 = beta.powi(4);
    let tau_2k = tau.powf(2.0 / k);
    let num = k * tau_2k / (k - 1.0) * (1.0 - beta4) / (1.0 - beta4 * tau_2k)
        * (1.0 - tau.powf((k - 1.0) / k));
    (num / (1.0 - tau)).sqrt()
}

impl MeterSolver for NominalCoefficientMeter {
    fn name(&self) -> &str {
        "nominal coefficient meter"
    }

    fn mass_flow(&self, inputs: &MeterInputs) -> MeterResult<MassRate> {
        let d_pipe = inputs.pipe_diameter.value;
        let d_bore = inputs.bore_diameter.value;
        let p1 = inputs.upstream_pressure.value;
        let p2 = inputs.downstream_pressure.value;
        let rho = inputs.density.value;
        let k = inputs.isentropic_exponent;

        check_finite(d_pipe, "pipe diameter")?;
        check_finite(d_bore, "bore diameter")?;
        check_finite(p1, "upstream pressure")?;
        check_finite(p2, "downstream pressure")?;
        check_finite(rho, "density")?;

        if d_pipe <= 0.0 || d_bore <= 0.0 {
            return Err(MeterError::NonPhysical { what: "diameter" });
        }
        let beta = d_bore / d_pipe;
        if beta >= 1.0 {
            return Err(MeterError::InfeasibleGeometry { beta });
        }
        if rho <= 0.0 {
            return Err(MeterError::NonPhysical { what: "density" });
        }
        if k.is_nan() || k <= 0.0 {
            return Err(MeterError::NonPhysical {
                what: "isentropic exponent",
            });
        }
        if p2 <= 0.0 {
            return Err(MeterError::NonPhysical {
                what: "downstream pressure",
            });
        }

        let dp = p1 - p2;
        if dp < EPSILON_PRESSURE {
            return Err(MeterError::NonPhysical {
                what: "differential pressure",
            });
        }

        let ratio = p2 / p1;
        let critical = critical_pressure_ratio(k);
        if ratio < critical {
            return Err(MeterError::Choked { ratio, critical });
        }

        let meter = inputs.selection.meter_type();
        let epsilon = match meter.family() {
            MeterFamily::Orifice | MeterFamily::Unspecified => {
                orifice_expansibility(beta, ratio, k)
            }
            _ if (k - 1.0).abs() < 1e-9 => orifice_expansibility(beta, ratio, k),
            _ => nozzle_expansibility(beta, ratio, k),
        };
        check_finite(epsilon, "expansibility factor")?;

        let cd = self.coefficient_for(meter);
        let approach = 1.0 / (1.0 - beta.powi(4)).sqrt();
        let area = PI / 4.0 * d_bore * d_bore;

        let mdot = cd * approach * epsilon * area * (2.0 * rho * dp).sqrt();
        check_finite(mdot, "mass flow rate")?;

        Ok(kgps(mdot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MeterSelection, TapPosition, TapType};
    use dp_core::units::{centipoise, in_h2o, inch, kg_per_m3, psig};

    fn inputs(meter: MeterType, dp_in_h2o: f64) -> MeterInputs {
        let p1 = psig(100.0);
        MeterInputs {
            pipe_diameter: inch(2.066141),
            bore_diameter: inch(0.7598),
            upstream_pressure: p1,
            downstream_pressure: p1 - in_h2o(dp_in_h2o),
            density: kg_per_m3(775.0),
            viscosity: centipoise(1.0),
            isentropic_exponent: 1.1,
            selection: MeterSelection::new(meter, TapType::Flange, Some(TapPosition::Opposite)),
        }
    }

    #[test]
    fn orifice_flow_is_positive_and_finite() {
        let solver = NominalCoefficientMeter::new();
        let mdot = solver
            .mass_flow(&inputs(MeterType::Iso5167Orifice, 100.0))
            .unwrap();
        assert!(mdot.value > 0.5 && mdot.value < 5.0, "mdot = {}", mdot.value);
    }

    #[test]
    fn flow_increases_with_differential() {
        let solver = NominalCoefficientMeter::new();
        let low = solver
            .mass_flow(&inputs(MeterType::Iso5167Orifice, 10.0))
            .unwrap();
        let high = solver
            .mass_flow(&inputs(MeterType::Iso5167Orifice, 250.0))
            .unwrap();
        assert!(high.value > low.value);
    }

    #[test]
    fn venturi_passes_more_than_orifice() {
        let solver = NominalCoefficientMeter::new();
        let orifice = solver
            .mass_flow(&inputs(MeterType::Iso5167Orifice, 100.0))
            .unwrap();
        let venturi = solver
            .mass_flow(&inputs(MeterType::MachinedConvergentVenturiTube, 100.0))
            .unwrap();
        assert!(venturi.value > orifice.value);
    }

    #[test]
    fn reject_bore_larger_than_pipe() {
        let solver = NominalCoefficientMeter::new();
        let mut i = inputs(MeterType::Orifice, 100.0);
        i.bore_diameter = inch(3.0);
        assert!(matches!(
            solver.mass_flow(&i),
            Err(MeterError::InfeasibleGeometry { .. })
        ));
    }

    #[test]
    fn choked_when_pressure_ratio_too_low() {
        let solver = NominalCoefficientMeter::new();
        let mut i = inputs(MeterType::Orifice, 100.0);
        i.downstream_pressure = i.upstream_pressure * 0.3;
        assert!(matches!(
            solver.mass_flow(&i),
            Err(MeterError::Choked { .. })
        ));
    }

    #[test]
    fn reject_non_positive_downstream_pressure() {
        let solver = NominalCoefficientMeter::new();
        let mut i = inputs(MeterType::Orifice, 100.0);
        i.downstream_pressure = i.upstream_pressure * 0.0;
        assert!(matches!(
            solver.mass_flow(&i),
            Err(MeterError::NonPhysical { .. })
        ));
    }

    #[test]
    fn expansibility_tends_to_one_at_small_differential() {
        assert!((orifice_expansibility(0.5, 1.0, 1.4) - 1.0).abs() < 1e-12);
        let eps = nozzle_expansibility(0.5, 0.999_999, 1.4);
        assert!((eps - 1.0).abs() < 1e-4, "eps = {}", eps);
    }

    #[test]
    fn coefficient_override() {
        let solver = NominalCoefficientMeter::with_discharge_coefficient(0.7);
        assert_eq!(solver.coefficient_for(MeterType::ConeMeter), 0.7);
        assert_eq!(
            NominalCoefficientMeter::new().coefficient_for(MeterType::WedgeMeter),
            0.73
        );
    }
}
