//! Mass flow to standard gas and liquid flow.
//!
//! Pure functions, no state. Each rejects a non-positive auxiliary property
//! instead of producing NaN or infinity.

use dp_core::{DpResult, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normal molar volume of an ideal gas at 0 °C, 1 atm (L/mol).
pub const NORMAL_MOLAR_VOLUME_L: f64 = 22.414;

/// Standard (15 °C) over normal (0 °C) absolute temperature.
pub const STANDARD_TO_NORMAL_TEMPERATURE: f64 = 288.15 / 273.15;

/// Feet per metre, as used by the field dashboards.
pub const FT_PER_M: f64 = 3.282;

/// Barrels per cubic metre.
pub const BBL_PER_M3: f64 = 6.289_811;

const SECONDS_PER_HOUR: f64 = 3600.0;
const HOURS_PER_DAY: f64 = 24.0;
const SECONDS_PER_DAY: f64 = SECONDS_PER_HOUR * HOURS_PER_DAY;

/// Target unit of the gas standard-flow channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasFlowUnit {
    /// Million standard cubic feet per day
    #[default]
    Mmscfd,
    /// Thousand standard cubic feet per hour
    Mscfh,
}

impl GasFlowUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mmscfd => "MMSCFD",
            Self::Mscfh => "MSCFH",
        }
    }
}

impl fmt::Display for GasFlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Standard gas volume flow for a mass flow of a gas with the given
/// molecular weight (g/mol).
///
/// kg/s → kmol/h → Nm³/h → Sm³/h → scf/h, then scaled to `unit`.
pub fn gas_standard_flow(
    mass_flow_kg_s: f64,
    molecular_weight: f64,
    unit: GasFlowUnit,
) -> DpResult<f64> {
    ensure_finite(mass_flow_kg_s, "mass flow")?;
    ensure_positive(molecular_weight, "molecular weight")?;

    let kmol_per_h = mass_flow_kg_s * SECONDS_PER_HOUR / molecular_weight;
    let scf_per_h = kmol_per_h
        * NORMAL_MOLAR_VOLUME_L
        * STANDARD_TO_NORMAL_TEMPERATURE
        * FT_PER_M.powi(3);

    let flow = match unit {
        GasFlowUnit::Mmscfd => scf_per_h * HOURS_PER_DAY / 1e6,
        GasFlowUnit::Mscfh => scf_per_h / 1e3,
    };
    ensure_finite(flow, "gas standard flow")
}

/// Liquid volume flow in thousand barrels per day at the given density.
pub fn liquid_standard_flow(mass_flow_kg_s: f64, density_kg_m3: f64) -> DpResult<f64> {
    ensure_finite(mass_flow_kg_s, "mass flow")?;
    ensure_positive(density_kg_m3, "density")?;

    let m3_per_day = mass_flow_kg_s * SECONDS_PER_DAY / density_kg_m3;
    ensure_finite(m3_per_day * BBL_PER_M3 / 1000.0, "liquid standard flow")
}

/// Liquid flow at flowing density rescaled to base density (MBPD).
pub fn base_corrected_liquid_flow(
    mass_flow_kg_s: f64,
    density_kg_m3: f64,
    base_density_kg_m3: f64,
) -> DpResult<f64> {
    ensure_positive(base_density_kg_m3, "base density")?;
    let flowing = liquid_standard_flow(mass_flow_kg_s, density_kg_m3)?;
    ensure_finite(
        flowing * density_kg_m3 / base_density_kg_m3,
        "base-corrected liquid flow",
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn gas_flow_monotone_in_mass_flow(
            m in 0.0f64..100.0,
            dm in 1e-6f64..10.0,
            mw in 1.0f64..200.0,
        ) {
            for unit in [GasFlowUnit::Mmscfd, GasFlowUnit::Mscfh] {
                let lo = gas_standard_flow(m, mw, unit).unwrap();
                let hi = gas_standard_flow(m + dm, mw, unit).unwrap();
                prop_assert!(hi > lo);
            }
        }

        #[test]
        fn liquid_flow_monotone_in_mass_flow(
            m in 0.0f64..100.0,
            dm in 1e-6f64..10.0,
            den in 1.0f64..2000.0,
        ) {
            let lo = liquid_standard_flow(m, den).unwrap();
            let hi = liquid_standard_flow(m + dm, den).unwrap();
            prop_assert!(hi > lo);
        }

        #[test]
        fn liquid_flow_zero_only_at_zero(m in 1e-9f64..100.0, den in 1.0f64..2000.0) {
            prop_assert!(liquid_standard_flow(m, den).unwrap() > 0.0);
        }
    }
}
