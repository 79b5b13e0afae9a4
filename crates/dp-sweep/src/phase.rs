//! Gas/liquid phase mode and the output channel it makes primary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;
use crate::parameters::Field;

/// Which derived unit system is primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseMode {
    #[default]
    Gas,
    Liquid,
}

/// One column of a sweep result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Raw solver output (kg/s)
    MassFlow,
    /// Standard gas flow (MMSCFD or MSCFH)
    GasStandard,
    /// Liquid volumetric flow at flowing density (MBPD)
    LiquidVolume,
    /// Liquid flow corrected to base density (MBPD)
    LiquidBase,
}

impl PhaseMode {
    pub const ALL: [PhaseMode; 2] = [PhaseMode::Gas, PhaseMode::Liquid];

    /// The auxiliary input this mode does not use.
    pub fn disabled_field(self) -> Field {
        match self {
            Self::Gas => Field::BaseDensity,
            Self::Liquid => Field::MolecularWeight,
        }
    }

    /// The auxiliary input this mode depends on.
    pub fn required_field(self) -> Field {
        match self {
            Self::Gas => Field::MolecularWeight,
            Self::Liquid => Field::BaseDensity,
        }
    }

    pub fn is_field_enabled(self, field: Field) -> bool {
        field != self.disabled_field()
    }

    /// Channel plotted and tabulated as "flow at base conditions".
    pub fn primary_channel(self) -> Channel {
        match self {
            Self::Gas => Channel::GasStandard,
            Self::Liquid => Channel::LiquidBase,
        }
    }

    /// The other mode's standard channel, kept alongside the primary one.
    pub fn secondary_channel(self) -> Channel {
        match self {
            Self::Gas => Channel::LiquidBase,
            Self::Liquid => Channel::GasStandard,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Gas => Self::Liquid,
            Self::Liquid => Self::Gas,
        }
    }
}

impl fmt::Display for PhaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gas => write!(f, "Gas"),
            Self::Liquid => write!(f, "Liquid"),
        }
    }
}

impl FromStr for PhaseMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gas" | "g" => Ok(Self::Gas),
            "liquid" | "l" => Ok(Self::Liquid),
            _ => Err(InputError::UnknownChoice(
                dp_meters::MeterError::UnknownChoice {
                    what: "phase mode",
                    text: s.to_string(),
                },
            )),
        }
    }
}
