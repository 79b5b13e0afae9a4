//! Closed catalog of differential-pressure meter geometries and tap arrangements.
//!
//! Labels match the strings the meter solver expects, so a parsed `MeterType`
//! can be handed straight through to any backend keyed on those names.

use crate::error::MeterError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Meter geometry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterFamily {
    Orifice,
    Nozzle,
    Venturi,
    Cone,
    Wedge,
    Unspecified,
}

/// Differential-pressure meter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeterType {
    #[serde(rename = "orifice")]
    Orifice,
    #[serde(rename = "eccentric orifice")]
    EccentricOrifice,
    #[serde(rename = "conical orifice")]
    ConicalOrifice,
    #[serde(rename = "segmental orifice")]
    SegmentalOrifice,
    #[serde(rename = "quarter circle orifice")]
    QuarterCircleOrifice,
    #[serde(rename = "ISO 5167 orifice")]
    Iso5167Orifice,
    #[serde(rename = "ISO 15377 eccentric orifice")]
    Iso15377EccentricOrifice,
    #[serde(rename = "ISO 15377 quarter-circle orifice")]
    Iso15377QuarterCircleOrifice,
    #[serde(rename = "ISO 15377 conical orifice")]
    Iso15377ConicalOrifice,
    #[serde(rename = "Miller orifice")]
    MillerOrifice,
    #[serde(rename = "Miller eccentric orifice")]
    MillerEccentricOrifice,
    #[serde(rename = "Miller segmental orifice")]
    MillerSegmentalOrifice,
    #[serde(rename = "Miller conical orifice")]
    MillerConicalOrifice,
    #[serde(rename = "Miller quarter circle orifice")]
    MillerQuarterCircleOrifice,
    #[serde(rename = "Hollingshead orifice")]
    HollingsheadOrifice,
    #[serde(rename = "long radius nozzle")]
    LongRadiusNozzle,
    #[serde(rename = "ISA 1932 nozzle")]
    Isa1932Nozzle,
    #[serde(rename = "venuri nozzle")]
    VenturiNozzle,
    #[serde(rename = "as cast convergent venturi tube")]
    AsCastConvergentVenturiTube,
    #[serde(rename = "machined convergent venturi tube")]
    MachinedConvergentVenturiTube,
    #[serde(rename = "rough welded convergent venturi tube")]
    RoughWeldedConvergentVenturiTube,
    #[serde(rename = "Hollingshead venturi smooth")]
    HollingsheadVenturiSmooth,
    #[serde(rename = "Hollingshead venturi sharp")]
    HollingsheadVenturiSharp,
    #[serde(rename = "cone meter")]
    ConeMeter,
    #[serde(rename = "Hollingshead v cone")]
    HollingsheadVCone,
    #[serde(rename = "wedge meter")]
    WedgeMeter,
    #[serde(rename = "Hollingshead wedge")]
    HollingsheadWedge,
    #[serde(rename = "unspecified meter")]
    UnspecifiedMeter,
}

impl MeterType {
    /// Every catalog entry, grouped by family.
    pub const ALL: [MeterType; 28] = [
        MeterType::Orifice,
        MeterType::EccentricOrifice,
        MeterType::ConicalOrifice,
        MeterType::SegmentalOrifice,
        MeterType::QuarterCircleOrifice,
        MeterType::Iso5167Orifice,
        MeterType::Iso15377EccentricOrifice,
        MeterType::Iso15377QuarterCircleOrifice,
        MeterType::Iso15377ConicalOrifice,
        MeterType::MillerOrifice,
        MeterType::MillerEccentricOrifice,
        MeterType::MillerSegmentalOrifice,
        MeterType::MillerConicalOrifice,
        MeterType::MillerQuarterCircleOrifice,
        MeterType::HollingsheadOrifice,
        MeterType::LongRadiusNozzle,
        MeterType::Isa1932Nozzle,
        MeterType::VenturiNozzle,
        MeterType::AsCastConvergentVenturiTube,
        MeterType::MachinedConvergentVenturiTube,
        MeterType::RoughWeldedConvergentVenturiTube,
        MeterType::HollingsheadVenturiSmooth,
        MeterType::HollingsheadVenturiSharp,
        MeterType::ConeMeter,
        MeterType::HollingsheadVCone,
        MeterType::WedgeMeter,
        MeterType::HollingsheadWedge,
        MeterType::UnspecifiedMeter,
    ];

    /// Solver-facing name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Orifice => "orifice",
            Self::EccentricOrifice => "eccentric orifice",
            Self::ConicalOrifice => "conical orifice",
            Self::SegmentalOrifice => "segmental orifice",
            Self::QuarterCircleOrifice => "quarter circle orifice",
            Self::Iso5167Orifice => "ISO 5167 orifice",
            Self::Iso15377EccentricOrifice => "ISO 15377 eccentric orifice",
            Self::Iso15377QuarterCircleOrifice => "ISO 15377 quarter-circle orifice",
            Self::Iso15377ConicalOrifice => "ISO 15377 conical orifice",
            Self::MillerOrifice => "Miller orifice",
            Self::MillerEccentricOrifice => "Miller eccentric orifice",
            Self::MillerSegmentalOrifice => "Miller segmental orifice",
            Self::MillerConicalOrifice => "Miller conical orifice",
            Self::MillerQuarterCircleOrifice => "Miller quarter circle orifice",
            Self::HollingsheadOrifice => "Hollingshead orifice",
            Self::LongRadiusNozzle => "long radius nozzle",
            Self::Isa1932Nozzle => "ISA 1932 nozzle",
            Self::VenturiNozzle => "venuri nozzle",
            Self::AsCastConvergentVenturiTube => "as cast convergent venturi tube",
            Self::MachinedConvergentVenturiTube => "machined convergent venturi tube",
            Self::RoughWeldedConvergentVenturiTube => "rough welded convergent venturi tube",
            Self::HollingsheadVenturiSmooth => "Hollingshead venturi smooth",
            Self::HollingsheadVenturiSharp => "Hollingshead venturi sharp",
            Self::ConeMeter => "cone meter",
            Self::HollingsheadVCone => "Hollingshead v cone",
            Self::WedgeMeter => "wedge meter",
            Self::HollingsheadWedge => "Hollingshead wedge",
            Self::UnspecifiedMeter => "unspecified meter",
        }
    }

    pub fn family(self) -> MeterFamily {
        match self {
            Self::Orifice
            | Self::EccentricOrifice
            | Self::ConicalOrifice
            | Self::SegmentalOrifice
            | Self::QuarterCircleOrifice
            | Self::Iso5167Orifice
            | Self::Iso15377EccentricOrifice
            | Self::Iso15377QuarterCircleOrifice
            | Self::Iso15377ConicalOrifice
            | Self::MillerOrifice
            | Self::MillerEccentricOrifice
            | Self::MillerSegmentalOrifice
            | Self::MillerConicalOrifice
            | Self::MillerQuarterCircleOrifice
            | Self::HollingsheadOrifice => MeterFamily::Orifice,
            Self::LongRadiusNozzle | Self::Isa1932Nozzle | Self::VenturiNozzle => {
                MeterFamily::Nozzle
            }
            Self::AsCastConvergentVenturiTube
            | Self::MachinedConvergentVenturiTube
            | Self::RoughWeldedConvergentVenturiTube
            | Self::HollingsheadVenturiSmooth
            | Self::HollingsheadVenturiSharp => MeterFamily::Venturi,
            Self::ConeMeter | Self::HollingsheadVCone => MeterFamily::Cone,
            Self::WedgeMeter | Self::HollingsheadWedge => MeterFamily::Wedge,
            Self::UnspecifiedMeter => MeterFamily::Unspecified,
        }
    }

    /// Eccentric-bore orifices need a tap position; nothing else does.
    pub fn is_eccentric(self) -> bool {
        matches!(
            self,
            Self::EccentricOrifice | Self::MillerEccentricOrifice | Self::Iso15377EccentricOrifice
        )
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MeterType {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        // "venturi nozzle" is accepted as well as the solver's own spelling
        if wanted.eq_ignore_ascii_case("venturi nozzle") {
            return Ok(Self::VenturiNozzle);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MeterError::UnknownChoice {
                what: "meter type",
                text: s.to_string(),
            })
    }
}

/// Pressure tap arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TapType {
    #[serde(rename = "corner")]
    Corner,
    #[serde(rename = "flange")]
    Flange,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D/2")]
    DHalf,
}

impl TapType {
    pub const ALL: [TapType; 4] = [TapType::Corner, TapType::Flange, TapType::D, TapType::DHalf];

    pub fn label(self) -> &'static str {
        match self {
            Self::Corner => "corner",
            Self::Flange => "flange",
            Self::D => "D",
            Self::DHalf => "D/2",
        }
    }
}

impl fmt::Display for TapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TapType {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MeterError::UnknownChoice {
                what: "tap type",
                text: s.to_string(),
            })
    }
}

/// Angular position of the taps relative to an eccentric bore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TapPosition {
    #[default]
    #[serde(rename = "180 degree")]
    Opposite,
    #[serde(rename = "90 degree")]
    Side,
}

impl TapPosition {
    pub const ALL: [TapPosition; 2] = [TapPosition::Opposite, TapPosition::Side];

    pub fn label(self) -> &'static str {
        match self {
            Self::Opposite => "180 degree",
            Self::Side => "90 degree",
        }
    }
}

impl fmt::Display for TapPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TapPosition {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        match wanted {
            "180" | "180°" => return Ok(Self::Opposite),
            "90" | "90°" => return Ok(Self::Side),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MeterError::UnknownChoice {
                what: "tap position",
                text: s.to_string(),
            })
    }
}

/// Meter, taps, and the tap position the solver will actually receive.
///
/// `tap_position` is `Some` exactly when the meter is eccentric. The requested
/// position is dropped for every other meter, so a value left over from an
/// earlier eccentric selection can never reach the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeterSelection {
    meter_type: MeterType,
    tap_type: TapType,
    tap_position: Option<TapPosition>,
}

impl MeterSelection {
    pub fn new(meter_type: MeterType, tap_type: TapType, requested: Option<TapPosition>) -> Self {
        let tap_position = if meter_type.is_eccentric() {
            Some(requested.unwrap_or_default())
        } else {
            None
        };
        Self {
            meter_type,
            tap_type,
            tap_position,
        }
    }

    pub fn meter_type(&self) -> MeterType {
        self.meter_type
    }

    pub fn tap_type(&self) -> TapType {
        self.tap_type
    }

    pub fn tap_position(&self) -> Option<TapPosition> {
        self.tap_position
    }

    /// Whether the tap position input is meaningful for this selection.
    pub fn tap_position_enabled(&self) -> bool {
        self.meter_type.is_eccentric()
    }
}

impl Default for MeterSelection {
    fn default() -> Self {
        Self::new(MeterType::Iso5167Orifice, TapType::Flange, None)
    }
}

impl fmt::Display for MeterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} taps", self.meter_type, self.tap_type)?;
        if let Some(pos) = self.tap_position {
            write!(f, ", {}", pos)?;
        }
        write!(f, ")")
    }
}
