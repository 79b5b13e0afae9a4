//! Parameter model: the validated snapshot one sweep reads.
//!
//! Raw text from the parameter surface enters through [`RawParameters`] or a
//! single-field edit. Every edit returns a new [`ParameterModel`]; a model is
//! never changed in place, so a sweep always sees one consistent snapshot.

use crate::error::{InputError, InputResult};
use crate::phase::PhaseMode;
use crate::units::{Quantity, parse_quantity};
use dp_core::ensure_positive;
use dp_core::units::{centipoise, in_h2o, inch, kg_per_m3, psig};
use dp_meters::{MeterInputs, MeterSelection, MeterType, TapPosition, TapType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Smallest accepted lower bound of the dP range, inches H2O.
pub const MIN_DP_IN_H2O: f64 = 1e-3;

/// Smallest accepted `max / min - 1` of the dP range.
///
/// Keeps every point of the largest sweep distinct and strictly increasing.
pub const MIN_DP_RELATIVE_SPAN: f64 = 1e-6;

/// Scalar inputs of the parameter model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UpstreamPressure,
    Density,
    Viscosity,
    IsentropicExponent,
    BaseDensity,
    MolecularWeight,
    OrificeDiameter,
    PipeDiameter,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::UpstreamPressure,
        Field::Density,
        Field::Viscosity,
        Field::IsentropicExponent,
        Field::BaseDensity,
        Field::MolecularWeight,
        Field::OrificeDiameter,
        Field::PipeDiameter,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::UpstreamPressure => "upstream_pressure",
            Self::Density => "density",
            Self::Viscosity => "viscosity",
            Self::IsentropicExponent => "isentropic_exponent",
            Self::BaseDensity => "base_density",
            Self::MolecularWeight => "molecular_weight",
            Self::OrificeDiameter => "orifice_diameter",
            Self::PipeDiameter => "pipe_diameter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpstreamPressure => "Upstream pressure [psig]",
            Self::Density => "Density [kg/m3]",
            Self::Viscosity => "Viscosity [cP]",
            Self::IsentropicExponent => "Isentropic exponent",
            Self::BaseDensity => "Base density [kg/m3]",
            Self::MolecularWeight => "Molecular weight [g/mol]",
            Self::OrificeDiameter => "Orifice diameter [in]",
            Self::PipeDiameter => "Pipe diameter [in]",
        }
    }

    pub fn quantity(self) -> Quantity {
        match self {
            Self::UpstreamPressure => Quantity::GaugePressure,
            Self::Density | Self::BaseDensity => Quantity::Density,
            Self::Viscosity => Quantity::Viscosity,
            Self::IsentropicExponent => Quantity::Dimensionless,
            Self::MolecularWeight => Quantity::MolecularWeight,
            Self::OrificeDiameter | Self::PipeDiameter => Quantity::Diameter,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                InputError::UnknownChoice(dp_meters::MeterError::UnknownChoice {
                    what: "parameter",
                    text: s.to_string(),
                })
            })
    }
}

/// Untrusted parameter text, as typed into the parameter surface.
///
/// Defaults are the dashboard defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParameters {
    pub upstream_pressure: String,
    pub density: String,
    pub viscosity: String,
    pub isentropic_exponent: String,
    pub base_density: String,
    pub molecular_weight: String,
    pub orifice_diameter: String,
    pub pipe_diameter: String,
    pub dp_min: String,
    pub dp_max: String,
    pub meter_type: String,
    pub tap_type: String,
    /// Ignored unless the meter is eccentric; empty means unset.
    pub tap_position: String,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            upstream_pressure: "100".into(),
            density: "775".into(),
            viscosity: "1".into(),
            isentropic_exponent: "1".into(),
            base_density: "1000".into(),
            molecular_weight: "2".into(),
            orifice_diameter: "0.75980".into(),
            pipe_diameter: "2.066141".into(),
            dp_min: "1".into(),
            dp_max: "250".into(),
            meter_type: MeterType::Iso5167Orifice.label().into(),
            tap_type: TapType::Flange.label().into(),
            tap_position: TapPosition::Opposite.label().into(),
        }
    }
}

impl RawParameters {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::UpstreamPressure => &self.upstream_pressure,
            Field::Density => &self.density,
            Field::Viscosity => &self.viscosity,
            Field::IsentropicExponent => &self.isentropic_exponent,
            Field::BaseDensity => &self.base_density,
            Field::MolecularWeight => &self.molecular_weight,
            Field::OrificeDiameter => &self.orifice_diameter,
            Field::PipeDiameter => &self.pipe_diameter,
        }
    }
}

/// Differential-pressure sweep bounds, inches H2O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpRange {
    min: f64,
    max: f64,
}

impl DpRange {
    pub fn new(min: f64, max: f64) -> InputResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(InputError::InvalidRange {
                min,
                max,
                reason: "bounds must be finite",
            });
        }
        if min < MIN_DP_IN_H2O {
            return Err(InputError::InvalidRange {
                min,
                max,
                reason: "minimum is below 0.001 inH2O",
            });
        }
        if max <= min {
            return Err(InputError::InvalidRange {
                min,
                max,
                reason: "maximum must exceed minimum",
            });
        }
        if max < min * (1.0 + MIN_DP_RELATIVE_SPAN) {
            return Err(InputError::InvalidRange {
                min,
                max,
                reason: "bounds are too close to give distinct sweep points",
            });
        }
        Ok(Self { min, max })
    }

    /// Parse both bounds from text (inH2O, unit suffix optional).
    pub fn parse(min_text: &str, max_text: &str) -> InputResult<Self> {
        let min = parse_field_text("dP minimum", min_text, Quantity::Differential)?;
        let max = parse_field_text("dP maximum", max_text, Quantity::Differential)?;
        Self::new(min, max)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Parse meter, taps and tap position text into a normalized selection.
///
/// The tap position text is only read for eccentric meters, so a stale or
/// even unparseable position never blocks selecting a concentric meter.
pub fn parse_selection(
    meter_text: &str,
    taps_text: &str,
    position_text: &str,
) -> InputResult<MeterSelection> {
    let meter: MeterType = meter_text.parse()?;
    let taps: TapType = taps_text.parse()?;
    let requested = if meter.is_eccentric() {
        parse_tap_position(position_text)?
    } else {
        None
    };
    Ok(MeterSelection::new(meter, taps, requested))
}

/// Empty text means "unset".
pub fn parse_tap_position(text: &str) -> InputResult<Option<TapPosition>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(text.parse()?))
}

fn parse_field_text(name: &'static str, text: &str, quantity: Quantity) -> InputResult<f64> {
    let value = parse_quantity(text, quantity).map_err(|source| InputError::Unit {
        field: name,
        source,
    })?;
    ensure_positive(value, name).map_err(|e| InputError::from_core(name, e))
}

/// Validated, immutable inputs of one sweep.
///
/// Magnitudes are stored in the engineer's display units (psig, kg/m³, cP,
/// inches, g/mol) and converted to SI only when solver inputs are built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel {
    upstream_pressure_psig: f64,
    density_kg_m3: f64,
    viscosity_cp: f64,
    isentropic_exponent: f64,
    base_density_kg_m3: f64,
    molecular_weight: f64,
    orifice_diameter_in: f64,
    pipe_diameter_in: f64,
    dp_range_in_h2o: DpRange,
    selection: MeterSelection,
    /// Selects channels only; never part of the fingerprint.
    phase_mode: PhaseMode,
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self {
            upstream_pressure_psig: 100.0,
            density_kg_m3: 775.0,
            viscosity_cp: 1.0,
            isentropic_exponent: 1.0,
            base_density_kg_m3: 1000.0,
            molecular_weight: 2.0,
            orifice_diameter_in: 0.7598,
            pipe_diameter_in: 2.066141,
            dp_range_in_h2o: DpRange {
                min: 1.0,
                max: 250.0,
            },
            selection: MeterSelection::default(),
            phase_mode: PhaseMode::Gas,
        }
    }
}

impl ParameterModel {
    /// Validate every raw field. Fails on the first bad field.
    pub fn from_raw(raw: &RawParameters, phase_mode: PhaseMode) -> InputResult<Self> {
        let mut model = Self {
            phase_mode,
            dp_range_in_h2o: DpRange::parse(&raw.dp_min, &raw.dp_max)?,
            selection: parse_selection(&raw.meter_type, &raw.tap_type, &raw.tap_position)?,
            ..Self::default()
        };
        for field in Field::ALL {
            let value = parse_field_text(field.key(), raw.field(field), field.quantity())?;
            model.set(field, value);
        }
        Ok(model)
    }

    /// Back to raw text, for writing a config template.
    pub fn to_raw(&self) -> RawParameters {
        RawParameters {
            upstream_pressure: self.upstream_pressure_psig.to_string(),
            density: self.density_kg_m3.to_string(),
            viscosity: self.viscosity_cp.to_string(),
            isentropic_exponent: self.isentropic_exponent.to_string(),
            base_density: self.base_density_kg_m3.to_string(),
            molecular_weight: self.molecular_weight.to_string(),
            orifice_diameter: self.orifice_diameter_in.to_string(),
            pipe_diameter: self.pipe_diameter_in.to_string(),
            dp_min: self.dp_range_in_h2o.min.to_string(),
            dp_max: self.dp_range_in_h2o.max.to_string(),
            meter_type: self.selection.meter_type().label().into(),
            tap_type: self.selection.tap_type().label().into(),
            tap_position: self
                .selection
                .tap_position()
                .map(|p| p.label().to_string())
                .unwrap_or_default(),
        }
    }

    /// Copy with one field replaced from raw text.
    ///
    /// Fields the current phase disables are rejected.
    pub fn with_field(&self, field: Field, text: &str) -> InputResult<Self> {
        if !self.phase_mode.is_field_enabled(field) {
            return Err(InputError::FieldDisabled {
                field: field.key(),
                phase: self.phase_mode,
            });
        }
        let value = parse_field_text(field.key(), text, field.quantity())?;
        let mut next = self.clone();
        next.set(field, value);
        Ok(next)
    }

    pub fn with_dp_range(&self, range: DpRange) -> Self {
        Self {
            dp_range_in_h2o: range,
            ..self.clone()
        }
    }

    pub fn with_selection(&self, selection: MeterSelection) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    pub fn with_phase(&self, phase_mode: PhaseMode) -> Self {
        Self {
            phase_mode,
            ..self.clone()
        }
    }

    fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::UpstreamPressure => &mut self.upstream_pressure_psig,
            Field::Density => &mut self.density_kg_m3,
            Field::Viscosity => &mut self.viscosity_cp,
            Field::IsentropicExponent => &mut self.isentropic_exponent,
            Field::BaseDensity => &mut self.base_density_kg_m3,
            Field::MolecularWeight => &mut self.molecular_weight,
            Field::OrificeDiameter => &mut self.orifice_diameter_in,
            Field::PipeDiameter => &mut self.pipe_diameter_in,
        };
        *slot = value;
    }

    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::UpstreamPressure => self.upstream_pressure_psig,
            Field::Density => self.density_kg_m3,
            Field::Viscosity => self.viscosity_cp,
            Field::IsentropicExponent => self.isentropic_exponent,
            Field::BaseDensity => self.base_density_kg_m3,
            Field::MolecularWeight => self.molecular_weight,
            Field::OrificeDiameter => self.orifice_diameter_in,
            Field::PipeDiameter => self.pipe_diameter_in,
        }
    }

    pub fn dp_range(&self) -> DpRange {
        self.dp_range_in_h2o
    }

    pub fn selection(&self) -> MeterSelection {
        self.selection
    }

    pub fn phase_mode(&self) -> PhaseMode {
        self.phase_mode
    }

    /// Content hash of everything that influences sweep values.
    ///
    /// Phase mode is left out: it only picks which channel is primary.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for field in Field::ALL {
            hasher.update(field.key().as_bytes());
            hasher.update(self.value(field).to_bits().to_le_bytes());
        }
        hasher.update(self.dp_range_in_h2o.min.to_bits().to_le_bytes());
        hasher.update(self.dp_range_in_h2o.max.to_bits().to_le_bytes());

        let position = self
            .selection
            .tap_position()
            .map_or("unset", TapPosition::label);
        for label in [
            self.selection.meter_type().label(),
            self.selection.tap_type().label(),
            position,
        ] {
            hasher.update(label.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// SI solver inputs at one differential pressure.
    pub fn meter_inputs(&self, dp_in_h2o: f64) -> MeterInputs {
        let upstream = psig(self.upstream_pressure_psig);
        MeterInputs {
            pipe_diameter: inch(self.pipe_diameter_in),
            bore_diameter: inch(self.orifice_diameter_in),
            upstream_pressure: upstream,
            downstream_pressure: upstream - in_h2o(dp_in_h2o),
            density: kg_per_m3(self.density_kg_m3),
            viscosity: centipoise(self.viscosity_cp),
            isentropic_exponent: self.isentropic_exponent,
            selection: self.selection,
        }
    }
}
