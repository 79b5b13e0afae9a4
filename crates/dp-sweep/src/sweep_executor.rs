//! Sweep execution: one solver call per dP point, every channel derived.
//!
//! Gas and liquid conversions are both applied to each successful point, so
//! a phase change only re-selects a channel and never needs another sweep.

use crate::conversions::{
    GasFlowUnit, base_corrected_liquid_flow, gas_standard_flow, liquid_standard_flow,
};
use crate::error::SampleError;
use crate::parameters::{Field, ParameterModel};
use crate::phase::Channel;
use crate::sweeps::{SweepSettings, log_points};
use dp_meters::MeterSolver;
use tracing::{debug, warn};

/// Derived flow values at one dP point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSample {
    pub mass_flow_kg_s: f64,
    /// In the sweep's [`GasFlowUnit`]
    pub gas_standard: f64,
    pub liquid_volume_mbpd: f64,
    pub liquid_base_mbpd: f64,
}

impl FlowSample {
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::MassFlow => self.mass_flow_kg_s,
            Channel::GasStandard => self.gas_standard,
            Channel::LiquidVolume => self.liquid_volume_mbpd,
            Channel::LiquidBase => self.liquid_base_mbpd,
        }
    }
}

/// One dP point; `sample` is the error when the solver or a conversion failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub dp_in_h2o: f64,
    pub sample: Result<FlowSample, SampleError>,
}

impl SweepPoint {
    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.sample.as_ref().ok().map(|s| s.value(channel))
    }
}

/// Progress of a running sweep, reported after each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepProgress {
    pub index: usize,
    pub total: usize,
    pub dp_in_h2o: f64,
    pub succeeded: bool,
}

/// Complete output of one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Fingerprint of the parameter snapshot this was computed from
    pub fingerprint: String,
    pub settings: SweepSettings,
    /// Ordered by increasing dP
    pub points: Vec<SweepPoint>,
    /// Number of successful points
    pub num_successful: usize,
    /// Number of failed points
    pub num_failed: usize,
}

impl SweepResult {
    pub fn gas_unit(&self) -> GasFlowUnit {
        self.settings.gas_unit()
    }

    pub fn dp_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.dp_in_h2o).collect()
    }

    /// One entry per point, `None` where the point failed.
    pub fn series(&self, channel: Channel) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value(channel)).collect()
    }

    /// (dP, value) pairs of successful points only, for plotting.
    pub fn curve(&self, channel: Channel) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .filter_map(|p| p.value(channel).map(|v| [p.dp_in_h2o, v]))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.num_failed == 0
    }

    /// Whether this result was computed from `params`.
    pub fn matches(&self, params: &ParameterModel) -> bool {
        self.fingerprint == params.fingerprint()
    }
}

/// Sweep `params` across its dP range.
///
/// A point whose solver call fails is kept with its error; the sweep always
/// returns `settings.num_points()` points.
pub fn run_sweep(
    params: &ParameterModel,
    settings: &SweepSettings,
    solver: &dyn MeterSolver,
) -> SweepResult {
    run_sweep_with_progress(params, settings, solver, None)
}

pub fn run_sweep_with_progress(
    params: &ParameterModel,
    settings: &SweepSettings,
    solver: &dyn MeterSolver,
    mut progress_cb: Option<&mut dyn FnMut(SweepProgress)>,
) -> SweepResult {
    let dps = log_points(params.dp_range(), settings.steps());
    let total = dps.len();
    debug!(
        solver = solver.name(),
        selection = %params.selection(),
        points = total,
        dp_min = params.dp_range().min(),
        dp_max = params.dp_range().max(),
        "sweep started"
    );

    let mut points = Vec::with_capacity(total);
    let mut num_successful = 0;
    let mut num_failed = 0;

    for (index, dp_in_h2o) in dps.into_iter().enumerate() {
        let sample = sample_at(params, dp_in_h2o, solver, settings.gas_unit());
        match &sample {
            Ok(_) => num_successful += 1,
            Err(e) => {
                warn!(index, dp_in_h2o, error = %e, "sweep point failed");
                num_failed += 1;
            }
        }

        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(SweepProgress {
                index,
                total,
                dp_in_h2o,
                succeeded: sample.is_ok(),
            });
        }

        points.push(SweepPoint { dp_in_h2o, sample });
    }

    debug!(num_successful, num_failed, "sweep finished");

    SweepResult {
        fingerprint: params.fingerprint(),
        settings: *settings,
        points,
        num_successful,
        num_failed,
    }
}

fn sample_at(
    params: &ParameterModel,
    dp_in_h2o: f64,
    solver: &dyn MeterSolver,
    gas_unit: GasFlowUnit,
) -> Result<FlowSample, SampleError> {
    let inputs = params.meter_inputs(dp_in_h2o);
    let mass_flow_kg_s = solver.mass_flow(&inputs)?.value;

    let density = params.value(Field::Density);
    Ok(FlowSample {
        mass_flow_kg_s,
        gas_standard: gas_standard_flow(
            mass_flow_kg_s,
            params.value(Field::MolecularWeight),
            gas_unit,
        )?,
        liquid_volume_mbpd: liquid_standard_flow(mass_flow_kg_s, density)?,
        liquid_base_mbpd: base_corrected_liquid_flow(
            mass_flow_kg_s,
            density,
            params.value(Field::BaseDensity),
        )?,
    })
}
