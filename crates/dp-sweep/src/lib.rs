//! dp-sweep: parameter model, unit conversions and the dP sweep engine.
//!
//! Validated [`ParameterModel`] snapshots go in, a [`SweepResult`] with every
//! flow channel precomputed comes out. [`PhaseMode`] picks which channel is
//! primary without touching the numbers.

pub mod conversions;
pub mod error;
pub mod parameters;
pub mod phase;
pub mod sweep_executor;
pub mod sweeps;
pub mod units;

pub use conversions::{
    GasFlowUnit, base_corrected_liquid_flow, gas_standard_flow, liquid_standard_flow,
};
pub use error::{InputError, InputResult, SampleError, SweepError};
pub use parameters::{
    DpRange, Field, MIN_DP_IN_H2O, MIN_DP_RELATIVE_SPAN, ParameterModel, RawParameters,
    parse_selection, parse_tap_position,
};
pub use phase::{Channel, PhaseMode};
pub use sweep_executor::{
    FlowSample, SweepPoint, SweepProgress, SweepResult, run_sweep, run_sweep_with_progress,
};
pub use sweeps::{DEFAULT_STEPS, MAX_STEPS, SweepSettings, log_points};
pub use units::{Quantity, UnitError, parse_quantity};
