//! dp-meters: differential-pressure meter catalog and solver seam.
//!
//! Provides:
//! - The closed meter catalog (`MeterType`, `TapType`, `TapPosition`)
//! - `MeterSelection`, which only carries a tap position for eccentric orifices
//! - The `MeterSolver` trait every backend implements
//! - `NominalCoefficientMeter`, a simple reference solver
//!
//! # Example
//!
//! ```
//! use dp_meters::{MeterInputs, MeterSelection, MeterSolver, MeterType, NominalCoefficientMeter, TapType};
//! use dp_core::units::{centipoise, in_h2o, inch, kg_per_m3, psig};
//!
//! let p1 = psig(100.0);
//! let inputs = MeterInputs {
//!     pipe_diameter: inch(2.066141),
//!     bore_diameter: inch(0.7598),
//!     upstream_pressure: p1,
//!     downstream_pressure: p1 - in_h2o(50.0),
//!     density: kg_per_m3(775.0),
//!     viscosity: centipoise(1.0),
//!     isentropic_exponent: 1.1,
//!     selection: MeterSelection::new(MeterType::Iso5167Orifice, TapType::Flange, None),
//! };
//!
//! let mdot = NominalCoefficientMeter::new().mass_flow(&inputs).unwrap();
//! println!("Mass flow: {} kg/s", mdot.value);
//! ```

pub mod catalog;
pub mod common;
pub mod error;
pub mod nominal;
pub mod traits;

// Re-exports
pub use catalog::{MeterFamily, MeterSelection, MeterType, TapPosition, TapType};
pub use error::{MeterError, MeterResult};
pub use nominal::NominalCoefficientMeter;
pub use traits::{MeterInputs, MeterSolver};
