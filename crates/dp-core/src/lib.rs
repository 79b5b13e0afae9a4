//! dp-core: shared foundation for dpflow.
//!
//! Contains:
//! - units (uom SI types + engineering-unit constructors)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DpError, DpResult};
pub use numeric::*;
pub use units::*;
