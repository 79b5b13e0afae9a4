//! dp-app: session layer shared by every shell.
//!
//! A [`Session`] owns one parameter snapshot, the phase mode and the last
//! sweep result, and hands a [`PresentationFrame`] to a
//! [`PresentationAdapter`] after every recompute cycle.

pub mod config;
pub mod error;
pub mod presentation;
pub mod session;

pub use config::{AppConfig, load_config, save_config};
pub use error::{AppError, AppResult};
pub use presentation::{
    DP_COLUMN, FrameRecorder, PresentationAdapter, PresentationFrame, Series, Table, TableKind,
    X_AXIS_LABEL, channel_label, y_axis_label,
};
pub use session::{Session, SessionEvent};
