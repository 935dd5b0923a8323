//! Shared vocabulary for the Dealflow engine.
//!
//! Core types, configuration, errors, the injected clock, and tracing setup
//! used by every other crate in the workspace.

pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DealflowConfig;
pub use error::{DealflowError, Result};
pub use types::*;
