//! Single-loop PID control for hvacsim.
//!
//! The controller regulates one process variable (room temperature) toward a
//! setpoint by producing a bounded command (cooling airflow percentage).
//!
//! # Architecture
//!
//! - [`PidController`] owns tuning, setpoint, action polarity and the
//!   integral/previous-sample state.
//! - Time is supplied by the caller on every cycle as a [`Timestamp`], usually
//!   read from a [`Clock`]. The controller never reads the wall clock itself,
//!   so a simulated clock drives it exactly like a real one.
//! - Only [`PidController::output`] (and [`PidController::step`]) advance
//!   state. The per-term accessors are pure and safe to call for logging.

pub mod action;
pub mod clock;
pub mod controller;
pub mod error;

pub use action::ControlAction;
pub use clock::{Clock, SampleConfig, SimulatedClock, Timestamp};
pub use controller::{PidConfig, PidController, PidGains, PidState, PidTerms, Tuning};
pub use error::{ControlError, ControlResult};
