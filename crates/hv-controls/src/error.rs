//! Error types for controller operations.

use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring or driving a controller.
///
/// Every failure is configuration-time; once constructed, a controller is a
/// total function of its state and the current measurement.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Controller parameters violate an invariant (zero integral time,
    /// inverted output limits, unknown action token, ...).
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    /// Invalid argument provided to a clock or helper.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
