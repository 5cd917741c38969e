//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or running a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Controller error: {0}")]
    Control(#[from] hv_controls::ControlError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<hv_core::CoreError> for SimError {
    fn from(e: hv_core::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
