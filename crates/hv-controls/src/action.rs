//! Control action polarity.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sign convention relating the measured error to the output direction.
///
/// - **Direct**: output rises as the process variable rises above setpoint
///   (cooling: warmer room, more airflow).
/// - **Reverse**: output rises as the process variable falls below setpoint
///   (heating).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    #[default]
    Direct,
    Reverse,
}

impl ControlAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlAction::Direct => "direct",
            ControlAction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlAction {
    type Err = ControlError;

    fn from_str(s: &str) -> ControlResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(ControlAction::Direct),
            "reverse" => Ok(ControlAction::Reverse),
            _ => Err(ControlError::InvalidConfiguration {
                what: "action must be 'direct' or 'reverse'",
            }),
        }
    }
}
