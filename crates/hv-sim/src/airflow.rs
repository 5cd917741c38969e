//! Controller output to cooling airflow mapping.
//!
//! A VAV terminal turns the loop output (0-100 %) into an airflow setpoint
//! between its minimum and cooling-maximum airflow.

use crate::error::{SimError, SimResult};
use hv_core::numeric::{lerp, saturate};
use hv_core::units::{VolumeRate, as_cfm};
use serde::{Deserialize, Serialize};

/// Airflow for a controller output in `[0, 100]`, clamped to the range ends.
pub fn airflow_setpoint(output: f64, flow_min: f64, flow_max: f64) -> f64 {
    saturate(lerp(output, 0.0, 100.0, flow_min, flow_max), flow_min, flow_max)
}

/// Minimum and cooling-maximum airflow of a terminal unit (cfm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirflowRange {
    pub min_cfm: f64,
    pub max_cfm: f64,
}

impl AirflowRange {
    pub fn new(min_cfm: f64, max_cfm: f64) -> SimResult<Self> {
        let range = Self { min_cfm, max_cfm };
        range.validate()?;
        Ok(range)
    }

    pub fn from_units(min: VolumeRate, max: VolumeRate) -> SimResult<Self> {
        Self::new(as_cfm(min), as_cfm(max))
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.min_cfm.is_finite() && self.max_cfm.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "airflow limits must be finite",
            });
        }
        // The room model divides by airflow.
        if self.min_cfm <= 0.0 {
            return Err(SimError::NonPhysical {
                what: "minimum airflow must be positive",
            });
        }
        if self.min_cfm > self.max_cfm {
            return Err(SimError::InvalidArg {
                what: "minimum airflow must not exceed cooling max airflow",
            });
        }
        Ok(())
    }

    pub fn setpoint(&self, output: f64) -> f64 {
        airflow_setpoint(output, self.min_cfm, self.max_cfm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hv_core::units::cfm;

    #[test]
    fn maps_endpoints() {
        assert_eq!(airflow_setpoint(0.0, 200.0, 600.0), 200.0);
        assert_eq!(airflow_setpoint(100.0, 200.0, 600.0), 600.0);
        assert_eq!(airflow_setpoint(25.0, 200.0, 600.0), 300.0);
    }

    #[test]
    fn clamps_out_of_range_output() {
        assert_eq!(airflow_setpoint(-20.0, 200.0, 600.0), 200.0);
        assert_eq!(airflow_setpoint(150.0, 200.0, 600.0), 600.0);
    }

    #[test]
    fn range_validation() {
        assert!(AirflowRange::new(200.0, 600.0).is_ok());
        assert!(AirflowRange::new(300.0, 300.0).is_ok());
        assert!(matches!(
            AirflowRange::new(600.0, 200.0),
            Err(SimError::InvalidArg { .. })
        ));
        assert!(matches!(
            AirflowRange::new(0.0, 200.0),
            Err(SimError::NonPhysical { .. })
        ));
    }

    #[test]
    fn range_from_units() {
        let range = AirflowRange::from_units(cfm(200.0), cfm(600.0)).unwrap();
        assert!((range.setpoint(50.0) - 400.0).abs() < 1e-6);
    }
}
