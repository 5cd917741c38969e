//! Scenario files: controller tuning, room, terminal and run options in one
//! YAML document.

use crate::airflow::AirflowRange;
use crate::error::SimResult;
use crate::record::LoopRecord;
use crate::room::RoomModel;
use crate::sim::{SimOptions, run_room_loop};
use hv_controls::{PidConfig, PidController};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub controller: PidConfig,
    pub room: RoomModel,
    pub airflow: AirflowRange,
    #[serde(default)]
    pub sim: SimOptions,
}

impl Scenario {
    /// Single office cooled by a 200-600 cfm VAV box, setpoint 70°F.
    pub fn office() -> Self {
        Self {
            name: "office".to_string(),
            controller: PidConfig::new(5.0, 600.0, 0.0).with_setpoint(70.0),
            room: RoomModel {
                volume_ft3: 10.0 * 20.0 * 8.0,
                supply_temp_f: 65.0,
                heat_load_btu_per_hr: 2800.0,
                initial_temp_f: 65.0,
                air: Default::default(),
            },
            airflow: AirflowRange {
                min_cfm: 200.0,
                max_cfm: 600.0,
            },
            sim: SimOptions::default(),
        }
    }

    pub fn from_yaml_str(content: &str) -> SimResult<Self> {
        let scenario: Scenario = serde_yaml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_yaml(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn save_yaml(&self, path: &Path) -> SimResult<()> {
        self.validate()?;
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> SimResult<()> {
        self.controller.validate()?;
        self.room.validate()?;
        self.airflow.validate()?;
        Ok(())
    }

    pub fn build_controller(&self) -> SimResult<PidController> {
        Ok(PidController::new(self.controller.clone())?)
    }

    /// Build a fresh controller and run the closed loop.
    pub fn run(&self) -> SimResult<LoopRecord> {
        let mut controller = self.build_controller()?;
        run_room_loop(&mut controller, &self.room, &self.airflow, &self.sim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::ThermalStepping;
    use hv_controls::ControlAction;

    #[test]
    fn office_is_valid() {
        assert!(Scenario::office().validate().is_ok());
    }

    #[test]
    fn yaml_round_trip() {
        let office = Scenario::office();
        let text = serde_yaml::to_string(&office).unwrap();
        assert_eq!(Scenario::from_yaml_str(&text).unwrap(), office);
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = r#"
name: lab
controller:
  kp: 2.0
  ti: 300.0
  setpoint: 68.0
  action: direct
room:
  volume_ft3: 2400.0
  supply_temp_f: 55.0
  heat_load_btu_per_hr: 6000.0
  initial_temp_f: 72.0
airflow:
  min_cfm: 150.0
  max_cfm: 900.0
sim:
  cycles: 10
  stepping: incremental
"#;
        let scenario = Scenario::from_yaml_str(yaml).unwrap();
        assert_eq!(scenario.controller.action, ControlAction::Direct);
        assert_eq!(scenario.controller.out_max, 100.0);
        assert_eq!(scenario.sim.cycles, 10);
        assert_eq!(scenario.sim.dt_s, 60.0);
        assert_eq!(scenario.sim.stepping, ThermalStepping::Incremental);
        assert_eq!(scenario.room.air.density, 0.0763);
        assert_eq!(scenario.run().unwrap().len(), 10);
    }

    #[test]
    fn invalid_controller_is_rejected() {
        let mut scenario = Scenario::office();
        scenario.controller.ti = 0.0;
        let text = serde_yaml::to_string(&scenario).unwrap();
        assert!(matches!(
            Scenario::from_yaml_str(&text),
            Err(SimError::Control(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(matches!(
            Scenario::from_yaml_str("name: [unterminated"),
            Err(SimError::Yaml(_))
        ));
    }
}
