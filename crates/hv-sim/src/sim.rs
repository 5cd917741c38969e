//! Closed-loop room simulation.
//!
//! Each cycle: the room model produces the temperature, the controller turns
//! it into an output, and the terminal maps the output to the airflow used on
//! the next cycle.

use crate::airflow::AirflowRange;
use crate::error::{SimError, SimResult};
use crate::record::{CycleRecord, LoopRecord};
use crate::room::RoomModel;
use hv_controls::{Clock, PidController, SampleConfig, SimulatedClock};
use hv_core::units::{as_minutes, s};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How the room model is advanced between cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalStepping {
    /// Evaluate the response from the initial temperature at the total
    /// elapsed time, with the current airflow.
    #[default]
    Anchored,
    /// Evaluate one cycle of response from the previous temperature.
    Incremental,
}

/// Options for closed-loop runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Cycle period (seconds)
    pub dt_s: f64,
    /// Number of control cycles
    pub cycles: usize,
    pub stepping: ThermalStepping,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_s: 60.0,
            cycles: 300,
            stepping: ThermalStepping::default(),
        }
    }
}

/// Run the room/controller loop for `opts.cycles` cycles.
///
/// The loop starts at t = 0 with the airflow for output 0. The controller is
/// stepped exactly once per cycle.
pub fn run_room_loop(
    controller: &mut PidController,
    room: &RoomModel,
    airflow: &AirflowRange,
    opts: &SimOptions,
) -> SimResult<LoopRecord> {
    if opts.cycles == 0 {
        return Err(SimError::InvalidArg {
            what: "cycles must be positive",
        });
    }
    let sample = SampleConfig::new(opts.dt_s)?;
    room.validate()?;
    airflow.validate()?;

    info!(
        cycles = opts.cycles,
        dt_s = opts.dt_s,
        stepping = ?opts.stepping,
        setpoint = controller.setpoint(),
        "starting room loop"
    );

    let mut clock = SimulatedClock::default();
    let mut flow = airflow.setpoint(0.0);
    let mut temp = room.initial_temp_f;
    let mut last_sample = clock.now();
    let mut record = LoopRecord::with_capacity(opts.cycles);

    for cycle in 0..opts.cycles {
        let now = clock.now();
        let pv = match opts.stepping {
            ThermalStepping::Anchored => {
                room.temperature_at(as_minutes(s(now)), flow, room.initial_temp_f)?
            }
            ThermalStepping::Incremental => {
                room.temperature_at(as_minutes(s(now - last_sample)), flow, temp)?
            }
        };
        temp = pv;
        last_sample = now;

        let terms = controller.step(pv, now);
        flow = airflow.setpoint(terms.output);

        debug!(
            cycle,
            time_s = now,
            pv,
            airflow_cfm = flow,
            error = terms.error,
            output = terms.output,
            "room cycle"
        );

        record.push(CycleRecord {
            cycle,
            time_s: now,
            pv,
            airflow_cfm: Some(flow),
            terms,
        });
        clock.tick(&sample)?;
    }

    info!(
        mean_pv = record.mean_pv(),
        final_pv = record.final_pv(),
        saturated = record.saturated_cycles(),
        "room loop finished"
    );
    Ok(record)
}
