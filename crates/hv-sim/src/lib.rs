//! Closed-loop room simulation for hvacsim.
//!
//! Provides:
//! - First-order room thermal response (`room`)
//! - Controller output to cooling airflow mapping (`airflow`)
//! - Fixed-period closed-loop runner on a simulated clock (`sim`)
//! - Random-measurement demo loop (`noise`)
//! - Per-cycle traces with CSV export (`record`)
//! - YAML scenario files bundling all of the above (`scenario`)

pub mod airflow;
pub mod error;
pub mod noise;
pub mod record;
pub mod room;
pub mod scenario;
pub mod sim;

pub use airflow::{AirflowRange, airflow_setpoint};
pub use error::{SimError, SimResult};
pub use noise::{NoiseOptions, run_noise_loop};
pub use record::{CycleRecord, LoopRecord};
pub use room::{AirProperties, RoomModel, room_temperature, time_constant};
pub use scenario::Scenario;
pub use sim::{SimOptions, ThermalStepping, run_room_loop};
