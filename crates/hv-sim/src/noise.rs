//! Open-loop demo with random measurements.
//!
//! Feeds the controller uniformly distributed process-variable samples at
//! random intervals. Useful for eyeballing the integral and deadband behavior
//! without a plant in the loop.

use crate::error::{SimError, SimResult};
use crate::record::{CycleRecord, LoopRecord};
use hv_controls::{Clock, PidController, SimulatedClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options for [`run_noise_loop`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseOptions {
    pub cycles: usize,
    pub pv_min: f64,
    pub pv_max: f64,
    /// Shortest interval between samples (seconds)
    pub dt_min_s: f64,
    /// Longest interval between samples (seconds)
    pub dt_max_s: f64,
    pub seed: u64,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            cycles: 20,
            pv_min: 66.0,
            pv_max: 74.0,
            dt_min_s: 1.0,
            dt_max_s: 3.0,
            seed: 0,
        }
    }
}

impl NoiseOptions {
    pub fn validate(&self) -> SimResult<()> {
        if self.cycles == 0 {
            return Err(SimError::InvalidArg {
                what: "cycles must be positive",
            });
        }
        if !(self.pv_min.is_finite() && self.pv_max.is_finite() && self.pv_min <= self.pv_max) {
            return Err(SimError::InvalidArg {
                what: "pv range must be finite with pv_min <= pv_max",
            });
        }
        if !(self.dt_min_s.is_finite() && self.dt_max_s.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "sample interval range must be finite",
            });
        }
        if !(self.dt_min_s > 0.0 && self.dt_min_s <= self.dt_max_s) {
            return Err(SimError::InvalidArg {
                what: "sample intervals must satisfy 0 < dt_min_s <= dt_max_s",
            });
        }
        // The uniform sampler needs a representable span.
        if !(self.pv_max - self.pv_min).is_finite() {
            return Err(SimError::InvalidArg {
                what: "pv range width must be finite",
            });
        }
        if !(self.dt_max_s - self.dt_min_s).is_finite() {
            return Err(SimError::InvalidArg {
                what: "sample interval range width must be finite",
            });
        }
        Ok(())
    }
}

/// Drive `controller` with random measurements on a simulated clock.
///
/// The same seed always produces the same trace.
pub fn run_noise_loop(controller: &mut PidController, opts: &NoiseOptions) -> SimResult<LoopRecord> {
    opts.validate()?;
    info!(cycles = opts.cycles, seed = opts.seed, "starting noise loop");

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut clock = SimulatedClock::default();
    let mut record = LoopRecord::with_capacity(opts.cycles);

    for cycle in 0..opts.cycles {
        let now = clock.now();
        let pv = rng.gen_range(opts.pv_min..=opts.pv_max);
        let terms = controller.step(pv, now);

        debug!(
            cycle,
            time_s = now,
            pv,
            error = terms.error,
            p = terms.proportional,
            i = terms.integral,
            d = terms.derivative,
            output = terms.output,
            "noise cycle"
        );

        record.push(CycleRecord {
            cycle,
            time_s: now,
            pv,
            airflow_cfm: None,
            terms,
        });
        clock.advance(rng.gen_range(opts.dt_min_s..=opts.dt_max_s))?;
    }

    info!(mean_pv = record.mean_pv(), "noise loop finished");
    Ok(record)
}
