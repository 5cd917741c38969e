//! Sample clocks for driving a controller.
//!
//! The controller is handed a timestamp on every cycle instead of reading the
//! time itself. Loop drivers own a [`SimulatedClock`] and advance it.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

/// Seconds on the caller's clock (simulated or real).
pub type Timestamp = f64;

/// Source of sample timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Fixed sample period for a control loop.
///
/// Only constructible through [`SampleConfig::new`], so the period is always
/// positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    dt: f64,
}

impl SampleConfig {
    /// Create a new sample configuration.
    ///
    /// # Errors
    ///
    /// Returns error if `dt` is not positive and finite.
    pub fn new(dt: f64) -> ControlResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "sample period must be positive",
            });
        }
        Ok(Self { dt })
    }

    /// Sample period in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

/// Clock that only moves when the loop driver advances it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedClock {
    now: Timestamp,
}

impl SimulatedClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move the clock forward by `dt` seconds and return the new time.
    pub fn advance(&mut self, dt: f64) -> ControlResult<Timestamp> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "clock step must be positive",
            });
        }
        self.now += dt;
        Ok(self.now)
    }

    /// Advance by one configured sample period.
    pub fn tick(&mut self, config: &SampleConfig) -> ControlResult<Timestamp> {
        self.advance(config.dt)
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_creation() {
        let config = SampleConfig::new(0.1).unwrap();
        assert_eq!(config.dt(), 0.1);
    }

    #[test]
    fn sample_config_rejects_non_positive() {
        assert!(SampleConfig::new(0.0).is_err());
        assert!(SampleConfig::new(-1.0).is_err());
        assert!(SampleConfig::new(f64::NAN).is_err());
        assert!(SampleConfig::new(f64::INFINITY).is_err());
    }

    #[test]
    fn simulated_clock_advances() {
        let mut clock = SimulatedClock::new(5.0);
        assert_eq!(clock.now(), 5.0);
        assert_eq!(clock.advance(2.5).unwrap(), 7.5);

        let config = SampleConfig::new(0.5).unwrap();
        assert_eq!(clock.tick(&config).unwrap(), 8.0);
        assert_eq!(clock.now(), 8.0);
    }

    #[test]
    fn simulated_clock_rejects_backward_step() {
        let mut clock = SimulatedClock::default();
        assert!(clock.advance(-1.0).is_err());
        assert!(clock.advance(0.0).is_err());
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn tick_only_moves_forward() {
        // Every SampleConfig passed validation, so ticking never rewinds.
        let mut clock = SimulatedClock::new(1.0);
        let config = SampleConfig::new(0.25).unwrap();
        let mut last = clock.now();
        for _ in 0..8 {
            let now = clock.tick(&config).unwrap();
            assert!(now > last);
            last = now;
        }
        assert_eq!(clock.now(), 3.0);
    }
}
