//! PID controller.
//!
//! Positional PID with:
//! - Trapezoidal integration of error over the measured sample interval
//! - Derivative on error over a fixed nominal step
//! - Direct/reverse action with a one-sided deadband offset
//! - Output clamping
//!
//! The sample timestamp is an argument of [`PidController::output`], which is
//! the only operation that advances state. Everything else is a pure read.

use crate::action::ControlAction;
use crate::clock::Timestamp;
use crate::error::{ControlError, ControlResult};
use hv_core::numeric::{ensure_finite, ensure_positive, saturate};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Nominal derivative step (seconds) when none is configured.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 0.1;

fn default_out_max() -> f64 {
    100.0
}

fn default_derivative_step() -> f64 {
    DEFAULT_DERIVATIVE_STEP
}

/// PID controller configuration.
///
/// `ki` and `kd` are derived at construction as `kp / ti` and `kp * td`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f64,
    /// Integral time (seconds). Must be non-zero.
    pub ti: f64,
    /// Derivative time (seconds). Zero disables derivative action.
    #[serde(default)]
    pub td: f64,
    /// Constant term added to the output.
    #[serde(default)]
    pub bias: f64,
    /// Width of the tolerance band around the setpoint.
    #[serde(default)]
    pub deadband: f64,
    /// Target value for the process variable.
    #[serde(default)]
    pub setpoint: f64,
    /// Minimum output value.
    #[serde(default)]
    pub out_min: f64,
    /// Maximum output value.
    #[serde(default = "default_out_max")]
    pub out_max: f64,
    /// Error sign convention.
    #[serde(default)]
    pub action: ControlAction,
    /// Denominator of the derivative difference quotient (seconds).
    #[serde(default = "default_derivative_step")]
    pub derivative_step: f64,
}

impl PidConfig {
    /// Configuration with the given tuning and default everything else:
    /// zero bias, deadband and setpoint, output in `[0, 100]`, direct action.
    pub fn new(kp: f64, ti: f64, td: f64) -> Self {
        Self {
            kp,
            ti,
            td,
            bias: 0.0,
            deadband: 0.0,
            setpoint: 0.0,
            out_min: 0.0,
            out_max: default_out_max(),
            action: ControlAction::Direct,
            derivative_step: DEFAULT_DERIVATIVE_STEP,
        }
    }

    pub fn with_setpoint(mut self, setpoint: f64) -> Self {
        self.setpoint = setpoint;
        self
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_deadband(mut self, deadband: f64) -> Self {
        self.deadband = deadband;
        self
    }

    pub fn with_output_limits(mut self, out_min: f64, out_max: f64) -> Self {
        self.out_min = out_min;
        self.out_max = out_max;
        self
    }

    pub fn with_action(mut self, action: ControlAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_derivative_step(mut self, step: f64) -> Self {
        self.derivative_step = step;
        self
    }

    /// Check every invariant the controller relies on.
    pub fn validate(&self) -> ControlResult<()> {
        validate_time_constants(self.kp, self.ti, self.td)?;
        finite(self.bias, "bias must be finite")?;
        finite(self.deadband, "deadband must be finite")?;
        finite(self.setpoint, "setpoint must be finite")?;
        // Infinite limits are allowed (unbounded output); NaN and inverted are not.
        if !(self.out_min <= self.out_max) {
            return Err(ControlError::InvalidConfiguration {
                what: "out_min must not exceed out_max",
            });
        }
        ensure_positive(self.derivative_step, "derivative_step").map_err(|_| {
            ControlError::InvalidConfiguration {
                what: "derivative_step must be positive",
            }
        })?;
        Ok(())
    }
}

fn finite(v: f64, what: &'static str) -> ControlResult<f64> {
    ensure_finite(v, what).map_err(|_| ControlError::InvalidConfiguration { what })
}

fn validate_time_constants(kp: f64, ti: f64, td: f64) -> ControlResult<()> {
    finite(kp, "kp must be finite")?;
    finite(ti, "ti must be finite")?;
    if ti == 0.0 {
        return Err(ControlError::InvalidConfiguration {
            what: "ti must be non-zero",
        });
    }
    finite(td, "td must be finite")?;
    Ok(())
}

/// Gains the controller actually computes with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub bias: f64,
}

impl PidGains {
    fn from_time_constants(kp: f64, ti: f64, td: f64, bias: f64) -> Self {
        Self {
            kp,
            ki: kp / ti,
            kd: kp * td,
            bias,
        }
    }
}

/// Direct gain override for [`PidController::tune`].
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub kp: Option<f64>,
    pub ki: Option<f64>,
    pub kd: Option<f64>,
    pub bias: Option<f64>,
}

/// PID controller state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Running integral term (already multiplied by `ki`).
    pub integral: f64,
    /// Error of the last committed sample.
    pub previous_error: f64,
    /// Timestamp of the last committed sample, `None` before the first.
    pub previous_sample_time: Option<Timestamp>,
}

/// Breakdown of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidTerms {
    pub error: f64,
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
    pub bias: f64,
    /// `proportional + integral + derivative + bias` before clamping.
    pub unclamped: f64,
    pub output: f64,
}

impl PidTerms {
    pub fn is_saturated(&self) -> bool {
        self.output != self.unclamped
    }
}

/// Single-loop PID controller.
///
/// # Example
///
/// ```
/// use hv_controls::{ControlAction, PidConfig, PidController};
///
/// let config = PidConfig::new(5.0, 600.0, 0.0)
///     .with_setpoint(70.0)
///     .with_action(ControlAction::Direct);
/// let mut pid = PidController::new(config).unwrap();
///
/// // Room is 2°F warm: direct action asks for more cooling.
/// let out = pid.output(72.0, 0.0);
/// assert_eq!(out, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    gains: PidGains,
    setpoint: f64,
    deadband: f64,
    out_min: f64,
    out_max: f64,
    action: ControlAction,
    derivative_step: f64,
    state: PidState,
}

impl PidController {
    /// Create a controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidConfiguration`] if `ti` is zero, any parameter is
    /// non-finite, `out_min > out_max`, or the derivative step is not positive.
    pub fn new(config: PidConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            gains: PidGains::from_time_constants(config.kp, config.ti, config.td, config.bias),
            setpoint: config.setpoint,
            deadband: config.deadband,
            out_min: config.out_min,
            out_max: config.out_max,
            action: config.action,
            derivative_step: config.derivative_step,
            state: PidState::default(),
        })
    }

    /// Signed control error.
    ///
    /// The deadband shifts the setpoint by half its width on one side only:
    /// up for direct action, down for reverse action.
    pub fn error(&self, pv: f64) -> f64 {
        let half_band = self.deadband / 2.0;
        match self.action {
            ControlAction::Direct => pv - (self.setpoint + half_band),
            ControlAction::Reverse => (self.setpoint - half_band) - pv,
        }
    }

    pub fn proportional(&self, pv: f64) -> f64 {
        self.gains.kp * self.error(pv)
    }

    /// Integral term if a sample of `pv` were committed at `now`.
    ///
    /// Trapezoidal rule over `now - previous_sample_time`; the interval is
    /// zero for the first sample after construction or reset. Returns the
    /// running total, not the increment. Does not modify state.
    pub fn integral(&self, pv: f64, now: Timestamp) -> f64 {
        let dt = self.elapsed(now);
        self.state.integral
            + self.gains.ki * 0.5 * (self.error(pv) + self.state.previous_error) * dt
    }

    /// Derivative term over the fixed nominal step.
    pub fn derivative(&self, pv: f64) -> f64 {
        let de = self.error(pv) - self.state.previous_error;
        self.gains.kd * de / self.derivative_step
    }

    /// All terms of a cycle at `now` without committing it.
    pub fn terms(&self, pv: f64, now: Timestamp) -> PidTerms {
        let error = self.error(pv);
        let proportional = self.proportional(pv);
        let integral = self.integral(pv, now);
        let derivative = self.derivative(pv);
        let bias = self.gains.bias;
        let unclamped = proportional + integral + derivative + bias;
        PidTerms {
            error,
            proportional,
            integral,
            derivative,
            bias,
            unclamped,
            output: saturate(unclamped, self.out_min, self.out_max),
        }
    }

    /// Run one control cycle and return its breakdown.
    ///
    /// Commits the integral, the error and the sample time. Call exactly once
    /// per sample; `pv` must be finite.
    pub fn step(&mut self, pv: f64, now: Timestamp) -> PidTerms {
        if let Some(prev) = self.state.previous_sample_time {
            if now < prev {
                warn!(now, prev, "sample time moved backwards, integrating over zero interval");
            }
        }
        let terms = self.terms(pv, now);
        self.state.integral = terms.integral;
        self.state.previous_error = terms.error;
        self.state.previous_sample_time = Some(now);
        trace!(
            pv,
            now,
            error = terms.error,
            p = terms.proportional,
            i = terms.integral,
            d = terms.derivative,
            output = terms.output,
            "pid step"
        );
        terms
    }

    /// Run one control cycle and return the clamped output.
    pub fn output(&mut self, pv: f64, now: Timestamp) -> f64 {
        self.step(pv, now).output
    }

    /// Clear the integral and previous-sample bookkeeping. Gains are kept.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Overwrite gains directly.
    ///
    /// This bypasses the `ti`/`td` derivation: after overriding `ki` or `kd`
    /// the values no longer follow from the integral and derivative times. Use
    /// [`PidController::retune`] to re-derive them from time constants.
    pub fn tune(&mut self, tuning: Tuning) {
        if let Some(kp) = tuning.kp {
            self.gains.kp = kp;
        }
        if let Some(ki) = tuning.ki {
            self.gains.ki = ki;
        }
        if let Some(kd) = tuning.kd {
            self.gains.kd = kd;
        }
        if let Some(bias) = tuning.bias {
            self.gains.bias = bias;
        }
    }

    /// Re-derive `kp`, `ki`, `kd` from a proportional gain and time constants.
    ///
    /// Same validation as construction; on error the gains are unchanged.
    pub fn retune(&mut self, kp: f64, ti: f64, td: f64) -> ControlResult<()> {
        validate_time_constants(kp, ti, td)?;
        self.gains = PidGains::from_time_constants(kp, ti, td, self.gains.bias);
        Ok(())
    }

    /// Move the setpoint. `None` leaves it unchanged.
    pub fn setpoint_adjust(&mut self, setpoint: Option<f64>) {
        if let Some(sp) = setpoint {
            self.setpoint = sp;
        }
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }

    pub fn action(&self) -> ControlAction {
        self.action
    }

    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    pub fn output_limits(&self) -> (f64, f64) {
        (self.out_min, self.out_max)
    }

    fn elapsed(&self, now: Timestamp) -> f64 {
        match self.state.previous_sample_time {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn action() -> impl Strategy<Value = ControlAction> {
        prop_oneof![Just(ControlAction::Direct), Just(ControlAction::Reverse)]
    }

    proptest! {
        #[test]
        fn output_within_limits(
            kp in -50.0_f64..50.0,
            ti in prop_oneof![-100.0_f64..-0.01, 0.01_f64..100.0],
            td in 0.0_f64..10.0,
            bias in -100.0_f64..100.0,
            deadband in 0.0_f64..5.0,
            setpoint in -100.0_f64..100.0,
            out_min in -100.0_f64..100.0,
            width in 0.0_f64..200.0,
            action in action(),
            samples in prop::collection::vec((-500.0_f64..500.0, 0.01_f64..10.0), 1..30),
        ) {
            let config = PidConfig::new(kp, ti, td)
                .with_bias(bias)
                .with_deadband(deadband)
                .with_setpoint(setpoint)
                .with_output_limits(out_min, out_min + width)
                .with_action(action);
            let mut pid = PidController::new(config).unwrap();

            let mut now = 0.0;
            for (pv, dt) in samples {
                now += dt;
                let out = pid.output(pv, now);
                prop_assert!(out >= out_min && out <= out_min + width);
            }
        }

        #[test]
        fn zero_deadband_error_sign(pv in -1e4_f64..1e4, setpoint in -1e4_f64..1e4) {
            let config = PidConfig::new(1.0, 1.0, 0.0).with_setpoint(setpoint);
            let direct = PidController::new(config.clone()).unwrap();
            let reverse = PidController::new(config.with_action(ControlAction::Reverse)).unwrap();
            prop_assert_eq!(direct.error(pv), pv - setpoint);
            prop_assert_eq!(reverse.error(pv), setpoint - pv);
        }
    }
}
