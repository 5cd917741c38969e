//! Integration test: random-measurement demo loop.
//!
//! Mirrors the bench demo: reverse acting, Kp = 1, Ti = 1 s, setpoint 72°F,
//! 2°F deadband, measurements uniform in [66, 74] every 1-3 s.

use hv_controls::{ControlAction, PidConfig, PidController};
use hv_sim::{NoiseOptions, run_noise_loop};

fn bench_controller() -> PidController {
    let config = PidConfig::new(1.0, 1.0, 0.0)
        .with_setpoint(72.0)
        .with_deadband(2.0)
        .with_action(ControlAction::Reverse);
    PidController::new(config).unwrap()
}

#[test]
fn same_seed_same_trace() {
    let opts = NoiseOptions {
        seed: 42,
        ..Default::default()
    };
    let a = run_noise_loop(&mut bench_controller(), &opts).unwrap();
    let b = run_noise_loop(&mut bench_controller(), &opts).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 20);
}

#[test]
fn samples_respect_ranges() {
    let opts = NoiseOptions {
        cycles: 50,
        seed: 7,
        ..Default::default()
    };
    let record = run_noise_loop(&mut bench_controller(), &opts).unwrap();

    let mut last_time = None;
    for c in record.iter() {
        assert!((66.0..=74.0).contains(&c.pv));
        assert!((0.0..=100.0).contains(&c.terms.output));
        assert!(c.airflow_cfm.is_none());
        // Reverse acting with the band shifted down by 1°F.
        assert!((c.terms.error - (71.0 - c.pv)).abs() < 1e-12);
        if let Some(prev) = last_time {
            let gap: f64 = c.time_s - prev;
            assert!((1.0 - 1e-9..=3.0 + 1e-9).contains(&gap));
        }
        last_time = Some(c.time_s);
    }
}

#[test]
fn persistent_cold_room_winds_up_integral() {
    // Every sample below the band: the reverse-acting integral keeps growing.
    let opts = NoiseOptions {
        cycles: 30,
        pv_min: 60.0,
        pv_max: 65.0,
        seed: 3,
        ..Default::default()
    };
    let mut pid = bench_controller();
    let record = run_noise_loop(&mut pid, &opts).unwrap();

    let integrals: Vec<f64> = record.iter().map(|c| c.terms.integral).collect();
    assert!(integrals.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(record.cycles.last().unwrap().terms.output, 100.0);
}
