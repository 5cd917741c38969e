use clap::{Args, Parser, Subcommand, ValueEnum};
use hv_controls::{ControlAction, ControlError, PidConfig, PidController};
use hv_core::units::{as_minutes, cfm, degf, ft3, s};
use hv_sim::{
    AirflowRange, LoopRecord, NoiseOptions, RoomModel, Scenario, SimError, ThermalStepping,
    run_noise_loop, run_room_loop,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Control(#[from] ControlError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "hv-cli")]
#[command(about = "hvacsim CLI - PID room temperature control simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a room cooled by a VAV terminal under PID control
    Room {
        /// Scenario YAML file (defaults to the built-in office)
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Number of control cycles
        #[arg(long)]
        cycles: Option<usize>,
        /// Cycle period in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Room temperature setpoint (°F)
        #[arg(long)]
        setpoint: Option<f64>,
        /// Proportional gain
        #[arg(long)]
        kp: Option<f64>,
        /// Integral time in seconds
        #[arg(long)]
        ti: Option<f64>,
        /// Derivative time in seconds
        #[arg(long)]
        td: Option<f64>,
        #[command(flatten)]
        plant: PlantArgs,
        /// How the room model advances between cycles
        #[arg(long, value_enum)]
        stepping: Option<SteppingArg>,
        /// Output CSV file path for the per-cycle trace
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Feed the controller random measurements at random intervals
    Noise {
        #[arg(long, default_value_t = 20)]
        cycles: usize,
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 72.0)]
        setpoint: f64,
        #[arg(long, default_value_t = 2.0)]
        deadband: f64,
        #[arg(long, default_value_t = 1.0)]
        kp: f64,
        #[arg(long, default_value_t = 1.0)]
        ti: f64,
        #[arg(long, default_value_t = 0.0)]
        td: f64,
        /// Control action: direct or reverse
        #[arg(long, default_value = "reverse")]
        action: String,
        /// Output CSV file path for the per-cycle trace
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate a scenario file
    Check {
        /// Path to the scenario YAML file
        scenario: PathBuf,
    },
    /// Write the built-in office scenario to a file
    Init {
        /// Destination YAML file
        path: PathBuf,
    },
}

/// Room and terminal overrides in imperial units.
#[derive(Args)]
struct PlantArgs {
    /// Room volume (ft³)
    #[arg(long)]
    volume: Option<f64>,
    /// Supply air temperature (°F)
    #[arg(long)]
    supply_temp: Option<f64>,
    /// Room temperature at t = 0 (°F)
    #[arg(long)]
    initial_temp: Option<f64>,
    /// Internal heat load (BTU/hr)
    #[arg(long)]
    heat_load: Option<f64>,
    /// Terminal minimum airflow (cfm)
    #[arg(long)]
    min_cfm: Option<f64>,
    /// Terminal cooling maximum airflow (cfm)
    #[arg(long)]
    max_cfm: Option<f64>,
}

impl PlantArgs {
    /// Rebuild the scenario's room and terminal with any overridden values.
    fn apply(&self, scenario: &mut Scenario) -> CliResult<()> {
        let room_overridden = self.volume.is_some()
            || self.supply_temp.is_some()
            || self.initial_temp.is_some()
            || self.heat_load.is_some();
        if room_overridden {
            let room = &scenario.room;
            scenario.room = RoomModel::from_units(
                ft3(self.volume.unwrap_or(room.volume_ft3)),
                degf(self.supply_temp.unwrap_or(room.supply_temp_f)),
                self.heat_load.unwrap_or(room.heat_load_btu_per_hr),
                degf(self.initial_temp.unwrap_or(room.initial_temp_f)),
            )?
            .with_air(room.air);
        }

        if self.min_cfm.is_some() || self.max_cfm.is_some() {
            let airflow = &scenario.airflow;
            scenario.airflow = AirflowRange::from_units(
                cfm(self.min_cfm.unwrap_or(airflow.min_cfm)),
                cfm(self.max_cfm.unwrap_or(airflow.max_cfm)),
            )?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SteppingArg {
    Anchored,
    Incremental,
}

impl From<SteppingArg> for ThermalStepping {
    fn from(arg: SteppingArg) -> Self {
        match arg {
            SteppingArg::Anchored => ThermalStepping::Anchored,
            SteppingArg::Incremental => ThermalStepping::Incremental,
        }
    }
}

fn main() -> CliResult<()> {
    // Logs go to stderr so traces printed on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Room {
            scenario,
            cycles,
            dt,
            setpoint,
            kp,
            ti,
            td,
            plant,
            stepping,
            output,
            quiet,
        } => {
            let mut scenario = match scenario {
                Some(path) => Scenario::load_yaml(&path)?,
                None => Scenario::office(),
            };
            let c = &mut scenario.controller;
            c.kp = kp.unwrap_or(c.kp);
            c.ti = ti.unwrap_or(c.ti);
            c.td = td.unwrap_or(c.td);
            c.setpoint = setpoint.unwrap_or(c.setpoint);
            scenario.sim.cycles = cycles.unwrap_or(scenario.sim.cycles);
            scenario.sim.dt_s = dt.unwrap_or(scenario.sim.dt_s);
            if let Some(stepping) = stepping {
                scenario.sim.stepping = stepping.into();
            }
            plant.apply(&mut scenario)?;
            cmd_room(&scenario, output.as_deref(), quiet)
        }
        Commands::Noise {
            cycles,
            seed,
            setpoint,
            deadband,
            kp,
            ti,
            td,
            action,
            output,
            quiet,
        } => {
            let config = PidConfig::new(kp, ti, td)
                .with_setpoint(setpoint)
                .with_deadband(deadband)
                .with_action(action.parse::<ControlAction>()?);
            let opts = NoiseOptions {
                cycles,
                seed,
                ..Default::default()
            };
            cmd_noise(config, &opts, output.as_deref(), quiet)
        }
        Commands::Check { scenario } => cmd_check(&scenario),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn cmd_room(scenario: &Scenario, output: Option<&Path>, quiet: bool) -> CliResult<()> {
    println!("Running room simulation: {}", scenario.name);
    println!(
        "  setpoint = {:.1} °F, dt = {:.1} s, cycles = {}",
        scenario.controller.setpoint, scenario.sim.dt_s, scenario.sim.cycles
    );

    let start = Instant::now();
    let mut controller = scenario.build_controller()?;
    let record = run_room_loop(
        &mut controller,
        &scenario.room,
        &scenario.airflow,
        &scenario.sim,
    )?;
    info!(elapsed_s = start.elapsed().as_secs_f64(), "simulation done");

    if !quiet {
        println!(
            "\n{:>5} {:>9} {:>9} {:>9} {:>8} {:>8}",
            "cycle", "t (min)", "T (°F)", "cfm", "error", "out %"
        );
        for c in record.iter() {
            println!(
                "{:>5} {:>9.1} {:>9.3} {:>9.1} {:>8.3} {:>8.2}",
                c.cycle,
                as_minutes(s(c.time_s)),
                c.pv,
                c.airflow_cfm.unwrap_or(f64::NAN),
                c.terms.error,
                c.terms.output
            );
        }
    }

    print_summary(&record);
    export(&record, output)
}

fn cmd_noise(
    config: PidConfig,
    opts: &NoiseOptions,
    output: Option<&Path>,
    quiet: bool,
) -> CliResult<()> {
    println!(
        "Running noise demo: {} action, setpoint = {:.1}, deadband = {:.1}, seed = {}",
        config.action, config.setpoint, config.deadband, opts.seed
    );

    let mut controller = PidController::new(config)?;
    let record = run_noise_loop(&mut controller, opts)?;

    if !quiet {
        println!(
            "\n{:>5} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "cycle", "t (s)", "PV", "error", "P", "I", "D", "out"
        );
        for c in record.iter() {
            println!(
                "{:>5} {:>8.2} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
                c.cycle,
                c.time_s,
                c.pv,
                c.terms.error,
                c.terms.proportional,
                c.terms.integral,
                c.terms.derivative,
                c.terms.output
            );
        }
    }

    print_summary(&record);
    export(&record, output)
}

fn cmd_check(path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", path.display());
    let scenario = Scenario::load_yaml(path)?;
    scenario.build_controller()?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn cmd_init(path: &Path) -> CliResult<()> {
    Scenario::office().save_yaml(path)?;
    println!("✓ Wrote office scenario to {}", path.display());
    Ok(())
}

fn print_summary(record: &LoopRecord) {
    println!("\nSummary:");
    println!("  Cycles: {}", record.len());
    if let Some(mean) = record.mean_pv() {
        println!("  Mean PV: {:.3}", mean);
    }
    if let Some(last) = record.final_pv() {
        println!("  Final PV: {:.3}", last);
    }
    println!("  Saturated cycles: {}", record.saturated_cycles());
}

fn export(record: &LoopRecord, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        record.write_csv(path)?;
        println!("✓ Exported {} cycles to {}", record.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(args: &[&str]) -> PlantArgs {
        let mut argv = vec!["hv-cli", "room"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Room { plant, .. } => plant,
            _ => unreachable!(),
        }
    }

    #[test]
    fn plant_flags_override_room_and_terminal() {
        let mut scenario = Scenario::office();
        plant(&["--volume", "2400", "--initial-temp", "72", "--max-cfm", "900"])
            .apply(&mut scenario)
            .unwrap();
        assert!((scenario.room.volume_ft3 - 2400.0).abs() < 1e-9);
        assert!((scenario.room.initial_temp_f - 72.0).abs() < 1e-9);
        assert!((scenario.room.supply_temp_f - 65.0).abs() < 1e-9);
        assert_eq!(scenario.room.heat_load_btu_per_hr, 2800.0);
        assert!((scenario.airflow.min_cfm - 200.0).abs() < 1e-9);
        assert!((scenario.airflow.max_cfm - 900.0).abs() < 1e-9);
    }

    #[test]
    fn no_plant_flags_leave_scenario_untouched() {
        let mut scenario = Scenario::office();
        plant(&[]).apply(&mut scenario).unwrap();
        assert_eq!(scenario, Scenario::office());
    }

    #[test]
    fn inverted_airflow_override_is_rejected() {
        let mut scenario = Scenario::office();
        let result = plant(&["--min-cfm", "700"]).apply(&mut scenario);
        assert!(matches!(result, Err(CliError::Sim(SimError::InvalidArg { .. }))));
    }
}
