//! Headless runner
//!
//! Plays one run at the fixed 120 Hz timestep and prints the run summary as
//! JSON. Without `--autopilot` the player never jumps.
//!
//! ```text
//! stair-runner [--seed N] [--ticks N] [--autopilot] [--tuning FILE]
//! ```

use std::process::ExitCode;

use stair_runner::consts::{SIM_DT, SIM_DT_MS};
use stair_runner::sim::Autopilot;
use stair_runner::{Director, RunPhase, Tuning};

struct Options {
    seed: Option<u32>,
    ticks: u32,
    autopilot: bool,
    tuning_path: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        seed: None,
        ticks: 120 * 60,
        autopilot: false,
        tuning_path: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                options.seed = Some(value.parse().map_err(|e| format!("bad seed {value}: {e}"))?);
            }
            "--ticks" => {
                let value = args.next().ok_or("--ticks needs a value")?;
                options.ticks = value.parse().map_err(|e| format!("bad tick count {value}: {e}"))?;
            }
            "--autopilot" => options.autopilot = true,
            "--tuning" => {
                options.tuning_path = Some(args.next().ok_or("--tuning needs a path")?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    let tuning = Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))?;
    log::info!("Loaded tuning from {}", path);
    Ok(tuning)
}

fn prepare_director(options: &Options, seed: u32) -> Result<Director, String> {
    let tuning = load_tuning(options.tuning_path.as_deref())?;
    Director::prepared(tuning, seed, 0.0).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("Stair Runner (headless) seed={} ticks={}", seed, options.ticks);

    let mut director = match prepare_director(&options, seed) {
        Ok(director) => director,
        Err(err) => {
            log::warn!("Invalid tuning: {}", err);
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    let pilot = options.autopilot.then(Autopilot::default);
    director.start(0.0);

    for tick in 0..options.ticks {
        let now = tick as f64 * SIM_DT_MS;
        if pilot.is_some_and(|p| p.decide(&director, now)) {
            director.jump(now);
        }
        director.update(SIM_DT, now);
        if director.phase() == RunPhase::Dead {
            break;
        }
    }

    match serde_json::to_string_pretty(&director.summary()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to encode summary: {err}");
            ExitCode::FAILURE
        }
    }
}
