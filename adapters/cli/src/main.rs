#![deny(
    unsafe_code,
    missing_docs,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless demo binary: loads a recorded session from disk and plays
//! it to completion through a [`match3_replay::ReplayController`],
//! printing a one-line summary of the outcome. The only I/O surface in
//! the workspace; every other crate stays file-free.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use match3_core::SimulationConfig;
use match3_replay::{GameRecording, NullReplayCollector, ReplayController};
use match3_spawn_model::DefaultSpawnModel;

/// Command-line arguments for the headless replay runner.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Path to a `GameRecording` serialized with `match3-replay`'s
    /// bincode format.
    #[arg(long, value_name = "PATH")]
    recording: PathBuf,
    /// Path to a TOML file overriding `SimulationConfig` defaults.
    /// Unset fields keep their default value.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Playback speed multiplier fed to `ReplayController::tick`.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
}

fn load_recording(path: &PathBuf) -> Result<GameRecording> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read recording at {}", path.display()))?;
    GameRecording::deserialize(&bytes)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("failed to decode recording at {}", path.display()))
}

fn load_sim_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse simulation config at {}", path.display()))
}

fn run(args: &CliArgs) -> Result<()> {
    let recording = load_recording(&args.recording)?;
    let sim_config = load_sim_config(args.config.as_ref())?;

    info!(
        "loaded recording: {} commands, duration {} ticks, seed {}",
        recording.commands.len(),
        recording.duration_ticks,
        recording.seed
    );

    let mut controller = ReplayController::new(
        recording,
        sim_config,
        Box::new(DefaultSpawnModel::new()),
        Box::new(NullReplayCollector),
    );
    controller.set_playback_speed(args.speed);
    controller.play();

    let tick_seconds = 1.0 / sim_config.tick_rate_hz;
    while controller.state() == match3_replay::ReplayState::Playing {
        controller.tick(tick_seconds);
        debug!(
            "tick {} ({:.1}% complete)",
            controller.current_tick(),
            controller.progress() * 100.0
        );
    }

    match controller.engine() {
        Some(engine) => {
            let state = engine.state_ref();
            let telemetry = engine.telemetry();
            info!(
                "finished at tick {}: status {:?}, score {}, fingerprint {:#018x}",
                controller.current_tick(),
                state.level_status(),
                state.score(),
                controller.fingerprint(),
            );
            debug!("final-tick telemetry: {telemetry:?}");
            println!(
                "ticks={} status={:?} score={} fingerprint={:#018x}",
                controller.current_tick(),
                state.level_status(),
                state.score(),
                controller.fingerprint(),
            );
        }
        None => warn!("controller finished without an engine; nothing to report"),
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();
    run(&args)
}
