//! Herd Rush headless runner
//!
//! Loads settings, then lets the autopilot play a number of rounds at the
//! fixed timestep, logging the HUD signals as they change.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use herd_rush::consts::SIM_DT;
use herd_rush::sim::{GameState, RoundPhase, tick};
use herd_rush::{GameSettings, SimResult, autopilot};

/// Ticks allowed per round before the runner gives up
const MAX_TICKS_PER_ROUND: u64 = 60 * 60 * 60;

#[derive(Parser, Debug)]
#[command(name = "herd-rush", about = "Play Herd Rush rounds with the autopilot")]
struct Args {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Rounds to play
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,

    /// Print the default settings as JSON and exit
    #[arg(long)]
    print_default_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging(_verbose: bool) {}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("herd-rush: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> SimResult<()> {
    if args.print_default_config {
        println!("{}", GameSettings::default().to_json_pretty()?);
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => GameSettings::load(path)?,
        None => GameSettings::default(),
    };
    let mut state = GameState::new(settings, args.seed)?;

    state
        .signals
        .on_score_changed(|score| log::debug!("Points: {score}"));
    state
        .signals
        .on_time_changed(|time| log::debug!("Time: {time} s"));
    state
        .signals
        .on_final_score_set(|points| log::info!("{points} points!"));
    state
        .signals
        .on_state_changed(|phase| log::debug!("State: {phase:?}"));

    for round in 1..=args.rounds {
        let points = play_round(&mut state)?;
        println!("Round {round}: {points} points");
    }
    Ok(())
}

/// Play from waiting through game over and back to waiting
fn play_round(state: &mut GameState) -> SimResult<u32> {
    let mut ticks = 0;
    let mut finished = false;
    while ticks < MAX_TICKS_PER_ROUND {
        let input = autopilot::steer(state);
        tick(state, &input, SIM_DT)?;
        ticks += 1;

        match state.phase() {
            RoundPhase::GameOver => finished = true,
            RoundPhase::Waiting if finished => break,
            _ => {}
        }
    }
    if !finished {
        log::warn!("Round did not finish after {ticks} ticks");
    }
    Ok(state.final_score())
}
