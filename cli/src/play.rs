use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::sim::SimulatedGame;
use sweeper_core::{CellCount, ControllerState, Coord, Pacer, TurnController};

use crate::config::Config;

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    /// TOML settings file, flags below take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Wait between turns, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

impl PlayArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.board.width = width;
        }
        if let Some(height) = self.height {
            config.board.height = height;
        }
        if let Some(mines) = self.mines {
            config.board.mines = mines;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.turn_delay_ms = delay_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

/// Blocks the thread for the whole delay.
struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

pub fn run(args: PlayArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Starting, seed: {}", seed);

    let game = SimulatedGame::new(config.sim_config(), seed)
        .with_context(|| format!("Invalid board {:?}", config.board))?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst))
            .context("Failed to set Ctrl-C handler")?;
    }

    let mut controller = TurnController::start(
        game,
        SmallRng::seed_from_u64(seed),
        config.controller_config(),
    )
    .context("Can not find game window")?;
    let report = controller.run(cancel.as_ref(), &mut ThreadPacer)?;

    Ok(exit_code(report.outcome))
}

fn exit_code(outcome: ControllerState) -> ExitCode {
    use ControllerState::*;
    match outcome {
        Won | Lost | Cancelled => ExitCode::SUCCESS,
        Blocked => ExitCode::from(2),
        Fatal => ExitCode::from(3),
        Starting | Running => ExitCode::FAILURE,
    }
}
