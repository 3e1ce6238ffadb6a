use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

mod config;
mod play;
mod solve;

/// Plays minesweeper by reading the board and clicking cells it can prove safe or mined.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play simulated games until a win, a loss or Ctrl-C
    Play(play::PlayArgs),
    /// Print the decision for a single board file
    Solve(solve::SolveArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Command::Play(args) => play::run(args),
        Command::Solve(args) => solve::run(args),
    }
}
