use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::{ActionReason, BoardSnapshot, InferenceEngine, Position, TurnNumber, Verdict};

#[derive(clap::Args, Debug)]
pub struct SolveArgs {
    /// Board file, one row of symbols per line (`?` hidden, `+` flag, `M` mine, `!` win, `#` unknown, `0`-`8`)
    board: PathBuf,

    /// Turn number to decide for, turn 1 treats finished boards as leftovers to restart
    #[arg(short, long, default_value_t = 2)]
    turn: TurnNumber,

    /// Force a seed for guesses instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the verdict as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SolveArgs) -> Result<ExitCode> {
    let text = std::fs::read_to_string(&args.board)
        .with_context(|| format!("Could not read board {}", args.board.display()))?;
    let snapshot: BoardSnapshot = text
        .parse()
        .with_context(|| format!("Invalid board {}", args.board.display()))?;
    log::debug!("Board:\n{}", snapshot);

    let seed = args.seed.unwrap_or_else(rand::random);
    let restart_button = Position::new(0, snapshot.size().height);
    let mut engine = InferenceEngine::new(SmallRng::seed_from_u64(seed), restart_button);
    let verdict = engine.decide(&snapshot, args.turn);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", describe(&verdict));
    }

    Ok(match verdict {
        Verdict::BlockedUnknownCells => ExitCode::from(2),
        Verdict::NoMoveFound => ExitCode::from(3),
        _ => ExitCode::SUCCESS,
    })
}

fn join(cells: impl IntoIterator<Item = Position>) -> String {
    cells
        .into_iter()
        .map(|pos| pos.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Act(action) => {
            let why = match action.reason {
                ActionReason::FirstMove => "first move".to_string(),
                ActionReason::Deduction { clue } => format!("deduced from {clue}"),
                ActionReason::Guess => "guess".to_string(),
            };
            if action.flags.is_empty() {
                format!("reveal {} ({why})", join(action.reveals.iter().copied()))
            } else {
                format!("flag {} ({why})", join(action.flags.iter().copied()))
            }
        }
        Verdict::Restart(at) => format!("restart at {at}"),
        Verdict::Won => "won".to_string(),
        Verdict::Lost => "lost".to_string(),
        Verdict::BlockedUnknownCells => "blocked by unknown cells".to_string(),
        Verdict::NoMoveFound => "no move found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::Action;

    #[test]
    fn describes_deductions_with_their_clue() {
        let verdict = Verdict::Act(Action::flag(
            [Position::new(2, 0), Position::new(0, 1)],
            ActionReason::Deduction {
                clue: Position::new(1, 1),
            },
        ));

        assert_eq!(
            describe(&verdict),
            "flag (2, 0) (0, 1) (deduced from (1, 1))"
        );
    }

    #[test]
    fn describes_guesses_and_terminal_verdicts() {
        let guess = Verdict::Act(Action::reveal([Position::new(4, 4)], ActionReason::Guess));

        assert_eq!(describe(&guess), "reveal (4, 4) (guess)");
        assert_eq!(describe(&Verdict::Restart(Position::new(0, 9))), "restart at (0, 9)");
        assert_eq!(describe(&Verdict::Lost), "lost");
    }
}
