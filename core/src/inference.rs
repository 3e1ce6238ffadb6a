use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Turn counter, `1` is the first observed turn of a run.
pub type TurnNumber = u32;

/// Why an [`Action`] was chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReason {
    /// The whole field is hidden, nothing to deduce from.
    FirstMove,
    /// Certain inference from the number at `clue`.
    Deduction { clue: Position },
    /// No deduction applied.
    Guess,
}

/// Cells to activate this turn, both sets iterate in scan order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub reveals: BTreeSet<Position>,
    pub flags: BTreeSet<Position>,
    pub reason: ActionReason,
}

impl Action {
    pub fn reveal(cells: impl IntoIterator<Item = Position>, reason: ActionReason) -> Self {
        Self {
            reveals: cells.into_iter().collect(),
            flags: BTreeSet::new(),
            reason,
        }
    }

    pub fn flag(cells: impl IntoIterator<Item = Position>, reason: ActionReason) -> Self {
        Self {
            reveals: BTreeSet::new(),
            flags: cells.into_iter().collect(),
            reason,
        }
    }
}

/// Outcome of a single inference pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Act(Action),
    /// Stale end-of-game banner seen on the first turn, press the restart button at the given position.
    Restart(Position),
    Won,
    Lost,
    BlockedUnknownCells,
    /// Nothing hidden is left yet the game did not end, perception and logic disagree.
    NoMoveFound,
}

/// Everything a rule may look at.
#[derive(Copy, Clone, Debug)]
pub struct TurnContext<'a> {
    pub snapshot: &'a BoardSnapshot,
    pub turn: TurnNumber,
    pub restart_button: Position,
}

impl TurnContext<'_> {
    const fn is_first_turn(&self) -> bool {
        self.turn == 1
    }
}

/// One entry of the decision list, `None` passes to the next rule.
pub type Rule = fn(&TurnContext<'_>, &mut dyn RngCore) -> Option<Verdict>;

/// Decision list evaluated top to bottom, the first rule producing a verdict wins.
pub const RULES: [(&str, Rule); 6] = [
    ("terminal", classify_terminal),
    ("unknown-guard", guard_unknown_cells),
    ("first-move", open_first_move),
    ("deduction", deduce_from_numbers),
    ("guess", guess_hidden_cell),
    ("exhausted", report_exhaustion),
];

/// Mines take priority over win markers. On the first turn both mean a leftover board from a previous game.
pub fn classify_terminal(ctx: &TurnContext<'_>, _rng: &mut dyn RngCore) -> Option<Verdict> {
    let has_mines = ctx.snapshot.cells_of_type(CellSymbol::Mine).next().is_some();
    let has_win = ctx.snapshot.cells_of_type(CellSymbol::Win).next().is_some();

    if !has_mines && !has_win {
        return None;
    }

    Some(if ctx.is_first_turn() {
        Verdict::Restart(ctx.restart_button)
    } else if has_mines {
        Verdict::Lost
    } else {
        Verdict::Won
    })
}

pub fn guard_unknown_cells(ctx: &TurnContext<'_>, _rng: &mut dyn RngCore) -> Option<Verdict> {
    ctx.snapshot
        .cells_of_type(CellSymbol::Unknown)
        .next()
        .map(|_| Verdict::BlockedUnknownCells)
}

pub fn open_first_move(ctx: &TurnContext<'_>, rng: &mut dyn RngCore) -> Option<Verdict> {
    let snapshot = ctx.snapshot;
    if snapshot.count_of(CellSymbol::Hidden) != snapshot.size().total_cells() {
        return None;
    }

    pick_hidden(snapshot, rng)
        .map(|pos| Verdict::Act(Action::reveal([pos], ActionReason::FirstMove)))
}

/// Single-clue deductions, lowest number first and then scan order. Stops at the first applicable clue.
pub fn deduce_from_numbers(ctx: &TurnContext<'_>, _rng: &mut dyn RngCore) -> Option<Verdict> {
    let snapshot = ctx.snapshot;

    for n in 1..=CellSymbol::MAX_NUMBER {
        for clue in snapshot.cells_of_type(CellSymbol::Number(n)) {
            let hidden: Vec<_> = snapshot
                .neighbors_of_type(clue, CellSymbol::Hidden)
                .collect();
            if hidden.is_empty() {
                continue;
            }

            let flagged = snapshot
                .neighbors_of_type(clue, CellSymbol::Flagged)
                .count();
            let reason = ActionReason::Deduction { clue };

            // every hidden neighbor has to be a mine
            if usize::from(n).checked_sub(flagged) == Some(hidden.len()) {
                return Some(Verdict::Act(Action::flag(hidden, reason)));
            }

            // all mines around the clue are flagged already
            if flagged == usize::from(n) {
                return Some(Verdict::Act(Action::reveal(hidden, reason)));
            }
        }
    }

    None
}

pub fn guess_hidden_cell(ctx: &TurnContext<'_>, rng: &mut dyn RngCore) -> Option<Verdict> {
    pick_hidden(ctx.snapshot, rng)
        .map(|pos| Verdict::Act(Action::reveal([pos], ActionReason::Guess)))
}

pub fn report_exhaustion(_ctx: &TurnContext<'_>, _rng: &mut dyn RngCore) -> Option<Verdict> {
    Some(Verdict::NoMoveFound)
}

/// Uniformly random hidden cell.
fn pick_hidden(snapshot: &BoardSnapshot, rng: &mut dyn RngCore) -> Option<Position> {
    let hidden: Vec<_> = snapshot.cells_of_type(CellSymbol::Hidden).collect();
    if hidden.is_empty() {
        return None;
    }
    Some(hidden[rng.random_range(0..hidden.len())])
}

/// Turns a snapshot into a verdict. Owns the random source used for first moves and guesses.
#[derive(Clone, Debug)]
pub struct InferenceEngine<R> {
    rng: R,
    restart_button: Position,
}

impl<R: RngCore> InferenceEngine<R> {
    pub fn new(rng: R, restart_button: Position) -> Self {
        Self {
            rng,
            restart_button,
        }
    }

    pub fn decide(&mut self, snapshot: &BoardSnapshot, turn: TurnNumber) -> Verdict {
        let ctx = TurnContext {
            snapshot,
            turn,
            restart_button: self.restart_button,
        };

        RULES
            .iter()
            .find_map(|&(name, rule)| {
                let verdict = rule(&ctx, &mut self.rng)?;
                log::trace!("rule {} matched on turn {}", name, turn);
                Some(verdict)
            })
            .unwrap_or(Verdict::NoMoveFound)
    }
}
