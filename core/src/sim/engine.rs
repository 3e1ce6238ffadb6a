use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::MineLayout;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Player-visible state of one simulated cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

/// Rules of a single minesweeper game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    revealed_count: CellCount,
    state: EngineState,
    triggered_mine: Option<Position>,
}

impl PlayEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn size(&self) -> FieldSize {
        self.mine_layout.size()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn cell_at(&self, pos: Position) -> EngineCell {
        self.board[pos.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Position> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, pos: Position) -> Result<()> {
        let pos = self.mine_layout.validate_position(pos)?;
        self.check_not_finished()?;

        let cell = &mut self.board[pos.to_nd_index()];
        *cell = match *cell {
            EngineCell::Hidden => EngineCell::Flagged,
            EngineCell::Flagged => EngineCell::Hidden,
            revealed @ EngineCell::Revealed(_) => revealed,
        };
        Ok(())
    }

    pub fn reveal(&mut self, pos: Position) -> Result<RevealOutcome> {
        let pos = self.mine_layout.validate_position(pos)?;
        self.check_not_finished()?;

        if !matches!(self.cell_at(pos), EngineCell::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }

        if self.mine_layout.contains_mine(pos) {
            self.triggered_mine = Some(pos);
            self.state = EngineState::Lost;
            return Ok(RevealOutcome::HitMine);
        }

        self.open_region(pos);

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.state = EngineState::Won;
            Ok(RevealOutcome::Won)
        } else {
            self.state = EngineState::Active;
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Opens `start` and flood-fills through zero cells, flags stop the fill.
    fn open_region(&mut self, start: Position) {
        let size = self.size();
        let mut visited = BTreeSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) || !matches!(self.cell_at(pos), EngineCell::Hidden) {
                continue;
            }

            let adjacent_mines = self.mine_layout.adjacent_mine_count(pos);
            self.board[pos.to_nd_index()] = EngineCell::Revealed(adjacent_mines);
            self.revealed_count += 1;

            if adjacent_mines == 0 {
                to_visit.extend(
                    size.iter_neighbors(pos)
                        .filter(|neighbor| !visited.contains(neighbor)),
                );
            }
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(SweepError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
