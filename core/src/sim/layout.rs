use core::ops::Index;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count of a simulated game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub size: FieldSize,
    pub mines: CellCount,
}

impl SimConfig {
    pub const fn beginner() -> Self {
        Self {
            size: FieldSize::new(9, 9),
            mines: 10,
        }
    }

    pub const fn intermediate() -> Self {
        Self {
            size: FieldSize::new(16, 16),
            mines: 40,
        }
    }

    pub const fn expert() -> Self {
        Self {
            size: FieldSize::new(30, 16),
            mines: 99,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.is_empty() {
            return Err(SweepError::InvalidBoardShape);
        }
        // nothing would ever render as won
        if self.mines == 0 {
            return Err(SweepError::NoMines);
        }
        if self.mines > self.size.total_cells() {
            return Err(SweepError::TooManyMines);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_positions(size: FieldSize, mines: &[Position]) -> Result<Self> {
        if size.is_empty() {
            return Err(SweepError::InvalidBoardShape);
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &pos in mines {
            if !size.contains(pos) {
                return Err(SweepError::InvalidCoords);
            }
            mine_mask[pos.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        if self.size().contains(pos) {
            Ok(pos)
        } else {
            Err(SweepError::InvalidCoords)
        }
    }

    pub fn size(&self) -> FieldSize {
        let (width, height) = self.mine_mask.dim();
        FieldSize::new(
            width.try_into().unwrap_or(Coord::MAX),
            height.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.size().total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, pos: Position) -> bool {
        self[pos]
    }

    pub fn adjacent_mine_count(&self, pos: Position) -> u8 {
        self.size()
            .iter_neighbors(pos)
            .filter(|&neighbor| self[neighbor])
            .count() as u8
    }

    pub fn mines(&self) -> impl Iterator<Item = Position> + '_ {
        self.size().positions().filter(|&pos| self[pos])
    }
}

impl Index<Position> for MineLayout {
    type Output = bool;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.mine_mask[pos.to_nd_index()]
    }
}

/// Purely random placement, reproducible from `seed`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn generate(self, config: SimConfig) -> Result<MineLayout> {
        config.validate()?;
        let total_cells = config.size.total_cells();

        // optimize for full boards
        if config.mines == total_cells {
            log::warn!("Every cell of the {} field is a mine", config.size);
            return Ok(MineLayout::from_mine_mask(Array2::from_elem(
                config.size.to_nd_index(),
                true,
            )));
        }

        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut free_cells = total_cells;
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mines
                .as_slice_mut()
                .ok_or(SweepError::InvalidBoardShape)?;
            while mines_placed < config.mines {
                // place among the remaining free cells, skipping the ones already mined
                let mut place = rng.random_range(0..free_cells) as usize;
                for (i, cell) in cells.iter_mut().enumerate() {
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        Ok(MineLayout::from_mine_mask(mines))
    }
}
