use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-position classification handed over by perception.
pub type CellMap = BTreeMap<Position, CellSymbol>;

/// One atomic, fully classified observation of the board.
///
/// Snapshots are immutable; every turn builds a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    size: FieldSize,
    cells: Array2<CellSymbol>,
}

impl BoardSnapshot {
    /// Builds a snapshot from a perception mapping, positions missing from `cells` become [`CellSymbol::Unknown`].
    ///
    /// Numbers above [`CellSymbol::MAX_NUMBER`] are no valid classification and are stored as `Unknown` too.
    pub fn from_cells<I>(size: FieldSize, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Position, CellSymbol)>,
    {
        if size.is_empty() {
            return Err(SweepError::InvalidBoardShape);
        }

        let mut grid = Array2::from_elem(size.to_nd_index(), CellSymbol::Unknown);
        for (pos, symbol) in cells {
            if !size.contains(pos) {
                return Err(SweepError::InvalidCoords);
            }
            grid[pos.to_nd_index()] = match symbol {
                CellSymbol::Number(n) if n > CellSymbol::MAX_NUMBER => {
                    log::warn!("Cell {} reported as {}, treating it as unknown", pos, n);
                    CellSymbol::Unknown
                }
                symbol => symbol,
            };
        }

        Ok(Self { size, cells: grid })
    }

    /// Builds a snapshot from rows of symbols (outer index is `y`).
    pub fn from_rows(rows: &[Vec<CellSymbol>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(SweepError::InvalidBoardShape);
        }

        let size = FieldSize::new(
            width.try_into().map_err(|_| SweepError::InvalidBoardShape)?,
            height.try_into().map_err(|_| SweepError::InvalidBoardShape)?,
        );
        let cells = size
            .positions()
            .map(|pos| (pos, rows[usize::from(pos.y)][usize::from(pos.x)]));
        Self::from_cells(size, cells)
    }

    pub fn size(&self) -> FieldSize {
        self.size
    }

    pub fn symbol_at(&self, pos: Position) -> CellSymbol {
        self.cells[pos.to_nd_index()]
    }

    /// Positions holding `symbol`, in scan order (`y` outer, `x` inner).
    pub fn cells_of_type(&self, symbol: CellSymbol) -> impl Iterator<Item = Position> + '_ {
        self.size
            .positions()
            .filter(move |&pos| self.symbol_at(pos) == symbol)
    }

    pub fn count_of(&self, symbol: CellSymbol) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| cell == symbol)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn neighbors(&self, pos: Position) -> NeighborIter {
        self.size.iter_neighbors(pos)
    }

    pub fn neighbors_of_type(
        &self,
        pos: Position,
        symbol: CellSymbol,
    ) -> impl Iterator<Item = Position> + '_ {
        self.neighbors(pos)
            .filter(move |&neighbor| self.symbol_at(neighbor) == symbol)
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.height {
            if y > 0 {
                writeln!(f)?;
            }
            f.write_str("[")?;
            for x in 0..self.size.width {
                write!(f, " {}", self.symbol_at(Position::new(x, y)))?;
            }
            f.write_str(" ]")?;
        }
        Ok(())
    }
}

impl FromStr for BoardSnapshot {
    type Err = SweepError;

    /// Parses the rendered board format, brackets are optional and blank lines are skipped.
    fn from_str(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.trim_start_matches('[')
                    .trim_end_matches(']')
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(CellSymbol::try_from)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn board(text: &str) -> BoardSnapshot {
        text.parse().unwrap()
    }

    #[test]
    fn parses_rendered_rows() {
        let snapshot = board(
            "
            [ ? 1 + ]
            [ 0 M ! ]
            ",
        );

        assert_eq!(snapshot.size(), FieldSize::new(3, 2));
        assert_eq!(snapshot.symbol_at(Position::new(1, 0)), CellSymbol::Number(1));
        assert_eq!(snapshot.symbol_at(Position::new(2, 0)), CellSymbol::Flagged);
        assert_eq!(snapshot.symbol_at(Position::new(1, 1)), CellSymbol::Mine);
        assert_eq!(snapshot.to_string(), "[ ? 1 + ]\n[ 0 M ! ]");
    }

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            "??\n???".parse::<BoardSnapshot>(),
            Err(SweepError::InvalidBoardShape)
        );
    }

    #[test]
    fn rejects_empty_board() {
        assert_eq!(
            "\n  \n".parse::<BoardSnapshot>(),
            Err(SweepError::InvalidBoardShape)
        );
    }

    #[test]
    fn missing_cells_become_unknown() {
        let size = FieldSize::new(2, 1);
        let snapshot =
            BoardSnapshot::from_cells(size, [(Position::new(0, 0), CellSymbol::Hidden)]).unwrap();

        assert_eq!(snapshot.symbol_at(Position::new(1, 0)), CellSymbol::Unknown);
    }

    #[test]
    fn out_of_range_number_becomes_unknown() {
        let size = FieldSize::new(2, 1);
        let snapshot = BoardSnapshot::from_cells(
            size,
            [
                (Position::new(0, 0), CellSymbol::Number(9)),
                (Position::new(1, 0), CellSymbol::Number(8)),
            ],
        )
        .unwrap();

        assert_eq!(snapshot.symbol_at(Position::new(0, 0)), CellSymbol::Unknown);
        assert_eq!(snapshot.symbol_at(Position::new(1, 0)), CellSymbol::Number(8));
        assert_eq!(snapshot.to_string(), "[ # 8 ]");
    }

    #[test]
    fn out_of_bounds_cell_is_rejected() {
        let size = FieldSize::new(2, 1);
        let result = BoardSnapshot::from_cells(size, [(Position::new(0, 1), CellSymbol::Hidden)]);

        assert_eq!(result, Err(SweepError::InvalidCoords));
    }

    #[test]
    fn cells_of_type_scans_row_major() {
        let snapshot = board(
            "
            ? 1 ?
            1 ? 0
            ",
        );

        let hidden: Vec<_> = snapshot.cells_of_type(CellSymbol::Hidden).collect();

        assert_eq!(
            hidden,
            [Position::new(0, 0), Position::new(2, 0), Position::new(1, 1)]
        );
        assert_eq!(snapshot.count_of(CellSymbol::Number(1)), 2);
    }

    #[test]
    fn neighbors_of_type_filters_by_symbol() {
        let snapshot = board(
            "
            + ? 1
            ? 2 ?
            1 1 1
            ",
        );

        let flagged: Vec<_> = snapshot
            .neighbors_of_type(Position::new(1, 1), CellSymbol::Flagged)
            .collect();
        let hidden: Vec<_> = snapshot
            .neighbors_of_type(Position::new(1, 1), CellSymbol::Hidden)
            .collect();

        assert_eq!(flagged, [Position::new(0, 0)]);
        assert_eq!(
            hidden,
            [Position::new(1, 0), Position::new(0, 1), Position::new(2, 1)]
        );
    }
}
