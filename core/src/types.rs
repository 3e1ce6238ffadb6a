use core::fmt;
use core::ops::Add;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for whole-board cell counts.
pub type CellCount = u32;

/// Zero-based `(x, y)` location of a cell.
///
/// Positions order row-major (`y` first, then `x`), so ordered collections of positions iterate in the same order
/// as a board scan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.x.into(), self.y.into()]
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Componentwise, saturating at `Coord::MAX`.
impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.saturating_add(rhs.x),
            y: self.y.saturating_add(rhs.y),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions, fixed for the lifetime of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: Coord,
    pub height: Coord,
}

impl FieldSize {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.width.into(), self.height.into()]
    }

    /// Every position of the field in scan order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn iter_neighbors(&self, center: Position) -> NeighborIter {
        NeighborIter::new(center, *self)
    }
}

impl fmt::Display for FieldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

// scan order: row above, own row, row below
const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Position, delta: (i32, i32), bounds: FieldSize) -> Option<Position> {
    let (dx, dy) = delta;

    let next_x = pos.x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= bounds.width {
        return None;
    }

    let next_y = pos.y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= bounds.height {
        return None;
    }

    Some(Position::new(next_x, next_y))
}

/// Up to eight surrounding positions, clipped to the field, in scan order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: FieldSize,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position, bounds: FieldSize) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let size = FieldSize::new(3, 3);

        let neighbors: Vec<_> = size.iter_neighbors(Position::new(0, 0)).collect();

        assert_eq!(
            neighbors,
            [Position::new(1, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn center_has_eight_neighbors_without_itself() {
        let size = FieldSize::new(3, 3);
        let center = Position::new(1, 1);

        let neighbors: Vec<_> = size.iter_neighbors(center).collect();

        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
        assert!(neighbors.is_sorted());
    }

    #[test]
    fn single_row_clips_vertically() {
        let size = FieldSize::new(4, 1);

        let neighbors: Vec<_> = size.iter_neighbors(Position::new(3, 0)).collect();

        assert_eq!(neighbors, [Position::new(2, 0)]);
    }

    #[test]
    fn positions_sort_row_major() {
        assert!(Position::new(5, 0) < Position::new(0, 1));
        assert!(Position::new(0, 2) < Position::new(1, 2));
    }

    #[test]
    fn positions_add_componentwise() {
        assert_eq!(
            Position::new(16, 16) + Position::new(32, 64),
            Position::new(48, 80)
        );
        assert_eq!(
            Position::new(Coord::MAX - 1, 3) + Position::new(5, 1),
            Position::new(Coord::MAX, 4)
        );
    }

    #[test]
    fn field_positions_scan_row_major() {
        let positions: Vec<_> = FieldSize::new(2, 2).positions().collect();

        assert_eq!(
            positions,
            [
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1)
            ]
        );
    }
}
