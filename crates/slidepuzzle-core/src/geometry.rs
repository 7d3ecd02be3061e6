use crate::PuzzleError;
use serde::{Deserialize, Serialize};

/// Smallest supported number of rows or columns
pub const MIN_DIMENSION: usize = 3;

/// A cell on the board, `x` counting columns from the left and `y` rows from the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`, if it lies on the board
    pub fn step(self, direction: Direction, size: GridSize) -> Option<Position> {
        let (dx, dy) = direction.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let next = Position::new(x, y);
        size.contains(next).then_some(next)
    }

    /// Manhattan distance to another cell
    pub fn distance(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four von Neumann directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column/row delta of a single step
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Board dimensions. Every value of this type is at least 3x3 and its cell
/// count fits in a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridSize")]
pub struct GridSize {
    rows: usize,
    columns: usize,
}

#[derive(Deserialize)]
struct RawGridSize {
    rows: usize,
    columns: usize,
}

impl TryFrom<RawGridSize> for GridSize {
    type Error = PuzzleError;

    fn try_from(raw: RawGridSize) -> Result<Self, Self::Error> {
        GridSize::new(raw.rows, raw.columns)
    }
}

impl GridSize {
    /// The classic eight-tile board
    pub const SMALLEST: GridSize = GridSize {
        rows: MIN_DIMENSION,
        columns: MIN_DIMENSION,
    };

    /// Validate a board size
    pub fn new(rows: usize, columns: usize) -> Result<Self, PuzzleError> {
        let invalid = PuzzleError::InvalidConfiguration { rows, columns };
        if rows < MIN_DIMENSION || columns < MIN_DIMENSION {
            return Err(invalid);
        }
        // Cell ids must stay addressable as slice indices
        match rows.checked_mul(columns) {
            Some(cells) if cells <= isize::MAX as usize => Ok(Self { rows, columns }),
            _ => Err(invalid),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells, including the empty slot
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Canonical tile id of a cell (row-major)
    pub fn id_from_position(&self, pos: Position) -> usize {
        pos.y * self.columns + pos.x
    }

    /// Cell at a row-major index
    pub fn position_from_index(&self, index: usize) -> Position {
        Position::new(index % self.columns, index / self.columns)
    }

    /// The bottom-right cell, home of the held-back tile
    pub fn last_cell(&self) -> Position {
        Position::new(self.columns - 1, self.rows - 1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.columns && pos.y < self.rows
    }

    /// In-bounds orthogonal neighbours of a cell
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let size = *self;
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| pos.step(dir, size))
    }

    /// All cells in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(|i| self.position_from_index(i))
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_small_grids() {
        assert!(GridSize::new(2, 3).is_err());
        assert!(GridSize::new(3, 2).is_err());
        assert!(GridSize::new(0, 0).is_err());
        assert!(GridSize::new(3, 3).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_cell_count() {
        assert_eq!(
            GridSize::new(usize::MAX / 2, 3),
            Err(PuzzleError::InvalidConfiguration {
                rows: usize::MAX / 2,
                columns: 3
            })
        );
        assert!(GridSize::new(usize::MAX, usize::MAX).is_err());
        assert!(serde_json::from_str::<GridSize>(&format!(
            r#"{{"rows":{},"columns":3}}"#,
            usize::MAX
        ))
        .is_err());
    }

    #[test]
    fn test_id_mapping_is_row_major() {
        let size = GridSize::new(3, 4).unwrap();
        assert_eq!(size.id_from_position(Position::new(0, 0)), 0);
        assert_eq!(size.id_from_position(Position::new(3, 0)), 3);
        assert_eq!(size.id_from_position(Position::new(0, 1)), 4);
        assert_eq!(size.id_from_position(Position::new(3, 2)), 11);

        for i in 0..size.cell_count() {
            assert_eq!(size.id_from_position(size.position_from_index(i)), i);
        }
        assert_eq!(size.last_cell(), Position::new(3, 2));
    }

    #[test]
    fn test_neighbors_stay_in_bounds() {
        let size = GridSize::new(3, 3).unwrap();

        let corner: Vec<_> = size.neighbors(Position::new(0, 0)).collect();
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&Position::new(1, 0)));
        assert!(corner.contains(&Position::new(0, 1)));

        let far_corner: Vec<_> = size.neighbors(Position::new(2, 2)).collect();
        assert_eq!(far_corner.len(), 2);
        assert!(!far_corner.contains(&Position::new(3, 2)));
        assert!(!far_corner.contains(&Position::new(2, 3)));

        assert_eq!(size.neighbors(Position::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_step_and_opposite() {
        let size = GridSize::new(4, 4).unwrap();
        let pos = Position::new(1, 1);
        for dir in Direction::ALL {
            let there = pos.step(dir, size).unwrap();
            assert_eq!(there.step(dir.opposite(), size), Some(pos));
            assert_eq!(pos.distance(there), 1);
        }
        assert_eq!(Position::new(0, 2).step(Direction::Left, size), None);
    }

    #[test]
    fn test_size_deserialize_validates() {
        let ok: GridSize = serde_json::from_str(r#"{"rows":3,"columns":5}"#).unwrap();
        assert_eq!(ok.columns(), 5);
        assert!(serde_json::from_str::<GridSize>(r#"{"rows":2,"columns":5}"#).is_err());
    }
}
