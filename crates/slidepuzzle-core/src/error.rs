use thiserror::Error;

/// Reasons a board cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("unsupported puzzle size {columns}x{rows}: below 3x3 or too large")]
    InvalidConfiguration { rows: usize, columns: usize },
    #[error("no frames supplied for tile {unit_id}")]
    MissingFrames { unit_id: usize },
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
}
