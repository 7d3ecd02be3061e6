//! Sliding tile puzzle engine.
//!
//! A picture (or animation) is cut into a `rows` x `columns` grid, the
//! bottom-right tile is held back to leave a gap, and the rest are shuffled
//! into an arrangement that is guaranteed to be solvable. Players slide tiles
//! next to the gap until every tile is home again.
//!
//! Rendering, image decoding and input handling live outside this crate: the
//! engine only needs a [`FrameSource`] and grid coordinates.

mod animation;
mod board;
mod builder;
mod error;
mod frames;
mod geometry;
pub mod solvability;

pub use animation::{
    AnimationCycle, FrameCursor, FrameTick, FramesPerSecond, TaskId, DEFAULT_FPS, MAX_FPS, MIN_FPS,
};
pub use board::{Board, MoveOutcome, Phase};
pub use builder::{new_game, Builder};
pub use error::PuzzleError;
pub use frames::{FrameSource, Tile};
pub use geometry::{Direction, GridSize, Position, MIN_DIMENSION};
