use crate::{GridSize, Position, PuzzleError};
use serde::{Deserialize, Serialize};

/// Supplies the display frames of every canonical tile.
///
/// Frames are opaque to the engine: a renderer may use decoded image crops,
/// texture handles, glyphs or anything else. Every tile needs at least one
/// frame; static images have exactly one.
pub trait FrameSource {
    type Frame;

    /// Frame sequence for the tile whose canonical id is `unit_id`
    fn frames(&self, unit_id: usize) -> Option<Vec<Self::Frame>>;
}

impl<F: Clone> FrameSource for Vec<Vec<F>> {
    type Frame = F;

    fn frames(&self, unit_id: usize) -> Option<Vec<F>> {
        self.get(unit_id).cloned()
    }
}

/// Pull one non-empty frame sequence per cell out of a source, in canonical order
pub(crate) fn collect_frames<S: FrameSource + ?Sized>(
    size: GridSize,
    source: &S,
) -> Result<Vec<Vec<S::Frame>>, PuzzleError> {
    (0..size.cell_count())
        .map(|unit_id| match source.frames(unit_id) {
            Some(frames) if !frames.is_empty() => Ok(frames),
            _ => Err(PuzzleError::MissingFrames { unit_id }),
        })
        .collect()
}

/// A movable piece of the picture. Always carries at least one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTile<F>", bound(deserialize = "F: Deserialize<'de>"))]
pub struct Tile<F> {
    unit_id: usize,
    position: Position,
    frames: Vec<F>,
}

#[derive(Deserialize)]
struct RawTile<F> {
    unit_id: usize,
    position: Position,
    frames: Vec<F>,
}

impl<F> TryFrom<RawTile<F>> for Tile<F> {
    type Error = PuzzleError;

    fn try_from(raw: RawTile<F>) -> Result<Self, Self::Error> {
        if raw.frames.is_empty() {
            return Err(PuzzleError::MissingFrames {
                unit_id: raw.unit_id,
            });
        }
        Ok(Tile::new(raw.unit_id, raw.position, raw.frames))
    }
}

impl<F> Tile<F> {
    pub(crate) fn new(unit_id: usize, position: Position, frames: Vec<F>) -> Self {
        debug_assert!(!frames.is_empty());
        Self {
            unit_id,
            position,
            frames,
        }
    }

    /// Canonical id: the row-major index of the cell this tile belongs to
    pub fn unit_id(&self) -> usize {
        self.unit_id
    }

    /// Where the tile currently sits
    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame to draw for a shared animation index
    pub fn frame(&self, index: usize) -> &F {
        &self.frames[index % self.frames.len()]
    }

    /// Whether the tile sits on its canonical cell
    pub fn is_home(&self, size: GridSize) -> bool {
        size.id_from_position(self.position) == self.unit_id
    }
}
