use crate::frames::collect_frames;
use crate::{Direction, FrameSource, GridSize, Position, PuzzleError, Tile};
use serde::{Deserialize, Serialize};

/// Lifecycle of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting moves, win check after each one
    Playing,
    /// Terminal: every tile is home and moves are ignored
    Solved,
}

/// What a move request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// Not adjacent to the empty slot, no tile there, or the board is already solved
    Ignored,
    /// One tile slid into the empty slot
    Moved,
    /// One tile slid and that completed the picture
    Solved,
}

impl MoveOutcome {
    pub fn is_move(self) -> bool {
        !matches!(self, MoveOutcome::Ignored)
    }
}

/// The mutable puzzle: tile positions, the empty slot and the win state.
///
/// Each tile's own position is authoritative. `cells` is a derived
/// position → tile index that only `attempt_move` and construction write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard<F>", bound(deserialize = "F: Deserialize<'de>"))]
pub struct Board<F> {
    size: GridSize,
    /// Tiles in the order they were laid out
    tiles: Vec<Tile<F>>,
    #[serde(skip)]
    cells: Vec<Option<usize>>,
    empty: Position,
    /// The bottom-right tile, held back until the puzzle is solved
    spare: Tile<F>,
    phase: Phase,
    moves: usize,
}

#[derive(Deserialize)]
struct RawBoard<F> {
    size: GridSize,
    tiles: Vec<Tile<F>>,
    empty: Position,
    spare: Tile<F>,
    phase: Phase,
    moves: usize,
}

impl<F> TryFrom<RawBoard<F>> for Board<F> {
    type Error = PuzzleError;

    fn try_from(raw: RawBoard<F>) -> Result<Self, Self::Error> {
        let mut board = Board::assemble(raw.size, raw.tiles, raw.spare)?;
        if board.empty != raw.empty {
            return Err(PuzzleError::InvalidLayout(format!(
                "empty slot recorded at {} but free cell is {}",
                raw.empty, board.empty
            )));
        }
        if raw.phase == Phase::Solved && !board.is_solved() {
            return Err(PuzzleError::InvalidLayout(
                "marked solved but tiles are out of place".to_string(),
            ));
        }
        board.moves = raw.moves;
        Ok(board)
    }
}

impl<F> Board<F> {
    /// Index the tiles and check that tiles plus the empty slot cover the grid exactly once.
    pub(crate) fn assemble(
        size: GridSize,
        tiles: Vec<Tile<F>>,
        spare: Tile<F>,
    ) -> Result<Self, PuzzleError> {
        let count = size.cell_count();
        if tiles.len() + 1 != count {
            return Err(PuzzleError::InvalidLayout(format!(
                "expected {} tiles, got {}",
                count - 1,
                tiles.len()
            )));
        }
        if spare.unit_id() != count - 1 || spare.position() != size.last_cell() {
            return Err(PuzzleError::InvalidLayout(
                "held-back tile must be the bottom-right one".to_string(),
            ));
        }

        let mut cells = vec![None; count];
        let mut seen = vec![false; count];
        for (slot, tile) in tiles.iter().enumerate() {
            let pos = tile.position();
            if !size.contains(pos) {
                return Err(PuzzleError::InvalidLayout(format!(
                    "tile {} is off the board at {}",
                    tile.unit_id(),
                    pos
                )));
            }
            if tile.unit_id() >= count - 1 || seen[tile.unit_id()] {
                return Err(PuzzleError::InvalidLayout(format!(
                    "tile id {} is out of range or repeated",
                    tile.unit_id()
                )));
            }
            seen[tile.unit_id()] = true;

            let cell = &mut cells[size.id_from_position(pos)];
            if cell.is_some() {
                return Err(PuzzleError::InvalidLayout(format!(
                    "two tiles share cell {}",
                    pos
                )));
            }
            *cell = Some(slot);
        }

        // Exactly one free cell remains because there are count - 1 distinct occupied cells
        let empty = cells
            .iter()
            .position(Option::is_none)
            .map(|i| size.position_from_index(i))
            .ok_or_else(|| PuzzleError::InvalidLayout("no empty cell".to_string()))?;

        let mut board = Self {
            size,
            tiles,
            cells,
            empty,
            spare,
            phase: Phase::Playing,
            moves: 0,
        };
        if board.is_solved() {
            board.phase = Phase::Solved;
        }
        Ok(board)
    }

    /// Rebuild a board from a row-major layout of canonical ids (`None` marks the empty slot)
    pub fn from_layout<S>(
        size: GridSize,
        layout: &[Option<usize>],
        source: &S,
    ) -> Result<Self, PuzzleError>
    where
        S: FrameSource<Frame = F> + ?Sized,
    {
        let count = size.cell_count();
        if layout.len() != count {
            return Err(PuzzleError::InvalidLayout(format!(
                "layout has {} cells, board has {}",
                layout.len(),
                count
            )));
        }
        if let Some(id) = layout.iter().flatten().find(|&&id| id >= count - 1) {
            return Err(PuzzleError::InvalidLayout(format!(
                "tile id {} cannot be placed on a {} board",
                id, size
            )));
        }

        let mut frames: Vec<Option<Vec<F>>> = collect_frames(size, source)?
            .into_iter()
            .map(Some)
            .collect();
        let spare_frames = frames[count - 1].take().unwrap_or_default();
        let spare = Tile::new(count - 1, size.last_cell(), spare_frames);

        let mut tiles = Vec::with_capacity(count - 1);
        for (index, id) in layout.iter().enumerate() {
            let Some(id) = *id else { continue };
            let tile_frames = frames[id].take().ok_or_else(|| {
                PuzzleError::InvalidLayout(format!("tile id {} appears more than once", id))
            })?;
            tiles.push(Tile::new(id, size.position_from_index(index), tile_frames));
        }

        Self::assemble(size, tiles, spare)
    }

    /// Restore a move counter carried over from a saved game
    pub fn with_moves(mut self, moves: usize) -> Self {
        self.moves = moves;
        self
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Position of the gap
    pub fn empty_slot(&self) -> Position {
        self.empty
    }

    /// Number of successful moves so far
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// All tiles in play, in layout order
    pub fn tiles(&self) -> &[Tile<F>] {
        &self.tiles
    }

    /// The held-back bottom-right tile
    pub fn spare(&self) -> &Tile<F> {
        &self.spare
    }

    /// The held-back tile, once the puzzle is solved and it can be shown
    pub fn revealed_tile(&self) -> Option<&Tile<F>> {
        (self.phase == Phase::Solved).then_some(&self.spare)
    }

    /// Tile occupying a cell, or `None` for the empty slot and off-board cells
    pub fn tile_at(&self, pos: Position) -> Option<&Tile<F>> {
        if !self.size.contains(pos) {
            return None;
        }
        self.cells[self.size.id_from_position(pos)].map(|slot| &self.tiles[slot])
    }

    /// Every tile sits on the cell matching its canonical id
    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(|tile| tile.is_home(self.size))
    }

    /// Cells whose tile could slide into the gap right now
    pub fn movable_positions(&self) -> Vec<Position> {
        if self.phase == Phase::Solved {
            return Vec::new();
        }
        self.size.neighbors(self.empty).collect()
    }

    /// Slide the tile at `target` into the empty slot.
    ///
    /// Anything other than a tile orthogonally adjacent to the gap is ignored,
    /// as is every request once the board is solved.
    pub fn attempt_move(&mut self, target: Position) -> MoveOutcome {
        if self.phase == Phase::Solved {
            log::trace!("ignoring move to {} on a solved board", target);
            return MoveOutcome::Ignored;
        }
        if !self.size.neighbors(self.empty).any(|pos| pos == target) {
            log::trace!("ignoring move to {}: not next to gap {}", target, self.empty);
            return MoveOutcome::Ignored;
        }
        let from = self.size.id_from_position(target);
        let Some(slot) = self.cells[from] else {
            return MoveOutcome::Ignored;
        };

        let to = self.empty;
        self.tiles[slot].set_position(to);
        self.cells[self.size.id_from_position(to)] = Some(slot);
        self.cells[from] = None;
        self.empty = target;
        self.moves += 1;

        if self.is_solved() {
            self.phase = Phase::Solved;
            log::info!("{} puzzle solved in {} moves", self.size, self.moves);
            return MoveOutcome::Solved;
        }
        MoveOutcome::Moved
    }

    /// Slide whichever tile can travel in `direction` into the gap.
    ///
    /// Pressing Up moves the tile below the gap upward.
    pub fn slide(&mut self, direction: Direction) -> MoveOutcome {
        match self.empty.step(direction.opposite(), self.size) {
            Some(target) => self.attempt_move(target),
            None => MoveOutcome::Ignored,
        }
    }

    /// Row-major canonical ids, `None` for the empty slot
    pub fn layout(&self) -> Vec<Option<usize>> {
        self.cells
            .iter()
            .map(|cell| cell.map(|slot| self.tiles[slot].unit_id()))
            .collect()
    }

    /// Length of the shared animation cycle: the shortest frame sequence on the board
    pub fn frame_len(&self) -> usize {
        self.tiles
            .iter()
            .chain(std::iter::once(&self.spare))
            .map(Tile::frame_count)
            .min()
            .unwrap_or(1)
    }
}

impl<F> std::fmt::Display for Board<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.size.cell_count().to_string().len();
        for y in 0..self.size.rows() {
            for x in 0..self.size.columns() {
                if x > 0 {
                    write!(f, " ")?;
                }
                match self.tile_at(Position::new(x, y)) {
                    Some(tile) => write!(f, "{:>width$}", tile.unit_id() + 1)?,
                    None => write!(f, "{:>width$}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
