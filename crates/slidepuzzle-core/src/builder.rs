use crate::frames::collect_frames;
use crate::solvability::count_inversions;
use crate::{Board, FrameSource, GridSize, PuzzleError, Tile};

/// Builds freshly shuffled, always solvable boards.
///
/// The bottom-right tile is held back and its cell becomes the empty slot.
/// The remaining tiles are shuffled and laid out row by row; if the shuffle
/// has an odd number of inversions the last two tiles trade places, which
/// flips the parity and makes the board solvable.
///
/// A shuffle that comes out already solved is drawn again, so a built board
/// is never the finished picture. A seeded builder still produces the same
/// sequence of boards.
pub struct Builder {
    rng: SimpleRng,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Create a builder seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: SimpleRng::new(),
        }
    }

    /// Create a builder with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Shuffle a new board of `rows` x `columns` tiles.
    ///
    /// Fails without building anything if the grid is smaller than 3x3 or
    /// the source lacks frames for any tile.
    pub fn build<S>(
        &mut self,
        rows: usize,
        columns: usize,
        source: &S,
    ) -> Result<Board<S::Frame>, PuzzleError>
    where
        S: FrameSource + ?Sized,
    {
        let size = GridSize::new(rows, columns)?;
        let (mut tiles, spare) = canonical_tiles(size, source)?;

        // A shuffle that lands on the solved picture is no puzzle at all
        loop {
            self.shuffle(&mut tiles);
            lay_out(size, &mut tiles);
            if !tiles.iter().all(|tile| tile.is_home(size)) {
                break;
            }
            log::debug!("shuffle of {} came out solved, reshuffling", size);
        }

        Board::assemble(size, tiles, spare)
    }

    /// Lay tiles out in a given sequence of canonical ids, applying the parity fix.
    ///
    /// `order` must name every id except the held-back `rows * columns - 1`
    /// exactly once. The result is a deterministic function of its inputs.
    pub fn arrange<S>(
        size: GridSize,
        order: &[usize],
        source: &S,
    ) -> Result<Board<S::Frame>, PuzzleError>
    where
        S: FrameSource + ?Sized,
    {
        let tile_count = size.cell_count() - 1;
        let mut seen = vec![false; tile_count];
        if order.len() != tile_count {
            return Err(PuzzleError::InvalidLayout(format!(
                "order names {} tiles, board has {}",
                order.len(),
                tile_count
            )));
        }
        for &id in order {
            if id >= tile_count || std::mem::replace(&mut seen[id], true) {
                return Err(PuzzleError::InvalidLayout(format!(
                    "tile id {} is out of range or repeated",
                    id
                )));
            }
        }

        let (tiles, spare) = canonical_tiles(size, source)?;
        let mut slots: Vec<Option<Tile<S::Frame>>> = tiles.into_iter().map(Some).collect();
        let mut ordered: Vec<Tile<S::Frame>> = order
            .iter()
            .filter_map(|&id| slots[id].take())
            .collect();

        lay_out(size, &mut ordered);
        Board::assemble(size, ordered, spare)
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Build a new board with an OS-seeded builder
pub fn new_game<S>(rows: usize, columns: usize, source: &S) -> Result<Board<S::Frame>, PuzzleError>
where
    S: FrameSource + ?Sized,
{
    Builder::new().build(rows, columns, source)
}

/// Every tile in canonical order, with the bottom-right one split off
fn canonical_tiles<S>(
    size: GridSize,
    source: &S,
) -> Result<(Vec<Tile<S::Frame>>, Tile<S::Frame>), PuzzleError>
where
    S: FrameSource + ?Sized,
{
    let mut tiles: Vec<Tile<S::Frame>> = collect_frames(size, source)?
        .into_iter()
        .enumerate()
        .map(|(unit_id, frames)| Tile::new(unit_id, size.position_from_index(unit_id), frames))
        .collect();
    let spare = tiles
        .pop()
        .ok_or(PuzzleError::InvalidConfiguration {
            rows: size.rows(),
            columns: size.columns(),
        })?;
    Ok((tiles, spare))
}

/// Place the i-th tile of the sequence on the i-th cell and fix odd parity
fn lay_out<F>(size: GridSize, tiles: &mut [Tile<F>]) {
    for (index, tile) in tiles.iter_mut().enumerate() {
        tile.set_position(size.position_from_index(index));
    }

    let ids: Vec<usize> = tiles.iter().map(Tile::unit_id).collect();
    let inversions = count_inversions(&ids);
    // The gap is fixed in the bottom-right corner, so only even counts are solvable
    let corrected = inversions % 2 == 1;
    if corrected {
        swap_last_two(tiles);
    }
    log::debug!(
        "laid out {} board with {} inversions{}",
        size,
        inversions,
        if corrected { ", swapped last two tiles" } else { "" }
    );
}

/// Exchange the last two tiles of a laid-out sequence, identity and position together.
///
/// Afterwards the i-th tile still sits on the i-th cell, and exactly one
/// pair of tiles has changed relative order.
pub(crate) fn swap_last_two<F>(tiles: &mut [Tile<F>]) {
    let len = tiles.len();
    if len < 2 {
        return;
    }
    let second_last = tiles[len - 2].position();
    let last = tiles[len - 1].position();
    tiles.swap(len - 2, len - 1);
    tiles[len - 2].set_position(second_last);
    tiles[len - 1].set_position(last);
}

/// Small PCG-style generator, reproducible from a `u64` seed
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        // Seed from the OS entropy source
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: a process-wide counter if the OS source is unavailable
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}
