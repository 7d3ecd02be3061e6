use crate::config::MAX_DIMENSION;
use crate::faces::{PaletteSource, TileFace};
use serde::{Deserialize, Serialize};
use slidepuzzle_core::solvability::is_solvable;
use slidepuzzle_core::{
    AnimationCycle, Board, Builder, Direction, FrameTick, FramesPerSecond, GridSize, MoveOutcome,
    Position, PuzzleError,
};
use std::time::{Duration, Instant};

/// One puzzle session: the board, its animation and the clock
pub struct Game {
    board: Board<TileFace>,
    builder: Builder,
    animation: AnimationCycle,
    fps: FramesPerSecond,
    /// Frames generated per tile for new boards
    frames: usize,
    start_time: Instant,
    elapsed: Duration,
    paused: bool,
    completed: bool,
}

impl Game {
    /// Shuffle a new board; a seed makes the whole session reproducible
    pub fn new(
        size: GridSize,
        frames: usize,
        fps: FramesPerSecond,
        seed: Option<u64>,
    ) -> Result<Self, PuzzleError> {
        let mut builder = match seed {
            Some(seed) => Builder::with_seed(seed),
            None => Builder::new(),
        };
        let source = PaletteSource::new(size, frames);
        let board = builder.build(size.rows(), size.columns(), &source)?;

        let mut game = Self {
            board,
            builder,
            animation: AnimationCycle::new(),
            fps,
            frames: source.frame_count(),
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            paused: false,
            completed: false,
        };
        game.start_animation(Instant::now());
        Ok(game)
    }

    /// Replace the board with a fresh shuffle of `size`.
    ///
    /// The running animation is cancelled before the new board is built, so
    /// no tick from the old schedule can reach the new tiles. On error the
    /// old board stays but no longer animates.
    pub fn restart(&mut self, size: GridSize) -> Result<(), PuzzleError> {
        self.animation.cancel();
        let source = PaletteSource::new(size, self.frames);
        self.board = self.builder.build(size.rows(), size.columns(), &source)?;
        self.reset_clock(Duration::ZERO, false);
        self.start_animation(Instant::now());
        log::info!("new {} game", size);
        Ok(())
    }

    fn start_animation(&mut self, now: Instant) {
        self.animation.start(self.board.frame_len(), self.fps, now);
    }

    fn reset_clock(&mut self, elapsed: Duration, paused: bool) {
        self.start_time = Instant::now();
        self.elapsed = elapsed;
        self.completed = self.board.is_solved();
        self.paused = paused && !self.completed;
    }

    pub fn board(&self) -> &Board<TileFace> {
        &self.board
    }

    pub fn size(&self) -> GridSize {
        self.board.size()
    }

    pub fn fps(&self) -> FramesPerSecond {
        self.fps
    }

    /// Frames each tile cycles through (1 for a still picture)
    pub fn frame_len(&self) -> usize {
        self.board.frame_len()
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_running()
    }

    /// Frame every tile should be drawn with
    pub fn frame_index(&self) -> usize {
        self.animation.frame_index()
    }

    pub fn moves(&self) -> usize {
        self.board.moves()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        if self.paused || self.completed {
            self.elapsed
        } else {
            self.elapsed + self.start_time.elapsed()
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.completed {
            return;
        }

        if self.paused {
            self.start_time = Instant::now();
        } else {
            self.elapsed += self.start_time.elapsed();
        }
        self.paused = !self.paused;
    }

    /// Slide the tile at `target` into the gap
    pub fn attempt_move(&mut self, target: Position) -> MoveOutcome {
        if self.paused {
            return MoveOutcome::Ignored;
        }
        let outcome = self.board.attempt_move(target);
        self.after_move(outcome)
    }

    /// Slide the tile on the far side of the gap in `direction`
    pub fn slide(&mut self, direction: Direction) -> MoveOutcome {
        if self.paused {
            return MoveOutcome::Ignored;
        }
        let outcome = self.board.slide(direction);
        self.after_move(outcome)
    }

    fn after_move(&mut self, outcome: MoveOutcome) -> MoveOutcome {
        if outcome == MoveOutcome::Solved {
            self.elapsed += self.start_time.elapsed();
            self.completed = true;
        }
        outcome
    }

    /// Advance the animation if a frame is due. Frozen while paused.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTick> {
        if self.paused {
            return None;
        }
        self.animation.poll(now)
    }

    /// How long the event loop may wait before the next animation frame
    pub fn time_until_next_frame(&self, now: Instant) -> Option<Duration> {
        if self.paused {
            return None;
        }
        self.animation.time_until_next(now)
    }

    /// Serialize game state to JSON
    pub fn serialize(&self) -> String {
        let size = self.board.size();
        let state = SaveState {
            rows: size.rows(),
            columns: size.columns(),
            layout: self.board.layout(),
            moves: self.board.moves(),
            elapsed_secs: self.elapsed().as_secs(),
            frames: self.frames,
        };
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Replace the current game with a saved one.
    ///
    /// Nothing changes if the save is unreadable, malformed or describes a
    /// board that cannot be solved. A loaded game starts paused.
    pub fn load(&mut self, json: &str) -> Result<(), PuzzleError> {
        let state: SaveState = serde_json::from_str(json)
            .map_err(|e| PuzzleError::InvalidLayout(format!("unreadable save: {}", e)))?;
        if state.rows > MAX_DIMENSION || state.columns > MAX_DIMENSION {
            return Err(PuzzleError::InvalidLayout(format!(
                "saved {}x{} board is larger than {}x{}",
                state.columns, state.rows, MAX_DIMENSION, MAX_DIMENSION
            )));
        }
        let size = GridSize::new(state.rows, state.columns)?;
        let source = PaletteSource::new(size, state.frames);
        let board = Board::from_layout(size, &state.layout, &source)?.with_moves(state.moves);
        if !is_solvable(size, &state.layout) {
            return Err(PuzzleError::InvalidLayout(format!(
                "saved {} board cannot be solved",
                size
            )));
        }

        self.animation.cancel();
        self.board = board;
        self.frames = source.frame_count();
        self.reset_clock(Duration::from_secs(state.elapsed_secs), true);
        self.start_animation(Instant::now());
        log::info!("loaded {} game at {} moves", size, state.moves);
        Ok(())
    }
}

/// Save state for serialization
#[derive(Serialize, Deserialize)]
struct SaveState {
    rows: usize,
    columns: usize,
    /// Row-major canonical ids, `None` for the gap
    layout: Vec<Option<usize>>,
    moves: usize,
    elapsed_secs: u64,
    frames: usize,
}
