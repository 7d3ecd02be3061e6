use crate::animations::WinScreen;
use crate::config::Settings;
use crate::game::Game;
use crate::render::BoardLayout;
use crate::stats::{GameResult, StatsManager};
use crate::theme::{Theme, ThemeChoice};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crossterm::style::Color;
use slidepuzzle_core::{Direction, GridSize, MoveOutcome, PuzzleError};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Board sizes offered by the new game menu, as (rows, columns)
pub const SIZE_PRESETS: [(usize, usize); 6] = [(3, 3), (4, 4), (5, 5), (6, 6), (3, 4), (4, 5)];

/// Result of handling an input event
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Celebration over the solved picture
    Win,
    /// Statistics screen
    Stats,
}

/// Menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    NewGame,
    Theme,
}

/// The main application state
pub struct App {
    pub game: Game,
    pub menu: MenuState,
    pub menu_selection: usize,
    pub theme: Theme,
    pub theme_choice: ThemeChoice,
    /// Message to display
    pub message: Option<String>,
    message_timer: u32,
    pub screen_state: ScreenState,
    /// Where the stats screen returns to
    stats_return: ScreenState,
    pub win_screen: WinScreen,
    pub stats: StatsManager,
    /// Whether the current game has been recorded (to avoid double recording)
    game_recorded: bool,
    /// Where the board was last drawn, for mouse hit testing
    pub board_layout: Option<BoardLayout>,
    /// Set when stale text may be left on screen
    pub needs_clear: bool,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, PuzzleError> {
        Self::with_stats(settings, StatsManager::load())
    }

    pub fn with_stats(settings: Settings, stats: StatsManager) -> Result<Self, PuzzleError> {
        let game = Game::new(settings.size, settings.frames, settings.fps, settings.seed)?;
        log::info!(
            "starting {} game, {} frames per tile at {}",
            settings.size,
            game.frame_len(),
            settings.fps
        );
        Ok(Self {
            game,
            menu: MenuState::None,
            menu_selection: 0,
            theme: Theme::from(settings.theme),
            theme_choice: settings.theme,
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            stats_return: ScreenState::Playing,
            win_screen: WinScreen::new(),
            stats,
            game_recorded: false,
            board_layout: None,
            needs_clear: true,
        })
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Win => Duration::from_millis(33),
            ScreenState::Playing | ScreenState::Stats => Duration::from_millis(100),
        }
    }

    /// Update overlays and timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
                self.needs_clear = true;
            }
        }

        if self.screen_state == ScreenState::Win {
            self.win_screen.update();
        }
    }

    /// Step the tile animation if a frame is due
    pub fn poll_animation(&mut self, now: Instant) {
        if let Some(tick) = self.game.tick(now) {
            log::trace!("frame {} of task {:?}", tick.index, tick.task);
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30;
        self.needs_clear = true;
    }

    fn record_game(&mut self, result: GameResult) {
        if self.game_recorded {
            return;
        }
        self.game_recorded = true;

        self.stats.record_game(
            self.game.size(),
            result,
            self.game.moves(),
            self.game.elapsed().as_secs(),
            self.game.is_animated(),
        );
        self.stats.save();
    }

    /// Record an unfinished game that was actually played
    fn abandon_current(&mut self) {
        if !self.game.is_completed() && self.game.moves() > 0 {
            self.record_game(GameResult::Abandoned);
        }
    }

    fn start_new_game(&mut self, size: GridSize) {
        self.abandon_current();
        match self.game.restart(size) {
            Ok(()) => {
                self.game_recorded = false;
                self.screen_state = ScreenState::Playing;
                self.show_message(&format!("New {} game", size));
            }
            Err(e) => {
                log::error!("could not start a {} game: {}", size, e);
                self.show_message(&e.to_string());
            }
        }
    }

    fn apply_outcome(&mut self, outcome: MoveOutcome) {
        if outcome != MoveOutcome::Solved {
            return;
        }
        self.record_game(GameResult::Win);
        let frame = self.game.frame_index();
        let board = self.game.board();
        let palette: Vec<Color> = board
            .tiles()
            .iter()
            .chain(std::iter::once(board.spare()))
            .map(|tile| tile.frame(frame).color)
            .collect();
        self.win_screen.reset(palette);
        self.screen_state = ScreenState::Win;
        self.needs_clear = true;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        self.needs_clear = true;
        match self.screen_state {
            ScreenState::Win => self.handle_win_key(key),
            ScreenState::Stats => self.handle_stats_key(key),
            ScreenState::Playing => match self.menu {
                MenuState::None => self.handle_game_key(key),
                MenuState::NewGame | MenuState::Theme => self.handle_menu_key(key),
            },
        }
    }

    /// Left press or drag over a tile tries to slide it
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen_state != ScreenState::Playing || self.menu != MenuState::None {
            return;
        }
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return;
        }
        let Some(target) = self
            .board_layout
            .and_then(|layout| layout.cell_at(mouse.column, mouse.row))
        else {
            return;
        };
        let outcome = self.game.attempt_move(target);
        self.apply_outcome(outcome);
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') => {
                self.screen_state = ScreenState::Playing;
                self.open_new_game_menu();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => {
                self.start_new_game(self.game.size());
            }
            KeyCode::Char('i') => self.show_stats(),
            KeyCode::Esc => {
                // Back to the finished picture
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        let slide = match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = slide {
            let outcome = self.game.slide(direction);
            self.apply_outcome(outcome);
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.abandon_current();
                return AppAction::Quit;
            }

            KeyCode::Char('n') => self.open_new_game_menu(),

            KeyCode::Char('r') => self.start_new_game(self.game.size()),

            KeyCode::Char('t') => {
                self.menu = MenuState::Theme;
                self.menu_selection = ThemeChoice::ALL
                    .iter()
                    .position(|&choice| choice == self.theme_choice)
                    .unwrap_or(0);
            }

            KeyCode::Char('p') => {
                self.game.toggle_pause();
                if self.game.is_paused() {
                    self.show_message("Paused");
                } else if !self.game.is_completed() {
                    self.show_message("Resumed");
                }
            }

            KeyCode::Char('S') => self.save_game(),

            KeyCode::Char('L') => self.load_game(),

            KeyCode::Char('i') => self.show_stats(),

            _ => {}
        }

        AppAction::Continue
    }

    fn open_new_game_menu(&mut self) {
        let current = self.game.size();
        self.menu = MenuState::NewGame;
        self.menu_selection = SIZE_PRESETS
            .iter()
            .position(|&(rows, columns)| rows == current.rows() && columns == current.columns())
            .unwrap_or(0);
    }

    fn menu_len(&self) -> usize {
        match self.menu {
            MenuState::NewGame => SIZE_PRESETS.len(),
            MenuState::Theme => ThemeChoice::ALL.len(),
            MenuState::None => 0,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = MenuState::None;
            }

            KeyCode::Up | KeyCode::Char('k') => {
                if self.menu_selection > 0 {
                    self.menu_selection -= 1;
                }
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < self.menu_len() {
                    self.menu_selection += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                match self.menu {
                    MenuState::NewGame => {
                        let index = self.menu_selection.min(SIZE_PRESETS.len() - 1);
                        let (rows, columns) = SIZE_PRESETS[index];
                        self.menu = MenuState::None;
                        match GridSize::new(rows, columns) {
                            Ok(size) => self.start_new_game(size),
                            Err(e) => self.show_message(&e.to_string()),
                        }
                    }
                    MenuState::Theme => {
                        let index = self.menu_selection.min(ThemeChoice::ALL.len() - 1);
                        let choice = ThemeChoice::ALL[index];
                        self.theme_choice = choice;
                        self.theme = Theme::from(choice);
                        self.menu = MenuState::None;
                    }
                    MenuState::None => {}
                }
            }

            _ => {}
        }

        AppAction::Continue
    }

    fn show_stats(&mut self) {
        self.stats_return = self.screen_state;
        self.screen_state = ScreenState::Stats;
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> AppAction {
        if let KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('i') = key.code {
            self.screen_state = self.stats_return;
        }
        AppAction::Continue
    }

    /// Get the save file path
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("slidepuzzle_save.json")
    }

    fn save_game(&mut self) {
        let json = self.game.serialize();
        match fs::write(Self::save_path(), json) {
            Ok(_) => self.show_message("Game saved"),
            Err(e) => {
                log::warn!("saving game failed: {}", e);
                self.show_message("Failed to save");
            }
        }
    }

    fn load_game(&mut self) {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => self.load_from_json(&json),
            Err(_) => self.show_message("No save file found"),
        }
    }

    fn load_from_json(&mut self, json: &str) {
        self.abandon_current();
        match self.game.load(json) {
            Ok(()) => {
                // A loaded game counts as a fresh one for the stats
                self.game_recorded = self.game.is_completed();
                self.screen_state = ScreenState::Playing;
                self.show_message("Game loaded (paused, press p)");
            }
            Err(e) => {
                log::warn!("rejected save file: {}", e);
                self.show_message("Invalid save file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app(seed: u64) -> App {
        let settings = Settings {
            seed: Some(seed),
            ..Settings::default()
        };
        App::with_stats(settings, StatsManager::default()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    const ONE_MOVE_LEFT: &str = r#"{"rows":3,"columns":3,"layout":[0,1,2,3,4,5,6,null,7],"moves":4,"elapsed_secs":12,"frames":1}"#;

    #[test]
    fn test_arrow_keys_slide_tiles() {
        let mut app = app(3);
        let before = app.game.board().empty_slot();
        // From the bottom-right corner only Down and Right have a tile to slide
        press(&mut app, KeyCode::Down);
        assert_ne!(app.game.board().empty_slot(), before);
        assert_eq!(app.game.moves(), 1);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.game.board().empty_slot(), before);
        assert_eq!(app.game.moves(), 2);
    }

    #[test]
    fn test_solving_shows_win_and_records() {
        let mut app = app(1);
        app.load_from_json(ONE_MOVE_LEFT);
        assert!(app.game.is_paused());
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.game.is_paused());

        press(&mut app, KeyCode::Left);
        assert!(app.game.is_completed());
        assert_eq!(app.screen_state, ScreenState::Win);
        assert!(app.game.board().revealed_tile().is_some());

        let stats = app.stats.size_stats(GridSize::SMALLEST);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.fewest_moves, Some(5));

        // Esc returns to the frozen board; moves are ignored now
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen_state, ScreenState::Playing);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.game.moves(), 5);
    }

    #[test]
    fn test_new_game_menu_picks_size() {
        let mut app = app(9);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.menu, MenuState::NewGame);
        assert_eq!(app.menu_selection, 0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(app.game.size(), GridSize::new(4, 4).unwrap());
        assert_eq!(app.game.moves(), 0);
    }

    #[test]
    fn test_restart_records_abandoned_game() {
        let mut app = app(4);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('r'));
        let stats = app.stats.size_stats(GridSize::SMALLEST);
        assert_eq!(stats.abandoned, 1);
        assert_eq!(app.game.moves(), 0);

        // An untouched board is not worth recording
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.stats.size_stats(GridSize::SMALLEST).total_games, 1);
    }

    #[test]
    fn test_theme_menu() {
        let mut app = app(2);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.menu, MenuState::Theme);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.theme_choice, ThemeChoice::HighContrast);
    }

    #[test]
    fn test_mouse_click_moves_tile_next_to_gap() {
        let mut app = app(5);
        let layout = BoardLayout::compute(app.game.size(), 100, 40);
        app.board_layout = Some(layout);

        let gap = app.game.board().empty_slot();
        let far = slidepuzzle_core::Position::new(0, 0);
        let (col, row) = layout.cell_origin(far);
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.game.moves(), 0);

        let near = gap.step(Direction::Up, app.game.size()).unwrap();
        let (col, row) = layout.cell_origin(near);
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.game.moves(), 1);
        assert_eq!(app.game.board().empty_slot(), near);
    }

    #[test]
    fn test_invalid_save_is_rejected() {
        let mut app = app(6);
        let before = app.game.board().layout();
        app.load_from_json(r#"{"rows":3,"columns":3,"layout":[1,0,2,3,4,5,6,7,null],"moves":0,"elapsed_secs":0,"frames":1}"#);
        assert_eq!(app.game.board().layout(), before);
        assert_eq!(app.message.as_deref(), Some("Invalid save file"));
    }

    #[test]
    fn test_quit() {
        let mut app = app(7);
        assert!(matches!(press(&mut app, KeyCode::Char('q')), AppAction::Quit));
    }
}
