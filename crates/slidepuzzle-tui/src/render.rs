use crate::animations::particles::hue_to_rgb;
use crate::app::{App, MenuState, ScreenState, SIZE_PRESETS};
use crate::stats::{format_time, GameResult};
use crate::theme::ThemeChoice;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use slidepuzzle_core::{GridSize, Position};
use std::io;

/// Width reserved right of the board for the info panel
const PANEL_WIDTH: u16 = 26;
/// Rows reserved below the board for the key list
const CONTROLS_HEIGHT: u16 = 4;
const MAX_CELL_WIDTH: u16 = 8;
const MIN_CELL_WIDTH: u16 = 3;
const MAX_CELL_HEIGHT: u16 = 3;

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Where the board sits on screen. Maps terminal cells to grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the frame
    pub x: u16,
    pub y: u16,
    /// Screen columns per tile, including the one-column gutter
    pub cell_width: u16,
    /// Screen rows per tile
    pub cell_height: u16,
    pub size: GridSize,
}

impl BoardLayout {
    /// Fit the board into the terminal, leaving room for the panel and controls
    pub fn compute(size: GridSize, term_width: u16, term_height: u16) -> Self {
        let columns = to_u16(size.columns());
        let rows = to_u16(size.rows());

        let avail_w = term_width.saturating_sub(PANEL_WIDTH + 4);
        let avail_h = term_height.saturating_sub(CONTROLS_HEIGHT + 4);
        let cell_width = (avail_w / columns.max(1)).clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH);
        // Terminal cells are about twice as tall as wide
        let cell_height = (avail_h / rows.max(1))
            .min(MAX_CELL_HEIGHT)
            .min(cell_width / 2)
            .max(1);

        let board_width = columns.saturating_mul(cell_width).saturating_add(2);
        let total_width = board_width.saturating_add(3 + PANEL_WIDTH);
        let x = if term_width > total_width {
            (term_width - total_width) / 2
        } else {
            1
        };

        Self {
            x,
            y: 2,
            cell_width,
            cell_height,
            size,
        }
    }

    /// Outer width including the frame
    pub fn width(&self) -> u16 {
        to_u16(self.size.columns())
            .saturating_mul(self.cell_width)
            .saturating_add(2)
    }

    /// Outer height including the frame
    pub fn height(&self) -> u16 {
        to_u16(self.size.rows())
            .saturating_mul(self.cell_height)
            .saturating_add(2)
    }

    /// Top-left screen cell of a tile
    pub fn cell_origin(&self, pos: Position) -> (u16, u16) {
        (
            (self.x + 1).saturating_add(to_u16(pos.x).saturating_mul(self.cell_width)),
            (self.y + 1).saturating_add(to_u16(pos.y).saturating_mul(self.cell_height)),
        )
    }

    /// Grid position under a screen cell, if any
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        let dx = column.checked_sub(self.x + 1)?;
        let dy = row.checked_sub(self.y + 1)?;
        let pos = Position::new(
            (dx / self.cell_width) as usize,
            (dy / self.cell_height) as usize,
        );
        self.size.contains(pos).then_some(pos)
    }
}

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;

    // Particles move every frame, so the win screen always starts clean
    if app.needs_clear || app.screen_state == ScreenState::Win {
        execute!(
            stdout,
            SetBackgroundColor(app.theme.bg),
            Clear(ClearType::All)
        )?;
        app.needs_clear = false;
    }

    match app.screen_state {
        ScreenState::Stats => {
            app.board_layout = None;
            render_stats_screen(stdout, app, term_width)?;
        }
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Win => render_win_screen(stdout, app, term_width, term_height)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let layout = BoardLayout::compute(app.game.size(), term_width, term_height);
    app.board_layout = Some(layout);

    render_board(stdout, app, &layout)?;
    render_info_panel(stdout, app, layout.x + layout.width() + 3, layout.y)?;
    render_controls(stdout, app, layout.x, layout.y + layout.height() + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    if app.menu != MenuState::None {
        render_menu(stdout, app, term_width, term_height)?;
    }

    Ok(())
}

fn render_board(stdout: &mut io::Stdout, app: &App, layout: &BoardLayout) -> io::Result<()> {
    let theme = &app.theme;
    let board = app.game.board();
    let inner_width = layout.width() - 2;

    // Frame
    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        MoveTo(layout.x, layout.y),
        Print("┌"),
        Print("─".repeat(inner_width as usize)),
        Print("┐")
    )?;
    for row in 1..layout.height() - 1 {
        execute!(
            stdout,
            MoveTo(layout.x, layout.y + row),
            Print("│"),
            MoveTo(layout.x + layout.width() - 1, layout.y + row),
            Print("│")
        )?;
    }
    execute!(
        stdout,
        MoveTo(layout.x, layout.y + layout.height() - 1),
        Print("└"),
        Print("─".repeat(inner_width as usize)),
        Print("┘")
    )?;

    if app.game.is_paused() {
        for pos in board.size().positions() {
            render_cell(stdout, app, layout, pos, theme.empty, theme.info, "")?;
        }
        let label = "PAUSED";
        let x = layout.x + layout.width().saturating_sub(label.len() as u16) / 2;
        let y = layout.y + layout.height() / 2;
        execute!(
            stdout,
            MoveTo(x, y),
            SetBackgroundColor(theme.empty),
            SetForegroundColor(theme.key),
            Print(label)
        )?;
        return Ok(());
    }

    let frame = app.game.frame_index();
    for pos in board.size().positions() {
        let tile = board.tile_at(pos).or_else(|| {
            board
                .revealed_tile()
                .filter(|spare| spare.position() == pos)
        });
        match tile {
            Some(tile) => {
                let face = tile.frame(frame);
                render_cell(
                    stdout,
                    app,
                    layout,
                    pos,
                    theme.tile_color(face.color),
                    face.text_color(),
                    &face.label.to_string(),
                )?;
            }
            None => render_cell(stdout, app, layout, pos, theme.empty, theme.info, "")?,
        }
    }

    Ok(())
}

/// Fill one tile, leaving its right column and bottom row as gutter
fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    layout: &BoardLayout,
    pos: Position,
    fill: Color,
    text: Color,
    label: &str,
) -> io::Result<()> {
    let (x, y) = layout.cell_origin(pos);
    let width = layout.cell_width.saturating_sub(1).max(1) as usize;
    let height = if layout.cell_height > 1 {
        layout.cell_height - 1
    } else {
        1
    };
    let label_row = height / 2;

    for row in 0..height {
        let content = if row == label_row {
            let label: String = label.chars().take(width).collect();
            format!("{:^width$}", label, width = width)
        } else {
            " ".repeat(width)
        };
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(fill),
            SetForegroundColor(text),
            Print(content),
            SetBackgroundColor(app.theme.bg),
            Print(" ")
        )?;
    }
    if layout.cell_height > 1 {
        execute!(
            stdout,
            MoveTo(x, y + height),
            SetBackgroundColor(app.theme.bg),
            Print(" ".repeat(layout.cell_width as usize))
        )?;
    }
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ SLIDE PUZZLE ═══")
    )?;

    let time = format_time(game.elapsed().as_secs());
    let speed = if game.is_animated() {
        format!("{}", game.fps())
    } else {
        "still".to_string()
    };
    let lines = [
        format!("Size:  {:>12}", game.size().to_string()),
        format!("Moves: {:>12}", game.moves()),
        format!("Time:  {:>12}", time),
        format!("Speed: {:>12}", speed),
    ];
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + 2 + i as u16),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }

    if game.is_animated() {
        execute!(
            stdout,
            MoveTo(x, y + 6),
            SetForegroundColor(theme.info),
            Print(format!(
                "Frame: {:>12}",
                format!("{}/{}", game.frame_index() + 1, game.frame_len())
            ))
        )?;
    }

    let (status, color) = if game.is_completed() {
        ("Solved!", theme.success)
    } else if game.is_paused() {
        ("Paused", theme.key)
    } else {
        ("Playing", theme.fg)
    };
    execute!(
        stdout,
        MoveTo(x, y + 8),
        SetForegroundColor(color),
        Print(format!("{:<19}", status))
    )?;

    let best = app.stats.size_stats(game.size());
    let best_time = best
        .best_time_secs
        .map(format_time)
        .unwrap_or_else(|| "--:--".to_string());
    let fewest = best
        .fewest_moves
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    execute!(
        stdout,
        MoveTo(x, y + 10),
        SetForegroundColor(theme.border),
        Print(format!("Best:  {:>12}", best_time)),
        MoveTo(x, y + 11),
        Print(format!("Fewest:{:>12}", fewest))
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("Arrows", "Slide"),
        ("hjkl", "Slide"),
        ("wasd", "Slide"),
        ("Mouse", "Click tile"),
        ("n", "New game"),
        ("r", "Reshuffle"),
        ("p", "Pause"),
        ("t", "Theme"),
        ("S", "Save"),
        ("L", "Load"),
        ("i", "Stats"),
        ("q", "Quit"),
    ];

    // Four columns of three
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 3;
        let row = i % 3;
        let cx = x + (col as u16) * 18;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>6}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_menu(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    let (title, options): (&str, Vec<String>) = match app.menu {
        MenuState::NewGame => (
            "New Game",
            SIZE_PRESETS
                .iter()
                .map(|&(rows, columns)| {
                    format!("{} x {} ({} tiles)", columns, rows, rows * columns - 1)
                })
                .collect(),
        ),
        MenuState::Theme => (
            "Select Theme",
            ThemeChoice::ALL
                .iter()
                .map(|choice| choice.name().to_string())
                .collect(),
        ),
        MenuState::None => return Ok(()),
    };

    let menu_width: u16 = 30;
    let menu_height: u16 = options.len() as u16 + 5;
    let x = (term_width.saturating_sub(menu_width)) / 2;
    let y = (term_height.saturating_sub(menu_height)) / 2;

    let bg = Color::Rgb {
        r: 30,
        g: 30,
        b: 40,
    };

    for row in 0..menu_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(menu_width as usize))
        )?;
    }

    execute!(
        stdout,
        SetForegroundColor(theme.border),
        SetBackgroundColor(bg),
        MoveTo(x, y),
        Print("┌"),
        Print("─".repeat(menu_width as usize - 2)),
        Print("┐")
    )?;
    for row in 1..menu_height - 1 {
        execute!(stdout, MoveTo(x, y + row), Print("│"))?;
        execute!(stdout, MoveTo(x + menu_width - 1, y + row), Print("│"))?;
    }
    execute!(
        stdout,
        MoveTo(x, y + menu_height - 1),
        Print("└"),
        Print("─".repeat(menu_width as usize - 2)),
        Print("┘")
    )?;

    let title_x = x + (menu_width.saturating_sub(title.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(title_x, y + 1),
        SetForegroundColor(Color::White),
        SetBackgroundColor(bg),
        Print(title)
    )?;

    for (i, option) in options.iter().enumerate() {
        let selected = i == app.menu_selection;
        let (fg, item_bg) = if selected {
            (Color::Black, theme.key)
        } else {
            (Color::White, bg)
        };

        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(item_bg),
            Print(format!(" {:^24} ", option))
        )?;
    }

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    Ok(())
}

/// The solved board with particles around it and a banner underneath
fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    app.win_screen.resize(term_width, term_height);

    let layout = BoardLayout::compute(app.game.size(), term_width, term_height);
    app.board_layout = Some(layout);
    render_board(stdout, app, &layout)?;
    render_info_panel(stdout, app, layout.x + layout.width() + 3, layout.y)?;

    let theme = &app.theme;
    let covers_board = |x: u16, y: u16| {
        x >= layout.x
            && x < layout.x + layout.width()
            && y >= layout.y
            && y < layout.y + layout.height()
    };

    // Particles stay off the picture
    for particle in app.win_screen.particles() {
        if !particle.is_visible(term_width, term_height) {
            continue;
        }
        let (px, py) = (particle.x as u16, particle.y as u16);
        if covers_board(px, py) {
            continue;
        }
        execute!(
            stdout,
            MoveTo(px, py),
            SetForegroundColor(particle.color),
            SetBackgroundColor(theme.bg),
            Print(particle.char)
        )?;
    }

    let banner_top = layout.y + layout.height() + 1;
    let banner = app.win_screen.current_banner();
    let lines: Vec<&str> = banner.lines().filter(|l| !l.is_empty()).collect();
    let show_banner = banner_top + lines.len() as u16 + 5 < term_height;

    let mut text_y = banner_top;
    if show_banner {
        let banner_width = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(30) as u16;
        let banner_x = term_width.saturating_sub(banner_width) / 2;
        for (i, line) in lines.iter().enumerate() {
            let hue = app.win_screen.rainbow_offset() + i as f32 * 0.1;
            execute!(
                stdout,
                MoveTo(banner_x, banner_top + i as u16),
                SetForegroundColor(hue_to_rgb(hue, 1.0)),
                SetBackgroundColor(theme.bg),
                Print(line)
            )?;
        }
        text_y += lines.len() as u16 + 1;
    }

    let msg = app.win_screen.current_message();
    let msg_x = term_width.saturating_sub(msg.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(msg_x, text_y),
        SetForegroundColor(hue_to_rgb(app.win_screen.rainbow_offset() * 2.0, 1.0)),
        SetBackgroundColor(theme.bg),
        Print(msg)
    )?;

    let summary = format!(
        "{} in {} moves, {}",
        app.game.size(),
        app.game.moves(),
        format_time(app.game.elapsed().as_secs())
    );
    let summary_x = term_width.saturating_sub(summary.chars().count() as u16 + 2) / 2;
    execute!(
        stdout,
        MoveTo(summary_x, text_y + 1),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(format!(" {} ", summary)),
        SetBackgroundColor(theme.bg)
    )?;

    let instr = "Enter: play again  n: new size  Esc: view  q: quit";
    let instr_x = term_width.saturating_sub(instr.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(instr_x, text_y + 3),
        SetForegroundColor(theme.key),
        Print(instr)
    )?;

    Ok(())
}

fn render_stats_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let stats = &app.stats;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title = "═══ STATISTICS ═══";
    let title_x = term_width.saturating_sub(title.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    let x = 4u16;
    let mut y = 3u16;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(format!("Games played: {}", stats.total_games())),
        MoveTo(x, y + 1),
        SetForegroundColor(theme.success),
        Print(format!("Puzzles solved: {}", stats.total_wins()))
    )?;
    y += 3;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print(format!(
            "{:<7}{:>7}{:>7}{:>9}{:>9}{:>9}{:>8}",
            "Size", "Games", "Wins", "Best", "Avg", "Fewest", "Win %"
        ))
    )?;
    y += 1;

    let mut any = false;
    for (size, s) in stats.all_sizes() {
        any = true;
        let best = s.best_time_secs.map(format_time).unwrap_or_else(|| "-".into());
        let avg = s.avg_time_secs().map(format_time).unwrap_or_else(|| "-".into());
        let fewest = s.fewest_moves.map(|m| m.to_string()).unwrap_or_else(|| "-".into());
        execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(theme.info),
            Print(format!(
                "{:<7}{:>7}{:>7}{:>9}{:>9}{:>9}{:>7.0}%",
                size,
                s.total_games,
                s.wins,
                best,
                avg,
                fewest,
                s.win_rate()
            ))
        )?;
        y += 1;
    }
    if !any {
        execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(theme.border),
            Print("No games finished yet")
        )?;
        y += 1;
    }

    y += 1;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print("Recent games")
    )?;
    y += 1;
    for record in stats.recent_games(5).iter().rev() {
        let (result, color) = match record.result {
            GameResult::Win => ("solved", theme.success),
            GameResult::Abandoned => ("abandoned", theme.error),
        };
        execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(color),
            Print(format!("{:<10}", result)),
            SetForegroundColor(theme.info),
            Print(format!(
                "{:<7}{:>5} moves  {}{}",
                record.size.to_string(),
                record.moves,
                format_time(record.time_secs),
                if record.animated { "  animated" } else { "" }
            ))
        )?;
        y += 1;
    }

    execute!(
        stdout,
        MoveTo(x, y + 1),
        SetForegroundColor(theme.key),
        Print("Press q or Esc to return")
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_round_trips_cells() {
        let size = GridSize::new(4, 5).unwrap();
        let layout = BoardLayout::compute(size, 120, 40);
        for pos in size.positions() {
            let (col, row) = layout.cell_origin(pos);
            assert_eq!(layout.cell_at(col, row), Some(pos));
            // The far corner of the cell, gutter included, still belongs to it
            let far = (col + layout.cell_width - 1, row + layout.cell_height - 1);
            assert_eq!(layout.cell_at(far.0, far.1), Some(pos));
        }
    }

    #[test]
    fn test_layout_rejects_outside_points() {
        let size = GridSize::new(3, 3).unwrap();
        let layout = BoardLayout::compute(size, 100, 30);
        assert_eq!(layout.cell_at(layout.x, layout.y), None);
        assert_eq!(layout.cell_at(0, 0), None);
        let right = layout.x + layout.width();
        assert_eq!(layout.cell_at(right, layout.y + 1), None);
        let below = layout.y + layout.height();
        assert_eq!(layout.cell_at(layout.x + 1, below), None);
    }

    #[test]
    fn test_layout_shrinks_on_small_terminals() {
        let size = GridSize::new(6, 6).unwrap();
        let roomy = BoardLayout::compute(size, 200, 60);
        let cramped = BoardLayout::compute(size, 60, 20);
        assert_eq!(roomy.cell_width, MAX_CELL_WIDTH);
        assert!(cramped.cell_width < roomy.cell_width);
        assert!(cramped.cell_height >= 1);
        assert!(cramped.cell_width >= MIN_CELL_WIDTH);
    }

    #[test]
    fn test_layout_saturates_for_oversized_boards() {
        let size = GridSize::new(300, 70_000).unwrap();
        let layout = BoardLayout::compute(size, 80, 24);
        assert_eq!(layout.width(), u16::MAX);
        assert_eq!(layout.cell_origin(Position::new(69_999, 0)).0, u16::MAX);
    }
}
