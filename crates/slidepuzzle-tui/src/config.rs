use crate::theme::ThemeChoice;
use clap::Parser;
use slidepuzzle_core::{FramesPerSecond, GridSize, MIN_DIMENSION};

/// Largest row or column count that still fits a terminal
pub const MAX_DIMENSION: usize = 12;

/// Sliding tile puzzle for the terminal
#[derive(Parser, Debug)]
#[command(name = "slidepuzzle", version)]
pub struct Cli {
    /// Number of tile rows (clamped to 3-12)
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = lenient_dimension,
        allow_hyphen_values = true
    )]
    pub rows: usize,

    /// Number of tile columns (clamped to 3-12)
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = lenient_dimension,
        allow_hyphen_values = true
    )]
    pub columns: usize,

    /// Animation speed, clamped to 1-120; unreadable values mean 30
    #[arg(long, allow_hyphen_values = true)]
    pub fps: Option<String>,

    /// Animation frames per tile; 1 keeps the picture still
    #[arg(short, long, default_value_t = 1)]
    pub frames: usize,

    #[arg(long, value_enum, default_value_t = ThemeChoice::Dark)]
    pub theme: ThemeChoice,

    /// Fixed shuffle seed for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Normalised startup settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub size: GridSize,
    pub fps: FramesPerSecond,
    pub frames: usize,
    pub theme: ThemeChoice,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: GridSize::SMALLEST,
            fps: FramesPerSecond::default(),
            frames: 1,
            theme: ThemeChoice::Dark,
            seed: None,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            size: GridSize::new(self.rows, self.columns).unwrap_or(GridSize::SMALLEST),
            fps: FramesPerSecond::parse(self.fps.as_deref()),
            frames: self.frames.max(1),
            theme: self.theme,
            seed: self.seed,
        }
    }
}

/// Read a row or column count. Unreadable or too small values reset to the
/// minimum, oversized ones are capped.
pub fn parse_dimension(input: &str) -> usize {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&n| n >= MIN_DIMENSION)
        .map_or(MIN_DIMENSION, |n| n.min(MAX_DIMENSION))
}

fn lenient_dimension(input: &str) -> Result<usize, String> {
    Ok(parse_dimension(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["slidepuzzle"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().settings()
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("5"), 5);
        assert_eq!(parse_dimension(" 4 "), 4);
        assert_eq!(parse_dimension("2"), 3);
        assert_eq!(parse_dimension("0"), 3);
        assert_eq!(parse_dimension("-7"), 3);
        assert_eq!(parse_dimension("lots"), 3);
        assert_eq!(parse_dimension(""), 3);
        assert_eq!(parse_dimension("12"), 12);
        assert_eq!(parse_dimension("13"), MAX_DIMENSION);
        assert_eq!(parse_dimension("99999999999999999999999"), 3);
    }

    #[test]
    fn test_huge_dimensions_are_capped() {
        let settings = parse(&["--rows", "4294967295", "--columns", "4000"]);
        assert_eq!(settings.size, GridSize::new(MAX_DIMENSION, MAX_DIMENSION).unwrap());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), Settings::default());
    }

    #[test]
    fn test_lenient_arguments() {
        let settings = parse(&["--rows", "1", "--columns", "wide", "--fps", "zoom"]);
        assert_eq!(settings.size, GridSize::SMALLEST);
        assert_eq!(settings.fps.get(), 30);

        let settings = parse(&["--rows", "-2", "--fps", "-5"]);
        assert_eq!(settings.size, GridSize::SMALLEST);
        assert_eq!(settings.fps.get(), 1);

        let settings = parse(&["-r", "4", "-c", "6", "--fps", "500", "-f", "0"]);
        assert_eq!(settings.size, GridSize::new(4, 6).unwrap());
        assert_eq!(settings.fps.get(), 120);
        assert_eq!(settings.frames, 1);
    }

    #[test]
    fn test_theme_and_seed() {
        let settings = parse(&["--theme", "high-contrast", "--seed", "42", "--frames", "8"]);
        assert_eq!(settings.theme, ThemeChoice::HighContrast);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.frames, 8);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
