use clap::ValueEnum;
use crossterm::style::Color;

/// Themes selectable from the command line and the theme menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
    HighContrast,
}

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 3] = [
        ThemeChoice::Dark,
        ThemeChoice::Light,
        ThemeChoice::HighContrast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ThemeChoice::Dark => "Dark",
            ThemeChoice::Light => "Light",
            ThemeChoice::HighContrast => "High Contrast",
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Board frame color
    pub border: Color,
    /// Fill of the empty slot
    pub empty: Color,
    /// Menu / message highlight background
    pub selected_bg: Color,
    /// Error color
    pub error: Color,
    /// Success/complete color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// How strongly tile colors are mixed toward the background (0 = untouched)
    pub tile_dim: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Theme::dark(),
            ThemeChoice::Light => Theme::light(),
            ThemeChoice::HighContrast => Theme::high_contrast(),
        }
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            empty: Color::Rgb { r: 35, g: 40, b: 55 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            tile_dim: 0.15,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 60, g: 60, b: 80 },
            empty: Color::Rgb { r: 225, g: 228, b: 238 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            tile_dim: 0.0,
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            empty: Color::Black,
            selected_bg: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
            tile_dim: 0.0,
        }
    }

    /// Blend a tile color toward the background by `tile_dim`
    pub fn tile_color(&self, color: Color) -> Color {
        match (color, self.bg) {
            (Color::Rgb { r, g, b }, Color::Rgb { r: br, g: bg, b: bb }) if self.tile_dim > 0.0 => {
                let mix = |c: u8, base: u8| -> u8 {
                    (c as f32 * (1.0 - self.tile_dim) + base as f32 * self.tile_dim) as u8
                };
                Color::Rgb {
                    r: mix(r, br),
                    g: mix(g, bg),
                    b: mix(b, bb),
                }
            }
            _ => color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_color_dims_toward_background() {
        let theme = Theme::dark();
        let dimmed = theme.tile_color(Color::Rgb { r: 255, g: 255, b: 255 });
        match dimmed {
            Color::Rgb { r, .. } => assert!(r < 255 && r > 200),
            other => panic!("unexpected color {:?}", other),
        }

        let light = Theme::light();
        let red = Color::Rgb { r: 255, g: 0, b: 0 };
        assert_eq!(light.tile_color(red), red);
    }
}
