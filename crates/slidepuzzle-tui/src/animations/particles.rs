use crossterm::style::Color;
use rand::Rng;

/// A single particle in the celebration
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }

    /// Move one step; returns false once the particle is spent
    pub fn step(&mut self, gravity: f32, floor: f32) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.lifetime -= 0.016;
        self.lifetime > 0.0 && self.y < floor
    }
}

/// Celebration styles shown over a solved board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectType {
    Confetti,
    Fireworks,
    Sparkles,
    /// Tiles of the finished picture raining down
    TileRain,
}

impl EffectType {
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        match rng.gen_range(0..4) {
            0 => EffectType::Confetti,
            1 => EffectType::Fireworks,
            2 => EffectType::Sparkles,
            _ => EffectType::TileRain,
        }
    }
}

/// Generate a random bright color
pub fn random_bright_color() -> Color {
    let mut rng = rand::thread_rng();
    match rng.gen_range(0..7) {
        0 => Color::Red,
        1 => Color::Green,
        2 => Color::Yellow,
        3 => Color::Blue,
        4 => Color::Magenta,
        5 => Color::Cyan,
        _ => Color::White,
    }
}

/// Convert hue (0.0-1.0) to a color at the given brightness (0.0-1.0)
pub fn hue_to_rgb(hue: f32, brightness: f32) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let c = brightness.clamp(0.0, 1.0) * 255.0;
    let x = (1.0 - (h % 2.0 - 1.0).abs()) * c;
    let c = c as u8;

    let (r, g, b) = match h as i32 % 6 {
        0 => (c, x as u8, 0),
        1 => (x as u8, c, 0),
        2 => (0, c, x as u8),
        3 => (0, x as u8, c),
        4 => (x as u8, 0, c),
        _ => (c, 0, x as u8),
    };

    Color::Rgb { r, g, b }
}

/// Confetti characters
pub const CONFETTI_CHARS: &[char] = &[
    '*', '✦', '✧', '◆', '◇', '○', '●', '■', '□', '▲', '▽',
];

/// Sparkle characters
pub const SPARKLE_CHARS: &[char] = &['✦', '★', '☆', '✫', '✬', '+'];
