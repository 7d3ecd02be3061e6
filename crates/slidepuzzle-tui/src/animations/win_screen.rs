use crossterm::style::Color;
use rand::prelude::SliceRandom;
use rand::Rng;

use super::particles::{
    hue_to_rgb, random_bright_color, EffectType, Particle, CONFETTI_CHARS, SPARKLE_CHARS,
};

const WIN_MESSAGES: [&str; 10] = [
    "PUZZLE SOLVED!",
    "PICTURE COMPLETE!",
    "EVERY TILE HOME!",
    "BRILLIANT!",
    "SMOOTH SLIDING!",
    "WELL DONE!",
    "PERFECT ORDER!",
    "NICELY SHUFFLED BACK!",
    "CHAMPION!",
    "MAGNIFICENT!",
];

const BANNERS: [&str; 2] = [
    r#"
  ___  ___  _ __   _____ ___  _
 / __|/ _ \| |\ \ / / __|   \| |
 \__ \ (_) | |_\ V /| _|| |) |_|
 |___/\___/|____\_/ |___|___/(_)
"#,
    r#"
 ╔═╗╔═╗╦  ╦  ╦╔═╗╔╦╗
 ╚═╗║ ║║  ╚╗╔╝║╣  ║║
 ╚═╝╚═╝╩═╝ ╚╝ ╚═╝═╩╝
"#,
];

/// Particle overlay drawn on top of a solved board
pub struct WinScreen {
    particles: Vec<Particle>,
    effect_type: EffectType,
    frame_count: u32,
    rainbow_offset: f32,
    message_index: usize,
    banner_index: usize,
    firework_cooldown: u32,
    /// Colors of the solved tiles, used by the tile rain effect
    palette: Vec<Color>,
    pub width: u16,
    pub height: u16,
}

impl WinScreen {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            particles: Vec::new(),
            effect_type: EffectType::random(),
            frame_count: 0,
            rainbow_offset: 0.0,
            message_index: rng.gen_range(0..WIN_MESSAGES.len()),
            banner_index: rng.gen_range(0..BANNERS.len()),
            firework_cooldown: 0,
            palette: Vec::new(),
            width: 80,
            height: 24,
        }
    }

    /// Start a fresh celebration using the finished picture's colors
    pub fn reset(&mut self, palette: Vec<Color>) {
        let mut rng = rand::thread_rng();
        self.particles.clear();
        self.frame_count = 0;
        self.rainbow_offset = 0.0;
        self.firework_cooldown = 0;
        self.effect_type = EffectType::random();
        self.message_index = rng.gen_range(0..WIN_MESSAGES.len());
        self.banner_index = rng.gen_range(0..BANNERS.len());
        self.palette = palette;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn update(&mut self) {
        self.frame_count += 1;
        self.rainbow_offset += 0.05;

        if self.frame_count % 300 == 0 {
            self.effect_type = EffectType::random();
            let mut rng = rand::thread_rng();
            self.message_index = rng.gen_range(0..WIN_MESSAGES.len());
        }

        let floor = self.height as f32 + 5.0;
        self.particles.retain_mut(|p| p.step(0.15, floor));

        match self.effect_type {
            EffectType::Confetti => self.spawn_confetti(),
            EffectType::Fireworks => self.spawn_fireworks(),
            EffectType::Sparkles => self.spawn_sparkles(),
            EffectType::TileRain => self.spawn_tile_rain(),
        }
    }

    fn spawn_confetti(&mut self) {
        let mut rng = rand::thread_rng();
        for _ in 0..3 {
            self.particles.push(Particle {
                x: rng.gen_range(0.0..self.width.max(1) as f32),
                y: -2.0,
                vx: rng.gen_range(-0.5..0.5),
                vy: rng.gen_range(0.3..1.0),
                char: CONFETTI_CHARS.choose(&mut rng).copied().unwrap_or('*'),
                color: random_bright_color(),
                lifetime: rng.gen_range(3.0..6.0),
            });
        }
    }

    fn spawn_fireworks(&mut self) {
        if self.firework_cooldown > 0 {
            self.firework_cooldown -= 1;
            return;
        }

        let mut rng = rand::thread_rng();
        if self.width > 20 && self.height > 10 && rng.gen_bool(0.08) {
            let x = rng.gen_range(10.0..(self.width as f32 - 10.0));
            let y = rng.gen_range(5.0..(self.height as f32 / 2.0));
            let color = random_bright_color();

            for _ in 0..25 {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let speed = rng.gen_range(0.5..2.0);
                self.particles.push(Particle {
                    x,
                    y,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    char: '●',
                    color,
                    lifetime: rng.gen_range(1.0..2.5),
                });
            }
            self.firework_cooldown = 15;
        }
    }

    fn spawn_sparkles(&mut self) {
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            self.particles.push(Particle {
                x: rng.gen_range(0.0..self.width.max(1) as f32),
                y: rng.gen_range(0.0..self.height.max(1) as f32),
                vx: rng.gen_range(-0.2..0.2),
                vy: rng.gen_range(-0.2..0.2),
                char: SPARKLE_CHARS.choose(&mut rng).copied().unwrap_or('+'),
                color: Color::Rgb {
                    r: 255,
                    g: 255,
                    b: rng.gen_range(150..255),
                },
                lifetime: rng.gen_range(0.5..1.5),
            });
        }
    }

    fn spawn_tile_rain(&mut self) {
        let mut rng = rand::thread_rng();
        for _ in 0..2 {
            let color = match self.palette.choose(&mut rng) {
                Some(&color) => color,
                None => hue_to_rgb(self.rainbow_offset + rng.gen_range(0.0..1.0), 1.0),
            };
            self.particles.push(Particle {
                x: rng.gen_range(0.0..self.width.max(1) as f32),
                y: -1.0,
                vx: rng.gen_range(-0.3..0.3),
                vy: rng.gen_range(0.5..1.5),
                char: '█',
                color,
                lifetime: rng.gen_range(4.0..7.0),
            });
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn current_message(&self) -> &str {
        WIN_MESSAGES[self.message_index]
    }

    pub fn current_banner(&self) -> &str {
        BANNERS[self.banner_index]
    }

    pub fn rainbow_offset(&self) -> f32 {
        self.rainbow_offset
    }
}

impl Default for WinScreen {
    fn default() -> Self {
        Self::new()
    }
}
