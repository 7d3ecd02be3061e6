//! Terminal stand-in for picture crops: each tile is a colored block with a
//! label, colored by where it belongs so the solved board shows a smooth
//! gradient. Extra frames rotate the hue to animate the picture.

use crate::animations::particles::hue_to_rgb;
use crossterm::style::Color;
use slidepuzzle_core::{FrameSource, GridSize};

/// Longest frame sequence the palette will generate
pub const MAX_FRAMES: usize = 64;

/// What a tile shows in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFace {
    /// 1-based number of the tile's home cell
    pub label: usize,
    pub color: Color,
}

impl TileFace {
    /// Black or white, whichever reads better on the tile color
    pub fn text_color(&self) -> Color {
        match self.color {
            Color::Rgb { r, g, b } => {
                let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
                if luma > 140.0 {
                    Color::Black
                } else {
                    Color::White
                }
            }
            _ => Color::White,
        }
    }
}

/// Generates a hue gradient over the board, one sequence per tile
#[derive(Debug, Clone, Copy)]
pub struct PaletteSource {
    size: GridSize,
    frames: usize,
}

impl PaletteSource {
    pub fn new(size: GridSize, frames: usize) -> Self {
        Self {
            size,
            frames: frames.clamp(1, MAX_FRAMES),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    fn face(&self, unit_id: usize, frame: usize) -> TileFace {
        let home = self.size.position_from_index(unit_id);
        let across = home.x as f32 / self.size.columns() as f32;
        let down = home.y as f32 / self.size.rows() as f32;
        let shift = frame as f32 / self.frames as f32;
        let hue = across * 0.6 + down * 0.25 + shift;
        let brightness = 0.95 - down * 0.35;
        TileFace {
            label: unit_id + 1,
            color: hue_to_rgb(hue, brightness),
        }
    }
}

impl FrameSource for PaletteSource {
    type Frame = TileFace;

    fn frames(&self, unit_id: usize) -> Option<Vec<TileFace>> {
        if unit_id >= self.size.cell_count() {
            return None;
        }
        Some((0..self.frames).map(|f| self.face(unit_id, f)).collect())
    }
}
