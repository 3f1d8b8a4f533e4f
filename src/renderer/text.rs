//! HUD text from the loaded font
//!
//! Glyphs are rasterised once per (char, size) with fontdue. Each glyph bitmap
//! is stored as horizontal runs of equal coverage, and every run becomes one
//! untextured quad whose alpha is the coverage.

use std::collections::HashMap;

use glam::Vec2;

use super::shapes;
use super::vertex::SpriteVertex;

/// Extra advance between letters
pub const LETTER_SPACING: f32 = 1.035;
/// HUD font size in pixels
pub const HUD_FONT_PX: f32 = 30.0;
/// Baseline-to-baseline distance at `HUD_FONT_PX`; scales with the size
pub const LINE_HEIGHT: f32 = 34.0;

/// Horizontal span of identical coverage inside a glyph bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
    pub coverage: u8,
}

/// Collapse a row-major coverage bitmap into runs, skipping empty pixels
pub fn coverage_runs(width: usize, height: usize, bitmap: &[u8]) -> Vec<Run> {
    let mut runs = Vec::new();
    if width == 0 {
        return runs;
    }
    for (y, row) in bitmap.chunks(width).take(height).enumerate() {
        let mut x = 0;
        while x < row.len() {
            let coverage = row[x];
            let start = x;
            while x < row.len() && row[x] == coverage {
                x += 1;
            }
            if coverage > 0 {
                runs.push(Run {
                    x: start as u16,
                    y: y as u16,
                    len: (x - start) as u16,
                    coverage,
                });
            }
        }
    }
    runs
}

#[derive(Debug, Clone)]
struct Glyph {
    metrics: fontdue::Metrics,
    runs: Vec<Run>,
}

pub struct TextRenderer {
    font: fontdue::Font,
    cache: HashMap<(char, u32), Glyph>,
}

impl TextRenderer {
    pub fn new(font: fontdue::Font) -> Self {
        Self {
            font,
            cache: HashMap::new(),
        }
    }

    fn glyph(&mut self, ch: char, px: f32) -> &Glyph {
        let font = &self.font;
        self.cache.entry((ch, px.to_bits())).or_insert_with(|| {
            let (metrics, bitmap) = font.rasterize(ch, px);
            let runs = coverage_runs(metrics.width, metrics.height, &bitmap);
            Glyph { metrics, runs }
        })
    }

    /// Width of a single line in pixels
    pub fn measure(&mut self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|ch| self.glyph(ch, px).metrics.advance_width * LETTER_SPACING)
            .sum()
    }

    /// Quads for `text` with its first baseline starting at `origin`
    pub fn layout(&mut self, text: &str, origin: Vec2, px: f32, color: [f32; 4]) -> Vec<SpriteVertex> {
        let mut out = Vec::new();
        let mut pen = origin;

        for ch in text.chars() {
            if ch == '\n' {
                pen = Vec2::new(origin.x, pen.y + LINE_HEIGHT * px / HUD_FONT_PX);
                continue;
            }
            let glyph = self.glyph(ch, px);
            let m = glyph.metrics;
            // Bitmap top-left in y-down screen space
            let top_left = Vec2::new(
                pen.x + m.xmin as f32,
                pen.y - (m.height as f32 + m.ymin as f32),
            );
            for run in &glyph.runs {
                let min = top_left + Vec2::new(run.x as f32, run.y as f32);
                let alpha = run.coverage as f32 / 255.0;
                out.extend(shapes::rect(
                    min,
                    Vec2::new(run.len as f32, 1.0),
                    shapes::fade(color, alpha),
                ));
            }
            pen.x += m.advance_width * LETTER_SPACING;
        }

        out
    }
}
