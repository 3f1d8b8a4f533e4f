//! Per-frame scene assembly
//!
//! Turns game state into texture-batched triangle lists. Pure CPU work, so the
//! draw order and batching are testable without a GPU.

use glam::Vec2;

use super::shapes;
use super::text::{HUD_FONT_PX, TextRenderer};
use super::vertex::{SpriteVertex, colors};
use crate::assets::Assets;
use crate::hud::{HUD_COLOR, HudLine};
use crate::sim::{GameState, ImageId, Sprite, sample_curve};
use crate::tuning::Tuning;
use crate::ui::{self, Panel};

/// Heading indicator length in pixels
pub const HEADING_LENGTH: f32 = 100.0;
pub const PANEL_FONT_PX: f32 = 14.0;

/// Texture bound for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// 1x1 white, for untinted geometry and text
    White,
    Image(ImageId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub texture: TextureSlot,
    pub vertices: Vec<SpriteVertex>,
}

/// Draw list for one frame, in painter's order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub batches: Vec<DrawBatch>,
}

impl Frame {
    /// Append geometry, merging with the previous batch when the texture matches
    pub fn push(&mut self, texture: TextureSlot, vertices: Vec<SpriteVertex>) {
        if vertices.is_empty() {
            return;
        }
        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.extend(vertices),
            _ => self.batches.push(DrawBatch { texture, vertices }),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

/// Pixel sizes of the loaded art
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSizes {
    pub ship: Vec2,
    pub background: Vec2,
    pub laser: Vec2,
    pub invader: Vec2,
}

impl ImageSizes {
    pub fn from_assets(assets: &Assets) -> Self {
        Self {
            ship: assets.ship.size(),
            background: assets.background.size(),
            laser: assets.laser.size(),
            invader: assets.invader.size(),
        }
    }

    pub fn get(&self, id: ImageId) -> Vec2 {
        match id {
            ImageId::Ship => self.ship,
            ImageId::Background => self.background,
            ImageId::Laser => self.laser,
            ImageId::Invader => self.invader,
        }
    }
}

/// Everything a frame is drawn from
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub tuning: &'a Tuning,
    pub panel: &'a Panel,
    pub hud: &'a [HudLine],
    pub images: &'a ImageSizes,
}

/// Build the frame. Text is skipped when no font renderer is available.
pub fn build_frame(scene: &Scene<'_>, mut text: Option<&mut TextRenderer>) -> Frame {
    let mut frame = Frame::default();
    let state = scene.state;
    let tuning = scene.tuning;

    let bg = scene.images.background;
    frame.push(
        TextureSlot::Image(ImageId::Background),
        shapes::textured_quad(shapes::box_corners(Vec2::ZERO, bg), colors::WHITE),
    );

    for emitter in &state.invaders {
        for sprite in emitter.sys.iter() {
            push_sprite(&mut frame, sprite);
        }
    }

    if tuning.draw_path {
        let dots = sample_curve(tuning.path_scale, tuning.path_cycles, state.width, state.height, 1)
            .into_iter()
            .flat_map(|p| shapes::circle(p, 1.0, colors::PATH_DOT, 6))
            .collect();
        frame.push(TextureSlot::White, dots);
    }

    for missile in state.turret.sys.iter() {
        push_sprite(&mut frame, missile);
    }

    // Ship outline and art share the ship transform
    let ship = &state.ship;
    let [a, b, c] = ship.world_vertices();
    frame.push(TextureSlot::White, shapes::triangle(a, b, c, colors::WHITE));
    let ship_art = shapes::transformed(
        shapes::centered_corners(Vec2::ZERO, scene.images.ship),
        &ship.transform(),
    );
    frame.push(
        TextureSlot::Image(ImageId::Ship),
        shapes::textured_quad(ship_art, colors::WHITE),
    );

    let now = state.clock_ms;
    let particles = state
        .particles
        .iter()
        .flat_map(|p| {
            let color = shapes::fade(colors::PARTICLE, p.life_fraction(now));
            shapes::circle(p.pos, p.radius, color, 8)
        })
        .collect();
    frame.push(TextureSlot::White, particles);

    if tuning.draw_heading {
        let from = ship.pos;
        let to = from + ship.heading() * HEADING_LENGTH;
        frame.push(TextureSlot::White, shapes::line(from, to, 2.0, colors::RED));
    }

    if let Some(text) = text.as_deref_mut() {
        for line in scene.hud {
            let verts = text.layout(&line.text, line.pos, HUD_FONT_PX, HUD_COLOR);
            frame.push(TextureSlot::White, verts);
        }
    }

    if scene.panel.visible {
        push_panel(&mut frame, scene.panel, tuning, text);
    }

    frame
}

fn push_sprite(frame: &mut Frame, sprite: &Sprite) {
    let size = Vec2::new(sprite.width, sprite.height);
    let corners = shapes::centered_corners(sprite.pos, size);
    match sprite.image {
        Some(id) => frame.push(
            TextureSlot::Image(id),
            shapes::textured_quad(corners, colors::WHITE),
        ),
        None => frame.push(TextureSlot::White, shapes::solid_quad(corners, colors::RED)),
    }
}

fn push_panel(frame: &mut Frame, panel: &Panel, tuning: &Tuning, mut text: Option<&mut TextRenderer>) {
    let bounds = panel.bounds();
    let mut verts = shapes::rect(bounds.min, bounds.size, colors::PANEL_BG);

    for (i, &param) in panel.rows().iter().enumerate() {
        let row = panel.row_rect(i);
        let fill = if panel.active() == Some(param) {
            colors::PANEL_ACTIVE
        } else {
            colors::PANEL_FILL
        };
        let fraction = Panel::fraction(param, tuning);
        if param.is_toggle() {
            // Check box at the right edge
            let side = row.size.y - 8.0;
            let min = Vec2::new(row.max().x - side - 4.0, row.min.y + 4.0);
            let color = if fraction > 0.5 { fill } else { colors::PANEL_BG };
            verts.extend(shapes::rect(min - Vec2::ONE, Vec2::splat(side + 2.0), colors::PANEL_TEXT));
            verts.extend(shapes::rect(min, Vec2::splat(side), color));
        } else {
            verts.extend(shapes::rect(
                row.min,
                Vec2::new(row.size.x * fraction, row.size.y),
                fill,
            ));
        }

        if let Some(text) = text.as_deref_mut() {
            let baseline = row.min + Vec2::new(6.0, row.size.y - 6.0);
            verts.extend(text.layout(
                &ui::row_text(param, tuning),
                baseline,
                PANEL_FONT_PX,
                colors::PANEL_TEXT,
            ));
        }
    }

    frame.push(TextureSlot::White, verts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::hud_lines;
    use crate::sim::SpriteSizes;

    fn sizes() -> ImageSizes {
        ImageSizes {
            ship: Vec2::new(40.0, 60.0),
            background: Vec2::new(1024.0, 768.0),
            laser: Vec2::new(10.0, 30.0),
            invader: Vec2::new(40.0, 40.0),
        }
    }

    fn build(state: &GameState, tuning: &Tuning, panel: &Panel) -> Frame {
        let hud = hud_lines(state);
        let images = sizes();
        let scene = Scene {
            state,
            tuning,
            panel,
            hud: &hud,
            images: &images,
        };
        build_frame(&scene, None)
    }

    #[test]
    fn test_push_merges_same_texture() {
        let mut frame = Frame::default();
        let tri = shapes::triangle(Vec2::ZERO, Vec2::X, Vec2::Y, colors::WHITE);
        frame.push(TextureSlot::White, tri.clone());
        frame.push(TextureSlot::White, tri.clone());
        frame.push(TextureSlot::Image(ImageId::Ship), tri.clone());
        frame.push(TextureSlot::White, Vec::new());
        assert_eq!(frame.batches.len(), 2);
        assert_eq!(frame.vertex_count(), 9);
    }

    #[test]
    fn test_idle_frame_order() {
        let state = GameState::new(1, 1024.0, 768.0, SpriteSizes::default());
        let frame = build(&state, &Tuning::default(), &Panel::new(false));
        let order: Vec<TextureSlot> = frame.batches.iter().map(|b| b.texture).collect();
        assert_eq!(
            order,
            vec![
                TextureSlot::Image(ImageId::Background),
                TextureSlot::White,
                TextureSlot::Image(ImageId::Ship),
            ]
        );
    }

    #[test]
    fn test_imageless_sprite_is_red_box() {
        let mut state = GameState::new(1, 1024.0, 768.0, SpriteSizes::default());
        state.invaders[0].sys.add(Sprite::new(Vec2::new(100.0, 100.0), 0.0));
        let frame = build(&state, &Tuning::default(), &Panel::new(false));
        let red = &frame.batches[1];
        assert_eq!(red.texture, TextureSlot::White);
        assert_eq!(red.vertices[0].color, colors::RED);
        assert_eq!(red.vertices[0].position, [90.0, 90.0]);
    }

    #[test]
    fn test_overlays_and_panel_add_geometry() {
        let state = GameState::new(1, 1024.0, 768.0, SpriteSizes::default());
        let plain = build(&state, &Tuning::default(), &Panel::new(false));

        let tuning = Tuning {
            draw_heading: true,
            draw_path: true,
            ..Default::default()
        };
        let busy = build(&state, &tuning, &Panel::new(true));
        assert!(busy.vertex_count() > plain.vertex_count());
        assert!(
            busy.batches
                .iter()
                .flat_map(|b| b.vertices.iter())
                .any(|v| v.color == colors::RED)
        );
    }
}
