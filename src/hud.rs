//! Heads-up display text
//!
//! Pure function of the game state; the renderer turns lines into glyphs.

use glam::Vec2;

use crate::sim::{GamePhase, GameState};

/// HUD text colour
pub const HUD_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// One line of text, positioned at its left baseline
#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub pos: Vec2,
}

impl HudLine {
    fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(x, y),
        }
    }
}

pub fn hud_lines(state: &GameState) -> Vec<HudLine> {
    let (w, h) = (state.width, state.height);
    let left = w / 2.0 - 200.0;
    let mid = h / 2.0 - 50.0;

    match state.phase {
        GamePhase::Playing => vec![
            HudLine::new(format!("Score: {}", state.score), 10.0, 50.0),
            HudLine::new(
                format!("Time: {}", state.elapsed_secs().floor() as u32),
                w - 300.0,
                50.0,
            ),
        ],
        GamePhase::Idle => {
            let mut lines = vec![HudLine::new("Press Space to Play!", left, mid)];
            if let Some(summary) = state.summary {
                lines.push(HudLine::new(
                    format!("GAME OVER {}", summary.elapsed_secs.floor() as u32),
                    left,
                    mid - 70.0,
                ));
                lines.push(HudLine::new(
                    format!("Score: {}", summary.score),
                    left,
                    mid + 60.0,
                ));
                match summary.rank {
                    Some(1) => lines.push(HudLine::new("NEW BEST", left, mid + 100.0)),
                    Some(rank) => {
                        lines.push(HudLine::new(format!("Rank #{}", rank), left, mid + 100.0))
                    }
                    None => {}
                }
            }
            lines
        }
    }
}

/// Window title mirroring the HUD
pub fn window_title(state: &GameState) -> String {
    match state.phase {
        GamePhase::Playing => format!(
            "Tri Invaders - Score: {} - Time: {}",
            state.score,
            state.elapsed_secs().floor() as u32
        ),
        GamePhase::Idle => "Tri Invaders".to_string(),
    }
}
