//! Tri Invaders - a 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sprites, emitters, ship physics, collisions)
//! - `renderer`: WebGPU rendering pipeline
//! - `app`: Platform-agnostic host loop (fixed timestep, input, HUD, audio events)
//! - `assets`: Startup asset loading and decoding
//! - `tuning`: Live-tunable gameplay parameters
//! - `ui`: Immediate-mode parameter panel

pub mod app;
pub mod assets;
pub mod audio;
pub mod highscores;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate all per-frame tuning assumes)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const SIM_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default window size
    pub const WINDOW_WIDTH: u32 = 1024;
    pub const WINDOW_HEIGHT: u32 = 768;

    /// Length of a round
    pub const ROUND_DURATION_SECS: f32 = 30.0;

    /// Ship boundary: hitting within this margin of an edge stops the ship
    pub const SHIP_EDGE_MARGIN: f32 = 20.0;
    /// Where the ship is put back after touching the left/right/bottom edge
    pub const SHIP_EDGE_RESET: f32 = 25.0;
    /// Where the ship is put back after touching the top edge
    pub const SHIP_TOP_RESET: f32 = 30.0;
    /// Ship spawn height above the bottom of the window
    pub const SHIP_SPAWN_FROM_BOTTOM: f32 = 200.0;

    /// Thrust change per arrow key press
    pub const THRUST_STEP: f32 = 0.5;
    /// Thrust removed when the arrow key is released
    pub const THRUST_RELEASE: f32 = 1.0;
    /// Rotation per left/right key press (degrees)
    pub const ROTATION_STEP_DEG: f32 = 20.0;

    /// Invader emitter defaults
    pub const INVADER_RATE: f32 = 0.5;
    pub const INVADER_LIFESPAN_MS: f32 = 3000.0;
    pub const INVADER_SPAWN_Y: f32 = 10.0;

    /// Explosion burst size
    pub const EXPLOSION_GROUP_SIZE: usize = 50;
    /// Particle cap across all explosions
    pub const MAX_PARTICLES: usize = 2000;
}

/// Unit vector for an angle given in degrees (x right, y down)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
