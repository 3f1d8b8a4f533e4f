//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Simulation clock only (no wall time)
//! - No rendering or platform dependencies

pub mod collision;
pub mod emitter;
pub mod particles;
pub mod path;
pub mod ship;
pub mod sprite;
pub mod sprite_system;
pub mod state;
pub mod tick;

pub use collision::{check_collisions, closest_point_on_segment, collision_dist, swept_hit};
pub use emitter::{Emitter, EmitterState, LaunchSpread};
pub use particles::{Particle, ParticleParams, ParticleSystem};
pub use path::{curve_eval, sample_curve};
pub use ship::{Ship, inside};
pub use sprite::{ImageId, Sprite};
pub use sprite_system::SpriteSystem;
pub use state::{
    Command, DragState, GameEvent, GamePhase, GameState, RoundSummary, SpriteSizes,
};
pub use tick::{TickInput, TurretParams, tick};
