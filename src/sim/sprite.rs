//! Sprites: positioned, moving entities with an optional time-to-live

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Art a sprite (or emitter child) is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageId {
    Ship,
    Background,
    Laser,
    Invader,
}

/// Default sprite size when no image is attached
pub const DEFAULT_SPRITE_SIZE: f32 = 20.0;

/// A transient visual entity (missile or invader)
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    /// Velocity in pixels/sec
    pub velocity: Vec2,
    pub image: Option<ImageId>,
    /// Simulation clock time (ms) the sprite was spawned at
    pub birth_ms: f64,
    /// Time-to-live in ms; `None` lives forever
    pub lifespan_ms: Option<f32>,
    pub width: f32,
    pub height: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            image: None,
            birth_ms: 0.0,
            lifespan_ms: None,
            width: DEFAULT_SPRITE_SIZE,
            height: DEFAULT_SPRITE_SIZE,
        }
    }
}

impl Sprite {
    pub fn new(pos: Vec2, birth_ms: f64) -> Self {
        Self {
            pos,
            birth_ms,
            ..Default::default()
        }
    }

    /// Attach art; the sprite takes the image's size
    pub fn set_image(&mut self, image: ImageId, width: f32, height: f32) {
        self.image = Some(image);
        self.width = width;
        self.height = height;
    }

    /// Age in milliseconds
    #[inline]
    pub fn age(&self, now_ms: f64) -> f64 {
        now_ms - self.birth_ms
    }

    /// True once the sprite has outlived its lifespan
    #[inline]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.lifespan_ms
            .is_some_and(|life| self.age(now_ms) > f64::from(life))
    }
}

/// Map a lifespan in ms to the sprite representation (any negative value, conventionally -1, is immortal)
pub fn lifespan_from_ms(ms: f32) -> Option<f32> {
    if ms < 0.0 { None } else { Some(ms) }
}
