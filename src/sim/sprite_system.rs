//! Unordered collection of sprites advanced and culled every tick

use glam::Vec2;

use super::sprite::Sprite;

/// Owns a flat list of sprites. Sprites have no identity beyond their slot,
/// so callers should not hold indices across `update`/`remove_near`.
#[derive(Debug, Clone, Default)]
pub struct SpriteSystem {
    sprites: Vec<Sprite>,
}

impl SpriteSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite (no dedup, no capacity bound)
    pub fn add(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Remove the sprite at `index`, if there is one
    pub fn remove(&mut self, index: usize) -> Option<Sprite> {
        if index < self.sprites.len() {
            Some(self.sprites.remove(index))
        } else {
            None
        }
    }

    /// Drop every sprite
    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprites in draw order
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    /// Cull expired sprites, then move the survivors one step
    pub fn update(&mut self, now_ms: f64, dt: f32) {
        self.sprites.retain(|s| !s.is_expired(now_ms));
        for sprite in &mut self.sprites {
            sprite.pos += sprite.velocity * dt;
        }
    }

    /// Remove every sprite strictly closer than `dist` to `point`.
    ///
    /// Pure spatial query: explosions and sounds are the caller's business,
    /// driven from the returned sprites.
    pub fn remove_near(&mut self, point: Vec2, dist: f32) -> Vec<Sprite> {
        self.remove_where(|s| s.pos.distance(point) < dist)
    }

    /// Remove and return every sprite matching `pred`, keeping the order of the rest
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Sprite) -> bool) -> Vec<Sprite> {
        if self.sprites.is_empty() {
            return Vec::new();
        }
        let (removed, keep): (Vec<Sprite>, Vec<Sprite>) =
            std::mem::take(&mut self.sprites).into_iter().partition(|s| pred(s));
        self.sprites = keep;
        removed
    }
}
