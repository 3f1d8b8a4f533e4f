//! Timed sprite spawner
//!
//! An emitter owns its sprite system and spawns children into it at a fixed
//! rate while started. `launch` is the invader behaviour (randomised
//! velocity), `shoot` the turret behaviour (configured velocity, manual).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sprite::{ImageId, Sprite, lifespan_from_ms};
use super::sprite_system::SpriteSystem;

/// Emitter run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterState {
    Stopped,
    Started,
}

/// Per-axis velocity range sampled by `launch` (pixels/sec)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchSpread {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for LaunchSpread {
    fn default() -> Self {
        Self {
            min: Vec2::new(-35.0, 500.0),
            max: Vec2::new(35.0, 1000.0),
        }
    }
}

impl LaunchSpread {
    /// Draw one velocity, uniformly per axis
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}

/// Spawns sprites into its own system at `rate` sprites/sec
#[derive(Debug, Clone)]
pub struct Emitter {
    pub pos: Vec2,
    /// Sprites per second
    pub rate: f32,
    /// Child velocity used by `shoot` (pixels/sec)
    pub velocity: Vec2,
    /// Child lifespan; `None` makes immortal children
    pub lifespan_ms: Option<f32>,
    pub child_image: Option<ImageId>,
    pub child_width: f32,
    pub child_height: f32,
    pub launch_spread: LaunchSpread,
    pub sys: SpriteSystem,
    state: EmitterState,
    last_spawned_ms: f64,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            rate: 1.0,
            velocity: Vec2::new(100.0, 100.0),
            lifespan_ms: Some(3000.0),
            child_image: None,
            child_width: 10.0,
            child_height: 10.0,
            launch_spread: LaunchSpread::default(),
            sys: SpriteSystem::new(),
            state: EmitterState::Stopped,
            last_spawned_ms: 0.0,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state == EmitterState::Started
    }

    /// Stopped -> Started; restarts the spawn timer. No-op when already started.
    pub fn start(&mut self, now_ms: f64) {
        if self.state == EmitterState::Stopped {
            self.state = EmitterState::Started;
            self.last_spawned_ms = now_ms;
        }
    }

    pub fn stop(&mut self) {
        self.state = EmitterState::Stopped;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Lifespan in ms; -1 means immortal
    pub fn set_lifespan(&mut self, ms: f32) {
        self.lifespan_ms = lifespan_from_ms(ms);
    }

    pub fn set_child_size(&mut self, width: f32, height: f32) {
        self.child_width = width;
        self.child_height = height;
    }

    /// Children get this art; child size follows the image
    pub fn set_child_image(&mut self, image: ImageId, width: f32, height: f32) {
        self.child_image = Some(image);
        self.set_child_size(width, height);
    }

    /// Distance a child covers in one tick
    pub fn max_dist_per_frame(&self, dt: f32) -> f32 {
        self.velocity.length() * dt
    }

    /// Advance children without spawning
    pub fn update(&mut self, now_ms: f64, dt: f32) {
        if !self.is_started() {
            return;
        }
        self.sys.update(now_ms, dt);
    }

    /// Spawn at most one child with a randomised velocity, then advance children.
    /// Returns true if a child was spawned.
    pub fn launch<R: Rng + ?Sized>(&mut self, now_ms: f64, dt: f32, rng: &mut R) -> bool {
        if !self.is_started() {
            return false;
        }
        let spawned = self.spawn_due(now_ms);
        if spawned {
            let velocity = self.launch_spread.sample(rng);
            let child = self.make_child(now_ms, velocity);
            self.sys.add(child);
            self.last_spawned_ms = now_ms;
        }
        self.sys.update(now_ms, dt);
        spawned
    }

    /// Fire one child with the configured velocity if the rate allows.
    /// Works regardless of run state; gating on game phase is the caller's job.
    pub fn shoot(&mut self, now_ms: f64) -> bool {
        if !self.spawn_due(now_ms) {
            return false;
        }
        let child = self.make_child(now_ms, self.velocity);
        self.sys.add(child);
        self.last_spawned_ms = now_ms;
        true
    }

    fn spawn_due(&self, now_ms: f64) -> bool {
        if self.rate <= 0.0 {
            return false;
        }
        now_ms - self.last_spawned_ms > 1000.0 / f64::from(self.rate)
    }

    fn make_child(&self, now_ms: f64, velocity: Vec2) -> Sprite {
        let mut sprite = Sprite::new(self.pos, now_ms);
        sprite.velocity = velocity;
        sprite.lifespan_ms = self.lifespan_ms;
        sprite.width = self.child_width;
        sprite.height = self.child_height;
        sprite.image = self.child_image;
        sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn invader_emitter() -> Emitter {
        let mut e = Emitter::new();
        e.set_rate(0.5);
        e.set_lifespan(3000.0);
        e.set_position(Vec2::new(100.0, 10.0));
        e
    }

    #[test]
    fn test_stopped_emitter_never_launches() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = invader_emitter();
        assert!(!e.launch(10_000.0, DT, &mut rng));
        assert!(e.sys.is_empty());
    }

    #[test]
    fn test_start_resets_spawn_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = invader_emitter();
        e.start(5000.0);
        // Interval at rate 0.5 is 2000 ms
        assert!(!e.launch(6000.0, DT, &mut rng));
        assert!(!e.launch(7000.0, DT, &mut rng));
        assert!(e.launch(7000.5, DT, &mut rng));
        assert_eq!(e.sys.len(), 1);
    }

    #[test]
    fn test_start_twice_keeps_timer() {
        let mut e = invader_emitter();
        e.start(0.0);
        e.start(1900.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(e.launch(2001.0, DT, &mut rng));
    }

    #[test]
    fn test_launch_never_bursts_after_long_gap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = invader_emitter();
        e.start(0.0);
        assert!(e.launch(60_000.0, DT, &mut rng));
        assert_eq!(e.sys.len(), 1);
    }

    #[test]
    fn test_launch_velocity_within_spread() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = invader_emitter();
        e.start(0.0);
        let mut now = 0.0;
        for _ in 0..20 {
            now += 2001.0;
            e.launch(now, 0.0, &mut rng);
        }
        for s in e.sys.iter() {
            assert!((-35.0..=35.0).contains(&s.velocity.x));
            assert!((500.0..=1000.0).contains(&s.velocity.y));
            assert_eq!(s.lifespan_ms, Some(3000.0));
        }
    }

    #[test]
    fn test_shoot_uses_configured_velocity_and_rate() {
        let mut e = Emitter::new();
        e.set_rate(10.0);
        e.set_velocity(Vec2::new(0.0, -500.0));
        e.set_child_image(ImageId::Laser, 6.0, 24.0);
        e.set_position(Vec2::new(50.0, 400.0));

        assert!(e.shoot(1000.0));
        assert!(!e.shoot(1050.0), "100 ms interval at rate 10");
        assert!(e.shoot(1101.0));
        assert_eq!(e.sys.len(), 2);

        let missile = &e.sys.sprites()[0];
        assert_eq!(missile.velocity, Vec2::new(0.0, -500.0));
        assert_eq!(missile.pos, Vec2::new(50.0, 400.0));
        assert_eq!(missile.image, Some(ImageId::Laser));
        assert_eq!(missile.height, 24.0);
    }

    #[test]
    fn test_update_only_moves_when_started() {
        let mut e = Emitter::new();
        e.set_velocity(Vec2::new(0.0, -600.0));
        e.shoot(1000.0);
        e.update(1000.0, 0.5);
        assert_eq!(e.sys.sprites()[0].pos, Vec2::ZERO);

        e.start(1000.0);
        e.update(1000.0, 0.5);
        assert_eq!(e.sys.sprites()[0].pos, Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_max_dist_per_frame() {
        let mut e = Emitter::new();
        e.set_velocity(Vec2::new(300.0, -400.0));
        assert!((e.max_dist_per_frame(0.1) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let mut e = Emitter::new();
        e.set_rate(0.0);
        assert!(!e.shoot(1.0e9));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_spawn_per_call(
            steps in prop::collection::vec(0.0f64..10_000.0, 1..50),
            rate in 0.1f32..20.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(11);
            let mut e = Emitter::new();
            e.set_rate(rate);
            e.set_lifespan(-1.0);
            e.start(0.0);
            let mut now = 0.0;
            for step in steps {
                now += step;
                let before = e.sys.len();
                e.launch(now, 0.0, &mut rng);
                prop_assert!(e.sys.len() - before <= 1);
            }
        }
    }
}
