//! Explosion particles
//!
//! Radial one-shot bursts pushed by gravity, per-tick turbulence and a single
//! radial impulse at spawn. Particles expire like sprites.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{EXPLOSION_GROUP_SIZE, MAX_PARTICLES};

/// Live-tunable particle parameters (fed from the tuning panel each tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleParams {
    /// Only the magnitude matters: bursts are radial
    pub velocity: Vec2,
    pub damping: f32,
    /// Downward acceleration, pixels/sec^2
    pub gravity: f32,
    pub radius: f32,
    pub lifespan_ms: f32,
    pub turbulence_min: Vec2,
    pub turbulence_max: Vec2,
    pub radial_force: f32,
    /// Vertical bias of the radial impulse direction
    pub clamping: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            velocity: Vec2::new(100.0, 100.0),
            damping: 0.99,
            gravity: 10.0,
            radius: 3.0,
            lifespan_ms: 1000.0,
            turbulence_min: Vec2::ZERO,
            turbulence_max: Vec2::ZERO,
            radial_force: 1000.0,
            clamping: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Force accumulated for the next integration step
    pub force: Vec2,
    pub birth_ms: f64,
    pub lifespan_ms: f32,
    pub radius: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Particle {
    pub fn age(&self, now_ms: f64) -> f64 {
        now_ms - self.birth_ms
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.age(now_ms) > f64::from(self.lifespan_ms)
    }

    /// Remaining life in [0, 1], for fading
    pub fn life_fraction(&self, now_ms: f64) -> f32 {
        if self.lifespan_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - (self.age(now_ms) / f64::from(self.lifespan_ms)) as f32).clamp(0.0, 1.0)
    }

    fn integrate(&mut self, dt: f32) {
        self.pos += self.velocity * dt;
        let accel = self.force / self.mass;
        self.velocity += accel * dt;
        self.velocity *= self.damping;
        self.force = Vec2::ZERO;
    }
}

/// All live explosion particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }

    /// Spawn one radial burst of `EXPLOSION_GROUP_SIZE` particles at `at`
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        at: Vec2,
        params: &ParticleParams,
        now_ms: f64,
        rng: &mut R,
    ) {
        let speed = params.velocity.length();
        let clamp = params.clamping.abs();
        for _ in 0..EXPLOSION_GROUP_SIZE {
            let dir = Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0))
                .normalize_or(Vec2::X);
            let impulse_dir =
                Vec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-clamp..=clamp))
                    .normalize_or_zero();
            self.particles.push(Particle {
                pos: at,
                velocity: dir * speed,
                force: impulse_dir * params.radial_force,
                birth_ms: now_ms,
                lifespan_ms: params.lifespan_ms,
                radius: params.radius,
                damping: params.damping,
                mass: 1.0,
            });
        }

        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Cull expired particles, apply forces and integrate one step
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        dt: f32,
        params: &ParticleParams,
        rng: &mut R,
    ) {
        self.particles.retain(|p| !p.is_expired(now_ms));

        let lo = params.turbulence_min.min(params.turbulence_max);
        let hi = params.turbulence_min.max(params.turbulence_max);
        let gravity = Vec2::new(0.0, params.gravity);

        for p in &mut self.particles {
            let turbulence = Vec2::new(rng.random_range(lo.x..=hi.x), rng.random_range(lo.y..=hi.y));
            p.force += gravity * p.mass + turbulence;
            p.integrate(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_spawns_group_radially() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams::default();
        sys.burst(Vec2::new(50.0, 50.0), &params, 0.0, &mut rng);

        assert_eq!(sys.len(), EXPLOSION_GROUP_SIZE);
        let speed = params.velocity.length();
        for p in sys.iter() {
            assert_eq!(p.pos, Vec2::new(50.0, 50.0));
            assert!((p.velocity.length() - speed).abs() < 1e-2);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams {
            lifespan_ms: 500.0,
            ..Default::default()
        };
        sys.burst(Vec2::ZERO, &params, 0.0, &mut rng);
        sys.update(500.0, 1.0 / 60.0, &params, &mut rng);
        assert_eq!(sys.len(), EXPLOSION_GROUP_SIZE);
        sys.update(501.0, 1.0 / 60.0, &params, &mut rng);
        assert!(sys.is_empty());
    }

    #[test]
    fn test_gravity_pulls_down_and_damping_slows() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams {
            velocity: Vec2::ZERO,
            radial_force: 0.0,
            gravity: 60.0,
            damping: 0.5,
            ..Default::default()
        };
        sys.burst(Vec2::ZERO, &params, 0.0, &mut rng);
        sys.update(0.0, 1.0, &params, &mut rng);
        let p = sys.iter().next().expect("particle");
        // v = (0 + 60 * 1) * 0.5
        assert!((p.velocity - Vec2::new(0.0, 30.0)).length() < 1e-4);
        assert_eq!(p.force, Vec2::ZERO);
    }

    #[test]
    fn test_radial_impulse_applies_once() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams {
            velocity: Vec2::ZERO,
            gravity: 0.0,
            damping: 1.0,
            radial_force: 600.0,
            ..Default::default()
        };
        sys.burst(Vec2::ZERO, &params, 0.0, &mut rng);
        sys.update(0.0, 0.1, &params, &mut rng);
        let after_first: Vec<Vec2> = sys.iter().map(|p| p.velocity).collect();
        sys.update(0.0, 0.1, &params, &mut rng);
        let after_second: Vec<Vec2> = sys.iter().map(|p| p.velocity).collect();
        assert_eq!(after_first, after_second);
        assert!(after_first.iter().all(|v| (v.length() - 60.0).abs() < 1e-2));
    }

    #[test]
    fn test_inverted_turbulence_bounds_do_not_panic() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams {
            turbulence_min: Vec2::new(5.0, 5.0),
            turbulence_max: Vec2::new(-5.0, -5.0),
            ..Default::default()
        };
        sys.burst(Vec2::ZERO, &params, 0.0, &mut rng);
        sys.update(10.0, 1.0 / 60.0, &params, &mut rng);
        assert_eq!(sys.len(), EXPLOSION_GROUP_SIZE);
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut sys = ParticleSystem::new();
        let params = ParticleParams::default();
        let bursts = MAX_PARTICLES / EXPLOSION_GROUP_SIZE + 2;
        for i in 0..bursts {
            sys.burst(Vec2::ZERO, &params, i as f64, &mut rng);
        }
        assert_eq!(sys.len(), MAX_PARTICLES);
        assert!(sys.iter().all(|p| p.birth_ms >= 2.0));
    }

    #[test]
    fn test_life_fraction() {
        let p = Particle {
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            birth_ms: 100.0,
            lifespan_ms: 1000.0,
            radius: 1.0,
            damping: 1.0,
            mass: 1.0,
        };
        assert!((p.life_fraction(600.0) - 0.5).abs() < 1e-6);
        assert_eq!(p.life_fraction(5000.0), 0.0);
    }
}
