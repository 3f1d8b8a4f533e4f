//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::emitter::Emitter;
use super::particles::ParticleSystem;
use super::ship::Ship;
use super::sprite::ImageId;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for Space; shows the prompt and the last round's summary
    Idle,
    /// Round running: emitters active, timer counting
    Playing,
}

/// Result of the last finished round, shown on the game-over banner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub elapsed_secs: f32,
    /// Leaderboard position (1-based) if the score qualified
    pub rank: Option<usize>,
}

/// Events emitted during simulation for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    RoundStarted,
    Shot,
    Explosion { pos: Vec2 },
    GameOver { score: u32, elapsed_secs: f32 },
}

/// Player input, one entry per key/pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Space: start a round while idle, shoot while playing
    Fire,
    ThrustUp,
    ThrustDown,
    ReleaseThrustUp,
    ReleaseThrustDown,
    RotateLeft,
    RotateRight,
    PointerPress(Vec2),
    PointerDrag(Vec2),
    PointerRelease,
}

/// Ship drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub last: Vec2,
}

/// Child art sizes, taken from the decoded images
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    pub laser: Vec2,
    pub invader: Vec2,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            laser: Vec2::new(10.0, 30.0),
            invader: Vec2::new(40.0, 40.0),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Simulation clock, advanced by every tick
    pub clock_ms: f64,
    /// Clock value when the current round started
    pub round_start_ms: f64,
    pub width: f32,
    pub height: f32,
    pub ship: Ship,
    /// Fires lasers from the ship
    pub turret: Emitter,
    pub invaders: Vec<Emitter>,
    pub particles: ParticleSystem,
    pub summary: Option<RoundSummary>,
    pub drag: Option<DragState>,
    /// Events from the last tick(s), drained by the host
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, width: f32, height: f32, sizes: SpriteSizes) -> Self {
        let mut turret = Emitter::new();
        turret.set_child_image(ImageId::Laser, sizes.laser.x, sizes.laser.y);

        let invaders = (0..4)
            .map(|_| {
                let mut e = Emitter::new();
                e.set_rate(INVADER_RATE);
                e.set_lifespan(INVADER_LIFESPAN_MS);
                e.set_child_image(ImageId::Invader, sizes.invader.x, sizes.invader.y);
                e
            })
            .collect();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            clock_ms: 0.0,
            round_start_ms: 0.0,
            width,
            height,
            ship: Ship::spawned(width, height),
            turret,
            invaders,
            particles: ParticleSystem::new(),
            summary: None,
            drag: None,
            events: Vec::new(),
        };
        state.anchor_invaders();
        state
    }

    /// Seconds since the round started (0 while idle)
    pub fn elapsed_secs(&self) -> f32 {
        match self.phase {
            GamePhase::Playing => ((self.clock_ms - self.round_start_ms) / 1000.0) as f32,
            GamePhase::Idle => 0.0,
        }
    }

    /// Window size changed: keep the invader layout proportional
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.anchor_invaders();
    }

    fn anchor_invaders(&mut self) {
        let w = self.width;
        let xs = [w / 2.0, w / 4.0, w * 0.75, w * 0.65];
        for (emitter, x) in self.invaders.iter_mut().zip(xs) {
            emitter.set_position(Vec2::new(x, INVADER_SPAWN_Y));
        }
    }

    /// Idle -> Playing
    pub fn start_round(&mut self) {
        let now = self.clock_ms;
        for emitter in &mut self.invaders {
            emitter.start(now);
        }
        self.turret.start(now);
        self.summary = None;
        self.score = 0;
        self.round_start_ms = now;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
    }

    /// Playing -> Idle. Particles are left to finish.
    pub fn end_round(&mut self) {
        let elapsed_secs = self.elapsed_secs();
        let score = self.score;

        self.ship.reset(self.width, self.height);
        self.drag = None;
        for emitter in &mut self.invaders {
            emitter.stop();
            emitter.sys.clear();
        }
        self.turret.stop();
        self.turret.sys.clear();

        self.summary = Some(RoundSummary {
            score,
            elapsed_secs,
            rank: None,
        });
        self.events.push(GameEvent::GameOver { score, elapsed_secs });

        self.score = 0;
        self.round_start_ms = self.clock_ms;
        self.phase = GamePhase::Idle;
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
