//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::check_collisions;
use super::particles::ParticleParams;
use super::state::{Command, DragState, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Turret settings pulled from the tuning panel every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretParams {
    /// Shots per second
    pub rate: f32,
    pub lifespan_ms: f32,
    /// Only `-velocity.y` is used: missile speed along the ship heading
    pub velocity: Vec2,
}

impl Default for TurretParams {
    fn default() -> Self {
        Self {
            rate: 10.0,
            lifespan_ms: 2500.0,
            velocity: Vec2::new(0.0, -500.0),
        }
    }
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
    pub turret: TurretParams,
    pub particles: ParticleParams,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &command in &input.commands {
        apply_command(state, command);
    }

    let now = state.clock_ms;

    // Turret follows the panel and the ship
    let turret_cfg = &input.turret;
    state.turret.set_rate(turret_cfg.rate);
    state.turret.set_lifespan(turret_cfg.lifespan_ms);
    state.turret.set_velocity(state.ship.heading() * -turret_cfg.velocity.y);
    state.turret.update(now, dt);
    state.turret.set_position(state.ship.pos);

    for emitter in &mut state.invaders {
        emitter.launch(now, dt, &mut state.rng);
    }

    state.ship.clamp_to_bounds(state.width, state.height);
    state.ship.integrate(dt);

    let hits = check_collisions(&state.turret, &mut state.invaders, dt);
    for hit in hits {
        state.score += 1;
        state
            .particles
            .burst(hit.pos, &input.particles, now, &mut state.rng);
        state.events.push(GameEvent::Explosion { pos: hit.pos });
    }

    state
        .particles
        .update(now, dt, &input.particles, &mut state.rng);

    state.clock_ms += f64::from(dt) * 1000.0;

    if state.phase == GamePhase::Playing && state.elapsed_secs() >= ROUND_DURATION_SECS {
        log::info!("Round over: score {}", state.score);
        state.end_round();
    }
}

fn apply_command(state: &mut GameState, command: Command) {
    let playing = state.phase == GamePhase::Playing;

    match command {
        Command::Fire => {
            if playing {
                if state.turret.shoot(state.clock_ms) {
                    state.events.push(GameEvent::Shot);
                }
            } else {
                log::info!("Round started");
                state.start_round();
            }
        }
        Command::ThrustUp if playing => state.ship.thrust += THRUST_STEP,
        Command::ThrustDown if playing => state.ship.thrust -= THRUST_STEP,
        Command::ReleaseThrustUp if playing => {
            let thrust = state.ship.thrust;
            if thrust > 0.0 {
                state.ship.thrust = (thrust - THRUST_RELEASE).max(0.0);
            }
        }
        Command::ReleaseThrustDown if playing => {
            let thrust = state.ship.thrust;
            if thrust < 0.0 {
                state.ship.thrust = (thrust + THRUST_RELEASE).min(0.0);
            }
        }
        Command::RotateLeft if playing => state.ship.rotate_by(-ROTATION_STEP_DEG),
        Command::RotateRight if playing => state.ship.rotate_by(ROTATION_STEP_DEG),
        // Dragging works in any phase
        Command::PointerPress(p) => {
            if state.ship.contains_point(p) {
                state.drag = Some(DragState { last: p });
            }
        }
        Command::PointerDrag(p) => {
            if let Some(drag) = &mut state.drag {
                state.ship.pos += p - drag.last;
                drag.last = p;
            }
        }
        Command::PointerRelease => state.drag = None,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::Sprite;
    use crate::sim::state::SpriteSizes;

    fn new_state() -> GameState {
        GameState::new(12345, 1024.0, 768.0, SpriteSizes::default())
    }

    fn input(commands: &[Command]) -> TickInput {
        TickInput {
            commands: commands.to_vec(),
            ..Default::default()
        }
    }

    fn run(state: &mut GameState, ticks: usize) {
        let idle = TickInput::default();
        for _ in 0..ticks {
            tick(state, &idle, SIM_DT);
        }
    }

    #[test]
    fn test_fire_starts_round_from_idle() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.invaders.iter().all(|e| e.is_started()));
        assert!(state.drain_events().contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_fire_while_playing_shoots_along_heading() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        run(&mut state, 10);
        state.drain_events();

        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        assert_eq!(state.turret.sys.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::Shot));

        // Heading is up at rotation 0, speed 500 px/s
        let missile = &state.turret.sys.sprites()[0];
        assert!((missile.velocity - Vec2::new(0.0, -500.0)).length() < 1e-3);
    }

    #[test]
    fn test_fire_respects_turret_rate() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        run(&mut state, 10);
        tick(&mut state, &input(&[Command::Fire, Command::Fire]), SIM_DT);
        assert_eq!(state.turret.sys.len(), 1);
    }

    #[test]
    fn test_ship_controls_ignored_while_idle() {
        let mut state = new_state();
        tick(
            &mut state,
            &input(&[Command::ThrustUp, Command::RotateRight]),
            SIM_DT,
        );
        assert_eq!(state.ship.thrust, 0.0);
        assert_eq!(state.ship.rotation, 0.0);
    }

    #[test]
    fn test_thrust_and_release() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);

        tick(
            &mut state,
            &input(&[Command::ThrustUp, Command::ThrustUp, Command::ThrustUp]),
            SIM_DT,
        );
        assert_eq!(state.ship.thrust, 1.5);
        tick(&mut state, &input(&[Command::ReleaseThrustUp]), SIM_DT);
        assert_eq!(state.ship.thrust, 0.5);
        tick(&mut state, &input(&[Command::ReleaseThrustUp]), SIM_DT);
        assert_eq!(state.ship.thrust, 0.0);

        tick(&mut state, &input(&[Command::ThrustDown]), SIM_DT);
        assert_eq!(state.ship.thrust, -0.5);
        // Releasing Up does nothing to reverse thrust
        tick(&mut state, &input(&[Command::ReleaseThrustUp]), SIM_DT);
        assert_eq!(state.ship.thrust, -0.5);
        tick(&mut state, &input(&[Command::ReleaseThrustDown]), SIM_DT);
        assert_eq!(state.ship.thrust, 0.0);
    }

    #[test]
    fn test_ship_moves_with_thrust() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        let start = state.ship.pos;
        tick(&mut state, &input(&[Command::ThrustUp, Command::ThrustUp]), SIM_DT);
        // One pixel per tick per unit thrust
        assert!((state.ship.pos - (start + Vec2::new(0.0, -1.0))).length() < 1e-3);
    }

    #[test]
    fn test_rotation_steps() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        tick(
            &mut state,
            &input(&[Command::RotateRight, Command::RotateRight, Command::RotateLeft]),
            SIM_DT,
        );
        assert_eq!(state.ship.rotation, 20.0);
    }

    #[test]
    fn test_drag_moves_ship() {
        let mut state = new_state();
        let grab = state.ship.pos;
        tick(
            &mut state,
            &input(&[
                Command::PointerPress(grab),
                Command::PointerDrag(grab + Vec2::new(30.0, -10.0)),
                Command::PointerRelease,
                Command::PointerDrag(grab + Vec2::new(300.0, 0.0)),
            ]),
            SIM_DT,
        );
        assert!((state.ship.pos - (grab + Vec2::new(30.0, -10.0))).length() < 1e-3);
        assert!(state.drag.is_none());
    }

    #[test]
    fn test_press_outside_ship_does_not_drag() {
        let mut state = new_state();
        let start = state.ship.pos;
        tick(
            &mut state,
            &input(&[
                Command::PointerPress(Vec2::new(5.0, 5.0)),
                Command::PointerDrag(Vec2::new(100.0, 100.0)),
            ]),
            SIM_DT,
        );
        assert_eq!(state.ship.pos, start);
    }

    #[test]
    fn test_hit_scores_and_explodes() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        state.drain_events();

        let target = Vec2::new(300.0, 300.0);
        let mut missile = Sprite::new(target, state.clock_ms);
        missile.lifespan_ms = None;
        state.turret.sys.add(missile);
        state.invaders[2].sys.add(Sprite::new(target, state.clock_ms));

        tick(
            &mut state,
            &TickInput {
                turret: TurretParams {
                    velocity: Vec2::ZERO,
                    ..Default::default()
                },
                ..Default::default()
            },
            SIM_DT,
        );

        assert_eq!(state.score, 1);
        assert_eq!(state.particles.len(), EXPLOSION_GROUP_SIZE);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Explosion { .. }))
        );
    }

    #[test]
    fn test_round_ends_at_thirty_seconds() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        state.score = 9;

        run(&mut state, 29 * 60);
        assert_eq!(state.phase, GamePhase::Playing);

        run(&mut state, 2 * 60);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.elapsed_secs(), 0.0);
        assert!(state.invaders.iter().all(|e| e.sys.is_empty() && !e.is_started()));
        assert!(state.turret.sys.is_empty());
        assert_eq!(state.summary.map(|s| s.score), Some(9));
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { score: 9, .. }))
        );
    }

    #[test]
    fn test_invaders_fall_while_playing() {
        let mut state = new_state();
        tick(&mut state, &input(&[Command::Fire]), SIM_DT);
        // Rate 0.5/s: first invader appears after two seconds
        run(&mut state, 2 * 60 + 5);
        let total: usize = state.invaders.iter().map(|e| e.sys.len()).sum();
        assert!(total >= 4);
        for e in &state.invaders {
            for s in e.sys.iter() {
                assert!(s.velocity.y >= 500.0);
            }
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = new_state();
        let mut b = new_state();
        let start = input(&[Command::Fire]);
        tick(&mut a, &start, SIM_DT);
        tick(&mut b, &start, SIM_DT);
        run(&mut a, 300);
        run(&mut b, 300);
        let pos_a: Vec<Vec2> = a.invaders.iter().flat_map(|e| e.sys.iter().map(|s| s.pos)).collect();
        let pos_b: Vec<Vec2> = b.invaders.iter().flat_map(|e| e.sys.iter().map(|s| s.pos)).collect();
        assert_eq!(pos_a, pos_b);
    }
}
