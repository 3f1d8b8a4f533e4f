//! Missile vs invader collision detection
//!
//! Pure spatial queries. Effects (score, explosions, sound) are driven by the
//! caller from the returned hits.

use glam::Vec2;

use super::emitter::Emitter;
use super::sprite::Sprite;

/// Contact distance between a missile and an invader: half heights summed
pub fn collision_dist(turret: &Emitter, invaders: &Emitter) -> f32 {
    turret.child_height / 2.0 + invaders.child_height / 2.0
}

/// Closest point to `p` on the segment `a..b`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// True if `missile` came strictly within `dist` of `target` during the last step.
///
/// Both sprites moved this tick, so the test runs in the target's frame: the
/// missile sweeps `pos - (v_missile - v_target) * dt .. pos` against the
/// target's current position. Fast missiles cannot skip past a target.
pub fn swept_hit(missile: &Sprite, target: &Sprite, dt: f32, dist: f32) -> bool {
    let end = missile.pos;
    let start = end - (missile.velocity - target.velocity) * dt;
    closest_point_on_segment(start, end, target.pos).distance(target.pos) < dist
}

/// Remove every invader touched by any turret missile this tick.
///
/// Missiles survive their hits. Returns the removed invaders in hit order.
pub fn check_collisions(turret: &Emitter, invaders: &mut [Emitter], dt: f32) -> Vec<Sprite> {
    let mut hits = Vec::new();

    for missile in turret.sys.iter() {
        for emitter in invaders.iter_mut() {
            let dist = collision_dist(turret, emitter);
            hits.extend(
                emitter
                    .sys
                    .remove_where(|invader| swept_hit(missile, invader, dt, dist)),
            );
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::Sprite;

    fn turret_with_missile(pos: Vec2, velocity: Vec2) -> Emitter {
        let mut turret = Emitter::new();
        turret.set_child_size(4.0, 10.0);
        turret.set_velocity(velocity);
        let mut missile = Sprite::new(pos, 0.0);
        missile.velocity = velocity;
        turret.sys.add(missile);
        turret
    }

    fn invaders_at(points: &[Vec2]) -> Emitter {
        let mut e = Emitter::new();
        e.set_child_size(20.0, 20.0);
        for &p in points {
            e.sys.add(Sprite::new(p, 0.0));
        }
        e
    }

    #[test]
    fn test_collision_dist_sums_half_heights() {
        let turret = turret_with_missile(Vec2::ZERO, Vec2::ZERO);
        let invaders = invaders_at(&[]);
        assert_eq!(collision_dist(&turret, &invaders), 15.0);
    }

    #[test]
    fn test_hit_removes_only_near_invaders() {
        let turret = turret_with_missile(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let mut invaders = [
            invaders_at(&[Vec2::new(100.0, 110.0), Vec2::new(300.0, 300.0)]),
            invaders_at(&[Vec2::new(95.0, 100.0)]),
        ];
        let hits = check_collisions(&turret, &mut invaders, 1.0 / 60.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(invaders[0].sys.len(), 1);
        assert!(invaders[1].sys.is_empty());
        // Missile is not consumed
        assert_eq!(turret.sys.len(), 1);
    }

    #[test]
    fn test_fast_missile_does_not_tunnel() {
        // 3000 px/s covers 50 px per tick; the invader sits mid-step
        let velocity = Vec2::new(0.0, -3000.0);
        let turret = turret_with_missile(Vec2::new(0.0, 0.0), velocity);
        let mut invaders = [invaders_at(&[Vec2::new(0.0, 25.0)])];
        let hits = check_collisions(&turret, &mut invaders, 1.0 / 60.0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_fast_missile_hits_target_beside_its_path() {
        // 10 px step straight up; the invader sits 3.8 px off the path
        let mut turret = turret_with_missile(Vec2::ZERO, Vec2::new(0.0, -600.0));
        turret.set_child_size(4.0, 4.0);
        let mut invaders = [invaders_at(&[Vec2::new(3.8, 5.0)])];
        invaders[0].set_child_size(4.0, 4.0);
        assert_eq!(collision_dist(&turret, &invaders[0]), 4.0);

        let hits = check_collisions(&turret, &mut invaders, 1.0 / 60.0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_target_motion_is_taken_into_account() {
        // Missile moves 10 px up; the invader moved 20 px right in the same tick.
        // Relative to the invader the missile crossed within 1 px of it.
        let mut turret = turret_with_missile(Vec2::ZERO, Vec2::new(0.0, -600.0));
        turret.set_child_size(4.0, 4.0);
        let mut invaders = invaders_at(&[]);
        invaders.set_child_size(4.0, 4.0);
        let mut invader = Sprite::new(Vec2::new(12.0, 5.0), 0.0);
        invader.velocity = Vec2::new(1200.0, 0.0);
        invaders.sys.add(invader);
        let mut invaders = [invaders];

        let hits = check_collisions(&turret, &mut invaders, 1.0 / 60.0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_target_beyond_reach_is_kept() {
        let mut turret = turret_with_missile(Vec2::ZERO, Vec2::new(0.0, -600.0));
        turret.set_child_size(4.0, 4.0);
        let mut invaders = [invaders_at(&[Vec2::new(4.5, 5.0), Vec2::new(0.0, 15.0)])];
        invaders[0].set_child_size(4.0, 4.0);

        let hits = check_collisions(&turret, &mut invaders, 1.0 / 60.0);
        assert!(hits.is_empty());
        assert_eq!(invaders[0].sys.len(), 2);
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(4.0, 3.0)), Vec2::new(4.0, 0.0));
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(-5.0, 1.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec2::new(15.0, -1.0)), b);
        // Degenerate segment is a point
        assert_eq!(closest_point_on_segment(b, b, Vec2::ZERO), b);
    }
}
