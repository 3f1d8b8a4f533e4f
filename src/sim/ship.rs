//! The player ship: a triangle with thrust/heading movement
//!
//! Movement is kinematic: every tick the ship moves `thrust` pixels along its
//! heading. There is no momentum: velocity is recomputed from thrust each
//! tick, so releasing thrust stops the ship immediately.

use glam::{Affine2, Vec2};

use crate::consts::{
    SHIP_EDGE_MARGIN, SHIP_EDGE_RESET, SHIP_SPAWN_FROM_BOTTOM, SHIP_TOP_RESET, SIM_HZ,
};
use crate::direction_from_degrees;

/// Local-space ship outline (nose points toward -y)
pub const SHIP_VERTS: [Vec2; 3] = [
    Vec2::new(-20.0, 20.0),
    Vec2::new(0.0, -40.0),
    Vec2::new(20.0, 20.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    /// Degrees, clockwise on screen
    pub rotation: f32,
    pub scale: Vec2,
    pub verts: [Vec2; 3],
    /// Pixels moved per 60 Hz tick along the heading
    pub thrust: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            verts: SHIP_VERTS,
            thrust: 0.0,
        }
    }
}

impl Ship {
    /// Ship parked at its spawn point for a window of the given size
    pub fn spawned(width: f32, height: f32) -> Self {
        let mut ship = Self::default();
        ship.reset(width, height);
        ship
    }

    /// Unit direction of travel. Rotation 0 points at the top of the screen.
    pub fn heading(&self) -> Vec2 {
        direction_from_degrees(self.rotation + 270.0)
    }

    /// Displacement per 60 Hz tick
    pub fn velocity(&self) -> Vec2 {
        self.heading() * self.thrust
    }

    /// Move along the heading by the current thrust
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.velocity() * (dt * SIM_HZ);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    /// Local-to-screen transform (translate * rotate * scale)
    pub fn transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation.to_radians(), self.pos)
    }

    /// Outline in screen space
    pub fn world_vertices(&self) -> [Vec2; 3] {
        let t = self.transform();
        self.verts.map(|v| t.transform_point2(v))
    }

    /// Hit test against the transformed outline, whatever its winding
    pub fn contains_point(&self, p: Vec2) -> bool {
        let [a, b, c] = self.world_vertices();
        if (b - a).perp_dot(c - a) > 0.0 {
            inside(p, a, c, b)
        } else {
            inside(p, a, b, c)
        }
    }

    /// Keep the ship on screen. Touching an edge parks it just inside and
    /// kills thrust. Returns true if any edge was hit.
    pub fn clamp_to_bounds(&mut self, width: f32, height: f32) -> bool {
        let mut hit = false;
        if self.pos.x < SHIP_EDGE_MARGIN {
            self.pos.x = SHIP_EDGE_RESET;
            hit = true;
        }
        if self.pos.x > width - SHIP_EDGE_MARGIN {
            self.pos.x = width - SHIP_EDGE_RESET;
            hit = true;
        }
        if self.pos.y < SHIP_EDGE_MARGIN {
            self.pos.y = SHIP_TOP_RESET;
            hit = true;
        }
        if self.pos.y > height - SHIP_EDGE_MARGIN {
            self.pos.y = height - SHIP_EDGE_RESET;
            hit = true;
        }
        if hit {
            self.thrust = 0.0;
        }
        hit
    }

    /// Back to the spawn point, pointing up, engines off
    pub fn reset(&mut self, width: f32, height: f32) {
        self.thrust = 0.0;
        self.rotation = 0.0;
        self.pos = Vec2::new(width / 2.0, height - SHIP_SPAWN_FROM_BOTTOM);
    }
}

/// Point-in-triangle by turning direction.
///
/// True iff the vectors from `p` to each vertex all turn the same (negative)
/// way, i.e. `p` is strictly inside a negatively wound triangle. Points on an
/// edge or at a vertex are outside.
pub fn inside(p: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    let v1 = p1 - p;
    let v2 = p2 - p;
    let v3 = p3 - p;
    if v1 == Vec2::ZERO || v2 == Vec2::ZERO || v3 == Vec2::ZERO {
        return false;
    }
    v1.perp_dot(v2) < 0.0 && v2.perp_dot(v3) < 0.0 && v3.perp_dot(v1) < 0.0
}
