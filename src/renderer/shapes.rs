//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen pixels. Untextured shapes
//! sample the white texture so one pipeline draws them all.

use glam::{Affine2, Vec2};
use std::f32::consts::PI;

use super::vertex::SpriteVertex;

/// Corners of an axis-aligned box: top-left, top-right, bottom-right, bottom-left
pub fn box_corners(min: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        min,
        Vec2::new(min.x + size.x, min.y),
        min + size,
        Vec2::new(min.x, min.y + size.y),
    ]
}

/// Box of `size` centred on `center`
pub fn centered_corners(center: Vec2, size: Vec2) -> [Vec2; 4] {
    box_corners(center - size / 2.0, size)
}

/// Run corners through a transform
pub fn transformed(corners: [Vec2; 4], t: &Affine2) -> [Vec2; 4] {
    corners.map(|c| t.transform_point2(c))
}

/// Quad showing a whole texture, corners in top-left/top-right/bottom-right/bottom-left order
pub fn textured_quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<SpriteVertex> {
    let [tl, tr, br, bl] = corners;
    let v = |p: Vec2, u: f32, w: f32| SpriteVertex::new(p, Vec2::new(u, w), color);
    vec![
        v(tl, 0.0, 0.0),
        v(tr, 1.0, 0.0),
        v(br, 1.0, 1.0),
        v(tl, 0.0, 0.0),
        v(br, 1.0, 1.0),
        v(bl, 0.0, 1.0),
    ]
}

/// Filled untextured quad
pub fn solid_quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<SpriteVertex> {
    let [tl, tr, br, bl] = corners;
    [tl, tr, br, tl, br, bl]
        .into_iter()
        .map(|p| SpriteVertex::solid(p, color))
        .collect()
}

/// Filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<SpriteVertex> {
    solid_quad(box_corners(min, size), color)
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<SpriteVertex> {
    vec![
        SpriteVertex::solid(a, color),
        SpriteVertex::solid(b, color),
        SpriteVertex::solid(c, color),
    ]
}

/// Line segment drawn as a thin quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<SpriteVertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let half = dir.perp() * (width / 2.0);
    solid_quad([a + half, b + half, b - half, a - half], color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<SpriteVertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        center + Vec2::new(theta.cos(), theta.sin()) * radius
    };

    for i in 0..segments {
        // Triangle from center to edge
        vertices.push(SpriteVertex::solid(center, color));
        vertices.push(SpriteVertex::solid(rim(i), color));
        vertices.push(SpriteVertex::solid(rim(i + 1), color));
    }

    vertices
}

/// Same colour with alpha scaled
pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_box() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
        assert!(verts.iter().all(|v| v.uv == [0.5, 0.5]));
    }

    #[test]
    fn test_textured_quad_uvs_span_texture() {
        let verts = textured_quad(box_corners(Vec2::ZERO, Vec2::ONE), [1.0; 4]);
        assert_eq!(verts[0].uv, [0.0, 0.0]);
        assert_eq!(verts[2].uv, [1.0, 1.0]);
        assert_eq!(verts[2].position, [1.0, 1.0]);
        assert_eq!(verts[5].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_centered_corners() {
        let c = centered_corners(Vec2::new(50.0, 50.0), Vec2::new(10.0, 20.0));
        assert_eq!(c[0], Vec2::new(45.0, 40.0));
        assert_eq!(c[2], Vec2::new(55.0, 60.0));
    }

    #[test]
    fn test_line_has_width() {
        let verts = line(Vec2::ZERO, Vec2::new(100.0, 0.0), 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[1].abs() <= 1.0 + 1e-6));
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_circle_stays_on_radius() {
        let center = Vec2::new(5.0, 5.0);
        let verts = circle(center, 3.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        for v in &verts {
            assert!(v.pos().distance(center) <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade([1.0, 0.5, 0.0, 0.8], 0.5), [1.0, 0.5, 0.0, 0.4]);
    }
}
