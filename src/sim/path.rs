//! Sine guide path drawn as an optional overlay

use glam::Vec2;
use std::f32::consts::PI;

/// Point on the guide curve at screen column `x`.
///
/// `scale` is the amplitude, `cycles` the number of periods across `width`.
/// The curve is centred vertically on the window.
pub fn curve_eval(x: f32, scale: f32, cycles: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 {
        return Vec2::new(x, height / 2.0);
    }
    let u = cycles * x * PI / width;
    Vec2::new(x, -scale * u.sin() + height / 2.0)
}

/// Sample the curve every `step` pixels across the window
pub fn sample_curve(scale: f32, cycles: f32, width: f32, height: f32, step: usize) -> Vec<Vec2> {
    let step = step.max(1);
    (0..width.max(0.0) as usize)
        .step_by(step)
        .map(|x| curve_eval(x as f32, scale, cycles, width, height))
        .collect()
}
