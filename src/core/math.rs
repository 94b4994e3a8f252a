// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Step `current` towards `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Blend a velocity towards zero by `rate * dt` (the blend factor is clamped to [0, 1])
pub fn decay_towards_zero(velocity: Vec2, rate: f32, dt: f32) -> Vec2 {
    let t = clamp(rate * dt, 0.0, 1.0);
    velocity.lerp(Vec2::ZERO, t)
}

/// Sign of a horizontal direction: 1.0 for right, -1.0 for left, 0.0 for none
pub fn direction_sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Overlap test between two axis-aligned boxes given as center and half extents
pub fn boxes_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    delta.x < a_half.x + b_half.x && delta.y < a_half.y + b_half.y
}
