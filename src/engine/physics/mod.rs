// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::CollisionGroups;
pub use world::{PhysicsWorld, RayHit};

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{Group, QueryFilter, Real, Vector};

use glam::Vec2;

/// Convert a game-side vector into rapier's vector type
pub fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

/// Convert a rapier vector into a game-side vector
pub fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_conversion() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(from_vector(&to_vector(v)), v);
    }
}
