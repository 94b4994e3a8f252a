// Knockback models for things that get hit

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::math::decay_towards_zero;

/// Below this speed a decaying knockback is considered over
const DECAY_STOP_SPEED: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum KnockbackModel {
    /// Immovable
    None,
    /// Launched at the hit's force, then blended back to rest at `recovery_speed`
    Decaying { recovery_speed: f32 },
    /// Pushed at a fixed `speed` for `duration` seconds, then stopped dead
    Timed { duration: f32, speed: f32 },
}

impl Default for KnockbackModel {
    fn default() -> Self {
        Self::Decaying {
            recovery_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    model: KnockbackModel,
    velocity: Vec2,
    remaining: f32,
}

impl Knockback {
    pub fn new(model: KnockbackModel) -> Self {
        Self {
            model,
            velocity: Vec2::ZERO,
            remaining: 0.0,
        }
    }

    pub fn model(&self) -> KnockbackModel {
        self.model
    }

    /// Knock back along `direction` (normalised here). `force` is only used
    /// by the decaying model.
    pub fn apply(&mut self, direction: Vec2, force: f32) {
        let direction = direction.normalize_or_zero();
        match self.model {
            KnockbackModel::None => {}
            KnockbackModel::Decaying { .. } => {
                self.velocity = direction * force;
            }
            KnockbackModel::Timed { duration, speed } => {
                self.velocity = direction * speed;
                self.remaining = duration;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        match self.model {
            KnockbackModel::None => false,
            KnockbackModel::Decaying { .. } => self.velocity.length() > DECAY_STOP_SPEED,
            KnockbackModel::Timed { .. } => self.remaining > 0.0,
        }
    }

    /// Advance one tick. Returns the knockback velocity to move with, or
    /// None once the knockback is over.
    pub fn tick(&mut self, dt: f32) -> Option<Vec2> {
        match self.model {
            KnockbackModel::None => None,
            KnockbackModel::Decaying { recovery_speed } => {
                if self.velocity.length() > DECAY_STOP_SPEED {
                    self.velocity = decay_towards_zero(self.velocity, recovery_speed, dt);
                    Some(self.velocity)
                } else {
                    self.velocity = Vec2::ZERO;
                    None
                }
            }
            KnockbackModel::Timed { .. } => {
                if self.remaining <= 0.0 {
                    return None;
                }
                self.remaining -= dt;
                if self.remaining <= 0.0 {
                    self.remaining = 0.0;
                    self.velocity = Vec2::ZERO;
                }
                Some(self.velocity)
            }
        }
    }

    pub fn clear(&mut self) {
        self.velocity = Vec2::ZERO;
        self.remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_decaying_knockback_slows_and_stops() {
        let mut knockback = Knockback::new(KnockbackModel::Decaying {
            recovery_speed: 5.0,
        });
        knockback.apply(Vec2::X, 10.0);
        let first = knockback.tick(DT).unwrap();
        assert!(first.x > 0.0 && first.x < 10.0);

        let mut ticks = 1;
        while knockback.tick(DT).is_some() {
            ticks += 1;
            assert!(ticks < 600, "knockback never ended");
        }
        assert!(!knockback.is_active());
    }

    #[test]
    fn test_timed_knockback_fixed_speed() {
        let mut knockback = Knockback::new(KnockbackModel::Timed {
            duration: 0.5,
            speed: 5.0,
        });
        // Force is ignored by the timed model
        knockback.apply(Vec2::new(-3.0, 0.0), 100.0);
        assert_eq!(knockback.tick(DT), Some(Vec2::new(-5.0, 0.0)));

        for _ in 0..40 {
            knockback.tick(DT);
        }
        assert!(!knockback.is_active());
        assert_eq!(knockback.tick(DT), None);
    }

    #[test]
    fn test_immovable() {
        let mut knockback = Knockback::new(KnockbackModel::None);
        knockback.apply(Vec2::X, 10.0);
        assert!(!knockback.is_active());
        assert_eq!(knockback.tick(DT), None);
    }

    #[test]
    fn test_model_from_json() {
        let model: KnockbackModel =
            serde_json::from_str(r#"{"model": "timed", "duration": 0.5, "speed": 5.0}"#).unwrap();
        assert_eq!(
            model,
            KnockbackModel::Timed {
                duration: 0.5,
                speed: 5.0
            }
        );
    }
}
