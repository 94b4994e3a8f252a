// Data-driven enemy descriptions and the built-in presets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::game::combat::KnockbackModel;

/// Where an enemy walks (or flies) when it is not chasing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Patrol {
    /// Stand still until the player comes close
    #[default]
    None,
    /// Visit points in order. Without `looping` the route is walked back
    /// and forth instead of wrapping around.
    Waypoints {
        points: Vec<Vec2>,
        #[serde(default = "default_true")]
        looping: bool,
    },
    /// Walk between two points, starting towards `b`
    PingPong { a: Vec2, b: Vec2 },
    /// Walk `distance` units wide, centred on the spawn point, starting rightwards
    Span { distance: f32 },
}

fn default_true() -> bool {
    true
}

impl Patrol {
    /// Resolve into concrete route points for an enemy spawned at `origin`
    pub fn route(&self, origin: Vec2) -> Vec<Vec2> {
        match self {
            Patrol::None => Vec::new(),
            Patrol::Waypoints { points, .. } => points.clone(),
            Patrol::PingPong { a, b } => vec![*b, *a],
            Patrol::Span { distance } => {
                let half = distance.abs() / 2.0;
                vec![origin + Vec2::new(half, 0.0), origin - Vec2::new(half, 0.0)]
            }
        }
    }

    pub fn is_looping(&self) -> bool {
        match self {
            Patrol::Waypoints { looping, .. } => *looping,
            _ => true,
        }
    }

    pub fn requires_points(&self) -> bool {
        matches!(self, Patrol::Waypoints { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyAttack {
    #[default]
    None,
    /// Stop and strike when the player is within `range`
    Melee {
        range: f32,
        damage: i32,
        cooldown: f32,
    },
    /// Hurt the player on touch
    Contact { damage: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub name: String,
    pub health: i32,
    /// Collider size
    pub size: Vec2,
    pub patrol: Patrol,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Chase starts when the player is closer than this
    pub detection_range: f32,
    /// Seconds to hold position after losing the player before patrolling again
    pub return_delay: f32,
    pub attack: EnemyAttack,
    /// Flying enemies move in 2D; grounded ones only along x
    pub flying: bool,
    pub knockback: KnockbackModel,
    /// Light hits knock back too, not just heavy ones
    pub staggered_by_light_hits: bool,
    /// Seconds the body stays in the world after dying
    pub death_linger: f32,
    /// Distance at which a patrol point counts as reached
    pub arrival_tolerance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self::brute()
    }
}

impl EnemyConfig {
    /// Chases and melees the player, knocked back by heavy hits
    pub fn brute() -> Self {
        Self {
            name: "brute".into(),
            health: 100,
            size: Vec2::new(1.0, 1.5),
            patrol: Patrol::None,
            patrol_speed: 0.0,
            chase_speed: 2.0,
            detection_range: 5.0,
            return_delay: 0.0,
            attack: EnemyAttack::Melee {
                range: 1.0,
                damage: 1,
                cooldown: 1.0,
            },
            flying: false,
            knockback: KnockbackModel::Decaying {
                recovery_speed: 5.0,
            },
            staggered_by_light_hits: false,
            death_linger: 1.0,
            arrival_tolerance: 0.1,
        }
    }

    /// Flies a waypoint loop, dives at the player, hurts on contact
    pub fn bat() -> Self {
        Self {
            name: "bat".into(),
            health: 3,
            size: Vec2::new(0.8, 0.6),
            patrol: Patrol::Waypoints {
                points: Vec::new(),
                looping: true,
            },
            patrol_speed: 2.0,
            chase_speed: 4.0,
            detection_range: 5.0,
            return_delay: 2.0,
            attack: EnemyAttack::Contact { damage: 1 },
            flying: true,
            knockback: KnockbackModel::Decaying {
                recovery_speed: 5.0,
            },
            staggered_by_light_hits: false,
            death_linger: 0.0,
            arrival_tolerance: 0.2,
        }
    }

    /// Walks between two points and follows the player when it sees them
    pub fn sentinel() -> Self {
        Self {
            name: "sentinel".into(),
            health: 100,
            size: Vec2::new(1.0, 1.5),
            patrol: Patrol::Span { distance: 4.0 },
            patrol_speed: 2.0,
            chase_speed: 3.0,
            detection_range: 5.0,
            return_delay: 0.0,
            attack: EnemyAttack::None,
            flying: false,
            knockback: KnockbackModel::Decaying {
                recovery_speed: 5.0,
            },
            staggered_by_light_hits: false,
            death_linger: 0.0,
            arrival_tolerance: 0.1,
        }
    }

    /// Training dummy: does nothing, staggers on every hit
    pub fn dummy() -> Self {
        Self {
            name: "dummy".into(),
            health: 100,
            size: Vec2::new(1.0, 1.5),
            patrol: Patrol::None,
            patrol_speed: 0.0,
            chase_speed: 0.0,
            detection_range: 0.0,
            return_delay: 0.0,
            attack: EnemyAttack::None,
            flying: false,
            knockback: KnockbackModel::Timed {
                duration: 0.5,
                speed: 5.0,
            },
            staggered_by_light_hits: true,
            // Three 0.1 s flashes, then a 0.5 s fade
            death_linger: 0.8,
            arrival_tolerance: 0.1,
        }
    }

    pub fn with_patrol(mut self, patrol: Patrol) -> Self {
        self.patrol = patrol;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.health < 1 {
            return Err(format!("{}: health must be at least 1", self.name));
        }
        if self.size.min_element() <= 0.0 {
            return Err(format!("{}: size must be positive", self.name));
        }
        if self.patrol_speed < 0.0 || self.chase_speed < 0.0 || self.detection_range < 0.0 {
            return Err(format!("{}: speeds and ranges cannot be negative", self.name));
        }
        Ok(())
    }
}

/// Named presets, usable from level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyPreset {
    Brute,
    Bat,
    Sentinel,
    Dummy,
}

impl EnemyPreset {
    pub fn config(self) -> EnemyConfig {
        match self {
            EnemyPreset::Brute => EnemyConfig::brute(),
            EnemyPreset::Bat => EnemyConfig::bat(),
            EnemyPreset::Sentinel => EnemyConfig::sentinel(),
            EnemyPreset::Dummy => EnemyConfig::dummy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [
            EnemyPreset::Brute,
            EnemyPreset::Bat,
            EnemyPreset::Sentinel,
            EnemyPreset::Dummy,
        ] {
            assert!(preset.config().validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_ping_pong_route_starts_at_b() {
        let patrol = Patrol::PingPong {
            a: Vec2::new(-2.0, 0.0),
            b: Vec2::new(2.0, 0.0),
        };
        assert_eq!(
            patrol.route(Vec2::ZERO),
            vec![Vec2::new(2.0, 0.0), Vec2::new(-2.0, 0.0)]
        );
    }

    #[test]
    fn test_span_route_centred_on_origin() {
        let patrol = Patrol::Span { distance: 4.0 };
        assert_eq!(
            patrol.route(Vec2::new(10.0, 1.0)),
            vec![Vec2::new(12.0, 1.0), Vec2::new(8.0, 1.0)]
        );
    }

    #[test]
    fn test_patrol_from_json() {
        let patrol: Patrol =
            serde_json::from_str(r#"{"type": "waypoints", "points": [[0, 0], [1, 2]]}"#).unwrap();
        assert!(patrol.is_looping());
        assert_eq!(patrol.route(Vec2::ZERO).len(), 2);
    }

    #[test]
    fn test_config_json_overrides_defaults() {
        let config: EnemyConfig =
            serde_json::from_str(r#"{"name": "big brute", "health": 300}"#).unwrap();
        assert_eq!(config.health, 300);
        assert_eq!(config.chase_speed, EnemyConfig::brute().chase_speed);
    }
}
