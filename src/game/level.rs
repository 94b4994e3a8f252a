// Level descriptions loaded from JSON

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, Result};
use crate::game::abilities::Ability;
use crate::game::enemies::{EnemyConfig, EnemyPreset, Patrol};
use crate::game::platform::PlatformDesc;
use crate::game::triggers::{TriggerDesc, TriggerKind};

/// A static box of level geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDesc {
    pub position: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: Vec2,
    #[serde(default)]
    pub preset: Option<EnemyPreset>,
    /// Full description; takes precedence over `preset`
    #[serde(default)]
    pub config: Option<EnemyConfig>,
    /// Replaces the patrol of the preset or config
    #[serde(default)]
    pub patrol: Option<Patrol>,
}

impl EnemySpawn {
    pub fn preset(preset: EnemyPreset, position: Vec2) -> Self {
        Self {
            position,
            preset: Some(preset),
            config: None,
            patrol: None,
        }
    }

    pub fn with_patrol(mut self, patrol: Patrol) -> Self {
        self.patrol = Some(patrol);
        self
    }

    /// The enemy description this spawn asks for, if it names one
    pub fn resolve(&self) -> Option<EnemyConfig> {
        let config = self
            .config
            .clone()
            .or_else(|| self.preset.map(EnemyPreset::config))?;
        Some(match &self.patrol {
            Some(patrol) => config.with_patrol(patrol.clone()),
            None => config,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDesc {
    pub name: String,
    pub player_spawn: Vec2,
    /// Falling below this height kills the player
    pub kill_plane_y: f32,
    pub ground: Vec<BlockDesc>,
    pub platforms: Vec<PlatformDesc>,
    pub enemies: Vec<EnemySpawn>,
    pub triggers: Vec<TriggerDesc>,
}

impl Default for LevelDesc {
    fn default() -> Self {
        Self {
            name: "untitled".into(),
            player_spawn: Vec2::new(0.0, 1.0),
            kill_plane_y: -20.0,
            ground: Vec::new(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            triggers: Vec::new(),
        }
    }
}

impl LevelDesc {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let level = Self::from_json(&text)?;
        log::info!("loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Structural checks. Individual broken objects are not errors; the
    /// world skips them with a warning.
    pub fn validate(&self) -> Result<()> {
        if self.player_spawn.y <= self.kill_plane_y {
            return Err(GameError::InvalidLevel(
                "player spawn is below the kill plane".into(),
            ));
        }
        if let Some(block) = self.ground.iter().find(|b| b.size.min_element() <= 0.0) {
            return Err(GameError::InvalidLevel(format!(
                "ground block at {:?} has a non-positive size",
                block.position
            )));
        }
        for platform in &self.platforms {
            platform.validate()?;
        }
        Ok(())
    }

    /// A small built-in level exercising every kind of object
    pub fn demo() -> Self {
        Self {
            name: "demo".into(),
            player_spawn: Vec2::new(0.0, 1.0),
            kill_plane_y: -20.0,
            ground: vec![
                // Main floor, top surface at y = 0
                BlockDesc {
                    position: Vec2::new(10.0, -0.5),
                    size: Vec2::new(40.0, 1.0),
                },
                // Ledge past the pit
                BlockDesc {
                    position: Vec2::new(42.0, -0.5),
                    size: Vec2::new(12.0, 1.0),
                },
            ],
            platforms: vec![PlatformDesc {
                name: "ferry".into(),
                waypoints: vec![Vec2::new(31.5, -0.25), Vec2::new(34.5, -0.25)],
                ..PlatformDesc::default()
            }],
            enemies: vec![
                EnemySpawn::preset(EnemyPreset::Dummy, Vec2::new(3.0, 0.75)),
                EnemySpawn::preset(EnemyPreset::Brute, Vec2::new(14.0, 0.75)),
                EnemySpawn::preset(EnemyPreset::Bat, Vec2::new(22.0, 3.0)).with_patrol(
                    Patrol::Waypoints {
                        points: vec![
                            Vec2::new(20.0, 3.0),
                            Vec2::new(24.0, 3.0),
                            Vec2::new(22.0, 4.5),
                        ],
                        looping: true,
                    },
                ),
                EnemySpawn::preset(EnemyPreset::Sentinel, Vec2::new(42.0, 0.75)),
            ],
            triggers: vec![
                TriggerDesc {
                    kind: TriggerKind::AbilityUnlock {
                        ability: Ability::Dash,
                        revoke: false,
                        consume: true,
                    },
                    position: Some(Vec2::new(6.0, 1.0)),
                    size: Vec2::ONE,
                },
                TriggerDesc {
                    kind: TriggerKind::Checkpoint,
                    position: Some(Vec2::new(10.0, 1.0)),
                    size: Vec2::new(1.0, 2.0),
                },
                TriggerDesc {
                    kind: TriggerKind::HealthModifier {
                        damage: 0,
                        heal: 2,
                        max_increase: 1,
                        consume: true,
                    },
                    position: Some(Vec2::new(18.0, 1.0)),
                    size: Vec2::ONE,
                },
                TriggerDesc {
                    kind: TriggerKind::Trap,
                    position: Some(Vec2::new(27.0, 0.25)),
                    size: Vec2::new(2.0, 0.5),
                },
                TriggerDesc {
                    kind: TriggerKind::AbilityUnlock {
                        ability: Ability::PlatformPause,
                        revoke: false,
                        consume: true,
                    },
                    position: Some(Vec2::new(40.0, 1.0)),
                    size: Vec2::ONE,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_valid() {
        let level = LevelDesc::demo();
        assert!(level.validate().is_ok());
        assert!(level.enemies.iter().all(|e| e.resolve().is_some()));
    }

    #[test]
    fn test_demo_survives_json() {
        let level = LevelDesc::demo();
        let text = serde_json::to_string(&level).unwrap();
        assert_eq!(LevelDesc::from_json(&text).unwrap(), level);
    }

    #[test]
    fn test_spawn_config_beats_preset() {
        let spawn = EnemySpawn {
            position: Vec2::ZERO,
            preset: Some(EnemyPreset::Bat),
            config: Some(EnemyConfig::dummy()),
            patrol: None,
        };
        assert_eq!(spawn.resolve().unwrap().name, "dummy");
    }

    #[test]
    fn test_spawn_without_description() {
        let spawn: EnemySpawn = serde_json::from_str(r#"{"position": [1, 1]}"#).unwrap();
        assert!(spawn.resolve().is_none());
    }

    #[test]
    fn test_spawn_below_kill_plane_rejected() {
        let err = LevelDesc::from_json(r#"{"player_spawn": [0, -30]}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidLevel(_)));
    }

    #[test]
    fn test_platform_tuning_rejected() {
        let err = LevelDesc::from_json(
            r#"{"platforms": [{"name": "lift", "waypoints": [[0, 0], [0, 4]], "speed": -2}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidLevel(_)));

        let err = LevelDesc::from_json(
            r#"{"platforms": [{"name": "lift", "waypoints": [[0, 0], [0, 4]], "wait_time": -1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidLevel(_)));
    }
}
