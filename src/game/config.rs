// Game configuration loaded from JSON
//
// Every field has a default, so a config file only needs the values it
// changes. Unknown fields are rejected to catch typos.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{GameError, Result};
use crate::game::abilities::PlatformPauseConfig;
use crate::game::characters::PlayerStats;
use crate::game::combat::{AttackConfig, FeedbackConfig};
use crate::game::respawn::RespawnConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Downward world gravity (units/s^2). The player overrides it through
    /// its jump tuning.
    pub gravity: f32,
    pub player: PlayerStats,
    pub attack: AttackConfig,
    pub feedback: FeedbackConfig,
    pub respawn: RespawnConfig,
    pub platform_pause: PlatformPauseConfig,
    /// Seed for presentation randomness (camera shake)
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            player: PlayerStats::default(),
            attack: AttackConfig::default(),
            feedback: FeedbackConfig::default(),
            respawn: RespawnConfig::default(),
            platform_pause: PlatformPauseConfig::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gravity <= 0.0 {
            return Err(GameError::InvalidConfig("gravity must be positive".into()));
        }
        self.player.validate().map_err(GameError::InvalidConfig)?;
        self.attack.validate().map_err(GameError::InvalidConfig)?;
        if self.respawn.delay < 0.0 {
            return Err(GameError::InvalidConfig(
                "respawn.delay cannot be negative".into(),
            ));
        }
        if self.platform_pause.duration <= 0.0 {
            return Err(GameError::InvalidConfig(
                "platform_pause.duration must be positive".into(),
            ));
        }
        if self.feedback.shake_time < 0.0 {
            return Err(GameError::InvalidConfig(
                "feedback.shake_time cannot be negative".into(),
            ));
        }
        if self.feedback.normal_shake_strength < 0.0 || self.feedback.heavy_shake_strength < 0.0 {
            return Err(GameError::InvalidConfig(
                "feedback shake strengths cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_nested_overrides() {
        let config = GameConfig::from_json(
            r#"{"player": {"max_health": 8}, "attack": {"heavy_damage": 55}, "respawn": {"delay": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.player.max_health, 8);
        assert_eq!(config.player.move_speed, 5.0);
        assert_eq!(config.attack.heavy_damage, 55);
        assert_eq!(config.respawn.delay, 0.5);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GameConfig::from_json(r#"{"gravty": 3.0}"#).unwrap_err();
        assert!(matches!(err, GameError::Json(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_json(r#"{"gravity": -1.0}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        let err = GameConfig::from_json(r#"{"platform_pause": {"duration": 0}}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_positive_speeds_and_durations_rejected() {
        let broken = [
            r#"{"player": {"move_speed": 0}}"#,
            r#"{"player": {"dash_speed": -20}}"#,
            r#"{"player": {"dash_duration": 0}}"#,
            r#"{"player": {"invincibility_time": -1}}"#,
            r#"{"player": {"jump_cooldown": -0.1}}"#,
            r#"{"player": {"coyote_time": -0.1}}"#,
            r#"{"attack": {"normal_cooldown": 0}}"#,
            r#"{"attack": {"heavy_duration": 0}}"#,
            r#"{"attack": {"heavy_delay": -0.5}}"#,
            r#"{"feedback": {"heavy_shake_strength": -0.1}}"#,
            r#"{"feedback": {"normal_shake_strength": -0.05}}"#,
        ];
        for text in broken {
            let err = GameConfig::from_json(text).unwrap_err();
            assert!(matches!(err, GameError::InvalidConfig(_)), "{}", text);
        }
        // Zero invincibility and zero wind-up are legal tunings
        assert!(GameConfig::from_json(r#"{"player": {"invincibility_time": 0}}"#).is_ok());
        assert!(GameConfig::from_json(r#"{"attack": {"normal_delay": 0}}"#).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }
}
