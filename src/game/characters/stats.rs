// Player tuning values
//
// Jump tuning is expressed as designer-facing height and time-to-apex;
// gravity and launch speed are derived from those two.

use serde::{Deserialize, Serialize};

/// Movement, dash and survivability numbers for the player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    // Movement
    /// Horizontal speed on the ground (units/second)
    pub move_speed: f32,
    /// Fraction of ground speed available in the air
    pub air_control: f32,

    // Jumping
    /// Peak height of a full jump (units)
    pub max_jump_height: f32,
    /// Seconds from take-off to the peak
    pub time_to_jump_apex: f32,
    pub jump_cooldown: f32,
    /// Grace period after leaving a ledge during which a jump still counts as grounded
    pub coyote_time: f32,
    /// Upward speed is multiplied by this when the jump ends early
    pub jump_cut_multiplier: f32,
    /// How far below the feet the ground probe reaches
    pub ground_check_distance: f32,

    // Dash
    pub dash_speed: f32,
    pub dash_duration: f32,

    // Survivability
    pub max_health: i32,
    pub invincibility_time: f32,
    /// Seconds of lost control after being hit
    pub hit_stun_time: f32,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

pub const BASE_STATS: PlayerStats = PlayerStats {
    move_speed: 5.0,
    air_control: 0.5,

    max_jump_height: 4.0,
    time_to_jump_apex: 0.4,
    jump_cooldown: 0.1,
    coyote_time: 0.1,
    jump_cut_multiplier: 0.5,
    ground_check_distance: 0.1,

    dash_speed: 20.0,
    dash_duration: 0.2,

    max_health: 5,
    invincibility_time: 1.0,
    hit_stun_time: 0.2,

    width: 1.0,
    height: 2.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl PlayerStats {
    /// Downward acceleration that makes a jump peak at `max_jump_height`
    /// after `time_to_jump_apex`: g = 2h / t^2
    pub fn jump_gravity(&self) -> f32 {
        2.0 * self.max_jump_height / (self.time_to_jump_apex * self.time_to_jump_apex)
    }

    /// Launch speed for a full jump: v = g * t
    pub fn jump_velocity(&self) -> f32 {
        self.jump_gravity() * self.time_to_jump_apex
    }

    /// Body gravity scale that yields `jump_gravity` under the world's gravity
    pub fn gravity_scale(&self, world_gravity: f32) -> f32 {
        if world_gravity.abs() <= f32::EPSILON {
            return 1.0;
        }
        self.jump_gravity() / world_gravity.abs()
    }

    pub fn half_extents(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.time_to_jump_apex <= 0.0 {
            return Err("player.time_to_jump_apex must be positive".into());
        }
        if self.max_jump_height <= 0.0 {
            return Err("player.max_jump_height must be positive".into());
        }
        if self.max_health < 1 {
            return Err("player.max_health must be at least 1".into());
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("player dimensions must be positive".into());
        }
        let positive = [
            ("move_speed", self.move_speed),
            ("dash_speed", self.dash_speed),
            ("dash_duration", self.dash_duration),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(format!("player.{} must be positive", name));
        }
        let non_negative = [
            ("air_control", self.air_control),
            ("jump_cooldown", self.jump_cooldown),
            ("coyote_time", self.coyote_time),
            ("jump_cut_multiplier", self.jump_cut_multiplier),
            ("ground_check_distance", self.ground_check_distance),
            ("invincibility_time", self.invincibility_time),
            ("hit_stun_time", self.hit_stun_time),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(format!("player.{} cannot be negative", name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_stats() {
        let stats = PlayerStats::default();
        assert_eq!(stats.move_speed, 5.0);
        assert_eq!(stats.max_health, 5);
        assert_eq!(stats.dash_speed, 20.0);
    }

    #[test]
    fn test_jump_physics_derivation() {
        let stats = PlayerStats::default();
        // 2 * 4 / 0.16
        assert_relative_eq!(stats.jump_gravity(), 50.0, epsilon = 1e-4);
        assert_relative_eq!(stats.jump_velocity(), 20.0, epsilon = 1e-4);
        assert_relative_eq!(stats.gravity_scale(-10.0), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let stats: PlayerStats = serde_json::from_str(r#"{"move_speed": 7.5}"#).unwrap();
        assert_eq!(stats.move_speed, 7.5);
        assert_eq!(stats.air_control, BASE_STATS.air_control);
    }

    #[test]
    fn test_validate_rejects_zero_apex_time() {
        let stats = PlayerStats {
            time_to_jump_apex: 0.0,
            ..PlayerStats::default()
        };
        assert!(stats.validate().is_err());
        assert!(PlayerStats::default().validate().is_ok());
    }

    #[test]
    fn test_validate_names_the_bad_field() {
        let stats = PlayerStats {
            dash_duration: 0.0,
            ..PlayerStats::default()
        };
        assert_eq!(
            stats.validate().unwrap_err(),
            "player.dash_duration must be positive"
        );

        let stats = PlayerStats {
            coyote_time: -0.1,
            ..PlayerStats::default()
        };
        assert_eq!(
            stats.validate().unwrap_err(),
            "player.coyote_time cannot be negative"
        );
    }
}
