// Unlockable abilities: dash and platform pause

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{Cooldown, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Dash,
    /// Freeze every moving platform for a while
    PlatformPause,
}

/// Abilities the player currently has
#[derive(Debug, Clone, Default)]
pub struct Abilities {
    unlocked: HashSet<Ability>,
}

impl Abilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, ability: Ability) -> bool {
        self.unlocked.contains(&ability)
    }

    /// Returns true if the ability was not already unlocked
    pub fn unlock(&mut self, ability: Ability) -> bool {
        self.unlocked.insert(ability)
    }

    /// Returns true if the ability had been unlocked
    pub fn revoke(&mut self, ability: Ability) -> bool {
        self.unlocked.remove(&ability)
    }
}

/// A burst of horizontal speed that ignores gravity while it lasts
#[derive(Debug, Clone, Copy)]
pub struct Dash {
    speed: f32,
    duration: f32,
    direction: f32,
    timer: Timer,
}

impl Dash {
    pub fn new(speed: f32, duration: f32) -> Self {
        Self {
            speed,
            duration,
            direction: 1.0,
            timer: Timer::new(),
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.timer.is_running()
    }

    /// Start a dash towards `direction` (sign only). Fails if one is running.
    pub fn start(&mut self, direction: f32) -> bool {
        if self.is_dashing() || self.duration <= 0.0 {
            return false;
        }
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self.timer.start(self.duration);
        true
    }

    /// Velocity to hold this tick, or None when not dashing
    pub fn tick(&mut self, dt: f32) -> Option<Vec2> {
        if !self.is_dashing() {
            return None;
        }
        let velocity = Vec2::new(self.direction * self.speed, 0.0);
        self.timer.tick(dt);
        Some(velocity)
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformPauseConfig {
    /// Seconds platforms stay frozen; the cooldown afterwards lasts as long
    pub duration: f32,
}

impl Default for PlatformPauseConfig {
    fn default() -> Self {
        Self { duration: 5.0 }
    }
}

/// Timing for the platform pause ability
#[derive(Debug, Clone, Copy)]
pub struct PlatformPause {
    duration: f32,
    active: Timer,
    cooldown: Cooldown,
}

impl PlatformPause {
    pub fn new(config: &PlatformPauseConfig) -> Self {
        Self {
            duration: config.duration,
            active: Timer::new(),
            cooldown: Cooldown::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_running()
    }

    pub fn can_activate(&self) -> bool {
        !self.is_active() && self.cooldown.ready()
    }

    pub fn try_activate(&mut self) -> bool {
        if !self.can_activate() {
            return false;
        }
        self.active.start(self.duration);
        true
    }

    /// Advance timers. Returns true on the tick the platforms resume.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.cooldown.tick(dt);
        if self.active.tick(dt) {
            self.cooldown.trigger(self.duration);
            return true;
        }
        false
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_and_revoke() {
        let mut abilities = Abilities::new();
        assert!(!abilities.has(Ability::Dash));
        assert!(abilities.unlock(Ability::Dash));
        assert!(!abilities.unlock(Ability::Dash));
        assert!(abilities.has(Ability::Dash));
        assert!(abilities.revoke(Ability::Dash));
        assert!(!abilities.has(Ability::Dash));
    }

    #[test]
    fn test_dash_lasts_its_duration() {
        let mut dash = Dash::new(20.0, 0.2);
        assert!(dash.start(-1.0));
        assert!(!dash.start(1.0));
        assert_eq!(dash.tick(0.1), Some(Vec2::new(-20.0, 0.0)));
        assert!(dash.tick(0.15).is_some());
        assert!(!dash.is_dashing());
        assert_eq!(dash.tick(0.1), None);
    }

    #[test]
    fn test_platform_pause_cycle() {
        let mut pause = PlatformPause::new(&PlatformPauseConfig { duration: 1.0 });
        assert!(pause.try_activate());
        assert!(!pause.try_activate());

        assert!(!pause.tick(0.6));
        assert!(pause.tick(0.6));
        assert!(!pause.is_active());

        // Cooldown equal to the pause duration
        assert!(!pause.try_activate());
        pause.tick(0.5);
        assert!(!pause.can_activate());
        pause.tick(0.6);
        assert!(pause.try_activate());
    }
}
