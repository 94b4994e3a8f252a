// Events emitted by the simulation for the host to present
//
// Animation triggers, sounds, UI updates, and camera work all hang off
// these; the simulation itself never calls into the host.

use glam::Vec2;
use serde::Serialize;

use super::abilities::Ability;
use super::combat::AttackKind;
use super::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Any change of an entity's health or max health
    HealthChanged {
        entity: EntityId,
        current: i32,
        max: i32,
    },
    PlayerDamaged {
        amount: i32,
        source: Option<EntityId>,
    },
    PlayerDied,
    Respawned {
        position: Vec2,
    },

    Jumped,
    Landed,
    DashStarted {
        direction: f32,
    },

    /// The player started or stopped holding a charge
    ChargingChanged {
        charging: bool,
    },
    /// Attack released, wind-up begins (animation trigger)
    AttackStarted {
        kind: AttackKind,
    },
    /// Wind-up over, the hitbox is live (sound cue)
    AttackExecuted {
        kind: AttackKind,
    },

    EnemyDamaged {
        enemy: EntityId,
        amount: i32,
        remaining: i32,
    },
    EnemyKilled {
        enemy: EntityId,
    },
    /// The enemy's death sequence finished and it left the world
    EnemyRemoved {
        enemy: EntityId,
    },
    EnemyAttacked {
        enemy: EntityId,
    },

    /// Freeze presentation for this many ticks
    HitPause {
        frames: u32,
    },
    CameraShake {
        duration: f32,
        strength: f32,
    },

    /// Show or hide the "interact to save" prompt of a checkpoint
    CheckpointPrompt {
        checkpoint: EntityId,
        visible: bool,
    },
    CheckpointSaved {
        position: Vec2,
    },
    Teleported {
        from: Vec2,
        to: Vec2,
    },
    AbilityUnlocked {
        ability: Ability,
    },
    AbilityRevoked {
        ability: Ability,
    },
    PickupConsumed {
        trigger: EntityId,
    },

    PlatformsPaused,
    PlatformsResumed,
}

impl GameEvent {
    /// Short stable name, handy for logs and replays
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::HealthChanged { .. } => "health_changed",
            GameEvent::PlayerDamaged { .. } => "player_damaged",
            GameEvent::PlayerDied => "player_died",
            GameEvent::Respawned { .. } => "respawned",
            GameEvent::Jumped => "jumped",
            GameEvent::Landed => "landed",
            GameEvent::DashStarted { .. } => "dash_started",
            GameEvent::ChargingChanged { .. } => "charging_changed",
            GameEvent::AttackStarted { .. } => "attack_started",
            GameEvent::AttackExecuted { .. } => "attack_executed",
            GameEvent::EnemyDamaged { .. } => "enemy_damaged",
            GameEvent::EnemyKilled { .. } => "enemy_killed",
            GameEvent::EnemyRemoved { .. } => "enemy_removed",
            GameEvent::EnemyAttacked { .. } => "enemy_attacked",
            GameEvent::HitPause { .. } => "hit_pause",
            GameEvent::CameraShake { .. } => "camera_shake",
            GameEvent::CheckpointPrompt { .. } => "checkpoint_prompt",
            GameEvent::CheckpointSaved { .. } => "checkpoint_saved",
            GameEvent::Teleported { .. } => "teleported",
            GameEvent::AbilityUnlocked { .. } => "ability_unlocked",
            GameEvent::AbilityRevoked { .. } => "ability_revoked",
            GameEvent::PickupConsumed { .. } => "pickup_consumed",
            GameEvent::PlatformsPaused => "platforms_paused",
            GameEvent::PlatformsResumed => "platforms_resumed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(GameEvent::PlayerDied.name(), "player_died");
        assert_eq!(
            GameEvent::AttackStarted {
                kind: AttackKind::Heavy
            }
            .name(),
            "attack_started"
        );
    }

    #[test]
    fn test_event_serializes() {
        let json = serde_json::to_string(&GameEvent::HitPause { frames: 6 }).unwrap();
        assert_eq!(json, r#"{"HitPause":{"frames":6}}"#);
    }
}
