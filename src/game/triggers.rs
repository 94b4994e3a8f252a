// Trigger zones: checkpoints, health pickups, traps, ability unlocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::abilities::Ability;
use crate::game::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKind {
    /// Interact while inside to save this spot as the respawn point
    Checkpoint,
    /// Applied on enter: max increase, then damage, then heal. Zero means off.
    HealthModifier {
        #[serde(default)]
        damage: i32,
        #[serde(default)]
        heal: i32,
        #[serde(default)]
        max_increase: i32,
        #[serde(default)]
        consume: bool,
    },
    /// Sends the player back to the last safe ground
    Trap,
    /// Grants (or with `revoke`, takes away) an ability on enter
    AbilityUnlock {
        ability: Ability,
        #[serde(default)]
        revoke: bool,
        #[serde(default = "default_consume")]
        consume: bool,
    },
}

fn default_consume() -> bool {
    true
}

impl TriggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerKind::Checkpoint => "checkpoint",
            TriggerKind::HealthModifier { .. } => "health modifier",
            TriggerKind::Trap => "trap",
            TriggerKind::AbilityUnlock { .. } => "ability unlock",
        }
    }

    /// Removed from the level after firing once
    pub fn is_consumable(&self) -> bool {
        match self {
            TriggerKind::HealthModifier { consume, .. }
            | TriggerKind::AbilityUnlock { consume, .. } => *consume,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDesc {
    #[serde(flatten)]
    pub kind: TriggerKind,
    /// Missing position makes the trigger unusable; it is skipped with a warning
    pub position: Option<Vec2>,
    #[serde(default = "default_size")]
    pub size: Vec2,
}

fn default_size() -> Vec2 {
    Vec2::ONE
}

/// How the player's overlap with a trigger changed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Entered,
    Inside,
    Exited,
    Outside,
}

impl Contact {
    pub fn is_inside(self) -> bool {
        matches!(self, Contact::Entered | Contact::Inside)
    }
}

#[derive(Debug)]
pub struct Trigger {
    pub id: EntityId,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    pub kind: TriggerKind,
    pub position: Vec2,
    pub size: Vec2,
    player_inside: bool,
    consumed: bool,
}

impl Trigger {
    pub fn spawn(
        id: EntityId,
        kind: TriggerKind,
        position: Vec2,
        size: Vec2,
        physics: &mut PhysicsWorld,
    ) -> Self {
        let body = presets::trigger_body(position.x, position.y);
        let collider = presets::trigger_collider(size.x, size.y);
        let (body_handle, collider_handle) = physics.spawn(body, collider, id);
        Self {
            id,
            body_handle,
            collider_handle,
            kind,
            position,
            size,
            player_inside: false,
            consumed: false,
        }
    }

    /// Record whether the player overlaps this tick and report the edge
    pub fn observe(&mut self, inside: bool) -> Contact {
        let was_inside = self.player_inside;
        self.player_inside = inside;
        match (was_inside, inside) {
            (false, true) => Contact::Entered,
            (true, true) => Contact::Inside,
            (true, false) => Contact::Exited,
            (false, false) => Contact::Outside,
        }
    }

    pub fn player_inside(&self) -> bool {
        self.player_inside
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_fires_once() {
        let mut physics = PhysicsWorld::new();
        let mut trigger = Trigger::spawn(1, TriggerKind::Trap, Vec2::ZERO, Vec2::ONE, &mut physics);
        assert_eq!(trigger.observe(false), Contact::Outside);
        assert_eq!(trigger.observe(true), Contact::Entered);
        assert_eq!(trigger.observe(true), Contact::Inside);
        assert_eq!(trigger.observe(false), Contact::Exited);
        assert_eq!(trigger.observe(true), Contact::Entered);
    }

    #[test]
    fn test_consumable_kinds() {
        assert!(!TriggerKind::Checkpoint.is_consumable());
        assert!(TriggerKind::AbilityUnlock {
            ability: Ability::Dash,
            revoke: false,
            consume: true
        }
        .is_consumable());
    }

    #[test]
    fn test_desc_from_json() {
        let desc: TriggerDesc = serde_json::from_str(
            r#"{"type": "health_modifier", "heal": 2, "consume": true, "position": [3, 1]}"#,
        )
        .unwrap();
        assert_eq!(
            desc.kind,
            TriggerKind::HealthModifier {
                damage: 0,
                heal: 2,
                max_increase: 0,
                consume: true
            }
        );
        assert_eq!(desc.position, Some(Vec2::new(3.0, 1.0)));
        assert_eq!(desc.size, Vec2::ONE);
    }

    #[test]
    fn test_ability_unlock_consumed_by_default() {
        let desc: TriggerDesc =
            serde_json::from_str(r#"{"type": "ability_unlock", "ability": "dash", "position": [0, 0]}"#)
                .unwrap();
        assert!(desc.kind.is_consumable());
    }

    #[test]
    fn test_missing_position_parses() {
        let desc: TriggerDesc = serde_json::from_str(r#"{"type": "checkpoint"}"#).unwrap();
        assert!(desc.position.is_none());
    }
}
