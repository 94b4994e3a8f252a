// Game action definitions
//
// Device mapping (keys, mouse buttons, pads) belongs to the host. The
// simulation only ever sees these abstract actions.

use serde::{Deserialize, Serialize};

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,
    Dash,

    /// Melee attack. Tap for a normal attack, hold to charge a heavy one.
    Attack,

    /// Use checkpoints and other interactables
    Interact,

    /// Freeze every moving platform for a while (once unlocked)
    PausePlatforms,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::Interact,
        Action::PausePlatforms,
    ];

    /// Whether presses of this action are kept in the input buffer
    pub fn is_buffered(&self) -> bool {
        matches!(self, Action::Jump | Action::Dash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Attack);
    }

    #[test]
    fn test_all_actions_unique() {
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            assert!(seen.insert(action), "duplicate action {:?}", action);
        }
    }

    #[test]
    fn test_attack_is_not_buffered() {
        // Charging depends on the live press/release edges, not on buffered presses
        assert!(!Action::Attack.is_buffered());
        assert!(Action::Jump.is_buffered());
    }

    #[test]
    fn test_action_serializes_by_name() {
        let json = serde_json::to_string(&Action::PausePlatforms).unwrap();
        assert_eq!(json, "\"PausePlatforms\"");
    }
}
