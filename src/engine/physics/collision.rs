use rapier2d::prelude::*;

/// Collision groups for filtering what objects can collide with each other
///
/// Players and enemies pass through each other; melee hits and contact
/// damage are resolved by overlap queries instead of contact response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// The player character
    Player = 0b0000_0001,

    /// Enemy characters
    Enemy = 0b0000_0010,

    /// Static level geometry
    Ground = 0b0000_0100,

    /// Moving platforms
    Platform = 0b0000_1000,

    /// Trigger zones (checkpoints, traps, pickups) - sensors only
    Trigger = 0b0001_0000,
}

impl CollisionGroups {
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self as u32)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let filter = match self {
            CollisionGroups::Player => {
                Self::mask(&[Self::Ground, Self::Platform, Self::Trigger])
            }
            CollisionGroups::Enemy => Self::mask(&[Self::Ground, Self::Platform]),
            CollisionGroups::Ground | CollisionGroups::Platform => {
                Self::mask(&[Self::Player, Self::Enemy])
            }
            CollisionGroups::Trigger => Self::Player.group(),
        };

        InteractionGroups::new(self.group(), filter)
    }

    /// Combine several groups into one bit mask
    pub fn mask(groups: &[CollisionGroups]) -> Group {
        groups
            .iter()
            .fold(Group::NONE, |acc, group| acc | group.group())
    }

    /// Query groups that match any collider belonging to `mask`
    pub fn query(mask: Group) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, mask)
    }

    /// Colliders a character can stand on
    pub fn walkable() -> Group {
        Self::mask(&[Self::Ground, Self::Platform])
    }
}
