// Gameplay layer
//
// - Player character, enemies, moving platforms and trigger zones
// - Charged melee combat with hit pause and camera shake
// - Health, respawn and save points
// - GameWorld ties them together into a fixed-step simulation

pub mod abilities;
pub mod characters;
pub mod combat;
pub mod config;
pub mod enemies;
pub mod events;
pub mod health;
pub mod level;
pub mod platform;
pub mod respawn;
pub mod triggers;
pub mod world;

/// Identifier shared by every simulated object
pub type EntityId = u32;

/// The player always gets the first id
pub const PLAYER_ID: EntityId = 0;

// Re-export commonly used types
pub use config::GameConfig;
pub use events::GameEvent;
pub use level::LevelDesc;
pub use world::GameWorld;
