// Enemy system
//
// - `config`: serde enemy descriptions and the built-in presets
// - `enemy`: AI state machine and the physics-backed enemy entity

pub mod config;
pub mod enemy;

pub use config::{EnemyAttack, EnemyConfig, EnemyPreset, Patrol};
pub use enemy::{Enemy, EnemyBrain, EnemyState, HitOutcome};
