// Character system
//
// - Player controller: movement, jumping, dashing, health
// - Player tuning values
// - State machine for character behavior

pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use player::Player;
pub use state::{CharacterState, CharacterStateMachine, StateInputs};
pub use stats::PlayerStats;
