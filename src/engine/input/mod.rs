// Input handling system
//
// Device-agnostic: the host translates keys, buttons or replays into
// `Action` presses and releases, the simulation reads them per tick.
//
// - `action`: game actions
// - `buffer`: input buffering so early presses are not lost
// - `player`: per-tick input state with press/release edges
//
// ```rust,ignore
// let mut input = PlayerInput::new();
// input.set_held(&[Action::MoveRight, Action::Attack]);
// let events = world.tick(&mut input);
// input.update();
// ```

pub mod action;
pub mod buffer;
pub mod player;

pub use action::Action;
pub use buffer::InputBuffer;
pub use player::PlayerInput;
