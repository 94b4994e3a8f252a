// Per-tick input state for the player

use super::action::Action;
use super::buffer::InputBuffer;
use std::collections::HashSet;

/// Input state for the player character
///
/// The host calls `press`/`release` (or `set_held`) before a tick and
/// `update` after it. Edges (`just_pressed`/`just_released`) are valid for
/// exactly one tick.
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions currently held
    pressed: HashSet<Action>,

    /// Actions that went down this tick
    just_pressed: HashSet<Action>,

    /// Actions that went up this tick
    just_released: HashSet<Action>,

    /// Actions held during the previous tick
    previous_pressed: HashSet<Action>,

    buffer: InputBuffer,

    /// Keep this tick's edges through the next `update`
    edges_held: bool,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Held for more than one tick
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    pub fn is_buffered(&self, action: Action) -> bool {
        self.buffer.has(action)
    }

    /// Consume a buffered press. Returns true if one was waiting.
    pub fn consume_buffered(&mut self, action: Action) -> bool {
        self.buffer.consume(action)
    }

    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
            if action.is_buffered() {
                self.buffer.push(action);
            }
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Replace the held set, generating press/release edges from the difference
    pub fn set_held(&mut self, held: &[Action]) {
        for action in Action::ALL {
            if held.contains(&action) {
                self.press(action);
            } else {
                self.release(action);
            }
        }
    }

    /// Carry the current edges and buffered presses over the next `update`.
    /// The simulation calls this on ticks it skips, so input that lands on
    /// a frozen tick reaches the first tick that runs.
    pub fn hold_edges(&mut self) {
        self.edges_held = true;
    }

    /// Roll over to the next tick. Call once after every simulation tick.
    pub fn update(&mut self) {
        if std::mem::take(&mut self.edges_held) {
            self.previous_pressed = self.pressed.clone();
            return;
        }
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
        self.buffer.update();
    }

    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
        self.buffer.clear();
        self.edges_held = false;
    }

    /// Horizontal axis in [-1, 1]; opposite directions cancel out
    pub fn horizontal(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            axis += 1.0;
        }
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        input.update();
        input.release(Action::Attack);
        assert!(!input.is_pressed(Action::Attack));
        assert!(input.just_released(Action::Attack));
    }

    #[test]
    fn test_edges_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        assert!(input.is_pressed(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_held_detection() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        assert!(!input.is_held(Action::Attack));
        input.update();
        assert!(input.is_held(Action::Attack));
    }

    #[test]
    fn test_only_buffered_actions_are_buffered() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.press(Action::Attack);
        assert!(input.is_buffered(Action::Jump));
        assert!(!input.is_buffered(Action::Attack));
    }

    #[test]
    fn test_consume_buffered_after_release() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(input.consume_buffered(Action::Jump));
        assert!(!input.is_buffered(Action::Jump));
    }

    #[test]
    fn test_set_held_generates_edges() {
        let mut input = PlayerInput::new();
        input.set_held(&[Action::MoveRight, Action::Attack]);
        assert!(input.just_pressed(Action::Attack));
        input.update();

        input.set_held(&[Action::MoveRight]);
        assert!(input.just_released(Action::Attack));
        assert!(!input.just_pressed(Action::MoveRight));
        assert!(input.is_held(Action::MoveRight));
    }

    #[test]
    fn test_held_edges_survive_one_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Interact);
        input.hold_edges();
        input.update();
        assert!(input.just_pressed(Action::Interact));

        // Holding is one-shot
        input.update();
        assert!(!input.just_pressed(Action::Interact));
        assert!(input.is_held(Action::Interact));
    }

    #[test]
    fn test_held_edges_keep_buffer_fresh() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        for _ in 0..20 {
            input.hold_edges();
            input.update();
        }
        assert!(input.is_buffered(Action::Jump));
    }

    #[test]
    fn test_horizontal_axis() {
        let mut input = PlayerInput::new();
        assert_eq!(input.horizontal(), 0.0);
        input.press(Action::MoveRight);
        assert_eq!(input.horizontal(), 1.0);
        input.press(Action::MoveLeft);
        assert_eq!(input.horizontal(), 0.0);
        input.release(Action::MoveRight);
        assert_eq!(input.horizontal(), -1.0);
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.reset();
        assert!(!input.is_pressed(Action::Jump));
        assert!(!input.is_buffered(Action::Jump));
    }
}
