// Input buffering so early presses are not lost

use super::action::Action;
use std::collections::VecDeque;

/// Default lifetime of a buffered press (in ticks, ~0.1 s at 60 Hz)
pub const BUFFER_DURATION: u32 = 6;

/// A press waiting to be consumed
#[derive(Debug, Clone, Copy)]
pub struct BufferedInput {
    pub action: Action,
    pub ticks_remaining: u32,
}

/// Press buffer for a single player
///
/// A jump pressed a few ticks before landing should still jump, so presses
/// stay available here until consumed or expired.
#[derive(Debug)]
pub struct InputBuffer {
    entries: VecDeque<BufferedInput>,
    duration: u32,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::with_duration(BUFFER_DURATION)
    }

    /// Buffer whose entries live for `ticks` updates
    pub fn with_duration(ticks: u32) -> Self {
        Self {
            entries: VecDeque::with_capacity(Action::ALL.len()),
            duration: ticks.max(1),
        }
    }

    /// Record a press. Pressing again refreshes the entry's lifetime.
    pub fn push(&mut self, action: Action) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.action == action) {
            entry.ticks_remaining = self.duration;
            return;
        }
        self.entries.push_back(BufferedInput {
            action,
            ticks_remaining: self.duration,
        });
    }

    pub fn has(&self, action: Action) -> bool {
        self.entries.iter().any(|e| e.action == action)
    }

    /// Consume a buffered press. Returns true if one was waiting.
    pub fn consume(&mut self, action: Action) -> bool {
        match self.entries.iter().position(|e| e.action == action) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Age every entry by one tick and drop the expired ones
    pub fn update(&mut self) {
        for entry in &mut self.entries {
            entry.ticks_remaining = entry.ticks_remaining.saturating_sub(1);
        }
        self.entries.retain(|e| e.ticks_remaining > 0);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_push_and_has() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        assert!(buffer.has(Action::Jump));
        assert!(!buffer.has(Action::Dash));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_buffer_no_duplicates() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        buffer.push(Action::Jump);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_buffer_consume() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        assert!(buffer.consume(Action::Jump));
        assert!(!buffer.consume(Action::Jump));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_expires_after_duration() {
        let mut buffer = InputBuffer::with_duration(3);
        buffer.push(Action::Jump);
        buffer.update();
        buffer.update();
        assert!(buffer.has(Action::Jump));
        buffer.update();
        assert!(buffer.is_empty(), "expired presses must be dropped");
    }

    #[test]
    fn test_repress_refreshes_lifetime() {
        let mut buffer = InputBuffer::with_duration(2);
        buffer.push(Action::Dash);
        buffer.update();
        buffer.push(Action::Dash);
        buffer.update();
        assert!(buffer.has(Action::Dash));
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        buffer.push(Action::Dash);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
