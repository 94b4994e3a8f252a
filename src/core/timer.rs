// Countdown timers used in place of "wait N seconds then..." sequencing

/// A one-shot countdown. Finishes exactly once per `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timer {
    remaining: f32,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer that is already counting down
    pub fn started(seconds: f32) -> Self {
        let mut timer = Self::new();
        timer.start(seconds);
        timer
    }

    /// (Re)start the countdown
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
        self.running = true;
    }

    /// Advance the timer. Returns true on the tick the countdown finishes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.remaining = 0.0;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// A cooldown gate: ready until triggered, then blocked for a duration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Block the gate for `seconds`
    pub fn trigger(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}
