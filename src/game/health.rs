// Health pool and post-hit invincibility

use crate::core::Timer;

/// What a health operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChange {
    pub previous: i32,
    pub current: i32,
    pub max: i32,
}

impl HealthChange {
    /// This change took the entity from alive to dead
    pub fn died(&self) -> bool {
        self.previous > 0 && self.current == 0
    }

    pub fn amount_lost(&self) -> i32 {
        (self.previous - self.current).max(0)
    }
}

/// A health pool. `0 <= current <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Full health pool; `max` is at least 1
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Remove health, saturating at zero. Negative amounts do nothing.
    pub fn take_damage(&mut self, amount: i32) -> HealthChange {
        let previous = self.current;
        self.current = (self.current - amount.max(0)).max(0);
        self.change_from(previous)
    }

    /// Restore health up to max. The dead stay dead until `restore_full`.
    pub fn heal(&mut self, amount: i32) -> HealthChange {
        let previous = self.current;
        if !self.is_dead() {
            self.current = (self.current + amount.max(0)).min(self.max);
        }
        self.change_from(previous)
    }

    /// Change max health; current is clamped so it never exceeds the new max
    pub fn set_max(&mut self, new_max: i32) -> HealthChange {
        let previous = self.current;
        self.max = new_max.max(1);
        self.current = self.current.min(self.max);
        self.change_from(previous)
    }

    pub fn restore_full(&mut self) -> HealthChange {
        let previous = self.current;
        self.current = self.max;
        self.change_from(previous)
    }

    fn change_from(&self, previous: i32) -> HealthChange {
        HealthChange {
            previous,
            current: self.current,
            max: self.max,
        }
    }
}

/// Grace period after taking damage during which further damage is ignored
#[derive(Debug, Clone, Copy)]
pub struct Invincibility {
    duration: f32,
    timer: Timer,
}

impl Invincibility {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            timer: Timer::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self) {
        if self.duration > 0.0 {
            self.timer.start(self.duration);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer.tick(dt);
    }

    pub fn clear(&mut self) {
        self.timer.cancel();
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_health_is_full() {
        let health = Health::new(5);
        assert_eq!(health.current(), 5);
        assert!(health.is_full());
        assert_eq!(Health::new(0).max(), 1);
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut health = Health::new(5);
        let change = health.take_damage(12);
        assert_eq!(health.current(), 0);
        assert!(change.died());
        assert_eq!(change.amount_lost(), 5);

        // Hitting a corpse does not "die" again
        let change = health.take_damage(1);
        assert!(!change.died());
    }

    #[test]
    fn test_negative_damage_ignored() {
        let mut health = Health::new(5);
        health.take_damage(-3);
        assert_eq!(health.current(), 5);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut health = Health::new(5);
        health.take_damage(3);
        health.heal(10);
        assert_eq!(health.current(), 5);
    }

    #[test]
    fn test_heal_does_not_revive() {
        let mut health = Health::new(2);
        health.take_damage(2);
        health.heal(1);
        assert!(health.is_dead());
        health.restore_full();
        assert_eq!(health.current(), 2);
    }

    #[test]
    fn test_set_max_clamps_current() {
        let mut health = Health::new(5);
        health.set_max(3);
        assert_eq!(health.current(), 3);
        assert_eq!(health.max(), 3);

        // Raising max does not heal
        health.set_max(8);
        assert_eq!(health.current(), 3);
        assert_eq!(health.max(), 8);
    }

    #[test]
    fn test_invariant_holds_under_mixed_operations() {
        let mut health = Health::new(10);
        let ops: [(u8, i32); 8] = [(0, 4), (1, 20), (2, 3), (0, 1), (2, 12), (1, 5), (0, 50), (1, 1)];
        for (op, amount) in ops {
            match op {
                0 => health.take_damage(amount),
                1 => health.heal(amount),
                _ => health.set_max(amount),
            };
            assert!(health.current() >= 0 && health.current() <= health.max());
        }
    }

    #[test]
    fn test_invincibility_window() {
        let mut inv = Invincibility::new(1.0);
        assert!(!inv.is_active());
        inv.start();
        assert!(inv.is_active());
        inv.tick(0.6);
        assert!(inv.is_active());
        inv.tick(0.6);
        assert!(!inv.is_active());
    }

    #[test]
    fn test_zero_invincibility_never_activates() {
        let mut inv = Invincibility::new(0.0);
        inv.start();
        assert!(!inv.is_active());
    }
}
