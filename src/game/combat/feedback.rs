// Hit feedback: hit pause and camera shake
//
// Hit pause freezes simulation ticks. Shake keeps decaying while the
// simulation is frozen so the camera still moves during the freeze.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::attack::AttackKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub shake_time: f32,
    pub normal_hit_pause_frames: u32,
    pub normal_shake_strength: f32,
    pub heavy_hit_pause_frames: u32,
    pub heavy_shake_strength: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            shake_time: 0.1,
            normal_hit_pause_frames: 3,
            normal_shake_strength: 0.05,
            heavy_hit_pause_frames: 6,
            heavy_shake_strength: 0.1,
        }
    }
}

impl FeedbackConfig {
    pub fn hit_pause_frames(&self, kind: AttackKind) -> u32 {
        match kind {
            AttackKind::Normal => self.normal_hit_pause_frames,
            AttackKind::Heavy => self.heavy_hit_pause_frames,
        }
    }

    pub fn shake_strength(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Normal => self.normal_shake_strength,
            AttackKind::Heavy => self.heavy_shake_strength,
        }
    }
}

#[derive(Debug, Default)]
pub struct Feedback {
    hit_pause_frames: u32,
    shake_remaining: f32,
    shake_strength: f32,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlapping requests do not stack; the longest one wins
    pub fn request_hit_pause(&mut self, frames: u32) {
        self.hit_pause_frames = self.hit_pause_frames.max(frames);
    }

    pub fn request_shake(&mut self, duration: f32, strength: f32) {
        if self.is_shaking() {
            self.shake_remaining = self.shake_remaining.max(duration);
            self.shake_strength = self.shake_strength.max(strength);
        } else {
            self.shake_remaining = duration;
            self.shake_strength = strength;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.hit_pause_frames > 0
    }

    pub fn hit_pause_frames(&self) -> u32 {
        self.hit_pause_frames
    }

    /// Use up one frozen tick. Returns true if this tick should be skipped.
    pub fn consume_frozen_tick(&mut self) -> bool {
        if self.hit_pause_frames > 0 {
            self.hit_pause_frames -= 1;
            true
        } else {
            false
        }
    }

    pub fn tick_shake(&mut self, dt: f32) {
        if self.shake_remaining > 0.0 {
            self.shake_remaining = (self.shake_remaining - dt).max(0.0);
            if self.shake_remaining == 0.0 {
                self.shake_strength = 0.0;
            }
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_remaining > 0.0
    }

    pub fn shake_strength(&self) -> f32 {
        self.shake_strength
    }

    /// Random camera offset for this frame, inside a disk of the shake strength
    pub fn shake_offset<R: Rng>(&self, rng: &mut R) -> Vec2 {
        if !self.is_shaking() {
            return Vec2::ZERO;
        }
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = rng.gen_range(0.0..=1.0f32).sqrt() * self.shake_strength;
        Vec2::new(angle.cos(), angle.sin()) * radius
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
