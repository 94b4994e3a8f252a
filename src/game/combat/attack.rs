// Charged melee attack
//
// Press starts a charge, release launches it. A charge held for at least
// `heavy_charge_time` becomes a heavy attack. Every attack then goes
// through a wind-up before its hitbox is live for `duration` seconds.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::Cooldown;
use crate::game::EntityId;

/// Slack on the heavy threshold so a hold of exactly `heavy_charge_time`
/// worth of ticks counts despite f32 accumulation error
const CHARGE_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Normal,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub normal_damage: i32,
    pub normal_cooldown: f32,
    /// Seconds between release and the hitbox going live
    pub normal_delay: f32,
    /// Seconds the hitbox stays live
    pub normal_duration: f32,

    pub heavy_damage: i32,
    pub heavy_cooldown: f32,
    /// Hold time needed for a heavy attack
    pub heavy_charge_time: f32,
    pub heavy_delay: f32,
    pub heavy_duration: f32,

    /// Knockback speed applied by heavy hits
    pub knockback_force: f32,

    /// Hitbox size, centred `hitbox_offset` units in front of the player
    pub hitbox_half_extents: Vec2,
    pub hitbox_offset: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            normal_damage: 20,
            normal_cooldown: 0.5,
            normal_delay: 0.2,
            normal_duration: 0.2,
            heavy_damage: 40,
            heavy_cooldown: 1.0,
            heavy_charge_time: 0.5,
            heavy_delay: 0.5,
            heavy_duration: 0.3,
            knockback_force: 10.0,
            hitbox_half_extents: Vec2::new(0.75, 0.5),
            hitbox_offset: 0.9,
        }
    }
}

impl AttackConfig {
    pub fn damage(&self, kind: AttackKind) -> i32 {
        match kind {
            AttackKind::Normal => self.normal_damage,
            AttackKind::Heavy => self.heavy_damage,
        }
    }

    pub fn cooldown(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Normal => self.normal_cooldown,
            AttackKind::Heavy => self.heavy_cooldown,
        }
    }

    pub fn delay(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Normal => self.normal_delay,
            AttackKind::Heavy => self.heavy_delay,
        }
    }

    pub fn duration(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Normal => self.normal_duration,
            AttackKind::Heavy => self.heavy_duration,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.normal_damage < 0 || self.heavy_damage < 0 {
            return Err("attack damage cannot be negative".into());
        }
        if self.heavy_charge_time <= 0.0 {
            return Err("attack.heavy_charge_time must be positive".into());
        }
        let spans = [
            ("normal_cooldown", self.normal_cooldown),
            ("normal_duration", self.normal_duration),
            ("heavy_cooldown", self.heavy_cooldown),
            ("heavy_duration", self.heavy_duration),
        ];
        if let Some((name, _)) = spans.iter().find(|(_, t)| *t <= 0.0) {
            return Err(format!("attack.{} must be positive", name));
        }
        // A zero wind-up is allowed: the hitbox goes live on release
        if self.normal_delay < 0.0 || self.heavy_delay < 0.0 {
            return Err("attack delays cannot be negative".into());
        }
        if self.knockback_force < 0.0 {
            return Err("attack.knockback_force cannot be negative".into());
        }
        if self.hitbox_half_extents.min_element() <= 0.0 {
            return Err("attack hitbox must have a positive size".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPhase {
    Ready,
    Charging { held: f32 },
    Windup { kind: AttackKind, remaining: f32 },
    Active { kind: AttackKind, remaining: f32 },
}

/// Coarse view of the attack phase for the character state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackPosture {
    #[default]
    None,
    Charging,
    Attacking,
}

/// Button edges for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackButton {
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSignal {
    ChargingChanged(bool),
    Started(AttackKind),
    Executed(AttackKind),
    Finished(AttackKind),
}

#[derive(Debug)]
pub struct ChargedAttack {
    config: AttackConfig,
    phase: AttackPhase,
    cooldown: Cooldown,
    /// Targets already struck by the current activation
    struck: HashSet<EntityId>,
}

impl ChargedAttack {
    pub fn new(config: AttackConfig) -> Self {
        Self {
            config,
            phase: AttackPhase::Ready,
            cooldown: Cooldown::new(),
            struck: HashSet::new(),
        }
    }

    pub fn config(&self) -> &AttackConfig {
        &self.config
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn posture(&self) -> AttackPosture {
        match self.phase {
            AttackPhase::Ready => AttackPosture::None,
            AttackPhase::Charging { .. } => AttackPosture::Charging,
            AttackPhase::Windup { .. } | AttackPhase::Active { .. } => AttackPosture::Attacking,
        }
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.phase, AttackPhase::Charging { .. })
    }

    /// Charge progress in [0, 1]; 1 means a release now is a heavy attack
    pub fn charge_progress(&self) -> f32 {
        match self.phase {
            AttackPhase::Charging { held } => {
                if held >= self.config.heavy_charge_time - CHARGE_TOLERANCE {
                    1.0
                } else {
                    (held / self.config.heavy_charge_time).clamp(0.0, 1.0)
                }
            }
            _ => 0.0,
        }
    }

    /// The attack whose hitbox is live this tick
    pub fn active_kind(&self) -> Option<AttackKind> {
        match self.phase {
            AttackPhase::Active { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    pub fn update(&mut self, button: AttackButton, dt: f32) -> Vec<AttackSignal> {
        self.cooldown.tick(dt);
        let mut signals = Vec::new();

        match self.phase {
            AttackPhase::Ready => {
                if button.pressed && self.cooldown.ready() {
                    self.phase = AttackPhase::Charging { held: 0.0 };
                    signals.push(AttackSignal::ChargingChanged(true));
                }
            }
            AttackPhase::Charging { held } => {
                if button.released || !button.held {
                    let progress = self.charge_progress();
                    let kind = if progress >= 1.0 {
                        AttackKind::Heavy
                    } else {
                        AttackKind::Normal
                    };
                    signals.push(AttackSignal::ChargingChanged(false));
                    signals.push(AttackSignal::Started(kind));
                    self.begin_windup(kind, &mut signals);
                } else {
                    self.phase = AttackPhase::Charging { held: held + dt };
                }
            }
            AttackPhase::Windup { kind, remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.execute(kind, &mut signals);
                } else {
                    self.phase = AttackPhase::Windup { kind, remaining };
                }
            }
            AttackPhase::Active { kind, remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = AttackPhase::Ready;
                    self.struck.clear();
                    signals.push(AttackSignal::Finished(kind));
                } else {
                    self.phase = AttackPhase::Active { kind, remaining };
                }
            }
        }

        signals
    }

    /// Abort whatever is in progress. The cooldown keeps running.
    pub fn cancel(&mut self) -> Vec<AttackSignal> {
        let mut signals = Vec::new();
        if self.is_charging() {
            signals.push(AttackSignal::ChargingChanged(false));
        }
        self.phase = AttackPhase::Ready;
        self.struck.clear();
        signals
    }

    /// Record a hit on `target`. Returns false if it was already struck by
    /// this activation.
    pub fn register_hit(&mut self, target: EntityId) -> bool {
        self.active_kind().is_some() && self.struck.insert(target)
    }

    /// Hitbox center and half extents for an attacker at `origin` facing `facing`
    pub fn hitbox(&self, origin: Vec2, facing: f32) -> (Vec2, Vec2) {
        let direction = if facing < 0.0 { -1.0 } else { 1.0 };
        let center = origin + Vec2::new(direction * self.config.hitbox_offset, 0.0);
        (center, self.config.hitbox_half_extents)
    }

    fn begin_windup(&mut self, kind: AttackKind, signals: &mut Vec<AttackSignal>) {
        let delay = self.config.delay(kind);
        if delay <= 0.0 {
            self.execute(kind, signals);
        } else {
            self.phase = AttackPhase::Windup {
                kind,
                remaining: delay,
            };
        }
    }

    fn execute(&mut self, kind: AttackKind, signals: &mut Vec<AttackSignal>) {
        self.cooldown.trigger(self.config.cooldown(kind));
        self.struck.clear();
        self.phase = AttackPhase::Active {
            kind,
            remaining: self.config.duration(kind),
        };
        signals.push(AttackSignal::Executed(kind));
    }
}
