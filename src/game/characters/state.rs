// Character state machine

use crate::game::combat::AttackPosture;

/// Represents the current state of the player character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    Dashing,
    /// Holding the attack button
    Charging,
    /// Attack wind-up or active window
    Attacking,
    /// Taking damage/hit stun
    HitStun,
    Dead,
}

impl CharacterState {
    /// States only reachable while standing. Charging and attacking can
    /// happen in the air, so they say nothing about the ground.
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Idle | Self::Running)
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }

    /// Check if the character can steer horizontally
    pub fn can_move(&self) -> bool {
        !matches!(self, Self::HitStun | Self::Dead | Self::Dashing)
    }

    pub fn can_jump(&self) -> bool {
        !matches!(self, Self::HitStun | Self::Dead | Self::Dashing)
    }

    pub fn can_attack(&self) -> bool {
        !matches!(self, Self::HitStun | Self::Dead)
    }

    /// Check if the character can use abilities
    pub fn can_use_ability(&self) -> bool {
        !matches!(self, Self::HitStun | Self::Dead)
    }

    /// Get the animation name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "run",
            Self::Jumping => "jump",
            Self::Falling => "fall",
            Self::Dashing => "dash",
            Self::Charging => "charge",
            Self::Attacking => "attack",
            Self::HitStun => "hit",
            Self::Dead => "dead",
        }
    }
}

/// Facts the state machine derives its state from each tick
#[derive(Debug, Clone, Copy, Default)]
pub struct StateInputs {
    pub grounded: bool,
    pub velocity_y: f32,
    pub moving: bool,
    pub dashing: bool,
    pub attack: AttackPosture,
}

/// State machine that handles character state transitions
#[derive(Debug)]
pub struct CharacterStateMachine {
    current_state: CharacterState,
    previous_state: CharacterState,
    state_time: f32,
    hit_stun_remaining: f32,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: CharacterState::Idle,
            previous_state: CharacterState::Idle,
            state_time: 0.0,
            hit_stun_remaining: 0.0,
        }
    }

    pub fn state(&self) -> CharacterState {
        self.current_state
    }

    pub fn previous_state(&self) -> CharacterState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Check if state just changed this tick
    pub fn state_just_changed(&self) -> bool {
        self.state_time == 0.0
    }

    pub fn transition(&mut self, new_state: CharacterState) {
        if self.current_state != new_state {
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_time = 0.0;
        }
    }

    /// Update the state machine (called every tick)
    ///
    /// Priority: dead, hit stun, dash, attack, charge, then the movement
    /// states.
    pub fn update(&mut self, dt: f32, inputs: StateInputs) {
        self.state_time += dt;

        if self.current_state == CharacterState::Dead {
            return;
        }

        if self.current_state == CharacterState::HitStun {
            self.hit_stun_remaining -= dt;
            if self.hit_stun_remaining > 0.0 {
                return;
            }
            self.hit_stun_remaining = 0.0;
        }

        let next = if inputs.dashing {
            CharacterState::Dashing
        } else {
            match inputs.attack {
                AttackPosture::Attacking => CharacterState::Attacking,
                AttackPosture::Charging => CharacterState::Charging,
                AttackPosture::None if inputs.grounded => {
                    if inputs.moving {
                        CharacterState::Running
                    } else {
                        CharacterState::Idle
                    }
                }
                AttackPosture::None if inputs.velocity_y > 0.0 => CharacterState::Jumping,
                AttackPosture::None => CharacterState::Falling,
            }
        };
        self.transition(next);
    }

    /// Apply hit stun to the character
    pub fn apply_hit_stun(&mut self, duration: f32) {
        if self.current_state != CharacterState::Dead && duration > 0.0 {
            self.transition(CharacterState::HitStun);
            self.hit_stun_remaining = duration;
        }
    }

    pub fn die(&mut self) {
        self.transition(CharacterState::Dead);
        self.hit_stun_remaining = 0.0;
    }

    /// Respawn the character (airborne until the ground check says otherwise)
    pub fn respawn(&mut self) {
        self.transition(CharacterState::Falling);
        self.hit_stun_remaining = 0.0;
    }
}
