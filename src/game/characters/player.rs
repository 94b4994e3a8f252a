// Player character: movement controller, health, and attack ownership

use glam::Vec2;

use crate::core::Cooldown;
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{
    presets, ColliderHandle, CollisionGroups, PhysicsWorld, QueryFilter, RigidBodyHandle,
};
use crate::game::abilities::{Abilities, Ability, Dash};
use crate::game::combat::{AttackButton, AttackConfig, AttackSignal, ChargedAttack};
use crate::game::events::GameEvent;
use crate::game::health::{Health, HealthChange, Invincibility};
use crate::game::EntityId;

use super::state::{CharacterState, CharacterStateMachine, StateInputs};
use super::stats::PlayerStats;

/// The player-controlled character
#[derive(Debug)]
pub struct Player {
    pub id: EntityId,

    // Physics
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,

    stats: PlayerStats,
    state_machine: CharacterStateMachine,
    health: Health,
    invincibility: Invincibility,
    attack: ChargedAttack,
    dash: Dash,
    abilities: Abilities,

    /// 1 = right, -1 = left
    facing: f32,
    grounded: bool,
    /// Entity the ground probe last hit, if any
    ground_entity: Option<EntityId>,
    /// Seconds left in which a jump still counts as grounded
    grounded_remember: f32,
    jump_cooldown: Cooldown,
    jumping: bool,
    jump_start_y: f32,
    movement_enabled: bool,
}

impl Player {
    /// Create the player and add it to the physics world
    pub fn new(
        id: EntityId,
        stats: PlayerStats,
        attack: AttackConfig,
        physics: &mut PhysicsWorld,
        spawn: Vec2,
    ) -> Self {
        let gravity_scale = stats.gravity_scale(physics.gravity().y);
        let body = presets::player_body(spawn.x, spawn.y, gravity_scale);
        let collider = presets::player_collider(stats.width, stats.height);
        let (body_handle, collider_handle) = physics.spawn(body, collider, id);

        Self {
            id,
            body_handle,
            collider_handle,
            state_machine: CharacterStateMachine::new(),
            health: Health::new(stats.max_health),
            invincibility: Invincibility::new(stats.invincibility_time),
            attack: ChargedAttack::new(attack),
            dash: Dash::new(stats.dash_speed, stats.dash_duration),
            abilities: Abilities::new(),
            facing: 1.0,
            grounded: false,
            ground_entity: None,
            grounded_remember: 0.0,
            jump_cooldown: Cooldown::new(),
            jumping: false,
            jump_start_y: spawn.y,
            movement_enabled: true,
            stats,
        }
    }

    /// Ray-probe below the feet for walkable ground.
    pub fn probe_ground(&mut self, physics: &PhysicsWorld, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let (Some(position), Some(velocity)) = (
            physics.position(self.body_handle),
            physics.velocity(self.body_handle),
        ) else {
            return events;
        };

        let filter = QueryFilter::default()
            .groups(CollisionGroups::query(CollisionGroups::walkable()))
            .exclude_rigid_body(self.body_handle);
        let reach = self.stats.height / 2.0 + self.stats.ground_check_distance;
        let hit = physics.raycast(position, Vec2::NEG_Y, reach, filter);

        let was_grounded = self.grounded;
        // Right after take-off the ray still reaches the floor
        let rising_from_jump = self.jumping && velocity.y > 0.0;
        self.grounded = hit.is_some() && !rising_from_jump;
        self.ground_entity = if self.grounded {
            hit.and_then(|h| h.entity)
        } else {
            None
        };

        if self.grounded {
            self.grounded_remember = self.stats.coyote_time;
        } else {
            self.grounded_remember = (self.grounded_remember - dt).max(0.0);
        }

        if self.grounded && !was_grounded && self.is_alive() {
            log::debug!("player landed at {:.2}, {:.2}", position.x, position.y);
            events.push(GameEvent::Landed);
        }
        events
    }

    /// Apply horizontal movement, jumping and dashing for this tick.
    /// `carry` is the velocity of the platform being stood on.
    pub fn update_movement(
        &mut self,
        input: &mut PlayerInput,
        physics: &mut PhysicsWorld,
        carry: Vec2,
        dt: f32,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.jump_cooldown.tick(dt);

        let (Some(position), Some(mut velocity)) = (
            physics.position(self.body_handle),
            physics.velocity(self.body_handle),
        ) else {
            return events;
        };

        let state = self.state_machine.state();
        if state == CharacterState::Dead {
            velocity.x = 0.0;
            physics.set_velocity(self.body_handle, velocity);
            return events;
        }
        if !self.movement_enabled {
            velocity.x = carry.x;
            physics.set_velocity(self.body_handle, velocity);
            return events;
        }

        let horizontal = input.horizontal();
        if state.can_move() && horizontal != 0.0 {
            self.facing = horizontal.signum();
        }

        // Dash
        if !self.dash.is_dashing()
            && self.abilities.has(Ability::Dash)
            && state.can_use_ability()
            && input.consume_buffered(Action::Dash)
        {
            let direction = if horizontal != 0.0 {
                horizontal
            } else {
                self.facing
            };
            if self.dash.start(direction) {
                self.facing = direction.signum();
                self.jumping = false;
                events.push(GameEvent::DashStarted {
                    direction: self.facing,
                });
            }
        }
        if let Some(dash_velocity) = self.dash.tick(dt) {
            physics.set_velocity(self.body_handle, dash_velocity + carry);
            return events;
        }

        // Jump
        if state.can_jump()
            && self.jump_cooldown.ready()
            && self.grounded_remember > 0.0
            && input.consume_buffered(Action::Jump)
        {
            velocity.y = self.stats.jump_velocity();
            self.jumping = true;
            self.jump_start_y = position.y;
            self.grounded_remember = 0.0;
            self.grounded = false;
            self.ground_entity = None;
            self.jump_cooldown.trigger(self.stats.jump_cooldown);
            events.push(GameEvent::Jumped);
        }

        // End the jump at the height goal or once it stops rising
        if self.jumping
            && (position.y - self.jump_start_y >= self.stats.max_jump_height || velocity.y <= 0.0)
        {
            self.jumping = false;
            if velocity.y > 0.0 {
                velocity.y *= self.stats.jump_cut_multiplier;
            }
        }

        if state.can_move() {
            let speed = if self.grounded {
                self.stats.move_speed
            } else {
                self.stats.move_speed * self.stats.air_control
            };
            velocity.x = horizontal * speed + carry.x;
        }
        if self.grounded && !self.jumping && carry != Vec2::ZERO {
            velocity.y = carry.y;
        }

        physics.set_velocity(self.body_handle, velocity);
        events
    }

    /// Drive the attack state machine from the attack button
    pub fn update_attack(&mut self, input: &PlayerInput, dt: f32) -> Vec<GameEvent> {
        let can_attack = self.state_machine.state().can_attack();
        let button = AttackButton {
            pressed: can_attack && input.just_pressed(Action::Attack),
            held: input.is_pressed(Action::Attack),
            released: input.just_released(Action::Attack),
        };
        let signals = self.attack.update(button, dt);
        Self::attack_events(&signals)
    }

    /// End-of-tick bookkeeping: timers and the state machine
    pub fn finish_tick(&mut self, physics: &PhysicsWorld, input: &PlayerInput, dt: f32) {
        self.invincibility.tick(dt);
        let velocity_y = physics
            .velocity(self.body_handle)
            .map(|v| v.y)
            .unwrap_or(0.0);
        self.state_machine.update(
            dt,
            StateInputs {
                grounded: self.grounded,
                velocity_y,
                moving: input.horizontal() != 0.0,
                dashing: self.dash.is_dashing(),
                attack: self.attack.posture(),
            },
        );
    }

    /// Damage from enemies. Ignored while invincible or dead.
    pub fn take_damage(&mut self, amount: i32, source: Option<EntityId>) -> Vec<GameEvent> {
        if self.invincibility.is_active() {
            return Vec::new();
        }
        self.apply_damage(amount, source)
    }

    /// Damage from level hazards and pickups, which ignores invincibility
    pub fn take_hazard_damage(&mut self, amount: i32, source: Option<EntityId>) -> Vec<GameEvent> {
        self.apply_damage(amount, source)
    }

    pub fn heal(&mut self, amount: i32) -> Vec<GameEvent> {
        if !self.is_alive() || amount <= 0 {
            return Vec::new();
        }
        let change = self.health.heal(amount);
        vec![self.health_event(change)]
    }

    pub fn set_max_health(&mut self, max: i32) -> Vec<GameEvent> {
        let change = self.health.set_max(max);
        vec![self.health_event(change)]
    }

    /// Instant death (falling out of the level)
    pub fn kill(&mut self) -> Vec<GameEvent> {
        if !self.is_alive() {
            return Vec::new();
        }
        let amount = self.health.current();
        self.apply_damage(amount, None)
    }

    /// Bring the player back at `position` with full health
    pub fn respawn(&mut self, physics: &mut PhysicsWorld, position: Vec2) -> Vec<GameEvent> {
        physics.teleport(self.body_handle, position);
        let change = self.health.restore_full();
        self.invincibility.clear();
        self.dash.cancel();
        self.attack.cancel();
        self.jumping = false;
        self.grounded = false;
        self.ground_entity = None;
        self.grounded_remember = 0.0;
        self.movement_enabled = true;
        self.state_machine.respawn();
        log::info!("player respawned at {:.2}, {:.2}", position.x, position.y);
        vec![self.health_event(change), GameEvent::Respawned { position }]
    }

    /// Move the player without touching health or state
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec2) {
        physics.teleport(self.body_handle, position);
        self.dash.cancel();
        self.jumping = false;
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.position(self.body_handle)
    }

    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.velocity(self.body_handle)
    }

    pub fn is_alive(&self) -> bool {
        self.state_machine.state() != CharacterState::Dead
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn ground_entity(&self) -> Option<EntityId> {
        self.ground_entity
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn attack(&self) -> &ChargedAttack {
        &self.attack
    }

    pub fn attack_mut(&mut self) -> &mut ChargedAttack {
        &mut self.attack
    }

    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    pub fn abilities_mut(&mut self) -> &mut Abilities {
        &mut self.abilities
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_dashing()
    }

    pub fn half_extents(&self) -> Vec2 {
        self.stats.half_extents()
    }

    fn apply_damage(&mut self, amount: i32, source: Option<EntityId>) -> Vec<GameEvent> {
        if !self.is_alive() || amount <= 0 {
            return Vec::new();
        }
        let change = self.health.take_damage(amount);
        let mut events = vec![
            self.health_event(change),
            GameEvent::PlayerDamaged {
                amount: change.amount_lost(),
                source,
            },
        ];
        events.extend(Self::attack_events(&self.attack.cancel()));

        if change.died() {
            log::info!("player died");
            self.state_machine.die();
            self.dash.cancel();
            self.jumping = false;
            events.push(GameEvent::PlayerDied);
        } else {
            log::debug!(
                "player took {} damage, {}/{} left",
                change.amount_lost(),
                change.current,
                change.max
            );
            self.invincibility.start();
            self.state_machine.apply_hit_stun(self.stats.hit_stun_time);
        }
        events
    }

    fn health_event(&self, change: HealthChange) -> GameEvent {
        GameEvent::HealthChanged {
            entity: self.id,
            current: change.current,
            max: change.max,
        }
    }

    fn attack_events(signals: &[AttackSignal]) -> Vec<GameEvent> {
        signals
            .iter()
            .filter_map(|signal| match *signal {
                AttackSignal::ChargingChanged(charging) => {
                    Some(GameEvent::ChargingChanged { charging })
                }
                AttackSignal::Started(kind) => Some(GameEvent::AttackStarted { kind }),
                AttackSignal::Executed(kind) => Some(GameEvent::AttackExecuted { kind }),
                AttackSignal::Finished(_) => None,
            })
            .collect()
    }
}
