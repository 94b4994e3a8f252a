// The simulation: owns every object and runs them in a fixed order
//
// Tick order: hit pause, shake, platform pause, platforms, player
// controller, player attack, enemies, physics step, ground probe,
// triggers, safe ground and kill plane, player state, respawn.
// Input edges from a hit-pause tick are held for the next live tick.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::math::boxes_overlap;
use crate::core::{GameError, Result};
use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{presets, to_vector, CollisionGroups, PhysicsWorld};
use crate::game::abilities::{Ability, PlatformPause};
use crate::game::characters::Player;
use crate::game::combat::{AttackKind, Feedback};
use crate::game::enemies::{Enemy, EnemyConfig};
use crate::game::events::GameEvent;
use crate::game::level::LevelDesc;
use crate::game::platform::{MovingPlatform, PlatformDesc};
use crate::game::respawn::{
    load_respawn_point, save_respawn_point, RespawnSystem, SafeGround, SaveStore,
};
use crate::game::triggers::{Contact, Trigger, TriggerKind};
use crate::game::{EntityId, GameConfig, PLAYER_ID};

pub struct GameWorld {
    config: GameConfig,
    physics: PhysicsWorld,
    player: Player,
    enemies: Vec<Enemy>,
    platforms: Vec<MovingPlatform>,
    triggers: Vec<Trigger>,
    feedback: Feedback,
    platform_pause: PlatformPause,
    respawn: RespawnSystem,
    safe_ground: SafeGround,
    store: Box<dyn SaveStore>,
    spawn_point: Vec2,
    kill_plane_y: f32,
    next_id: EntityId,
    tick_count: u64,
    rng: StdRng,
}

impl GameWorld {
    /// Build the world for `level`. The player starts at the saved respawn
    /// point when the store has one. Level objects that cannot work are
    /// logged and left out.
    pub fn new(config: GameConfig, level: &LevelDesc, store: Box<dyn SaveStore>) -> Result<Self> {
        config.validate()?;
        level.validate()?;

        let mut physics = PhysicsWorld::with_gravity(to_vector(Vec2::new(0.0, -config.gravity)));
        physics.set_timestep(FIXED_TIMESTEP);

        let start = match load_respawn_point(store.as_ref()) {
            Some(saved) => {
                log::info!("continuing from saved point {:.2}, {:.2}", saved.x, saved.y);
                saved
            }
            None => level.player_spawn,
        };
        let player = Player::new(
            PLAYER_ID,
            config.player.clone(),
            config.attack.clone(),
            &mut physics,
            start,
        );

        let mut world = Self {
            feedback: Feedback::new(),
            platform_pause: PlatformPause::new(&config.platform_pause),
            respawn: RespawnSystem::new(&config.respawn),
            safe_ground: SafeGround::new(start),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            physics,
            player,
            enemies: Vec::new(),
            platforms: Vec::new(),
            triggers: Vec::new(),
            store,
            spawn_point: level.player_spawn,
            kill_plane_y: level.kill_plane_y,
            next_id: PLAYER_ID + 1,
            tick_count: 0,
        };

        for block in &level.ground {
            world.add_ground(block.position, block.size);
        }
        for desc in &level.platforms {
            if let Err(err) = world.add_platform(desc) {
                log::warn!("skipping platform '{}': {err}", desc.name);
            }
        }
        for spawn in &level.enemies {
            let Some(config) = spawn.resolve() else {
                let err = GameError::missing(
                    format!("enemy spawn at {:?}", spawn.position),
                    "preset or config",
                );
                log::warn!("skipping enemy: {err}");
                continue;
            };
            match config.validate() {
                Ok(()) => {
                    world.spawn_enemy(config, spawn.position);
                }
                Err(reason) => log::warn!("skipping enemy '{}': {reason}", config.name),
            }
        }
        for desc in &level.triggers {
            match desc.position {
                Some(position) => {
                    world.add_trigger(desc.kind.clone(), position, desc.size);
                }
                None => {
                    let err = GameError::missing(desc.kind.name(), "position");
                    log::warn!("skipping trigger: {err}");
                }
            }
        }

        log::info!(
            "level '{}' ready: {} enemies, {} platforms, {} triggers",
            level.name,
            world.enemies.len(),
            world.platforms.len(),
            world.triggers.len()
        );
        Ok(world)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_ground(&mut self, position: Vec2, size: Vec2) -> EntityId {
        let id = self.allocate_id();
        let body = presets::ground_body(position.x, position.y);
        let collider = presets::ground_collider(size.x, size.y);
        self.physics.spawn(body, collider, id);
        id
    }

    pub fn add_platform(&mut self, desc: &PlatformDesc) -> Result<EntityId> {
        // Validate before spending an id
        if desc.waypoints.is_empty() {
            return Err(GameError::missing(desc.name.clone(), "waypoints"));
        }
        let id = self.allocate_id();
        let platform = MovingPlatform::spawn(id, desc, &mut self.physics)?;
        self.platforms.push(platform);
        Ok(id)
    }

    pub fn spawn_enemy(&mut self, config: EnemyConfig, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        let enemy = Enemy::spawn(id, config, position, &mut self.physics);
        self.enemies.push(enemy);
        id
    }

    pub fn add_trigger(&mut self, kind: TriggerKind, position: Vec2, size: Vec2) -> EntityId {
        let id = self.allocate_id();
        let trigger = Trigger::spawn(id, kind, position, size, &mut self.physics);
        self.triggers.push(trigger);
        id
    }

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self, input: &mut PlayerInput) -> Vec<GameEvent> {
        let dt = self.physics.timestep();
        let mut events = Vec::new();

        self.feedback.tick_shake(dt);
        if self.feedback.consume_frozen_tick() {
            input.hold_edges();
            return events;
        }
        self.tick_count += 1;

        self.update_platform_pause(input, dt, &mut events);

        // Platforms pick their motion first so riders move with it this step
        for platform in &mut self.platforms {
            platform.update(&mut self.physics, dt);
        }
        let carry = self.rider_carry();
        events.extend(
            self.player
                .update_movement(input, &mut self.physics, carry, dt),
        );
        events.extend(self.player.update_attack(input, dt));
        self.resolve_player_attack(&mut events);

        self.update_enemies(dt, &mut events);

        self.physics.step();
        events.extend(self.player.probe_ground(&self.physics, dt));

        let teleported = self.update_triggers(input, &mut events);
        self.update_safe_ground(teleported, &mut events);

        self.player.finish_tick(&self.physics, input, dt);
        self.update_respawn(dt, &mut events);
        events
    }

    fn update_platform_pause(&mut self, input: &PlayerInput, dt: f32, events: &mut Vec<GameEvent>) {
        if self.platform_pause.tick(dt) {
            self.set_platforms_paused(false);
            log::info!("platforms resumed");
            events.push(GameEvent::PlatformsResumed);
        }

        let wants_pause = input.just_pressed(Action::PausePlatforms)
            && self.player.abilities().has(Ability::PlatformPause)
            && self.player.state().can_use_ability();
        if wants_pause && self.platform_pause.try_activate() {
            self.set_platforms_paused(true);
            log::info!("platforms paused for {:.1}s", self.config.platform_pause.duration);
            events.push(GameEvent::PlatformsPaused);
        }
    }

    fn set_platforms_paused(&mut self, paused: bool) {
        for platform in &mut self.platforms {
            platform.motion.set_paused(paused);
        }
    }

    /// Velocity of the platform the player stands on
    fn rider_carry(&self) -> Vec2 {
        self.player
            .ground_entity()
            .and_then(|id| self.platforms.iter().find(|p| p.id == id))
            .map(MovingPlatform::velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn resolve_player_attack(&mut self, events: &mut Vec<GameEvent>) {
        let Some(kind) = self.player.attack().active_kind() else {
            return;
        };
        let Some(origin) = self.player.position(&self.physics) else {
            return;
        };
        let facing = self.player.facing();
        let (center, half) = self.player.attack().hitbox(origin, facing);
        let targets = self.physics.overlapping_entities(
            center,
            half,
            CollisionGroups::Enemy.group(),
            Some(self.player.body_handle),
        );

        for target in targets {
            let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == target) else {
                continue;
            };
            if !enemy.is_alive() || !self.player.attack_mut().register_hit(target) {
                continue;
            }

            let damage = self.config.attack.damage(kind);
            let staggers =
                kind == AttackKind::Heavy || enemy.brain.config().staggered_by_light_hits;
            let knockback = staggers.then(|| {
                let away = (enemy.position() - origin).normalize_or_zero();
                let direction = if away == Vec2::ZERO {
                    Vec2::new(facing, 0.0)
                } else {
                    away
                };
                direction * self.config.attack.knockback_force
            });

            let Some(outcome) = enemy.brain.take_hit(damage, knockback) else {
                continue;
            };
            log::debug!(
                "{:?} attack hit {} #{} for {} ({} left)",
                kind,
                enemy.name(),
                enemy.id,
                outcome.damage,
                outcome.remaining
            );
            events.push(GameEvent::EnemyDamaged {
                enemy: enemy.id,
                amount: outcome.damage,
                remaining: outcome.remaining,
            });
            if outcome.killed {
                log::info!("{} #{} killed", enemy.name(), enemy.id);
                self.physics.set_collider_enabled(enemy.collider_handle, false);
                events.push(GameEvent::EnemyKilled { enemy: enemy.id });
            }

            let frames = self.config.feedback.hit_pause_frames(kind);
            let duration = self.config.feedback.shake_time;
            let strength = self.config.feedback.shake_strength(kind);
            self.feedback.request_hit_pause(frames);
            self.feedback.request_shake(duration, strength);
            events.push(GameEvent::HitPause { frames });
            events.push(GameEvent::CameraShake { duration, strength });
        }
    }

    fn update_enemies(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let target = if self.player.is_alive() {
            self.player.position(&self.physics)
        } else {
            None
        };
        let player_half = self.player.half_extents();

        for enemy in &mut self.enemies {
            if let Some(damage) = enemy.brain.update(target, dt) {
                log::debug!("{} #{} strikes for {damage}", enemy.name(), enemy.id);
                events.push(GameEvent::EnemyAttacked { enemy: enemy.id });
                events.extend(self.player.take_damage(damage, Some(enemy.id)));
            }
            if let (Some(damage), Some(player_pos)) = (enemy.brain.contact_damage(), target) {
                let touching = boxes_overlap(
                    enemy.position(),
                    enemy.brain.half_extents(),
                    player_pos,
                    player_half,
                );
                if touching {
                    events.extend(self.player.take_damage(damage, Some(enemy.id)));
                }
            }
            enemy.sync_body(&mut self.physics);
        }

        let mut removed = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.brain.is_dead() {
                removed.push((enemy.id, enemy.body_handle));
                false
            } else {
                true
            }
        });
        for (id, body) in removed {
            self.physics.remove_rigid_body(body);
            log::debug!("enemy #{id} removed");
            events.push(GameEvent::EnemyRemoved { enemy: id });
        }
    }

    /// Returns true when a trap moved the player this tick
    fn update_triggers(&mut self, input: &PlayerInput, events: &mut Vec<GameEvent>) -> bool {
        let Some(position) = self.player.position(&self.physics) else {
            return false;
        };
        let inside = if self.player.is_alive() {
            self.physics.overlapping_entities(
                position,
                self.player.half_extents(),
                CollisionGroups::Trigger.group(),
                Some(self.player.body_handle),
            )
        } else {
            Vec::new()
        };

        let mut trap_hit = false;
        for trigger in &mut self.triggers {
            let contact = trigger.observe(inside.contains(&trigger.id));
            match trigger.kind.clone() {
                TriggerKind::Checkpoint => {
                    match contact {
                        Contact::Entered | Contact::Exited => {
                            events.push(GameEvent::CheckpointPrompt {
                                checkpoint: trigger.id,
                                visible: contact == Contact::Entered,
                            });
                        }
                        Contact::Inside | Contact::Outside => {}
                    }
                    if contact.is_inside() && input.just_pressed(Action::Interact) {
                        match save_respawn_point(self.store.as_mut(), trigger.position) {
                            Ok(()) => {
                                log::info!(
                                    "checkpoint saved at {:.2}, {:.2}",
                                    trigger.position.x,
                                    trigger.position.y
                                );
                                events.push(GameEvent::CheckpointSaved {
                                    position: trigger.position,
                                });
                            }
                            Err(err) => log::warn!("could not save checkpoint: {err}"),
                        }
                    }
                }
                TriggerKind::HealthModifier {
                    damage,
                    heal,
                    max_increase,
                    consume,
                } if contact == Contact::Entered => {
                    if max_increase > 0 {
                        let max = self.player.health().max() + max_increase;
                        events.extend(self.player.set_max_health(max));
                    }
                    if damage > 0 {
                        events.extend(self.player.take_hazard_damage(damage, Some(trigger.id)));
                    }
                    if heal > 0 {
                        events.extend(self.player.heal(heal));
                    }
                    if consume {
                        trigger.consume();
                    }
                }
                TriggerKind::Trap if contact.is_inside() => {
                    trap_hit = true;
                }
                TriggerKind::AbilityUnlock {
                    ability,
                    revoke,
                    consume,
                } if contact == Contact::Entered => {
                    let abilities = self.player.abilities_mut();
                    if revoke {
                        if abilities.revoke(ability) {
                            log::info!("{ability:?} revoked");
                            events.push(GameEvent::AbilityRevoked { ability });
                        }
                    } else if abilities.unlock(ability) {
                        log::info!("{ability:?} unlocked");
                        events.push(GameEvent::AbilityUnlocked { ability });
                    }
                    if consume {
                        trigger.consume();
                    }
                }
                _ => {}
            }
        }

        let mut consumed = Vec::new();
        self.triggers.retain(|trigger| {
            if trigger.is_consumed() {
                consumed.push((trigger.id, trigger.body_handle));
                false
            } else {
                true
            }
        });
        for (id, body) in consumed {
            self.physics.remove_rigid_body(body);
            events.push(GameEvent::PickupConsumed { trigger: id });
        }

        if trap_hit && self.player.is_alive() {
            let to = self.safe_ground.last();
            self.player.teleport(&mut self.physics, to);
            log::info!("trap sent player back to {:.2}, {:.2}", to.x, to.y);
            events.push(GameEvent::Teleported { from: position, to });
        }
        trap_hit
    }

    fn update_safe_ground(&mut self, teleported: bool, events: &mut Vec<GameEvent>) {
        if teleported || !self.player.is_alive() {
            return;
        }
        let Some(position) = self.player.position(&self.physics) else {
            return;
        };

        if position.y < self.kill_plane_y {
            log::info!("player fell out of the level");
            events.extend(self.player.kill());
            return;
        }

        // Platforms move away from wherever the player stood on them
        let on_platform = self
            .player
            .ground_entity()
            .is_some_and(|id| self.platforms.iter().any(|p| p.id == id));
        if self.player.is_grounded() && !on_platform {
            self.safe_ground.record(position);
        }
    }

    fn update_respawn(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if self.respawn.tick(dt) {
            let point = load_respawn_point(self.store.as_ref()).unwrap_or(self.spawn_point);
            events.extend(self.player.respawn(&mut self.physics, point));
            self.safe_ground.record(point);
        } else if !self.player.is_alive() && !self.respawn.is_pending() {
            self.respawn.begin();
        }
    }

    /// Camera offset for this frame while a shake is running
    pub fn camera_shake_offset(&mut self) -> Vec2 {
        self.feedback.shake_offset(&mut self.rng)
    }

    pub fn is_hit_paused(&self) -> bool {
        self.feedback.is_paused()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player.position(&self.physics)
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn platforms(&self) -> &[MovingPlatform] {
        &self.platforms
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn platform_pause(&self) -> &PlatformPause {
        &self.platform_pause
    }

    pub fn store(&self) -> &dyn SaveStore {
        self.store.as_ref()
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn safe_ground(&self) -> Vec2 {
        self.safe_ground.last()
    }

    pub fn is_respawn_pending(&self) -> bool {
        self.respawn.is_pending()
    }

    /// Ticks simulated, not counting hit-pause frames
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
