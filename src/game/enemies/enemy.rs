// Enemy behavior: patrol, chase, attack, stagger, die

use glam::Vec2;

use crate::core::math::{direction_sign, move_towards};
use crate::core::Cooldown;
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::combat::Knockback;
use crate::game::health::Health;
use crate::game::EntityId;

use super::config::{EnemyAttack, EnemyConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyState {
    Idle,
    Patrolling,
    Chasing,
    Attacking,
    /// Lost the player; holding position before resuming the patrol
    Returning { remaining: f32 },
    Dying { remaining: f32 },
    Dead,
}

impl EnemyState {
    pub fn is_alive(&self) -> bool {
        !matches!(self, Self::Dying { .. } | Self::Dead)
    }
}

/// Result of striking an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub damage: i32,
    pub remaining: i32,
    pub killed: bool,
}

/// The physics-free half of an enemy: health, AI state and position
#[derive(Debug, Clone)]
pub struct EnemyBrain {
    config: EnemyConfig,
    health: Health,
    state: EnemyState,
    knockback: Knockback,
    attack_cooldown: Cooldown,
    route: Vec<Vec2>,
    route_index: usize,
    route_forward: bool,
    position: Vec2,
    facing: f32,
}

impl EnemyBrain {
    pub fn new(config: EnemyConfig, position: Vec2) -> Self {
        let route = config.patrol.route(position);
        if config.patrol.requires_points() && route.is_empty() {
            log::warn!(
                "{} has a waypoint patrol with no points, it will stand still",
                config.name
            );
        }
        let state = if route.is_empty() {
            EnemyState::Idle
        } else {
            EnemyState::Patrolling
        };
        Self {
            health: Health::new(config.health),
            knockback: Knockback::new(config.knockback),
            attack_cooldown: Cooldown::new(),
            route,
            route_index: 0,
            route_forward: true,
            position,
            facing: 1.0,
            state,
            config,
        }
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Death sequence finished; ready to leave the world
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    pub fn is_staggered(&self) -> bool {
        self.knockback.is_active()
    }

    /// Damage dealt on touch, if this enemy hurts by contact
    pub fn contact_damage(&self) -> Option<i32> {
        match self.config.attack {
            EnemyAttack::Contact { damage } if self.is_alive() => Some(damage),
            _ => None,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.config.size / 2.0
    }

    /// Advance the AI one tick. `target` is the player's position, or None
    /// when there is no live player. Returns melee damage dealt this tick.
    pub fn update(&mut self, target: Option<Vec2>, dt: f32) -> Option<i32> {
        match self.state {
            EnemyState::Dead => return None,
            EnemyState::Dying { remaining } => {
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    EnemyState::Dead
                } else {
                    EnemyState::Dying { remaining }
                };
                return None;
            }
            _ => {}
        }

        self.attack_cooldown.tick(dt);

        if let Some(velocity) = self.knockback.tick(dt) {
            let velocity = if self.config.flying {
                velocity
            } else {
                Vec2::new(velocity.x, 0.0)
            };
            self.position += velocity * dt;
            return None;
        }

        let in_sight = target.filter(|t| t.distance(self.position) < self.config.detection_range);
        match in_sight {
            Some(target) => self.engage(target, dt),
            None => {
                self.disengage(dt);
                None
            }
        }
    }

    /// Apply a hit. `knockback` is a direction times force, or None for no push.
    pub fn take_hit(&mut self, damage: i32, knockback: Option<Vec2>) -> Option<HitOutcome> {
        if !self.is_alive() {
            return None;
        }
        let change = self.health.take_damage(damage);
        let killed = change.died();
        if killed {
            self.knockback.clear();
            self.state = if self.config.death_linger > 0.0 {
                EnemyState::Dying {
                    remaining: self.config.death_linger,
                }
            } else {
                EnemyState::Dead
            };
        } else if let Some(push) = knockback {
            self.knockback.apply(push, push.length());
        }
        Some(HitOutcome {
            damage: change.amount_lost(),
            remaining: change.current,
            killed,
        })
    }

    fn engage(&mut self, target: Vec2, dt: f32) -> Option<i32> {
        let distance = target.distance(self.position);
        if let EnemyAttack::Melee {
            range,
            damage,
            cooldown,
        } = self.config.attack
        {
            if distance <= range {
                self.state = EnemyState::Attacking;
                self.face_towards(target.x);
                if self.attack_cooldown.ready() {
                    self.attack_cooldown.trigger(cooldown);
                    return Some(damage);
                }
                return None;
            }
        }

        self.state = EnemyState::Chasing;
        self.step_towards(target, self.config.chase_speed, dt);
        None
    }

    fn disengage(&mut self, dt: f32) {
        match self.state {
            EnemyState::Chasing | EnemyState::Attacking => {
                self.state = if self.config.return_delay > 0.0 {
                    EnemyState::Returning {
                        remaining: self.config.return_delay,
                    }
                } else {
                    self.resting_state()
                };
            }
            EnemyState::Returning { remaining } => {
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    self.resting_state()
                } else {
                    EnemyState::Returning { remaining }
                };
            }
            EnemyState::Patrolling => self.patrol(dt),
            _ => {}
        }
    }

    fn resting_state(&self) -> EnemyState {
        if self.route.is_empty() {
            EnemyState::Idle
        } else {
            EnemyState::Patrolling
        }
    }

    fn patrol(&mut self, dt: f32) {
        let Some(&point) = self.route.get(self.route_index) else {
            return;
        };
        let goal = self.step_towards(point, self.config.patrol_speed, dt);
        if self.position.distance(goal) < self.config.arrival_tolerance {
            self.advance_route();
        }
    }

    fn advance_route(&mut self) {
        let len = self.route.len();
        if len < 2 {
            return;
        }
        if self.config.patrol.is_looping() {
            self.route_index = (self.route_index + 1) % len;
            return;
        }
        if self.route_forward && self.route_index + 1 >= len {
            self.route_forward = false;
        } else if !self.route_forward && self.route_index == 0 {
            self.route_forward = true;
        }
        if self.route_forward {
            self.route_index += 1;
        } else {
            self.route_index -= 1;
        }
    }

    /// Move towards `target` (x only unless flying). Returns the goal used.
    fn step_towards(&mut self, target: Vec2, speed: f32, dt: f32) -> Vec2 {
        let goal = if self.config.flying {
            target
        } else {
            Vec2::new(target.x, self.position.y)
        };
        self.face_towards(goal.x);
        self.position = move_towards(self.position, goal, speed * dt);
        goal
    }

    fn face_towards(&mut self, x: f32) {
        let sign = direction_sign(x - self.position.x);
        if sign != 0.0 {
            self.facing = sign;
        }
    }
}

/// An enemy in the world: its brain plus its physics body
#[derive(Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    pub brain: EnemyBrain,
}

impl Enemy {
    pub fn spawn(
        id: EntityId,
        config: EnemyConfig,
        position: Vec2,
        physics: &mut PhysicsWorld,
    ) -> Self {
        let body = presets::enemy_body(position.x, position.y);
        let collider = presets::enemy_collider(config.size.x, config.size.y);
        let (body_handle, collider_handle) = physics.spawn(body, collider, id);
        log::debug!("spawned {} #{id} at {:.2}, {:.2}", config.name, position.x, position.y);
        Self {
            id,
            body_handle,
            collider_handle,
            brain: EnemyBrain::new(config, position),
        }
    }

    pub fn name(&self) -> &str {
        &self.brain.config().name
    }

    pub fn position(&self) -> Vec2 {
        self.brain.position()
    }

    pub fn is_alive(&self) -> bool {
        self.brain.is_alive()
    }

    /// Push the brain's position to the kinematic body
    pub fn sync_body(&self, physics: &mut PhysicsWorld) {
        physics.set_kinematic_target(self.body_handle, self.brain.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::combat::KnockbackModel;
    use crate::game::enemies::config::Patrol;

    const DT: f32 = 1.0 / 60.0;

    fn run(brain: &mut EnemyBrain, target: Option<Vec2>, ticks: usize) -> Vec<i32> {
        (0..ticks).filter_map(|_| brain.update(target, DT)).collect()
    }

    #[test]
    fn test_brute_idles_without_player() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        run(&mut brain, None, 30);
        assert_eq!(brain.state(), EnemyState::Idle);
        assert_eq!(brain.position(), Vec2::ZERO);
    }

    #[test]
    fn test_brute_chases_along_x() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        brain.update(Some(Vec2::new(4.0, 2.0)), DT);
        assert_eq!(brain.state(), EnemyState::Chasing);
        assert!(brain.position().x > 0.0);
        assert_eq!(brain.position().y, 0.0);
        assert_eq!(brain.facing(), 1.0);
    }

    #[test]
    fn test_brute_ignores_player_out_of_range() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        brain.update(Some(Vec2::new(-6.0, 0.0)), DT);
        assert_eq!(brain.state(), EnemyState::Idle);
    }

    #[test]
    fn test_melee_respects_cooldown() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        let target = Some(Vec2::new(0.5, 0.0));
        // 2 seconds in range with a 1 second cooldown: strikes at t=0 and t=1
        let strikes = run(&mut brain, target, 120);
        assert_eq!(strikes, vec![1, 1]);
        assert_eq!(brain.state(), EnemyState::Attacking);
        assert_eq!(brain.position(), Vec2::ZERO);
    }

    #[test]
    fn test_bat_waypoint_patrol_loops() {
        let config = EnemyConfig::bat().with_patrol(Patrol::Waypoints {
            points: vec![Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            looping: true,
        });
        let mut brain = EnemyBrain::new(config, Vec2::ZERO);
        assert_eq!(brain.state(), EnemyState::Patrolling);

        // 2 units/s: the first point is reached in under half a second
        run(&mut brain, None, 30);
        assert!(brain.position().y > 0.05);
        run(&mut brain, None, 20);
        assert!(brain.position().y > 0.7);
        // Then back towards the first point again
        run(&mut brain, None, 20);
        assert!(brain.position().y < 0.5);
    }

    #[test]
    fn test_non_looping_waypoints_walk_back() {
        let config = EnemyConfig::bat().with_patrol(Patrol::Waypoints {
            points: vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
            looping: false,
        });
        let mut brain = EnemyBrain::new(config, Vec2::ZERO);
        run(&mut brain, None, 55);
        assert!(brain.position().x > 1.7);
        run(&mut brain, None, 40);
        assert!(brain.position().x < 1.5);
    }

    #[test]
    fn test_bat_flies_towards_player() {
        let mut brain = EnemyBrain::new(EnemyConfig::bat(), Vec2::ZERO);
        brain.update(Some(Vec2::new(0.0, 3.0)), DT);
        assert_eq!(brain.state(), EnemyState::Chasing);
        assert!(brain.position().y > 0.0);
        assert_eq!(brain.contact_damage(), Some(1));
    }

    #[test]
    fn test_return_delay_holds_position() {
        let config = EnemyConfig::bat().with_patrol(Patrol::Waypoints {
            points: vec![Vec2::new(5.0, 0.0)],
            looping: true,
        });
        let mut brain = EnemyBrain::new(config, Vec2::ZERO);
        run(&mut brain, Some(Vec2::new(-1.0, 0.0)), 10);
        assert_eq!(brain.state(), EnemyState::Chasing);

        brain.update(None, DT);
        assert!(matches!(brain.state(), EnemyState::Returning { .. }));
        let held_at = brain.position();
        run(&mut brain, None, 60);
        assert_eq!(brain.position(), held_at);

        run(&mut brain, None, 70);
        assert_eq!(brain.state(), EnemyState::Patrolling);
        assert!(brain.position().x > held_at.x);
    }

    #[test]
    fn test_sentinel_ping_pong() {
        let mut brain = EnemyBrain::new(EnemyConfig::sentinel(), Vec2::ZERO);
        // Span of 4: right end at x=2, reached after ~1 s at speed 2
        run(&mut brain, None, 65);
        assert!(brain.facing() < 0.0);
        run(&mut brain, None, 60);
        assert!(brain.position().x < 0.5);
    }

    #[test]
    fn test_take_hit_then_die_and_linger() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        let outcome = brain.take_hit(40, None).unwrap();
        assert_eq!(outcome.remaining, 60);
        assert!(!outcome.killed);

        let outcome = brain.take_hit(80, None).unwrap();
        assert!(outcome.killed);
        assert_eq!(outcome.damage, 60);
        assert!(!brain.is_alive());
        assert!(brain.take_hit(10, None).is_none());

        run(&mut brain, None, 30);
        assert!(!brain.is_dead());
        run(&mut brain, None, 31);
        assert!(brain.is_dead());
    }

    #[test]
    fn test_no_linger_dies_immediately() {
        let mut brain = EnemyBrain::new(EnemyConfig::bat(), Vec2::ZERO);
        brain.take_hit(3, None);
        assert!(brain.is_dead());
        assert_eq!(brain.contact_damage(), None);
    }

    #[test]
    fn test_knockback_overrides_ai() {
        let mut brain = EnemyBrain::new(EnemyConfig::brute(), Vec2::ZERO);
        brain.take_hit(10, Some(Vec2::new(-10.0, 0.0)));
        assert!(brain.is_staggered());

        // Player is in melee range but the brute is busy being knocked back
        let strike = brain.update(Some(Vec2::new(0.5, 0.0)), DT);
        assert!(strike.is_none());
        assert!(brain.position().x < 0.0);
    }

    #[test]
    fn test_timed_knockback_on_dummy() {
        let mut brain = EnemyBrain::new(EnemyConfig::dummy(), Vec2::ZERO);
        assert_eq!(
            brain.config().knockback,
            KnockbackModel::Timed {
                duration: 0.5,
                speed: 5.0
            }
        );
        brain.take_hit(20, Some(Vec2::new(1.0, 0.0)));
        run(&mut brain, None, 60);
        // 5 units/s for 0.5 s
        assert!((brain.position().x - 2.5).abs() < 0.15);
        assert!(!brain.is_staggered());
    }

    #[test]
    fn test_empty_waypoints_idle() {
        let mut brain = EnemyBrain::new(EnemyConfig::bat(), Vec2::ZERO);
        assert_eq!(brain.state(), EnemyState::Idle);
        run(&mut brain, None, 10);
        assert_eq!(brain.position(), Vec2::ZERO);
    }
}
