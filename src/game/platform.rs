// Moving platforms that ride a cyclic waypoint route

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::math::move_towards;
use crate::core::{GameError, Result, Timer};
use crate::engine::physics::{presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::EntityId;

/// Distance at which a waypoint counts as reached
pub const ARRIVAL_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformDesc {
    pub name: String,
    pub waypoints: Vec<Vec2>,
    pub speed: f32,
    /// Seconds spent at each waypoint
    pub wait_time: f32,
    pub size: Vec2,
}

impl Default for PlatformDesc {
    fn default() -> Self {
        Self {
            name: "platform".into(),
            waypoints: Vec::new(),
            speed: 2.0,
            wait_time: 1.0,
            size: Vec2::new(3.0, 0.5),
        }
    }
}

impl PlatformDesc {
    /// Tuning checks; a platform with a zero or negative speed never
    /// reaches its next waypoint.
    pub fn validate(&self) -> Result<()> {
        if self.speed <= 0.0 {
            return Err(GameError::InvalidLevel(format!(
                "platform '{}' needs a positive speed",
                self.name
            )));
        }
        if self.wait_time < 0.0 {
            return Err(GameError::InvalidLevel(format!(
                "platform '{}' has a negative wait_time",
                self.name
            )));
        }
        if self.size.min_element() <= 0.0 {
            return Err(GameError::InvalidLevel(format!(
                "platform '{}' has a non-positive size",
                self.name
            )));
        }
        Ok(())
    }
}

/// Route and timing logic, free of physics
#[derive(Debug, Clone)]
pub struct PlatformMotion {
    waypoints: Vec<Vec2>,
    speed: f32,
    wait_time: f32,
    index: usize,
    wait: Timer,
    paused: bool,
    position: Vec2,
    velocity: Vec2,
}

impl PlatformMotion {
    /// Starts on the first waypoint, waiting, with the next one as target
    pub fn new(desc: &PlatformDesc) -> Result<Self> {
        let Some(&start) = desc.waypoints.first() else {
            return Err(GameError::missing(desc.name.clone(), "waypoints"));
        };
        desc.validate()?;
        Ok(Self {
            index: 1 % desc.waypoints.len(),
            waypoints: desc.waypoints.clone(),
            speed: desc.speed,
            wait_time: desc.wait_time,
            wait: Timer::started(desc.wait_time),
            paused: false,
            position: start,
            velocity: Vec2::ZERO,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity over the last tick, for carrying riders
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn target(&self) -> Vec2 {
        self.waypoints[self.index]
    }

    pub fn target_index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_waiting(&self) -> bool {
        self.wait.is_running()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.velocity = Vec2::ZERO;
        }
    }

    /// Advance one tick and return the new position
    pub fn update(&mut self, dt: f32) -> Vec2 {
        if self.paused || dt <= 0.0 {
            self.velocity = Vec2::ZERO;
            return self.position;
        }
        if self.wait.is_running() {
            self.wait.tick(dt);
            self.velocity = Vec2::ZERO;
            return self.position;
        }

        let previous = self.position;
        let target = self.target();
        self.position = move_towards(self.position, target, self.speed * dt);
        self.velocity = (self.position - previous) / dt;

        if self.position.distance(target) < ARRIVAL_TOLERANCE {
            self.index = (self.index + 1) % self.waypoints.len();
            self.wait.start(self.wait_time);
        }
        self.position
    }
}

#[derive(Debug)]
pub struct MovingPlatform {
    pub id: EntityId,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    pub motion: PlatformMotion,
}

impl MovingPlatform {
    pub fn spawn(id: EntityId, desc: &PlatformDesc, physics: &mut PhysicsWorld) -> Result<Self> {
        let motion = PlatformMotion::new(desc)?;
        let start = motion.position();
        let body = presets::platform_body(start.x, start.y);
        let collider = presets::platform_collider(desc.size.x, desc.size.y);
        let (body_handle, collider_handle) = physics.spawn(body, collider, id);
        Ok(Self {
            id,
            body_handle,
            collider_handle,
            motion,
        })
    }

    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        let position = self.motion.update(dt);
        physics.set_kinematic_target(self.body_handle, position);
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion.velocity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn desc(waypoints: Vec<Vec2>) -> PlatformDesc {
        PlatformDesc {
            waypoints,
            ..PlatformDesc::default()
        }
    }

    #[test]
    fn test_requires_waypoints() {
        let err = PlatformMotion::new(&desc(Vec::new())).unwrap_err();
        assert!(matches!(err, GameError::MissingReference { .. }));
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let route = vec![Vec2::ZERO, Vec2::new(4.0, 0.0)];
        let broken = [
            PlatformDesc {
                speed: -2.0,
                ..desc(route.clone())
            },
            PlatformDesc {
                speed: 0.0,
                ..desc(route.clone())
            },
            PlatformDesc {
                wait_time: -1.0,
                ..desc(route.clone())
            },
            PlatformDesc {
                size: Vec2::new(3.0, 0.0),
                ..desc(route.clone())
            },
        ];
        for desc in &broken {
            let err = PlatformMotion::new(desc).unwrap_err();
            assert!(matches!(err, GameError::InvalidLevel(_)));
        }
        let no_wait = PlatformDesc {
            wait_time: 0.0,
            ..desc(route)
        };
        assert!(PlatformMotion::new(&no_wait).is_ok());
    }

    #[test]
    fn test_waits_before_moving() {
        let mut motion = PlatformMotion::new(&desc(vec![Vec2::ZERO, Vec2::new(4.0, 0.0)])).unwrap();
        for _ in 0..50 {
            motion.update(DT);
        }
        assert_eq!(motion.position(), Vec2::ZERO);
        assert_eq!(motion.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_travels_and_wraps_around() {
        let mut motion =
            PlatformMotion::new(&desc(vec![Vec2::ZERO, Vec2::new(2.0, 0.0)])).unwrap();
        // 1 s wait, then 1 s of travel at 2 units/s
        for _ in 0..125 {
            motion.update(DT);
        }
        assert!(motion.position().distance(Vec2::new(2.0, 0.0)) < ARRIVAL_TOLERANCE);
        assert_eq!(motion.target_index(), 0);
        assert!(motion.is_waiting());
    }

    #[test]
    fn test_velocity_while_moving() {
        let mut motion =
            PlatformMotion::new(&desc(vec![Vec2::ZERO, Vec2::new(0.0, 10.0)])).unwrap();
        for _ in 0..70 {
            motion.update(DT);
        }
        let velocity = motion.velocity();
        assert!((velocity.y - 2.0).abs() < 1e-3);
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn test_pause_freezes() {
        let mut motion =
            PlatformMotion::new(&desc(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)])).unwrap();
        for _ in 0..70 {
            motion.update(DT);
        }
        motion.set_paused(true);
        let frozen_at = motion.position();
        for _ in 0..60 {
            motion.update(DT);
        }
        assert_eq!(motion.position(), frozen_at);
        assert_eq!(motion.velocity(), Vec2::ZERO);

        motion.set_paused(false);
        motion.update(DT);
        assert!(motion.position().x > frozen_at.x);
    }

    #[test]
    fn test_single_waypoint_stays_put() {
        let mut motion = PlatformMotion::new(&desc(vec![Vec2::new(1.0, 1.0)])).unwrap();
        for _ in 0..200 {
            motion.update(DT);
        }
        assert_eq!(motion.position(), Vec2::new(1.0, 1.0));
    }
}
