//! Headless gameplay core for a 2D action-platformer.
//!
//! The host feeds abstract [`engine::input::Action`]s into
//! [`game::GameWorld::tick`] once per fixed step and presents the
//! [`game::GameEvent`]s that come back.

pub mod core;
pub mod engine;
pub mod game;
