// Core utilities shared by the engine and game layers

pub mod error;
pub mod math;
pub mod timer;

pub use error::{GameError, Result};
pub use timer::{Cooldown, Timer};
