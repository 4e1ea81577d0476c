//! Maze Chase - first-person maze escape with a pursuing wolf
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, collision, pathfinding, agents)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Stage progress save/load
//! - `error`: Crate error type

pub mod error;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use persistence::{FileStore, MemoryStore, Progress, ProgressStore};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World units per maze cell
    pub const CELL_SIZE: f32 = 2.0;
    /// Maze edge length on stage 1 (size = BASE_MAZE_SIZE + stage - 1)
    pub const BASE_MAZE_SIZE: usize = 5;
    /// Eye height of agents above the floor
    pub const AGENT_HEIGHT: f32 = 0.5;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.3;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const SPRINT_MULTIPLIER: f32 = 1.6;
    /// Radians per second
    pub const ROTATION_SPEED: f32 = 3.0;
    pub const ANALOG_DEAD_ZONE: f32 = 0.1;
    pub const PICKUP_RADIUS: f32 = 0.8;

    /// Pursuer defaults
    pub const PURSUER_RADIUS: f32 = 0.4;
    /// 80% of the player's base walking pace (5 * 0.4)
    pub const PURSUER_SPEED: f32 = 5.0 * 0.4 * 0.8;
    pub const DETECTION_RADIUS: f32 = 5.0;
    pub const CATCH_RADIUS: f32 = 0.8;
    pub const CATCH_COOLDOWN: f32 = 2.0;
    pub const STUN_DURATION: f32 = 0.8;
    pub const ROAR_DURATION: f32 = 2.0;
    /// Minimum Manhattan distance (cells) between the start cell and the pursuer's den
    pub const PURSUER_SPAWN_CLEARANCE: u32 = 3;

    /// Item spawning
    pub const HINT_ITEM_COUNT: usize = 3;
    pub const WING_SPAWN_CHANCE: f64 = 0.3;
    pub const HEALTH_ITEMS_MIN: usize = 1;
    pub const HEALTH_ITEMS_MAX: usize = 2;
    pub const SPAWN_ATTEMPTS: u32 = 64;

    /// Phase and timer durations (seconds)
    pub const INTRO_DURATION: f32 = 2.5;
    pub const VICTORY_DURATION: f32 = 2.0;
    pub const HINT_DURATION: f32 = 10.0;
    pub const WING_DURATION: f32 = 5.0;
    pub const STARTING_HINTS: u32 = 2;

    /// Health model
    pub const MAX_HEALTH: f32 = 100.0;
    pub const SPRINT_DRAIN: f32 = 5.0;
    pub const SPRINT_DRAIN_INTERVAL: f32 = 0.5;
    pub const CATCH_DAMAGE: f32 = 20.0;
    pub const HEAL_AMOUNT: f32 = 20.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Planar forward direction (x, z) for a yaw angle.
///
/// Yaw 0 faces -z; positive yaw turns left (counter-clockwise seen from above).
#[inline]
pub fn forward_vector(yaw: f32) -> Vec2 {
    Vec2::new(-yaw.sin(), -yaw.cos())
}

/// Planar right-hand direction (x, z) for a yaw angle
#[inline]
pub fn right_vector(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// Yaw that makes [`forward_vector`] point along `dir`
#[inline]
pub fn yaw_toward(dir: Vec2) -> f32 {
    (-dir.x).atan2(-dir.y)
}

/// Frame-rate independent interpolation factor for exponential smoothing
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
