//! Data-driven game balance
//!
//! Every number the simulation consults lives here, so balance changes never
//! touch the algorithms. Loaded from JSON; missing fields fall back to
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Camera framing for one viewport orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    /// Vertical field of view (degrees)
    pub fov_deg: f32,
    /// Follow distance behind the player
    pub distance: f32,
    /// Height above the player
    pub height: f32,
}

impl CameraProfile {
    pub const PORTRAIT: Self = Self {
        fov_deg: 80.0,
        distance: 6.0,
        height: 3.0,
    };
    pub const LANDSCAPE: Self = Self {
        fov_deg: 50.0,
        distance: 3.0,
        height: 1.5,
    };
}

/// Tunable game parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    pub cell_size: f32,
    /// Stage 1 maze size; stage `s` uses `base_maze_size + s - 1`
    pub base_maze_size: usize,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub sprint_multiplier: f32,
    pub rotation_speed: f32,
    pub analog_dead_zone: f32,
    pub pickup_radius: f32,

    // === Pursuer ===
    pub pursuer_radius: f32,
    pub pursuer_speed: f32,
    pub detection_radius: f32,
    pub catch_radius: f32,
    pub catch_cooldown: f32,
    pub stun_duration: f32,
    pub roar_duration: f32,
    pub pursuer_spawn_clearance: u32,

    // === Items ===
    pub hint_item_count: usize,
    pub wing_spawn_chance: f64,
    pub health_items_min: usize,
    pub health_items_max: usize,
    /// Rejection-sampling attempts per item before giving up on it
    pub spawn_attempts: u32,

    // === Phases & timers ===
    pub intro_duration: f32,
    pub victory_duration: f32,
    pub hint_duration: f32,
    pub wing_duration: f32,
    pub starting_hints: u32,

    // === Health ===
    pub max_health: f32,
    pub sprint_drain: f32,
    pub sprint_drain_interval: f32,
    pub catch_damage: f32,
    pub heal_amount: f32,

    // === Camera ===
    pub portrait_camera: CameraProfile,
    pub landscape_camera: CameraProfile,
    /// Viewports with width/height below this use the portrait profile
    pub portrait_aspect_threshold: f32,
    /// Positional follow rate (1/s)
    pub camera_position_rate: f32,
    /// Rotational follow rate (1/s)
    pub camera_rotation_rate: f32,
    /// Spacing of wall samples along the backward ray
    pub camera_sample_step: f32,
    /// Lateral offset of the two side samples
    pub camera_sample_side: f32,
    /// Wall half-thickness the samples test against
    pub camera_wall_thickness: f32,
    /// Closest the camera may be pulled toward the player
    pub camera_min_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            base_maze_size: BASE_MAZE_SIZE,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            rotation_speed: ROTATION_SPEED,
            analog_dead_zone: ANALOG_DEAD_ZONE,
            pickup_radius: PICKUP_RADIUS,

            pursuer_radius: PURSUER_RADIUS,
            pursuer_speed: PURSUER_SPEED,
            detection_radius: DETECTION_RADIUS,
            catch_radius: CATCH_RADIUS,
            catch_cooldown: CATCH_COOLDOWN,
            stun_duration: STUN_DURATION,
            roar_duration: ROAR_DURATION,
            pursuer_spawn_clearance: PURSUER_SPAWN_CLEARANCE,

            hint_item_count: HINT_ITEM_COUNT,
            wing_spawn_chance: WING_SPAWN_CHANCE,
            health_items_min: HEALTH_ITEMS_MIN,
            health_items_max: HEALTH_ITEMS_MAX,
            spawn_attempts: SPAWN_ATTEMPTS,

            intro_duration: INTRO_DURATION,
            victory_duration: VICTORY_DURATION,
            hint_duration: HINT_DURATION,
            wing_duration: WING_DURATION,
            starting_hints: STARTING_HINTS,

            max_health: MAX_HEALTH,
            sprint_drain: SPRINT_DRAIN,
            sprint_drain_interval: SPRINT_DRAIN_INTERVAL,
            catch_damage: CATCH_DAMAGE,
            heal_amount: HEAL_AMOUNT,

            portrait_camera: CameraProfile::PORTRAIT,
            landscape_camera: CameraProfile::LANDSCAPE,
            portrait_aspect_threshold: 1.0,
            camera_position_rate: 12.0,
            camera_rotation_rate: 10.0,
            camera_sample_step: 0.5,
            camera_sample_side: 0.3,
            camera_wall_thickness: 0.2,
            camera_min_distance: 0.5,
        }
    }
}

impl Tuning {
    /// Maze edge length for a stage (stages are 1-based)
    pub fn maze_size(&self, stage: u32) -> usize {
        self.base_maze_size.max(1) + stage.max(1) as usize - 1
    }

    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the algorithms cannot work with
    pub fn validate(&self) -> Result<()> {
        let half_cell = self.cell_size / 2.0;
        let checks: [(bool, &str); 12] = [
            (self.cell_size > 0.0, "cell_size must be positive"),
            (self.base_maze_size >= 1, "base_maze_size must be at least 1"),
            (
                self.player_radius >= 0.0 && self.player_radius < half_cell,
                "player_radius must be in [0, cell_size / 2)",
            ),
            (
                self.pursuer_radius >= 0.0 && self.pursuer_radius < half_cell,
                "pursuer_radius must be in [0, cell_size / 2)",
            ),
            (
                self.player_speed >= 0.0 && self.pursuer_speed >= 0.0,
                "speeds must be non-negative",
            ),
            (
                (0.0..=1.0).contains(&self.wing_spawn_chance),
                "wing_spawn_chance must be in [0, 1]",
            ),
            (
                self.health_items_min <= self.health_items_max,
                "health_items_min must not exceed health_items_max",
            ),
            (
                [
                    self.catch_cooldown,
                    self.stun_duration,
                    self.roar_duration,
                    self.intro_duration,
                    self.victory_duration,
                    self.hint_duration,
                    self.wing_duration,
                ]
                .iter()
                .all(|d| *d >= 0.0),
                "durations must be non-negative",
            ),
            (
                self.sprint_drain_interval > 0.0,
                "sprint_drain_interval must be positive",
            ),
            (self.max_health > 0.0, "max_health must be positive"),
            (
                self.camera_sample_step > 0.0,
                "camera_sample_step must be positive",
            ),
            (
                (0.0..1.0).contains(&self.analog_dead_zone),
                "analog_dead_zone must be in [0, 1)",
            ),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(Error::InvalidTuning((*reason).to_string())),
            None => Ok(()),
        }
    }
}
