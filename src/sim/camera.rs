//! Third-person follow camera
//!
//! Sits behind and above the player, pulled in when a wall stands between
//! camera and player. Yaw and position follow with independent exponential
//! rates; nothing ever snaps except the framing profile, which switches
//! discretely at the portrait/landscape threshold.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::CollisionField;
use crate::tuning::{CameraProfile, Tuning};
use crate::{forward_vector, normalize_angle, right_vector, smoothing_factor};

/// Viewport orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    pub fn from_aspect(aspect: f32, threshold: f32) -> Self {
        if aspect < threshold {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn profile(self, tuning: &Tuning) -> CameraProfile {
        match self {
            Orientation::Portrait => tuning.portrait_camera,
            Orientation::Landscape => tuning.landscape_camera,
        }
    }
}

/// Camera pose published to the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Smoothed yaw trailing the player's facing
    pub yaw: f32,
    pub fov_deg: f32,
    pub orientation: Orientation,
    /// Follow distance after wall probing
    pub distance: f32,
}

impl Camera {
    /// Camera parked directly behind a player pose
    pub fn behind(player_pos: Vec2, player_yaw: f32, eye_height: f32, tuning: &Tuning) -> Self {
        let orientation = Orientation::default();
        let profile = orientation.profile(tuning);
        let position = follow_position(player_pos, player_yaw, profile.distance, profile.height);
        Self {
            position,
            look_at: look_target(player_pos, eye_height),
            yaw: player_yaw,
            fov_deg: profile.fov_deg,
            orientation,
            distance: profile.distance,
        }
    }

    /// Apply a new viewport aspect ratio (discrete profile switch)
    pub fn set_aspect(&mut self, aspect: f32, tuning: &Tuning) {
        let orientation = Orientation::from_aspect(aspect, tuning.portrait_aspect_threshold);
        if orientation != self.orientation {
            log::debug!("Camera profile {:?} -> {:?}", self.orientation, orientation);
            self.orientation = orientation;
            self.fov_deg = orientation.profile(tuning).fov_deg;
        }
    }

    /// Follow the player for one tick
    pub fn follow(
        &mut self,
        field: &CollisionField,
        player_pos: Vec2,
        player_yaw: f32,
        eye_height: f32,
        tuning: &Tuning,
        dt: f32,
    ) {
        let profile = self.orientation.profile(tuning);

        let yaw_delta = normalize_angle(player_yaw - self.yaw);
        self.yaw = normalize_angle(self.yaw + yaw_delta * smoothing_factor(tuning.camera_rotation_rate, dt));

        self.distance = clear_distance(field, player_pos, self.yaw, profile.distance, tuning);
        let target = follow_position(player_pos, self.yaw, self.distance, profile.height);
        self.position = self
            .position
            .lerp(target, smoothing_factor(tuning.camera_position_rate, dt));
        self.look_at = look_target(player_pos, eye_height);
    }

    /// Intro sweep: glide from an overhead view of the whole maze down to the
    /// follow position. `t` runs 0 → 1 over the intro.
    pub fn sweep(
        &mut self,
        field: &CollisionField,
        player_pos: Vec2,
        player_yaw: f32,
        eye_height: f32,
        tuning: &Tuning,
        t: f32,
    ) {
        let profile = self.orientation.profile(tuning);
        let maze_span = field.maze().size() as f32 * field.frame().cell_size;
        let overhead = Vec3::new(0.0, maze_span * 1.2, maze_span * 0.5);

        self.yaw = player_yaw;
        self.distance = clear_distance(field, player_pos, player_yaw, profile.distance, tuning);
        let follow = follow_position(player_pos, player_yaw, self.distance, profile.height);

        let t = t.clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.position = overhead.lerp(follow, eased);
        self.look_at = Vec3::ZERO.lerp(look_target(player_pos, eye_height), eased);
    }
}

fn look_target(player_pos: Vec2, eye_height: f32) -> Vec3 {
    Vec3::new(player_pos.x, eye_height + 0.5, player_pos.y)
}

fn follow_position(player_pos: Vec2, yaw: f32, distance: f32, height: f32) -> Vec3 {
    let back = -forward_vector(yaw) * distance;
    Vec3::new(player_pos.x + back.x, height, player_pos.y + back.y)
}

/// Longest unobstructed follow distance up to `max_distance`.
///
/// Marches backward from the player in fixed steps; at each step the ray
/// center and two lateral samples are tested so the camera cannot slip past a
/// wall corner.
pub fn clear_distance(
    field: &CollisionField,
    player_pos: Vec2,
    yaw: f32,
    max_distance: f32,
    tuning: &Tuning,
) -> f32 {
    let back = -forward_vector(yaw);
    let side = right_vector(yaw) * tuning.camera_sample_side;
    let thickness = tuning.camera_wall_thickness;
    let step = tuning.camera_sample_step;

    let mut d = 0.0;
    while d <= max_distance {
        let sample = player_pos + back * d;
        if field.wall_at(sample, thickness)
            || field.wall_at(sample - side, thickness)
            || field.wall_at(sample + side, thickness)
        {
            return (d - step).max(tuning.camera_min_distance);
        }
        d += step;
    }
    max_distance
}
