//! Idle/demo mode steering
//!
//! Walks the live guidance route: line up with the current cell's center
//! line, turn toward the next cell, then walk. Produces ordinary
//! [`TickInput`]s so the demo exercises exactly the player's code path.

use glam::Vec2;

use super::collision::CollisionField;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::{forward_vector, normalize_angle, yaw_toward};

/// Max sideways drift from the center line before re-centering
const LANE_TOLERANCE: f32 = 0.15;
/// Facing error below which the autopilot walks
const HEADING_TOLERANCE: f32 = 0.1;

/// Replace movement in `input` with autopilot steering
pub fn steer(state: &GameState, input: &TickInput, dt: f32) -> TickInput {
    let mut out = TickInput {
        viewport_aspect: input.viewport_aspect,
        activate_hint: input.activate_hint,
        ..Default::default()
    };
    if state.phase != GamePhase::Playing {
        return out;
    }

    let stage = &state.stage;
    let Some(target) = waypoint(state) else {
        return out;
    };
    let player = &stage.player;
    let to_target = target - player.pos;
    if to_target.length_squared() <= f32::EPSILON {
        return out;
    }

    let diff = normalize_angle(yaw_toward(to_target) - player.yaw);
    let max_turn = state.tuning.rotation_speed * dt;
    if max_turn > 0.0 {
        // Positive analog x turns right (decreasing yaw)
        out.analog.x = (-diff / max_turn).clamp(-1.0, 1.0);
    }
    out.forward = diff.abs() < HEADING_TOLERANCE
        && forward_vector(player.yaw).dot(to_target) > 0.0;
    out
}

/// Next point to head for, or `None` when there is no route
fn waypoint(state: &GameState) -> Option<Vec2> {
    let stage = &state.stage;
    let [current, next, ..] = stage.route.as_slice() else {
        return None;
    };
    let frame = CollisionField::new(&stage.maze, state.tuning.cell_size).frame();
    let here = frame.cell_center(*current);
    let there = frame.cell_center(*next);

    let lane = (there - here).normalize_or_zero();
    let drift = (stage.player.pos - here).perp_dot(lane).abs();
    if drift > LANE_TOLERANCE {
        Some(here)
    } else {
        Some(there)
    }
}
