//! Player movement controller
//!
//! Turns discrete keys and the analog stick into a yaw change and a planar
//! move, then resolves the move atomically against the collision field: a
//! candidate position that collides is rejected outright (no sliding).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionField;
use super::items::Item;
use super::maze::GridPos;
use crate::tuning::Tuning;
use crate::{forward_vector, normalize_angle};

/// Movement intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Analog stick; x = turn (right positive), y = forward (up positive)
    pub analog: Vec2,
    /// Movement speed multiplier (sprint, wing boost)
    pub speed_multiplier: f32,
}

/// What happened to the attempted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No translation requested
    Idle,
    Moved,
    /// Candidate position collided; position unchanged
    Blocked,
}

/// Player pose published once per tick for other agents to read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub pos: Vec2,
    pub yaw: f32,
}

/// The player agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Yaw in radians; 0 faces -z
    pub yaw: f32,
    pub cell: GridPos,
}

impl Player {
    /// Player at the center of `cell`, facing -z
    pub fn spawn(field: &CollisionField, cell: GridPos) -> Self {
        Self {
            pos: field.frame().cell_center(cell),
            yaw: 0.0,
            cell,
        }
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            pos: self.pos,
            yaw: self.yaw,
        }
    }

    /// Integrate rotation from turn keys and the analog x axis
    pub fn rotate(&mut self, intent: &MoveIntent, tuning: &Tuning, dt: f32) {
        let mut turn = 0.0;
        if intent.turn_left {
            turn += 1.0;
        }
        if intent.turn_right {
            turn -= 1.0;
        }
        turn -= intent.analog.x.clamp(-1.0, 1.0);

        if turn != 0.0 {
            self.yaw = normalize_angle(self.yaw + turn * tuning.rotation_speed * dt);
        }
    }

    /// Planar displacement requested this tick (before collision)
    pub fn desired_move(&self, intent: &MoveIntent, tuning: &Tuning, dt: f32) -> Vec2 {
        let forward = forward_vector(self.yaw);
        let mut axis = 0.0;
        if intent.forward {
            axis += 1.0;
        }
        if intent.back {
            axis -= 1.0;
        }
        let analog_y = intent.analog.y.clamp(-1.0, 1.0);
        if analog_y.abs() > tuning.analog_dead_zone {
            axis += analog_y;
        }

        let combined = forward * axis;
        if combined.length_squared() <= f32::EPSILON {
            return Vec2::ZERO;
        }
        combined.normalize() * tuning.player_speed * intent.speed_multiplier.max(0.0) * dt
    }

    /// Move atomically: all of the displacement or none of it
    pub fn translate(
        &mut self,
        displacement: Vec2,
        field: &CollisionField,
        tuning: &Tuning,
    ) -> MoveOutcome {
        if displacement == Vec2::ZERO {
            return MoveOutcome::Idle;
        }

        let candidate = self.pos + displacement;
        if field.collides(candidate, tuning.player_radius) {
            return MoveOutcome::Blocked;
        }

        self.pos = candidate;
        if let Some(cell) = field.cell_at(candidate) {
            self.cell = cell;
        }
        MoveOutcome::Moved
    }

    /// Items within pickup range, removed from `items` immediately.
    ///
    /// Removal happens against the live list, so an item can be collected at
    /// most once.
    pub fn collect_items(
        &self,
        items: &mut Vec<Item>,
        field: &CollisionField,
        tuning: &Tuning,
    ) -> Vec<Item> {
        let frame = field.frame();
        let mut collected = Vec::new();
        items.retain(|item| {
            let in_range = self.pos.distance(frame.cell_center(item.cell)) < tuning.pickup_radius;
            if in_range {
                collected.push(item.clone());
            }
            !in_range
        });
        collected
    }
}
