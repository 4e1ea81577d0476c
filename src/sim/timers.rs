//! Timer-driven effects layered over the tick loop
//!
//! All timers count simulation seconds, never wall-clock time. Re-activating
//! an active timer either no-ops or toggles off; durations never stack.

use serde::{Deserialize, Serialize};

/// A one-shot countdown in seconds.
///
/// A started countdown stays armed until the tick that brings it to zero, so
/// a zero-length countdown finishes on its first tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    armed: bool,
}

impl Countdown {
    pub fn start(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            armed: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.armed
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance; returns true on the tick the countdown reaches zero
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining == 0.0 {
            self.armed = false;
            return true;
        }
        false
    }
}

/// Guidance overlays a hint charge can unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    /// Top-down minimap
    Minimap,
    /// Pulled-back overhead camera
    ZoomOut,
    /// Arrows along the live route to the exit
    Trail,
}

/// Hint overlay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HintMode {
    Inactive,
    Active { kind: HintKind, timer: Countdown },
}

/// Result of a hint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintResponse {
    Activated,
    ToggledOff,
    Ignored,
}

/// Hint charges plus the active overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintState {
    pub charges: u32,
    pub mode: HintMode,
}

impl HintState {
    pub fn new(charges: u32) -> Self {
        Self {
            charges,
            mode: HintMode::Inactive,
        }
    }

    pub fn active(&self) -> Option<HintKind> {
        match self.mode {
            HintMode::Active { kind, .. } => Some(kind),
            HintMode::Inactive => None,
        }
    }

    /// Request an overlay.
    ///
    /// | mode              | request      | result                          |
    /// |-------------------|--------------|---------------------------------|
    /// | Inactive, charges | any          | Active, one charge spent        |
    /// | Inactive, none    | any          | unchanged                       |
    /// | Active(k)         | k            | Inactive, no refund             |
    /// | Active(k)         | other than k | unchanged                       |
    pub fn request(&mut self, kind: HintKind, duration: f32) -> HintResponse {
        match self.mode {
            HintMode::Inactive if self.charges > 0 => {
                self.charges -= 1;
                self.mode = HintMode::Active {
                    kind,
                    timer: Countdown::start(duration),
                };
                HintResponse::Activated
            }
            HintMode::Active { kind: active, .. } if active == kind => {
                self.mode = HintMode::Inactive;
                HintResponse::ToggledOff
            }
            _ => HintResponse::Ignored,
        }
    }

    /// Advance the active overlay; returns true when it expires this tick
    pub fn tick(&mut self, dt: f32) -> bool {
        if let HintMode::Active { ref mut timer, .. } = self.mode {
            if timer.tick(dt) {
                self.mode = HintMode::Inactive;
                return true;
            }
        }
        false
    }
}

/// Player health and the sprint drain accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Sprint time not yet charged against health
    sprint_accum: f32,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            sprint_accum: 0.0,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Charge `drain` for every full `interval` of sprinting
    pub fn sprint(&mut self, dt: f32, interval: f32, drain: f32) {
        self.sprint_accum += dt;
        while self.sprint_accum >= interval {
            self.sprint_accum -= interval;
            self.damage(drain);
        }
    }

    /// Releasing sprint restarts the drain interval
    pub fn rest(&mut self) {
        self.sprint_accum = 0.0;
    }
}
