//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by item ID, by cell)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod items;
pub mod maze;
pub mod path;
pub mod player;
pub mod pursuer;
pub mod state;
pub mod tick;
pub mod timers;

pub use camera::{Camera, Orientation, clear_distance};
pub use collision::CollisionField;
pub use items::{Item, ItemKind, spawn_items};
pub use maze::{Cell, GridFrame, GridPos, Maze, Side, Walls};
pub use path::{Search, astar, bfs, is_contiguous};
pub use player::{AgentSnapshot, MoveIntent, MoveOutcome, Player};
pub use pursuer::{Pursuer, PursuerEvent, PursuerMode, Trigger, spawn_cell};
pub use state::{FrameSnapshot, GameEvent, GamePhase, GameState, Stage};
pub use tick::{TickInput, tick};
pub use timers::{Countdown, HintKind, HintMode, HintResponse, HintState, Vitals};
