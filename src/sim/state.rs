//! Game state and stage context
//!
//! Everything regenerated per stage lives in [`Stage`] and is rebuilt
//! wholesale; run-level state (clock, RNG, vitals, hints) lives in
//! [`GameState`].

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::CollisionField;
use super::items::{Item, ItemKind, spawn_items};
use super::maze::{GridPos, Maze};
use super::path::Search;
use super::player::{AgentSnapshot, Player};
use super::pursuer::{Pursuer, spawn_cell};
use super::timers::{Countdown, HintKind, HintResponse, HintState, Vitals};
use crate::consts::AGENT_HEIGHT;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Camera sweep before control is handed over
    Intro { timer: Countdown },
    /// Active gameplay
    Playing,
    /// Exit reached; the next stage starts when the timer runs out
    Victory { timer: Countdown },
    /// Health ran out
    GameOver,
}

/// Things that happened during one tick, for audio/visual collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player move was rejected by a wall
    Collision,
    ItemCollected { id: u32, kind: ItemKind },
    Won { stage: u32 },
    StageAdvanced { stage: u32 },
    PursuerDetected,
    Caught,
    GameOver,
    HintActivated { kind: HintKind },
    HintExpired,
}

/// Everything generated for one stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Stage number (1-based)
    pub number: u32,
    pub maze: Maze,
    /// Shortest start→exit path at generation time
    pub solution: Vec<GridPos>,
    /// Uncollected items (sorted by id)
    pub items: Vec<Item>,
    pub player: Player,
    pub pursuer: Pursuer,
    pub camera: Camera,
    /// Live guidance from the player's cell to the exit; empty suppresses guidance
    pub route: Vec<GridPos>,
    /// Cell the route was computed from
    pub route_from: GridPos,
}

impl Stage {
    pub fn build(number: u32, tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let size = tuning.maze_size(number);
        let maze = Maze::generate(size, rng);
        let start = maze.start();
        let exit = maze.exit();

        let field = CollisionField::new(&maze, tuning.cell_size);
        let player = Player::spawn(&field, start);
        let pursuer = Pursuer::spawn(&field, spawn_cell(&maze, tuning, rng));
        let mut items = spawn_items(&maze, tuning, rng);
        items.sort_by_key(|item| item.id);
        let camera = Camera::behind(player.pos, player.yaw, AGENT_HEIGHT, tuning);

        let solution = Search::BreadthFirst.solve(&maze, start, exit);
        let route = Search::AStar.solve(&maze, start, exit);

        log::info!(
            "Stage {} built: {}x{} maze, {} items, solution length {}",
            number,
            size,
            size,
            items.len(),
            solution.len()
        );

        Self {
            number,
            maze,
            solution,
            items,
            player,
            pursuer,
            camera,
            route,
            route_from: start,
        }
    }
}

/// Per-frame output for the renderer and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub stage: u32,
    pub phase: GamePhase,
    pub player: AgentSnapshot,
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub camera_fov_deg: f32,
    pub items: Vec<Item>,
    pub pursuer_pos: Vec2,
    pub pursuer_facing: f32,
    pub pursuer_chasing: bool,
    pub roaring: bool,
    pub health: f32,
    pub hint_charges: u32,
    pub active_hint: Option<HintKind>,
    pub boosted: bool,
    /// Guidance route, `None` when suppressed
    pub guidance: Option<Vec<GridPos>>,
}

/// Complete run state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub stage: Stage,
    pub phase: GamePhase,
    /// Simulation seconds since the stage was built
    pub time: f32,
    /// Simulation tick counter for the whole run
    pub time_ticks: u64,
    pub vitals: Vitals,
    pub hints: HintState,
    /// Wing speed boost
    pub boost: Countdown,
    /// Last known viewport aspect, reapplied to each new stage camera
    pub viewport_aspect: Option<f32>,
    /// Events raised during the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run at `stage` with the given seed
    pub fn new(seed: u64, stage: u32, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stage = Stage::build(stage.max(1), &tuning, &mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Intro {
                timer: Countdown::start(tuning.intro_duration),
            },
            time: 0.0,
            time_ticks: 0,
            vitals: Vitals::new(tuning.max_health),
            hints: HintState::new(tuning.starting_hints),
            boost: Countdown::default(),
            viewport_aspect: None,
            events: Vec::new(),
            stage,
            tuning,
        }
    }

    /// Rebuild the current stage from scratch
    pub fn retry(&mut self) {
        log::info!("Retrying stage {}", self.stage.number);
        self.rebuild(self.stage.number);
    }

    /// Move on to the next stage
    pub fn advance_stage(&mut self) {
        let next = self.stage.number + 1;
        log::info!("Advancing to stage {}", next);
        self.rebuild(next);
        self.events.push(GameEvent::StageAdvanced { stage: next });
    }

    fn rebuild(&mut self, number: u32) {
        self.stage = Stage::build(number, &self.tuning, &mut self.rng);
        if let Some(aspect) = self.viewport_aspect {
            self.stage.camera.set_aspect(aspect, &self.tuning);
        }
        self.phase = GamePhase::Intro {
            timer: Countdown::start(self.tuning.intro_duration),
        };
        self.time = 0.0;
        self.vitals = Vitals::new(self.tuning.max_health);
        self.hints = HintState::new(self.tuning.starting_hints);
        self.boost = Countdown::default();
    }

    /// Record a viewport resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.viewport_aspect = Some(aspect);
        self.stage.camera.set_aspect(aspect, &self.tuning);
    }

    /// Spend a hint charge on an overlay; only honoured while playing
    pub fn activate_hint(&mut self, kind: HintKind) -> HintResponse {
        if self.phase != GamePhase::Playing {
            return HintResponse::Ignored;
        }
        let response = self.hints.request(kind, self.tuning.hint_duration);
        match response {
            HintResponse::Activated => {
                log::debug!("Hint {:?} activated, {} left", kind, self.hints.charges);
                self.events.push(GameEvent::HintActivated { kind });
            }
            HintResponse::ToggledOff => self.events.push(GameEvent::HintExpired),
            HintResponse::Ignored => {}
        }
        response
    }

    pub fn is_boosted(&self) -> bool {
        self.boost.is_running()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let stage = &self.stage;
        FrameSnapshot {
            stage: stage.number,
            phase: self.phase,
            player: stage.player.snapshot(),
            camera_position: stage.camera.position,
            camera_look_at: stage.camera.look_at,
            camera_fov_deg: stage.camera.fov_deg,
            items: stage.items.clone(),
            pursuer_pos: stage.pursuer.pos,
            pursuer_facing: stage.pursuer.facing,
            pursuer_chasing: stage.pursuer.is_chasing(),
            roaring: stage.pursuer.is_roaring(),
            health: self.vitals.health,
            hint_charges: self.hints.charges,
            active_hint: self.hints.active(),
            boosted: self.is_boosted(),
            guidance: (!stage.route.is_empty()).then(|| stage.route.clone()),
        }
    }
}
