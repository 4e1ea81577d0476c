//! Pursuer AI
//!
//! A single chaser spawned in a dead end. It idles until the player comes
//! within the detection radius, then chases by pure pursuit for the rest of
//! the stage, sliding along walls axis by axis and taking a random step when
//! fully stuck. A catch stuns it briefly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::CollisionField;
use super::maze::{GridPos, Maze};
use super::player::AgentSnapshot;
use super::timers::Countdown;
use crate::tuning::Tuning;
use crate::yaw_toward;

/// Behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuerMode {
    /// Waiting in its dead end
    Idle,
    /// Pursuing the player; never reverts to Idle this stage
    Chasing,
    /// Frozen after a catch
    Stunned { timer: Countdown },
}

/// Inputs that drive [`PursuerMode`] transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    PlayerDetected,
    Caught { stun: f32 },
    StunElapsed,
}

impl PursuerMode {
    /// Transition table
    ///
    /// | from     | trigger        | to       |
    /// |----------|----------------|----------|
    /// | Idle     | PlayerDetected | Chasing  |
    /// | Chasing  | Caught         | Stunned  |
    /// | Stunned  | StunElapsed    | Chasing  |
    ///
    /// Every other pair leaves the mode unchanged.
    pub fn on(self, trigger: Trigger) -> Self {
        match (self, trigger) {
            (PursuerMode::Idle, Trigger::PlayerDetected) => PursuerMode::Chasing,
            (PursuerMode::Chasing, Trigger::Caught { stun }) => PursuerMode::Stunned {
                timer: Countdown::start(stun),
            },
            (PursuerMode::Stunned { .. }, Trigger::StunElapsed) => PursuerMode::Chasing,
            (mode, _) => mode,
        }
    }
}

/// Pursuer notifications for the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuerEvent {
    Detected,
    Caught,
}

/// The chasing agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub pos: Vec2,
    /// Cosmetic yaw toward the player
    pub facing: f32,
    pub mode: PursuerMode,
    /// Sim time of the last catch
    pub last_catch: Option<f32>,
    /// Detection cue
    pub roar: Countdown,
}

impl Pursuer {
    pub fn spawn(field: &CollisionField, cell: GridPos) -> Self {
        Self {
            pos: field.frame().cell_center(cell),
            facing: 0.0,
            mode: PursuerMode::Idle,
            last_catch: None,
            roar: Countdown::default(),
        }
    }

    /// Detection latched at some point this stage
    pub fn is_chasing(&self) -> bool {
        !matches!(self.mode, PursuerMode::Idle)
    }

    pub fn is_roaring(&self) -> bool {
        self.roar.is_running()
    }

    /// Advance one tick against this tick's player snapshot.
    ///
    /// `now` is the stage's simulation clock in seconds.
    pub fn update(
        &mut self,
        player: &AgentSnapshot,
        field: &CollisionField,
        tuning: &Tuning,
        now: f32,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Option<PursuerEvent> {
        self.roar.tick(dt);
        let to_player = player.pos - self.pos;
        if to_player.length_squared() > f32::EPSILON {
            self.facing = yaw_toward(to_player);
        }

        match self.mode {
            PursuerMode::Idle => {
                if to_player.length() < tuning.detection_radius {
                    self.mode = self.mode.on(Trigger::PlayerDetected);
                    self.roar = Countdown::start(tuning.roar_duration);
                    log::debug!("Pursuer detected player at {:.2}", to_player.length());
                    return Some(PursuerEvent::Detected);
                }
                None
            }
            PursuerMode::Stunned { mut timer } => {
                if timer.tick(dt) {
                    self.mode = self.mode.on(Trigger::StunElapsed);
                    log::debug!("Pursuer recovered");
                } else {
                    self.mode = PursuerMode::Stunned { timer };
                }
                None
            }
            PursuerMode::Chasing => {
                self.chase(player.pos, field, tuning, dt, rng);
                self.try_catch(player.pos, tuning, now)
            }
        }
    }

    fn chase(
        &mut self,
        target: Vec2,
        field: &CollisionField,
        tuning: &Tuning,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        let dir = (target - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let step = tuning.pursuer_speed * dt;
        let radius = tuning.pursuer_radius;

        let direct = self.pos + dir * step;
        if !field.collides(direct, radius) {
            self.pos = direct;
            return;
        }

        // Axis-separated slide, larger component first
        let along_x = Vec2::new(dir.x, 0.0);
        let along_z = Vec2::new(0.0, dir.y);
        let axes = if dir.x.abs() >= dir.y.abs() {
            [along_x, along_z]
        } else {
            [along_z, along_x]
        };
        for axis in axes {
            if axis == Vec2::ZERO {
                continue;
            }
            let candidate = self.pos + axis * step;
            if !field.collides(candidate, radius) {
                self.pos = candidate;
                return;
            }
        }

        // Stalled
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let candidate = self.pos + Vec2::from_angle(angle) * step;
        if !field.collides(candidate, radius) {
            self.pos = candidate;
        }
    }

    fn try_catch(&mut self, target: Vec2, tuning: &Tuning, now: f32) -> Option<PursuerEvent> {
        if self.pos.distance(target) >= tuning.catch_radius {
            return None;
        }
        let cooled = self
            .last_catch
            .is_none_or(|last| now - last >= tuning.catch_cooldown);
        if !cooled {
            return None;
        }
        self.last_catch = Some(now);
        self.mode = self.mode.on(Trigger::Caught {
            stun: tuning.stun_duration,
        });
        log::debug!("Pursuer caught player at t={:.2}", now);
        Some(PursuerEvent::Caught)
    }
}

/// Pick the pursuer's spawn cell.
///
/// Prefers a random dead end at least `pursuer_spawn_clearance` steps from the
/// start and not adjacent to the exit; falls back to any cell outside those
/// zones, then to the cell farthest from the start.
pub fn spawn_cell(maze: &Maze, tuning: &Tuning, rng: &mut impl Rng) -> GridPos {
    let start = maze.start();
    let exit = maze.exit();
    let allowed =
        |pos: GridPos| pos.manhattan(start) >= tuning.pursuer_spawn_clearance && pos.manhattan(exit) > 1;

    let dead_ends: Vec<GridPos> = maze
        .dead_ends()
        .map(|cell| cell.pos)
        .filter(|&pos| allowed(pos))
        .collect();
    if !dead_ends.is_empty() {
        return dead_ends[rng.random_range(0..dead_ends.len())];
    }

    let open: Vec<GridPos> = maze.cells().map(|cell| cell.pos).filter(|&pos| allowed(pos)).collect();
    if !open.is_empty() {
        log::debug!("No dead end outside the spawn exclusion zones");
        return open[rng.random_range(0..open.len())];
    }

    maze.cells()
        .map(|cell| cell.pos)
        .max_by_key(|pos| pos.manhattan(start))
        .unwrap_or(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::maze::Side;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Maze with every interior wall removed
    fn open_maze(size: i32) -> Maze {
        let mut maze = Maze::walled(size as usize);
        for y in 0..size {
            for x in 0..size {
                if x + 1 < size {
                    maze.carve(GridPos::new(x, y), Side::Right);
                }
                if y + 1 < size {
                    maze.carve(GridPos::new(x, y), Side::Bottom);
                }
            }
        }
        maze
    }

    fn snapshot_at(field: &CollisionField, cell: GridPos) -> AgentSnapshot {
        AgentSnapshot {
            pos: field.frame().cell_center(cell),
            yaw: 0.0,
        }
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(PursuerMode::Idle.on(Trigger::PlayerDetected), PursuerMode::Chasing);
        assert_eq!(PursuerMode::Idle.on(Trigger::StunElapsed), PursuerMode::Idle);
        assert_eq!(PursuerMode::Idle.on(Trigger::Caught { stun: 1.0 }), PursuerMode::Idle);
        assert!(matches!(
            PursuerMode::Chasing.on(Trigger::Caught { stun: 1.0 }),
            PursuerMode::Stunned { .. }
        ));
        let stunned = PursuerMode::Stunned {
            timer: Countdown::start(1.0),
        };
        assert_eq!(stunned.on(Trigger::StunElapsed), PursuerMode::Chasing);
        assert_eq!(stunned.on(Trigger::PlayerDetected), stunned);
    }

    #[test]
    fn test_spawn_cell_prefers_distant_dead_end() {
        let tuning = Tuning::default();
        for seed in 0..30 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = Maze::generate(7, &mut rng);
            let cell = spawn_cell(&maze, &tuning, &mut rng);
            assert!(cell.manhattan(maze.start()) >= tuning.pursuer_spawn_clearance);
            assert!(cell.manhattan(maze.exit()) > 1);
            if maze.dead_ends().any(|c| {
                c.pos.manhattan(maze.start()) >= tuning.pursuer_spawn_clearance
                    && c.pos.manhattan(maze.exit()) > 1
            }) {
                assert!(maze.get(cell).is_some_and(|c| c.is_dead_end()));
            }
        }
    }

    #[test]
    fn test_spawn_cell_falls_back_without_dead_ends() {
        let tuning = Tuning::default();
        let maze = open_maze(5);
        assert_eq!(maze.dead_ends().count(), 0);
        let cell = spawn_cell(&maze, &tuning, &mut Pcg32::seed_from_u64(3));
        assert!(maze.contains(cell));
        assert!(cell.manhattan(maze.start()) >= tuning.pursuer_spawn_clearance);
    }

    #[test]
    fn test_detects_within_one_tick_and_catches() {
        let tuning = Tuning::default();
        let maze = open_maze(5);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(3, 3));
        // About 4.47 units away
        let player = snapshot_at(&field, GridPos::new(2, 1));
        assert!(pursuer.pos.distance(player.pos) < tuning.detection_radius);

        let event = pursuer.update(&player, &field, &tuning, 0.0, SIM_DT, &mut rng);
        assert_eq!(event, Some(PursuerEvent::Detected));
        assert_eq!(pursuer.mode, PursuerMode::Chasing);
        assert!(pursuer.is_roaring());

        let mut caught = false;
        for i in 1..600 {
            let now = i as f32 * SIM_DT;
            if pursuer.update(&player, &field, &tuning, now, SIM_DT, &mut rng)
                == Some(PursuerEvent::Caught)
            {
                caught = true;
                break;
            }
        }
        assert!(caught);
        assert!(pursuer.pos.distance(player.pos) < tuning.catch_radius);
        assert!(matches!(pursuer.mode, PursuerMode::Stunned { .. }));
    }

    #[test]
    fn test_detection_latch_survives_distance() {
        let tuning = Tuning::default();
        let maze = open_maze(8);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(4, 4));

        let near = snapshot_at(&field, GridPos::new(4, 3));
        pursuer.update(&near, &field, &tuning, 0.0, SIM_DT, &mut rng);
        assert!(pursuer.is_chasing());

        let far = snapshot_at(&field, GridPos::new(0, 0));
        for i in 1..120 {
            pursuer.update(&far, &field, &tuning, i as f32 * SIM_DT, SIM_DT, &mut rng);
            assert!(pursuer.is_chasing());
            assert_ne!(pursuer.mode, PursuerMode::Idle);
        }
    }

    #[test]
    fn test_stays_idle_out_of_range() {
        let tuning = Tuning::default();
        let maze = open_maze(8);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(7, 7));
        let start = pursuer.pos;
        let player = snapshot_at(&field, GridPos::new(0, 0));
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..60 {
            assert_eq!(pursuer.update(&player, &field, &tuning, 0.0, SIM_DT, &mut rng), None);
        }
        assert_eq!(pursuer.mode, PursuerMode::Idle);
        assert_eq!(pursuer.pos, start);
    }

    #[test]
    fn test_catch_cooldown() {
        let tuning = Tuning::default();
        let maze = open_maze(5);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(2, 2));
        pursuer.mode = PursuerMode::Chasing;
        // Player standing on the pursuer
        let player = snapshot_at(&field, GridPos::new(2, 2));

        let mut catches = Vec::new();
        let mut now = 0.0;
        for _ in 0..(5.0 / SIM_DT) as usize {
            if pursuer.update(&player, &field, &tuning, now, SIM_DT, &mut rng)
                == Some(PursuerEvent::Caught)
            {
                catches.push(now);
            }
            now += SIM_DT;
        }
        assert!(catches.len() >= 2);
        for pair in catches.windows(2) {
            assert!(pair[1] - pair[0] >= tuning.catch_cooldown - 1e-4);
        }
    }

    #[test]
    fn test_zero_stun_resumes_chase_next_tick() {
        let mut tuning = Tuning::default();
        tuning.stun_duration = 0.0;
        let maze = open_maze(5);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(2, 2));
        pursuer.mode = PursuerMode::Chasing;
        let player = snapshot_at(&field, GridPos::new(2, 2));

        assert_eq!(
            pursuer.update(&player, &field, &tuning, 0.0, SIM_DT, &mut rng),
            Some(PursuerEvent::Caught)
        );
        assert!(matches!(pursuer.mode, PursuerMode::Stunned { .. }));
        pursuer.update(&player, &field, &tuning, SIM_DT, SIM_DT, &mut rng);
        assert_eq!(pursuer.mode, PursuerMode::Chasing);
    }

    #[test]
    fn test_slides_along_wall() {
        let tuning = Tuning::default();
        // 3x3 with the top row open; the rest walled off
        let mut maze = Maze::walled(3);
        maze.carve(GridPos::new(0, 0), Side::Right);
        maze.carve(GridPos::new(1, 0), Side::Right);
        let field = CollisionField::new(&maze, tuning.cell_size);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut pursuer = Pursuer::spawn(&field, GridPos::new(2, 0));
        pursuer.mode = PursuerMode::Chasing;
        // Target below-left, behind the wall: only the x component is free
        let player = snapshot_at(&field, GridPos::new(0, 2));
        let start = pursuer.pos;

        for i in 0..120 {
            pursuer.update(&player, &field, &tuning, i as f32 * SIM_DT, SIM_DT, &mut rng);
        }
        assert!(pursuer.pos.x < start.x - 1.0);
        assert!(!field.collides(pursuer.pos, tuning.pursuer_radius));
    }
}
