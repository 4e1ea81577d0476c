//! Fixed timestep simulation tick
//!
//! One ordered pass per tick: timers and phase bookkeeping, player rotation
//! and translation, collision, win check, route refresh, item collection,
//! pursuer update, vitals, camera.

use glam::Vec2;

use super::autopilot;
use super::collision::CollisionField;
use super::items::ItemKind;
use super::path::Search;
use super::player::{MoveIntent, MoveOutcome};
use super::pursuer::PursuerEvent;
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::{Countdown, HintKind};
use crate::consts::AGENT_HEIGHT;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub sprint: bool,
    /// Analog stick; x = turn (right positive), y = forward (up positive)
    pub analog: Vec2,
    /// New viewport aspect ratio (width / height) after a resize
    pub viewport_aspect: Option<f32>,
    /// Hint overlay request
    pub activate_hint: Option<HintKind>,
    /// Idle/demo mode - the autopilot walks the guidance route
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    if let Some(aspect) = input.viewport_aspect {
        state.set_aspect(aspect);
    }

    let input = if input.idle_mode {
        autopilot::steer(state, input, dt)
    } else {
        *input
    };

    match state.phase {
        GamePhase::GameOver => {}
        GamePhase::Intro { mut timer } => {
            let done = timer.tick(dt);
            let duration = state.tuning.intro_duration;
            let t = if duration > 0.0 {
                1.0 - timer.remaining() / duration
            } else {
                1.0
            };
            let stage = &mut state.stage;
            let field = CollisionField::new(&stage.maze, state.tuning.cell_size);
            stage.camera.sweep(
                &field,
                stage.player.pos,
                stage.player.yaw,
                AGENT_HEIGHT,
                &state.tuning,
                t,
            );
            state.phase = if done {
                log::debug!("Stage {} intro finished", stage.number);
                GamePhase::Playing
            } else {
                GamePhase::Intro { timer }
            };
        }
        GamePhase::Victory { mut timer } => {
            if timer.tick(dt) {
                state.advance_stage();
            } else {
                state.phase = GamePhase::Victory { timer };
                follow_camera(state, dt);
            }
        }
        GamePhase::Playing => play(state, &input, dt),
    }
}

fn play(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time += dt;

    // Timers
    if state.hints.tick(dt) {
        state.events.push(GameEvent::HintExpired);
    }
    state.boost.tick(dt);
    if let Some(kind) = input.activate_hint {
        state.activate_hint(kind);
    }

    let boosted = state.is_boosted();
    let speed_multiplier = if boosted || input.sprint {
        state.tuning.sprint_multiplier
    } else {
        1.0
    };
    let intent = MoveIntent {
        forward: input.forward,
        back: input.back,
        turn_left: input.turn_left,
        turn_right: input.turn_right,
        analog: input.analog,
        speed_multiplier,
    };

    let GameState {
        tuning,
        stage,
        phase,
        vitals,
        hints,
        boost,
        events,
        rng,
        time,
        ..
    } = state;
    let tuning = &*tuning;
    let now = *time;
    let field = CollisionField::new(&stage.maze, tuning.cell_size);
    let player = &mut stage.player;

    // Rotation, translation, collision
    player.rotate(&intent, tuning, dt);
    let displacement = player.desired_move(&intent, tuning, dt);
    if player.translate(displacement, &field, tuning) == MoveOutcome::Blocked {
        events.push(GameEvent::Collision);
    }

    // Win
    if player.cell == stage.maze.exit() {
        log::info!("Stage {} cleared in {:.1}s", stage.number, now);
        events.push(GameEvent::Won {
            stage: stage.number,
        });
        *phase = GamePhase::Victory {
            timer: Countdown::start(tuning.victory_duration),
        };
        stage.camera.follow(&field, player.pos, player.yaw, AGENT_HEIGHT, tuning, dt);
        return;
    }

    // Live guidance
    if player.cell != stage.route_from {
        stage.route = Search::AStar.solve(&stage.maze, player.cell, stage.maze.exit());
        stage.route_from = player.cell;
    }

    // Items
    for item in player.collect_items(&mut stage.items, &field, tuning) {
        match item.kind {
            ItemKind::Hint => hints.charges += 1,
            ItemKind::Wing => *boost = Countdown::start(tuning.wing_duration),
            ItemKind::Health => vitals.heal(tuning.heal_amount),
        }
        log::debug!("Collected {:?} #{}", item.kind, item.id);
        events.push(GameEvent::ItemCollected {
            id: item.id,
            kind: item.kind,
        });
    }

    // Pursuer
    let snapshot = player.snapshot();
    match stage
        .pursuer
        .update(&snapshot, &field, tuning, now, dt, rng)
    {
        Some(PursuerEvent::Detected) => events.push(GameEvent::PursuerDetected),
        Some(PursuerEvent::Caught) => {
            vitals.damage(tuning.catch_damage);
            events.push(GameEvent::Caught);
        }
        None => {}
    }

    // Vitals
    if input.sprint && !boosted {
        vitals.sprint(dt, tuning.sprint_drain_interval, tuning.sprint_drain);
    } else {
        vitals.rest();
    }
    if vitals.is_depleted() {
        log::info!("Game over on stage {}", stage.number);
        *phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    }

    // Camera
    stage.camera.follow(&field, player.pos, player.yaw, AGENT_HEIGHT, tuning, dt);
}

fn follow_camera(state: &mut GameState, dt: f32) {
    let stage = &mut state.stage;
    let field = CollisionField::new(&stage.maze, state.tuning.cell_size);
    stage.camera.follow(
        &field,
        stage.player.pos,
        stage.player.yaw,
        AGENT_HEIGHT,
        &state.tuning,
        dt,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::items::Item;
    use crate::sim::maze::GridPos;
    use crate::sim::pursuer::PursuerMode;
    use crate::tuning::Tuning;

    /// Skip the intro and keep the pursuer out of the way
    fn playing(seed: u64) -> GameState {
        let mut tuning = Tuning::default();
        tuning.detection_radius = 0.0;
        let mut state = GameState::new(seed, 1, tuning);
        state.phase = GamePhase::Playing;
        state
    }

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    #[test]
    fn test_intro_hands_over_to_playing() {
        let mut state = GameState::new(12345, 1, Tuning::default());
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        let start = state.stage.player.pos;
        let intro_ticks = (state.tuning.intro_duration / SIM_DT).ceil() as usize;
        for _ in 0..intro_ticks - 1 {
            tick(&mut state, &input, SIM_DT);
            assert!(matches!(state.phase, GamePhase::Intro { .. }));
        }
        // Movement input is ignored during the intro
        assert_eq!(state.stage.player.pos, start);
        for _ in 0..2 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_zero_intro_plays_after_first_tick() {
        let mut tuning = Tuning::default();
        tuning.intro_duration = 0.0;
        let mut state = GameState::new(12, 1, tuning);
        assert!(matches!(state.phase, GamePhase::Intro { .. }));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_zero_victory_advances_next_tick() {
        let mut state = playing(13);
        state.tuning.victory_duration = 0.0;
        let exit = state.stage.maze.exit();
        let frame = CollisionField::new(&state.stage.maze, state.tuning.cell_size).frame();
        state.stage.player.pos = frame.cell_center(exit);
        state.stage.player.cell = exit;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(state.phase, GamePhase::Victory { .. }));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.contains(&GameEvent::StageAdvanced { stage: 2 }));
        assert_eq!(state.stage.number, 2);
    }

    #[test]
    fn test_one_collision_event_per_blocked_tick() {
        let mut state = playing(1);
        // Facing -z from the start cell: the outer wall is ahead
        let input = TickInput {
            forward: true,
            ..Default::default()
        };
        // Walk up to the wall
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        let pos = state.stage.player.pos;

        let mut collisions = 0;
        for _ in 0..3 {
            tick(&mut state, &input, SIM_DT);
            collisions += count(&state.events, GameEvent::Collision);
            assert_eq!(state.stage.player.pos, pos);
        }
        assert_eq!(collisions, 3);

        // No attempted move, no event
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(count(&state.events, GameEvent::Collision), 0);
    }

    #[test]
    fn test_solution_replay_never_collides() {
        let state = playing(77);
        let stage = &state.stage;
        let field = CollisionField::new(&stage.maze, state.tuning.cell_size);
        let frame = field.frame();
        let radius = state.tuning.player_radius;

        let steps = stage.solution.len() - 1;
        assert!((1..=24).contains(&steps));
        for pair in stage.solution.windows(2) {
            let a = frame.cell_center(pair[0]);
            let b = frame.cell_center(pair[1]);
            for i in 0..=20 {
                let p = a.lerp(b, i as f32 / 20.0);
                assert!(!field.collides(p, radius), "collision at {p:?}");
            }
        }
    }

    #[test]
    fn test_item_collection_effects() {
        let mut state = playing(3);
        let here = state.stage.player.cell;
        let pos = CollisionField::new(&state.stage.maze, state.tuning.cell_size)
            .frame()
            .cell_center(here);
        state.vitals.damage(50.0);
        state.stage.items = vec![
            Item {
                id: 90,
                kind: ItemKind::Hint,
                cell: here,
            },
            Item {
                id: 91,
                kind: ItemKind::Wing,
                cell: here,
            },
            Item {
                id: 92,
                kind: ItemKind::Health,
                cell: here,
            },
        ];
        assert_eq!(state.stage.player.pos, pos);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.stage.items.is_empty());
        assert_eq!(state.hints.charges, state.tuning.starting_hints + 1);
        assert!(state.is_boosted());
        assert_eq!(state.vitals.health, 70.0);
        let collected = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ItemCollected { .. }))
            .count();
        assert_eq!(collected, 3);

        // Nothing left to collect a second time
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ItemCollected { .. }))
        );
    }

    #[test]
    fn test_wing_restarts_without_compounding() {
        let mut state = playing(4);
        let here = state.stage.player.cell;
        state.stage.items = vec![Item {
            id: 1,
            kind: ItemKind::Wing,
            cell: here,
        }];
        tick(&mut state, &TickInput::default(), SIM_DT);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        state.stage.items = vec![Item {
            id: 2,
            kind: ItemKind::Wing,
            cell: here,
        }];
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!((state.boost.remaining() - state.tuning.wing_duration).abs() < 1e-5);
    }

    #[test]
    fn test_sprint_drains_health_to_game_over() {
        let mut state = playing(5);
        state.vitals.health = 10.0;
        // Sprint held while spinning in place still drains
        let spin = TickInput {
            turn_left: true,
            sprint: true,
            ..Default::default()
        };
        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 600 {
            tick(&mut state, &spin, SIM_DT);
            ticks += 1;
        }
        // Two drains of 5, one per half second
        assert!((55..=65).contains(&ticks), "game over after {ticks} ticks");
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
        assert_eq!(state.vitals.health, 0.0);

        // Game over is terminal until retry
        let pos = state.stage.player.pos;
        let forward = TickInput {
            forward: true,
            ..Default::default()
        };
        tick(&mut state, &forward, SIM_DT);
        assert_eq!(state.stage.player.pos, pos);
        state.retry();
        assert!(matches!(state.phase, GamePhase::Intro { .. }));
    }

    #[test]
    fn test_catch_costs_health() {
        let mut state = playing(6);
        let player_cell = state.stage.player.cell;
        let center = CollisionField::new(&state.stage.maze, state.tuning.cell_size)
            .frame()
            .cell_center(player_cell);
        state.stage.pursuer.pos = center;
        state.stage.pursuer.mode = PursuerMode::Chasing;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.contains(&GameEvent::Caught));
        assert_eq!(state.vitals.health, 80.0);
        assert!(matches!(state.stage.pursuer.mode, PursuerMode::Stunned { .. }));
    }

    #[test]
    fn test_dead_end_pursuer_detects_and_catches_idle_player() {
        let mut checked = 0;
        for seed in 0..20 {
            let mut state = GameState::new(seed, 1, Tuning::default());
            let maze = &state.stage.maze;
            let clearance = state.tuning.pursuer_spawn_clearance;
            let has_den = maze.dead_ends().any(|cell| {
                cell.pos.manhattan(maze.start()) >= clearance
                    && cell.pos.manhattan(maze.exit()) > 1
            });
            if !has_den {
                continue;
            }

            let frame = CollisionField::new(maze, state.tuning.cell_size).frame();
            let den = frame.world_to_grid(state.stage.pursuer.pos);
            assert!(maze.get(den).is_some_and(|cell| cell.is_dead_end()));
            assert_eq!(state.stage.pursuer.mode, PursuerMode::Idle);

            // Stand still in the den's only open neighbor, well inside detection range
            let Some(next) = maze.open_neighbors(den).next() else {
                panic!("dead end {den:?} has no opening");
            };
            assert_ne!(next, maze.exit());
            state.stage.player.pos = frame.cell_center(next);
            state.stage.player.cell = next;
            state.phase = GamePhase::Playing;

            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.events.contains(&GameEvent::PursuerDetected));
            assert_eq!(state.stage.pursuer.mode, PursuerMode::Chasing);

            let mut caught = false;
            for _ in 0..300 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                if state.events.contains(&GameEvent::Caught) {
                    caught = true;
                    break;
                }
            }
            assert!(caught, "seed {seed}: pursuer never reached the player");
            assert_eq!(state.vitals.health, state.tuning.max_health - state.tuning.catch_damage);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_route_follows_player_cell() {
        let mut state = playing(8);
        let start_route = state.stage.route.clone();
        assert_eq!(start_route.first(), Some(&GridPos::new(0, 0)));

        // Teleport into the next solution cell and tick
        let next = state.stage.solution[1];
        let frame = CollisionField::new(&state.stage.maze, state.tuning.cell_size).frame();
        state.stage.player.pos = frame.cell_center(next);
        state.stage.player.cell = next;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.stage.route.first(), Some(&next));
        assert_eq!(state.stage.route.len() + 1, start_route.len());
    }

    #[test]
    fn test_victory_advances_stage() {
        let mut state = playing(9);
        let exit = state.stage.maze.exit();
        let frame = CollisionField::new(&state.stage.maze, state.tuning.cell_size).frame();
        state.stage.player.pos = frame.cell_center(exit);
        state.stage.player.cell = exit;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.contains(&GameEvent::Won { stage: 1 }));
        assert!(matches!(state.phase, GamePhase::Victory { .. }));

        let mut advanced = false;
        for _ in 0..(state.tuning.victory_duration / SIM_DT) as usize + 2 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.events.contains(&GameEvent::StageAdvanced { stage: 2 }) {
                advanced = true;
                break;
            }
        }
        assert!(advanced);
        assert_eq!(state.stage.number, 2);
        assert_eq!(state.stage.maze.size(), 6);
    }

    #[test]
    fn test_hint_expires_after_duration() {
        let mut state = playing(10);
        let request = TickInput {
            activate_hint: Some(HintKind::Trail),
            ..Default::default()
        };
        tick(&mut state, &request, SIM_DT);
        assert!(
            state
                .events
                .contains(&GameEvent::HintActivated { kind: HintKind::Trail })
        );

        let mut expired = false;
        for _ in 0..(state.tuning.hint_duration / SIM_DT) as usize + 2 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.events.contains(&GameEvent::HintExpired) {
                expired = true;
                break;
            }
        }
        assert!(expired);
        assert_eq!(state.hints.active(), None);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, 2, Tuning::default());
        let mut state2 = GameState::new(99999, 2, Tuning::default());

        let inputs = [
            TickInput {
                forward: true,
                ..Default::default()
            },
            TickInput {
                analog: Vec2::new(0.4, 0.8),
                sprint: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for i in 0..900 {
            let input = &inputs[(i / 50) % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
            assert_eq!(state1.events, state2.events);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
