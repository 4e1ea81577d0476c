//! Maze Chase - headless native driver
//!
//! Runs the simulation in idle/demo mode at a fixed frame rate, logging game
//! events and saving stage progress whenever a stage is cleared.
//!
//! Usage: `maze-chase [SEED] [SECONDS]`
//!
//! Environment:
//! - `MAZE_TUNING`: path to a JSON tuning file
//! - `MAZE_PROGRESS`: progress file (default `maze_progress.json`)
//! - `RUST_LOG`: log filter (e.g. `info`, `maze_chase=debug`)

use std::time::{SystemTime, UNIX_EPOCH};

use maze_chase::consts::{MAX_SUBSTEPS, SIM_DT};
use maze_chase::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use maze_chase::{FileStore, Progress, ProgressStore, Tuning};

/// Default headless run length
const DEFAULT_SECONDS: f32 = 120.0;

/// Fixed-step accumulator between frame time and simulation ticks
struct Driver {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Driver {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
        }
    }

    /// Advance by one frame; returns the events raised by every substep
    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            events.extend(self.state.events.iter().copied());
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.viewport_aspect = None;
            self.input.activate_hint = None;
        }
        events
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let tuning = match std::env::var("MAZE_TUNING") {
        Ok(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }),
        Err(_) => Tuning::default(),
    };

    let store = FileStore::new(
        std::env::var("MAZE_PROGRESS").unwrap_or_else(|_| "maze_progress.json".to_string()),
    );
    let progress = store.load().unwrap_or_else(|e| {
        log::warn!("Could not read progress from {}: {}", store.path().display(), e);
        Progress::default()
    });

    log::info!(
        "Maze Chase (native) starting: seed {}, stage {}, {:.0}s",
        seed,
        progress.stage,
        seconds
    );

    let mut driver = Driver::new(GameState::new(seed, progress.stage, tuning));
    driver.input.viewport_aspect = Some(16.0 / 9.0);

    let frames = (seconds / SIM_DT).ceil() as u64;
    for _ in 0..frames {
        for event in driver.update(SIM_DT) {
            match event {
                GameEvent::StageAdvanced { stage } => {
                    if let Err(e) = store.save(&Progress::new(stage)) {
                        log::warn!("Could not save progress: {}", e);
                    }
                }
                GameEvent::Collision => log::trace!("Bump"),
                other => log::info!("{:?}", other),
            }
        }
        if driver.state.phase == GamePhase::GameOver {
            driver.state.retry();
        }
    }

    let snapshot = driver.state.snapshot();
    log::info!(
        "Stopped on stage {} with {:.0} health after {} ticks",
        snapshot.stage,
        snapshot.health,
        driver.state.time_ticks
    );
    match serde_json::to_string(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize final frame: {}", e),
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
