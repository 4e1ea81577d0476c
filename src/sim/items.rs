//! Pickup placement
//!
//! Each stage scatters hint charges, an occasional wing and a little health
//! over the maze by rejection sampling. The start corner and the exit never
//! receive items, and no two items share a cell.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::maze::{GridPos, Maze};
use crate::tuning::Tuning;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// +1 hint charge
    Hint,
    /// Temporary speed boost without health drain
    Wing,
    /// Restores health
    Health,
}

/// A pickup sitting at a cell center
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub cell: GridPos,
}

/// Whether a cell may hold an item: not in the 2×2 start corner, not the exit
pub fn is_spawnable(maze: &Maze, cell: GridPos) -> bool {
    let in_start_corner = cell.x < 2 && cell.y < 2;
    maze.contains(cell) && !in_start_corner && cell != maze.exit()
}

/// Place this stage's items.
///
/// Each item gets at most `tuning.spawn_attempts` tries; when a tiny maze has
/// no free cells left the item is skipped and the stage gets fewer items.
pub fn spawn_items(maze: &Maze, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Item> {
    let mut wanted = vec![ItemKind::Hint; tuning.hint_item_count];
    if rng.random_bool(tuning.wing_spawn_chance.clamp(0.0, 1.0)) {
        wanted.push(ItemKind::Wing);
    }
    let low = tuning.health_items_min.min(tuning.health_items_max);
    let high = tuning.health_items_min.max(tuning.health_items_max);
    let health_count = rng.random_range(low..=high);
    wanted.extend(std::iter::repeat_n(ItemKind::Health, health_count));

    let n = maze.size() as i32;
    let mut taken: HashSet<GridPos> = HashSet::new();
    let mut items = Vec::with_capacity(wanted.len());
    let mut next_id = 1;

    for kind in wanted.iter().copied() {
        let mut placed = false;
        for _ in 0..tuning.spawn_attempts {
            let cell = GridPos::new(rng.random_range(0..n), rng.random_range(0..n));
            if !is_spawnable(maze, cell) || taken.contains(&cell) {
                continue;
            }
            taken.insert(cell);
            items.push(Item {
                id: next_id,
                kind,
                cell,
            });
            next_id += 1;
            placed = true;
            break;
        }
        if !placed {
            log::debug!("No free cell for {:?} after {} attempts", kind, tuning.spawn_attempts);
        }
    }

    if items.len() < wanted.len() {
        log::warn!(
            "Placed {} of {} items in {}x{} maze",
            items.len(),
            wanted.len(),
            maze.size(),
            maze.size()
        );
    }
    items
}
