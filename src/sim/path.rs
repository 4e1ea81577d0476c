//! Shortest paths through maze passages
//!
//! Two solvers share one contract: the ordered cells from `start` to `goal`
//! (both inclusive), each step crossing an open passage, or an empty path when
//! the goal is unreachable. A perfect maze is always connected, so an empty
//! path signals an internal inconsistency; callers hide guidance rather than
//! fail.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use super::maze::{GridPos, Maze};

/// Which search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// Breadth-first; static start→exit solution trail
    BreadthFirst,
    /// A* with Manhattan heuristic; live player→exit guidance
    AStar,
}

impl Search {
    pub fn solve(self, maze: &Maze, start: GridPos, goal: GridPos) -> Vec<GridPos> {
        let path = match self {
            Search::BreadthFirst => bfs(maze, start, goal),
            Search::AStar => astar(maze, start, goal),
        };
        if path.is_empty() {
            log::warn!(
                "{:?}: no path from {:?} to {:?} in {}x{} maze",
                self,
                start,
                goal,
                maze.size(),
                maze.size()
            );
        }
        path
    }
}

/// Breadth-first search
pub fn bfs(maze: &Maze, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    if !maze.contains(start) || !maze.contains(goal) {
        return Vec::new();
    }

    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    came_from.insert(start, start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }
        for next in maze.open_neighbors(current) {
            if let Entry::Vacant(e) = came_from.entry(next) {
                e.insert(current);
                queue.push_back(next);
            }
        }
    }

    Vec::new()
}

/// Open-set entry. Ordering: lowest f, then earliest insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u32,
    pos: GridPos,
}

/// A* search with the Manhattan heuristic (admissible for unit 4-way steps).
///
/// Neighbours are expanded top, bottom, left, right and equal-f ties go to
/// the earliest-queued node, so results are deterministic.
pub fn astar(maze: &Maze, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    if !maze.contains(start) || !maze.contains(goal) {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<GridPos, u32> = HashMap::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut seq = 0u32;

    g_score.insert(start, 0);
    came_from.insert(start, start);
    open.push(Reverse(OpenNode {
        f: start.manhattan(goal),
        seq,
        pos: start,
    }));

    while let Some(Reverse(node)) = open.pop() {
        let current = node.pos;
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }

        let g = g_score[&current];
        // Stale heap entry superseded by a cheaper route
        if node.f > g + current.manhattan(goal) {
            continue;
        }

        for next in maze.open_neighbors(current) {
            let tentative = g + 1;
            if g_score.get(&next).is_some_and(|known| *known <= tentative) {
                continue;
            }
            g_score.insert(next, tentative);
            came_from.insert(next, current);
            seq += 1;
            open.push(Reverse(OpenNode {
                f: tentative + next.manhattan(goal),
                seq,
                pos: next,
            }));
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<GridPos, GridPos>, start: GridPos, goal: GridPos) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(prev) => {
                current = *prev;
                path.push(current);
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Whether every consecutive pair of `path` crosses an open passage
pub fn is_contiguous(maze: &Maze, path: &[GridPos]) -> bool {
    path.windows(2)
        .all(|pair| maze.open_neighbors(pair[0]).any(|n| n == pair[1]))
}
