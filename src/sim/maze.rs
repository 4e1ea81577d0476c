//! Perfect maze generation (randomized depth-first backtracking)
//!
//! The passage graph of a generated maze is a spanning tree: every cell is
//! reachable from the start and there are no cycles.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Integer grid coordinates (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn step(self, side: Side) -> GridPos {
        let (dx, dy) = side.delta();
        GridPos::new(self.x + dx, self.y + dy)
    }
}

/// One side of a cell. Top is -y (world -z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Fixed enumeration order used by the path solvers
    pub const SEARCH_ORDER: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Wall flags of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const ALL: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn has(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    fn clear(&mut self, side: Side) {
        match side {
            Side::Top => self.top = false,
            Side::Right => self.right = false,
            Side::Bottom => self.bottom = false,
            Side::Left => self.left = false,
        }
    }

    /// Number of standing walls
    pub fn count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .filter(|w| **w)
            .count()
    }
}

/// One grid square of the maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub pos: GridPos,
    pub walls: Walls,
    /// Only meaningful while carving
    #[serde(skip)]
    pub visited: bool,
}

impl Cell {
    /// A cell with exactly three walls
    pub fn is_dead_end(&self) -> bool {
        self.walls.count() == 3
    }
}

/// An N×N perfect maze. Immutable after generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    size: usize,
    /// Row-major cells
    cells: Vec<Cell>,
}

impl Maze {
    /// Generate a perfect maze of edge length `size` (clamped to at least 1)
    pub fn generate(size: usize, rng: &mut impl Rng) -> Self {
        let size = size.max(1);
        let mut maze = Self::walled(size);

        let start = maze.start();
        maze.cell_mut(start).visited = true;
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let unvisited: Vec<Side> = [Side::Top, Side::Right, Side::Bottom, Side::Left]
                .into_iter()
                .filter(|side| {
                    maze.get(current.step(*side))
                        .is_some_and(|cell| !cell.visited)
                })
                .collect();

            if unvisited.is_empty() {
                stack.pop();
                continue;
            }

            let side = unvisited[rng.random_range(0..unvisited.len())];
            let next = current.step(side);
            maze.cell_mut(current).walls.clear(side);
            let next_cell = maze.cell_mut(next);
            next_cell.walls.clear(side.opposite());
            next_cell.visited = true;
            stack.push(next);
        }

        for cell in &mut maze.cells {
            cell.visited = false;
        }
        maze
    }

    /// A fully walled grid with no passages
    pub fn walled(size: usize) -> Self {
        let size = size.max(1);
        let cells = (0..size * size)
            .map(|i| Cell {
                pos: GridPos::new((i % size) as i32, (i / size) as i32),
                walls: Walls::ALL,
                visited: false,
            })
            .collect();
        Self { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn start(&self) -> GridPos {
        GridPos::new(0, 0)
    }

    #[inline]
    pub fn exit(&self) -> GridPos {
        let last = self.size as i32 - 1;
        GridPos::new(last, last)
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        if self.contains(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Whether a passage connects `pos` to its neighbour on `side`
    pub fn is_open(&self, pos: GridPos, side: Side) -> bool {
        self.get(pos).is_some_and(|cell| !cell.walls.has(side)) && self.contains(pos.step(side))
    }

    /// Passage neighbours in the fixed order top, bottom, left, right
    pub fn open_neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        Side::SEARCH_ORDER
            .into_iter()
            .filter(move |side| self.is_open(pos, *side))
            .map(move |side| pos.step(side))
    }

    /// Number of carved passages (each counted once)
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                usize::from(self.is_open(cell.pos, Side::Right))
                    + usize::from(self.is_open(cell.pos, Side::Bottom))
            })
            .sum()
    }

    /// Cells with exactly three walls
    pub fn dead_ends(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_dead_end())
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.y as usize * self.size + pos.x as usize
    }

    fn cell_mut(&mut self, pos: GridPos) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    #[cfg(test)]
    pub(crate) fn carve(&mut self, pos: GridPos, side: Side) {
        self.cell_mut(pos).walls.clear(side);
        let next = pos.step(side);
        self.cell_mut(next).walls.clear(side.opposite());
    }
}

/// Mapping between continuous world (x, z) and grid cells.
///
/// Cell (0, 0) is centred at (-offset, -offset) where
/// `offset = size * cell_size / 2 - cell_size / 2`, so the maze is centred on
/// the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFrame {
    pub size: usize,
    pub cell_size: f32,
}

impl GridFrame {
    pub fn new(size: usize, cell_size: f32) -> Self {
        Self { size, cell_size }
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.size as f32 * self.cell_size / 2.0 - self.cell_size / 2.0
    }

    /// Nearest cell to a world position; may lie outside the grid
    #[inline]
    pub fn world_to_grid(&self, pos: Vec2) -> GridPos {
        let offset = self.offset();
        // floor(v + 0.5) rounds halves up, matching the cell boundaries
        let gx = ((pos.x + offset) / self.cell_size + 0.5).floor();
        let gy = ((pos.y + offset) / self.cell_size + 0.5).floor();
        GridPos::new(gx as i32, gy as i32)
    }

    /// World position of a cell's center
    #[inline]
    pub fn cell_center(&self, cell: GridPos) -> Vec2 {
        let offset = self.offset();
        Vec2::new(
            cell.x as f32 * self.cell_size - offset,
            cell.y as f32 * self.cell_size - offset,
        )
    }

    /// Offset of `pos` from the center of `cell`
    #[inline]
    pub fn local_offset(&self, pos: Vec2, cell: GridPos) -> Vec2 {
        pos - self.cell_center(cell)
    }
}
