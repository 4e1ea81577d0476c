//! Grid collision field
//!
//! A fast edge-proximity test: an agent collides when it sits outside the
//! grid, or when a standing wall of its cell is closer than its radius. It is
//! not swept-volume collision, so very large per-tick displacements can skip
//! a corner; at the game's speeds and tick rate that never happens.

use glam::Vec2;

use super::maze::{GridFrame, GridPos, Maze, Side};

/// Pure collision predicate over one maze
#[derive(Debug, Clone, Copy)]
pub struct CollisionField<'a> {
    maze: &'a Maze,
    frame: GridFrame,
}

impl<'a> CollisionField<'a> {
    pub fn new(maze: &'a Maze, cell_size: f32) -> Self {
        Self {
            maze,
            frame: GridFrame::new(maze.size(), cell_size),
        }
    }

    #[inline]
    pub fn frame(&self) -> GridFrame {
        self.frame
    }

    #[inline]
    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    /// Whether an agent of `radius` at `pos` overlaps a wall or leaves the grid.
    ///
    /// Non-finite positions and positions outside `[0, N)` collide.
    pub fn collides(&self, pos: Vec2, radius: f32) -> bool {
        if !pos.is_finite() {
            return true;
        }
        let cell = self.frame.world_to_grid(pos);
        match self.maze.get(cell) {
            Some(_) => self.near_wall(pos, cell, radius),
            None => true,
        }
    }

    /// Camera sample: does a wall slab of half-thickness `thickness` contain `pos`?
    ///
    /// Everything beyond the outer boundary counts as wall.
    pub fn wall_at(&self, pos: Vec2, thickness: f32) -> bool {
        self.collides(pos, thickness)
    }

    /// Cell containing `pos`, if it lies on the grid
    pub fn cell_at(&self, pos: Vec2) -> Option<GridPos> {
        let cell = self.frame.world_to_grid(pos);
        self.maze.contains(cell).then_some(cell)
    }

    fn near_wall(&self, pos: Vec2, cell: GridPos, margin: f32) -> bool {
        let Some(cell_data) = self.maze.get(cell) else {
            return true;
        };
        let walls = cell_data.walls;
        let local = self.frame.local_offset(pos, cell);
        let edge = self.frame.cell_size / 2.0 - margin;

        (walls.has(Side::Top) && local.y < -edge)
            || (walls.has(Side::Bottom) && local.y > edge)
            || (walls.has(Side::Left) && local.x < -edge)
            || (walls.has(Side::Right) && local.x > edge)
    }
}
