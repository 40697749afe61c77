//! Arena geometry
//!
//! Positions are absolute units, always multiples of the cell size offset
//! from the arena origin. Every entity occupies exactly one cell-sized square.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;

/// The playable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    /// Top-left corner (absolute units)
    pub origin: IVec2,
    /// Width and height (absolute units)
    pub size: IVec2,
    pub cell_size: i32,
}

impl Arena {
    pub fn new(x: i32, y: i32, width: i32, height: i32, cell_size: i32) -> Self {
        debug_assert!(cell_size > 0, "cell size must be positive");
        debug_assert!(
            width >= cell_size && height >= cell_size,
            "arena must hold at least one cell"
        );
        let cell_size = cell_size.max(1);
        // Partial cells past the last whole column/row are not playable
        let whole = |extent: i32| (extent / cell_size).max(1) * cell_size;
        Self {
            origin: IVec2::new(x, y),
            size: IVec2::new(whole(width), whole(height)),
            cell_size,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(config.x, config.y, config.width, config.height, config.cell_size)
    }

    /// Square arena of `cells × cells` at the origin
    pub fn square(cells: i32, cell_size: i32) -> Self {
        Self::new(0, 0, cells * cell_size, cells * cell_size, cell_size)
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        (self.size.x / self.cell_size).max(1)
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        (self.size.y / self.cell_size).max(1)
    }

    /// Absolute position of an arena-relative cell coordinate
    #[inline]
    pub fn cell_to_pos(&self, cell: IVec2) -> IVec2 {
        self.origin + cell * self.cell_size
    }

    /// Arena-relative cell coordinate of an absolute position
    #[inline]
    pub fn pos_to_cell(&self, pos: IVec2) -> IVec2 {
        let rel = pos - self.origin;
        IVec2::new(
            rel.x.div_euclid(self.cell_size),
            rel.y.div_euclid(self.cell_size),
        )
    }

    /// Cell-aligned center of the arena (snake spawn point)
    pub fn center(&self) -> IVec2 {
        self.cell_to_pos(IVec2::new(self.columns() / 2, self.rows() / 2))
    }

    /// Right-most column / bottom-most row a cell can occupy
    pub fn last_cell(&self) -> IVec2 {
        self.origin + self.size - IVec2::splat(self.cell_size)
    }

    /// Whether a cell at `pos` lies inside the arena's whole-cell grid
    pub fn contains(&self, pos: IVec2) -> bool {
        let end = self.origin + self.size;
        pos.x >= self.origin.x && pos.x < end.x && pos.y >= self.origin.y && pos.y < end.y
    }

    /// Wrap a position that left the arena to the opposite edge
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        let end = self.origin + self.size;
        let last = self.last_cell();
        let mut wrapped = pos;
        if pos.x >= end.x {
            wrapped.x = self.origin.x;
        } else if pos.x < self.origin.x {
            wrapped.x = last.x;
        }
        if pos.y >= end.y {
            wrapped.y = self.origin.y;
        } else if pos.y < self.origin.y {
            wrapped.y = last.y;
        }
        wrapped
    }

    /// Snap an arbitrary position to the nearest cell inside the arena
    pub fn snap(&self, pos: glam::Vec2) -> IVec2 {
        let cell = self.cell_size as f32;
        let rel = (pos - self.origin.as_vec2()) / cell;
        let col = (rel.x.round() as i32).clamp(0, self.columns() - 1);
        let row = (rel.y.round() as i32).clamp(0, self.rows() - 1);
        self.cell_to_pos(IVec2::new(col, row))
    }

    /// Bounding-box intersection of two cell-sized squares
    #[inline]
    pub fn cells_overlap(&self, a: IVec2, b: IVec2) -> bool {
        (a.x - b.x).abs() < self.cell_size && (a.y - b.y).abs() < self.cell_size
    }

    /// Whether `pos` overlaps any of `occupied`
    pub fn overlaps_any(&self, pos: IVec2, occupied: &[IVec2]) -> bool {
        occupied.iter().any(|&other| self.cells_overlap(pos, other))
    }
}
