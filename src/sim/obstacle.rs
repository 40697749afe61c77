//! Level obstacles
//!
//! Obstacles are generated once per level. Most are static; a per-level
//! subset follows a deterministic path computed from elapsed time.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::Arena;
use super::spawn::PlacementSolver;
use crate::config::LevelParams;
use crate::consts::OBSTACLE_PLACEMENT_ATTEMPTS;
use crate::ping_pong;

/// Speed of moving obstacles along straight paths (cells per second)
pub const MOVING_OBSTACLE_SPEED: f32 = 2.0;
/// Radius of the circular path (cells)
pub const CIRCLE_RADIUS_CELLS: f32 = 2.0;
/// Angular speed of the circular path (radians per second)
pub const CIRCLE_ANGULAR_SPEED: f32 = 1.2;

/// Cosmetic obstacle subtype (no gameplay difference)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Spike,
    Ice,
    Fire,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Wall,
        ObstacleKind::Spike,
        ObstacleKind::Ice,
        ObstacleKind::Fire,
    ];
}

/// Path followed by an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovePattern {
    #[default]
    Static,
    /// Bounces between the left and right walls
    Horizontal,
    /// Bounces between the top and bottom walls
    Vertical,
    /// Orbits its anchor cell
    Circular,
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: IVec2,
    pub kind: ObstacleKind,
    pub pattern: MovePattern,
    /// Position at generation time; moving paths are computed from here
    pub anchor: IVec2,
    /// Seconds since the level started (drives path and pulse)
    pub elapsed: f32,
}

impl Obstacle {
    pub fn new(pos: IVec2, kind: ObstacleKind) -> Self {
        Self::moving(pos, kind, MovePattern::Static)
    }

    pub fn moving(pos: IVec2, kind: ObstacleKind, pattern: MovePattern) -> Self {
        Self {
            pos,
            kind,
            pattern,
            anchor: pos,
            elapsed: 0.0,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.pattern != MovePattern::Static
    }

    /// Advance animation; moving variants recompute their position
    pub fn update(&mut self, dt: f32, arena: &Arena) {
        self.elapsed += dt;
        if self.is_moving() {
            self.pos = self.path_position(arena, self.elapsed);
        }
    }

    /// Position along the path at time `t`, snapped to the grid
    pub fn path_position(&self, arena: &Arena, t: f32) -> IVec2 {
        let cell = arena.cell_size as f32;
        let origin = arena.origin.as_vec2();
        let span = (arena.size - IVec2::splat(arena.cell_size)).as_vec2();
        let anchor = self.anchor.as_vec2();
        let travel = MOVING_OBSTACLE_SPEED * cell * t;

        let pos = match self.pattern {
            MovePattern::Static => return self.anchor,
            MovePattern::Horizontal => {
                let x = origin.x + ping_pong(anchor.x - origin.x + travel, span.x);
                Vec2::new(x, anchor.y)
            }
            MovePattern::Vertical => {
                let y = origin.y + ping_pong(anchor.y - origin.y + travel, span.y);
                Vec2::new(anchor.x, y)
            }
            MovePattern::Circular => {
                let angle = t * CIRCLE_ANGULAR_SPEED;
                let radius = CIRCLE_RADIUS_CELLS * cell;
                anchor + Vec2::new(angle.cos() - 1.0, angle.sin()) * radius
            }
        };
        arena.snap(pos)
    }

    /// Cosmetic pulse for the renderer
    pub fn pulse_scale(&self) -> f32 {
        1.0 + 0.1 * (self.elapsed * 3.0).sin()
    }

    /// Whether this obstacle's path could ever cross `cell`
    fn path_crosses(&self, arena: &Arena, cell: IVec2) -> bool {
        let size = arena.cell_size;
        match self.pattern {
            MovePattern::Static => arena.cells_overlap(self.anchor, cell),
            MovePattern::Horizontal => (self.anchor.y - cell.y).abs() < size,
            MovePattern::Vertical => (self.anchor.x - cell.x).abs() < size,
            MovePattern::Circular => {
                let reach = ((CIRCLE_RADIUS_CELLS * 2.0 + 1.0) * size as f32) as i32;
                let delta = (self.anchor - cell).abs();
                delta.x <= reach && delta.y <= reach
            }
        }
    }
}

/// Owns the current level's obstacles
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    arena: Arena,
    obstacles: Vec<Obstacle>,
}

impl ObstacleManager {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            obstacles: Vec::new(),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn positions(&self) -> Vec<IVec2> {
        self.obstacles.iter().map(|o| o.pos).collect()
    }

    pub fn count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Add a specific obstacle
    pub fn place(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Replace obstacles with a fresh set for `level`
    ///
    /// Avoids the snake body and already-placed obstacles. Moving obstacles
    /// additionally keep their whole path off the snake body. Falls short of
    /// the target rather than failing when attempts run out.
    pub fn generate_level_obstacles<R: Rng + ?Sized>(
        &mut self,
        level: &LevelParams,
        snake_body: &[IVec2],
        rng: &mut R,
    ) -> usize {
        self.clear();
        let target = level.obstacle_count;
        if target == 0 {
            return 0;
        }

        let moving_patterns = [
            MovePattern::Horizontal,
            MovePattern::Vertical,
            MovePattern::Circular,
        ];
        let mut attempts = 0;
        while self.obstacles.len() < target && attempts < OBSTACLE_PLACEMENT_ATTEMPTS {
            attempts += 1;

            let occupied: Vec<IVec2> = snake_body
                .iter()
                .copied()
                .chain(self.obstacles.iter().map(|o| o.anchor))
                .collect();
            let (cell, free) = PlacementSolver::try_cell(&self.arena, &occupied, rng);
            if !free {
                continue;
            }

            let kind = *ObstacleKind::ALL.choose(rng).unwrap_or(&ObstacleKind::Wall);
            let pattern = if self.obstacles.len() < level.moving_obstacle_count {
                *moving_patterns.choose(rng).unwrap_or(&MovePattern::Horizontal)
            } else {
                MovePattern::Static
            };
            let obstacle = Obstacle::moving(cell, kind, pattern);
            if obstacle.is_moving()
                && snake_body
                    .iter()
                    .any(|&part| obstacle.path_crosses(&self.arena, part))
            {
                continue;
            }
            self.obstacles.push(obstacle);
        }

        if self.obstacles.len() < target {
            log::warn!(
                "Level {}: placed {} of {} obstacles after {} attempts",
                level.level,
                self.obstacles.len(),
                target,
                attempts
            );
        } else {
            log::info!(
                "Level {} ({}): generated {} obstacles ({} moving)",
                level.level,
                level.name,
                self.obstacles.len(),
                self.obstacles.iter().filter(|o| o.is_moving()).count()
            );
        }
        self.obstacles.len()
    }

    /// Advance animation and moving paths
    pub fn update(&mut self, dt: f32) {
        let arena = self.arena;
        for obstacle in &mut self.obstacles {
            obstacle.update(dt, &arena);
        }
    }

    /// Whether `head` intersects any obstacle
    pub fn check_collision(&self, head: IVec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| self.arena.cells_overlap(head, o.pos))
    }
}
