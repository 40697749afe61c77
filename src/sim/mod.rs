//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta time in, events out
//! - Seeded RNG only, owned by the run
//! - Stable iteration order (food by kind, then insertion)
//! - No rendering or platform dependencies

pub mod food;
pub mod grid;
pub mod lifecycle;
pub mod obstacle;
pub mod powerup;
pub mod snake;
pub mod spawn;
pub mod state;
pub mod tick;

pub use food::{Food, FoodKind, FoodManager};
pub use grid::Arena;
pub use lifecycle::{Lifecycle, LifecyclePhase};
pub use obstacle::{MovePattern, Obstacle, ObstacleKind, ObstacleManager};
pub use powerup::{PowerUp, PowerUpKind, PowerUpManager};
pub use snake::{ActiveEffects, Direction, Snake};
pub use spawn::{Placement, PlacementSolver, SpawnScheduler};
pub use state::{GameEvent, Simulation, Snapshot};
pub use tick::tick;

impl Simulation {
    /// Advance the run by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        tick::tick(self, dt)
    }

    /// Queue a direction for the next step; reversals are ignored
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.snake.change_direction(direction)
    }
}
