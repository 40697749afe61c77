//! Simulation state and outcome events
//!
//! One `Simulation` owns everything for a single run: the snake, the three
//! entity managers, score, and the seeded RNG. A new run replaces it.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::food::{FoodKind, FoodManager};
use super::grid::Arena;
use super::lifecycle::LifecyclePhase;
use super::obstacle::{MovePattern, ObstacleKind, ObstacleManager};
use super::powerup::{PowerUpKind, PowerUpManager};
use super::snake::{Direction, Snake};
use crate::config::{Config, LevelParams};
use crate::consts::SLOW_MOTION_FACTOR;

/// Outcome of a tick, for scoring/achievement/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { kind: FoodKind, score_delta: i64 },
    PowerUpCollected { kind: PowerUpKind },
    /// Fatal collision (wall, self, or obstacle); followed by `LifeLost` or `GameEnded`
    Death,
    LifeLost { lives_remaining: u32 },
    GameEnded { final_score: u64, final_level: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: Config,
    pub(crate) arena: Arena,
    pub(crate) level: LevelParams,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub snake: Snake,
    pub food: FoodManager,
    pub powerups: PowerUpManager,
    pub obstacles: ObstacleManager,
    pub(crate) score: u64,
    /// Seconds accumulated toward the next snake step
    pub(crate) move_timer: f32,
    /// Seconds between steps at this level (before slow-motion)
    pub(crate) move_interval: f32,
    /// Seconds of play in this run
    pub(crate) elapsed: f32,
    pub(crate) game_over: bool,
}

impl Simulation {
    /// Build a fresh run for `level`: snake, managers, obstacles, first food
    pub fn start_run(config: &Config, level: u32, seed: u64) -> Self {
        let arena = Arena::from_config(&config.arena);
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = config.level(level);

        let food = FoodManager::new(arena, &config.food, &mut rng);
        let powerups = PowerUpManager::new(arena, &config.powerups, &mut rng);

        let mut sim = Self {
            config: config.clone(),
            arena,
            seed,
            snake: Snake::new(arena, config.timing.starting_lives),
            food,
            powerups,
            obstacles: ObstacleManager::new(arena),
            score: 0,
            move_timer: 0.0,
            move_interval: config.move_interval(level.level),
            elapsed: 0.0,
            game_over: false,
            level,
            rng,
        };
        sim.setup_level();

        log::info!(
            "Run started: level {} ({}), seed {}, move interval {:.3}s",
            sim.level.level,
            sim.level.name,
            seed,
            sim.move_interval
        );
        sim
    }

    /// Lay out obstacles around the snake, then place the first food
    fn setup_level(&mut self) {
        let body = self.snake.body_vec();
        self.obstacles
            .generate_level_obstacles(&self.level, &body, &mut self.rng);
        let blocked = self.blocked_cells();
        self.food.ensure_normal_food(&blocked, &mut self.rng);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn level(&self) -> u32 {
        self.level.level
    }

    pub fn level_params(&self) -> &LevelParams {
        &self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Base step interval for this level
    pub fn move_interval(&self) -> f32 {
        self.move_interval
    }

    /// Step interval in effect now (doubled under slow-motion)
    pub fn effective_move_interval(&self) -> f32 {
        if self.snake.has_effect(PowerUpKind::SlowMotion) {
            self.move_interval * SLOW_MOTION_FACTOR
        } else {
            self.move_interval
        }
    }

    /// Apply a score change, flooring at zero
    pub(crate) fn apply_score(&mut self, delta: i64) {
        self.score = if delta >= 0 {
            self.score.saturating_add(delta as u64)
        } else {
            self.score.saturating_sub(delta.unsigned_abs())
        };
    }

    /// Cells taken by the snake and obstacles
    pub(crate) fn blocked_cells(&self) -> Vec<IVec2> {
        let mut cells = self.snake.body_vec();
        cells.extend(self.obstacles.positions());
        cells
    }

    /// Cells taken by every entity on the board
    pub(crate) fn occupied_cells(&self) -> Vec<IVec2> {
        let mut cells = self.blocked_cells();
        cells.extend(self.food.positions());
        cells.extend(self.powerups.positions());
        cells
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level.level,
            level_name: self.level.name.clone(),
            score: self.score,
            lives: self.snake.lives(),
            game_over: self.game_over,
            snake: SnakeView {
                body: self.snake.body_vec(),
                head: self.snake.head(),
                direction: self.snake.direction(),
                effects: self.snake.effects().active(),
            },
            food: self
                .food
                .foods()
                .map(|f| FoodView {
                    pos: f.pos,
                    kind: f.kind,
                    phase: f.phase(),
                    opacity: f.opacity(),
                })
                .collect(),
            powerups: self
                .powerups
                .powerups()
                .iter()
                .map(|p| PowerUpView {
                    pos: p.pos,
                    kind: p.kind,
                    phase: p.phase(),
                    opacity: p.opacity(),
                })
                .collect(),
            obstacles: self
                .obstacles
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    pos: o.pos,
                    kind: o.kind,
                    pattern: o.pattern,
                    pulse: o.pulse_scale(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeView {
    /// Tail first, head last
    pub body: Vec<IVec2>,
    pub head: IVec2,
    pub direction: Option<Direction>,
    /// Active effects with seconds remaining
    pub effects: Vec<(PowerUpKind, f32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodView {
    pub pos: IVec2,
    pub kind: FoodKind,
    pub phase: LifecyclePhase,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub pos: IVec2,
    pub kind: PowerUpKind,
    pub phase: LifecyclePhase,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub pos: IVec2,
    pub kind: ObstacleKind,
    pub pattern: MovePattern,
    pub pulse: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub level_name: String,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,
    pub snake: SnakeView,
    pub food: Vec<FoodView>,
    pub powerups: Vec<PowerUpView>,
    pub obstacles: Vec<ObstacleView>,
}
