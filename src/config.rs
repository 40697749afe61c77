//! Game balance configuration
//!
//! A read-only value object handed to the simulation when a run starts.
//! Every section is `#[serde(default)]`, so a partial JSON document merges
//! over the defaults. Loading from disk is left to the caller.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inclusive `[min, max]` range in seconds for randomized intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min: f32,
    pub max: f32,
}

impl IntervalRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range with `min <= max` guaranteed (a reversed range collapses to `max`)
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self::new(self.max, self.max)
        } else {
            self
        }
    }
}

/// Playable rectangle in absolute units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            x: 50,
            y: 50,
            width: 400,
            height: 400,
            cell_size: 20,
        }
    }
}

/// Pace and run-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds between snake steps at speed multiplier 1.0
    pub base_move_interval: f32,
    /// Seconds of countdown before play starts
    pub countdown: f32,
    pub starting_lives: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_move_interval: BASE_MOVE_INTERVAL,
            countdown: COUNTDOWN_DURATION,
            starting_lives: STARTING_LIVES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    pub normal_score: u32,
    pub special_score: u32,
    pub bad_penalty: u32,
    pub special_spawn_interval: IntervalRange,
    pub special_lifetime: f32,
    pub special_warning_time: f32,
    pub bad_spawn_interval: IntervalRange,
    pub bad_lifetime: f32,
    pub bad_warning_time: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            normal_score: 10,
            special_score: 50,
            bad_penalty: 20,
            special_spawn_interval: IntervalRange::new(15.0, 25.0),
            special_lifetime: 12.0,
            special_warning_time: 3.0,
            bad_spawn_interval: IntervalRange::new(20.0, 35.0),
            bad_lifetime: 10.0,
            bad_warning_time: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Effect duration granted by a slow-motion pickup
    pub slow_duration: f32,
    /// Effect duration granted by a wall-pass pickup
    pub wall_duration: f32,
    pub spawn_interval: IntervalRange,
    /// Probability per eligible tick once the interval has elapsed
    pub spawn_chance: f32,
    pub lifetime: f32,
    pub warning_time: f32,
    pub fade_time: f32,
    pub cooldown_after_pickup: f32,
    pub max_powerups: usize,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            slow_duration: 5.0,
            wall_duration: 5.0,
            spawn_interval: IntervalRange::new(20.0, 35.0),
            spawn_chance: 0.02,
            lifetime: 18.0,
            warning_time: 5.0,
            fade_time: 2.0,
            cooldown_after_pickup: 15.0,
            max_powerups: 1,
        }
    }
}

/// Per-level tables, indexed by `level - 1`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    pub names: Vec<String>,
    pub obstacle_count: Vec<usize>,
    pub speed_multiplier: Vec<f32>,
    /// How many of the level's obstacles follow a moving path
    pub moving_obstacle_count: Vec<usize>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            names: ["Easy", "Normal", "Hard", "Expert", "Master"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            obstacle_count: vec![1, 2, 4, 6, 8],
            speed_multiplier: vec![1.0, 1.2, 1.5, 1.8, 2.0],
            moving_obstacle_count: vec![0, 0, 0, 1, 2],
        }
    }
}

/// Resolved parameters for one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelParams {
    pub level: u32,
    pub name: String,
    pub obstacle_count: usize,
    pub moving_obstacle_count: usize,
    pub speed_multiplier: f32,
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arena: ArenaConfig,
    pub timing: TimingConfig,
    pub food: FoodConfig,
    pub powerups: PowerUpConfig,
    pub levels: LevelsConfig,
}

/// Entry of a per-level table, clamped to the table bounds
fn table_entry<T: Clone>(table: &[T], level: u32, fallback: T) -> T {
    let idx = (level.max(1) - 1) as usize;
    table
        .get(idx.min(table.len().saturating_sub(1)))
        .cloned()
        .unwrap_or(fallback)
}

impl Config {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Number of selectable levels
    pub fn max_level(&self) -> u32 {
        let len = self
            .levels
            .obstacle_count
            .len()
            .max(self.levels.speed_multiplier.len())
            .max(1);
        len as u32
    }

    /// Parameters for a level; out-of-range levels use the nearest table entry
    pub fn level(&self, level: u32) -> LevelParams {
        let levels = &self.levels;
        let obstacle_count = table_entry(&levels.obstacle_count, level, 0);
        let moving = table_entry(&levels.moving_obstacle_count, level, 0);
        let speed_multiplier = table_entry(&levels.speed_multiplier, level, 1.0);
        LevelParams {
            level: level.max(1),
            name: table_entry(&levels.names, level, format!("Level {}", level.max(1))),
            obstacle_count,
            moving_obstacle_count: moving.min(obstacle_count),
            speed_multiplier: if speed_multiplier > 0.0 { speed_multiplier } else { 1.0 },
        }
    }

    /// Seconds between snake steps for a level (before slow-motion)
    pub fn move_interval(&self, level: u32) -> f32 {
        self.timing.base_move_interval / self.level(level).speed_multiplier
    }
}
