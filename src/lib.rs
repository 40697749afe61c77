//! Snake Arena - A grid snake arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (snake, food, power-ups, obstacles, update loop)
//! - `game`: Screen state machine wrapping the simulation
//! - `config`: Data-driven game balance, injected at construction
//! - `highscores`: In-memory leaderboard fed by game-over events
//! - `autopilot`: Greedy steering for headless and demo runs

pub mod autopilot;
pub mod config;
pub mod game;
pub mod highscores;
pub mod sim;

pub use config::Config;
pub use game::{Command, Game, GamePhase};
pub use highscores::HighScores;

/// Game constants that are not part of the user configuration
pub mod consts {
    /// Snake movement interval at speed multiplier 1.0 (seconds)
    pub const BASE_MOVE_INTERVAL: f32 = 0.2;
    /// Slow-motion multiplies the movement interval by this factor
    pub const SLOW_MOTION_FACTOR: f32 = 2.0;
    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;
    /// Snake length at the start of a run and after a life is lost
    pub const STARTING_LENGTH: usize = 1;
    /// Countdown before play begins (seconds)
    pub const COUNTDOWN_DURATION: f32 = 3.0;

    /// Random candidates tried when placing food or a power-up
    pub const PLACEMENT_ATTEMPTS: u32 = 50;
    /// Random candidates tried when generating a level's obstacles
    pub const OBSTACLE_PLACEMENT_ATTEMPTS: u32 = 200;

    /// Frame delta used by the headless driver (seconds)
    pub const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest delta the update loop accepts in one call (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;
}

/// Triangle wave in `[0, span]`, used for paths that bounce between bounds
#[inline]
pub fn ping_pong(value: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = span * 2.0;
    let t = value.rem_euclid(period);
    if t <= span { t } else { period - t }
}
