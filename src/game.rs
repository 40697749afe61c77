//! Screen state machine
//!
//! Wraps one `Simulation` at a time and decides when it runs. Leaving the
//! playing screens simply stops ticking it; starting a run replaces it.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::highscores::HighScores;
use crate::sim::{Direction, GameEvent, Simulation};

/// Current screen / mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    LevelSelect,
    Settings,
    HighScores,
    /// Run built, counting down before play
    Countdown,
    Playing,
    Paused,
    /// Run ended; the final board stays visible
    GameOver,
}

/// Player intents, already mapped from whatever input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartGame,
    OpenLevelSelect,
    OpenSettings,
    OpenHighScores,
    SelectLevel(u32),
    Back,
    TogglePause,
    Escape,
    Restart,
    Steer(Direction),
}

/// Outer game: phase, current run, and leaderboard
#[derive(Debug, Clone)]
pub struct Game {
    config: Config,
    phase: GamePhase,
    /// Level of the current (or last) run
    level: u32,
    /// Base seed; each run derives its own from it
    seed: u64,
    runs_started: u64,
    countdown_remaining: f32,
    sim: Option<Simulation>,
    high_scores: HighScores,
    /// Rank earned by the last finished run, if it made the table
    last_rank: Option<usize>,
}

impl Game {
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            config,
            phase: GamePhase::Menu,
            level: 1,
            seed,
            runs_started: 0,
            countdown_remaining: 0.0,
            sim: None,
            high_scores: HighScores::new(),
            last_rank: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn high_scores_mut(&mut self) -> &mut HighScores {
        &mut self.high_scores
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn countdown_remaining(&self) -> f32 {
        self.countdown_remaining
    }

    /// Replace the config used by the next run
    ///
    /// Refused while a run is in progress.
    pub fn set_config(&mut self, config: Config) -> bool {
        if matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::Countdown
        ) {
            log::warn!("Config change ignored during a run");
            return false;
        }
        self.config = config;
        true
    }

    /// Apply a command; returns whether it did anything in this phase
    pub fn handle(&mut self, command: Command) -> bool {
        let next = match (self.phase, command) {
            (GamePhase::Menu, Command::StartGame) => {
                self.start_run(1);
                return true;
            }
            (GamePhase::Menu, Command::OpenLevelSelect) => GamePhase::LevelSelect,
            (GamePhase::Menu, Command::OpenSettings) => GamePhase::Settings,
            (GamePhase::Menu, Command::OpenHighScores) => GamePhase::HighScores,

            (GamePhase::LevelSelect, Command::SelectLevel(level)) => {
                self.start_run(level);
                return true;
            }
            (
                GamePhase::LevelSelect | GamePhase::Settings | GamePhase::HighScores,
                Command::Back,
            ) => GamePhase::Menu,

            (GamePhase::Countdown | GamePhase::Playing | GamePhase::Paused, Command::Escape) => {
                self.sim = None;
                GamePhase::Menu
            }

            (GamePhase::Playing, Command::TogglePause) => GamePhase::Paused,
            (GamePhase::Paused, Command::TogglePause) => GamePhase::Playing,
            (GamePhase::Playing, Command::Steer(direction)) => {
                return self
                    .sim
                    .as_mut()
                    .is_some_and(|sim| sim.steer(direction));
            }

            (GamePhase::GameOver, Command::Restart) => {
                self.start_run(self.level);
                return true;
            }
            (GamePhase::GameOver, Command::Back | Command::Escape) => GamePhase::Menu,

            _ => return false,
        };

        log::debug!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        true
    }

    /// Advance the current phase by `dt` seconds
    ///
    /// Only the playing phase ticks the simulation; its events are returned.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        match self.phase {
            GamePhase::Countdown => {
                self.countdown_remaining -= dt.max(0.0);
                if self.countdown_remaining <= 0.0 {
                    self.countdown_remaining = 0.0;
                    self.phase = GamePhase::Playing;
                    log::debug!("Countdown finished");
                }
                Vec::new()
            }
            GamePhase::Playing => {
                let Some(sim) = self.sim.as_mut() else {
                    self.phase = GamePhase::Menu;
                    return Vec::new();
                };
                let events = sim.tick(dt);
                if sim.is_game_over() {
                    let (score, level) = (sim.score(), sim.level());
                    self.last_rank = self.high_scores.add_score(score, level);
                    self.phase = GamePhase::GameOver;
                }
                events
            }
            _ => Vec::new(),
        }
    }

    fn start_run(&mut self, level: u32) {
        let level = level.clamp(1, self.config.max_level());
        let seed = self.seed.wrapping_add(self.runs_started);
        self.runs_started += 1;

        self.sim = Some(Simulation::start_run(&self.config, level, seed));
        self.level = level;
        self.last_rank = None;
        self.countdown_remaining = self.config.timing.countdown;
        self.phase = GamePhase::Countdown;
    }
}
