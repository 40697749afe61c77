//! Power-up pickups and their manager

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::Arena;
use super::lifecycle::{Lifecycle, LifecyclePhase};
use super::spawn::{PlacementSolver, SpawnScheduler};
use crate::config::PowerUpConfig;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Snake moves at half cadence
    SlowMotion,
    /// Walls wrap instead of killing (obstacles still kill)
    WallPass,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::SlowMotion, PowerUpKind::WallPass];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SlowMotion => "slow_motion",
            PowerUpKind::WallPass => "wall_pass",
        }
    }

    /// Effect duration granted on pickup
    pub fn duration(&self, config: &PowerUpConfig) -> f32 {
        match self {
            PowerUpKind::SlowMotion => config.slow_duration,
            PowerUpKind::WallPass => config.wall_duration,
        }
    }
}

/// A pickup on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: IVec2,
    pub kind: PowerUpKind,
    pub lifecycle: Lifecycle,
    /// Effect duration granted on pickup
    pub duration: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: IVec2, config: &PowerUpConfig) -> Self {
        Self {
            pos,
            kind,
            lifecycle: Lifecycle::new(config.lifetime, config.warning_time, config.fade_time),
            duration: kind.duration(config),
        }
    }

    /// Age the pickup; false once age reaches its lifetime
    pub fn update(&mut self, dt: f32) -> bool {
        self.lifecycle.advance(dt)
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.lifecycle.phase()
    }

    /// Render opacity: linear ramp to zero across the fade window
    pub fn opacity(&self) -> f32 {
        match self.phase() {
            LifecyclePhase::Fading => self.lifecycle.fade_progress(),
            _ => 1.0,
        }
    }
}

/// Owns the power-ups on the board and their spawn timer
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    arena: Arena,
    config: PowerUpConfig,
    solver: PlacementSolver,
    powerups: Vec<PowerUp>,
    scheduler: SpawnScheduler,
}

impl PowerUpManager {
    pub fn new<R: Rng + ?Sized>(arena: Arena, config: &PowerUpConfig, rng: &mut R) -> Self {
        Self {
            arena,
            config: config.clone(),
            solver: PlacementSolver::default(),
            powerups: Vec::new(),
            scheduler: SpawnScheduler::new(config.spawn_interval, rng),
        }
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn positions(&self) -> Vec<IVec2> {
        self.powerups.iter().map(|p| p.pos).collect()
    }

    pub fn count(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_full(&self) -> bool {
        self.powerups.len() >= self.config.max_powerups
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.scheduler.cooldown_remaining()
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    /// Place a power-up at `pos`; refused when at capacity
    pub fn spawn_at(&mut self, kind: PowerUpKind, pos: IVec2) -> bool {
        if self.is_full() {
            return false;
        }
        self.powerups.push(PowerUp::new(kind, pos, &self.config));
        log::debug!("Spawned {} power-up at {:?}", kind.as_str(), pos);
        true
    }

    /// Spawn a random power-up kind on a free cell
    pub fn spawn<R: Rng + ?Sized>(&mut self, occupied: &[IVec2], rng: &mut R) -> Option<IVec2> {
        if self.is_full() {
            return None;
        }
        let kind = *PowerUpKind::ALL.choose(rng)?;
        let mut blocked = occupied.to_vec();
        blocked.extend(self.powerups.iter().map(|p| p.pos));
        let pos = self
            .solver
            .find_free_cell(&self.arena, &blocked, rng)
            .cell();
        self.spawn_at(kind, pos).then_some(pos)
    }

    /// Age pickups, run down the cooldown, and roll for a new spawn
    ///
    /// The probability roll is only drawn once every other gate is open.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, occupied: &[IVec2], rng: &mut R) {
        self.powerups.retain_mut(|p| {
            let alive = p.update(dt);
            if !alive {
                log::debug!("{} power-up at {:?} expired", p.kind.as_str(), p.pos);
            }
            alive
        });

        self.scheduler.tick(dt);

        let gate = !self.is_full()
            && self.scheduler.is_ready()
            && rng.random::<f32>() < self.config.spawn_chance;
        if self.scheduler.should_fire(gate, rng) {
            self.spawn(occupied, rng);
        }
    }

    /// Remove and return a pickup overlapping `head`, starting the cooldown
    pub fn check_collision(&mut self, head: IVec2) -> Option<PowerUp> {
        let arena = self.arena;
        let idx = self
            .powerups
            .iter()
            .position(|p| arena.cells_overlap(head, p.pos))?;
        self.scheduler.start_cooldown(self.config.cooldown_after_pickup);
        Some(self.powerups.remove(idx))
    }

    /// Remove all pickups and restart the timer
    pub fn clear<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.powerups.clear();
        self.scheduler.reset(rng);
    }
}
