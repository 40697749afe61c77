//! Timed spawn triggers and free-cell placement

use glam::IVec2;
use rand::Rng;

use super::grid::Arena;
use crate::config::IntervalRange;
use crate::consts::PLACEMENT_ATTEMPTS;

/// Draw a duration uniformly from `range`
pub fn draw_interval<R: Rng + ?Sized>(range: IntervalRange, rng: &mut R) -> f32 {
    let range = range.normalized();
    if range.max <= range.min {
        range.min
    } else {
        rng.random_range(range.min..=range.max)
    }
}

/// Randomized interval trigger with an optional cooldown
///
/// `elapsed` keeps accumulating while the trigger is gated off, so a spawn
/// that was blocked fires on the first tick its gate opens.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    range: IntervalRange,
    elapsed: f32,
    current_interval: f32,
    cooldown_remaining: f32,
}

impl SpawnScheduler {
    pub fn new<R: Rng + ?Sized>(range: IntervalRange, rng: &mut R) -> Self {
        Self {
            range,
            elapsed: 0.0,
            current_interval: draw_interval(range, rng),
            cooldown_remaining: 0.0,
        }
    }

    /// Advance elapsed time and run down the cooldown
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Interval elapsed and no cooldown pending
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.current_interval && self.cooldown_remaining <= 0.0
    }

    /// Returns true once per satisfied interval; firing restarts the interval
    pub fn should_fire<R: Rng + ?Sized>(&mut self, extra_gate: bool, rng: &mut R) -> bool {
        if !(self.is_ready() && extra_gate) {
            return false;
        }
        self.elapsed = 0.0;
        self.current_interval = draw_interval(self.range, rng);
        true
    }

    pub fn start_cooldown(&mut self, duration: f32) {
        self.cooldown_remaining = duration.max(0.0);
    }

    /// Back to the freshly-constructed state with a new interval
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.elapsed = 0.0;
        self.cooldown_remaining = 0.0;
        self.current_interval = draw_interval(self.range, rng);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn current_interval(&self) -> f32 {
        self.current_interval
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }
}

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Candidate clear of every occupied cell
    Free(IVec2),
    /// Attempts exhausted; the last candidate drawn
    BestEffort(IVec2),
}

impl Placement {
    pub fn cell(self) -> IVec2 {
        match self {
            Placement::Free(pos) | Placement::BestEffort(pos) => pos,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, Placement::Free(_))
    }
}

/// Bounded random search for a free grid cell
#[derive(Debug, Clone, Copy)]
pub struct PlacementSolver {
    attempts: u32,
}

impl Default for PlacementSolver {
    fn default() -> Self {
        Self::new(PLACEMENT_ATTEMPTS)
    }
}

impl PlacementSolver {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Uniformly random cell-aligned position inside the arena
    pub fn random_cell<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> IVec2 {
        let col = rng.random_range(0..arena.columns());
        let row = rng.random_range(0..arena.rows());
        arena.cell_to_pos(IVec2::new(col, row))
    }

    /// One candidate and whether it is clear of `occupied`
    pub fn try_cell<R: Rng + ?Sized>(
        arena: &Arena,
        occupied: &[IVec2],
        rng: &mut R,
    ) -> (IVec2, bool) {
        let candidate = Self::random_cell(arena, rng);
        (candidate, !arena.overlaps_any(candidate, occupied))
    }

    /// Never blocks: falls back to the last candidate after `attempts` draws
    pub fn find_free_cell<R: Rng + ?Sized>(
        &self,
        arena: &Arena,
        occupied: &[IVec2],
        rng: &mut R,
    ) -> Placement {
        let mut last = arena.center();
        for _ in 0..self.attempts {
            let (candidate, free) = Self::try_cell(arena, occupied, rng);
            if free {
                return Placement::Free(candidate);
            }
            last = candidate;
        }
        log::warn!(
            "No free cell after {} attempts, placing at {:?}",
            self.attempts,
            last
        );
        Placement::BestEffort(last)
    }
}
