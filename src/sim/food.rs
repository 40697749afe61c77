//! Food items and their manager
//!
//! Normal food never expires and is topped up on demand, so exactly one is
//! on the board outside of the consumption step. Special and bad food each
//! have their own randomized spawn timer, a lifetime, and a cap of one.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Arena;
use super::lifecycle::{Lifecycle, LifecyclePhase};
use super::spawn::{PlacementSolver, SpawnScheduler};
use crate::config::FoodConfig;

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Special,
    Bad,
}

impl FoodKind {
    pub const ALL: [FoodKind; 3] = [FoodKind::Normal, FoodKind::Special, FoodKind::Bad];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Normal => "normal",
            FoodKind::Special => "special",
            FoodKind::Bad => "bad",
        }
    }
}

/// A food entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub pos: IVec2,
    pub kind: FoodKind,
    /// None for normal food, which persists until eaten
    pub lifecycle: Option<Lifecycle>,
}

impl Food {
    pub fn new(kind: FoodKind, pos: IVec2, config: &FoodConfig) -> Self {
        let lifecycle = match kind {
            FoodKind::Normal => None,
            FoodKind::Special => Some(Lifecycle::new(
                config.special_lifetime,
                config.special_warning_time,
                0.0,
            )),
            FoodKind::Bad => Some(Lifecycle::new(
                config.bad_lifetime,
                config.bad_warning_time,
                0.0,
            )),
        };
        Self {
            pos,
            kind,
            lifecycle,
        }
    }

    /// Age the food; false once it has expired
    pub fn update(&mut self, dt: f32) -> bool {
        match &mut self.lifecycle {
            Some(life) => life.advance(dt),
            None => true,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.lifecycle.map(|l| l.phase()).unwrap_or_default()
    }

    /// Render opacity: fades from 1.0 to 0.5 across the warning window
    pub fn opacity(&self) -> f32 {
        match self.lifecycle {
            Some(life) if life.phase() != LifecyclePhase::Normal => {
                0.5 + 0.5 * life.warning_progress()
            }
            _ => 1.0,
        }
    }

    /// Score change when eaten (negative for bad food)
    pub fn score_delta(&self, config: &FoodConfig) -> i64 {
        match self.kind {
            FoodKind::Normal => config.normal_score as i64,
            FoodKind::Special => config.special_score as i64,
            FoodKind::Bad => -(config.bad_penalty as i64),
        }
    }
}

/// Owns all food on the board
#[derive(Debug, Clone)]
pub struct FoodManager {
    arena: Arena,
    config: FoodConfig,
    solver: PlacementSolver,
    normal: Vec<Food>,
    special: Vec<Food>,
    bad: Vec<Food>,
    special_scheduler: SpawnScheduler,
    bad_scheduler: SpawnScheduler,
}

impl FoodManager {
    pub fn new<R: Rng + ?Sized>(arena: Arena, config: &FoodConfig, rng: &mut R) -> Self {
        Self {
            arena,
            config: config.clone(),
            solver: PlacementSolver::default(),
            normal: Vec::new(),
            special: Vec::new(),
            bad: Vec::new(),
            special_scheduler: SpawnScheduler::new(config.special_spawn_interval, rng),
            bad_scheduler: SpawnScheduler::new(config.bad_spawn_interval, rng),
        }
    }

    fn collection(&self, kind: FoodKind) -> &Vec<Food> {
        match kind {
            FoodKind::Normal => &self.normal,
            FoodKind::Special => &self.special,
            FoodKind::Bad => &self.bad,
        }
    }

    fn collection_mut(&mut self, kind: FoodKind) -> &mut Vec<Food> {
        match kind {
            FoodKind::Normal => &mut self.normal,
            FoodKind::Special => &mut self.special,
            FoodKind::Bad => &mut self.bad,
        }
    }

    /// All food in collision-priority order (normal, special, bad)
    pub fn foods(&self) -> impl Iterator<Item = &Food> {
        self.normal.iter().chain(&self.special).chain(&self.bad)
    }

    pub fn positions(&self) -> Vec<IVec2> {
        self.foods().map(|f| f.pos).collect()
    }

    pub fn count(&self, kind: FoodKind) -> usize {
        self.collection(kind).len()
    }

    pub fn total(&self) -> usize {
        self.normal.len() + self.special.len() + self.bad.len()
    }

    pub fn config(&self) -> &FoodConfig {
        &self.config
    }

    /// Place a food of `kind` at `pos`; refused if that kind is already present
    pub fn spawn_at(&mut self, kind: FoodKind, pos: IVec2) -> bool {
        if !self.collection(kind).is_empty() {
            return false;
        }
        let food = Food::new(kind, pos, &self.config);
        self.collection_mut(kind).push(food);
        log::debug!("Spawned {} food at {:?}", kind.as_str(), pos);
        true
    }

    /// Spawn a food of `kind` on a free cell, avoiding `occupied` and other food
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: FoodKind,
        occupied: &[IVec2],
        rng: &mut R,
    ) -> Option<IVec2> {
        if !self.collection(kind).is_empty() {
            return None;
        }
        let mut blocked = occupied.to_vec();
        blocked.extend(self.foods().map(|f| f.pos));
        let pos = self
            .solver
            .find_free_cell(&self.arena, &blocked, rng)
            .cell();
        self.spawn_at(kind, pos).then_some(pos)
    }

    /// Top up normal food if none is on the board
    pub fn ensure_normal_food<R: Rng + ?Sized>(
        &mut self,
        occupied: &[IVec2],
        rng: &mut R,
    ) -> Option<IVec2> {
        if self.normal.is_empty() {
            self.spawn(FoodKind::Normal, occupied, rng)
        } else {
            None
        }
    }

    /// Age all food, drop expired items, and run the special/bad spawn timers
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, occupied: &[IVec2], rng: &mut R) {
        for kind in FoodKind::ALL {
            self.collection_mut(kind).retain_mut(|food| {
                let alive = food.update(dt);
                if !alive {
                    log::debug!("{} food at {:?} expired", food.kind.as_str(), food.pos);
                }
                alive
            });
        }

        self.special_scheduler.tick(dt);
        self.bad_scheduler.tick(dt);

        let special_empty = self.special.is_empty();
        if self.special_scheduler.should_fire(special_empty, rng) {
            self.spawn(FoodKind::Special, occupied, rng);
        }
        let bad_empty = self.bad.is_empty();
        if self.bad_scheduler.should_fire(bad_empty, rng) {
            self.spawn(FoodKind::Bad, occupied, rng);
        }
    }

    /// Remove and return the first food overlapping `head` (normal, special, bad)
    pub fn check_collision(&mut self, head: IVec2) -> Option<Food> {
        let arena = self.arena;
        for kind in FoodKind::ALL {
            let list = self.collection_mut(kind);
            if let Some(idx) = list.iter().position(|f| arena.cells_overlap(head, f.pos)) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    /// Remove all food and restart both spawn timers
    pub fn clear<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.normal.clear();
        self.special.clear();
        self.bad.clear();
        self.special_scheduler.reset(rng);
        self.bad_scheduler.reset(rng);
    }

    pub fn special_scheduler(&self) -> &SpawnScheduler {
        &self.special_scheduler
    }

    pub fn bad_scheduler(&self) -> &SpawnScheduler {
        &self.bad_scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntervalRange;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed_config() -> FoodConfig {
        FoodConfig {
            special_spawn_interval: IntervalRange::new(2.0, 2.0),
            bad_spawn_interval: IntervalRange::new(3.0, 3.0),
            special_lifetime: 4.0,
            special_warning_time: 1.0,
            bad_lifetime: 4.0,
            bad_warning_time: 1.0,
            ..FoodConfig::default()
        }
    }

    fn manager(rng: &mut Pcg32) -> FoodManager {
        FoodManager::new(Arena::square(10, 20), &fixed_config(), rng)
    }

    #[test]
    fn test_normal_food_never_expires() {
        let mut food = Food::new(FoodKind::Normal, IVec2::ZERO, &FoodConfig::default());
        assert!(food.update(1_000_000.0));
        assert_eq!(food.phase(), LifecyclePhase::Normal);
        assert_eq!(food.opacity(), 1.0);
    }

    #[test]
    fn test_special_food_warns_then_expires() {
        let config = FoodConfig::default();
        let mut food = Food::new(FoodKind::Special, IVec2::ZERO, &config);
        assert!(food.update(10.5));
        assert_eq!(food.phase(), LifecyclePhase::Warning);
        assert!((food.opacity() - 0.75).abs() < 1e-5);
        assert!(!food.update(1.5));
    }

    #[test]
    fn test_score_deltas() {
        let config = FoodConfig::default();
        let delta = |kind| Food::new(kind, IVec2::ZERO, &config).score_delta(&config);
        assert_eq!(delta(FoodKind::Normal), 10);
        assert_eq!(delta(FoodKind::Special), 50);
        assert_eq!(delta(FoodKind::Bad), -20);
    }

    #[test]
    fn test_ensure_normal_food_keeps_exactly_one() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut foods = manager(&mut rng);
        assert!(foods.ensure_normal_food(&[], &mut rng).is_some());
        assert!(foods.ensure_normal_food(&[], &mut rng).is_none());
        assert_eq!(foods.count(FoodKind::Normal), 1);
    }

    #[test]
    fn test_spawn_avoids_occupied_cells() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut foods = manager(&mut rng);
        let occupied: Vec<IVec2> = (0..10).map(|c| IVec2::new(c * 20, 0)).collect();
        for _ in 0..50 {
            foods.clear(&mut rng);
            let pos = foods
                .ensure_normal_food(&occupied, &mut rng)
                .expect("normal food spawns");
            assert!(pos.y > 0, "food landed on an occupied row: {pos:?}");
        }
    }

    #[test]
    fn test_timed_food_spawns_only_when_absent() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut foods = manager(&mut rng);

        foods.update(1.9, &[], &mut rng);
        assert_eq!(foods.count(FoodKind::Special), 0);

        foods.update(0.2, &[], &mut rng);
        assert_eq!(foods.count(FoodKind::Special), 1, "special fires at 2s");
        assert_eq!(foods.count(FoodKind::Bad), 0);

        foods.update(1.0, &[], &mut rng);
        assert_eq!(foods.count(FoodKind::Bad), 1, "bad fires at 3s");

        // Second special interval elapses while the first is still alive
        foods.update(1.0, &[], &mut rng);
        foods.update(0.5, &[], &mut rng);
        assert!(foods.count(FoodKind::Special) <= 1);
    }

    #[test]
    fn test_expired_food_is_dropped_permanently() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut foods = manager(&mut rng);
        assert!(foods.spawn_at(FoodKind::Bad, IVec2::new(40, 40)));
        foods.update(4.5, &[], &mut rng);
        // The bad timer may already have replaced it; any survivor must be fresh
        assert!(
            foods
                .foods()
                .filter(|f| f.kind == FoodKind::Bad)
                .all(|f| f.lifecycle.is_some_and(|l| l.age == 0.0)),
            "expired bad food removed"
        );
    }

    #[test]
    fn test_collision_priority_and_removal() {
        let mut rng = Pcg32::seed_from_u64(14);
        let mut foods = manager(&mut rng);
        let cell = IVec2::new(60, 60);
        assert!(foods.spawn_at(FoodKind::Bad, cell));
        assert!(foods.spawn_at(FoodKind::Normal, cell));

        let eaten = foods.check_collision(cell).expect("hit");
        assert_eq!(eaten.kind, FoodKind::Normal, "normal checked first");
        assert_eq!(foods.count(FoodKind::Normal), 0);

        let eaten = foods.check_collision(cell).expect("hit");
        assert_eq!(eaten.kind, FoodKind::Bad);
        assert!(foods.check_collision(cell).is_none());
    }

    #[test]
    fn test_cap_of_one_per_kind() {
        let mut rng = Pcg32::seed_from_u64(15);
        let mut foods = manager(&mut rng);
        assert!(foods.spawn_at(FoodKind::Special, IVec2::new(0, 0)));
        assert!(!foods.spawn_at(FoodKind::Special, IVec2::new(20, 0)));
        assert!(foods.spawn(FoodKind::Special, &[], &mut rng).is_none());
        assert_eq!(foods.count(FoodKind::Special), 1);
    }
}
