//! The player's snake
//!
//! Body is stored tail-first, head-last. The head is always the last
//! segment, so wrapping the head also moves the body entry.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Arena;
use super::obstacle::Obstacle;
use super::powerup::PowerUpKind;
use crate::consts::STARTING_LENGTH;

/// Cardinal movement direction (screen coordinates, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit cell offset
    pub fn offset(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction from a signed delta; None unless exactly one axis is set
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Remaining seconds of each timed effect (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow_motion: f32,
    pub wall_pass: f32,
}

impl ActiveEffects {
    fn slot(&mut self, kind: PowerUpKind) -> &mut f32 {
        match kind {
            PowerUpKind::SlowMotion => &mut self.slow_motion,
            PowerUpKind::WallPass => &mut self.wall_pass,
        }
    }

    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::SlowMotion => self.slow_motion,
            PowerUpKind::WallPass => self.wall_pass,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Start or refresh an effect (re-pickup refreshes, never stacks)
    pub fn apply(&mut self, kind: PowerUpKind, duration: f32) {
        *self.slot(kind) = duration.max(0.0);
    }

    /// Run down all timers; returns the effects that ran out this tick
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot(kind);
            if *slot > 0.0 {
                *slot = (*slot - dt).max(0.0);
                if *slot == 0.0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    pub fn active(&self) -> Vec<(PowerUpKind, f32)> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .map(|k| (k, self.remaining(k)))
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The snake entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    arena: Arena,
    /// Segments, tail first, head last
    body: VecDeque<IVec2>,
    /// Target length; the body grows toward it one step at a time
    length: usize,
    /// Pending direction, applied on the next step
    direction: Option<Direction>,
    lives: u32,
    effects: ActiveEffects,
}

impl Snake {
    /// New snake of length 1 at the arena center, not moving
    pub fn new(arena: Arena, lives: u32) -> Self {
        let mut snake = Self {
            arena,
            body: VecDeque::new(),
            length: STARTING_LENGTH,
            direction: None,
            lives,
            effects: ActiveEffects::default(),
        };
        snake.reset_position();
        snake
    }

    /// Build a snake from explicit segments (tail first) heading `direction`
    pub fn with_body(
        arena: Arena,
        segments: &[IVec2],
        direction: Option<Direction>,
        lives: u32,
    ) -> Self {
        let mut snake = Self::new(arena, lives);
        if !segments.is_empty() {
            snake.body = segments.iter().copied().collect();
            snake.length = segments.len();
        }
        snake.direction = direction;
        snake
    }

    pub fn head(&self) -> IVec2 {
        self.body.back().copied().unwrap_or_else(|| self.arena.center())
    }

    pub fn body(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.body.iter().copied()
    }

    pub fn body_vec(&self) -> Vec<IVec2> {
        self.body.iter().copied().collect()
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn has_effect(&self, kind: PowerUpKind) -> bool {
        self.effects.is_active(kind)
    }

    /// Advance one cell in the pending direction; no-op when not moving
    pub fn step(&mut self) {
        let Some(direction) = self.direction else {
            return;
        };
        let head = self.head() + direction.offset() * self.arena.cell_size;
        self.body.push_back(head);
        while self.body.len() > self.length {
            self.body.pop_front();
        }
    }

    /// Set the pending direction unless it exactly reverses it
    ///
    /// Returns whether the change was accepted.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.direction == Some(direction.opposite()) {
            return false;
        }
        self.direction = Some(direction);
        true
    }

    pub fn grow(&mut self, amount: usize) {
        self.length += amount;
    }

    /// Shorten the target length (minimum 1), trimming the tail immediately
    pub fn shrink(&mut self, amount: usize) {
        self.length = self.length.saturating_sub(amount).max(1);
        while self.body.len() > self.length {
            self.body.pop_front();
        }
    }

    /// Boundary and self collision
    ///
    /// With wall-pass active, leaving the arena wraps the head to the
    /// opposite edge instead of counting as a collision.
    pub fn check_collision(&mut self) -> bool {
        let head = self.head();
        if !self.arena.contains(head) {
            if !self.has_effect(PowerUpKind::WallPass) {
                return true;
            }
            let wrapped = self.arena.wrap(head);
            if let Some(last) = self.body.back_mut() {
                *last = wrapped;
            }
        }

        let head = self.head();
        let len = self.body.len();
        self.body.iter().take(len.saturating_sub(1)).any(|&part| part == head)
    }

    /// Head against obstacles; wall-pass offers no protection here
    pub fn check_obstacle_collision(&self, obstacles: &[Obstacle]) -> bool {
        let head = self.head();
        obstacles
            .iter()
            .any(|o| self.arena.cells_overlap(head, o.pos))
    }

    /// Spend a life; true when none are left
    ///
    /// With lives remaining the snake restarts at the center with length 1,
    /// no direction, and no effects.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.reset_position();
        }
        self.lives == 0
    }

    pub fn reset_position(&mut self) {
        self.body.clear();
        self.body.push_back(self.arena.center());
        self.length = STARTING_LENGTH;
        self.direction = None;
        self.effects.clear();
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind, duration: f32) {
        self.effects.apply(kind, duration);
    }

    /// Run down effect timers; returns effects that expired
    pub fn update_effects(&mut self, dt: f32) -> Vec<PowerUpKind> {
        self.effects.tick(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;
    use proptest::prelude::*;

    const CELL: i32 = 20;

    fn arena() -> Arena {
        Arena::square(10, CELL)
    }

    fn at(col: i32, row: i32) -> IVec2 {
        IVec2::new(col * CELL, row * CELL)
    }

    #[test]
    fn test_starts_at_center_idle() {
        let snake = Snake::new(arena(), 3);
        assert_eq!(snake.head(), at(5, 5));
        assert_eq!(snake.body_len(), 1);
        assert_eq!(snake.length(), 1);
        assert_eq!(snake.direction(), None);
        assert_eq!(snake.lives(), 3);
    }

    #[test]
    fn test_step_without_direction_is_noop() {
        let mut snake = Snake::new(arena(), 3);
        snake.step();
        assert_eq!(snake.head(), at(5, 5));
        assert_eq!(snake.body_len(), 1);
    }

    #[test]
    fn test_step_moves_and_trims() {
        let mut snake = Snake::new(arena(), 3);
        snake.change_direction(Direction::Right);
        snake.step();
        assert_eq!(snake.body_vec(), vec![at(6, 5)]);

        snake.grow(2);
        snake.step();
        snake.step();
        snake.step();
        assert_eq!(snake.body_vec(), vec![at(7, 5), at(8, 5), at(9, 5)]);
    }

    #[test]
    fn test_reversal_rejected_against_pending_direction() {
        let mut snake = Snake::new(arena(), 3);
        assert!(snake.change_direction(Direction::Right));
        assert!(!snake.change_direction(Direction::Left));
        assert_eq!(snake.direction(), Some(Direction::Right));

        // Buffered turn: the pending direction is what reversal is checked against
        assert!(snake.change_direction(Direction::Up));
        assert!(snake.change_direction(Direction::Left));
        assert_eq!(snake.direction(), Some(Direction::Left));
    }

    #[test]
    fn test_wall_collision_without_wall_pass() {
        let mut snake = Snake::with_body(arena(), &[at(9, 5)], Some(Direction::Right), 3);
        snake.step();
        assert!(snake.check_collision());
    }

    #[test]
    fn test_wall_pass_wraps_each_edge() {
        let cases = [
            (at(9, 5), Direction::Right, at(0, 5)),
            (at(0, 5), Direction::Left, at(9, 5)),
            (at(4, 0), Direction::Up, at(4, 9)),
            (at(4, 9), Direction::Down, at(4, 0)),
        ];
        for (start, direction, expected) in cases {
            let mut snake = Snake::with_body(arena(), &[start], Some(direction), 3);
            snake.apply_power_up(PowerUpKind::WallPass, 5.0);
            snake.step();
            assert!(!snake.check_collision(), "{direction:?} should wrap");
            assert_eq!(snake.head(), expected);
        }
    }

    #[test]
    fn test_ragged_arena_keeps_head_on_grid() {
        let ragged = Arena::new(0, 0, 210, 200, CELL);

        let mut snake = Snake::with_body(ragged, &[at(9, 5)], Some(Direction::Right), 3);
        snake.step();
        assert!(snake.check_collision(), "partial column counts as wall");

        let mut snake = Snake::with_body(ragged, &[at(0, 5)], Some(Direction::Left), 3);
        snake.apply_power_up(PowerUpKind::WallPass, 5.0);
        snake.step();
        assert!(!snake.check_collision());
        assert_eq!(snake.head(), at(9, 5));
        assert_eq!(snake.head() % CELL, IVec2::ZERO);
    }

    #[test]
    fn test_wall_pass_does_not_protect_from_obstacles() {
        let mut snake = Snake::with_body(arena(), &[at(2, 2)], Some(Direction::Right), 3);
        snake.apply_power_up(PowerUpKind::WallPass, 5.0);
        snake.step();
        let obstacles = [Obstacle::new(at(3, 2), ObstacleKind::Wall)];
        assert!(snake.check_obstacle_collision(&obstacles));
    }

    #[test]
    fn test_short_snakes_survive_one_turn_per_step() {
        // Length 2 and 3 turning back through a tight loop, one turn per step
        for length in [2usize, 3] {
            let segments: Vec<IVec2> = (0..length as i32).map(|i| at(3 + i, 5)).collect();
            let mut snake = Snake::with_body(arena(), &segments, Some(Direction::Right), 3);
            for turn in [Direction::Down, Direction::Left, Direction::Up] {
                assert!(snake.change_direction(turn));
                snake.step();
                assert!(!snake.check_collision(), "length {length} bit itself on {turn:?}");
            }
            assert!(!snake.change_direction(Direction::Down), "reversal rejected");
        }
    }

    #[test]
    fn test_buffered_double_turn_folds_length_three_into_itself() {
        let segments = [at(3, 5), at(4, 5), at(5, 5)];
        let mut snake = Snake::with_body(arena(), &segments, Some(Direction::Right), 3);

        // Both turns land before the next step; Left only reverses the pending Up
        assert!(snake.change_direction(Direction::Up));
        assert!(snake.change_direction(Direction::Left));
        snake.step();

        assert_eq!(snake.body_vec(), vec![at(4, 5), at(5, 5), at(4, 5)]);
        assert!(snake.check_collision(), "head lands on the middle segment");
    }

    #[test]
    fn test_buffered_double_turn_is_survivable_at_length_two() {
        let segments = [at(4, 5), at(5, 5)];
        let mut snake = Snake::with_body(arena(), &segments, Some(Direction::Right), 3);

        assert!(snake.change_direction(Direction::Up));
        assert!(snake.change_direction(Direction::Left));
        snake.step();

        assert_eq!(snake.body_vec(), vec![at(5, 5), at(4, 5)]);
        assert!(!snake.check_collision(), "the only other segment is the old head");
    }

    #[test]
    fn test_length_four_square_loop_is_safe_length_five_is_not() {
        let loop_turns = [Direction::Down, Direction::Left, Direction::Up];

        let four: Vec<IVec2> = (0..4).map(|i| at(1 + i, 5)).collect();
        let mut snake = Snake::with_body(arena(), &four, Some(Direction::Right), 3);
        for turn in loop_turns {
            snake.change_direction(turn);
            snake.step();
            assert!(!snake.check_collision(), "tail vacates the cell in time");
        }

        let five: Vec<IVec2> = (0..5).map(|i| at(1 + i, 5)).collect();
        let mut snake = Snake::with_body(arena(), &five, Some(Direction::Right), 3);
        let mut bit = false;
        for turn in loop_turns {
            snake.change_direction(turn);
            snake.step();
            bit |= snake.check_collision();
        }
        assert!(bit, "length five closes the loop on its own body");
    }

    #[test]
    fn test_shrink_floors_at_one() {
        let segments = [at(1, 1), at(2, 1), at(3, 1)];
        let mut snake = Snake::with_body(arena(), &segments, Some(Direction::Right), 3);
        snake.shrink(1);
        assert_eq!(snake.body_vec(), vec![at(2, 1), at(3, 1)]);
        snake.shrink(5);
        assert_eq!(snake.length(), 1);
        assert_eq!(snake.body_vec(), vec![at(3, 1)]);
    }

    #[test]
    fn test_lose_life_resets_until_dead() {
        let segments = [at(1, 1), at(2, 1)];
        let mut snake = Snake::with_body(arena(), &segments, Some(Direction::Right), 2);
        snake.apply_power_up(PowerUpKind::SlowMotion, 5.0);

        assert!(!snake.lose_life());
        assert_eq!(snake.lives(), 1);
        assert_eq!(snake.body_vec(), vec![at(5, 5)]);
        assert_eq!(snake.direction(), None);
        assert!(!snake.has_effect(PowerUpKind::SlowMotion));

        assert!(snake.lose_life());
        assert_eq!(snake.lives(), 0);
        assert!(snake.lose_life(), "lives floor at zero");
        assert_eq!(snake.lives(), 0);
    }

    #[test]
    fn test_effects_refresh_and_expire() {
        let mut snake = Snake::new(arena(), 3);
        snake.apply_power_up(PowerUpKind::SlowMotion, 5.0);
        assert!(snake.update_effects(3.0).is_empty());
        snake.apply_power_up(PowerUpKind::SlowMotion, 5.0);
        assert_eq!(snake.effects().remaining(PowerUpKind::SlowMotion), 5.0, "refresh, not stack");
        assert!(snake.update_effects(4.0).is_empty());
        assert_eq!(snake.update_effects(1.5), vec![PowerUpKind::SlowMotion]);
        assert!(!snake.has_effect(PowerUpKind::SlowMotion));
    }

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(Direction::from_delta(20, 0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(0, -20), Some(Direction::Up));
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_body_contiguous_and_bounded(
            turns in prop::collection::vec(direction_strategy(), 1..80),
            growth in prop::collection::vec(0usize..3, 1..80),
        ) {
            let big = Arena::square(400, CELL);
            let mut snake = Snake::new(big, 3);
            for (turn, grow) in turns.iter().zip(growth.iter().cycle()) {
                snake.change_direction(*turn);
                snake.grow(*grow);
                snake.step();

                prop_assert!(snake.body_len() <= snake.length());
                let body = snake.body_vec();
                for pair in body.windows(2) {
                    let delta = (pair[1] - pair[0]).abs();
                    prop_assert_eq!(delta.x + delta.y, CELL, "segments one cell apart");
                }
            }
        }

        #[test]
        fn prop_reversal_never_changes_direction(first in direction_strategy(), repeats in 1usize..10) {
            let mut snake = Snake::new(arena(), 3);
            snake.change_direction(first);
            for _ in 0..repeats {
                prop_assert!(!snake.change_direction(first.opposite()));
                prop_assert_eq!(snake.direction(), Some(first));
            }
        }
    }
}
