//! Greedy autopilot for headless/demo play
//!
//! Picks the safe neighbouring cell closest to the nearest pickup. No search;
//! it will happily trap itself on long snakes.

use glam::IVec2;

use crate::sim::{Direction, FoodKind, PowerUpKind, Simulation};

/// Cell-step distance between two positions
fn manhattan(a: IVec2, b: IVec2, cell_size: i32) -> i32 {
    let d = (a - b).abs();
    (d.x + d.y) / cell_size.max(1)
}

/// Where the autopilot wants to go: nearest good food or power-up
fn target(sim: &Simulation) -> Option<IVec2> {
    let head = sim.snake.head();
    let cell = sim.arena().cell_size;
    sim.food
        .foods()
        .filter(|f| f.kind != FoodKind::Bad)
        .map(|f| f.pos)
        .chain(sim.powerups.positions())
        .min_by_key(|&pos| manhattan(head, pos, cell))
}

/// Direction to steer this tick, or `None` when every move is fatal
pub fn choose_direction(sim: &Simulation) -> Option<Direction> {
    let arena = sim.arena();
    let head = sim.snake.head();
    let current = sim.snake.direction();
    let wall_pass = sim.snake.has_effect(PowerUpKind::WallPass);
    let obstacles = sim.obstacles.positions();
    let bad_food: Vec<IVec2> = sim
        .food
        .foods()
        .filter(|f| f.kind == FoodKind::Bad)
        .map(|f| f.pos)
        .collect();

    // The tail moves out of the way unless the snake is still growing
    let body = sim.snake.body_vec();
    let skip_tail = usize::from(sim.snake.body_len() >= sim.snake.length());
    let blocked = &body[skip_tail.min(body.len())..];

    let goal = target(sim);

    Direction::ALL
        .iter()
        .copied()
        .filter(|d| current != Some(d.opposite()))
        .filter_map(|d| {
            let mut next = head + d.offset() * arena.cell_size;
            if !arena.contains(next) {
                if !wall_pass {
                    return None;
                }
                next = arena.wrap(next);
            }
            if arena.overlaps_any(next, &obstacles) || blocked.contains(&next) {
                return None;
            }
            let distance = goal.map_or(0, |g| manhattan(next, g, arena.cell_size));
            let eats_bad = arena.overlaps_any(next, &bad_food);
            let turns = current.is_some_and(|c| c != d);
            Some((d, (eats_bad, distance, turns)))
        })
        .min_by_key(|&(_, key)| key)
        .map(|(d, _)| d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArenaConfig, Config, LevelsConfig, PowerUpConfig};
    use crate::sim::{Obstacle, ObstacleKind, Snake};

    const CELL: i32 = 20;

    fn sim() -> Simulation {
        let config = Config {
            arena: ArenaConfig {
                x: 0,
                y: 0,
                width: 10 * CELL,
                height: 10 * CELL,
                cell_size: CELL,
            },
            powerups: PowerUpConfig {
                spawn_chance: 0.0,
                ..PowerUpConfig::default()
            },
            levels: LevelsConfig {
                obstacle_count: vec![0],
                moving_obstacle_count: vec![0],
                ..LevelsConfig::default()
            },
            ..Config::default()
        };
        let mut sim = Simulation::start_run(&config, 1, 3);
        sim.food.clear(&mut sim.rng);
        sim
    }

    #[test]
    fn test_heads_for_food() {
        let mut sim = sim();
        assert!(sim.food.spawn_at(FoodKind::Normal, IVec2::new(100, 40)));
        assert_eq!(choose_direction(&sim), Some(Direction::Up));
    }

    #[test]
    fn test_avoids_obstacle_and_wall() {
        let mut sim = sim();
        sim.snake = Snake::with_body(
            *sim.arena(),
            &[IVec2::new(180, 100)],
            Some(Direction::Right),
            3,
        );
        sim.obstacles
            .place(Obstacle::new(IVec2::new(180, 80), ObstacleKind::Wall));
        assert!(sim.food.spawn_at(FoodKind::Normal, IVec2::new(180, 0)));
        assert_eq!(choose_direction(&sim), Some(Direction::Down));
    }

    #[test]
    fn test_never_reverses() {
        let mut sim = sim();
        sim.snake = Snake::with_body(
            *sim.arena(),
            &[IVec2::new(100, 100)],
            Some(Direction::Right),
            3,
        );
        assert!(sim.food.spawn_at(FoodKind::Normal, IVec2::new(0, 100)));
        let choice = choose_direction(&sim);
        assert_ne!(choice, Some(Direction::Left));
        assert!(choice.is_some());
    }

    #[test]
    fn test_boxed_in_returns_none() {
        let mut sim = sim();
        sim.snake = Snake::with_body(*sim.arena(), &[IVec2::ZERO], Some(Direction::Up), 3);
        sim.obstacles
            .place(Obstacle::new(IVec2::new(20, 0), ObstacleKind::Fire));
        assert_eq!(choose_direction(&sim), None);
    }
}
