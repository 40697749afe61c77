//! Decoupled-timestep update loop
//!
//! Movement advances only when the move timer reaches the current interval;
//! lifecycles and spawn timers advance on every call. Collisions resolve in a
//! fixed order each tick: boundary/self, obstacle, food, power-up. A death
//! ends collision handling for that tick.

use super::state::{GameEvent, Simulation};
use crate::consts::MAX_FRAME_DT;

/// Advance the simulation by `dt` seconds and return what happened
pub fn tick(sim: &mut Simulation, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if sim.game_over {
        return events;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    sim.elapsed += dt;

    // Effect timers
    for kind in sim.snake.update_effects(dt) {
        log::debug!("{} wore off", kind.as_str());
    }

    // Movement
    sim.move_timer += dt;
    if sim.move_timer >= sim.effective_move_interval() {
        sim.move_timer = 0.0;
        sim.snake.step();
    }

    // Collisions
    if resolve_collisions(sim, &mut events) {
        return events;
    }

    // Lifecycles and spawning
    let occupied = sim.occupied_cells();
    sim.food.update(dt, &occupied, &mut sim.rng);
    let occupied = sim.occupied_cells();
    sim.powerups.update(dt, &occupied, &mut sim.rng);
    sim.obstacles.update(dt);

    events
}

/// Resolve this tick's collisions; true when the run ended
fn resolve_collisions(sim: &mut Simulation, events: &mut Vec<GameEvent>) -> bool {
    let fatal = sim.snake.check_collision()
        || sim.snake.check_obstacle_collision(sim.obstacles.obstacles());
    if fatal {
        return handle_death(sim, events);
    }

    let head = sim.snake.head();
    if let Some(food) = sim.food.check_collision(head) {
        let score_delta = food.score_delta(sim.food.config());
        sim.apply_score(score_delta);
        if score_delta > 0 {
            sim.snake.grow(1);
        } else if score_delta < 0 {
            sim.snake.shrink(1);
        }
        log::debug!(
            "Ate {} food at {:?} ({:+}), score {}",
            food.kind.as_str(),
            food.pos,
            score_delta,
            sim.score
        );
        events.push(GameEvent::FoodEaten {
            kind: food.kind,
            score_delta,
        });

        let occupied = sim.occupied_cells();
        sim.food.ensure_normal_food(&occupied, &mut sim.rng);
    }

    if let Some(powerup) = sim.powerups.check_collision(head) {
        sim.snake.apply_power_up(powerup.kind, powerup.duration);
        log::debug!(
            "Collected {} for {:.1}s",
            powerup.kind.as_str(),
            powerup.duration
        );
        events.push(GameEvent::PowerUpCollected { kind: powerup.kind });
    }

    false
}

/// Spend a life; end the run when none remain
fn handle_death(sim: &mut Simulation, events: &mut Vec<GameEvent>) -> bool {
    events.push(GameEvent::Death);

    if sim.snake.lose_life() {
        sim.game_over = true;
        log::info!(
            "Game over: score {} on level {} after {:.1}s",
            sim.score,
            sim.level.level,
            sim.elapsed
        );
        events.push(GameEvent::GameEnded {
            final_score: sim.score,
            final_level: sim.level.level,
        });
        return true;
    }

    let lives_remaining = sim.snake.lives();
    log::debug!("Lost a life, {} remaining", lives_remaining);
    events.push(GameEvent::LifeLost { lives_remaining });
    false
}
