//! Snake Arena entry point
//!
//! Runs one headless game with the autopilot steering and reports the result.

mod headless {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use clap::Parser;

    use snake_arena::autopilot::choose_direction;
    use snake_arena::consts::DEFAULT_FRAME_DT;
    use snake_arena::sim::GameEvent;
    use snake_arena::{Command, Config, Game, GamePhase};

    #[derive(Parser, Debug)]
    #[command(name = "snake-arena")]
    #[command(about = "Play a headless Snake Arena run with the autopilot")]
    pub struct Args {
        /// RNG seed for the run
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Level to play (1-based, clamped to the level table)
        #[arg(short, long, default_value_t = 1)]
        level: u32,

        /// JSON config file; missing keys use the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frame limit before the run is abandoned
        #[arg(short, long, default_value_t = 60 * 60 * 5)]
        frames: u32,

        /// Frame length in milliseconds
        #[arg(long)]
        frame_ms: Option<f32>,
    }

    /// Read the config file; a malformed document falls back to defaults
    fn load_config(path: Option<&Path>) -> std::io::Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let json = fs::read_to_string(path)?;
        match Config::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                log::warn!("Invalid config {}: {}; using defaults", path.display(), e);
                Ok(Config::default())
            }
        }
    }

    fn log_event(frame: u32, event: &GameEvent) {
        match event {
            GameEvent::FoodEaten { kind, score_delta } => {
                log::info!("[{frame}] ate {} food ({:+})", kind.as_str(), score_delta)
            }
            GameEvent::PowerUpCollected { kind } => {
                log::info!("[{frame}] collected {}", kind.as_str())
            }
            GameEvent::Death => log::info!("[{frame}] crashed"),
            GameEvent::LifeLost { lives_remaining } => {
                log::info!("[{frame}] {} lives left", lives_remaining)
            }
            GameEvent::GameEnded {
                final_score,
                final_level,
            } => log::info!("[{frame}] game ended: {} on level {}", final_score, final_level),
        }
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();

        let config = match load_config(args.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Cannot read config: {}", e);
                eprintln!("Error reading config file: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let dt = args
            .frame_ms
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map_or(DEFAULT_FRAME_DT, |ms| ms / 1000.0);

        log::info!("Snake Arena (headless) starting, seed {}", args.seed);

        let mut game = Game::new(config, args.seed);
        game.handle(Command::OpenLevelSelect);
        game.handle(Command::SelectLevel(args.level));

        let mut frame = 0;
        while frame < args.frames && game.phase() != GamePhase::GameOver {
            if game.phase() == GamePhase::Playing {
                if let Some(direction) = game.simulation().and_then(choose_direction) {
                    game.handle(Command::Steer(direction));
                }
            }
            for event in game.update(dt) {
                log_event(frame, &event);
            }
            frame += 1;
        }

        let Some(sim) = game.simulation() else {
            log::error!("No run in progress");
            return ExitCode::FAILURE;
        };
        let snapshot = sim.snapshot();
        println!(
            "Level {} ({}) | score {} | lives {} | length {} | {:.1}s{}",
            snapshot.level,
            snapshot.level_name,
            snapshot.score,
            snapshot.lives,
            sim.snake.length(),
            sim.elapsed(),
            if snapshot.game_over { "" } else { " (frame limit)" }
        );

        if let Some(rank) = game.last_rank() {
            println!("New high score! Rank #{}", rank);
        }
        println!("High scores:");
        if game.high_scores().is_empty() {
            println!("  (none)");
        }
        for (i, entry) in game.high_scores().entries.iter().enumerate() {
            println!("  {:>2}. {:>6}  level {}", i + 1, entry.score, entry.level);
        }

        ExitCode::SUCCESS
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    headless::run()
}
