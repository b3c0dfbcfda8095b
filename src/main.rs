//! Headless SmartBot demo
//!
//! Populates a reference world with bots, runs it at the fixed timestep and
//! logs what each snake did.
//!
//! Usage: `snake-smartbot [--seed N] [--seconds S] [--settings settings.json]`
//! Set `RUST_LOG=debug` to watch flee/search transitions.

use std::path::PathBuf;

use clap::Parser;
use snake_smartbot::{
    BotSettings,
    consts::SIM_DT,
    sim::{World, WorldSetup, populate, tick},
};

#[derive(Parser, Debug)]
#[command(name = "snake-smartbot")]
#[command(about = "Run SmartBot snakes in a headless reference world")]
struct Args {
    /// World seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Simulated time in seconds
    #[arg(long, default_value_t = 30.0, value_parser = parse_seconds)]
    seconds: f32,

    /// Bot settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("expected a finite, non-negative duration, got {s}"));
    }
    Ok(seconds)
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match BotSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => BotSettings::default(),
    };

    log::info!(
        "SmartBot demo starting (seed {}, {}s)",
        args.seed,
        args.seconds
    );

    let mut world = World::new(args.seed);
    let setup = WorldSetup {
        settings,
        ..Default::default()
    };
    let agents = match populate(&mut world, &setup) {
        Ok(agents) => agents,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let ticks = (args.seconds / SIM_DT).round() as u64;
    for _ in 0..ticks {
        tick(&mut world, SIM_DT);
    }

    for agent in agents {
        let Some(snake) = world.arena.snake(agent) else {
            continue;
        };
        let pos = world.head_pos(agent).unwrap_or_default();
        println!(
            "snake {:>2}: ate {:>3} orbs, head at ({:>6.2}, {:>6.2})",
            agent.0, snake.orbs_eaten, pos.x, pos.y
        );
    }
    log::info!("Simulated {} ticks", world.time_ticks);
}
