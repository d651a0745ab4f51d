use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use boid_core::EnvObjectKind;
use boid_headless::{load_settings, parse_point, run, Placement, Scenario};
use boid_shared::Position;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// Counts only
    Status,
    /// Every boid and environment object
    Snapshot,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the boid simulation without a display", long_about = None)]
struct Args {
    /// JSON settings file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<f32>,

    #[arg(long)]
    height: Option<f32>,

    /// Number of boids spawned at start
    #[arg(short, long)]
    boids: Option<usize>,

    /// Wrap around the world edges instead of turning away from them
    #[arg(long)]
    wrap: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Simulated ticks per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Obstacle position as x,y (repeatable)
    #[arg(long = "obstacle", value_parser = parse_point)]
    obstacles: Vec<Position>,

    /// Scatterer position as x,y (repeatable)
    #[arg(long = "scatterer", value_parser = parse_point)]
    scatterers: Vec<Position>,

    /// Goal position as x,y (repeatable)
    #[arg(long = "goal", value_parser = parse_point)]
    goals: Vec<Position>,

    /// Lifespan in seconds for objects placed from the command line
    #[arg(long)]
    lifespan: Option<f32>,

    #[arg(short, long, value_enum, default_value_t = Output::Status)]
    output: Output,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn scenario(&self) -> Result<Scenario> {
        let mut settings = load_settings(self.config.as_deref())?;
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(boids) = self.boids {
            settings.initial_boids = boids;
        }
        if self.wrap {
            settings.wrap = true;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }

        let step = Duration::try_from_secs_f32(1.0 / self.fps)
            .with_context(|| format!("fps must be positive, got {}", self.fps))?;

        let placements = [
            (EnvObjectKind::Obstacle, &self.obstacles),
            (EnvObjectKind::Scatterer, &self.scatterers),
            (EnvObjectKind::Goal, &self.goals),
        ]
        .into_iter()
        .flat_map(|(kind, positions)| {
            positions.iter().map(move |&position| Placement {
                kind,
                position,
                lifespan: self.lifespan,
            })
        })
        .collect();

        Ok(Scenario {
            settings,
            placements,
            ticks: self.ticks,
            step,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid headless runner starting...");
    let scenario = args.scenario().context("Failed to build scenario")?;
    let report = run(&scenario).context("Simulation error")?;

    let json = match args.output {
        Output::Status => serde_json::to_string_pretty(&report.status)?,
        Output::Snapshot => serde_json::to_string_pretty(&report)?,
    };
    println!("{}", json);

    Ok(())
}
