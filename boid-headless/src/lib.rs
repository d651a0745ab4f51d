use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use boid_core::{EntityKind, EnvObjectKind, SimConfig, Simulation};
use boid_shared::{lifespan_from_secs, Position, SimSettings, StatusResponse, WorldSnapshot};
use serde::Serialize;

/// An environment object to place before the first tick
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: EnvObjectKind,
    pub position: Position,
    /// Seconds; `None` keeps the configured default for the kind.
    pub lifespan: Option<f32>,
}

/// Everything needed for one headless run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub settings: SimSettings,
    pub placements: Vec<Placement>,
    pub ticks: u64,
    /// Simulated time between ticks
    pub step: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub ticks: u64,
    pub status: StatusResponse,
    pub snapshot: WorldSnapshot,
}

/// Parse `"x,y"` into a position.
pub fn parse_point(s: &str) -> Result<Position> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("expected x,y but got {:?}", s))?;
    let x: f32 = x.trim().parse().with_context(|| format!("bad x in {:?}", s))?;
    let y: f32 = y.trim().parse().with_context(|| format!("bad y in {:?}", s))?;
    Ok(Position::new(x, y))
}

/// Read settings from a JSON file, or use the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<SimSettings> {
    let Some(path) = path else {
        return Ok(SimSettings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = SimSettings::from_json(&json)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Build the world, place the scenario's objects and step it.
pub fn run(scenario: &Scenario) -> Result<RunReport> {
    let config = SimConfig::try_from(scenario.settings.clone())
        .context("Invalid simulation settings")?;
    let mut simulation = Simulation::new(config).context("Invalid simulation settings")?;

    for placement in &scenario.placements {
        let position = placement.position.into();
        match placement.lifespan {
            Some(secs) => {
                let lifespan = lifespan_from_secs(Some(secs))
                    .with_context(|| format!("Bad placement for {:?}", placement.kind))?;
                simulation.spawn_with_lifespan(placement.kind, position, lifespan);
            }
            None => simulation.spawn(EntityKind::from(placement.kind), position),
        }
    }

    log::info!(
        "Running {} ticks with {} boids and {} environment objects",
        scenario.ticks,
        simulation.boids().len(),
        simulation.environment().len()
    );

    let report_every = (scenario.ticks / 10).max(1);
    let mut now = simulation.clock();
    for tick in 1..=scenario.ticks {
        now += scenario.step;
        simulation.tick(now);

        if tick % report_every == 0 {
            let status = StatusResponse::from(simulation.snapshot());
            log::info!(
                "tick {}/{} t={:.2}s objects={}",
                tick,
                scenario.ticks,
                status.time,
                status.obstacle_count + status.scatterer_count + status.goal_count
            );
        }
    }

    Ok(RunReport {
        ticks: scenario.ticks,
        status: StatusResponse::from(simulation.snapshot()),
        snapshot: WorldSnapshot::from(simulation.snapshot()),
    })
}
