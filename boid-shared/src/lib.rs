use std::time::Duration;

use boid_core::{
    BoidConfig, EnvObject, EnvironmentConfig, Payload, SimConfig, SimError, Snapshot, Vector2D,
};
use serde::{Deserialize, Serialize};

/// Represents a 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

/// Simulation configuration as hosts read it from JSON.
///
/// Every field is optional in the document; missing ones take the defaults.
/// Lifespans are in seconds, `null` meaning forever.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimSettings {
    pub width: f32,
    pub height: f32,
    pub wrap: bool,
    pub initial_boids: usize,
    pub seed: Option<u64>,
    pub despawn_radius: f32,

    pub max_speed: f32,
    pub vision_range: f32,
    pub avoid_range: f32,
    pub cohesion_factor: f32,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub bound_margin: f32,
    pub turn_factor: f32,
    pub pinch_margin: f32,

    pub obstacle_size: f32,
    pub obstacle_avoid_range: f32,
    pub scatterer_effect_range: f32,
    pub goal_lure_strength: f32,
    pub obstacle_lifespan: Option<f32>,
    pub scatterer_lifespan: Option<f32>,
    pub goal_lifespan: Option<f32>,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings::from(&SimConfig::default())
    }
}

impl SimSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn lifespan_secs(lifespan: Option<Duration>) -> Option<f32> {
    lifespan.map(|d| d.as_secs_f32())
}

/// Convert a lifespan in seconds, `None` meaning forever.
///
/// Negative, NaN and overflowing values are rejected.
pub fn lifespan_from_secs(secs: Option<f32>) -> Result<Option<Duration>, SimError> {
    secs.map(|s| {
        Duration::try_from_secs_f32(s).map_err(|_| {
            SimError::InvalidConfig(format!(
                "lifespan must be a non-negative number of seconds, got {}",
                s
            ))
        })
    })
    .transpose()
}

impl From<&SimConfig> for SimSettings {
    fn from(config: &SimConfig) -> Self {
        let boids = &config.boids;
        let env = &config.environment;
        Self {
            width: config.width,
            height: config.height,
            wrap: config.wrap,
            initial_boids: config.initial_boids,
            seed: config.seed,
            despawn_radius: config.despawn_radius,
            max_speed: boids.max_speed,
            vision_range: boids.vision_range,
            avoid_range: boids.avoid_range,
            cohesion_factor: boids.cohesion_factor,
            separation_factor: boids.separation_factor,
            alignment_factor: boids.alignment_factor,
            bound_margin: boids.bound_margin,
            turn_factor: boids.turn_factor,
            pinch_margin: boids.pinch_margin,
            obstacle_size: env.obstacle_size,
            obstacle_avoid_range: env.obstacle_avoid_range,
            scatterer_effect_range: env.scatterer_effect_range,
            goal_lure_strength: env.goal_lure_strength,
            obstacle_lifespan: lifespan_secs(env.obstacle_lifespan),
            scatterer_lifespan: lifespan_secs(env.scatterer_lifespan),
            goal_lifespan: lifespan_secs(env.goal_lifespan),
        }
    }
}

impl TryFrom<SimSettings> for SimConfig {
    type Error = SimError;

    fn try_from(s: SimSettings) -> Result<Self, SimError> {
        Ok(SimConfig {
            boids: BoidConfig {
                max_speed: s.max_speed,
                vision_range: s.vision_range,
                avoid_range: s.avoid_range,
                cohesion_factor: s.cohesion_factor,
                separation_factor: s.separation_factor,
                alignment_factor: s.alignment_factor,
                bound_margin: s.bound_margin,
                turn_factor: s.turn_factor,
                pinch_margin: s.pinch_margin,
            },
            environment: EnvironmentConfig {
                obstacle_size: s.obstacle_size,
                obstacle_avoid_range: s.obstacle_avoid_range,
                scatterer_effect_range: s.scatterer_effect_range,
                goal_lure_strength: s.goal_lure_strength,
                obstacle_lifespan: lifespan_from_secs(s.obstacle_lifespan)?,
                scatterer_lifespan: lifespan_from_secs(s.scatterer_lifespan)?,
                goal_lifespan: lifespan_from_secs(s.goal_lifespan)?,
            },
            width: s.width,
            height: s.height,
            wrap: s.wrap,
            despawn_radius: s.despawn_radius,
            initial_boids: s.initial_boids,
            seed: s.seed,
        })
    }
}

/// A boid as the renderer needs it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: Position,
    pub velocity: Position,
    /// Heading in radians
    pub angle: f32,
}

/// An environment object as the renderer needs it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvObjectState {
    Obstacle {
        position: Position,
        size: f32,
        avoid_range: f32,
        expires_at: Option<f32>,
    },
    Scatterer {
        position: Position,
        effect_range: f32,
        expires_at: Option<f32>,
    },
    Goal {
        position: Position,
        lure_strength: f32,
        expires_at: Option<f32>,
    },
}

impl From<&EnvObject> for EnvObjectState {
    fn from(object: &EnvObject) -> Self {
        let position = Position::from(object.position);
        let expires_at = lifespan_secs(object.expiry);
        match object.payload {
            Payload::Obstacle { size, avoid_range } => EnvObjectState::Obstacle {
                position,
                size,
                avoid_range,
                expires_at,
            },
            Payload::Scatterer { effect_range } => EnvObjectState::Scatterer {
                position,
                effect_range,
                expires_at,
            },
            Payload::Goal { lure_strength } => EnvObjectState::Goal {
                position,
                lure_strength,
                expires_at,
            },
        }
    }
}

/// Owned, serializable copy of a [`Snapshot`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub width: f32,
    pub height: f32,
    /// Simulation clock in seconds
    pub time: f32,
    pub boids: Vec<BoidState>,
    pub objects: Vec<EnvObjectState>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Snapshot<'_>> for WorldSnapshot {
    fn from(snapshot: Snapshot<'_>) -> Self {
        Self {
            width: snapshot.bounds.x,
            height: snapshot.bounds.y,
            time: snapshot.clock.as_secs_f32(),
            boids: snapshot
                .boids
                .iter()
                .map(|boid| BoidState {
                    position: boid.position.into(),
                    velocity: boid.velocity.into(),
                    angle: boid.velocity.angle(),
                })
                .collect(),
            objects: snapshot.env_objects().map(EnvObjectState::from).collect(),
        }
    }
}

/// Status summary reported by hosts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub boid_count: usize,
    pub obstacle_count: usize,
    pub scatterer_count: usize,
    pub goal_count: usize,
    pub time: f32,
}

impl From<Snapshot<'_>> for StatusResponse {
    fn from(snapshot: Snapshot<'_>) -> Self {
        Self {
            boid_count: snapshot.boids.len(),
            obstacle_count: snapshot.environment.obstacles().len(),
            scatterer_count: snapshot.environment.scatterers().len(),
            goal_count: snapshot.environment.goals().len(),
            time: snapshot.clock.as_secs_f32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boid_core::{EntityKind, Simulation};

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_partial_settings_take_defaults() {
        let json = r#"{ "width": 1280, "wrap": true, "goal_lifespan": 4.5 }"#;
        let settings = SimSettings::from_json(json).unwrap();
        assert_eq!(settings.width, 1280.0);
        assert!(settings.wrap);
        assert_eq!(settings.height, 600.0);
        assert_eq!(settings.max_speed, 10.0);

        let config = SimConfig::try_from(settings).unwrap();
        assert_eq!(config.environment.goal_lifespan, Some(Duration::from_millis(4500)));
        assert_eq!(config.environment.obstacle_lifespan, None);
        assert_eq!(config.boids, BoidConfig::default());
    }

    #[test]
    fn test_negative_lifespan_is_rejected() {
        let settings = SimSettings {
            scatterer_lifespan: Some(-1.0),
            ..SimSettings::default()
        };
        let err = SimConfig::try_from(settings).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
        assert!(err.to_string().contains("-1"));

        assert!(lifespan_from_secs(Some(f32::NAN)).is_err());
        assert_eq!(lifespan_from_secs(None), Ok(None));
        assert_eq!(lifespan_from_secs(Some(0.0)), Ok(Some(Duration::ZERO)));
    }

    #[test]
    fn test_snapshot_serialization() {
        let mut simulation = Simulation::empty(SimConfig {
            initial_boids: 0,
            seed: Some(5),
            ..SimConfig::default()
        })
        .unwrap();
        simulation.spawn_boid_with_velocity(Vector2D::new(10.0, 20.0), Vector2D::new(0.0, 1.0));
        simulation.spawn(EntityKind::Obstacle, Vector2D::new(50.0, 50.0));
        simulation.spawn(EntityKind::Goal, Vector2D::new(70.0, 70.0));

        let snapshot = WorldSnapshot::from(simulation.snapshot());
        assert_eq!(snapshot.boids.len(), 1);
        assert_eq!(snapshot.objects.len(), 2);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["width"], 800.0);
        assert_eq!(json["objects"][0]["kind"], "obstacle");
        assert_eq!(json["objects"][0]["size"], 40.0);
        assert_eq!(json["objects"][1]["kind"], "goal");
        assert!(json["objects"][1]["expires_at"].is_null());

        let status = StatusResponse::from(simulation.snapshot());
        assert_eq!(status.boid_count, 1);
        assert_eq!(status.obstacle_count, 1);
        assert_eq!(status.scatterer_count, 0);
        assert_eq!(status.goal_count, 1);
    }
}
