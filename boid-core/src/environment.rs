//! Environment objects and their registry.
//!
//! Obstacles deflect boids, scatterers invert cohesion and goals lure. Each
//! kind lives in its own insertion-ordered list; the order only matters for
//! goal tie-breaking.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use crate::config::EnvironmentConfig;
use crate::error::SimError;
use crate::vector::Vector2D;

/// Everything a host can ask the simulation to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Boid,
    Obstacle,
    Scatterer,
    Goal,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Boid,
        EntityKind::Obstacle,
        EntityKind::Scatterer,
        EntityKind::Goal,
    ];

    /// The environment object kind, or `None` for boids.
    pub fn env_kind(self) -> Option<EnvObjectKind> {
        match self {
            EntityKind::Boid => None,
            EntityKind::Obstacle => Some(EnvObjectKind::Obstacle),
            EntityKind::Scatterer => Some(EnvObjectKind::Scatterer),
            EntityKind::Goal => Some(EnvObjectKind::Goal),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Boid => "boid",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Scatterer => "scatterer",
            EntityKind::Goal => "goal",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boid" | "agent" => Ok(EntityKind::Boid),
            "obstacle" => Ok(EntityKind::Obstacle),
            "scatterer" => Ok(EntityKind::Scatterer),
            "goal" => Ok(EntityKind::Goal),
            _ => Err(SimError::UnknownKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvObjectKind {
    Obstacle,
    Scatterer,
    Goal,
}

impl EnvObjectKind {
    pub const ALL: [EnvObjectKind; 3] = [
        EnvObjectKind::Obstacle,
        EnvObjectKind::Scatterer,
        EnvObjectKind::Goal,
    ];
}

impl From<EnvObjectKind> for EntityKind {
    fn from(kind: EnvObjectKind) -> Self {
        match kind {
            EnvObjectKind::Obstacle => EntityKind::Obstacle,
            EnvObjectKind::Scatterer => EntityKind::Scatterer,
            EnvObjectKind::Goal => EntityKind::Goal,
        }
    }
}

/// Kind-specific parameters of an environment object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Obstacle { size: f32, avoid_range: f32 },
    Scatterer { effect_range: f32 },
    Goal { lure_strength: f32 },
}

impl Payload {
    /// Default parameters for `kind`.
    pub fn for_kind(kind: EnvObjectKind, config: &EnvironmentConfig) -> Self {
        match kind {
            EnvObjectKind::Obstacle => Payload::Obstacle {
                size: config.obstacle_size,
                avoid_range: config.obstacle_avoid_range,
            },
            EnvObjectKind::Scatterer => Payload::Scatterer {
                effect_range: config.scatterer_effect_range,
            },
            EnvObjectKind::Goal => Payload::Goal {
                lure_strength: config.goal_lure_strength,
            },
        }
    }

    pub fn kind(&self) -> EnvObjectKind {
        match self {
            Payload::Obstacle { .. } => EnvObjectKind::Obstacle,
            Payload::Scatterer { .. } => EnvObjectKind::Scatterer,
            Payload::Goal { .. } => EnvObjectKind::Goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvObject {
    pub position: Vector2D,
    /// Simulation time at which the object disappears; `None` lives forever.
    pub expiry: Option<Duration>,
    pub payload: Payload,
}

impl EnvObject {
    pub fn new(position: Vector2D, expiry: Option<Duration>, payload: Payload) -> Self {
        Self {
            position,
            expiry,
            payload,
        }
    }

    pub fn kind(&self) -> EnvObjectKind {
        self.payload.kind()
    }

    pub fn is_alive(&self, now: Duration) -> bool {
        match self.expiry {
            None => true,
            Some(expiry) => now < expiry,
        }
    }

    /// Size plus avoidance margin for obstacles.
    pub fn reaction_distance(&self) -> Option<f32> {
        match self.payload {
            Payload::Obstacle { size, avoid_range } => Some(size + avoid_range),
            _ => None,
        }
    }

    /// Whether this object acts on a boid standing at `point`.
    ///
    /// Obstacles react inside their reaction distance, scatterers inside their
    /// effect range. Goals attract from anywhere.
    pub fn reaches(&self, point: &Vector2D) -> bool {
        let distance = self.position.distance(point);
        match self.payload {
            Payload::Obstacle { size, avoid_range } => distance < size + avoid_range,
            Payload::Scatterer { effect_range } => distance < effect_range,
            Payload::Goal { .. } => true,
        }
    }
}

/// Registry of live environment objects, one list per kind
#[derive(Debug, Clone, Default)]
pub struct Environment {
    obstacles: Vec<EnvObject>,
    scatterers: Vec<EnvObject>,
    goals: Vec<EnvObject>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_mut(&mut self, kind: EnvObjectKind) -> &mut Vec<EnvObject> {
        match kind {
            EnvObjectKind::Obstacle => &mut self.obstacles,
            EnvObjectKind::Scatterer => &mut self.scatterers,
            EnvObjectKind::Goal => &mut self.goals,
        }
    }

    /// Live objects of `kind` in insertion order.
    pub fn objects(&self, kind: EnvObjectKind) -> &[EnvObject] {
        match kind {
            EnvObjectKind::Obstacle => &self.obstacles,
            EnvObjectKind::Scatterer => &self.scatterers,
            EnvObjectKind::Goal => &self.goals,
        }
    }

    pub fn obstacles(&self) -> &[EnvObject] {
        &self.obstacles
    }

    pub fn scatterers(&self) -> &[EnvObject] {
        &self.scatterers
    }

    pub fn goals(&self) -> &[EnvObject] {
        &self.goals
    }

    /// All live objects, obstacles first, then scatterers, then goals.
    pub fn iter(&self) -> impl Iterator<Item = &EnvObject> {
        self.obstacles
            .iter()
            .chain(self.scatterers.iter())
            .chain(self.goals.iter())
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.scatterers.len() + self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an object with the default parameters and lifespan for `kind`.
    pub fn spawn(
        &mut self,
        kind: EnvObjectKind,
        position: Vector2D,
        now: Duration,
        config: &EnvironmentConfig,
    ) {
        let lifespan = match kind {
            EnvObjectKind::Obstacle => config.obstacle_lifespan,
            EnvObjectKind::Scatterer => config.scatterer_lifespan,
            EnvObjectKind::Goal => config.goal_lifespan,
        };
        self.spawn_with_lifespan(kind, position, now, lifespan, config);
    }

    pub fn spawn_with_lifespan(
        &mut self,
        kind: EnvObjectKind,
        position: Vector2D,
        now: Duration,
        lifespan: Option<Duration>,
        config: &EnvironmentConfig,
    ) {
        let expiry = lifespan.map(|lifespan| now + lifespan);
        self.insert(EnvObject::new(
            position,
            expiry,
            Payload::for_kind(kind, config),
        ));
    }

    /// Append a fully specified object to the list for its kind.
    pub(crate) fn insert(&mut self, object: EnvObject) {
        self.bucket_mut(object.kind()).push(object);
    }

    /// Remove every object of `kind` within `radius` (inclusive) of
    /// `position`. Returns the number removed.
    pub fn despawn(&mut self, kind: EnvObjectKind, position: Vector2D, radius: f32) -> usize {
        let bucket = self.bucket_mut(kind);
        let before = bucket.len();
        bucket.retain(|object| object.position.distance(&position) > radius);
        before - bucket.len()
    }

    /// Drop every object whose expiry has passed. Returns the number removed.
    pub fn prune_expired(&mut self, now: Duration) -> usize {
        let before = self.len();
        for kind in EnvObjectKind::ALL {
            self.bucket_mut(kind).retain(|object| object.is_alive(now));
        }
        before - self.len()
    }
}
