//! Flocking simulation core.
//!
//! Boids steer by cohesion, separation and alignment, modulated by obstacles,
//! scatterers and goals that hosts spawn and despawn at runtime. Hosts own a
//! [`Simulation`], call [`Simulation::tick`] at whatever cadence they like and
//! render from [`Simulation::snapshot`].

pub mod behavior;
pub mod boid;
pub mod config;
pub mod environment;
pub mod error;
pub mod simulation;
pub mod vector;

pub use boid::Boid;
pub use config::{BoidConfig, EnvironmentConfig, SimConfig};
pub use environment::{EntityKind, EnvObject, EnvObjectKind, Environment, Payload};
pub use error::SimError;
pub use simulation::{Simulation, Snapshot};
pub use vector::Vector2D;
