use core::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::behavior;
use crate::boid::Boid;
use crate::config::SimConfig;
use crate::environment::{EntityKind, EnvObject, EnvObjectKind, Environment};
use crate::error::SimError;
use crate::vector::Vector2D;

/// A flock together with the environment objects it reacts to
#[derive(Debug, Clone)]
pub struct Simulation {
    boids: Vec<Boid>,
    environment: Environment,
    config: SimConfig,
    /// `now` of the most recent tick, used to stamp spawned objects.
    clock: Duration,
    rng: StdRng,
}

impl Simulation {
    /// Build a simulation and populate it with `config.initial_boids` boids.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let initial = config.initial_boids;
        let mut simulation = Self::empty(config)?;
        simulation.populate(initial);
        Ok(simulation)
    }

    /// Build a simulation with no boids and no environment objects.
    pub fn empty(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::debug!(
            "Creating simulation {}x{} (wrap: {})",
            config.width,
            config.height,
            config.wrap
        );
        Ok(Self {
            boids: Vec::new(),
            environment: Environment::new(),
            config,
            clock: Duration::ZERO,
            rng,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vector2D {
        Vector2D::new(self.config.width, self.config.height)
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Move the clock to the host's `now` without stepping the world.
    ///
    /// Hosts whose clock does not start at zero call this before spawning
    /// anything, so lifespans are counted from the host's time.
    pub fn set_clock(&mut self, now: Duration) {
        self.clock = now;
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Add `count` boids at random positions inside the bounds.
    pub fn populate(&mut self, count: usize) {
        let bounds = self.bounds();
        let max_speed = self.config.boids.max_speed;
        self.boids
            .extend((0..count).map(|_| Boid::random(&mut self.rng, bounds, max_speed)));
        log::debug!("Populated {} boids, total {}", count, self.boids.len());
    }

    /// Spawn an entity of `kind` at `position`.
    ///
    /// Boids get a random velocity; environment objects get the default
    /// parameters and lifespan for their kind, counted from the current clock.
    pub fn spawn(&mut self, kind: EntityKind, position: Vector2D) {
        match kind.env_kind() {
            None => {
                let boid = Boid::random_at(&mut self.rng, position, self.config.boids.max_speed);
                self.boids.push(boid);
            }
            Some(env_kind) => {
                self.environment.spawn(
                    env_kind,
                    position,
                    self.clock,
                    &self.config.environment,
                );
            }
        }
        log::debug!("Spawned {} at ({}, {})", kind, position.x, position.y);
    }

    pub fn spawn_boid_with_velocity(&mut self, position: Vector2D, velocity: Vector2D) {
        self.boids.push(Boid::new(position, velocity));
    }

    /// Spawn an environment object that expires `lifespan` after the current
    /// clock, or never when `lifespan` is `None`.
    pub fn spawn_with_lifespan(
        &mut self,
        kind: EnvObjectKind,
        position: Vector2D,
        lifespan: Option<Duration>,
    ) {
        self.environment.spawn_with_lifespan(
            kind,
            position,
            self.clock,
            lifespan,
            &self.config.environment,
        );
        log::debug!(
            "Spawned {} at ({}, {}) for {:?}",
            EntityKind::from(kind),
            position.x,
            position.y,
            lifespan
        );
    }

    /// Remove every environment object of `kind` within `radius` of
    /// `position`. Boids cannot be despawned.
    pub fn despawn(
        &mut self,
        kind: EntityKind,
        position: Vector2D,
        radius: f32,
    ) -> Result<usize, SimError> {
        let Some(env_kind) = kind.env_kind() else {
            log::warn!("Ignoring despawn request for {}", kind);
            return Err(SimError::NotDespawnable(kind));
        };
        let removed = self.environment.despawn(env_kind, position, radius);
        log::debug!(
            "Despawned {} {}(s) near ({}, {})",
            removed,
            kind,
            position.x,
            position.y
        );
        Ok(removed)
    }

    /// [`Simulation::despawn`] with the configured despawn radius.
    pub fn despawn_near(
        &mut self,
        kind: EntityKind,
        position: Vector2D,
    ) -> Result<usize, SimError> {
        let radius = self.config.despawn_radius;
        self.despawn(kind, position, radius)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let previous = (self.config.width, self.config.height);
        self.config.width = width;
        self.config.height = height;
        if let Err(err) = self.config.validate() {
            (self.config.width, self.config.height) = previous;
            return Err(err);
        }
        log::debug!("Resized to {}x{}", width, height);
        Ok(())
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.config.wrap = wrap;
    }

    /// Advance the world by one step.
    ///
    /// Expired objects are pruned first. Boids are then updated one at a time
    /// in collection order, each moving before the next is steered, so later
    /// boids observe the new positions of earlier ones.
    pub fn tick(&mut self, now: Duration) {
        self.clock = now;
        let pruned = self.environment.prune_expired(now);
        if pruned > 0 {
            log::debug!("Pruned {} expired environment object(s)", pruned);
        }

        let bounds = self.bounds();
        let wrap = self.config.wrap;
        for index in 0..self.boids.len() {
            let velocity = behavior::steer(
                &self.boids,
                index,
                &self.environment,
                &self.config.boids,
                bounds,
                wrap,
            );
            let boid = &mut self.boids[index];
            boid.velocity = velocity;
            boid.advance(bounds, wrap);
        }
        log::trace!("Tick at {:?}: {} boids", now, self.boids.len());
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            boids: &self.boids,
            environment: &self.environment,
            bounds: self.bounds(),
            clock: self.clock,
        }
    }
}

/// Read-only view of the world for rendering
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub boids: &'a [Boid],
    pub environment: &'a Environment,
    pub bounds: Vector2D,
    pub clock: Duration,
}

impl<'a> Snapshot<'a> {
    pub fn objects(&self, kind: EnvObjectKind) -> &'a [EnvObject] {
        self.environment.objects(kind)
    }

    pub fn env_objects(&self) -> impl Iterator<Item = &'a EnvObject> {
        self.environment.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            width: 1000.0,
            height: 1000.0,
            initial_boids: 0,
            seed: Some(42),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_new_populates() {
        let simulation = Simulation::new(SimConfig {
            initial_boids: 25,
            ..config()
        })
        .unwrap();
        assert_eq!(simulation.boids().len(), 25);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Simulation::new(SimConfig {
            height: -1.0,
            ..config()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_spawn_each_kind() {
        let mut simulation = Simulation::empty(config()).unwrap();
        for kind in EntityKind::ALL {
            simulation.spawn(kind, Vector2D::new(100.0, 100.0));
        }
        assert_eq!(simulation.boids().len(), 1);
        assert_eq!(simulation.environment().len(), 3);
        assert!(simulation.boids()[0].speed() <= simulation.config().boids.max_speed);
    }

    #[test]
    fn test_despawn_boid_is_rejected() {
        let mut simulation = Simulation::empty(config()).unwrap();
        simulation.spawn(EntityKind::Boid, Vector2D::new(100.0, 100.0));
        let result = simulation.despawn(EntityKind::Boid, Vector2D::new(100.0, 100.0), 30.0);
        assert_eq!(result, Err(SimError::NotDespawnable(EntityKind::Boid)));
        assert_eq!(simulation.boids().len(), 1);
    }

    #[test]
    fn test_despawn_near_uses_configured_radius() {
        let mut simulation = Simulation::empty(config()).unwrap();
        simulation.spawn(EntityKind::Goal, Vector2D::new(100.0, 100.0));
        assert_eq!(
            simulation.despawn_near(EntityKind::Goal, Vector2D::new(100.0, 131.0)),
            Ok(0)
        );
        assert_eq!(
            simulation.despawn_near(EntityKind::Goal, Vector2D::new(100.0, 130.0)),
            Ok(1)
        );
    }

    #[test]
    fn test_lifespan_counts_from_seeded_clock() {
        let mut simulation = Simulation::empty(config()).unwrap();
        simulation.set_clock(Duration::from_millis(4_000));
        simulation.spawn_with_lifespan(
            EnvObjectKind::Scatterer,
            Vector2D::new(10.0, 10.0),
            Some(Duration::from_secs(2)),
        );
        assert_eq!(
            simulation.environment().scatterers()[0].expiry,
            Some(Duration::from_millis(6_000))
        );

        simulation.tick(Duration::from_millis(5_000));
        assert_eq!(simulation.environment().scatterers().len(), 1);
        simulation.tick(Duration::from_millis(6_000));
        assert!(simulation.environment().scatterers().is_empty());
    }

    #[test]
    fn test_resize_keeps_old_bounds_on_error() {
        let mut simulation = Simulation::empty(config()).unwrap();
        assert!(simulation.resize(0.0, 10.0).is_err());
        assert_eq!(simulation.bounds(), Vector2D::new(1000.0, 1000.0));
        simulation.resize(640.0, 480.0).unwrap();
        assert_eq!(simulation.snapshot().bounds, Vector2D::new(640.0, 480.0));
    }

    #[test]
    fn test_later_boids_see_moved_earlier_boids() {
        let mut simulation = Simulation::empty(SimConfig {
            wrap: true,
            ..config()
        })
        .unwrap();
        // the first boid moves out of the second one's vision before it is steered
        simulation
            .spawn_boid_with_velocity(Vector2D::new(500.0, 500.0), Vector2D::new(-10.0, 0.0));
        simulation.spawn_boid_with_velocity(Vector2D::new(570.0, 500.0), Vector2D::new(0.0, 1.0));
        simulation.tick(Duration::from_millis(16));

        let boids = simulation.boids();
        assert_eq!(boids[1].velocity, Vector2D::new(0.0, 1.0));
        assert_eq!(boids[1].position, Vector2D::new(570.0, 501.0));
    }
}
