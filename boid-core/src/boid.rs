use rand::Rng;

use crate::config::BoidConfig;
use crate::vector::Vector2D;

/// A single boid entity
#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// Boid at `position` with each velocity component drawn from
    /// `[-max_speed / 2, max_speed / 2)`.
    pub fn random_at<R: Rng + ?Sized>(rng: &mut R, position: Vector2D, max_speed: f32) -> Self {
        let half = max_speed / 2.0;
        let velocity = Vector2D::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        Self::new(position, velocity)
    }

    /// Boid anywhere inside `bounds` with a random velocity.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Vector2D, max_speed: f32) -> Self {
        let position = Vector2D::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))
            .mul_elementwise(bounds);
        Self::random_at(rng, position, max_speed)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    pub fn can_see(&self, other: &Boid, config: &BoidConfig) -> bool {
        self.position.distance(&other.position) <= config.vision_range
    }

    pub fn is_crowded_by(&self, other: &Boid, config: &BoidConfig) -> bool {
        self.position.distance(&other.position) <= config.avoid_range
    }

    /// Nudge inwards on every axis where the boid is within `bound_margin`
    /// of an edge.
    pub fn keep_in_bounds(&mut self, bounds: Vector2D, config: &BoidConfig) {
        let half = bounds * 0.5;
        let offset = self.position - half;
        let margin = half - Vector2D::splat(config.bound_margin);
        self.velocity += offset.sign_with_threshold(margin) * -config.turn_factor;
    }

    pub fn cap_speed(&mut self, max_speed: f32) {
        self.velocity = self.velocity.limit(max_speed);
    }

    /// One explicit Euler step, wrapping around `bounds` when `wrap` is set.
    pub fn advance(&mut self, bounds: Vector2D, wrap: bool) {
        let position = self.position + self.velocity;
        self.position = if wrap {
            position.floor_mod(bounds)
        } else {
            position
        };
    }
}

/// Indices of the boids `index` can see, excluding itself.
pub fn seen<'a>(
    boids: &'a [Boid],
    index: usize,
    config: &'a BoidConfig,
) -> impl Iterator<Item = usize> + 'a {
    let boid = &boids[index];
    boids
        .iter()
        .enumerate()
        .filter(move |(i, other)| *i != index && boid.can_see(other, config))
        .map(|(i, _)| i)
}

/// Subset of [`seen`] that is close enough to push away from.
pub fn avoiding<'a>(
    boids: &'a [Boid],
    index: usize,
    config: &'a BoidConfig,
) -> impl Iterator<Item = usize> + 'a {
    let boid = &boids[index];
    seen(boids, index, config).filter(move |&i| boid.is_crowded_by(&boids[i], config))
}
