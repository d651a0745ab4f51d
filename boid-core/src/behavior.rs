//! Steering rules for a single boid.
//!
//! Contributions are applied in a fixed order: flocking, goal seeking,
//! obstacle avoidance, boundary nudge, then the speed cap.

use crate::boid::{avoiding, seen, Boid};
use crate::config::BoidConfig;
use crate::environment::{EnvObject, Environment, Payload};
use crate::vector::Vector2D;

/// Cohesion, separation and alignment for `flock[index]`.
///
/// Returns zero when the boid sees nobody. Cohesion is inverted while the boid
/// stands inside any scatterer's effect range.
pub fn flocking(flock: &[Boid], index: usize, env: &Environment, config: &BoidConfig) -> Vector2D {
    let boid = &flock[index];
    let neighbours: Vec<usize> = seen(flock, index, config).collect();
    if neighbours.is_empty() {
        return Vector2D::zero();
    }
    let count = neighbours.len() as f32;

    let scattered = env
        .scatterers()
        .iter()
        .any(|scatterer| scatterer.reaches(&boid.position));
    let cohesion_factor = if scattered {
        -config.cohesion_factor
    } else {
        config.cohesion_factor
    };

    let centre: Vector2D = neighbours.iter().map(|&i| flock[i].position).sum::<Vector2D>() / count;
    let cohesion = (centre - boid.position) * cohesion_factor;

    let separation = avoiding(flock, index, config)
        .map(|i| boid.position - flock[i].position)
        .sum::<Vector2D>()
        * config.separation_factor;

    let heading: Vector2D = neighbours.iter().map(|&i| flock[i].velocity).sum::<Vector2D>() / count;
    let alignment = (heading - boid.velocity) * config.alignment_factor;

    cohesion + separation + alignment
}

/// `(cos θ + 1) · distance`, where θ is the angle between the boid's heading
/// and the direction to `target`.
///
/// `None` when the angle is undefined: a stationary boid, or one sitting
/// exactly on the target.
pub fn goal_priority(target: Vector2D, boid: &Boid) -> Option<f32> {
    let diff = target - boid.position;
    let distance = diff.magnitude();
    let speed = boid.speed();
    if distance == 0.0 || speed == 0.0 {
        return None;
    }
    let cos_theta = diff.dot(&boid.velocity) / distance / speed;
    let priority = (cos_theta + 1.0) * distance;
    priority.is_finite().then_some(priority)
}

/// Pick the goal with the highest priority.
///
/// Only a strictly greater priority replaces the current pick, starting from
/// zero, so the earliest goal wins ties and is the fallback when nothing beats
/// zero. A stationary boid selects nothing.
pub fn select_goal<'a>(boid: &Boid, goals: &'a [EnvObject]) -> Option<&'a EnvObject> {
    if goals.is_empty() || boid.velocity.is_zero() {
        return None;
    }

    let mut best: Option<&EnvObject> = None;
    let mut best_priority = 0.0;
    for goal in goals {
        if let Some(priority) = goal_priority(goal.position, boid) {
            if priority > best_priority {
                best_priority = priority;
                best = Some(goal);
            }
        }
    }
    best.or_else(|| goals.first())
}

pub fn seek_goal(boid: &mut Boid, goals: &[EnvObject]) {
    let Some(goal) = select_goal(boid, goals) else {
        return;
    };
    if let Payload::Goal { lure_strength } = goal.payload {
        boid.velocity += (goal.position - boid.position) * lure_strength;
    }
}

/// Component of `velocity` orthogonal to `diff`, or `None` when the boid is
/// heading away from the obstacle or sits on its centre.
///
/// A boid heading straight at the centre has no orthogonal component, so it
/// veers along the counter-clockwise perpendicular of its velocity instead.
fn deflection(velocity: Vector2D, diff: Vector2D) -> Option<Vector2D> {
    let along = velocity.dot(&diff);
    if along < 0.0 {
        return None;
    }
    let diff_sq = diff.dot(&diff);
    if diff_sq == 0.0 {
        return None;
    }
    let projection = diff * (along / diff_sq);
    let shade = velocity - projection;
    let speed = velocity.magnitude();
    if along > 0.0 && shade.magnitude() <= Vector2D::NEGLIGIBLE * speed {
        return Some(velocity.perpendicular());
    }
    Some(shade)
}

/// Turn the boid towards `nudge` without changing its speed.
///
/// The nudge is scaled to the current speed, added, and the result scaled back
/// to that speed. Negligible nudges, and ones that cancel the velocity
/// outright, leave the boid alone.
fn redirect(boid: &mut Boid, nudge: Vector2D) {
    let speed = boid.speed();
    let Some(nudge) = nudge.with_magnitude(speed) else {
        return;
    };
    if let Some(velocity) = (boid.velocity + nudge).with_magnitude(speed) {
        boid.velocity = velocity;
    }
}

/// Deflect the boid around obstacles within their reaction distance.
///
/// The summed deflection, and separately the push away from narrow gaps
/// between pairs of obstacles, each turn the boid while keeping its speed.
pub fn avoid_obstacles(boid: &mut Boid, obstacles: &[EnvObject], config: &BoidConfig) {
    let relevant: Vec<(Vector2D, f32)> = obstacles
        .iter()
        .filter(|obstacle| obstacle.reaches(&boid.position))
        .filter_map(|obstacle| match obstacle.payload {
            Payload::Obstacle { size, .. } => Some((obstacle.position, size)),
            _ => None,
        })
        .collect();
    if relevant.is_empty() {
        return;
    }

    let velocity = boid.velocity;
    let shade: Vector2D = relevant
        .iter()
        .filter_map(|&(position, _)| deflection(velocity, position - boid.position))
        .sum();

    // Distinct pairs only: an obstacle paired with itself is a zero-width gap.
    let mut pinch = Vector2D::zero();
    for (i, &(first, size)) in relevant.iter().enumerate() {
        for &(second, _) in &relevant[i + 1..] {
            let midpoint = (first + second) * 0.5;
            if first.distance(&midpoint) > size {
                continue;
            }
            if midpoint.distance(&boid.position) > size + config.pinch_margin {
                continue;
            }
            pinch += boid.position - midpoint;
        }
    }

    redirect(boid, shade);
    redirect(boid, pinch);
}

/// Run every steering rule for `flock[index]` and return its new velocity.
///
/// The position is left untouched; the caller integrates.
pub fn steer(
    flock: &[Boid],
    index: usize,
    env: &Environment,
    config: &BoidConfig,
    bounds: Vector2D,
    wrap: bool,
) -> Vector2D {
    let mut boid = flock[index].clone();

    boid.velocity += flocking(flock, index, env, config);
    seek_goal(&mut boid, env.goals());
    avoid_obstacles(&mut boid, env.obstacles(), config);

    if !wrap {
        boid.keep_in_bounds(bounds, config);
    }
    boid.cap_speed(config.max_speed);

    boid.velocity
}
