use core::time::Duration;

use crate::error::SimError;

/// Steering constants shared by every boid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidConfig {
    pub max_speed: f32,
    pub vision_range: f32,
    pub avoid_range: f32,
    /// Pull towards the centre of mass of visible neighbours (C1).
    pub cohesion_factor: f32,
    /// Push away from neighbours inside `avoid_range` (C2).
    pub separation_factor: f32,
    /// Match the mean velocity of visible neighbours (C3).
    pub alignment_factor: f32,
    pub bound_margin: f32,
    pub turn_factor: f32,
    /// Slack added to the obstacle size when checking whether a boid is near
    /// the gap between two obstacles.
    pub pinch_margin: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            vision_range: 75.0,
            avoid_range: 20.0,
            cohesion_factor: 0.005,
            separation_factor: 0.05,
            alignment_factor: 0.05,
            bound_margin: 100.0,
            turn_factor: 1.0,
            pinch_margin: 10.0,
        }
    }
}

/// Parameters given to newly spawned environment objects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentConfig {
    pub obstacle_size: f32,
    pub obstacle_avoid_range: f32,
    pub scatterer_effect_range: f32,
    pub goal_lure_strength: f32,
    pub obstacle_lifespan: Option<Duration>,
    pub scatterer_lifespan: Option<Duration>,
    pub goal_lifespan: Option<Duration>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            obstacle_size: 40.0,
            obstacle_avoid_range: 35.0,
            scatterer_effect_range: 120.0,
            goal_lure_strength: 0.0005,
            obstacle_lifespan: None,
            scatterer_lifespan: None,
            goal_lifespan: None,
        }
    }
}

/// Configuration for a whole simulation instance
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub boids: BoidConfig,
    pub environment: EnvironmentConfig,
    pub width: f32,
    pub height: f32,
    /// Wrap positions around the world edges instead of steering away from them.
    pub wrap: bool,
    pub despawn_radius: f32,
    pub initial_boids: usize,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boids: BoidConfig::default(),
            environment: EnvironmentConfig::default(),
            width: 800.0,
            height: 600.0,
            wrap: false,
            despawn_radius: 30.0,
            initial_boids: 100,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "world bounds must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.boids.max_speed > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "max_speed must be positive, got {}",
                self.boids.max_speed
            )));
        }
        if self.boids.avoid_range > self.boids.vision_range {
            return Err(SimError::InvalidConfig(format!(
                "avoid_range ({}) must not exceed vision_range ({})",
                self.boids.avoid_range, self.boids.vision_range
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let config = SimConfig {
            width: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_avoid_range_beyond_vision() {
        let mut config = SimConfig::default();
        config.boids.avoid_range = 100.0;
        assert!(config.validate().is_err());
    }
}
