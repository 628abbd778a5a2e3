use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec2;

pub const DEFAULT_DESIRED_DISTANCE: f64 = 7.0;
pub const DEFAULT_INTERACTION_RANGE: f64 = 8.4;
pub const DEFAULT_OBSTACLE_RANGE: f64 = 5.2;
pub const DEFAULT_OBSTACLE_SETPOINT_RATIO: f64 = 0.6;
pub const DEFAULT_SIGMA_EPSILON: f64 = 0.1;
pub const DEFAULT_MAX_SPEED: f64 = 100.0;
pub const DEFAULT_SOFT_BOUNDARY: f64 = 180.0;
pub const DEFAULT_HARD_BOUNDARY: f64 = 200.0;
pub const DEFAULT_BOUNDARY_PUSH: f64 = 5.0;
pub const DEFAULT_AGENT_COUNT: usize = 1000;
pub const DEFAULT_SPAWN_HALF_EXTENT: f64 = 150.0;
pub const DEFAULT_SPAWN_VELOCITY_SCALE: f64 = 0.05;
pub const DEFAULT_OBSTACLE_RADIUS: f64 = 15.0;
pub const DEFAULT_TARGET: Vec2 = Vec2::new(100.0, 100.0);

/// Coefficients of the three-term force model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    /// Desired spacing `d` between neighboring agents.
    pub desired_distance: f64,
    /// Interaction range `r` between agents.
    pub interaction_range: f64,
    /// Range `r'` at which virtual obstacle agents act on an agent.
    pub obstacle_range: f64,
    /// `d_beta = obstacle_setpoint_ratio * desired_distance`.
    pub obstacle_setpoint_ratio: f64,
    pub c1_alpha: f64,
    pub c2_alpha: f64,
    pub c1_beta: f64,
    pub c2_beta: f64,
    pub c1_gamma: f64,
    pub c2_gamma: f64,
    /// Sigma-norm smoothing parameter.
    pub epsilon: f64,
    pub h_alpha: f64,
    pub h_beta: f64,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            desired_distance: DEFAULT_DESIRED_DISTANCE,
            interaction_range: DEFAULT_INTERACTION_RANGE,
            obstacle_range: DEFAULT_OBSTACLE_RANGE,
            obstacle_setpoint_ratio: DEFAULT_OBSTACLE_SETPOINT_RATIO,
            c1_alpha: 8.0,
            c2_alpha: 6.0,
            c1_beta: 5.0,
            c2_beta: 2.0,
            c1_gamma: 0.5,
            c2_gamma: 0.8,
            epsilon: DEFAULT_SIGMA_EPSILON,
            h_alpha: 0.2,
            h_beta: 0.8,
        }
    }
}

impl FlockParams {
    pub fn obstacle_setpoint(&self) -> f64 {
        self.desired_distance * self.obstacle_setpoint_ratio
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("desired_distance", self.desired_distance)?;
        require_positive("interaction_range", self.interaction_range)?;
        require_non_negative("obstacle_range", self.obstacle_range)?;
        require_positive("obstacle_setpoint_ratio", self.obstacle_setpoint_ratio)?;
        require_non_negative("c1_alpha", self.c1_alpha)?;
        require_non_negative("c2_alpha", self.c2_alpha)?;
        require_non_negative("c1_beta", self.c1_beta)?;
        require_non_negative("c2_beta", self.c2_beta)?;
        require_non_negative("c1_gamma", self.c1_gamma)?;
        require_non_negative("c2_gamma", self.c2_gamma)?;
        require_positive("epsilon", self.epsilon)?;
        require_threshold("h_alpha", self.h_alpha)?;
        require_threshold("h_beta", self.h_beta)?;
        Ok(())
    }
}

/// Speed limit and the soft rectangular arena.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    pub max_speed: f64,
    /// Per-axis distance from the origin where the containment push starts.
    pub soft_boundary: f64,
    /// Per-axis distance where the push reaches `boundary_push`.
    pub hard_boundary: f64,
    pub boundary_push: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            soft_boundary: DEFAULT_SOFT_BOUNDARY,
            hard_boundary: DEFAULT_HARD_BOUNDARY,
            boundary_push: DEFAULT_BOUNDARY_PUSH,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_speed", self.max_speed)?;
        require_non_negative("soft_boundary", self.soft_boundary)?;
        require_positive("hard_boundary", self.hard_boundary)?;
        require_non_negative("boundary_push", self.boundary_push)?;
        if self.soft_boundary >= self.hard_boundary {
            return Err(ConfigError::BoundaryOrder {
                soft: self.soft_boundary,
                hard: self.hard_boundary,
            });
        }
        Ok(())
    }
}

/// Initial random population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub agent_count: usize,
    /// Positions are drawn uniformly from `[-half_extent, half_extent)` per axis.
    pub half_extent: f64,
    /// Velocities are drawn from the same range, then scaled by this factor.
    pub velocity_scale: f64,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            half_extent: DEFAULT_SPAWN_HALF_EXTENT,
            velocity_scale: DEFAULT_SPAWN_VELOCITY_SCALE,
            seed: None,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("half_extent", self.half_extent)?;
        require_non_negative("velocity_scale", self.velocity_scale)?;
        Ok(())
    }
}

/// How pairwise candidates are gathered during force assembly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Scan every agent and virtual agent for each agent.
    #[default]
    BruteForce,
    /// Pre-filter candidates through a uniform grid rebuilt every step.
    Grid,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub params: FlockParams,
    pub integrator: IntegratorConfig,
    pub spawn: SpawnConfig,
    pub initial_target: Vec2,
    pub navigation_enabled: bool,
    pub default_obstacle_radius: f64,
    pub neighbor_search: NeighborSearch,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            params: FlockParams::default(),
            integrator: IntegratorConfig::default(),
            spawn: SpawnConfig::default(),
            initial_target: DEFAULT_TARGET,
            navigation_enabled: true,
            default_obstacle_radius: DEFAULT_OBSTACLE_RADIUS,
            neighbor_search: NeighborSearch::default(),
        }
    }
}

impl SimConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        self.integrator.validate()?;
        self.spawn.validate()?;
        require_finite("initial_target.x", self.initial_target.x)?;
        require_finite("initial_target.y", self.initial_target.y)?;
        require_positive("default_obstacle_radius", self.default_obstacle_radius)?;
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn require_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if !(0.0..1.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FlockParams, IntegratorConfig, NeighborSearch, SimConfig};
    use crate::error::ConfigError;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
        assert!((FlockParams::default().obstacle_setpoint() - 4.2).abs() < 1.0e-12);
    }

    #[test]
    fn rejects_unit_bump_threshold() {
        let params = FlockParams {
            h_beta: 1.0,
            ..FlockParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                field: "h_beta",
                value: 1.0
            })
        );
    }

    #[test]
    fn rejects_nan_and_zero_epsilon() {
        let nan = FlockParams {
            epsilon: f64::NAN,
            ..FlockParams::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::NonFinite {
                field: "epsilon",
                ..
            })
        ));

        let zero = FlockParams {
            epsilon: 0.0,
            ..FlockParams::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::NonPositive {
                field: "epsilon",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_boundaries() {
        let integrator = IntegratorConfig {
            soft_boundary: 250.0,
            ..IntegratorConfig::default()
        };
        assert_eq!(
            integrator.validate(),
            Err(ConfigError::BoundaryOrder {
                soft: 250.0,
                hard: 200.0
            })
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(
            r#"{ "params": { "c1_gamma": 1.5 }, "neighbor_search": "grid", "spawn": { "agent_count": 12, "seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.params.c1_gamma, 1.5);
        assert_eq!(config.params.c2_gamma, 0.8);
        assert_eq!(config.neighbor_search, NeighborSearch::Grid);
        assert_eq!(config.spawn.agent_count, 12);
        assert_eq!(config.spawn.seed, Some(7));
        assert_eq!(config.integrator, IntegratorConfig::default());
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        assert!(matches!(
            SimConfig::from_json(r#"{ "integrator": { "max_speed": -1.0 } }"#),
            Err(ConfigError::NonPositive {
                field: "max_speed",
                ..
            })
        ));
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
