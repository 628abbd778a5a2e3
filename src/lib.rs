//! Flocking with obstacle avoidance and navigational feedback.
//!
//! Agents (alpha) hold spacing and match velocities with neighbors, obstacles
//! are seen through per-step virtual agents (beta) on their boundaries, and a
//! navigation target (gamma) steers the whole flock.
//!
//! [`Simulation`] is the native entry point; [`Sim`] wraps it for JavaScript.

use wasm_bindgen::prelude::*;

pub mod action;
pub mod agent;
pub mod config;
pub mod driver;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod math;
pub mod neighbor_grid;
pub mod obstacle;
pub mod simulation;
pub mod smoothing;

pub use agent::{Agent, NavigationTarget, VirtualAgent};
pub use config::{FlockParams, IntegratorConfig, NeighborSearch, SimConfig, SpawnConfig};
pub use error::{ConfigError, SimError};
pub use math::Vec2;
pub use obstacle::{Obstacle, ObstacleKind};
pub use simulation::{Simulation, Snapshot, StatusReport};

#[wasm_bindgen]
pub struct Sim {
    inner: Simulation,
}

#[wasm_bindgen]
impl Sim {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: u32) -> Result<Sim, JsError> {
        let config = SimConfig {
            spawn: SpawnConfig {
                agent_count: count,
                seed: Some(u64::from(seed)),
                ..SpawnConfig::default()
            },
            ..SimConfig::default()
        };
        Ok(Sim {
            inner: Simulation::new(config)?,
        })
    }

    pub fn from_config_json(json: &str) -> Result<Sim, JsError> {
        let config = SimConfig::from_json(json)?;
        Ok(Sim {
            inner: Simulation::new(config)?,
        })
    }

    pub fn step(&self, dt: f64) {
        self.inner.step(dt);
    }

    /// Steps by the clamped frame time if running; returns whether it stepped.
    pub fn tick(&self, elapsed_seconds: f64) -> bool {
        driver::advance_secs(&self.inner, elapsed_seconds)
    }

    pub fn start(&self) {
        self.inner.start();
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    pub fn add_obstacle(&self, x: f64, y: f64, radius: f64) {
        self.inner.add_obstacle(Vec2::new(x, y), radius);
    }

    pub fn add_obstacle_default(&self, x: f64, y: f64) {
        self.inner.add_obstacle_default(Vec2::new(x, y));
    }

    pub fn add_wall(&self, x: f64, y: f64) {
        self.inner.add_wall(Vec2::new(x, y));
    }

    pub fn clear_obstacles(&self) {
        self.inner.clear_obstacles();
    }

    pub fn set_target(&self, x: f64, y: f64) {
        self.inner.set_target(Vec2::new(x, y));
    }

    pub fn enable_target(&self) {
        self.inner.enable_target();
    }

    pub fn remove_target(&self) {
        self.inner.remove_target();
    }

    pub fn toggle_beta_display(&self) {
        self.inner.toggle_beta_display();
    }

    pub fn toggle_connections(&self) {
        self.inner.toggle_connections();
    }

    pub fn is_target_enabled(&self) -> bool {
        self.inner.is_target_enabled()
    }

    pub fn is_beta_display_enabled(&self) -> bool {
        self.inner.is_beta_display_enabled()
    }

    pub fn is_connections_display_enabled(&self) -> bool {
        self.inner.is_connections_display_enabled()
    }

    pub fn interaction_range(&self) -> f64 {
        self.inner.interaction_range()
    }

    pub fn obstacle_range(&self) -> f64 {
        self.inner.obstacle_range()
    }

    pub fn count(&self) -> usize {
        self.inner.agent_count()
    }

    /// `[x, y]` of the navigation target.
    pub fn target(&self) -> Vec<f64> {
        let target = self.inner.target();
        vec![target.position.x, target.position.y]
    }

    /// Interleaved `[x0, y0, x1, y1, ...]`.
    pub fn agent_positions(&self) -> Vec<f64> {
        flatten(self.inner.agents().iter().map(|agent| agent.position))
    }

    pub fn agent_velocities(&self) -> Vec<f64> {
        flatten(self.inner.agents().iter().map(|agent| agent.velocity))
    }

    /// Interleaved `[x, y, radius, kind]` per obstacle, kind 0 = disc, 1 = wall.
    pub fn obstacle_data(&self) -> Vec<f64> {
        self.inner
            .obstacles()
            .iter()
            .flat_map(|obstacle| {
                [
                    obstacle.position.x,
                    obstacle.position.y,
                    obstacle.radius,
                    f64::from(obstacle.kind.as_u32()),
                ]
            })
            .collect()
    }

    pub fn virtual_agent_positions(&self) -> Vec<f64> {
        flatten(
            self.inner
                .virtual_agents()
                .iter()
                .map(|virtual_agent| virtual_agent.position),
        )
    }

    pub fn status_line(&self) -> String {
        self.inner.status().to_string()
    }
}

fn flatten<I>(points: I) -> Vec<f64>
where
    I: Iterator<Item = Vec2>,
{
    points.flat_map(|p| [p.x, p.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::Sim;

    #[test]
    fn facade_exposes_flat_buffers() {
        let sim = Sim::new(8, 42).unwrap_or_else(|_| panic!("default config is valid"));
        assert_eq!(sim.count(), 8);
        assert_eq!(sim.agent_positions().len(), 16);
        assert_eq!(sim.agent_velocities().len(), 16);
        assert_eq!(sim.target(), vec![100.0, 100.0]);

        sim.add_obstacle(0.0, 0.0, 400.0);
        sim.add_wall(10.0, 10.0);
        assert_eq!(sim.obstacle_data(), vec![0.0, 0.0, 400.0, 0.0, 10.0, 10.0, 15.0, 1.0]);

        assert!(!sim.tick(0.05));
        sim.start();
        assert!(sim.tick(0.05));
        // Every agent sits inside the big disc.
        assert!(sim.virtual_agent_positions().len() >= 16);
        assert!(sim.status_line().contains("obstacles: 2"));
    }

    #[test]
    fn facade_loads_json_config() {
        let sim = Sim::from_config_json(r#"{ "spawn": { "agent_count": 3, "seed": 1 } }"#)
            .unwrap_or_else(|_| panic!("config is valid"));
        assert_eq!(sim.count(), 3);
        assert_eq!(sim.interaction_range(), 8.4);
        assert_eq!(sim.obstacle_range(), 5.2);
    }
}
