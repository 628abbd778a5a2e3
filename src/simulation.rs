//! Simulation state and its command/query surface.
//!
//! Every command and query takes the same lock, so each one is atomic with
//! respect to every other. Queries hand back owned copies; a renderer can work
//! on them without holding the lock.
//!
//! Each step scans all agent pairs and all virtual agents per agent unless
//! [`NeighborSearch::Grid`] is configured. That is fine for the default
//! population of a thousand agents.
//!
//! `step` does not look at the run state. The driver checks
//! [`Simulation::is_running`] before calling it (see [`crate::driver`]), and
//! must not step the same simulation from two threads at once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::agent::{Agent, NavigationTarget, VirtualAgent};
use crate::config::{NeighborSearch, SimConfig, SpawnConfig};
use crate::error::SimError;
use crate::forces::ForceAssembler;
use crate::integrator::integrate;
use crate::math::Vec2;
use crate::obstacle::{synthesize_virtual_agents, Obstacle};

/// A consistent copy of everything a render pass needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub agents: Vec<Agent>,
    pub obstacles: Vec<Obstacle>,
    pub virtual_agents: Vec<VirtualAgent>,
    pub target: NavigationTarget,
    pub target_enabled: bool,
    pub beta_display: bool,
    pub connections_display: bool,
}

/// Counts and flags for a one-line status readout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusReport {
    pub agents: usize,
    pub obstacles: usize,
    pub virtual_agents: usize,
    pub steps: u64,
    pub target_enabled: bool,
    pub beta_display: bool,
    pub connections_display: bool,
    pub running: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "agents: {} | obstacles: {} | beta-agents: {} | steps: {} | target: {} | beta-display: {} | connections: {} | {}",
            self.agents,
            self.obstacles,
            self.virtual_agents,
            self.steps,
            on_off(self.target_enabled),
            on_off(self.beta_display),
            on_off(self.connections_display),
            if self.running { "running" } else { "stopped" },
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

struct FlockState {
    agents: Vec<Agent>,
    obstacles: Vec<Obstacle>,
    virtual_agents: Vec<VirtualAgent>,
    target: NavigationTarget,
    target_enabled: bool,
    beta_display: bool,
    connections_display: bool,
    steps: u64,
    assembler: ForceAssembler,
}

impl FlockState {
    fn step(&mut self, dt: f64, config: &SimConfig) {
        synthesize_virtual_agents(
            &self.agents,
            &self.obstacles,
            config.params.obstacle_range,
            &mut self.virtual_agents,
        );

        let target = self.target_enabled.then_some(&self.target);
        self.assembler
            .assemble(&mut self.agents, &self.virtual_agents, target);

        for agent in &mut self.agents {
            integrate(agent, dt, &config.integrator);
        }

        self.steps = self.steps.wrapping_add(1);
        trace!(
            step = self.steps,
            dt,
            agents = self.agents.len(),
            virtual_agents = self.virtual_agents.len(),
            "stepped flock"
        );
    }
}

pub struct Simulation {
    config: SimConfig,
    state: Mutex<FlockState>,
    running: AtomicBool,
}

impl Simulation {
    /// Builds a simulation with a randomly scattered population.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = match config.spawn.seed {
            Some(seed) => seed,
            None => getrandom::u64().map_err(|e| SimError::Entropy(e.to_string()))?,
        };
        let agents = scatter_agents(&config.spawn, seed);
        debug!(agents = agents.len(), seed, "spawned flock");
        Ok(Self::build(config, agents))
    }

    /// Builds a simulation around an explicit population.
    pub fn from_agents(config: SimConfig, agents: Vec<Agent>) -> Result<Self, SimError> {
        config.validate()?;
        if let Some(index) = agents
            .iter()
            .position(|agent| !agent.position.is_finite() || !agent.velocity.is_finite())
        {
            return Err(SimError::NonFiniteAgent { index });
        }
        Ok(Self::build(config, agents))
    }

    fn build(config: SimConfig, agents: Vec<Agent>) -> Self {
        let state = FlockState {
            agents,
            obstacles: Vec::new(),
            virtual_agents: Vec::new(),
            target: NavigationTarget::at(config.initial_target),
            target_enabled: config.navigation_enabled,
            beta_display: false,
            connections_display: false,
            steps: 0,
            assembler: ForceAssembler::new(config.params, config.neighbor_search),
        };

        Self {
            config,
            state: Mutex::new(state),
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn neighbor_search(&self) -> NeighborSearch {
        self.config.neighbor_search
    }

    /// Recomputes virtual agents, assembles forces and integrates every agent.
    pub fn step(&self, dt: f64) {
        self.state.lock().step(dt, &self.config);
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!("simulation started");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("simulation stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn add_obstacle(&self, position: Vec2, radius: f64) {
        self.push_obstacle(Obstacle::disc(position, radius));
    }

    /// Adds a disc with the configured default radius.
    pub fn add_obstacle_default(&self, position: Vec2) {
        self.add_obstacle(position, self.config.default_obstacle_radius);
    }

    pub fn add_wall(&self, position: Vec2) {
        self.push_obstacle(Obstacle::wall(position, self.config.default_obstacle_radius));
    }

    fn push_obstacle(&self, obstacle: Obstacle) {
        let mut state = self.state.lock();
        state.obstacles.push(obstacle);
        info!(
            x = obstacle.position.x,
            y = obstacle.position.y,
            radius = obstacle.radius,
            kind = ?obstacle.kind,
            total = state.obstacles.len(),
            "added obstacle"
        );
    }

    pub fn clear_obstacles(&self) {
        let mut state = self.state.lock();
        state.obstacles.clear();
        state.virtual_agents.clear();
        info!("cleared all obstacles");
    }

    /// Moves the target and turns navigation on.
    pub fn set_target(&self, position: Vec2) {
        let mut state = self.state.lock();
        state.target = NavigationTarget::at(position);
        state.target_enabled = true;
        info!(x = position.x, y = position.y, "target set");
    }

    pub fn enable_target(&self) {
        self.state.lock().target_enabled = true;
    }

    pub fn remove_target(&self) {
        self.state.lock().target_enabled = false;
    }

    pub fn toggle_beta_display(&self) {
        let mut state = self.state.lock();
        state.beta_display = !state.beta_display;
    }

    pub fn toggle_connections(&self) {
        let mut state = self.state.lock();
        state.connections_display = !state.connections_display;
    }

    pub fn agents(&self) -> Vec<Agent> {
        self.state.lock().agents.clone()
    }

    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.state.lock().obstacles.clone()
    }

    pub fn virtual_agents(&self) -> Vec<VirtualAgent> {
        self.state.lock().virtual_agents.clone()
    }

    pub fn target(&self) -> NavigationTarget {
        self.state.lock().target
    }

    pub fn is_target_enabled(&self) -> bool {
        self.state.lock().target_enabled
    }

    pub fn is_beta_display_enabled(&self) -> bool {
        self.state.lock().beta_display
    }

    pub fn is_connections_display_enabled(&self) -> bool {
        self.state.lock().connections_display
    }

    pub fn interaction_range(&self) -> f64 {
        self.config.params.interaction_range
    }

    pub fn obstacle_range(&self) -> f64 {
        self.config.params.obstacle_range
    }

    pub fn agent_count(&self) -> usize {
        self.state.lock().agents.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            agents: state.agents.clone(),
            obstacles: state.obstacles.clone(),
            virtual_agents: state.virtual_agents.clone(),
            target: state.target,
            target_enabled: state.target_enabled,
            beta_display: state.beta_display,
            connections_display: state.connections_display,
        }
    }

    pub fn status(&self) -> StatusReport {
        let state = self.state.lock();
        StatusReport {
            agents: state.agents.len(),
            obstacles: state.obstacles.len(),
            virtual_agents: state.virtual_agents.len(),
            steps: state.steps,
            target_enabled: state.target_enabled,
            beta_display: state.beta_display,
            connections_display: state.connections_display,
            running: self.is_running(),
        }
    }
}

fn scatter_agents(spawn: &SpawnConfig, seed: u64) -> Vec<Agent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = spawn.half_extent;
    let sample = |rng: &mut StdRng| {
        if extent > 0.0 {
            rng.gen_range(-extent..extent)
        } else {
            0.0
        }
    };

    (0..spawn.agent_count)
        .map(|_| {
            let position = Vec2::new(sample(&mut rng), sample(&mut rng));
            let velocity =
                Vec2::new(sample(&mut rng), sample(&mut rng)) * spawn.velocity_scale;
            Agent::new(position, velocity)
        })
        .collect()
}
