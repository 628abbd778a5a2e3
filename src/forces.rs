//! Per-agent force assembly: flocking (alpha), obstacle avoidance (beta) and
//! navigational feedback (gamma).

use crate::action::ActionProfile;
use crate::agent::{Agent, NavigationTarget, VirtualAgent};
use crate::config::{FlockParams, NeighborSearch};
use crate::math::{Vec2, NORMALIZE_EPSILON};
use crate::neighbor_grid::NeighborGrid;
use crate::smoothing::sigma_epsilon;

/// Pairs closer than this are treated as coincident and skipped.
pub const MIN_INTERACTION_DISTANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceField {
    params: FlockParams,
    profile: ActionProfile,
}

impl ForceField {
    pub fn new(params: FlockParams) -> Self {
        Self {
            profile: ActionProfile::new(&params),
            params,
        }
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn profile(&self) -> &ActionProfile {
        &self.profile
    }

    /// Gradient plus velocity-consensus term over `neighbors` closer than the
    /// interaction range. `neighbors` must not contain `agent` itself.
    pub fn alpha_force<'a, I>(&self, agent: &Agent, neighbors: I) -> Vec2
    where
        I: IntoIterator<Item = &'a Agent>,
    {
        let epsilon = self.profile.epsilon();
        let mut gradient = Vec2::ZERO;
        let mut consensus = Vec2::ZERO;

        for other in neighbors {
            let diff = other.position - agent.position;
            if !within_band(diff.length(), self.params.interaction_range) {
                continue;
            }

            let z = self.profile.sigma_norm(diff);
            gradient += sigma_epsilon(diff, epsilon) * self.profile.phi_alpha(z);

            let a_ij = self.profile.alpha_adjacency(agent.position, other.position);
            consensus += (other.velocity - agent.velocity) * a_ij;
        }

        gradient * self.params.c1_alpha + consensus * self.params.c2_alpha
    }

    /// Repulsion plus damping from every virtual agent within the obstacle
    /// range, whichever agent it was synthesized for.
    pub fn beta_force<'a, I>(&self, agent: &Agent, virtual_agents: I) -> Vec2
    where
        I: IntoIterator<Item = &'a VirtualAgent>,
    {
        let epsilon = self.profile.epsilon();
        let mut repulsion = Vec2::ZERO;
        let mut damping = Vec2::ZERO;

        for virtual_agent in virtual_agents {
            let diff = virtual_agent.position - agent.position;
            if !within_band(diff.length(), self.params.obstacle_range) {
                continue;
            }

            let z = self.profile.sigma_norm(diff);
            repulsion += sigma_epsilon(diff, epsilon) * self.profile.phi_beta(z);

            let b_ik = self
                .profile
                .beta_adjacency(agent.position, virtual_agent.position);
            damping += (virtual_agent.velocity - agent.velocity) * b_ik;
        }

        repulsion * self.params.c1_beta + damping * self.params.c2_beta
    }

    /// Navigational feedback towards `target`; zero when navigation is off.
    pub fn gamma_force(&self, agent: &Agent, target: Option<&NavigationTarget>) -> Vec2 {
        let Some(target) = target else {
            return Vec2::ZERO;
        };

        let diff = agent.position - target.position;
        let norm = diff.length();
        let position_term = if norm < NORMALIZE_EPSILON {
            Vec2::ZERO
        } else {
            diff * (1.0 / (1.0 + norm * norm).sqrt())
        };
        let velocity_term = agent.velocity - target.velocity;

        position_term * -self.params.c1_gamma - velocity_term * self.params.c2_gamma
    }
}

fn within_band(distance: f64, range: f64) -> bool {
    distance < range && distance > MIN_INTERACTION_DISTANCE
}

/// Owns the force field and the optional candidate grids, and writes every
/// agent's acceleration for one step.
pub struct ForceAssembler {
    field: ForceField,
    search: NeighborSearch,
    agent_grid: NeighborGrid,
    virtual_grid: NeighborGrid,
    candidates: Vec<usize>,
}

impl ForceAssembler {
    pub fn new(params: FlockParams, search: NeighborSearch) -> Self {
        Self {
            agent_grid: NeighborGrid::new(params.interaction_range),
            virtual_grid: NeighborGrid::new(params.obstacle_range),
            field: ForceField::new(params),
            search,
            candidates: Vec::new(),
        }
    }

    pub fn field(&self) -> &ForceField {
        &self.field
    }

    pub fn search(&self) -> NeighborSearch {
        self.search
    }

    /// Overwrites `acceleration` on every agent with alpha + beta + gamma.
    pub fn assemble(
        &mut self,
        agents: &mut [Agent],
        virtual_agents: &[VirtualAgent],
        target: Option<&NavigationTarget>,
    ) {
        match self.search {
            NeighborSearch::BruteForce => {
                for i in 0..agents.len() {
                    let accel = self.brute_force_acceleration(i, agents, virtual_agents, target);
                    agents[i].acceleration = accel;
                }
            }
            NeighborSearch::Grid => {
                self.agent_grid
                    .rebuild(agents.iter().map(|agent| agent.position));
                self.virtual_grid
                    .rebuild(virtual_agents.iter().map(|virtual_agent| virtual_agent.position));

                for i in 0..agents.len() {
                    let accel = self.grid_acceleration(i, agents, virtual_agents, target);
                    agents[i].acceleration = accel;
                }
            }
        }
    }

    fn brute_force_acceleration(
        &self,
        i: usize,
        agents: &[Agent],
        virtual_agents: &[VirtualAgent],
        target: Option<&NavigationTarget>,
    ) -> Vec2 {
        let agent = &agents[i];
        let others = agents
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| other);

        self.field.alpha_force(agent, others)
            + self.field.beta_force(agent, virtual_agents)
            + self.field.gamma_force(agent, target)
    }

    // Candidates are sorted so sums run in the same order as the brute-force
    // scan.
    fn grid_acceleration(
        &mut self,
        i: usize,
        agents: &[Agent],
        virtual_agents: &[VirtualAgent],
        target: Option<&NavigationTarget>,
    ) -> Vec2 {
        let agent = &agents[i];
        let params = *self.field.params();

        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.clear();
        self.agent_grid
            .for_each_within(agent.position, params.interaction_range, |j| {
                if j != i {
                    candidates.push(j);
                }
            });
        candidates.sort_unstable();
        let alpha = self
            .field
            .alpha_force(agent, candidates.iter().map(|&j| &agents[j]));

        candidates.clear();
        self.virtual_grid
            .for_each_within(agent.position, params.obstacle_range, |k| candidates.push(k));
        candidates.sort_unstable();
        let beta = self
            .field
            .beta_force(agent, candidates.iter().map(|&k| &virtual_agents[k]));

        self.candidates = candidates;
        alpha + beta + self.field.gamma_force(agent, target)
    }
}
