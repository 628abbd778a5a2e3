//! Static obstacles and their projection into per-step virtual agents.

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, VirtualAgent};
use crate::math::Vec2;

/// Below this center distance a disc projection has no usable direction.
pub const MIN_PROJECTION_DISTANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Disc,
    /// Axis-aligned wall through `position`; its orientation is chosen per
    /// agent from the relative offset.
    Wall,
}

impl ObstacleKind {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Disc => 0,
            Self::Wall => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f64,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn disc(position: Vec2, radius: f64) -> Self {
        Self {
            position,
            radius,
            kind: ObstacleKind::Disc,
        }
    }

    pub fn wall(position: Vec2, radius: f64) -> Self {
        Self {
            position,
            radius,
            kind: ObstacleKind::Wall,
        }
    }

    /// Whether `agent` is close enough to see this obstacle.
    pub fn in_range(&self, agent: &Agent, obstacle_range: f64) -> bool {
        agent.position.distance(self.position) < obstacle_range + self.radius
    }

    /// The virtual agent `agent` sees on this obstacle's boundary.
    pub fn project(&self, agent: &Agent) -> VirtualAgent {
        match self.kind {
            ObstacleKind::Disc => self.project_disc(agent),
            ObstacleKind::Wall => self.project_wall(agent),
        }
    }

    fn project_disc(&self, agent: &Agent) -> VirtualAgent {
        let to_center = self.position - agent.position;
        let distance = to_center.length();
        if distance <= MIN_PROJECTION_DISTANCE {
            return VirtualAgent {
                position: self.position + Vec2::new(self.radius, 0.0),
                velocity: Vec2::ZERO,
            };
        }

        let direction = to_center.normalized();
        let mu = self.radius / distance;
        let tangential = agent.velocity - direction * agent.velocity.dot(direction);
        VirtualAgent {
            position: self.position - direction * self.radius,
            velocity: tangential * mu,
        }
    }

    fn project_wall(&self, agent: &Agent) -> VirtualAgent {
        let offset = self.position - agent.position;
        if offset.x.abs() < offset.y.abs() {
            // Horizontal wall at the obstacle's y.
            VirtualAgent {
                position: Vec2::new(agent.position.x, self.position.y),
                velocity: Vec2::new(agent.velocity.x, 0.0),
            }
        } else {
            VirtualAgent {
                position: Vec2::new(self.position.x, agent.position.y),
                velocity: Vec2::new(0.0, agent.velocity.y),
            }
        }
    }
}

/// Rebuilds `out` with one virtual agent per (agent, obstacle) pair in range,
/// agents in the outer loop.
pub fn synthesize_virtual_agents(
    agents: &[Agent],
    obstacles: &[Obstacle],
    obstacle_range: f64,
    out: &mut Vec<VirtualAgent>,
) {
    out.clear();
    if obstacles.is_empty() {
        return;
    }

    for agent in agents {
        for obstacle in obstacles {
            if obstacle.in_range(agent, obstacle_range) {
                out.push(obstacle.project(agent));
            }
        }
    }
}
