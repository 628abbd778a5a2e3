use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A physical flock member (alpha-agent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Total force from the most recent step; overwritten, never accumulated.
    pub acceleration: Vec2,
}

impl Agent {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    pub fn at_rest(position: Vec2) -> Self {
        Self::new(position, Vec2::ZERO)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

/// The obstacle boundary point seen by one agent during one step
/// (beta-agent). Rebuilt from scratch every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualAgent {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// The moving reference point the flock is steered towards (gamma-agent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl NavigationTarget {
    /// A stationary target; the model never gives it a velocity.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}
