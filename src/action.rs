//! Adjacency weights and action potentials for agent-agent and
//! agent-obstacle interactions.

use crate::config::FlockParams;
use crate::math::Vec2;
use crate::smoothing::{bump_function, sigma_1, sigma_norm, sigma_norm_of_length};

/// Sigma-norm constants derived once from [`FlockParams`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionProfile {
    epsilon: f64,
    h_alpha: f64,
    h_beta: f64,
    /// Sigma-norm of the interaction range.
    r_alpha: f64,
    /// Sigma-norm of the desired distance.
    d_alpha: f64,
    /// Sigma-norm of the obstacle set-point distance.
    d_beta: f64,
}

impl ActionProfile {
    pub fn new(params: &FlockParams) -> Self {
        Self {
            epsilon: params.epsilon,
            h_alpha: params.h_alpha,
            h_beta: params.h_beta,
            r_alpha: sigma_norm_of_length(params.interaction_range, params.epsilon),
            d_alpha: sigma_norm_of_length(params.desired_distance, params.epsilon),
            d_beta: sigma_norm_of_length(params.obstacle_setpoint(), params.epsilon),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn r_alpha(&self) -> f64 {
        self.r_alpha
    }

    pub fn d_alpha(&self) -> f64 {
        self.d_alpha
    }

    pub fn d_beta(&self) -> f64 {
        self.d_beta
    }

    pub fn sigma_norm(&self, z: Vec2) -> f64 {
        sigma_norm(z, self.epsilon)
    }

    pub fn alpha_adjacency(&self, q_i: Vec2, q_j: Vec2) -> f64 {
        bump_function(self.sigma_norm(q_j - q_i) / self.r_alpha, self.h_alpha)
    }

    pub fn beta_adjacency(&self, q_i: Vec2, obstacle_pos: Vec2) -> f64 {
        bump_function(self.sigma_norm(obstacle_pos - q_i) / self.d_beta, self.h_beta)
    }

    /// Positive beyond the desired spacing and negative inside it. Multiplied
    /// by the direction towards the neighbor this pulls distant agents in and
    /// pushes close ones apart; zero exactly at `d_alpha`.
    pub fn phi_alpha(&self, z: f64) -> f64 {
        let bump = bump_function(z / self.r_alpha, self.h_alpha);
        bump * sigma_1(z - self.d_alpha)
    }

    /// Never positive: obstacles only repel.
    pub fn phi_beta(&self, z: f64) -> f64 {
        let bump = bump_function(z / self.d_beta, self.h_beta);
        bump * (sigma_1(z - self.d_beta) - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ActionProfile;
    use crate::config::FlockParams;
    use crate::math::Vec2;

    fn profile() -> ActionProfile {
        ActionProfile::new(&FlockParams::default())
    }

    #[test]
    fn phi_alpha_vanishes_at_desired_spacing() {
        let p = profile();
        let z = p.sigma_norm(Vec2::new(FlockParams::default().desired_distance, 0.0));
        assert!(p.phi_alpha(z).abs() < 1.0e-12);
        assert!(p.phi_alpha(p.d_alpha()).abs() < 1.0e-12);
    }

    #[test]
    fn phi_alpha_changes_sign_around_equilibrium() {
        let p = profile();
        assert!(p.phi_alpha(p.d_alpha() - 1.0) < 0.0);
        assert!(p.phi_alpha(p.d_alpha() + 0.5) > 0.0);
    }

    #[test]
    fn phi_alpha_is_zero_beyond_range() {
        let p = profile();
        assert_eq!(p.phi_alpha(p.r_alpha()), 0.0);
        assert_eq!(p.phi_alpha(p.r_alpha() * 2.0), 0.0);
    }

    #[test]
    fn phi_beta_is_never_attractive() {
        let p = profile();
        for step in 0..400 {
            let z = step as f64 * 0.05;
            assert!(p.phi_beta(z) <= 0.0, "phi_beta({z}) > 0");
        }
        assert!(p.phi_beta(0.0) < -1.0);
        assert_eq!(p.phi_beta(p.d_beta()), 0.0);
    }

    #[test]
    fn adjacency_is_one_up_close_and_zero_far_away() {
        let p = profile();
        let origin = Vec2::ZERO;
        assert_eq!(p.alpha_adjacency(origin, Vec2::new(0.5, 0.0)), 1.0);
        assert_eq!(p.alpha_adjacency(origin, Vec2::new(8.5, 0.0)), 0.0);
        assert_eq!(p.beta_adjacency(origin, Vec2::new(1.0, 0.0)), 1.0);
        assert_eq!(p.beta_adjacency(origin, Vec2::new(4.3, 0.0)), 0.0);

        let mid = p.alpha_adjacency(origin, Vec2::new(6.0, 0.0));
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let p = profile();
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.5, -1.0);
        assert_eq!(p.alpha_adjacency(a, b), p.alpha_adjacency(b, a));
    }
}
