//! Smooth replacements for the Euclidean norm and a compact-support kernel.
//!
//! Every force term is built from these three transforms, so each one is
//! defined for every input including the zero vector.

use std::f64::consts::PI;

use crate::math::{Vec2, NORMALIZE_EPSILON};

/// `(1/eps) * (sqrt(1 + eps*|z|^2) - 1)`. Non-negative, zero only at the
/// origin and differentiable there.
pub fn sigma_norm(z: Vec2, epsilon: f64) -> f64 {
    sigma_norm_of_length(z.length(), epsilon)
}

/// Sigma-norm of any vector with Euclidean length `length`.
pub fn sigma_norm_of_length(length: f64, epsilon: f64) -> f64 {
    ((1.0 + epsilon * length * length).sqrt() - 1.0) / epsilon
}

/// Smoothed direction `z / sqrt(1 + eps*|z|^2)`; zero for `|z| < 1e-10`.
pub fn sigma_epsilon(z: Vec2, epsilon: f64) -> Vec2 {
    let norm = z.length();
    if norm < NORMALIZE_EPSILON {
        return Vec2::ZERO;
    }
    z * (1.0 / (1.0 + epsilon * norm * norm).sqrt())
}

/// `sigma_1(z) = z / sqrt(1 + z^2)`.
pub fn sigma_1(z: f64) -> f64 {
    z / (1.0 + z * z).sqrt()
}

/// Equals 1 below `h`, tapers with a half cosine on `[h, 1)`, and is 0 from 1
/// on. `h` must lie in `[0, 1)`.
pub fn bump_function(z: f64, h: f64) -> f64 {
    if z < h {
        1.0
    } else if z < 1.0 {
        0.5 * (1.0 + (PI * (z - h) / (1.0 - h)).cos())
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{bump_function, sigma_1, sigma_epsilon, sigma_norm};
    use crate::math::Vec2;

    const EPS: f64 = 0.1;

    #[test]
    fn sigma_norm_is_zero_at_origin_and_symmetric() {
        assert_eq!(sigma_norm(Vec2::ZERO, EPS), 0.0);
        let z = Vec2::new(3.5, -1.25);
        assert_eq!(sigma_norm(z, EPS), sigma_norm(-z, EPS));
    }

    #[test]
    fn sigma_norm_grows_with_length() {
        let mut previous = sigma_norm(Vec2::ZERO, EPS);
        for step in 1..200 {
            let value = sigma_norm(Vec2::new(step as f64 * 0.25, 0.0), EPS);
            assert!(value > previous);
            assert!(value >= 0.0);
            previous = value;
        }
    }

    #[test]
    fn sigma_norm_matches_closed_form() {
        // d = 7, eps = 0.1: (sqrt(5.9) - 1) / 0.1
        let expected = (5.9f64.sqrt() - 1.0) / 0.1;
        assert!((sigma_norm(Vec2::new(7.0, 0.0), EPS) - expected).abs() < 1.0e-12);
    }

    #[test]
    fn sigma_epsilon_degenerate_input_is_zero() {
        assert_eq!(sigma_epsilon(Vec2::ZERO, EPS), Vec2::ZERO);
        assert_eq!(sigma_epsilon(Vec2::new(5.0e-11, 0.0), EPS), Vec2::ZERO);
    }

    #[test]
    fn sigma_epsilon_is_parallel_and_shorter() {
        for z in [
            Vec2::new(1.0e-6, 0.0),
            Vec2::new(0.3, -0.4),
            Vec2::new(-12.0, 5.0),
            Vec2::new(1000.0, 1000.0),
        ] {
            let s = sigma_epsilon(z, EPS);
            let cross = s.x * z.y - s.y * z.x;
            assert!(cross.abs() <= 1.0e-9 * z.length().max(1.0));
            assert!(s.dot(z) > 0.0);
            assert!(s.length() < z.length());
        }
        // The magnitude saturates at 1/sqrt(eps), which exceeds 1 for eps < 1.
        // Unit-scale inputs stay below 1.
        assert!(sigma_epsilon(Vec2::new(0.3, -0.4), EPS).length() < 1.0);
    }

    #[test]
    fn bump_edges_and_continuity() {
        let h = 0.2;
        for z in [-1.0, 0.0, 0.1, 0.199] {
            assert_eq!(bump_function(z, h), 1.0);
        }
        for z in [1.0, 1.5, 10.0] {
            assert_eq!(bump_function(z, h), 0.0);
        }
        assert!((bump_function(h, h) - 1.0).abs() < 1.0e-12);
        assert!((bump_function(h + 1.0e-9, h) - 1.0).abs() < 1.0e-6);
        assert!(bump_function(1.0 - 1.0e-9, h) < 1.0e-6);
        assert!((bump_function(0.6, h) - 0.5).abs() < 1.0e-12);
    }

    #[test]
    fn bump_is_non_increasing() {
        let mut previous = 1.0;
        for step in 0..=100 {
            let value = bump_function(step as f64 * 0.0125, 0.8);
            assert!(value <= previous + 1.0e-15);
            previous = value;
        }
    }

    #[test]
    fn sigma_1_is_odd_and_bounded() {
        assert_eq!(sigma_1(0.0), 0.0);
        assert_eq!(sigma_1(2.0), -sigma_1(-2.0));
        assert!(sigma_1(1.0e6) < 1.0);
    }
}
