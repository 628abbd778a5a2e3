use crate::agent::Agent;
use crate::config::IntegratorConfig;

/// Advances one agent by `dt` using its stored acceleration.
///
/// Order: velocity update, speed clamp, position update, soft boundary push.
/// The push is applied to velocity only, so it takes effect next step and an
/// agent arriving fast enough can still cross the hard boundary. The speed
/// clamp is re-applied after the push so the speed bound always holds.
pub fn integrate(agent: &mut Agent, dt: f64, config: &IntegratorConfig) {
    agent.velocity += agent.acceleration * dt;
    agent.velocity = agent.velocity.limit_length(config.max_speed);

    agent.position += agent.velocity * dt;

    agent.velocity.x += boundary_correction(agent.position.x, config);
    agent.velocity.y += boundary_correction(agent.position.y, config);
    agent.velocity = agent.velocity.limit_length(config.max_speed);
}

/// Velocity correction on one axis: zero up to the soft boundary, ramping
/// linearly to `boundary_push` at the hard boundary, directed back towards
/// the origin. Nothing is applied at or past the hard boundary.
pub fn boundary_correction(coordinate: f64, config: &IntegratorConfig) -> f64 {
    let distance = coordinate.abs();
    if distance <= config.soft_boundary || distance >= config.hard_boundary {
        return 0.0;
    }

    let depth = (distance - config.soft_boundary) / (config.hard_boundary - config.soft_boundary);
    -coordinate.signum() * depth * config.boundary_push
}
