//! Caller-side helpers for a frame loop.

use std::time::Duration;

use crate::simulation::Simulation;

/// Longest step taken for one frame, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Wall-clock time since the last step, clamped to [`MAX_FRAME_DT`].
pub fn frame_dt(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64().min(MAX_FRAME_DT)
}

/// Same clamp for a raw seconds value; negative or NaN input yields 0.
pub fn frame_dt_secs(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_nan() {
        return 0.0;
    }
    elapsed_secs.clamp(0.0, MAX_FRAME_DT)
}

/// Steps `sim` by the clamped frame time if it is running. Returns whether a
/// step happened.
pub fn advance(sim: &Simulation, elapsed: Duration) -> bool {
    advance_secs(sim, elapsed.as_secs_f64())
}

pub fn advance_secs(sim: &Simulation, elapsed_secs: f64) -> bool {
    if !sim.is_running() {
        return false;
    }
    sim.step(frame_dt_secs(elapsed_secs));
    true
}
