//! Stair Runner - a seeded endless stair-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (path generation, physics, scoring)
//! - `tuning`: Data-driven physics and generation balance
//!
//! Rendering, audio, input devices and score persistence live outside this
//! crate. They drive the [`sim::Director`] through `prepare`/`start`/`jump`/
//! `update` and poll its read-only query surface each frame.

pub mod sim;
pub mod tuning;

pub use sim::{DeathReason, Director, RunPhase, RunSummary, Step};
pub use tuning::{Tuning, TuningError};

use glam::DVec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f64 = 1.0 / 120.0;
    /// Milliseconds per fixed timestep
    pub const SIM_DT_MS: f64 = 1000.0 / 120.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit heading vector in the horizontal (XZ) plane for a yaw angle
#[inline]
pub fn heading_vector(yaw: f64) -> DVec3 {
    DVec3::new(yaw.cos(), 0.0, yaw.sin())
}

/// Horizontal (radius, bearing) of a point around the vertical axis
#[inline]
pub fn horizontal_polar(pos: DVec3) -> (f64, f64) {
    ((pos.x * pos.x + pos.z * pos.z).sqrt(), pos.z.atan2(pos.x))
}
