//! Herd Rush - A herding arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round state machine, animals, herdsman, timers)
//! - `settings`: Data-driven game configuration
//! - `signals`: Observable score/time/state values for the presentation layer
//! - `camera`: Screen to world projection for pointer input
//! - `autopilot`: Demo mode that plays the game by itself

pub mod autopilot;
pub mod camera;
pub mod error;
pub mod settings;
pub mod signals;
pub mod sim;

pub use camera::{OrthoCamera, ScreenProjection};
pub use error::{ConfigError, SimResult};
pub use settings::{AnimalType, CameraSettings, ForbiddenZone, GameSettings};
pub use signals::{RoundSignals, Signal};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Redraws allowed before the position sampler gives up
    pub const MAX_SAMPLE_ATTEMPTS: u32 = 10_000;
    /// Smallest share of the playfield that must lie outside the pen
    pub const MIN_FREE_FIELD_FRACTION: f32 = 0.01;

    /// Countdown resolution in seconds
    pub const COUNTDOWN_STEP: f32 = 1.0;
}

/// Per-axis proximity test (a square of side `2 * tolerance` around `b`)
#[inline]
pub fn within_tolerance(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
