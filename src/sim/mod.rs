//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (arena slot order, field and group in insertion order)
//! - No rendering or platform dependencies

pub mod animal;
pub mod geometry;
pub mod herdsman;
pub mod movement;
pub mod registry;
pub mod round;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use animal::{Flock, acquire_target, update_animal};
pub use geometry::{PositionSampler, Rect, random_in_disk};
pub use herdsman::{Herdsman, PlayerState};
pub use movement::{Motion, steer};
pub use registry::{Animal, AnimalId, AnimalRegistry, Membership};
pub use round::RoundPhase;
pub use scheduler::{Scheduled, Scheduler, TimerKind};
pub use state::GameState;
pub use tick::{TickInput, tick};
