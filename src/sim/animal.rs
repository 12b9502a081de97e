//! Animal behaviour
//!
//! Field animals wander between random spots outside the pen at patrol speed.
//! Grouped animals trail the herdsman, each aiming at its own fixed offset
//! around the herdsman so the flock does not collapse into one point.

use glam::Vec2;
use rand::Rng;

use super::geometry::PositionSampler;
use super::registry::{Animal, Membership};
use crate::error::SimResult;
use crate::settings::AnimalType;

/// What animals need to know about the world to pick a target
#[derive(Debug, Clone, Copy)]
pub struct Flock<'a> {
    /// Herdsman position
    pub leader: Vec2,
    /// Herdsman effective speed
    pub leader_speed: f32,
    pub sampler: &'a PositionSampler,
    pub types: &'a [AnimalType],
}

/// Pick the animal's target and speed for this tick
pub fn acquire_target<R: Rng + ?Sized>(
    animal: &mut Animal,
    flock: &Flock<'_>,
    rng: &mut R,
) -> SimResult<()> {
    let animal_type = &flock.types[animal.kind];
    match animal.membership {
        Membership::Group => {
            animal.motion.target = flock.leader + animal.offset;
            animal.motion.speed = animal_type.speed.min(flock.leader_speed);
        }
        Membership::Field if animal.motion.is_stationary() => {
            animal.motion.target = flock.sampler.sample(rng)?;
            animal.motion.speed = animal_type.patrol_speed;
        }
        // Still walking to the last wander target
        Membership::Field => {}
    }
    Ok(())
}

/// Acquire a target, then move toward it
pub fn update_animal<R: Rng + ?Sized>(
    animal: &mut Animal,
    flock: &Flock<'_>,
    tolerance: f32,
    dt: f32,
    rng: &mut R,
) -> SimResult<()> {
    acquire_target(animal, flock, rng)?;
    animal.motion.advance(tolerance, dt);
    Ok(())
}
