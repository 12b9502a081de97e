//! The herdsman: the player-controlled agent
//!
//! Walks to wherever the player last tapped, picks up field animals that come
//! within range, and keeps the whole group moving at the pace of its slowest
//! member.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::movement::Motion;
use super::registry::{AnimalId, AnimalRegistry};
use crate::settings::AnimalType;

/// Whether the herdsman takes input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Active,
    /// Frozen: between rounds and while unloading
    Passive,
}

#[derive(Debug, Clone)]
pub struct Herdsman {
    pub motion: Motion,
    /// Speed with an empty group; ramps up during a round
    pub base_speed: f32,
    pub state: PlayerState,
    /// Where each round starts
    pub start: Vec2,
    /// Inside the pen as of the last tick (pen entry is edge-triggered)
    pub in_pen: bool,
}

impl Herdsman {
    pub fn new(start: Vec2, base_speed: f32) -> Self {
        Self {
            motion: Motion::at(start, base_speed),
            base_speed,
            state: PlayerState::Passive,
            start,
            in_pen: false,
        }
    }

    /// Back to the start position, standing still, ready to play
    pub fn reset(&mut self, base_speed: f32) {
        self.base_speed = base_speed;
        self.motion = Motion::at(self.start, base_speed);
        self.in_pen = false;
        self.state = PlayerState::Active;
    }

    pub fn is_active(&self) -> bool {
        self.state == PlayerState::Active
    }

    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    /// Effective speed, never above the slowest grouped animal
    pub fn speed(&self) -> f32 {
        self.motion.speed
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.motion.target = target;
    }

    /// First field animal (in field order) closer than `range`
    pub fn animal_in_range(&self, registry: &AnimalRegistry, range: f32) -> Option<AnimalId> {
        registry.field().iter().copied().find(|&id| {
            registry
                .get(id)
                .is_some_and(|animal| animal.motion.pos.distance(self.pos()) < range)
        })
    }

    /// Slow down to a freshly captured animal's pace, or slow it to ours
    pub fn absorb_capture(
        &mut self,
        id: AnimalId,
        registry: &mut AnimalRegistry,
        types: &[AnimalType],
    ) {
        let Some(animal) = registry.get(id) else {
            return;
        };
        self.motion.speed = self.motion.speed.min(types[animal.kind].speed);
        self.clamp_group(registry, types);
    }

    /// Raise the base speed; the group still caps the effective speed
    pub fn increase_speed(
        &mut self,
        increment: f32,
        registry: &mut AnimalRegistry,
        types: &[AnimalType],
    ) {
        self.base_speed += increment;
        self.motion.speed = registry
            .group()
            .iter()
            .filter_map(|&id| registry.get(id))
            .map(|animal| types[animal.kind].speed)
            .fold(self.base_speed, f32::min);
        self.clamp_group(registry, types);
        log::debug!(
            "Herdsman base speed now {:.2} (effective {:.2})",
            self.base_speed,
            self.motion.speed
        );
    }

    /// Drop back to base speed (the group is being unloaded)
    pub fn reset_speed(&mut self) {
        self.motion.speed = self.base_speed;
    }

    /// Update pen occupancy; true only on the tick the herdsman walks in
    pub fn entered_pen(&mut self, pen: &Rect) -> bool {
        let inside = pen.contains(self.pos());
        let entered = inside && !self.in_pen;
        self.in_pen = inside;
        entered
    }

    fn clamp_group(&self, registry: &mut AnimalRegistry, types: &[AnimalType]) {
        let limit = self.motion.speed;
        for (_, animal) in registry.iter_mut().filter(|(_, animal)| animal.is_grouped()) {
            animal.motion.speed = types[animal.kind].speed.min(limit);
        }
    }
}
