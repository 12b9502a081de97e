//! Shared steering for the herdsman and the animals
//!
//! Both kinds of agent move the same way: head straight for the current
//! target at a fixed speed, and stop dead once within the arrival tolerance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::within_tolerance;

/// Velocity toward `target` at `speed`, or zero once arrived
pub fn steer(current: Vec2, target: Vec2, speed: f32, tolerance: f32) -> Vec2 {
    if within_tolerance(current, target, tolerance) {
        return Vec2::ZERO;
    }
    (target - current).normalize_or_zero() * speed
}

/// Kinematic state of one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub speed: f32,
    /// Sprite orientation for renderers (true while moving right)
    pub facing_right: bool,
}

impl Motion {
    pub fn at(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            target: pos,
            speed,
            facing_right: false,
        }
    }

    /// Stop in place and forget the current target
    pub fn halt(&mut self) {
        self.target = self.pos;
        self.vel = Vec2::ZERO;
    }

    pub fn is_stationary(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    /// Recompute velocity toward the target, snapping on arrival
    pub fn steer(&mut self, tolerance: f32) {
        self.vel = steer(self.pos, self.target, self.speed, tolerance);
        if self.vel == Vec2::ZERO {
            self.halt();
        } else {
            self.facing_right = self.vel.x > 0.0;
        }
    }

    /// Advance position by one step without overshooting the target
    pub fn integrate(&mut self, dt: f32) {
        let step = self.vel * dt;
        let remaining = self.target - self.pos;
        if step.length_squared() >= remaining.length_squared() {
            self.pos = self.target;
        } else {
            self.pos += step;
        }
    }

    /// Steer then integrate
    pub fn advance(&mut self, tolerance: f32, dt: f32) {
        self.steer(tolerance);
        if !self.is_stationary() {
            self.integrate(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steer_normalizes_direction() {
        let vel = steer(Vec2::ZERO, Vec2::new(3.0, 4.0), 2.0, 0.01);
        assert!((vel.length() - 2.0).abs() < 1e-5);
        assert!((vel.x - 1.2).abs() < 1e-5);
        assert!((vel.y - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_steer_zero_within_tolerance() {
        let vel = steer(Vec2::new(1.0, 1.0), Vec2::new(1.04, 0.97), 5.0, 0.05);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_tolerance_is_per_axis() {
        // Diagonal distance exceeds the tolerance but each axis is within it
        let vel = steer(Vec2::ZERO, Vec2::new(0.05, 0.05), 1.0, 0.05);
        assert_eq!(vel, Vec2::ZERO);
        // One axis outside
        let vel = steer(Vec2::ZERO, Vec2::new(0.06, 0.0), 1.0, 0.05);
        assert!(vel.x > 0.0);
    }

    #[test]
    fn test_arrival_snaps_target_to_position() {
        let mut motion = Motion::at(Vec2::ZERO, 1.0);
        motion.target = Vec2::new(0.01, 0.0);
        motion.steer(0.05);
        assert!(motion.is_stationary());
        assert_eq!(motion.target, motion.pos);
    }

    #[test]
    fn test_integrate_does_not_overshoot() {
        let mut motion = Motion::at(Vec2::ZERO, 10.0);
        motion.target = Vec2::new(0.5, 0.0);
        motion.advance(0.01, 1.0);
        assert_eq!(motion.pos, Vec2::new(0.5, 0.0));

        // Next step arrives and stops
        motion.advance(0.01, 1.0);
        assert!(motion.is_stationary());
    }

    #[test]
    fn test_facing_follows_horizontal_velocity() {
        let mut motion = Motion::at(Vec2::ZERO, 1.0);
        motion.target = Vec2::new(5.0, 0.0);
        motion.advance(0.01, 0.1);
        assert!(motion.facing_right);

        motion.target = Vec2::new(-5.0, 0.0);
        motion.advance(0.01, 0.1);
        assert!(!motion.facing_right);
    }
}
