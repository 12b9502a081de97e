//! Playfield geometry and random placement
//!
//! The playfield and the pen are both axis-aligned rectangles stored as a
//! center plus half extents. Animal positions are drawn uniformly over the
//! playfield and redrawn while they land inside the pen.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SAMPLE_ATTEMPTS;
use crate::error::{ConfigError, SimResult};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn area(&self) -> f32 {
        4.0 * self.half_extents.x * self.half_extents.y
    }

    /// Strict containment: points on the border are outside
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
    }

    /// Area shared with another rectangle
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        let size = (max - min).max(Vec2::ZERO);
        size.x * size.y
    }

    /// Share of this rectangle not covered by `hole` (0 when degenerate)
    pub fn free_fraction(&self, hole: &Rect) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        1.0 - self.overlap_area(hole) / area
    }
}

/// Rejection sampler for positions on the playfield but outside the pen
#[derive(Debug, Clone, Copy)]
pub struct PositionSampler {
    field: Rect,
    pen: Rect,
}

impl PositionSampler {
    pub fn new(field: Rect, pen: Rect) -> Self {
        Self { field, pen }
    }

    pub fn field(&self) -> Rect {
        self.field
    }

    pub fn pen(&self) -> Rect {
        self.pen
    }

    /// Draw a uniform point on the field that is outside the pen.
    ///
    /// Gives up with [`ConfigError::SamplingExhausted`] after
    /// [`MAX_SAMPLE_ATTEMPTS`] draws instead of spinning forever.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<Vec2> {
        let (min, max) = (self.field.min(), self.field.max());
        if !(min.x < max.x && min.y < max.y) {
            return Err(ConfigError::SamplingExhausted { attempts: 0 });
        }
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let position = Vec2::new(
                rng.random_range(min.x..max.x),
                rng.random_range(min.y..max.y),
            );
            if !self.pen.contains(position) {
                return Ok(position);
            }
        }
        Err(ConfigError::SamplingExhausted {
            attempts: MAX_SAMPLE_ATTEMPTS,
        })
    }
}

/// Uniform point in a disk of the given radius around the origin
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let r = radius * rng.random::<f32>().sqrt();
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    crate::polar_to_cartesian(r, theta)
}
