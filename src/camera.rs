//! Screen to world projection
//!
//! Pointer input arrives in screen pixels (origin top-left, y down). The
//! playfield is framed by an orthographic camera centred on the origin.

use glam::Vec2;

use crate::settings::CameraSettings;

/// Converts pointer coordinates to world coordinates
pub trait ScreenProjection {
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
}

/// Orthographic camera over a viewport of `viewport` pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub center: Vec2,
    pub settings: CameraSettings,
    pub viewport: Vec2,
}

impl OrthoCamera {
    pub fn new(settings: CameraSettings, viewport: Vec2) -> Self {
        Self {
            center: Vec2::ZERO,
            settings,
            viewport,
        }
    }

    /// Inverse of `screen_to_world`
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let ndc = (world - self.center) / self.settings.half_extents();
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }
}

impl ScreenProjection for OrthoCamera {
    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let viewport = self.viewport.max(Vec2::ONE);
        let ndc = Vec2::new(
            screen.x / viewport.x * 2.0 - 1.0,
            1.0 - screen.y / viewport.y * 2.0,
        );
        self.center + ndc * self.settings.half_extents()
    }
}
