//! Orthographic camera centred on the world origin

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ScreenTransform;

/// Orthographic view: `ortho_size` world units from the centre to the top edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    pub ortho_size: f32,
    pub pixel_width: f32,
    pub pixel_height: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            ortho_size: 5.0,
            pixel_width: 1280.0,
            pixel_height: 720.0,
        }
    }
}

impl OrthoCamera {
    pub fn new(ortho_size: f32, pixel_width: f32, pixel_height: f32) -> Self {
        Self {
            ortho_size,
            pixel_width,
            pixel_height,
        }
    }

    /// Half extents of the view in world units
    #[inline]
    fn half_extents(&self) -> Vec2 {
        Vec2::new(self.ortho_size * self.aspect(), self.ortho_size)
    }
}

impl ScreenTransform for OrthoCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let n = (world.truncate() / self.half_extents() + Vec2::ONE) * 0.5;
        Vec2::new(n.x * self.pixel_width, n.y * self.pixel_height)
    }

    fn normalized_to_world(&self, normalized: Vec2) -> Vec3 {
        let p = (normalized * 2.0 - Vec2::ONE) * self.half_extents();
        p.extend(0.0)
    }

    fn pixel_width(&self) -> f32 {
        self.pixel_width
    }

    fn pixel_height(&self) -> f32 {
        self.pixel_height
    }
}
