//! Capture-side collaborators
//!
//! The detector only needs two capabilities from the outside world:
//! - a motion field it can sample with bilinear filtering
//! - a screen transform mapping world positions to pixels and back
//!
//! Both are traits so the game loop can plug in a live webcam texture and a
//! real camera, while tests use the concrete `MotionTexture` and `OrthoCamera`.

pub mod camera;
pub mod texture;

pub use camera::OrthoCamera;
pub use texture::MotionTexture;

use glam::{Vec2, Vec3};

/// Per-frame grayscale motion intensity, sampled in normalized UV space
pub trait MotionField {
    /// Whether a capture device is feeding this field
    fn has_source(&self) -> bool;

    /// Bilinear-filtered RGB sample at `(u, v)`, both in [0, 1]
    ///
    /// Callers pass `1 - x` for `u`: the capture image is mirrored relative to
    /// screen space.
    fn sample(&self, u: f32, v: f32) -> Vec3;

    /// Mean of the three channels at `(u, v)`
    fn gray(&self, u: f32, v: f32) -> f32 {
        let c = self.sample(u, v);
        (c.x + c.y + c.z) / 3.0
    }
}

/// Mapping between world space and the screen
pub trait ScreenTransform {
    /// World position to screen pixels (origin bottom-left)
    fn world_to_screen(&self, world: Vec3) -> Vec2;

    /// Normalized screen point ([0,1] on both axes) back to world space
    fn normalized_to_world(&self, normalized: Vec2) -> Vec3;

    fn pixel_width(&self) -> f32;

    fn pixel_height(&self) -> f32;

    /// Width over height
    fn aspect(&self) -> f32 {
        self.pixel_width() / self.pixel_height()
    }

    /// World position to normalized screen coordinates in [0,1]×[0,1]
    fn to_normalized_screen(&self, world: Vec3) -> Vec2 {
        let p = self.world_to_screen(world);
        Vec2::new(p.x / self.pixel_width(), p.y / self.pixel_height())
    }
}
