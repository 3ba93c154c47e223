//! CPU-side motion texture
//!
//! Row 0 is the bottom of the image (v = 0), matching the UV convention the
//! detector samples with.

use glam::Vec3;

use super::MotionField;
use crate::error::{ConfigError, Result};

/// RGB float texture with clamped bilinear sampling
#[derive(Debug, Clone)]
pub struct MotionTexture {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
    has_source: bool,
}

impl MotionTexture {
    pub fn new(width: usize, height: usize, pixels: Vec<Vec3>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(ConfigError::TextureSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            has_source: true,
        })
    }

    /// Texture with every channel of every pixel set to `intensity`
    pub fn uniform(width: usize, height: usize, intensity: f32) -> Result<Self> {
        Self::new(width, height, vec![Vec3::splat(intensity); width * height])
    }

    /// Build from single-channel intensities (row-major, bottom row first)
    pub fn from_gray(width: usize, height: usize, gray: &[f32]) -> Result<Self> {
        Self::new(width, height, gray.iter().map(|&g| Vec3::splat(g)).collect())
    }

    /// Motion field from two consecutive grayscale camera frames
    ///
    /// Each pixel is `|cur - prev| * gain`, clamped to [0, 1].
    pub fn from_frame_difference(
        width: usize,
        height: usize,
        prev: &[f32],
        cur: &[f32],
        gain: f32,
    ) -> Result<Self> {
        if prev.len() != cur.len() {
            return Err(ConfigError::TextureSize {
                width,
                height,
                len: prev.len().min(cur.len()),
            });
        }
        let diff: Vec<f32> = prev
            .iter()
            .zip(cur)
            .map(|(a, b)| ((b - a).abs() * gain).clamp(0.0, 1.0))
            .collect();
        Self::from_gray(width, height, &diff)
    }

    /// A black field reporting no capture device
    pub fn unavailable() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![Vec3::ZERO],
            has_source: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Overwrite one pixel (x right, y up)
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Vec3) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    fn texel(&self, x: isize, y: isize) -> Vec3 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.pixels[y * self.width + x]
    }
}

impl MotionField for MotionTexture {
    fn has_source(&self) -> bool {
        self.has_source
    }

    fn sample(&self, u: f32, v: f32) -> Vec3 {
        // Texel centres sit at (i + 0.5) / size
        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let bottom = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let top = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        bottom.lerp(top, fy)
    }
}
