//! Touch-target geometry
//!
//! A region is a square of `size` screen widths centred on its owner. The
//! vertical axis is divided by the aspect ratio so grid steps are the same
//! length horizontally and vertically in screen space.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::field::ScreenTransform;

/// Outline of the region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Square,
    /// Disk inscribed in the square (approximated by narrowing grid rows)
    Circular,
}

/// How sample points are chosen each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Fixed grid, energy reset every frame
    #[default]
    Grid,
    /// Random points, energy carried over and decayed
    Randomized,
}

/// Serializable region tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Fraction of the screen width covered (0.01 - 1.0)
    pub size: f32,
    pub shape: Shape,
    /// Grid steps per region side
    pub density: u32,
    /// Energy needed to activate
    pub threshold: f32,
    pub sampling: SamplingMode,
    /// Samples drawn per frame in randomized mode
    pub random_samples: u32,
    /// Energy lost per second in randomized mode
    pub cooldown_rate: f32,
    /// Re-normalize energy by the grid sample count after every sample
    pub average: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            size: 0.25,
            shape: Shape::Square,
            density: 10,
            threshold: 0.8,
            sampling: SamplingMode::Grid,
            random_samples: 50,
            cooldown_rate: 40.0,
            average: false,
        }
    }
}

/// Smallest region, as a fraction of screen width
pub const MIN_REGION_SIZE: f32 = 0.01;
/// Largest region
pub const MAX_REGION_SIZE: f32 = 1.0;
/// Grid steps per side; finer grids stop advancing in `f32`
pub const MAX_DENSITY: u32 = 25;

impl RegionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_REGION_SIZE..=MAX_REGION_SIZE).contains(&self.size) {
            return Err(ConfigError::InvalidSize(self.size));
        }
        if !(1..=MAX_DENSITY).contains(&self.density) {
            return Err(ConfigError::InvalidDensity(self.density));
        }
        if !(self.threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if !(self.cooldown_rate >= 0.0) {
            return Err(ConfigError::InvalidCooldown(self.cooldown_rate));
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl PixelRect {
    /// Strict containment: points on the border are outside
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A validated touch target
#[derive(Debug, Clone)]
pub struct InteractionRegion {
    config: RegionConfig,
}

impl InteractionRegion {
    pub fn new(config: RegionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    pub fn size(&self) -> f32 {
        self.config.size
    }

    pub fn shape(&self) -> Shape {
        self.config.shape
    }

    pub(crate) fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        if !(threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        self.config.threshold = threshold;
        Ok(())
    }

    pub(crate) fn set_shape(&mut self, shape: Shape) {
        self.config.shape = shape;
    }

    /// Distance between neighbouring grid samples
    #[inline]
    pub fn step(&self) -> f32 {
        1.0 / self.config.density as f32 * self.config.size
    }

    /// Number of grid samples used as the averaging divisor
    pub fn sample_count(&self) -> f32 {
        (self.config.size / self.step()).powf(2.0)
    }

    /// Threshold the accumulated energy is compared against
    ///
    /// Grid sampling of a circle divides by π to compensate for the smaller
    /// area. Randomized sampling always uses the raw threshold.
    pub fn effective_threshold(&self) -> f32 {
        match (self.config.sampling, self.config.shape) {
            (SamplingMode::Grid, Shape::Circular) => self.config.threshold / PI,
            _ => self.config.threshold,
        }
    }

    /// Horizontal inset of the grid row at `y`, narrowing rows towards the
    /// top and bottom of a circular region
    ///
    /// NaN just outside the region's vertical extent; callers treat a NaN
    /// row bound as an empty row.
    pub fn circular_offset(&self, center_y: f32, y: f32) -> f32 {
        if self.config.shape == Shape::Square {
            return 0.0;
        }
        let size = self.config.size;
        (1.0 - ((y - center_y) / size * PI + PI / 2.0).sin().powf(0.5)) * size / 2.0
    }

    /// Region centre in sampling space: x in [0,1], y divided by aspect
    pub fn sampling_center<T: ScreenTransform + ?Sized>(&self, world: Vec3, camera: &T) -> Vec2 {
        let n = camera.to_normalized_screen(world);
        Vec2::new(n.x, n.y / camera.aspect())
    }

    /// Square bounding box in screen pixels (used for pointer hits)
    pub fn pixel_rect<T: ScreenTransform + ?Sized>(&self, world: Vec3, camera: &T) -> PixelRect {
        let center = camera.world_to_screen(world);
        let half = Vec2::splat(camera.pixel_width() * self.config.size / 2.0);
        PixelRect {
            min: center - half,
            max: center + half,
        }
    }

    /// Grid sample points in sampling space, in scan order
    pub fn grid_points(&self, center: Vec2) -> GridPoints<'_> {
        GridPoints::new(self, center)
    }

    /// World-space positions of every grid sample, for debug drawing
    pub fn debug_sample_points<T: ScreenTransform + ?Sized>(
        &self,
        world: Vec3,
        camera: &T,
    ) -> Vec<Vec3> {
        let center = self.sampling_center(world, camera);
        let aspect = camera.aspect();
        self.grid_points(center)
            .map(|p| camera.normalized_to_world(Vec2::new(p.x, p.y * aspect)))
            .collect()
    }

    /// World-space corners of the bounding square (counter-clockwise from
    /// bottom-left), for debug drawing
    pub fn debug_outline<T: ScreenTransform + ?Sized>(&self, world: Vec3, camera: &T) -> [Vec3; 4] {
        let c = self.sampling_center(world, camera);
        let h = self.config.size / 2.0;
        let aspect = camera.aspect();
        [(-h, -h), (h, -h), (h, h), (-h, h)].map(|(dx, dy)| {
            camera.normalized_to_world(Vec2::new(c.x + dx, (c.y + dy) * aspect))
        })
    }
}

/// Row-by-row walk over the sampling grid
///
/// Steps accumulate in `f32` exactly as a nested `for` over floats would, so
/// the number of samples per row can vary by one with rounding.
pub struct GridPoints<'a> {
    region: &'a InteractionRegion,
    center: Vec2,
    step: f32,
    y: f32,
    x: f32,
    x_end: f32,
}

impl<'a> GridPoints<'a> {
    fn new(region: &'a InteractionRegion, center: Vec2) -> Self {
        let step = region.step();
        let mut points = Self {
            region,
            center,
            step,
            y: center.y - region.size() / 2.0 + step / 2.0,
            x: 0.0,
            x_end: 0.0,
        };
        points.start_row();
        points
    }

    fn start_row(&mut self) {
        let half = self.region.size() / 2.0;
        let offset = self.region.circular_offset(self.center.y, self.y);
        self.x = self.center.x - half + self.step / 2.0 + offset;
        self.x_end = self.center.x + half - offset;
    }
}

impl Iterator for GridPoints<'_> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        let y_end = self.center.y + self.region.size() / 2.0;
        while self.y <= y_end {
            if self.x <= self.x_end {
                let p = Vec2::new(self.x, self.y);
                self.x += self.step;
                return Some(p);
            }
            self.y += self.step;
            self.start_row();
        }
        None
    }
}
