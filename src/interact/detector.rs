//! Per-frame activation test for a touch target
//!
//! Energy is the sum of grayscale motion samples under the region. Grid mode
//! starts from zero every frame and walks a fixed grid; randomized mode keeps
//! the previous frame's energy, decays it, and adds a handful of random
//! samples. Either way the scan stops as soon as the energy crosses the
//! threshold.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::region::{InteractionRegion, RegionConfig, SamplingMode, Shape};
use crate::error::{ConfigError, Result};
use crate::field::{MotionField, ScreenTransform};

/// Mouse or touch state for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Screen position in pixels (origin bottom-left)
    pub position: Vec2,
    /// Primary button / finger down
    pub pressed: bool,
}

/// Everything the detector reads from the frame besides the motion field
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    pub pointer: PointerState,
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionResult {
    pub energy: f32,
    pub activated: bool,
}

/// Overlay state for debug visualisation of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStatus {
    Idle,
    Touched,
}

/// Owns a region plus the state that persists between frames
#[derive(Debug, Clone)]
pub struct InteractionDetector {
    region: InteractionRegion,
    active: bool,
    /// Carried across frames in randomized mode
    energy: f32,
    rng: Pcg32,
    last: InteractionResult,
}

impl InteractionDetector {
    pub fn new(config: RegionConfig, seed: u64) -> Result<Self> {
        let region = InteractionRegion::new(config)?;
        log::debug!(
            "Interaction region: size {} {:?} {:?} threshold {}",
            region.size(),
            region.shape(),
            region.config().sampling,
            region.effective_threshold()
        );
        Ok(Self {
            region,
            active: true,
            energy: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            last: InteractionResult::default(),
        })
    }

    pub fn region(&self) -> &InteractionRegion {
        &self.region
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Most recent evaluation
    pub fn last_result(&self) -> InteractionResult {
        self.last
    }

    pub fn status(&self) -> RegionStatus {
        if self.last.activated {
            RegionStatus::Touched
        } else {
            RegionStatus::Idle
        }
    }

    /// Change the raw threshold (only while inactive)
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        if self.active {
            return Err(ConfigError::EditWhileActive);
        }
        self.region.set_threshold(threshold)
    }

    /// Change the shape (only while inactive)
    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        if self.active {
            return Err(ConfigError::EditWhileActive);
        }
        self.region.set_shape(shape);
        Ok(())
    }

    /// Evaluate the region centred at `world` for this frame
    ///
    /// Reports `activated = false` without sampling when the region is
    /// inactive or no capture device is present.
    pub fn evaluate<F, T>(
        &mut self,
        world: Vec3,
        field: &F,
        camera: &T,
        frame: &FrameInput,
    ) -> InteractionResult
    where
        F: MotionField + ?Sized,
        T: ScreenTransform + ?Sized,
    {
        if !self.active || !field.has_source() {
            log::trace!("Skipping interaction check (active: {})", self.active);
            self.last = InteractionResult {
                energy: self.energy,
                activated: false,
            };
            return self.last;
        }

        let motion = self.check_motion(world, field, camera, frame.dt);
        let pointer = self.check_pointer(world, camera, &frame.pointer);

        self.last = InteractionResult {
            energy: self.energy,
            activated: motion || pointer,
        };
        self.last
    }

    fn check_pointer<T: ScreenTransform + ?Sized>(
        &self,
        world: Vec3,
        camera: &T,
        pointer: &PointerState,
    ) -> bool {
        // Bounding box only, even for circular regions
        pointer.pressed && self.region.pixel_rect(world, camera).contains(pointer.position)
    }

    fn check_motion<F, T>(&mut self, world: Vec3, field: &F, camera: &T, dt: f32) -> bool
    where
        F: MotionField + ?Sized,
        T: ScreenTransform + ?Sized,
    {
        let center = self.region.sampling_center(world, camera);
        let aspect = camera.aspect();

        match self.region.config().sampling {
            SamplingMode::Grid => self.scan_grid(center, aspect, field),
            SamplingMode::Randomized => self.scan_random(center, aspect, field, dt),
        }
    }

    fn scan_grid<F: MotionField + ?Sized>(&mut self, center: Vec2, aspect: f32, field: &F) -> bool {
        let threshold = self.region.effective_threshold();
        let average = self.region.config().average;
        let points = self.region.sample_count();

        self.energy = 0.0;
        for p in self.region.grid_points(center) {
            self.energy += field.gray(1.0 - p.x, p.y * aspect);
            // Divides the running total on every step, not once at the end
            if average {
                self.energy /= points;
            }
            if self.energy > threshold {
                return true;
            }
        }
        false
    }

    fn scan_random<F: MotionField + ?Sized>(
        &mut self,
        center: Vec2,
        aspect: f32,
        field: &F,
        dt: f32,
    ) -> bool {
        let threshold = self.region.effective_threshold();
        let cooldown = self.region.config().cooldown_rate;

        self.energy = (self.energy - cooldown * dt).max(0.0);
        for _ in 0..self.region.config().random_samples {
            let p = self.random_point(center);
            self.energy += field.gray(1.0 - p.x, p.y * aspect);
            if self.energy > threshold {
                return true;
            }
        }
        false
    }

    /// Uniform random point inside the region, in sampling space
    fn random_point(&mut self, center: Vec2) -> Vec2 {
        let half = self.region.size() / 2.0;
        match self.region.shape() {
            Shape::Square => {
                let step = self.region.step();
                let y = self
                    .rng
                    .random_range(center.y - half + step / 2.0..=center.y + half);
                let x = self
                    .rng
                    .random_range(center.x - half + step / 2.0..=center.x + half);
                Vec2::new(x, y)
            }
            Shape::Circular => {
                let angle = self.rng.random_range(0.0..TAU);
                let radius = self.rng.random_range(0.0f32..=1.0).sqrt();
                center + Vec2::new(angle.cos(), angle.sin()) * half * radius
            }
        }
    }
}
