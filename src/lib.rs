//! Motion Rhythm - webcam-driven rhythm game core
//!
//! Core modules:
//! - `field`: Motion field and screen transform capabilities
//! - `interact`: Motion/pointer activated touch targets
//! - `curve`: NURBS curves for slider paths
//! - `beat`: Beat clock, slider indicators and scoring
//! - `settings`: JSON gameplay settings

pub mod beat;
pub mod curve;
pub mod error;
pub mod field;
pub mod interact;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default song tempo
    pub const DEFAULT_BPM: f32 = 120.0;

    /// Points awarded per beat held on a slider
    pub const DEFAULT_SLIDER_SCORE: u32 = 10;

    /// Seed for randomized region sampling
    pub const DEFAULT_SEED: u64 = 0x5EED_B0B0;
}

/// Angle of a 2D direction in degrees, counter-clockwise from +X
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
