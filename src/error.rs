//! Configuration errors
//!
//! Every invariant on regions, curves and indicators is checked once at
//! construction. Evaluation paths never fail.

/// Result alias for construction and settings loading
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Region size must lie in [0.01, 1]
    #[error("region size must be in [0.01, 1], got {0}")]
    InvalidSize(f32),

    /// Sampling density must lie in [1, 25]
    #[error("sampling density must be in [1, 25], got {0}")]
    InvalidDensity(u32),

    /// Activation threshold must be positive
    #[error("threshold must be positive, got {0}")]
    InvalidThreshold(f32),

    /// Cooldown rate cannot be negative
    #[error("cooldown rate must be non-negative, got {0}")]
    InvalidCooldown(f32),

    /// Threshold and shape can only be edited while the region is inactive
    #[error("cannot edit region while it is active")]
    EditWhileActive,

    /// A curve needs at least two control points
    #[error("curve needs at least 2 control points, got {0}")]
    TooFewControlPoints(usize),

    /// Rational weights must match the control points and be positive
    #[error("curve weights invalid: {0}")]
    InvalidWeights(String),

    /// An indicator must take at least one beat to traverse
    #[error("beats to traverse must be at least 1")]
    ZeroBeats,

    /// Beat length must be positive and finite
    #[error("beat length must be positive, got {0}")]
    InvalidBeatLength(f32),

    /// Motion texture dimensions do not match its pixel data
    #[error("texture is {width}x{height} but has {len} pixels")]
    TextureSize {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
