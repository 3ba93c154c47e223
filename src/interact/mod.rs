//! Motion-activated touch targets
//!
//! A target counts as touched when enough camera motion falls inside it, or
//! when the pointer is held down over its bounding box. Consumers poll
//! `InteractionResult::activated` once per frame.

pub mod detector;
pub mod region;

pub use detector::{FrameInput, InteractionDetector, InteractionResult, PointerState, RegionStatus};
pub use region::{GridPoints, InteractionRegion, PixelRect, RegionConfig, SamplingMode, Shape};
