//! Beat-synchronized slider gameplay
//!
//! - `tempo`: beat length source and fixed-period tick clock
//! - `score`: scorer capability and a simple score board
//! - `indicator`: curve-riding indicator state machine
//! - `slider`: indicator + touch target + beat clock, driven per frame

pub mod indicator;
pub mod score;
pub mod slider;
pub mod tempo;

pub use indicator::{
    BeatIndicator, Completion, Direction, IndicatorConfig, IndicatorPhase, SweepMode,
};
pub use score::{ScoreBoard, ScoreMarker, Scorer};
pub use slider::{SliderFrame, SliderNote};
pub use tempo::{BeatAuthority, BeatClock, Tempo};
