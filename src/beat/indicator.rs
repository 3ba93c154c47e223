//! Slider indicator that rides a curve in time with the music
//!
//! The parameter `t` sweeps 0 → 1 over `beats` beat lengths. Reaching an end
//! reverses the sweep; reaching the final end completes the indicator, at
//! which point a combo is awarded if every beat along the way was hit.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::score::{ScoreMarker, Scorer};
use crate::curve::Curve;
use crate::error::{ConfigError, Result};
use crate::heading_degrees;

/// Where the sweep ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepMode {
    /// Complete on reaching t = 1
    #[default]
    Once,
    /// Bounce at t = 1, complete on returning to t = 0
    PingPong,
}

impl SweepMode {
    /// Number of full traversals before completion
    pub fn passes(&self) -> u32 {
        match self {
            SweepMode::Once => 1,
            SweepMode::PingPong => 2,
        }
    }
}

/// Serializable indicator tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Beat lengths needed to go from t = 0 to t = 1
    pub beats: u32,
    pub sweep: SweepMode,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            beats: 4,
            sweep: SweepMode::Once,
        }
    }
}

/// Direction of travel along the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Indicator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorPhase {
    Active,
    /// Terminal: no further updates or beat ticks are processed
    Completed,
}

/// Reported once, on the update that completes the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub hits: u32,
    /// Every beat was hit and a combo was reported
    pub combo: bool,
}

#[derive(Debug, Clone)]
pub struct BeatIndicator {
    curve: Curve,
    config: IndicatorConfig,
    t: f32,
    direction: Direction,
    hits: u32,
    phase: IndicatorPhase,
    position: Vec3,
    rotation_degrees: f32,
}

impl BeatIndicator {
    pub fn new(curve: Curve, config: IndicatorConfig) -> Result<Self> {
        if config.beats == 0 {
            return Err(ConfigError::ZeroBeats);
        }
        let mut indicator = Self {
            curve,
            config,
            t: 0.0,
            direction: Direction::Forward,
            hits: 0,
            phase: IndicatorPhase::Active,
            position: Vec3::ZERO,
            rotation_degrees: 0.0,
        };
        indicator.update_pose();
        Ok(indicator)
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn phase(&self) -> IndicatorPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == IndicatorPhase::Completed
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation about Z, facing the direction of travel
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.rotation_degrees.to_radians())
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Hits needed for a combo
    pub fn required_hits(&self) -> u32 {
        self.config.beats * self.config.sweep.passes()
    }

    /// Advance along the curve by `dt` seconds
    ///
    /// Returns `Some` on the update that completes the indicator. Completed
    /// indicators ignore further updates.
    pub fn update<S: Scorer + ?Sized>(
        &mut self,
        dt: f32,
        beat_length: f32,
        scorer: &mut S,
    ) -> Option<Completion> {
        if self.is_completed() {
            return None;
        }

        let rate = dt / beat_length / self.config.beats as f32;
        self.t = (self.t + rate * self.direction.sign()).clamp(0.0, 1.0);

        let mut finished = false;
        if self.t == 1.0 {
            self.direction = Direction::Backward;
            finished = self.config.sweep == SweepMode::Once;
        } else if self.t == 0.0 {
            finished = self.direction == Direction::Backward && self.config.sweep == SweepMode::PingPong;
            self.direction = Direction::Forward;
        }

        self.update_pose();

        finished.then(|| self.complete(scorer))
    }

    /// Beat tick: award a hit if the paired region is activated
    pub fn on_beat<S: Scorer + ?Sized>(
        &mut self,
        activated: bool,
        hit_score: u32,
        scorer: &mut S,
    ) -> Option<ScoreMarker> {
        if self.is_completed() || !activated {
            return None;
        }
        let score = scorer.add_score(hit_score);
        self.hits += 1;
        Some(ScoreMarker {
            position: self.position,
            score,
        })
    }

    fn complete<S: Scorer + ?Sized>(&mut self, scorer: &mut S) -> Completion {
        self.phase = IndicatorPhase::Completed;
        let combo = self.hits == self.required_hits();
        if combo {
            scorer.add_combo();
        }
        log::debug!(
            "Slider completed: {}/{} hits, combo {}",
            self.hits,
            self.required_hits(),
            combo
        );
        Completion {
            hits: self.hits,
            combo,
        }
    }

    fn update_pose(&mut self) {
        self.position = self.curve.evaluate(self.t);
        let tangent = self.curve.tangent(self.t);
        let flip = match self.direction {
            Direction::Forward => 0.0,
            Direction::Backward => 180.0,
        };
        self.rotation_degrees = heading_degrees(tangent.truncate()) + flip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::ScoreBoard;

    fn line() -> Curve {
        Curve::new(vec![Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]).unwrap()
    }

    fn indicator(beats: u32, sweep: SweepMode) -> BeatIndicator {
        BeatIndicator::new(line(), IndicatorConfig { beats, sweep }).unwrap()
    }

    #[test]
    fn test_zero_beats_rejected() {
        let result = BeatIndicator::new(
            line(),
            IndicatorConfig {
                beats: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ConfigError::ZeroBeats)));
    }

    #[test]
    fn test_advances_at_beat_rate() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(2, SweepMode::Once);
        // One beat of a two-beat slider is half way
        assert!(ind.update(0.5, 0.5, &mut board).is_none());
        assert!((ind.t() - 0.5).abs() < 1e-6);
        assert!(ind.position().length() < 1e-4);
    }

    #[test]
    fn test_direction_flips_at_both_ends() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(1, SweepMode::PingPong);
        assert_eq!(ind.direction(), Direction::Forward);

        for _ in 0..3 {
            ind.update(0.25, 1.0, &mut board);
            assert_eq!(ind.direction(), Direction::Forward);
        }
        assert!(ind.update(0.25, 1.0, &mut board).is_none());
        assert_eq!(ind.t(), 1.0);
        assert_eq!(ind.direction(), Direction::Backward);

        for _ in 0..3 {
            ind.update(0.25, 1.0, &mut board);
            assert_eq!(ind.direction(), Direction::Backward);
        }
        let done = ind.update(0.25, 1.0, &mut board);
        assert_eq!(ind.t(), 0.0);
        assert_eq!(ind.direction(), Direction::Forward);
        assert!(done.is_some());
        assert!(ind.is_completed());
    }

    #[test]
    fn test_once_completes_at_far_end() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(1, SweepMode::Once);
        let done = ind.update(5.0, 1.0, &mut board);
        assert_eq!(ind.t(), 1.0);
        assert_eq!(ind.direction(), Direction::Backward);
        assert_eq!(done, Some(Completion { hits: 0, combo: false }));
        assert_eq!(ind.phase(), IndicatorPhase::Completed);
    }

    #[test]
    fn test_full_hits_award_one_combo() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(4, SweepMode::Once);
        for _ in 0..4 {
            assert!(ind.on_beat(true, 10, &mut board).is_some());
        }
        let done = ind.update(10.0, 0.5, &mut board).unwrap();
        assert!(done.combo);
        assert_eq!(done.hits, 4);
        assert_eq!(board, ScoreBoard { score: 40, combo: 1 });
    }

    #[test]
    fn test_partial_hits_break_combo_silently() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(4, SweepMode::Once);
        for activated in [true, false, true, true] {
            ind.on_beat(activated, 10, &mut board);
        }
        let done = ind.update(10.0, 0.5, &mut board).unwrap();
        assert!(!done.combo);
        assert_eq!(board.combo, 0);
        assert_eq!(board.score, 30);
    }

    #[test]
    fn test_ping_pong_needs_both_passes() {
        let ind = indicator(3, SweepMode::PingPong);
        assert_eq!(ind.required_hits(), 6);
    }

    #[test]
    fn test_marker_at_indicator_with_running_total() {
        let mut board = ScoreBoard::new();
        board.add_score(100);
        let mut ind = indicator(2, SweepMode::Once);
        ind.update(0.25, 0.5, &mut board);
        let marker = ind.on_beat(true, 10, &mut board).unwrap();
        assert_eq!(marker.score, 110);
        assert_eq!(marker.position, ind.position());
    }

    #[test]
    fn test_completed_ignores_updates_and_beats() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(1, SweepMode::Once);
        ind.update(2.0, 1.0, &mut board);
        assert!(ind.is_completed());

        let t = ind.t();
        assert!(ind.update(0.5, 1.0, &mut board).is_none());
        assert_eq!(ind.t(), t);
        assert!(ind.on_beat(true, 10, &mut board).is_none());
        assert_eq!(board.score, 0);
    }

    #[test]
    fn test_faces_direction_of_travel() {
        let mut board = ScoreBoard::new();
        let mut ind = indicator(1, SweepMode::PingPong);
        ind.update(0.5, 1.0, &mut board);
        assert!(ind.rotation_degrees().abs() < 1e-3);

        // Bounce, then head back towards the start
        ind.update(0.5, 1.0, &mut board);
        ind.update(0.25, 1.0, &mut board);
        assert_eq!(ind.direction(), Direction::Backward);
        assert!((ind.rotation_degrees() - 180.0).abs() < 1e-3);

        let facing = ind.rotation() * Vec3::X;
        assert!((facing - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_tangent_orientation_on_diagonal() {
        let curve = Curve::new(vec![Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)]).unwrap();
        let mut ind = BeatIndicator::new(curve, IndicatorConfig::default()).unwrap();
        let mut board = ScoreBoard::new();
        ind.update(1.0, 1.0, &mut board);
        assert!((ind.rotation_degrees() - 45.0).abs() < 1e-2);
    }
}
