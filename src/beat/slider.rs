//! Slider note: a beat indicator with a touch target riding on it
//!
//! Frame order is fixed: move the indicator, evaluate the target at the new
//! position, then process any beat ticks that came due. Ticks that land on
//! the completing frame are dropped, and a slider never sees more beats than
//! it needs hits, so drift between the clock and the indicator's `t` cannot
//! add an extra beat at the end.

use glam::{Vec2, Vec3};

use super::indicator::{BeatIndicator, Completion, IndicatorConfig};
use super::score::{ScoreMarker, Scorer};
use super::tempo::{BeatAuthority, BeatClock};
use crate::curve::Curve;
use crate::error::Result;
use crate::field::{MotionField, ScreenTransform};
use crate::interact::{FrameInput, InteractionDetector, InteractionResult, RegionConfig};

/// What happened to a slider during one frame
#[derive(Debug, Clone, Default)]
pub struct SliderFrame {
    pub position: Vec3,
    pub rotation_degrees: f32,
    pub interaction: InteractionResult,
    /// One marker per hit beat this frame
    pub markers: Vec<ScoreMarker>,
    pub completion: Option<Completion>,
}

#[derive(Debug, Clone)]
pub struct SliderNote {
    indicator: BeatIndicator,
    detector: InteractionDetector,
    clock: BeatClock,
    beats_seen: u32,
    beat_length: f32,
    hit_score: u32,
}

impl SliderNote {
    pub fn new<B: BeatAuthority + ?Sized>(
        curve: Curve,
        indicator: IndicatorConfig,
        region: RegionConfig,
        hit_score: u32,
        beat: &B,
        seed: u64,
    ) -> Result<Self> {
        let beat_length = beat.beat_length();
        let clock = BeatClock::new(beat_length)?;
        let indicator = BeatIndicator::new(curve, indicator)?;
        let detector = InteractionDetector::new(region, seed)?;
        log::debug!(
            "Slider spawned: {} control points, {} hits needed, beat {:.3}s",
            indicator.curve().points().len(),
            indicator.required_hits(),
            beat_length
        );
        Ok(Self {
            indicator,
            detector,
            clock,
            beats_seen: 0,
            beat_length,
            hit_score,
        })
    }

    pub fn indicator(&self) -> &BeatIndicator {
        &self.indicator
    }

    pub fn detector(&self) -> &InteractionDetector {
        &self.detector
    }

    pub fn is_completed(&self) -> bool {
        self.indicator.is_completed()
    }

    /// World-space scale of the indicator sprite: half the region size
    pub fn indicator_scale<T: ScreenTransform + ?Sized>(&self, camera: &T) -> f32 {
        let fraction = self.detector.region().size() * 0.5;
        let a = camera.normalized_to_world(Vec2::ZERO);
        let b = camera.normalized_to_world(Vec2::new(fraction, 0.0));
        (b - a).x
    }

    /// Run one frame
    pub fn update<F, T, S>(
        &mut self,
        frame: &FrameInput,
        field: &F,
        camera: &T,
        scorer: &mut S,
    ) -> SliderFrame
    where
        F: MotionField + ?Sized,
        T: ScreenTransform + ?Sized,
        S: Scorer + ?Sized,
    {
        if self.is_completed() {
            return SliderFrame {
                position: self.indicator.position(),
                rotation_degrees: self.indicator.rotation_degrees(),
                interaction: self.detector.last_result(),
                ..Default::default()
            };
        }

        let completion = self.indicator.update(frame.dt, self.beat_length, scorer);
        let interaction = self
            .detector
            .evaluate(self.indicator.position(), field, camera, frame);

        let ticks = self.clock.advance(frame.dt);
        let mut markers = Vec::new();
        if completion.is_none() {
            let remaining = self.indicator.required_hits().saturating_sub(self.beats_seen);
            let ticks = ticks.min(remaining);
            self.beats_seen += ticks;
            for _ in 0..ticks {
                if let Some(marker) =
                    self.indicator
                        .on_beat(interaction.activated, self.hit_score, scorer)
                {
                    markers.push(marker);
                }
            }
        }

        SliderFrame {
            position: self.indicator.position(),
            rotation_degrees: self.indicator.rotation_degrees(),
            interaction,
            markers,
            completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::{ScoreBoard, SweepMode, Tempo};
    use crate::consts::FRAME_DT;
    use crate::field::{MotionTexture, OrthoCamera};

    const DT: f32 = 0.25;

    fn slider(beats: u32) -> SliderNote {
        let curve = Curve::new(vec![
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        let tempo = Tempo::from_beat_length(0.5).unwrap();
        SliderNote::new(
            curve,
            IndicatorConfig {
                beats,
                sweep: SweepMode::Once,
            },
            RegionConfig::default(),
            10,
            &tempo,
            7,
        )
        .unwrap()
    }

    fn frame() -> FrameInput {
        FrameInput {
            dt: DT,
            ..Default::default()
        }
    }

    #[test]
    fn test_every_beat_hit_gives_combo() {
        let cam = OrthoCamera::default();
        let field = MotionTexture::uniform(32, 32, 1.0).unwrap();
        let mut board = ScoreBoard::new();
        let mut note = slider(2);

        // Beats at 0.0 and 0.5; completes at 1.0
        let mut markers = 0;
        let mut completion = None;
        for _ in 0..4 {
            let out = note.update(&frame(), &field, &cam, &mut board);
            assert!(out.interaction.activated);
            markers += out.markers.len();
            completion = completion.or(out.completion);
        }

        assert_eq!(markers, 2);
        assert_eq!(completion, Some(Completion { hits: 2, combo: true }));
        assert_eq!(board, ScoreBoard { score: 20, combo: 1 });
        assert!(note.is_completed());
    }

    #[test]
    fn test_missed_beat_breaks_combo() {
        let cam = OrthoCamera::default();
        let lit = MotionTexture::uniform(32, 32, 1.0).unwrap();
        let dark = MotionTexture::uniform(32, 32, 0.0).unwrap();
        let mut board = ScoreBoard::new();
        let mut note = slider(2);

        note.update(&frame(), &lit, &cam, &mut board);
        note.update(&frame(), &dark, &cam, &mut board);
        note.update(&frame(), &lit, &cam, &mut board);
        let last = note.update(&frame(), &lit, &cam, &mut board);

        assert_eq!(last.completion, Some(Completion { hits: 1, combo: false }));
        assert_eq!(board, ScoreBoard { score: 10, combo: 0 });
    }

    #[test]
    fn test_region_follows_indicator() {
        // View spans x in [-2.5, 2.5]; the curve runs x = -2 + 4t
        let cam = OrthoCamera::new(2.5, 1000.0, 1000.0);
        let mut gray = vec![0.0; 64 * 64];
        // Light only the left quarter of the screen (right of the mirrored texture)
        for y in 0..64 {
            for x in 48..64 {
                gray[y * 64 + x] = 1.0;
            }
        }
        let field = MotionTexture::from_gray(64, 64, &gray).unwrap();
        let mut board = ScoreBoard::new();
        let mut note = slider(4);

        let early = note.update(&frame(), &field, &cam, &mut board);
        assert!(early.position.x < -1.0);
        assert!(early.interaction.activated);

        for _ in 0..4 {
            note.update(&frame(), &field, &cam, &mut board);
        }
        let last = note.update(&frame(), &field, &cam, &mut board);
        assert!(last.position.x > -0.5);
        assert!(!last.interaction.activated);
    }

    fn run_at_60fps(beats: u32, sweep: SweepMode, bpm: f32) -> (Completion, ScoreBoard, usize) {
        let cam = OrthoCamera::default();
        let field = MotionTexture::uniform(16, 16, 1.0).unwrap();
        let curve = Curve::new(vec![
            Vec3::new(-3.0, -1.0, 0.0),
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
        ])
        .unwrap();
        let tempo = Tempo::from_bpm(bpm).unwrap();
        let mut note = SliderNote::new(
            curve,
            IndicatorConfig { beats, sweep },
            RegionConfig::default(),
            10,
            &tempo,
            3,
        )
        .unwrap();
        let frame = FrameInput {
            dt: FRAME_DT,
            ..Default::default()
        };

        let mut board = ScoreBoard::new();
        let mut markers = 0;
        // Twice the expected traversal, in frames
        let limit = (beats * sweep.passes()) as f32 * tempo.beat_length() * 120.0;
        for _ in 0..limit as usize {
            let out = note.update(&frame, &field, &cam, &mut board);
            markers += out.markers.len();
            if let Some(completion) = out.completion {
                return (completion, board, markers);
            }
        }
        panic!("slider did not complete within {limit} frames");
    }

    #[test]
    fn test_full_slider_at_60fps_scores_combo() {
        for (beats, sweep, bpm) in [
            (4, SweepMode::Once, 120.0),
            (1, SweepMode::Once, 120.0),
            (3, SweepMode::Once, 137.0),
            (8, SweepMode::Once, 174.0),
            (2, SweepMode::PingPong, 120.0),
            (5, SweepMode::PingPong, 93.0),
        ] {
            let required = beats * sweep.passes();
            let (completion, board, markers) = run_at_60fps(beats, sweep, bpm);
            assert_eq!(
                completion,
                Completion { hits: required, combo: true },
                "{beats} beats {sweep:?} at {bpm} bpm"
            );
            assert_eq!(markers, required as usize);
            assert_eq!(board, ScoreBoard { score: 10 * required as u64, combo: 1 });
        }
    }

    #[test]
    fn test_completed_slider_is_inert() {
        let cam = OrthoCamera::default();
        let field = MotionTexture::uniform(8, 8, 1.0).unwrap();
        let mut board = ScoreBoard::new();
        let mut note = slider(1);

        let big = FrameInput {
            dt: 5.0,
            ..Default::default()
        };
        let out = note.update(&big, &field, &cam, &mut board);
        assert!(out.completion.is_some());
        // Ticks on the completing frame are dropped
        assert!(out.markers.is_empty());

        let after = note.update(&frame(), &field, &cam, &mut board);
        assert!(after.completion.is_none());
        assert!(after.markers.is_empty());
        assert_eq!(board.score, 0);
    }

    #[test]
    fn test_indicator_scale() {
        let cam = OrthoCamera::new(5.0, 1000.0, 500.0);
        let note = slider(1);
        // Default region size 0.25 -> 0.125 of a 20-unit wide view
        assert!((note.indicator_scale(&cam) - 2.5).abs() < 1e-4);
    }
}
