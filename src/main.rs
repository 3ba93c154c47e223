//! Motion Rhythm headless runner
//!
//! Plays one slider against a synthetic webcam feed: a bright "hand" blob
//! that follows the indicator with some shake, and drops out for one beat.
//! Usage: `motion-rhythm [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Motion Rhythm (headless) starting...");

    if let Err(e) = headless::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive the library directly on web
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::{Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use motion_rhythm::Settings;
    use motion_rhythm::beat::{BeatAuthority, ScoreBoard, SliderNote};
    use motion_rhythm::consts::FRAME_DT;
    use motion_rhythm::curve::Curve;
    use motion_rhythm::field::{MotionTexture, OrthoCamera, ScreenTransform};
    use motion_rhythm::interact::FrameInput;

    const CAPTURE_WIDTH: usize = 160;
    const CAPTURE_HEIGHT: usize = 90;
    /// Hand blob radius in capture pixels
    const HAND_RADIUS: f32 = 9.0;
    /// Frame-difference amplification
    const MOTION_GAIN: f32 = 4.0;
    /// Safety cap on frames
    const MAX_FRAMES: u32 = 60 * 120;

    pub fn run(settings_path: Option<String>) -> motion_rhythm::Result<()> {
        let settings = match settings_path {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        settings.validate()?;

        let tempo = settings.tempo()?;
        let camera = settings.camera;
        let curve = Curve::new(vec![
            Vec3::new(-5.0, -2.0, 0.0),
            Vec3::new(-2.0, 2.5, 0.0),
            Vec3::new(1.0, -2.5, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(5.0, 2.0, 0.0),
        ])?;
        let mut note = SliderNote::new(
            curve,
            settings.indicator.clone(),
            settings.region.clone(),
            settings.slider_score,
            &tempo,
            settings.seed,
        )?;
        log::info!(
            "Slider at {:.0} BPM, {} beats, indicator scale {:.2}",
            tempo.bpm(),
            settings.indicator.beats,
            note.indicator_scale(&camera)
        );

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let mut board = ScoreBoard::new();
        let mut previous = vec![0.0; CAPTURE_WIDTH * CAPTURE_HEIGHT];
        let mut elapsed = 0.0f32;
        let beat = tempo.beat_length();

        for frame_index in 0..MAX_FRAMES {
            elapsed += FRAME_DT;

            // Hand vanishes during the second beat
            let hand_visible = !(beat..2.0 * beat).contains(&elapsed);
            let shake = Vec2::new(rng.random_range(-0.01..0.01), rng.random_range(-0.01..0.01));
            let hand = camera.to_normalized_screen(note.indicator().position()) + shake;
            let current = render_hand(hand_visible.then_some(hand));

            let field = MotionTexture::from_frame_difference(
                CAPTURE_WIDTH,
                CAPTURE_HEIGHT,
                &previous,
                &current,
                MOTION_GAIN,
            )?;
            previous = current;

            let input = FrameInput {
                dt: FRAME_DT,
                ..Default::default()
            };
            let out = note.update(&input, &field, &camera, &mut board);

            for marker in &out.markers {
                log::info!(
                    "Beat hit at ({:.2}, {:.2}) -> score {}",
                    marker.position.x,
                    marker.position.y,
                    marker.score
                );
            }
            if settings.debug_overlay && frame_index % 30 == 0 {
                log::debug!(
                    "t={:.3} rot={:.1} energy={:.3} touched={}",
                    note.indicator().t(),
                    out.rotation_degrees,
                    out.interaction.energy,
                    out.interaction.activated
                );
                log_overlay(&note, &camera);
            }
            if let Some(done) = out.completion {
                log::info!(
                    "Slider finished after {} frames: {} hits, combo {}",
                    frame_index + 1,
                    done.hits,
                    done.combo
                );
                break;
            }
        }

        println!("Score: {}  Combo: {}", board.score, board.combo);
        Ok(())
    }

    /// Region outline and grid samples in world space, in place of a drawn overlay
    fn log_overlay(note: &SliderNote, camera: &OrthoCamera) {
        let position = note.indicator().position();
        let region = note.detector().region();
        let outline = region.debug_outline(position, camera);
        let samples = region.debug_sample_points(position, camera);
        log::debug!(
            "overlay: outline {:?} {:?} {:?} {:?}, {} samples",
            outline[0].truncate(),
            outline[1].truncate(),
            outline[2].truncate(),
            outline[3].truncate(),
            samples.len()
        );
        for p in &samples {
            log::trace!("overlay sample ({:.3}, {:.3})", p.x, p.y);
        }
    }

    /// Grayscale capture frame with the hand drawn at a normalized screen
    /// position (mirrored, as a front camera sees it)
    fn render_hand(hand: Option<Vec2>) -> Vec<f32> {
        let mut frame = vec![0.0; CAPTURE_WIDTH * CAPTURE_HEIGHT];
        let Some(hand) = hand else {
            return frame;
        };
        let center = Vec2::new(
            (1.0 - hand.x) * CAPTURE_WIDTH as f32,
            hand.y * CAPTURE_HEIGHT as f32,
        );
        for y in 0..CAPTURE_HEIGHT {
            for x in 0..CAPTURE_WIDTH {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance(center) <= HAND_RADIUS {
                    frame[y * CAPTURE_WIDTH + x] = 1.0;
                }
            }
        }
        frame
    }
}
