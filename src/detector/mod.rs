mod blob;
mod classify;
mod fingers;
mod hull;
mod sampler;
mod segment;
mod stability;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use thiserror::Error;

use crate::{
    config::DetectorConfig,
    overlay,
    types::{DetectionUpdate, Frame, HandInfo, RecognizedFrame},
};

/// A cleaned blob must exceed this many pixels to count as a hand.
const MIN_HAND_PIXELS: usize = 50;
/// How long the worker waits for a frame before re-checking the stop flag.
const FRAME_WAIT: Duration = Duration::from_millis(100);

/// A frame the pipeline cannot process. Logged and skipped; never fatal.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("frame has a zero dimension ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
}

/// Per-session pipeline state. Only the finger-count smoothing history and
/// the stability hold timer survive between frames; everything else is
/// recomputed from scratch. Both reset whenever no hand is detected.
pub struct Detector {
    config: DetectorConfig,
    finger_history: fingers::FingerHistory,
    stability: stability::StabilityTracker,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Self {
        let finger_history = fingers::FingerHistory::new(config.finger_history_len);
        let stability = stability::StabilityTracker::new(config.stable_hold);
        Self {
            config,
            finger_history,
            stability,
        }
    }

    /// Runs the full pipeline over one captured frame: resample, segment
    /// skin, isolate the hand blob, extract fingertips, count, classify and
    /// track stability. Returns the analysis-size frame (with the hand
    /// overlay drawn when one was found) paired with the detection result.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        now: Instant,
    ) -> Result<RecognizedFrame, FrameError> {
        let mut raster = sampler::sample_frame(frame, &self.config)?;
        let width = self.config.analysis_width;
        let height = self.config.analysis_height;

        let skin = segment::skin_pixels(&raster, width, height);
        let cleaned = blob::isolate_hand(&skin, width, height);

        let update = match HandInfo::from_points(&cleaned) {
            Some(hand) if cleaned.len() > MIN_HAND_PIXELS => {
                let fingertips = hull::extract_fingertips(&cleaned, &hand, width, height);
                let raw_count = fingers::count_fingers(&fingertips, &hand);
                let smoothed = self.finger_history.push(raw_count);
                let gesture = classify::classify(&hand, smoothed, &fingertips);
                let stable = self.stability.observe(gesture.letter(), now);

                overlay::draw_hand_overlay(&mut raster, width, height, &hand, &fingertips);

                DetectionUpdate {
                    gesture: Some(gesture),
                    stable,
                    hand: Some(hand),
                    fingertips,
                }
            }
            _ => {
                // No hand: drop temporal state so the next detection starts fresh.
                self.finger_history.clear();
                self.stability.reset();
                DetectionUpdate {
                    gesture: None,
                    stable: false,
                    hand: None,
                    fingertips: Vec::new(),
                }
            }
        };

        Ok(RecognizedFrame {
            frame: Frame {
                rgba: raster,
                width,
                height,
                timestamp: frame.timestamp,
            },
            update,
        })
    }
}

/// Spawns the detection worker thread. Frames arrive through a single-slot
/// channel, so the worker never processes overlapping or stale frames: it
/// always drains to the newest one available.
pub fn start_detector(
    config: DetectorConfig,
    frame_rx: Receiver<Frame>,
    result_tx: Sender<RecognizedFrame>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || run_worker_loop(Detector::new(config), frame_rx, result_tx, stop))
}

fn run_worker_loop(
    mut detector: Detector,
    frame_rx: Receiver<Frame>,
    result_tx: Sender<RecognizedFrame>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        let mut frame = match frame_rx.recv_timeout(FRAME_WAIT) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        // Keep only the newest pending frame.
        while let Ok(newer) = frame_rx.try_recv() {
            frame = newer;
        }

        match detector.process_frame(&frame, Instant::now()) {
            Ok(recognized) => {
                log::trace!("capture-to-detection latency {:?}", frame.timestamp.elapsed());
                let _ = result_tx.try_send(recognized);
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignGesture;

    const WIDTH: u32 = 280;
    const HEIGHT: u32 = 210;
    const SKIN: [u8; 4] = [200, 120, 80, 255];

    fn frame_from_points(points: &[(i32, i32)]) -> Frame {
        let mut rgba = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        for &(x, y) in points {
            let i = ((y as u32 * WIDTH + x as u32) * 4) as usize;
            rgba[i..i + 4].copy_from_slice(&SKIN);
        }
        Frame {
            rgba,
            width: WIDTH,
            height: HEIGHT,
            timestamp: Instant::now(),
        }
    }

    /// Five narrow spikes rising from a wide base; 61 points total, tips
    /// arched so each sits on the hull. Small enough to skip clustering.
    fn spike_hand() -> Vec<(i32, i32)> {
        let tips_y = [40, 28, 24, 28, 40];
        let mut pts = Vec::new();
        for (j, tip_y) in tips_y.iter().enumerate() {
            let x = 40 + 30 * j as i32;
            for k in 0..6 {
                pts.push((x, tip_y + 10 * k));
            }
        }
        for i in 0..31 {
            pts.push((30 + 5 * i, 95));
        }
        pts
    }

    /// Dense disc, diameter 60, centered at (140, 105): a featureless blob
    /// with no protrusions.
    fn disc() -> Vec<(i32, i32)> {
        let mut pts = Vec::new();
        for y in 75..=135 {
            for x in 110..=170 {
                let (dx, dy) = (x - 140, y - 105);
                if dx * dx + dy * dy <= 900 {
                    pts.push((x, y));
                }
            }
        }
        pts
    }

    #[test]
    fn blank_frame_reports_no_hand() {
        let mut detector = Detector::new(DetectorConfig::default());
        let recognized = detector
            .process_frame(&frame_from_points(&[]), Instant::now())
            .unwrap();

        assert!(recognized.update.gesture.is_none());
        assert!(recognized.update.hand.is_none());
        assert!(!recognized.update.stable);
        assert_eq!(
            recognized.update.display_text(),
            "No hand detected - show your palm"
        );
    }

    #[test]
    fn hand_loss_resets_smoothing_and_hold_state() {
        let mut detector = Detector::new(DetectorConfig::default());
        let now = Instant::now();

        let seen = detector
            .process_frame(&frame_from_points(&spike_hand()), now)
            .unwrap();
        assert!(seen.update.gesture.is_some());
        assert!(!detector.finger_history.is_empty());

        let lost = detector
            .process_frame(&frame_from_points(&[]), now + Duration::from_millis(33))
            .unwrap();
        assert!(lost.update.gesture.is_none());
        assert!(detector.finger_history.is_empty());
        assert!(!detector.stability.is_tracking());
    }

    #[test]
    fn featureless_disc_reads_as_closed_fist() {
        let mut detector = Detector::new(DetectorConfig::default());
        let recognized = detector
            .process_frame(&frame_from_points(&disc()), Instant::now())
            .unwrap();

        assert!(recognized.update.fingertips.is_empty());
        assert_eq!(recognized.update.gesture, Some(SignGesture::FistA));
        assert!(!recognized.update.stable);
    }

    #[test]
    fn five_spikes_read_as_wide_open_hand() {
        let mut detector = Detector::new(DetectorConfig::default());
        let now = Instant::now();

        let recognized = detector
            .process_frame(&frame_from_points(&spike_hand()), now)
            .unwrap();
        assert_eq!(recognized.update.fingertips.len(), 5);
        // Spread 0.8 over aspect ~2.1 lands on the flat/wide reading.
        assert_eq!(recognized.update.gesture, Some(SignGesture::FlatB));
        assert!(!recognized.update.stable);

        // Hold the same shape past the stability window.
        let held = detector
            .process_frame(
                &frame_from_points(&spike_hand()),
                now + Duration::from_millis(700),
            )
            .unwrap();
        assert_eq!(held.update.gesture, Some(SignGesture::FlatB));
        assert!(held.update.stable);
    }

    #[test]
    fn malformed_buffers_are_rejected_not_fatal() {
        let mut detector = Detector::new(DetectorConfig::default());
        let bad = Frame {
            rgba: vec![0u8; 16],
            width: WIDTH,
            height: HEIGHT,
            timestamp: Instant::now(),
        };
        assert!(detector.process_frame(&bad, Instant::now()).is_err());

        // The detector keeps working on the next good frame.
        let ok = detector
            .process_frame(&frame_from_points(&disc()), Instant::now())
            .unwrap();
        assert_eq!(ok.update.gesture, Some(SignGesture::FistA));
    }
}
