//! # gesture_sense
//!
//! Classify hand gestures from 21-point normalized landmark frames, the
//! layout used by common hand-tracking engines (wrist at index 0, four
//! joints per finger, fingertips at 4/8/12/16/20).
//!
//! ## Gesture vocabulary
//!
//! | Gesture | Trigger |
//! |---|---|
//! | `Fist` | mean wrist→fingertip reach < 0.22 |
//! | `OpenPalm` | mean wrist→fingertip reach > 0.45 |
//! | `TwoFingers` | index + middle extended (> 0.35), ring curled (< 0.25) |
//! | `Pinch` | thumb-tip to index-tip distance < 0.06 |
//! | `SwipeLeft` / `SwipeRight` | centroid jumped > 0.15 in x since the previous processed frame |
//! | `None` | anything else, or no hand |
//!
//! A swipe overrides the shape labels for that frame and is debounced:
//! after one fires, further swipes are suppressed for 1.2 s. All
//! thresholds are calibration values carried in [`GestureTuning`].
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_sense::{Gesture, GestureClassifier};
//!
//! let mut gc = GestureClassifier::new();
//! let reading = gc.classify(None);            // no hand in view
//! assert_eq!(reading.gesture, Gesture::None);
//! assert_eq!(reading.center.x, 0.5);
//! ```

use std::time::{Duration, Instant};

use glam::Vec2;

// ════════════════════════════════════════════════════════════════════════════
// Landmark frame
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks in one hand frame.
pub const LANDMARK_COUNT: usize = 21;

// Landmark indices (standard 21-point hand layout).
pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP:   usize = 16;
pub const PINKY_TIP:  usize = 20;

/// One validated hand frame: exactly 21 points, x/y normalized to the
/// image frame with the origin top-left.
///
/// Construction is the validation boundary — anything that is not a clean
/// 21-point finite frame maps to "no hand" (`None`) rather than an error,
/// so a flaky upstream tracker can never crash the classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Vec2; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate a raw point list. Wrong count or any non-finite
    /// coordinate yields `None`.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        if points.iter().any(|p| !p.is_finite()) {
            return None;
        }
        let mut arr = [Vec2::ZERO; LANDMARK_COUNT];
        arr.copy_from_slice(points);
        Some(LandmarkFrame { points: arr })
    }

    pub fn points(&self) -> &[Vec2; LANDMARK_COUNT] {
        &self.points
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture + reading
// ════════════════════════════════════════════════════════════════════════════

/// The closed gesture set. Exactly one label is emitted per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    None,
    Fist,
    OpenPalm,
    Pinch,
    TwoFingers,
    SwipeLeft,
    SwipeRight,
}

impl Gesture {
    /// Display name for status lines.
    pub fn name(self) -> &'static str {
        match self {
            Gesture::None       => "NONE",
            Gesture::Fist       => "FIST",
            Gesture::OpenPalm   => "OPEN_PALM",
            Gesture::Pinch      => "PINCH",
            Gesture::TwoFingers => "TWO_FINGERS",
            Gesture::SwipeLeft  => "SWIPE_LEFT",
            Gesture::SwipeRight => "SWIPE_RIGHT",
        }
    }
}

/// One classification result: the gesture label plus the two continuous
/// readings consumers use every frame (pinch distance drives the camera
/// dolly, the centroid drives camera pan).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub gesture:        Gesture,
    pub pinch_distance: f32,
    /// Mean of all 21 landmarks, in [0,1]².
    pub center:         Vec2,
}

impl Default for GestureReading {
    fn default() -> Self {
        GestureReading {
            gesture:        Gesture::None,
            pinch_distance: 0.0,
            center:         Vec2::new(0.5, 0.5),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tuning
// ════════════════════════════════════════════════════════════════════════════

/// Calibration thresholds, all in normalized image units unless noted.
///
/// These values are empirically tuned against real tracker output, not
/// derived. Revisit them together with the tests that pin them.
#[derive(Clone, Debug)]
pub struct GestureTuning {
    /// Mean wrist→fingertip reach below this = fist.
    pub fist_max:        f32,
    /// Mean wrist→fingertip reach above this = open palm.
    pub open_min:        f32,
    /// Index and middle reach above this (with ring curled) = two fingers.
    pub two_finger_min:  f32,
    /// Ring reach below this counts as curled.
    pub ring_curl_max:   f32,
    /// Thumb-tip to index-tip distance below this = pinch.
    pub pinch_max:       f32,
    /// Centroid x jump between processed frames that counts as a swipe.
    pub swipe_threshold: f32,
    /// Minimum gap between two swipe emissions.
    pub swipe_cooldown:  Duration,
}

impl Default for GestureTuning {
    fn default() -> Self {
        GestureTuning {
            fist_max:        0.22,
            open_min:        0.45,
            two_finger_min:  0.35,
            ring_curl_max:   0.25,
            pinch_max:       0.06,
            swipe_threshold: 0.15,
            swipe_cooldown:  Duration::from_millis(1200),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateful gesture classifier.
///
/// The only state carried between frames is the previous centroid x (for
/// swipe detection) and the last swipe timestamp (for the debounce).
/// Given that state, [`classify_at`](GestureClassifier::classify_at) is a
/// pure function of its inputs, which keeps every path unit-testable with
/// a fabricated clock.
#[derive(Debug)]
pub struct GestureClassifier {
    tuning:        GestureTuning,
    last_center_x: Option<f32>,
    last_swipe:    Option<Instant>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::with_tuning(GestureTuning::default())
    }

    pub fn with_tuning(tuning: GestureTuning) -> Self {
        GestureClassifier {
            tuning,
            last_center_x: None,
            last_swipe:    None,
        }
    }

    /// Forget the previous centroid and swipe timestamp, as if freshly
    /// constructed. Called when the landmark source stops.
    pub fn reset(&mut self) {
        self.last_center_x = None;
        self.last_swipe = None;
    }

    /// Classify one frame at the current wall clock.
    pub fn classify(&mut self, frame: Option<&LandmarkFrame>) -> GestureReading {
        self.classify_at(frame, Instant::now())
    }

    /// Classify one frame at an explicit timestamp.
    ///
    /// `None` means no hand was detected: the centroid memory is cleared
    /// (so the next hand does not register a phantom swipe) and the
    /// default reading is returned.
    pub fn classify_at(&mut self, frame: Option<&LandmarkFrame>, now: Instant) -> GestureReading {
        let frame = match frame {
            Some(f) => f,
            None => {
                self.last_center_x = None;
                return GestureReading::default();
            }
        };

        let pts   = frame.points();
        let wrist = pts[WRIST];

        let pinch = pts[THUMB_TIP].distance(pts[INDEX_TIP]);

        // ── hand shape ────────────────────────────────────────────────────
        let reach = |i: usize| pts[i].distance(wrist);
        let avg_reach =
            (reach(INDEX_TIP) + reach(MIDDLE_TIP) + reach(RING_TIP) + reach(PINKY_TIP)) / 4.0;

        let is_fist = avg_reach < self.tuning.fist_max;
        let is_open = avg_reach > self.tuning.open_min;
        let is_two  = reach(INDEX_TIP) > self.tuning.two_finger_min
            && reach(MIDDLE_TIP) > self.tuning.two_finger_min
            && reach(RING_TIP) < self.tuning.ring_curl_max;

        let center = pts.iter().copied().sum::<Vec2>() / LANDMARK_COUNT as f32;

        // ── swipe (runs first; overrides shape for this frame) ────────────
        let mut gesture = Gesture::None;
        if let Some(last_x) = self.last_center_x {
            let cooled = match self.last_swipe {
                Some(t) => now.duration_since(t) > self.tuning.swipe_cooldown,
                None    => true,
            };
            if cooled {
                let dx = center.x - last_x;
                if dx.abs() > self.tuning.swipe_threshold {
                    gesture = if dx > 0.0 { Gesture::SwipeRight } else { Gesture::SwipeLeft };
                    self.last_swipe = Some(now);
                }
            }
        }
        // The centroid is remembered whether or not a swipe fired.
        self.last_center_x = Some(center.x);

        if gesture == Gesture::None {
            gesture = if is_fist {
                Gesture::Fist
            } else if is_two {
                Gesture::TwoFingers
            } else if is_open {
                Gesture::OpenPalm
            } else if pinch < self.tuning.pinch_max {
                Gesture::Pinch
            } else {
                Gesture::None
            };
        }

        GestureReading { gesture, pinch_distance: pinch, center }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand with all four tracked fingertips `reach` above the wrist at
    /// centroid x ≈ `cx`. Thumb is spread so the pinch never triggers.
    fn uniform_hand(cx: f32, reach: f32) -> LandmarkFrame {
        let mut pts = [Vec2::new(cx, 0.65); LANDMARK_COUNT];
        pts[WRIST] = Vec2::new(cx, 0.8);
        for &i in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            pts[i] = Vec2::new(cx, 0.8 - reach);
        }
        pts[THUMB_TIP] = Vec2::new(cx - 0.1, 0.8 - reach);
        LandmarkFrame::from_points(&pts).unwrap()
    }

    fn neutral(cx: f32) -> LandmarkFrame {
        uniform_hand(cx, 0.3)
    }

    #[test]
    fn absent_yields_default_reading() {
        let mut gc = GestureClassifier::new();
        let r = gc.classify_at(None, Instant::now());
        assert_eq!(r.gesture, Gesture::None);
        assert_eq!(r.pinch_distance, 0.0);
        assert_eq!(r.center, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn absent_resets_centroid_memory() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&neutral(0.2)), t0);
        gc.classify_at(None, t0 + Duration::from_millis(100));
        // Big jump after the reset must not register as a swipe.
        let r = gc.classify_at(Some(&neutral(0.9)), t0 + Duration::from_millis(200));
        assert_eq!(r.gesture, Gesture::None);
    }

    #[test]
    fn fist_from_short_reach() {
        let mut gc = GestureClassifier::new();
        let r = gc.classify(Some(&uniform_hand(0.5, 0.15)));
        assert_eq!(r.gesture, Gesture::Fist);
        assert!(r.pinch_distance > 0.0);
    }

    #[test]
    fn open_palm_from_long_reach() {
        let mut gc = GestureClassifier::new();
        let r = gc.classify(Some(&uniform_hand(0.5, 0.5)));
        assert_eq!(r.gesture, Gesture::OpenPalm);
    }

    #[test]
    fn neutral_reach_is_none() {
        let mut gc = GestureClassifier::new();
        let r = gc.classify(Some(&neutral(0.5)));
        assert_eq!(r.gesture, Gesture::None);
    }

    #[test]
    fn two_fingers_needs_curled_ring() {
        let mut pts = [Vec2::new(0.5, 0.65); LANDMARK_COUNT];
        pts[WRIST]      = Vec2::new(0.5, 0.8);
        pts[INDEX_TIP]  = Vec2::new(0.5, 0.4);  // reach 0.4
        pts[MIDDLE_TIP] = Vec2::new(0.5, 0.4);
        pts[RING_TIP]   = Vec2::new(0.5, 0.6);  // reach 0.2 — curled
        pts[PINKY_TIP]  = Vec2::new(0.5, 0.6);
        pts[THUMB_TIP]  = Vec2::new(0.3, 0.5);
        let frame = LandmarkFrame::from_points(&pts).unwrap();

        let mut gc = GestureClassifier::new();
        assert_eq!(gc.classify(Some(&frame)).gesture, Gesture::TwoFingers);
    }

    #[test]
    fn pinch_from_close_thumb_and_index() {
        let mut pts = [Vec2::new(0.5, 0.65); LANDMARK_COUNT];
        pts[WRIST] = Vec2::new(0.5, 0.8);
        for &i in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            pts[i] = Vec2::new(0.5, 0.5);  // neutral reach 0.3
        }
        pts[THUMB_TIP] = Vec2::new(0.53, 0.5);  // 0.03 from the index tip
        let frame = LandmarkFrame::from_points(&pts).unwrap();

        let mut gc = GestureClassifier::new();
        let r = gc.classify(Some(&frame));
        assert_eq!(r.gesture, Gesture::Pinch);
        assert!((r.pinch_distance - 0.03).abs() < 1e-4);
    }

    #[test]
    fn fist_beats_pinch() {
        // Short reach AND thumb touching index: fist has priority.
        let mut pts = [Vec2::new(0.5, 0.7); LANDMARK_COUNT];
        pts[WRIST] = Vec2::new(0.5, 0.8);
        for &i in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            pts[i] = Vec2::new(0.5, 0.65);  // reach 0.15
        }
        pts[THUMB_TIP] = Vec2::new(0.5, 0.65);
        let frame = LandmarkFrame::from_points(&pts).unwrap();

        let mut gc = GestureClassifier::new();
        assert_eq!(gc.classify(Some(&frame)).gesture, Gesture::Fist);
    }

    #[test]
    fn swipe_right_then_debounced() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&neutral(0.2)), t0);

        let r = gc.classify_at(Some(&neutral(0.5)), t0 + Duration::from_millis(100));
        assert_eq!(r.gesture, Gesture::SwipeRight);

        // Second qualifying jump inside the 1200 ms window: suppressed.
        let r = gc.classify_at(Some(&neutral(0.1)), t0 + Duration::from_millis(300));
        assert_eq!(r.gesture, Gesture::None);
    }

    #[test]
    fn swipe_fires_again_after_cooldown() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&neutral(0.2)), t0);
        gc.classify_at(Some(&neutral(0.5)), t0 + Duration::from_millis(100));

        let r = gc.classify_at(Some(&neutral(0.2)), t0 + Duration::from_millis(1400));
        assert_eq!(r.gesture, Gesture::SwipeLeft);
    }

    #[test]
    fn centroid_updates_even_while_debounced() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&neutral(0.2)), t0);
        gc.classify_at(Some(&neutral(0.5)), t0 + Duration::from_millis(100)); // swipe
        gc.classify_at(Some(&neutral(0.9)), t0 + Duration::from_millis(200)); // suppressed

        // If the suppressed frame had not updated the centroid, the small
        // move below would read as a 0.4 jump and fire.
        let r = gc.classify_at(Some(&neutral(0.9)), t0 + Duration::from_millis(1400));
        assert_eq!(r.gesture, Gesture::None);
    }

    #[test]
    fn swipe_overrides_shape() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&uniform_hand(0.2, 0.15)), t0);
        let r = gc.classify_at(Some(&uniform_hand(0.5, 0.15)), t0 + Duration::from_millis(100));
        assert_eq!(r.gesture, Gesture::SwipeRight, "swipe wins over fist for the frame");
    }

    #[test]
    fn deterministic_given_same_state_and_inputs() {
        let t0 = Instant::now();
        let frames = [neutral(0.2), neutral(0.5), uniform_hand(0.5, 0.15)];
        let run = || {
            let mut gc = GestureClassifier::new();
            frames
                .iter()
                .enumerate()
                .map(|(i, f)| gc.classify_at(Some(f), t0 + Duration::from_millis(i as u64 * 100)))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn malformed_point_lists_rejected() {
        assert!(LandmarkFrame::from_points(&[Vec2::ZERO; 20]).is_none());
        assert!(LandmarkFrame::from_points(&[Vec2::ZERO; 22]).is_none());

        let mut pts = [Vec2::new(0.5, 0.5); LANDMARK_COUNT];
        pts[7] = Vec2::new(f32::NAN, 0.5);
        assert!(LandmarkFrame::from_points(&pts).is_none());
    }

    #[test]
    fn reset_clears_swipe_cooldown_and_centroid() {
        let mut gc = GestureClassifier::new();
        let t0 = Instant::now();
        gc.classify_at(Some(&neutral(0.2)), t0);
        gc.classify_at(Some(&neutral(0.5)), t0 + Duration::from_millis(100));
        gc.reset();

        // Post-reset, the first frame only seeds the centroid…
        gc.classify_at(Some(&neutral(0.2)), t0 + Duration::from_millis(200));
        // …and the next jump may swipe immediately, cooldown forgotten.
        let r = gc.classify_at(Some(&neutral(0.5)), t0 + Duration::from_millis(300));
        assert_eq!(r.gesture, Gesture::SwipeRight);
    }
}
