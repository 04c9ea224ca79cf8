//! gesture_probe — feed a canned landmark sequence through the classifier
//! and print one reading per frame. Handy for eyeballing thresholds.

use gesture_sense::{
    GestureClassifier, LandmarkFrame, INDEX_TIP, LANDMARK_COUNT, MIDDLE_TIP, PINKY_TIP, RING_TIP,
    THUMB_TIP, WRIST,
};
use glam::Vec2;

/// Synthetic hand: wrist at (cx, 0.8), tracked fingertips `reach` above it.
fn hand(cx: f32, reach: f32) -> LandmarkFrame {
    let mut pts = [Vec2::new(cx, 0.65); LANDMARK_COUNT];
    pts[WRIST] = Vec2::new(cx, 0.8);
    for &i in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
        pts[i] = Vec2::new(cx, 0.8 - reach);
    }
    pts[THUMB_TIP] = Vec2::new(cx - 0.1, 0.8 - reach);
    LandmarkFrame::from_points(&pts).expect("synthetic frame is well-formed")
}

fn pinch_hand(cx: f32) -> LandmarkFrame {
    let mut pts = [Vec2::new(cx, 0.65); LANDMARK_COUNT];
    pts[WRIST] = Vec2::new(cx, 0.8);
    for &i in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
        pts[i] = Vec2::new(cx, 0.5);
    }
    pts[THUMB_TIP] = Vec2::new(cx + 0.03, 0.5);
    LandmarkFrame::from_points(&pts).expect("synthetic frame is well-formed")
}

fn main() {
    println!();
    println!("  gesture_probe — canned landmark frames through the classifier");
    println!();

    let script: Vec<(&str, Option<LandmarkFrame>)> = vec![
        ("no hand",          None),
        ("neutral hand",     Some(hand(0.5, 0.30))),
        ("fist",             Some(hand(0.5, 0.15))),
        ("open palm",        Some(hand(0.5, 0.50))),
        ("pinch",            Some(pinch_hand(0.5))),
        ("drift left",       Some(hand(0.40, 0.30))), // below swipe travel
        ("fast move right",  Some(hand(0.70, 0.30))),
        ("fast move back",   Some(hand(0.25, 0.30))), // debounced
        ("no hand again",    None),
    ];

    let mut gc = GestureClassifier::new();
    println!("  {:<16} {:>12}  {:>6}  {:>13}", "frame", "gesture", "pinch", "center");
    for (label, frame) in &script {
        let r = gc.classify(frame.as_ref());
        println!(
            "  {:<16} {:>12}  {:>6.3}  ({:.3}, {:.3})",
            label,
            r.gesture.name(),
            r.pinch_distance,
            r.center.x,
            r.center.y
        );
    }
    println!();
}
