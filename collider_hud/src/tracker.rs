//! Landmark source — external hand-tracking process plus frame mailbox.
//!
//! A [`StreamTracker`] spawns the configured tracker command and reads its
//! stdout line by line: `null` means no hand, anything else must be a JSON
//! array of 21 `[x, y]` pairs. Parsed updates land in a [`FrameSlot`], a
//! single-slot latest-wins mailbox the session drains once per frame, so a
//! slow consumer drops stale frames instead of queueing them. Status
//! changes travel over a separate `mpsc` channel.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;

use gesture_sense::LandmarkFrame;
use glam::Vec2;

// ════════════════════════════════════════════════════════════════════
//  FrameSlot
// ════════════════════════════════════════════════════════════════════

/// One landmark update: `Some` while a hand is tracked, `None` when the
/// sensor reports no hand.
pub type SlotUpdate = Option<LandmarkFrame>;

/// Single-slot mailbox between the reader thread and the session.
/// `publish` overwrites any pending update; `take` drains at most one.
#[derive(Default)]
pub struct FrameSlot {
    pending: Mutex<Option<SlotUpdate>>,
}

impl FrameSlot {
    pub fn publish(&self, update: SlotUpdate) {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(update);
    }

    pub fn take(&self) -> Option<SlotUpdate> {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}

// ════════════════════════════════════════════════════════════════════
//  SensorStatus
// ════════════════════════════════════════════════════════════════════

/// Sensor state shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorStatus {
    /// Not running (never started, or stopped deliberately).
    Offline,
    /// Tracker process launched and streaming.
    Live,
    /// The OS refused to launch the tracker command.
    PermissionDenied,
    /// The tracker command could not be started for any other reason.
    InitFailure,
    /// The landmark stream died without a stop request. Latches the
    /// tracker; further starts need a fresh instance.
    Aborted,
}

impl SensorStatus {
    pub fn label(self) -> &'static str {
        match self {
            SensorStatus::Offline => "OFFLINE",
            SensorStatus::Live => "LIVE",
            SensorStatus::PermissionDenied => "PERMISSION_DENIED",
            SensorStatus::InitFailure => "INIT_FAILURE",
            SensorStatus::Aborted => "ABORTED",
        }
    }

    pub fn is_fatal(self) -> bool {
        self == SensorStatus::Aborted
    }
}

// ════════════════════════════════════════════════════════════════════
//  Wire parsing
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq)]
enum ParsedLine {
    /// No hand this frame (`null`, or an empty keepalive line).
    Absent,
    Hand(LandmarkFrame),
    /// Bad JSON, wrong point count, or non-finite coordinates.
    Malformed,
}

fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() || line == "null" {
        return ParsedLine::Absent;
    }
    let pairs: Vec<[f32; 2]> = match serde_json::from_str(line) {
        Ok(p) => p,
        Err(_) => return ParsedLine::Malformed,
    };
    let points: Vec<Vec2> = pairs.iter().map(|p| Vec2::new(p[0], p[1])).collect();
    match LandmarkFrame::from_points(&points) {
        Some(frame) => ParsedLine::Hand(frame),
        None => ParsedLine::Malformed,
    }
}

// ════════════════════════════════════════════════════════════════════
//  StreamTracker
// ════════════════════════════════════════════════════════════════════

/// Owns the tracker child process and its reader thread.
pub struct StreamTracker {
    command: Vec<String>,
    slot: Arc<FrameSlot>,
    status_tx: Sender<SensorStatus>,
    child: Option<Child>,
    stopping: Arc<AtomicBool>,
    fatal: Arc<AtomicBool>,
}

impl StreamTracker {
    pub fn new(command: Vec<String>, slot: Arc<FrameSlot>, status_tx: Sender<SensorStatus>) -> StreamTracker {
        StreamTracker {
            command,
            slot,
            status_tx,
            child: None,
            stopping: Arc::new(AtomicBool::new(false)),
            fatal: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some() && !self.fatal()
    }

    pub fn fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }

    /// Launch the tracker process and begin publishing frames.
    ///
    /// Fails when no command is configured, when the spawn is refused
    /// (status `PermissionDenied` / `InitFailure`) or when a previous
    /// stream aborted, which latches this instance for good.
    pub fn start(&mut self) -> Result<(), String> {
        if self.fatal() {
            if let Some(mut dead) = self.child.take() {
                let _ = dead.wait();
            }
            return Err("tracking engine aborted; relaunch to try again".to_string());
        }
        if self.child.is_some() {
            return Ok(());
        }
        let (program, args) = match self.command.split_first() {
            Some(split) => split,
            None => return Err("no tracker command configured".to_string()),
        };

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let status = match e.kind() {
                    io::ErrorKind::PermissionDenied => SensorStatus::PermissionDenied,
                    _ => SensorStatus::InitFailure,
                };
                let _ = self.status_tx.send(status);
                return Err(format!("could not launch {program}: {e}"));
            }
        };
        let stdout = match child.stdout.take() {
            Some(out) => out,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = self.status_tx.send(SensorStatus::InitFailure);
                return Err("tracker stdout unavailable".to_string());
            }
        };

        let stopping = Arc::new(AtomicBool::new(false));
        {
            let slot = Arc::clone(&self.slot);
            let status_tx = self.status_tx.clone();
            let fatal = Arc::clone(&self.fatal);
            let stopping = Arc::clone(&stopping);
            thread::spawn(move || reader_thread(stdout, slot, status_tx, fatal, stopping));
        }

        self.stopping = stopping;
        self.child = Some(child);
        let _ = self.status_tx.send(SensorStatus::Live);
        eprintln!("[tracker] started: {}", self.command.join(" "));
        Ok(())
    }

    /// Kill the tracker and publish a final "no hand" update so the
    /// classifier settles into the absent state. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            self.stopping.store(true, Ordering::SeqCst);
            let _ = child.kill();
            let _ = child.wait();
            self.slot.publish(None);
            let _ = self.status_tx.send(SensorStatus::Offline);
            eprintln!("[tracker] stopped");
        }
    }
}

impl Drop for StreamTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn reader_thread(
    stdout: ChildStdout,
    slot: Arc<FrameSlot>,
    status_tx: Sender<SensorStatus>,
    fatal: Arc<AtomicBool>,
    stopping: Arc<AtomicBool>,
) {
    let reader = BufReader::new(stdout);
    let mut warned = false;

    for line in reader.lines() {
        // The pipe can hold frames the child wrote before it was killed;
        // after a stop request those are stale and must not be published.
        if stopping.load(Ordering::SeqCst) {
            return;
        }
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        match parse_line(&line) {
            ParsedLine::Hand(frame) => slot.publish(Some(frame)),
            ParsedLine::Absent => slot.publish(None),
            ParsedLine::Malformed => {
                if !warned {
                    eprintln!("[tracker] malformed landmark line; treating as no hand");
                    warned = true;
                }
                slot.publish(None);
            }
        }
    }

    if stopping.load(Ordering::SeqCst) {
        return;
    }
    // The stream died without a stop request.
    fatal.store(true, Ordering::SeqCst);
    slot.publish(None);
    let _ = status_tx.send(SensorStatus::Aborted);
    eprintln!("[tracker] landmark stream ended unexpectedly");
}

// ════════════════════════════════════════════════════════════════════
//  Tests
// ════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn hand_line(x: f32, y: f32) -> String {
        let pairs = vec![[x, y]; 21];
        serde_json::to_string(&pairs).unwrap()
    }

    #[test]
    fn slot_keeps_only_the_newest_update() {
        let slot = FrameSlot::default();
        let frame = parse_line(&hand_line(0.5, 0.5));
        let frame = match frame {
            ParsedLine::Hand(f) => f,
            other => panic!("expected a hand, got {other:?}"),
        };
        slot.publish(Some(frame));
        slot.publish(None);
        assert_eq!(slot.take(), Some(None));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn valid_line_parses_into_a_hand() {
        match parse_line(&hand_line(0.25, 0.75)) {
            ParsedLine::Hand(frame) => {
                assert_eq!(frame.points()[0], Vec2::new(0.25, 0.75));
            }
            other => panic!("expected a hand, got {other:?}"),
        }
    }

    #[test]
    fn null_and_blank_lines_mean_no_hand() {
        assert_eq!(parse_line("null"), ParsedLine::Absent);
        assert_eq!(parse_line("  null  "), ParsedLine::Absent);
        assert_eq!(parse_line(""), ParsedLine::Absent);
    }

    #[test]
    fn garbage_lines_are_malformed() {
        assert_eq!(parse_line("hello"), ParsedLine::Malformed);
        assert_eq!(parse_line("{\"x\": 1}"), ParsedLine::Malformed);
        assert_eq!(parse_line("[[0.5, 0.5]]"), ParsedLine::Malformed);
        // 20 pairs is one short of a hand.
        let short = serde_json::to_string(&vec![[0.5f32, 0.5]; 20]).unwrap();
        assert_eq!(parse_line(&short), ParsedLine::Malformed);
    }

    #[test]
    fn unconfigured_tracker_refuses_to_start() {
        let (tx, _rx) = mpsc::channel();
        let mut tracker = StreamTracker::new(Vec::new(), Arc::new(FrameSlot::default()), tx);
        assert!(!tracker.has_command());
        assert!(tracker.start().is_err());
    }

    #[test]
    fn stop_discards_buffered_frames() {
        let (tx, _rx) = mpsc::channel();
        let slot = Arc::new(FrameSlot::default());
        // yes(1) floods the pipe with valid hand lines faster than the
        // reader drains them, so frames are always buffered at the kill.
        let mut tracker = StreamTracker::new(
            vec!["yes".to_string(), hand_line(0.5, 0.5)],
            Arc::clone(&slot),
            tx,
        );
        tracker.start().expect("yes(1) should spawn");
        thread::sleep(Duration::from_millis(60));
        tracker.stop();

        // Give the reader time to run into the stop request.
        thread::sleep(Duration::from_millis(150));
        let settled = slot.take();
        assert!(
            !matches!(settled, Some(Some(_))),
            "hand frame delivered after stop: {settled:?}"
        );
    }

    #[test]
    fn aborted_stream_latches_the_tracker() {
        let (tx, _rx) = mpsc::channel();
        let mut tracker = StreamTracker::new(
            vec!["hand-tracker".to_string()],
            Arc::new(FrameSlot::default()),
            tx,
        );
        tracker.fatal.store(true, Ordering::SeqCst);
        assert!(!tracker.is_running());
        let err = tracker.start().unwrap_err();
        assert!(err.contains("aborted"), "unexpected message: {err}");
    }

    #[test]
    fn fatal_statuses_are_exactly_the_abort() {
        assert!(SensorStatus::Aborted.is_fatal());
        for status in [
            SensorStatus::Offline,
            SensorStatus::Live,
            SensorStatus::PermissionDenied,
            SensorStatus::InitFailure,
        ] {
            assert!(!status.is_fatal(), "{} should be retryable", status.label());
        }
    }
}
