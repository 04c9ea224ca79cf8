//! Top-level session state machine.
//!
//! `Session` owns the gesture classifier, the particle field, the
//! persisted settings and the HUD timers. `run` wires it to the tracker,
//! the frame mailbox and the visualizer, and drives the whole thing at
//! display rate. No ambient globals: everything the frame loop touches
//! hangs off this one object.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gesture_sense::{Gesture, GestureClassifier, GestureReading};
use glam::Vec2;
use particle_field::{FieldSim, ModeKind};

use crate::settings::Settings;
use crate::tracker::{FrameSlot, SensorStatus, StreamTracker};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════
//  Pacing and limits
// ════════════════════════════════════════════════════════════════════

/// Minimum gap between two landmark classifications. Frames arriving
/// faster than this are dropped, not queued.
const CLASSIFY_INTERVAL: Duration = Duration::from_millis(100);
/// How long the mode-change glitch overlay stays up.
const GLITCH_DURATION: Duration = Duration::from_millis(300);
/// How long the engage overlay stays up after a glyph text commit.
const CINEMATIC_DURATION: Duration = Duration::from_millis(2000);
/// Frame-rate averaging window.
const FPS_WINDOW: Duration = Duration::from_millis(1000);

pub const MIN_PARTICLES: usize = 500;
pub const MAX_PARTICLES: usize = 20_000;

const SENSITIVITY_MIN: f32 = 0.1;
const SENSITIVITY_MAX: f32 = 3.0;
const GLOW_MIN: f32 = 0.0;
const GLOW_MAX: f32 = 4.0;

// ════════════════════════════════════════════════════════════════════
//  Input vocabulary
// ════════════════════════════════════════════════════════════════════

/// Synthetic hand pose driven by the pointer and held keys while manual
/// override is active.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManualPose {
    /// Pointer position, normalized to the window.
    pub center:      Vec2,
    pub fist:        bool,
    pub pinch:       bool,
    pub two_fingers: bool,
}

/// One user command from the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HudInput {
    NextMode,
    PrevMode,
    SetMode(ModeKind),
    /// Particle count change request; clamped to the allowed range.
    BumpParticles(i64),
    BumpSensitivity(f32),
    BumpGlow(f32),
    ToggleHints,
    ToggleManual,
    /// Toggle the tracker process; handled by the run loop.
    ToggleCamera,
    /// Collect new glyph text on stdin; handled by the run loop.
    EditText,
    Pose(ManualPose),
    Quit,
}

/// Turn a manual pose into the same reading shape a classified frame
/// produces, so gestures flow through one path regardless of source.
fn reading_from_pose(pose: &ManualPose) -> GestureReading {
    let gesture = if pose.fist {
        Gesture::Fist
    } else if pose.two_fingers {
        Gesture::TwoFingers
    } else if pose.pinch {
        Gesture::Pinch
    } else {
        Gesture::None
    };
    GestureReading {
        gesture,
        pinch_distance: if gesture == Gesture::Pinch { pose.center.y } else { 0.0 },
        center: pose.center,
    }
}

// ════════════════════════════════════════════════════════════════════
//  FpsCounter
// ════════════════════════════════════════════════════════════════════

/// Frames rendered per one-second window.
pub struct FpsCounter {
    window_start: Instant,
    frames:       u32,
    fps:          u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> FpsCounter {
        FpsCounter { window_start: now, frames: 0, fps: 0 }
    }

    pub fn tick(&mut self, now: Instant) {
        self.frames += 1;
        if now.duration_since(self.window_start) >= FPS_WINDOW {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

// ════════════════════════════════════════════════════════════════════
//  Session
// ════════════════════════════════════════════════════════════════════

pub struct Session {
    // ── simulation ───────────────────────────────────────────────────
    sim:        FieldSim,
    classifier: GestureClassifier,
    reading:    GestureReading,

    // ── configuration ────────────────────────────────────────────────
    settings:      Settings,
    settings_path: PathBuf,

    // ── glyph text ───────────────────────────────────────────────────
    text: String,

    // ── timers / overlays ────────────────────────────────────────────
    started:         Instant,
    last_classify:   Option<Instant>,
    glitch_until:    Option<Instant>,
    cinematic_until: Option<Instant>,
    fps:             FpsCounter,

    // ── sensor / manual override ─────────────────────────────────────
    sensor:      SensorStatus,
    manual:      bool,
    manual_pose: ManualPose,

    // ── status line ──────────────────────────────────────────────────
    pub status: String,
}

impl Session {
    pub fn new(settings: Settings, settings_path: PathBuf, now: Instant) -> Session {
        let settings = clamp_settings(settings);
        let status = format!(
            "Ready — {} particles · {} mode",
            settings.particle_count,
            settings.mode.name()
        );
        Session {
            sim:             FieldSim::new(settings.particle_count),
            classifier:      GestureClassifier::new(),
            reading:         GestureReading::default(),
            settings,
            settings_path,
            text:            String::new(),
            started:         now,
            last_classify:   None,
            glitch_until:    None,
            cinematic_until: None,
            fps:             FpsCounter::new(now),
            sensor:          SensorStatus::Offline,
            manual:          false,
            manual_pose:     ManualPose::default(),
            status,
        }
    }

    // ── process one HudInput ─────────────────────────────────────────

    pub fn handle_input(&mut self, input: HudInput, now: Instant) {
        match input {
            HudInput::NextMode => self.change_mode(self.settings.mode.next(), now),
            HudInput::PrevMode => self.change_mode(self.settings.mode.prev(), now),
            HudInput::SetMode(mode) => self.change_mode(mode, now),

            HudInput::BumpParticles(delta) => {
                let count = (self.settings.particle_count as i64 + delta)
                    .clamp(MIN_PARTICLES as i64, MAX_PARTICLES as i64)
                    as usize;
                if count != self.settings.particle_count {
                    self.settings.particle_count = count;
                    self.sim.set_count(count);
                    self.status = format!("{count} particles");
                    self.persist();
                }
            }

            HudInput::BumpSensitivity(delta) => {
                self.settings.sensitivity =
                    (self.settings.sensitivity + delta).clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
                self.status = format!("Sensitivity {:.1}", self.settings.sensitivity);
                self.persist();
            }

            HudInput::BumpGlow(delta) => {
                self.settings.glow_intensity =
                    (self.settings.glow_intensity + delta).clamp(GLOW_MIN, GLOW_MAX);
                self.status = format!("Glow {:.2}", self.settings.glow_intensity);
                self.persist();
            }

            HudInput::ToggleHints => {
                self.settings.show_hints = !self.settings.show_hints;
                self.status = if self.settings.show_hints {
                    "Hints on".to_string()
                } else {
                    "Hints off".to_string()
                };
                self.persist();
            }

            HudInput::ToggleManual => {
                self.manual = !self.manual;
                if self.manual {
                    self.status = "Manual override ON — pointer drives the hand".to_string();
                } else {
                    self.manual_pose = ManualPose::default();
                    self.reading = GestureReading::default();
                    self.status = "Manual override off".to_string();
                }
            }

            HudInput::Pose(pose) => self.manual_pose = pose,

            // Handled by the run loop, which owns the tracker and stdin.
            HudInput::ToggleCamera | HudInput::EditText | HudInput::Quit => {}
        }
    }

    fn change_mode(&mut self, mode: ModeKind, now: Instant) {
        if mode == self.settings.mode {
            return;
        }
        self.settings.mode = mode;
        self.glitch_until = Some(now + GLITCH_DURATION);
        self.status = format!("Mode: {}", mode.name());
        self.persist();
    }

    fn persist(&self) {
        self.settings.save(&self.settings_path);
    }

    // ── gesture intake ───────────────────────────────────────────────

    /// Store a fresh reading. Swipes cycle the visual mode; this is the
    /// only gesture that mutates it.
    pub fn apply_reading(&mut self, reading: GestureReading, now: Instant) {
        match reading.gesture {
            Gesture::SwipeRight => self.change_mode(self.settings.mode.next(), now),
            Gesture::SwipeLeft => self.change_mode(self.settings.mode.prev(), now),
            _ => {}
        }
        self.reading = reading;
    }

    /// Commit new glyph text. Empty text restores the orb; non-empty text
    /// arms the engage overlay while the flock reforms.
    pub fn set_text(&mut self, text: &str, now: Instant) {
        self.text = text.trim().to_string();
        self.sim.set_text(&self.text);
        if self.text.is_empty() {
            self.cinematic_until = None;
            self.status = "Glyph cloud cleared — orb restored".to_string();
        } else {
            self.cinematic_until = Some(now + CINEMATIC_DURATION);
            self.status = format!("Glyph cloud: {}", self.text);
        }
    }

    /// Record a sensor transition. Anything other than `Live` leaves the
    /// classifier in the absent state so the field keeps animating with
    /// no gesture instead of freezing on the last one. Fatal statuses
    /// latch the tracker, so the status line names the only way out.
    pub fn set_sensor(&mut self, status: SensorStatus) {
        if status != SensorStatus::Live {
            self.classifier.reset();
            self.reading = GestureReading::default();
        }
        self.sensor = status;
        self.status = if status.is_fatal() {
            format!("Sensor: {} — relaunch to recover", status.label())
        } else {
            format!("Sensor: {}", status.label())
        };
    }

    // ── per-frame advance ────────────────────────────────────────────

    /// Drain at most one landmark update, classify it if the sensor is
    /// live and the throttle allows (otherwise the frame is dropped and
    /// the last reading stands), then step the simulation.
    ///
    /// A stopped or failed sensor can still have frames in flight from
    /// its reader thread; those drain here but never classify, so a
    /// stale hand cannot resurrect a gesture after the source is gone.
    pub fn update(&mut self, slot: &FrameSlot, now: Instant) {
        let update = slot.take();
        if self.manual {
            let reading = reading_from_pose(&self.manual_pose);
            self.apply_reading(reading, now);
        } else if self.sensor == SensorStatus::Live {
            if let Some(update) = update {
                let due = self
                    .last_classify
                    .map_or(true, |t| now.duration_since(t) >= CLASSIFY_INTERVAL);
                if due {
                    self.last_classify = Some(now);
                    let reading = self.classifier.classify_at(update.as_ref(), now);
                    self.apply_reading(reading, now);
                }
            }
        }

        let elapsed = now.duration_since(self.started).as_secs_f32();
        self.sim
            .step(&self.reading, self.settings.mode, self.settings.sensitivity, elapsed);
        self.fps.tick(now);
    }

    // ── accessors for the render loop ────────────────────────────────

    pub fn sim(&self) -> &FieldSim {
        &self.sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> ModeKind {
        self.settings.mode
    }

    pub fn reading(&self) -> &GestureReading {
        &self.reading
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sensor(&self) -> SensorStatus {
        self.sensor
    }

    pub fn manual(&self) -> bool {
        self.manual
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn glitching(&self, now: Instant) -> bool {
        self.glitch_until.map_or(false, |until| now < until)
    }

    pub fn cinematic(&self, now: Instant) -> bool {
        self.cinematic_until.map_or(false, |until| now < until)
    }

    fn set_camera_enabled(&mut self, on: bool) {
        if self.settings.camera_enabled != on {
            self.settings.camera_enabled = on;
            self.persist();
        }
    }
}

fn clamp_settings(mut settings: Settings) -> Settings {
    settings.particle_count = settings.particle_count.clamp(MIN_PARTICLES, MAX_PARTICLES);
    settings.sensitivity = settings.sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
    settings.glow_intensity = settings.glow_intensity.clamp(GLOW_MIN, GLOW_MAX);
    settings
}

// ════════════════════════════════════════════════════════════════════
//  run() — the main application loop
// ════════════════════════════════════════════════════════════════════

/// Everything `run` needs, assembled by `main.rs`.
pub struct HudConfig {
    pub settings:        Settings,
    pub settings_path:   PathBuf,
    /// Tracker argv; empty means manual override only.
    pub tracker_command: Vec<String>,
    /// Initial glyph text; empty starts on the orb.
    pub glyph_text:      String,
}

impl Default for HudConfig {
    fn default() -> Self {
        HudConfig {
            settings:        Settings::default(),
            settings_path:   PathBuf::from(crate::settings::SETTINGS_FILE),
            tracker_command: Vec::new(),
            glyph_text:      String::new(),
        }
    }
}

/// Run the full application: tracker, session, window. Returns when the
/// user quits or the window closes.
pub fn run(cfg: HudConfig) -> Result<(), String> {
    let slot = Arc::new(FrameSlot::default());
    let (status_tx, status_rx) = mpsc::channel::<SensorStatus>();

    let mut session = Session::new(cfg.settings, cfg.settings_path, Instant::now());
    if !cfg.glyph_text.trim().is_empty() {
        session.set_text(&cfg.glyph_text, Instant::now());
    }

    let mut tracker = StreamTracker::new(cfg.tracker_command, Arc::clone(&slot), status_tx);
    if !tracker.has_command() {
        session.manual = true;
        session.status = "No tracker configured — manual override active".to_string();
    } else if session.settings.camera_enabled {
        if let Err(e) = tracker.start() {
            eprintln!("[session] tracker start failed: {e}");
            session.set_camera_enabled(false);
        }
    }

    let mut vis = Visualizer::new()?;

    while vis.is_open() {
        let now = Instant::now();

        // 1. Window input → commands
        for input in vis.poll_input(session.manual()) {
            match input {
                HudInput::Quit => return Ok(()),

                HudInput::ToggleCamera => {
                    if tracker.is_running() {
                        tracker.stop();
                        session.set_camera_enabled(false);
                    } else {
                        match tracker.start() {
                            Ok(()) => session.set_camera_enabled(true),
                            Err(e) => {
                                eprintln!("[session] {e}");
                                session.status = e;
                            }
                        }
                    }
                }

                HudInput::EditText => {
                    print!("  Glyph text (empty = orb): ");
                    io::stdout().flush().ok();
                    let mut buf = String::new();
                    io::stdin().read_line(&mut buf).ok();
                    session.set_text(buf.trim(), Instant::now());
                }

                other => session.handle_input(other, now),
            }
        }

        // 2. Sensor status transitions
        while let Ok(status) = status_rx.try_recv() {
            session.set_sensor(status);
        }

        // 3. Per-frame logic
        session.update(&slot, now);

        // 4. Render
        vis.render(&session, now);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════
//  Tests
// ════════════════════════════════════════════════════════════════════
