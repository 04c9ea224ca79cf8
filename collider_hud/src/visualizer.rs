//! Software-rendered particle view using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ MODE / SENSOR / FPS / PARTICLES / GESTURE    [HINTS]     │
//! │                                                           │
//! │                [particle field splats]                    │
//! │                [ENGAGING: … overlay]                      │
//! │                                                           │
//! │ status line                                               │
//! │ key legend                                                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Particles are projected through a perspective camera looking at the
//! origin and splatted additively (a bright centre plus a half-intensity
//! cross), so dense regions bloom out. The mode-change glitch inverts the
//! whole frame for its 300 ms.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use glam::{Mat4, Vec2, Vec3};
use particle_field::ModeKind;

use std::time::Instant;

use crate::session::{HudInput, ManualPose, Session};
use crate::tracker::SensorStatus;

// ════════════════════════════════════════════════════════════════════
//  Layout constants
// ════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;

const FOV_Y_DEG:  f32 = 75.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE:  f32 = 2000.0;

const BG_COLOR:   u32 = 0xFF05060A;
const STATUS_BG:  u32 = 0xFF0A1410;
const HUD_TEXT:   u32 = 0xFF77FFCC;
const HUD_DIM:    u32 = 0xFF3E7A63;
const HUD_AMBER:  u32 = 0xFFFFBB44;

const STATUS_H:   usize = 28;

// ════════════════════════════════════════════════════════════════════
//  Visualizer
// ════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
}

impl Visualizer {
    pub fn new() -> Result<Visualizer, String> {
        let mut window = Window::new(
            "Particle Collider — Gesture HUD",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Translate window state into session commands. While manual
    /// override is on, the pointer and held keys also become a pose.
    pub fn poll_input(&self, manual: bool) -> Vec<HudInput> {
        let mut out = Vec::new();
        if !self.window.is_open() {
            return out;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) {
            out.push(HudInput::Quit);
            return out;
        }
        if one_shot(Key::Left) {
            out.push(HudInput::PrevMode);
        }
        if one_shot(Key::Right) {
            out.push(HudInput::NextMode);
        }
        if one_shot(Key::Key1) {
            out.push(HudInput::SetMode(ModeKind::Dust));
        }
        if one_shot(Key::Key2) {
            out.push(HudInput::SetMode(ModeKind::Energy));
        }
        if one_shot(Key::Key3) {
            out.push(HudInput::SetMode(ModeKind::Matrix));
        }
        if one_shot(Key::Key4) {
            out.push(HudInput::SetMode(ModeKind::Stellar));
        }
        if held(Key::Up) {
            out.push(HudInput::BumpParticles(1000));
        }
        if held(Key::Down) {
            out.push(HudInput::BumpParticles(-1000));
        }
        if held(Key::Comma) {
            out.push(HudInput::BumpSensitivity(-0.1));
        }
        if held(Key::Period) {
            out.push(HudInput::BumpSensitivity(0.1));
        }
        if held(Key::K) {
            out.push(HudInput::BumpGlow(-0.25));
        }
        if held(Key::L) {
            out.push(HudInput::BumpGlow(0.25));
        }
        if one_shot(Key::H) {
            out.push(HudInput::ToggleHints);
        }
        if one_shot(Key::C) {
            out.push(HudInput::ToggleCamera);
        }
        if one_shot(Key::G) {
            out.push(HudInput::EditText);
        }
        if one_shot(Key::M) {
            out.push(HudInput::ToggleManual);
        }

        if manual {
            let (mx, my) = self
                .window
                .get_mouse_pos(MouseMode::Clamp)
                .unwrap_or((WIN_W as f32 / 2.0, WIN_H as f32 / 2.0));
            let shift = self.window.is_key_down(Key::LeftShift)
                || self.window.is_key_down(Key::RightShift);
            out.push(HudInput::Pose(ManualPose {
                center:      Vec2::new(mx / WIN_W as f32, my / WIN_H as f32),
                fist:        self.window.get_mouse_down(MouseButton::Left)
                    || self.window.is_key_down(Key::Space),
                pinch:       shift,
                two_fingers: self.window.is_key_down(Key::Tab),
            }));
        }

        out
    }

    /// Render one frame of the session.
    pub fn render(&mut self, session: &Session, now: Instant) {
        self.buf.fill(BG_COLOR);

        // ── particle pass ────────────────────────────────────────────
        let sim = session.sim();
        let camera = sim.camera();
        let view = Mat4::look_at_rh(camera, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            FOV_Y_DEG.to_radians(),
            WIN_W as f32 / WIN_H as f32,
            NEAR_PLANE,
            FAR_PLANE,
        );
        let view_proj = proj * view;
        let glow = session.settings().glow_intensity;

        let positions = sim.positions();
        let colors = sim.colors();
        let sizes = sim.sizes();
        for i in 0..sim.count() {
            let clip = view_proj * positions[i].extend(1.0);
            if clip.w <= NEAR_PLANE {
                continue;
            }
            let ndc_x = clip.x / clip.w;
            let ndc_y = clip.y / clip.w;
            if ndc_x.abs() > 1.05 || ndc_y.abs() > 1.05 {
                continue;
            }
            let sx = ((ndc_x + 1.0) * 0.5 * WIN_W as f32) as isize;
            let sy = ((1.0 - ndc_y) * 0.5 * WIN_H as f32) as isize;
            let gain = glow * (0.25 + sizes[i] * 0.12);
            self.splat(sx, sy, colors[i] * gain);
        }

        // ── overlays ─────────────────────────────────────────────────
        if session.manual() || session.sensor() == SensorStatus::Live {
            self.draw_hand_marker(session);
        }
        if session.cinematic(now) {
            self.draw_engage_overlay(session.text());
        }

        // ── HUD readouts ─────────────────────────────────────────────
        let mode_name = session.mode().name().to_uppercase();
        self.draw_label(&format!("MODE: {mode_name}"), 10, 10, HUD_TEXT);
        self.draw_label(
            &format!("SENSOR: {}", session.sensor().label()),
            10,
            18,
            HUD_TEXT,
        );
        self.draw_label(&format!("FPS: {}", session.fps()), 10, 26, HUD_TEXT);
        self.draw_label(&format!("PARTICLES: {}", sim.count()), 10, 34, HUD_TEXT);
        self.draw_label(
            &format!("GESTURE: {}", session.reading().gesture.name()),
            10,
            42,
            HUD_AMBER,
        );
        if session.manual() {
            self.draw_label("MANUAL OVERRIDE", WIN_W - 80, 10, HUD_AMBER);
        }
        if session.settings().show_hints {
            self.draw_hints();
        }

        // ── status bar ───────────────────────────────────────────────
        self.fill_rect(0, WIN_H - STATUS_H, WIN_W, STATUS_H, STATUS_BG);
        self.draw_label(&session.status, 10, WIN_H - 22, HUD_TEXT);
        self.draw_label(
            "ARROWS/1-4=MODE  UP/DOWN=COUNT  ,/.=SENS  K/L=GLOW  G=TEXT  C=CAMERA  M=MANUAL  H=HINTS  Q=QUIT",
            10,
            WIN_H - 10,
            HUD_DIM,
        );

        // ── mode-change glitch ───────────────────────────────────────
        if session.glitching(now) {
            self.invert_frame();
        }

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── overlays ─────────────────────────────────────────────────────

    /// Crosshair where the tracked (or simulated) hand centre sits.
    fn draw_hand_marker(&mut self, session: &Session) {
        let center = session.reading().center;
        let cx = (center.x * WIN_W as f32) as isize;
        let cy = (center.y * WIN_H as f32) as isize;
        let color = if session.reading().gesture == gesture_sense::Gesture::None {
            HUD_DIM
        } else {
            HUD_AMBER
        };
        for d in -6..=6isize {
            self.set_pixel(cx + d, cy, color);
            self.set_pixel(cx, cy + d, color);
        }
    }

    fn draw_engage_overlay(&mut self, text: &str) {
        let line = format!("ENGAGING: {}", text.to_uppercase());
        let w = line.chars().count() * 4;
        let x = (WIN_W.saturating_sub(w)) / 2;
        let y = WIN_H / 2 - 40;
        self.draw_border(x.saturating_sub(8), y.saturating_sub(6), w + 16, 17, HUD_TEXT);
        self.draw_label(&line, x, y, HUD_TEXT);
    }

    fn draw_hints(&mut self) {
        let x = WIN_W - 150;
        self.draw_label("GESTURE HINTS", x, 10, HUD_DIM);
        let lines = [
            "FIST       GRAVITY WELL",
            "OPEN PALM  REPULSOR",
            "PINCH      CAMERA DOLLY",
            "SWIPE      MODE SHIFT",
        ];
        for (i, line) in lines.iter().enumerate() {
            self.draw_label(line, x, 22 + i * 8, HUD_DIM);
        }
    }

    // ── primitive drawing helpers ────────────────────────────────────

    /// Additive splat: full-intensity centre, half-intensity cross.
    fn splat(&mut self, x: isize, y: isize, color: Vec3) {
        self.add_pixel(x, y, color);
        let half = color * 0.5;
        self.add_pixel(x - 1, y, half);
        self.add_pixel(x + 1, y, half);
        self.add_pixel(x, y - 1, half);
        self.add_pixel(x, y + 1, half);
    }

    fn add_pixel(&mut self, x: isize, y: isize, color: Vec3) {
        if x < 0 || y < 0 || x >= WIN_W as isize || y >= WIN_H as isize {
            return;
        }
        let idx = y as usize * WIN_W + x as usize;
        let px = self.buf[idx];
        let add = |shift: u32, channel: f32| -> u32 {
            let cur = (px >> shift) & 0xFF;
            (cur + (channel.clamp(0.0, 1.0) * 255.0) as u32).min(0xFF)
        };
        self.buf[idx] =
            0xFF00_0000 | (add(16, color.x) << 16) | (add(8, color.y) << 8) | add(0, color.z);
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && x < WIN_W as isize && y < WIN_H as isize {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn invert_frame(&mut self) {
        for px in &mut self.buf {
            *px = 0xFF00_0000 | (!*px & 0x00FF_FFFF);
        }
    }

    /// Minimal bitmap font — 3×5 characters for HUD text.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
