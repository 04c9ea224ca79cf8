//! # glyph_cloud
//!
//! Target geometry for particle steering. Two generators:
//!
//! * [`generate_orb`] — `count` points spread near-uniformly over a
//!   sphere shell using the golden-angle (Fibonacci) spiral.
//! * [`sample_text`] — `count` points drawn from the silhouette of text
//!   rasterized onto an offscreen 1024×512 mask with a built-in scalable
//!   5×7 font.
//!
//! Both are plain functions returning `Vec<Vec3>`; the orb is fully
//! deterministic, text sampling is randomized (draws with replacement
//! plus a small jitter so repeated glyphs do not stack).
//!
//! ```rust
//! use glyph_cloud::{generate_orb, sample_text, DEFAULT_FONT_PX};
//!
//! let orb = generate_orb(256, 22.0);
//! assert_eq!(orb.len(), 256);
//!
//! let cloud = sample_text("HI", 500, DEFAULT_FONT_PX);
//! assert_eq!(cloud.len(), 500);
//! ```

use glam::Vec3;
use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// Raster geometry
// ════════════════════════════════════════════════════════════════════════════

/// Offscreen mask dimensions, px.
const RASTER_W: usize = 1024;
const RASTER_H: usize = 512;
/// Silhouette scan grid step, px.
const SCAN_STRIDE: usize = 4;
/// Mask opacity above this counts as inked (50% of full).
const INK_THRESHOLD: u8 = 128;
/// Raster px → world units divisor.
const WORLD_SCALE: f32 = 10.0;
/// Per-axis jitter applied to each sampled point (full width).
const SAMPLE_JITTER: f32 = 0.1;

/// Font height the application renders glyph text at.
pub const DEFAULT_FONT_PX: u32 = 60;

// ════════════════════════════════════════════════════════════════════════════
// Orb shell
// ════════════════════════════════════════════════════════════════════════════

/// Place `count` points on a sphere shell of the given radius using the
/// golden-angle spiral: for index i, `y = 1 − 2i/(count−1)`,
/// `r = √(1−y²)`, `θ = i·π(3−√5)`.
///
/// Deterministic; no two points coincide for `count > 1`. Degenerate
/// cases: `count == 0` returns an empty vec, `count == 1` a single point
/// at the +Y pole (the spiral formula is undefined there).
pub fn generate_orb(count: usize, radius: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Vec3::new(0.0, radius, 0.0)];
    }

    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - (i as f32 / (count - 1) as f32) * 2.0;
            let r = (1.0 - y * y).sqrt();
            let theta = golden * i as f32;
            Vec3::new(theta.cos() * r, y, theta.sin() * r) * radius
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Text silhouette
// ════════════════════════════════════════════════════════════════════════════

/// The 2D silhouette point set of the rasterized text: mask cells on a
/// stride-4 grid whose opacity clears the ink threshold, mapped into a
/// frame centered on the canvas, scaled down by 10, z = 0.
///
/// Empty for blank strings and for text whose characters have no glyph.
pub fn silhouette(text: &str, font_px: u32) -> Vec<Vec3> {
    let mask = rasterize(text, font_px);
    let mut points = Vec::new();
    let half_w = RASTER_W as f32 / 2.0;
    let half_h = RASTER_H as f32 / 2.0;

    let mut y = 0;
    while y < RASTER_H {
        let mut x = 0;
        while x < RASTER_W {
            if mask[y * RASTER_W + x] > INK_THRESHOLD {
                points.push(Vec3::new(
                    (x as f32 - half_w) / WORLD_SCALE,
                    (half_h - y as f32) / WORLD_SCALE,
                    0.0,
                ));
            }
            x += SCAN_STRIDE;
        }
        y += SCAN_STRIDE;
    }
    points
}

/// Draw exactly `count` samples (with replacement) from the text
/// silhouette, each jittered by ±0.05 per axis so stacked draws spread
/// into a soft volume.
///
/// An empty silhouette — blank text, or characters with no glyph — yields
/// `count` points at the origin, the defined fallback.
pub fn sample_text(text: &str, count: usize, font_px: u32) -> Vec<Vec3> {
    let sil = silhouette(text, font_px);
    if sil.is_empty() {
        return vec![Vec3::ZERO; count];
    }

    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let p = sil[rng.gen_range(0..sil.len())];
            p + Vec3::new(
                (rng.gen::<f32>() - 0.5) * SAMPLE_JITTER,
                (rng.gen::<f32>() - 0.5) * SAMPLE_JITTER,
                (rng.gen::<f32>() - 0.5) * SAMPLE_JITTER,
            )
        })
        .collect()
}

// ── rasterizer ──────────────────────────────────────────────────────────────

/// Render the upper-cased text centered on the mask. Glyph pixels scale
/// up from the 5×7 base so `font_px` approximates the final height.
/// Characters without a glyph advance the pen but leave no ink.
fn rasterize(text: &str, font_px: u32) -> Vec<u8> {
    let mut mask = vec![0u8; RASTER_W * RASTER_H];

    let scale = (font_px as usize / 7).max(1);
    let advance = 6 * scale; // 5 columns + 1 gap
    let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    if chars.is_empty() {
        return mask;
    }

    let total_w = chars.len() * advance - scale;
    let x0 = (RASTER_W as isize - total_w as isize) / 2;
    let y0 = (RASTER_H as isize - (7 * scale) as isize) / 2;

    for (ci, &ch) in chars.iter().enumerate() {
        let rows = match glyph_5x7(ch) {
            Some(r) => r,
            None => continue,
        };
        let gx = x0 + (ci * advance) as isize;
        for (ry, &bits) in rows.iter().enumerate() {
            for col in 0..5usize {
                if bits & (1 << (4 - col)) == 0 {
                    continue;
                }
                // One font pixel becomes a scale×scale block.
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = gx + (col * scale + dx) as isize;
                        let py = y0 + (ry * scale + dy) as isize;
                        if px >= 0 && py >= 0 && (px as usize) < RASTER_W && (py as usize) < RASTER_H
                        {
                            mask[py as usize * RASTER_W + px as usize] = 255;
                        }
                    }
                }
            }
        }
    }
    mask
}

// ════════════════════════════════════════════════════════════════════════════
// 5×7 bitmap font
// ════════════════════════════════════════════════════════════════════════════

/// Glyph rows for the scalable silhouette font, 5 bits per row, MSB left.
/// Unknown characters return `None` and rasterize as blank — a string of
/// them produces an empty silhouette, not a fabricated one.
fn glyph_5x7(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        _ => return None,
    };
    Some(rows)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
