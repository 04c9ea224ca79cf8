//! # collider_hud
//!
//! Gesture-controlled particle collider HUD. A hand-tracking process
//! streams landmark frames in, the `gesture_sense` classifier turns them
//! into gestures, and a `particle_field` simulation reacts in a software
//! framebuffer window.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Fist | Gravity well — collapse the flock toward the origin |
//! | Open palm | Repulsor — push every particle outward |
//! | Pinch | Camera dolly; pinch distance sets the zoom |
//! | Two fingers | Tracked pose (reserved, no field force) |
//! | Swipe left / right | Cycle the visual mode backward / forward |
//! | Hand position | Pans the camera framing |
//!
//! ## Landmark source
//!
//! The tracker runs an external process whose stdout is one JSON line per
//! video frame: `null` when no hand is visible, otherwise an array of 21
//! `[x, y]` pairs normalized to `[0, 1]`. Malformed lines degrade to "no
//! hand"; an unexpected stream end latches the tracker as aborted. With no
//! tracker configured the HUD runs in manual override.
//!
//! ## Keyboard / mouse map
//!
//! | Input | Effect |
//! |---|---|
//! | `←` / `→`, `1`–`4` | Previous / next / direct visual mode |
//! | `↑` / `↓` | Particle count ± 1000 |
//! | `,` / `.` | Sensitivity − / + 0.1 |
//! | `K` / `L` | Glow − / + 0.25 |
//! | `G` | Type new glyph text on stdin |
//! | `C` | Toggle the tracker on or off |
//! | `M` | Toggle manual override |
//! | `H` | Toggle the gesture hints panel |
//! | `Q` | Quit |
//! | mouse (manual) | Pointer = hand centre; left button/Space = fist, Shift = pinch, Tab = two fingers |

pub mod tracker;
pub mod settings;
pub mod session;
pub mod visualizer;
