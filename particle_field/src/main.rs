//! field_menu — settle a particle flock onto an orb or a text cloud and
//! print how it converges, frame by frame. Run with --quick for a
//! non-interactive pass over the defaults.

use std::env;
use std::io::{self, Write};

use gesture_sense::{Gesture, GestureReading};
use particle_field::{FieldSim, ModeKind};

const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn main() {
    let quick = env::args().any(|a| a == "--quick");

    println!("╔══════════════════════════════════════════╗");
    println!("║  particle_field · convergence workbench   ║");
    println!("╚══════════════════════════════════════════╝");
    println!();

    let (text, mode, count, frames, held) = if quick {
        (String::new(), ModeKind::Dust, 2000, 240, Gesture::None)
    } else {
        let text = prompt("Glyph text (empty = orb)", "");
        let mode = match prompt("Mode  1) Dust  2) Energy  3) Matrix  4) Stellar", "1").as_str() {
            "2" => ModeKind::Energy,
            "3" => ModeKind::Matrix,
            "4" => ModeKind::Stellar,
            _ => ModeKind::Dust,
        };
        let count = prompt("Particles", "2000").parse().unwrap_or(2000);
        let frames = prompt("Frames", "240").parse().unwrap_or(240);
        let held = match prompt("Held gesture  0) none  1) fist  2) palm  3) pinch", "0").as_str() {
            "1" => Gesture::Fist,
            "2" => Gesture::OpenPalm,
            "3" => Gesture::Pinch,
            _ => Gesture::None,
        };
        (text, mode, count, frames, held)
    };

    let reading = GestureReading {
        gesture: held,
        pinch_distance: if held == Gesture::Pinch { 0.5 } else { 0.0 },
        ..GestureReading::default()
    };

    let mut sim = FieldSim::new(count);
    sim.set_text(&text);

    println!();
    println!("  {} particles · {} mode · {:?} cloud", count, mode.name(), sim.cloud());
    println!();
    println!("  frame   mean speed   mean radius   camera z");
    println!("  ─────   ──────────   ───────────   ────────");

    for frame in 0..frames {
        let before: Vec<_> = sim.positions().to_vec();
        sim.step(&reading, mode, 1.0, frame as f32 * FRAME_SECONDS);

        if frame % 30 == 0 || frame + 1 == frames {
            let n = sim.count() as f32;
            let speed: f32 = sim
                .positions()
                .iter()
                .zip(&before)
                .map(|(now, was)| now.distance(*was))
                .sum::<f32>()
                / n;
            let radius: f32 = sim.positions().iter().map(|p| p.length()).sum::<f32>() / n;
            println!("  {frame:>5}   {speed:>10.3}   {radius:>11.2}   {:>8.1}", sim.camera().z);
        }
    }

    println!();
    println!("  done.");
}

fn prompt(label: &str, default: &str) -> String {
    print!("  {label} [{default}]: ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return default.to_string();
    }
    let line = line.trim();
    if line.is_empty() {
        default.to_string()
    } else {
        line.to_string()
    }
}
