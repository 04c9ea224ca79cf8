//! collider_hud — interactive entry point.

use collider_hud::session::{run, HudConfig};
use collider_hud::settings::{Settings, SETTINGS_FILE};
use particle_field::ModeKind;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║      Particle Collider — Gesture-Driven Field Visualizer     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let saved = Settings::load(&settings_path);

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: saved settings, manual override, orb cloud\n");
        HudConfig {
            settings: saved,
            settings_path,
            ..HudConfig::default()
        }
    } else {
        configure_interactively(saved, settings_path)
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively(saved: Settings, settings_path: PathBuf) -> HudConfig {
    let mut settings = saved;

    let count: usize = read_line(&format!(
        "  Particles 500–20000 (default {}): ",
        settings.particle_count
    ))
    .trim()
    .parse()
    .unwrap_or(settings.particle_count);
    settings.particle_count = count.max(500).min(20_000);

    println!("  Mode: 1=Dust  2=Energy  3=Matrix  4=Stellar");
    settings.mode = match read_line(&format!("  Choice (default {}): ", settings.mode.name()))
        .trim()
    {
        "1" => ModeKind::Dust,
        "2" => ModeKind::Energy,
        "3" => ModeKind::Matrix,
        "4" => ModeKind::Stellar,
        _ => settings.mode,
    };

    let sensitivity: f32 = read_line(&format!(
        "  Sensitivity 0.1–3.0 (default {:.1}): ",
        settings.sensitivity
    ))
    .trim()
    .parse()
    .unwrap_or(settings.sensitivity);
    settings.sensitivity = sensitivity.max(0.1).min(3.0);

    println!("  Hand tracker command — a program whose stdout is one JSON");
    println!("  landmark line per frame (empty = manual override only):");
    let tracker_command: Vec<String> = read_line("  Command: ")
        .trim()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let glyph_text = read_line("  Glyph text (empty = orb): ").trim().to_string();

    HudConfig {
        settings,
        settings_path,
        tracker_command,
        glyph_text,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
