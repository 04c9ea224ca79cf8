//! Persisted HUD settings — a flat JSON blob read at startup and written
//! back on every change. Unknown or missing fields fall back to defaults
//! so old files keep loading across releases.

use std::fs;
use std::path::Path;

use particle_field::ModeKind;
use serde::{Deserialize, Serialize};

/// Default settings file, kept next to the binary's working directory.
pub const SETTINGS_FILE: &str = "collider_hud_settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sensitivity:    f32,
    pub mode:           ModeKind,
    pub camera_enabled: bool,
    pub show_hints:     bool,
    pub particle_count: usize,
    pub glow_intensity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sensitivity:    1.0,
            mode:           ModeKind::Dust,
            camera_enabled: true,
            show_hints:     true,
            particle_count: 8000,
            glow_intensity: 1.5,
        }
    }
}

impl Settings {
    /// Load from `path`. A missing file is a normal first run; a corrupt
    /// file is warned about. Both load defaults.
    pub fn load(path: &Path) -> Settings {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("[hud] settings file unreadable ({e}); using defaults");
                Settings::default()
            }
        }
    }

    /// Write to `path`. Failures are warned, never fatal — losing a
    /// settings write must not take the session down.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    eprintln!("[hud] could not save settings: {e}");
                }
            }
            Err(e) => eprintln!("[hud] could not encode settings: {e}"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════
//  Tests
// ════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("collider_hud_{}_{}.json", tag, std::process::id()))
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let path = scratch("roundtrip");
        let mut s = Settings::default();
        s.mode = ModeKind::Matrix;
        s.particle_count = 1234;
        s.sensitivity = 2.5;
        s.save(&path);
        assert_eq!(Settings::load(&path), s);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = scratch("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let path = scratch("corrupt");
        fs::write(&path, "{ this is not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch("partial");
        fs::write(&path, r#"{ "particle_count": 500, "mode": "Stellar" }"#).unwrap();
        let s = Settings::load(&path);
        assert_eq!(s.particle_count, 500);
        assert_eq!(s.mode, ModeKind::Stellar);
        assert_eq!(s.sensitivity, Settings::default().sensitivity);
        assert!(s.camera_enabled);
        let _ = fs::remove_file(&path);
    }
}
