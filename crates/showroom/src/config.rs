//! Viewer configuration (window, camera feel). Loaded from config.ron at
//! startup.

use serde::{Deserialize, Serialize};

/// Persistent viewer settings. Loaded from `config.ron` in the current
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowroomConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Mouse sensitivity (degrees per device unit).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Free-roam camera speed in world units per second.
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_sensitivity() -> f32 {
    0.1
}
fn default_movement_speed() -> f32 {
    5.0
}

impl Default for ShowroomConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fullscreen: false,
            sensitivity: default_sensitivity(),
            movement_speed: default_movement_speed(),
        }
    }
}

impl ShowroomConfig {
    /// Load config from `config.ron`. A missing or invalid file falls back
    /// to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: ShowroomConfig = ron::from_str("(window_width: 1920)").unwrap();
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 720);
        assert_eq!(config.sensitivity, 0.1);
    }

    #[test]
    fn round_trips_through_ron() {
        let config = ShowroomConfig {
            window_width: 800,
            window_height: 600,
            fullscreen: true,
            sensitivity: 0.25,
            movement_speed: 8.0,
        };
        let text = ron::ser::to_string_pretty(&config, Default::default()).unwrap();
        let back: ShowroomConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.window_width, 800);
        assert!(back.fullscreen);
        assert_eq!(back.movement_speed, 8.0);
    }
}
