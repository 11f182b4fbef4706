//! Level tuning and preferences
//!
//! Stored as JSON next to the binary on native builds. Missing fields take
//! their defaults, so older files keep loading as options are added.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{FillConfig, MazeConfig, Result, validate_speed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maze walk tuning
    pub maze: MazeConfig,
    /// Fill puzzle tuning
    pub fill: FillConfig,
    /// Ball speed in cells per tick
    pub ball_speed: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            fill: FillConfig::default(),
            ball_speed: BALL_SPEED,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Environment variable the demo binary reads the settings path from
    pub const PATH_ENV: &'static str = "TILE_ARCADE_SETTINGS";

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Both generator configs and the ball speed must be usable
    pub fn validate(&self) -> Result<()> {
        self.maze.validate()?;
        self.fill.validate()?;
        validate_speed(self.ball_speed)?;
        Ok(())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        let settings = match Self::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Malformed settings in {}: {}", path.display(), e);
                return Self::default();
            }
        };

        if let Err(e) = settings.validate() {
            log::warn!("Rejected settings in {}: {}", path.display(), e);
            return Self::default();
        }

        log::info!("Loaded settings from {}", path.display());
        settings
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "maze": { "size": 20 }, "muted": true }"#).unwrap();
        assert_eq!(settings.maze.size, 20);
        assert_eq!(settings.maze.min_active, MIN_ACTIVE_POINTS_COUNT);
        assert_eq!(settings.fill, FillConfig::default());
        assert!(settings.muted);
    }

    #[test]
    fn test_fast_ball_rejected() {
        let settings = Settings::from_json(r#"{ "ball_speed": 2.0 }"#).unwrap();
        assert!(settings.validate().is_err());

        let path = std::env::temp_dir().join("tile_arcade_fast_ball_settings.json");
        fs::write(&path, r#"{ "ball_speed": 1.0 }"#).unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.fill.size = 8;
        settings.ball_speed = 0.25;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_falls_back() {
        let dir = std::env::temp_dir();

        let missing = dir.join("tile_arcade_missing_settings.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        let bad = dir.join("tile_arcade_bad_settings.json");
        fs::write(&bad, "{ not json").unwrap();
        assert_eq!(Settings::load(&bad), Settings::default());

        let invalid = dir.join("tile_arcade_invalid_settings.json");
        fs::write(&invalid, r#"{ "maze": { "size": 2 } }"#).unwrap();
        assert_eq!(Settings::load(&invalid), Settings::default());

        let good = dir.join("tile_arcade_good_settings.json");
        let mut settings = Settings::default();
        settings.muted = true;
        settings.save(&good).unwrap();
        assert_eq!(Settings::load(&good), settings);
    }
}
