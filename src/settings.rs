//! Simulation and audio settings
//!
//! Persisted as JSON. Every field falls back to its default when missing.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics and trail/ripple tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Boundary centre (logical canvas coordinates)
    pub boundary_center: Vec2,
    /// Boundary radius
    pub boundary_radius: f32,
    /// Ball radius (must be smaller than the boundary radius)
    pub ball_radius: f32,
    /// Ball starts at the boundary centre with this velocity (pixels/tick)
    pub start_velocity: Vec2,
    /// Radius of a freshly spawned ripple
    pub ripple_start_radius: f32,
    /// Ripple radius growth per tick
    pub ripple_growth: f32,
    /// Ripple alpha decay per tick
    pub ripple_decay: f32,
    /// Hue step in degrees between consecutive bounces
    pub hue_step: u32,
    /// Keep at most this many trail points (None = unbounded)
    pub trail_limit: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boundary_center: Vec2::new(CANVAS_WIDTH as f32 / 2.0, CANVAS_HEIGHT as f32 / 2.0),
            boundary_radius: BOUNDARY_RADIUS,
            ball_radius: BALL_RADIUS,
            start_velocity: Vec2::new(BALL_START_VELOCITY.0, BALL_START_VELOCITY.1),
            ripple_start_radius: RIPPLE_START_RADIUS,
            ripple_growth: RIPPLE_GROWTH,
            ripple_decay: RIPPLE_DECAY,
            hue_step: HUE_STEP,
            trail_limit: None,
        }
    }
}

impl SimConfig {
    /// Largest distance the ball centre may reach from the boundary centre
    pub fn contact_distance(&self) -> f32 {
        self.boundary_radius - self.ball_radius
    }
}

/// Output level controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Mute all chords
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Gain applied to every chord at the sink
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimConfig,
    pub audio: AudioSettings,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canvas() {
        let config = SimConfig::default();
        assert_eq!(config.boundary_center, Vec2::new(400.0, 300.0));
        assert_eq!(config.contact_distance(), 190.0);
        assert_eq!(config.start_velocity, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "simulation": { "boundary_radius": 150.0 }, "audio": { "muted": true } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.simulation.boundary_radius, 150.0);
        assert_eq!(settings.simulation.ball_radius, BALL_RADIUS);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.master_volume, 0.8);
    }

    #[test]
    fn test_effective_volume() {
        let mut audio = AudioSettings::default();
        audio.set_master_volume(1.5);
        assert_eq!(audio.effective_volume(), 1.0);
        audio.muted = true;
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.simulation.trail_limit = Some(500);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(crate::Error::Config(_))));
    }
}
