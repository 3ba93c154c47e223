//! Gameplay settings
//!
//! Stored as JSON next to the game. Missing fields fall back to defaults so
//! older files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::beat::{IndicatorConfig, Tempo};
use crate::consts::{DEFAULT_BPM, DEFAULT_SEED, DEFAULT_SLIDER_SCORE};
use crate::error::{ConfigError, Result};
use crate::field::OrthoCamera;
use crate::interact::RegionConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Song tempo
    pub bpm: f32,
    /// Points per beat held on a slider
    pub slider_score: u32,
    /// Defaults for every touch target
    pub region: RegionConfig,
    /// Defaults for every slider indicator
    pub indicator: IndicatorConfig,
    pub camera: OrthoCamera,
    /// Seed for randomized sampling
    pub seed: u64,
    /// Draw region outlines and sample points
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            slider_score: DEFAULT_SLIDER_SCORE,
            region: RegionConfig::default(),
            indicator: IndicatorConfig::default(),
            camera: OrthoCamera::default(),
            seed: DEFAULT_SEED,
            debug_overlay: false,
        }
    }
}

impl Settings {
    /// Check every nested config
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        self.tempo()?;
        if self.indicator.beats == 0 {
            return Err(ConfigError::ZeroBeats);
        }
        Ok(())
    }

    pub fn tempo(&self) -> Result<Tempo> {
        Tempo::from_bpm(self.bpm)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load from `path`, or fall back to defaults if missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::Shape;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.region.density, 10);
        assert_eq!(settings.region.random_samples, 50);
        assert_eq!(settings.slider_score, DEFAULT_SLIDER_SCORE);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "bpm": 90.0, "region": { "shape": "Circular", "threshold": 0.5 } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.bpm, 90.0);
        assert_eq!(settings.region.shape, Shape::Circular);
        assert_eq!(settings.region.threshold, 0.5);
        assert_eq!(settings.region.size, 0.25);
        assert_eq!(settings.indicator, IndicatorConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let json = r#"{ "region": { "density": 0 } }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(ConfigError::InvalidDensity(0))
        ));

        let json = r#"{ "region": { "size": 0.25, "density": 100000000 } }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(ConfigError::InvalidDensity(100_000_000))
        ));

        let json = r#"{ "bpm": 0.0 }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(ConfigError::InvalidBeatLength(_))
        ));

        assert!(matches!(Settings::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "motion_rhythm_settings_{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.bpm = 140.0;
        settings.indicator.beats = 8;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/motion_rhythm.json");
        assert_eq!(settings, Settings::default());
    }
}
