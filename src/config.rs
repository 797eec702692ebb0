//! Configuration management for camswitch
//!
//! Provides loading, saving and validation of the controller options:
//! initial facing mode, capture ratio, autofocus and remember-choice
//! preferences, layout fix-up timing and snapshot encoding.

use crate::errors::CameraError;
use crate::types::{FacingMode, SnapshotFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default preference-store key for the remembered device id
pub const DEFAULT_PREFERENCE_KEY: &str = "webcam-device-id";

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Facing mode requested before any device is selected
    pub facing_mode: FacingMode,
    /// Width / height hint for acquisition and display sizing
    pub capture_ratio: f64,
    /// Request continuous focus when the host supports it
    pub autofocus: bool,
    /// Persist the selected device id between sessions
    pub remember_choice: bool,
    /// Viewport width used when the surface has no explicit width
    pub default_width: u32,
    /// Delay before the post-attach layout fix-up runs
    pub layout_delay_ms: u64,
    /// Preference-store key holding the remembered device id
    pub preference_key: String,
    /// Encoding used by `snap`
    pub snapshot_format: SnapshotFormat,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Front,
            capture_ratio: 16.0 / 9.0,
            autofocus: true,
            remember_choice: true,
            default_width: 640,
            layout_delay_ms: 100,
            preference_key: DEFAULT_PREFERENCE_KEY.to_string(),
            snapshot_format: SnapshotFormat::Png,
        }
    }
}

impl ControllerConfig {
    pub fn with_facing_mode(mut self, facing_mode: FacingMode) -> Self {
        self.facing_mode = facing_mode;
        self
    }

    pub fn with_capture_ratio(mut self, ratio: f64) -> Self {
        self.capture_ratio = ratio;
        self
    }

    pub fn with_autofocus(mut self, enabled: bool) -> Self {
        self.autofocus = enabled;
        self
    }

    pub fn with_remember_choice(mut self, enabled: bool) -> Self {
        self.remember_choice = enabled;
        self
    }

    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            CameraError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: ControllerConfig = toml::from_str(&contents).map_err(|e| {
            CameraError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate().map_err(CameraError::Configuration)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::Configuration(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            CameraError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, toml_string).map_err(|e| {
            CameraError::Configuration(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("camswitch.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.capture_ratio.is_finite() || self.capture_ratio <= 0.0 {
            return Err("Capture ratio must be a positive number".to_string());
        }
        if self.default_width == 0 {
            return Err("Default width must be greater than zero".to_string());
        }
        if self.preference_key.is_empty() {
            return Err("Preference key must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.facing_mode, FacingMode::Front);
        assert!((config.capture_ratio - 16.0 / 9.0).abs() < f64::EPSILON);
        assert!(config.autofocus);
        assert!(config.remember_choice);
        assert_eq!(config.default_width, 640);
        assert_eq!(config.layout_delay_ms, 100);
    }

    #[test]
    fn test_config_validation() {
        assert!(ControllerConfig::default().validate().is_ok());

        let bad_ratio = ControllerConfig::default().with_capture_ratio(0.0);
        assert!(bad_ratio.validate().is_err());

        let nan_ratio = ControllerConfig::default().with_capture_ratio(f64::NAN);
        assert!(nan_ratio.validate().is_err());

        let mut bad_width = ControllerConfig::default();
        bad_width.default_width = 0;
        assert!(bad_width.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested").join("camswitch.toml");

        let config = ControllerConfig::default()
            .with_facing_mode(FacingMode::Rear)
            .with_capture_ratio(4.0 / 3.0)
            .with_remember_choice(false);
        assert!(config.save_to_file(&config_path).is_ok());

        let loaded = ControllerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_toml_format() {
        let toml_string = toml::to_string_pretty(&ControllerConfig::default()).unwrap();
        assert!(toml_string.contains("facing_mode = \"user\""));
        assert!(toml_string.contains("capture_ratio"));
        assert!(toml_string.contains("snapshot_format = \"png\""));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ControllerConfig = toml::from_str("facing_mode = \"environment\"").unwrap();
        assert_eq!(config.facing_mode, FacingMode::Rear);
        assert_eq!(config.preference_key, DEFAULT_PREFERENCE_KEY);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ControllerConfig::load_from_file("nonexistent_camswitch.toml");
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_width, 640);
    }
}
