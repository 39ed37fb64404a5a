// filepath: src/config.rs
//! Configuration handling for mu-canvas
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! The BackendConfig struct holds the input scaling and render options.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

/// Largest accepted `render.font_size`
pub const MAX_FONT_SIZE: i32 = 1000;

/// Which corner clip rectangles are measured from on the host side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipOrigin {
    /// Rect coordinates are used as-is (y grows downward)
    #[default]
    TopLeft,
    /// Host scissor y grows upward; rects are flipped against the screen height
    BottomLeft,
}

/// Input translation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Wheel delta multiplier (horizontal, vertical)
    #[serde(default = "default_scroll_multiplier")]
    pub scroll_multiplier: [f32; 2],

    /// Maximum typed characters forwarded per frame; extra ones are dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_limit: Option<usize>,
}

/// Render options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Point size used for the default font
    #[serde(default = "default_font_size")]
    pub font_size: i32,

    #[serde(default)]
    pub clip_origin: ClipOrigin,
}

/// Configuration for the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

fn default_scroll_multiplier() -> [f32; 2] {
    [1.0, -30.0]
}

fn default_font_size() -> i32 {
    10
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            scroll_multiplier: default_scroll_multiplier(),
            text_limit: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            clip_origin: ClipOrigin::default(),
        }
    }
}

impl BackendConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("mu-canvas")
        } else {
            PathBuf::from(".config/mu-canvas")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from the default path, creating it if not found
    pub fn load_from_file() -> Result<Self, ConfigError> {
        Self::load_or_create(&Self::get_config_path())
    }

    /// Load configuration from `path`, writing the defaults there if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from_path(path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                // If the file doesn't exist, create it with default values
                info!("No config at {}, writing defaults", path.display());
                let default_config = Self::default();
                default_config.save_to_path(path)?;
                Ok(default_config)
            }
            other => other,
        }
    }

    /// Load and validate configuration from `path`
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::get_config_path())
    }

    /// Save configuration to `path`
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        // Create the directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Serialize and write the configuration
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Reject values the backend cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FONT_SIZE).contains(&self.render.font_size) {
            return Err(ConfigError::Invalid(format!(
                "render.font_size must be in 1..={}, got {}",
                MAX_FONT_SIZE, self.render.font_size
            )));
        }
        if self.input.scroll_multiplier.iter().any(|m| !m.is_finite()) {
            return Err(ConfigError::Invalid(
                "input.scroll_multiplier must be finite".to_string(),
            ));
        }
        if self.input.text_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "input.text_limit must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_toolkit_conventions() {
        let config = BackendConfig::default();
        assert_eq!(config.input.scroll_multiplier, [1.0, -30.0]);
        assert_eq!(config.input.text_limit, None);
        assert_eq!(config.render.font_size, 10);
        assert_eq!(config.render.clip_origin, ClipOrigin::TopLeft);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: BackendConfig = toml::from_str(
            r#"
            [render]
            clip_origin = "bottom_left"
            "#,
        )
        .unwrap();
        assert_eq!(config.render.clip_origin, ClipOrigin::BottomLeft);
        assert_eq!(config.render.font_size, 10);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn load_or_create_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = BackendConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, BackendConfig::default());

        let mut edited = created.clone();
        edited.input.text_limit = Some(16);
        edited.render.font_size = 20;
        edited.save_to_path(&path).unwrap();

        assert_eq!(BackendConfig::load_or_create(&path).unwrap(), edited);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render]\nfont_size = 0\n").unwrap();
        assert!(matches!(
            BackendConfig::load_from_path(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, "[render]\nfont_size = 100000000\n").unwrap();
        assert!(matches!(
            BackendConfig::load_from_path(&path),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = BackendConfig::default();
        config.render.font_size = MAX_FONT_SIZE;
        assert!(config.validate().is_ok());

        fs::write(&path, "[input]\ntext_limit = 0\n").unwrap();
        assert!(matches!(
            BackendConfig::load_from_path(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, "[render]\nclip_origin = \"sideways\"\n").unwrap();
        assert!(matches!(
            BackendConfig::load_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
