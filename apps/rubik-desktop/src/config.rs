use rubik_common::FaceColor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading the viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid window size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Static viewer settings. None of them affect the scene or camera math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: FaceColor,
    /// Azimuth steps applied once at startup.
    pub initial_azimuth_steps: i32,
    /// Elevation steps applied once at startup.
    pub initial_elevation_steps: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Rubik's Cube".into(),
            width: 800,
            height: 600,
            clear_color: FaceColor::WHITE,
            initial_azimuth_steps: 6,
            initial_elevation_steps: 9,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
