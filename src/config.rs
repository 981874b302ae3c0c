//! Optional settings file.
//!
//! Every field has a default, so the file may list only what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "dataset-tagger.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thumbnail_size: u32,
    pub min_thumbnail_size: u32,
    pub max_thumbnail_size: u32,
    /// Gap between gallery frames.
    pub gallery_spacing: f32,
    pub tag_spacing: f32,
    pub tag_margin: f32,
    /// Quiet period before thumbnails are re-decoded after a resize.
    pub resize_debounce_ms: u64,
    pub window_size: [f32; 2],
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thumbnail_size: 200,
            min_thumbnail_size: 50,
            max_thumbnail_size: 2000,
            gallery_spacing: 4.0,
            tag_spacing: 4.0,
            tag_margin: 2.0,
            resize_debounce_ms: 300,
            window_size: [1600.0, 800.0],
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Thumbnail size bounds are inverted: {min} > {max}")]
    InvertedBounds { min: u32, max: u32 },
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.min_thumbnail_size > self.max_thumbnail_size {
            return Err(ConfigError::InvertedBounds {
                min: self.min_thumbnail_size,
                max: self.max_thumbnail_size,
            });
        }
        self.thumbnail_size = self
            .thumbnail_size
            .clamp(self.min_thumbnail_size, self.max_thumbnail_size);
        Ok(self)
    }
}
