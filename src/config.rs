// src/config.rs

//! Defines the configuration structures for image surfaces.
//!
//! The configuration can be deserialized from a JSON file to tune the
//! initial display scale, the offscreen registry, and how new buffers are
//! filled. Every field has a default, so a partial (or empty) file is valid.
//!
//! The process-wide [`CONFIG`] is read once, on first use, from the file named
//! by the `IMAGE_SURFACE_CONFIG` environment variable, falling back to the
//! defaults when the variable is unset or the file cannot be read.

use crate::color::Color;
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "IMAGE_SURFACE_CONFIG";

/// Process-wide configuration, loaded lazily.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_from_env);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Display-related settings.
    pub display: DisplayConfig,
    /// Settings for the legacy offscreen handle API and buffer allocation.
    pub offscreen: OffscreenConfig,
    /// Settings for the content of freshly allocated buffers.
    pub image: ImageConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse image surface configuration")
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    fn load_from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Config::default();
        };
        match Config::load(Path::new(&path)) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Config::default()
            }
        }
    }
}

// --- Display Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial display scale factor (2.0 on a typical high-density screen).
    pub scale_factor: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { scale_factor: 1.0 }
    }
}

// --- Offscreen Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OffscreenConfig {
    /// Number of registry slots added each time the slot table is full.
    pub slot_batch: usize,
    /// Largest width or height, in pixels, a buffer may be allocated with.
    pub max_dimension_px: u32,
}

impl Default for OffscreenConfig {
    fn default() -> Self {
        OffscreenConfig {
            slot_batch: 20,
            max_dimension_px: 16384,
        }
    }
}

// --- Image Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Color every pixel of a new buffer starts with.
    pub initial_fill: Color,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            initial_fill: Color::WHITE,
        }
    }
}
