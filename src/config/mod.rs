// SPDX-License-Identifier: MPL-2.0
//! User preferences stored in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and dark mode flag
//! - `[converter]` - Preselected units
//! - `[animation]` - Repeat button count and playback speed
//! - `[gallery]` - Listing order and copy buffer size
//!
//! Missing sections or keys fall back to their defaults, so an empty file is
//! a valid configuration.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set `POCKET_SUITE_CONFIG_DIR`
//! 3. Falls back to the platform config directory
//!
//! # Examples
//!
//! ```no_run
//! use pocket_suite::config;
//!
//! let (mut config, _warning) = config::load();
//! config.general.dark_mode = true;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::converter::LengthUnit;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Order of the gallery listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Name,
    ModifiedDate,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Whether the dark theme is active. Defaults to light.
    #[serde(default)]
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverterConfig {
    #[serde(default = "default_from_unit", skip_serializing_if = "Option::is_none")]
    pub default_from: Option<LengthUnit>,

    #[serde(default = "default_to_unit", skip_serializing_if = "Option::is_none")]
    pub default_to: Option<LengthUnit>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_from: default_from_unit(),
            default_to: default_to_unit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationConfig {
    /// Number of extra runs played by the repeat button.
    #[serde(
        default = "default_repeat_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_count: Option<u32>,

    /// Playback speed multiplier applied when a viewer opens.
    #[serde(default = "default_speed", skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            repeat_count: default_repeat_count(),
            speed: default_speed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    /// Buffer size for streaming captured photos into the save folder.
    #[serde(
        default = "default_copy_buffer_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub copy_buffer_bytes: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            sort_order: Some(SortOrder::default()),
            copy_buffer_bytes: default_copy_buffer_bytes(),
        }
    }
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl Config {
    /// Repeat count for the repeat button, bounded to the accepted range.
    pub fn repeat_count(&self) -> u32 {
        self.animation
            .repeat_count
            .unwrap_or(DEFAULT_REPEAT_COUNT)
            .min(MAX_REPEAT_COUNT)
    }

    /// Playback speed, clamped to the supported range.
    pub fn animation_speed(&self) -> f32 {
        self.animation
            .speed
            .filter(|speed| speed.is_finite())
            .unwrap_or(DEFAULT_ANIMATION_SPEED)
            .clamp(MIN_ANIMATION_SPEED, MAX_ANIMATION_SPEED)
    }

    /// Copy buffer size, clamped to the supported range.
    pub fn copy_buffer_bytes(&self) -> usize {
        self.gallery
            .copy_buffer_bytes
            .unwrap_or(DEFAULT_COPY_BUFFER_BYTES)
            .clamp(MIN_COPY_BUFFER_BYTES, MAX_COPY_BUFFER_BYTES)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.gallery.sort_order.unwrap_or_default()
    }

    /// Units preselected in the converter, as (from, to).
    pub fn default_units(&self) -> (LengthUnit, LengthUnit) {
        (
            self.converter.default_from.unwrap_or(DEFAULT_FROM_UNIT),
            self.converter.default_to.unwrap_or(DEFAULT_TO_UNIT),
        )
    }
}

fn default_from_unit() -> Option<LengthUnit> {
    Some(DEFAULT_FROM_UNIT)
}

fn default_to_unit() -> Option<LengthUnit> {
    Some(DEFAULT_TO_UNIT)
}

fn default_repeat_count() -> Option<u32> {
    Some(DEFAULT_REPEAT_COUNT)
}

fn default_speed() -> Option<f32> {
    Some(DEFAULT_ANIMATION_SPEED)
}

fn default_copy_buffer_bytes() -> Option<usize> {
    Some(DEFAULT_COPY_BUFFER_BYTES)
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::app_config_dir_with_override(base_dir).map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). A missing file is not an
/// error; an unreadable or malformed one yields the defaults plus a warning
/// message key.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default settings");
            (
                Config::default(),
                Some("notification-config-load-error".to_string()),
            )
        }
    }
}

/// Loads the configuration that a partial save should start from.
///
/// Unlike [`load_with_override`], a file that exists but cannot be read or
/// parsed is an error, so callers never overwrite settings they could not
/// see.
pub fn load_for_update(base_dir: Option<PathBuf>) -> Result<Config> {
    match config_path_with_override(base_dir) {
        Some(path) if path.exists() => load_from_path(&path),
        _ => Ok(Config::default()),
    }
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config(
            "cannot determine the configuration directory".into(),
        )),
    }
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}
