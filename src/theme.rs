// SPDX-License-Identifier: MPL-2.0
//! Light/dark theme preference.
//!
//! The preference is a single boolean persisted through a [`ThemeStore`];
//! switching the active theme goes through a [`ThemeApplier`]. Screens read
//! the stored flag when they are created and the settings screen writes it
//! on an explicit save.

use crate::config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Visual theme of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    /// Fluent key naming this mode.
    pub fn i18n_key(self) -> &'static str {
        match self {
            ThemeMode::Light => "theme-light",
            ThemeMode::Dark => "theme-dark",
        }
    }
}

/// Persistence for the dark mode flag.
pub trait ThemeStore {
    /// Returns the stored flag, `false` when nothing was saved yet.
    fn load(&self) -> bool;

    /// Stores the flag; a following [`ThemeStore::load`] observes it.
    fn save(&mut self, dark: bool) -> Result<()>;
}

/// Keeps the flag in the `[general]` section of `settings.toml`.
///
/// The file is re-read on every load so that a save made elsewhere in the
/// process is always visible.
#[derive(Debug, Clone, Default)]
pub struct ConfigThemeStore {
    config_dir: Option<PathBuf>,
}

impl ConfigThemeStore {
    /// Store using the default config directory resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store rooted at an explicit config directory.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
        }
    }
}

impl ThemeStore for ConfigThemeStore {
    fn load(&self) -> bool {
        let (cfg, _warning) = config::load_with_override(self.config_dir.clone());
        cfg.general.dark_mode
    }

    /// Fails without writing when the existing file cannot be parsed.
    fn save(&mut self, dark: bool) -> Result<()> {
        let mut cfg = config::load_for_update(self.config_dir.clone())?;
        cfg.general.dark_mode = dark;
        config::save_with_override(&cfg, self.config_dir.clone())
    }
}

/// In-process store, used where nothing should touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    dark: Option<bool>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> bool {
        self.dark.unwrap_or(false)
    }

    fn save(&mut self, dark: bool) -> Result<()> {
        self.dark = Some(dark);
        Ok(())
    }
}

/// Switches the theme used by every screen.
pub trait ThemeApplier {
    fn apply(&self, mode: ThemeMode);
}

static ACTIVE_DARK: AtomicBool = AtomicBool::new(false);

// Held by tests that apply a theme through `ActiveTheme`.
#[cfg(test)]
pub(crate) static ACTIVE_THEME_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Process-wide theme switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveTheme;

impl ActiveTheme {
    pub fn current() -> ThemeMode {
        ThemeMode::from_dark_flag(ACTIVE_DARK.load(Ordering::Relaxed))
    }
}

impl ThemeApplier for ActiveTheme {
    fn apply(&self, mode: ThemeMode) {
        let previous = ACTIVE_DARK.swap(mode.is_dark(), Ordering::Relaxed);
        if previous != mode.is_dark() {
            tracing::info!(?mode, "theme switched");
        }
    }
}

/// Applies the stored preference; called when a screen is created.
pub fn apply_saved(store: &impl ThemeStore, applier: &impl ThemeApplier) -> ThemeMode {
    let mode = ThemeMode::from_dark_flag(store.load());
    applier.apply(mode);
    mode
}

/// Saves a new preference, then applies it.
///
/// The theme is applied even when persisting fails, so the user sees the
/// choice for the rest of the session; the error is still returned.
pub fn save_and_apply(
    store: &mut impl ThemeStore,
    applier: &impl ThemeApplier,
    dark: bool,
) -> Result<ThemeMode> {
    let saved = store.save(dark);
    let mode = ThemeMode::from_dark_flag(dark);
    applier.apply(mode);
    saved.map(|()| mode)
}
