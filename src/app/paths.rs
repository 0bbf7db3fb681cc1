// SPDX-License-Identifier: MPL-2.0
//! Where settings, state and capture staging files live.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** passed to a `_with_override()` function (tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) registered through
//!    [`init_cli_overrides`]
//! 3. **Environment variables** (`POCKET_SUITE_DATA_DIR`,
//!    `POCKET_SUITE_CONFIG_DIR`)
//! 4. **Platform default** via the `dirs` crate, with the app name appended

use std::path::PathBuf;
use std::sync::OnceLock;

const APP_NAME: &str = "PocketSuite";

/// Sub-directory of the data directory holding temporary captures.
const CAPTURE_STAGING_DIR: &str = "captures";

pub const ENV_DATA_DIR: &str = "POCKET_SUITE_DATA_DIR";

pub const ENV_CONFIG_DIR: &str = "POCKET_SUITE_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
enum DirKind {
    Data,
    Config,
}

impl DirKind {
    fn cli_override(self) -> Option<PathBuf> {
        let cell = match self {
            DirKind::Data => &CLI_DATA_DIR,
            DirKind::Config => &CLI_CONFIG_DIR,
        };
        cell.get().cloned().flatten()
    }

    fn env_var(self) -> &'static str {
        match self {
            DirKind::Data => ENV_DATA_DIR,
            DirKind::Config => ENV_CONFIG_DIR,
        }
    }

    fn platform_base(self) -> Option<PathBuf> {
        match self {
            DirKind::Data => dirs::data_dir(),
            DirKind::Config => dirs::config_dir(),
        }
    }

    fn resolve(self, override_path: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = override_path {
            return Some(path);
        }
        if let Some(path) = self.cli_override() {
            return Some(path);
        }
        match std::env::var(self.env_var()) {
            Ok(value) if !value.is_empty() => return Some(PathBuf::from(value)),
            _ => {}
        }
        self.platform_base().map(|base| base.join(APP_NAME))
    }
}

/// Registers the `--data-dir` / `--config-dir` command line values.
///
/// Only the first call has an effect; later calls are ignored and logged.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    if CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_err()
        || CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err()
    {
        tracing::warn!("directory overrides were already initialized");
    }
}

/// Directory for application-managed state (`state.cbor`).
///
/// Returns `None` only when no platform data directory exists.
pub fn app_data_dir() -> Option<PathBuf> {
    app_data_dir_with_override(None)
}

pub fn app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    DirKind::Data.resolve(override_path)
}

/// Directory for user preferences (`settings.toml`).
pub fn app_config_dir() -> Option<PathBuf> {
    app_config_dir_with_override(None)
}

pub fn app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    DirKind::Config.resolve(override_path)
}

/// Staging directory where the camera writes a photo before it is copied
/// into the user's save folder.
pub fn capture_staging_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    app_data_dir_with_override(override_path).map(|dir| dir.join(CAPTURE_STAGING_DIR))
}
