// SPDX-License-Identifier: MPL-2.0
//! Application-managed state persisted in CBOR.
//!
//! Unlike `settings.toml`, this state is not meant to be edited by hand. It
//! currently holds the save-folder handle granted by the user, so that the
//! choice survives restarts.

use super::paths;
use crate::gallery::FolderHandle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

const STATE_FILE: &str = "state.cbor";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// Folder granted for saving and browsing captured photos.
    #[serde(default)]
    pub save_folder: Option<FolderHandle>,
}

impl AppState {
    /// Loads state from the default location.
    ///
    /// Returns the state plus an optional warning message key. Failures never
    /// propagate: the default (empty) state is used instead.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path(base_dir) else {
            return (Self::default(), None);
        };
        if !path.exists() {
            return (Self::default(), None);
        }

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot open state file");
                return (
                    Self::default(),
                    Some("notification-state-read-error".to_string()),
                );
            }
        };

        match ciborium::from_reader(BufReader::new(file)) {
            Ok(state) => (state, None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot decode state file");
                (
                    Self::default(),
                    Some("notification-state-parse-error".to_string()),
                )
            }
        }
    }

    /// Saves state to the default location, returning a warning key on
    /// failure.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %err, "cannot create state directory");
                return Some("notification-state-dir-error".to_string());
            }
        }

        let file = match fs::File::create(&path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot create state file");
                return Some("notification-state-create-error".to_string());
            }
        };

        if let Err(err) = ciborium::into_writer(self, BufWriter::new(file)) {
            tracing::warn!(path = %path.display(), error = %err, "cannot encode state file");
            return Some("notification-state-write-error".to_string());
        }
        None
    }

    fn state_file_path(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::app_data_dir_with_override(base_dir).map(|dir| dir.join(STATE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_state_has_no_folder() {
        assert!(AppState::default().save_folder.is_none());
    }

    #[test]
    fn save_and_load_round_trip_keeps_folder() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let state = AppState {
            save_folder: Some(FolderHandle::new("/home/user/Pictures/Camera")),
        };

        assert!(state.save_to(Some(temp_dir.path().to_path_buf())).is_none());
        let (loaded, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));

        assert!(warning.is_none());
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_loads_default_silently() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (loaded, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));

        assert_eq!(loaded, AppState::default());
        assert!(warning.is_none());
    }

    #[test]
    fn corrupt_file_returns_parse_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(STATE_FILE), [0xff, 0x00, 0x13, 0x37])
            .expect("failed to write");

        let (loaded, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));

        assert_eq!(loaded, AppState::default());
        assert_eq!(warning.as_deref(), Some("notification-state-parse-error"));
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested = temp_dir.path().join("a").join("b");

        assert!(AppState::default().save_to(Some(nested.clone())).is_none());
        assert!(nested.join(STATE_FILE).exists());
    }
}
