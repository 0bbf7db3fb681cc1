// SPDX-License-Identifier: MPL-2.0
//! Captured photos kept in a user-chosen save folder.
//!
//! - [`store::FolderStore`] owns the save-folder handle and performs every
//!   file operation scoped to it (list, copy in, delete).
//! - [`list::GalleryList`] runs folder scans on a blocking worker and applies
//!   their results to the displayed listing.
//! - [`detail::ImageDetails`] prepares the per-image detail view.

pub mod detail;
pub mod item;
pub mod list;
pub mod store;

pub use detail::{format_file_size, format_timestamp, DeleteOutcome, ImageDetails};
pub use item::{is_image_file, ImageItem};
pub use list::{GalleryList, ListingState, ListingUpdate};
pub use store::{scan_folder, FolderStore, ScanOutcome};

use crate::config::{CAPTURE_EXTENSION, CAPTURE_PREFIX};
use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Persistable reference to the directory the user granted for photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderHandle(PathBuf);

impl FolderHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Last path segment, as shown in the location label.
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }

    /// Checks that the handle still points at a readable directory.
    pub fn resolve(&self) -> Result<&Path> {
        match std::fs::metadata(&self.0) {
            Ok(meta) if meta.is_dir() => Ok(&self.0),
            Ok(_) => Err(Error::FolderInaccessible(format!(
                "{} is not a directory",
                self.0.display()
            ))),
            Err(err) => Err(Error::FolderInaccessible(format!(
                "{}: {err}",
                self.0.display()
            ))),
        }
    }
}

/// Base name for a new capture, e.g. `IMG_20240131_154502`.
pub fn capture_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{CAPTURE_PREFIX}{}", now.format("%Y%m%d_%H%M%S"))
}

/// Creates an empty, uniquely named capture file in `staging_dir`.
///
/// Several captures within the same second get a numeric suffix.
pub fn new_capture_path<Tz>(staging_dir: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    std::fs::create_dir_all(staging_dir)?;
    let base = capture_file_name(now);
    let (_, path) = store::create_unique(staging_dir, &base, CAPTURE_EXTENSION)?;
    Ok(path)
}
