// SPDX-License-Identifier: MPL-2.0
use crate::config::IMAGE_EXTENSIONS;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One image found in the save folder.
///
/// Built during a scan and never modified; a refresh rebuilds every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    path: PathBuf,
    name: String,
    size: u64,
    modified: SystemTime,
}

impl ImageItem {
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            size,
            modified,
        }
    }

    /// Reads size and modification time from the file system.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let meta = std::fs::metadata(&path)?;
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(Self::new(path, meta.len(), modified))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Modification time in milliseconds since the Unix epoch.
    pub fn modified_millis(&self) -> i64 {
        self.modified
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Whether the file name carries an image extension, ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn image_extensions_match_case_insensitively() {
        for name in ["a.jpg", "b.JPEG", "c.PNG", "d.gif", "e.Bmp"] {
            assert!(is_image_file(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn other_files_are_not_images() {
        for name in ["notes.txt", "clip.mp4", "jpg", "archive.jpg.zip", ".png.bak"] {
            assert!(!is_image_file(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn from_path_reads_metadata() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("photo.jpg");
        std::fs::write(&path, b"12345").expect("write");

        let item = ImageItem::from_path(&path).expect("item");

        assert_eq!(item.name(), "photo.jpg");
        assert_eq!(item.size(), 5);
        assert!(item.modified_millis() > 0);
    }
}
