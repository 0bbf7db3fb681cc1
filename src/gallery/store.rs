// SPDX-License-Identifier: MPL-2.0
//! File operations scoped to the save folder.
//!
//! Nothing here touches the disk before a folder handle is set: every
//! operation first asks for the handle and fails with
//! [`Error::FolderNotSet`] otherwise.

use super::detail::DeleteOutcome;
use super::item::{is_image_file, ImageItem};
use super::FolderHandle;
use crate::app::persisted_state::AppState;
use crate::config::{SortOrder, DEFAULT_COPY_BUFFER_BYTES, MIN_COPY_BUFFER_BYTES};
use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Upper bound on `name (n).ext` attempts before giving up.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Result of scanning a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The folder was readable; the list may be empty.
    Images(Vec<ImageItem>),
    /// The handle no longer resolves to a readable directory.
    Inaccessible(String),
}

/// Lists the images directly inside `folder`.
///
/// Never fails: an unreadable folder is reported as
/// [`ScanOutcome::Inaccessible`]. Entries that vanish or cannot be read while
/// scanning are skipped.
pub fn scan_folder(folder: &FolderHandle, sort_order: SortOrder) -> ScanOutcome {
    let dir = match folder.resolve() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::warn!(folder = %folder.path().display(), error = %err, "folder not accessible");
            return ScanOutcome::Inaccessible(err.to_string());
        }
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(folder = %dir.display(), error = %err, "cannot list folder");
            return ScanOutcome::Inaccessible(err.to_string());
        }
    };

    let mut images = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !is_image_file(&path) {
            continue;
        }
        // Follows symlinks, unlike DirEntry::metadata.
        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        if meta.is_file() {
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            images.push(ImageItem::new(path, meta.len(), modified));
        }
    }

    sort_images(&mut images, sort_order);
    tracing::debug!(folder = %dir.display(), count = images.len(), "folder scanned");
    ScanOutcome::Images(images)
}

fn sort_images(images: &mut [ImageItem], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Name => images.sort_by(|a, b| a.name().cmp(b.name())),
        // Newest first, ties by name.
        SortOrder::ModifiedDate => images.sort_by(|a, b| {
            b.modified()
                .cmp(&a.modified())
                .then_with(|| a.name().cmp(b.name()))
        }),
    }
}

/// Creates a new file named `stem.ext` in `dir`, or `stem (n).ext` when the
/// name is taken. Existing files are never overwritten.
pub(crate) fn create_unique(dir: &Path, stem: &str, ext: &str) -> Result<(File, PathBuf)> {
    let file_name = |suffix: Option<u32>| {
        let stem = match suffix {
            Some(n) => format!("{stem} ({n})"),
            None => stem.to_string(),
        };
        if ext.is_empty() {
            stem
        } else {
            format!("{stem}.{ext}")
        }
    };

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let suffix = (attempt > 0).then_some(attempt);
        let path = dir.join(file_name(suffix));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(Error::Io(format!(
        "no free file name for {} in {}",
        file_name(None),
        dir.display()
    )))
}

/// Byte-for-byte copy through a buffer of `buffer_bytes`.
fn stream_copy(reader: &mut impl Read, writer: &mut impl Write, buffer_bytes: usize) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_bytes.max(1)];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&buffer[..read])?;
        total += read as u64;
    }
    writer.flush()?;
    Ok(total)
}

/// Copies `source` into `folder` and removes `source` once the copy is
/// complete.
///
/// On failure the partial destination is removed and `source` is left in
/// place.
pub fn copy_into_folder(source: &Path, folder: &Path, buffer_bytes: usize) -> Result<ImageItem> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Io(format!("{} has no file name", source.display())))?;
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader = File::open(source)?;
    let (mut dest, dest_path) = create_unique(folder, &stem, &ext)?;

    if let Err(err) = stream_copy(&mut reader, &mut dest, buffer_bytes) {
        drop(dest);
        if let Err(cleanup) = fs::remove_file(&dest_path) {
            tracing::warn!(path = %dest_path.display(), error = %cleanup, "cannot remove partial copy");
        }
        tracing::warn!(source = %source.display(), error = %err, "copy into save folder failed");
        return Err(err.into());
    }
    drop(dest);
    drop(reader);

    if let Err(err) = fs::remove_file(source) {
        tracing::warn!(path = %source.display(), error = %err, "cannot remove temporary capture");
    }

    tracing::info!(path = %dest_path.display(), "capture saved");
    ImageItem::from_path(dest_path)
}

/// Owner of the save-folder handle.
#[derive(Debug, Clone)]
pub struct FolderStore {
    state: AppState,
    state_dir: Option<PathBuf>,
    copy_buffer_bytes: usize,
}

impl FolderStore {
    /// Wraps already loaded state; `state_dir` is where it is saved back.
    pub fn new(state: AppState, state_dir: Option<PathBuf>) -> Self {
        Self {
            state,
            state_dir,
            copy_buffer_bytes: DEFAULT_COPY_BUFFER_BYTES,
        }
    }

    /// Loads the persisted handle; returns a warning key if that failed.
    pub fn load(state_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let (state, warning) = AppState::load_from(state_dir.clone());
        (Self::new(state, state_dir), warning)
    }

    #[must_use]
    pub fn with_copy_buffer(mut self, bytes: usize) -> Self {
        self.copy_buffer_bytes = bytes.max(MIN_COPY_BUFFER_BYTES);
        self
    }

    pub fn folder(&self) -> Option<&FolderHandle> {
        self.state.save_folder.as_ref()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The save folder, or [`Error::FolderNotSet`].
    pub fn require_folder(&self) -> Result<&FolderHandle> {
        self.folder().ok_or(Error::FolderNotSet)
    }

    /// Records and persists a new save folder.
    ///
    /// The folder must be an existing directory. The handle is kept in
    /// memory even if persisting fails; the returned key names that warning.
    ///
    /// The handle is stored as an absolute path so that it still resolves
    /// when the process starts from another working directory.
    pub fn set_folder(&mut self, handle: FolderHandle) -> Result<Option<String>> {
        let absolute = fs::canonicalize(handle.resolve()?).map_err(|err| {
            Error::FolderInaccessible(format!("{}: {err}", handle.path().display()))
        })?;
        let handle = FolderHandle::new(absolute);
        tracing::info!(folder = %handle.path().display(), "save folder selected");
        self.state.save_folder = Some(handle);
        Ok(self.state.save_to(self.state_dir.clone()))
    }

    /// Scans the save folder on the calling thread.
    pub fn list_images(&self, sort_order: SortOrder) -> Result<ScanOutcome> {
        Ok(scan_folder(self.require_folder()?, sort_order))
    }

    /// Moves a temporary capture into the save folder.
    pub fn save_captured_file(&self, source: &Path) -> Result<ImageItem> {
        let folder = self.require_folder()?.resolve()?;
        copy_into_folder(source, folder, self.copy_buffer_bytes)
    }

    /// Deletes an image of the save folder.
    ///
    /// Only the file name of `image` is used, so the deletion always stays
    /// inside the save folder.
    pub fn remove_image(&self, image: &Path) -> Result<DeleteOutcome> {
        let folder = self.require_folder()?;
        let Some(name) = image.file_name() else {
            return Ok(DeleteOutcome::Failed(format!(
                "{} is not a file",
                image.display()
            )));
        };
        let target = folder.path().join(name);

        let outcome = match fs::remove_file(&target) {
            Ok(()) => DeleteOutcome::Deleted,
            Err(err) if err.kind() == io::ErrorKind::NotFound => DeleteOutcome::NotFound,
            Err(err) => DeleteOutcome::Failed(err.to_string()),
        };
        match &outcome {
            DeleteOutcome::Deleted => tracing::info!(path = %target.display(), "image deleted"),
            DeleteOutcome::NotFound => tracing::warn!(path = %target.display(), "image to delete not found"),
            DeleteOutcome::Failed(err) => {
                tracing::error!(path = %target.display(), error = %err, "failed to delete image")
            }
        }
        Ok(outcome)
    }

    /// `true` only when the file existed and was removed.
    pub fn delete_image(&self, image: &Path) -> bool {
        matches!(self.remove_image(image), Ok(DeleteOutcome::Deleted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, data).expect("failed to write test file");
        path
    }

    fn store_for(folder: &Path, state_dir: &Path) -> FolderStore {
        let mut store = FolderStore::new(AppState::default(), Some(state_dir.to_path_buf()));
        store
            .set_folder(FolderHandle::new(folder))
            .expect("set folder");
        store
    }

    fn names(outcome: &ScanOutcome) -> Vec<&str> {
        match outcome {
            ScanOutcome::Images(items) => items.iter().map(ImageItem::name).collect(),
            ScanOutcome::Inaccessible(err) => panic!("unexpected inaccessible folder: {err}"),
        }
    }

    #[test]
    fn scan_keeps_images_only_and_sorts_by_name() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        write_file(temp_dir.path(), "c.PNG", b"c");
        write_file(temp_dir.path(), "b.txt", b"b");
        write_file(temp_dir.path(), "a.jpg", b"a");
        fs::create_dir(temp_dir.path().join("nested.jpg")).expect("dir");

        let outcome = scan_folder(&FolderHandle::new(temp_dir.path()), SortOrder::Name);

        assert_eq!(names(&outcome), vec!["a.jpg", "c.PNG"]);
    }

    #[test]
    fn scan_is_not_recursive() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).expect("dir");
        write_file(&sub, "deep.jpg", b"x");

        let outcome = scan_folder(&FolderHandle::new(temp_dir.path()), SortOrder::Name);

        assert_eq!(outcome, ScanOutcome::Images(Vec::new()));
    }

    #[test]
    fn scan_of_missing_folder_is_inaccessible() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let outcome = scan_folder(
            &FolderHandle::new(temp_dir.path().join("missing")),
            SortOrder::Name,
        );
        assert!(matches!(outcome, ScanOutcome::Inaccessible(_)));
    }

    #[test]
    fn modified_date_order_is_newest_first() {
        let base = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000);
        let mut images = vec![
            ImageItem::new(PathBuf::from("old.jpg"), 1, base),
            ImageItem::new(PathBuf::from("new.jpg"), 1, base + std::time::Duration::from_secs(5)),
        ];
        sort_images(&mut images, SortOrder::ModifiedDate);
        assert_eq!(images[0].name(), "new.jpg");
    }

    #[test]
    fn operations_require_a_folder() {
        let store = FolderStore::new(AppState::default(), None);
        assert_eq!(store.list_images(SortOrder::Name), Err(Error::FolderNotSet));
        assert_eq!(
            store.save_captured_file(Path::new("/tmp/x.jpg")),
            Err(Error::FolderNotSet)
        );
        assert_eq!(store.remove_image(Path::new("x.jpg")), Err(Error::FolderNotSet));
        assert!(!store.delete_image(Path::new("x.jpg")));
    }

    #[test]
    fn set_folder_rejects_non_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let file = write_file(temp_dir.path(), "plain.jpg", b"x");
        let mut store = FolderStore::new(AppState::default(), Some(temp_dir.path().to_path_buf()));

        assert!(matches!(
            store.set_folder(FolderHandle::new(&file)),
            Err(Error::FolderInaccessible(_))
        ));
        assert!(store.folder().is_none());
    }

    #[test]
    fn set_folder_survives_reload() {
        let folder = tempdir().expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        store_for(folder.path(), state_dir.path());

        let (reloaded, warning) = FolderStore::load(Some(state_dir.path().to_path_buf()));

        assert!(warning.is_none());
        let expected = fs::canonicalize(folder.path()).expect("canonicalize");
        assert_eq!(reloaded.folder(), Some(&FolderHandle::new(expected)));
    }

    #[test]
    fn relative_folder_is_stored_as_absolute_path() {
        let cwd = std::env::current_dir().expect("current dir");
        let folder = tempfile::tempdir_in(&cwd).expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        let relative = PathBuf::from(".").join(folder.path().file_name().expect("dir name"));
        let mut store = FolderStore::new(AppState::default(), Some(state_dir.path().to_path_buf()));

        store.set_folder(FolderHandle::new(&relative)).expect("set folder");
        let (reloaded, _) = FolderStore::load(Some(state_dir.path().to_path_buf()));

        let stored = reloaded.folder().expect("folder persisted");
        assert!(stored.path().is_absolute());
        assert_eq!(stored.path(), fs::canonicalize(folder.path()).expect("canonicalize"));
        assert_eq!(stored.display_name(), FolderHandle::new(&relative).display_name());
    }

    #[test]
    fn captured_file_is_moved_into_folder() {
        let folder = tempdir().expect("failed to create temp dir");
        let staging = tempdir().expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        let payload: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let source = write_file(staging.path(), "IMG_20240101_120000.jpg", &payload);
        let store = store_for(folder.path(), state_dir.path());

        let item = store.save_captured_file(&source).expect("copy");

        assert_eq!(item.name(), "IMG_20240101_120000.jpg");
        assert_eq!(item.size(), payload.len() as u64);
        assert_eq!(fs::read(item.path()).expect("read"), payload);
        assert!(!source.exists());
    }

    #[test]
    fn name_conflicts_get_a_suffix() {
        let folder = tempdir().expect("failed to create temp dir");
        let staging = tempdir().expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        write_file(folder.path(), "shot.jpg", b"existing");
        let source = write_file(staging.path(), "shot.jpg", b"new");
        let store = store_for(folder.path(), state_dir.path());

        let item = store.save_captured_file(&source).expect("copy");

        assert_eq!(item.name(), "shot (1).jpg");
        assert_eq!(fs::read(folder.path().join("shot.jpg")).expect("read"), b"existing");
    }

    #[test]
    fn missing_source_fails_without_creating_files() {
        let folder = tempdir().expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        let store = store_for(folder.path(), state_dir.path());

        let result = store.save_captured_file(&folder.path().join("nope.jpg"));

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(fs::read_dir(folder.path()).expect("list").count(), 0);
    }

    #[test]
    fn delete_reports_each_outcome() {
        let folder = tempdir().expect("failed to create temp dir");
        let state_dir = tempdir().expect("failed to create temp dir");
        let image = write_file(folder.path(), "a.jpg", b"a");
        fs::create_dir(folder.path().join("dir.jpg")).expect("dir");
        let store = store_for(folder.path(), state_dir.path());

        assert_eq!(store.remove_image(&image), Ok(DeleteOutcome::Deleted));
        assert_eq!(store.remove_image(&image), Ok(DeleteOutcome::NotFound));
        assert!(matches!(
            store.remove_image(Path::new("dir.jpg")),
            Ok(DeleteOutcome::Failed(_))
        ));
        assert!(!store.delete_image(&image));
    }

    #[test]
    fn stream_copy_uses_small_buffers() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
        let mut out = Vec::new();

        let copied = stream_copy(&mut Cursor::new(&data), &mut out, 7).expect("copy");

        assert_eq!(copied, 3000);
        assert_eq!(out, data);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_copy_propagates_write_errors() {
        let result = stream_copy(&mut Cursor::new(vec![1u8; 10]), &mut FailingWriter, 4);
        assert!(result.is_err());
    }
}
