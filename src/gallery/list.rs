// SPDX-License-Identifier: MPL-2.0
//! The displayed gallery listing.
//!
//! Scans run on tokio's blocking pool and report back over an mpsc channel.
//! The owner of the [`GalleryList`] drains that channel on its own thread
//! (`process_pending` from a UI tick, or `next_update` from async code), so
//! the listing is only ever replaced there, in one assignment.
//!
//! Every request gets a generation number. Only the newest generation is
//! applied; a result from an older scan that finishes late is dropped.

use super::item::ImageItem;
use super::store::{scan_folder, ScanOutcome};
use super::FolderHandle;
use crate::config::SortOrder;
use crate::notice::Notice;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};

/// What the gallery screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingState {
    /// No scan has completed yet.
    #[default]
    NotLoaded,
    Images(Vec<ImageItem>),
    /// The folder is readable but holds no image.
    Empty,
    Inaccessible(String),
}

impl ListingState {
    fn from_outcome(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Images(items) if items.is_empty() => ListingState::Empty,
            ScanOutcome::Images(items) => ListingState::Images(items),
            ScanOutcome::Inaccessible(reason) => ListingState::Inaccessible(reason),
        }
    }

    pub fn items(&self) -> &[ImageItem] {
        match self {
            ListingState::Images(items) => items,
            _ => &[],
        }
    }

    /// Fluent key of the empty-state message, if one is shown.
    pub fn empty_message_key(&self) -> Option<&'static str> {
        match self {
            ListingState::Empty => Some("gallery-empty"),
            ListingState::Inaccessible(_) => Some("gallery-inaccessible"),
            ListingState::NotLoaded | ListingState::Images(_) => None,
        }
    }
}

/// Reported when a scan result has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingUpdate {
    pub generation: u64,
    /// The scan was requested after a delete.
    pub refreshed: bool,
}

impl ListingUpdate {
    pub fn refresh_notice(&self) -> Option<Notice> {
        self.refreshed.then(|| Notice::info("gallery-refreshed"))
    }
}

#[derive(Debug)]
struct ScanMessage {
    generation: u64,
    outcome: ScanOutcome,
}

#[derive(Debug)]
pub struct GalleryList {
    runtime: Handle,
    sender: mpsc::UnboundedSender<ScanMessage>,
    receiver: mpsc::UnboundedReceiver<ScanMessage>,
    generation: u64,
    applied: u64,
    refresh_requested: bool,
    state: ListingState,
    revision: watch::Sender<u64>,
}

impl GalleryList {
    /// Creates an empty listing whose scans run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (revision, _) = watch::channel(0);
        Self {
            runtime,
            sender,
            receiver,
            generation: 0,
            applied: 0,
            refresh_requested: false,
            state: ListingState::NotLoaded,
            revision,
        }
    }

    /// Starts a scan of `folder` and returns its generation.
    ///
    /// A scan still in flight keeps running, but its result will be ignored.
    pub fn request_scan(&mut self, folder: FolderHandle, sort_order: SortOrder) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let sender = self.sender.clone();

        tracing::debug!(generation, folder = %folder.path().display(), "gallery scan requested");
        self.runtime.spawn_blocking(move || {
            let outcome = scan_folder(&folder, sort_order);
            if sender.send(ScanMessage { generation, outcome }).is_err() {
                tracing::debug!(generation, "gallery closed before scan finished");
            }
        });
        generation
    }

    /// Rescans after a delete; the resulting update carries a
    /// "gallery refreshed" notice.
    pub fn refresh_after_delete(&mut self, folder: FolderHandle, sort_order: SortOrder) -> u64 {
        self.refresh_requested = true;
        self.request_scan(folder, sort_order)
    }

    /// Applies every scan result that has already arrived.
    ///
    /// Returns the last applied update, if any.
    pub fn process_pending(&mut self) -> Option<ListingUpdate> {
        let mut last = None;
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    if let Some(update) = self.apply(message) {
                        last = Some(update);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        last
    }

    /// Waits until the newest requested scan is applied.
    ///
    /// Returns `None` right away when no scan is in flight.
    pub async fn next_update(&mut self) -> Option<ListingUpdate> {
        while self.is_scanning() {
            let message = self.receiver.recv().await?;
            if let Some(update) = self.apply(message) {
                return Some(update);
            }
        }
        None
    }

    fn apply(&mut self, message: ScanMessage) -> Option<ListingUpdate> {
        if message.generation != self.generation {
            tracing::debug!(
                stale = message.generation,
                current = self.generation,
                "dropping stale gallery scan"
            );
            return None;
        }

        self.state = ListingState::from_outcome(message.outcome);
        self.applied = message.generation;
        let refreshed = std::mem::take(&mut self.refresh_requested);
        self.revision.send_replace(message.generation);
        tracing::debug!(generation = message.generation, count = self.state.items().len(), "gallery updated");

        Some(ListingUpdate {
            generation: message.generation,
            refreshed,
        })
    }

    /// Whether the newest requested scan has not been applied yet.
    pub fn is_scanning(&self) -> bool {
        self.applied < self.generation
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn items(&self) -> &[ImageItem] {
        self.state.items()
    }

    /// Observers see the generation of each applied listing.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"data").expect("failed to write test file");
    }

    #[tokio::test]
    async fn scan_result_replaces_listing() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        touch(temp_dir.path(), "a.jpg");
        touch(temp_dir.path(), "b.txt");
        let mut list = GalleryList::new(Handle::current());
        let mut observer = list.subscribe();

        let generation = list.request_scan(FolderHandle::new(temp_dir.path()), SortOrder::Name);
        assert!(list.is_scanning());
        let update = list.next_update().await.expect("update");

        assert_eq!(update.generation, generation);
        assert!(!update.refreshed);
        assert!(!list.is_scanning());
        assert_eq!(list.items().len(), 1);
        assert!(observer.has_changed().unwrap());
        assert_eq!(*observer.borrow_and_update(), generation);
    }

    #[tokio::test]
    async fn empty_and_inaccessible_folders_are_distinguished() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut list = GalleryList::new(Handle::current());

        list.request_scan(FolderHandle::new(temp_dir.path()), SortOrder::Name);
        list.next_update().await.expect("update");
        assert_eq!(list.state(), &ListingState::Empty);
        assert_eq!(list.state().empty_message_key(), Some("gallery-empty"));

        list.request_scan(FolderHandle::new(temp_dir.path().join("gone")), SortOrder::Name);
        list.next_update().await.expect("update");
        assert!(matches!(list.state(), ListingState::Inaccessible(_)));
        assert_eq!(list.state().empty_message_key(), Some("gallery-inaccessible"));
    }

    #[tokio::test]
    async fn only_latest_scan_is_applied() {
        let first = tempdir().expect("failed to create temp dir");
        let second = tempdir().expect("failed to create temp dir");
        touch(first.path(), "old.jpg");
        touch(second.path(), "new.jpg");
        let mut list = GalleryList::new(Handle::current());

        list.request_scan(FolderHandle::new(first.path()), SortOrder::Name);
        let latest = list.request_scan(FolderHandle::new(second.path()), SortOrder::Name);
        let update = list.next_update().await.expect("update");

        assert_eq!(update.generation, latest);
        assert_eq!(list.items()[0].name(), "new.jpg");

        let stale = ScanMessage {
            generation: latest - 1,
            outcome: scan_folder(&FolderHandle::new(first.path()), SortOrder::Name),
        };
        assert_eq!(list.apply(stale), None);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name(), "new.jpg");
    }

    #[tokio::test]
    async fn refresh_after_delete_announces_itself_once() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        touch(temp_dir.path(), "a.jpg");
        let mut list = GalleryList::new(Handle::current());

        list.refresh_after_delete(FolderHandle::new(temp_dir.path()), SortOrder::Name);
        let update = list.next_update().await.expect("update");
        let notice = update.refresh_notice().expect("notice");
        assert_eq!(notice.message_key(), "gallery-refreshed");

        list.request_scan(FolderHandle::new(temp_dir.path()), SortOrder::Name);
        let update = list.next_update().await.expect("update");
        assert!(update.refresh_notice().is_none());
    }

    #[tokio::test]
    async fn next_update_without_scan_returns_none() {
        let mut list = GalleryList::new(Handle::current());
        assert_eq!(list.next_update().await, None);
        assert_eq!(list.state(), &ListingState::NotLoaded);
    }
}
