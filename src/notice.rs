// SPDX-License-Identifier: MPL-2.0
//! User-facing notices and their display queue.
//!
//! A notice carries a Fluent message key plus arguments; text is resolved at
//! render time by [`crate::i18n::fluent::I18n`]. Transient notices expire on
//! their own, blocking ones stay until dismissed.

use crate::config::MAX_VISIBLE_NOTICES;
use crate::error::{Error, ErrorCategory};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

impl NoticeId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// How long a transient notice of this severity stays visible.
    pub fn display_duration(self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_secs(2),
            Severity::Warning | Severity::Error => Duration::from_millis(3500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    id: NoticeId,
    severity: Severity,
    message_key: String,
    message_args: Vec<(String, String)>,
    blocking: bool,
    created_at: Instant,
}

impl Notice {
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NoticeId::next(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            blocking: false,
            created_at: Instant::now(),
        }
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Builds the notice for a failure from its category.
    ///
    /// Only access failures block. The `detail` argument carries the raw
    /// input, path or provider status behind the failure.
    pub fn from_error(error: &Error) -> Self {
        let notice = match error.category() {
            ErrorCategory::UserInput => Notice::warning(error.i18n_key()),
            ErrorCategory::Io => Notice::warning(error.i18n_key()),
            ErrorCategory::Access => Notice::error(error.i18n_key()).blocking(),
            ErrorCategory::Identity => Notice::error(error.i18n_key()),
        };
        notice.with_arg("detail", detail_of(error))
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Marks the notice as blocking: it stays until dismissed.
    #[must_use]
    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    pub fn id(&self) -> NoticeId {
        self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Whether a transient notice has outlived its display time at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.blocking
            && now.saturating_duration_since(self.created_at) >= self.severity.display_duration()
    }
}

fn detail_of(error: &Error) -> String {
    match error {
        Error::InvalidInput(raw) | Error::UnknownUnit(raw) => raw.clone(),
        Error::FolderInaccessible(msg) | Error::Io(msg) | Error::Config(msg) => msg.clone(),
        Error::Auth(err) => err.to_string(),
        Error::EmptyInput | Error::FolderNotSet => String::new(),
    }
}

/// Visible notices (newest first) plus an overflow queue.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    visible: VecDeque<Notice>,
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.severity() {
            Severity::Warning => tracing::warn!(key = notice.message_key(), "notice"),
            Severity::Error => tracing::error!(key = notice.message_key(), "notice"),
            Severity::Success | Severity::Info => {
                tracing::debug!(key = notice.message_key(), "notice")
            }
        }

        if self.visible.len() < MAX_VISIBLE_NOTICES {
            self.visible.push_front(notice);
        } else {
            self.pending.push_back(notice);
        }
    }

    /// Removes a notice; returns `true` if it was found.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_pending();
            return true;
        }
        if let Some(pos) = self.pending.iter().position(|n| n.id() == id) {
            self.pending.remove(pos);
            return true;
        }
        false
    }

    /// Drops expired transient notices.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let before = self.visible.len();
        self.visible.retain(|n| !n.is_expired_at(now));
        if self.visible.len() < before {
            self.promote_pending();
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.visible.iter()
    }

    /// Whether a blocking notice is waiting for the user.
    pub fn has_blocking(&self) -> bool {
        self.visible
            .iter()
            .chain(self.pending.iter())
            .any(Notice::is_blocking)
    }

    pub fn len(&self) -> usize {
        self.visible.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns everything, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut all: Vec<Notice> = self.visible.drain(..).rev().collect();
        all.extend(self.pending.drain(..));
        all
    }

    fn promote_pending(&mut self) {
        while self.visible.len() < MAX_VISIBLE_NOTICES {
            match self.pending.pop_front() {
                Some(notice) => self.visible.push_front(notice),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    #[test]
    fn ids_are_unique() {
        assert_ne!(Notice::info("a").id(), Notice::info("a").id());
    }

    #[test]
    fn user_input_errors_are_transient() {
        let notice = Notice::from_error(&Error::EmptyInput);
        assert_eq!(notice.severity(), Severity::Warning);
        assert!(!notice.is_blocking());
        assert_eq!(notice.message_key(), "error-empty-input");
    }

    #[test]
    fn access_errors_block() {
        let notice = Notice::from_error(&Error::FolderInaccessible("revoked".into()));
        assert!(notice.is_blocking());
        assert_eq!(
            notice.message_args(),
            &[("detail".to_string(), "revoked".to_string())]
        );
    }

    #[test]
    fn identity_errors_carry_provider_status() {
        let err = Error::Auth(AuthError::Provider {
            code: 12501,
            message: "canceled".into(),
        });
        let notice = Notice::from_error(&err);
        assert_eq!(notice.severity(), Severity::Error);
        assert!(notice.message_args()[0].1.contains("12501"));
    }

    #[test]
    fn overflow_is_queued_and_promoted_on_dismiss() {
        let mut queue = NoticeQueue::new();
        let first = Notice::info("first");
        let first_id = first.id();
        queue.push(first);
        for i in 1..MAX_VISIBLE_NOTICES {
            queue.push(Notice::info(format!("n-{i}")));
        }
        queue.push(Notice::info("overflow"));
        assert_eq!(queue.visible().count(), MAX_VISIBLE_NOTICES);
        assert_eq!(queue.len(), MAX_VISIBLE_NOTICES + 1);

        assert!(queue.dismiss(first_id));

        assert!(queue.visible().any(|n| n.message_key() == "overflow"));
        assert!(!queue.dismiss(first_id));
    }

    #[test]
    fn tick_expires_transient_but_not_blocking() {
        let mut queue = NoticeQueue::new();
        queue.push(Notice::info("transient"));
        queue.push(Notice::error("stuck").blocking());

        queue.tick_at(Instant::now() + Duration::from_secs(60));

        let keys: Vec<&str> = queue.visible().map(Notice::message_key).collect();
        assert_eq!(keys, vec!["stuck"]);
        assert!(queue.has_blocking());
    }

    #[test]
    fn drain_returns_oldest_first() {
        let mut queue = NoticeQueue::new();
        queue.push(Notice::info("one"));
        queue.push(Notice::info("two"));

        let keys: Vec<String> = queue
            .drain()
            .into_iter()
            .map(|n| n.message_key().to_string())
            .collect();

        assert_eq!(keys, vec!["one", "two"]);
        assert!(queue.is_empty());
    }
}
