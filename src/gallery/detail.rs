// SPDX-License-Identifier: MPL-2.0
use super::item::ImageItem;
use crate::notice::Notice;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use std::time::SystemTime;

/// Date layout of the detail view, e.g. `31/01/2024 03:45:02 PM`.
const DETAIL_DATE_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// Text fields of the detail view for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetails {
    pub name: String,
    pub path: String,
    pub size: String,
    pub date: String,
}

impl ImageDetails {
    /// Builds the fields, rendering the date in `tz`.
    pub fn from_item<Tz>(item: &ImageItem, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            name: item.name().to_string(),
            path: item.path().display().to_string(),
            size: format_file_size(item.size()),
            date: format_timestamp(item.modified(), tz),
        }
    }

    /// `(fluent key, argument name, value)` for each line, in display order.
    pub fn lines(&self) -> [(&'static str, &'static str, &str); 4] {
        [
            ("detail-name", "name", self.name.as_str()),
            ("detail-path", "path", self.path.as_str()),
            ("detail-size", "size", self.size.as_str()),
            ("detail-date", "date", self.date.as_str()),
        ]
    }
}

/// Format file size in human-readable format, with 1024-byte units.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

pub fn format_timestamp<Tz>(time: SystemTime, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::<Utc>::from(time)
        .with_timezone(tz)
        .format(DETAIL_DATE_FORMAT)
        .to_string()
}

/// What happened to a delete request from the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Failed(String),
}

impl DeleteOutcome {
    pub fn message_key(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "delete-success",
            DeleteOutcome::NotFound => "delete-not-found",
            DeleteOutcome::Failed(_) => "delete-failed",
        }
    }

    /// Whether the listing must be rescanned.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }

    pub fn to_notice(&self) -> Notice {
        match self {
            DeleteOutcome::Deleted => Notice::success(self.message_key()),
            DeleteOutcome::NotFound => Notice::warning(self.message_key()),
            DeleteOutcome::Failed(reason) => {
                Notice::error(self.message_key()).with_arg("detail", reason.clone())
            }
        }
    }
}
