// SPDX-License-Identifier: MPL-2.0
//! Localized user-facing text.
//!
//! Notices and screen labels are Fluent message keys; [`fluent::I18n`] turns
//! them into text for the active locale.
//!
//! # Features
//!
//! - Locale detection from CLI, config, or system settings
//! - Translation files embedded at build time from `assets/i18n/`
//! - Runtime language switching
//! - Fallback to `en-US` when a key is missing in the active locale

pub mod fluent;

pub use fluent::I18n;
