// SPDX-License-Identifier: MPL-2.0
//! `pocket_suite` bundles the logic behind a handful of small pocket apps:
//! a length converter, a light/dark theme preference, an animation viewer,
//! a federated sign-in flow, and a camera gallery backed by a user-chosen
//! save folder.
//!
//! Platform collaborators (identity provider, session backend, animation
//! renderer) are traits; everything else works on the local file system.

#![doc(html_root_url = "https://docs.rs/pocket_suite/0.1.0")]

pub mod animation;
pub mod app;
pub mod auth;
pub mod config;
pub mod converter;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod notice;
pub mod theme;
