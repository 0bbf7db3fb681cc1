// SPDX-License-Identifier: MPL-2.0
//! Default values for every configurable setting.
//!
//! # Categories
//!
//! - **Converter**: default unit selectors and output precision
//! - **Animation**: repeat button count and playback speed
//! - **Gallery**: copy buffer size and listing extensions
//! - **Notices**: visible queue length

use crate::converter::LengthUnit;

// ==========================================================================
// Converter Defaults
// ==========================================================================

/// Unit preselected in the "from" selector.
pub const DEFAULT_FROM_UNIT: LengthUnit = LengthUnit::Feet;

/// Unit preselected in the "to" selector.
pub const DEFAULT_TO_UNIT: LengthUnit = LengthUnit::Meters;

/// Maximum number of fractional digits printed for a converted value.
pub const MAX_FRACTION_DIGITS: usize = 5;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Repeat count applied by the repeat button.
pub const DEFAULT_REPEAT_COUNT: u32 = 3;

/// Upper bound accepted for a configured repeat count.
pub const MAX_REPEAT_COUNT: u32 = 1_000;

/// Playback speed set when an animation viewer opens.
pub const DEFAULT_ANIMATION_SPEED: f32 = 1.0;

pub const MIN_ANIMATION_SPEED: f32 = 0.1;

pub const MAX_ANIMATION_SPEED: f32 = 8.0;

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Buffer size used when streaming a captured photo into the save folder.
pub const DEFAULT_COPY_BUFFER_BYTES: usize = 1024;

pub const MIN_COPY_BUFFER_BYTES: usize = 512;

pub const MAX_COPY_BUFFER_BYTES: usize = 1024 * 1024;

/// Extensions (lowercase, without dot) listed by the gallery.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Prefix of temporary capture files.
pub const CAPTURE_PREFIX: &str = "IMG_";

/// Extension of temporary capture files.
pub const CAPTURE_EXTENSION: &str = "jpg";

// ==========================================================================
// Notice Defaults
// ==========================================================================

/// Maximum number of notices visible at once.
pub const MAX_VISIBLE_NOTICES: usize = 3;

const _: () = {
    assert!(DEFAULT_REPEAT_COUNT <= MAX_REPEAT_COUNT);
    assert!(MIN_ANIMATION_SPEED > 0.0);
    assert!(DEFAULT_ANIMATION_SPEED >= MIN_ANIMATION_SPEED);
    assert!(DEFAULT_ANIMATION_SPEED <= MAX_ANIMATION_SPEED);
    assert!(MIN_COPY_BUFFER_BYTES > 0);
    assert!(DEFAULT_COPY_BUFFER_BYTES >= MIN_COPY_BUFFER_BYTES);
    assert!(DEFAULT_COPY_BUFFER_BYTES <= MAX_COPY_BUFFER_BYTES);
    assert!(!IMAGE_EXTENSIONS.is_empty());
    assert!(MAX_VISIBLE_NOTICES > 0);
};
