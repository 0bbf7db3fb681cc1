// SPDX-License-Identifier: MPL-2.0
//! Play/pause/repeat commands for an animation renderer.
//!
//! Rendering and frame timing belong to the renderer behind
//! [`AnimationRenderer`]. The controller keeps no playback state: every
//! decision (e.g. "already playing") is taken by asking the renderer.

use crate::config::Config;
use std::fmt;
use std::str::FromStr;

/// How many additional times an animation runs after the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Times(u32),
    Infinite,
}

impl RepeatCount {
    /// Renderer wire value: `-1` means infinite.
    pub fn as_raw(self) -> i64 {
        match self {
            RepeatCount::Times(n) => i64::from(n),
            RepeatCount::Infinite => -1,
        }
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCount::Times(n) => write!(f, "{n}"),
            RepeatCount::Infinite => f.write_str("infinite"),
        }
    }
}

impl FromStr for RepeatCount {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "infinite" | "inf" | "-1" => Ok(RepeatCount::Infinite),
            other => other
                .parse::<u32>()
                .map(RepeatCount::Times)
                .map_err(|_| format!("invalid repeat count: {raw}")),
        }
    }
}

/// The rendering engine that actually plays the animation.
pub trait AnimationRenderer {
    fn is_animating(&self) -> bool;
    fn play_animation(&mut self);
    fn pause_animation(&mut self);
    fn set_repeat_count(&mut self, count: RepeatCount);
    fn set_speed(&mut self, speed: f32);
}

/// Forwards user commands to a renderer.
#[derive(Debug)]
pub struct AnimationController<R> {
    renderer: R,
}

impl<R: AnimationRenderer> AnimationController<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Prepares a viewer: configured speed, looping forever.
    pub fn open(mut renderer: R, config: &Config) -> Self {
        renderer.set_speed(config.animation_speed());
        renderer.set_repeat_count(RepeatCount::Infinite);
        Self::new(renderer)
    }

    /// Starts playback unless it is already running.
    pub fn play(&mut self) {
        if !self.renderer.is_animating() {
            self.renderer.play_animation();
        }
    }

    /// Stops playback if it is running.
    pub fn pause(&mut self) {
        if self.renderer.is_animating() {
            self.renderer.pause_animation();
        }
    }

    /// Sets the repeat count, then (re)starts playback.
    pub fn repeat(&mut self, count: RepeatCount) {
        tracing::debug!(%count, "repeat requested");
        self.renderer.set_repeat_count(count);
        self.renderer.play_animation();
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
