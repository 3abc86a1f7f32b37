// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage configuration.

use crate::scheduler::PacerConfig;
use crate::stage::ScaleMode;

/// Configuration for a [`Stage`](crate::stage::Stage).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConfig {
    /// Design surface width in design units.
    pub design_width: f64,
    /// Design surface height in design units.
    pub design_height: f64,
    /// Requested frames per second.
    pub frame_rate: u32,
    /// Host driver ticks per second.
    pub refresh_rate: u32,
    /// How the design surface is fitted into the host.
    pub scale_mode: ScaleMode,
    /// Rotate the root by 90 degrees when design and device orientations
    /// differ.
    pub auto_steering: bool,
    /// Re-align automatically when the host reports a new size.
    pub auto_resize: bool,
    /// Device pixels per host (CSS) pixel.
    pub device_pixel_ratio: f64,
}

impl StageConfig {
    /// Handheld defaults: 30 fps, fixed height, auto-rotation on.
    #[must_use]
    pub const fn mobile(design_width: f64, design_height: f64) -> Self {
        Self {
            design_width,
            design_height,
            frame_rate: 30,
            refresh_rate: 60,
            scale_mode: ScaleMode::FixedHeight,
            auto_steering: true,
            auto_resize: false,
            device_pixel_ratio: 1.0,
        }
    }

    /// Desktop defaults: 60 fps, show-all, auto-rotation off.
    #[must_use]
    pub const fn desktop(design_width: f64, design_height: f64) -> Self {
        Self {
            design_width,
            design_height,
            frame_rate: 60,
            refresh_rate: 60,
            scale_mode: ScaleMode::ShowAll,
            auto_steering: false,
            auto_resize: false,
            device_pixel_ratio: 1.0,
        }
    }

    /// The pacing part of the configuration.
    #[must_use]
    pub const fn pacer(&self) -> PacerConfig {
        PacerConfig {
            refresh_rate: self.refresh_rate,
            frame_rate: self.frame_rate,
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::mobile(640.0, 1040.0)
    }
}
