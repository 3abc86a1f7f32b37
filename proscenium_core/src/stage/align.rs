// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting the design surface into the host surface.

use kurbo::{Point, Rect, Vec2};

/// How the design surface is scaled into the host surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleMode {
    /// Stretch both axes independently; the aspect ratio is not kept.
    ExactFit,
    /// Uniform scale so the whole design is visible (letterboxing).
    ShowAll,
    /// Uniform scale so the host is fully covered (cropping).
    NoBorder,
    /// No scaling.
    NoScale,
    /// Uniform scale matching the host width.
    FixedWidth,
    /// Uniform scale matching the host height.
    #[default]
    FixedHeight,
}

/// Root-node placement produced by [`compute_alignment`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    /// Root position in device pixels. The root's anchor is the design
    /// centre, so this centres the design in the host.
    pub position: Point,
    /// Root scale.
    pub scale: Vec2,
    /// Root rotation in degrees, 0 or 90.
    pub rotation: f64,
    /// Part of the design surface that is visible, in design units.
    pub view_rect: Rect,
}

/// Computes the root placement for a host of `host` CSS pixels.
///
/// The device size is `host * dpr`. With `auto_steering`, a portrait design
/// on a landscape device (or the reverse) is rotated by 90 degrees and the
/// device axes are swapped before scaling. The centring offset is taken
/// before the swap.
#[must_use]
pub fn compute_alignment(
    design_w: f64,
    design_h: f64,
    host_w: f64,
    host_h: f64,
    dpr: f64,
    mode: ScaleMode,
    auto_steering: bool,
) -> Alignment {
    let mut dev_w = host_w * dpr;
    let mut dev_h = host_h * dpr;
    let device_portrait = dev_h > dev_w;
    let design_portrait = design_h > design_w;
    let position = Point::new((dev_w - design_w) / 2.0, (dev_h - design_h) / 2.0);

    let rotate = auto_steering && device_portrait != design_portrait;
    if rotate {
        core::mem::swap(&mut dev_w, &mut dev_h);
    }

    let (mut sx, mut sy) = (1.0, 1.0);
    if mode != ScaleMode::NoScale && design_w > 0.0 && design_h > 0.0 {
        sx = dev_w / design_w;
        sy = dev_h / design_h;
        match mode {
            ScaleMode::NoBorder => {
                let s = sx.max(sy);
                (sx, sy) = (s, s);
            }
            ScaleMode::ShowAll => {
                let s = sx.min(sy);
                (sx, sy) = (s, s);
            }
            ScaleMode::FixedWidth => sy = sx,
            ScaleMode::FixedHeight => sx = sy,
            ScaleMode::ExactFit | ScaleMode::NoScale => {}
        }
    }

    let view_rect = if sx > 0.0 && sy > 0.0 {
        let x = (design_w - dev_w / sx) / 2.0;
        let y = (design_h - dev_h / sy) / 2.0;
        Rect::new(x, y, design_w - x, design_h - y)
    } else {
        Rect::ZERO
    };

    Alignment {
        position,
        scale: Vec2::new(sx, sy),
        rotation: if rotate { 90.0 } else { 0.0 },
        view_rect,
    }
}
