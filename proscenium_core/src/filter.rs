// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter descriptors.
//!
//! Filters are plain data. The scene only concatenates them (ancestors first)
//! into each node's composed chain; interpreting them is up to the render
//! target.

use kurbo::Vec2;

/// A drop shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowFilter {
    /// Shadow color as `0xRRGGBBAA`.
    pub color: u32,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Offset of the shadow from the content.
    pub offset: Vec2,
}

/// A separable box blur.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurFilter {
    /// Horizontal blur radius.
    pub blur_x: f64,
    /// Vertical blur radius.
    pub blur_y: f64,
    /// Number of passes.
    pub quality: u8,
}

/// A 4x5 row-major color matrix applied to RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrixFilter(pub [f32; 20]);

impl ColorMatrixFilter {
    /// The identity color matrix.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);
}

/// One entry of a node's filter list.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Drop shadow.
    Shadow(ShadowFilter),
    /// Blur.
    Blur(BlurFilter),
    /// Color matrix.
    ColorMatrix(ColorMatrixFilter),
}

/// Returns the first shadow in a filter chain.
#[must_use]
pub fn first_shadow(filters: &[Filter]) -> Option<&ShadowFilter> {
    filters.iter().find_map(|f| match f {
        Filter::Shadow(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_shadow_skips_other_filters() {
        let chain = [
            Filter::Blur(BlurFilter {
                blur_x: 2.0,
                blur_y: 2.0,
                quality: 1,
            }),
            Filter::Shadow(ShadowFilter {
                color: 0x0000_00ff,
                blur: 4.0,
                offset: Vec2::new(2.0, 2.0),
            }),
            Filter::Shadow(ShadowFilter {
                color: 0xff00_00ff,
                blur: 1.0,
                offset: Vec2::ZERO,
            }),
        ];
        let shadow = first_shadow(&chain).expect("has a shadow");
        assert_eq!(shadow.color, 0x0000_00ff);
        assert!(first_shadow(&[Filter::ColorMatrix(ColorMatrixFilter::IDENTITY)]).is_none());
    }
}
