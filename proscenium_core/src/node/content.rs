// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf content.

use kurbo::{Rect, Size};

use super::id::TextureId;

/// Pixel data presented by a bitmap leaf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapContent {
    /// Texture owned by the render target.
    pub texture: TextureId,
    /// Full texture width in pixels.
    pub width: f64,
    /// Full texture height in pixels.
    pub height: f64,
    /// Sub-rectangle of the texture to present, if not all of it.
    pub source_rect: Option<Rect>,
}

impl BitmapContent {
    /// Presents the whole texture.
    #[must_use]
    pub const fn new(texture: TextureId, width: f64, height: f64) -> Self {
        Self {
            texture,
            width,
            height,
            source_rect: None,
        }
    }

    /// Presents only `rect` of the texture.
    #[must_use]
    pub const fn with_source_rect(mut self, rect: Rect) -> Self {
        self.source_rect = Some(rect);
        self
    }

    /// Size of the presented region.
    #[must_use]
    pub fn presented_size(&self) -> Size {
        match self.source_rect {
            Some(r) => r.size(),
            None => Size::new(self.width, self.height),
        }
    }
}

/// What a leaf draws.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Content {
    /// Nothing; the node has zero bounds.
    #[default]
    None,
    /// A filled rectangle in local coordinates. Shapes can serve as masks.
    Shape(Rect),
    /// A texture region anchored at the local origin.
    Bitmap(BitmapContent),
}

impl Content {
    /// Local-space bounds of the content.
    #[must_use]
    pub fn local_bounds(&self) -> Rect {
        match self {
            Self::None => Rect::ZERO,
            Self::Shape(r) => r.abs(),
            Self::Bitmap(b) => Rect::from_origin_size((0.0, 0.0), b.presented_size()),
        }
    }

    /// The shape rectangle, if this is shape content.
    #[must_use]
    pub const fn shape_rect(&self) -> Option<Rect> {
        match self {
            Self::Shape(r) => Some(*r),
            _ => None,
        }
    }

    /// Whether this is bitmap content.
    #[must_use]
    pub const fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap(_))
    }
}
