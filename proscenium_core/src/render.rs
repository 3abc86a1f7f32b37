// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-target contract.
//!
//! The stage never rasterizes anything itself. Each render tick it calls
//! [`RenderTarget::begin`] and then walks the staged tree back to front,
//! issuing one [`RenderTarget::draw`] per visible leaf with everything the
//! target needs already composed.
//!
//! Canvas, GPU and retained native-layer targets all implement the same
//! trait; targets that keep their own retained state can additionally read
//! [`FrameChanges`](crate::node::FrameChanges) from
//! [`Stage::last_changes`](crate::stage::Stage::last_changes).

use kurbo::{Affine, Rect};

use crate::filter::{Filter, ShadowFilter, first_shadow};
use crate::node::{Content, NodeId};

/// Size of the host drawing surface in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Width in device pixels.
    pub width: f64,
    /// Height in device pixels.
    pub height: f64,
}

/// Everything a render target needs to draw one leaf.
#[derive(Clone, Copy, Debug)]
pub struct DrawNode<'a> {
    /// The leaf being drawn.
    pub id: NodeId,
    /// Instance name (for diagnostics).
    pub name: &'a str,
    /// Local-to-global matrix.
    pub matrix: Affine,
    /// Product of the alphas along the path from the root.
    pub alpha: f64,
    /// Ancestors' filters followed by the leaf's own.
    pub filters: &'a [Filter],
    /// What to draw.
    pub content: &'a Content,
    /// Local-space bounds of the content.
    pub bounds: Rect,
    /// Global-space clip rectangle derived from the leaf's mask, if any.
    pub clip: Option<Rect>,
}

impl DrawNode<'_> {
    /// The first shadow in the composed filter chain.
    #[must_use]
    pub fn shadow(&self) -> Option<&ShadowFilter> {
        first_shadow(self.filters)
    }
}

/// A drawing backend driven by the stage.
pub trait RenderTarget {
    /// Starts a frame. Typically clears the surface.
    fn begin(&mut self);

    /// Draws one leaf. Calls arrive in paint order, back to front.
    fn draw(&mut self, node: &DrawNode<'_>);

    /// The host surface changed size.
    fn resize(&mut self, viewport: Viewport);
}

/// A [`RenderTarget`] that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTarget;

impl RenderTarget for NullTarget {
    fn begin(&mut self) {}

    fn draw(&mut self, node: &DrawNode<'_>) {
        _ = node;
    }

    fn resize(&mut self, viewport: Viewport) {
        _ = viewport;
    }
}
