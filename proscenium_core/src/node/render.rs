// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render walk.

use crate::geom::{bounding_box, is_zero_area};
use crate::render::{DrawNode, RenderTarget};

use super::store::Scene;

impl Scene {
    /// Draws the staged tree into `target`, back to front.
    ///
    /// Skips invisible nodes, nodes serving as masks, nodes whose composed
    /// alpha is not positive, and leaves with zero-area bounds. Runs no
    /// listeners. Returns the number of `draw` calls issued.
    pub fn render(&self, target: &mut dyn RenderTarget) -> usize {
        let mut drawn = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if !node.visible || node.mask_users > 0 || node.composed_alpha <= 0.0 {
                continue;
            }
            if let Some(container) = &node.container {
                stack.extend(container.children.iter().rev().copied());
                continue;
            }

            let bounds = node.content.local_bounds();
            if is_zero_area(bounds) {
                continue;
            }
            let clip = self
                .mask_rect(id)
                .map(|r| bounding_box(node.composed_matrix, r));
            target.draw(&DrawNode {
                id,
                name: &node.name,
                matrix: node.composed_matrix,
                alpha: node.composed_alpha,
                filters: &node.composed_filters,
                content: &node.content,
                bounds,
                clip,
            });
            drawn += 1;
        }
        drawn
    }
}
