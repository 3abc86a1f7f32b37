// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property getters and setters.
//!
//! Every setter compares against the stored value first; writing an equal
//! value is a no-op and marks nothing dirty. All methods panic on stale
//! handles.

use kurbo::{Affine, Point};

use crate::dirty::DirtyFlags;
use crate::error::{SceneError, SceneResult};
use crate::filter::Filter;
use crate::geom::LocalTransform;

use super::content::Content;
use super::id::NodeId;
use super::store::Scene;

impl Scene {
    // -- Transform attributes --

    /// Horizontal position in the parent's space.
    #[must_use]
    pub fn x(&self, id: NodeId) -> f64 {
        self.node(id).transform.x
    }

    /// Vertical position in the parent's space.
    #[must_use]
    pub fn y(&self, id: NodeId) -> f64 {
        self.node(id).transform.y
    }

    /// Position as a point.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        let t = &self.node(id).transform;
        Point::new(t.x, t.y)
    }

    /// Horizontal scale factor.
    #[must_use]
    pub fn scale_x(&self, id: NodeId) -> f64 {
        self.node(id).transform.scale_x
    }

    /// Vertical scale factor.
    #[must_use]
    pub fn scale_y(&self, id: NodeId) -> f64 {
        self.node(id).transform.scale_y
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self, id: NodeId) -> f64 {
        self.node(id).transform.rotation
    }

    /// Horizontal skew in degrees.
    #[must_use]
    pub fn skew_x(&self, id: NodeId) -> f64 {
        self.node(id).transform.skew_x
    }

    /// Vertical skew in degrees.
    #[must_use]
    pub fn skew_y(&self, id: NodeId) -> f64 {
        self.node(id).transform.skew_y
    }

    /// Pivot x in local space.
    #[must_use]
    pub fn anchor_x(&self, id: NodeId) -> f64 {
        self.node(id).transform.anchor_x
    }

    /// Pivot y in local space.
    #[must_use]
    pub fn anchor_y(&self, id: NodeId) -> f64 {
        self.node(id).transform.anchor_y
    }

    /// All nine transform attributes.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> LocalTransform {
        self.node(id).transform
    }

    /// Sets the horizontal position.
    pub fn set_x(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.x);
    }

    /// Sets the vertical position.
    pub fn set_y(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.y);
    }

    /// Sets both position components.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.set_x(id, position.x);
        self.set_y(id, position.y);
    }

    /// Sets the horizontal scale.
    pub fn set_scale_x(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.scale_x);
    }

    /// Sets the vertical scale.
    pub fn set_scale_y(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.scale_y);
    }

    /// Sets both scale factors.
    pub fn set_scale(&mut self, id: NodeId, scale_x: f64, scale_y: f64) {
        self.set_scale_x(id, scale_x);
        self.set_scale_y(id, scale_y);
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.rotation);
    }

    /// Sets the horizontal skew in degrees.
    pub fn set_skew_x(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.skew_x);
    }

    /// Sets the vertical skew in degrees.
    pub fn set_skew_y(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.skew_y);
    }

    /// Sets the pivot x.
    pub fn set_anchor_x(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.anchor_x);
    }

    /// Sets the pivot y.
    pub fn set_anchor_y(&mut self, id: NodeId, value: f64) {
        self.set_transform_field(id, value, |t| &mut t.anchor_y);
    }

    /// Replaces all nine transform attributes at once.
    pub fn set_transform(&mut self, id: NodeId, transform: LocalTransform) {
        let node = self.node_mut(id);
        if node.transform != transform {
            node.transform = transform;
            node.dirty |= DirtyFlags::MATRIX;
        }
    }

    // -- Appearance --

    /// Own alpha, before multiplying by ancestors.
    #[must_use]
    pub fn alpha(&self, id: NodeId) -> f64 {
        self.node(id).alpha
    }

    /// Sets the alpha.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        let node = self.node_mut(id);
        if node.alpha != alpha {
            node.alpha = alpha;
            node.dirty |= DirtyFlags::ALPHA;
        }
    }

    /// Whether the node is drawn and hit-tested.
    #[must_use]
    pub fn visible(&self, id: NodeId) -> bool {
        self.node(id).visible
    }

    /// Shows or hides the node. Hidden nodes are still updated.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let node = self.node_mut(id);
        if node.visible != visible {
            node.visible = visible;
            node.dirty |= DirtyFlags::MATRIX;
        }
    }

    /// Whether the node takes part in pointer hit-testing.
    #[must_use]
    pub fn mouse_enabled(&self, id: NodeId) -> bool {
        self.node(id).mouse_enabled
    }

    /// Enables or disables pointer hit-testing on the node.
    pub fn set_mouse_enabled(&mut self, id: NodeId, enabled: bool) {
        self.node_mut(id).mouse_enabled = enabled;
    }

    /// Whether pointer hits on descendants are reported as such (`true`) or
    /// as hits on this container (`false`). Always `false` for leaves.
    #[must_use]
    pub fn mouse_children(&self, id: NodeId) -> bool {
        self.node(id)
            .container
            .as_ref()
            .is_some_and(|c| c.mouse_children)
    }

    /// Sets the container's pointer policy. Has no effect on leaves.
    pub fn set_mouse_children(&mut self, id: NodeId, enabled: bool) {
        if let Some(c) = self.node_mut(id).container.as_mut() {
            c.mouse_children = enabled;
        }
    }

    /// Own filter list.
    #[must_use]
    pub fn filters(&self, id: NodeId) -> &[Filter] {
        &self.node(id).filters
    }

    /// Replaces the filter list.
    pub fn set_filters(&mut self, id: NodeId, filters: Vec<Filter>) {
        let node = self.node_mut(id);
        if node.filters != filters {
            node.filters = filters;
            node.dirty |= DirtyFlags::FILTERS;
        }
    }

    /// Leaf content.
    #[must_use]
    pub fn content(&self, id: NodeId) -> &Content {
        &self.node(id).content
    }

    /// Replaces the leaf content and marks it for refresh.
    pub fn set_content(&mut self, id: NodeId, content: Content) {
        let node = self.node_mut(id);
        if node.content != content {
            node.content = content;
            node.dirty |= DirtyFlags::DATA;
        }
    }

    /// Instance name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Sets the instance name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.node_mut(id).name = name.into();
    }

    // -- Mask --

    /// The node clipping this one, if any.
    #[must_use]
    pub fn mask(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).mask
    }

    /// Whether some node uses this one as its mask.
    ///
    /// Mask nodes are not drawn on their own.
    #[must_use]
    pub fn is_mask(&self, id: NodeId) -> bool {
        self.node(id).mask_users > 0
    }

    /// Sets or clears the mask.
    ///
    /// The mask is positioned in this node's local space: its shape
    /// rectangle, transformed by its own local matrix, clips this node's
    /// bounds. The mask node does not need to be in the tree.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if `mask` is stale.
    /// - [`SceneError::InvalidMask`] if `mask` is `id` itself or has no
    ///   shape content.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn set_mask(&mut self, id: NodeId, mask: Option<NodeId>) -> SceneResult<()> {
        let old = self.node(id).mask;
        if old == mask {
            return Ok(());
        }
        if let Some(m) = mask {
            let Some(node) = self.get(m) else {
                return Err(SceneError::StaleNode(m));
            };
            if m == id || node.content.shape_rect().is_none() {
                tracing::warn!(node = ?id, mask = ?m, "rejected mask without shape content");
                return Err(SceneError::InvalidMask(m));
            }
            self.node_mut(m).mask_users += 1;
        }
        if let Some(prev) = old.and_then(|m| self.get_mut(m)) {
            prev.mask_users = prev.mask_users.saturating_sub(1);
        }
        let node = self.node_mut(id);
        node.mask = mask;
        node.dirty |= DirtyFlags::MATRIX;
        Ok(())
    }

    // -- Computed properties --

    /// Local matrix as of the last update pass.
    #[must_use]
    pub fn matrix(&self, id: NodeId) -> Affine {
        self.node(id).matrix
    }

    /// Composed (local-to-global) matrix as of the last update pass.
    #[must_use]
    pub fn composed_matrix(&self, id: NodeId) -> Affine {
        self.node(id).composed_matrix
    }

    /// Product of this node's alpha and every ancestor's, as of the last
    /// update pass.
    #[must_use]
    pub fn composed_alpha(&self, id: NodeId) -> f64 {
        self.node(id).composed_alpha
    }

    /// Ancestors' filters followed by this node's, as of the last update
    /// pass.
    #[must_use]
    pub fn composed_filters(&self, id: NodeId) -> &[Filter] {
        &self.node(id).composed_filters
    }

    /// Flags still pending for the next update pass.
    #[must_use]
    pub fn dirty_flags(&self, id: NodeId) -> DirtyFlags {
        self.node(id).dirty
    }

    // -- Size --

    /// Width of the draw rectangle.
    #[must_use]
    pub fn width(&self, id: NodeId) -> f64 {
        self.draw_rect(id).width()
    }

    /// Height of the draw rectangle.
    #[must_use]
    pub fn height(&self, id: NodeId) -> f64 {
        self.draw_rect(id).height()
    }

    /// Rescales horizontally so the draw rectangle is `width` wide.
    ///
    /// Ignored when `width` or the current width is not positive.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        let current = self.width(id);
        if width > 0.0 && current > 0.0 {
            let scale = self.scale_x(id) * width / current;
            self.set_scale_x(id, scale);
        }
    }

    /// Rescales vertically so the draw rectangle is `height` tall.
    ///
    /// Ignored when `height` or the current height is not positive.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        let current = self.height(id);
        if height > 0.0 && current > 0.0 {
            let scale = self.scale_y(id) * height / current;
            self.set_scale_y(id, scale);
        }
    }

    fn set_transform_field(
        &mut self,
        id: NodeId,
        value: f64,
        field: fn(&mut LocalTransform) -> &mut f64,
    ) {
        let node = self.node_mut(id);
        let slot = field(&mut node.transform);
        if *slot != value {
            *slot = value;
            node.dirty |= DirtyFlags::MATRIX;
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Vec2};

    use super::*;
    use crate::filter::ShadowFilter;

    #[test]
    fn setting_the_same_value_marks_nothing() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        scene.update(true);
        scene.set_x(id, 0.0);
        scene.set_alpha(id, 1.0);
        scene.set_filters(id, Vec::new());
        assert_eq!(scene.dirty_flags(id), DirtyFlags::MATRIX | DirtyFlags::ALPHA);

        let staged = scene.create_container();
        scene.add_child(scene.root(), staged).unwrap();
        scene.update(false);
        assert!(scene.dirty_flags(staged).is_empty());
        scene.set_x(staged, 0.0);
        scene.set_rotation(staged, 0.0);
        scene.set_alpha(staged, 1.0);
        assert!(scene.dirty_flags(staged).is_empty(), "equal writes are no-ops");
    }

    #[test]
    fn setters_mark_the_matching_flag() {
        let mut scene = Scene::new();
        let id = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.add_child(scene.root(), id).unwrap();
        scene.update(false);

        scene.set_skew_y(id, 5.0);
        assert_eq!(scene.dirty_flags(id), DirtyFlags::MATRIX);
        scene.set_alpha(id, 0.5);
        assert_eq!(scene.dirty_flags(id), DirtyFlags::MATRIX | DirtyFlags::ALPHA);
        scene.set_filters(
            id,
            vec![Filter::Shadow(ShadowFilter {
                color: 0,
                blur: 2.0,
                offset: Vec2::ZERO,
            })],
        );
        assert!(scene.dirty_flags(id).contains(DirtyFlags::FILTERS));
        scene.set_content(id, Content::Shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        assert!(scene.dirty_flags(id).contains(DirtyFlags::DATA));
    }

    #[test]
    fn set_width_rescales_to_draw_rect() {
        let mut scene = Scene::new();
        let id = scene.create_shape(Rect::new(0.0, 0.0, 50.0, 20.0));
        scene.set_width(id, 100.0);
        scene.set_height(id, 10.0);
        let eps = 1e-9;
        assert!((scene.scale_x(id) - 2.0).abs() < eps, "scale_x");
        assert!((scene.scale_y(id) - 0.5).abs() < eps, "scale_y");
        assert!((scene.width(id) - 100.0).abs() < eps, "width");

        let empty = scene.create_container();
        scene.set_width(empty, 100.0);
        assert!((scene.scale_x(empty) - 1.0).abs() < eps, "zero-size stays put");
    }

    #[test]
    fn mask_must_be_a_shape() {
        let mut scene = Scene::new();
        let id = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let group = scene.create_container();
        let mask = scene.create_shape(Rect::new(0.0, 0.0, 5.0, 5.0));

        assert_eq!(
            scene.set_mask(id, Some(group)),
            Err(SceneError::InvalidMask(group))
        );
        assert_eq!(scene.set_mask(id, Some(id)), Err(SceneError::InvalidMask(id)));
        scene.set_mask(id, Some(mask)).unwrap();
        assert!(scene.is_mask(mask));
        scene.set_mask(id, None).unwrap();
        assert!(!scene.is_mask(mask));
    }
}
