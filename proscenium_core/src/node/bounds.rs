// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds, draw rectangles, hit-testing, and coordinate conversion.
//!
//! Bounds and draw rectangles are derived on demand from content, the
//! transform attributes, and the mask, so they are always current even for
//! nodes that have not been through an update pass yet. Pointer hit-testing
//! uses the composed matrices of the last pass, i.e. what is on screen.

use kurbo::{Point, Rect};

use crate::geom::{
    bounding_box, clip_rect, contains_inclusive, create_box, invert, is_zero_area,
    union_non_empty,
};

use super::id::NodeId;
use super::store::Scene;

impl Scene {
    /// Local-space bounds before masking.
    ///
    /// Leaves report their content rectangle. Containers report the union of
    /// their visible children's draw rectangles, ignoring zero-area ones and
    /// children that serve as masks.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Rect {
        // Post-order over (node, union so far, next child index).
        let mut stack: Vec<(NodeId, Rect, usize)> = vec![(id, Rect::ZERO, 0)];
        loop {
            let Some(&(top, acc, next)) = stack.last() else {
                return Rect::ZERO;
            };
            let node = self.node(top);
            let done = match &node.container {
                None => node.content.local_bounds(),
                Some(c) => {
                    let pending = c.children[next.min(c.children.len())..]
                        .iter()
                        .position(|&child| self.contributes_bounds(child));
                    if let Some(offset) = pending {
                        let child = c.children[next + offset];
                        if let Some(frame) = stack.last_mut() {
                            frame.2 = next + offset + 1;
                        }
                        stack.push((child, Rect::ZERO, 0));
                        continue;
                    }
                    acc
                }
            };
            stack.pop();
            let Some(parent) = stack.last_mut() else {
                return done;
            };
            parent.1 = union_non_empty(parent.1, self.footprint(top, done));
        }
    }

    /// The node's footprint in its parent's space.
    ///
    /// Bounds are clipped by the mask (if a live one is set), then mapped by
    /// the current local matrix and reduced to an axis-aligned box.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn draw_rect(&self, id: NodeId) -> Rect {
        self.footprint(id, self.bounds(id))
    }

    /// Maps already computed local `bounds` of `id` into its parent's space.
    fn footprint(&self, id: NodeId, bounds: Rect) -> Rect {
        let bounds = match self.mask_rect(id) {
            Some(clip) => clip_rect(bounds, clip),
            None => bounds,
        };
        if is_zero_area(bounds) {
            return Rect::ZERO;
        }
        bounding_box(create_box(&self.node(id).transform), bounds)
    }

    fn contributes_bounds(&self, child: NodeId) -> bool {
        self.get(child)
            .is_some_and(|n| n.visible && n.mask_users == 0)
    }

    /// The mask's footprint in this node's local space, if a live shape
    /// mask is set.
    pub(crate) fn mask_rect(&self, id: NodeId) -> Option<Rect> {
        let mask = self.get(self.node(id).mask?)?;
        let shape = mask.content.shape_rect()?;
        Some(bounding_box(create_box(&mask.transform), shape))
    }

    /// Finds the topmost node under `point` in the subtree rooted at `id`.
    ///
    /// With `is_mouse`, `point` is global and each node maps it through the
    /// inverse of its composed matrix; mouse-disabled nodes never hit.
    /// Otherwise `point` is in `id`'s local space and is mapped into each
    /// child through the child's inverse local matrix.
    ///
    /// Invisible nodes never hit, and neither do points outside a mask.
    /// Leaves hit when the point lies inside their bounds, edges inclusive.
    /// Containers try children from topmost to bottommost, and report
    /// themselves instead of the hit descendant when `mouse_children` is
    /// `false`; the outermost such container wins.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn hit_test_point(&self, id: NodeId, point: Point, is_mouse: bool) -> Option<NodeId> {
        // Panics on a stale handle before the walk starts.
        self.node(id);
        // Depth-first, topmost child popped first.
        let mut stack = vec![(id, point)];
        while let Some((cur, point)) = stack.pop() {
            let Some(node) = self.get(cur) else {
                continue;
            };
            if !node.visible || (is_mouse && !node.mouse_enabled) {
                continue;
            }
            let local = if is_mouse {
                let Some(inv) = invert(node.composed_matrix) else {
                    continue;
                };
                inv * point
            } else {
                point
            };
            if let Some(clip) = self.mask_rect(cur)
                && !contains_inclusive(clip, local)
            {
                continue;
            }

            let Some(container) = &node.container else {
                if contains_inclusive(node.content.local_bounds(), local) {
                    return Some(self.retarget(id, cur));
                }
                continue;
            };
            for &child in &container.children {
                let Some(child_node) = self.get(child) else {
                    continue;
                };
                if child_node.mask_users > 0 {
                    continue;
                }
                let child_point = if is_mouse {
                    point
                } else {
                    match invert(create_box(&child_node.transform)) {
                        Some(inv) => inv * local,
                        None => continue,
                    }
                };
                stack.push((child, child_point));
            }
        }
        None
    }

    /// Replaces `hit` by its outermost ancestor up to `top` that hides its
    /// children from the pointer.
    fn retarget(&self, top: NodeId, hit: NodeId) -> NodeId {
        let mut result = hit;
        if hit == top {
            return result;
        }
        let mut cur = self.get(hit).and_then(|n| n.parent);
        while let Some(id) = cur {
            let Some(node) = self.get(id) else {
                break;
            };
            if node.container.as_ref().is_some_and(|c| !c.mouse_children) {
                result = id;
            }
            if id == top {
                break;
            }
            cur = node.parent;
        }
        result
    }

    /// Maps a global point into the node's local space.
    ///
    /// Returns `None` if the composed matrix is singular.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn global_to_local(&self, id: NodeId, point: Point) -> Option<Point> {
        invert(self.node(id).composed_matrix).map(|inv| inv * point)
    }

    /// Maps a point in the node's local space to global space.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn local_to_global(&self, id: NodeId, point: Point) -> Point {
        self.node(id).composed_matrix * point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged_shape(scene: &mut Scene, rect: Rect) -> NodeId {
        let id = scene.create_shape(rect);
        scene.add_child(scene.root(), id).unwrap();
        id
    }

    #[test]
    fn hit_boundary_is_inclusive() {
        let mut scene = Scene::new();
        let id = staged_shape(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.update(false);
        assert_eq!(scene.hit_test_point(id, Point::new(100.0, 100.0), false), Some(id));
        assert_eq!(scene.hit_test_point(id, Point::new(100.01, 50.0), false), None);
        assert_eq!(
            scene.hit_test_point(scene.root(), Point::new(0.0, 0.0), true),
            Some(id)
        );
    }

    #[test]
    fn topmost_child_wins() {
        let mut scene = Scene::new();
        let below = staged_shape(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        let above = staged_shape(&mut scene, Rect::new(50.0, 50.0, 150.0, 150.0));
        scene.update(false);
        let root = scene.root();
        assert_eq!(scene.hit_test_point(root, Point::new(75.0, 75.0), true), Some(above));
        assert_eq!(scene.hit_test_point(root, Point::new(25.0, 25.0), true), Some(below));

        scene.set_mouse_enabled(above, false);
        assert_eq!(scene.hit_test_point(root, Point::new(75.0, 75.0), true), Some(below));
        assert_eq!(
            scene.hit_test_point(root, Point::new(75.0, 75.0), false),
            Some(above),
            "non-mouse tests ignore mouse_enabled"
        );

        scene.set_visible(below, false);
        assert_eq!(scene.hit_test_point(root, Point::new(25.0, 25.0), true), None);
    }

    #[test]
    fn mask_clips_bounds_and_hits() {
        let mut scene = Scene::new();
        let id = staged_shape(&mut scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        let mask = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.set_position(mask, Point::new(10.0, 10.0));
        scene.set_mask(id, Some(mask)).unwrap();
        scene.update(false);

        assert_eq!(scene.draw_rect(id), Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(scene.hit_test_point(id, Point::new(15.0, 15.0), false), Some(id));
        assert_eq!(scene.hit_test_point(id, Point::new(5.0, 5.0), false), None);

        scene.set_x(mask, 500.0);
        assert_eq!(scene.draw_rect(id), Rect::ZERO);
        assert_eq!(scene.width(id), 0.0);
        assert_eq!(scene.hit_test_point(id, Point::new(15.0, 15.0), false), None);

        // A destroyed mask stops clipping.
        scene.destroy(mask);
        assert_eq!(scene.draw_rect(id), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn container_bounds_union_visible_children() {
        let mut scene = Scene::new();
        let group = scene.create_container();
        let a = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let empty = scene.create_container();
        scene.add_child(group, a).unwrap();
        scene.add_child(group, b).unwrap();
        scene.add_child(group, empty).unwrap();
        scene.set_position(b, Point::new(20.0, 30.0));
        scene.set_position(empty, Point::new(-100.0, -100.0));

        assert_eq!(scene.bounds(group), Rect::new(0.0, 0.0, 30.0, 40.0));
        scene.set_visible(b, false);
        assert_eq!(scene.bounds(group), Rect::new(0.0, 0.0, 10.0, 10.0));

        scene.set_scale(group, 2.0, 2.0);
        scene.set_x(group, 5.0);
        assert_eq!(scene.draw_rect(group), Rect::new(5.0, 0.0, 25.0, 20.0));
    }

    #[test]
    fn coordinate_round_trip_and_singular_matrix() {
        let mut scene = Scene::new();
        let id = staged_shape(&mut scene, Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.set_position(id, Point::new(30.0, 40.0));
        scene.set_rotation(id, 30.0);
        scene.update(false);

        let global = scene.local_to_global(id, Point::new(3.0, 4.0));
        let back = scene.global_to_local(id, global).expect("invertible");
        let eps = 1e-9;
        assert!((back.x - 3.0).abs() < eps && (back.y - 4.0).abs() < eps, "{back:?}");

        scene.set_scale_x(id, 0.0);
        scene.update(false);
        assert!(scene.global_to_local(id, Point::new(1.0, 1.0)).is_none());
        assert_eq!(
            scene.hit_test_point(scene.root(), Point::new(30.0, 40.0), true),
            None
        );
    }

    #[test]
    fn non_mouse_hit_maps_through_child_matrices() {
        let mut scene = Scene::new();
        let group = scene.create_container();
        let leaf = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.add_child(group, leaf).unwrap();
        scene.set_position(leaf, Point::new(100.0, 0.0));
        // Detached and never updated: non-mouse tests still work.
        assert_eq!(scene.hit_test_point(group, Point::new(105.0, 5.0), false), Some(leaf));
        assert_eq!(scene.hit_test_point(group, Point::new(5.0, 5.0), false), None);
    }

    #[test]
    fn sibling_mask_does_not_widen_container() {
        let mut scene = Scene::new();
        let group = scene.create_container();
        let leaf = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mask = scene.create_shape(Rect::new(0.0, 0.0, 5.0, 5.0));
        scene.add_child(group, leaf).unwrap();
        scene.add_child(group, mask).unwrap();
        scene.set_position(mask, Point::new(200.0, 200.0));
        assert_eq!(scene.bounds(group), Rect::new(0.0, 0.0, 205.0, 205.0));

        scene.set_position(mask, Point::new(2.0, 2.0));
        scene.set_mask(leaf, Some(mask)).unwrap();
        assert_eq!(scene.bounds(group), Rect::new(2.0, 2.0, 7.0, 7.0));
        scene.set_position(mask, Point::new(200.0, 200.0));
        assert_eq!(scene.bounds(group), Rect::ZERO);
        assert_eq!(scene.width(group), 0.0);
    }

    #[test]
    fn deep_chain_bounds_and_hits() {
        const DEPTH: usize = 20_000;
        let mut scene = Scene::new();
        let leaf = scene.create_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut top = leaf;
        for _ in 0..DEPTH {
            let group = scene.create_container();
            scene.add_child(group, top).unwrap();
            top = group;
        }
        scene.add_child(scene.root(), top).unwrap();
        scene.update(false);

        assert_eq!(scene.bounds(top), Rect::new(0.0, 0.0, 10.0, 10.0));
        let root = scene.root();
        assert_eq!(scene.hit_test_point(root, Point::new(5.0, 5.0), true), Some(leaf));
        assert_eq!(scene.hit_test_point(top, Point::new(5.0, 5.0), false), Some(leaf));

        scene.set_mouse_children(top, false);
        assert_eq!(scene.hit_test_point(root, Point::new(5.0, 5.0), true), Some(top));
    }
}
