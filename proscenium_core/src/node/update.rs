// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame update pass and change tracking.
//!
//! The pass walks the staged tree parent-before-child. For each node:
//!
//! 1. A *parent changed* marker (or a forced pass) sets every composition
//!    flag; the pending composition flags are consumed.
//! 2. **MATRIX** rebuilds the local matrix from the transform attributes.
//! 3. The flags the parent applied in this pass are inherited.
//! 4. Matrix, alpha and filters are recomposed for each applied flag:
//!    `composed = parent.composed * local`, `alpha * parent.alpha`, and
//!    `parent.filters ++ filters`.
//! 5. **DATA** on a bitmap leaf (or **FILTERS**, which a render target may
//!    bake into the texture) is reported as a content refresh and cleared.
//! 6. [`EnterFrame`](EventKind::EnterFrame) listeners run.
//! 7. Children are visited through a [`WalkCursor`](super::store::WalkCursor)
//!    so listeners can restructure the tree mid-pass. A node moved behind
//!    the cursor after its visit is not visited again in the same pass.
//!
//! Listeners that mutate properties only set pending flags; those changes are
//! picked up by the next pass.

use kurbo::Affine;

use crate::dirty::DirtyFlags;
use crate::event::{Event, EventKind};
use crate::geom::create_box;

use super::id::NodeId;
use super::store::{Scene, WalkCursor};

/// The set of changes produced by a single [`Scene::update`] call.
///
/// Render targets that keep their own retained state use these lists to
/// apply incremental updates instead of re-reading the whole tree.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose composed matrix was recomputed.
    pub matrices: Vec<NodeId>,
    /// Nodes whose composed alpha was recomputed.
    pub alphas: Vec<NodeId>,
    /// Nodes whose composed filter chain was recomputed.
    pub filters: Vec<NodeId>,
    /// Bitmap leaves whose content was refreshed.
    pub content: Vec<NodeId>,
    /// Nodes that joined the stage since the previous pass.
    pub added: Vec<NodeId>,
    /// Nodes that left the stage since the previous pass.
    pub removed: Vec<NodeId>,
    /// Number of nodes visited.
    pub visited: usize,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.matrices.clear();
        self.alphas.clear();
        self.filters.clear();
        self.content.clear();
        self.added.clear();
        self.removed.clear();
        self.visited = 0;
    }

    /// Whether nothing was recomputed, refreshed, added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
            && self.alphas.is_empty()
            && self.filters.is_empty()
            && self.content.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl Scene {
    /// Runs the update pass over the staged tree and returns what changed.
    ///
    /// With `force`, every node recomposes all properties.
    pub fn update(&mut self, force: bool) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.update_into(force, &mut changes);
        changes
    }

    /// Like [`update`](Self::update), but reuses a caller-provided buffer
    /// to avoid allocation.
    ///
    /// The walk keeps its frames on the heap, so tree depth is bounded only
    /// by memory. Each node is visited at most once per pass, even if a
    /// listener moves it behind the walk cursor.
    pub fn update_into(&mut self, force: bool, changes: &mut FrameChanges) {
        changes.clear();
        self.pass = self.pass.wrapping_add(1);

        // (container, flags applied to it, index of its cursor)
        let mut frames: Vec<(NodeId, DirtyFlags, usize)> = Vec::new();
        let root = self.root;
        if let Some(applied) = self.visit(root, DirtyFlags::empty(), force, changes) {
            self.enter(root, applied, &mut frames);
        }

        while let Some(&(parent, applied, slot)) = frames.last() {
            let next = self.cursors[slot].next;
            let Some(child) = self.child_at(parent, next) else {
                frames.pop();
                self.cursors.pop();
                continue;
            };
            self.cursors[slot].next = next + 1;
            if let Some(child_applied) = self.visit(child, applied, force, changes) {
                self.enter(child, child_applied, &mut frames);
            }
        }

        self.drain_stage_changes(&mut changes.added, &mut changes.removed);
    }

    /// Pushes a child walk for `id` if it is (still) a live container.
    fn enter(
        &mut self,
        id: NodeId,
        applied: DirtyFlags,
        frames: &mut Vec<(NodeId, DirtyFlags, usize)>,
    ) {
        if !self.get(id).is_some_and(|n| n.container.is_some()) {
            return;
        }
        self.cursors.push(WalkCursor {
            parent: id,
            next: 0,
        });
        frames.push((id, applied, self.cursors.len() - 1));
    }

    /// Updates one node and runs its frame listeners.
    ///
    /// Returns the flags its children inherit, or `None` if the handle is
    /// stale or the node was already visited in this pass.
    fn visit(
        &mut self,
        id: NodeId,
        inherited: DirtyFlags,
        force: bool,
        changes: &mut FrameChanges,
    ) -> Option<DirtyFlags> {
        let pass = self.pass;
        let node = self.get_mut(id)?;
        if node.visited_pass == pass {
            return None;
        }
        node.visited_pass = pass;
        changes.visited += 1;

        let mut applied = node.dirty & DirtyFlags::COMPOSITION;
        node.dirty.remove(DirtyFlags::COMPOSITION);
        if node.parent_changed || force {
            applied |= DirtyFlags::COMPOSITION;
            node.parent_changed = false;
        }
        if applied.contains(DirtyFlags::MATRIX) {
            node.matrix = create_box(&node.transform);
        }
        applied |= inherited;
        let parent = node.parent;

        if !applied.is_empty() {
            self.compose(id, parent, applied);
            if applied.contains(DirtyFlags::MATRIX) {
                changes.matrices.push(id);
            }
            if applied.contains(DirtyFlags::ALPHA) {
                changes.alphas.push(id);
            }
            if applied.contains(DirtyFlags::FILTERS) {
                changes.filters.push(id);
            }
        }

        let node = self.node_mut(id);
        if node.content.is_bitmap()
            && (node.dirty.contains(DirtyFlags::DATA) || applied.contains(DirtyFlags::FILTERS))
        {
            changes.content.push(id);
        }
        node.dirty.remove(DirtyFlags::DATA);

        if self.has_listener(id, EventKind::EnterFrame) {
            self.dispatch(id, &mut Event::new(EventKind::EnterFrame));
        }
        Some(applied)
    }

    /// Recomposes the properties named by `applied` from the parent's values.
    fn compose(&mut self, id: NodeId, parent: Option<NodeId>, applied: DirtyFlags) {
        let parent = parent.and_then(|p| self.get(p));
        let parent_matrix = parent.map_or(Affine::IDENTITY, |p| p.composed_matrix);
        let parent_alpha = parent.map_or(1.0, |p| p.composed_alpha);
        let mut filters = if applied.contains(DirtyFlags::FILTERS) {
            parent.map(|p| p.composed_filters.clone()).unwrap_or_default()
        } else {
            Vec::new()
        };

        let node = self.node_mut(id);
        if applied.contains(DirtyFlags::MATRIX) {
            node.composed_matrix = parent_matrix * node.matrix;
        }
        if applied.contains(DirtyFlags::ALPHA) {
            node.composed_alpha = node.alpha * parent_alpha;
        }
        if applied.contains(DirtyFlags::FILTERS) {
            filters.extend(node.filters.iter().cloned());
            node.composed_filters = filters;
        }
    }
}
