// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for nodes, with allocation, topology, and lifecycle.

use kurbo::{Affine, Rect};

use crate::dirty::DirtyFlags;
use crate::error::{SceneError, SceneResult};
use crate::event::{Event, EventKind};
use crate::filter::Filter;
use crate::geom::LocalTransform;

use super::content::{BitmapContent, Content};
use super::dispatch::ListenerEntry;
use super::drag::DragState;
use super::id::NodeId;

/// Child list and pointer policy of a container node.
#[derive(Clone, Debug)]
pub(crate) struct ContainerData {
    /// Children in paint order, back to front.
    pub(crate) children: Vec<NodeId>,
    /// When `false`, hits on descendants report the container instead.
    pub(crate) mouse_children: bool,
}

/// A stage join or leave not yet reported by an update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StageChange {
    None,
    Added,
    Removed,
}

/// One node's state.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) container: Option<ContainerData>,
    pub(crate) content: Content,

    // -- Relations --
    pub(crate) parent: Option<NodeId>,
    pub(crate) staged: bool,
    pub(crate) stage_change: StageChange,
    pub(crate) mask: Option<NodeId>,
    pub(crate) mask_users: u32,

    // -- Local properties (set by callers) --
    pub(crate) transform: LocalTransform,
    pub(crate) alpha: f64,
    pub(crate) visible: bool,
    pub(crate) mouse_enabled: bool,
    pub(crate) filters: Vec<Filter>,

    // -- Computed properties (written by the update pass) --
    pub(crate) matrix: Affine,
    pub(crate) composed_matrix: Affine,
    pub(crate) composed_alpha: f64,
    pub(crate) composed_filters: Vec<Filter>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyFlags,
    pub(crate) parent_changed: bool,
    /// Number of the last update pass that visited this node.
    pub(crate) visited_pass: u64,

    pub(crate) listeners: Vec<ListenerEntry>,
}

impl Node {
    fn new(container: Option<ContainerData>, content: Content) -> Self {
        Self {
            name: String::new(),
            container,
            content,
            parent: None,
            staged: false,
            stage_change: StageChange::None,
            mask: None,
            mask_users: 0,
            transform: LocalTransform::IDENTITY,
            alpha: 1.0,
            visible: true,
            mouse_enabled: true,
            filters: Vec::new(),
            matrix: Affine::IDENTITY,
            composed_matrix: Affine::IDENTITY,
            composed_alpha: 1.0,
            composed_filters: Vec::new(),
            dirty: DirtyFlags::INITIAL,
            parent_changed: true,
            visited_pass: 0,
            listeners: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}

/// Position of an in-progress child walk.
///
/// `next` is the index of the next child to visit. Topology edits on
/// `parent` shift it so that removed children are never visited and
/// children inserted before the cursor wait for the next pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WalkCursor {
    pub(crate) parent: NodeId,
    pub(crate) next: usize,
}

/// Arena holding every node of one stage.
///
/// Nodes are addressed by [`NodeId`] handles. Destroyed nodes free their slot
/// for reuse, and generation counters make old handles detectably stale.
/// Property getters and setters panic on stale handles; structural
/// operations report [`SceneError::StaleNode`] or return `false`.
///
/// The scene is created with a root container that is permanently on stage.
/// Nodes attached under the root (directly or transitively) are *staged*:
/// they take part in the update pass, rendering, and hit-testing, and they
/// receive [`AddedToStage`](EventKind::AddedToStage) and
/// [`RemovedFromStage`](EventKind::RemovedFromStage) notifications.
#[derive(Debug)]
pub struct Scene {
    // -- Allocation --
    pub(crate) slots: Vec<Slot>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) root: NodeId,

    // -- Listeners --
    pub(crate) listener_counts: [usize; EventKind::COUNT],
    pub(crate) next_listener: u64,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<NodeId>,
    pub(crate) pending_removed: Vec<NodeId>,

    // -- Walk state --
    pub(crate) cursors: Vec<WalkCursor>,
    pub(crate) pass: u64,

    // -- Drag --
    pub(crate) drag: Option<DragState>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene holding only its root container.
    #[must_use]
    pub fn new() -> Self {
        let mut root = Node::new(
            Some(ContainerData {
                children: Vec::new(),
                mouse_children: true,
            }),
            Content::None,
        );
        root.name = String::from("stage");
        root.staged = true;
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free_list: Vec::new(),
            root: NodeId {
                idx: 0,
                generation: 0,
            },
            listener_counts: [0; EventKind::COUNT],
            next_listener: 0,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            cursors: Vec::new(),
            pass: 0,
            drag: None,
        }
    }

    /// The root container. It is always on stage and cannot be destroyed.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // -- Allocation API --

    /// Creates a detached container.
    pub fn create_container(&mut self) -> NodeId {
        self.alloc(Node::new(
            Some(ContainerData {
                children: Vec::new(),
                mouse_children: true,
            }),
            Content::None,
        ))
    }

    /// Creates a detached leaf with the given content.
    pub fn create_node(&mut self, content: Content) -> NodeId {
        self.alloc(Node::new(None, content))
    }

    /// Creates a detached shape leaf covering `rect` in local coordinates.
    pub fn create_shape(&mut self, rect: Rect) -> NodeId {
        self.create_node(Content::Shape(rect))
    }

    /// Creates a detached bitmap leaf.
    pub fn create_bitmap(&mut self, bitmap: BitmapContent) -> NodeId {
        let id = self.create_node(Content::Bitmap(bitmap));
        self.node_mut(id).dirty |= DirtyFlags::DATA;
        id
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Always `false`: the root is never freed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroys a node and its whole subtree.
    ///
    /// The node is detached first (firing removal notifications if it was on
    /// stage). Every node of the subtree then loses its listeners, filters,
    /// mask reference and drag registration, and its slot is freed.
    ///
    /// Returns `false` if the handle is already stale or refers to the root.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if id == self.root {
            tracing::warn!(?id, "refusing to destroy the stage root");
            return false;
        }
        self.detach(id);
        // A removal listener may already have torn the node down.
        if self.is_alive(id) {
            self.free_subtree(id);
        }
        true
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s child list.
    ///
    /// See [`add_child_at`](Self::add_child_at).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let len = self.child_count(parent);
        self.add_child_at(parent, child, len)
    }

    /// Inserts `child` into `parent`'s child list at `index`.
    ///
    /// A child already owned by `parent` is only moved; no lifecycle
    /// notification fires and `index` is clamped to the last position. A
    /// child owned by another container is removed from it first. If
    /// `parent` is on stage, every node of the attached subtree receives
    /// [`AddedToStage`](EventKind::AddedToStage), parent first.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if either handle is stale.
    /// - [`SceneError::RootNode`] if `child` is the root.
    /// - [`SceneError::NotAContainer`] if `parent` is a leaf.
    /// - [`SceneError::Cycle`] if `child` is `parent` or one of its ancestors.
    /// - [`SceneError::IndexOutOfRange`] if `index` exceeds the child count.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> SceneResult<()> {
        self.check_attach(parent, child)?;
        let len = self.child_count(parent);
        if index > len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }

        if self.node(child).parent == Some(parent) {
            self.move_child(parent, child, index.min(len - 1));
            return Ok(());
        }

        if self.node(child).parent.is_some() {
            self.detach(child);
            // Removal listeners ran; the tree may have changed under us.
            self.check_attach(parent, child)?;
            if self.node(child).parent.is_some() {
                // A listener re-attached the child elsewhere; that wins.
                return Ok(());
            }
        }

        let index = index.min(self.child_count(parent));
        self.insert_child_raw(parent, index, child);
        let node = self.node_mut(child);
        node.parent = Some(parent);
        node.parent_changed = true;

        if self.node(parent).staged {
            self.notify_added(child);
        }
        Ok(())
    }

    /// Removes `child` from `parent`.
    ///
    /// Returns `false` (and does nothing) if `child` is not a child of
    /// `parent` or either handle is stale. If the child was on stage, every
    /// node of its subtree receives
    /// [`RemovedFromStage`](EventKind::RemovedFromStage), parent first,
    /// before the child is detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent) || self.get(child).and_then(|n| n.parent) != Some(parent) {
            return false;
        }
        self.detach(child)
    }

    /// Removes and returns the child at `index`, if any.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.child_at(parent, index)?;
        self.detach(child);
        Some(child)
    }

    /// Detaches `child` from whatever container owns it.
    ///
    /// Returns `false` if the node has no parent or the handle is stale.
    pub fn remove_from_parent(&mut self, child: NodeId) -> bool {
        if child == self.root {
            tracing::warn!("refusing to detach the stage root");
            return false;
        }
        self.detach(child)
    }

    /// Detaches every child of `parent`.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            if self.get(child).and_then(|n| n.parent) == Some(parent) {
                self.detach(child);
            }
        }
    }

    /// Moves `child` to `index` within `parent`'s child list.
    ///
    /// Returns `false` if `child` is not a child of `parent` or `index` is
    /// not a valid position.
    pub fn set_child_index(&mut self, parent: NodeId, child: NodeId, index: usize) -> bool {
        if self.get(child).and_then(|n| n.parent) != Some(parent)
            || index >= self.child_count(parent)
        {
            return false;
        }
        self.move_child(parent, child, index);
        true
    }

    /// Returns the parent of a node, or `None` if detached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node in paint order (empty for leaves).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .container
            .as_ref()
            .map_or(&[], |c| c.children.as_slice())
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.get(parent)?
            .container
            .as_ref()?
            .children
            .get(index)
            .copied()
    }

    /// Number of children (zero for leaves and stale handles).
    #[must_use]
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.get(parent)
            .and_then(|n| n.container.as_ref())
            .map_or(0, |c| c.children.len())
    }

    /// Position of `child` in `parent`'s child list.
    #[must_use]
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.get(parent)?
            .container
            .as_ref()?
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// First direct child of `parent` with the given name.
    #[must_use]
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get(parent)?
            .container
            .as_ref()?
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.name == name))
    }

    /// Whether the node can hold children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.node(id).container.is_some()
    }

    /// Whether `id` is `ancestor` itself or lies in its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.is_alive(id) && (ancestor == id || self.is_ancestor(ancestor, id))
    }

    /// Whether the node is attached (transitively) under the root.
    ///
    /// Returns `false` for stale handles.
    #[must_use]
    pub fn is_on_stage(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.staged)
    }

    /// The stage root if the node is on stage.
    #[must_use]
    pub fn stage_of(&self, id: NodeId) -> Option<NodeId> {
        self.is_on_stage(id).then_some(self.root)
    }

    // -- Internal helpers --

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.idx as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.idx as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Returns the node, panicking if the handle is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale NodeId: {id:?} (current gen: {})", self.generation_of(id)),
        }
    }

    /// Mutable variant of [`node`](Self::node).
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        let generation = self.generation_of(id);
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale NodeId: {id:?} (current gen: {generation})"),
        }
    }

    fn generation_of(&self, id: NodeId) -> u32 {
        self.slots
            .get(id.idx as usize)
            .map_or(u32::MAX, |s| s.generation)
    }

    fn check_alive(&self, id: NodeId) -> SceneResult<()> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(SceneError::StaleNode(id))
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_alive(parent)?;
        self.check_alive(child)?;
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        if !self.is_container(parent) {
            return Err(SceneError::NotAContainer(parent));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        Ok(())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot count stays far below u32::MAX"
    )]
    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            NodeId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId { idx, generation: 0 }
        }
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub(crate) fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.get(id).and_then(|n| n.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Pre-order list of `id` and its descendants.
    pub(crate) fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.get(n) else { continue };
            out.push(n);
            if let Some(c) = &node.container {
                stack.extend(c.children.iter().rev().copied());
            }
        }
        out
    }

    fn insert_child_raw(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(c) = self.get_mut(parent).and_then(|n| n.container.as_mut()) {
            c.children.insert(index, child);
        }
        for cursor in &mut self.cursors {
            if cursor.parent == parent && index < cursor.next {
                cursor.next += 1;
            }
        }
    }

    fn remove_child_raw(&mut self, parent: NodeId, index: usize) {
        if let Some(c) = self.get_mut(parent).and_then(|n| n.container.as_mut()) {
            c.children.remove(index);
        }
        for cursor in &mut self.cursors {
            if cursor.parent == parent && index < cursor.next {
                cursor.next -= 1;
            }
        }
    }

    fn move_child(&mut self, parent: NodeId, child: NodeId, index: usize) {
        let Some(from) = self.child_index(parent, child) else {
            return;
        };
        if from == index {
            return;
        }
        self.remove_child_raw(parent, from);
        self.insert_child_raw(parent, index, child);
    }

    /// Unlinks a node from its parent, firing removal notifications first.
    fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.get(child).and_then(|n| n.parent) else {
            return false;
        };

        if self.node(child).staged {
            self.notify_removed(child);
            if self.get(child).and_then(|n| n.parent) != Some(parent) {
                // A listener destroyed or moved the node.
                return true;
            }
        }

        if let Some(index) = self.child_index(parent, child) {
            self.remove_child_raw(parent, index);
        }
        let node = self.node_mut(child);
        node.parent = None;
        node.parent_changed = true;
        if node.staged {
            for n in self.subtree(child) {
                self.node_mut(n).staged = false;
                self.record_stage_change(n, StageChange::Removed);
            }
        }
        true
    }

    fn notify_added(&mut self, id: NodeId) {
        let nodes = self.subtree(id);
        for &n in &nodes {
            self.node_mut(n).staged = true;
            self.record_stage_change(n, StageChange::Added);
        }
        for n in nodes {
            if self.is_on_stage(n) {
                self.dispatch(n, &mut Event::new(EventKind::AddedToStage));
            }
        }
    }

    /// Queues a stage join or leave for the next pass.
    ///
    /// A change that undoes one still queued cancels it, so each node sits
    /// in at most one list and the lists stay bounded between passes.
    fn record_stage_change(&mut self, id: NodeId, change: StageChange) {
        let node = self.node_mut(id);
        let queued = node.stage_change;
        if queued != StageChange::None && queued != change {
            node.stage_change = StageChange::None;
            let list = match queued {
                StageChange::Added => &mut self.pending_added,
                _ => &mut self.pending_removed,
            };
            if let Some(pos) = list.iter().position(|&n| n == id) {
                list.remove(pos);
            }
            return;
        }
        node.stage_change = change;
        match change {
            StageChange::Added => self.pending_added.push(id),
            StageChange::Removed => self.pending_removed.push(id),
            StageChange::None => {}
        }
    }

    /// Moves the queued stage changes into `added` and `removed`.
    pub(crate) fn drain_stage_changes(
        &mut self,
        added: &mut Vec<NodeId>,
        removed: &mut Vec<NodeId>,
    ) {
        let mut joined = core::mem::take(&mut self.pending_added);
        let mut left = core::mem::take(&mut self.pending_removed);
        for &id in joined.iter().chain(&left) {
            if let Some(node) = self.get_mut(id) {
                node.stage_change = StageChange::None;
            }
        }
        added.append(&mut joined);
        removed.append(&mut left);
    }

    fn notify_removed(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            if self.is_on_stage(n) {
                self.dispatch(n, &mut Event::new(EventKind::RemovedFromStage));
            }
        }
    }

    /// Frees `id` and every descendant. Assumes `id` is already detached.
    fn free_subtree(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            self.free_slot(n);
        }
    }

    fn free_slot(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.idx as usize)
            .filter(|s| s.generation == id.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.idx);

        for entry in &node.listeners {
            let count = &mut self.listener_counts[entry.kind.index()];
            *count = count.saturating_sub(1);
        }
        if let Some(mask) = node.mask.and_then(|m| self.get_mut(m)) {
            mask.mask_users = mask.mask_users.saturating_sub(1);
        }
        if self.drag.as_ref().is_some_and(|d| d.target == id) {
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder(scene: &mut Scene, ids: &[NodeId], kind: EventKind) -> Rc<RefCell<Vec<NodeId>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &id in ids {
            let log = Rc::clone(&log);
            scene.add_listener(id, kind, move |_, e| {
                log.borrow_mut()
                    .push(e.current_target.expect("current target"));
            });
        }
        log
    }

    #[test]
    fn create_and_destroy() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        assert!(scene.is_alive(id));
        assert!(scene.destroy(id));
        assert!(!scene.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = Scene::new();
        let id1 = scene.create_container();
        scene.destroy(id1);
        let id2 = scene.create_container();
        // id2 reuses the same slot but has a different generation.
        assert!(!scene.is_alive(id1));
        assert!(scene.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn add_child_and_query() {
        let mut scene = Scene::new();
        let parent = scene.create_container();
        let a = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));

        scene.add_child(parent, a).unwrap();
        scene.add_child_at(parent, b, 0).unwrap();

        assert_eq!(scene.parent(a), Some(parent));
        assert_eq!(scene.children(parent), &[b, a]);
        assert_eq!(scene.child_index(parent, a), Some(1));
        assert!(scene.contains(parent, a));
        assert!(!scene.is_on_stage(a));
    }

    #[test]
    fn attach_errors() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = scene.create_container();
        let inner = scene.create_container();
        let leaf = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));
        scene.add_child(outer, inner).unwrap();

        assert_eq!(
            scene.add_child(inner, outer),
            Err(SceneError::Cycle {
                parent: inner,
                child: outer
            })
        );
        assert_eq!(
            scene.add_child(outer, outer),
            Err(SceneError::Cycle {
                parent: outer,
                child: outer
            })
        );
        assert_eq!(
            scene.add_child(leaf, inner),
            Err(SceneError::NotAContainer(leaf))
        );
        assert_eq!(
            scene.add_child_at(outer, leaf, 5),
            Err(SceneError::IndexOutOfRange { index: 5, len: 1 })
        );
        assert_eq!(scene.add_child(outer, root), Err(SceneError::RootNode));

        scene.destroy(leaf);
        assert_eq!(
            scene.add_child(outer, leaf),
            Err(SceneError::StaleNode(leaf))
        );
    }

    #[test]
    fn re_adding_to_same_parent_reorders_without_lifecycle() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_container();
        let b = scene.create_container();
        scene.add_child(root, a).unwrap();
        scene.add_child(root, b).unwrap();
        let added = recorder(&mut scene, &[a], EventKind::AddedToStage);
        let removed = recorder(&mut scene, &[a], EventKind::RemovedFromStage);

        scene.add_child(root, a).unwrap();
        assert_eq!(scene.children(root), &[b, a]);
        assert!(added.borrow().is_empty());
        assert!(removed.borrow().is_empty());
    }

    #[test]
    fn reparenting_moves_the_child() {
        let mut scene = Scene::new();
        let p1 = scene.create_container();
        let p2 = scene.create_container();
        let child = scene.create_container();

        scene.add_child(p1, child).unwrap();
        scene.add_child(p2, child).unwrap();
        assert_eq!(scene.parent(child), Some(p2));
        assert!(scene.children(p1).is_empty());
    }

    #[test]
    fn remove_child_that_is_not_a_child_is_a_no_op() {
        let mut scene = Scene::new();
        let p1 = scene.create_container();
        let p2 = scene.create_container();
        let child = scene.create_container();
        scene.add_child(p1, child).unwrap();

        assert!(!scene.remove_child(p2, child));
        assert_eq!(scene.parent(child), Some(p1));
        assert!(scene.remove_child(p1, child));
        assert_eq!(scene.parent(child), None);
        assert!(!scene.remove_from_parent(child));
    }

    #[test]
    fn lifecycle_notifications_are_parent_first() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_container();
        let b = scene.create_container();
        let c = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));
        scene.add_child(a, b).unwrap();
        scene.add_child(b, c).unwrap();

        let added = recorder(&mut scene, &[c, b, a], EventKind::AddedToStage);
        let removed = recorder(&mut scene, &[c, b, a], EventKind::RemovedFromStage);

        scene.add_child(root, a).unwrap();
        assert_eq!(*added.borrow(), vec![a, b, c]);
        assert!(scene.is_on_stage(c));
        assert_eq!(scene.stage_of(c), Some(root));

        scene.remove_child(root, a);
        assert_eq!(*removed.borrow(), vec![a, b, c]);
        assert!(!scene.is_on_stage(c));
    }

    #[test]
    fn removal_listener_still_sees_the_stage() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_container();
        scene.add_child(root, a).unwrap();
        let seen = Rc::new(RefCell::new(None));
        let seen2 = Rc::clone(&seen);
        scene.add_listener(a, EventKind::RemovedFromStage, move |s, e| {
            let id = e.current_target.expect("current target");
            *seen2.borrow_mut() = Some((s.is_on_stage(id), s.parent(id)));
        });
        scene.remove_from_parent(a);
        assert_eq!(*seen.borrow(), Some((true, Some(root))));
    }

    #[test]
    fn destroy_is_recursive_and_idempotent() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_container();
        let b = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));
        scene.add_child(root, a).unwrap();
        scene.add_child(a, b).unwrap();
        let before = scene.len();
        let removed = recorder(&mut scene, &[a, b], EventKind::RemovedFromStage);
        scene.add_listener(b, EventKind::EnterFrame, |_, _| {});
        assert_eq!(scene.listener_count(EventKind::EnterFrame), 1);

        assert!(scene.destroy(a));
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(b));
        assert!(scene.children(root).is_empty());
        assert_eq!(*removed.borrow(), vec![a, b]);
        assert_eq!(scene.len(), before - 2);
        assert_eq!(scene.listener_count(EventKind::EnterFrame), 0);
        assert_eq!(scene.listener_count(EventKind::RemovedFromStage), 0);

        assert!(!scene.destroy(a), "second destroy is a no-op");
        assert!(!scene.destroy(b));
    }

    #[test]
    fn root_cannot_be_destroyed_or_detached() {
        let mut scene = Scene::new();
        let root = scene.root();
        assert!(!scene.destroy(root));
        assert!(!scene.remove_from_parent(root));
        assert!(scene.is_alive(root));
        assert!(scene.is_on_stage(root));
    }

    #[test]
    fn remove_all_children_and_lookup_by_name() {
        let mut scene = Scene::new();
        let parent = scene.create_container();
        let a = scene.create_container();
        let b = scene.create_container();
        scene.set_name(b, "button");
        scene.add_child(parent, a).unwrap();
        scene.add_child(parent, b).unwrap();

        assert_eq!(scene.child_by_name(parent, "button"), Some(b));
        assert_eq!(scene.child_by_name(parent, "missing"), None);

        scene.remove_all_children(parent);
        assert_eq!(scene.child_count(parent), 0);
        assert_eq!(scene.parent(a), None);
    }

    #[test]
    fn set_child_index_reorders() {
        let mut scene = Scene::new();
        let parent = scene.create_container();
        let kids: Vec<_> = (0..3).map(|_| scene.create_container()).collect();
        for &k in &kids {
            scene.add_child(parent, k).unwrap();
        }
        assert!(scene.set_child_index(parent, kids[0], 2));
        assert_eq!(scene.children(parent), &[kids[1], kids[2], kids[0]]);
        assert!(!scene.set_child_index(parent, kids[0], 3));
        assert_eq!(scene.remove_child_at(parent, 0), Some(kids[1]));
        assert_eq!(scene.remove_child_at(parent, 5), None);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_parent() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        scene.destroy(id);
        let _ = scene.parent(id);
    }

    #[test]
    fn stage_churn_between_passes_cancels_out() {
        let mut scene = Scene::new();
        let root = scene.root();
        let kept = scene.create_container();
        scene.add_child(root, kept).unwrap();
        scene.update(false);

        for _ in 0..100 {
            let temp = scene.create_shape(Rect::new(0.0, 0.0, 1.0, 1.0));
            scene.add_child(root, temp).unwrap();
            scene.destroy(temp);
            scene.remove_from_parent(kept);
            scene.add_child(root, kept).unwrap();
        }
        assert!(scene.pending_added.is_empty());
        assert!(scene.pending_removed.is_empty());
        let changes = scene.update(false);
        assert!(changes.added.is_empty() && changes.removed.is_empty());

        scene.remove_from_parent(kept);
        let changes = scene.update(false);
        assert_eq!(changes.removed, vec![kept]);
        scene.add_child(root, kept).unwrap();
        assert_eq!(scene.update(false).added, vec![kept]);
    }
}
