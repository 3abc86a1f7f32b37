// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration and event dispatch.
//!
//! Listeners receive `&mut Scene`, so they may freely mutate the tree while
//! an event is being delivered. Each dispatch snapshots the listener list of
//! the current node (and, for pointer events, the whole propagation path)
//! before running anything, so mutations take effect for the *next*
//! dispatch. A listener that is already running is not re-entered.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;

use crate::event::{Event, EventKind, ListenerId};

use super::id::NodeId;
use super::store::Scene;

type Callback = Rc<RefCell<dyn FnMut(&mut Scene, &mut Event)>>;

pub(crate) struct ListenerEntry {
    pub(crate) id: ListenerId,
    pub(crate) kind: EventKind,
    callback: Callback,
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Registers a listener for `kind` on a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn add_listener<F>(&mut self, id: NodeId, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&mut Self, &mut Event) + 'static,
    {
        let listener = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.node_mut(id).listeners.push(ListenerEntry {
            id: listener,
            kind,
            callback: Rc::new(RefCell::new(callback)),
        });
        self.listener_counts[kind.index()] += 1;
        listener
    }

    /// Unregisters a listener. Returns `false` if it was not registered on
    /// this node or the handle is stale.
    pub fn remove_listener(&mut self, id: NodeId, listener: ListenerId) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let Some(pos) = node.listeners.iter().position(|l| l.id == listener) else {
            return false;
        };
        let entry = node.listeners.remove(pos);
        let count = &mut self.listener_counts[entry.kind.index()];
        *count = count.saturating_sub(1);
        true
    }

    /// Whether the node has at least one listener for `kind`.
    #[must_use]
    pub fn has_listener(&self, id: NodeId, kind: EventKind) -> bool {
        self.get(id)
            .is_some_and(|n| n.listeners.iter().any(|l| l.kind == kind))
    }

    /// Number of listeners for `kind` across the whole scene.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listener_counts[kind.index()]
    }

    /// Delivers `event` to the listeners of a single node.
    ///
    /// Sets [`current_target`](Event::current_target), and
    /// [`target`](Event::target) if it is still unset. Does nothing for stale
    /// handles.
    pub fn dispatch(&mut self, id: NodeId, event: &mut Event) {
        if self.listener_counts[event.kind.index()] == 0 {
            return;
        }
        let Some(node) = self.get(id) else {
            return;
        };
        let snapshot: Vec<(ListenerId, Callback)> = node
            .listeners
            .iter()
            .filter(|l| l.kind == event.kind)
            .map(|l| (l.id, Rc::clone(&l.callback)))
            .collect();
        if snapshot.is_empty() {
            return;
        }

        event.target.get_or_insert(id);
        event.current_target = Some(id);
        for (listener, callback) in snapshot {
            // Skip listeners removed by an earlier listener of this dispatch.
            let registered = self
                .get(id)
                .is_some_and(|n| n.listeners.iter().any(|l| l.id == listener));
            if !registered {
                continue;
            }
            if let Ok(mut f) = callback.try_borrow_mut() {
                (*f)(self, event);
            }
        }
    }

    /// Builds the propagation path for a pointer at `point` (global space).
    ///
    /// The path starts at the hit node and runs up to the root. A container
    /// with `mouse_children == false` replaces everything collected below it
    /// and becomes the effective target. With no hit, the root alone is the
    /// target.
    #[must_use]
    pub fn pointer_path(&self, point: Point) -> Vec<NodeId> {
        let Some(hit) = self.hit_test_point(self.root, point, true) else {
            return vec![self.root];
        };
        let mut path = Vec::new();
        let mut cur = Some(hit);
        while let Some(id) = cur {
            let Some(node) = self.get(id) else { break };
            if node.container.as_ref().is_some_and(|c| !c.mouse_children) {
                path.clear();
            }
            path.push(id);
            cur = node.parent;
        }
        path
    }

    /// Delivers a pointer event along `path`, target first.
    ///
    /// `event.client` must hold the global pointer position. Each node's
    /// [`local`](Event::local) position is filled in before its listeners
    /// run. Destroyed nodes are skipped; propagation ends once a listener
    /// calls [`stop_propagation`](Event::stop_propagation).
    pub fn dispatch_along(&mut self, path: &[NodeId], event: &mut Event) {
        let client = event.client;
        self.deliver(path, client, core::slice::from_mut(event));
    }

    /// Hit-tests `point` (global space) once and delivers every event in
    /// `events` along the resulting path.
    ///
    /// The path is snapshotted before any listener runs. At each node, every
    /// event whose propagation has not been stopped is delivered in order,
    /// so one event stopping does not affect the others. Returns the target.
    pub fn dispatch_pointer(&mut self, point: Point, events: &mut [Event]) -> Option<NodeId> {
        let path = self.pointer_path(point);
        self.deliver(&path, point, events);
        path.first().copied()
    }

    fn deliver(&mut self, path: &[NodeId], client: Point, events: &mut [Event]) {
        for event in events.iter_mut() {
            event.target = path.first().copied();
            event.client = client;
        }
        for &id in path {
            if !self.is_alive(id) {
                continue;
            }
            let local = self.global_to_local(id, client).unwrap_or(client);
            for event in events.iter_mut() {
                if event.is_propagation_stopped() {
                    continue;
                }
                event.local = local;
                self.dispatch(id, event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use kurbo::Rect;

    use super::*;

    fn staged_pair(scene: &mut Scene) -> (NodeId, NodeId) {
        let root = scene.root();
        let group = scene.create_container();
        let leaf = scene.create_shape(Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.add_child(root, group).unwrap();
        scene.add_child(group, leaf).unwrap();
        scene.update(false);
        (group, leaf)
    }

    #[test]
    fn counts_track_registration() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        let l = scene.add_listener(id, EventKind::MouseDown, |_, _| {});
        assert_eq!(scene.listener_count(EventKind::MouseDown), 1);
        assert!(scene.has_listener(id, EventKind::MouseDown));
        assert!(scene.remove_listener(id, l));
        assert!(!scene.remove_listener(id, l));
        assert_eq!(scene.listener_count(EventKind::MouseDown), 0);
    }

    #[test]
    fn bubbling_runs_target_first_and_stops() {
        let mut scene = Scene::new();
        let (group, leaf) = staged_pair(&mut scene);
        let root = scene.root();
        let order = Rc::new(RefCell::new(Vec::new()));
        for id in [root, group, leaf] {
            let order = Rc::clone(&order);
            scene.add_listener(id, EventKind::MouseDown, move |_, e| {
                order.borrow_mut().push(e.current_target.expect("current"));
            });
        }

        let path = scene.pointer_path(Point::new(50.0, 50.0));
        assert_eq!(path, vec![leaf, group, root]);

        let mut e = Event::new(EventKind::MouseDown);
        e.client = Point::new(50.0, 50.0);
        scene.dispatch_along(&path, &mut e);
        assert_eq!(*order.borrow(), vec![leaf, group, root]);
        assert_eq!(e.target, Some(leaf));

        order.borrow_mut().clear();
        scene.add_listener(group, EventKind::MouseDown, |_, e| e.stop_propagation());
        let mut e = Event::new(EventKind::MouseDown);
        e.client = Point::new(50.0, 50.0);
        scene.dispatch_along(&path, &mut e);
        assert_eq!(*order.borrow(), vec![leaf, group]);
    }

    #[test]
    fn mouse_children_false_retargets_to_container() {
        let mut scene = Scene::new();
        let (group, _leaf) = staged_pair(&mut scene);
        scene.set_mouse_children(group, false);
        let path = scene.pointer_path(Point::new(10.0, 10.0));
        assert_eq!(path, vec![group, scene.root()]);
    }

    #[test]
    fn miss_targets_the_root() {
        let mut scene = Scene::new();
        staged_pair(&mut scene);
        assert_eq!(scene.pointer_path(Point::new(500.0, 500.0)), vec![scene.root()]);
    }

    #[test]
    fn listener_removed_mid_dispatch_does_not_run() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        let ran = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(None));
        let second2 = Rc::clone(&second);
        scene.add_listener(id, EventKind::Resize, move |s, e| {
            let target = e.current_target.expect("current");
            if let Some(l) = second2.get() {
                s.remove_listener(target, l);
            }
        });
        let ran2 = Rc::clone(&ran);
        let l = scene.add_listener(id, EventKind::Resize, move |_, _| ran2.set(true));
        second.set(Some(l));

        scene.dispatch(id, &mut Event::new(EventKind::Resize));
        assert!(!ran.get(), "removed listener must not run");
    }

    #[test]
    fn local_coordinates_are_filled_per_node() {
        let mut scene = Scene::new();
        let (group, leaf) = staged_pair(&mut scene);
        scene.set_x(group, 10.0);
        scene.set_scale(leaf, 2.0, 2.0);
        scene.update(false);
        let locals = Rc::new(RefCell::new(Vec::new()));
        for id in [group, leaf] {
            let locals = Rc::clone(&locals);
            scene.add_listener(id, EventKind::MouseUp, move |_, e| {
                locals.borrow_mut().push(e.local);
            });
        }
        let path = scene.pointer_path(Point::new(30.0, 20.0));
        let mut e = Event::new(EventKind::MouseUp);
        e.client = Point::new(30.0, 20.0);
        scene.dispatch_along(&path, &mut e);
        assert_eq!(
            *locals.borrow(),
            vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)]
        );
    }

    #[test]
    fn batch_stops_propagation_per_event() {
        let mut scene = Scene::new();
        let (group, leaf) = staged_pair(&mut scene);
        let seen = Rc::new(RefCell::new(Vec::new()));
        scene.add_listener(leaf, EventKind::MouseDown, |_, e| e.stop_propagation());
        for kind in [EventKind::MouseDown, EventKind::MouseMove] {
            let seen = Rc::clone(&seen);
            scene.add_listener(group, kind, move |_, e| {
                seen.borrow_mut().push(e.kind);
            });
        }

        let mut events = [
            Event::new(EventKind::MouseDown),
            Event::new(EventKind::MouseMove),
        ];
        let target = scene.dispatch_pointer(Point::new(5.0, 5.0), &mut events);
        assert_eq!(target, Some(leaf));
        assert_eq!(*seen.borrow(), vec![EventKind::MouseMove]);
        assert!(events.iter().all(|e| e.target == Some(leaf)));
    }

    #[test]
    fn path_is_fixed_before_listeners_run() {
        let mut scene = Scene::new();
        let (group, leaf) = staged_pair(&mut scene);
        let root = scene.root();
        let cover = scene.create_shape(Rect::new(0.0, 0.0, 100.0, 100.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in [root, group, cover] {
            let seen = Rc::clone(&seen);
            scene.add_listener(id, EventKind::MouseDown, move |_, e| {
                seen.borrow_mut().push(e.current_target.expect("current"));
            });
        }
        scene.add_listener(leaf, EventKind::MouseDown, move |s, _| {
            s.destroy(group);
            s.add_child(root, cover).unwrap();
        });

        let mut events = [Event::new(EventKind::MouseDown)];
        let target = scene.dispatch_pointer(Point::new(5.0, 5.0), &mut events);
        assert_eq!(target, Some(leaf));
        assert!(!scene.is_alive(group));
        assert_eq!(*seen.borrow(), vec![root], "destroyed group skipped, cover not yet hit");

        seen.borrow_mut().clear();
        scene.update(false);
        let mut events = [Event::new(EventKind::MouseDown)];
        let target = scene.dispatch_pointer(Point::new(5.0, 5.0), &mut events);
        assert_eq!(target, Some(cover));
        assert_eq!(*seen.borrow(), vec![cover, root]);
    }
}
