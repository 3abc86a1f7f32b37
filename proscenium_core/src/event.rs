// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kinds and the event record passed to listeners.

use core::fmt;

use kurbo::Point;

use crate::node::NodeId;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The node became part of a stage's tree.
    AddedToStage,
    /// The node is about to leave a stage's tree.
    RemovedFromStage,
    /// Fired on every node during the update pass.
    EnterFrame,
    /// Pointer pressed.
    MouseDown,
    /// Pointer moved.
    MouseMove,
    /// Pointer released.
    MouseUp,
    /// The host viewport changed size.
    Resize,
    /// The stage finished its first resize and update.
    InitStage,
}

impl EventKind {
    /// Number of event kinds.
    pub const COUNT: usize = 8;

    /// Every event kind, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::AddedToStage,
        Self::RemovedFromStage,
        Self::EnterFrame,
        Self::MouseDown,
        Self::MouseMove,
        Self::MouseUp,
        Self::Resize,
        Self::InitStage,
    ];

    /// Dense index for per-kind tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::AddedToStage => 0,
            Self::RemovedFromStage => 1,
            Self::EnterFrame => 2,
            Self::MouseDown => 3,
            Self::MouseMove => 4,
            Self::MouseUp => 5,
            Self::Resize => 6,
            Self::InitStage => 7,
        }
    }

    /// Whether this kind is produced by pointer input.
    #[inline]
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::MouseDown | Self::MouseMove | Self::MouseUp)
    }
}

/// The record handed to every listener.
///
/// Pointer events carry three views of the same position: `client` is the
/// normalized global point, `stage` is that point in the stage root's local
/// space, and `local` is filled per node as the event travels the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// The node the event was originally dispatched to.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently running.
    pub current_target: Option<NodeId>,
    /// Global pointer position in device pixels.
    pub client: Point,
    /// Pointer position in the stage root's local space.
    pub stage: Point,
    /// Pointer position in the current target's local space.
    pub local: Point,
    propagation_stopped: bool,
}

impl Event {
    /// Creates an event with no target and zeroed positions.
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            current_target: None,
            client: Point::ORIGIN,
            stage: Point::ORIGIN,
            local: Point::ORIGIN,
            propagation_stopped: false,
        }
    }

    /// Stops the event from reaching nodes further up the path.
    ///
    /// Remaining listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Resets a pooled event for reuse.
    pub(crate) fn reset(&mut self, kind: EventKind) {
        *self = Self::new(kind);
    }
}

/// Identifies a registered listener, for removal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind:?} index");
        }
    }

    #[test]
    fn reset_clears_stop_flag() {
        let mut e = Event::new(EventKind::MouseDown);
        e.stop_propagation();
        e.client = Point::new(3.0, 4.0);
        assert!(e.is_propagation_stopped());
        e.reset(EventKind::MouseUp);
        assert!(!e.is_propagation_stopped());
        assert_eq!(e.kind, EventKind::MouseUp);
        assert_eq!(e.client, Point::ORIGIN);
    }
}
