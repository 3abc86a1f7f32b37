// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input coalescing.
//!
//! Host pointer callbacks are never dispatched synchronously. Each raw event
//! overwrites the slot of its logical kind, so at most one down, one move and
//! one up survive until the next update drains them.

use kurbo::{Point, Vec2};

use crate::event::EventKind;

/// Raw host pointer event kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawPointerKind {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse moved.
    MouseMove,
    /// Mouse button released.
    MouseUp,
    /// First touch point placed.
    TouchStart,
    /// Touch point moved.
    TouchMove,
    /// Touch point lifted.
    TouchEnd,
}

impl RawPointerKind {
    /// The logical kind this raw kind maps to.
    #[must_use]
    pub const fn logical(self) -> PointerKind {
        match self {
            Self::MouseDown | Self::TouchStart => PointerKind::Down,
            Self::MouseMove | Self::TouchMove => PointerKind::Move,
            Self::MouseUp | Self::TouchEnd => PointerKind::Up,
        }
    }
}

/// Logical pointer event kinds, one coalescing slot each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Press.
    Down,
    /// Move.
    Move,
    /// Release.
    Up,
}

impl PointerKind {
    /// The scene event kind dispatched for this pointer kind.
    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        match self {
            Self::Down => EventKind::MouseDown,
            Self::Move => EventKind::MouseMove,
            Self::Up => EventKind::MouseUp,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Move => 1,
            Self::Up => 2,
        }
    }
}

/// A pointer event as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPointerEvent {
    /// Raw kind.
    pub kind: RawPointerKind,
    /// Client position in CSS pixels. A touch end may carry none.
    pub position: Option<Point>,
    /// Offset of the host surface within the client area.
    pub target_offset: Vec2,
}

impl RawPointerEvent {
    /// An event at `position` on a surface at the client origin.
    #[must_use]
    pub const fn at(kind: RawPointerKind, position: Point) -> Self {
        Self {
            kind,
            position: Some(position),
            target_offset: Vec2::ZERO,
        }
    }
}

/// A coalesced pointer event ready for dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Logical kind.
    pub kind: PointerKind,
    /// Normalized global position in device pixels, if the raw event had one.
    pub position: Option<Point>,
    seq: u64,
}

/// Per-kind last-wins slots.
#[derive(Clone, Debug, Default)]
pub struct PointerAccumulator {
    slots: [Option<PointerSample>; 3],
    seq: u64,
}

impl PointerAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw event, replacing any earlier one of the same logical
    /// kind. The position is normalized to `(position - offset) * dpr`.
    pub fn push(&mut self, event: RawPointerEvent, dpr: f64) {
        let kind = event.kind.logical();
        let position = event
            .position
            .map(|p| ((p - event.target_offset).to_vec2() * dpr).to_point());
        self.seq += 1;
        self.slots[kind.slot()] = Some(PointerSample {
            kind,
            position,
            seq: self.seq,
        });
    }

    /// Whether no event is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Moves the surviving events into `out`, in the arrival order of each
    /// survivor, and clears every slot.
    pub fn drain_into(&mut self, out: &mut Vec<PointerSample>) {
        let start = out.len();
        out.extend(self.slots.iter_mut().filter_map(Option::take));
        out[start..].sort_by_key(|s| s.seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_coalesce_to_the_last() {
        let mut acc = PointerAccumulator::new();
        for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
            acc.push(
                RawPointerEvent::at(RawPointerKind::MouseMove, Point::new(x, 0.0)),
                1.0,
            );
        }
        let mut out = Vec::new();
        acc.drain_into(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, PointerKind::Move);
        assert_eq!(out[0].position, Some(Point::new(5.0, 0.0)));
        assert!(acc.is_empty(), "drain clears the slots");
    }

    #[test]
    fn survivors_drain_in_arrival_order() {
        let mut acc = PointerAccumulator::new();
        acc.push(RawPointerEvent::at(RawPointerKind::TouchMove, Point::ZERO), 1.0);
        acc.push(RawPointerEvent::at(RawPointerKind::TouchStart, Point::ZERO), 1.0);
        acc.push(
            RawPointerEvent {
                kind: RawPointerKind::TouchEnd,
                position: None,
                target_offset: Vec2::ZERO,
            },
            1.0,
        );
        // A later move overtakes the start.
        acc.push(RawPointerEvent::at(RawPointerKind::MouseMove, Point::ZERO), 1.0);

        let mut out = Vec::new();
        acc.drain_into(&mut out);
        let kinds: Vec<_> = out.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [PointerKind::Down, PointerKind::Up, PointerKind::Move]);
        assert_eq!(out[1].position, None);
    }

    #[test]
    fn positions_are_normalized() {
        let mut acc = PointerAccumulator::new();
        acc.push(
            RawPointerEvent {
                kind: RawPointerKind::MouseDown,
                position: Some(Point::new(30.0, 40.0)),
                target_offset: Vec2::new(10.0, 20.0),
            },
            2.0,
        );
        let mut out = Vec::new();
        acc.drain_into(&mut out);
        assert_eq!(out[0].position, Some(Point::new(40.0, 40.0)));
        assert_eq!(out[0].kind.event_kind(), EventKind::MouseDown);
    }
}
