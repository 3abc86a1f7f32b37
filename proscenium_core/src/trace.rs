// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! stage calls while it runs a tick. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps and counters during a
//! tick and produces a [`FrameSummary`] at the end.
//!
//! Textual diagnostics (refused operations, resize) go through the `tracing`
//! crate instead; this module is for structured, per-frame timing data.

use kurbo::Point;

use crate::event::EventKind;
use crate::node::NodeId;
use crate::scheduler::FrameWork;
use crate::time::HostTime;
use crate::timing::FrameTick;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a stage tick is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Draining coalesced pointer input and dispatching it.
    Input,
    /// The tree update pass (composition, frame listeners).
    Update,
    /// The render walk.
    Render,
}

impl PhaseKind {
    /// All phases in execution order.
    pub const ALL: [Self; 3] = [Self::Input, Self::Update, Self::Render];

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Update => "update",
            Self::Render => "render",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Input => 0,
            Self::Update => 1,
            Self::Render => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a stage receives a driver tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameTickEvent {
    /// Monotonic tick counter.
    pub frame_index: u64,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Work the pacer scheduled for this tick.
    pub work: FrameWork,
}

impl FrameTickEvent {
    /// Creates the event for `tick`.
    #[must_use]
    pub fn new(tick: &FrameTick, work: FrameWork) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            work,
        }
    }
}

/// Marks the beginning of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted once per coalesced pointer event dispatched into the scene.
#[derive(Clone, Copy, Debug)]
pub struct PointerDispatchEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Logical pointer event kind.
    pub kind: EventKind,
    /// Node the event was dispatched to first.
    pub target: Option<NodeId>,
    /// Global pointer position used for hit-testing.
    pub position: Point,
}

/// Per-tick summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Tick counter.
    pub frame_index: u64,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Work the pacer scheduled.
    pub work: FrameWork,
    /// Input phase duration in nanoseconds (0 if not run).
    pub input_nanos: u64,
    /// Update phase duration in nanoseconds (0 if not run).
    pub update_nanos: u64,
    /// Render phase duration in nanoseconds (0 if not run).
    pub render_nanos: u64,
    /// Nodes visited by the update pass.
    pub nodes_recomposed: u32,
    /// Leaves handed to the render target.
    pub nodes_drawn: u32,
    /// Pointer events dispatched.
    pub events_dispatched: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a stage.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a driver tick is received.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called at the beginning of a phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after a pointer event has been dispatched.
    fn on_pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        _ = e;
    }

    /// Called with a per-tick summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Whether events reach a sink. Always `false` without the `trace`
    /// feature.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PointerDispatchEvent`].
    #[inline]
    pub fn pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pointer_dispatch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps and counters during a tick and produces a
/// [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTickEvent,
    phase_starts: [Option<HostTime>; 3],
    phase_ends: [Option<HostTime>; 3],
    nodes_recomposed: u32,
    nodes_drawn: u32,
    events_dispatched: u32,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 3],
            phase_ends: [None; 3],
            nodes_recomposed: 0,
            nodes_drawn: 0,
            events_dispatched: 0,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase.index()] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase.index()] = Some(t);
    }

    /// Sets the number of nodes the update pass visited.
    pub fn set_nodes_recomposed(&mut self, n: u32) {
        self.nodes_recomposed = n;
    }

    /// Sets the number of leaves drawn.
    pub fn set_nodes_drawn(&mut self, n: u32) {
        self.nodes_drawn = n;
    }

    /// Counts one dispatched pointer event.
    pub fn count_event(&mut self) {
        self.events_dispatched += 1;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            work: self.tick.work,
            input_nanos: self.phase_duration(PhaseKind::Input),
            update_nanos: self.phase_duration(PhaseKind::Update),
            render_nanos: self.phase_duration(PhaseKind::Render),
            nodes_recomposed: self.nodes_recomposed,
            nodes_drawn: self.nodes_drawn,
            events_dispatched: self.events_dispatched,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase.index();
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).nanos(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
