// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Pointer dispatch targets are stored as raw slot index and generation,
//! since a [`NodeId`](proscenium_core::node::NodeId) cannot be rebuilt
//! outside the scene that issued it.

use proscenium_core::event::EventKind;
use proscenium_core::scheduler::FrameWork;
use proscenium_core::time::HostTime;
use proscenium_core::trace::{
    FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    PointerDispatchEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_POINTER_DISPATCH: u8 = 4;
const TAG_FRAME_SUMMARY: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_work(&mut self, w: FrameWork) {
        self.write_u8(match w {
            FrameWork::UpdateAndRender => 0,
            FrameWork::Update => 1,
            FrameWork::Render => 2,
            FrameWork::Idle => 3,
        });
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Input => 0,
            PhaseKind::Update => 1,
            PhaseKind::Render => 2,
        });
    }

    fn write_kind(&mut self, k: EventKind) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "event kind indices are below 256"
        )]
        self.write_u8(k.index() as u8);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.nanos());
        self.write_work(e.work);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.nanos());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.nanos());
    }

    fn on_pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        self.write_u8(TAG_POINTER_DISPATCH);
        self.write_u64(e.frame_index);
        self.write_kind(e.kind);
        match e.target {
            Some(id) => {
                self.write_u8(1);
                self.write_u32(id.index());
                self.write_u32(id.generation());
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
        }
        self.write_f64(e.position.x);
        self.write_f64(e.position.y);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.nanos());
        self.write_work(s.work);
        self.write_u64(s.input_nanos);
        self.write_u64(s.update_nanos);
        self.write_u64(s.render_nanos);
        self.write_u32(s.nodes_recomposed);
        self.write_u32(s.nodes_drawn);
        self.write_u32(s.events_dispatched);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded pointer dispatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedPointer {
    /// Tick counter.
    pub frame_index: u64,
    /// Logical event kind.
    pub kind: EventKind,
    /// Target slot index and generation.
    pub target: Option<(u32, u32)>,
    /// Global pointer x.
    pub x: f64,
    /// Global pointer y.
    pub y: f64,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`PointerDispatchEvent`], with the target as raw parts.
    PointerDispatch(RecordedPointer),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`]. Iteration stops at the first truncated or unknown
/// record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_work(&mut self) -> Option<FrameWork> {
        Some(match self.read_u8()? {
            0 => FrameWork::UpdateAndRender,
            1 => FrameWork::Update,
            2 => FrameWork::Render,
            _ => FrameWork::Idle,
        })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Input,
            1 => PhaseKind::Update,
            _ => PhaseKind::Render,
        })
    }

    fn read_kind(&mut self) -> Option<EventKind> {
        EventKind::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            work: self.read_work()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_pointer_dispatch(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let kind = self.read_kind()?;
        let has_target = self.read_u8()? != 0;
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(RecordedEvent::PointerDispatch(RecordedPointer {
            frame_index,
            kind,
            target: has_target.then_some((index, generation)),
            x: self.read_f64()?,
            y: self.read_f64()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            work: self.read_work()?,
            input_nanos: self.read_u64()?,
            update_nanos: self.read_u64()?,
            render_nanos: self.read_u64()?,
            nodes_recomposed: self.read_u32()?,
            nodes_drawn: self.read_u32()?,
            events_dispatched: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_POINTER_DISPATCH => self.decode_pointer_dispatch(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None,
        }
    }
}
