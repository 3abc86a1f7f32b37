// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use proscenium_core::time::HostTime;
use proscenium_core::trace::{
    FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PointerDispatchEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn us(t: HostTime) -> f64 {
    t.as_micros_f64()
}

fn nanos_to_us(n: u64) -> f64 {
    n as f64 / 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.1}µs work={:?}",
            e.frame_index,
            us(e.now),
            e.work,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.name(),
            us(e.timestamp),
        );
    }

    fn on_pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        let target = match e.target {
            Some(id) => format!("{id:?}"),
            None => "-".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[pointer] frame={} {:?} at ({:.1}, {:.1}) target={target}",
            e.frame_index, e.kind, e.position.x, e.position.y,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} input={:.1}µs update={:.1}µs render={:.1}µs \
             recomposed={} drawn={} events={}",
            s.frame_index,
            nanos_to_us(s.input_nanos),
            nanos_to_us(s.update_nanos),
            nanos_to_us(s.render_nanos),
            s.nodes_recomposed,
            s.nodes_drawn,
            s.events_dispatched,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_core::scheduler::FrameWork;
    use proscenium_core::trace::FrameSummaryBuilder;

    fn tick() -> FrameTickEvent {
        FrameTickEvent {
            frame_index: 1,
            now: HostTime(1_000_000),
            work: FrameWork::Update,
        }
    }

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_tick(&tick());
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[tick]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("work=Update"), "got: {output}");
    }

    #[test]
    fn pretty_print_summary() {
        let mut builder = FrameSummaryBuilder::new(&tick());
        builder.set_nodes_drawn(3);
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&builder.finish());
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("drawn=3"), "got: {output}");
    }
}
