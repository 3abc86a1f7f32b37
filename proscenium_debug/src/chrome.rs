// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration events on one track; ticks, pointer dispatches and
/// summaries become instant events.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Instants without a timestamp of their own use the last tick time.
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                last_ts = e.now.as_micros_f64();
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Pacer",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "work": format!("{:?}", e.work),
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = e.timestamp.as_micros_f64();
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = e.timestamp.as_micros_f64();
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PointerDispatch(p) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", p.kind),
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": p.frame_index,
                        "target": p.target.map(|(index, generation)| json!([index, generation])),
                        "x": p.x,
                        "y": p.y,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": s.now.as_micros_f64(),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "work": format!("{:?}", s.work),
                        "input_us": s.input_nanos as f64 / 1000.0,
                        "update_us": s.update_nanos as f64 / 1000.0,
                        "render_us": s.render_nanos as f64 / 1000.0,
                        "nodes_recomposed": s.nodes_recomposed,
                        "nodes_drawn": s.nodes_drawn,
                        "events_dispatched": s.events_dispatched,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use kurbo::Point;
    use proscenium_core::event::EventKind;
    use proscenium_core::scheduler::FrameWork;
    use proscenium_core::time::HostTime;
    use proscenium_core::trace::{
        FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, PointerDispatchEvent,
        TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent {
            frame_index: 0,
            now: HostTime(1_000_000),
            work: FrameWork::UpdateAndRender,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Update,
            timestamp: HostTime(1_000_000),
        });
        rec.on_pointer_dispatch(&PointerDispatchEvent {
            frame_index: 0,
            kind: EventKind::MouseUp,
            target: None,
            position: Point::new(1.0, 2.0),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Update,
            timestamp: HostTime(1_000_100),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "FrameTick");
        assert_eq!(parsed[0]["args"]["work"], "UpdateAndRender");

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "Update");

        assert_eq!(parsed[2]["name"], "MouseUp");
        assert_eq!(parsed[2]["ts"], 1000.0);
        assert!(parsed[2]["args"]["target"].is_null(), "no target");

        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["ts"], 1000.1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "empty recording exports an empty array");
    }
}
