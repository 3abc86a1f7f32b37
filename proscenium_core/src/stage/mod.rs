// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage: one scene, one render target, one frame loop.
//!
//! A [`Stage`] owns a [`Scene`] whose root node is the stage root. The host
//! driver hands it one [`FrameTick`] per refresh through
//! [`flush`](Stage::flush); the [`FramePacer`] decides whether that tick
//! updates, renders, both, or neither.
//!
//! ```text
//!   on_pointer() ──► PointerAccumulator (last wins per kind)
//!                          │ drained at the start of update
//!                          ▼
//!   flush(tick) ──► update(): dispatch input, step drag, Scene::update
//!               └─► render(): target.begin(), Scene::render
//! ```
//!
//! While paused, input is still drained and dispatched and the render walk
//! still runs; only the drag step and the update pass are skipped.

mod align;
mod input;

pub use align::{Alignment, ScaleMode, compute_alignment};
pub use input::{
    PointerAccumulator, PointerKind, PointerSample, RawPointerEvent, RawPointerKind,
};

use kurbo::{Point, Rect, Size};

use crate::clock::{Clock, MonotonicClock};
use crate::config::StageConfig;
use crate::event::{Event, EventKind};
use crate::node::{FrameChanges, Scene};
use crate::render::{RenderTarget, Viewport};
use crate::scheduler::{FramePacer, FrameWork};
use crate::time::HostTime;
use crate::timing::FrameTick;
use crate::trace::{
    FrameSummaryBuilder, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    PointerDispatchEvent, Tracer,
};

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A scene bound to a render target and a frame loop.
pub struct Stage {
    scene: Scene,
    config: StageConfig,
    target: Box<dyn RenderTarget>,
    pacer: FramePacer,
    input: PointerAccumulator,
    samples: Vec<PointerSample>,
    event_pool: Vec<Event>,
    last_pointer: Point,
    paused: bool,
    view_rect: Rect,
    host_size: Size,
    clock: Box<dyn Clock>,
    changes: FrameChanges,
}

impl core::fmt::Debug for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stage")
            .field("config", &self.config)
            .field("paused", &self.paused)
            .field("view_rect", &self.view_rect)
            .field("host_size", &self.host_size)
            .field("nodes", &self.scene.len())
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Creates a stage. The root's anchor is placed at the design centre.
    ///
    /// Nothing is drawn until [`start`](Self::start) has run.
    #[must_use]
    pub fn new(config: StageConfig, target: Box<dyn RenderTarget>) -> Self {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.set_anchor_x(root, config.design_width / 2.0);
        scene.set_anchor_y(root, config.design_height / 2.0);
        Self {
            scene,
            config,
            target,
            pacer: FramePacer::new(config.pacer()),
            input: PointerAccumulator::new(),
            samples: Vec::new(),
            event_pool: Vec::new(),
            last_pointer: Point::ORIGIN,
            paused: false,
            view_rect: Rect::ZERO,
            host_size: Size::ZERO,
            clock: Box::new(MonotonicClock::new()),
            changes: FrameChanges::default(),
        }
    }

    /// Replaces the clock used for trace timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// First resize and update, then [`InitStage`](EventKind::InitStage) on
    /// the root.
    pub fn start(&mut self, host_width: f64, host_height: f64) {
        self.resize(host_width, host_height);
        self.update();
        let root = self.scene.root();
        self.scene.dispatch(root, &mut Event::new(EventKind::InitStage));
    }

    /// Re-fits the design surface into a host of the given size (CSS pixels).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, host_width: f64, host_height: f64) {
        self.host_size = Size::new(host_width, host_height);
        let dpr = self.config.device_pixel_ratio;
        self.target.resize(Viewport {
            width: host_width * dpr,
            height: host_height * dpr,
        });

        let a = compute_alignment(
            self.config.design_width,
            self.config.design_height,
            host_width,
            host_height,
            dpr,
            self.config.scale_mode,
            self.config.auto_steering,
        );
        let root = self.scene.root();
        self.scene.set_position(root, a.position);
        self.scene.set_scale(root, a.scale.x, a.scale.y);
        self.scene.set_rotation(root, a.rotation);
        self.view_rect = a.view_rect;
        tracing::debug!(
            scale_x = a.scale.x,
            scale_y = a.scale.y,
            rotation = a.rotation,
            view = ?a.view_rect,
            "stage aligned"
        );
    }

    /// The host reported a new size. Dispatches
    /// [`Resize`](EventKind::Resize) on the root, then re-aligns if
    /// auto-resize is enabled.
    pub fn host_resized(&mut self, host_width: f64, host_height: f64) {
        let root = self.scene.root();
        self.scene.dispatch(root, &mut Event::new(EventKind::Resize));
        if self.config.auto_resize {
            self.resize(host_width, host_height);
        }
    }

    /// Queues a raw pointer event for the next update.
    pub fn on_pointer(&mut self, event: RawPointerEvent) {
        self.input.push(event, self.config.device_pixel_ratio);
    }

    /// Runs the work the pacer schedules for `tick`.
    pub fn flush(&mut self, tick: FrameTick) -> FrameWork {
        self.flush_traced(tick, &mut Tracer::none())
    }

    /// Like [`flush`](Self::flush), reporting phases, pointer dispatches and
    /// a summary to `tracer`.
    pub fn flush_traced(&mut self, tick: FrameTick, tracer: &mut Tracer<'_>) -> FrameWork {
        let work = self.pacer.advance();
        let tick_event = FrameTickEvent::new(&tick, work);
        tracer.frame_tick(&tick_event);
        let mut summary = tracer
            .is_active()
            .then(|| FrameSummaryBuilder::new(&tick_event));
        let index = tick.frame_index;

        if work.updates() {
            self.phase_begin(tracer, summary.as_mut(), index, PhaseKind::Input);
            let dispatched = self.drain_input(tracer, index);
            self.phase_end(tracer, summary.as_mut(), index, PhaseKind::Input);

            self.phase_begin(tracer, summary.as_mut(), index, PhaseKind::Update);
            self.update_scene();
            self.phase_end(tracer, summary.as_mut(), index, PhaseKind::Update);

            if let Some(b) = summary.as_mut() {
                b.set_nodes_recomposed(saturating_u32(self.changes.visited));
                for _ in 0..dispatched {
                    b.count_event();
                }
            }
        }
        if work.renders() {
            self.phase_begin(tracer, summary.as_mut(), index, PhaseKind::Render);
            let drawn = self.render();
            self.phase_end(tracer, summary.as_mut(), index, PhaseKind::Render);
            if let Some(b) = summary.as_mut() {
                b.set_nodes_drawn(saturating_u32(drawn));
            }
        }

        if let Some(b) = summary {
            tracer.frame_summary(&b.finish());
        }
        work
    }

    /// Drains and dispatches pointer input, then (unless paused) steps the
    /// drag target and runs the update pass.
    pub fn update(&mut self) {
        self.drain_input(&mut Tracer::none(), 0);
        self.update_scene();
    }

    /// Starts a frame on the target and draws the staged tree. Returns the
    /// number of leaves drawn. Runs even while paused.
    pub fn render(&mut self) -> usize {
        self.target.begin();
        self.scene.render(self.target.as_mut())
    }

    fn update_scene(&mut self) {
        if self.paused {
            return;
        }
        self.scene.step_drag(self.last_pointer);
        self.scene.update_into(false, &mut self.changes);
    }

    /// Returns the number of events dispatched.
    fn drain_input(&mut self, tracer: &mut Tracer<'_>, frame_index: u64) -> usize {
        self.samples.clear();
        self.input.drain_into(&mut self.samples);
        if self.samples.is_empty() {
            return 0;
        }

        let mut count = 0;
        for sample in &self.samples {
            if let Some(p) = sample.position {
                self.last_pointer = p;
            }
            let kind = sample.kind.event_kind();
            if self.scene.listener_count(kind) == 0 {
                continue;
            }
            if self.event_pool.len() == count {
                self.event_pool.push(Event::new(kind));
            } else {
                self.event_pool[count].reset(kind);
            }
            count += 1;
        }
        if count == 0 {
            return 0;
        }

        let root = self.scene.root();
        let point = self.last_pointer;
        let stage_point = self.scene.global_to_local(root, point).unwrap_or(point);
        let events = &mut self.event_pool[..count];
        for event in events.iter_mut() {
            event.stage = stage_point;
        }
        let target = self.scene.dispatch_pointer(point, events);
        for event in &self.event_pool[..count] {
            tracer.pointer_dispatch(&PointerDispatchEvent {
                frame_index,
                kind: event.kind,
                target,
                position: point,
            });
        }
        count
    }

    fn now(&self) -> HostTime {
        self.clock.now()
    }

    fn phase_begin(
        &self,
        tracer: &mut Tracer<'_>,
        summary: Option<&mut FrameSummaryBuilder>,
        frame_index: u64,
        phase: PhaseKind,
    ) {
        if !tracer.is_active() {
            return;
        }
        let timestamp = self.now();
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            timestamp,
        });
        if let Some(b) = summary {
            b.phase_begin(phase, timestamp);
        }
    }

    fn phase_end(
        &self,
        tracer: &mut Tracer<'_>,
        summary: Option<&mut FrameSummaryBuilder>,
        frame_index: u64,
        phase: PhaseKind,
    ) {
        if !tracer.is_active() {
            return;
        }
        let timestamp = self.now();
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            timestamp,
        });
        if let Some(b) = summary {
            b.phase_end(phase, timestamp);
        }
    }

    // -- Accessors --

    /// Stops the update pass. Input and rendering continue.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the update pass.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the stage is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Changes the target frame rate.
    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        self.config.frame_rate = frame_rate;
        self.pacer.set_frame_rate(frame_rate);
        tracing::debug!(
            requested = frame_rate,
            effective = self.pacer.frame_rate(),
            "frame rate changed"
        );
    }

    /// The effective frame rate.
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        self.pacer.frame_rate()
    }

    /// The visible part of the design surface.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// The last host size passed to [`resize`](Self::resize).
    #[must_use]
    pub fn host_size(&self) -> Size {
        self.host_size
    }

    /// What the most recent update pass changed.
    #[must_use]
    pub fn last_changes(&self) -> &FrameChanges {
        &self.changes
    }

    /// Last known pointer position in device pixels.
    #[must_use]
    pub fn pointer_position(&self) -> Point {
        self.last_pointer
    }

    /// The configuration, including any runtime frame-rate change.
    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}
