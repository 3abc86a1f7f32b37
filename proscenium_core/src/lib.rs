// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph with a frame-paced stage.
//!
//! `proscenium_core` keeps a tree of display nodes in a generational arena,
//! composes their transforms, alphas, and filter chains once per frame, and
//! hands the result to an external [`RenderTarget`](render::RenderTarget).
//! Pointer input is coalesced per frame and dispatched along the hit path.
//!
//! # Architecture
//!
//! One driver tick flows through the stage like this:
//!
//! ```text
//!   Host driver (refresh callback)
//!       │
//!       ▼
//!   FrameTick ──► FramePacer::advance() ──► FrameWork
//!                                              │
//!            ┌─────────────────────────────────┤
//!            ▼                                 ▼
//!   Stage::update()                      Stage::render()
//!     drain pointer input                  RenderTarget::begin()
//!     step drag target                     Scene::render() ──► RenderTarget::draw()
//!     Scene::update() ──► FrameChanges
//! ```
//!
//! **[`node`]**: The [`Scene`](node::Scene) arena: generational
//! [`NodeId`](node::NodeId) handles, container and leaf capabilities,
//! topology and lifecycle, the update pass, bounds, hit-testing, listener
//! dispatch, drag, and the render walk.
//!
//! **[`dirty`]**: Per-node dirty flags. Setters mark flags; the update pass
//! consumes them and inherits a parent's applied flags down the subtree.
//!
//! **[`geom`]**: Local-matrix construction from transform attributes and the
//! rectangle helpers used by bounds and clipping.
//!
//! **[`stage`]**: The [`Stage`](stage::Stage): pacing, pointer coalescing,
//! resize and alignment, and the render-target handoff.
//!
//! **[`scheduler`]**: The [`FramePacer`](scheduler::FramePacer) that maps a
//! host refresh rate and a target frame rate onto update and render ticks.
//!
//! **[`runtime`]**: A [`Runtime`](runtime::Runtime) context owning stages and
//! other per-frame participants.
//!
//! **[`time`]**, **[`timing`]**, **[`clock`]**: Nanosecond host time, the
//! driver [`FrameTick`](timing::FrameTick), and the clocks used to
//! timestamp trace phases.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod clock;
pub mod config;
pub mod dirty;
pub mod error;
pub mod event;
pub mod filter;
pub mod geom;
pub mod node;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod stage;
pub mod time;
pub mod timing;
pub mod trace;
