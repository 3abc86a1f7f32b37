// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, Chrome trace export, and tree dumps for
//! proscenium diagnostics.
//!
//! This crate provides [`TraceSink`](proscenium_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! [`tree::dump`] renders a scene subtree as indented text.

pub mod chrome;
pub mod pretty;
pub mod recorder;
pub mod tree;
