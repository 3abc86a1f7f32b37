// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driver ticks.
//!
//! The host driver (a display-refresh callback or a fixed timer) produces one
//! [`FrameTick`] per refresh. The [`FramePacer`](crate::scheduler::FramePacer)
//! decides what each tick is used for.

use crate::time::HostTime;

/// One refresh opportunity delivered by the host driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonic tick counter.
    pub frame_index: u64,
}

impl FrameTick {
    /// Creates a tick.
    #[inline]
    #[must_use]
    pub const fn new(now: HostTime, frame_index: u64) -> Self {
        Self { now, frame_index }
    }

    /// The tick that follows this one, `interval` later.
    #[inline]
    #[must_use]
    pub fn next(self, interval: crate::time::Duration) -> Self {
        Self {
            now: self.now + interval,
            frame_index: self.frame_index + 1,
        }
    }
}
