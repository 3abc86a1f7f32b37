// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time sources for frame-loop instrumentation.
//!
//! The stage timestamps its phases through a [`Clock`]. Real drivers use
//! [`MonotonicClock`]; tests and deterministic replays use [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::time::{Duration, HostTime};

/// Reads the current host time.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> HostTime;
}

/// Wall-clock monotonic time measured from the clock's creation.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u64 nanoseconds cover centuries of uptime"
    )]
    fn now(&self) -> HostTime {
        HostTime(self.origin.elapsed().as_nanos() as u64)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle after boxing
/// the clock into a stage.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Starts a clock at `start`.
    #[must_use]
    pub fn new(start: HostTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start.0)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.0);
    }

    /// Jumps to an absolute time.
    pub fn set(&self, to: HostTime) {
        self.now.set(to.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        HostTime(self.now.get())
    }
}
