// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame pacing.
//!
//! The host driver ticks at its refresh rate. A stage usually wants fewer
//! frames than that, so the [`FramePacer`] spreads one frame over several
//! ticks: the update pass runs on one tick and the render walk on the next,
//! with any remaining ticks of the cycle left idle.
//!
//! ```text
//!   60 Hz driver, 60 fps:   UR UR UR UR ...
//!   60 Hz driver, 30 fps:   U  R  U  R  ...
//!   60 Hz driver, 20 fps:   U  R  .  U  R  .  ...
//! ```

/// Pacing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacerConfig {
    /// Host driver ticks per second.
    pub refresh_rate: u32,
    /// Requested frames per second.
    pub frame_rate: u32,
}

impl PacerConfig {
    /// A 60 Hz driver targeting `frame_rate`.
    #[must_use]
    pub const fn at_60hz(frame_rate: u32) -> Self {
        Self {
            refresh_rate: 60,
            frame_rate,
        }
    }
}

/// What the next tick does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacerState {
    /// Waiting out the idle ticks at the end of a cycle.
    Idle,
    /// The next tick runs the update pass.
    UpdatePending,
    /// The next tick runs the render walk.
    RenderPending,
}

/// Work scheduled for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameWork {
    /// Update, then render, in the same tick.
    UpdateAndRender,
    /// Update only.
    Update,
    /// Render only.
    Render,
    /// Nothing.
    Idle,
}

impl FrameWork {
    /// Whether the update pass runs.
    #[must_use]
    pub const fn updates(self) -> bool {
        matches!(self, Self::UpdateAndRender | Self::Update)
    }

    /// Whether the render walk runs.
    #[must_use]
    pub const fn renders(self) -> bool {
        matches!(self, Self::UpdateAndRender | Self::Render)
    }
}

/// Maps driver ticks onto update and render work.
///
/// `skip = max(0, floor(refresh_rate / frame_rate) - 1)`. With `skip == 0`
/// every tick updates and renders. Otherwise a cycle lasts `skip + 1` ticks:
/// update, render, then `skip - 1` idle ticks.
#[derive(Clone, Debug)]
pub struct FramePacer {
    refresh_rate: u32,
    skip: u32,
    state: PacerState,
    idle_left: u32,
}

impl FramePacer {
    /// Creates a pacer. The first tick of a paced cycle always updates.
    #[must_use]
    pub fn new(config: PacerConfig) -> Self {
        let mut pacer = Self {
            refresh_rate: config.refresh_rate.max(1),
            skip: 0,
            state: PacerState::UpdatePending,
            idle_left: 0,
        };
        pacer.set_frame_rate(config.frame_rate);
        pacer
    }

    /// Changes the target frame rate and restarts the cycle.
    ///
    /// A rate of zero or above the refresh rate runs every tick.
    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        self.skip = if frame_rate == 0 {
            0
        } else {
            (self.refresh_rate / frame_rate).saturating_sub(1)
        };
        self.state = PacerState::UpdatePending;
        self.idle_left = 0;
    }

    /// The effective frame rate, `refresh_rate / (skip + 1)`.
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        f64::from(self.refresh_rate) / f64::from(self.skip + 1)
    }

    /// Ticks skipped per cycle.
    #[must_use]
    pub fn skip(&self) -> u32 {
        self.skip
    }

    /// The pending state.
    #[must_use]
    pub fn state(&self) -> PacerState {
        self.state
    }

    /// Consumes one driver tick.
    pub fn advance(&mut self) -> FrameWork {
        if self.skip == 0 {
            return FrameWork::UpdateAndRender;
        }
        match self.state {
            PacerState::UpdatePending => {
                self.state = PacerState::RenderPending;
                FrameWork::Update
            }
            PacerState::RenderPending => {
                self.idle_left = self.skip - 1;
                self.state = if self.idle_left == 0 {
                    PacerState::UpdatePending
                } else {
                    PacerState::Idle
                };
                FrameWork::Render
            }
            PacerState::Idle => {
                self.idle_left = self.idle_left.saturating_sub(1);
                if self.idle_left == 0 {
                    self.state = PacerState::UpdatePending;
                }
                FrameWork::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pacer: &mut FramePacer, ticks: usize) -> Vec<FrameWork> {
        (0..ticks).map(|_| pacer.advance()).collect()
    }

    #[test]
    fn sixty_fps_updates_and_renders_every_tick() {
        let mut pacer = FramePacer::new(PacerConfig::at_60hz(60));
        assert_eq!(pacer.skip(), 0);
        assert!(
            run(&mut pacer, 4)
                .iter()
                .all(|w| *w == FrameWork::UpdateAndRender)
        );
        assert!((pacer.frame_rate() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn thirty_fps_alternates_update_then_render() {
        let mut pacer = FramePacer::new(PacerConfig::at_60hz(30));
        let work = run(&mut pacer, 4);
        assert_eq!(
            work,
            [
                FrameWork::Update,
                FrameWork::Render,
                FrameWork::Update,
                FrameWork::Render
            ]
        );
        let updates = work.iter().filter(|w| w.updates()).count();
        let renders = work.iter().filter(|w| w.renders()).count();
        assert_eq!((updates, renders), (2, 2));
        assert!((pacer.frame_rate() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn twenty_fps_idles_once_per_cycle() {
        let mut pacer = FramePacer::new(PacerConfig::at_60hz(20));
        assert_eq!(
            run(&mut pacer, 6),
            [
                FrameWork::Update,
                FrameWork::Render,
                FrameWork::Idle,
                FrameWork::Update,
                FrameWork::Render,
                FrameWork::Idle
            ]
        );
    }

    #[test]
    fn rate_change_restarts_cycle() {
        let mut pacer = FramePacer::new(PacerConfig::at_60hz(30));
        assert_eq!(pacer.advance(), FrameWork::Update);
        pacer.set_frame_rate(15);
        assert_eq!(pacer.skip(), 3);
        assert_eq!(pacer.state(), PacerState::UpdatePending);
        assert_eq!(pacer.advance(), FrameWork::Update);

        pacer.set_frame_rate(0);
        assert_eq!(pacer.advance(), FrameWork::UpdateAndRender);
        pacer.set_frame_rate(240);
        assert_eq!(pacer.skip(), 0);
    }

    #[test]
    fn odd_rates_round_down_the_skip() {
        // 60 / 25 = 2 -> skip 1 -> effective 30 fps.
        let pacer = FramePacer::new(PacerConfig::at_60hz(25));
        assert_eq!(pacer.skip(), 1);
        assert!((pacer.frame_rate() - 30.0).abs() < 1e-9);
    }
}
