// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime context.
//!
//! A [`Runtime`] owns every live stage plus any other per-frame participants
//! (tween engines, sound mixers, network pumps) and forwards each driver tick
//! to them. There is no process-global registry: hosts create a runtime and
//! drive it from their refresh callback.

use core::fmt;

use crate::scheduler::FrameWork;
use crate::stage::Stage;
use crate::timing::FrameTick;

/// Identifies a stage owned by a [`Runtime`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageId(u64);

impl fmt::Debug for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StageId({})", self.0)
    }
}

/// Identifies a participant registered with a [`Runtime`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(u64);

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({})", self.0)
    }
}

/// Something that wants to run once per driver tick.
pub trait FrameParticipant {
    /// Called once per tick, before any stage is flushed.
    fn on_frame(&mut self, tick: &FrameTick);
}

/// Owns stages and participants and fans driver ticks out to them.
#[derive(Default)]
pub struct Runtime {
    stages: Vec<(StageId, Stage)>,
    participants: Vec<(ParticipantId, Box<dyn FrameParticipant>)>,
    next_id: u64,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("stages", &self.stages.len())
            .field("participants", &self.participants.len())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Takes ownership of a stage.
    pub fn add_stage(&mut self, stage: Stage) -> StageId {
        let id = StageId(self.next());
        self.stages.push((id, stage));
        id
    }

    /// A stage, if it is still alive.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|(s, _)| *s == id).map(|(_, st)| st)
    }

    /// A stage, mutably.
    pub fn stage_mut(&mut self, id: StageId) -> Option<&mut Stage> {
        self.stages
            .iter_mut()
            .find(|(s, _)| *s == id)
            .map(|(_, st)| st)
    }

    /// Stops driving a stage and hands it back. Returns `None` if it was
    /// already killed.
    pub fn kill_stage(&mut self, id: StageId) -> Option<Stage> {
        let pos = self.stages.iter().position(|(s, _)| *s == id)?;
        Some(self.stages.remove(pos).1)
    }

    /// Number of live stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Registers a participant.
    pub fn register(&mut self, participant: Box<dyn FrameParticipant>) -> ParticipantId {
        let id = ParticipantId(self.next());
        self.participants.push((id, participant));
        id
    }

    /// Unregisters a participant. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ParticipantId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|(p, _)| *p != id);
        self.participants.len() != before
    }

    /// Ticks every participant, then flushes every stage, each in
    /// registration order. Returns the work each stage ran.
    pub fn flush_all(&mut self, tick: FrameTick) -> Vec<(StageId, FrameWork)> {
        for (_, p) in &mut self.participants {
            p.on_frame(&tick);
        }
        self.stages
            .iter_mut()
            .map(|(id, stage)| (*id, stage.flush(tick)))
            .collect()
    }

    /// Drops every stage and participant.
    pub fn shutdown(&mut self) {
        tracing::debug!(
            stages = self.stages.len(),
            participants = self.participants.len(),
            "runtime shutdown"
        );
        self.stages.clear();
        self.participants.clear();
    }
}
