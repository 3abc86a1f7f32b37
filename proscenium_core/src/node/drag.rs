// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-following drag.
//!
//! A scene has at most one drag target. The stage steps it once per update
//! with the last known pointer position.

use kurbo::{Point, Rect, Vec2};

use crate::error::{SceneError, SceneResult};

use super::id::NodeId;
use super::store::Scene;

#[derive(Clone, Copy, Debug)]
pub(crate) struct DragState {
    pub(crate) target: NodeId,
    lock_center: bool,
    bounds: Option<Rect>,
    /// Node position minus pointer, captured on the first step.
    grab_offset: Option<Vec2>,
}

impl Scene {
    /// Makes `id` follow the pointer, replacing any current drag target.
    ///
    /// With `lock_center`, the node's position snaps to the pointer.
    /// Otherwise the offset between node and pointer at the first step is
    /// kept. `bounds` (in the parent's space) limits the position.
    ///
    /// # Errors
    ///
    /// - [`SceneError::StaleNode`] if the handle is stale.
    /// - [`SceneError::NotOnStage`] if the node is not on stage.
    pub fn start_drag(
        &mut self,
        id: NodeId,
        lock_center: bool,
        bounds: Option<Rect>,
    ) -> SceneResult<()> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleNode(id));
        }
        if !self.is_on_stage(id) {
            tracing::warn!(?id, "drag refused: node is not on stage");
            return Err(SceneError::NotOnStage(id));
        }
        self.drag = Some(DragState {
            target: id,
            lock_center,
            bounds: bounds.map(|b| b.abs()),
            grab_offset: None,
        });
        Ok(())
    }

    /// Stops dragging `id`. Returns `false` if it was not the drag target.
    pub fn stop_drag(&mut self, id: NodeId) -> bool {
        if self.drag_target() == Some(id) {
            self.drag = None;
            true
        } else {
            false
        }
    }

    /// The current drag target.
    #[must_use]
    pub fn drag_target(&self) -> Option<NodeId> {
        self.drag.as_ref().map(|d| d.target)
    }

    /// Moves the drag target toward the global pointer position.
    ///
    /// A target that has left the stage or been destroyed is dropped.
    pub fn step_drag(&mut self, pointer: Point) {
        let Some(mut drag) = self.drag else {
            return;
        };
        if !self.is_on_stage(drag.target) {
            self.drag = None;
            return;
        }
        let parent_point = match self.parent(drag.target) {
            Some(parent) => self.global_to_local(parent, pointer),
            None => Some(pointer),
        };
        let Some(parent_point) = parent_point else {
            return;
        };

        let target = drag.target;
        let mut position = if drag.lock_center {
            parent_point
        } else {
            let offset = *drag
                .grab_offset
                .get_or_insert_with(|| self.position(target) - parent_point);
            parent_point + offset
        };
        if let Some(b) = drag.bounds {
            position.x = position.x.clamp(b.x0, b.x1);
            position.y = position.y.clamp(b.y0, b.y1);
        }
        self.drag = Some(drag);
        self.set_position(target, position);
    }
}
