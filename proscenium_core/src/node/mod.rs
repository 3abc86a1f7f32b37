// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph data model.
//!
//! A *node* is an element of a stage's display tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed.
//! - Capabilities: a node is either a **container** (ordered children,
//!   a `mouse_children` policy) or a **leaf** carrying [`Content`]. Any
//!   node may be clipped by a shape **mask**, and any staged node may be the
//!   scene's **drag** target.
//! - **Local properties** set by the caller: nine transform attributes,
//!   alpha, visibility, pointer flags, filters, name.
//! - **Computed properties** produced by [`update`](Scene::update): the
//!   local matrix, the composed matrix, composed alpha, and the composed
//!   filter chain.
//!
//! All nodes of a stage live in one [`Scene`] arena. Parent and stage
//! relations are plain handles; ownership runs from a container to its
//! children.
//!
//! # Dirty tracking
//!
//! Setters mark per-node [`DirtyFlags`](crate::dirty::DirtyFlags). The
//! update pass consumes them top-down and hands each node's applied flags to
//! its children, so a parent's change recomposes the whole subtree exactly
//! once.

mod bounds;
mod content;
mod dispatch;
mod drag;
mod id;
mod props;
mod render;
mod store;
mod update;

pub use content::{BitmapContent, Content};
pub use id::{NodeId, TextureId};
pub use store::Scene;
pub use update::FrameChanges;
