// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node dirty flags.
//!
//! Setters record what changed in a node's *pending* flags. The update pass
//! consumes them in parent-before-child order:
//!
//! - **Composition**: [`MATRIX`](DirtyFlags::MATRIX),
//!   [`ALPHA`](DirtyFlags::ALPHA) and [`FILTERS`](DirtyFlags::FILTERS) are
//!   inherited. A node recomposes a property when its own flag is pending or
//!   when its parent recomposed that property earlier in the same pass.
//!   Inheritance happens during the walk, so setters only ever touch the
//!   node they modify.
//!
//! - **Content**: [`DATA`](DirtyFlags::DATA) is local-only. Leaves with
//!   bitmap content clear it themselves when the pass reports the refresh.
//!
//! A separate *parent changed* marker, set whenever a node is attached to a
//! new parent, forces every composition flag on the node's next update.

use bitflags::bitflags;

bitflags! {
    /// What changed on a node since its last update.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// A transform attribute changed; the local matrix must be rebuilt.
        const MATRIX = 1 << 0;
        /// Alpha changed.
        const ALPHA = 1 << 1;
        /// The filter list changed.
        const FILTERS = 1 << 2;
        /// Leaf content changed.
        const DATA = 1 << 3;

        /// Flags that flow from parent to child during the update pass.
        const COMPOSITION = Self::MATRIX.bits() | Self::ALPHA.bits() | Self::FILTERS.bits();
    }
}

impl DirtyFlags {
    /// Flags a freshly created node starts with.
    pub const INITIAL: Self = Self::MATRIX.union(Self::ALPHA);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_excludes_data() {
        assert!(DirtyFlags::COMPOSITION.contains(DirtyFlags::MATRIX));
        assert!(DirtyFlags::COMPOSITION.contains(DirtyFlags::FILTERS));
        assert!(!DirtyFlags::COMPOSITION.contains(DirtyFlags::DATA));
    }

    #[test]
    fn initial_flags() {
        assert_eq!(DirtyFlags::INITIAL, DirtyFlags::MATRIX | DirtyFlags::ALPHA);
    }
}
