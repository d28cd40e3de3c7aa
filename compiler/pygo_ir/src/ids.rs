//! Node handles for the Go syntax arena.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Index into a [`GoArena`](crate::GoArena).
///
/// Optional children (no `else` branch, no `init` statement, no result
/// list) are stored as [`NodeId::INVALID`] rather than `Option<NodeId>`,
/// which keeps every node kind `Copy`-friendly and the slot layout flat.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel value indicating "no node".
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-sentinel) ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "NodeId::INVALID")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}
