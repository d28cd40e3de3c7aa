//! Arena storage for the Go syntax tree.
//!
//! Struct-of-arrays: node kinds, the inferred-type slot, and sparse
//! metadata live in parallel storage indexed by [`NodeId`]. Replaced nodes
//! are never freed; they become unreachable from the root, and every
//! whole-tree query walks from a root rather than scanning storage.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;

use crate::{GoType, Meta, NodeId, NodeKind};

/// Owning storage for one compilation's Go syntax tree.
#[derive(Clone, Debug, Default)]
pub struct GoArena {
    kinds: Vec<NodeKind>,
    types: Vec<Option<GoType>>,
    meta: FxHashMap<NodeId, Meta>,
}

impl GoArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its handle.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let index = u32::try_from(self.kinds.len()).unwrap_or(u32::MAX - 1);
        self.kinds.push(kind);
        self.types.push(None);
        NodeId::new(index)
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The node kind, or `None` for `INVALID` or out-of-range ids.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.kinds.get(id.index())
    }

    /// The node kind.
    ///
    /// # Panics
    /// If `id` is `INVALID` or was not allocated by this arena.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.kinds[id.index()]
    }

    /// Overwrite a node in place, keeping its id, type slot, and metadata.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.kinds[id.index()] = kind;
    }

    pub fn ty(&self, id: NodeId) -> Option<&GoType> {
        self.types.get(id.index()).and_then(Option::as_ref)
    }

    pub fn set_ty(&mut self, id: NodeId, ty: GoType) {
        if let Some(slot) = self.types.get_mut(id.index()) {
            *slot = Some(ty);
        }
    }

    pub fn clear_ty(&mut self, id: NodeId) {
        if let Some(slot) = self.types.get_mut(id.index()) {
            *slot = None;
        }
    }

    pub fn meta(&self, id: NodeId) -> Option<&Meta> {
        self.meta.get(&id)
    }

    /// Metadata for `id`, created empty on first access.
    pub fn meta_mut(&mut self, id: NodeId) -> &mut Meta {
        self.meta.entry(id).or_default()
    }

    /// Name of an `Ident` node.
    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match self.get(id)? {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Whether `id` is the identifier `name`.
    pub fn is_ident(&self, id: NodeId, name: &str) -> bool {
        self.ident_name(id) == Some(name)
    }

    /// Valid direct children of `id`.
    pub fn children(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        self.get(id).map(NodeKind::children).unwrap_or_default()
    }

    /// `id` and every node below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if self.get(next).is_none() {
                continue;
            }
            out.push(next);
            let children = self.children(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Copy the subtree rooted at `id` into fresh nodes. Types and
    /// metadata are copied along; metadata references are not remapped.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        if !id.is_valid() {
            return id;
        }
        let mut kind = self.kind(id).clone();
        for slot in kind.slots_mut() {
            match slot {
                crate::Slot::One(child) => *child = self.deep_copy(*child),
                crate::Slot::Many(children) => {
                    for child in children.iter_mut() {
                        *child = self.deep_copy(*child);
                    }
                }
            }
        }
        let copy = self.alloc(kind);
        if let Some(ty) = self.ty(id).cloned() {
            self.set_ty(copy, ty);
        }
        if let Some(meta) = self.meta(id).cloned() {
            self.meta.insert(copy, meta);
        }
        copy
    }

    /// Structural equality: same shape and same children, recursively.
    /// Types and metadata are ignored.
    pub fn structurally_eq(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (None, None) => true,
            (Some(ka), Some(kb)) => {
                if ka.shell() != kb.shell() {
                    return false;
                }
                let (ca, cb) = (ka.slots(), kb.slots());
                ca.iter().zip(cb.iter()).all(|pair| match pair {
                    (crate::SlotRef::One(x), crate::SlotRef::One(y)) => self.structurally_eq(*x, *y),
                    (crate::SlotRef::Many(xs), crate::SlotRef::Many(ys)) => {
                        xs.len() == ys.len()
                            && xs.iter().zip(ys.iter()).all(|(x, y)| self.structurally_eq(*x, *y))
                    }
                    _ => false,
                })
            }
            _ => false,
        }
    }

    /// Hash consistent with [`GoArena::structurally_eq`].
    pub fn structural_hash(&self, id: NodeId) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash_into(id, &mut hasher);
        hasher.finish()
    }

    fn hash_into(&self, id: NodeId, hasher: &mut FxHasher) {
        let Some(kind) = self.get(id) else {
            0u8.hash(hasher);
            return;
        };
        kind.shell().hash(hasher);
        for slot in kind.slots() {
            match slot {
                crate::SlotRef::One(child) => self.hash_into(child, hasher),
                crate::SlotRef::Many(children) => {
                    for &child in children {
                        self.hash_into(child, hasher);
                    }
                }
            }
        }
    }

    /// Number of `interface{}` type nodes reachable from `root`. This is
    /// the fixed-point driver's convergence metric.
    pub fn count_interfaces(&self, root: NodeId) -> usize {
        self.descendants(root)
            .into_iter()
            .filter(|&id| matches!(self.kind(id), NodeKind::InterfaceType))
            .count()
    }

    /// Compute parent links for the tree under `root`.
    pub fn parents(&self, root: NodeId) -> ParentMap {
        let mut map = FxHashMap::default();
        for id in self.descendants(root) {
            for child in self.children(id) {
                map.insert(child, id);
            }
        }
        ParentMap { map }
    }
}

/// Lookup-only parent links, recomputed on demand. Stale after any
/// structural rewrite.
#[derive(Clone, Debug, Default)]
pub struct ParentMap {
    map: FxHashMap<NodeId, NodeId>,
}

impl ParentMap {
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(&id).copied()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }
}

#[cfg(test)]
mod tests;
