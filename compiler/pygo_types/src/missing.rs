//! Deferred type resolution.
//!
//! When an expression's type depends on something not yet known (a call to
//! a function whose results have not been inferred, a generator whose
//! signature is still being rewritten), the walker records a
//! [`MissingType`] and carries on. Records are retried when the walk exits
//! the root scope; actions of resolved records are handed back to the
//! caller, which applies them.

use pygo_ir::{GoType, NodeId};

use crate::ScopeId;

/// A pending type-resolution entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MissingType<A> {
    /// Expression whose type is missing (usually the declared identifier).
    pub expr: NodeId,
    /// Expression the type will be derived from.
    pub source: NodeId,
    /// Scope the source is evaluated in.
    pub scope: ScopeId,
    /// Name bound by `expr`, if it declares one.
    pub name: Option<String>,
    /// What to do once the type is known.
    pub actions: Vec<A>,
}

/// The set of pending records for one walk.
#[derive(Clone, Debug)]
pub struct MissingTypes<A> {
    records: Vec<MissingType<A>>,
}

impl<A> Default for MissingTypes<A> {
    fn default() -> Self {
        MissingTypes {
            records: Vec::new(),
        }
    }
}

impl<A> MissingTypes<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: MissingType<A>) {
        tracing::trace!(expr = ?record.expr, source = ?record.source, "deferring type");
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn pending(&self) -> &[MissingType<A>] {
        &self.records
    }

    /// Remove every record `resolve` can type, returning them with their
    /// types in registration order. Unresolvable records stay pending.
    pub fn take_resolved(
        &mut self,
        mut resolve: impl FnMut(&MissingType<A>) -> Option<GoType>,
    ) -> Vec<(MissingType<A>, GoType)> {
        let mut resolved = Vec::new();
        let mut pending = Vec::new();
        for record in self.records.drain(..) {
            match resolve(&record) {
                Some(ty) => resolved.push((record, ty)),
                None => pending.push(record),
            }
        }
        self.records = pending;
        resolved
    }

    /// Drop all pending records, returning them.
    pub fn take_all(&mut self) -> Vec<MissingType<A>> {
        std::mem::take(&mut self.records)
    }
}
