//! Narrowing `interface{}` toward the one concrete type its sources agree
//! on.
//!
//! Every narrowable `interface{}` node carries the expressions whose types
//! should decide it (`Meta::elts`): values assigned to a variable, values
//! returned from a function, arguments passed for a parameter, keys used to
//! index a map. Once all of those with a known type agree, the node is
//! rewritten in place. Sources that disagree pin it as `interface{}` for
//! good.

use pygo_ir::{GoType, MetaFlags, NodeId, NodeKind};
use pygo_types::{ScopeId, TypeCx};
use rustc_hash::FxHashMap;

use crate::scoping::is_narrowable;
use crate::walk::{Cx, Pass, Rewrite};

/// `m[k]` on a map keyed by `interface{}` makes `k` a narrowing source of
/// the key type.
pub(crate) struct IndexExpressionsHelpTypeMaps;

impl Pass for IndexExpressionsHelpTypeMaps {
    fn name(&self) -> &'static str {
        "IndexExpressionsHelpTypeMaps"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::IndexExpr { x, index }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let index = *index;
        let decl = cx.type_node(*x);
        let Some(NodeKind::MapType { key, .. }) = cx.arena.get(decl) else {
            return Rewrite::Keep;
        };
        let key = *key;
        if is_narrowable(cx.arena, key) {
            let meta = cx.arena.meta_mut(key);
            if !meta.elts.contains(&index) {
                meta.elts.push(index);
            }
        }
        Rewrite::Keep
    }
}

/// Rewrite each narrowable `interface{}` to the type its sources agree on.
///
/// Sources are typed in the scope they were found in. A `nil` source says
/// nothing about the type. Sources whose type is unknown, or still holds an
/// `interface{}`, are skipped for this round.
#[derive(Default)]
pub(crate) struct NarrowInterfaceTypes {
    /// Narrowable interfaces by source expression.
    sources: FxHashMap<NodeId, Vec<NodeId>>,
    /// Interfaces in tree order.
    interfaces: Vec<NodeId>,
    /// Scope each source was seen in.
    seen: FxHashMap<NodeId, ScopeId>,
}

impl NarrowInterfaceTypes {
    /// Concrete types of the sources of `interface`, in source order.
    /// `None` when some typed source still holds an `interface{}`.
    fn source_types(&self, cx: &Cx<'_>, interface: NodeId) -> Option<Vec<GoType>> {
        let elts = cx.arena.meta(interface).map(|m| m.elts.clone())?;
        let mut types = Vec::new();
        for elt in elts {
            if cx.arena.is_ident(elt, "nil") {
                continue;
            }
            let Some(&scope) = self.seen.get(&elt) else {
                continue;
            };
            let Some(ty) = TypeCx::new(cx.arena, &cx.scopes, scope).type_of(elt) else {
                continue;
            };
            if ty.contains_any() {
                return None;
            }
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        Some(types)
    }
}

impl Pass for NarrowInterfaceTypes {
    fn name(&self) -> &'static str {
        "NarrowInterfaceTypes"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn enter(&mut self, cx: &mut Cx<'_>, id: NodeId) {
        if !matches!(cx.arena.kind(id), NodeKind::File { .. }) {
            return;
        }
        for node in cx.arena.descendants(id) {
            if !is_narrowable(cx.arena, node) {
                continue;
            }
            let Some(meta) = cx.arena.meta(node) else {
                continue;
            };
            if meta.elts.is_empty() {
                continue;
            }
            for &elt in &meta.elts {
                self.sources.entry(elt).or_default().push(node);
            }
            self.interfaces.push(node);
        }
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if self.sources.contains_key(&id) {
            self.seen.insert(id, cx.scope);
        }
        Rewrite::Keep
    }

    fn finish(&mut self, cx: &mut Cx<'_>) {
        for &interface in &self.interfaces {
            // An earlier rewrite in this loop may have replaced it.
            if !is_narrowable(cx.arena, interface) {
                continue;
            }
            let Some(types) = self.source_types(cx, interface) else {
                continue;
            };
            match &types[..] {
                [] => {}
                [ty] => cx.retype(interface, ty),
                _ => {
                    tracing::debug!(
                        types = ?types.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "sources disagree; keeping interface{{}}"
                    );
                    cx.arena.meta_mut(interface).flags |= MetaFlags::PERMANENT_INTERFACE;
                }
            }
        }
    }
}
