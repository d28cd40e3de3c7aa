//! Structural cleanup: placeholders the builder leaves behind, redundant
//! wrappers, and the layout of `init` functions.

use pygo_ir::{MetaFlags, NodeId, NodeKind, SlotValue, Token};

use crate::scoping::has_results;
use crate::walk::{Cx, Pass, Rewrite};

/// The plain scoped walk: applies the declaration and result-inference
/// rules without rewriting anything itself.
pub(crate) struct ScopeResolution;

impl Pass for ScopeResolution {
    fn name(&self) -> &'static str {
        "ScopeResolution"
    }

    fn scoped(&self) -> bool {
        true
    }
}

/// Hoist a walrus out of its expression.
///
/// The assignment moves into the init slot of the statement the
/// expression sits in (and, for loops, repeats as the post statement), or
/// in front of that statement when it has no init slot. The expression
/// itself becomes the assigned name.
pub(crate) struct InitStmt;

impl InitStmt {
    /// Nearest `if`/`for`/`switch` the expression belongs to, without
    /// crossing a statement list.
    fn owner(cx: &Cx<'_>) -> Option<NodeId> {
        for ancestor in cx.ancestors() {
            match cx.arena.kind(ancestor) {
                NodeKind::IfStmt { .. }
                | NodeKind::ForStmt { .. }
                | NodeKind::SwitchStmt { .. }
                | NodeKind::TypeSwitchStmt { .. } => return Some(ancestor),
                NodeKind::BlockStmt { .. }
                | NodeKind::CaseClause { .. }
                | NodeKind::FuncLit { .. }
                | NodeKind::FuncDecl { .. } => return None,
                _ => {}
            }
        }
        None
    }

    /// Add `assign` to slot `slot` of `owner`, merging with an assignment
    /// already there.
    fn merge_into(cx: &mut Cx<'_>, owner: NodeId, slot: usize, assign: NodeId) {
        let existing = match cx.arena.kind(owner).slot(slot) {
            Some(SlotValue::One(existing)) => existing,
            _ => return,
        };
        let NodeKind::AssignStmt { lhs, rhs, .. } = cx.arena.kind(assign).clone() else {
            return;
        };
        if !matches!(cx.arena.get(existing), Some(NodeKind::AssignStmt { .. })) {
            cx.arena.kind_mut(owner).set_slot(slot, SlotValue::One(assign));
            return;
        }
        if let NodeKind::AssignStmt {
            lhs: into_lhs,
            rhs: into_rhs,
            ..
        } = cx.arena.kind_mut(existing)
        {
            into_lhs.extend(lhs);
            into_rhs.extend(rhs);
        }
    }
}

impl Pass for InitStmt {
    fn name(&self) -> &'static str {
        "InitStmt"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if !matches!(cx.arena.kind(id), NodeKind::BadExpr) {
            return Rewrite::Keep;
        }
        let Some(assign) = cx.arena.meta(id).and_then(|m| m.named) else {
            return Rewrite::Keep;
        };
        let Some(NodeKind::AssignStmt { lhs, rhs, .. }) = cx.arena.get(assign) else {
            return Rewrite::Keep;
        };
        let (lhs, rhs) = (lhs.clone(), rhs.clone());
        let Some(&name) = lhs.first() else {
            return Rewrite::Keep;
        };

        match Self::owner(cx) {
            Some(owner) => {
                Self::merge_into(cx, owner, 0, assign);
                if matches!(cx.arena.kind(owner), NodeKind::ForStmt { .. }) {
                    let again_lhs = lhs.iter().map(|&l| cx.arena.deep_copy(l)).collect();
                    let again_rhs = rhs.iter().map(|&r| cx.arena.deep_copy(r)).collect();
                    let again = cx.arena.assign(again_lhs, Token::Assign, again_rhs);
                    Self::merge_into(cx, owner, 2, again);
                }
            }
            None => {
                if !cx.insert_before(assign) {
                    tracing::debug!(assign = %cx.arena.sketch(assign), "walrus outside any statement list");
                }
            }
        }
        Rewrite::Replace(cx.arena.deep_copy(name))
    }
}

/// Named map results start out `nil`; make them before the body writes
/// to them, unless the body assigns them itself.
pub(crate) struct InitializeNamedParamMaps;

impl Pass for InitializeNamedParamMaps {
    fn name(&self) -> &'static str {
        "InitializeNamedParamMaps"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let (ty, body) = match cx.arena.kind(id) {
            NodeKind::FuncDecl { ty, body, .. } | NodeKind::FuncLit { ty, body } => (*ty, *body),
            _ => return Rewrite::Keep,
        };
        let Some(NodeKind::FuncType { results, .. }) = cx.arena.get(ty) else {
            return Rewrite::Keep;
        };
        let Some(NodeKind::FieldList { list }) = cx.arena.get(*results) else {
            return Rewrite::Keep;
        };
        let mut maps = Vec::new();
        for &field in list {
            if let Some(NodeKind::Field { names, ty }) = cx.arena.get(field) {
                if matches!(cx.arena.get(*ty), Some(NodeKind::MapType { .. })) {
                    maps.extend(names.iter().map(|&name| (name, *ty)));
                }
            }
        }
        let assigned = assigned_names(cx, body);
        maps.retain(|&(name, _)| {
            cx.arena
                .ident_name(name)
                .is_some_and(|name| !assigned.iter().any(|a| a == name))
        });
        let mut inits = Vec::with_capacity(maps.len());
        for (name, ty) in maps {
            let target = cx.arena.deep_copy(name);
            let map_ty = cx.arena.deep_copy(ty);
            let make = cx.arena.call_path("make", vec![map_ty]);
            inits.push(cx.arena.assign(vec![target], Token::Assign, vec![make]));
        }
        if inits.is_empty() {
            return Rewrite::Keep;
        }
        if let NodeKind::BlockStmt { list } = cx.arena.kind_mut(body) {
            list.splice(0..0, inits);
        }
        Rewrite::Keep
    }
}

/// Names plainly assigned by statements directly in `block`.
fn assigned_names(cx: &Cx<'_>, block: NodeId) -> Vec<String> {
    let Some(NodeKind::BlockStmt { list }) = cx.arena.get(block) else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for &stmt in list {
        if let Some(NodeKind::AssignStmt {
            lhs,
            tok: Token::Assign,
            ..
        }) = cx.arena.get(stmt)
        {
            names.extend(lhs.iter().filter_map(|&l| cx.arena.ident_name(l)).map(str::to_owned));
        }
    }
    names
}

/// `switch x.(type)` → `switch x := x.(type)` when the clauses use `x`,
/// so that each clause sees it at the clause type.
pub(crate) struct TypeSwitchStatementsRedeclareWithType;

impl Pass for TypeSwitchStatementsRedeclareWithType {
    fn name(&self) -> &'static str {
        "TypeSwitchStatementsRedeclareWithType"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::TypeSwitchStmt { assign, body, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let (assign, body) = (*assign, *body);
        let Some(NodeKind::ExprStmt { x: assert }) = cx.arena.get(assign) else {
            return Rewrite::Keep;
        };
        let assert = *assert;
        let Some(NodeKind::TypeAssertExpr { x, .. }) = cx.arena.get(assert) else {
            return Rewrite::Keep;
        };
        let Some(name) = cx.arena.ident_name(*x).map(str::to_owned) else {
            return Rewrite::Keep;
        };
        let used = cx
            .arena
            .descendants(body)
            .into_iter()
            .any(|node| cx.arena.is_ident(node, &name));
        if !used {
            return Rewrite::Keep;
        }
        let target = cx.arena.ident(&name);
        cx.arena.set_kind(
            assign,
            NodeKind::AssignStmt {
                lhs: vec![target],
                tok: Token::Define,
                rhs: vec![assert],
            },
        );
        Rewrite::Keep
    }
}

/// `func f() { func() { body }() }` → `func f() { body }`
pub(crate) struct RemoveUnnecessaryFunctionLiterals;

impl RemoveUnnecessaryFunctionLiterals {
    /// Body of `func() { ... }()` when `stmt` is exactly that call.
    fn wrapped_body(cx: &Cx<'_>, stmt: NodeId) -> Option<Vec<NodeId>> {
        let NodeKind::ExprStmt { x } = cx.arena.get(stmt)? else {
            return None;
        };
        let NodeKind::CallExpr { fun, args, .. } = cx.arena.get(*x)? else {
            return None;
        };
        if !args.is_empty() {
            return None;
        }
        let NodeKind::FuncLit { ty, body } = cx.arena.get(*fun)? else {
            return None;
        };
        let NodeKind::FuncType { params, results } = cx.arena.get(*ty)? else {
            return None;
        };
        if has_results(cx.arena, *params) || has_results(cx.arena, *results) {
            return None;
        }
        match cx.arena.get(*body)? {
            NodeKind::BlockStmt { list } => Some(list.clone()),
            _ => None,
        }
    }
}

impl Pass for RemoveUnnecessaryFunctionLiterals {
    fn name(&self) -> &'static str {
        "RemoveUnnecessaryFunctionLiterals"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let (ty, body) = match cx.arena.kind(id) {
            NodeKind::FuncDecl { ty, body, .. } | NodeKind::FuncLit { ty, body } => (*ty, *body),
            _ => return Rewrite::Keep,
        };
        // A `return` inside the literal only leaves the literal.
        if let Some(NodeKind::FuncType { results, .. }) = cx.arena.get(ty) {
            if has_results(cx.arena, *results) {
                return Rewrite::Keep;
            }
        }
        let Some(NodeKind::BlockStmt { list }) = cx.arena.get(body) else {
            return Rewrite::Keep;
        };
        let [only] = list[..] else {
            return Rewrite::Keep;
        };
        if let Some(inner) = Self::wrapped_body(cx, only) {
            cx.arena.set_kind(body, NodeKind::BlockStmt { list: inner });
        }
        Rewrite::Keep
    }
}

/// Functions started with `go` return nothing.
pub(crate) struct RemoveGoCallReturns;

impl Pass for RemoveGoCallReturns {
    fn name(&self) -> &'static str {
        "RemoveGoCallReturns"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::GoStmt { call }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let Some(NodeKind::CallExpr { fun, .. }) = cx.arena.get(*call) else {
            return Rewrite::Keep;
        };
        let Some(NodeKind::FuncLit { ty, .. }) = cx.arena.get(*fun) else {
            return Rewrite::Keep;
        };
        let ty = *ty;
        if let Some(NodeKind::FuncType { results, .. }) = cx.arena.get(ty) {
            if results.is_valid() {
                cx.arena
                    .kind_mut(ty)
                    .set_slot(1, SlotValue::One(NodeId::INVALID));
            }
        }
        Rewrite::Keep
    }
}

/// Drop the `global`/`nonlocal` placeholders once scoping has read them.
pub(crate) struct RemoveBadStmt;

impl Pass for RemoveBadStmt {
    fn name(&self) -> &'static str {
        "RemoveBadStmt"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::BadStmt => Rewrite::Remove,
            _ => Rewrite::Keep,
        }
    }
}

fn is_init(cx: &Cx<'_>, decl: NodeId) -> bool {
    matches!(cx.arena.get(decl), Some(NodeKind::FuncDecl { name, recv, .. }) if name == "init" && !recv.is_valid())
}

fn body_list(cx: &Cx<'_>, func: NodeId) -> Vec<NodeId> {
    match cx.arena.get(func) {
        Some(NodeKind::FuncDecl { body, .. }) => match cx.arena.get(*body) {
            Some(NodeKind::BlockStmt { list }) => list.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Adjacent `func init()`s merge into one, declarations move above them,
/// and empty ones go.
pub(crate) struct MergeAdjacentInits;

impl Pass for MergeAdjacentInits {
    fn name(&self) -> &'static str {
        "MergeAdjacentInits"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::File { decls, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let mut decls = decls.clone();
        let before = decls.clone();
        let mut i = 0;
        while i + 1 < decls.len() {
            let (cur, next) = (decls[i], decls[i + 1]);
            if !is_init(cx, cur) {
                i += 1;
                continue;
            }
            if is_init(cx, next) {
                let moved = body_list(cx, next);
                if let Some(NodeKind::FuncDecl { body, .. }) = cx.arena.get(cur) {
                    let body = *body;
                    if let NodeKind::BlockStmt { list } = cx.arena.kind_mut(body) {
                        list.extend(moved);
                    }
                }
                let flags = cx.arena.meta(next).map(|m| m.flags).unwrap_or_default();
                if flags.contains(MetaFlags::GLOBAL_CODE) {
                    cx.arena.meta_mut(cur).flags |= MetaFlags::GLOBAL_CODE;
                }
                decls.remove(i + 1);
            } else if matches!(cx.arena.get(next), Some(NodeKind::GenDecl { .. })) {
                decls.swap(i, i + 1);
                i += 1;
            } else {
                i += 1;
            }
        }
        decls.retain(|&decl| !is_init(cx, decl) || !body_list(cx, decl).is_empty());
        if decls != before {
            cx.arena.kind_mut(id).set_slot(0, SlotValue::Many(decls));
        }
        Rewrite::Keep
    }
}

/// Drop `func init() { if __name__ == "__main__" { ... } }`: Go runs
/// `main` on its own.
pub(crate) struct RemoveIfNameEqualsMain;

impl RemoveIfNameEqualsMain {
    fn is_main_guard(cx: &Cx<'_>, cond: NodeId) -> bool {
        let Some(NodeKind::BinaryExpr {
            x,
            op: Token::Eql,
            y,
        }) = cx.arena.get(cond)
        else {
            return false;
        };
        let literal = |id: NodeId, text: &str| {
            matches!(cx.arena.get(id), Some(NodeKind::BasicLit { kind: Token::String, value }) if value == text)
        };
        (cx.arena.is_ident(*x, "__name__") && literal(*y, "\"__main__\""))
            || (literal(*x, "\"__main__\"") && cx.arena.is_ident(*y, "__name__"))
    }
}

impl Pass for RemoveIfNameEqualsMain {
    fn name(&self) -> &'static str {
        "RemoveIfNameEqualsMain"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if !is_init(cx, id) {
            return Rewrite::Keep;
        }
        let [only] = body_list(cx, id)[..] else {
            return Rewrite::Keep;
        };
        match cx.arena.get(only) {
            Some(NodeKind::IfStmt { cond, .. }) if Self::is_main_guard(cx, *cond) => {
                tracing::debug!("dropping __main__ guard");
                Rewrite::Remove
            }
            _ => Rewrite::Keep,
        }
    }
}
