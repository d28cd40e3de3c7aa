//! Call sites: argument order, iteration built-ins, template switches and
//! the types calls reveal about their callees.

use pygo_ir::{GoArena, GoType, NodeId, NodeKind, SlotValue, Token};

use super::{call_args, callee_name, method_call};
use crate::scoping::is_narrowable;
use crate::walk::{Cx, Pass, Rewrite};

/// Parameters of a `FuncType`, one `(name, type node)` per declared name.
/// Unnamed parameters have an empty name.
fn params(arena: &GoArena, func_type: NodeId) -> Vec<(String, NodeId)> {
    let Some(NodeKind::FuncType { params, .. }) = arena.get(func_type) else {
        return Vec::new();
    };
    let Some(NodeKind::FieldList { list }) = arena.get(*params) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &field in list {
        let Some(NodeKind::Field { names, ty }) = arena.get(field) else {
            continue;
        };
        if names.is_empty() {
            out.push((String::new(), *ty));
        }
        for &name in names {
            let name = arena.ident_name(name).unwrap_or_default();
            out.push((name.to_owned(), *ty));
        }
    }
    out
}

/// `len(name)`
fn len_of(arena: &mut GoArena, name: &str) -> NodeId {
    let x = arena.ident(name);
    arena.call_path("len", vec![x])
}

/// `arr[at]`
fn element(arena: &mut GoArena, at: &str) -> NodeId {
    let arr = arena.ident("arr");
    let at = arena.ident(at);
    arena.index(arr, at)
}

fn block_list(arena: &GoArena, block: NodeId) -> Vec<NodeId> {
    match arena.get(block) {
        Some(NodeKind::BlockStmt { list }) => list.clone(),
        _ => Vec::new(),
    }
}

/// The type switch a template literal consists of, if that is all it is.
fn lone_type_switch(arena: &GoArena, lit: NodeId) -> Option<NodeId> {
    let Some(NodeKind::FuncLit { body, .. }) = arena.get(lit) else {
        return None;
    };
    match block_list(arena, *body)[..] {
        [stmt] if matches!(arena.get(stmt), Some(NodeKind::TypeSwitchStmt { .. })) => Some(stmt),
        _ => None,
    }
}

/// Number of `interface{}` occurrences inside `ty`.
fn any_count(ty: &GoType) -> usize {
    match ty {
        GoType::Any => 1,
        GoType::Basic(_) | GoType::Named(_) | GoType::Qualified { .. } => 0,
        GoType::Slice(t) | GoType::Array(_, t) | GoType::Chan(_, t) | GoType::Pointer(t) => {
            any_count(t)
        }
        GoType::Map(k, v) => any_count(k) + any_count(v),
        GoType::Func(sig) => sig.params.iter().chain(&sig.results).map(any_count).sum(),
        GoType::Struct(fields) => fields.iter().map(|(_, t)| any_count(t)).sum(),
        GoType::Tuple(ts) => ts.iter().map(any_count).sum(),
    }
}

/// Fill in default arguments and put keyword arguments where their
/// parameters are.
///
/// The call is left alone when a keyword names no parameter or a required
/// argument is missing.
pub(crate) struct FillDefaultsAndSortKeywords;

impl FillDefaultsAndSortKeywords {
    fn fill(cx: &mut Cx<'_>, call: NodeId, func_type: NodeId) {
        let params = params(cx.arena, func_type);
        let defaults = cx
            .arena
            .meta(func_type)
            .map(|m| m.defaults.clone())
            .unwrap_or_default();
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for arg in call_args(cx.arena, call) {
            match cx.arena.meta(arg).and_then(|m| m.keyword.clone()) {
                Some(name) => keywords.push((name, arg)),
                None => positional.push(arg),
            }
        }
        let fixed = params
            .iter()
            .position(|(_, ty)| matches!(cx.arena.get(*ty), Some(NodeKind::Ellipsis { .. })))
            .unwrap_or(params.len());
        if keywords.is_empty() && (positional.len() >= fixed || defaults.is_empty()) {
            return;
        }
        if !keywords.is_empty() && positional.len() > fixed {
            return;
        }

        let mut slots: Vec<Option<NodeId>> = positional.into_iter().map(Some).collect();
        if slots.len() < fixed {
            slots.resize(fixed, None);
        }
        for (name, arg) in keywords {
            let Some(i) = params[..fixed].iter().position(|(p, _)| *p == name) else {
                tracing::debug!(keyword = %name, call = %cx.arena.sketch(call), "keyword names no parameter");
                return;
            };
            if slots[i].replace(arg).is_some() {
                return;
            }
        }
        for (i, slot) in slots.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let Some((name, _)) = params.get(i) else {
                continue;
            };
            if let Some(&(_, value)) = defaults.iter().find(|(d, _)| d == name) {
                *slot = Some(cx.arena.deep_copy(value));
            }
        }
        let Some(args) = slots.into_iter().collect::<Option<Vec<NodeId>>>() else {
            return;
        };
        for &arg in &args {
            if cx.arena.meta(arg).is_some_and(|m| m.keyword.is_some()) {
                cx.arena.meta_mut(arg).keyword = None;
            }
        }
        cx.arena.kind_mut(call).set_slot(1, SlotValue::Many(args));
    }

    fn has_keywords(cx: &Cx<'_>, call: NodeId) -> bool {
        call_args(cx.arena, call)
            .iter()
            .any(|&a| cx.arena.meta(a).is_some_and(|m| m.keyword.is_some()))
    }
}

impl Pass for FillDefaultsAndSortKeywords {
    fn name(&self) -> &'static str {
        "FillDefaultsAndSortKeywords"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::CallExpr { fun, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let fun = *fun;
        let func_type = cx.callee_type_node(fun);
        if func_type.is_valid() {
            Self::fill(cx, id, func_type);
        } else if Self::has_keywords(cx, id) {
            cx.defer_type(id, fun);
        }
        Rewrite::Keep
    }

    fn resolved(&mut self, cx: &mut Cx<'_>, node: NodeId, _ty: &GoType) {
        let Some(NodeKind::CallExpr { fun, .. }) = cx.arena.get(node) else {
            return;
        };
        let func_type = cx.callee_type_node(*fun);
        if func_type.is_valid() {
            Self::fill(cx, node, func_type);
        }
    }
}

/// `max`, `min`, `sum` and `reversed` over slices, as function literals.
pub(crate) struct IterFuncs;

impl IterFuncs {
    /// `func() (acc T) { for i, e := range xs { ... }; return }()`
    fn fold(cx: &mut Cx<'_>, builtin: &str, elt: &GoType, iterable: NodeId) -> NodeId {
        let acc = if builtin == "sum" { "s" } else { "m" };
        let step = if builtin == "sum" {
            let total = cx.arena.ident(acc);
            let e = cx.arena.ident("e");
            cx.arena.assign(vec![total], Token::AddAssign, vec![e])
        } else {
            // i == 0 || e < m
            let i = cx.arena.ident("i");
            let zero = cx.arena.int_lit(0);
            let first = cx.arena.binary(i, Token::Eql, zero);
            let e = cx.arena.ident("e");
            let m = cx.arena.ident(acc);
            let op = if builtin == "min" { Token::Lss } else { Token::Gtr };
            let better = cx.arena.binary(e, op, m);
            let cond = cx.arena.binary(first, Token::LOr, better);
            let m = cx.arena.ident(acc);
            let e = cx.arena.ident("e");
            let keep = cx.arena.assign(vec![m], Token::Assign, vec![e]);
            cx.arena.if_stmt(cond, vec![keep], NodeId::INVALID)
        };
        let key = cx.arena.ident(if builtin == "sum" { "_" } else { "i" });
        let value = cx.arena.ident("e");
        let body = cx.arena.block(vec![step]);
        let range = cx.arena.range_stmt(key, value, iterable, body);
        let ret = cx.arena.ret(Vec::new());

        let result_ty = cx.arena.type_expr(elt);
        let result = cx.arena.field(&[acc], result_ty);
        let results = cx.arena.field_list(vec![result]);
        let func_ty = cx.arena.func_type(Vec::new(), results);
        let lit = cx.arena.func_lit(func_ty, vec![range, ret]);
        cx.arena.call(lit, Vec::new())
    }

    /// `func(arr []T) []T { arr2 := make([]T, len(arr)); ...; return arr2 }(xs)`
    fn reversed(cx: &mut Cx<'_>, slice: &GoType, iterable: NodeId) -> NodeId {
        let arr2 = cx.arena.ident("arr2");
        let size = len_of(cx.arena, "arr");
        let make = cx.arena.make_call(slice, vec![size]);
        let setup = cx.arena.define(arr2, make);

        // arr2[len(arr)-i-1] = e
        let size = len_of(cx.arena, "arr");
        let i = cx.arena.ident("i");
        let from_end = cx.arena.binary(size, Token::Sub, i);
        let one = cx.arena.int_lit(1);
        let index = cx.arena.binary(from_end, Token::Sub, one);
        let target = cx.arena.ident("arr2");
        let slot = cx.arena.index(target, index);
        let e = cx.arena.ident("e");
        let store = cx.arena.assign(vec![slot], Token::Assign, vec![e]);
        let body = cx.arena.block(vec![store]);
        let (key, value, arr) = (
            cx.arena.ident("i"),
            cx.arena.ident("e"),
            cx.arena.ident("arr"),
        );
        let range = cx.arena.range_stmt(key, value, arr, body);
        let result = cx.arena.ident("arr2");
        let ret = cx.arena.ret(vec![result]);

        let param_ty = cx.arena.type_expr(slice);
        let param = cx.arena.field(&["arr"], param_ty);
        let results = cx.arena.results_for(slice);
        let func_ty = cx.arena.func_type(vec![param], results);
        let lit = cx.arena.func_lit(func_ty, vec![setup, range, ret]);
        cx.arena.call(lit, vec![iterable])
    }
}

impl Pass for IterFuncs {
    fn name(&self) -> &'static str {
        "IterFuncs"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let builtin = match callee_name(cx.arena, id) {
            Some(name @ ("max" | "min" | "sum" | "reversed")) => name.to_owned(),
            _ => return Rewrite::Keep,
        };
        let args = call_args(cx.arena, id);
        if args
            .iter()
            .any(|&a| cx.arena.meta(a).is_some_and(|m| m.keyword.is_some()))
        {
            return Rewrite::Keep;
        }
        let Some(&first) = args.first() else {
            return Rewrite::Keep;
        };
        let Some(first_ty) = cx.type_of(first) else {
            return Rewrite::Keep;
        };
        let (slice, iterable) = if args.len() == 1 {
            (first_ty, first)
        } else {
            let slice = GoType::slice(first_ty);
            let ty = cx.arena.type_expr(&slice);
            (slice, cx.arena.composite(ty, args))
        };
        let Some(elt) = slice.elem().cloned() else {
            return Rewrite::Keep;
        };
        let slice = GoType::slice(elt.clone());
        if builtin == "reversed" {
            Rewrite::Replace(Self::reversed(cx, &slice, iterable))
        } else {
            Rewrite::Replace(Self::fold(cx, &builtin, &elt, iterable))
        }
    }
}

/// `xs.reverse()` on a slice, swapping in place.
pub(crate) struct IterMethods;

impl Pass for IterMethods {
    fn name(&self) -> &'static str {
        "IterMethods"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some((target, "reverse")) = method_call(cx.arena, id) else {
            return Rewrite::Keep;
        };
        if !call_args(cx.arena, id).is_empty() {
            return Rewrite::Keep;
        }
        let Some(elt) = cx.type_of(target).and_then(|t| t.elem().cloned()) else {
            return Rewrite::Keep;
        };
        let slice = GoType::slice(elt);

        // for i, j := 0, len(arr)-1; i < j; i, j = i+1, j-1
        let zero = cx.arena.int_lit(0);
        let size = len_of(cx.arena, "arr");
        let one = cx.arena.int_lit(1);
        let last = cx.arena.binary(size, Token::Sub, one);
        let lhs = vec![cx.arena.ident("i"), cx.arena.ident("j")];
        let init = cx.arena.assign(lhs, Token::Define, vec![zero, last]);
        let (i, j) = (cx.arena.ident("i"), cx.arena.ident("j"));
        let cond = cx.arena.binary(i, Token::Lss, j);
        let (i, one) = (cx.arena.ident("i"), cx.arena.int_lit(1));
        let next_i = cx.arena.binary(i, Token::Add, one);
        let (j, one) = (cx.arena.ident("j"), cx.arena.int_lit(1));
        let next_j = cx.arena.binary(j, Token::Sub, one);
        let lhs = vec![cx.arena.ident("i"), cx.arena.ident("j")];
        let post = cx.arena.assign(lhs, Token::Assign, vec![next_i, next_j]);

        // arr[i], arr[j] = arr[j], arr[i]
        let lhs = vec![element(cx.arena, "i"), element(cx.arena, "j")];
        let rhs = vec![element(cx.arena, "j"), element(cx.arena, "i")];
        let swap = cx.arena.assign(lhs, Token::Assign, rhs);
        let swap_loop = cx.arena.for_stmt(init, cond, post, vec![swap]);

        let param_ty = cx.arena.type_expr(&slice);
        let param = cx.arena.field(&["arr"], param_ty);
        let func_ty = cx.arena.func_type(vec![param], NodeId::INVALID);
        let lit = cx.arena.func_lit(func_ty, vec![swap_loop]);
        Rewrite::Replace(cx.arena.call(lit, vec![target]))
    }
}

/// Collapse a template built as `switch x.(type)` to the clause matching
/// the type of the argument passed for `x`.
pub(crate) struct PySnippetSwitches;

impl PySnippetSwitches {
    /// Name switched on by `switch x.(type)` or `switch x := x.(type)`.
    fn subject(arena: &GoArena, switch: NodeId) -> Option<&str> {
        let Some(NodeKind::TypeSwitchStmt { assign, .. }) = arena.get(switch) else {
            return None;
        };
        let assert = match arena.get(*assign)? {
            NodeKind::ExprStmt { x } => *x,
            NodeKind::AssignStmt { rhs, .. } => *rhs.first()?,
            _ => return None,
        };
        match arena.get(assert)? {
            NodeKind::TypeAssertExpr { x, .. } => arena.ident_name(*x),
            _ => None,
        }
    }

    /// The clause for `ty`, or the default clause.
    fn clause(arena: &GoArena, switch: NodeId, ty: &GoType) -> Option<NodeId> {
        let Some(NodeKind::TypeSwitchStmt { body, .. }) = arena.get(switch) else {
            return None;
        };
        let clauses = block_list(arena, *body);
        let matching = clauses.iter().copied().find(|&c| {
            matches!(arena.get(c), Some(NodeKind::CaseClause { list, .. })
                if matches!(list[..], [case] if GoType::from_expr(arena, case).as_ref() == Some(ty)))
        });
        matching.or_else(|| {
            clauses.iter().copied().find(
                |&c| matches!(arena.get(c), Some(NodeKind::CaseClause { list, .. }) if list.is_empty()),
            )
        })
    }
}

/// Replace identifiers named in `mapping` under `id` with copies of their
/// values.
fn substitute(arena: &mut GoArena, id: NodeId, mapping: &[(String, NodeId)]) {
    for child in arena.children(id) {
        let value = arena
            .ident_name(child)
            .and_then(|name| mapping.iter().find(|(n, _)| n == name))
            .map(|&(_, value)| value);
        match value {
            Some(value) => {
                let copy = arena.deep_copy(value);
                arena.kind_mut(id).replace_child(child, copy);
            }
            None => substitute(arena, child, mapping),
        }
    }
}

impl Pass for PySnippetSwitches {
    fn name(&self) -> &'static str {
        "PySnippetSwitches"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(snippet) = cx.arena.meta(id).and_then(|m| m.snippet.clone()) else {
            return Rewrite::Keep;
        };
        let Some(NodeKind::CallExpr { fun, args, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let (lit, args) = (*fun, args.clone());
        let Some(switch) = lone_type_switch(cx.arena, lit) else {
            return Rewrite::Keep;
        };
        let NodeKind::FuncLit { ty, body } = *cx.arena.kind(lit) else {
            return Rewrite::Keep;
        };
        let params = params(cx.arena, ty);
        let Some(subject) = Self::subject(cx.arena, switch) else {
            return Rewrite::Keep;
        };
        let Some(&arg) = params
            .iter()
            .position(|(name, _)| name == subject)
            .and_then(|i| args.get(i))
        else {
            return Rewrite::Keep;
        };
        let Some(arg_ty) = cx.type_of(arg) else {
            return Rewrite::Keep;
        };
        let Some(clause) = Self::clause(cx.arena, switch, &arg_ty) else {
            return Rewrite::Keep;
        };
        let stmts = match cx.arena.kind(clause) {
            NodeKind::CaseClause { body, .. } => body.clone(),
            _ => return Rewrite::Keep,
        };
        tracing::trace!(%snippet, ty = %arg_ty, "collapsing template switch");

        // Searching a string keeps its own parameters.
        let keep_params = matches!(snippet.as_str(), "index" | "rindex") && arg_ty.is_string();
        if keep_params {
            cx.arena.set_kind(body, NodeKind::BlockStmt { list: stmts });
            return Rewrite::Keep;
        }
        let mapping: Vec<(String, NodeId)> = params
            .iter()
            .map(|(name, _)| name.clone())
            .zip(args.iter().copied())
            .collect();
        for &stmt in &stmts {
            substitute(cx.arena, stmt, &mapping);
        }
        if let [single] = stmts[..] {
            match cx.arena.kind(single) {
                NodeKind::ExprStmt { x } => return Rewrite::Replace(*x),
                NodeKind::ReturnStmt { results } if results.len() == 1 => {
                    return Rewrite::Replace(results[0]);
                }
                _ => {}
            }
        }
        cx.arena.set_kind(body, NodeKind::BlockStmt { list: stmts });
        if let Some(NodeKind::FuncType { params, .. }) = cx.arena.get(ty) {
            let params = *params;
            cx.arena.kind_mut(params).set_slot(0, SlotValue::Many(Vec::new()));
        }
        cx.arena.kind_mut(id).set_slot(1, SlotValue::Many(Vec::new()));
        Rewrite::Keep
    }
}

/// Types that flow through `copy`, `append` and function literal calls.
pub(crate) struct CallTypeInformation;

impl CallTypeInformation {
    /// Narrow the declaration behind `x` to `ty`. Returns whether it did.
    fn narrow(cx: &mut Cx<'_>, x: NodeId, ty: Option<GoType>) -> bool {
        let Some(ty) = ty else {
            return false;
        };
        if ty.contains_any() {
            return false;
        }
        let decl = cx.type_node(x);
        if is_narrowable(cx.arena, decl) {
            cx.retype(decl, &ty);
            return true;
        }
        match (cx.arena.get(decl), ty.elem()) {
            (Some(NodeKind::ArrayType { elt, .. }), Some(elem)) if is_narrowable(cx.arena, *elt) => {
                let (elt, elem) = (*elt, elem.clone());
                cx.retype(elt, &elem);
                true
            }
            _ => false,
        }
    }

    fn copy_or_append(cx: &mut Cx<'_>, call: NodeId, builtin: &str) {
        let NodeKind::CallExpr { args, ellipsis, .. } = cx.arena.kind(call) else {
            return;
        };
        let ellipsis = *ellipsis;
        let [a, b] = args[..] else {
            return;
        };
        let (at, bt) = (cx.type_of(a), cx.type_of(b));
        let (for_b, for_a) = if builtin == "copy" || ellipsis {
            (at.clone(), bt.clone())
        } else {
            (at.as_ref().and_then(|t| t.elem().cloned()), bt.map(GoType::slice))
        };
        if !Self::narrow(cx, b, for_b) {
            Self::narrow(cx, a, for_a);
        }
    }

    fn literal_call(cx: &mut Cx<'_>, call: NodeId, lit: NodeId) {
        if lone_type_switch(cx.arena, lit).is_some() {
            return;
        }
        let NodeKind::FuncLit { ty, .. } = *cx.arena.kind(lit) else {
            return;
        };
        let args = call_args(cx.arena, call);
        for ((_, param), arg) in params(cx.arena, ty).into_iter().zip(args) {
            if !param.is_valid() || matches!(cx.arena.get(param), Some(NodeKind::Ellipsis { .. })) {
                continue;
            }
            let arg_ty = cx.type_of(arg);
            let param_ty = GoType::from_expr(cx.arena, param);
            let arg_anys = arg_ty.as_ref().map_or(usize::MAX, any_count);
            let param_anys = param_ty.as_ref().map_or(usize::MAX, any_count);
            if param_anys > arg_anys && is_narrowable_type(cx.arena, param) {
                if let Some(arg_ty) = arg_ty {
                    cx.retype(param, &arg_ty);
                }
            } else if arg_anys > param_anys {
                Self::narrow(cx, arg, param_ty);
            }
        }
    }
}

/// Whether a type node may be rewritten: any type except a permanent
/// `interface{}`.
fn is_narrowable_type(arena: &GoArena, ty: NodeId) -> bool {
    match arena.get(ty) {
        Some(NodeKind::InterfaceType) => is_narrowable(arena, ty),
        Some(_) => true,
        None => false,
    }
}

impl Pass for CallTypeInformation {
    fn name(&self) -> &'static str {
        "CallTypeInformation"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::CallExpr { fun, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let fun = *fun;
        match cx.arena.get(fun) {
            Some(NodeKind::FuncLit { .. }) => Self::literal_call(cx, id, fun),
            Some(NodeKind::Ident { name }) if name == "copy" || name == "append" => {
                let builtin = name.clone();
                Self::copy_or_append(cx, id, &builtin);
            }
            _ => {}
        }
        Rewrite::Keep
    }
}

/// Arguments at call sites become narrowing sources of `interface{}`
/// parameters.
pub(crate) struct UntypedFunctionsTypedByCalls;

impl Pass for UntypedFunctionsTypedByCalls {
    fn name(&self) -> &'static str {
        "UntypedFunctionsTypedByCalls"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::CallExpr { fun, args, .. }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let (fun, args) = (*fun, args.clone());
        if lone_type_switch(cx.arena, fun).is_some() {
            return Rewrite::Keep;
        }
        let func_type = cx.callee_type_node(fun);
        for ((_, param), arg) in params(cx.arena, func_type).into_iter().zip(args) {
            if !is_narrowable(cx.arena, param) {
                continue;
            }
            let meta = cx.arena.meta_mut(param);
            if !meta.elts.contains(&arg) {
                meta.elts.push(arg);
            }
        }
        Rewrite::Keep
    }
}

#[cfg(test)]
mod tests;
