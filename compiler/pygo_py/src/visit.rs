//! Expression traversal over Python syntax.

use crate::ast::{Expr, Pattern, Stmt};

/// Visit every expression under `expr` (including `expr` itself),
/// children before parents.
pub fn walk_expr_mut(expr: &mut Expr, f: &mut dyn FnMut(&mut Expr)) {
    match expr {
        Expr::BoolOp { values: items, .. }
        | Expr::Set { elts: items }
        | Expr::JoinedStr { values: items }
        | Expr::List { elts: items }
        | Expr::Tuple { elts: items } => {
            for item in items {
                walk_expr_mut(item, f);
            }
        }
        Expr::NamedExpr { target, value } => {
            walk_expr_mut(target, f);
            walk_expr_mut(value, f);
        }
        Expr::BinOp { left, right, .. } => {
            walk_expr_mut(left, f);
            walk_expr_mut(right, f);
        }
        Expr::UnaryOp { operand: inner, .. }
        | Expr::Await { value: inner }
        | Expr::YieldFrom { value: inner }
        | Expr::Starred { value: inner }
        | Expr::Attribute { value: inner, .. } => walk_expr_mut(inner, f),
        Expr::Lambda { args, body } => {
            for default in &mut args.defaults {
                walk_expr_mut(default, f);
            }
            walk_expr_mut(body, f);
        }
        Expr::IfExp { test, body, orelse } => {
            walk_expr_mut(test, f);
            walk_expr_mut(body, f);
            walk_expr_mut(orelse, f);
        }
        Expr::Dict { keys, values } => {
            for key in keys.iter_mut().flatten() {
                walk_expr_mut(key, f);
            }
            for value in values {
                walk_expr_mut(value, f);
            }
        }
        Expr::ListComp { elt, generators }
        | Expr::SetComp { elt, generators }
        | Expr::GeneratorExp { elt, generators } => {
            walk_expr_mut(elt, f);
            for gen in generators {
                walk_expr_mut(&mut gen.target, f);
                walk_expr_mut(&mut gen.iter, f);
                for cond in &mut gen.ifs {
                    walk_expr_mut(cond, f);
                }
            }
        }
        Expr::DictComp {
            key,
            value,
            generators,
        } => {
            walk_expr_mut(key, f);
            walk_expr_mut(value, f);
            for gen in generators {
                walk_expr_mut(&mut gen.target, f);
                walk_expr_mut(&mut gen.iter, f);
                for cond in &mut gen.ifs {
                    walk_expr_mut(cond, f);
                }
            }
        }
        Expr::Yield { value } => {
            if let Some(value) = value {
                walk_expr_mut(value, f);
            }
        }
        Expr::Compare {
            left, comparators, ..
        } => {
            walk_expr_mut(left, f);
            for c in comparators {
                walk_expr_mut(c, f);
            }
        }
        Expr::Call(call) => {
            walk_expr_mut(&mut call.func, f);
            for a in &mut call.args {
                walk_expr_mut(a, f);
            }
            for kw in &mut call.keywords {
                walk_expr_mut(&mut kw.value, f);
            }
        }
        Expr::FormattedValue {
            value, format_spec, ..
        } => {
            walk_expr_mut(value, f);
            if let Some(spec) = format_spec {
                walk_expr_mut(spec, f);
            }
        }
        Expr::Subscript { value, slice } => {
            walk_expr_mut(value, f);
            walk_expr_mut(slice, f);
        }
        Expr::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                walk_expr_mut(part, f);
            }
        }
        Expr::Constant { .. } | Expr::Name { .. } | Expr::Unsupported { .. } => {}
    }
    f(expr);
}

/// Visit every expression in `stmts`, descending into nested blocks and
/// nested function definitions.
pub fn walk_stmts_mut(stmts: &mut [Stmt], f: &mut dyn FnMut(&mut Expr)) {
    for stmt in stmts {
        walk_stmt_mut(stmt, f);
    }
}

fn walk_stmt_mut(stmt: &mut Stmt, f: &mut dyn FnMut(&mut Expr)) {
    match stmt {
        Stmt::FunctionDef(def) | Stmt::AsyncFunctionDef(def) => {
            for default in &mut def.args.defaults {
                walk_expr_mut(default, f);
            }
            walk_stmts_mut(&mut def.body, f);
        }
        Stmt::ClassDef(class) => walk_stmts_mut(&mut class.body, f),
        Stmt::Return { value } => {
            if let Some(v) = value {
                walk_expr_mut(v, f);
            }
        }
        Stmt::Delete { targets } => {
            for t in targets {
                walk_expr_mut(t, f);
            }
        }
        Stmt::Assign { targets, value } => {
            for t in targets {
                walk_expr_mut(t, f);
            }
            walk_expr_mut(value, f);
        }
        Stmt::AugAssign { target, value, .. } => {
            walk_expr_mut(target, f);
            walk_expr_mut(value, f);
        }
        Stmt::AnnAssign { target, value, .. } => {
            walk_expr_mut(target, f);
            if let Some(v) = value {
                walk_expr_mut(v, f);
            }
        }
        Stmt::For(for_) => {
            walk_expr_mut(&mut for_.target, f);
            walk_expr_mut(&mut for_.iter, f);
            walk_stmts_mut(&mut for_.body, f);
            walk_stmts_mut(&mut for_.orelse, f);
        }
        Stmt::While { test, body, orelse } | Stmt::If { test, body, orelse } => {
            walk_expr_mut(test, f);
            walk_stmts_mut(body, f);
            walk_stmts_mut(orelse, f);
        }
        Stmt::With { items, body } => {
            for item in items {
                walk_expr_mut(&mut item.context_expr, f);
                if let Some(v) = &mut item.optional_vars {
                    walk_expr_mut(v, f);
                }
            }
            walk_stmts_mut(body, f);
        }
        Stmt::Match { subject, cases } => {
            walk_expr_mut(subject, f);
            for case in cases {
                walk_pattern_mut(&mut case.pattern, f);
                if let Some(guard) = &mut case.guard {
                    walk_expr_mut(guard, f);
                }
                walk_stmts_mut(&mut case.body, f);
            }
        }
        Stmt::Raise { exc, cause } => {
            for e in [exc, cause].into_iter().flatten() {
                walk_expr_mut(e, f);
            }
        }
        Stmt::Try(t) => {
            walk_stmts_mut(&mut t.body, f);
            for h in &mut t.handlers {
                if let Some(typ) = &mut h.typ {
                    walk_expr_mut(typ, f);
                }
                walk_stmts_mut(&mut h.body, f);
            }
            walk_stmts_mut(&mut t.orelse, f);
            walk_stmts_mut(&mut t.finalbody, f);
        }
        Stmt::Assert { test, msg } => {
            walk_expr_mut(test, f);
            if let Some(m) = msg {
                walk_expr_mut(m, f);
            }
        }
        Stmt::Expr { value } => walk_expr_mut(value, f),
        Stmt::Import { .. }
        | Stmt::ImportFrom { .. }
        | Stmt::Global { .. }
        | Stmt::Nonlocal { .. }
        | Stmt::Pass
        | Stmt::Break
        | Stmt::Continue
        | Stmt::Unsupported { .. } => {}
    }
}

fn walk_pattern_mut(pattern: &mut Pattern, f: &mut dyn FnMut(&mut Expr)) {
    match pattern {
        Pattern::MatchValue { value } => walk_expr_mut(value, f),
        Pattern::MatchAs {
            pattern: Some(p), ..
        } => walk_pattern_mut(p, f),
        Pattern::MatchOr { patterns } => {
            for p in patterns {
                walk_pattern_mut(p, f);
            }
        }
        Pattern::MatchSingleton { .. } | Pattern::MatchAs { .. } | Pattern::Unsupported { .. } => {}
    }
}

/// Whether a function body yields, ignoring nested function definitions
/// and lambdas (their yields belong to them).
pub fn body_yields(body: &[Stmt]) -> bool {
    body.iter().any(stmt_yields)
}

fn stmt_yields(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) | Stmt::ClassDef(_) => false,
        Stmt::Expr { value } => expr_yields(value),
        Stmt::Assign { value, .. } | Stmt::AugAssign { value, .. } => expr_yields(value),
        Stmt::AnnAssign { value, .. } | Stmt::Return { value } => {
            value.as_ref().is_some_and(expr_yields)
        }
        Stmt::For(for_) => {
            expr_yields(&for_.iter) || body_yields(&for_.body) || body_yields(&for_.orelse)
        }
        Stmt::While { test, body, orelse } | Stmt::If { test, body, orelse } => {
            expr_yields(test) || body_yields(body) || body_yields(orelse)
        }
        Stmt::With { items, body } => {
            items.iter().any(|i| expr_yields(&i.context_expr)) || body_yields(body)
        }
        Stmt::Match { cases, .. } => cases.iter().any(|c| body_yields(&c.body)),
        Stmt::Try(t) => {
            body_yields(&t.body)
                || t.handlers.iter().any(|h| body_yields(&h.body))
                || body_yields(&t.orelse)
                || body_yields(&t.finalbody)
        }
        _ => false,
    }
}

fn expr_yields(expr: &Expr) -> bool {
    match expr {
        Expr::Yield { .. } | Expr::YieldFrom { .. } => true,
        Expr::Lambda { .. } | Expr::GeneratorExp { .. } => false,
        Expr::BinOp { left, right, .. } => expr_yields(left) || expr_yields(right),
        Expr::Call(call) => {
            expr_yields(&call.func) || call.args.iter().any(expr_yields)
        }
        Expr::Await { value } | Expr::UnaryOp { operand: value, .. } => expr_yields(value),
        Expr::Tuple { elts } | Expr::List { elts } => elts.iter().any(expr_yields),
        _ => false,
    }
}

/// Whether any `Name` in `body` (nested functions included) is `id`.
pub fn mentions_name(body: &[Stmt], id: &str) -> bool {
    let mut body = body.to_vec();
    let mut found = false;
    walk_stmts_mut(&mut body, &mut |e| {
        if e.as_name() == Some(id) {
            found = true;
        }
    });
    found
}
