//! Statements inside function bodies.

use pygo_ir::{GoType, MetaFlags, NodeId, NodeKind, Token};
use pygo_py::{Constant, Expr, For, MatchCase, Operator, Pattern, Stmt};

use super::operators::binary_token;
use super::{Builder, Decline, Outcome};
use crate::BuildError;

impl Builder<'_> {
    /// `switch x.(type) { clauses }`
    pub(super) fn type_switch(&mut self, x: NodeId, clauses: Vec<NodeId>) -> NodeId {
        let assert = self.arena.alloc(NodeKind::TypeAssertExpr {
            x,
            ty: NodeId::INVALID,
        });
        let assign = self.arena.expr_stmt(assert);
        let body = self.arena.block(clauses);
        self.arena.alloc(NodeKind::TypeSwitchStmt {
            init: NodeId::INVALID,
            assign,
            body,
        })
    }

    fn body(&mut self, stmts: &[Stmt]) -> Result<NodeId, BuildError> {
        let list = self.stmts(stmts)?;
        Ok(self.arena.block(list))
    }
}

pub(super) fn return_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Return { value } = stmt else {
        return Err(Decline::Shape);
    };
    let results = match value {
        None => Vec::new(),
        Some(Expr::Tuple { elts }) => b.exprs(elts)?,
        Some(value) => vec![b.expr(value)?],
    };
    Ok(vec![b.arena.ret(results)])
}

/// `del d[k]` → `delete(d, k)`
pub(super) fn delete(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Delete { targets } = stmt else {
        return Err(Decline::Shape);
    };
    let mut keyed = Vec::with_capacity(targets.len());
    for target in targets {
        match target {
            Expr::Subscript { value, slice } if !matches!(slice.as_ref(), Expr::Slice { .. }) => {
                keyed.push((value.as_ref(), slice.as_ref()));
            }
            _ => return Err(Decline::Shape),
        }
    }
    let mut out = Vec::with_capacity(keyed.len());
    for (value, key) in keyed {
        let x = b.expr(value)?;
        let k = b.expr(key)?;
        let call = b.arena.call_path("delete", vec![x, k]);
        out.push(b.arena.expr_stmt(call));
    }
    Ok(out)
}

/// Targets an assignment can write, unpacked one level.
fn assign_targets(target: &Expr) -> Option<&[Expr]> {
    let targets = match target {
        Expr::Tuple { elts } | Expr::List { elts } => elts.as_slice(),
        single => std::slice::from_ref(single),
    };
    targets.iter().all(is_store_target).then_some(targets)
}

fn is_store_target(target: &Expr) -> bool {
    match target {
        Expr::Name { .. } | Expr::Attribute { .. } => true,
        Expr::Subscript { slice, .. } => !matches!(slice.as_ref(), Expr::Slice { .. }),
        _ => false,
    }
}

/// `:=` when every target is a bare name, else `=`. Definitions that
/// redeclare nothing are downgraded once scopes are known.
fn assign_token(targets: &[Expr]) -> Token {
    if targets.iter().all(|t| t.as_name().is_some()) {
        Token::Define
    } else {
        Token::Assign
    }
}

/// `a = 1`, `a, b = b, a`, `a = b = f()`
pub(super) fn assign(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Assign { targets, value } = stmt else {
        return Err(Decline::Shape);
    };
    let Some((first, rest)) = targets.split_first() else {
        return Err(Decline::Shape);
    };
    let Some(lhs) = assign_targets(first) else {
        return Err(Decline::Shape);
    };
    if !rest.is_empty() && (lhs.len() != 1 || !rest.iter().all(is_store_target)) {
        return Err(Decline::Shape);
    }
    let rhs = match (lhs.len(), value) {
        (n, Expr::Tuple { elts } | Expr::List { elts }) if n > 1 && elts.len() == n => {
            b.exprs(elts)?
        }
        _ => vec![b.expr(value)?],
    };
    let tok = assign_token(lhs);
    let lhs_ids = b.exprs(lhs)?;
    let mut out = vec![b.arena.assign(lhs_ids.clone(), tok, rhs)];
    // a = b = v → a := v; b := a
    for target in rest {
        let source = b.arena.deep_copy(lhs_ids[0]);
        let tok = assign_token(std::slice::from_ref(target));
        let target = b.expr(target)?;
        out.push(b.arena.assign(vec![target], tok, vec![source]));
    }
    Ok(out)
}

/// `x @= v` → `*x = v`
pub(super) fn store(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::AugAssign {
        target,
        op: Operator::MatMult,
        value,
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    let x = b.expr(target)?;
    let ptr = b.arena.star(x);
    let v = b.expr(value)?;
    Ok(vec![b.arena.assign(vec![ptr], Token::Assign, vec![v])])
}

/// `x += v`. Operators without an op-assign form expand to `x = x op v`.
pub(super) fn aug_assign(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::AugAssign { target, op, value } = stmt else {
        return Err(Decline::Shape);
    };
    let Some(tok) = binary_token(*op) else {
        return Err(Decline::Shape);
    };
    if !is_store_target(target) {
        return Err(Decline::Shape);
    }
    let x = b.expr(target)?;
    let v = b.expr(value)?;
    Ok(vec![match tok.to_assign() {
        Some(op_assign) => b.arena.assign(vec![x], op_assign, vec![v]),
        None => {
            let current = b.arena.deep_copy(x);
            let combined = b.arena.binary(current, tok, v);
            b.arena.assign(vec![x], Token::Assign, vec![combined])
        }
    }])
}

/// `x: T = v` → `var x T = v`
pub(super) fn ann_assign(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::AnnAssign {
        target,
        annotation,
        value,
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    if let Some(name) = target.as_name() {
        let ty = b.annotation(annotation)?;
        let values = match value {
            Some(v) => vec![b.expr(v)?],
            None => Vec::new(),
        };
        return Ok(vec![b.var_decl(name, ty, values)]);
    }
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    if !is_store_target(target) {
        return Err(Decline::Shape);
    }
    let x = b.expr(target)?;
    let v = b.expr(value)?;
    Ok(vec![b.arena.assign(vec![x], Token::Assign, vec![v])])
}

impl Builder<'_> {
    /// `var name T = values`, as a statement.
    pub(super) fn var_decl(&mut self, name: &str, ty: NodeId, values: Vec<NodeId>) -> NodeId {
        let decl = self.var_gen_decl(name, ty, values);
        self.arena.alloc(NodeKind::DeclStmt { decl })
    }

    /// `var name T = values`, as a declaration.
    pub(super) fn var_gen_decl(&mut self, name: &str, ty: NodeId, values: Vec<NodeId>) -> NodeId {
        let ident = self.arena.ident(name);
        let spec = self.arena.alloc(NodeKind::ValueSpec {
            names: vec![ident],
            ty,
            values,
        });
        self.arena.alloc(NodeKind::GenDecl {
            tok: Token::Var,
            specs: vec![spec],
        })
    }
}

/// `for x in xs:` → `for _, x := range xs {}`. A tuple target leaves an
/// untyped composite as the value, unpacked by the rewrite passes.
pub(super) fn for_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::For(For {
        target,
        iter,
        body,
        orelse,
    }) = stmt
    else {
        return Err(Decline::Shape);
    };
    let unpack = match target {
        Expr::Name { .. } => None,
        Expr::Tuple { elts } | Expr::List { elts }
            if elts.iter().all(|e| e.as_name().is_some()) =>
        {
            Some(elts)
        }
        _ => return Err(Decline::Shape),
    };
    let x = b.expr(iter)?;
    let key = b.arena.ident("_");
    let value = match unpack {
        None => b.expr(target)?,
        Some(elts) => {
            let names = b.exprs(elts)?;
            b.arena.composite(NodeId::INVALID, names)
        }
    };
    let body = b.body(body)?;
    let lp = b.arena.range_stmt(key, value, x, body);
    loop_else(b, lp, orelse)
}

/// A loop with an `else:` clause runs in a closure that reports whether it
/// finished without `break`:
///
/// ```text
/// if func() bool { for ... { ...; return false ... }; return true }() { orelse }
/// ```
fn loop_else(b: &mut Builder<'_>, lp: NodeId, orelse: &[Stmt]) -> Outcome<Vec<NodeId>> {
    if orelse.is_empty() {
        return Ok(vec![lp]);
    }
    breaks_to_returns(b, lp);
    let finished = b.arena.bool_lit(true);
    let done = b.arena.ret(vec![finished]);
    let results = b.arena.results_for(&GoType::BOOL);
    let completed = b.arena.iife(results, vec![lp, done]);
    let orelse = b.stmts(orelse)?;
    Ok(vec![b.arena.if_stmt(completed, orelse, NodeId::INVALID)])
}

/// Turn the `break`s that leave `lp` into `return false`. Nested loops and
/// function literals keep theirs.
fn breaks_to_returns(b: &mut Builder<'_>, lp: NodeId) {
    let mut stack: Vec<NodeId> = b.arena.children(lp).into_iter().collect();
    while let Some(id) = stack.pop() {
        match b.arena.kind(id) {
            NodeKind::BranchStmt { tok: Token::Break } => {
                let stop = b.arena.bool_lit(false);
                b.arena.set_kind(id, NodeKind::ReturnStmt { results: vec![stop] });
            }
            NodeKind::ForStmt { .. } | NodeKind::RangeStmt { .. } | NodeKind::FuncLit { .. } => {}
            _ => stack.extend(b.arena.children(id)),
        }
    }
}

/// Truthiness of a constant loop or branch condition.
fn constant_truth(expr: &Expr) -> Option<bool> {
    let Expr::Constant { value } = expr else {
        return None;
    };
    Some(match value {
        Constant::Bool(v) => *v,
        Constant::None => false,
        Constant::Int(n) | Constant::Float(n) => n.parse::<f64>().is_ok_and(|v| v != 0.0),
        Constant::Str(s) => !s.is_empty(),
        Constant::Bytes(bytes) => !bytes.is_empty(),
        Constant::Ellipsis => true,
        Constant::Complex { .. } | Constant::Unsupported(_) => return None,
    })
}

/// `while c:` → `for c {}`; `while True:` → `for {}`
pub(super) fn while_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::While { test, body, orelse } = stmt else {
        return Err(Decline::Shape);
    };
    let cond = match constant_truth(test) {
        Some(true) => NodeId::INVALID,
        Some(false) => b.arena.bool_lit(false),
        None => b.expr(test)?,
    };
    let body = b.stmts(body)?;
    let lp = b.arena.for_stmt(NodeId::INVALID, cond, NodeId::INVALID, body);
    loop_else(b, lp, orelse)
}

pub(super) fn if_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::If { test, body, orelse } = stmt else {
        return Err(Decline::Shape);
    };
    let cond = b.expr(test)?;
    let body = b.stmts(body)?;
    let els = match orelse.as_slice() {
        [] => NodeId::INVALID,
        [elif @ Stmt::If { .. }] => match b.stmt(elif)?.as_slice() {
            [single] => *single,
            many => b.arena.block(many.to_vec()),
        },
        other => b.body(other)?,
    };
    Ok(vec![b.arena.if_stmt(cond, body, els)])
}

/// Subject and type of `isinstance(x, T)` when `isinstance` is the
/// built-in.
fn isinstance_test<'e>(b: &Builder<'_>, test: &'e Expr) -> Option<(&'e Expr, &'e Expr)> {
    let Expr::Call(call) = test else {
        return None;
    };
    if call.func.as_name() != Some("isinstance") || b.is_user_defined("isinstance") {
        return None;
    }
    match call.args.as_slice() {
        [subject, types] if call.keywords.is_empty() => Some((subject, types)),
        _ => None,
    }
}

/// A chain of `isinstance` tests on one subject becomes a type switch:
///
/// ```text
/// if isinstance(x, int): a        switch x.(type) {
/// elif isinstance(x, str): b  →   case int: a
/// else: c                         case string: b
///                                 default: c }
/// ```
pub(super) fn type_switch(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::If { test, .. } = stmt else {
        return Err(Decline::Shape);
    };
    let Some((subject, _)) = isinstance_test(b, test) else {
        return Err(Decline::Shape);
    };
    if subject.as_name().is_none() {
        return Err(Decline::Shape);
    }

    let mut arms: Vec<(&Expr, &[Stmt])> = Vec::new();
    let mut default: &[Stmt] = &[];
    let mut current = stmt;
    while let Stmt::If { test, body, orelse } = current {
        match isinstance_test(b, test) {
            Some((s, types)) if s == subject => arms.push((types, body)),
            _ => {
                default = std::slice::from_ref(current);
                break;
            }
        }
        match orelse.as_slice() {
            [next @ Stmt::If { .. }] => current = next,
            rest => {
                default = rest;
                break;
            }
        }
    }

    let x = b.expr(subject)?;
    let mut clauses = Vec::with_capacity(arms.len() + 1);
    for (types, body) in arms {
        let list = b.type_list(types)?;
        let body = b.stmts(body)?;
        clauses.push(b.arena.case_clause(list, body));
    }
    if !default.is_empty() {
        let body = b.stmts(default)?;
        clauses.push(b.arena.case_clause(Vec::new(), body));
    }
    Ok(vec![b.type_switch(x, clauses)])
}

/// Whether a `match` arm has a `switch` equivalent.
fn switchable(case: &MatchCase) -> bool {
    fn pattern_ok(pattern: &Pattern, top: bool) -> bool {
        match pattern {
            Pattern::MatchValue { .. } | Pattern::MatchSingleton { .. } => true,
            Pattern::MatchOr { patterns } => patterns.iter().all(|p| pattern_ok(p, false)),
            Pattern::MatchAs { pattern: None, .. } => top,
            Pattern::MatchAs { .. } | Pattern::Unsupported { .. } => false,
        }
    }
    case.guard.is_none() && pattern_ok(&case.pattern, true)
}

/// `match` over literal values → `switch`.
pub(super) fn match_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Match { subject, cases } = stmt else {
        return Err(Decline::Shape);
    };
    if !cases.iter().all(switchable) {
        return Err(Decline::Shape);
    }
    let tag = b.expr(subject)?;
    let mut clauses = Vec::with_capacity(cases.len());
    for case in cases {
        let (list, mut body) = match &case.pattern {
            Pattern::MatchAs { name, .. } => {
                let mut body = Vec::new();
                if let Some(name) = name {
                    let lhs = b.arena.ident(name);
                    let value = b.arena.deep_copy(tag);
                    body.push(b.arena.define(lhs, value));
                }
                (Vec::new(), body)
            }
            pattern => (case_values(b, pattern)?, Vec::new()),
        };
        body.extend(b.stmts(&case.body)?);
        clauses.push(b.arena.case_clause(list, body));
    }
    let body = b.arena.block(clauses);
    Ok(vec![b.arena.alloc(NodeKind::SwitchStmt {
        init: NodeId::INVALID,
        tag,
        body,
    })])
}

fn case_values(b: &mut Builder<'_>, pattern: &Pattern) -> Result<Vec<NodeId>, BuildError> {
    match pattern {
        Pattern::MatchValue { value } => Ok(vec![b.expr(value)?]),
        Pattern::MatchSingleton { value } => Ok(vec![b.expr(&Expr::Constant {
            value: value.clone(),
        })?]),
        Pattern::MatchOr { patterns } => {
            let mut out = Vec::new();
            for p in patterns {
                out.extend(case_values(b, p)?);
            }
            Ok(out)
        }
        Pattern::MatchAs { .. } | Pattern::Unsupported { .. } => Ok(Vec::new()),
    }
}

/// `global x` / `nonlocal x` → a placeholder carrying the names.
pub(super) fn global(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let (Stmt::Global { names } | Stmt::Nonlocal { names }) = stmt else {
        return Err(Decline::Shape);
    };
    let id = b.arena.alloc(NodeKind::BadStmt);
    b.arena.meta_mut(id).globals.clone_from(names);
    Ok(vec![id])
}

/// Docstrings vanish; `...` is an empty statement.
pub(super) fn bare_constant(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Expr {
        value: Expr::Constant { value },
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    Ok(match value {
        Constant::Ellipsis => vec![b.arena.alloc(NodeKind::EmptyStmt)],
        _ => Vec::new(),
    })
}

pub(super) fn yield_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Expr {
        value: Expr::Yield { value },
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    let value = match value {
        Some(v) => b.expr(v)?,
        None => b.arena.nil(),
    };
    Ok(b.yield_stmts(value))
}

/// `yield from xs` → `for _, elt := range xs { yield <- elt; <-wait }`
pub(super) fn yield_from(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Expr {
        value: Expr::YieldFrom { value },
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    let x = b.expr(value)?;
    let key = b.arena.ident("_");
    let elt = b.arena.ident("elt");
    let value = b.arena.ident("elt");
    let step = b.yield_stmts(value);
    let body = b.arena.block(step);
    Ok(vec![b.arena.range_stmt(key, elt, x, body)])
}

pub(super) fn expr(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Expr { value } = stmt else {
        return Err(Decline::Shape);
    };
    let x = b.expr(value)?;
    Ok(vec![b.arena.expr_stmt(x)])
}

pub(super) fn simple(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    Ok(vec![match stmt {
        Stmt::Pass => b.arena.alloc(NodeKind::EmptyStmt),
        Stmt::Break => b.arena.branch(Token::Break),
        Stmt::Continue => b.arena.branch(Token::Continue),
        _ => return Err(Decline::Shape),
    }])
}

/// Flag a function literal or declaration as a generator when its Python
/// body yields.
pub(super) fn mark_generator(b: &mut Builder<'_>, id: NodeId, body: &[Stmt]) {
    if pygo_py::visit::body_yields(body) {
        b.arena.meta_mut(id).flags |= MetaFlags::GENERATOR;
    }
}
