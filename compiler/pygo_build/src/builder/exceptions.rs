//! Exceptions and context managers, lowered onto `panic`/`recover` and
//! `defer`.
//!
//! A raised exception is a panic with an `error` whose message starts with
//! the exception class name. `except E` matches by that prefix.

use pygo_ir::{GoType, NodeId, NodeKind, Token};
use pygo_py::{ExceptHandler, Expr, Stmt, Try};

use super::{Builder, Decline, Outcome};
use crate::BuildError;

/// Runtime panic messages that stand for a Python exception class.
const RUNTIME_PREFIXES: &[(&str, &str)] = &[
    ("IndexError", "runtime error: index out of range"),
    ("ZeroDivisionError", "runtime error: integer divide by zero"),
    ("RuntimeError", "runtime error"),
];

/// Handler types that catch everything.
fn is_catch_all(typ: Option<&Expr>) -> bool {
    match typ {
        None => true,
        Some(e) => matches!(e.as_name(), Some("Exception" | "BaseException")),
    }
}

/// Class name of an exception expression: `ValueError`, `errors.Custom`.
fn class_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Name { id } => Some(id),
        Expr::Attribute { attr, .. } => Some(attr),
        _ => None,
    }
}

impl Builder<'_> {
    /// `defer func() { body }()`
    fn deferred(&mut self, body: Vec<NodeId>) -> NodeId {
        let ty = self.arena.func_type(Vec::new(), NodeId::INVALID);
        let lit = self.arena.func_lit(ty, body);
        let call = self.arena.call(lit, Vec::new());
        self.arena.defer_stmt(call)
    }

    /// `if init; cond { body } else els`
    fn if_init(&mut self, init: NodeId, cond: NodeId, body: Vec<NodeId>, els: NodeId) -> NodeId {
        let body = self.arena.block(body);
        self.arena.alloc(NodeKind::IfStmt {
            init,
            cond,
            body,
            els,
        })
    }

    /// `strings.HasPrefix(err.Error(), "Name")`, widened for runtime panics
    /// that correspond to `Name`.
    fn matches_class(&mut self, name: &str) -> NodeId {
        let mut cond = self.has_prefix(name);
        for &(class, prefix) in RUNTIME_PREFIXES {
            if class == name {
                let runtime = self.has_prefix(prefix);
                cond = self.arena.binary(cond, Token::LOr, runtime);
            }
        }
        cond
    }

    fn has_prefix(&mut self, prefix: &str) -> NodeId {
        let err = self.arena.ident("err");
        let message = self.arena.sel(err, "Error");
        let message = self.arena.call(message, Vec::new());
        let prefix = self.arena.string_lit(prefix);
        self.arena.call_path("strings.HasPrefix", vec![message, prefix])
    }

    /// Condition for a typed handler: one class or a tuple of them.
    fn handler_cond(&mut self, typ: &Expr) -> Result<NodeId, BuildError> {
        let classes: &[Expr] = match typ {
            Expr::Tuple { elts } => elts,
            single => std::slice::from_ref(single),
        };
        let mut cond: Option<NodeId> = None;
        for class in classes {
            let Some(name) = class_name(class) else {
                return Err(super::unsupported_expr(typ));
            };
            let one = self.matches_class(name);
            cond = Some(match cond {
                Some(acc) => self.arena.binary(acc, Token::LOr, one),
                None => one,
            });
        }
        cond.ok_or_else(|| super::unsupported_expr(typ))
    }

    /// Handler body: bind the exception name, run, and stop unwinding.
    fn handler_body(
        &mut self,
        handler: &ExceptHandler,
        value: &str,
    ) -> Result<Vec<NodeId>, BuildError> {
        let mut body = Vec::with_capacity(handler.body.len() + 2);
        if let Some(name) = &handler.name {
            let lhs = self.arena.ident(name);
            let rhs = self.arena.ident(value);
            body.push(self.arena.define(lhs, rhs));
        }
        body.extend(self.stmts(&handler.body)?);
        body.push(self.arena.ret(Vec::new()));
        Ok(body)
    }

    /// The deferred recover that dispatches to `handlers`. Typed handlers
    /// are tried in source order and a catch-all becomes the final `else`.
    fn recover_dispatch(&mut self, handlers: &[ExceptHandler]) -> Result<NodeId, BuildError> {
        let catch_all = handlers.iter().find(|h| is_catch_all(h.typ.as_ref()));
        let typed: Vec<&ExceptHandler> = handlers
            .iter()
            .filter(|h| !is_catch_all(h.typ.as_ref()))
            .collect();

        let mut recovered = Vec::new();
        match catch_all {
            // A bare `except:` needs no error value.
            Some(handler) if typed.is_empty() && handler.name.is_none() => {
                recovered.extend(self.handler_body(handler, "err")?);
            }
            _ => {
                let inner = if typed.is_empty() {
                    match catch_all {
                        Some(handler) => self.handler_body(handler, "err")?,
                        None => Vec::new(),
                    }
                } else {
                    // if cond1 { ... } else if cond2 { ... } else { ... }
                    let mut chain = match catch_all {
                        Some(handler) => {
                            let body = self.handler_body(handler, "err")?;
                            self.arena.block(body)
                        }
                        None => NodeId::INVALID,
                    };
                    for handler in typed.iter().rev() {
                        let Some(typ) = handler.typ.as_ref() else {
                            continue;
                        };
                        let cond = self.handler_cond(typ)?;
                        let body = self.handler_body(handler, "err")?;
                        chain = self.arena.if_stmt(cond, body, chain);
                    }
                    vec![chain]
                };
                // if err, ok := r.(error); ok { inner }
                let err = self.arena.ident("err");
                let ok = self.arena.ident("ok");
                let r = self.arena.ident("r");
                let error = self.arena.ident("error");
                let assert = self.arena.alloc(NodeKind::TypeAssertExpr { x: r, ty: error });
                let init = self.arena.assign(vec![err, ok], Token::Define, vec![assert]);
                let ok = self.arena.ident("ok");
                recovered.push(self.if_init(init, ok, inner, NodeId::INVALID));
                let r = self.arena.ident("r");
                recovered.push(self.arena.panic_stmt(r));
            }
        }

        // if r := recover(); r != nil { recovered }
        let r = self.arena.ident("r");
        let recover = self.arena.call_path("recover", Vec::new());
        let init = self.arena.define(r, recover);
        let r = self.arena.ident("r");
        let nil = self.arena.nil();
        let cond = self.arena.binary(r, Token::Neq, nil);
        let check = self.if_init(init, cond, recovered, NodeId::INVALID);
        Ok(self.deferred(vec![check]))
    }

    /// `errors.New("Name")` or `fmt.Errorf("Name: %v", args...)`.
    fn exception_value(&mut self, name: &str, args: &[Expr]) -> Result<NodeId, BuildError> {
        if args.is_empty() {
            let message = self.arena.string_lit(name);
            return Ok(self.arena.call_path("errors.New", vec![message]));
        }
        let verbs = vec!["%v"; args.len()].join(", ");
        let format = self.arena.string_lit(&format!("{name}: {verbs}"));
        let mut call_args = vec![format];
        call_args.extend(self.exprs(args)?);
        Ok(self.arena.call_path("fmt.Errorf", call_args))
    }
}

/// ```text
/// try: body                     func() {
/// except E as e: h                  defer func() { finalbody }()
/// finally: finalbody        →       defer func() { recover dispatch }()
///                                   body
///                               }()
/// ```
///
/// With an `else:` the guarded part reports whether it finished, so
/// `orelse` runs outside the recover:
///
/// ```text
/// func() {
///     defer func() { finalbody }()
///     if func() bool { defer func() { recover dispatch }(); body; return true }() {
///         orelse
///     }
/// }()
/// ```
pub(super) fn try_(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Try(Try {
        body,
        handlers,
        orelse,
        finalbody,
    }) = stmt
    else {
        return Err(Decline::Shape);
    };
    let mut list = Vec::new();
    if !finalbody.is_empty() {
        let finally = b.stmts(finalbody)?;
        list.push(b.deferred(finally));
    }
    if handlers.is_empty() || orelse.is_empty() {
        if !handlers.is_empty() {
            list.push(b.recover_dispatch(handlers)?);
        }
        list.extend(b.stmts(body)?);
        list.extend(b.stmts(orelse)?);
    } else {
        let mut guarded = vec![b.recover_dispatch(handlers)?];
        guarded.extend(b.stmts(body)?);
        let finished = b.arena.bool_lit(true);
        guarded.push(b.arena.ret(vec![finished]));
        let results = b.arena.results_for(&GoType::BOOL);
        let completed = b.arena.iife(results, guarded);
        let orelse = b.stmts(orelse)?;
        let check = b.arena.if_stmt(completed, orelse, NodeId::INVALID);
        if finalbody.is_empty() {
            return Ok(vec![check]);
        }
        list.push(check);
    }
    let call = b.arena.iife(NodeId::INVALID, list);
    Ok(vec![b.arena.expr_stmt(call)])
}

pub(super) fn raise(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Raise { exc, .. } = stmt else {
        return Err(Decline::Shape);
    };
    let value = match exc {
        // Re-raise inside a handler.
        None => b.arena.ident("r"),
        Some(e @ Expr::Call(call)) if call.keywords.is_empty() => match class_name(&call.func) {
            Some(name) => b.exception_value(name, &call.args)?,
            None => b.expr(e)?,
        },
        Some(e @ Expr::Name { id }) => {
            if id.starts_with(char::is_uppercase) {
                b.exception_value(id, &[])?
            } else {
                b.expr(e)?
            }
        }
        Some(other) => b.expr(other)?,
    };
    Ok(vec![b.arena.panic_stmt(value)])
}

/// `assert c, msg` → `if !c { panic(fmt.Errorf("AssertionError: %v", msg)) }`
pub(super) fn assert(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Assert { test, msg } = stmt else {
        return Err(Decline::Shape);
    };
    let mut cond = b.expr(test)?;
    if matches!(b.arena.kind(cond), NodeKind::BinaryExpr { .. }) {
        cond = b.arena.paren(cond);
    }
    let failed = b.arena.not(cond);
    let args: Vec<Expr> = msg.iter().cloned().collect();
    let value = b.exception_value("AssertionError", &args)?;
    let panic = b.arena.panic_stmt(value);
    Ok(vec![b.arena.if_stmt(failed, vec![panic], NodeId::INVALID)])
}

/// `with open(p) as f: body` → a closure that binds each context, defers
/// its `Close`, and runs the body.
pub(super) fn with(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::With { items, body } = stmt else {
        return Err(Decline::Shape);
    };
    if items
        .iter()
        .any(|i| i.optional_vars.as_ref().is_some_and(|v| v.as_name().is_none()))
    {
        return Err(Decline::Shape);
    }
    let mut list = Vec::new();
    let mut unnamed = 0;
    for item in items {
        let name = match item.optional_vars.as_ref().and_then(Expr::as_name) {
            Some(name) => name.to_owned(),
            None => {
                unnamed += 1;
                if unnamed == 1 {
                    "ctx".to_owned()
                } else {
                    format!("ctx{}", unnamed - 1)
                }
            }
        };
        let value = b.expr(&item.context_expr)?;
        let lhs = b.arena.ident(&name);
        list.push(b.arena.define(lhs, value));

        // defer func() { if err := v.Close(); err != nil { panic(err) } }()
        let err = b.arena.ident("err");
        let target = b.arena.ident(&name);
        let close = b.arena.sel(target, "Close");
        let close = b.arena.call(close, Vec::new());
        let init = b.arena.define(err, close);
        let err = b.arena.ident("err");
        let nil = b.arena.nil();
        let failed = b.arena.binary(err, Token::Neq, nil);
        let err = b.arena.ident("err");
        let panic = b.arena.panic_stmt(err);
        let check = b.if_init(init, failed, vec![panic], NodeId::INVALID);
        list.push(b.deferred(vec![check]));
    }
    list.extend(b.stmts(body)?);
    let call = b.arena.iife(NodeId::INVALID, list);
    Ok(vec![b.arena.expr_stmt(call)])
}
