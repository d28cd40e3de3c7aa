//! The standard template library.
//!
//! Templates are Python function definitions built with [`pygo_py::dsl`].
//! Names inside a template body refer to Go identifiers (`strings.Index`,
//! `nil`) unless they are template parameters, which binding replaces.

mod builtins;
mod collections;
mod stdlib;
mod strings;

use pygo_ir::directive;
use pygo_py::dsl::{call, expr, name, path, string, subscript};
use pygo_py::{Expr, Operator, Stmt};

use crate::SnippetRegistry;

pub(crate) fn register(registry: &mut SnippetRegistry) {
    builtins::register(registry);
    collections::register(registry);
    strings::register(registry);
    stdlib::register(registry);
}

/// `PYGO_ANY[of]`: `interface{}` narrowed toward the type of `of`.
fn any_of(of: Expr) -> Expr {
    subscript(name(directive::ANY), of)
}

/// `PYGO_PTR[inner]`: `*inner`.
fn ptr(inner: Expr) -> Expr {
    subscript(name(directive::PTR), inner)
}

/// `'*' @ target`, which builds to `*target`.
fn deref(target: &str) -> Expr {
    pygo_py::dsl::bin(string("*"), Operator::MatMult, name(target))
}

/// `target @= value`, which builds to `*target = value`.
fn store(target: &str, value: Expr) -> Stmt {
    pygo_py::dsl::aug(name(target), Operator::MatMult, value)
}

fn list_of(elt: Expr) -> Expr {
    subscript(name("list"), elt)
}

fn isinstance(x: &str, ty: Expr) -> Expr {
    call(name("isinstance"), vec![name(x), ty])
}

/// `panic(errors.New(msg))`
fn panic_with(msg: &str) -> Stmt {
    expr(call(
        name("panic"),
        vec![call(path("errors.New"), vec![string(msg)])],
    ))
}

/// `PYGO_NOSNIPPET(func)(args)`
fn raw_call(func: &str, args: Vec<Expr>) -> Expr {
    call(call(name(directive::NO_SNIPPET), vec![name(func)]), args)
}

fn rune(c: &str) -> Expr {
    call(name(directive::RUNE), vec![string(c)])
}
