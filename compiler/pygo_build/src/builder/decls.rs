//! Module-level declarations and function definitions.

use pygo_ir::{ChanDir, NodeId, NodeKind, Token};
use pygo_py::{Alias, Arguments, Constant, Expr, FunctionDef, Module, Stmt};
use tracing::debug;

use super::stmts::mark_generator;
use super::{Builder, Decline, Outcome};
use crate::BuildError;

/// Built parameter list of a function.
pub(crate) struct Params {
    /// One `Field` per parameter, variadic last.
    pub fields: Vec<NodeId>,
    /// Default values by parameter name.
    pub defaults: Vec<(String, NodeId)>,
}

impl Builder<'_> {
    /// Build the whole module as `package main`.
    pub(super) fn module(&mut self, module: &Module) -> Result<NodeId, BuildError> {
        let mut decls = Vec::with_capacity(module.body.len());
        for stmt in &module.body {
            decls.extend(self.decl(stmt)?);
        }
        Ok(self.arena.alloc(NodeKind::File {
            package: "main".to_owned(),
            decls,
        }))
    }

    /// Parameters of a Python signature.
    ///
    /// A parameter's type is its annotation, else the type of its default,
    /// else a narrowable `interface{}`. `*args` becomes a trailing variadic
    /// parameter and `**kwargs` a `map[string]interface{}`.
    pub(super) fn parameters(&mut self, args: &Arguments) -> Result<Params, BuildError> {
        let positional: Vec<_> = args.positional().collect();
        let first_default = positional.len().saturating_sub(args.defaults.len());
        let mut fields = Vec::new();
        let mut defaults = Vec::new();

        let kwonly = args
            .kwonlyargs
            .iter()
            .zip(args.kw_defaults.iter().map(Option::as_ref).chain(std::iter::repeat(None)));
        let with_defaults = positional
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                let default = i
                    .checked_sub(first_default)
                    .and_then(|d| args.defaults.get(d));
                (*arg, default)
            })
            .chain(kwonly);

        for (arg, default) in with_defaults {
            let default = match default {
                Some(value) => Some(self.expr(value)?),
                None => None,
            };
            let ty = match &arg.annotation {
                Some(annotation) => self.annotation(annotation)?,
                None => NodeId::INVALID,
            };
            let ty = if ty.is_valid() {
                ty
            } else {
                match default.and_then(|d| self.static_type(d)) {
                    Some(known) => self.arena.type_expr(&known),
                    None => self.any_of(Vec::new()),
                }
            };
            fields.push(self.arena.field(&[arg.arg.as_str()], ty));
            if let Some(default) = default {
                defaults.push((arg.arg.clone(), default));
            }
        }

        if let Some(kwarg) = &args.kwarg {
            let key = self.arena.ident("string");
            let value = self.any_of(Vec::new());
            let ty = self.arena.alloc(NodeKind::MapType { key, value });
            fields.push(self.arena.field(&[kwarg.arg.as_str()], ty));
        }
        if let Some(vararg) = &args.vararg {
            let elt = match &vararg.annotation {
                Some(annotation) => self.annotation(annotation)?,
                None => NodeId::INVALID,
            };
            let elt = if elt.is_valid() {
                elt
            } else {
                self.any_of(Vec::new())
            };
            let ty = self.arena.alloc(NodeKind::Ellipsis { elt });
            fields.push(self.arena.field(&[vararg.arg.as_str()], ty));
        }
        Ok(Params { fields, defaults })
    }

    /// Result list spelled by a return annotation, `INVALID` when absent
    /// (inferred later) or `None`.
    fn annotated_results(&mut self, returns: Option<&Expr>) -> Result<NodeId, BuildError> {
        let Some(returns) = returns else {
            return Ok(NodeId::INVALID);
        };
        let ty = self.annotation(returns)?;
        if !ty.is_valid() {
            return Ok(NodeId::INVALID);
        }
        let field = self.arena.field(&[], ty);
        Ok(self.arena.field_list(vec![field]))
    }

    /// Signature and body of a function definition.
    ///
    /// `args` stands in for the definition's own parameters; methods pass
    /// theirs with the receiver removed.
    pub(super) fn function(
        &mut self,
        def: &FunctionDef,
        args: &Arguments,
        is_async: bool,
    ) -> Result<(NodeId, NodeId), BuildError> {
        let params = self.parameters(args)?;
        let mut body = self.stmts(&def.body)?;
        let results = if is_async && def.name != "main" {
            let elt = match def.returns.as_ref() {
                Some(returns) => self.annotation(returns)?,
                None => NodeId::INVALID,
            };
            let (chan, wrapped) = self.channel_body(elt, body);
            body = wrapped;
            let field = self.arena.field(&[], chan);
            self.arena.field_list(vec![field])
        } else {
            self.annotated_results(def.returns.as_ref())?
        };
        let ty = self.arena.func_type(params.fields, results);
        self.arena.meta_mut(ty).defaults = params.defaults;
        let body = self.arena.block(body);
        Ok((ty, body))
    }

    /// Body of an `async def`: run the original body on a goroutine that
    /// delivers its return value on a channel.
    ///
    /// ```text
    /// r := make(chan T)
    /// go func() { defer close(r); body with `return v` → `r <- v; return` }()
    /// return r
    /// ```
    fn channel_body(&mut self, elt: NodeId, body: Vec<NodeId>) -> (NodeId, Vec<NodeId>) {
        let returned = self.rewrite_returns(&body);
        let elt = if elt.is_valid() {
            elt
        } else {
            self.any_of(returned)
        };
        let chan = self.arena.chan_type(ChanDir::Both, elt);

        let r = self.arena.ident("r");
        let chan_copy = self.arena.deep_copy(chan);
        let make = self.arena.ident("make");
        let make = self.arena.call(make, vec![chan_copy]);
        let open = self.arena.define(r, make);

        let r = self.arena.ident("r");
        let close = self.arena.call_path("close", vec![r]);
        let mut inner = vec![self.arena.defer_stmt(close)];
        inner.extend(body);
        let ty = self.arena.func_type(Vec::new(), NodeId::INVALID);
        let lit = self.arena.func_lit(ty, inner);
        let call = self.arena.call(lit, Vec::new());
        let spawn = self.arena.go_stmt(call);

        let r = self.arena.ident("r");
        let ret = self.arena.ret(vec![r]);
        (chan, vec![open, spawn, ret])
    }

    /// Turn each `return v` in `body` (outside nested function literals)
    /// into `{ r <- v; return }`. Returns the returned values.
    fn rewrite_returns(&mut self, body: &[NodeId]) -> Vec<NodeId> {
        let mut returned = Vec::new();
        let mut stack: Vec<NodeId> = body.to_vec();
        while let Some(id) = stack.pop() {
            match self.arena.kind(id) {
                NodeKind::FuncLit { .. } => continue,
                NodeKind::ReturnStmt { results } => {
                    let results = results.clone();
                    let Some(&value) = results.first() else {
                        continue;
                    };
                    returned.push(value);
                    let r = self.arena.ident("r");
                    let send = self.arena.send(r, value);
                    let ret = self.arena.ret(Vec::new());
                    self.arena.set_kind(
                        id,
                        NodeKind::BlockStmt {
                            list: vec![send, ret],
                        },
                    );
                }
                other => stack.extend(other.children()),
            }
        }
        returned
    }
}

fn function_def(stmt: &Stmt) -> Option<(&FunctionDef, bool)> {
    match stmt {
        Stmt::FunctionDef(def) => Some((def, false)),
        Stmt::AsyncFunctionDef(def) => Some((def, true)),
        _ => None,
    }
}

/// `def f(...)` at module level → `func f(...) { ... }`
pub(super) fn func_decl(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Some((def, is_async)) = function_def(stmt) else {
        return Err(Decline::Shape);
    };
    let (ty, body) = b.function(def, &def.args, is_async)?;
    let id = b.arena.alloc(NodeKind::FuncDecl {
        recv: NodeId::INVALID,
        name: def.name.clone(),
        ty,
        body,
    });
    mark_generator(b, id, &def.body);
    debug!(name = %def.name, "function");
    Ok(vec![id])
}

/// A `def` inside a function → `name := func(...) { ... }`
pub(super) fn nested_def(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Some((def, is_async)) = function_def(stmt) else {
        return Err(Decline::Shape);
    };
    let (ty, body) = b.function(def, &def.args, is_async)?;
    let lit = b.arena.alloc(NodeKind::FuncLit { ty, body });
    mark_generator(b, lit, &def.body);
    let name = b.arena.ident(&def.name);
    Ok(vec![b.arena.define(name, lit)])
}

fn import_spec(b: &mut Builder<'_>, path: &str, alias: &Alias) -> NodeId {
    b.arena.alloc(NodeKind::ImportSpec {
        name: alias.asname.clone(),
        path: path.replace('.', "/"),
    })
}

/// `import a.b as c` → `import c "a/b"`
pub(super) fn import(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let specs = match stmt {
        Stmt::Import { names } => names
            .iter()
            .map(|alias| import_spec(b, &alias.name, alias))
            .collect(),
        Stmt::ImportFrom {
            module: Some(module),
            names,
        } => names
            .iter()
            .map(|alias| import_spec(b, &format!("{module}.{}", alias.name), alias))
            .collect(),
        _ => return Err(Decline::Shape),
    };
    Ok(vec![b.arena.alloc(NodeKind::GenDecl {
        tok: Token::Import,
        specs,
    })])
}

/// Name, annotation and value of a single-name module assignment.
fn simple_assignment(stmt: &Stmt) -> Option<(&str, Option<&Expr>, Option<&Expr>)> {
    match stmt {
        Stmt::Assign { targets, value } => match targets.as_slice() {
            [target] => Some((target.as_name()?, None, Some(value))),
            _ => None,
        },
        Stmt::AnnAssign {
            target,
            annotation,
            value,
        } => Some((target.as_name()?, Some(annotation), value.as_ref())),
        _ => None,
    }
}

/// After module code has moved into `init`, a module assignment is split
/// so the value is computed in order: `var x T` plus `func init() { x = v }`.
pub(super) fn global_assign(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    if !b.global_mode {
        return Err(Decline::Shape);
    }
    let Some((name, annotation, value)) = simple_assignment(stmt) else {
        return Err(Decline::Shape);
    };
    let value = match value {
        Some(v) => Some(b.expr(v)?),
        None => None,
    };
    let ty = match annotation {
        Some(annotation) => b.annotation(annotation)?,
        None => NodeId::INVALID,
    };
    let ty = match (ty.is_valid(), value) {
        (true, _) => ty,
        (false, Some(v)) => match b.static_type(v) {
            Some(known) => b.arena.type_expr(&known),
            None => b.any_of(vec![v]),
        },
        (false, None) => b.any_of(Vec::new()),
    };
    let mut out = vec![b.var_gen_decl(name, ty, Vec::new())];
    if let Some(value) = value {
        let lhs = b.arena.ident(name);
        let store = b.arena.assign(vec![lhs], Token::Assign, vec![value]);
        out.push(b.init_func(vec![store]));
    }
    Ok(out)
}

/// `x = v` → `var x = v`; `x: T = v` → `var x T = v`
pub(super) fn var(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Some((name, annotation, value)) = simple_assignment(stmt) else {
        return Err(Decline::Shape);
    };
    let ty = match annotation {
        Some(annotation) => b.annotation(annotation)?,
        None => NodeId::INVALID,
    };
    let values = match value {
        Some(v) => vec![b.expr(v)?],
        None => Vec::new(),
    };
    Ok(vec![b.var_gen_decl(name, ty, values)])
}

/// A module docstring produces nothing.
pub(super) fn docstring(_: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    match stmt {
        Stmt::Expr {
            value: Expr::Constant {
                value: Constant::Str(_),
            },
        } => Ok(Vec::new()),
        _ => Err(Decline::Shape),
    }
}

/// Any other module statement runs from `func init()`.
pub(super) fn global_code(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let body = b.stmt(stmt)?;
    b.global_mode = true;
    Ok(vec![b.init_func(body)])
}
