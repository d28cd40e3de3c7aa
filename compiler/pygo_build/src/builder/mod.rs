//! The builder: rule dispatch and the state shared by every rule.
//!
//! Rules live in the sibling modules, grouped by what they build. Each is
//! a plain function over `&mut Builder` so the kind→rule tables in
//! [`rules`] can be `const` slices of function pointers.

mod annotations;
mod calls;
mod classes;
mod comprehensions;
mod decls;
mod exceptions;
mod exprs;
mod literals;
mod operators;
mod rules;
mod snippets;
mod stmts;

use pygo_ir::{directive, GoArena, GoType, MetaFlags, NodeId, NodeKind, Token};
use pygo_py::{unparse_stmt, Expr, Module, Stmt};
use pygo_snippets::SnippetRegistry;
use pygo_types::{ScopeId, ScopeTree, TypeCx};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::BuildError;

/// A converted module.
#[derive(Debug)]
pub struct Built {
    pub arena: GoArena,
    /// The `File` node.
    pub file: NodeId,
}

/// Convert `module` into a Go file.
///
/// # Arguments
///
/// * `module` - The parsed Python module. Read-only.
/// * `registry` - Templates consulted for calls to emulated built-ins.
///
/// # Returns
///
/// A fresh arena holding the `package main` file, or the first construct
/// no rule could convert.
pub fn build(module: &Module, registry: &SnippetRegistry) -> Result<Built, BuildError> {
    let mut builder = Builder::new(registry, module);
    let file = builder.module(module)?;
    debug!(nodes = builder.arena.len(), "module built");
    Ok(Built {
        arena: builder.arena,
        file,
    })
}

/// Why a rule did not produce output.
pub(crate) enum Decline {
    /// The node is not the shape this rule handles; try the next rule.
    Shape,
    /// The rule recognized the node but building it failed.
    Fail(BuildError),
}

impl From<BuildError> for Decline {
    fn from(err: BuildError) -> Self {
        Decline::Fail(err)
    }
}

pub(crate) type Outcome<T> = Result<T, Decline>;

/// A named conversion candidate.
pub(crate) struct Rule<F> {
    pub name: &'static str,
    pub apply: F,
}

pub(crate) type ExprRule = Rule<fn(&mut Builder<'_>, &Expr) -> Outcome<NodeId>>;
pub(crate) type StmtRule = Rule<fn(&mut Builder<'_>, &Stmt) -> Outcome<Vec<NodeId>>>;

pub(crate) struct Builder<'r> {
    pub(crate) arena: GoArena,
    registry: &'r SnippetRegistry,
    /// Set once a top-level statement has been moved into `func init()`.
    /// Later top-level assignments split into a `var` and an init.
    global_mode: bool,
    /// Statements to emit before the statement being built.
    pending: Vec<NodeId>,
    /// Functions and classes defined at module level. Calls to them never
    /// bind a built-in template of the same name.
    user_defs: FxHashSet<String>,
    /// Empty scopes for literal-only type derivation.
    no_scopes: ScopeTree,
}

impl<'r> Builder<'r> {
    fn new(registry: &'r SnippetRegistry, module: &Module) -> Self {
        let user_defs = module
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::FunctionDef(def) | Stmt::AsyncFunctionDef(def) => Some(def.name.clone()),
                Stmt::ClassDef(class) => Some(class.name.clone()),
                _ => None,
            })
            .collect();
        Builder {
            arena: GoArena::new(),
            registry,
            global_mode: false,
            pending: Vec::new(),
            user_defs,
            no_scopes: ScopeTree::new(),
        }
    }

    /// Run the first rule that accepts `node`.
    fn dispatch<N: ?Sized, T>(
        &mut self,
        node: &N,
        rules: &[Rule<fn(&mut Builder<'_>, &N) -> Outcome<T>>],
    ) -> Result<Option<T>, BuildError> {
        for rule in rules {
            match (rule.apply)(self, node) {
                Ok(out) => {
                    trace!(rule = rule.name, "rule applied");
                    return Ok(Some(out));
                }
                Err(Decline::Shape) => {}
                Err(Decline::Fail(err)) => return Err(err),
            }
        }
        Ok(None)
    }

    pub(crate) fn expr(&mut self, expr: &Expr) -> Result<NodeId, BuildError> {
        match self.dispatch(expr, rules::expr_rules(expr))? {
            Some(id) => Ok(id),
            None => Err(unsupported_expr(expr)),
        }
    }

    pub(crate) fn exprs(&mut self, exprs: &[Expr]) -> Result<Vec<NodeId>, BuildError> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    /// Build a statement, preceded by whatever its expressions queued.
    pub(crate) fn stmt(&mut self, stmt: &Stmt) -> Result<Vec<NodeId>, BuildError> {
        let outer = std::mem::take(&mut self.pending);
        let built = self.dispatch(stmt, rules::stmt_rules(stmt));
        let mut out = std::mem::replace(&mut self.pending, outer);
        match built? {
            Some(stmts) => {
                out.extend(stmts);
                Ok(out)
            }
            None => Err(unsupported_stmt(stmt)),
        }
    }

    pub(crate) fn stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<NodeId>, BuildError> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            out.extend(self.stmt(stmt)?);
        }
        Ok(out)
    }

    /// Build a module-level statement into declarations. Statements queued
    /// by its expressions go into a `func init()` placed before it.
    fn decl(&mut self, stmt: &Stmt) -> Result<Vec<NodeId>, BuildError> {
        let outer = std::mem::take(&mut self.pending);
        let built = self.dispatch(stmt, rules::decl_rules(stmt));
        let pending = std::mem::replace(&mut self.pending, outer);
        let Some(decls) = built? else {
            return Err(unsupported_stmt(stmt));
        };
        let mut out = Vec::with_capacity(decls.len() + 1);
        if !pending.is_empty() {
            out.push(self.init_func(pending));
        }
        out.extend(decls);
        Ok(out)
    }

    /// Queue a statement to run before the one being built.
    pub(crate) fn queue(&mut self, stmt: NodeId) {
        self.pending.push(stmt);
    }

    /// `func init() { body }`, marked as synthesized from module code.
    pub(crate) fn init_func(&mut self, body: Vec<NodeId>) -> NodeId {
        let ty = self.arena.func_type(Vec::new(), NodeId::INVALID);
        let body = self.arena.block(body);
        let id = self.arena.alloc(NodeKind::FuncDecl {
            recv: NodeId::INVALID,
            name: "init".to_owned(),
            ty,
            body,
        });
        self.arena.meta_mut(id).flags |= MetaFlags::GLOBAL_CODE;
        id
    }

    /// Type of `id` derivable without any declarations in scope.
    pub(crate) fn static_type(&self, id: NodeId) -> Option<GoType> {
        TypeCx::new(&self.arena, &self.no_scopes, ScopeId::ROOT).type_of(id)
    }

    /// `interface{}` to be narrowed toward the types of `sources`.
    pub(crate) fn any_of(&mut self, sources: Vec<NodeId>) -> NodeId {
        let id = self.arena.alloc(NodeKind::InterfaceType);
        if !sources.is_empty() {
            self.arena.meta_mut(id).elts = sources;
        }
        id
    }

    /// Element type for a collection of `elts`: their common type if every
    /// one is known and they agree, else a narrowable `interface{}`.
    pub(crate) fn elt_type(&mut self, elts: &[NodeId]) -> NodeId {
        let types: Vec<Option<GoType>> = elts.iter().map(|&e| self.static_type(e)).collect();
        if let Some(Some(first)) = types.first() {
            if types.iter().all(|t| t.as_ref() == Some(first)) {
                let first = first.clone();
                return self.arena.type_expr(&first);
            }
        }
        self.any_of(elts.to_vec())
    }

    /// Result field list: the known type of `value`, or a narrowable
    /// `interface{}`.
    pub(crate) fn result_of(&mut self, values: &[NodeId]) -> NodeId {
        let ty = self.elt_type(values);
        let field = self.arena.field(&[], ty);
        self.arena.field_list(vec![field])
    }

    /// Named result list `(name T)`.
    pub(crate) fn named_result(&mut self, name: &str, ty: NodeId) -> NodeId {
        let field = self.arena.field(&[name], ty);
        self.arena.field_list(vec![field])
    }

    /// `yield <- value; <-wait`, the body of a generator step.
    pub(crate) fn yield_stmts(&mut self, value: NodeId) -> Vec<NodeId> {
        let chan = self.arena.ident("yield");
        let send = self.arena.send(chan, value);
        let wait = self.arena.ident("wait");
        let recv = self.arena.recv(wait);
        let resume = self.arena.expr_stmt(recv);
        vec![send, resume]
    }

    /// Mark `id` as the output of snippet `name`.
    pub(crate) fn mark_snippet(&mut self, id: NodeId, name: &str) {
        let meta = self.arena.meta_mut(id);
        meta.flags |= MetaFlags::FROM_SNIPPET;
        meta.snippet = Some(name.to_owned());
    }

    /// `PYGO_INIT := func() { body }`, later hoisted into `func init()`.
    pub(crate) fn initializer(&mut self, body: Vec<NodeId>) -> NodeId {
        let ty = self.arena.func_type(Vec::new(), NodeId::INVALID);
        let lit = self.arena.func_lit(ty, body);
        let lhs = self.arena.ident(directive::INIT);
        self.arena.assign(vec![lhs], Token::Define, vec![lit])
    }

    fn is_user_defined(&self, name: &str) -> bool {
        self.user_defs.contains(name)
    }
}

pub(crate) fn unsupported_stmt(stmt: &Stmt) -> BuildError {
    BuildError::unsupported(stmt.kind_name(), unparse_stmt(stmt, 0).trim_end())
}

pub(crate) fn unsupported_expr(expr: &Expr) -> BuildError {
    let stmt = Stmt::Expr {
        value: expr.clone(),
    };
    BuildError::unsupported(expr.kind_name(), unparse_stmt(&stmt, 0).trim_end())
}

#[cfg(test)]
mod tests;
