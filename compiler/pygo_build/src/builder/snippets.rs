//! Splicing instantiated templates into the tree.

use pygo_ir::NodeId;
use pygo_py::{Call, Expr, FunctionDef, Stmt};
use pygo_snippets::{CallArg, Form, Instantiated, Resolution};
use tracing::trace;

use super::stmts::mark_generator;
use super::{Builder, Decline, Outcome};
use crate::BuildError;

impl Builder<'_> {
    /// The template instantiation for `call`, if any template covers it.
    ///
    /// Calls to module-level definitions, calls with unpacked arguments,
    /// and method or module calls no template accepts are left alone. A
    /// bare built-in name whose templates all reject the call is an error:
    /// there is nothing else it could become.
    fn lookup(&self, call: &Call) -> Result<Option<Instantiated>, BuildError> {
        if call.func.as_name().is_some_and(|id| self.is_user_defined(id)) {
            return Ok(None);
        }
        if call.args.iter().any(|a| matches!(a, Expr::Starred { .. }))
            || call.keywords.iter().any(|k| k.arg.is_none())
        {
            return Ok(None);
        }
        match self.registry.resolve(call) {
            Resolution::NoMatch => Ok(None),
            Resolution::Bound(inst) => Ok(Some(inst)),
            Resolution::Unbound { callee, attempted } => {
                if matches!(call.func.as_ref(), Expr::Name { .. }) {
                    Err(BuildError::UnresolvedCallee { callee, attempted })
                } else {
                    trace!(%callee, "no template binds; plain call");
                    Ok(None)
                }
            }
        }
    }

    /// Queue the template's one-time initializer, if it has one.
    fn queue_init(&mut self, init: Option<&FunctionDef>) -> Result<(), BuildError> {
        if let Some(init) = init {
            let body = self.stmts(&init.body)?;
            let stmt = self.initializer(body);
            self.queue(stmt);
        }
        Ok(())
    }

    /// Build an instantiated template as an expression.
    fn splice_expr(&mut self, inst: Instantiated) -> Result<NodeId, BuildError> {
        self.queue_init(inst.init.as_ref())?;
        let id = match inst.form {
            Form::Expr(expr) => self.expr(&expr)?,
            Form::Stmts(stmts) => {
                let body = self.stmts(&stmts)?;
                self.arena.iife(NodeId::INVALID, body)
            }
            Form::Closure(def) => {
                let lit = self.template_lit(&def, &inst.results)?;
                self.arena.call(lit, Vec::new())
            }
            Form::Call { def, args } => {
                let lit = self.template_lit(&def, &inst.results)?;
                let args = self.call_args(&args)?;
                self.arena.call(lit, args)
            }
        };
        self.mark_snippet(id, &inst.snippet);
        Ok(id)
    }

    fn call_args(&mut self, args: &[CallArg]) -> Result<Vec<NodeId>, BuildError> {
        args.iter()
            .map(|arg| {
                let value = self.expr(&arg.value)?;
                Ok(if arg.by_address {
                    self.arena.addr(value)
                } else {
                    value
                })
            })
            .collect()
    }

    /// A function literal for a template body. `results` names the result
    /// fields; unnamed results come from the return annotation or are
    /// inferred later.
    fn template_lit(&mut self, def: &FunctionDef, results: &[String]) -> Result<NodeId, BuildError> {
        let params = self.parameters(&def.args)?;
        let result_types = match &def.returns {
            Some(Expr::Tuple { elts }) => elts
                .iter()
                .map(|e| self.annotation(e))
                .collect::<Result<Vec<_>, _>>()?,
            Some(annotation) => vec![self.annotation(annotation)?],
            None => Vec::new(),
        };
        let result_types: Vec<NodeId> = result_types.into_iter().filter(|t| t.is_valid()).collect();
        let results = if results.is_empty() {
            if result_types.is_empty() {
                NodeId::INVALID
            } else {
                let fields = result_types
                    .into_iter()
                    .map(|ty| self.arena.field(&[], ty))
                    .collect();
                self.arena.field_list(fields)
            }
        } else {
            let mut fields = Vec::with_capacity(results.len());
            for (i, name) in results.iter().enumerate() {
                let ty = match result_types.get(i) {
                    Some(&ty) => ty,
                    None => self.any_of(Vec::new()),
                };
                fields.push(self.arena.field(&[name.as_str()], ty));
            }
            self.arena.field_list(fields)
        };
        let ty = self.arena.func_type(params.fields, results);
        self.arena.meta_mut(ty).defaults = params.defaults;
        let body = self.stmts(&def.body)?;
        let lit = self.arena.func_lit(ty, body);
        mark_generator(self, lit, &def.body);
        Ok(lit)
    }
}

/// A call covered by a template, in expression position.
pub(super) fn call(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Call(call) = expr else {
        return Err(Decline::Shape);
    };
    let Some(inst) = b.lookup(call)? else {
        return Err(Decline::Shape);
    };
    Ok(b.splice_expr(inst)?)
}

/// A statement-style template used as an expression statement: its body
/// replaces the statement.
pub(super) fn stmts(b: &mut Builder<'_>, stmt: &Stmt) -> Outcome<Vec<NodeId>> {
    let Stmt::Expr {
        value: Expr::Call(call),
    } = stmt
    else {
        return Err(Decline::Shape);
    };
    let Some(inst) = b.lookup(call)? else {
        return Err(Decline::Shape);
    };
    let Form::Stmts(body) = &inst.form else {
        let id = b.splice_expr(inst)?;
        return Ok(vec![b.arena.expr_stmt(id)]);
    };
    b.queue_init(inst.init.as_ref())?;
    let built = b.stmts(body)?;
    for &id in &built {
        b.mark_snippet(id, &inst.snippet);
    }
    Ok(built)
}
