//! Comprehensions and generator expressions.
//!
//! Each comprehension is a closure that fills a named result through
//! nested `range` loops:
//!
//! ```text
//! [f(x) for x in xs if p(x)]
//!     → func() (elts []T) { for _, x := range xs { if p(x) { elts = append(elts, f(x)) } }; return }()
//! ```

use pygo_ir::{MetaFlags, NodeId, NodeKind, Token};
use pygo_py::{Comprehension, Expr};

use super::{literals, Builder, Decline, Outcome};
use crate::BuildError;

/// Result names for list, set and dict comprehensions.
const LIST: &str = "elts";
const SET: &str = "s";
const DICT: &str = "d";

/// One built `for ... in ... if ...` clause.
struct Loop {
    value: NodeId,
    x: NodeId,
    cond: NodeId,
}

fn loop_target_ok(target: &Expr) -> bool {
    match target {
        Expr::Name { .. } => true,
        Expr::Tuple { elts } | Expr::List { elts } => elts.iter().all(|e| e.as_name().is_some()),
        _ => false,
    }
}

impl Builder<'_> {
    fn loops(&mut self, generators: &[Comprehension]) -> Result<Vec<Loop>, BuildError> {
        let mut out = Vec::with_capacity(generators.len());
        for generator in generators {
            let x = self.expr(&generator.iter)?;
            let value = match &generator.target {
                Expr::Tuple { elts } | Expr::List { elts } => {
                    let names = self.exprs(elts)?;
                    self.arena.composite(NodeId::INVALID, names)
                }
                target => self.expr(target)?,
            };
            let conds = self.exprs(&generator.ifs)?;
            let cond = conds
                .into_iter()
                .reduce(|acc, c| self.arena.binary(acc, Token::LAnd, c))
                .unwrap_or(NodeId::INVALID);
            out.push(Loop { value, x, cond });
        }
        Ok(out)
    }

    /// Wrap `inner` in the loops, innermost last.
    fn nest(&mut self, loops: Vec<Loop>, inner: Vec<NodeId>) -> Vec<NodeId> {
        let mut body = inner;
        for l in loops.into_iter().rev() {
            if l.cond.is_valid() {
                body = vec![self.arena.if_stmt(l.cond, body, NodeId::INVALID)];
            }
            let key = self.arena.ident("_");
            let block = self.arena.block(body);
            body = vec![self.arena.range_stmt(key, l.value, l.x, block)];
        }
        body
    }

    /// `func() (result T) { init; loops; return }()`
    fn collect(
        &mut self,
        result: &str,
        ty: NodeId,
        init: Option<NodeId>,
        loops: Vec<NodeId>,
    ) -> NodeId {
        let results = self.named_result(result, ty);
        let mut body: Vec<NodeId> = init.into_iter().collect();
        body.extend(loops);
        body.push(self.arena.ret(Vec::new()));
        self.arena.iife(results, body)
    }

    /// `result = T{}` for map results, which must exist before the first
    /// store.
    fn fresh_result(&mut self, result: &str, ty: NodeId) -> NodeId {
        let ty = self.arena.deep_copy(ty);
        let empty = self.arena.composite(ty, Vec::new());
        let lhs = self.arena.ident(result);
        self.arena.assign(vec![lhs], Token::Assign, vec![empty])
    }

    fn value_type(&mut self, value: NodeId) -> NodeId {
        match self.static_type(value) {
            Some(ty) => self.arena.type_expr(&ty),
            None => self.any_of(vec![value]),
        }
    }
}

fn generators_ok(generators: &[Comprehension]) -> bool {
    !generators.is_empty() && generators.iter().all(|g| loop_target_ok(&g.target))
}

pub(super) fn list_comp(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::ListComp { elt, generators } = expr else {
        return Err(Decline::Shape);
    };
    if !generators_ok(generators) {
        return Err(Decline::Shape);
    }
    let loops = b.loops(generators)?;
    let value = b.expr(elt)?;
    let elt_ty = b.value_type(value);
    let ty = b.arena.alloc(NodeKind::ArrayType {
        len: NodeId::INVALID,
        elt: elt_ty,
    });
    // elts = append(elts, value)
    let acc = b.arena.ident(LIST);
    let appended = b.arena.call_path("append", vec![acc, value]);
    let lhs = b.arena.ident(LIST);
    let push = b.arena.assign(vec![lhs], Token::Assign, vec![appended]);
    let body = b.nest(loops, vec![push]);
    Ok(b.collect(LIST, ty, None, body))
}

pub(super) fn set_comp(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::SetComp { elt, generators } = expr else {
        return Err(Decline::Shape);
    };
    if !generators_ok(generators) {
        return Err(Decline::Shape);
    }
    let loops = b.loops(generators)?;
    let value = b.expr(elt)?;
    let key_ty = b.value_type(value);
    let ty = literals::set_type(b, key_ty);
    let init = b.fresh_result(SET, ty);
    // s[value] = struct{}{}
    let acc = b.arena.ident(SET);
    let slot = b.arena.index(acc, value);
    let present = b.arena.empty_struct_value();
    let store = b.arena.assign(vec![slot], Token::Assign, vec![present]);
    let body = b.nest(loops, vec![store]);
    Ok(b.collect(SET, ty, Some(init), body))
}

pub(super) fn dict_comp(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::DictComp {
        key,
        value,
        generators,
    } = expr
    else {
        return Err(Decline::Shape);
    };
    if !generators_ok(generators) {
        return Err(Decline::Shape);
    }
    let loops = b.loops(generators)?;
    let k = b.expr(key)?;
    let v = b.expr(value)?;
    let key_ty = b.value_type(k);
    let value_ty = b.value_type(v);
    let ty = b.arena.alloc(NodeKind::MapType {
        key: key_ty,
        value: value_ty,
    });
    let init = b.fresh_result(DICT, ty);
    let acc = b.arena.ident(DICT);
    let slot = b.arena.index(acc, k);
    let store = b.arena.assign(vec![slot], Token::Assign, vec![v]);
    let body = b.nest(loops, vec![store]);
    Ok(b.collect(DICT, ty, Some(init), body))
}

/// `(f(x) for x in xs)` → a generator closure, called once to start it.
pub(super) fn generator_exp(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::GeneratorExp { elt, generators } = expr else {
        return Err(Decline::Shape);
    };
    if !generators_ok(generators) {
        return Err(Decline::Shape);
    }
    let loops = b.loops(generators)?;
    let value = b.expr(elt)?;
    let elt_ty = b.value_type(value);
    let field = b.arena.field(&[], elt_ty);
    let results = b.arena.field_list(vec![field]);
    let step = b.yield_stmts(value);
    let body = b.nest(loops, step);
    let ty = b.arena.func_type(Vec::new(), results);
    let lit = b.arena.func_lit(ty, body);
    b.arena.meta_mut(lit).flags |= MetaFlags::GENERATOR;
    Ok(b.arena.call(lit, Vec::new()))
}
