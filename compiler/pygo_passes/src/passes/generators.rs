//! Generators and coroutines on goroutines and channels.

use pygo_ir::{ChanDir, GoType, MetaFlags, NodeId, NodeKind, SlotValue, Token};

use crate::scoping::single_result;
use crate::walk::{Cx, Pass, Rewrite};

use super::{call_args, callee_name, qualified};

/// Generator functions become handle factories.
///
/// A generator with results `T` returns `func() chan T` instead. Each call
/// of the handle lets the producer goroutine run to its next `yield` and
/// returns the channel the value arrives on; the channel closes when the
/// body finishes:
///
/// ```text
/// wait := make(chan struct{})
/// yield := make(chan T)
/// go func() { defer close(yield); <-wait; body }()
/// return func() chan T { wait <- struct{}{}; return yield }
/// ```
///
/// `next(g)` becomes `<-g()`.
pub(crate) struct YieldTransformer;

impl YieldTransformer {
    fn is_generator(cx: &Cx<'_>, id: NodeId) -> bool {
        cx.arena
            .meta(id)
            .is_some_and(|m| m.flags.contains(MetaFlags::GENERATOR))
    }

    fn lower(cx: &mut Cx<'_>, func: NodeId, func_type: NodeId, body: NodeId) {
        let elt = single_result(cx.arena, func_type);
        let elt = if elt.is_valid() {
            elt
        } else {
            cx.arena.alloc(NodeKind::InterfaceType)
        };
        let stmts = match cx.arena.kind(body) {
            NodeKind::BlockStmt { list } => list.clone(),
            _ => Vec::new(),
        };

        // wait := make(chan struct{}); yield := make(chan T)
        let wait = cx.arena.ident("wait");
        let make_wait = cx
            .arena
            .make_call(&GoType::chan(ChanDir::Both, GoType::empty_struct()), Vec::new());
        let wait_decl = cx.arena.define(wait, make_wait);
        let yield_chan = {
            let elt = cx.arena.deep_copy(elt);
            cx.arena.chan_type(ChanDir::Both, elt)
        };
        let make_yield = {
            let fun = cx.arena.ident("make");
            cx.arena.call(fun, vec![yield_chan])
        };
        let yield_ident = cx.arena.ident("yield");
        let yield_decl = cx.arena.define(yield_ident, make_yield);

        // go func() { defer close(yield); <-wait; body }()
        let close = {
            let target = cx.arena.ident("yield");
            cx.arena.call_path("close", vec![target])
        };
        let defer = cx.arena.defer_stmt(close);
        let first = {
            let wait = cx.arena.ident("wait");
            let recv = cx.arena.recv(wait);
            cx.arena.expr_stmt(recv)
        };
        let mut producer = vec![defer, first];
        producer.extend(stmts);
        let producer_ty = cx.arena.func_type(Vec::new(), NodeId::INVALID);
        let producer = cx.arena.func_lit(producer_ty, producer);
        let start = cx.arena.call(producer, Vec::new());
        let go = cx.arena.go_stmt(start);

        // return func() chan T { wait <- struct{}{}; return yield }
        let resume = {
            let wait = cx.arena.ident("wait");
            let unit = cx.arena.empty_struct_value();
            cx.arena.send(wait, unit)
        };
        let handoff = {
            let chan = cx.arena.ident("yield");
            cx.arena.ret(vec![chan])
        };
        let handle_results = Self::chan_results(cx, elt, true);
        let handle_ty = cx.arena.func_type(Vec::new(), handle_results);
        let handle = cx.arena.func_lit(handle_ty, vec![resume, handoff]);
        let ret = cx.arena.ret(vec![handle]);

        // The function itself now returns func() chan T.
        let inner = Self::chan_results(cx, elt, false);
        let factory = cx.arena.func_type(Vec::new(), inner);
        let field = cx.arena.field(&[], factory);
        let results = cx.arena.field_list(vec![field]);
        cx.arena
            .kind_mut(func_type)
            .set_slot(1, SlotValue::One(results));
        cx.arena.set_kind(
            body,
            NodeKind::BlockStmt {
                list: vec![wait_decl, yield_decl, go, ret],
            },
        );
        cx.arena.meta_mut(func).flags.remove(MetaFlags::GENERATOR);
        tracing::trace!(func = %cx.arena.sketch(func_type), "lowered generator");
    }

    /// `(chan T)` as a result list, copying `elt` when asked to.
    fn chan_results(cx: &mut Cx<'_>, elt: NodeId, copy: bool) -> NodeId {
        let elt = if copy { cx.arena.deep_copy(elt) } else { elt };
        let chan = cx.arena.chan_type(ChanDir::Both, elt);
        let field = cx.arena.field(&[], chan);
        cx.arena.field_list(vec![field])
    }
}

impl Pass for YieldTransformer {
    fn name(&self) -> &'static str {
        "YieldTransformer"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::FuncDecl { ty, body, .. } | NodeKind::FuncLit { ty, body }
                if Self::is_generator(cx, id) =>
            {
                let (ty, body) = (*ty, *body);
                Self::lower(cx, id, ty, body);
                Rewrite::Keep
            }
            NodeKind::CallExpr { .. } if callee_name(cx.arena, id) == Some("next") => {
                let [generator] = call_args(cx.arena, id)[..] else {
                    return Rewrite::Keep;
                };
                let pull = cx.arena.call(generator, Vec::new());
                Rewrite::Replace(cx.arena.recv(pull))
            }
            _ => Rewrite::Keep,
        }
    }
}

/// `asyncio` calls on awaited values.
pub(crate) struct AsyncTransformer;

impl AsyncTransformer {
    /// `<-asyncio.sleep(n)` → `time.Sleep(...)` scaled by `time.Second`.
    fn sleep(cx: &mut Cx<'_>, seconds: NodeId) -> NodeId {
        let literal_int = matches!(
            cx.arena.get(seconds),
            Some(NodeKind::BasicLit {
                kind: Token::Int,
                ..
            })
        );
        let duration = if literal_int {
            let second = cx.arena.path("time.Second");
            cx.arena.binary(second, Token::Mul, seconds)
        } else if cx.type_of(seconds).is_some_and(|t| t.is_integer()) {
            let second = cx.arena.path("time.Second");
            let n = cx.arena.convert(&GoType::qualified("time", "Duration"), seconds);
            cx.arena.binary(second, Token::Mul, n)
        } else {
            // time.Duration(float64(time.Second) * n)
            let second = cx.arena.path("time.Second");
            let second = cx.arena.convert(&GoType::FLOAT64, second);
            let scaled = cx.arena.binary(second, Token::Mul, seconds);
            cx.arena
                .convert(&GoType::qualified("time", "Duration"), scaled)
        };
        cx.arena.call_path("time.Sleep", vec![duration])
    }
}

impl Pass for AsyncTransformer {
    fn name(&self) -> &'static str {
        "AsyncTransformer"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::UnaryExpr {
                op: Token::Arrow,
                x,
            } => {
                let call = *x;
                let NodeKind::CallExpr { fun, .. } = cx.arena.kind(call) else {
                    return Rewrite::Keep;
                };
                if qualified(cx.arena, *fun) != Some(("asyncio", "sleep")) {
                    return Rewrite::Keep;
                }
                match call_args(cx.arena, call)[..] {
                    [seconds] => Rewrite::Replace(Self::sleep(cx, seconds)),
                    _ => Rewrite::Keep,
                }
            }
            NodeKind::CallExpr { fun, .. } if qualified(cx.arena, *fun) == Some(("asyncio", "run")) => {
                let [coroutine] = call_args(cx.arena, id)[..] else {
                    return Rewrite::Keep;
                };
                // `main` stays synchronous; other coroutines hand back a
                // channel to wait on.
                if callee_name(cx.arena, coroutine) == Some("main") {
                    Rewrite::Replace(coroutine)
                } else {
                    Rewrite::Replace(cx.arena.recv(coroutine))
                }
            }
            _ => Rewrite::Keep,
        }
    }
}
