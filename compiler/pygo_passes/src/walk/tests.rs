#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{GoType, NodeId, NodeKind};

use super::{Cx, Pass, Rewrite};
use crate::passes::tests::Fixture;

/// Enter and leave events for calls and identifiers.
#[derive(Default)]
struct Trace {
    events: Vec<String>,
    finished: usize,
}

impl Trace {
    fn label(cx: &Cx<'_>, id: NodeId) -> Option<String> {
        match cx.arena.kind(id) {
            NodeKind::Ident { name } => Some(name.clone()),
            NodeKind::CallExpr { .. } => Some("call".to_owned()),
            _ => None,
        }
    }
}

impl Pass for Trace {
    fn name(&self) -> &'static str {
        "Trace"
    }

    fn enter(&mut self, cx: &mut Cx<'_>, id: NodeId) {
        if let Some(label) = Self::label(cx, id) {
            self.events.push(format!("enter {label}"));
        }
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if let Some(label) = Self::label(cx, id) {
            self.events.push(format!("leave {label}"));
        }
        Rewrite::Keep
    }

    fn finish(&mut self, _cx: &mut Cx<'_>) {
        self.finished += 1;
    }
}

/// A pass that is nothing but its `leave`.
struct Leave<F>(F);

fn leave_with<F: FnMut(&mut Cx<'_>, NodeId) -> Rewrite>(f: F) -> Leave<F> {
    Leave(f)
}

impl<F: FnMut(&mut Cx<'_>, NodeId) -> Rewrite> Pass for Leave<F> {
    fn name(&self) -> &'static str {
        "Leave"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        (self.0)(cx, id)
    }
}

fn call_stmt(fx: &mut Fixture, name: &str, args: &[&str]) -> NodeId {
    let args = args.iter().map(|a| fx.arena.ident(a)).collect();
    let call = fx.arena.call_path(name, args);
    fx.arena.expr_stmt(call)
}

/// Name of the function `stmt` calls, for `name()` statements.
fn called(cx: &Cx<'_>, stmt: NodeId) -> Option<String> {
    match cx.arena.kind(stmt) {
        NodeKind::ExprStmt { x } => match cx.arena.kind(*x) {
            NodeKind::CallExpr { fun, .. } => cx.arena.ident_name(*fun).map(str::to_owned),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn children_before_parents() {
    let mut fx = Fixture::new();
    let stmt = call_stmt(&mut fx, "f", &["a", "b"]);
    fx.func("main", vec![stmt]);
    let mut trace = Trace::default();
    fx.run(&mut trace);
    assert_eq!(
        trace.events,
        vec![
            "enter call",
            "enter f",
            "leave f",
            "enter a",
            "leave a",
            "enter b",
            "leave b",
            "leave call",
        ]
    );
    assert_eq!(trace.finished, 1);
}

#[test]
fn replacements_are_not_revisited() {
    let mut fx = Fixture::new();
    let stmt = call_stmt(&mut fx, "f", &["a"]);
    fx.func("main", vec![stmt]);
    let mut seen = 0;
    fx.run(&mut leave_with(|cx, id| {
        if !cx.arena.is_ident(id, "a") {
            return Rewrite::Keep;
        }
        seen += 1;
        let a = cx.arena.ident("a");
        Rewrite::Replace(cx.arena.call_path("g", vec![a]))
    }));
    assert_eq!(seen, 1);
    assert_eq!(fx.sketch_func("main"), "func main() { f(g(a)) }");
}

#[test]
fn statements_are_removed_from_lists() {
    let mut fx = Fixture::new();
    let drop = call_stmt(&mut fx, "drop", &[]);
    let again = call_stmt(&mut fx, "drop", &[]);
    let keep = call_stmt(&mut fx, "keep", &[]);
    fx.func("main", vec![drop, keep, again]);
    fx.run(&mut leave_with(|cx, id| match called(cx, id).as_deref() {
        Some("drop") => Rewrite::Remove,
        _ => Rewrite::Keep,
    }));
    assert_eq!(fx.sketch_func("main"), "func main() { keep() }");
}

#[test]
fn removal_empties_a_single_slot() {
    let mut fx = Fixture::new();
    let init = call_stmt(&mut fx, "setup", &[]);
    let cond = fx.arena.ident("ok");
    let body = fx.arena.block(Vec::new());
    let stmt = fx.arena.alloc(NodeKind::IfStmt {
        init,
        cond,
        body,
        els: NodeId::INVALID,
    });
    fx.func("main", vec![stmt]);
    fx.run(&mut leave_with(|cx, id| {
        if called(cx, id).as_deref() == Some("setup") {
            Rewrite::Remove
        } else {
            Rewrite::Keep
        }
    }));
    assert_eq!(fx.sketch_func("main"), "func main() { if ok {} }");
}

#[test]
fn inserted_statements_land_in_the_nearest_list() {
    let mut fx = Fixture::new();
    let inner = call_stmt(&mut fx, "use", &[]);
    let cond = fx.arena.ident("ok");
    let branch = fx.arena.if_stmt(cond, vec![inner], NodeId::INVALID);
    let outer = call_stmt(&mut fx, "use", &[]);
    fx.func("main", vec![branch, outer]);
    let mut outside = None;
    fx.run(&mut leave_with(|cx, id| {
        if matches!(cx.arena.kind(id), NodeKind::File { .. }) {
            let stray = cx.arena.call_path("stray", Vec::new());
            let stray = cx.arena.expr_stmt(stray);
            outside = Some(cx.insert_before(stray));
        }
        if called(cx, id).as_deref() == Some("use") {
            let setup = cx.arena.call_path("setup", Vec::new());
            let setup = cx.arena.expr_stmt(setup);
            assert!(cx.insert_before(setup));
        }
        Rewrite::Keep
    }));
    assert_eq!(outside, Some(false));
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { if ok { setup(); use() }; setup(); use() }"
    );
}

/// Types of `x` seen by expression statements, and types handed back
/// for deferred ones.
#[derive(Default)]
struct Recorder {
    scoped: bool,
    seen: Vec<Option<GoType>>,
    resolved: Vec<GoType>,
}

impl Pass for Recorder {
    fn name(&self) -> &'static str {
        "Recorder"
    }

    fn scoped(&self) -> bool {
        self.scoped
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if let NodeKind::ExprStmt { x } = *cx.arena.kind(id) {
            let ty = cx.type_of(x);
            if ty.is_none() {
                cx.defer_type(x, x);
            }
            self.seen.push(ty);
        }
        Rewrite::Keep
    }

    fn resolved(&mut self, _cx: &mut Cx<'_>, _node: NodeId, ty: &GoType) {
        self.resolved.push(ty.clone());
    }
}

/// `func main() { use x; x := 1; use x }`
fn use_around_define(fx: &mut Fixture) {
    let before = fx.arena.ident("x");
    let before = fx.arena.expr_stmt(before);
    let x = fx.arena.ident("x");
    let one = fx.arena.int_lit(1);
    let define = fx.arena.define(x, one);
    let after = fx.arena.ident("x");
    let after = fx.arena.expr_stmt(after);
    fx.func("main", vec![before, define, after]);
}

#[test]
fn scoped_walks_see_declarations() {
    let mut fx = Fixture::new();
    use_around_define(&mut fx);
    let mut recorder = Recorder {
        scoped: true,
        ..Recorder::default()
    };
    let report = fx.run(&mut recorder);
    assert_eq!(recorder.seen, vec![None, Some(GoType::INT)]);
    assert_eq!(recorder.resolved, vec![GoType::INT]);
    assert!(report.unresolved.is_empty());
}

#[test]
fn plain_walks_do_not() {
    let mut fx = Fixture::new();
    use_around_define(&mut fx);
    let mut recorder = Recorder::default();
    fx.run(&mut recorder);
    assert_eq!(recorder.seen, vec![None, None]);
    assert!(recorder.resolved.is_empty());
}
