#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{directive, NodeId, NodeKind, Token};

use super::{ApplyInlines, InsertUniqueInitializers};
use crate::passes::tests::Fixture;

/// `PYGO_INIT := func() { rand.Seed(seed) }`
fn initializer(fx: &mut Fixture, seed: i64) -> NodeId {
    let arena = &mut fx.arena;
    let seed = arena.int_lit(seed);
    let call = arena.call_path("rand.Seed", vec![seed]);
    let stmt = arena.expr_stmt(call);
    let ty = arena.func_type(Vec::new(), NodeId::INVALID);
    let lit = arena.func_lit(ty, vec![stmt]);
    let target = arena.ident(directive::INIT);
    arena.define(target, lit)
}

#[test]
fn initializers_become_one_init_each() {
    let mut fx = Fixture::new();
    let first = initializer(&mut fx, 1);
    let again = initializer(&mut fx, 1);
    let other = initializer(&mut fx, 2);
    let call = fx.arena.call_path("f", Vec::new());
    let stmt = fx.arena.expr_stmt(call);
    fx.func("main", vec![first, stmt, again, other]);

    fx.run(&mut InsertUniqueInitializers::default());
    assert_eq!(
        fx.sketch(),
        "package main\nfunc init() { rand.Seed(1) }\nfunc init() { rand.Seed(2) }\nfunc main() { f() }"
    );
}

#[test]
fn initializers_go_after_imports() {
    let mut fx = Fixture::new();
    let spec = fx.arena.alloc(NodeKind::ImportSpec {
        name: None,
        path: "math/rand".to_owned(),
    });
    let import = fx.arena.alloc(NodeKind::GenDecl {
        tok: Token::Import,
        specs: vec![spec],
    });
    fx.push_decl(import);
    let init = initializer(&mut fx, 7);
    fx.func("main", vec![init]);

    fx.run(&mut InsertUniqueInitializers::default());
    assert_eq!(
        fx.sketch(),
        "package main\nimport \"math/rand\"\nfunc init() { rand.Seed(7) }\nfunc main() {}"
    );
}

#[test]
fn no_initializers_leaves_file_alone() {
    let mut fx = Fixture::new();
    fx.func("main", Vec::new());
    fx.run(&mut InsertUniqueInitializers::default());
    assert_eq!(fx.sketch(), "package main\nfunc main() {}");
}

#[test]
fn inline_replaces_next_use() {
    let mut fx = Fixture::new();
    let target = fx.arena.ident(directive::INLINE);
    let value = fx.arena.ident("x");
    let queue = fx.arena.assign(vec![target], Token::Assign, vec![value]);
    let use_site = fx.arena.ident(directive::INLINE);
    let call = fx.arena.call_path("f", vec![use_site]);
    let stmt = fx.arena.expr_stmt(call);
    fx.func("main", vec![queue, stmt]);

    fx.run(&mut ApplyInlines::default());
    assert_eq!(fx.sketch_func("main"), "func main() { f(x) }");
}

#[test]
fn inline_without_value_stays() {
    let mut fx = Fixture::new();
    let use_site = fx.arena.ident(directive::INLINE);
    let call = fx.arena.call_path("f", vec![use_site]);
    let stmt = fx.arena.expr_stmt(call);
    fx.func("main", vec![stmt]);

    fx.run(&mut ApplyInlines::default());
    assert_eq!(fx.sketch_func("main"), "func main() { f(PYGO_INLINE) }");
}
