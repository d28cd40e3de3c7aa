use pretty_assertions::assert_eq;

use crate::{GoArena, GoType, NodeId, Token};

#[test]
fn expressions_render_inline() {
    let mut arena = GoArena::new();
    let xs = arena.ident("xs");
    let i = arena.ident("i");
    let elem = arena.index(xs, i);
    let one = arena.int_lit(1);
    let sum = arena.binary(elem, Token::Add, one);
    let call = arena.call_path("fmt.Println", vec![sum]);
    assert_eq!(arena.sketch(call), "fmt.Println(xs[i] + 1)");
}

#[test]
fn function_literals_show_signature_and_body() {
    let mut arena = GoArena::new();
    let results = arena.results_for(&GoType::INT);
    let x = arena.ident("x");
    let ret = arena.ret(vec![x]);
    let iife = arena.iife(results, vec![ret]);
    assert_eq!(arena.sketch(iife), "func() int { return x }()");
}

#[test]
fn control_flow_nests() {
    let mut arena = GoArena::new();
    let xs = arena.ident("xs");
    let key = arena.ident("_");
    let value = arena.ident("x");
    let cond = arena.ident("x");
    let brk = arena.branch(Token::Break);
    let check = arena.if_stmt(cond, vec![brk], NodeId::INVALID);
    let body = arena.block(vec![check]);
    let range = arena.range_stmt(key, value, xs, body);
    assert_eq!(
        arena.sketch(range),
        "for _, x := range xs { if x { break } }"
    );
}

#[test]
fn types_render_like_go() {
    let mut arena = GoArena::new();
    let ty = GoType::map(GoType::STRING, GoType::slice(GoType::Any));
    let expr = arena.type_expr(&ty);
    assert_eq!(arena.sketch(expr), "map[string][]interface{}");
}
