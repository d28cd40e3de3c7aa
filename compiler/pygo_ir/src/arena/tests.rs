use pretty_assertions::assert_eq;

use super::*;
use crate::Token;

fn sum(arena: &mut GoArena) -> NodeId {
    let a = arena.int_lit(1);
    let b = arena.int_lit(2);
    arena.binary(a, Token::Add, b)
}

#[test]
fn deep_copy_is_structurally_equal_but_distinct() {
    let mut arena = GoArena::new();
    let expr = sum(&mut arena);
    arena.set_ty(expr, GoType::INT);
    let copy = arena.deep_copy(expr);

    assert_ne!(copy, expr);
    assert!(arena.structurally_eq(expr, copy));
    assert_eq!(arena.ty(copy), Some(&GoType::INT));
    assert_eq!(arena.structural_hash(expr), arena.structural_hash(copy));
    for (a, b) in arena.children(expr).into_iter().zip(arena.children(copy)) {
        assert_ne!(a, b);
    }
}

#[test]
fn structural_equality_sees_leaf_differences() {
    let mut arena = GoArena::new();
    let one = sum(&mut arena);
    let a = arena.int_lit(1);
    let c = arena.int_lit(3);
    let other = arena.binary(a, Token::Add, c);
    assert!(!arena.structurally_eq(one, other));
}

#[test]
fn count_interfaces_walks_from_root_only() {
    let mut arena = GoArena::new();
    let _orphan = arena.type_expr(&GoType::Any);
    let ty = arena.type_expr(&GoType::map(GoType::Any, GoType::slice(GoType::Any)));
    assert_eq!(arena.count_interfaces(ty), 2);
}

#[test]
fn parents_and_ancestors() {
    let mut arena = GoArena::new();
    let expr = sum(&mut arena);
    let stmt = arena.expr_stmt(expr);
    let block = arena.block(vec![stmt]);
    let parents = arena.parents(block);
    let leaf = arena.children(expr)[0];

    assert_eq!(parents.parent(leaf), Some(expr));
    assert_eq!(
        parents.ancestors(leaf).collect::<Vec<_>>(),
        vec![expr, stmt, block]
    );
    assert_eq!(parents.parent(block), None);
}

#[test]
fn set_slot_and_replace_child() {
    let mut arena = GoArena::new();
    let expr = sum(&mut arena);
    let z = arena.ident("z");
    let first = arena.children(expr)[0];
    assert!(arena.kind_mut(expr).replace_child(first, z));
    assert_eq!(arena.children(expr)[0], z);

    let a = arena.ident("a");
    let call = arena.call_path("f", vec![a]);
    arena
        .kind_mut(call)
        .set_slot(1, crate::SlotValue::Many(Vec::new()));
    assert_eq!(arena.children(call).len(), 1);
}

#[test]
fn quote_escapes_and_unquotes() {
    let text = "say \"hi\"\n\ttab\u{1}";
    let quoted = crate::quote(text);
    assert_eq!(quoted, "\"say \\\"hi\\\"\\n\\ttab\\u0001\"");
    assert_eq!(crate::unquote(&quoted).as_deref(), Some(text));
}

#[test]
fn iife_shape() {
    let mut arena = GoArena::new();
    let results = arena.results_for(&GoType::INT);
    let one = arena.int_lit(1);
    let ret = arena.ret(vec![one]);
    let call = arena.iife(results, vec![ret]);
    let NodeKind::CallExpr { fun, args, .. } = arena.kind(call) else {
        panic!("expected call");
    };
    assert!(args.is_empty());
    assert!(matches!(arena.kind(*fun), NodeKind::FuncLit { .. }));
}
