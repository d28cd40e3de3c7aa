#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{GoArena, GoType, NodeId, Token};

use super::{
    AppendSliceViaUnpacking, HandleTypeCoercion, NegativeIndexesSubtractFromLen,
    ReplacePowWithMathPow, SpecialComparators, StringifyStringMember, Truthiness,
};
use crate::passes::tests::Fixture;
use crate::walk::Pass;

/// Run `pass` over `func f(params) { body }` and sketch the body.
fn in_func(
    params: &[(&str, GoType)],
    body: impl FnOnce(&mut GoArena) -> Vec<NodeId>,
    pass: &mut dyn Pass,
) -> String {
    let mut fx = Fixture::new();
    let fields = params
        .iter()
        .map(|(name, ty)| {
            let ty = fx.arena.type_expr(ty);
            fx.arena.field(&[*name], ty)
        })
        .collect();
    let body = body(&mut fx.arena);
    fx.func_with("f", fields, NodeId::INVALID, body);
    fx.run(pass);
    let sketch = fx.sketch_func("f");
    let open = sketch.find(") {").expect("signature");
    sketch[open + 2..].to_owned()
}

/// Body of one expression statement `x op y`.
fn binary(x: &'static str, op: Token, y: &'static str) -> impl FnOnce(&mut GoArena) -> Vec<NodeId> {
    move |arena| {
        let x = operand(arena, x);
        let y = operand(arena, y);
        let expr = arena.binary(x, op, y);
        vec![arena.expr_stmt(expr)]
    }
}

/// An identifier, or an integer literal when `text` is numeric.
fn operand(arena: &mut GoArena, text: &str) -> NodeId {
    match text.parse::<i64>() {
        Ok(value) => arena.int_lit(value),
        Err(_) => arena.ident(text),
    }
}

fn ints() -> GoType {
    GoType::slice(GoType::INT)
}

#[test]
fn membership_in_strings() {
    let params = [("s", GoType::STRING), ("c", GoType::STRING)];
    assert_eq!(
        in_func(&params, binary("c", Token::In, "s"), &mut SpecialComparators),
        "{ strings.Contains(s, c) }"
    );
    assert_eq!(
        in_func(&params, binary("c", Token::NotIn, "s"), &mut SpecialComparators),
        "{ !strings.Contains(s, c) }"
    );
}

#[test]
fn membership_in_bytes() {
    let params = [("b", GoType::slice(GoType::BYTE)), ("c", GoType::slice(GoType::BYTE))];
    assert_eq!(
        in_func(&params, binary("c", Token::In, "b"), &mut SpecialComparators),
        "{ bytes.Contains(b, c) }"
    );
}

#[test]
fn membership_in_maps_checks_existence() {
    let params = [("d", GoType::map(GoType::STRING, GoType::INT)), ("k", GoType::STRING)];
    assert_eq!(
        in_func(&params, binary("k", Token::In, "d"), &mut SpecialComparators),
        "{ func() bool { _, ok := d[k]; return ok }() }"
    );
}

#[test]
fn membership_in_slices_searches() {
    let params = [("xs", ints()), ("x", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("x", Token::In, "xs"), &mut SpecialComparators),
        "{ func() int { for i, v := range xs { if v == x { return i } }; return -1 }() != -1 }"
    );
}

#[test]
fn membership_in_interfaces_searches() {
    let params = [("ys", GoType::Any), ("x", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("x", Token::In, "ys"), &mut SpecialComparators),
        "{ func() int { for i, v := range ys { if v == x { return i } }; return -1 }() != -1 }"
    );
}

#[test]
fn membership_waits_for_a_container_type() {
    assert_eq!(
        in_func(&[], binary("x", Token::In, "ys"), &mut SpecialComparators),
        "{ x in ys }"
    );
}

#[test]
fn identity() {
    let params = [("a", ints()), ("b", ints())];
    assert_eq!(
        in_func(&params, binary("a", Token::Is, "b"), &mut SpecialComparators),
        "{ &a == &b }"
    );
    assert_eq!(
        in_func(&params, binary("a", Token::IsNot, "nil"), &mut SpecialComparators),
        "{ a != nil }"
    );
}

#[test]
fn deep_equality_for_slices() {
    let params = [("a", ints()), ("b", ints())];
    assert_eq!(
        in_func(&params, binary("a", Token::Eql, "b"), &mut SpecialComparators),
        "{ reflect.DeepEqual(a, b) }"
    );
    assert_eq!(
        in_func(&params, binary("a", Token::Neq, "b"), &mut SpecialComparators),
        "{ !reflect.DeepEqual(a, b) }"
    );
    let scalars = [("a", GoType::INT), ("b", GoType::INT)];
    assert_eq!(
        in_func(&scalars, binary("a", Token::Eql, "b"), &mut SpecialComparators),
        "{ a == b }"
    );
}

#[test]
fn integer_power_converts_back() {
    let params = [("n", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("n", Token::Pow, "2"), &mut ReplacePowWithMathPow),
        "{ int(math.Pow(float64(n), 2)) }"
    );
}

#[test]
fn float_power_stays_float() {
    let params = [("x", GoType::FLOAT64), ("n", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("x", Token::Pow, "n"), &mut ReplacePowWithMathPow),
        "{ math.Pow(x, float64(n)) }"
    );
}

fn index_body(x: &'static str, offset: i64) -> impl FnOnce(&mut GoArena) -> Vec<NodeId> {
    move |arena| {
        let seq = arena.ident(x);
        let offset = arena.int_lit(offset);
        let neg = arena.unary(Token::Sub, offset);
        let index = arena.index(seq, neg);
        vec![arena.expr_stmt(index)]
    }
}

#[test]
fn negative_index_on_slice() {
    let params = [("xs", ints())];
    assert_eq!(
        in_func(&params, index_body("xs", 2), &mut NegativeIndexesSubtractFromLen),
        "{ xs[len(xs) - 2] }"
    );
}

#[test]
fn negative_key_on_map_is_a_key() {
    let params = [("d", GoType::map(GoType::INT, GoType::STRING))];
    assert_eq!(
        in_func(&params, index_body("d", 1), &mut NegativeIndexesSubtractFromLen),
        "{ d[-1] }"
    );
}

#[test]
fn string_member_is_a_string() {
    let params = [("s", GoType::STRING), ("i", GoType::INT)];
    let body = |arena: &mut GoArena| {
        let s = arena.ident("s");
        let i = arena.ident("i");
        let index = arena.index(s, i);
        vec![arena.expr_stmt(index)]
    };
    assert_eq!(
        in_func(&params, body, &mut StringifyStringMember),
        "{ string(s[i]) }"
    );
}

#[test]
fn string_member_already_converted() {
    let params = [("s", GoType::STRING), ("i", GoType::INT)];
    let body = |arena: &mut GoArena| {
        let s = arena.ident("s");
        let i = arena.ident("i");
        let index = arena.index(s, i);
        let call = arena.call_path("string", vec![index]);
        vec![arena.expr_stmt(call)]
    };
    assert_eq!(
        in_func(&params, body, &mut StringifyStringMember),
        "{ string(s[i]) }"
    );
}

#[test]
fn true_division_is_float() {
    let params = [("n", GoType::INT), ("m", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("n", Token::Quo, "m"), &mut HandleTypeCoercion),
        "{ float64(n) / float64(m) }"
    );
}

#[test]
fn true_division_leaves_literals_bare() {
    let params = [("n", GoType::INT)];
    assert_eq!(
        in_func(&params, binary("n", Token::Quo, "2"), &mut HandleTypeCoercion),
        "{ float64(n) / 2 }"
    );
    assert_eq!(
        in_func(&[], binary("1", Token::Quo, "4"), &mut HandleTypeCoercion),
        "{ float64(1) / 4 }"
    );
}

#[test]
fn floor_division_rounds_down() {
    let ints = [("n", GoType::INT), ("m", GoType::INT)];
    assert_eq!(
        in_func(&ints, binary("n", Token::FloorDiv, "m"), &mut HandleTypeCoercion),
        "{ int(math.Floor(float64(n) / float64(m))) }"
    );
    let mixed = [("x", GoType::FLOAT64), ("n", GoType::INT)];
    assert_eq!(
        in_func(&mixed, binary("x", Token::FloorDiv, "n"), &mut HandleTypeCoercion),
        "{ math.Floor(x / float64(n)) }"
    );
    let by_literal = [("n", GoType::INT)];
    assert_eq!(
        in_func(&by_literal, binary("n", Token::FloorDiv, "2"), &mut HandleTypeCoercion),
        "{ int(math.Floor(float64(n) / 2)) }"
    );
}

#[test]
fn mixed_arithmetic_promotes() {
    let params = [("n", GoType::INT), ("x", GoType::FLOAT64)];
    assert_eq!(
        in_func(&params, binary("n", Token::Add, "x"), &mut HandleTypeCoercion),
        "{ float64(n) + x }"
    );
}

#[test]
fn boolean_literal_comparisons() {
    let params = [("b", GoType::BOOL)];
    assert_eq!(
        in_func(&params, binary("b", Token::Eql, "true"), &mut HandleTypeCoercion),
        "{ b }"
    );
    assert_eq!(
        in_func(&params, binary("b", Token::Eql, "false"), &mut HandleTypeCoercion),
        "{ !b }"
    );
    assert_eq!(
        in_func(&params, binary("false", Token::Neq, "b"), &mut HandleTypeCoercion),
        "{ b }"
    );
}

#[test]
fn negated_comparison_flips() {
    let params = [("n", GoType::INT), ("m", GoType::INT)];
    let body = |arena: &mut GoArena| {
        let n = arena.ident("n");
        let m = arena.ident("m");
        let less = arena.binary(n, Token::Lss, m);
        let f = arena.ident("false");
        let cmp = arena.binary(less, Token::Eql, f);
        vec![arena.expr_stmt(cmp)]
    };
    assert_eq!(in_func(&params, body, &mut HandleTypeCoercion), "{ n >= m }");
}

#[test]
fn slice_add_assign_appends() {
    let params = [("xs", ints()), ("ys", ints())];
    let body = |arena: &mut GoArena| {
        let xs = arena.ident("xs");
        let ys = arena.ident("ys");
        vec![arena.assign(vec![xs], Token::AddAssign, vec![ys])]
    };
    assert_eq!(
        in_func(&params, body, &mut AppendSliceViaUnpacking),
        "{ xs = append(xs, ys...) }"
    );
}

#[test]
fn numeric_add_assign_is_left() {
    let params = [("n", GoType::INT)];
    let body = |arena: &mut GoArena| {
        let n = arena.ident("n");
        let one = arena.int_lit(1);
        vec![arena.assign(vec![n], Token::AddAssign, vec![one])]
    };
    assert_eq!(in_func(&params, body, &mut AppendSliceViaUnpacking), "{ n += 1 }");
}

fn if_on(name: &'static str) -> impl FnOnce(&mut GoArena) -> Vec<NodeId> {
    move |arena| {
        let cond = arena.ident(name);
        vec![arena.if_stmt(cond, Vec::new(), NodeId::INVALID)]
    }
}

#[test]
fn conditions_test_truthiness() {
    let params = [
        ("s", GoType::STRING),
        ("n", GoType::INT),
        ("b", GoType::BOOL),
        ("e", GoType::Named("error".to_owned())),
    ];
    assert_eq!(in_func(&params, if_on("s"), &mut Truthiness), "{ if len(s) != 0 {} }");
    assert_eq!(in_func(&params, if_on("n"), &mut Truthiness), "{ if n != 0 {} }");
    assert_eq!(in_func(&params, if_on("b"), &mut Truthiness), "{ if b {} }");
    assert_eq!(in_func(&params, if_on("e"), &mut Truthiness), "{ if e != nil {} }");
}

#[test]
fn negation_tests_truthiness() {
    let params = [("xs", ints())];
    let body = |arena: &mut GoArena| {
        let xs = arena.ident("xs");
        let not = arena.not(xs);
        vec![arena.expr_stmt(not)]
    };
    assert_eq!(in_func(&params, body, &mut Truthiness), "{ !(len(xs) != 0) }");
}
