#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{ChanDir, GoType, NodeId, Token};

use super::{
    LoopThroughFileLines, LoopThroughSetValuesNotKeys, RangeRangeToFor, UnpackRange,
    YieldRangeTransformer,
};
use crate::passes::tests::Fixture;

/// `func main() { for _, value := range x {} }`
fn main_ranging(fx: &mut Fixture, value: NodeId, x: NodeId) {
    let key = fx.arena.ident("_");
    let body = fx.arena.block(Vec::new());
    let range = fx.arena.range_stmt(key, value, x, body);
    fx.func("main", vec![range]);
}

/// The `(a, b)` loop target the builder emits for tuple unpacking.
fn pair(fx: &mut Fixture, a: &str, b: &str) -> NodeId {
    let a = fx.arena.ident(a);
    let b = fx.arena.ident(b);
    fx.arena.composite(NodeId::INVALID, vec![a, b])
}

fn method_call(fx: &mut Fixture, recv: &str, method: &str) -> NodeId {
    let recv = fx.arena.ident(recv);
    let fun = fx.arena.sel(recv, method);
    fx.arena.call(fun, Vec::new())
}

#[test]
fn enumerate_ranges_with_index() {
    let mut fx = Fixture::new();
    let value = pair(&mut fx, "i", "x");
    let xs = fx.arena.ident("xs");
    let x = fx.arena.call_path("enumerate", vec![xs]);
    main_ranging(&mut fx, value, x);

    fx.run(&mut UnpackRange);
    assert_eq!(fx.sketch_func("main"), "func main() { for i, x := range xs {} }");
}

#[test]
fn dict_views() {
    let cases = [
        ("items", "for k, v := range d {}"),
        ("keys", "for k := range d {}"),
        ("values", "for _, v := range d {}"),
    ];
    for (method, expected) in cases {
        let mut fx = Fixture::new();
        let value = match method {
            "items" => pair(&mut fx, "k", "v"),
            "keys" => fx.arena.ident("k"),
            _ => fx.arena.ident("v"),
        };
        let x = method_call(&mut fx, "d", method);
        main_ranging(&mut fx, value, x);

        fx.run(&mut UnpackRange);
        assert_eq!(fx.sketch_func("main"), format!("func main() {{ {expected} }}"));
    }
}

#[test]
fn other_methods_are_left() {
    let mut fx = Fixture::new();
    let value = fx.arena.ident("x");
    let x = method_call(&mut fx, "d", "copy");
    main_ranging(&mut fx, value, x);

    fx.run(&mut UnpackRange);
    assert_eq!(fx.sketch_func("main"), "func main() { for _, x := range d.copy() {} }");
}

fn counted(args: impl FnOnce(&mut Fixture) -> Vec<NodeId>, var: &str) -> String {
    let mut fx = Fixture::new();
    let args = args(&mut fx);
    let value = fx.arena.ident(var);
    let x = fx.arena.call_path("range", args);
    main_ranging(&mut fx, value, x);
    fx.run(&mut RangeRangeToFor);
    fx.sketch_func("main")
}

#[test]
fn range_with_stop() {
    let sketch = counted(|fx| vec![fx.arena.int_lit(10)], "i");
    assert_eq!(sketch, "func main() { for i := 0; i < 10; i++ {} }");
}

#[test]
fn range_with_start_and_stop() {
    let sketch = counted(|fx| vec![fx.arena.int_lit(2), fx.arena.ident("n")], "i");
    assert_eq!(sketch, "func main() { for i := 2; i < n; i++ {} }");
}

#[test]
fn range_steps() {
    let unit_up = counted(
        |fx| vec![fx.arena.int_lit(0), fx.arena.int_lit(5), fx.arena.int_lit(1)],
        "i",
    );
    assert_eq!(unit_up, "func main() { for i := 0; i < 5; i++ {} }");

    let up = counted(
        |fx| vec![fx.arena.int_lit(0), fx.arena.int_lit(9), fx.arena.int_lit(3)],
        "i",
    );
    assert_eq!(up, "func main() { for i := 0; i < 9; i += 3 {} }");

    let unit_down = counted(
        |fx| {
            let one = fx.arena.int_lit(1);
            let minus_one = fx.arena.unary(Token::Sub, one);
            vec![fx.arena.int_lit(10), fx.arena.int_lit(0), minus_one]
        },
        "i",
    );
    assert_eq!(unit_down, "func main() { for i := 10; i > 0; i-- {} }");

    let down = counted(
        |fx| {
            let two = fx.arena.int_lit(2);
            let minus_two = fx.arena.unary(Token::Sub, two);
            vec![fx.arena.int_lit(10), fx.arena.int_lit(0), minus_two]
        },
        "i",
    );
    assert_eq!(down, "func main() { for i := 10; i > 0; i -= 2 {} }");
}

#[test]
fn blank_counter_gets_a_name() {
    let sketch = counted(|fx| vec![fx.arena.int_lit(3)], "_");
    assert_eq!(sketch, "func main() { for _i := 0; _i < 3; _i++ {} }");
}

#[test]
fn sets_range_over_keys() {
    let mut fx = Fixture::new();
    let set_ty = fx
        .arena
        .type_expr(&GoType::map(GoType::STRING, GoType::empty_struct()));
    let empty = fx.arena.composite(set_ty, Vec::new());
    let s = fx.arena.ident("s");
    let decl = fx.arena.define(s, empty);
    let blank = fx.arena.ident("_");
    let member = fx.arena.ident("m");
    let x = fx.arena.ident("s");
    let body = fx.arena.block(Vec::new());
    let range = fx.arena.range_stmt(blank, member, x, body);
    fx.func("main", vec![decl, range]);

    fx.run(&mut LoopThroughSetValuesNotKeys);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { s := map[string]struct{}{}; for m := range s {} }"
    );
}

#[test]
fn maps_keep_their_values() {
    let mut fx = Fixture::new();
    let map_ty = fx.arena.type_expr(&GoType::map(GoType::STRING, GoType::INT));
    let empty = fx.arena.composite(map_ty, Vec::new());
    let d = fx.arena.ident("d");
    let decl = fx.arena.define(d, empty);
    let blank = fx.arena.ident("_");
    let value = fx.arena.ident("v");
    let x = fx.arena.ident("d");
    let body = fx.arena.block(Vec::new());
    let range = fx.arena.range_stmt(blank, value, x, body);
    fx.func("main", vec![decl, range]);

    fx.run(&mut LoopThroughSetValuesNotKeys);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { d := map[string]int{}; for _, v := range d {} }"
    );
}

#[test]
fn stdin_lines_scan() {
    let mut fx = Fixture::new();
    let line = fx.arena.ident("line");
    let stdin = fx.arena.path("os.Stdin");
    main_ranging(&mut fx, line, stdin);

    fx.run(&mut LoopThroughFileLines);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { { scanner := bufio.NewScanner(os.Stdin); \
         for scanner.Scan() { line := scanner.Text() } } }"
    );
}

#[test]
fn generator_ranges_pull_until_closed() {
    let mut fx = Fixture::new();
    let handle = GoType::func(Vec::new(), vec![GoType::chan(ChanDir::Both, GoType::INT)]);
    let results = fx.arena.results_for(&handle);
    fx.func_with("gen", Vec::new(), results, Vec::new());

    let g = fx.arena.ident("g");
    let call = fx.arena.call_path("gen", Vec::new());
    let decl = fx.arena.define(g, call);
    let blank = fx.arena.ident("_");
    let value = fx.arena.ident("v");
    let x = fx.arena.ident("g");
    let body = fx.arena.block(Vec::new());
    let range = fx.arena.range_stmt(blank, value, x, body);
    fx.func("main", vec![decl, range]);

    fx.run(&mut YieldRangeTransformer);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { g := gen(); for v, ok := <-g(); ok; v, ok = <-g() {} }"
    );
}

#[test]
fn generator_calls_get_a_temporary() {
    let mut fx = Fixture::new();
    let handle = GoType::func(Vec::new(), vec![GoType::chan(ChanDir::Both, GoType::STRING)]);
    let results = fx.arena.results_for(&handle);
    fx.func_with("gen", Vec::new(), results, Vec::new());
    let value = fx.arena.ident("s");
    let x = fx.arena.call_path("gen", Vec::new());
    main_ranging(&mut fx, value, x);

    fx.run(&mut YieldRangeTransformer);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { { generator := gen(); \
         for s, ok := <-generator(); ok; s, ok = <-generator() {} } }"
    );
}
