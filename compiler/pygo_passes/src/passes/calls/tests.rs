#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{GoArena, GoType, NodeId, NodeKind};
use pygo_py::dsl::{assign, call, call_kw, def, expr, int, list, name, pass};

use super::{
    CallTypeInformation, FillDefaultsAndSortKeywords, IterFuncs, IterMethods, PySnippetSwitches,
    UntypedFunctionsTypedByCalls,
};
use crate::passes::tests::Fixture;

/// `def f(a, b=2, c=3): pass` and `def main(): f(...)` calling it with
/// the given positional and keyword arguments.
fn defaults_call(args: Vec<i64>, keywords: Vec<(&str, i64)>) -> String {
    let mut f = def("f", &["a", "b", "c"], vec![pass()]);
    f.args.defaults = vec![int(2), int(3)];
    let args = args.into_iter().map(int).collect();
    let keywords = keywords.into_iter().map(|(k, v)| (k, int(v))).collect();
    let main = def("main", &[], vec![expr(call_kw(name("f"), args, keywords))]);
    let mut fx = Fixture::python_defs(vec![f, main]);
    fx.run(&mut FillDefaultsAndSortKeywords);
    fx.sketch_func("main")
}

#[test]
fn keywords_take_their_positions() {
    let main = defaults_call(vec![1], vec![("c", 4)]);
    assert!(main.contains("f(1, 2, 4)"), "{main}");
}

#[test]
fn missing_arguments_take_defaults() {
    let main = defaults_call(vec![1], Vec::new());
    assert!(main.contains("f(1, 2, 3)"), "{main}");
}

#[test]
fn unknown_keyword_leaves_the_call() {
    let main = defaults_call(vec![1], vec![("d", 4)]);
    assert!(main.contains("f(1, 4)"), "{main}");
}

#[test]
fn max_of_a_list() {
    let mut fx = Fixture::python_main(vec![
        assign(name("xs"), list(vec![int(1), int(2), int(3)])),
        assign(name("m"), call(name("max"), vec![name("xs")])),
    ]);
    fx.run(&mut IterFuncs);
    let main = fx.sketch_func("main");
    assert!(
        main.contains(
            "func() (m int) { for i, e := range xs { if i == 0 || e > m { m = e } }; return }()"
        ),
        "{main}"
    );
}

/// `func f(xs []int, a int, b int) { body }`
fn over_ints(fx: &mut Fixture, body: Vec<NodeId>) {
    let params = [
        ("xs", GoType::slice(GoType::INT)),
        ("a", GoType::INT),
        ("b", GoType::INT),
    ]
    .iter()
    .map(|(name, ty)| {
        let ty = fx.arena.type_expr(ty);
        fx.arena.field(&[*name], ty)
    })
    .collect();
    fx.func_with("f", params, NodeId::INVALID, body);
}

fn builtin(arena: &mut GoArena, name: &str, args: &[&str]) -> NodeId {
    let args = args.iter().map(|a| arena.ident(a)).collect();
    let call = arena.call_path(name, args);
    arena.expr_stmt(call)
}

#[test]
fn min_of_arguments_and_sum() {
    let mut fx = Fixture::new();
    let min = builtin(&mut fx.arena, "min", &["a", "b"]);
    let sum = builtin(&mut fx.arena, "sum", &["xs"]);
    over_ints(&mut fx, vec![min, sum]);
    fx.run(&mut IterFuncs);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(xs []int, a int, b int) { \
         func() (m int) { for i, e := range []int{a, b} { if i == 0 || e < m { m = e } }; return }(); \
         func() (s int) { for _, e := range xs { s += e }; return }() }"
    );
}

#[test]
fn reversed_copies() {
    let mut fx = Fixture::new();
    let reversed = builtin(&mut fx.arena, "reversed", &["xs"]);
    over_ints(&mut fx, vec![reversed]);
    fx.run(&mut IterFuncs);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(xs []int, a int, b int) { \
         func(arr []int) []int { arr2 := make([]int, len(arr)); \
         for i, e := range arr { arr2[len(arr) - i - 1] = e }; return arr2 }(xs) }"
    );
}

#[test]
fn reverse_in_place() {
    let mut fx = Fixture::new();
    let stmt = {
        let xs = fx.arena.ident("xs");
        let fun = fx.arena.sel(xs, "reverse");
        let call = fx.arena.call(fun, Vec::new());
        fx.arena.expr_stmt(call)
    };
    over_ints(&mut fx, vec![stmt]);
    fx.run(&mut IterMethods);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(xs []int, a int, b int) { \
         func(arr []int) { for i, j := 0, len(arr) - 1; i < j; i, j = i + 1, j - 1 \
         { arr[i], arr[j] = arr[j], arr[i] } }(xs) }"
    );
}

/// A template call `func(x interface{}) { switch x.(type) { ... } }(arg)`
/// with a `string` clause and a default clause.
fn template(fx: &mut Fixture, arg: &str) -> NodeId {
    let clause_string = {
        let x = fx.arena.ident("x");
        let call = fx.arena.call_path("strings.ToUpper", vec![x]);
        let stmt = fx.arena.expr_stmt(call);
        let string = fx.arena.ident("string");
        fx.arena.case_clause(vec![string], vec![stmt])
    };
    let clause_default = {
        let first = {
            let x = fx.arena.ident("x");
            let call = fx.arena.call_path("println", vec![x]);
            fx.arena.expr_stmt(call)
        };
        let second = {
            let x = fx.arena.ident("x");
            let call = fx.arena.call_path("println", vec![x]);
            fx.arena.expr_stmt(call)
        };
        fx.arena.case_clause(Vec::new(), vec![first, second])
    };
    let x = fx.arena.ident("x");
    let assert = fx.arena.alloc(NodeKind::TypeAssertExpr {
        x,
        ty: NodeId::INVALID,
    });
    let assign = fx.arena.expr_stmt(assert);
    let body = fx.arena.block(vec![clause_string, clause_default]);
    let switch = fx.arena.alloc(NodeKind::TypeSwitchStmt {
        init: NodeId::INVALID,
        assign,
        body,
    });
    let any = fx.arena.alloc(NodeKind::InterfaceType);
    let param = fx.arena.field(&["x"], any);
    let ty = fx.arena.func_type(vec![param], NodeId::INVALID);
    let lit = fx.arena.func_lit(ty, vec![switch]);
    let arg = fx.arena.ident(arg);
    let call = fx.arena.call(lit, vec![arg]);
    fx.arena.meta_mut(call).snippet = Some("upper".to_owned());
    fx.arena.expr_stmt(call)
}

fn with_params(fx: &mut Fixture, body: Vec<NodeId>) {
    let string = fx.arena.type_expr(&GoType::STRING);
    let s = fx.arena.field(&["s"], string);
    let int = fx.arena.type_expr(&GoType::INT);
    let n = fx.arena.field(&["n"], int);
    fx.func_with("f", vec![s, n], NodeId::INVALID, body);
}

#[test]
fn template_switch_collapses_to_the_matching_clause() {
    let mut fx = Fixture::new();
    let stmt = template(&mut fx, "s");
    with_params(&mut fx, vec![stmt]);
    fx.run(&mut PySnippetSwitches);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(s string, n int) { strings.ToUpper(s) }"
    );
}

#[test]
fn template_switch_falls_back_to_default() {
    let mut fx = Fixture::new();
    let stmt = template(&mut fx, "n");
    with_params(&mut fx, vec![stmt]);
    fx.run(&mut PySnippetSwitches);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(s string, n int) { func() { println(n); println(n) }() }"
    );
}

#[test]
fn append_narrows_the_slice() {
    let mut fx = Fixture::new();
    let any = fx.arena.alloc(NodeKind::InterfaceType);
    let slice = fx.arena.alloc(NodeKind::ArrayType {
        len: NodeId::INVALID,
        elt: any,
    });
    let xs = fx.arena.field(&["xs"], slice);
    let int = fx.arena.type_expr(&GoType::INT);
    let n = fx.arena.field(&["n"], int);
    let stmt = builtin(&mut fx.arena, "append", &["xs", "n"]);
    fx.func_with("f", vec![xs, n], NodeId::INVALID, vec![stmt]);
    fx.run(&mut CallTypeInformation);
    assert_eq!(
        fx.sketch_func("f"),
        "func f(xs []int, n int) { append(xs, n) }"
    );
}

#[test]
fn literal_parameters_take_argument_types() {
    let mut fx = Fixture::new();
    let any = fx.arena.alloc(NodeKind::InterfaceType);
    let param = fx.arena.field(&["x"], any);
    let ty = fx.arena.func_type(vec![param], NodeId::INVALID);
    let lit = fx.arena.func_lit(ty, Vec::new());
    let one = fx.arena.int_lit(1);
    let call = fx.arena.call(lit, vec![one]);
    let stmt = fx.arena.expr_stmt(call);
    fx.func("main", vec![stmt]);
    fx.run(&mut CallTypeInformation);
    assert_eq!(fx.sketch_func("main"), "func main() { func(x int) {}(1) }");
}

#[test]
fn call_arguments_become_narrowing_sources() {
    let mut fx = Fixture::python_defs(vec![
        def("show", &["x"], vec![pass()]),
        def("main", &[], vec![expr(call(name("show"), vec![int(1)]))]),
    ]);
    fx.run(&mut UntypedFunctionsTypedByCalls);
    fx.run(&mut UntypedFunctionsTypedByCalls);

    let show = fx
        .decls()
        .into_iter()
        .find(|&d| matches!(fx.arena.kind(d), NodeKind::FuncDecl { name, .. } if name == "show"))
        .unwrap();
    let NodeKind::FuncDecl { ty, .. } = *fx.arena.kind(show) else {
        unreachable!()
    };
    let any = fx
        .arena
        .descendants(ty)
        .into_iter()
        .find(|&n| matches!(fx.arena.kind(n), NodeKind::InterfaceType))
        .unwrap();
    let sources = &fx.arena.meta(any).unwrap().elts;
    assert_eq!(sources.len(), 1);
    assert_eq!(fx.arena.sketch(sources[0]), "1");
}
