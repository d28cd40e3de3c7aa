#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{MetaFlags, NodeId, NodeKind};
use pygo_py::dsl::*;
use pygo_py::{
    ClassDef, CmpOperator, Comprehension, ExceptHandler, Expr, MatchCase, Module, Operator,
    Pattern, Stmt, Try, WithItem,
};
use pygo_snippets::SnippetRegistry;

use crate::{build, BuildError, Built};

fn build_module(body: Vec<Stmt>) -> Built {
    build(&Module { body }, &SnippetRegistry::standard()).expect("module should build")
}

fn build_err(body: Vec<Stmt>) -> BuildError {
    build(&Module { body }, &SnippetRegistry::standard()).expect_err("module should not build")
}

fn decls(built: &Built) -> Vec<NodeId> {
    match built.arena.kind(built.file) {
        NodeKind::File { decls, .. } => decls.clone(),
        other => panic!("expected a file, got {other:?}"),
    }
}

fn sketch_decls(body: Vec<Stmt>) -> Vec<String> {
    let built = build_module(body);
    decls(&built)
        .into_iter()
        .map(|d| built.arena.sketch(d))
        .collect()
}

/// Sketch of `def main(): body`.
fn in_main(body: Vec<Stmt>) -> String {
    let sketches = sketch_decls(vec![Stmt::FunctionDef(def("main", &[], body))]);
    assert_eq!(sketches.len(), 1);
    sketches.into_iter().next().unwrap()
}

// Module level

#[test]
fn module_is_package_main() {
    let built = build_module(Vec::new());
    assert_eq!(built.arena.sketch(built.file), "package main");
}

#[test]
fn module_code_moves_into_init() {
    let built = build_module(vec![
        assign(name("x"), int(1)),
        expr(call(name("f"), vec![name("x")])),
        assign(name("y"), int(2)),
    ]);
    assert_eq!(
        built.arena.sketch(built.file),
        "package main\nvar x = 1\nfunc init() { f(x) }\nvar y int\nfunc init() { y = 2 }"
    );
    let init = decls(&built)[1];
    assert!(built.arena.meta(init).unwrap().flags.contains(MetaFlags::GLOBAL_CODE));
}

#[test]
fn module_docstring_is_dropped() {
    assert!(sketch_decls(vec![expr(string("About this module."))]).is_empty());
}

#[test]
fn import_paths_use_slashes() {
    let decls = sketch_decls(vec![Stmt::Import {
        names: vec![pygo_py::Alias {
            name: "os.path".to_owned(),
            asname: Some("p".to_owned()),
        }],
    }]);
    assert_eq!(decls, vec!["import p \"os/path\""]);
}

#[test]
fn annotated_parameters_and_results() {
    let decls = sketch_decls(vec![Stmt::FunctionDef(def_typed(
        "double",
        vec![arg_typed("n", name("int"))],
        Some(name("int")),
        vec![ret(bin(name("n"), Operator::Mult, int(2)))],
    ))]);
    assert_eq!(decls, vec!["func double(n int) int { return n * 2 }"]);
}

#[test]
fn unannotated_parameters_are_interfaces() {
    let decls = sketch_decls(vec![Stmt::FunctionDef(def(
        "show",
        &["a"],
        vec![expr(call(name("g"), vec![name("a")]))],
    ))]);
    assert_eq!(decls, vec!["func show(a interface{}) { g(a) }"]);
}

#[test]
fn async_functions_return_channels() {
    let decls = sketch_decls(vec![Stmt::AsyncFunctionDef(def_typed(
        "fetch",
        Vec::new(),
        Some(name("int")),
        vec![ret(int(1))],
    ))]);
    assert_eq!(
        decls,
        vec![
            "func fetch() chan int { r := make(chan int); go func() { defer close(r); \
             { r <- 1; return } }(); return r }"
        ]
    );
}

#[test]
fn generators_are_flagged() {
    let built = build_module(vec![Stmt::FunctionDef(def(
        "gen",
        &[],
        vec![expr(yield_(int(1)))],
    ))]);
    let gen = decls(&built)[0];
    assert_eq!(built.arena.sketch(gen), "func gen() { yield <- 1; <-wait }");
    assert!(built.arena.meta(gen).unwrap().flags.contains(MetaFlags::GENERATOR));
}

// Statements

#[test]
fn assignments_define_names() {
    assert_eq!(in_main(vec![assign(name("x"), int(1))]), "func main() { x := 1 }");
    assert_eq!(
        in_main(vec![assign(
            tuple(vec![name("a"), name("b")]),
            tuple(vec![name("b"), name("a")]),
        )]),
        "func main() { a, b := b, a }"
    );
}

#[test]
fn chained_assignment_copies_first_target() {
    let stmt = Stmt::Assign {
        targets: vec![name("a"), name("b")],
        value: call(name("f"), Vec::new()),
    };
    assert_eq!(in_main(vec![stmt]), "func main() { a := f(); b := a }");
}

#[test]
fn attribute_targets_assign() {
    assert_eq!(
        in_main(vec![assign(attr(name("o"), "v"), int(3))]),
        "func main() { o.v = 3 }"
    );
}

#[test]
fn augmented_assignment() {
    assert_eq!(
        in_main(vec![aug(name("n"), Operator::Add, int(1))]),
        "func main() { n += 1 }"
    );
}

#[test]
fn negative_index_counts_from_end() {
    assert_eq!(
        in_main(vec![assign(name("y"), subscript(name("xs"), neg(int(1))))]),
        "func main() { y := xs[len(xs) - 1] }"
    );
}

#[test]
fn while_true_is_bare_for() {
    assert_eq!(
        in_main(vec![while_(boolean(true), vec![brk()])]),
        "func main() { for { break } }"
    );
}

#[test]
fn for_over_iterable_ranges() {
    assert_eq!(
        in_main(vec![for_(
            name("x"),
            name("xs"),
            vec![expr(call(name("g"), vec![name("x")]))],
        )]),
        "func main() { for _, x := range xs { g(x) } }"
    );
}

#[test]
fn elif_chains_nest() {
    let stmt = if_(
        name("a"),
        vec![pass()],
        vec![if_(name("b"), vec![pass()], vec![pass()])],
    );
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { if a { ; } else if b { ; } else { ; } }"
    );
}

#[test]
fn isinstance_chain_becomes_type_switch() {
    let isinstance = |ty: &str| call(name("isinstance"), vec![name("x"), name(ty)]);
    let stmt = if_(
        isinstance("int"),
        vec![assign(name("y"), int(1))],
        vec![if_(
            isinstance("str"),
            vec![assign(name("y"), int(2))],
            vec![assign(name("y"), int(3))],
        )],
    );
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { switch x.(type) { case int: y := 1; case string: y := 2; \
         default: y := 3 } }"
    );
}

#[test]
fn match_on_values_becomes_switch() {
    let stmt = Stmt::Match {
        subject: name("c"),
        cases: vec![
            MatchCase {
                pattern: Pattern::MatchOr {
                    patterns: vec![
                        Pattern::MatchValue { value: int(1) },
                        Pattern::MatchValue { value: int(2) },
                    ],
                },
                guard: None,
                body: vec![expr(call(name("a"), Vec::new()))],
            },
            MatchCase {
                pattern: Pattern::MatchAs {
                    pattern: None,
                    name: None,
                },
                guard: None,
                body: vec![expr(call(name("b"), Vec::new()))],
            },
        ],
    };
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { switch c { case 1, 2: a(); default: b() } }"
    );
}

#[test]
fn delete_keys() {
    let stmt = Stmt::Delete {
        targets: vec![subscript(name("d"), string("k"))],
    };
    assert_eq!(in_main(vec![stmt]), "func main() { delete(d, \"k\") }");
}

#[test]
fn lambda_is_function_literal() {
    assert_eq!(
        in_main(vec![assign(name("f"), lambda(&["x"], name("x")))]),
        "func main() { f := func(x interface{}) { return x } }"
    );
}

#[test]
fn nested_def_is_bound_closure() {
    let inner = Stmt::FunctionDef(def("inner", &[], vec![ret_none()]));
    assert_eq!(
        in_main(vec![inner]),
        "func main() { inner := func() { return } }"
    );
}

// Comprehensions

#[test]
fn list_comprehension_appends_in_closure() {
    let comp = Expr::ListComp {
        elt: Box::new(bin(name("x"), Operator::Mult, int(2))),
        generators: vec![Comprehension {
            target: name("x"),
            iter: name("xs"),
            ifs: vec![name("x")],
        }],
    };
    assert_eq!(
        in_main(vec![assign(name("ys"), comp)]),
        "func main() { ys := func() (elts []int) { for _, x := range xs \
         { if x { elts = append(elts, x * 2) } }; return }() }"
    );
}

#[test]
fn dict_comprehension_initializes_map() {
    let comp = Expr::DictComp {
        key: Box::new(name("k")),
        value: Box::new(int(0)),
        generators: vec![Comprehension {
            target: name("k"),
            iter: name("keys"),
            ifs: Vec::new(),
        }],
    };
    assert_eq!(
        in_main(vec![assign(name("d"), comp)]),
        "func main() { d := func() (d map[interface{}]int) { d = map[interface{}]int{}; \
         for _, k := range keys { d[k] = 0 }; return }() }"
    );
}

// Exceptions

#[test]
fn try_except_recovers_by_prefix() {
    let stmt = Stmt::Try(Try {
        body: vec![expr(call(name("f"), Vec::new()))],
        handlers: vec![ExceptHandler {
            typ: Some(name("ValueError")),
            name: Some("e".to_owned()),
            body: vec![expr(call(name("g"), vec![name("e")]))],
        }],
        orelse: Vec::new(),
        finalbody: Vec::new(),
    });
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { func() { defer func() { if r := recover(); r != nil { \
         if err, ok := r.(error); ok { if strings.HasPrefix(err.Error(), \"ValueError\") \
         { e := err; g(e); return } }; panic(r) } }(); f() }() }"
    );
}

#[test]
fn catch_all_is_the_final_else() {
    let stmt = Stmt::Try(Try {
        body: vec![expr(call(name("f"), Vec::new()))],
        handlers: vec![
            ExceptHandler {
                typ: Some(name("ValueError")),
                name: None,
                body: vec![expr(call(name("fix"), Vec::new()))],
            },
            ExceptHandler {
                typ: Some(name("Exception")),
                name: Some("e".to_owned()),
                body: vec![expr(call(name("report"), vec![name("e")]))],
            },
        ],
        orelse: Vec::new(),
        finalbody: Vec::new(),
    });
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { func() { defer func() { if r := recover(); r != nil { \
         if err, ok := r.(error); ok { if strings.HasPrefix(err.Error(), \"ValueError\") \
         { fix(); return } else { e := err; report(e); return } }; panic(r) } }(); f() }() }"
    );
}

#[test]
fn try_else_runs_outside_the_handlers() {
    let handler = ExceptHandler {
        typ: Some(name("ValueError")),
        name: None,
        body: vec![expr(call(name("g"), Vec::new()))],
    };
    let stmt = |finalbody: Vec<Stmt>| {
        Stmt::Try(Try {
            body: vec![expr(call(name("f"), Vec::new()))],
            handlers: vec![handler.clone()],
            orelse: vec![raise(call(name("ValueError"), vec![string("late")]))],
            finalbody,
        })
    };
    assert_eq!(
        in_main(vec![stmt(Vec::new())]),
        "func main() { if func() bool { defer func() { if r := recover(); r != nil { \
         if err, ok := r.(error); ok { if strings.HasPrefix(err.Error(), \"ValueError\") \
         { g(); return } }; panic(r) } }(); f(); return true }() \
         { panic(fmt.Errorf(\"ValueError: %v\", \"late\")) } }"
    );

    let with_finally = in_main(vec![stmt(vec![expr(call(name("done"), Vec::new()))])]);
    let opening = "func main() { func() { defer func() { done() }(); if func() bool {";
    assert!(with_finally.starts_with(opening), "{with_finally}");
}

#[test]
fn bare_except_catches_everything() {
    let stmt = Stmt::Try(Try {
        body: vec![expr(call(name("f"), Vec::new()))],
        handlers: vec![ExceptHandler {
            typ: None,
            name: None,
            body: vec![pass()],
        }],
        orelse: Vec::new(),
        finalbody: vec![expr(call(name("done"), Vec::new()))],
    });
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { func() { defer func() { done() }(); defer func() { \
         if r := recover(); r != nil { ;; return } }(); f() }() }"
    );
}

#[test]
fn raise_builds_prefixed_error() {
    assert_eq!(
        in_main(vec![raise(call(name("ValueError"), vec![string("bad")]))]),
        "func main() { panic(fmt.Errorf(\"ValueError: %v\", \"bad\")) }"
    );
    assert_eq!(
        in_main(vec![raise(name("StopIteration"))]),
        "func main() { panic(errors.New(\"StopIteration\")) }"
    );
}

#[test]
fn assert_panics_when_false() {
    let stmt = Stmt::Assert {
        test: cmp(name("n"), CmpOperator::Gt, int(0)),
        msg: None,
    };
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { if !(n > 0) { panic(errors.New(\"AssertionError\")) } }"
    );
}

#[test]
fn with_defers_close() {
    let stmt = Stmt::With {
        items: vec![WithItem {
            context_expr: call(name("lock"), Vec::new()),
            optional_vars: None,
        }],
        body: vec![expr(call(name("f"), Vec::new()))],
    };
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { func() { ctx := lock(); defer func() { if err := ctx.Close(); \
         err != nil { panic(err) } }(); f() }() }"
    );
}

// Classes

#[test]
fn class_becomes_struct_constructor_and_methods() {
    let init = def_typed(
        "__init__",
        vec![arg("self"), arg_typed("x", name("int"))],
        None,
        vec![ann(attr(name("self"), "x"), name("int"), Some(name("x")))],
    );
    let norm = def("norm", &["self"], vec![ret(attr(name("self"), "x"))]);
    let class = Stmt::ClassDef(ClassDef {
        name: "Point".to_owned(),
        bases: Vec::new(),
        body: vec![Stmt::FunctionDef(init), Stmt::FunctionDef(norm)],
        decorator_list: Vec::new(),
    });
    assert_eq!(
        sketch_decls(vec![class]),
        vec![
            "type Point struct{ x int }",
            "func NewPoint(x int) (self *Point) { self = new(Point); self.x = x; return }",
            "func (self *Point) norm() { return self.x }",
        ]
    );
}

#[test]
fn dunder_methods_are_renamed() {
    let str_ = def("__str__", &["self"], vec![ret(string("p"))]);
    let class = Stmt::ClassDef(ClassDef {
        name: "P".to_owned(),
        bases: vec![name("object")],
        body: vec![Stmt::FunctionDef(str_)],
        decorator_list: Vec::new(),
    });
    assert_eq!(
        sketch_decls(vec![class]),
        vec!["type P struct{}", "func (self *P) String() { return \"p\" }"]
    );
}

// Snippets

#[test]
fn builtin_calls_use_templates() {
    let built = build_module(vec![Stmt::FunctionDef(def(
        "main",
        &[],
        vec![assign(name("y"), call(name("abs"), vec![name("x")]))],
    ))]);
    let main = decls(&built)[0];
    assert_eq!(built.arena.sketch(main), "func main() { y := math.Abs(x) }");
    let from_snippet = built
        .arena
        .descendants(main)
        .into_iter()
        .any(|id| {
            built
                .arena
                .meta(id)
                .is_some_and(|m| m.flags.contains(MetaFlags::FROM_SNIPPET))
        });
    assert!(from_snippet);
}

#[test]
fn user_definitions_shadow_templates() {
    let decls = sketch_decls(vec![
        Stmt::FunctionDef(def("abs", &["v"], vec![ret(name("v"))])),
        Stmt::FunctionDef(def(
            "main",
            &[],
            vec![expr(call(name("abs"), vec![int(1), int(2)]))],
        )),
    ]);
    assert_eq!(decls[1], "func main() { abs(1, 2) }");
}

// Failures

#[test]
fn builtin_with_no_matching_template_fails() {
    let err = build_err(vec![Stmt::FunctionDef(def(
        "main",
        &[],
        vec![expr(call(name("abs"), vec![int(1), int(2)]))],
    ))]);
    assert!(
        matches!(&err, BuildError::UnresolvedCallee { callee, attempted } if callee == "abs" && !attempted.is_empty()),
        "{err:?}"
    );
}

#[test]
fn unsupported_statement_names_its_kind() {
    let err = build_err(vec![Stmt::Unsupported {
        kind: "TryStar".to_owned(),
        source: "try: pass".to_owned(),
    }]);
    assert!(
        matches!(&err, BuildError::UnsupportedConstruct { kind, .. } if kind == "TryStar"),
        "{err:?}"
    );
}

#[test]
fn for_else_runs_when_the_loop_finishes() {
    let mut stmt = for_(
        name("x"),
        name("xs"),
        vec![
            if_(name("x"), vec![brk()], Vec::new()),
            for_(name("y"), name("ys"), vec![brk()]),
        ],
    );
    if let Stmt::For(for_) = &mut stmt {
        for_.orelse = vec![expr(call(name("none_found"), Vec::new()))];
    }
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { if func() bool { for _, x := range xs { if x { return false }; \
         for _, y := range ys { break } }; return true }() { none_found() } }"
    );
}

#[test]
fn while_else_runs_when_the_loop_finishes() {
    let stmt = Stmt::While {
        test: name("busy"),
        body: vec![
            expr(call(name("step"), Vec::new())),
            if_(name("stuck"), vec![brk()], Vec::new()),
        ],
        orelse: vec![expr(call(name("finished"), Vec::new()))],
    };
    assert_eq!(
        in_main(vec![stmt]),
        "func main() { if func() bool { for busy { step(); if stuck { return false } }; \
         return true }() { finished() } }"
    );
}

#[test]
fn for_over_a_subscript_target_is_unsupported() {
    let stmt = for_(subscript(name("xs"), int(0)), name("ys"), vec![pass()]);
    let err = build_err(vec![Stmt::FunctionDef(def("main", &[], vec![stmt]))]);
    assert!(
        matches!(&err, BuildError::UnsupportedConstruct { kind, .. } if kind == "For"),
        "{err:?}"
    );
}
