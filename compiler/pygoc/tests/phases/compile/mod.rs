//! Compile-phase tests: Python AST in, converged Go tree out.

use pretty_assertions::assert_eq;
use pygo_py::dsl::{
    arg_typed, assign, bin, call, cmp, def, def_typed, expr, for_, int, list, method, name, ret,
    string, subscript, tuple, yield_,
};
use pygo_py::{CmpOperator, ExceptHandler, Operator, Stmt, Try};
use pygoc::{frontend, BuildError, CompileOptions};

use crate::common::{compile_with, compiled, defs_module, main_module, sketch_func};

#[test]
fn constant_sum_has_a_concrete_result() {
    let module = defs_module(vec![
        def("f", &[], vec![ret(bin(int(1), Operator::Add, int(2)))]),
        def("main", &[], vec![expr(call(name("f"), Vec::new()))]),
    ]);
    let out = compiled(&module);
    assert_eq!(out.arena.count_interfaces(out.file), 0);
    assert!(out.report.unresolved.is_empty());
    let f = sketch_func(&out, "f");
    assert!(f.starts_with("func f() int {"), "{f}");
}

#[test]
fn enumerate_loop_ranges_over_a_typed_slice() {
    let items = list(vec![string("a"), string("b"), string("c")]);
    let module = main_module(vec![for_(
        tuple(vec![name("i"), name("s")]),
        call(name("enumerate"), vec![items]),
        vec![expr(call(name("use"), vec![name("i"), name("s")]))],
    )]);
    let main = sketch_func(&compiled(&module), "main");
    assert!(
        main.contains("for i, s := range []string{\"a\", \"b\", \"c\"}"),
        "{main}"
    );
}

#[test]
fn try_except_dispatches_on_error_prefix() {
    let stmt = Stmt::Try(Try {
        body: vec![expr(call(name("risky"), Vec::new()))],
        handlers: vec![
            ExceptHandler {
                typ: Some(name("ValueError")),
                name: None,
                body: vec![expr(call(name("fix"), Vec::new()))],
            },
            ExceptHandler {
                typ: Some(name("KeyError")),
                name: Some("e".to_owned()),
                body: vec![expr(call(name("report"), vec![name("e")]))],
            },
        ],
        orelse: Vec::new(),
        finalbody: Vec::new(),
    });
    let main = sketch_func(&compiled(&main_module(vec![stmt])), "main");
    assert!(main.contains("if r := recover(); r != nil"), "{main}");
    assert!(main.contains("if err, ok := r.(error); ok"), "{main}");
    let value = main
        .find("strings.HasPrefix(err.Error(), \"ValueError\")")
        .expect("ValueError handler");
    let key = main
        .find("strings.HasPrefix(err.Error(), \"KeyError\")")
        .expect("KeyError handler");
    assert!(value < key, "{main}");
    assert!(main.contains("panic(r)"), "{main}");
    let deferred = main.find("defer func()").expect("deferred recover");
    let body = main.find("risky()").expect("protected body");
    assert!(deferred < body, "{main}");
}

#[test]
fn generators_become_channels() {
    let module = defs_module(vec![
        def(
            "gen",
            &[],
            vec![expr(yield_(int(1))), expr(yield_(int(2)))],
        ),
        def(
            "main",
            &[],
            vec![for_(
                name("v"),
                call(name("gen"), Vec::new()),
                vec![expr(call(name("use"), vec![name("v")]))],
            )],
        ),
    ]);
    let out = compiled(&module);
    let gen = sketch_func(&out, "gen");
    assert!(gen.contains("go func()"), "{gen}");
    assert!(gen.contains("defer close(yield)"), "{gen}");
    let first = gen.find("yield <- 1").expect("first value sent");
    let second = gen.find("yield <- 2").expect("second value sent");
    assert!(first < second, "{gen}");
    let main = sketch_func(&out, "main");
    assert!(main.contains("<-"), "{main}");
}

#[test]
fn membership_lowers_by_container_type() {
    let dict = subscript(name("dict"), tuple(vec![name("str"), name("int")]));
    let module = defs_module(vec![
        def_typed(
            "has",
            vec![arg_typed("d", dict), arg_typed("k", name("str"))],
            None,
            vec![ret(cmp(name("k"), CmpOperator::In, name("d")))],
        ),
        def_typed(
            "within",
            vec![arg_typed("s", name("str")), arg_typed("c", name("str"))],
            None,
            vec![ret(cmp(name("c"), CmpOperator::In, name("s")))],
        ),
    ]);
    let out = compiled(&module);
    let has = sketch_func(&out, "has");
    assert!(has.contains("_, ok := d[k]; return ok"), "{has}");
    let within = sketch_func(&out, "within");
    assert!(within.contains("strings.Contains(s, c)"), "{within}");
}

#[test]
fn syntax_errors_surface_as_unsupported_constructs() {
    let module = frontend::decode(
        r#"{"_type": "Module", "body": [
            {"_type": "Unsupported", "kind": "SyntaxError", "source": "line 2: invalid syntax"}
        ]}"#,
    )
    .unwrap();
    let err = compile_with(&module, CompileOptions::default()).unwrap_err();
    assert!(err.is_unsupported(), "{err}");
    assert!(
        matches!(&err, BuildError::UnsupportedConstruct { kind, .. } if kind == "SyntaxError"),
        "{err}"
    );
}

#[test]
fn membership_in_untyped_values_is_searched() {
    let module = defs_module(vec![def(
        "f",
        &["a", "b"],
        vec![ret(cmp(name("a"), CmpOperator::In, name("b")))],
    )]);
    let out = compiled(&module);
    assert!(!out.dump().contains("token.ILLEGAL"), "{}", out.sketch());
    let f = sketch_func(&out, "f");
    assert!(f.contains("range b"), "{f}");
}

#[test]
fn operators_without_a_go_form_are_refused() {
    let test = cmp(int(1), CmpOperator::In, call(name("mystery"), Vec::new()));
    let module = main_module(vec![expr(test)]);
    let err = compile_with(&module, CompileOptions::default()).unwrap_err();
    assert!(err.is_unsupported(), "{err}");
    assert!(
        matches!(&err, BuildError::UnsupportedConstruct { kind, .. } if kind == "`in` operator"),
        "{err}"
    );
}

/// `def main(): x = mystery()`
fn mystery() -> pygo_py::Module {
    main_module(vec![assign(
        name("x"),
        call(name("mystery"), Vec::new()),
    )])
}

#[test]
fn unknown_types_are_reported_or_refused() {
    let out = compiled(&mystery());
    assert_eq!(out.report.unresolved, vec!["x".to_owned()]);

    let options = CompileOptions {
        strict_types: true,
        ..CompileOptions::default()
    };
    let err = compile_with(&mystery(), options).unwrap_err();
    assert!(err.is_type_error(), "{err}");
    assert!(
        matches!(&err, BuildError::TypeResolutionDeadlock { names } if names == &["x".to_owned()]),
        "{err}"
    );
}

#[test]
fn library_templates_type_check_strictly() {
    let module = main_module(vec![
        expr(call(name("print"), vec![call(name("int"), vec![string("7")])])),
        assign(name("line"), call(name("input"), Vec::new())),
        expr(call(
            name("print"),
            vec![method(name("line"), "lstrip", Vec::new())],
        )),
        expr(call(
            name("print"),
            vec![method(name("line"), "title", Vec::new())],
        )),
    ]);
    let options = CompileOptions {
        strict_types: true,
        ..CompileOptions::default()
    };
    let out = compile_with(&module, options).unwrap_or_else(|err| panic!("{err}"));
    assert!(out.report.unresolved.is_empty(), "{:?}", out.report.unresolved);
    let main = sketch_func(&out, "main");
    assert!(main.contains("strconv.ParseInt"), "{main}");
    assert!(main.contains("ReadString"), "{main}");
}

#[test]
fn zero_iterations_cannot_converge() {
    let module = defs_module(vec![
        def("pick", &["a"], vec![ret(name("a"))]),
        def("main", &[], vec![expr(call(name("pick"), vec![int(1)]))]),
    ]);
    let options = CompileOptions {
        max_iterations: 0,
        ..CompileOptions::default()
    };
    let err = compile_with(&module, options).unwrap_err();
    assert!(
        matches!(err, BuildError::ConvergenceFailure { iterations: 0, remaining } if remaining > 0),
        "{err}"
    );
}

#[test]
fn package_clause_follows_options() {
    let options = CompileOptions {
        package: "tool".to_owned(),
        ..CompileOptions::default()
    };
    let out = compile_with(&main_module(vec![pygo_py::dsl::pass()]), options).unwrap();
    assert!(
        out.dump().starts_with("&ast.File { Name: &ast.Ident { Name: \"tool\" }"),
        "{}",
        out.dump()
    );
}

#[test]
fn compilation_is_deterministic() {
    let module = defs_module(vec![
        def("f", &[], vec![ret(bin(int(1), Operator::Add, int(2)))]),
        def("main", &[], vec![expr(call(name("f"), Vec::new()))]),
    ]);
    assert_eq!(compiled(&module).dump(), compiled(&module).dump());
}
