#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_py::dsl::{
    arg_typed, bin, call, cmp, def, def_typed, expr, for_, int, name, ret, subscript, tuple,
    yield_,
};
use pygo_ir::{GoType, NodeKind};
use pygo_py::{CmpOperator, Operator};
use pygo_types::{ScopeId, ScopeTree, TypeCx};

use super::{run, run_stage, PipelineError, PipelineOptions};
use crate::passes;
use crate::passes::tests::Fixture;

/// `def f(): return 1 + 2` called from `main`.
fn constant_sum() -> Fixture {
    Fixture::python_defs(vec![
        def("f", &[], vec![ret(bin(int(1), Operator::Add, int(2)))]),
        def("main", &[], vec![expr(call(name("f"), Vec::new()))]),
    ])
}

/// `def has(d: dict[str, int], k: str): return k in d`, and the same
/// against a string.
fn membership() -> Fixture {
    let dict = subscript(name("dict"), tuple(vec![name("str"), name("int")]));
    Fixture::python_defs(vec![
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
    ])
}

fn converge(fx: &mut Fixture) -> super::PipelineReport {
    run(&mut fx.arena, fx.file, &PipelineOptions::default()).expect("pipeline converges")
}

#[test]
fn constant_results_are_concrete() {
    let mut fx = constant_sum();
    let report = converge(&mut fx);
    assert_eq!(fx.arena.count_interfaces(fx.file), 0);
    assert_eq!(report.interfaces.last(), Some(&0));
    assert!(report.unresolved.is_empty());
    let f = fx.sketch_func("f");
    assert!(f.starts_with("func f() int {"), "{f}");
}

#[test]
fn enumerate_becomes_an_indexed_range() {
    let items = pygo_py::dsl::list(vec![
        pygo_py::dsl::string("a"),
        pygo_py::dsl::string("b"),
        pygo_py::dsl::string("c"),
    ]);
    let body = vec![for_(
        tuple(vec![name("i"), name("s")]),
        call(name("enumerate"), vec![items]),
        vec![expr(call(name("use"), vec![name("i"), name("s")]))],
    )];
    let mut fx = Fixture::python_main(body);
    converge(&mut fx);
    let main = fx.sketch_func("main");
    assert!(
        main.contains("for i, s := range []string{\"a\", \"b\", \"c\"}"),
        "{main}"
    );
}

#[test]
fn generators_send_in_order_and_close() {
    let mut fx = Fixture::python_defs(vec![
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
    converge(&mut fx);
    let gen = fx.sketch_func("gen");
    assert!(gen.contains("go func()"), "{gen}");
    assert!(gen.contains("defer close(yield)"), "{gen}");
    let first = gen.find("yield <- 1").expect("first value sent");
    let second = gen.find("yield <- 2").expect("second value sent");
    assert!(first < second);
}

#[test]
fn membership_lowers_by_container() {
    let mut fx = membership();
    converge(&mut fx);
    let has = fx.sketch_func("has");
    assert!(has.contains("_, ok := d[k]; return ok"), "{has}");
    let within = fx.sketch_func("within");
    assert!(within.contains("strings.Contains(s, c)"), "{within}");
}

#[test]
fn converged_trees_are_fixed_points() {
    for mut fx in [constant_sum(), membership()] {
        converge(&mut fx);
        let before = fx.arena.structural_hash(fx.file);
        let mut stage = passes::stage0();
        stage.extend(passes::stage1());
        run_stage(&mut fx.arena, fx.file, stage, false);
        assert_eq!(fx.arena.structural_hash(fx.file), before, "{}", fx.sketch());
    }
}

#[test]
fn resolved_types_rederive_from_children() {
    let mut fx = constant_sum();
    converge(&mut fx);
    let scopes = ScopeTree::new();
    let mut sums = 0;
    for id in fx.arena.descendants(fx.file) {
        let is_sum = matches!(fx.arena.kind(id), NodeKind::BinaryExpr { .. });
        if !is_sum && !matches!(fx.arena.kind(id), NodeKind::BasicLit { .. }) {
            continue;
        }
        let mut bare = fx.arena.clone();
        bare.clear_ty(id);
        let derived = TypeCx::new(&bare, &scopes, ScopeId::ROOT).type_of(id);
        assert!(derived.is_some(), "{}", fx.arena.sketch(id));
        if let Some(recorded) = fx.arena.ty(id) {
            assert_eq!(Some(recorded.clone()), derived, "{}", fx.arena.sketch(id));
        }
        if is_sum {
            assert_eq!(derived, Some(GoType::INT));
            sums += 1;
        }
    }
    assert_eq!(sums, 1, "{}", fx.sketch());
}

#[test]
fn structural_hash_mode_also_converges() {
    let mut fx = constant_sum();
    let options = PipelineOptions {
        hash_convergence: true,
        ..PipelineOptions::default()
    };
    let report = run(&mut fx.arena, fx.file, &options).unwrap();
    assert!(report.iterations >= 2);
}

/// `def pick(a): return a` called with `1`: narrowing takes more than one
/// iteration.
fn chained() -> Fixture {
    Fixture::python_defs(vec![
        def("pick", &["a"], vec![ret(name("a"))]),
        def("main", &[], vec![expr(call(name("pick"), vec![int(1)]))]),
    ])
}

#[test]
fn iteration_budget_is_enforced() {
    let mut fx = chained();
    let options = PipelineOptions {
        max_iterations: 0,
        ..PipelineOptions::default()
    };
    let err = run(&mut fx.arena, fx.file, &options).unwrap_err();
    assert!(
        matches!(err, PipelineError::ConvergenceFailure { iterations: 0, remaining } if remaining > 0),
        "{err}"
    );

    let mut fx = chained();
    let options = PipelineOptions {
        max_iterations: 1,
        ..PipelineOptions::default()
    };
    let err = run(&mut fx.arena, fx.file, &options).unwrap_err();
    assert!(
        matches!(err, PipelineError::ConvergenceFailure { iterations: 1, .. }),
        "{err}"
    );
}

#[test]
fn chained_narrowing_converges() {
    let mut fx = chained();
    let report = converge(&mut fx);
    assert!(report.iterations > 1);
    let pick = fx.sketch_func("pick");
    assert!(pick.starts_with("func pick(a int) int {"), "{pick}");
}

/// `def main(): x = mystery()` where nothing says what `mystery` returns.
fn mystery() -> Fixture {
    Fixture::python_main(vec![pygo_py::dsl::assign(
        name("x"),
        call(name("mystery"), Vec::new()),
    )])
}

#[test]
fn unknown_names_are_reported() {
    let mut fx = mystery();
    let report = converge(&mut fx);
    assert_eq!(report.unresolved, vec!["x".to_owned()]);
}

#[test]
fn strict_types_refuse_unknown_names() {
    let mut fx = mystery();
    let options = PipelineOptions {
        strict_types: true,
        ..PipelineOptions::default()
    };
    let err = run(&mut fx.arena, fx.file, &options).unwrap_err();
    assert_eq!(
        err,
        PipelineError::TypeResolutionDeadlock {
            names: vec!["x".to_owned()]
        }
    );
    assert_eq!(err.to_string(), "could not infer a type for x");
}

#[test]
fn operators_left_unlowered_are_errors() {
    let test = cmp(int(1), CmpOperator::In, call(name("mystery"), Vec::new()));
    let mut fx = Fixture::python_main(vec![expr(test)]);
    let err = run(&mut fx.arena, fx.file, &PipelineOptions::default()).unwrap_err();
    assert!(
        matches!(
            &err,
            PipelineError::UnloweredOperator { op, excerpt }
                if op == "in" && excerpt.contains("in mystery()")
        ),
        "{err}"
    );
}
