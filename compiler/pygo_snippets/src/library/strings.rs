//! `str` methods.

use pygo_py::dsl::*;
use pygo_py::{CmpOperator, Expr, FunctionDef, Operator, Stmt};

use super::{isinstance, panic_with};
use crate::{BindStyle, Binding, CalleePattern, SnippetRegistry};

pub(super) fn register(registry: &mut SnippetRegistry) {
    use CalleePattern::Method;

    let expr_style = |registry: &mut SnippetRegistry, pattern: &'static str, template| {
        registry.register(Binding::new(Method(pattern), BindStyle::Expr, template));
    };
    let func_lit = |registry: &mut SnippetRegistry, pattern: &'static str, template| {
        registry.register(Binding::new(Method(pattern), BindStyle::FuncLitCall, template));
    };

    expr_style(
        registry,
        "capitalize",
        def(
            "capitalize",
            &["s"],
            vec![ret(bin(
                method(slice(name("s"), Some(int(0)), Some(int(1))), "upper", vec![]),
                Operator::Add,
                method(slice(name("s"), Some(int(1)), None), "lower", vec![]),
            ))],
        ),
    );
    for (method_name, param, go_func) in [
        ("endswith", "suffix", "strings.HasSuffix"),
        ("startswith", "prefix", "strings.HasPrefix"),
        ("removeprefix", "prefix", "strings.TrimPrefix"),
        ("removesuffix", "suffix", "strings.TrimSuffix"),
    ] {
        expr_style(registry, method_name, wrap(method_name, &["X", param], go_func));
    }

    for (method_name, go_func) in [("find", "strings.Index"), ("rfind", "strings.LastIndex")] {
        expr_style(registry, method_name, wrap(method_name, &["X", "sub"], go_func));
        expr_style(registry, method_name, find_in_range(method_name, go_func, false));
        expr_style(registry, method_name, find_in_range(method_name, go_func, true));
    }
    for (method_name, finder) in [("index", "find"), ("rindex", "rfind")] {
        let arities: [&[&str]; 3] = [&[], &["start"], &["start", "end"]];
        for extra in arities {
            func_lit(registry, method_name, index(method_name, finder, extra));
        }
    }

    let rune_classes: [(&'static str, &[&str], bool); 5] = [
        (
            "isalnum",
            &["unicode.IsLetter", "unicode.IsDigit", "unicode.IsNumber"],
            false,
        ),
        ("isalpha", &["unicode.IsLetter"], false),
        ("isdigit", &["unicode.IsDigit"], true),
        ("isnumeric", &["unicode.IsDigit", "unicode.IsNumber"], true),
        ("isspace", &["unicode.IsSpace"], true),
    ];
    for (method_name, predicates, non_empty) in rune_classes {
        func_lit(registry, method_name, all_runes(method_name, predicates, non_empty));
    }
    func_lit(registry, "islower", cased("islower", "unicode.IsLower"));
    func_lit(registry, "isupper", cased("isupper", "unicode.IsUpper"));

    expr_style(
        registry,
        "join",
        def(
            "join",
            &["sep", "X"],
            vec![ret(call(path("strings.Join"), vec![name("X"), name("sep")]))],
        ),
    );
    expr_style(registry, "lower", wrap("lower", &["s"], "strings.ToLower"));
    expr_style(registry, "upper", wrap("upper", &["s"], "strings.ToUpper"));

    for (method_name, space_func, cutset_func) in [
        ("lstrip", "strings.TrimLeftFunc", "strings.TrimLeft"),
        ("rstrip", "strings.TrimRightFunc", "strings.TrimRight"),
    ] {
        expr_style(
            registry,
            method_name,
            def(
                method_name,
                &["X"],
                vec![ret(call(
                    path(space_func),
                    vec![name("X"), path("unicode.IsSpace")],
                ))],
            ),
        );
        expr_style(registry, method_name, wrap(method_name, &["X", "cutset"], cutset_func));
    }
    expr_style(registry, "strip", wrap("strip", &["X"], "strings.TrimSpace"));
    expr_style(registry, "strip", wrap("strip", &["X", "cutset"], "strings.Trim"));

    expr_style(registry, "replace", wrap("replace", &["X", "old", "new"], "strings.ReplaceAll"));
    expr_style(registry, "replace", wrap("replace", &["X", "old", "new", "n"], "strings.Replace"));

    expr_style(registry, "split", wrap("split", &["X"], "strings.Fields"));
    expr_style(registry, "split", wrap("split", &["X", "sep"], "strings.Split"));
    expr_style(registry, "split", wrap("split", &["X", "sep", "maxsplit"], "strings.SplitN"));
    registry.register(
        Binding::new(Method("splitlines"), BindStyle::FuncLitCall, splitlines())
            .results(&["lines"]),
    );
    func_lit(registry, "title", title());
    func_lit(registry, "count", count());
}

/// `return go_func(params...)`
fn wrap(template: &str, params: &[&str], go_func: &str) -> FunctionDef {
    def(
        template,
        params,
        vec![ret(call(
            path(go_func),
            params.iter().map(|p| name(p)).collect(),
        ))],
    )
}

/// `find(sub, start[, end])`: search a slice of `X` and shift the hit back.
fn find_in_range(template: &str, go_func: &str, with_end: bool) -> FunctionDef {
    let mut params = vec!["X", "sub", "start"];
    if with_end {
        params.push("end");
    }
    let window = slice(
        name("X"),
        Some(name("start")),
        with_end.then(|| name("end")),
    );
    let found = walrus("r", call(path(go_func), vec![window, name("sub")]));
    def(
        template,
        &params,
        vec![ret(if_exp(
            cmp(found, CmpOperator::NotEq, int(-1)),
            bin(name("r"), Operator::Add, name("start")),
            int(-1),
        ))],
    )
}

/// `index`/`rindex`: like `finder` but panics when nothing is found. The
/// two-argument `index` also searches lists, so its parameters stay
/// untyped until the type switch is resolved.
fn index(template: &str, finder: &str, extra: &[&str]) -> FunctionDef {
    let searches_lists = extra.is_empty() && finder == "find";
    let mut params = if searches_lists {
        vec![arg("X"), arg("sub")]
    } else {
        vec![arg_typed("X", name("str")), arg_typed("sub", name("str"))]
    };
    params.extend(extra.iter().map(|p| arg_typed(p, name("int"))));
    let finder_args = std::iter::once(name("sub"))
        .chain(extra.iter().map(|p| name(p)))
        .collect();
    let on_string = vec![
        if_(
            cmp(
                walrus("i", method(name("X"), finder, finder_args)),
                CmpOperator::NotEq,
                int(-1),
            ),
            vec![ret(name("i"))],
            vec![],
        ),
        panic_with("ValueError: substring not found"),
    ];
    let body = if searches_lists {
        let on_list = vec![
            for_(
                tuple(vec![name("i"), name("val")]),
                call(name("enumerate"), vec![name("X")]),
                vec![if_(
                    cmp(name("val"), CmpOperator::Eq, name("sub")),
                    vec![ret(name("i"))],
                    vec![],
                )],
            ),
            panic_with("ValueError: element not found"),
        ];
        vec![if_(
            isinstance("X", name("str")),
            on_string,
            vec![if_(isinstance("X", name("list")), on_list, vec![])],
        )]
    } else {
        on_string
    };
    def_typed(template, params, Some(name("int")), body)
}

/// True when every rune satisfies one of `predicates`. `non_empty` also
/// requires at least one rune.
fn all_runes(template: &str, predicates: &[&str], non_empty: bool) -> FunctionDef {
    let tests: Vec<Expr> = predicates
        .iter()
        .map(|p| call(path(p), vec![name("r")]))
        .collect();
    let test = if tests.len() == 1 {
        tests.into_iter().next().unwrap_or_else(|| boolean(true))
    } else {
        or(tests)
    };
    let result = if non_empty {
        cmp(call(name("len"), vec![name("X")]), CmpOperator::NotEq, int(0))
    } else {
        boolean(true)
    };
    def_typed(
        template,
        vec![arg_typed("X", name("str"))],
        Some(name("bool")),
        vec![
            for_(
                name("r"),
                name("X"),
                vec![if_(not(test), vec![ret(boolean(false))], vec![])],
            ),
            ret(result),
        ],
    )
}

/// `islower`/`isupper`: only spaces may be uncased, and at least one cased
/// rune must exist.
fn cased(template: &str, predicate: &str) -> FunctionDef {
    let body = vec![
        assign(name("found"), boolean(false)),
        for_(
            name("r"),
            name("X"),
            vec![if_(
                not(call(path(predicate), vec![name("r")])),
                vec![if_(
                    not(call(path("unicode.IsSpace"), vec![name("r")])),
                    vec![ret(boolean(false))],
                    vec![],
                )],
                vec![assign(name("found"), boolean(true))],
            )],
        ),
        ret(and(vec![
            name("found"),
            cmp(call(name("len"), vec![name("X")]), CmpOperator::NotEq, int(0)),
        ])),
    ];
    def_typed(template, vec![arg_typed("X", name("str"))], Some(name("bool")), body)
}

fn splitlines() -> FunctionDef {
    def_typed(
        "splitlines",
        vec![arg_typed("s", name("str"))],
        Some(subscript(name("list"), name("str"))),
        vec![
            assign(
                name("sc"),
                call(
                    path("bufio.NewScanner"),
                    vec![call(path("strings.NewReader"), vec![name("s")])],
                ),
            ),
            while_(
                method(name("sc"), "Scan", vec![]),
                vec![expr(method(
                    name("lines"),
                    "append",
                    vec![method(name("sc"), "Text", vec![])],
                ))],
            ),
            ret_none(),
        ],
    )
}

fn write_rune(value: Expr) -> Stmt {
    expr(method(name("sb"), "WriteRune", vec![value]))
}

fn title() -> FunctionDef {
    def_typed(
        "title",
        vec![arg_typed("s", name("str"))],
        Some(name("str")),
        vec![
            assign(name("ws"), boolean(true)),
            ann(name("sb"), path("strings.Builder"), None),
            for_(
                name("r"),
                name("s"),
                vec![if_(
                    call(path("unicode.IsSpace"), vec![name("r")]),
                    vec![assign(name("ws"), boolean(true)), write_rune(name("r"))],
                    vec![if_(
                        name("ws"),
                        vec![
                            assign(name("ws"), boolean(false)),
                            write_rune(call(path("unicode.ToUpper"), vec![name("r")])),
                        ],
                        vec![write_rune(call(path("unicode.ToLower"), vec![name("r")]))],
                    )],
                )],
            ),
            ret(method(name("sb"), "String", vec![])),
        ],
    )
}

/// `count` on strings, and on lists by equality.
fn count() -> FunctionDef {
    def_typed(
        "count",
        vec![arg("X"), arg("elt")],
        Some(name("int")),
        vec![if_(
            isinstance("X", name("str")),
            vec![ret(call(path("strings.Count"), vec![name("X"), name("elt")]))],
            vec![if_(
                isinstance("X", name("list")),
                vec![
                    assign(name("n"), int(0)),
                    for_(
                        name("v"),
                        name("X"),
                        vec![if_(
                            cmp(name("v"), CmpOperator::Eq, name("elt")),
                            vec![aug(name("n"), Operator::Add, int(1))],
                            vec![],
                        )],
                    ),
                    ret(name("n")),
                ],
                vec![],
            )],
        )],
    )
}
