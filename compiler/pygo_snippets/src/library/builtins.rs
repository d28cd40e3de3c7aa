//! Python built-in functions.

use pygo_py::dsl::*;
use pygo_py::{CmpOperator, FunctionDef};

use super::{isinstance, raw_call, rune};
use crate::{BindStyle, Binding, CalleePattern, SnippetRegistry};

pub(super) fn register(registry: &mut SnippetRegistry) {
    use BindStyle::{Expr, FuncLitCall, ParamlessFuncLit};
    use CalleePattern::Exact;

    registry.register(Binding::new(Exact("int"), FuncLitCall, int_of()));
    registry.register(Binding::new(Exact("input"), FuncLitCall, input(false)));
    registry.register(Binding::new(Exact("input"), FuncLitCall, input(true)));
    registry.register(Binding::new(Exact("zip"), ParamlessFuncLit, zip()));
    registry.register(Binding::new(
        Exact("abs"),
        Expr,
        def("abs", &["a"], vec![ret(call(path("math.Abs"), vec![name("a")]))]),
    ));
    registry.register(Binding::new(Exact("map"), ParamlessFuncLit, map_one()));
    registry.register(Binding::new(Exact("map"), ParamlessFuncLit, map_two()));
    registry.register(Binding::new(Exact("filter"), ParamlessFuncLit, filter()));
    registry.register(Binding::new(Exact("str"), Expr, sprintf("str", "%v")));
    registry.register(Binding::new(Exact("repr"), Expr, sprintf("repr", "%#v")));
    registry.register(Binding::new(
        Exact("iter"),
        ParamlessFuncLit,
        def(
            "iter",
            &["a"],
            vec![for_(name("elt"), name("a"), vec![expr(yield_(name("elt")))])],
        ),
    ));
    registry.register(Binding::new(
        Exact("list"),
        ParamlessFuncLit,
        def(
            "list",
            &["a"],
            vec![
                assign(name("elts"), list(vec![])),
                for_(
                    name("elt"),
                    name("a"),
                    vec![expr(method(name("elts"), "append", vec![name("elt")]))],
                ),
                ret(name("elts")),
            ],
        ),
    ));
}

/// `int(value)` over strings, ints, and floats.
fn int_of() -> FunctionDef {
    let parse = vec![
        assign(
            tuple(vec![name("i"), name("err")]),
            call(
                path("strconv.ParseInt"),
                vec![name("value"), int(10), int(64)],
            ),
        ),
        if_(
            cmp(name("err"), CmpOperator::NotEq, name("nil")),
            vec![expr(call(name("panic"), vec![name("err")]))],
            vec![],
        ),
        ret(raw_call("int", vec![name("i")])),
    ];
    def_typed(
        "int",
        vec![arg("value")],
        Some(name("int")),
        vec![if_(
            isinstance("value", name("str")),
            parse,
            vec![if_(
                isinstance("value", name("int")),
                vec![ret(name("value"))],
                vec![if_(
                    isinstance("value", name("float")),
                    vec![ret(raw_call("int", vec![name("value")]))],
                    vec![],
                )],
            )],
        )],
    )
}

fn input(prompt: bool) -> FunctionDef {
    let mut body = vec![assign(
        name("reader"),
        call(path("bufio.NewReader"), vec![path("os.Stdin")]),
    )];
    if prompt {
        body.push(expr(call(path("fmt.Print"), vec![name("msg")])));
    }
    body.push(assign(
        tuple(vec![name("text"), name("_")]),
        method(name("reader"), "ReadString", vec![rune("\n")]),
    ));
    body.push(ret(call(
        path("strings.ReplaceAll"),
        vec![name("text"), string("\n"), string("")],
    )));
    let params = if prompt {
        vec![arg_typed("msg", name("str"))]
    } else {
        vec![]
    };
    def_typed("input", params, Some(name("str")), body)
}

fn zip() -> FunctionDef {
    def_typed(
        "zip",
        vec![arg_typed("a", name("list")), arg_typed("b", name("list"))],
        None,
        vec![for_(
            tuple(vec![name("i"), name("e")]),
            call(name("enumerate"), vec![name("a")]),
            vec![
                if_(
                    cmp(name("i"), CmpOperator::GtE, call(name("len"), vec![name("b")])),
                    vec![brk()],
                    vec![],
                ),
                expr(yield_(tuple(vec![
                    name("e"),
                    subscript(name("b"), name("i")),
                ]))),
            ],
        )],
    )
}

fn map_one() -> FunctionDef {
    def(
        "map",
        &["f", "iterable"],
        vec![for_(
            name("x"),
            name("iterable"),
            vec![expr(yield_(call(name("f"), vec![name("x")])))],
        )],
    )
}

fn map_two() -> FunctionDef {
    def(
        "map",
        &["f", "iterable1", "iterable2"],
        vec![for_(
            name("xy"),
            call(name("zip"), vec![name("iterable1"), name("iterable2")]),
            vec![expr(yield_(call(
                name("f"),
                vec![
                    subscript(name("xy"), int(0)),
                    subscript(name("xy"), int(1)),
                ],
            )))],
        )],
    )
}

fn filter() -> FunctionDef {
    def(
        "filter",
        &["f", "iterable"],
        vec![for_(
            name("x"),
            name("iterable"),
            vec![if_(
                call(name("f"), vec![name("x")]),
                vec![expr(yield_(name("x")))],
                vec![],
            )],
        )],
    )
}

fn sprintf(template: &str, verb: &str) -> FunctionDef {
    def(
        template,
        &["a"],
        vec![ret(call(path("fmt.Sprintf"), vec![string(verb), name("a")]))],
    )
}
