//! `json`, `logging`, `random`, and `time`.

use pygo_ir::directive;
use pygo_py::dsl::*;
use pygo_py::{CmpOperator, Expr, FunctionDef, Operator};

use crate::{BindStyle, Binding, CalleePattern, SnippetRegistry};

pub(super) fn register(registry: &mut SnippetRegistry) {
    use CalleePattern::Qualified;

    registry.register(Binding::new(
        Qualified("json", "dumps"),
        BindStyle::ParamlessFuncLit,
        json_dumps(),
    ));

    for (level, prefix) in [
        ("info", "INFO:"),
        ("debug", "DEBUG:"),
        ("warning", "WARNING:"),
        ("error", "ERROR:"),
    ] {
        registry.register(Binding::new(
            Qualified("logging", level),
            BindStyle::Expr,
            def(
                level,
                &["msg"],
                vec![ret(call(path("log.Println"), vec![string(prefix), name("msg")]))],
            ),
        ));
    }

    let random = |registry: &mut SnippetRegistry, func: &'static str, style, template| {
        registry.register(Binding::new(Qualified("random", func), style, template).init(seed()));
    };
    random(
        registry,
        "random",
        BindStyle::Expr,
        def("random", &[], vec![ret(rand("Float64", vec![]))]),
    );
    random(
        registry,
        "randrange",
        BindStyle::Expr,
        def("randrange", &["stop"], vec![ret(rand("Intn", vec![name("stop")]))]),
    );
    random(
        registry,
        "randrange",
        BindStyle::Expr,
        def(
            "randrange",
            &["start", "stop"],
            vec![ret(bin(
                name("start"),
                Operator::Add,
                rand("Intn", vec![bin(name("stop"), Operator::Sub, name("start"))]),
            ))],
        ),
    );
    random(
        registry,
        "randint",
        BindStyle::Expr,
        def(
            "randint",
            &["a", "b"],
            vec![ret(bin(
                name("a"),
                Operator::Add,
                rand(
                    "Intn",
                    vec![bin(
                        bin(name("b"), Operator::Sub, name("a")),
                        Operator::Add,
                        int(1),
                    )],
                ),
            ))],
        ),
    );
    random(
        registry,
        "choice",
        BindStyle::Expr,
        def(
            "choice",
            &["seq"],
            vec![ret(subscript(
                name("seq"),
                rand("Intn", vec![call(name("len"), vec![name("seq")])]),
            ))],
        ),
    );
    random(registry, "shuffle", BindStyle::Stmt, shuffle());
    random(
        registry,
        "uniform",
        BindStyle::Expr,
        def(
            "uniform",
            &["a", "b"],
            vec![ret(bin(
                name("a"),
                Operator::Add,
                bin(
                    bin(name("b"), Operator::Sub, name("a")),
                    Operator::Mult,
                    rand("Float64", vec![]),
                ),
            ))],
        ),
    );

    registry.register(Binding::new(
        Qualified("time", "time"),
        BindStyle::Expr,
        def(
            "time",
            &[],
            vec![ret(bin(
                call(name("float64"), vec![unix_nano()]),
                Operator::Div,
                float("1e9"),
            ))],
        ),
    ));
}

fn json_dumps() -> FunctionDef {
    def(
        "dumps",
        &["m"],
        vec![
            assign(
                tuple(vec![name("b"), name("err")]),
                call(path("json.Marshal"), vec![name("m")]),
            ),
            if_(
                cmp(name("err"), CmpOperator::NotEq, name("nil")),
                vec![expr(call(name("panic"), vec![name("err")]))],
                vec![],
            ),
            ret(call(name("string"), vec![name("b")])),
        ],
    )
}

fn rand(func: &str, args: Vec<Expr>) -> Expr {
    call(path(&format!("rand.{func}")), args)
}

/// `time.Now().UnixNano()`
fn unix_nano() -> Expr {
    method(call(path("time.Now"), vec![]), "UnixNano", vec![])
}

/// Seeds `math/rand` once per program.
fn seed() -> FunctionDef {
    def(
        directive::INIT,
        &[],
        vec![expr(rand("Seed", vec![unix_nano()]))],
    )
}

/// `rand.Shuffle` with an in-place swap.
fn shuffle() -> FunctionDef {
    let at = |i: &str| subscript(name("x"), name(i));
    let swap = def_typed(
        "swap",
        vec![arg_typed("i", name("int")), arg_typed("j", name("int"))],
        None,
        vec![assign(tuple(vec![at("i"), at("j")]), tuple(vec![at("j"), at("i")]))],
    );
    def(
        "shuffle",
        &["x"],
        vec![
            pygo_py::Stmt::FunctionDef(swap),
            expr(rand(
                "Shuffle",
                vec![call(name("len"), vec![name("x")]), name("swap")],
            )),
        ],
    )
}
