//! List, set, and dict methods.

use pygo_ir::directive;
use pygo_py::dsl::*;
use pygo_py::{CmpOperator, FunctionDef, Operator};

use super::{any_of, deref, isinstance, list_of, panic_with, ptr, store};
use crate::{BindStyle, Binding, CalleePattern, SnippetRegistry};

pub(super) fn register(registry: &mut SnippetRegistry) {
    use BindStyle::{Expr, FuncLitCall, ParamlessFuncLit, Stmt};
    use CalleePattern::Method;

    // Lists. `append` is rewritten by a pass so it can see the target.
    registry.register(Binding::new(
        Method("extend"),
        Stmt,
        def(
            "extend",
            &["X", "other"],
            vec![assign(
                name("X"),
                call(name("append"), vec![name("X"), starred(name("other"))]),
            )],
        ),
    ));
    registry.register(Binding::new(Method("insert"), Stmt, insert()));
    registry.register(Binding::new(Method("sort"), FuncLitCall, sort(false)));
    registry.register(Binding::new(Method("sort"), FuncLitCall, sort(true)));
    registry.register(Binding::new(Method("pop"), FuncLitCall, pop_last()).deref(&["s"]));
    registry.register(Binding::new(Method("remove"), FuncLitCall, remove()).deref(&["s"]));
    registry.register(Binding::new(Method("pop"), FuncLitCall, pop_at()).deref(&["s"]));
    registry.register(Binding::new(
        Method("clear"),
        Stmt,
        def("clear", &["s"], vec![assign(name("s"), name("nil"))]),
    ));
    registry.register(
        Binding::new(
            Method("copy"),
            FuncLitCall,
            def_typed(
                "copy",
                vec![arg_typed("s", ptr(any_of(name("s"))))],
                Some(any_of(name("s"))),
                vec![
                    assign(
                        name("tmp"),
                        call(name("append"), vec![name("tmp"), starred(deref("s"))]),
                    ),
                    ret_none(),
                ],
            ),
        )
        .deref(&["s"])
        .results(&["tmp"]),
    );

    // Sets
    registry.register(Binding::new(
        Method("add"),
        Stmt,
        def(
            "add",
            &["s", "elt"],
            vec![assign(
                subscript(name("s"), name("elt")),
                name(directive::EMPTY_STRUCT),
            )],
        ),
    ));
    registry.register(Binding::new(Method("union"), FuncLitCall, union()));
    registry.register(Binding::new(
        Method("intersection"),
        FuncLitCall,
        set_filter("intersection", CmpOperator::In),
    ));
    registry.register(Binding::new(
        Method("difference"),
        FuncLitCall,
        set_filter("difference", CmpOperator::NotIn),
    ));
    registry.register(Binding::new(
        Method("symmetric_difference"),
        FuncLitCall,
        symmetric_difference(),
    ));
    registry.register(Binding::new(
        Method("issubset"),
        FuncLitCall,
        all_in("issubset", "s1", "s2"),
    ));
    registry.register(Binding::new(
        Method("issuperset"),
        FuncLitCall,
        all_in("issuperset", "s2", "s1"),
    ));

    // Dicts. `keys()` is dropped: ranging over a map yields its keys.
    registry.register(Binding::new(
        Method("keys"),
        Expr,
        def("keys", &["X"], vec![ret(name("X"))]),
    ));
    registry.register(Binding::new(
        Method("update"),
        ParamlessFuncLit,
        def(
            "update",
            &["d1", "d2"],
            vec![for_(
                tuple(vec![name("k"), name("v")]),
                method(name("d2"), "items", vec![]),
                vec![assign(subscript(name("d1"), name("k")), name("v"))],
            )],
        ),
    ));
    registry.register(Binding::new(
        Method("get"),
        ParamlessFuncLit,
        def(
            "get",
            &["X", "key", "default"],
            vec![
                if_(
                    walrus("r", subscript(name("X"), name("key"))),
                    vec![ret(name("r"))],
                    vec![],
                ),
                ret(name("default")),
            ],
        ),
    ));
}

fn insert() -> FunctionDef {
    let i_plus_one = bin(name("i"), Operator::Add, int(1));
    def_typed(
        "insert",
        vec![arg("s"), arg_typed("i", name("int")), arg("elt")],
        None,
        vec![
            assign(
                name("s"),
                call(name("append"), vec![name("s"), name("elt")]),
            ),
            expr(call(
                name("copy"),
                vec![
                    slice(name("s"), Some(i_plus_one), None),
                    slice(name("s"), Some(name("i")), None),
                ],
            )),
            assign(subscript(name("s"), name("i")), name("elt")),
        ],
    )
}

/// `sort()`, or `sort(reverse=True)` when `reverse` is set.
fn sort(reverse: bool) -> FunctionDef {
    let by_kind = |sorter: &str, slice_type: &str| {
        if reverse {
            vec![expr(call(
                path("sort.Sort"),
                vec![call(
                    path("sort.Reverse"),
                    vec![call(path(slice_type), vec![name("s")])],
                )],
            ))]
        } else {
            vec![expr(call(path(sorter), vec![name("s")]))]
        }
    };
    let fallback = if reverse {
        call(
            path("sort.Sort"),
            vec![call(path("sort.Reverse"), vec![name("s")])],
        )
    } else {
        call(path("sort.Sort"), vec![name("s")])
    };
    let body = vec![if_(
        isinstance("s", list_of(name("str"))),
        by_kind("sort.Strings", "sort.StringSlice"),
        vec![if_(
            isinstance("s", list_of(name("float"))),
            by_kind("sort.Float64s", "sort.Float64Slice"),
            vec![if_(
                isinstance("s", list_of(name("int"))),
                by_kind("sort.Ints", "sort.IntSlice"),
                vec![expr(fallback)],
            )],
        )],
    )];
    let mut template = def("sort", &["s"], body);
    if reverse {
        template.args.posonlyargs = std::mem::take(&mut template.args.args);
        template.args.kwonlyargs = vec![arg("reverse")];
        template.args.kw_defaults = vec![Some(boolean(true))];
    }
    template
}

fn pop_last() -> FunctionDef {
    def_typed(
        "pop",
        vec![arg_typed("s", ptr(any_of(name("s"))))],
        Some(any_of(subscript(name("s"), int(0)))),
        vec![
            assign(
                name("i"),
                bin(call(name("len"), vec![deref("s")]), Operator::Sub, int(1)),
            ),
            assign(name("popped"), subscript(deref("s"), name("i"))),
            store("s", slice(deref("s"), None, Some(name("i")))),
            ret(name("popped")),
        ],
    )
}

/// `(*s)[:i] + (*s)[i+1:]` as an append.
fn without_index() -> pygo_py::Expr {
    call(
        name("append"),
        vec![
            slice(deref("s"), None, Some(name("i"))),
            starred(slice(
                deref("s"),
                Some(bin(name("i"), Operator::Add, int(1))),
                None,
            )),
        ],
    )
}

fn pop_at() -> FunctionDef {
    def_typed(
        "pop",
        vec![
            arg_typed("s", ptr(any_of(name("s")))),
            arg_typed("i", name("int")),
        ],
        Some(any_of(subscript(name("s"), int(0)))),
        vec![
            assign(name("popped"), subscript(deref("s"), name("i"))),
            store("s", without_index()),
            ret(name("popped")),
        ],
    )
}

fn remove() -> FunctionDef {
    def_typed(
        "remove",
        vec![
            arg_typed("s", ptr(any_of(name("s")))),
            arg_typed("x", any_of(subscript(name("s"), int(0)))),
        ],
        None,
        vec![
            for_(
                tuple(vec![name("i"), name("val")]),
                call(name("enumerate"), vec![deref("s")]),
                vec![if_(
                    cmp(name("val"), CmpOperator::Eq, name("x")),
                    vec![store("s", without_index()), ret_none()],
                    vec![],
                )],
            ),
            panic_with("ValueError: list.remove(x): x not in list"),
        ],
    )
}

fn set_params() -> Vec<pygo_py::Arg> {
    vec![
        arg_typed("s1", any_of(name("s1"))),
        arg_typed("s2", any_of(name("s2"))),
    ]
}

fn add_to(target: &str, elt: &str) -> pygo_py::Stmt {
    expr(method(name(target), "add", vec![name(elt)]))
}

fn union() -> FunctionDef {
    def_typed(
        "union",
        set_params(),
        Some(any_of(name("s1"))),
        vec![
            assign(name("union"), call(name("set"), vec![])),
            for_(name("elt"), name("s1"), vec![add_to("union", "elt")]),
            for_(name("elt"), name("s2"), vec![add_to("union", "elt")]),
            ret(name("union")),
        ],
    )
}

/// Elements of `s1` for which `elt <op> s2` holds.
fn set_filter(template: &str, op: CmpOperator) -> FunctionDef {
    def_typed(
        template,
        set_params(),
        Some(any_of(name("s1"))),
        vec![
            assign(name("result"), call(name("set"), vec![])),
            for_(
                name("elt"),
                name("s1"),
                vec![if_(
                    cmp(name("elt"), op, name("s2")),
                    vec![add_to("result", "elt")],
                    vec![],
                )],
            ),
            ret(name("result")),
        ],
    )
}

fn symmetric_difference() -> FunctionDef {
    let only_in = |from: &str, other: &str| {
        for_(
            name("elt"),
            name(from),
            vec![if_(
                cmp(name("elt"), CmpOperator::NotIn, name(other)),
                vec![add_to("result", "elt")],
                vec![],
            )],
        )
    };
    def_typed(
        "symmetric_difference",
        set_params(),
        Some(any_of(name("s1"))),
        vec![
            assign(name("result"), call(name("set"), vec![])),
            only_in("s1", "s2"),
            only_in("s2", "s1"),
            ret(name("result")),
        ],
    )
}

/// True when every element of `inner` is in `outer`.
fn all_in(template: &str, inner: &str, outer: &str) -> FunctionDef {
    def_typed(
        template,
        set_params(),
        Some(name("bool")),
        vec![
            for_(
                name("elt"),
                name(inner),
                vec![if_(
                    cmp(name("elt"), CmpOperator::NotIn, name(outer)),
                    vec![ret(boolean(false))],
                    vec![],
                )],
            ),
            ret(boolean(true)),
        ],
    )
}
