#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::dsl::*;
use super::*;

#[test]
fn deserializes_parser_dump() {
    let json = r#"{
        "_type": "Module",
        "body": [
            {"_type": "Assign", "lineno": 1,
             "targets": [{"_type": "Name", "id": "x", "ctx": {"_type": "Store"}}],
             "value": {"_type": "BinOp",
                       "left": {"_type": "Constant", "value": {"kind": "Int", "value": "1"}},
                       "op": {"_type": "Add"},
                       "right": {"_type": "Constant", "value": {"kind": "Float", "value": "2.5"}}}},
            {"_type": "Expr", "value": {"_type": "Call",
                "func": {"_type": "Name", "id": "print"},
                "args": [{"_type": "Name", "id": "x"}],
                "keywords": [{"_type": "keyword", "arg": "end",
                              "value": {"_type": "Constant", "value": {"kind": "Str", "value": ""}}}]}},
            {"_type": "Unsupported", "kind": "AsyncFor", "source": "async for a in b: pass"}
        ]
    }"#;
    let module: Module = serde_json::from_str(json).unwrap();
    assert_eq!(module.body.len(), 3);
    assert_eq!(
        module.body[0],
        assign(name("x"), bin(int(1), Operator::Add, float("2.5")))
    );
    assert_eq!(
        module.body[1],
        expr(call_kw(name("print"), vec![name("x")], vec![("end", string(""))]))
    );
    assert_eq!(module.body[2].kind_name(), "AsyncFor");
}

#[test]
fn deserializes_constants() {
    let none: Constant = serde_json::from_str(r#"{"kind": "None"}"#).unwrap();
    let complex: Constant =
        serde_json::from_str(r#"{"kind": "Complex", "value": {"real": "0.0", "imag": "2.0"}}"#)
            .unwrap();
    let bytes: Constant = serde_json::from_str(r#"{"kind": "Bytes", "value": [104, 105]}"#).unwrap();
    assert_eq!(none, Constant::None);
    assert_eq!(
        complex,
        Constant::Complex {
            real: "0.0".into(),
            imag: "2.0".into()
        }
    );
    assert_eq!(bytes, Constant::Bytes(b"hi".to_vec()));
}

#[test]
fn function_defaults_and_handlers() {
    let json = r#"{"_type": "Try",
        "body": [{"_type": "Pass"}],
        "handlers": [{"_type": "ExceptHandler", "type": {"_type": "Name", "id": "KeyError"},
                      "name": "e", "body": [{"_type": "Pass"}]}],
        "orelse": [], "finalbody": []}"#;
    let stmt: Stmt = serde_json::from_str(json).unwrap();
    let Stmt::Try(t) = stmt else {
        panic!("expected try");
    };
    assert_eq!(t.handlers[0].typ, Some(name("KeyError")));
    assert_eq!(t.handlers[0].name.as_deref(), Some("e"));
}

#[test]
fn dotted_callee_text() {
    assert_eq!(path("os.path.join").dotted().as_deref(), Some("os.path.join"));
    assert_eq!(method(list(vec![]), "append", vec![]).kind_name(), "Call");
    assert_eq!(attr(call(name("f"), vec![]), "x").dotted(), None);
}

#[test]
fn unparse_renders_python() {
    let e = cmp(
        call(name("len"), vec![name("xs")]),
        CmpOperator::GtE,
        int(2),
    );
    assert_eq!(e.to_string(), "len(xs) >= 2");
    let stmt = if_(e, vec![ret(boolean(true))], vec![pass()]);
    assert_eq!(
        unparse_stmt(&stmt, 0),
        "if len(xs) >= 2:\n    return True\nelse:\n    pass\n"
    );
}

#[test]
fn walker_rewrites_names() {
    let mut body = vec![ret(bin(name("a"), Operator::Add, name("b")))];
    visit::walk_stmts_mut(&mut body, &mut |e| {
        if e.as_name() == Some("a") {
            *e = int(1);
        }
    });
    assert_eq!(body, vec![ret(bin(int(1), Operator::Add, name("b")))]);
}

#[test]
fn yield_detection_ignores_nested_functions() {
    let nested = Stmt::FunctionDef(def("inner", &[], vec![expr(yield_(int(1)))]));
    assert!(!visit::body_yields(&[nested]));
    assert!(visit::body_yields(&[expr(yield_(int(1)))]));
    assert!(visit::mentions_name(&[expr(name("q"))], "q"));
}
