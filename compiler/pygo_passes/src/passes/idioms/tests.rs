#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{NodeId, NodeKind, Token};

use super::{
    title, AddTextTemplateImportForFStrings, CapitalizeMathModuleCalls, PrintToFmtPrintln,
    PythonToGoTypes, ReplacePythonStyleAppends, RequestsToHttp, UseConstructorIfAvailable,
};
use crate::passes::tests::Fixture;

/// `func main() { expr }`
fn main_with_expr(fx: &mut Fixture, expr: NodeId) {
    let stmt = fx.arena.expr_stmt(expr);
    fx.func("main", vec![stmt]);
}

fn import(fx: &mut Fixture, path: &str) -> NodeId {
    let spec = fx.arena.alloc(NodeKind::ImportSpec {
        name: None,
        path: path.to_owned(),
    });
    let decl = fx.arena.alloc(NodeKind::GenDecl {
        tok: Token::Import,
        specs: vec![spec],
    });
    fx.push_decl(decl);
    decl
}

#[test]
fn title_case() {
    assert_eq!(title("floor"), "Floor");
    assert_eq!(title("get"), "Get");
    assert_eq!(title(""), "");
}

#[test]
fn constructor_used_when_declared() {
    let mut fx = Fixture::new();
    fx.func("NewPoint", Vec::new());
    let one = fx.arena.int_lit(1);
    let call = fx.arena.call_path("Point", vec![one]);
    let other = fx.arena.call_path("Line", Vec::new());
    let first = fx.arena.expr_stmt(call);
    let second = fx.arena.expr_stmt(other);
    fx.func("main", vec![first, second]);

    fx.run(&mut UseConstructorIfAvailable::default());
    assert_eq!(fx.sketch_func("main"), "func main() { NewPoint(1); Line() }");
}

#[test]
fn print_becomes_println() {
    let mut fx = Fixture::new();
    let a = fx.arena.ident("a");
    let b = fx.arena.string_lit("b");
    let call = fx.arena.call_path("print", vec![a, b]);
    main_with_expr(&mut fx, call);

    fx.run(&mut PrintToFmtPrintln);
    assert_eq!(fx.sketch_func("main"), "func main() { fmt.Println(a, \"b\") }");
}

#[test]
fn print_with_keywords_is_left() {
    let mut fx = Fixture::new();
    let a = fx.arena.ident("a");
    let end = fx.arena.string_lit("");
    fx.arena.meta_mut(end).keyword = Some("end".to_owned());
    let call = fx.arena.call_path("print", vec![a, end]);
    main_with_expr(&mut fx, call);

    fx.run(&mut PrintToFmtPrintln);
    assert_eq!(fx.sketch_func("main"), "func main() { print(a, \"\") }");
}

#[test]
fn math_functions_capitalized() {
    let mut fx = Fixture::new();
    let x = fx.arena.ident("x");
    let floor = fx.arena.call_path("math.floor", vec![x]);
    let pi = fx.arena.path("math.Pi");
    let sum = fx.arena.binary(floor, Token::Add, pi);
    main_with_expr(&mut fx, sum);

    fx.run(&mut CapitalizeMathModuleCalls);
    assert_eq!(fx.sketch_func("main"), "func main() { math.Floor(x) + math.Pi }");
}

#[test]
fn append_statement_reassigns() {
    let mut fx = Fixture::new();
    let xs = fx.arena.ident("xs");
    let fun = fx.arena.sel(xs, "append");
    let one = fx.arena.int_lit(1);
    let call = fx.arena.call(fun, vec![one]);
    main_with_expr(&mut fx, call);

    fx.run(&mut ReplacePythonStyleAppends);
    assert_eq!(fx.sketch_func("main"), "func main() { xs = append(xs, 1) }");
}

#[test]
fn python_type_names_in_signatures() {
    let mut fx = Fixture::new();
    let str_ty = fx.arena.ident("str");
    let s = fx.arena.field(&["s"], str_ty);
    let float_ty = fx.arena.ident("float");
    let result = fx.arena.field(&[], float_ty);
    let results = fx.arena.field_list(vec![result]);
    fx.func_with("f", vec![s], results, Vec::new());

    fx.run(&mut PythonToGoTypes);
    assert_eq!(fx.sketch_func("f"), "func f(s string) float64 {}");
}

#[test]
fn requests_become_net_http() {
    let mut fx = Fixture::new();
    import(&mut fx, "requests");
    let url = fx.arena.ident("url");
    let call = fx.arena.call_path("requests.get", vec![url]);
    main_with_expr(&mut fx, call);

    fx.run(&mut RequestsToHttp);
    assert_eq!(
        fx.sketch(),
        "package main\nimport \"net/http\"\nfunc main() { http.Get(url) }"
    );
}

#[test]
fn fstrings_import_text_template() {
    let mut fx = Fixture::new();
    import(&mut fx, "fmt");
    let name = fx.arena.string_lit("f");
    let call = fx.arena.call_path("template.New", vec![name]);
    main_with_expr(&mut fx, call);

    fx.run(&mut AddTextTemplateImportForFStrings::default());
    assert_eq!(
        fx.sketch(),
        "package main\nimport (\"fmt\"; \"text/template\")\nfunc main() { template.New(\"f\") }"
    );

    // Already present: nothing to add.
    fx.run(&mut AddTextTemplateImportForFStrings::default());
    assert_eq!(fx.decls().len(), 2);
}

#[test]
fn fstrings_without_imports_get_a_declaration() {
    let mut fx = Fixture::new();
    let name = fx.arena.string_lit("f");
    let call = fx.arena.call_path("template.New", vec![name]);
    main_with_expr(&mut fx, call);

    fx.run(&mut AddTextTemplateImportForFStrings::default());
    let first = fx.decls()[0];
    assert_eq!(fx.arena.sketch(first), "import \"text/template\"");
}
