#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_ir::{directive, GoType, NodeId, Token};

use super::{FileWritesAndErrors, HandleUnhandledErrorsAndDefers, HttpErrors};
use crate::passes::tests::Fixture;

fn response() -> GoType {
    GoType::pointer(GoType::qualified("http", "Response"))
}

fn file() -> GoType {
    GoType::pointer(GoType::qualified("os", "File"))
}

/// `func name(param ty) { body }`
fn with_param(fx: &mut Fixture, name: &str, param: &str, ty: &GoType, body: Vec<NodeId>) {
    let ty = fx.arena.type_expr(ty);
    let field = fx.arena.field(&[param], ty);
    fx.func_with(name, vec![field], NodeId::INVALID, body);
}

#[test]
fn placeholder_becomes_a_checked_err() {
    let mut fx = Fixture::new();
    let x = fx.arena.ident("x");
    let placeholder = fx.arena.ident(directive::UNHANDLED_ERROR);
    let call = fx.arena.call_path("strconv.Atoi", Vec::new());
    let assign = fx.arena.assign(vec![x, placeholder], Token::Define, vec![call]);
    let rest = fx.arena.call_path("use", Vec::new());
    let rest = fx.arena.expr_stmt(rest);
    fx.func("main", vec![assign, rest]);

    fx.run(&mut HandleUnhandledErrorsAndDefers);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { x, err := strconv.Atoi(); if err != nil { panic(err) }; use() }"
    );
}

#[test]
fn http_placeholder_also_closes_the_body() {
    let mut fx = Fixture::new();
    let resp = fx.arena.ident("resp");
    let placeholder = fx.arena.ident(directive::UNHANDLED_HTTP_ERROR);
    let url = fx.arena.ident("url");
    let call = fx.arena.call_path("http.Get", vec![url]);
    let assign = fx.arena.assign(vec![resp, placeholder], Token::Define, vec![call]);
    fx.func("main", vec![assign]);

    fx.run(&mut HandleUnhandledErrorsAndDefers);
    assert_eq!(
        fx.sketch_func("main"),
        "func main() { resp, err := http.Get(url); \
         if err != nil { panic(err) }; defer resp.Body.Close() }"
    );
}

#[test]
fn statements_without_placeholders_are_left() {
    let mut fx = Fixture::new();
    let x = fx.arena.ident("x");
    let one = fx.arena.int_lit(1);
    let define = fx.arena.define(x, one);
    fx.func("main", vec![define]);
    let before = fx.sketch();
    fx.run(&mut HandleUnhandledErrorsAndDefers);
    assert_eq!(fx.sketch(), before);
}

#[test]
fn http_calls_gain_an_error_result() {
    let mut fx = Fixture::new();
    let resp = fx.arena.ident("resp");
    let url = fx.arena.ident("url");
    let call = fx.arena.call_path("http.Get", vec![url]);
    let define = fx.arena.define(resp, call);
    fx.func("main", vec![define]);

    fx.run(&mut HttpErrors);
    fx.run(&mut HttpErrors);
    assert_eq!(
        fx.sketch_func("main"),
        format!(
            "func main() {{ resp, {} := http.Get(url) }}",
            directive::UNHANDLED_HTTP_ERROR
        )
    );
}

#[test]
fn response_fields() {
    let mut fx = Fixture::new();
    let code = {
        let resp = fx.arena.ident("resp");
        let sel = fx.arena.sel(resp, "status_code");
        fx.arena.expr_stmt(sel)
    };
    let text = {
        let resp = fx.arena.ident("resp");
        let sel = fx.arena.sel(resp, "text");
        fx.arena.expr_stmt(sel)
    };
    let content = {
        let resp = fx.arena.ident("resp");
        let sel = fx.arena.sel(resp, "content");
        fx.arena.expr_stmt(sel)
    };
    with_param(&mut fx, "show", "resp", &response(), vec![code, text, content]);

    fx.run(&mut HttpErrors);
    let e = directive::UNHANDLED_ERROR;
    assert_eq!(
        fx.sketch_func("show"),
        format!(
            "func show(resp *http.Response) {{ resp.StatusCode; \
             func() string {{ body, {e} := ioutil.ReadAll(resp.Body); return string(body) }}(); \
             func() []byte {{ body, {e} := ioutil.ReadAll(resp.Body); return body }}() }}"
        )
    );
}

#[test]
fn opened_files_remember_their_mode() {
    let mut fx = Fixture::new();
    let name = fx.arena.ident("name");
    let open = fx.arena.call_path("os.OpenFile", vec![name]);
    fx.arena.meta_mut(open).text_mode = Some(false);
    let f = fx.arena.ident("f");
    let define = fx.arena.define(f, open);
    let write = {
        let f = fx.arena.ident("f");
        let write = fx.arena.sel(f, "write");
        let data = fx.arena.ident("data");
        let call = fx.arena.call(write, vec![data]);
        fx.arena.expr_stmt(call)
    };
    fx.func("main", vec![define, write]);

    fx.run(&mut FileWritesAndErrors::default());
    let e = directive::UNHANDLED_ERROR;
    assert_eq!(
        fx.sketch_func("main"),
        format!(
            "func main() {{ f := func() *os.File {{ f, {e} := os.OpenFile(name); return f }}(); \
             func() int {{ n, {e} := f.Write(data); return n }}() }}"
        )
    );
}

#[test]
fn text_writes_and_reads() {
    let mut fx = Fixture::new();
    let s = fx.arena.lit(Token::String, "\"hi\"");
    let write = {
        let f = fx.arena.ident("f");
        let write = fx.arena.sel(f, "write");
        let call = fx.arena.call(write, vec![s]);
        fx.arena.expr_stmt(call)
    };
    let read = {
        let f = fx.arena.ident("f");
        let read = fx.arena.sel(f, "read");
        let call = fx.arena.call(read, Vec::new());
        fx.arena.expr_stmt(call)
    };
    let close = {
        let f = fx.arena.ident("f");
        let close = fx.arena.sel(f, "close");
        let call = fx.arena.call(close, Vec::new());
        fx.arena.expr_stmt(call)
    };
    with_param(&mut fx, "use", "f", &file(), vec![write, read, close]);

    fx.run(&mut FileWritesAndErrors::default());
    let e = directive::UNHANDLED_ERROR;
    assert_eq!(
        fx.sketch_func("use"),
        format!(
            "func use(f *os.File) {{ \
             func() int {{ n, {e} := f.WriteString(\"hi\"); return n }}(); \
             func() string {{ content, {e} := ioutil.ReadAll(f); return string(content) }}(); \
             f.Close() }}"
        )
    );
}

#[test]
fn encode_and_decode_convert() {
    let mut fx = Fixture::new();
    let decode = {
        let b = fx.arena.ident("b");
        let decode = fx.arena.sel(b, "decode");
        let call = fx.arena.call(decode, Vec::new());
        fx.arena.expr_stmt(call)
    };
    let encode = {
        let s = fx.arena.ident("s");
        let encode = fx.arena.sel(s, "encode");
        let utf8 = fx.arena.lit(Token::String, "\"utf-8\"");
        let call = fx.arena.call(encode, vec![utf8]);
        fx.arena.expr_stmt(call)
    };
    fx.func("main", vec![decode, encode]);

    fx.run(&mut FileWritesAndErrors::default());
    assert_eq!(fx.sketch_func("main"), "func main() { string(b); []byte(s) }");
}
