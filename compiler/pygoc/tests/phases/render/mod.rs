//! Render-phase tests: the dump handed to a [`pygoc::Renderer`].

use pretty_assertions::assert_eq;
use pygo_py::dsl::{call, expr, name, string};
use pygoc::BuildError;

use crate::common::{compiled, main_module, BrokenRenderer, RecordingRenderer};

#[test]
fn renderer_receives_the_file_dump() {
    let out = compiled(&main_module(vec![expr(call(
        name("print"),
        vec![string("hi")],
    ))]));
    let renderer = RecordingRenderer::default();
    let text = out.render(&renderer).unwrap();

    let seen = renderer.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(
        seen[0].starts_with("&ast.File { Name: &ast.Ident { Name: \"main\" }"),
        "{}",
        seen[0]
    );
    assert_eq!(seen[0], out.dump());
    assert_eq!(text, format!("// rendered\n{}", out.dump()));
}

#[test]
fn renderer_failures_are_render_errors() {
    let out = compiled(&main_module(vec![pygo_py::dsl::pass()]));
    let err = out.render(&BrokenRenderer).unwrap_err();
    assert!(matches!(err, BuildError::Render(_)), "{err}");
    assert!(err.is_environment(), "{err}");
    assert!(err.to_string().starts_with("render failed: "), "{err}");
}
