//! Shared fixtures for phase tests.

use std::cell::RefCell;

use pygo_ir::{NodeId, NodeKind};
use pygo_py::{FunctionDef, Module, Stmt};
use pygoc::render::{RenderError, Renderer};
use pygoc::{compile, BuildError, CompileOptions, Compiled};

/// `def main(): <body>`
pub fn main_module(body: Vec<Stmt>) -> Module {
    defs_module(vec![pygo_py::dsl::def("main", &[], body)])
}

/// A module of top-level function definitions.
pub fn defs_module(defs: Vec<FunctionDef>) -> Module {
    Module {
        body: defs.into_iter().map(Stmt::FunctionDef).collect(),
    }
}

/// Compile with default options, panicking on failure.
pub fn compiled(module: &Module) -> Compiled {
    compile(module, &CompileOptions::default())
        .unwrap_or_else(|err| panic!("compile failed: {err}"))
}

pub fn compile_with(module: &Module, options: CompileOptions) -> Result<Compiled, BuildError> {
    compile(module, &options)
}

/// Sketch of the function declared as `name`.
pub fn sketch_func(compiled: &Compiled, name: &str) -> String {
    let NodeKind::File { decls, .. } = compiled.arena.kind(compiled.file) else {
        panic!("expected a file node");
    };
    let decl: NodeId = decls
        .iter()
        .copied()
        .find(|&d| {
            matches!(compiled.arena.kind(d), NodeKind::FuncDecl { name: n, .. } if n == name)
        })
        .unwrap_or_else(|| panic!("no func {name} in {}", compiled.sketch()));
    compiled.arena.sketch(decl)
}

/// Renders by echoing a fixed header plus the dump, and remembers every
/// dump it was handed.
#[derive(Default)]
pub struct RecordingRenderer {
    pub seen: RefCell<Vec<String>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, dump: &str) -> Result<String, RenderError> {
        self.seen.borrow_mut().push(dump.to_owned());
        Ok(format!("// rendered\n{dump}"))
    }
}

/// Fails the way `go run` does when the printer program does not compile.
pub struct BrokenRenderer;

impl Renderer for BrokenRenderer {
    fn render(&self, _dump: &str) -> Result<String, RenderError> {
        Err(RenderError::Failed {
            program: "go".to_owned(),
            status: "exit status: 1".to_owned(),
            stderr: "printer.go:3:1: syntax error".to_owned(),
        })
    }
}
