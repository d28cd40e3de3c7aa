//! pygo - Python to Go transpiler.
//!
//! Ties the pipeline crates together and talks to the outside world: the
//! CPython process that parses source text, and the Go toolchain that turns
//! the finished tree into formatted source.
//!
//! # Architecture
//!
//! ```text
//! source.py
//!     │
//!     ▼
//! frontend::parse() ──► pygo_py::Module      (python3 + ast.parse)
//!     │
//!     ▼
//! compile() ──► Compiled                      (pygo_build + pygo_passes)
//!     │
//!     ▼
//! bridge::dump() ──► go/ast literal
//!     │
//!     ▼
//! Renderer::render() ──► main.go              (go run, goimports, gofumpt)
//! ```
//!
//! Everything up to [`bridge::dump`] is pure and needs neither Python nor
//! Go on the machine.

pub mod bridge;
pub mod cli;
mod error;
pub mod frontend;
pub mod render;
pub mod tracing_setup;

pub use error::BuildError;
pub use frontend::FrontendOptions;
pub use render::{GoToolchain, RenderOptions, Renderer};

use pygo_build::Built;
use pygo_ir::{GoArena, NodeId, NodeKind};
use pygo_passes::{PipelineOptions, PipelineReport};
use pygo_py::Module;
use pygo_snippets::SnippetRegistry;
use tracing::debug;

/// Knobs for [`compile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Rewrite iterations allowed before giving up.
    pub max_iterations: usize,
    /// Fail on names whose type never became known.
    pub strict_types: bool,
    /// Keep iterating while the tree still changes shape.
    pub hash_convergence: bool,
    /// Go package clause of the output file.
    pub package: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            max_iterations: 32,
            strict_types: false,
            hash_convergence: false,
            package: "main".to_owned(),
        }
    }
}

impl CompileOptions {
    fn pipeline(&self) -> PipelineOptions {
        PipelineOptions {
            max_iterations: self.max_iterations,
            strict_types: self.strict_types,
            hash_convergence: self.hash_convergence,
        }
    }
}

/// A converged Go file.
#[derive(Debug)]
pub struct Compiled {
    pub arena: GoArena,
    /// The `File` node.
    pub file: NodeId,
    pub report: PipelineReport,
}

impl Compiled {
    /// The file as a `go/ast` composite literal.
    pub fn dump(&self) -> String {
        bridge::dump(&self.arena, self.file)
    }

    /// Compact one-line rendering, for logs and tests.
    pub fn sketch(&self) -> String {
        self.arena.sketch(self.file)
    }

    /// Hand the dump to `renderer`.
    pub fn render(&self, renderer: &dyn Renderer) -> Result<String, BuildError> {
        Ok(renderer.render(&self.dump())?)
    }
}

/// Translate one Python module into a converged Go file.
///
/// # Errors
///
/// Any [`BuildError`] other than the frontend and render kinds: a construct
/// or call the builder cannot express, a rewrite pipeline that does not
/// settle within `max_iterations`, or, under `strict_types`, names whose
/// type was never inferred.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile(module: &Module, options: &CompileOptions) -> Result<Compiled, BuildError> {
    let registry = SnippetRegistry::standard();
    let Built { mut arena, file } = pygo_build::build(module, &registry)?;
    if let NodeKind::File { package, .. } = arena.kind_mut(file) {
        package.clone_from(&options.package);
    }
    let report = pygo_passes::run(&mut arena, file, &options.pipeline())?;
    debug!(
        iterations = report.iterations,
        nodes = arena.len(),
        "module compiled"
    );
    Ok(Compiled {
        arena,
        file,
        report,
    })
}

/// Parse, compile and render `source` in one go.
///
/// # Errors
///
/// Every [`BuildError`] kind.
pub fn transpile(
    source: &str,
    frontend: &FrontendOptions,
    options: &CompileOptions,
    renderer: &dyn Renderer,
) -> Result<String, BuildError> {
    let module = frontend::parse(source, frontend)?;
    compile(&module, options)?.render(renderer)
}
