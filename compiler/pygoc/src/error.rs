//! Everything that can stop a compilation.
//!
//! Builder and pipeline failures are flattened into one enum so callers
//! match on what went wrong, not on which crate noticed.

use pygo_passes::PipelineError;
use thiserror::Error;

use crate::frontend::FrontendError;
use crate::render::RenderError;

/// Why a module did not make it to Go source.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No conversion rule accepts this Python construct.
    #[error("unsupported {kind}: {excerpt}")]
    UnsupportedConstruct { kind: String, excerpt: String },

    /// An emulated built-in was called with arguments no template binds.
    #[error("no template for `{callee}` accepts this call (tried {})", .attempted.join(", "))]
    UnresolvedCallee {
        callee: String,
        attempted: Vec<String>,
    },

    /// Types still unknown at the end, with `strict_types` on.
    #[error("could not infer a type for {}", .names.join(", "))]
    TypeResolutionDeadlock { names: Vec<String> },

    /// The rewrite passes were still making progress when the iteration
    /// budget ran out.
    #[error("types still changing after {iterations} iterations ({remaining} interface{{}} left)")]
    ConvergenceFailure { iterations: usize, remaining: usize },

    #[error("parse failed: {0}")]
    Parse(#[from] FrontendError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// The input uses something the transpiler cannot express.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            BuildError::UnsupportedConstruct { .. } | BuildError::UnresolvedCallee { .. }
        )
    }

    /// The rewrite passes failed to settle on types.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            BuildError::TypeResolutionDeadlock { .. } | BuildError::ConvergenceFailure { .. }
        )
    }

    /// An external tool (python3, go) or the file system failed.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            BuildError::Parse(_) | BuildError::Render(_) | BuildError::Io(_)
        )
    }
}

impl From<pygo_build::BuildError> for BuildError {
    fn from(err: pygo_build::BuildError) -> Self {
        match err {
            pygo_build::BuildError::UnsupportedConstruct { kind, excerpt } => {
                BuildError::UnsupportedConstruct { kind, excerpt }
            }
            pygo_build::BuildError::UnresolvedCallee { callee, attempted } => {
                BuildError::UnresolvedCallee { callee, attempted }
            }
        }
    }
}

impl From<PipelineError> for BuildError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::ConvergenceFailure {
                iterations,
                remaining,
            } => BuildError::ConvergenceFailure {
                iterations,
                remaining,
            },
            PipelineError::TypeResolutionDeadlock { names } => {
                BuildError::TypeResolutionDeadlock { names }
            }
            PipelineError::UnloweredOperator { op, excerpt } => BuildError::UnsupportedConstruct {
                kind: format!("`{op}` operator"),
                excerpt,
            },
        }
    }
}
