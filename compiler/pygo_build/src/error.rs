//! Build failures.

use thiserror::Error;

/// Why a module could not be converted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No rule accepted the node.
    #[error("unsupported {kind}: {excerpt}")]
    UnsupportedConstruct {
        /// Python class name of the node.
        kind: String,
        /// The node, unparsed.
        excerpt: String,
    },
    /// A built-in with templates was called with arguments none of them
    /// accept.
    #[error("no template for `{callee}` accepts this call (tried {})", .attempted.join(", "))]
    UnresolvedCallee {
        callee: String,
        attempted: Vec<String>,
    },
}

impl BuildError {
    pub(crate) fn unsupported(kind: &str, excerpt: impl Into<String>) -> Self {
        BuildError::UnsupportedConstruct {
            kind: kind.to_owned(),
            excerpt: excerpt.into(),
        }
    }
}
