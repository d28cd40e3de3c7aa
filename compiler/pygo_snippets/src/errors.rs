//! Binding failures.
//!
//! A failed bind is not fatal: the registry moves on to the next candidate.
//! Only the builder decides whether "no candidate bound" is an error.

use thiserror::Error;

/// Why a call's arguments do not fit a template signature.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("takes {max} positional arguments but {given} were given")]
    TooManyPositional { max: usize, given: usize },

    #[error("got an unexpected keyword argument '{0}'")]
    UnknownKeyword(String),

    #[error("got multiple values for argument '{0}'")]
    MultipleValues(String),

    #[error("missing required argument '{0}'")]
    Missing(String),

    #[error("`**` arguments cannot be bound to a template")]
    KeywordSplat,
}
