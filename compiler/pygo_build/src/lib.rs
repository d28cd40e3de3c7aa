//! Python AST to Go syntax conversion for the pygo transpiler.
//!
//! This crate turns a parsed Python [`Module`](pygo_py::Module) into a Go
//! `File` node in a fresh [`GoArena`](pygo_ir::GoArena). It is a single
//! pass: every Python node is converted once, types that cannot be read
//! off the source become `interface{}` placeholders, and everything else
//! (narrowing, idiom rewrites, generator plumbing) is left to the rewrite
//! passes.
//!
//! # Pipeline Position
//!
//! ```text
//! Python AST → **pygo_build** → GoArena → pygo_passes → bridge dump
//! ```
//!
//! # Dispatch
//!
//! Each Python node kind maps to a ranked list of rules for its target
//! family (expression, statement, declaration). Rules are tried in order;
//! a rule that does not recognize the node's shape declines and the next
//! one runs. When every rule declines the build fails with
//! [`BuildError::UnsupportedConstruct`].
//!
//! Calls consult the [`SnippetRegistry`](pygo_snippets::SnippetRegistry)
//! before the generic call rule, so `s.split()` or `random.choice(xs)`
//! become the Go that emulates them.

mod builder;
mod error;

pub use builder::{build, Built};
pub use error::BuildError;
