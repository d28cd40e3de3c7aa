//! Templates that emulate Python built-ins in Go.
//!
//! Many Python operations have no structural Go counterpart: `s.split()`,
//! `xs.pop()`, `random.choice(xs)`. Each is covered by a *template*, a
//! small Python function written against Go names, registered under a
//! [`CalleePattern`]. For a call, the registry collects the candidates the
//! callee matches, binds the call's arguments against each template's
//! [`Signature`] in registration order, and instantiates the first that
//! binds. The builder then converts the instantiated Python back into Go
//! and splices it according to the template's [`BindStyle`].
//!
//! # Pipeline Position
//!
//! ```text
//! pygo_build ──call──▶ **SnippetRegistry::resolve** ──Python──▶ pygo_build
//! ```

mod binding;
mod errors;
mod library;
mod pattern;
mod registry;
mod signature;

pub use binding::{BindStyle, Binding, CallArg, Form, Instantiated};
pub use errors::BindError;
pub use pattern::{callee_text, CalleePattern};
pub use registry::{Resolution, SnippetRegistry};
pub use signature::{BoundArg, BoundArgs, ParamKind, Param, Signature};
