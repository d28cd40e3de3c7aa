//! Rewrite pipeline for the pygo transpiler.
//!
//! The builder emits Go that is structurally right but loosely typed and
//! full of Python habits: `interface{}` wherever a type was not spelled
//! out, `len()` on everything, generators, `print`. The passes here
//! rewrite that tree in place, pass by pass, until it is idiomatic Go with
//! concrete types.
//!
//! # Pipeline Position
//!
//! ```text
//! pygo_build → GoArena → **pygo_passes** → bridge dump → Go printer
//! ```
//!
//! # Stages
//!
//! - **Stage 0** resolves template directives (unique initializers,
//!   inlined arguments) before anything looks at scopes.
//! - **Stage 1** is the bulk: idioms, loops, operators, generators, error
//!   plumbing, call typing and `interface{}` narrowing. Most passes here
//!   are scope-aware.
//! - **Stage 2** strips scaffolding once the rest has converged.
//!
//! Stages 0 and 1 repeat until the `interface{}` count stops dropping; see
//! [`run`].

mod driver;
mod passes;
mod scoping;
mod walk;

pub use driver::{run, PipelineError, PipelineOptions, PipelineReport};
