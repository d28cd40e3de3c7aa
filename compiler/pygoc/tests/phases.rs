// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests, organized by the stage of the pipeline they exercise.
//!
//! # Organization
//!
//! - `compile/` - Python AST in, converged Go tree out (`pygoc::compile`)
//! - `render/` - Handing the `go/ast` dump to a [`pygoc::Renderer`]
//! - `common/` - Shared fixtures and a renderer that needs no Go toolchain
//!
//! Nothing here starts `python3` or `go`: modules are built with
//! `pygo_py::dsl` or decoded from canned JSON.
//!
//! ```bash
//! cargo test -p pygoc --test phases
//! cargo test -p pygoc --test phases compile
//! ```

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/compile/mod.rs"]
mod compile;

#[path = "phases/render/mod.rs"]
mod render;
