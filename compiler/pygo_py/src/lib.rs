//! Python syntax consumed by the pygo transpiler.
//!
//! The transpiler does not parse Python itself. A front-end (see
//! `pygoc::frontend`) asks CPython for `ast.parse` output as JSON, which
//! deserializes into [`Module`]. The [`dsl`] module builds the same trees
//! by hand for snippet templates and tests.

pub mod ast;
pub mod dsl;
mod unparse;
pub mod visit;

pub use ast::{
    Alias, Arg, Arguments, BoolOperator, Call, ClassDef, CmpOperator, Comprehension, Constant,
    ExceptHandler, Expr, For, FunctionDef, Keyword, MatchCase, Module, Operator, Pattern, Stmt, Try,
    UnaryOperator, WithItem,
};
pub use unparse::unparse_stmt;

#[cfg(test)]
mod tests;
