//! Per-node metadata side-channel.
//!
//! Metadata records provenance that has no place in Go syntax: where an
//! `interface{}` came from, keyword names on call arguments, default
//! argument values, the walrus assignment behind a placeholder expression.
//! It is sparse; most nodes never get any.

use bitflags::bitflags;

use crate::NodeId;

bitflags! {
    /// Boolean markers attached to a node.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MetaFlags: u16 {
        /// Call built from `PYGO_NOSNIPPET(f)(...)`; never snippet-bound.
        const NO_SNIPPET = 1 << 0;
        /// An `interface{}` that must not be narrowed: the name was
        /// assigned values of more than one concrete type.
        const PERMANENT_INTERFACE = 1 << 1;
        /// A function literal that implements a generator.
        const GENERATOR = 1 << 2;
        /// Synthesized from module-level statements.
        const GLOBAL_CODE = 1 << 3;
        /// Instantiated from a snippet template.
        const FROM_SNIPPET = 1 << 4;
    }
}

/// Metadata for one node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    pub flags: MetaFlags,
    /// Expressions whose (eventual) type should replace this
    /// `interface{}`.
    pub elts: Vec<NodeId>,
    /// Keyword name of a call argument built from `name=value`.
    pub keyword: Option<String>,
    /// Default values of a function's parameters, by parameter name.
    pub defaults: Vec<(String, NodeId)>,
    /// Walrus assignment carried by a `BadExpr`.
    pub named: Option<NodeId>,
    /// Names declared `global` or `nonlocal` by a `BadStmt`.
    pub globals: Vec<String>,
    /// File opened in text mode (`Some(true)`) or binary mode.
    pub text_mode: Option<bool>,
    /// Name of the snippet template that produced this node.
    pub snippet: Option<String>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        *self == Meta::default()
    }
}
