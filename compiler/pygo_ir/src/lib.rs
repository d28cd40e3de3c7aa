//! Go syntax tree for the pygo transpiler.
//!
//! Every construct the transpiler emits is a [`NodeKind`] stored in a
//! [`GoArena`] and addressed by [`NodeId`]. Each node carries an optional
//! inferred [`GoType`] and a sparse [`Meta`] side-channel.
//!
//! # Pipeline Position
//!
//! ```text
//! Python AST → pygo_build → **GoArena** → pygo_passes → bridge dump
//! ```
//!
//! Children are plain handles, and there are no owning parent links.
//! Parent lookups go through a [`ParentMap`] computed on demand, and
//! generic traversal goes through [`NodeKind::slots`] /
//! [`NodeKind::slots_mut`].

mod arena;
pub mod directive;
mod ids;
mod make;
mod meta;
mod node;
mod sketch;
mod token;
mod ty;

pub use arena::{GoArena, ParentMap};
pub use ids::NodeId;
pub use make::{quote, unquote};
pub use meta::{Meta, MetaFlags};
pub use node::{ChanDir, NodeKind, Slot, SlotRef, SlotValue};
pub use token::Token;
pub use ty::{BasicKind, FuncSig, GoType};
