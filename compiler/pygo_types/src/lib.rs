//! Scopes and type inference for the pygo transpiler.
//!
//! Python has no static types, so every Go type in the output is either
//! spelled by an annotation or inferred here. Inference is scope-aware
//! ([`ScopeTree`]) and partly deferred ([`MissingTypes`]): a walk derives
//! what it can bottom-up ([`TypeCx::type_of`]), records what it cannot, and
//! retries the records once the walk has seen the whole file.
//!
//! Numeric mismatches are settled by [`dominant`] and bridged with
//! [`cast`].

mod derive;
mod missing;
mod promote;
mod scope;

pub use derive::{literal_type, method_key, TypeCx};
pub use missing::{MissingType, MissingTypes};
pub use promote::{both_integer, cast, dominant, type_score};
pub use scope::{ObjKind, Object, ScopeId, ScopeTree};
