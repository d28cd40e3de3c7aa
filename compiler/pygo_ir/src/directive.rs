//! Reserved identifiers that carry instructions between stages.
//!
//! Templates and lowering rules spell these as ordinary Python or Go names;
//! the builder and the rewrite passes recognize and consume them.

/// `PYGO_INIT := func() { ... }` marks a one-time initializer to hoist
/// into `func init()`.
pub const INIT: &str = "PYGO_INIT";
/// `PYGO_INLINE = x` queues `x` to replace the next `PYGO_INLINE`
/// identifier.
pub const INLINE: &str = "PYGO_INLINE";
/// `PYGO_NOSNIPPET(f)(args)` calls `f` without snippet lookup.
pub const NO_SNIPPET: &str = "PYGO_NOSNIPPET";
/// `PYGO_RUNE("c")` is a character literal.
pub const RUNE: &str = "PYGO_RUNE";
/// `PYGO_EMPTY_STRUCT` is `struct{}{}`.
pub const EMPTY_STRUCT: &str = "PYGO_EMPTY_STRUCT";
/// `PYGO_ANY[x]` in an annotation: `interface{}`, narrowed later toward
/// the type of `x`.
pub const ANY: &str = "PYGO_ANY";
/// `PYGO_PTR[T]` in an annotation: `*T`.
pub const PTR: &str = "PYGO_PTR";
/// Placeholder left by the file-open wrapper for the error result.
pub const UNHANDLED_ERROR: &str = "UNHANDLED_ERROR";
/// Placeholder for the error result of an `net/http` request; handled
/// like [`UNHANDLED_ERROR`] plus a deferred `Body.Close()`.
pub const UNHANDLED_HTTP_ERROR: &str = "UNHANDLED_HTTP_ERROR";
