//! Callee patterns.

use std::fmt;

use pygo_py::Expr;

/// What a template's callee looks like.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CalleePattern {
    /// A bare name: `int(x)`.
    Exact(&'static str),
    /// A module-qualified name: `json.dumps(x)`.
    Qualified(&'static str, &'static str),
    /// A method on any receiver: `<recv>.split(sep)`. The receiver is bound
    /// as the template's first argument.
    Method(&'static str),
}

impl CalleePattern {
    pub fn matches(self, func: &Expr) -> bool {
        match (self, func) {
            (CalleePattern::Exact(name), Expr::Name { id }) => id == name,
            (CalleePattern::Qualified(module, name), Expr::Attribute { value, attr }) => {
                attr == name && value.as_name() == Some(module)
            }
            (CalleePattern::Method(name), Expr::Attribute { attr, .. }) => attr == name,
            _ => false,
        }
    }

    /// Receiver captured by a method pattern.
    pub fn receiver(self, func: &Expr) -> Option<&Expr> {
        match (self, func) {
            (CalleePattern::Method(_), Expr::Attribute { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Lookup key. Every pattern a callee can match has one of the keys
    /// returned by [`callee_keys`].
    pub(crate) fn key(self) -> String {
        match self {
            CalleePattern::Exact(name) => name.to_owned(),
            CalleePattern::Qualified(module, name) => format!("{module}.{name}"),
            CalleePattern::Method(name) => format!(".{name}"),
        }
    }
}

impl fmt::Display for CalleePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalleePattern::Exact(name) => f.write_str(name),
            CalleePattern::Qualified(module, name) => write!(f, "{module}.{name}"),
            CalleePattern::Method(name) => write!(f, "<recv>.{name}"),
        }
    }
}

/// Pattern keys a callee may match, most specific first.
pub(crate) fn callee_keys(func: &Expr) -> Vec<String> {
    match func {
        Expr::Name { id } => vec![id.clone()],
        Expr::Attribute { value, attr } => {
            let mut keys = Vec::with_capacity(2);
            if let Some(module) = value.as_name() {
                keys.push(format!("{module}.{attr}"));
            }
            keys.push(format!(".{attr}"));
            keys
        }
        _ => Vec::new(),
    }
}

/// Canonical dotted text of a callee. Receivers that are not plain name
/// chains appear as `<Kind>` placeholders: `"a b".split` is
/// `<Constant>.split`.
pub fn callee_text(func: &Expr) -> String {
    match func {
        Expr::Name { id } => id.clone(),
        Expr::Attribute { value, attr } => format!("{}.{attr}", callee_text(value)),
        other => format!("<{}>", other.kind_name()),
    }
}
