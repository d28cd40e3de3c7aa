//! The snippet registry and call resolution.

use pygo_py::Call;
use rustc_hash::FxHashMap;

use crate::pattern::callee_keys;
use crate::{callee_text, Binding, Instantiated};

/// Outcome of looking a call up in the registry.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No registered pattern covers the callee.
    NoMatch,
    /// The first candidate that bound, instantiated.
    Bound(Instantiated),
    /// Patterns matched but no candidate's signature accepted the call.
    Unbound {
        callee: String,
        attempted: Vec<String>,
    },
}

/// Template bindings for one compilation, in registration order.
#[derive(Clone, Debug, Default)]
pub struct SnippetRegistry {
    bindings: Vec<Binding>,
    by_key: FxHashMap<String, Vec<usize>>,
}

impl SnippetRegistry {
    /// A registry with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard template library.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        crate::library::register(&mut registry);
        tracing::debug!(templates = registry.len(), "snippet registry built");
        registry
    }

    pub fn register(&mut self, binding: Binding) {
        self.by_key
            .entry(binding.pattern.key())
            .or_default()
            .push(self.bindings.len());
        self.bindings.push(binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Bindings whose pattern covers the callee of `call`, in registration
    /// order.
    pub fn candidates<'r>(&'r self, call: &Call) -> Vec<&'r Binding> {
        let mut indices: Vec<usize> = callee_keys(&call.func)
            .iter()
            .filter_map(|key| self.by_key.get(key))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(|i| &self.bindings[i])
            .filter(|b| b.pattern.matches(&call.func))
            .collect()
    }

    /// Find and instantiate the first template that binds `call`.
    pub fn resolve(&self, call: &Call) -> Resolution {
        let candidates = self.candidates(call);
        if candidates.is_empty() {
            return Resolution::NoMatch;
        }
        for binding in &candidates {
            match binding.bind(call) {
                Ok(bound) => {
                    tracing::trace!(snippet = binding.name(), pattern = %binding.pattern, "bound");
                    return Resolution::Bound(binding.instantiate(bound));
                }
                Err(err) => {
                    tracing::trace!(snippet = binding.name(), %err, "candidate rejected");
                }
            }
        }
        Resolution::Unbound {
            callee: callee_text(&call.func),
            attempted: candidates
                .iter()
                .map(|b| format!("{} ({})", b.pattern, b.name()))
                .collect(),
        }
    }
}
