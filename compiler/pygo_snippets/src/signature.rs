//! Template parameter signatures and Python-style argument binding.

use pygo_py::{Arguments, Expr, Keyword};

use crate::BindError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Expr>,
}

/// Ordered parameters of a template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

/// One parameter's bound value.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundArg {
    pub name: String,
    pub value: Expr,
    /// Filled from the parameter default rather than the call.
    pub defaulted: bool,
}

/// Every parameter of a signature bound to a value, in parameter order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundArgs {
    args: Vec<BoundArg>,
}

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundArg> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl IntoIterator for BoundArgs {
    type Item = BoundArg;
    type IntoIter = std::vec::IntoIter<BoundArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.into_iter()
    }
}

impl Signature {
    /// Signature of a `def`. Defaults attach to the trailing positional
    /// parameters; `*args` and `**kwargs` are not bindable and are dropped.
    pub fn from_arguments(arguments: &Arguments) -> Self {
        let positional: Vec<_> = arguments.positional().collect();
        let first_default = positional.len().saturating_sub(arguments.defaults.len());
        let mut params = Vec::with_capacity(positional.len() + arguments.kwonlyargs.len());
        for (i, arg) in positional.into_iter().enumerate() {
            let kind = if i < arguments.posonlyargs.len() {
                ParamKind::PositionalOnly
            } else {
                ParamKind::PositionalOrKeyword
            };
            let default = i
                .checked_sub(first_default)
                .and_then(|d| arguments.defaults.get(d))
                .cloned();
            params.push(Param {
                name: arg.arg.clone(),
                kind,
                default,
            });
        }
        for (i, arg) in arguments.kwonlyargs.iter().enumerate() {
            params.push(Param {
                name: arg.arg.clone(),
                kind: ParamKind::KeywordOnly,
                default: arguments.kw_defaults.get(i).cloned().flatten(),
            });
        }
        Signature { params }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Bind call arguments the way Python's `inspect.Signature.bind` does,
    /// then fill unbound parameters from their defaults.
    pub fn bind(&self, positional: &[Expr], keywords: &[Keyword]) -> Result<BoundArgs, BindError> {
        let mut slots: Vec<Option<Expr>> = vec![None; self.params.len()];

        let positional_params: Vec<usize> = self
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind != ParamKind::KeywordOnly)
            .map(|(i, _)| i)
            .collect();
        if positional.len() > positional_params.len() {
            return Err(BindError::TooManyPositional {
                max: positional_params.len(),
                given: positional.len(),
            });
        }
        for (value, &i) in positional.iter().zip(&positional_params) {
            slots[i] = Some(value.clone());
        }

        for keyword in keywords {
            let Some(name) = &keyword.arg else {
                return Err(BindError::KeywordSplat);
            };
            let Some(i) = self
                .params
                .iter()
                .position(|p| &p.name == name && p.kind != ParamKind::PositionalOnly)
            else {
                return Err(BindError::UnknownKeyword(name.clone()));
            };
            if slots[i].is_some() {
                return Err(BindError::MultipleValues(name.clone()));
            }
            slots[i] = Some(keyword.value.clone());
        }

        let mut args = Vec::with_capacity(self.params.len());
        for (param, slot) in self.params.iter().zip(slots) {
            let (value, defaulted) = match (slot, &param.default) {
                (Some(value), _) => (value, false),
                (None, Some(default)) => (default.clone(), true),
                (None, None) => return Err(BindError::Missing(param.name.clone())),
            };
            args.push(BoundArg {
                name: param.name.clone(),
                value,
                defaulted,
            });
        }
        Ok(BoundArgs { args })
    }
}
