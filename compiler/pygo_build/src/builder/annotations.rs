//! Type annotations → Go type expressions.

use pygo_ir::{directive, BasicKind, GoType, NodeId, NodeKind};
use pygo_py::{Constant, Expr};

use super::{literals, unsupported_expr, Builder};
use crate::BuildError;

/// Go spelling of a builtin Python type name used bare.
fn builtin_type(name: &str) -> Option<GoType> {
    Some(match name {
        "str" => GoType::STRING,
        "int" => GoType::INT,
        "float" => GoType::FLOAT64,
        "complex" => GoType::Basic(BasicKind::Complex128),
        "bool" => GoType::BOOL,
        "bytes" | "bytearray" => GoType::slice(GoType::BYTE),
        "object" | "Any" => GoType::Any,
        _ => return None,
    })
}

fn is_sequence(name: &str) -> bool {
    matches!(
        name,
        "list" | "List" | "tuple" | "Tuple" | "Sequence" | "Iterable" | "MutableSequence"
    )
}

fn is_mapping(name: &str) -> bool {
    matches!(name, "dict" | "Dict" | "Mapping" | "MutableMapping")
}

fn is_set(name: &str) -> bool {
    matches!(name, "set" | "Set" | "frozenset" | "FrozenSet")
}

impl Builder<'_> {
    /// The Go type an annotation spells. `None` annotates "no value" and
    /// comes back as `INVALID`.
    pub(super) fn annotation(&mut self, annotation: &Expr) -> Result<NodeId, BuildError> {
        match annotation {
            Expr::Constant {
                value: Constant::None,
            } => Ok(NodeId::INVALID),
            // Forward reference: `'Node'`.
            Expr::Constant {
                value: Constant::Str(name),
            } => Ok(self.arena.ident(name)),
            Expr::Name { id } => Ok(self.named_annotation(id)),
            Expr::Attribute { .. } => match annotation.dotted() {
                Some(dotted) => Ok(self.arena.path(&dotted)),
                None => Err(unsupported_expr(annotation)),
            },
            Expr::Subscript { value, slice } => match value.as_name() {
                Some(generic) => self.generic_annotation(generic, slice, annotation),
                None => Err(unsupported_expr(annotation)),
            },
            _ => Err(unsupported_expr(annotation)),
        }
    }

    fn named_annotation(&mut self, id: &str) -> NodeId {
        if let Some(ty) = builtin_type(id) {
            return self.arena.type_expr(&ty);
        }
        if id == directive::ANY {
            return self.any_of(Vec::new());
        }
        if is_sequence(id) {
            let elt = self.any_of(Vec::new());
            return self.arena.alloc(NodeKind::ArrayType {
                len: NodeId::INVALID,
                elt,
            });
        }
        if is_mapping(id) {
            let key = self.any_of(Vec::new());
            let value = self.any_of(Vec::new());
            return self.arena.alloc(NodeKind::MapType { key, value });
        }
        if is_set(id) {
            let key = self.any_of(Vec::new());
            return literals::set_type(self, key);
        }
        self.arena.ident(id)
    }

    fn generic_annotation(
        &mut self,
        generic: &str,
        slice: &Expr,
        whole: &Expr,
    ) -> Result<NodeId, BuildError> {
        let args: &[Expr] = match slice {
            Expr::Tuple { elts } => elts,
            single => std::slice::from_ref(single),
        };
        match generic {
            directive::ANY => {
                let sources = self.exprs(args)?;
                Ok(self.any_of(sources))
            }
            directive::PTR => {
                let inner = self.annotation(slice)?;
                Ok(self.arena.star(inner))
            }
            "Optional" | "Iterator" | "Generator" | "AsyncIterator" | "Awaitable" => {
                match args.first() {
                    Some(first) => self.annotation(first),
                    None => Err(unsupported_expr(whole)),
                }
            }
            name if is_sequence(name) => {
                let homogeneous = match args {
                    [one] => Some(one),
                    // tuple[int, ...]
                    [one, Expr::Constant {
                        value: Constant::Ellipsis,
                    }] => Some(one),
                    [first, rest @ ..] if rest.iter().all(|r| r == first) => Some(first),
                    _ => None,
                };
                let elt = match homogeneous {
                    Some(elt) => self.annotation(elt)?,
                    None => self.any_of(Vec::new()),
                };
                Ok(self.arena.alloc(NodeKind::ArrayType {
                    len: NodeId::INVALID,
                    elt,
                }))
            }
            name if is_mapping(name) => {
                let [key, value] = args else {
                    return Err(unsupported_expr(whole));
                };
                let key = self.annotation(key)?;
                let value = self.annotation(value)?;
                Ok(self.arena.alloc(NodeKind::MapType { key, value }))
            }
            name if is_set(name) => {
                let [key] = args else {
                    return Err(unsupported_expr(whole));
                };
                let key = self.annotation(key)?;
                Ok(literals::set_type(self, key))
            }
            "Callable" => {
                let [Expr::List { elts: params }, result] = args else {
                    return Err(unsupported_expr(whole));
                };
                let mut fields = Vec::with_capacity(params.len());
                for param in params {
                    let ty = self.annotation(param)?;
                    fields.push(self.arena.field(&[], ty));
                }
                let result = self.annotation(result)?;
                let results = if result.is_valid() {
                    let field = self.arena.field(&[], result);
                    self.arena.field_list(vec![field])
                } else {
                    NodeId::INVALID
                };
                Ok(self.arena.func_type(fields, results))
            }
            _ => Err(unsupported_expr(whole)),
        }
    }

    /// Types named by the second argument of `isinstance`: one type or a
    /// tuple of them.
    pub(super) fn type_list(&mut self, types: &Expr) -> Result<Vec<NodeId>, BuildError> {
        match types {
            Expr::Tuple { elts } => elts.iter().map(|t| self.annotation(t)).collect(),
            single => Ok(vec![self.annotation(single)?]),
        }
    }
}
