//! Semantic Go types.
//!
//! The syntax tree spells types as type-expression nodes (`ArrayType`,
//! `MapType`, ...). Inference works on [`GoType`] values instead, and
//! converts in both directions: [`GoType::from_expr`] reads a type
//! expression, [`GoArena::type_expr`](crate::GoArena::type_expr)
//! materializes one.

use std::fmt;

use crate::{ChanDir, GoArena, NodeId, NodeKind, Token};

/// Predeclared Go basic types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicKind {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Byte,
    Rune,
}

impl BasicKind {
    pub const ALL: [BasicKind; 19] = [
        BasicKind::Bool,
        BasicKind::String,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::Byte,
        BasicKind::Rune,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::String => "string",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
        }
    }

    pub fn from_name(name: &str) -> Option<BasicKind> {
        BasicKind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::Byte
                | BasicKind::Rune
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, BasicKind::Complex64 | BasicKind::Complex128)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }
}

/// A function signature. Multiple results are kept as a list; a call's
/// type is the single result or a [`GoType::Tuple`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FuncSig {
    pub params: Vec<GoType>,
    pub results: Vec<GoType>,
    pub variadic: bool,
}

/// A semantic Go type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GoType {
    /// `interface{}`, the universal placeholder.
    Any,
    Basic(BasicKind),
    /// A named type in the current package, or a predeclared non-basic
    /// name such as `error`.
    Named(String),
    /// A package-qualified named type, e.g. `os.File`.
    Qualified { pkg: String, name: String },
    Slice(Box<GoType>),
    Array(usize, Box<GoType>),
    Map(Box<GoType>, Box<GoType>),
    Chan(ChanDir, Box<GoType>),
    Func(FuncSig),
    Pointer(Box<GoType>),
    /// Struct literal type. `struct{}` is the empty field list.
    Struct(Vec<(String, GoType)>),
    /// Result of a multi-value call.
    Tuple(Vec<GoType>),
}

impl GoType {
    pub const INT: GoType = GoType::Basic(BasicKind::Int);
    pub const FLOAT64: GoType = GoType::Basic(BasicKind::Float64);
    pub const STRING: GoType = GoType::Basic(BasicKind::String);
    pub const BOOL: GoType = GoType::Basic(BasicKind::Bool);
    pub const BYTE: GoType = GoType::Basic(BasicKind::Byte);

    pub fn slice(elt: GoType) -> GoType {
        GoType::Slice(Box::new(elt))
    }

    pub fn map(key: GoType, value: GoType) -> GoType {
        GoType::Map(Box::new(key), Box::new(value))
    }

    pub fn pointer(elt: GoType) -> GoType {
        GoType::Pointer(Box::new(elt))
    }

    pub fn chan(dir: ChanDir, elt: GoType) -> GoType {
        GoType::Chan(dir, Box::new(elt))
    }

    pub fn qualified(pkg: &str, name: &str) -> GoType {
        GoType::Qualified {
            pkg: pkg.to_owned(),
            name: name.to_owned(),
        }
    }

    pub fn func(params: Vec<GoType>, results: Vec<GoType>) -> GoType {
        GoType::Func(FuncSig {
            params,
            results,
            variadic: false,
        })
    }

    pub fn empty_struct() -> GoType {
        GoType::Struct(Vec::new())
    }

    pub fn basic(&self) -> Option<BasicKind> {
        match self {
            GoType::Basic(k) => Some(*k),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.basic().is_some_and(BasicKind::is_integer)
    }

    pub fn is_numeric(&self) -> bool {
        self.basic().is_some_and(BasicKind::is_numeric)
    }

    pub fn is_string(&self) -> bool {
        self.basic() == Some(BasicKind::String)
    }

    pub fn is_bool(&self) -> bool {
        self.basic() == Some(BasicKind::Bool)
    }

    /// Types whose truthiness is "non-empty": strings, slices, arrays, maps.
    pub fn is_sized(&self) -> bool {
        self.is_string()
            || matches!(
                self,
                GoType::Slice(_) | GoType::Array(..) | GoType::Map(..) | GoType::Chan(..)
            )
    }

    /// `[]byte` or `[]uint8`.
    pub fn is_byte_slice(&self) -> bool {
        matches!(self, GoType::Slice(elt)
            if matches!(**elt, GoType::Basic(BasicKind::Byte | BasicKind::Uint8)))
    }

    /// Types that cannot be compared with `==` (or compare by identity)
    /// and need `reflect.DeepEqual`.
    pub fn needs_deep_equal(&self) -> bool {
        matches!(
            self,
            GoType::Any | GoType::Slice(_) | GoType::Map(..) | GoType::Func(_)
        )
    }

    /// Element type of a slice or array.
    pub fn elem(&self) -> Option<&GoType> {
        match self {
            GoType::Slice(elt) | GoType::Array(_, elt) => Some(elt),
            _ => None,
        }
    }

    /// True if an `interface{}` appears anywhere inside this type.
    pub fn contains_any(&self) -> bool {
        match self {
            GoType::Any => true,
            GoType::Basic(_) | GoType::Named(_) | GoType::Qualified { .. } => false,
            GoType::Slice(t) | GoType::Array(_, t) | GoType::Chan(_, t) | GoType::Pointer(t) => {
                t.contains_any()
            }
            GoType::Map(k, v) => k.contains_any() || v.contains_any(),
            GoType::Func(sig) => sig
                .params
                .iter()
                .chain(&sig.results)
                .any(GoType::contains_any),
            GoType::Struct(fields) => fields.iter().any(|(_, t)| t.contains_any()),
            GoType::Tuple(ts) => ts.iter().any(GoType::contains_any),
        }
    }

    /// Read a type expression. Returns `None` for nodes that do not spell
    /// a type.
    pub fn from_expr(arena: &GoArena, id: NodeId) -> Option<GoType> {
        if !id.is_valid() {
            return None;
        }
        Some(match arena.kind(id) {
            NodeKind::Ident { name } => match BasicKind::from_name(name) {
                Some(kind) => GoType::Basic(kind),
                None if is_value_ident(name) => return None,
                None => GoType::Named(name.clone()),
            },
            NodeKind::InterfaceType => GoType::Any,
            NodeKind::ParenExpr { x } => return GoType::from_expr(arena, *x),
            NodeKind::StarExpr { x } => GoType::pointer(GoType::from_expr(arena, *x)?),
            NodeKind::SelectorExpr { x, sel } => match arena.kind(*x) {
                NodeKind::Ident { name } => GoType::qualified(name, sel),
                _ => return None,
            },
            NodeKind::ArrayType { len, elt } => {
                let elt = GoType::from_expr(arena, *elt)?;
                match arena.get(*len) {
                    None | Some(NodeKind::Ellipsis { .. }) => GoType::slice(elt),
                    Some(NodeKind::BasicLit {
                        kind: Token::Int,
                        value,
                    }) => GoType::Array(value.parse().ok()?, Box::new(elt)),
                    Some(_) => return None,
                }
            }
            NodeKind::MapType { key, value } => GoType::map(
                GoType::from_expr(arena, *key)?,
                GoType::from_expr(arena, *value)?,
            ),
            NodeKind::ChanType { dir, value } => GoType::chan(*dir, GoType::from_expr(arena, *value)?),
            NodeKind::Ellipsis { elt } => GoType::slice(GoType::from_expr(arena, *elt)?),
            NodeKind::FuncType { params, results } => {
                let (params, variadic) = field_types(arena, *params)?;
                let (results, _) = field_types(arena, *results)?;
                GoType::Func(FuncSig {
                    params,
                    results,
                    variadic,
                })
            }
            NodeKind::StructType { fields } => {
                let mut out = Vec::new();
                if let Some(NodeKind::FieldList { list }) = arena.get(*fields) {
                    for &field in list {
                        if let NodeKind::Field { names, ty } = arena.kind(field) {
                            let ty = GoType::from_expr(arena, *ty)?;
                            for &name in names {
                                out.push((arena.ident_name(name)?.to_owned(), ty.clone()));
                            }
                        }
                    }
                }
                GoType::Struct(out)
            }
            _ => return None,
        })
    }
}

fn is_value_ident(name: &str) -> bool {
    matches!(name, "nil" | "true" | "false" | "iota" | "_")
}

/// Expand a field list into one type per declared name. A missing list is
/// empty; an unreadable field type makes the whole list unreadable.
fn field_types(arena: &GoArena, list: NodeId) -> Option<(Vec<GoType>, bool)> {
    let mut out = Vec::new();
    let mut variadic = false;
    let Some(NodeKind::FieldList { list }) = arena.get(list) else {
        return Some((out, variadic));
    };
    for &field in list {
        let NodeKind::Field { names, ty } = arena.kind(field) else {
            continue;
        };
        if matches!(arena.get(*ty), Some(NodeKind::Ellipsis { .. })) {
            variadic = true;
        }
        let ty = GoType::from_expr(arena, *ty)?;
        for _ in 0..names.len().max(1) {
            out.push(ty.clone());
        }
    }
    Some((out, variadic))
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Any => write!(f, "interface{{}}"),
            GoType::Basic(k) => write!(f, "{}", k.name()),
            GoType::Named(name) => write!(f, "{name}"),
            GoType::Qualified { pkg, name } => write!(f, "{pkg}.{name}"),
            GoType::Slice(elt) => write!(f, "[]{elt}"),
            GoType::Array(len, elt) => write!(f, "[{len}]{elt}"),
            GoType::Map(k, v) => write!(f, "map[{k}]{v}"),
            GoType::Chan(ChanDir::Both, elt) => write!(f, "chan {elt}"),
            GoType::Chan(ChanDir::Send, elt) => write!(f, "chan<- {elt}"),
            GoType::Chan(ChanDir::Recv, elt) => write!(f, "<-chan {elt}"),
            GoType::Pointer(elt) => write!(f, "*{elt}"),
            GoType::Func(sig) => {
                write!(f, "func(")?;
                write_list(f, &sig.params)?;
                write!(f, ")")?;
                match sig.results.as_slice() {
                    [] => Ok(()),
                    [one] => write!(f, " {one}"),
                    many => {
                        write!(f, " (")?;
                        write_list(f, many)?;
                        write!(f, ")")
                    }
                }
            }
            GoType::Struct(fields) => {
                write!(f, "struct{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{name} {ty}")?;
                }
                write!(f, "}}")
            }
            GoType::Tuple(ts) => {
                write!(f, "(")?;
                write_list(f, ts)?;
                write!(f, ")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[GoType]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
