//! Literal constants, names, and collection displays.

use pygo_ir::{directive, GoType, NodeId, NodeKind, Token};
use pygo_py::{Constant, Expr};

use super::{Builder, Decline, Outcome};
use crate::BuildError;

pub(super) fn constant(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Constant { value } = expr else {
        return Err(Decline::Shape);
    };
    let arena = &mut b.arena;
    Ok(match value {
        Constant::Int(text) => arena.lit(Token::Int, text.replace('_', "")),
        Constant::Float(text) => arena.lit(Token::Float, text.replace('_', "")),
        Constant::Str(text) => arena.string_lit(text),
        Constant::Bool(v) => arena.bool_lit(*v),
        Constant::None => arena.nil(),
        Constant::Bytes(bytes) => {
            let lit = arena.lit(Token::String, quote_bytes(bytes));
            arena.convert(&GoType::slice(GoType::BYTE), lit)
        }
        Constant::Complex { real, imag } => {
            let imag = arena.lit(Token::Imag, format!("{imag}i"));
            if is_zero(real) {
                imag
            } else {
                let real = arena.lit(Token::Float, real.clone());
                arena.binary(real, Token::Add, imag)
            }
        }
        Constant::Ellipsis => return Err(Decline::Shape),
        Constant::Unsupported(repr) => {
            return Err(BuildError::unsupported("Constant", repr.clone()).into())
        }
    })
}

fn is_zero(number: &str) -> bool {
    number.parse::<f64>().is_ok_and(|v| v == 0.0)
}

/// Go string literal for raw bytes. Printable ASCII is kept, everything
/// else is a `\x` escape, so non-UTF-8 content survives.
fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push('"');
    out
}

pub(super) fn empty_struct(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    match expr.as_name() {
        Some(directive::EMPTY_STRUCT) => Ok(b.arena.empty_struct_value()),
        _ => Err(Decline::Shape),
    }
}

pub(super) fn name(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Some(id) = expr.as_name() else {
        return Err(Decline::Shape);
    };
    Ok(b.arena.ident(id))
}

/// Elements of a display, declining on `*unpacking`.
fn elements(b: &mut Builder<'_>, elts: &[Expr]) -> Outcome<Vec<NodeId>> {
    if elts.iter().any(|e| matches!(e, Expr::Starred { .. })) {
        return Err(Decline::Shape);
    }
    Ok(b.exprs(elts)?)
}

pub(super) fn list(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::List { elts } = expr else {
        return Err(Decline::Shape);
    };
    let elts = elements(b, elts)?;
    let elt = b.elt_type(&elts);
    let ty = b.arena.alloc(NodeKind::ArrayType {
        len: NodeId::INVALID,
        elt,
    });
    Ok(b.arena.composite(ty, elts))
}

pub(super) fn tuple(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Tuple { elts } = expr else {
        return Err(Decline::Shape);
    };
    let elts = elements(b, elts)?;
    let elt = b.elt_type(&elts);
    let len = b.arena.lit(Token::Int, elts.len().to_string());
    let ty = b.arena.alloc(NodeKind::ArrayType { len, elt });
    Ok(b.arena.composite(ty, elts))
}

pub(super) fn dict(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Dict { keys, values } = expr else {
        return Err(Decline::Shape);
    };
    let Some(keys) = keys.iter().cloned().collect::<Option<Vec<Expr>>>() else {
        return Err(Decline::Shape);
    };
    let keys = b.exprs(&keys)?;
    let values = b.exprs(values)?;
    let key = b.elt_type(&keys);
    let value = b.elt_type(&values);
    let ty = b.arena.alloc(NodeKind::MapType { key, value });
    let elts = keys
        .into_iter()
        .zip(values)
        .map(|(k, v)| b.arena.key_value(k, v))
        .collect();
    Ok(b.arena.composite(ty, elts))
}

pub(super) fn set(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Set { elts } = expr else {
        return Err(Decline::Shape);
    };
    let keys = elements(b, elts)?;
    let key = b.elt_type(&keys);
    let ty = set_type(b, key);
    let elts = keys
        .into_iter()
        .map(|k| {
            let present = b.arena.empty_struct_value();
            b.arena.key_value(k, present)
        })
        .collect();
    Ok(b.arena.composite(ty, elts))
}

/// `map[key]struct{}`
pub(super) fn set_type(b: &mut Builder<'_>, key: NodeId) -> NodeId {
    let value = b.arena.type_expr(&GoType::empty_struct());
    b.arena.alloc(NodeKind::MapType { key, value })
}

/// Zero value for a built-in type constructor called with no arguments,
/// e.g. `list()` or `str()`.
pub(super) fn zero_value(b: &mut Builder<'_>, constructor: &str) -> Option<NodeId> {
    Some(match constructor {
        "int" => b.arena.int_lit(0),
        "float" => b.arena.lit(Token::Float, "0.0"),
        "complex" => b.arena.lit(Token::Imag, "0i"),
        "str" => b.arena.string_lit(""),
        "bool" => b.arena.bool_lit(false),
        "bytes" | "bytearray" => {
            let ty = b.arena.type_expr(&GoType::slice(GoType::BYTE));
            b.arena.composite(ty, Vec::new())
        }
        "list" | "tuple" => {
            let elt = b.any_of(Vec::new());
            let ty = b.arena.alloc(NodeKind::ArrayType {
                len: NodeId::INVALID,
                elt,
            });
            b.arena.composite(ty, Vec::new())
        }
        "dict" => {
            let key = b.any_of(Vec::new());
            let value = b.any_of(Vec::new());
            let ty = b.arena.alloc(NodeKind::MapType { key, value });
            b.arena.composite(ty, Vec::new())
        }
        "set" | "frozenset" => {
            let key = b.any_of(Vec::new());
            let ty = set_type(b, key);
            b.arena.composite(ty, Vec::new())
        }
        _ => return None,
    })
}
