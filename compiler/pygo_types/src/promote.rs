//! Numeric promotion and conversions.
//!
//! When two operands of a binary expression have different known types,
//! the *dominant* one wins and the other operand is converted to it.

use pygo_ir::{BasicKind, GoArena, GoType, NodeId, NodeKind, Token};

/// Numeric kinds from narrowest to widest. `bool` sits among the unsigned
/// kinds so that `true + 1` promotes to the integer.
const NUMERIC_ORDER: [&[BasicKind]; 16] = [
    &[BasicKind::Uint],
    &[BasicKind::Uintptr],
    &[BasicKind::Bool],
    &[BasicKind::Uint8, BasicKind::Byte],
    &[BasicKind::Uint16],
    &[BasicKind::Uint32],
    &[BasicKind::Uint64],
    &[BasicKind::Int8],
    &[BasicKind::Int16],
    &[BasicKind::Int32, BasicKind::Rune],
    &[BasicKind::Int],
    &[BasicKind::Int64],
    &[BasicKind::Float32],
    &[BasicKind::Float64],
    &[BasicKind::Complex64],
    &[BasicKind::Complex128],
];

/// Rank of a type in the promotion order. `interface{}` ranks lowest,
/// then composite containers, then the numeric kinds; every other type
/// (strings, named types) outranks all numerics.
pub fn type_score(ty: &GoType) -> i32 {
    match ty {
        GoType::Any => -2,
        GoType::Map(..) | GoType::Slice(_) | GoType::Array(..) => -1,
        GoType::Basic(kind) => NUMERIC_ORDER
            .iter()
            .position(|group| group.contains(kind))
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(i32::MAX),
        _ => i32::MAX,
    }
}

/// The dominant of two types. Equal ranks (aliases such as `byte` and
/// `uint8`, or two distinct named types) break ties on the spelled name,
/// so the choice does not depend on operand order.
pub fn dominant<'t>(a: &'t GoType, b: &'t GoType) -> &'t GoType {
    let (sa, sb) = (type_score(a), type_score(b));
    if sa != sb {
        return if sa > sb { a } else { b };
    }
    if a.to_string() >= b.to_string() {
        a
    } else {
        b
    }
}

fn is_numeric_literal(arena: &GoArena, id: NodeId) -> bool {
    match arena.get(id) {
        Some(NodeKind::BasicLit { kind, .. }) => {
            matches!(kind, Token::Int | Token::Float | Token::Imag | Token::Char)
        }
        Some(NodeKind::UnaryExpr { op: Token::Sub, x }) => is_numeric_literal(arena, *x),
        _ => false,
    }
}

/// Convert `expr` of type `from` to type `to`, returning the expression to
/// use in its place (possibly `expr` itself).
pub fn cast(arena: &mut GoArena, expr: NodeId, from: &GoType, to: &GoType) -> NodeId {
    if from == to {
        return expr;
    }
    if is_numeric_literal(arena, expr) && to.is_numeric() {
        return expr;
    }
    if from.is_bool() && to.is_numeric() {
        // func() T { if x { return 1 }; return 0 }()
        let one = arena.int_lit(1);
        let ret_one = arena.ret(vec![one]);
        let check = arena.if_stmt(expr, vec![ret_one], NodeId::INVALID);
        let zero = arena.int_lit(0);
        let ret_zero = arena.ret(vec![zero]);
        let results = arena.results_for(to);
        return arena.iife(results, vec![check, ret_zero]);
    }
    if to.is_bool() {
        if from.is_sized() {
            let len = arena.call_path("len", vec![expr]);
            let zero = arena.int_lit(0);
            return arena.binary(len, Token::Neq, zero);
        }
        if from.is_numeric() {
            let zero = arena.int_lit(0);
            return arena.binary(expr, Token::Neq, zero);
        }
        if matches!(
            from,
            GoType::Pointer(_) | GoType::Func(_) | GoType::Chan(..) | GoType::Any
        ) || *from == GoType::Named("error".into())
        {
            let nil = arena.nil();
            return arena.binary(expr, Token::Neq, nil);
        }
    }
    arena.convert(to, expr)
}

/// Whether both types are integers.
pub fn both_integer(a: &GoType, b: &GoType) -> bool {
    a.is_integer() && b.is_integer()
}
