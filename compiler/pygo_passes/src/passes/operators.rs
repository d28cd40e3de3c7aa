//! Operators Python and Go spell differently.
//!
//! The builder leaves Python-only operators (`**`, `//`, `in`, `is`) as
//! placeholder tokens. The passes here lower them once operand types are
//! known, settle mixed-type arithmetic, and make implicit truthiness
//! explicit.

use pygo_ir::{GoType, NodeId, NodeKind, SlotValue, Token};
use pygo_types::{both_integer, cast, dominant};

use super::replace_node;
use crate::walk::{Cx, Pass, Rewrite};

fn binary_parts(cx: &Cx<'_>, id: NodeId) -> Option<(NodeId, Token, NodeId)> {
    match cx.arena.get(id)? {
        NodeKind::BinaryExpr { x, op, y } => Some((*x, *op, *y)),
        _ => None,
    }
}

/// Value of a `true` or `false` literal.
fn bool_value(cx: &Cx<'_>, id: NodeId) -> Option<bool> {
    match cx.arena.ident_name(id)? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// `in`, `not in`, `is`, `is not`, and `==` on values Go cannot compare.
pub(crate) struct SpecialComparators;

impl SpecialComparators {
    /// `x in y` for a container of type `container`. Anything that is not
    /// text or a map is searched element by element.
    fn membership(cx: &mut Cx<'_>, x: NodeId, y: NodeId, container: &GoType) -> NodeId {
        if container.is_string() {
            cx.arena.call_path("strings.Contains", vec![y, x])
        } else if container.is_byte_slice() {
            cx.arena.call_path("bytes.Contains", vec![y, x])
        } else {
            match container {
                // func() bool { _, ok := y[x]; return ok }()
                GoType::Map(..) => {
                    let blank = cx.arena.ident("_");
                    let ok = cx.arena.ident("ok");
                    let lookup = cx.arena.index(y, x);
                    let check = cx.arena.assign(vec![blank, ok], Token::Define, vec![lookup]);
                    let ok = cx.arena.ident("ok");
                    let ret = cx.arena.ret(vec![ok]);
                    let results = cx.arena.results_for(&GoType::BOOL);
                    cx.arena.iife(results, vec![check, ret])
                }
                _ => {
                    let found = index_search(cx, x, y);
                    let missing = cx.arena.int_lit(-1);
                    cx.arena.binary(found, Token::Neq, missing)
                }
            }
        }
    }

    fn lower(cx: &mut Cx<'_>, id: NodeId) -> Option<NodeId> {
        let (x, op, y) = binary_parts(cx, id)?;
        match op {
            Token::In | Token::NotIn => {
                let container = cx.type_of(y)?;
                let found = Self::membership(cx, x, y, &container);
                Some(if op == Token::NotIn {
                    cx.arena.not(found)
                } else {
                    found
                })
            }
            Token::Is | Token::IsNot => {
                let eq = if op == Token::Is {
                    Token::Eql
                } else {
                    Token::Neq
                };
                if cx.arena.is_ident(y, "nil") || cx.arena.is_ident(x, "nil") {
                    return Some(cx.arena.binary(x, eq, y));
                }
                let x = cx.arena.addr(x);
                let y = cx.arena.addr(y);
                Some(cx.arena.binary(x, eq, y))
            }
            Token::Eql | Token::Neq => {
                let deep = [x, y]
                    .iter()
                    .any(|&side| cx.type_of(side).is_some_and(|t| t.needs_deep_equal()));
                if !deep || cx.arena.is_ident(x, "nil") || cx.arena.is_ident(y, "nil") {
                    return None;
                }
                let equal = cx.arena.call_path("reflect.DeepEqual", vec![x, y]);
                Some(if op == Token::Neq {
                    cx.arena.not(equal)
                } else {
                    equal
                })
            }
            _ => None,
        }
    }
}

/// `func() int { for i, v := range y { if v == x { return i } }; return -1 }()`
fn index_search(cx: &mut Cx<'_>, x: NodeId, y: NodeId) -> NodeId {
    let v = cx.arena.ident("v");
    let eq = cx.arena.binary(v, Token::Eql, x);
    let i = cx.arena.ident("i");
    let found = cx.arena.ret(vec![i]);
    let check = cx.arena.if_stmt(eq, vec![found], NodeId::INVALID);
    let body = cx.arena.block(vec![check]);
    let (i, v) = (cx.arena.ident("i"), cx.arena.ident("v"));
    let search = cx.arena.range_stmt(i, v, y, body);
    let none = cx.arena.int_lit(-1);
    let missing = cx.arena.ret(vec![none]);
    let results = cx.arena.results_for(&GoType::INT);
    cx.arena.iife(results, vec![search, missing])
}

impl Pass for SpecialComparators {
    fn name(&self) -> &'static str {
        "SpecialComparators"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match Self::lower(cx, id) {
            Some(new) => Rewrite::Replace(new),
            None => Rewrite::Keep,
        }
    }
}

/// `x ** y` → `math.Pow(x, y)`, converted back for integer operands.
pub(crate) struct ReplacePowWithMathPow;

impl Pass for ReplacePowWithMathPow {
    fn name(&self) -> &'static str {
        "ReplacePowWithMathPow"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some((x, Token::Pow, y)) = binary_parts(cx, id) else {
            return Rewrite::Keep;
        };
        let (tx, ty) = (cx.type_of(x), cx.type_of(y));
        let x = to_float(cx, x, tx.as_ref());
        let y = to_float(cx, y, ty.as_ref());
        let pow = cx.arena.call_path("math.Pow", vec![x, y]);
        match (tx, ty) {
            (Some(tx), Some(ty)) if both_integer(&tx, &ty) => {
                let to = dominant(&tx, &ty).clone();
                Rewrite::Replace(cx.arena.convert(&to, pow))
            }
            _ => Rewrite::Replace(pow),
        }
    }
}

fn to_float(cx: &mut Cx<'_>, side: NodeId, ty: Option<&GoType>) -> NodeId {
    match ty {
        Some(ty) if ty.is_numeric() => cast(cx.arena, side, ty, &GoType::FLOAT64),
        _ => side,
    }
}

/// `x[-n]` → `x[len(x)-n]` on sequences.
pub(crate) struct NegativeIndexesSubtractFromLen;

impl Pass for NegativeIndexesSubtractFromLen {
    fn name(&self) -> &'static str {
        "NegativeIndexesSubtractFromLen"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::IndexExpr { x, index }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let (x, index) = (*x, *index);
        let Some(NodeKind::UnaryExpr {
            op: Token::Sub,
            x: offset,
        }) = cx.arena.get(index)
        else {
            return Rewrite::Keep;
        };
        let offset = *offset;
        if !matches!(cx.arena.get(offset), Some(NodeKind::BasicLit { .. })) {
            return Rewrite::Keep;
        }
        if matches!(cx.type_of(x), Some(GoType::Map(..))) {
            return Rewrite::Keep;
        }
        let seq = cx.arena.deep_copy(x);
        let len = cx.arena.call_path("len", vec![seq]);
        let index = cx.arena.binary(len, Token::Sub, offset);
        cx.arena.kind_mut(id).set_slot(1, SlotValue::One(index));
        Rewrite::Keep
    }
}

/// `s[i]` on a string is a one-character string, not a byte.
pub(crate) struct StringifyStringMember;

impl Pass for StringifyStringMember {
    fn name(&self) -> &'static str {
        "StringifyStringMember"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::IndexExpr { x, index }) = cx.arena.get(id) else {
            return Rewrite::Keep;
        };
        let (x, index) = (*x, *index);
        let string_index = cx.type_of(x).is_some_and(|t| t.is_string())
            && cx.type_of(index).is_some_and(|t| t.is_integer());
        if !string_index {
            return Rewrite::Keep;
        }
        let wrapped = cx.parent().is_some_and(|p| {
            matches!(cx.arena.get(p), Some(NodeKind::CallExpr { fun, .. }) if cx.arena.is_ident(*fun, "string"))
        });
        if wrapped {
            return Rewrite::Keep;
        }
        Rewrite::Replace(cx.arena.convert(&GoType::STRING, id))
    }
}

/// Mixed-type arithmetic and comparisons: true and floor division,
/// numeric promotion, and `== true` / `== false`.
pub(crate) struct HandleTypeCoercion;

impl HandleTypeCoercion {
    /// Operands of a comparison against a boolean literal, literal last.
    fn bool_comparison(cx: &Cx<'_>, x: NodeId, y: NodeId) -> Option<(NodeId, bool)> {
        [(x, y), (y, x)]
            .into_iter()
            .find_map(|(a, b)| bool_value(cx, b).map(|literal| (a, literal)))
    }

    /// `a == true` → `a`, `a == false` → `!a`, flipping a comparison
    /// instead of negating it.
    fn simplify(cx: &mut Cx<'_>, op: Token, a: NodeId, literal: bool) -> NodeId {
        let keep = (op == Token::Eql) == literal;
        if keep {
            return a;
        }
        if let NodeKind::BinaryExpr { op: inner, .. } = cx.arena.kind(a) {
            if let Some(flipped) = inner.negated().filter(|t| !t.is_placeholder()) {
                if let NodeKind::BinaryExpr { op, .. } = cx.arena.kind_mut(a) {
                    *op = flipped;
                }
                return a;
            }
        }
        cx.arena.not(a)
    }

    /// Both division operands as `float64`. Literals stay bare unless both
    /// sides are literals, which Go would divide as integer constants.
    fn operands_to_float(
        cx: &mut Cx<'_>,
        x: NodeId,
        a: &GoType,
        y: NodeId,
        b: &GoType,
    ) -> (NodeId, NodeId) {
        let float = GoType::FLOAT64;
        let mut widen = |id: NodeId, t: &GoType| {
            if t.is_numeric() {
                cast(cx.arena, id, t, &float)
            } else {
                id
            }
        };
        let mut nx = widen(x, a);
        let ny = widen(y, b);
        if nx == x && ny == y && a.is_integer() && b.is_integer() {
            nx = cx.arena.convert(&float, x);
        }
        (nx, ny)
    }
}

impl Pass for HandleTypeCoercion {
    fn name(&self) -> &'static str {
        "HandleTypeCoercion"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some((mut x, mut op, mut y)) = binary_parts(cx, id) else {
            return Rewrite::Keep;
        };
        let (mut tx, mut ty) = (cx.type_of(x), cx.type_of(y));
        let int = |t: &Option<GoType>| t.as_ref().is_some_and(GoType::is_integer);
        let mut floor = false;
        let mut floor_result = None;

        match op {
            Token::FloorDiv => {
                let (Some(a), Some(b)) = (tx.clone(), ty.clone()) else {
                    return Rewrite::Keep;
                };
                op = Token::Quo;
                floor = true;
                if int(&tx) && int(&ty) {
                    floor_result = Some(dominant(&a, &b).clone());
                }
                (x, y) = Self::operands_to_float(cx, x, &a, y, &b);
                tx = Some(GoType::FLOAT64);
                ty = Some(GoType::FLOAT64);
            }
            Token::Quo if int(&tx) || int(&ty) => {
                let (Some(a), Some(b)) = (tx.clone(), ty.clone()) else {
                    return Rewrite::Keep;
                };
                (x, y) = Self::operands_to_float(cx, x, &a, y, &b);
                tx = Some(GoType::FLOAT64);
                ty = Some(GoType::FLOAT64);
            }
            _ => {}
        }

        let arithmetic = matches!(
            op,
            Token::Add | Token::Sub | Token::Mul | Token::Quo | Token::Rem
        );
        if (arithmetic || op.is_comparison()) && !op.is_placeholder() {
            if let (Some(a), Some(b)) = (tx.clone(), ty.clone()) {
                let mixable = |t: &GoType| t.is_numeric() || t.is_bool();
                if a != b && mixable(&a) && mixable(&b) {
                    // Boolean literals against numbers become 0 and 1.
                    let (mut a, mut b) = (a, b);
                    if let (true, Some(value)) = (b.is_numeric(), bool_value(cx, x)) {
                        x = cx.arena.int_lit(i64::from(value));
                        a = GoType::INT;
                    } else if let (true, Some(value)) = (a.is_numeric(), bool_value(cx, y)) {
                        y = cx.arena.int_lit(i64::from(value));
                        b = GoType::INT;
                    }
                    let to = dominant(&a, &b).clone();
                    x = cast(cx.arena, x, &a, &to);
                    y = cast(cx.arena, y, &b, &to);
                }
            }
        }

        if matches!(op, Token::Eql | Token::Neq) {
            if let Some((a, literal)) = Self::bool_comparison(cx, x, y) {
                return Rewrite::Replace(Self::simplify(cx, op, a, literal));
            }
        }

        let unchanged = matches!(cx.arena.kind(id), NodeKind::BinaryExpr { x: ox, op: oop, y: oy } if *ox == x && *oop == op && *oy == y);
        if unchanged && !floor {
            return Rewrite::Keep;
        }
        cx.arena.set_kind(id, NodeKind::BinaryExpr { x, op, y });
        if floor {
            let floored = cx.arena.call_path("math.Floor", vec![id]);
            return Rewrite::Replace(match floor_result {
                Some(to) => cx.arena.convert(&to, floored),
                None => floored,
            });
        }
        Rewrite::Keep
    }
}

/// `xs += ys` on a slice → `xs = append(xs, ys...)`
pub(crate) struct AppendSliceViaUnpacking;

impl Pass for AppendSliceViaUnpacking {
    fn name(&self) -> &'static str {
        "AppendSliceViaUnpacking"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(NodeKind::AssignStmt {
            lhs,
            tok: Token::AddAssign,
            rhs,
        }) = cx.arena.get(id)
        else {
            return Rewrite::Keep;
        };
        let ([target], [value]) = (lhs.as_slice(), rhs.as_slice()) else {
            return Rewrite::Keep;
        };
        let (target, value) = (*target, *value);
        if !matches!(cx.type_of(target), Some(GoType::Slice(_))) {
            return Rewrite::Keep;
        }
        let fun = cx.arena.ident("append");
        let current = cx.arena.deep_copy(target);
        let append = cx.arena.call_spread(fun, vec![current, value]);
        cx.arena.set_kind(
            id,
            NodeKind::AssignStmt {
                lhs: vec![target],
                tok: Token::Assign,
                rhs: vec![append],
            },
        );
        Rewrite::Keep
    }
}

/// Conditions Python reads by truthiness get an explicit boolean test.
pub(crate) struct Truthiness;

impl Truthiness {
    /// `cond` as a boolean expression, or `None` if it already is one or
    /// its type has no test.
    fn test(cx: &mut Cx<'_>, cond: NodeId, ty: &GoType) -> Option<NodeId> {
        if ty.is_bool() {
            return None;
        }
        let testable = ty.is_sized()
            || ty.is_numeric()
            || matches!(
                ty,
                GoType::Pointer(_) | GoType::Func(_) | GoType::Chan(..) | GoType::Any
            )
            || *ty == GoType::Named("error".into());
        testable.then(|| cast(cx.arena, cond, ty, &GoType::BOOL))
    }

    /// The condition slot of `id`, if it has one.
    fn condition(cx: &Cx<'_>, id: NodeId) -> Option<(usize, NodeId)> {
        match cx.arena.get(id)? {
            NodeKind::IfStmt { cond, .. } | NodeKind::ForStmt { cond, .. } if cond.is_valid() => {
                Some((1, *cond))
            }
            NodeKind::UnaryExpr { op: Token::Not, x } => Some((0, *x)),
            _ => None,
        }
    }
}

impl Pass for Truthiness {
    fn name(&self) -> &'static str {
        "Truthiness"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some((slot, cond)) = Self::condition(cx, id) else {
            return Rewrite::Keep;
        };
        match cx.type_of(cond) {
            Some(ty) => {
                if let Some(mut test) = Self::test(cx, cond, &ty) {
                    // Operand of `!`.
                    if slot == 0 && matches!(cx.arena.kind(test), NodeKind::BinaryExpr { .. }) {
                        test = cx.arena.paren(test);
                    }
                    cx.arena.kind_mut(id).set_slot(slot, SlotValue::One(test));
                }
            }
            None => cx.defer_type(cond, cond),
        }
        Rewrite::Keep
    }

    fn resolved(&mut self, cx: &mut Cx<'_>, node: NodeId, ty: &GoType) {
        if let Some(test) = Self::test(cx, node, ty) {
            let root = cx.root;
            replace_node(cx.arena, root, node, test);
        }
    }
}

#[cfg(test)]
mod tests;
