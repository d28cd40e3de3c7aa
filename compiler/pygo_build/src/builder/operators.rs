//! Operators.
//!
//! Python operators without a Go token (`**`, `//`, `is`, `in`, ...) map to
//! placeholder tokens that the rewrite passes resolve once operand types
//! are known.

use pygo_ir::{NodeId, Token};
use pygo_py::{BoolOperator, CmpOperator, Constant, Expr, Operator, UnaryOperator};

use super::{Builder, Decline, Outcome};

pub(super) fn binary_token(op: Operator) -> Option<Token> {
    Some(match op {
        Operator::Add => Token::Add,
        Operator::Sub => Token::Sub,
        Operator::Mult => Token::Mul,
        Operator::Div => Token::Quo,
        Operator::Mod => Token::Rem,
        Operator::Pow => Token::Pow,
        Operator::LShift => Token::Shl,
        Operator::RShift => Token::Shr,
        Operator::BitOr => Token::Or,
        Operator::BitXor => Token::Xor,
        Operator::BitAnd => Token::And,
        Operator::FloorDiv => Token::FloorDiv,
        Operator::MatMult => return None,
    })
}

fn compare_token(op: CmpOperator) -> Token {
    match op {
        CmpOperator::Eq => Token::Eql,
        CmpOperator::NotEq => Token::Neq,
        CmpOperator::Lt => Token::Lss,
        CmpOperator::LtE => Token::Leq,
        CmpOperator::Gt => Token::Gtr,
        CmpOperator::GtE => Token::Geq,
        CmpOperator::Is => Token::Is,
        CmpOperator::IsNot => Token::IsNot,
        CmpOperator::In => Token::In,
        CmpOperator::NotIn => Token::NotIn,
    }
}

/// `'*' @ x` → `*x`
pub(super) fn deref(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::BinOp {
        left,
        op: Operator::MatMult,
        right,
    } = expr
    else {
        return Err(Decline::Shape);
    };
    match left.as_ref() {
        Expr::Constant {
            value: Constant::Str(s),
        } if s == "*" => {
            let x = b.expr(right)?;
            Ok(b.arena.star(x))
        }
        _ => Err(Decline::Shape),
    }
}

pub(super) fn bin_op(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::BinOp { left, op, right } = expr else {
        return Err(Decline::Shape);
    };
    let Some(tok) = binary_token(*op) else {
        return Err(Decline::Shape);
    };
    let x = b.expr(left)?;
    let y = b.expr(right)?;
    Ok(b.arena.binary(x, tok, y))
}

pub(super) fn unary_op(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::UnaryOp { op, operand } = expr else {
        return Err(Decline::Shape);
    };
    let x = b.expr(operand)?;
    Ok(match op {
        UnaryOperator::UAdd => x,
        UnaryOperator::USub => b.arena.unary(Token::Sub, x),
        UnaryOperator::Not => b.arena.not(x),
        UnaryOperator::Invert => b.arena.unary(Token::Xor, x),
    })
}

/// `a and b and c` → `a && b && c`
pub(super) fn bool_op(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::BoolOp { op, values } = expr else {
        return Err(Decline::Shape);
    };
    let tok = match op {
        BoolOperator::And => Token::LAnd,
        BoolOperator::Or => Token::LOr,
    };
    let mut values = b.exprs(values)?.into_iter();
    let Some(mut acc) = values.next() else {
        return Err(Decline::Shape);
    };
    for value in values {
        acc = b.arena.binary(acc, tok, value);
    }
    Ok(acc)
}

/// `a < b < c` → `a < b && b < c`
pub(super) fn compare(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Compare {
        left,
        ops,
        comparators,
    } = expr
    else {
        return Err(Decline::Shape);
    };
    if ops.is_empty() || ops.len() != comparators.len() {
        return Err(Decline::Shape);
    }
    let mut lhs = b.expr(left)?;
    let mut chain: Option<NodeId> = None;
    for (op, comparator) in ops.iter().zip(comparators) {
        let rhs = b.expr(comparator)?;
        let link = b.arena.binary(lhs, compare_token(*op), rhs);
        chain = Some(match chain {
            Some(acc) => b.arena.binary(acc, Token::LAnd, link),
            None => link,
        });
        lhs = b.arena.deep_copy(rhs);
    }
    chain.ok_or(Decline::Shape)
}
