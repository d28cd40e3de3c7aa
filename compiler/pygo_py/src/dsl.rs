//! Terse constructors for Python syntax.
//!
//! Snippet templates are written with these, and so are most tests:
//!
//! ```ignore
//! use pygo_py::dsl::*;
//! let body = vec![ret(call(path("strings.Contains"), vec![name("s"), name("sub")]))];
//! ```

use crate::ast::{
    Arg, Arguments, BoolOperator, Call, CmpOperator, Constant, Expr, For, FunctionDef, Keyword,
    Operator, Stmt, UnaryOperator,
};

pub fn name(id: &str) -> Expr {
    Expr::Name { id: id.to_owned() }
}

/// `a.b.c` as a `Name`/`Attribute` chain.
pub fn path(dotted: &str) -> Expr {
    let mut parts = dotted.split('.');
    let mut expr = name(parts.next().unwrap_or_default());
    for part in parts {
        expr = attr(expr, part);
    }
    expr
}

pub fn attr(value: Expr, attr: &str) -> Expr {
    Expr::Attribute {
        value: Box::new(value),
        attr: attr.to_owned(),
    }
}

pub fn constant(value: Constant) -> Expr {
    Expr::Constant { value }
}

pub fn int(value: i64) -> Expr {
    constant(Constant::Int(value.to_string()))
}

pub fn float(value: &str) -> Expr {
    constant(Constant::Float(value.to_owned()))
}

pub fn string(value: &str) -> Expr {
    constant(Constant::Str(value.to_owned()))
}

pub fn boolean(value: bool) -> Expr {
    constant(Constant::Bool(value))
}

pub fn none() -> Expr {
    constant(Constant::None)
}

pub fn call(func: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(Call {
        func: Box::new(func),
        args,
        keywords: Vec::new(),
    })
}

pub fn call_kw(func: Expr, args: Vec<Expr>, keywords: Vec<(&str, Expr)>) -> Expr {
    Expr::Call(Call {
        func: Box::new(func),
        args,
        keywords: keywords
            .into_iter()
            .map(|(arg, value)| Keyword {
                arg: Some(arg.to_owned()),
                value,
            })
            .collect(),
    })
}

/// `recv.method(args)`
pub fn method(recv: Expr, method: &str, args: Vec<Expr>) -> Expr {
    call(attr(recv, method), args)
}

pub fn bin(left: Expr, op: Operator, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

pub fn cmp(left: Expr, op: CmpOperator, right: Expr) -> Expr {
    Expr::Compare {
        left: Box::new(left),
        ops: vec![op],
        comparators: vec![right],
    }
}

pub fn and(values: Vec<Expr>) -> Expr {
    Expr::BoolOp {
        op: BoolOperator::And,
        values,
    }
}

pub fn or(values: Vec<Expr>) -> Expr {
    Expr::BoolOp {
        op: BoolOperator::Or,
        values,
    }
}

pub fn not(operand: Expr) -> Expr {
    Expr::UnaryOp {
        op: UnaryOperator::Not,
        operand: Box::new(operand),
    }
}

pub fn neg(operand: Expr) -> Expr {
    Expr::UnaryOp {
        op: UnaryOperator::USub,
        operand: Box::new(operand),
    }
}

pub fn subscript(value: Expr, index: Expr) -> Expr {
    Expr::Subscript {
        value: Box::new(value),
        slice: Box::new(index),
    }
}

/// `value[lower:upper]`
pub fn slice(value: Expr, lower: Option<Expr>, upper: Option<Expr>) -> Expr {
    subscript(
        value,
        Expr::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: None,
        },
    )
}

pub fn list(elts: Vec<Expr>) -> Expr {
    Expr::List { elts }
}

pub fn tuple(elts: Vec<Expr>) -> Expr {
    Expr::Tuple { elts }
}

pub fn set(elts: Vec<Expr>) -> Expr {
    Expr::Set { elts }
}

pub fn dict(pairs: Vec<(Expr, Expr)>) -> Expr {
    let (keys, values) = pairs.into_iter().map(|(k, v)| (Some(k), v)).unzip();
    Expr::Dict { keys, values }
}

pub fn starred(value: Expr) -> Expr {
    Expr::Starred {
        value: Box::new(value),
    }
}

pub fn yield_(value: Expr) -> Expr {
    Expr::Yield {
        value: Some(Box::new(value)),
    }
}

pub fn await_(value: Expr) -> Expr {
    Expr::Await {
        value: Box::new(value),
    }
}

pub fn if_exp(test: Expr, body: Expr, orelse: Expr) -> Expr {
    Expr::IfExp {
        test: Box::new(test),
        body: Box::new(body),
        orelse: Box::new(orelse),
    }
}

pub fn lambda(params: &[&str], body: Expr) -> Expr {
    Expr::Lambda {
        args: Box::new(arguments(params.iter().map(|p| arg(p)).collect())),
        body: Box::new(body),
    }
}

pub fn walrus(target: &str, value: Expr) -> Expr {
    Expr::NamedExpr {
        target: Box::new(name(target)),
        value: Box::new(value),
    }
}

// Statements

pub fn expr(value: Expr) -> Stmt {
    Stmt::Expr { value }
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        targets: vec![target],
        value,
    }
}

pub fn aug(target: Expr, op: Operator, value: Expr) -> Stmt {
    Stmt::AugAssign { target, op, value }
}

pub fn ann(target: Expr, annotation: Expr, value: Option<Expr>) -> Stmt {
    Stmt::AnnAssign {
        target,
        annotation,
        value,
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return { value: Some(value) }
}

pub fn ret_none() -> Stmt {
    Stmt::Return { value: None }
}

pub fn if_(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    Stmt::If { test, body, orelse }
}

pub fn for_(target: Expr, iter: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For(For {
        target,
        iter,
        body,
        orelse: Vec::new(),
    })
}

pub fn while_(test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        test,
        body,
        orelse: Vec::new(),
    }
}

pub fn raise(exc: Expr) -> Stmt {
    Stmt::Raise {
        exc: Some(exc),
        cause: None,
    }
}

pub fn pass() -> Stmt {
    Stmt::Pass
}

pub fn brk() -> Stmt {
    Stmt::Break
}

pub fn global(names: &[&str]) -> Stmt {
    Stmt::Global {
        names: names.iter().map(|n| (*n).to_owned()).collect(),
    }
}

// Functions

pub fn arg(name: &str) -> Arg {
    Arg {
        arg: name.to_owned(),
        annotation: None,
    }
}

pub fn arg_typed(name: &str, annotation: Expr) -> Arg {
    Arg {
        arg: name.to_owned(),
        annotation: Some(annotation),
    }
}

pub fn arguments(args: Vec<Arg>) -> Arguments {
    Arguments {
        args,
        ..Arguments::default()
    }
}

/// `def name(params): body` with unannotated parameters.
pub fn def(name: &str, params: &[&str], body: Vec<Stmt>) -> FunctionDef {
    def_typed(name, params.iter().map(|p| arg(p)).collect(), None, body)
}

pub fn def_typed(name: &str, args: Vec<Arg>, returns: Option<Expr>, body: Vec<Stmt>) -> FunctionDef {
    FunctionDef {
        name: name.to_owned(),
        args: arguments(args),
        body,
        decorator_list: Vec::new(),
        returns,
    }
}
