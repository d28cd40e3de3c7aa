//! Python source rendering for diagnostics.
//!
//! Output is close to `ast.unparse` for the constructs that show up in
//! error messages. It is not meant to round-trip.

use std::fmt::{self, Write as _};

use crate::ast::{
    Arguments, BoolOperator, CmpOperator, Constant, Expr, Operator, Pattern, Stmt, UnaryOperator,
};

impl Operator {
    pub fn text(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mult => "*",
            Operator::MatMult => "@",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitAnd => "&",
            Operator::FloorDiv => "//",
        }
    }
}

impl CmpOperator {
    pub fn text(self) -> &'static str {
        match self {
            CmpOperator::Eq => "==",
            CmpOperator::NotEq => "!=",
            CmpOperator::Lt => "<",
            CmpOperator::LtE => "<=",
            CmpOperator::Gt => ">",
            CmpOperator::GtE => ">=",
            CmpOperator::Is => "is",
            CmpOperator::IsNot => "is not",
            CmpOperator::In => "in",
            CmpOperator::NotIn => "not in",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) | Constant::Float(v) | Constant::Unsupported(v) => write!(f, "{v}"),
            Constant::Str(s) => write!(f, "{s:?}"),
            Constant::Bool(true) => write!(f, "True"),
            Constant::Bool(false) => write!(f, "False"),
            Constant::None => write!(f, "None"),
            Constant::Bytes(bytes) => write!(f, "b{:?}", String::from_utf8_lossy(bytes)),
            Constant::Complex { real, imag } => write!(f, "({real}+{imag}j)"),
            Constant::Ellipsis => write!(f, "..."),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, exprs: &[Expr], sep: &str) -> fmt::Result {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{e}")?;
    }
    Ok(())
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &Arguments) -> fmt::Result {
    let names: Vec<&str> = args
        .positional()
        .chain(&args.kwonlyargs)
        .map(|a| a.arg.as_str())
        .collect();
    write!(f, "{}", names.join(", "))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::BoolOp { op, values } => {
                let sep = match op {
                    BoolOperator::And => " and ",
                    BoolOperator::Or => " or ",
                };
                join(f, values, sep)
            }
            Expr::NamedExpr { target, value } => write!(f, "({target} := {value})"),
            Expr::BinOp { left, op, right } => write!(f, "{left} {} {right}", op.text()),
            Expr::UnaryOp { op, operand } => match op {
                UnaryOperator::Not => write!(f, "not {operand}"),
                UnaryOperator::Invert => write!(f, "~{operand}"),
                UnaryOperator::UAdd => write!(f, "+{operand}"),
                UnaryOperator::USub => write!(f, "-{operand}"),
            },
            Expr::Lambda { args, body } => {
                write!(f, "lambda ")?;
                write_args(f, args)?;
                write!(f, ": {body}")
            }
            Expr::IfExp { test, body, orelse } => write!(f, "{body} if {test} else {orelse}"),
            Expr::Dict { keys, values } => {
                write!(f, "{{")?;
                for (i, (k, v)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match k {
                        Some(k) => write!(f, "{k}: {v}")?,
                        None => write!(f, "**{v}")?,
                    }
                }
                write!(f, "}}")
            }
            Expr::Set { elts } => {
                write!(f, "{{")?;
                join(f, elts, ", ")?;
                write!(f, "}}")
            }
            Expr::ListComp { elt, generators } => {
                write!(f, "[{elt}")?;
                write_generators(f, generators)?;
                write!(f, "]")
            }
            Expr::SetComp { elt, generators } => {
                write!(f, "{{{elt}")?;
                write_generators(f, generators)?;
                write!(f, "}}")
            }
            Expr::DictComp {
                key,
                value,
                generators,
            } => {
                write!(f, "{{{key}: {value}")?;
                write_generators(f, generators)?;
                write!(f, "}}")
            }
            Expr::GeneratorExp { elt, generators } => {
                write!(f, "({elt}")?;
                write_generators(f, generators)?;
                write!(f, ")")
            }
            Expr::Await { value } => write!(f, "await {value}"),
            Expr::Yield { value: Some(v) } => write!(f, "yield {v}"),
            Expr::Yield { value: None } => write!(f, "yield"),
            Expr::YieldFrom { value } => write!(f, "yield from {value}"),
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                write!(f, "{left}")?;
                for (op, right) in ops.iter().zip(comparators) {
                    write!(f, " {} {right}", op.text())?;
                }
                Ok(())
            }
            Expr::Call(call) => {
                write!(f, "{}(", call.func)?;
                join(f, &call.args, ", ")?;
                for (i, kw) in call.keywords.iter().enumerate() {
                    if i > 0 || !call.args.is_empty() {
                        write!(f, ", ")?;
                    }
                    match &kw.arg {
                        Some(arg) => write!(f, "{arg}={}", kw.value)?,
                        None => write!(f, "**{}", kw.value)?,
                    }
                }
                write!(f, ")")
            }
            Expr::FormattedValue { value, .. } => write!(f, "{{{value}}}"),
            Expr::JoinedStr { values } => {
                let mut text = String::new();
                for v in values {
                    match v {
                        Expr::Constant {
                            value: Constant::Str(s),
                        } => text.push_str(s),
                        other => write!(text, "{other}")?,
                    }
                }
                write!(f, "f{text:?}")
            }
            Expr::Constant { value } => write!(f, "{value}"),
            Expr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Expr::Subscript { value, slice } => write!(f, "{value}[{slice}]"),
            Expr::Starred { value } => write!(f, "*{value}"),
            Expr::Name { id } => write!(f, "{id}"),
            Expr::List { elts } => {
                write!(f, "[")?;
                join(f, elts, ", ")?;
                write!(f, "]")
            }
            Expr::Tuple { elts } => {
                write!(f, "(")?;
                join(f, elts, ", ")?;
                if elts.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Expr::Slice { lower, upper, step } => {
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                write!(f, ":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                if let Some(step) = step {
                    write!(f, ":{step}")?;
                }
                Ok(())
            }
            Expr::Unsupported { source, .. } => write!(f, "{source}"),
        }
    }
}

fn write_generators(
    f: &mut fmt::Formatter<'_>,
    generators: &[crate::ast::Comprehension],
) -> fmt::Result {
    for gen in generators {
        write!(f, " for {} in {}", gen.target, gen.iter)?;
        for cond in &gen.ifs {
            write!(f, " if {cond}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::MatchValue { value } => write!(f, "{value}"),
            Pattern::MatchSingleton { value } => write!(f, "{value}"),
            Pattern::MatchAs {
                pattern: None,
                name: None,
            } => write!(f, "_"),
            Pattern::MatchAs {
                pattern: None,
                name: Some(name),
            } => write!(f, "{name}"),
            Pattern::MatchAs {
                pattern: Some(pattern),
                name,
            } => write!(f, "{pattern} as {}", name.as_deref().unwrap_or("_")),
            Pattern::MatchOr { patterns } => {
                for (i, p) in patterns.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            Pattern::Unsupported { source, .. } => write!(f, "{source}"),
        }
    }
}

/// Render a statement (and its nested blocks) at the given indentation.
pub fn unparse_stmt(stmt: &Stmt, indent: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_stmt(&mut out, stmt, indent);
    out
}

fn write_block(out: &mut String, body: &[Stmt], indent: usize) -> fmt::Result {
    for stmt in body {
        write_stmt(out, stmt, indent)?;
    }
    Ok(())
}

fn write_stmt(out: &mut String, stmt: &Stmt, indent: usize) -> fmt::Result {
    let pad = "    ".repeat(indent);
    match stmt {
        Stmt::FunctionDef(def) | Stmt::AsyncFunctionDef(def) => {
            let prefix = if matches!(stmt, Stmt::AsyncFunctionDef(_)) {
                "async "
            } else {
                ""
            };
            let params: Vec<&str> = def.args.positional().map(|a| a.arg.as_str()).collect();
            writeln!(out, "{pad}{prefix}def {}({}):", def.name, params.join(", "))?;
            write_block(out, &def.body, indent + 1)
        }
        Stmt::ClassDef(class) => {
            writeln!(out, "{pad}class {}:", class.name)?;
            write_block(out, &class.body, indent + 1)
        }
        Stmt::Return { value: Some(v) } => writeln!(out, "{pad}return {v}"),
        Stmt::Return { value: None } => writeln!(out, "{pad}return"),
        Stmt::Delete { targets } => {
            let targets: Vec<String> = targets.iter().map(ToString::to_string).collect();
            writeln!(out, "{pad}del {}", targets.join(", "))
        }
        Stmt::Assign { targets, value } => {
            write!(out, "{pad}")?;
            for t in targets {
                write!(out, "{t} = ")?;
            }
            writeln!(out, "{value}")
        }
        Stmt::AugAssign { target, op, value } => {
            writeln!(out, "{pad}{target} {}= {value}", op.text())
        }
        Stmt::AnnAssign {
            target,
            annotation,
            value,
        } => match value {
            Some(v) => writeln!(out, "{pad}{target}: {annotation} = {v}"),
            None => writeln!(out, "{pad}{target}: {annotation}"),
        },
        Stmt::For(f) => {
            writeln!(out, "{pad}for {} in {}:", f.target, f.iter)?;
            write_block(out, &f.body, indent + 1)
        }
        Stmt::While { test, body, .. } => {
            writeln!(out, "{pad}while {test}:")?;
            write_block(out, body, indent + 1)
        }
        Stmt::If { test, body, orelse } => {
            writeln!(out, "{pad}if {test}:")?;
            write_block(out, body, indent + 1)?;
            if !orelse.is_empty() {
                writeln!(out, "{pad}else:")?;
                write_block(out, orelse, indent + 1)?;
            }
            Ok(())
        }
        Stmt::With { items, body } => {
            let items: Vec<String> = items
                .iter()
                .map(|item| match &item.optional_vars {
                    Some(v) => format!("{} as {v}", item.context_expr),
                    None => item.context_expr.to_string(),
                })
                .collect();
            writeln!(out, "{pad}with {}:", items.join(", "))?;
            write_block(out, body, indent + 1)
        }
        Stmt::Match { subject, cases } => {
            writeln!(out, "{pad}match {subject}:")?;
            for case in cases {
                writeln!(out, "{pad}    case {}:", case.pattern)?;
                write_block(out, &case.body, indent + 2)?;
            }
            Ok(())
        }
        Stmt::Raise { exc: Some(e), .. } => writeln!(out, "{pad}raise {e}"),
        Stmt::Raise { exc: None, .. } => writeln!(out, "{pad}raise"),
        Stmt::Try(t) => {
            writeln!(out, "{pad}try:")?;
            write_block(out, &t.body, indent + 1)?;
            for h in &t.handlers {
                match (&h.typ, &h.name) {
                    (Some(typ), Some(name)) => writeln!(out, "{pad}except {typ} as {name}:")?,
                    (Some(typ), None) => writeln!(out, "{pad}except {typ}:")?,
                    _ => writeln!(out, "{pad}except:")?,
                }
                write_block(out, &h.body, indent + 1)?;
            }
            if !t.finalbody.is_empty() {
                writeln!(out, "{pad}finally:")?;
                write_block(out, &t.finalbody, indent + 1)?;
            }
            Ok(())
        }
        Stmt::Assert { test, msg } => match msg {
            Some(m) => writeln!(out, "{pad}assert {test}, {m}"),
            None => writeln!(out, "{pad}assert {test}"),
        },
        Stmt::Import { names } => {
            let names: Vec<&str> = names.iter().map(|a| a.name.as_str()).collect();
            writeln!(out, "{pad}import {}", names.join(", "))
        }
        Stmt::ImportFrom { module, names } => {
            let names: Vec<&str> = names.iter().map(|a| a.name.as_str()).collect();
            writeln!(
                out,
                "{pad}from {} import {}",
                module.as_deref().unwrap_or("."),
                names.join(", ")
            )
        }
        Stmt::Global { names } => writeln!(out, "{pad}global {}", names.join(", ")),
        Stmt::Nonlocal { names } => writeln!(out, "{pad}nonlocal {}", names.join(", ")),
        Stmt::Expr { value } => writeln!(out, "{pad}{value}"),
        Stmt::Pass => writeln!(out, "{pad}pass"),
        Stmt::Break => writeln!(out, "{pad}break"),
        Stmt::Continue => writeln!(out, "{pad}continue"),
        Stmt::Unsupported { source, .. } => writeln!(out, "{pad}{source}"),
    }
}
