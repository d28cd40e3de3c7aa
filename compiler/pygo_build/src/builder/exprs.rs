//! Attribute access, subscripts, and the expressions that lower to
//! function literals: lambdas, conditional expressions, f-strings.

use pygo_ir::{GoType, MetaFlags, NodeId, NodeKind, Token};
use pygo_py::{Constant, Expr, UnaryOperator};

use super::{Builder, Decline, Outcome};

pub(super) fn attribute(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Attribute { value, attr } = expr else {
        return Err(Decline::Shape);
    };
    let x = b.expr(value)?;
    Ok(b.arena.sel(x, attr))
}

/// `xs[lo:hi]`. Steps have no Go slice form.
pub(super) fn slice(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Subscript { value, slice } = expr else {
        return Err(Decline::Shape);
    };
    let Expr::Slice { lower, upper, step } = slice.as_ref() else {
        return Err(Decline::Shape);
    };
    if step.is_some() {
        return Err(Decline::Shape);
    }
    let x = b.expr(value)?;
    let low = bound(b, x, lower.as_deref())?;
    let high = bound(b, x, upper.as_deref())?;
    Ok(b.arena.alloc(NodeKind::SliceExpr {
        x,
        low,
        high,
        max: NodeId::INVALID,
        slice3: false,
    }))
}

fn bound(b: &mut Builder<'_>, x: NodeId, expr: Option<&Expr>) -> Outcome<NodeId> {
    match expr {
        None => Ok(NodeId::INVALID),
        Some(e) => position(b, x, e),
    }
}

/// An index into `x`. A negative literal counts from the end:
/// `xs[-1]` → `xs[len(xs) - 1]`.
fn position(b: &mut Builder<'_>, x: NodeId, index: &Expr) -> Outcome<NodeId> {
    if let Expr::UnaryOp {
        op: UnaryOperator::USub,
        operand,
    } = index
    {
        if let Expr::Constant {
            value: Constant::Int(n),
        } = operand.as_ref()
        {
            let seq = b.arena.deep_copy(x);
            let len = b.arena.call_path("len", vec![seq]);
            let n = b.arena.lit(Token::Int, n.replace('_', ""));
            return Ok(b.arena.binary(len, Token::Sub, n));
        }
    }
    Ok(b.expr(index)?)
}

pub(super) fn index(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Subscript { value, slice } = expr else {
        return Err(Decline::Shape);
    };
    if matches!(slice.as_ref(), Expr::Slice { .. }) {
        return Err(Decline::Shape);
    }
    let x = b.expr(value)?;
    let index = position(b, x, slice)?;
    Ok(b.arena.index(x, index))
}

/// `(x := v)` → a placeholder carrying `x := v`, hoisted into an init
/// statement by the rewrite passes.
pub(super) fn walrus(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::NamedExpr { target, value } = expr else {
        return Err(Decline::Shape);
    };
    let Some(name) = target.as_name() else {
        return Err(Decline::Shape);
    };
    let value = b.expr(value)?;
    let lhs = b.arena.ident(name);
    let assign = b.arena.define(lhs, value);
    let placeholder = b.arena.alloc(NodeKind::BadExpr);
    b.arena.meta_mut(placeholder).named = Some(assign);
    Ok(placeholder)
}

pub(super) fn await_(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Await { value } = expr else {
        return Err(Decline::Shape);
    };
    let x = b.expr(value)?;
    Ok(b.arena.recv(x))
}

/// `lambda x: body` → `func(x interface{}) T { return body }`
pub(super) fn lambda(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::Lambda { args, body } = expr else {
        return Err(Decline::Shape);
    };
    let params = b.parameters(args)?;
    let value = b.expr(body)?;
    let results = match b.static_type(value) {
        Some(ty) => b.arena.results_for(&ty),
        None => NodeId::INVALID,
    };
    let ty = b.arena.func_type(params.fields, results);
    b.arena.meta_mut(ty).defaults = params.defaults;
    let ret = b.arena.ret(vec![value]);
    Ok(b.arena.func_lit(ty, vec![ret]))
}

/// `a if c else b` → `func() T { if c { return a }; return b }()`
pub(super) fn if_exp(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::IfExp { test, body, orelse } = expr else {
        return Err(Decline::Shape);
    };
    let cond = b.expr(test)?;
    let then = b.expr(body)?;
    let other = b.expr(orelse)?;
    let results = b.result_of(&[then, other]);
    let ret_then = b.arena.ret(vec![then]);
    let check = b.arena.if_stmt(cond, vec![ret_then], NodeId::INVALID);
    let ret_other = b.arena.ret(vec![other]);
    Ok(b.arena.iife(results, vec![check, ret_other]))
}

/// `f"{x} and {y + 1}"` renders through `text/template`, with names as
/// keys and every other expression as `exprN`.
pub(super) fn f_string(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let Expr::JoinedStr { values } = expr else {
        return Err(Decline::Shape);
    };
    let mut template = String::new();
    let mut entries: Vec<(String, NodeId)> = Vec::new();
    let mut unnamed = 0;
    for part in values {
        match part {
            Expr::Constant {
                value: Constant::Str(text),
            } => template.push_str(&text.replace("{{", "{{\"{{\"}}")),
            Expr::FormattedValue { value, .. } => {
                let key = match value.as_name() {
                    Some(id) => id.to_owned(),
                    None => {
                        unnamed += 1;
                        format!("expr{}", unnamed - 1)
                    }
                };
                if !entries.iter().any(|(k, _)| *k == key) {
                    let built = b.expr(value)?;
                    entries.push((key.clone(), built));
                }
                template.push_str(&format!("{{{{.{key}}}}}"));
            }
            _ => return Err(Decline::Shape),
        }
    }
    Ok(render_template(b, &template, entries))
}

fn render_template(b: &mut Builder<'_>, template: &str, entries: Vec<(String, NodeId)>) -> NodeId {
    let arena = &mut b.arena;

    // var buf bytes.Buffer
    let buf = arena.ident("buf");
    let buffer = arena.path("bytes.Buffer");
    let spec = arena.alloc(NodeKind::ValueSpec {
        names: vec![buf],
        ty: buffer,
        values: Vec::new(),
    });
    let decl = arena.alloc(NodeKind::GenDecl {
        tok: Token::Var,
        specs: vec![spec],
    });
    let declare = arena.alloc(NodeKind::DeclStmt { decl });

    // err := template.Must(template.New("f").Parse(tmpl)).Execute(&buf, data)
    let name = arena.string_lit("f");
    let new = arena.call_path("template.New", vec![name]);
    let parse = arena.sel(new, "Parse");
    let text = arena.string_lit(template);
    let parsed = arena.call(parse, vec![text]);
    let must = arena.call_path("template.Must", vec![parsed]);
    let execute = arena.sel(must, "Execute");
    let key = arena.type_expr(&GoType::STRING);
    let value = arena.alloc(NodeKind::InterfaceType);
    arena.meta_mut(value).flags |= MetaFlags::PERMANENT_INTERFACE;
    let data_ty = arena.alloc(NodeKind::MapType { key, value });
    let pairs = entries
        .into_iter()
        .map(|(k, v)| {
            let k = arena.string_lit(&k);
            arena.key_value(k, v)
        })
        .collect();
    let data = arena.composite(data_ty, pairs);
    let buf_ref = arena.ident("buf");
    let buf_addr = arena.addr(buf_ref);
    let run = arena.call(execute, vec![buf_addr, data]);
    let err = arena.ident("err");
    let assign = arena.define(err, run);

    // if err != nil { panic(err) }
    let err = arena.ident("err");
    let nil = arena.nil();
    let failed = arena.binary(err, Token::Neq, nil);
    let err = arena.ident("err");
    let panic = arena.panic_stmt(err);
    let check = arena.if_stmt(failed, vec![panic], NodeId::INVALID);

    // return buf.String()
    let buf = arena.ident("buf");
    let string = arena.sel(buf, "String");
    let rendered = arena.call(string, Vec::new());
    let ret = arena.ret(vec![rendered]);

    let results = arena.results_for(&GoType::STRING);
    arena.iife(results, vec![declare, assign, check, ret])
}
