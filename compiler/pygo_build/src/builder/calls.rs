//! Calls that are not template instantiations.

use pygo_ir::{directive, GoType, MetaFlags, NodeId, NodeKind, Token};
use pygo_py::{Call, Constant, Expr};

use super::{literals, Builder, Decline, Outcome};

fn as_call(expr: &Expr) -> Outcome<&Call> {
    match expr {
        Expr::Call(call) => Ok(call),
        _ => Err(Decline::Shape),
    }
}

/// Callee name of a call to a bare name that is not a module-level
/// definition.
fn builtin_name<'c>(b: &Builder<'_>, call: &'c Call) -> Option<&'c str> {
    call.func.as_name().filter(|id| !b.is_user_defined(id))
}

fn string_arg(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Constant {
            value: Constant::Str(s),
        } => Some(s),
        _ => None,
    }
}

/// `PYGO_RUNE("c")` → `'c'`
pub(super) fn rune(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    if call.func.as_name() != Some(directive::RUNE) {
        return Err(Decline::Shape);
    }
    let [arg] = call.args.as_slice() else {
        return Err(Decline::Shape);
    };
    let Some(c) = string_arg(arg).and_then(|s| {
        let mut chars = s.chars();
        chars.next().filter(|_| chars.next().is_none())
    }) else {
        return Err(Decline::Shape);
    };
    Ok(b.arena.lit(Token::Char, quote_rune(c)))
}

fn quote_rune(c: char) -> String {
    match c {
        '\'' => "'\\''".to_owned(),
        '\\' => "'\\\\'".to_owned(),
        '\n' => "'\\n'".to_owned(),
        '\r' => "'\\r'".to_owned(),
        '\t' => "'\\t'".to_owned(),
        c => format!("'{c}'"),
    }
}

/// `PYGO_NOSNIPPET(f)(args)` → `f(args)` with snippet lookup off.
pub(super) fn no_snippet(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    let Expr::Call(marker) = call.func.as_ref() else {
        return Err(Decline::Shape);
    };
    let (Some(directive::NO_SNIPPET), [callee]) = (marker.func.as_name(), marker.args.as_slice())
    else {
        return Err(Decline::Shape);
    };
    let id = call_with(b, callee, call)?;
    b.arena.meta_mut(id).flags |= MetaFlags::NO_SNIPPET;
    Ok(id)
}

/// `list()`, `str()`, `set()` ... → the type's zero literal.
pub(super) fn zero_value(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    if !call.args.is_empty() || !call.keywords.is_empty() {
        return Err(Decline::Shape);
    }
    let Some(name) = builtin_name(b, call) else {
        return Err(Decline::Shape);
    };
    literals::zero_value(b, name).ok_or(Decline::Shape)
}

/// `isinstance(x, T)` → `func() bool { switch x.(type) { case T: return
/// true }; return false }()`
pub(super) fn isinstance(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    if builtin_name(b, call) != Some("isinstance") {
        return Err(Decline::Shape);
    }
    let [subject, types] = call.args.as_slice() else {
        return Err(Decline::Shape);
    };
    let x = b.expr(subject)?;
    let types = b.type_list(types)?;
    let yes = b.arena.bool_lit(true);
    let ret_yes = b.arena.ret(vec![yes]);
    let case = b.arena.case_clause(types, vec![ret_yes]);
    let switch = b.type_switch(x, vec![case]);
    let no = b.arena.bool_lit(false);
    let ret_no = b.arena.ret(vec![no]);
    let results = b.arena.results_for(&GoType::BOOL);
    Ok(b.arena.iife(results, vec![switch, ret_no]))
}

/// `open(path, mode)` → `os.OpenFile(path, flags, 0o777)`
pub(super) fn open(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    if builtin_name(b, call) != Some("open") {
        return Err(Decline::Shape);
    }
    let keyword = |name: &str| {
        call.keywords
            .iter()
            .find(|k| k.arg.as_deref() == Some(name))
            .map(|k| &k.value)
    };
    let Some(path) = call.args.first().or_else(|| keyword("file")) else {
        return Err(Decline::Shape);
    };
    let mode = match call.args.get(1).or_else(|| keyword("mode")) {
        None => "r",
        Some(e) => string_arg(e).ok_or(Decline::Shape)?,
    };
    let Some(flags) = open_flags(mode) else {
        return Err(Decline::Shape);
    };
    let path = b.expr(path)?;
    let mut flag_expr = b.arena.path(&format!("os.{}", flags[0]));
    for flag in &flags[1..] {
        let next = b.arena.path(&format!("os.{flag}"));
        flag_expr = b.arena.binary(flag_expr, Token::Or, next);
    }
    let perm = b.arena.lit(Token::Int, "0o777");
    let id = b.arena.call_path("os.OpenFile", vec![path, flag_expr, perm]);
    b.arena.meta_mut(id).text_mode = Some(!mode.contains('b'));
    b.arena
        .set_ty(id, GoType::pointer(GoType::qualified("os", "File")));
    Ok(id)
}

/// `os` open flags for a Python file mode.
fn open_flags(mode: &str) -> Option<&'static [&'static str]> {
    let base: String = mode.chars().filter(|c| !matches!(c, 'b' | 't')).collect();
    Some(match base.as_str() {
        "r" => &["O_RDONLY"],
        "r+" => &["O_RDWR"],
        "w" => &["O_WRONLY", "O_TRUNC", "O_CREATE"],
        "w+" => &["O_RDWR", "O_TRUNC", "O_CREATE"],
        "a" => &["O_WRONLY", "O_APPEND", "O_CREATE"],
        "a+" => &["O_RDWR", "O_APPEND", "O_CREATE"],
        "x" => &["O_WRONLY", "O_EXCL", "O_CREATE"],
        "x+" => &["O_RDWR", "O_EXCL", "O_CREATE"],
        _ => return None,
    })
}

/// Any other call, built as written.
pub(super) fn plain(b: &mut Builder<'_>, expr: &Expr) -> Outcome<NodeId> {
    let call = as_call(expr)?;
    call_with(b, &call.func, call)
}

/// Build `call` with `callee` as the function. A trailing `*args` becomes
/// a spread; keyword arguments keep their names in metadata.
fn call_with(b: &mut Builder<'_>, callee: &Expr, call: &Call) -> Outcome<NodeId> {
    if call.keywords.iter().any(|k| k.arg.is_none()) {
        return Err(Decline::Shape);
    }
    let last = call.args.len().saturating_sub(1);
    let mut spread = false;
    for (i, arg) in call.args.iter().enumerate() {
        if matches!(arg, Expr::Starred { .. }) {
            if i != last {
                return Err(Decline::Shape);
            }
            spread = true;
        }
    }
    let fun = b.expr(callee)?;
    let mut args = Vec::with_capacity(call.args.len() + call.keywords.len());
    for arg in &call.args {
        let arg = match arg {
            Expr::Starred { value } => value.as_ref(),
            other => other,
        };
        args.push(b.expr(arg)?);
    }
    for keyword in &call.keywords {
        let value = b.expr(&keyword.value)?;
        b.arena.meta_mut(value).keyword = keyword.arg.clone();
        args.push(value);
    }
    Ok(b.arena.alloc(NodeKind::CallExpr {
        fun,
        args,
        ellipsis: spread,
    }))
}
