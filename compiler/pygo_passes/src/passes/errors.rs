//! Error results Python raises instead of returning.
//!
//! Calls that return `(value, error)` in Go are first wrapped so that the
//! error lands in a placeholder name (`UNHANDLED_ERROR`). The last pass
//! here turns every placeholder into `err` followed by a panic check.

use pygo_ir::{directive, GoType, NodeId, NodeKind, SlotValue, Token};
use rustc_hash::FxHashMap;

use super::{call_args, method_call, qualified};
use crate::walk::{Cx, Pass, Rewrite};

/// `func() T { value, UNHANDLED_ERROR := call; return convert(value) }()`
fn checked(cx: &mut Cx<'_>, value: &str, call: NodeId, result: &GoType, convert: bool) -> NodeId {
    let name = cx.arena.ident(value);
    let placeholder = cx.arena.ident(directive::UNHANDLED_ERROR);
    let assign = cx.arena.assign(vec![name, placeholder], Token::Define, vec![call]);
    let name = cx.arena.ident(value);
    let out = if convert {
        cx.arena.convert(result, name)
    } else {
        name
    };
    let ret = cx.arena.ret(vec![out]);
    let results = cx.arena.results_for(result);
    cx.arena.iife(results, vec![assign, ret])
}

fn is_http_response(ty: Option<GoType>) -> bool {
    ty == Some(GoType::pointer(GoType::qualified("http", "Response")))
}

/// Requests through `net/http` return an error alongside the response.
pub(crate) struct HttpErrors;

impl Pass for HttpErrors {
    fn name(&self) -> &'static str {
        "HttpErrors"
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::AssignStmt { lhs, rhs, .. } if lhs.len() == 1 && rhs.len() == 1 => {
                let call = rhs[0];
                let Some(NodeKind::CallExpr { fun, .. }) = cx.arena.get(call) else {
                    return Rewrite::Keep;
                };
                if !matches!(qualified(cx.arena, *fun), Some(("http", _))) {
                    return Rewrite::Keep;
                }
                let placeholder = cx.arena.ident(directive::UNHANDLED_HTTP_ERROR);
                if let NodeKind::AssignStmt { lhs, .. } = cx.arena.kind_mut(id) {
                    lhs.push(placeholder);
                }
                Rewrite::Keep
            }
            NodeKind::SelectorExpr { x, sel } => {
                let (x, sel) = (*x, sel.clone());
                if !is_http_response(cx.type_of(x)) {
                    return Rewrite::Keep;
                }
                match sel.as_str() {
                    "text" | "content" => {
                        let resp = cx.arena.deep_copy(x);
                        let body = cx.arena.sel(resp, "Body");
                        let read = cx.arena.call_path("ioutil.ReadAll", vec![body]);
                        if sel == "text" {
                            Rewrite::Replace(checked(cx, "body", read, &GoType::STRING, true))
                        } else {
                            let bytes = GoType::slice(GoType::BYTE);
                            Rewrite::Replace(checked(cx, "body", read, &bytes, false))
                        }
                    }
                    "status_code" => {
                        if let NodeKind::SelectorExpr { sel, .. } = cx.arena.kind_mut(id) {
                            "StatusCode".clone_into(sel);
                        }
                        Rewrite::Keep
                    }
                    _ => Rewrite::Keep,
                }
            }
            _ => Rewrite::Keep,
        }
    }
}

/// File operations: opening, writing, reading, and the byte/string
/// conversions that go with them.
#[derive(Default)]
pub(crate) struct FileWritesAndErrors {
    /// Whether each file variable was opened in text mode.
    text_mode: FxHashMap<String, bool>,
}

impl FileWritesAndErrors {
    fn mode_of(&self, cx: &Cx<'_>, file: NodeId) -> Option<bool> {
        if let Some(mode) = cx.arena.meta(file).and_then(|m| m.text_mode) {
            return Some(mode);
        }
        cx.arena
            .ident_name(file)
            .and_then(|name| self.text_mode.get(name).copied())
    }

    fn is_file(&self, cx: &Cx<'_>, x: NodeId) -> bool {
        self.mode_of(cx, x).is_some()
            || cx.type_of(x) == Some(GoType::pointer(GoType::qualified("os", "File")))
    }

    /// `os.OpenFile(...)` → `func() *os.File { f, UNHANDLED_ERROR := ...; return f }()`
    fn open(cx: &mut Cx<'_>, call: NodeId) -> NodeId {
        let mode = cx.arena.meta(call).and_then(|m| m.text_mode);
        // The call itself returns a pair; only the wrapper is a file.
        cx.arena.clear_ty(call);
        let file = GoType::pointer(GoType::qualified("os", "File"));
        let wrapped = checked(cx, "f", call, &file, false);
        cx.arena.meta_mut(wrapped).text_mode = mode;
        wrapped
    }

    fn write(&self, cx: &mut Cx<'_>, file: NodeId, args: Vec<NodeId>) -> NodeId {
        let text = match self.mode_of(cx, file) {
            Some(text) => text,
            None => args
                .first()
                .is_some_and(|&a| cx.type_of(a).is_some_and(|t| t.is_string())),
        };
        let method = if text { "WriteString" } else { "Write" };
        let fun = cx.arena.sel(file, method);
        let call = cx.arena.call(fun, args);
        checked(cx, "n", call, &GoType::INT, false)
    }

    fn read(&self, cx: &mut Cx<'_>, file: NodeId) -> NodeId {
        let text = self.mode_of(cx, file).unwrap_or(true);
        let read = cx.arena.call_path("ioutil.ReadAll", vec![file]);
        if text {
            checked(cx, "content", read, &GoType::STRING, true)
        } else {
            checked(cx, "content", read, &GoType::slice(GoType::BYTE), false)
        }
    }
}

impl Pass for FileWritesAndErrors {
    fn name(&self) -> &'static str {
        "FileWritesAndErrors"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn scoped(&self) -> bool {
        true
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::AssignStmt { lhs, rhs, .. } => {
                for (&target, &value) in lhs.iter().zip(rhs) {
                    let mode = cx.arena.meta(value).and_then(|m| m.text_mode);
                    if let (Some(name), Some(mode)) = (cx.arena.ident_name(target), mode) {
                        self.text_mode.insert(name.to_owned(), mode);
                    }
                }
                Rewrite::Keep
            }
            NodeKind::CallExpr { fun, .. } => {
                let fun = *fun;
                if qualified(cx.arena, fun) == Some(("os", "OpenFile")) {
                    return Rewrite::Replace(Self::open(cx, id));
                }
                let Some((x, method)) = method_call(cx.arena, id) else {
                    return Rewrite::Keep;
                };
                let method = method.to_owned();
                let args = call_args(cx.arena, id);
                match (method.as_str(), args.len()) {
                    ("write", 1) if self.is_file(cx, x) => {
                        Rewrite::Replace(self.write(cx, x, args))
                    }
                    ("read", 0) if self.is_file(cx, x) => Rewrite::Replace(self.read(cx, x)),
                    ("close", 0) if self.is_file(cx, x) => {
                        let close = cx.arena.sel(x, "Close");
                        Rewrite::Replace(cx.arena.call(close, Vec::new()))
                    }
                    ("decode", 0 | 1) => {
                        Rewrite::Replace(cx.arena.convert(&GoType::STRING, x))
                    }
                    ("encode", 0 | 1) => {
                        let bytes = GoType::slice(GoType::BYTE);
                        Rewrite::Replace(cx.arena.convert(&bytes, x))
                    }
                    _ => Rewrite::Keep,
                }
            }
            _ => Rewrite::Keep,
        }
    }
}

/// `v, UNHANDLED_ERROR := f()` → `v, err := f()` plus
/// `if err != nil { panic(err) }`, and `defer v.Body.Close()` for HTTP
/// responses.
pub(crate) struct HandleUnhandledErrorsAndDefers;

impl HandleUnhandledErrorsAndDefers {
    /// Rename placeholders in `stmt`. Returns the statements to follow it,
    /// or `None` if it had no placeholder.
    fn handle(cx: &mut Cx<'_>, stmt: NodeId) -> Option<Vec<NodeId>> {
        let Some(NodeKind::AssignStmt { lhs, .. }) = cx.arena.get(stmt) else {
            return None;
        };
        let lhs = lhs.clone();
        let mut handled = false;
        let mut defers = Vec::new();
        for &target in &lhs {
            let http = match cx.arena.ident_name(target) {
                Some(directive::UNHANDLED_ERROR) => false,
                Some(directive::UNHANDLED_HTTP_ERROR) => true,
                _ => continue,
            };
            if http {
                let resp = cx.arena.deep_copy(lhs[0]);
                let body = cx.arena.sel(resp, "Body");
                let close = cx.arena.sel(body, "Close");
                let call = cx.arena.call(close, Vec::new());
                defers.push(cx.arena.defer_stmt(call));
            }
            cx.arena.set_kind(
                target,
                NodeKind::Ident {
                    name: "err".to_owned(),
                },
            );
            handled = true;
        }
        if !handled {
            return None;
        }
        let err = cx.arena.ident("err");
        let nil = cx.arena.nil();
        let failed = cx.arena.binary(err, Token::Neq, nil);
        let err = cx.arena.ident("err");
        let panic = cx.arena.panic_stmt(err);
        let check = cx.arena.if_stmt(failed, vec![panic], NodeId::INVALID);
        let mut follow = vec![check];
        follow.extend(defers);
        Some(follow)
    }
}

impl Pass for HandleUnhandledErrorsAndDefers {
    fn name(&self) -> &'static str {
        "HandleUnhandledErrorsAndDefers"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let (slot, list) = match cx.arena.get(id) {
            Some(NodeKind::BlockStmt { list }) => (0, list.clone()),
            Some(NodeKind::CaseClause { body, .. }) => (1, body.clone()),
            _ => return Rewrite::Keep,
        };
        let mut out = Vec::with_capacity(list.len());
        let mut changed = false;
        for stmt in list {
            out.push(stmt);
            if let Some(follow) = Self::handle(cx, stmt) {
                out.extend(follow);
                changed = true;
            }
        }
        if changed {
            cx.arena.kind_mut(id).set_slot(slot, SlotValue::Many(out));
        }
        Rewrite::Keep
    }
}

#[cfg(test)]
mod tests;
