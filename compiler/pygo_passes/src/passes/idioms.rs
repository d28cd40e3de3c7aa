//! One-to-one renames from Python spellings to their Go counterparts.

use pygo_ir::{NodeId, NodeKind, SlotValue, Token};
use rustc_hash::FxHashSet;

use super::{callee_name, qualified};
use crate::walk::{Cx, Pass, Rewrite};

/// Uppercase the first letter: `floor` → `Floor`.
fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn rename(cx: &mut Cx<'_>, ident: NodeId, name: String) {
    if let NodeKind::Ident { name: current } = cx.arena.kind_mut(ident) {
        *current = name;
    }
}

/// `X(...)` → `NewX(...)` when the file declares `NewX`.
#[derive(Default)]
pub(crate) struct UseConstructorIfAvailable {
    functions: FxHashSet<String>,
}

impl Pass for UseConstructorIfAvailable {
    fn name(&self) -> &'static str {
        "UseConstructorIfAvailable"
    }

    fn enter(&mut self, cx: &mut Cx<'_>, id: NodeId) {
        if let NodeKind::File { decls, .. } = cx.arena.kind(id) {
            for &decl in decls {
                if let Some(NodeKind::FuncDecl { recv, name, .. }) = cx.arena.get(decl) {
                    if !recv.is_valid() {
                        self.functions.insert(name.clone());
                    }
                }
            }
        }
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(name) = callee_name(cx.arena, id) else {
            return Rewrite::Keep;
        };
        let constructor = format!("New{name}");
        if self.functions.contains(&constructor) {
            if let NodeKind::CallExpr { fun, .. } = cx.arena.kind(id) {
                let fun = *fun;
                rename(cx, fun, constructor);
            }
        }
        Rewrite::Keep
    }
}

/// `print(a, b)` → `fmt.Println(a, b)`
pub(crate) struct PrintToFmtPrintln;

impl Pass for PrintToFmtPrintln {
    fn name(&self) -> &'static str {
        "PrintToFmtPrintln"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        if callee_name(cx.arena, id) != Some("print") {
            return Rewrite::Keep;
        }
        let NodeKind::CallExpr { args, .. } = cx.arena.kind(id) else {
            return Rewrite::Keep;
        };
        // `sep=` and `end=` have no Println spelling.
        let keyword = args
            .iter()
            .any(|&a| cx.arena.meta(a).is_some_and(|m| m.keyword.is_some()));
        if keyword {
            return Rewrite::Keep;
        }
        let println = cx.arena.path("fmt.Println");
        cx.arena.kind_mut(id).set_slot(0, SlotValue::One(println));
        Rewrite::Keep
    }
}

/// `math.floor` → `math.Floor`
pub(crate) struct CapitalizeMathModuleCalls;

impl Pass for CapitalizeMathModuleCalls {
    fn name(&self) -> &'static str {
        "CapitalizeMathModuleCalls"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(("math", sel)) = qualified(cx.arena, id) else {
            return Rewrite::Keep;
        };
        if !sel.chars().all(|c| c.is_lowercase() || c.is_ascii_digit()) {
            return Rewrite::Keep;
        }
        let capitalized = title(sel);
        if let NodeKind::SelectorExpr { sel, .. } = cx.arena.kind_mut(id) {
            *sel = capitalized;
        }
        Rewrite::Keep
    }
}

/// `xs.append(v)` as a statement → `xs = append(xs, v)`
pub(crate) struct ReplacePythonStyleAppends;

impl Pass for ReplacePythonStyleAppends {
    fn name(&self) -> &'static str {
        "ReplacePythonStyleAppends"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let NodeKind::ExprStmt { x: call } = cx.arena.kind(id) else {
            return Rewrite::Keep;
        };
        let call = *call;
        let Some((target, "append")) = super::method_call(cx.arena, call) else {
            return Rewrite::Keep;
        };
        let NodeKind::CallExpr { args, .. } = cx.arena.kind(call) else {
            return Rewrite::Keep;
        };
        let args = args.clone();
        let current = cx.arena.deep_copy(target);
        let mut all = vec![current];
        all.extend(args);
        let append = cx.arena.call_path("append", all);
        Rewrite::Replace(cx.arena.assign(vec![target], Token::Assign, vec![append]))
    }
}

/// Python type names left in signatures: `str` → `string`, `float` →
/// `float64`.
pub(crate) struct PythonToGoTypes;

impl Pass for PythonToGoTypes {
    fn name(&self) -> &'static str {
        "PythonToGoTypes"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let NodeKind::Field { ty, .. } = cx.arena.kind(id) else {
            return Rewrite::Keep;
        };
        let ty = *ty;
        let go_name = match cx.arena.ident_name(ty) {
            Some("str") => "string",
            Some("float") => "float64",
            _ => return Rewrite::Keep,
        };
        rename(cx, ty, go_name.to_owned());
        Rewrite::Keep
    }
}

/// `requests.get(url)` → `http.Get(url)`
pub(crate) struct RequestsToHttp;

impl Pass for RequestsToHttp {
    fn name(&self) -> &'static str {
        "RequestsToHttp"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::CallExpr { fun, .. } => {
                let fun = *fun;
                let Some(("requests", sel)) = qualified(cx.arena, fun) else {
                    return Rewrite::Keep;
                };
                let method = title(sel);
                let http = cx.arena.ident("http");
                cx.arena.set_kind(fun, NodeKind::SelectorExpr { x: http, sel: method });
            }
            NodeKind::ImportSpec { path, .. } if path == "requests" => {
                if let NodeKind::ImportSpec { path, .. } = cx.arena.kind_mut(id) {
                    "net/http".clone_into(path);
                }
            }
            _ => {}
        }
        Rewrite::Keep
    }
}

/// f-strings render through `text/template`; import it explicitly so the
/// formatter never picks `html/template`.
#[derive(Default)]
pub(crate) struct AddTextTemplateImportForFStrings {
    seen: bool,
}

const TEXT_TEMPLATE: &str = "text/template";

impl Pass for AddTextTemplateImportForFStrings {
    fn name(&self) -> &'static str {
        "AddTextTemplateImportForFStrings"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let NodeKind::CallExpr { fun, args, .. } = cx.arena.kind(id) else {
            return Rewrite::Keep;
        };
        if qualified(cx.arena, *fun) == Some(("template", "New"))
            && matches!(args.as_slice(), [name] if matches!(cx.arena.get(*name), Some(NodeKind::BasicLit { value, .. }) if value == "\"f\""))
        {
            self.seen = true;
        }
        Rewrite::Keep
    }

    fn finish(&mut self, cx: &mut Cx<'_>) {
        if !self.seen {
            return;
        }
        let root = cx.root;
        let NodeKind::File { decls, .. } = cx.arena.kind(root) else {
            return;
        };
        let mut imports = None;
        for &decl in decls {
            if let Some(NodeKind::GenDecl {
                tok: Token::Import,
                specs,
            }) = cx.arena.get(decl)
            {
                let present = specs.iter().any(|&s| {
                    matches!(cx.arena.get(s), Some(NodeKind::ImportSpec { path, .. }) if path == TEXT_TEMPLATE)
                });
                if present {
                    return;
                }
                imports.get_or_insert(decl);
            }
        }
        let spec = cx.arena.alloc(NodeKind::ImportSpec {
            name: None,
            path: TEXT_TEMPLATE.to_owned(),
        });
        match imports {
            Some(decl) => {
                if let NodeKind::GenDecl { specs, .. } = cx.arena.kind_mut(decl) {
                    specs.push(spec);
                }
            }
            None => {
                let decl = cx.arena.alloc(NodeKind::GenDecl {
                    tok: Token::Import,
                    specs: vec![spec],
                });
                if let NodeKind::File { decls, .. } = cx.arena.kind_mut(root) {
                    decls.insert(0, decl);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
