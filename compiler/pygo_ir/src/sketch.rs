//! One-line Go-like rendering of a subtree.
//!
//! Not Go source: statements are joined with `; `, blocks are written
//! inline, and placeholder tokens print as their Python spelling. Used in
//! trace output and in tests, where a compact textual form is easier to
//! assert on than a node graph.

use crate::{ChanDir, GoArena, NodeId, NodeKind};

impl GoArena {
    /// Render `id` as a compact single line.
    pub fn sketch(&self, id: NodeId) -> String {
        let mut out = String::new();
        Sketcher { arena: self, out: &mut out }.node(id);
        out
    }
}

struct Sketcher<'a> {
    arena: &'a GoArena,
    out: &'a mut String,
}

impl Sketcher<'_> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn list(&mut self, ids: &[NodeId], sep: &str) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.node(*id);
        }
    }

    fn block_body(&mut self, list: &[NodeId]) {
        if list.is_empty() {
            self.push("{}");
        } else {
            self.push("{ ");
            self.list(list, "; ");
            self.push(" }");
        }
    }

    fn block(&mut self, id: NodeId) {
        match self.arena.get(id) {
            Some(NodeKind::BlockStmt { list }) => {
                let list = list.clone();
                self.block_body(&list);
            }
            _ => self.push("{}"),
        }
    }

    fn results(&mut self, results: NodeId) {
        let Some(NodeKind::FieldList { list }) = self.arena.get(results) else {
            return;
        };
        if list.is_empty() {
            return;
        }
        let list = list.clone();
        let single_unnamed = list.len() == 1
            && matches!(self.arena.get(list[0]), Some(NodeKind::Field { names, .. }) if names.is_empty());
        self.push(" ");
        if single_unnamed {
            self.node(list[0]);
        } else {
            self.push("(");
            self.list(&list, ", ");
            self.push(")");
        }
    }

    fn signature(&mut self, ty: NodeId) {
        let Some(NodeKind::FuncType { params, results }) = self.arena.get(ty) else {
            self.push("()");
            return;
        };
        let (params, results) = (*params, *results);
        self.push("(");
        self.node(params);
        self.push(")");
        self.results(results);
    }

    fn node(&mut self, id: NodeId) {
        let Some(kind) = self.arena.get(id) else {
            return;
        };
        match kind.clone() {
            NodeKind::BadExpr => self.push("BadExpr"),
            NodeKind::BadStmt => self.push("BadStmt"),
            NodeKind::Ident { name } => self.push(&name),
            NodeKind::Ellipsis { elt } => {
                self.push("...");
                self.node(elt);
            }
            NodeKind::BasicLit { value, .. } => self.push(&value),
            NodeKind::FuncLit { ty, body } => {
                self.push("func");
                self.signature(ty);
                self.push(" ");
                self.block(body);
            }
            NodeKind::CompositeLit { ty, elts } => {
                self.node(ty);
                self.push("{");
                self.list(&elts, ", ");
                self.push("}");
            }
            NodeKind::ParenExpr { x } => {
                self.push("(");
                self.node(x);
                self.push(")");
            }
            NodeKind::SelectorExpr { x, sel } => {
                self.node(x);
                self.push(".");
                self.push(&sel);
            }
            NodeKind::IndexExpr { x, index } => {
                self.node(x);
                self.push("[");
                self.node(index);
                self.push("]");
            }
            NodeKind::SliceExpr {
                x,
                low,
                high,
                max,
                slice3,
            } => {
                self.node(x);
                self.push("[");
                self.node(low);
                self.push(":");
                self.node(high);
                if slice3 {
                    self.push(":");
                    self.node(max);
                }
                self.push("]");
            }
            NodeKind::TypeAssertExpr { x, ty } => {
                self.node(x);
                self.push(".(");
                if ty.is_valid() {
                    self.node(ty);
                } else {
                    self.push("type");
                }
                self.push(")");
            }
            NodeKind::CallExpr {
                fun,
                args,
                ellipsis,
            } => {
                self.node(fun);
                self.push("(");
                self.list(&args, ", ");
                if ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            NodeKind::StarExpr { x } => {
                self.push("*");
                self.node(x);
            }
            NodeKind::UnaryExpr { op, x } => {
                self.push(op.text());
                self.node(x);
            }
            NodeKind::BinaryExpr { x, op, y } => {
                self.node(x);
                self.push(" ");
                self.push(op.text());
                self.push(" ");
                self.node(y);
            }
            NodeKind::KeyValueExpr { key, value } => {
                self.node(key);
                self.push(": ");
                self.node(value);
            }
            NodeKind::ArrayType { len, elt } => {
                self.push("[");
                self.node(len);
                self.push("]");
                self.node(elt);
            }
            NodeKind::StructType { fields } => {
                let list = match self.arena.get(fields) {
                    Some(NodeKind::FieldList { list }) => list.clone(),
                    _ => Vec::new(),
                };
                if list.is_empty() {
                    self.push("struct{}");
                } else {
                    self.push("struct{ ");
                    self.list(&list, "; ");
                    self.push(" }");
                }
            }
            NodeKind::FuncType { .. } => {
                self.push("func");
                self.signature(id);
            }
            NodeKind::InterfaceType => self.push("interface{}"),
            NodeKind::MapType { key, value } => {
                self.push("map[");
                self.node(key);
                self.push("]");
                self.node(value);
            }
            NodeKind::ChanType { dir, value } => {
                self.push(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.node(value);
            }
            NodeKind::Field { names, ty } => {
                if !names.is_empty() {
                    self.list(&names, ", ");
                    self.push(" ");
                }
                self.node(ty);
            }
            NodeKind::FieldList { list } => self.list(&list, ", "),
            NodeKind::DeclStmt { decl } => self.node(decl),
            NodeKind::EmptyStmt => self.push(";"),
            NodeKind::ExprStmt { x } => self.node(x),
            NodeKind::SendStmt { chan, value } => {
                self.node(chan);
                self.push(" <- ");
                self.node(value);
            }
            NodeKind::IncDecStmt { x, tok } => {
                self.node(x);
                self.push(tok.text());
            }
            NodeKind::AssignStmt { lhs, tok, rhs } => {
                self.list(&lhs, ", ");
                self.push(" ");
                self.push(tok.text());
                self.push(" ");
                self.list(&rhs, ", ");
            }
            NodeKind::GoStmt { call } => {
                self.push("go ");
                self.node(call);
            }
            NodeKind::DeferStmt { call } => {
                self.push("defer ");
                self.node(call);
            }
            NodeKind::ReturnStmt { results } => {
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.list(&results, ", ");
                }
            }
            NodeKind::BranchStmt { tok } => self.push(tok.text()),
            NodeKind::BlockStmt { list } => self.block_body(&list),
            NodeKind::IfStmt {
                init,
                cond,
                body,
                els,
            } => {
                self.push("if ");
                if init.is_valid() {
                    self.node(init);
                    self.push("; ");
                }
                self.node(cond);
                self.push(" ");
                self.block(body);
                if els.is_valid() {
                    self.push(" else ");
                    self.node(els);
                }
            }
            NodeKind::CaseClause { list, body } => {
                if list.is_empty() {
                    self.push("default:");
                } else {
                    self.push("case ");
                    self.list(&list, ", ");
                    self.push(":");
                }
                if !body.is_empty() {
                    self.push(" ");
                    self.list(&body, "; ");
                }
            }
            NodeKind::SwitchStmt { init, tag, body } => {
                self.push("switch ");
                if init.is_valid() {
                    self.node(init);
                    self.push("; ");
                }
                if tag.is_valid() {
                    self.node(tag);
                    self.push(" ");
                }
                self.block(body);
            }
            NodeKind::TypeSwitchStmt { init, assign, body } => {
                self.push("switch ");
                if init.is_valid() {
                    self.node(init);
                    self.push("; ");
                }
                self.node(assign);
                self.push(" ");
                self.block(body);
            }
            NodeKind::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                self.push("for ");
                if init.is_valid() || post.is_valid() {
                    self.node(init);
                    self.push("; ");
                    self.node(cond);
                    self.push("; ");
                    self.node(post);
                    self.push(" ");
                } else if cond.is_valid() {
                    self.node(cond);
                    self.push(" ");
                }
                self.block(body);
            }
            NodeKind::RangeStmt {
                key,
                value,
                tok,
                x,
                body,
            } => {
                self.push("for ");
                if key.is_valid() {
                    self.node(key);
                    if value.is_valid() {
                        self.push(", ");
                        self.node(value);
                    }
                    self.push(" ");
                    self.push(tok.text());
                    self.push(" ");
                }
                self.push("range ");
                self.node(x);
                self.push(" ");
                self.block(body);
            }
            NodeKind::ImportSpec { name, path } => {
                if let Some(name) = name {
                    self.push(&name);
                    self.push(" ");
                }
                self.push(&crate::quote(&path));
            }
            NodeKind::ValueSpec { names, ty, values } => {
                self.list(&names, ", ");
                if ty.is_valid() {
                    self.push(" ");
                    self.node(ty);
                }
                if !values.is_empty() {
                    self.push(" = ");
                    self.list(&values, ", ");
                }
            }
            NodeKind::TypeSpec { name, ty } => {
                self.push(&name);
                self.push(" ");
                self.node(ty);
            }
            NodeKind::GenDecl { tok, specs } => {
                self.push(tok.text());
                self.push(" ");
                if specs.len() == 1 {
                    self.node(specs[0]);
                } else {
                    self.push("(");
                    self.list(&specs, "; ");
                    self.push(")");
                }
            }
            NodeKind::FuncDecl {
                recv,
                name,
                ty,
                body,
            } => {
                self.push("func ");
                if recv.is_valid() {
                    self.push("(");
                    self.node(recv);
                    self.push(") ");
                }
                self.push(&name);
                self.signature(ty);
                self.push(" ");
                self.block(body);
            }
            NodeKind::File { package, decls } => {
                self.push("package ");
                self.push(&package);
                for decl in decls {
                    self.push("\n");
                    self.node(decl);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
