//! Serialization bridge to Go's `go/ast`.
//!
//! [`dump`] writes the tree as one Go composite literal, `&ast.File { ... }`,
//! which [`program`] embeds in a Go program that prints it with
//! `go/printer`. Running that program is the renderer's job.
//!
//! Fields come out in `go/ast` declaration order. Fields that would be
//! zero in Go (missing children, empty lists, `false`) are left out, except
//! the field lists `go/printer` dereferences unconditionally.

use pygo_ir::{quote, ChanDir, GoArena, NodeId, NodeKind, Token};

/// `root` as a `go/ast` composite literal.
pub fn dump(arena: &GoArena, root: NodeId) -> String {
    Dumper { arena }.node(root)
}

const PROGRAM_HEAD: &str = r#"package main

import (
	"go/ast"
	"go/printer"
	"go/token"
	"os"
)

func main() {
	tree := "#;

const PROGRAM_TAIL: &str = r"
	fset := token.NewFileSet()
	err := printer.Fprint(os.Stdout, fset, tree)
	if err != nil {
		panic(err)
	}
}
";

/// A Go program that prints `dump` as source.
pub fn program(dump: &str) -> String {
    let mut out = String::with_capacity(PROGRAM_HEAD.len() + dump.len() + PROGRAM_TAIL.len());
    out.push_str(PROGRAM_HEAD);
    out.push_str(dump);
    out.push_str(PROGRAM_TAIL);
    out
}

/// Keyed fields of one composite literal.
#[derive(Default)]
struct Fields(Vec<(&'static str, String)>);

impl Fields {
    fn raw(&mut self, name: &'static str, value: String) {
        self.0.push((name, value));
    }

    fn ident(&mut self, name: &'static str, value: &str) {
        self.raw(name, ident(value));
    }

    fn token(&mut self, name: &'static str, tok: Token) {
        self.raw(name, format!("token.{}", tok.go_name()));
    }

    fn flag(&mut self, name: &'static str, value: bool) {
        if value {
            self.raw(name, "true".to_owned());
        }
    }

    fn finish(self, class: &str) -> String {
        if self.0.is_empty() {
            return format!("&ast.{class} {{}}");
        }
        let fields: Vec<String> = self
            .0
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        format!("&ast.{class} {{ {} }}", fields.join(", "))
    }
}

fn ident(name: &str) -> String {
    format!("&ast.Ident {{ Name: {} }}", quote(name))
}

struct Dumper<'a> {
    arena: &'a GoArena,
}

impl Dumper<'_> {
    fn one(&self, fields: &mut Fields, name: &'static str, id: NodeId) {
        if id.is_valid() {
            fields.raw(name, self.node(id));
        }
    }

    /// A typed slice: `[]ast.Expr { a, b }`.
    fn many(&self, fields: &mut Fields, name: &'static str, elt: &str, ids: &[NodeId]) {
        let items: Vec<String> = ids
            .iter()
            .filter(|id| id.is_valid())
            .map(|&id| self.node(id))
            .collect();
        if !items.is_empty() {
            fields.raw(name, format!("[]{elt} {{ {} }}", items.join(", ")));
        }
    }

    /// A field list `go/printer` needs even when empty.
    fn field_list(&self, fields: &mut Fields, name: &'static str, id: NodeId) {
        let value = if id.is_valid() {
            self.node(id)
        } else {
            "&ast.FieldList {}".to_owned()
        };
        fields.raw(name, value);
    }

    fn node(&self, id: NodeId) -> String {
        let kind = self.arena.kind(id);
        let mut f = Fields::default();
        match kind {
            NodeKind::BadExpr | NodeKind::BadStmt | NodeKind::EmptyStmt => {}
            NodeKind::Ident { name } => f.raw("Name", quote(name)),
            NodeKind::Ellipsis { elt } => self.one(&mut f, "Elt", *elt),
            NodeKind::BasicLit { kind, value } => {
                f.token("Kind", *kind);
                f.raw("Value", quote(value));
            }
            NodeKind::FuncLit { ty, body } => {
                self.one(&mut f, "Type", *ty);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::CompositeLit { ty, elts } => {
                self.one(&mut f, "Type", *ty);
                self.many(&mut f, "Elts", "ast.Expr", elts);
            }
            NodeKind::ParenExpr { x } | NodeKind::StarExpr { x } | NodeKind::ExprStmt { x } => {
                self.one(&mut f, "X", *x);
            }
            NodeKind::SelectorExpr { x, sel } => {
                self.one(&mut f, "X", *x);
                f.ident("Sel", sel);
            }
            NodeKind::IndexExpr { x, index } => {
                self.one(&mut f, "X", *x);
                self.one(&mut f, "Index", *index);
            }
            NodeKind::SliceExpr {
                x,
                low,
                high,
                max,
                slice3,
            } => {
                self.one(&mut f, "X", *x);
                self.one(&mut f, "Low", *low);
                self.one(&mut f, "High", *high);
                self.one(&mut f, "Max", *max);
                f.flag("Slice3", *slice3);
            }
            NodeKind::TypeAssertExpr { x, ty } => {
                self.one(&mut f, "X", *x);
                self.one(&mut f, "Type", *ty);
            }
            NodeKind::CallExpr {
                fun,
                args,
                ellipsis,
            } => {
                self.one(&mut f, "Fun", *fun);
                self.many(&mut f, "Args", "ast.Expr", args);
                // A non-zero position marks `f(xs...)`.
                if *ellipsis {
                    f.raw("Ellipsis", "1".to_owned());
                }
            }
            NodeKind::UnaryExpr { op, x } => {
                f.token("Op", *op);
                self.one(&mut f, "X", *x);
            }
            NodeKind::BinaryExpr { x, op, y } => {
                self.one(&mut f, "X", *x);
                f.token("Op", *op);
                self.one(&mut f, "Y", *y);
            }
            NodeKind::KeyValueExpr { key, value } => {
                self.one(&mut f, "Key", *key);
                self.one(&mut f, "Value", *value);
            }
            NodeKind::ArrayType { len, elt } => {
                self.one(&mut f, "Len", *len);
                self.one(&mut f, "Elt", *elt);
            }
            NodeKind::StructType { fields } => self.field_list(&mut f, "Fields", *fields),
            NodeKind::FuncType { params, results } => {
                self.field_list(&mut f, "Params", *params);
                self.one(&mut f, "Results", *results);
            }
            NodeKind::InterfaceType => self.field_list(&mut f, "Methods", NodeId::INVALID),
            NodeKind::MapType { key, value } => {
                self.one(&mut f, "Key", *key);
                self.one(&mut f, "Value", *value);
            }
            NodeKind::ChanType { dir, value } => {
                let dir = match dir {
                    ChanDir::Both => "ast.SEND | ast.RECV",
                    ChanDir::Send => "ast.SEND",
                    ChanDir::Recv => "ast.RECV",
                };
                f.raw("Dir", dir.to_owned());
                self.one(&mut f, "Value", *value);
            }
            NodeKind::Field { names, ty } => {
                self.many(&mut f, "Names", "*ast.Ident", names);
                self.one(&mut f, "Type", *ty);
            }
            NodeKind::FieldList { list } => self.many(&mut f, "List", "*ast.Field", list),
            NodeKind::DeclStmt { decl } => self.one(&mut f, "Decl", *decl),
            NodeKind::SendStmt { chan, value } => {
                self.one(&mut f, "Chan", *chan);
                self.one(&mut f, "Value", *value);
            }
            NodeKind::IncDecStmt { x, tok } => {
                self.one(&mut f, "X", *x);
                f.token("Tok", *tok);
            }
            NodeKind::AssignStmt { lhs, tok, rhs } => {
                self.many(&mut f, "Lhs", "ast.Expr", lhs);
                f.token("Tok", *tok);
                self.many(&mut f, "Rhs", "ast.Expr", rhs);
            }
            NodeKind::GoStmt { call } | NodeKind::DeferStmt { call } => {
                self.one(&mut f, "Call", *call);
            }
            NodeKind::ReturnStmt { results } => self.many(&mut f, "Results", "ast.Expr", results),
            NodeKind::BranchStmt { tok } => f.token("Tok", *tok),
            NodeKind::BlockStmt { list } => self.many(&mut f, "List", "ast.Stmt", list),
            NodeKind::IfStmt {
                init,
                cond,
                body,
                els,
            } => {
                self.one(&mut f, "Init", *init);
                self.one(&mut f, "Cond", *cond);
                self.one(&mut f, "Body", *body);
                self.one(&mut f, "Else", *els);
            }
            NodeKind::CaseClause { list, body } => {
                self.many(&mut f, "List", "ast.Expr", list);
                self.many(&mut f, "Body", "ast.Stmt", body);
            }
            NodeKind::SwitchStmt { init, tag, body } => {
                self.one(&mut f, "Init", *init);
                self.one(&mut f, "Tag", *tag);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::TypeSwitchStmt { init, assign, body } => {
                self.one(&mut f, "Init", *init);
                self.one(&mut f, "Assign", *assign);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                self.one(&mut f, "Init", *init);
                self.one(&mut f, "Cond", *cond);
                self.one(&mut f, "Post", *post);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::RangeStmt {
                key,
                value,
                tok,
                x,
                body,
            } => {
                self.one(&mut f, "Key", *key);
                self.one(&mut f, "Value", *value);
                if key.is_valid() {
                    f.token("Tok", *tok);
                }
                self.one(&mut f, "X", *x);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::ImportSpec { name, path } => {
                if let Some(name) = name {
                    f.ident("Name", name);
                }
                f.raw(
                    "Path",
                    format!(
                        "&ast.BasicLit {{ Kind: token.STRING, Value: {} }}",
                        quote(&quote(path))
                    ),
                );
            }
            NodeKind::ValueSpec { names, ty, values } => {
                self.many(&mut f, "Names", "*ast.Ident", names);
                self.one(&mut f, "Type", *ty);
                self.many(&mut f, "Values", "ast.Expr", values);
            }
            NodeKind::TypeSpec { name, ty } => {
                f.ident("Name", name);
                self.one(&mut f, "Type", *ty);
            }
            NodeKind::GenDecl { tok, specs } => {
                f.token("Tok", *tok);
                self.many(&mut f, "Specs", "ast.Spec", specs);
            }
            NodeKind::FuncDecl {
                recv,
                name,
                ty,
                body,
            } => {
                self.one(&mut f, "Recv", *recv);
                f.ident("Name", name);
                self.one(&mut f, "Type", *ty);
                self.one(&mut f, "Body", *body);
            }
            NodeKind::File { package, decls } => {
                f.ident("Name", package);
                self.many(&mut f, "Decls", "ast.Decl", decls);
            }
        }
        f.finish(kind.name())
    }
}
