//! Node constructors.
//!
//! Thin helpers over [`GoArena::alloc`] for the shapes the builder and the
//! rewrite passes produce over and over. Every helper allocates fresh
//! nodes; callers that want to reuse an existing subtree in two places
//! must [`deep_copy`](GoArena::deep_copy) it first.

use crate::{ChanDir, GoArena, GoType, NodeId, NodeKind, Token};

impl GoArena {
    pub fn ident(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Ident {
            name: name.to_owned(),
        })
    }

    pub fn lit(&mut self, kind: Token, value: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::BasicLit {
            kind,
            value: value.into(),
        })
    }

    pub fn int_lit(&mut self, value: i64) -> NodeId {
        self.lit(Token::Int, value.to_string())
    }

    /// A string literal, quoted and escaped.
    pub fn string_lit(&mut self, value: &str) -> NodeId {
        self.lit(Token::String, quote(value))
    }

    pub fn nil(&mut self) -> NodeId {
        self.ident("nil")
    }

    pub fn bool_lit(&mut self, value: bool) -> NodeId {
        self.ident(if value { "true" } else { "false" })
    }

    pub fn sel(&mut self, x: NodeId, name: &str) -> NodeId {
        self.alloc(NodeKind::SelectorExpr {
            x,
            sel: name.to_owned(),
        })
    }

    /// `a.b.c` from a dotted path.
    pub fn path(&mut self, dotted: &str) -> NodeId {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut node = self.ident(first);
        for part in parts {
            node = self.sel(node, part);
        }
        node
    }

    pub fn call(&mut self, fun: NodeId, args: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CallExpr {
            fun,
            args,
            ellipsis: false,
        })
    }

    /// `pkg.Func(args...)` from a dotted callee path.
    pub fn call_path(&mut self, dotted: &str, args: Vec<NodeId>) -> NodeId {
        let fun = self.path(dotted);
        self.call(fun, args)
    }

    /// `f(args, last...)`
    pub fn call_spread(&mut self, fun: NodeId, args: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CallExpr {
            fun,
            args,
            ellipsis: true,
        })
    }

    pub fn binary(&mut self, x: NodeId, op: Token, y: NodeId) -> NodeId {
        self.alloc(NodeKind::BinaryExpr { x, op, y })
    }

    pub fn unary(&mut self, op: Token, x: NodeId) -> NodeId {
        self.alloc(NodeKind::UnaryExpr { op, x })
    }

    pub fn not(&mut self, x: NodeId) -> NodeId {
        self.unary(Token::Not, x)
    }

    /// `&x`
    pub fn addr(&mut self, x: NodeId) -> NodeId {
        self.unary(Token::And, x)
    }

    /// `<-x`
    pub fn recv(&mut self, x: NodeId) -> NodeId {
        self.unary(Token::Arrow, x)
    }

    pub fn paren(&mut self, x: NodeId) -> NodeId {
        self.alloc(NodeKind::ParenExpr { x })
    }

    pub fn star(&mut self, x: NodeId) -> NodeId {
        self.alloc(NodeKind::StarExpr { x })
    }

    pub fn index(&mut self, x: NodeId, index: NodeId) -> NodeId {
        self.alloc(NodeKind::IndexExpr { x, index })
    }

    pub fn key_value(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::KeyValueExpr { key, value })
    }

    pub fn composite(&mut self, ty: NodeId, elts: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CompositeLit { ty, elts })
    }

    /// `struct{}{}`
    pub fn empty_struct_value(&mut self) -> NodeId {
        let ty = self.type_expr(&GoType::empty_struct());
        self.composite(ty, Vec::new())
    }

    /// `make(T, args...)`
    pub fn make_call(&mut self, ty: &GoType, args: Vec<NodeId>) -> NodeId {
        let fun = self.ident("make");
        let mut all = vec![self.type_expr(ty)];
        all.extend(args);
        self.call(fun, all)
    }

    /// `T(x)`
    pub fn convert(&mut self, ty: &GoType, x: NodeId) -> NodeId {
        let fun = self.type_expr(ty);
        let fun = if matches!(ty, GoType::Pointer(_) | GoType::Chan(..) | GoType::Func(_)) {
            self.paren(fun)
        } else {
            fun
        };
        self.call(fun, vec![x])
    }

    // Statements

    pub fn expr_stmt(&mut self, x: NodeId) -> NodeId {
        self.alloc(NodeKind::ExprStmt { x })
    }

    pub fn assign(&mut self, lhs: Vec<NodeId>, tok: Token, rhs: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::AssignStmt { lhs, tok, rhs })
    }

    /// `lhs := rhs` for a single pair.
    pub fn define(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.assign(vec![lhs], Token::Define, vec![rhs])
    }

    pub fn ret(&mut self, results: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ReturnStmt { results })
    }

    pub fn block(&mut self, list: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::BlockStmt { list })
    }

    /// `if cond { body } else els`; `els` may be `INVALID`, a block, or
    /// another `if`.
    pub fn if_stmt(&mut self, cond: NodeId, body: Vec<NodeId>, els: NodeId) -> NodeId {
        let body = self.block(body);
        self.alloc(NodeKind::IfStmt {
            init: NodeId::INVALID,
            cond,
            body,
            els,
        })
    }

    pub fn for_stmt(
        &mut self,
        init: NodeId,
        cond: NodeId,
        post: NodeId,
        body: Vec<NodeId>,
    ) -> NodeId {
        let body = self.block(body);
        self.alloc(NodeKind::ForStmt {
            init,
            cond,
            post,
            body,
        })
    }

    /// `for key, value := range x { body }`; either name may be `INVALID`.
    pub fn range_stmt(&mut self, key: NodeId, value: NodeId, x: NodeId, body: NodeId) -> NodeId {
        let tok = if key.is_valid() || value.is_valid() {
            Token::Define
        } else {
            Token::Illegal
        };
        self.alloc(NodeKind::RangeStmt {
            key,
            value,
            tok,
            x,
            body,
        })
    }

    pub fn send(&mut self, chan: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::SendStmt { chan, value })
    }

    pub fn inc_dec(&mut self, x: NodeId, tok: Token) -> NodeId {
        self.alloc(NodeKind::IncDecStmt { x, tok })
    }

    pub fn defer_stmt(&mut self, call: NodeId) -> NodeId {
        self.alloc(NodeKind::DeferStmt { call })
    }

    pub fn go_stmt(&mut self, call: NodeId) -> NodeId {
        self.alloc(NodeKind::GoStmt { call })
    }

    pub fn branch(&mut self, tok: Token) -> NodeId {
        self.alloc(NodeKind::BranchStmt { tok })
    }

    pub fn case_clause(&mut self, list: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CaseClause { list, body })
    }

    /// `panic(x)` as a statement.
    pub fn panic_stmt(&mut self, x: NodeId) -> NodeId {
        let fun = self.ident("panic");
        let call = self.call(fun, vec![x]);
        self.expr_stmt(call)
    }

    // Types and functions

    pub fn field(&mut self, names: &[&str], ty: NodeId) -> NodeId {
        let names = names.iter().map(|n| self.ident(n)).collect();
        self.alloc(NodeKind::Field { names, ty })
    }

    pub fn field_list(&mut self, list: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::FieldList { list })
    }

    /// `func(params) results`; pass `INVALID` for no results.
    pub fn func_type(&mut self, params: Vec<NodeId>, results: NodeId) -> NodeId {
        let params = self.field_list(params);
        self.alloc(NodeKind::FuncType { params, results })
    }

    pub fn func_lit(&mut self, ty: NodeId, body: Vec<NodeId>) -> NodeId {
        let body = self.block(body);
        self.alloc(NodeKind::FuncLit { ty, body })
    }

    /// Result list for a type: unnamed single field, or one field per
    /// tuple member. `INVALID` for an empty tuple.
    pub fn results_for(&mut self, ty: &GoType) -> NodeId {
        let types: Vec<GoType> = match ty {
            GoType::Tuple(ts) if ts.is_empty() => return NodeId::INVALID,
            GoType::Tuple(ts) => ts.clone(),
            other => vec![other.clone()],
        };
        let fields = types
            .iter()
            .map(|t| {
                let ty = self.type_expr(t);
                self.field(&[], ty)
            })
            .collect();
        self.field_list(fields)
    }

    /// `func() results { body }()`: an immediately-invoked function
    /// literal. `results` is a field list or `INVALID`.
    pub fn iife(&mut self, results: NodeId, body: Vec<NodeId>) -> NodeId {
        let ty = self.func_type(Vec::new(), results);
        let lit = self.func_lit(ty, body);
        self.call(lit, Vec::new())
    }

    /// Materialize a type expression for `ty`.
    pub fn type_expr(&mut self, ty: &GoType) -> NodeId {
        match ty {
            GoType::Any => self.alloc(NodeKind::InterfaceType),
            GoType::Basic(kind) => self.ident(kind.name()),
            GoType::Named(name) => self.ident(name),
            GoType::Qualified { pkg, name } => {
                let x = self.ident(pkg);
                self.sel(x, name)
            }
            GoType::Slice(elt) => {
                let elt = self.type_expr(elt);
                self.alloc(NodeKind::ArrayType {
                    len: NodeId::INVALID,
                    elt,
                })
            }
            GoType::Array(len, elt) => {
                let len = self.lit(Token::Int, len.to_string());
                let elt = self.type_expr(elt);
                self.alloc(NodeKind::ArrayType { len, elt })
            }
            GoType::Map(key, value) => {
                let key = self.type_expr(key);
                let value = self.type_expr(value);
                self.alloc(NodeKind::MapType { key, value })
            }
            GoType::Chan(dir, elt) => {
                let value = self.type_expr(elt);
                self.alloc(NodeKind::ChanType { dir: *dir, value })
            }
            GoType::Pointer(elt) => {
                let x = self.type_expr(elt);
                self.star(x)
            }
            GoType::Func(sig) => {
                let last = sig.params.len().saturating_sub(1);
                let params = sig
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let ty = match p {
                            GoType::Slice(elt) if sig.variadic && i == last => {
                                let elt = self.type_expr(elt);
                                self.alloc(NodeKind::Ellipsis { elt })
                            }
                            _ => self.type_expr(p),
                        };
                        self.field(&[], ty)
                    })
                    .collect();
                let results = self.results_for(&GoType::Tuple(sig.results.clone()));
                self.func_type(params, results)
            }
            GoType::Struct(fields) => {
                let list = fields
                    .iter()
                    .map(|(name, t)| {
                        let ty = self.type_expr(t);
                        self.field(&[name.as_str()], ty)
                    })
                    .collect();
                let fields = self.field_list(list);
                self.alloc(NodeKind::StructType { fields })
            }
            GoType::Tuple(ts) => match ts.first() {
                Some(first) => self.type_expr(first),
                None => self.alloc(NodeKind::InterfaceType),
            },
        }
    }

    /// `chan T` with an explicit direction.
    pub fn chan_type(&mut self, dir: ChanDir, elt: NodeId) -> NodeId {
        self.alloc(NodeKind::ChanType { dir, value: elt })
    }
}

/// Quote a string as a Go (and JSON) string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote`] for the escapes it produces. Returns `None` when
/// `literal` is not a double-quoted string.
pub fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            other => out.push(other),
        }
    }
    Some(out)
}
