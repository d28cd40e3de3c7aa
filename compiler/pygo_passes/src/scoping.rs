//! Scope bookkeeping for scoped walks.
//!
//! As a scoped walk moves through the tree it opens a scope per Go block,
//! declares what each construct binds, and applies the rules that turn
//! Python's implicit declarations into Go ones:
//!
//! - `x := v` declares `x` unless the name is already bound locally, bound
//!   in an enclosing function scope, or declared `global`. A define that
//!   declares nothing becomes a plain `=`.
//! - A function without results takes them from its first `return` whose
//!   value types are all known and concrete, or from a narrowable
//!   `interface{}` per returned position when none is.
//! - Assigning to a name declared `interface{}` records the assigned value
//!   as a narrowing source of that declaration.
//!
//! Declarations that cannot be typed yet are deferred and retried when the
//! walk has seen the whole file.

use pygo_ir::{BasicKind, GoArena, GoType, MetaFlags, NodeId, NodeKind, SlotValue, Token};
use pygo_types::{method_key, MissingType, ObjKind, Object, ScopeId, ScopeTree, TypeCx};

use crate::walk::{Cx, Deferred, Pass};

/// Values handed out of a function by one `return` (or generator step).
#[derive(Clone, Debug)]
pub(crate) struct Returned {
    values: Vec<NodeId>,
    types: Vec<Option<GoType>>,
    yielded: bool,
}

/// Where a declared name gets its type from.
#[derive(Copy, Clone)]
enum Binding {
    /// The whole expression.
    Expr(NodeId),
    /// Member `index` of a multi-value expression.
    Member(NodeId, usize),
}

/// Whether `id` is the `func init()` synthesized from module-level code,
/// which shares the package scope.
pub(crate) fn is_global_init(arena: &GoArena, id: NodeId) -> bool {
    matches!(arena.get(id), Some(NodeKind::FuncDecl { name, .. }) if name == "init")
        && arena
            .meta(id)
            .is_some_and(|m| m.flags.contains(MetaFlags::GLOBAL_CODE))
}

/// Whether `id` is an `interface{}` still open to narrowing.
pub(crate) fn is_narrowable(arena: &GoArena, id: NodeId) -> bool {
    matches!(arena.get(id), Some(NodeKind::InterfaceType))
        && !arena
            .meta(id)
            .is_some_and(|m| m.flags.contains(MetaFlags::PERMANENT_INTERFACE))
}

/// Type name of a method receiver list `(r *T)` or `(r T)`.
pub(crate) fn receiver_type_name(arena: &GoArena, recv: NodeId) -> Option<&str> {
    let Some(NodeKind::FieldList { list }) = arena.get(recv) else {
        return None;
    };
    let Some(NodeKind::Field { ty, .. }) = arena.get(*list.first()?) else {
        return None;
    };
    match arena.get(*ty)? {
        NodeKind::StarExpr { x } => arena.ident_name(*x),
        NodeKind::Ident { name } => Some(name),
        _ => None,
    }
}

/// Type node of the single result of a `FuncType`, or `INVALID`.
pub(crate) fn single_result(arena: &GoArena, func_type: NodeId) -> NodeId {
    let Some(NodeKind::FuncType { results, .. }) = arena.get(func_type) else {
        return NodeId::INVALID;
    };
    match arena.get(*results) {
        Some(NodeKind::FieldList { list }) if list.len() == 1 => match arena.get(list[0]) {
            Some(NodeKind::Field { names, ty }) if names.len() <= 1 => *ty,
            _ => NodeId::INVALID,
        },
        _ => NodeId::INVALID,
    }
}

/// Whether a results slot holds at least one field.
pub(crate) fn has_results(arena: &GoArena, results: NodeId) -> bool {
    matches!(arena.get(results), Some(NodeKind::FieldList { list }) if !list.is_empty())
}

/// Resolve a deferred record against the finished scope tree.
fn resolve_record(
    arena: &GoArena,
    scopes: &ScopeTree,
    record: &MissingType<Deferred>,
) -> Option<GoType> {
    let ty = TypeCx::new(arena, scopes, record.scope).type_of(record.source)?;
    let index = record.actions.iter().find_map(|action| match action {
        Deferred::Bind { index } => *index,
        Deferred::Notify(_) => None,
    });
    match (index, ty) {
        (None, ty) => Some(ty),
        (Some(i), GoType::Tuple(members)) => members.into_iter().nth(i),
        (Some(_), _) => None,
    }
}

impl Cx<'_> {
    /// Open a scope if `id` starts one. Returns whether it did.
    pub(crate) fn open_scope(&mut self, id: NodeId) -> bool {
        let opens = match self.arena.kind(id) {
            NodeKind::FuncDecl { .. } => !is_global_init(self.arena, id),
            NodeKind::BlockStmt { .. } => !self
                .parent()
                .is_some_and(|p| is_global_init(self.arena, p)),
            NodeKind::FuncLit { .. }
            | NodeKind::IfStmt { .. }
            | NodeKind::ForStmt { .. }
            | NodeKind::RangeStmt { .. }
            | NodeKind::SwitchStmt { .. }
            | NodeKind::TypeSwitchStmt { .. }
            | NodeKind::CaseClause { .. } => true,
            _ => false,
        };
        if opens {
            self.scope = self.scopes.child(self.scope);
        }
        opens
    }

    pub(crate) fn close_scope(&mut self) {
        self.scope = self.scopes.parent(self.scope).unwrap_or(ScopeId::ROOT);
    }

    pub(crate) fn before_children(&mut self, id: NodeId) {
        match self.arena.kind(id) {
            NodeKind::File { decls, .. } => {
                let decls = decls.clone();
                self.declare_package(&decls);
            }
            NodeKind::FuncDecl { recv, ty, .. } => {
                let (recv, ty) = (*recv, *ty);
                self.globals.clear();
                self.returns.push(Vec::new());
                self.declare_fields(recv);
                self.declare_signature(ty);
            }
            NodeKind::FuncLit { ty, .. } => {
                let ty = *ty;
                self.returns.push(Vec::new());
                self.declare_signature(ty);
            }
            NodeKind::CaseClause { list, .. } => {
                let list = list.clone();
                self.declare_case_binding(&list);
            }
            _ => {}
        }
    }

    pub(crate) fn before_slot(&mut self, id: NodeId, slot: usize) {
        // Range variables are in scope for the body only.
        if slot == 3 && matches!(self.arena.kind(id), NodeKind::RangeStmt { .. }) {
            self.declare_range(id);
        }
    }

    pub(crate) fn after_children(&mut self, id: NodeId) {
        match self.arena.kind(id) {
            NodeKind::AssignStmt { .. } => self.assigned(id),
            NodeKind::ValueSpec { .. } => self.value_spec(id),
            NodeKind::BadStmt => {
                if let Some(meta) = self.arena.meta(id) {
                    let names = meta.globals.clone();
                    self.globals.extend(names);
                }
            }
            NodeKind::ReturnStmt { results } if !results.is_empty() => {
                let results = results.clone();
                self.record_return(results, false);
            }
            NodeKind::SendStmt { chan, value } if self.arena.is_ident(*chan, "yield") => {
                let value = *value;
                self.record_return(vec![value], true);
            }
            NodeKind::FuncDecl { ty, .. } | NodeKind::FuncLit { ty, .. } => {
                let ty = *ty;
                let frame = self.returns.pop().unwrap_or_default();
                self.infer_results(id, ty, &frame);
            }
            _ => {}
        }
    }

    // Declarations

    /// Package-level names are visible everywhere in the file, before and
    /// after their declaration.
    fn declare_package(&mut self, decls: &[NodeId]) {
        for &decl in decls {
            match self.arena.kind(decl) {
                NodeKind::FuncDecl { recv, name, ty, .. } => {
                    if name == "init" {
                        continue;
                    }
                    let key = match receiver_type_name(self.arena, *recv) {
                        Some(type_name) => method_key(type_name, name),
                        None => name.clone(),
                    };
                    let object = Object::with_decl(&key, ObjKind::Function, *ty);
                    self.scopes.declare(ScopeId::ROOT, object);
                }
                NodeKind::GenDecl { tok, specs } => {
                    let tok = *tok;
                    for &spec in specs.clone().iter() {
                        self.declare_spec(tok, spec);
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_spec(&mut self, tok: Token, spec: NodeId) {
        match self.arena.kind(spec) {
            NodeKind::TypeSpec { name, ty } => {
                let object = Object::with_decl(name, ObjKind::Type, *ty);
                self.scopes.declare(ScopeId::ROOT, object);
            }
            NodeKind::ValueSpec { names, ty, .. } if ty.is_valid() => {
                let kind = if tok == Token::Const {
                    ObjKind::Constant
                } else {
                    ObjKind::Variable
                };
                let ty = *ty;
                for &name in names {
                    if let Some(name) = self.arena.ident_name(name) {
                        let object = Object::with_decl(name, kind, ty);
                        self.scopes.declare(ScopeId::ROOT, object);
                    }
                }
            }
            _ => {}
        }
    }

    fn declare_signature(&mut self, func_type: NodeId) {
        if let Some(NodeKind::FuncType { params, results }) = self.arena.get(func_type) {
            let (params, results) = (*params, *results);
            self.declare_fields(params);
            self.declare_fields(results);
        }
    }

    fn declare_fields(&mut self, list: NodeId) {
        let Some(NodeKind::FieldList { list }) = self.arena.get(list) else {
            return;
        };
        for &field in list {
            let Some(NodeKind::Field { names, ty }) = self.arena.get(field) else {
                continue;
            };
            for &name in names {
                match self.arena.ident_name(name) {
                    Some("_") | None => {}
                    Some(name) => {
                        let object = Object::with_decl(name, ObjKind::Variable, *ty);
                        self.scopes.declare(self.scope, object);
                    }
                }
            }
        }
    }

    /// `switch x := y.(type)`: in a single-type clause `x` has that type.
    fn declare_case_binding(&mut self, list: &[NodeId]) {
        let ancestors: Vec<NodeId> = self.ancestors().take(2).collect();
        let [_block, switch] = ancestors[..] else {
            return;
        };
        let Some(NodeKind::TypeSwitchStmt { assign, .. }) = self.arena.get(switch) else {
            return;
        };
        let Some(NodeKind::AssignStmt {
            lhs,
            tok: Token::Define,
            rhs,
        }) = self.arena.get(*assign)
        else {
            return;
        };
        let (Some(&target), Some(&assert)) = (lhs.first(), rhs.first()) else {
            return;
        };
        let Some(name) = self.arena.ident_name(target).map(str::to_owned) else {
            return;
        };
        let object = match list {
            [single] if !self.arena.is_ident(*single, "nil") => {
                Object::with_decl(&name, ObjKind::Variable, *single)
            }
            _ => {
                let source = match self.arena.kind(assert) {
                    NodeKind::TypeAssertExpr { x, .. } => *x,
                    _ => assert,
                };
                Object::variable(&name, self.type_of(source))
            }
        };
        self.scopes.declare(self.scope, object);
    }

    fn declare_range(&mut self, id: NodeId) {
        let NodeKind::RangeStmt {
            key, value, tok, x, ..
        } = self.arena.kind(id).clone()
        else {
            return;
        };
        if tok != Token::Define {
            return;
        }
        let container = self.type_node(x);
        let (key_decl, value_decl) = match self.arena.get(container) {
            Some(NodeKind::ArrayType { elt, .. }) => (NodeId::INVALID, *elt),
            Some(NodeKind::MapType { key, value }) => (*key, *value),
            Some(NodeKind::ChanType { value, .. }) => (*value, NodeId::INVALID),
            _ => (NodeId::INVALID, NodeId::INVALID),
        };
        let (key_ty, value_ty) = match self.type_of(x) {
            Some(GoType::Slice(elt) | GoType::Array(_, elt)) => (Some(GoType::INT), Some(*elt)),
            Some(GoType::Basic(BasicKind::String)) => {
                (Some(GoType::INT), Some(GoType::Basic(BasicKind::Rune)))
            }
            Some(GoType::Map(k, v)) => (Some(*k), Some(*v)),
            Some(GoType::Chan(_, elt)) => (Some(*elt), None),
            Some(ty) if ty.is_integer() => (Some(ty), None),
            _ => (None, None),
        };
        self.declare_bound(key, key_decl, key_ty);
        self.declare_bound(value, value_decl, value_ty);
    }

    fn declare_bound(&mut self, ident: NodeId, decl: NodeId, ty: Option<GoType>) {
        let Some(name) = self.arena.ident_name(ident) else {
            return;
        };
        if name == "_" {
            return;
        }
        let object = if GoType::from_expr(self.arena, decl).is_some() {
            Object::with_decl(name, ObjKind::Variable, decl)
        } else {
            Object::variable(name, ty)
        };
        self.scopes.declare(self.scope, object);
    }

    /// Whether assigning `name` in the current scope declares it.
    fn may_declare(&self, name: &str) -> bool {
        if self.scopes.lookup_local(self.scope, name).is_some() {
            return false;
        }
        match self.scopes.lookup(self.scope, name) {
            Some((scope, _)) if !ScopeTree::is_root(scope) => false,
            Some(_) => !self.globals.iter().any(|g| g == name),
            None => true,
        }
    }

    fn assigned(&mut self, id: NodeId) {
        let NodeKind::AssignStmt { lhs, tok, rhs } = self.arena.kind(id).clone() else {
            return;
        };
        if tok != Token::Define {
            if lhs.len() == rhs.len() {
                for (&target, &value) in lhs.iter().zip(&rhs) {
                    self.widen(target, value);
                }
            }
            return;
        }
        let mut declared = false;
        if lhs.len() == rhs.len() {
            for (&target, &value) in lhs.iter().zip(&rhs) {
                declared |= self.bind(target, Binding::Expr(value));
            }
        } else if let [source] = rhs[..] {
            for (i, &target) in lhs.iter().enumerate() {
                declared |= self.bind(target, Binding::Member(source, i));
            }
        }
        if !declared {
            tracing::trace!(stmt = %self.arena.sketch(id), "define declares nothing");
            if let NodeKind::AssignStmt { tok, .. } = self.arena.kind_mut(id) {
                *tok = Token::Assign;
            }
        }
    }

    fn value_spec(&mut self, id: NodeId) {
        let NodeKind::ValueSpec { names, ty, values } = self.arena.kind(id).clone() else {
            return;
        };
        for (i, &target) in names.iter().enumerate() {
            let Some(name) = self.arena.ident_name(target).map(str::to_owned) else {
                continue;
            };
            let object = if ty.is_valid() {
                Object::with_decl(&name, ObjKind::Variable, ty)
            } else {
                match values.get(i) {
                    Some(&value) => self.object_for(&name, Binding::Expr(value)),
                    None => Object::variable(&name, None),
                }
            };
            self.scopes.declare(self.scope, object);
        }
    }

    /// Apply the declaration rule to `target`. Returns whether it declared.
    fn bind(&mut self, target: NodeId, binding: Binding) -> bool {
        let Some(name) = self.arena.ident_name(target).map(str::to_owned) else {
            return false;
        };
        if name == "_" || !self.may_declare(&name) {
            return false;
        }
        let object = self.object_for(&name, binding);
        self.scopes.declare(self.scope, object)
    }

    /// The object `name` denotes when bound from `binding`. Prefers a type
    /// node in the tree, so that later narrowing of that node is seen.
    fn object_for(&mut self, name: &str, binding: Binding) -> Object {
        let (source, index) = match binding {
            Binding::Expr(value) => {
                let decl = self.type_node(value);
                if GoType::from_expr(self.arena, decl).is_some() {
                    return Object::with_decl(name, ObjKind::Variable, decl);
                }
                if let Some(ty) = self.type_of(value) {
                    return Object::variable(name, Some(ty));
                }
                (value, None)
            }
            Binding::Member(source, index) => {
                if let Some(ty) = self.member_type(source, index) {
                    return Object::variable(name, Some(ty));
                }
                (source, Some(index))
            }
        };
        self.missing.register(MissingType {
            expr: source,
            source,
            scope: self.scope,
            name: Some(name.to_owned()),
            actions: vec![Deferred::Bind { index }],
        });
        Object::variable(name, None)
    }

    /// Type of member `index` of a multi-value expression, including the
    /// comma-ok forms.
    fn member_type(&self, source: NodeId, index: usize) -> Option<GoType> {
        let comma_ok = match self.arena.get(source)? {
            NodeKind::TypeAssertExpr { .. } | NodeKind::UnaryExpr { op: Token::Arrow, .. } => {
                true
            }
            NodeKind::IndexExpr { x, .. } => matches!(self.type_of(*x), Some(GoType::Map(..))),
            _ => false,
        };
        if comma_ok {
            return match index {
                0 => self.type_of(source),
                _ => Some(GoType::BOOL),
            };
        }
        match self.type_of(source)? {
            GoType::Tuple(members) => members.into_iter().nth(index),
            _ => None,
        }
    }

    /// `target = value` where `target` is declared `interface{}`: remember
    /// `value` as a narrowing source.
    fn widen(&mut self, target: NodeId, value: NodeId) {
        let decl = self.type_node(target);
        match self.arena.get(decl) {
            Some(NodeKind::InterfaceType) if is_narrowable(self.arena, decl) => {
                let meta = self.arena.meta_mut(decl);
                if !meta.elts.contains(&value) {
                    meta.elts.push(value);
                }
            }
            Some(NodeKind::ArrayType { elt, .. }) if is_narrowable(self.arena, *elt) => {
                let elt = *elt;
                if let Some(GoType::Slice(ty) | GoType::Array(_, ty)) = self.type_of(value) {
                    if !ty.contains_any() {
                        self.retype(elt, &ty);
                    }
                }
            }
            _ => {}
        }
    }

    /// Overwrite the type node `node` in place with `ty`, so every
    /// declaration that refers to it sees the new type.
    pub(crate) fn retype(&mut self, node: NodeId, ty: &GoType) {
        tracing::trace!(from = %self.arena.sketch(node), to = %ty, "retype");
        let fresh = self.arena.type_expr(ty);
        let kind = self.arena.kind(fresh).clone();
        self.arena.set_kind(node, kind);
        if self.arena.meta(node).is_some() {
            self.arena.meta_mut(node).elts.clear();
        }
    }

    // Type nodes

    /// The type expression in the tree that spells the type of `expr`, or
    /// `INVALID` when there is none to point at.
    pub(crate) fn type_node(&self, expr: NodeId) -> NodeId {
        let none = NodeId::INVALID;
        let Some(kind) = self.arena.get(expr) else {
            return none;
        };
        match kind {
            NodeKind::Ident { name } => match self.scopes.lookup(self.scope, name) {
                Some((_, obj)) if obj.kind != ObjKind::Type => obj.decl,
                _ => none,
            },
            NodeKind::CompositeLit { ty, .. }
            | NodeKind::FuncLit { ty, .. }
            | NodeKind::TypeAssertExpr { ty, .. } => *ty,
            NodeKind::ParenExpr { x } => self.type_node(*x),
            NodeKind::IndexExpr { x, .. } => match self.arena.get(self.type_node(*x)) {
                Some(NodeKind::MapType { value, .. }) => *value,
                Some(NodeKind::ArrayType { elt, .. }) => *elt,
                _ => none,
            },
            NodeKind::StarExpr { x } => match self.arena.get(self.type_node(*x)) {
                Some(NodeKind::StarExpr { x }) => *x,
                _ => none,
            },
            NodeKind::UnaryExpr {
                op: Token::Arrow,
                x,
            } => match self.arena.get(self.type_node(*x)) {
                Some(NodeKind::ChanType { value, .. }) => *value,
                _ => none,
            },
            NodeKind::SelectorExpr { x, sel } => self.field_type_node(*x, sel),
            NodeKind::CallExpr { fun, args, .. } => self.call_type_node(*fun, args),
            _ => none,
        }
    }

    fn call_type_node(&self, fun: NodeId, args: &[NodeId]) -> NodeId {
        let none = NodeId::INVALID;
        match self.arena.get(fun) {
            Some(NodeKind::Ident { name }) => match name.as_str() {
                "make" => args.first().copied().unwrap_or(none),
                "append" => args.first().map_or(none, |&a| self.type_node(a)),
                _ => match self.scopes.lookup(self.scope, name) {
                    Some((_, obj)) if obj.kind == ObjKind::Type => fun,
                    Some((_, obj)) => single_result(self.arena, obj.decl),
                    None if BasicKind::from_name(name).is_some() => fun,
                    None => none,
                },
            },
            Some(NodeKind::FuncLit { ty, .. }) => single_result(self.arena, *ty),
            Some(NodeKind::SelectorExpr { x, sel }) => {
                let Some(type_name) = self.named_receiver(*x) else {
                    return none;
                };
                let key = method_key(&type_name, sel);
                match self.scopes.lookup(ScopeId::ROOT, &key) {
                    Some((_, obj)) => single_result(self.arena, obj.decl),
                    None => none,
                }
            }
            Some(NodeKind::ParenExpr { x }) => {
                if self.arena.kind(*x).is_type_expr() {
                    *x
                } else {
                    none
                }
            }
            Some(kind) if kind.is_type_expr() => fun,
            _ => none,
        }
    }

    /// The `FuncType` node declaring the callee `fun`, or `INVALID`.
    pub(crate) fn callee_type_node(&self, fun: NodeId) -> NodeId {
        let none = NodeId::INVALID;
        let decl = match self.arena.get(fun) {
            Some(NodeKind::Ident { .. }) => self.type_node(fun),
            Some(NodeKind::FuncLit { ty, .. }) => *ty,
            Some(NodeKind::ParenExpr { x }) => return self.callee_type_node(*x),
            Some(NodeKind::SelectorExpr { x, sel }) => {
                let Some(type_name) = self.named_receiver(*x) else {
                    return none;
                };
                match self.scopes.lookup(ScopeId::ROOT, &method_key(&type_name, sel)) {
                    Some((_, obj)) => obj.decl,
                    None => none,
                }
            }
            _ => none,
        };
        match self.arena.get(decl) {
            Some(NodeKind::FuncType { .. }) => decl,
            _ => none,
        }
    }

    fn field_type_node(&self, x: NodeId, sel: &str) -> NodeId {
        let none = NodeId::INVALID;
        let Some(type_name) = self.named_receiver(x) else {
            return none;
        };
        let Some((_, obj)) = self.scopes.lookup(ScopeId::ROOT, &type_name) else {
            return none;
        };
        if obj.kind != ObjKind::Type {
            return none;
        }
        let Some(NodeKind::StructType { fields }) = self.arena.get(obj.decl) else {
            return none;
        };
        let Some(NodeKind::FieldList { list }) = self.arena.get(*fields) else {
            return none;
        };
        for &field in list {
            if let Some(NodeKind::Field { names, ty }) = self.arena.get(field) {
                if names.iter().any(|&n| self.arena.is_ident(n, sel)) {
                    return *ty;
                }
            }
        }
        none
    }

    /// Name of the package-level type of `x`, through one pointer.
    fn named_receiver(&self, x: NodeId) -> Option<String> {
        match self.type_of(x)? {
            GoType::Named(name) => Some(name),
            GoType::Pointer(inner) => match *inner {
                GoType::Named(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    // Function results

    fn record_return(&mut self, values: Vec<NodeId>, yielded: bool) {
        let types = values.iter().map(|&v| self.type_of(v)).collect();
        if let Some(frame) = self.returns.last_mut() {
            frame.push(Returned {
                values,
                types,
                yielded,
            });
        }
    }

    fn infer_results(&mut self, func: NodeId, func_type: NodeId, frame: &[Returned]) {
        let Some(NodeKind::FuncType { results, .. }) = self.arena.get(func_type) else {
            return;
        };
        if has_results(self.arena, *results) {
            return;
        }
        if matches!(self.arena.kind(func), NodeKind::FuncDecl { name, .. } if name == "main" || name == "init")
        {
            return;
        }
        let generator = self
            .arena
            .meta(func)
            .is_some_and(|m| m.flags.contains(MetaFlags::GENERATOR));
        let candidates: Vec<&Returned> = frame.iter().filter(|r| r.yielded == generator).collect();
        let Some(first) = candidates.first() else {
            return;
        };
        let known = candidates
            .iter()
            .find(|r| r.types.iter().all(|t| t.as_ref().is_some_and(|t| !t.contains_any())));
        let inferred = match known {
            Some(known) => {
                let mut types: Vec<GoType> = known.types.iter().flatten().cloned().collect();
                let ty = if types.len() == 1 {
                    types.remove(0)
                } else {
                    GoType::Tuple(types)
                };
                self.arena.results_for(&ty)
            }
            None => {
                let fields = (0..first.values.len())
                    .map(|i| {
                        let sources: Vec<NodeId> = candidates
                            .iter()
                            .filter_map(|r| r.values.get(i).copied())
                            .collect();
                        let any = self.arena.alloc(NodeKind::InterfaceType);
                        self.arena.meta_mut(any).elts = sources;
                        self.arena.field(&[], any)
                    })
                    .collect();
                self.arena.field_list(fields)
            }
        };
        if !inferred.is_valid() {
            return;
        }
        tracing::trace!(func = %self.arena.sketch(func_type), results = %self.arena.sketch(inferred), "inferred results");
        self.arena
            .kind_mut(func_type)
            .set_slot(1, SlotValue::One(inferred));
    }

    // Deferred types

    /// Retry deferred records until no more resolve, applying their
    /// actions.
    pub(crate) fn resolve_missing(&mut self, pass: &mut dyn Pass) {
        loop {
            let resolved = {
                let arena: &GoArena = self.arena;
                let scopes = &self.scopes;
                self.missing
                    .take_resolved(|record| resolve_record(arena, scopes, record))
            };
            if resolved.is_empty() {
                break;
            }
            for (record, ty) in resolved {
                if let Some(name) = &record.name {
                    if let Some(object) = self.scopes.object_mut(record.scope, name) {
                        if object.ty.is_none() {
                            object.ty = Some(ty.clone());
                        }
                    }
                }
                for action in &record.actions {
                    if let Deferred::Notify(node) = action {
                        let saved = self.scope;
                        self.scope = record.scope;
                        pass.resolved(self, *node, &ty);
                        self.scope = saved;
                    }
                }
            }
        }
    }
}
