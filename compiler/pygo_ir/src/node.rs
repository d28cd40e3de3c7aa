//! Go syntax node kinds.
//!
//! One variant per `go/ast` node the transpiler emits. Field order matches
//! the `go/ast` declaration order; the serialization bridge and structural
//! equality both rely on it.
//!
//! Children are [`NodeId`] handles into the owning [`GoArena`](crate::GoArena).
//! A missing optional child is [`NodeId::INVALID`].

use smallvec::SmallVec;

use crate::{NodeId, Token};

/// Channel direction, mirroring `ast.ChanDir`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A Go syntax node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Expressions
    /// Placeholder expression. Carries a walrus assignment in its metadata
    /// until the init-statement pass hoists it.
    BadExpr,
    Ident {
        name: String,
    },
    Ellipsis {
        elt: NodeId,
    },
    BasicLit {
        kind: Token,
        value: String,
    },
    FuncLit {
        ty: NodeId,
        body: NodeId,
    },
    CompositeLit {
        ty: NodeId,
        elts: Vec<NodeId>,
    },
    ParenExpr {
        x: NodeId,
    },
    SelectorExpr {
        x: NodeId,
        sel: String,
    },
    IndexExpr {
        x: NodeId,
        index: NodeId,
    },
    SliceExpr {
        x: NodeId,
        low: NodeId,
        high: NodeId,
        max: NodeId,
        slice3: bool,
    },
    /// `x.(T)`; `ty` is `INVALID` for `x.(type)` in a type switch.
    TypeAssertExpr {
        x: NodeId,
        ty: NodeId,
    },
    CallExpr {
        fun: NodeId,
        args: Vec<NodeId>,
        ellipsis: bool,
    },
    StarExpr {
        x: NodeId,
    },
    UnaryExpr {
        op: Token,
        x: NodeId,
    },
    BinaryExpr {
        x: NodeId,
        op: Token,
        y: NodeId,
    },
    KeyValueExpr {
        key: NodeId,
        value: NodeId,
    },

    // Types
    /// `[len]elt`; a slice when `len` is `INVALID`.
    ArrayType {
        len: NodeId,
        elt: NodeId,
    },
    StructType {
        fields: NodeId,
    },
    FuncType {
        params: NodeId,
        results: NodeId,
    },
    /// The empty interface. Counted by the convergence metric.
    InterfaceType,
    MapType {
        key: NodeId,
        value: NodeId,
    },
    ChanType {
        dir: ChanDir,
        value: NodeId,
    },
    Field {
        names: Vec<NodeId>,
        ty: NodeId,
    },
    FieldList {
        list: Vec<NodeId>,
    },

    // Statements
    /// Placeholder statement. Carries `global`/`nonlocal` names in its
    /// metadata; removed once scoping has consumed them.
    BadStmt,
    DeclStmt {
        decl: NodeId,
    },
    EmptyStmt,
    ExprStmt {
        x: NodeId,
    },
    SendStmt {
        chan: NodeId,
        value: NodeId,
    },
    IncDecStmt {
        x: NodeId,
        tok: Token,
    },
    AssignStmt {
        lhs: Vec<NodeId>,
        tok: Token,
        rhs: Vec<NodeId>,
    },
    GoStmt {
        call: NodeId,
    },
    DeferStmt {
        call: NodeId,
    },
    ReturnStmt {
        results: Vec<NodeId>,
    },
    BranchStmt {
        tok: Token,
    },
    BlockStmt {
        list: Vec<NodeId>,
    },
    IfStmt {
        init: NodeId,
        cond: NodeId,
        body: NodeId,
        els: NodeId,
    },
    /// A `case` clause; an empty `list` is `default`.
    CaseClause {
        list: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    SwitchStmt {
        init: NodeId,
        tag: NodeId,
        body: NodeId,
    },
    TypeSwitchStmt {
        init: NodeId,
        assign: NodeId,
        body: NodeId,
    },
    ForStmt {
        init: NodeId,
        cond: NodeId,
        post: NodeId,
        body: NodeId,
    },
    RangeStmt {
        key: NodeId,
        value: NodeId,
        tok: Token,
        x: NodeId,
        body: NodeId,
    },

    // Declarations
    ImportSpec {
        name: Option<String>,
        path: String,
    },
    ValueSpec {
        names: Vec<NodeId>,
        ty: NodeId,
        values: Vec<NodeId>,
    },
    TypeSpec {
        name: String,
        ty: NodeId,
    },
    GenDecl {
        tok: Token,
        specs: Vec<NodeId>,
    },
    FuncDecl {
        recv: NodeId,
        name: String,
        ty: NodeId,
        body: NodeId,
    },
    File {
        package: String,
        decls: Vec<NodeId>,
    },
}

/// Mutable access to one child slot of a node.
pub enum Slot<'a> {
    One(&'a mut NodeId),
    Many(&'a mut Vec<NodeId>),
}

/// Read-only view of one child slot of a node.
#[derive(Copy, Clone, Debug)]
pub enum SlotRef<'a> {
    One(NodeId),
    Many(&'a [NodeId]),
}

/// Owned snapshot of a slot, used by walkers that need to release the
/// arena borrow while visiting children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotValue {
    One(NodeId),
    Many(Vec<NodeId>),
}

impl NodeKind {
    /// `go/ast` type name of this node, e.g. `CallExpr`.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::BadExpr => "BadExpr",
            NodeKind::Ident { .. } => "Ident",
            NodeKind::Ellipsis { .. } => "Ellipsis",
            NodeKind::BasicLit { .. } => "BasicLit",
            NodeKind::FuncLit { .. } => "FuncLit",
            NodeKind::CompositeLit { .. } => "CompositeLit",
            NodeKind::ParenExpr { .. } => "ParenExpr",
            NodeKind::SelectorExpr { .. } => "SelectorExpr",
            NodeKind::IndexExpr { .. } => "IndexExpr",
            NodeKind::SliceExpr { .. } => "SliceExpr",
            NodeKind::TypeAssertExpr { .. } => "TypeAssertExpr",
            NodeKind::CallExpr { .. } => "CallExpr",
            NodeKind::StarExpr { .. } => "StarExpr",
            NodeKind::UnaryExpr { .. } => "UnaryExpr",
            NodeKind::BinaryExpr { .. } => "BinaryExpr",
            NodeKind::KeyValueExpr { .. } => "KeyValueExpr",
            NodeKind::ArrayType { .. } => "ArrayType",
            NodeKind::StructType { .. } => "StructType",
            NodeKind::FuncType { .. } => "FuncType",
            NodeKind::InterfaceType => "InterfaceType",
            NodeKind::MapType { .. } => "MapType",
            NodeKind::ChanType { .. } => "ChanType",
            NodeKind::Field { .. } => "Field",
            NodeKind::FieldList { .. } => "FieldList",
            NodeKind::BadStmt => "BadStmt",
            NodeKind::DeclStmt { .. } => "DeclStmt",
            NodeKind::EmptyStmt => "EmptyStmt",
            NodeKind::ExprStmt { .. } => "ExprStmt",
            NodeKind::SendStmt { .. } => "SendStmt",
            NodeKind::IncDecStmt { .. } => "IncDecStmt",
            NodeKind::AssignStmt { .. } => "AssignStmt",
            NodeKind::GoStmt { .. } => "GoStmt",
            NodeKind::DeferStmt { .. } => "DeferStmt",
            NodeKind::ReturnStmt { .. } => "ReturnStmt",
            NodeKind::BranchStmt { .. } => "BranchStmt",
            NodeKind::BlockStmt { .. } => "BlockStmt",
            NodeKind::IfStmt { .. } => "IfStmt",
            NodeKind::CaseClause { .. } => "CaseClause",
            NodeKind::SwitchStmt { .. } => "SwitchStmt",
            NodeKind::TypeSwitchStmt { .. } => "TypeSwitchStmt",
            NodeKind::ForStmt { .. } => "ForStmt",
            NodeKind::RangeStmt { .. } => "RangeStmt",
            NodeKind::ImportSpec { .. } => "ImportSpec",
            NodeKind::ValueSpec { .. } => "ValueSpec",
            NodeKind::TypeSpec { .. } => "TypeSpec",
            NodeKind::GenDecl { .. } => "GenDecl",
            NodeKind::FuncDecl { .. } => "FuncDecl",
            NodeKind::File { .. } => "File",
        }
    }

    pub fn is_type_expr(&self) -> bool {
        matches!(
            self,
            NodeKind::ArrayType { .. }
                | NodeKind::StructType { .. }
                | NodeKind::FuncType { .. }
                | NodeKind::InterfaceType
                | NodeKind::MapType { .. }
                | NodeKind::ChanType { .. }
        )
    }

    /// Child slots in declaration order.
    pub fn slots(&self) -> SmallVec<[SlotRef<'_>; 4]> {
        use SlotRef::{Many, One};
        let mut out = SmallVec::new();
        match self {
            NodeKind::BadExpr
            | NodeKind::Ident { .. }
            | NodeKind::BasicLit { .. }
            | NodeKind::InterfaceType
            | NodeKind::BadStmt
            | NodeKind::EmptyStmt
            | NodeKind::BranchStmt { .. }
            | NodeKind::ImportSpec { .. } => {}
            NodeKind::Ellipsis { elt } => out.push(One(*elt)),
            NodeKind::FuncLit { ty, body } => out.extend([One(*ty), One(*body)]),
            NodeKind::CompositeLit { ty, elts } => out.extend([One(*ty), Many(elts)]),
            NodeKind::ParenExpr { x }
            | NodeKind::SelectorExpr { x, .. }
            | NodeKind::StarExpr { x }
            | NodeKind::UnaryExpr { x, .. }
            | NodeKind::ExprStmt { x }
            | NodeKind::IncDecStmt { x, .. } => out.push(One(*x)),
            NodeKind::IndexExpr { x, index } => out.extend([One(*x), One(*index)]),
            NodeKind::SliceExpr {
                x, low, high, max, ..
            } => out.extend([One(*x), One(*low), One(*high), One(*max)]),
            NodeKind::TypeAssertExpr { x, ty } => out.extend([One(*x), One(*ty)]),
            NodeKind::CallExpr { fun, args, .. } => out.extend([One(*fun), Many(args)]),
            NodeKind::BinaryExpr { x, y, .. } => out.extend([One(*x), One(*y)]),
            NodeKind::KeyValueExpr { key, value } => out.extend([One(*key), One(*value)]),
            NodeKind::ArrayType { len, elt } => out.extend([One(*len), One(*elt)]),
            NodeKind::StructType { fields } => out.push(One(*fields)),
            NodeKind::FuncType { params, results } => out.extend([One(*params), One(*results)]),
            NodeKind::MapType { key, value } => out.extend([One(*key), One(*value)]),
            NodeKind::ChanType { value, .. } => out.push(One(*value)),
            NodeKind::Field { names, ty } => out.extend([Many(names), One(*ty)]),
            NodeKind::FieldList { list } | NodeKind::BlockStmt { list } => out.push(Many(list)),
            NodeKind::DeclStmt { decl } => out.push(One(*decl)),
            NodeKind::SendStmt { chan, value } => out.extend([One(*chan), One(*value)]),
            NodeKind::AssignStmt { lhs, rhs, .. } => out.extend([Many(lhs), Many(rhs)]),
            NodeKind::GoStmt { call } | NodeKind::DeferStmt { call } => out.push(One(*call)),
            NodeKind::ReturnStmt { results } => out.push(Many(results)),
            NodeKind::IfStmt {
                init,
                cond,
                body,
                els,
            } => out.extend([One(*init), One(*cond), One(*body), One(*els)]),
            NodeKind::CaseClause { list, body } => out.extend([Many(list), Many(body)]),
            NodeKind::SwitchStmt { init, tag, body } => {
                out.extend([One(*init), One(*tag), One(*body)]);
            }
            NodeKind::TypeSwitchStmt { init, assign, body } => {
                out.extend([One(*init), One(*assign), One(*body)]);
            }
            NodeKind::ForStmt {
                init,
                cond,
                post,
                body,
            } => out.extend([One(*init), One(*cond), One(*post), One(*body)]),
            NodeKind::RangeStmt {
                key,
                value,
                x,
                body,
                ..
            } => out.extend([One(*key), One(*value), One(*x), One(*body)]),
            NodeKind::ValueSpec { names, ty, values } => {
                out.extend([Many(names), One(*ty), Many(values)]);
            }
            NodeKind::TypeSpec { ty, .. } => out.push(One(*ty)),
            NodeKind::GenDecl { specs, .. } => out.push(Many(specs)),
            NodeKind::FuncDecl { recv, ty, body, .. } => {
                out.extend([One(*recv), One(*ty), One(*body)]);
            }
            NodeKind::File { decls, .. } => out.push(Many(decls)),
        }
        out
    }

    /// Mutable child slots, same order as [`NodeKind::slots`].
    pub fn slots_mut(&mut self) -> SmallVec<[Slot<'_>; 4]> {
        use Slot::{Many, One};
        let mut out = SmallVec::new();
        match self {
            NodeKind::BadExpr
            | NodeKind::Ident { .. }
            | NodeKind::BasicLit { .. }
            | NodeKind::InterfaceType
            | NodeKind::BadStmt
            | NodeKind::EmptyStmt
            | NodeKind::BranchStmt { .. }
            | NodeKind::ImportSpec { .. } => {}
            NodeKind::Ellipsis { elt } => out.push(One(elt)),
            NodeKind::FuncLit { ty, body } => out.extend([One(ty), One(body)]),
            NodeKind::CompositeLit { ty, elts } => out.extend([One(ty), Many(elts)]),
            NodeKind::ParenExpr { x }
            | NodeKind::SelectorExpr { x, .. }
            | NodeKind::StarExpr { x }
            | NodeKind::UnaryExpr { x, .. }
            | NodeKind::ExprStmt { x }
            | NodeKind::IncDecStmt { x, .. } => out.push(One(x)),
            NodeKind::IndexExpr { x, index } => out.extend([One(x), One(index)]),
            NodeKind::SliceExpr {
                x, low, high, max, ..
            } => out.extend([One(x), One(low), One(high), One(max)]),
            NodeKind::TypeAssertExpr { x, ty } => out.extend([One(x), One(ty)]),
            NodeKind::CallExpr { fun, args, .. } => out.extend([One(fun), Many(args)]),
            NodeKind::BinaryExpr { x, y, .. } => out.extend([One(x), One(y)]),
            NodeKind::KeyValueExpr { key, value } => out.extend([One(key), One(value)]),
            NodeKind::ArrayType { len, elt } => out.extend([One(len), One(elt)]),
            NodeKind::StructType { fields } => out.push(One(fields)),
            NodeKind::FuncType { params, results } => out.extend([One(params), One(results)]),
            NodeKind::MapType { key, value } => out.extend([One(key), One(value)]),
            NodeKind::ChanType { value, .. } => out.push(One(value)),
            NodeKind::Field { names, ty } => out.extend([Many(names), One(ty)]),
            NodeKind::FieldList { list } | NodeKind::BlockStmt { list } => out.push(Many(list)),
            NodeKind::DeclStmt { decl } => out.push(One(decl)),
            NodeKind::SendStmt { chan, value } => out.extend([One(chan), One(value)]),
            NodeKind::AssignStmt { lhs, rhs, .. } => out.extend([Many(lhs), Many(rhs)]),
            NodeKind::GoStmt { call } | NodeKind::DeferStmt { call } => out.push(One(call)),
            NodeKind::ReturnStmt { results } => out.push(Many(results)),
            NodeKind::IfStmt {
                init,
                cond,
                body,
                els,
            } => out.extend([One(init), One(cond), One(body), One(els)]),
            NodeKind::CaseClause { list, body } => out.extend([Many(list), Many(body)]),
            NodeKind::SwitchStmt { init, tag, body } => {
                out.extend([One(init), One(tag), One(body)]);
            }
            NodeKind::TypeSwitchStmt { init, assign, body } => {
                out.extend([One(init), One(assign), One(body)]);
            }
            NodeKind::ForStmt {
                init,
                cond,
                post,
                body,
            } => out.extend([One(init), One(cond), One(post), One(body)]),
            NodeKind::RangeStmt {
                key,
                value,
                x,
                body,
                ..
            } => out.extend([One(key), One(value), One(x), One(body)]),
            NodeKind::ValueSpec { names, ty, values } => {
                out.extend([Many(names), One(ty), Many(values)]);
            }
            NodeKind::TypeSpec { ty, .. } => out.push(One(ty)),
            NodeKind::GenDecl { specs, .. } => out.push(Many(specs)),
            NodeKind::FuncDecl { recv, ty, body, .. } => {
                out.extend([One(recv), One(ty), One(body)]);
            }
            NodeKind::File { decls, .. } => out.push(Many(decls)),
        }
        out
    }

    /// Owned copy of slot `i`.
    pub fn slot(&self, i: usize) -> Option<SlotValue> {
        self.slots().get(i).map(|s| match *s {
            SlotRef::One(id) => SlotValue::One(id),
            SlotRef::Many(ids) => SlotValue::Many(ids.to_vec()),
        })
    }

    /// Overwrite slot `i`. A `Many` value written to a `One` slot keeps its
    /// first element (or `INVALID` when empty); a `One` value written to a
    /// `Many` slot becomes a singleton list unless it is `INVALID`.
    pub fn set_slot(&mut self, i: usize, value: SlotValue) {
        let mut slots = self.slots_mut();
        let Some(slot) = slots.get_mut(i) else {
            return;
        };
        match (slot, value) {
            (Slot::One(dst), SlotValue::One(id)) => **dst = id,
            (Slot::One(dst), SlotValue::Many(ids)) => {
                **dst = ids.first().copied().unwrap_or(NodeId::INVALID);
            }
            (Slot::Many(dst), SlotValue::Many(ids)) => **dst = ids,
            (Slot::Many(dst), SlotValue::One(id)) => {
                dst.clear();
                if id.is_valid() {
                    dst.push(id);
                }
            }
        }
    }

    /// All valid direct children, in slot order.
    pub fn children(&self) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        for slot in self.slots() {
            match slot {
                SlotRef::One(id) if id.is_valid() => out.push(id),
                SlotRef::One(_) => {}
                SlotRef::Many(ids) => out.extend(ids.iter().copied().filter(|id| id.is_valid())),
            }
        }
        out
    }

    /// Replace every occurrence of `old` among the direct children with
    /// `new`. Returns `true` if anything changed.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        let mut changed = false;
        for slot in self.slots_mut() {
            match slot {
                Slot::One(id) => {
                    if *id == old {
                        *id = new;
                        changed = true;
                    }
                }
                Slot::Many(ids) => {
                    for id in ids.iter_mut() {
                        if *id == old {
                            *id = new;
                            changed = true;
                        }
                    }
                }
            }
        }
        changed
    }

    /// Copy of this node with every child slot cleared. Two nodes with
    /// equal shells differ only in their children.
    pub fn shell(&self) -> NodeKind {
        let mut shell = self.clone();
        for slot in shell.slots_mut() {
            match slot {
                Slot::One(id) => *id = NodeId::INVALID,
                Slot::Many(ids) => {
                    let len = ids.len();
                    ids.clear();
                    ids.resize(len, NodeId::INVALID);
                }
            }
        }
        shell
    }
}
