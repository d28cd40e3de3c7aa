//! Tree walking for rewrite passes.
//!
//! A walk visits every node reachable from the file root. Children are
//! visited before the pass decides what to do with their parent, so a
//! rewrite always sees already-rewritten operands. Scoped passes also get
//! the Go program's lexical scopes maintained for them as the walk enters
//! and leaves blocks (see `scoping`).
//!
//! Replaced nodes are not revisited in the same walk. The fixed-point
//! driver runs the pass list again instead.

use pygo_ir::{GoArena, GoType, NodeId, NodeKind, SlotValue};
use pygo_types::{MissingType, MissingTypes, ScopeId, ScopeTree, TypeCx};
use smallvec::SmallVec;

use crate::scoping::Returned;

/// What to do with a node once its children were visited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rewrite {
    Keep,
    Replace(NodeId),
    /// Drop the node. A single-child slot becomes empty.
    Remove,
}

/// A rewrite pass over the whole file.
pub(crate) trait Pass {
    fn name(&self) -> &'static str;

    /// Whether iterations after the first run this pass again.
    fn repeatable(&self) -> bool {
        true
    }

    /// Whether the walk tracks scopes and declarations for this pass.
    fn scoped(&self) -> bool {
        false
    }

    /// Before the children of `id` are visited.
    fn enter(&mut self, _cx: &mut Cx<'_>, _id: NodeId) {}

    /// After the children of `id` are visited.
    fn leave(&mut self, _cx: &mut Cx<'_>, _id: NodeId) -> Rewrite {
        Rewrite::Keep
    }

    /// A type deferred with [`Cx::defer_type`] became known.
    fn resolved(&mut self, _cx: &mut Cx<'_>, _node: NodeId, _ty: &GoType) {}

    /// Once, after the whole file was visited and deferred types settled.
    fn finish(&mut self, _cx: &mut Cx<'_>) {}
}

/// Follow-up attached to a deferred type.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Deferred {
    /// Record the type on the declared name. `index` picks one member of a
    /// multi-value source.
    Bind { index: Option<usize> },
    /// Hand the type to the pass, for `node`.
    Notify(NodeId),
}

/// Walk state shared with the pass.
pub(crate) struct Cx<'a> {
    pub arena: &'a mut GoArena,
    pub root: NodeId,
    pub scopes: ScopeTree,
    pub scope: ScopeId,
    pub(crate) scoped: bool,
    /// Ancestors of the node being visited, root first.
    pub(crate) stack: Vec<NodeId>,
    /// Names declared `global` in the function being walked.
    pub(crate) globals: Vec<String>,
    pub(crate) missing: MissingTypes<Deferred>,
    /// Returned values seen so far, one frame per enclosing function.
    pub(crate) returns: Vec<Vec<Returned>>,
    /// Statements queued in front of the current statement, one frame per
    /// enclosing statement list.
    inserts: Vec<Vec<NodeId>>,
}

impl<'a> Cx<'a> {
    fn new(arena: &'a mut GoArena, root: NodeId, scoped: bool) -> Self {
        Cx {
            arena,
            root,
            scopes: ScopeTree::new(),
            scope: ScopeId::ROOT,
            scoped,
            stack: Vec::new(),
            globals: Vec::new(),
            missing: MissingTypes::new(),
            returns: Vec::new(),
            inserts: Vec::new(),
        }
    }

    pub fn types(&self) -> TypeCx<'_> {
        TypeCx::new(self.arena, &self.scopes, self.scope)
    }

    /// Type of `id` in the current scope.
    pub fn type_of(&self, id: NodeId) -> Option<GoType> {
        self.types().type_of(id)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// Ancestors of the current node, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.stack.iter().rev().copied()
    }

    /// Queue `stmt` in front of the statement being visited, in the nearest
    /// enclosing statement list. Returns `false` outside any list.
    pub fn insert_before(&mut self, stmt: NodeId) -> bool {
        match self.inserts.last_mut() {
            Some(frame) => {
                frame.push(stmt);
                true
            }
            None => false,
        }
    }

    /// Ask for [`Pass::resolved`] on `node` once `source` has a type.
    pub fn defer_type(&mut self, node: NodeId, source: NodeId) {
        self.missing.register(MissingType {
            expr: node,
            source,
            scope: self.scope,
            name: None,
            actions: vec![Deferred::Notify(node)],
        });
    }
}

/// Outcome of one walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct WalkReport {
    /// Declared names whose type never became known.
    pub unresolved: Vec<String>,
}

/// Run `pass` over the tree under `root`.
#[tracing::instrument(level = "debug", skip_all, fields(pass = pass.name()))]
pub(crate) fn walk(arena: &mut GoArena, root: NodeId, pass: &mut dyn Pass) -> WalkReport {
    let mut cx = Cx::new(arena, root, pass.scoped());
    // The root is a file; passes edit it in place rather than replace it.
    visit(&mut cx, pass, root);
    cx.resolve_missing(pass);
    pass.finish(&mut cx);
    let unresolved: Vec<String> = cx
        .missing
        .pending()
        .iter()
        .filter_map(|record| record.name.clone())
        .collect();
    if !unresolved.is_empty() {
        tracing::trace!(?unresolved, "types still missing");
    }
    WalkReport { unresolved }
}

fn visit(cx: &mut Cx<'_>, pass: &mut dyn Pass, id: NodeId) -> Rewrite {
    if cx.arena.get(id).is_none() {
        return Rewrite::Keep;
    }
    let scoped = cx.scoped;
    let opened = scoped && cx.open_scope(id);
    if scoped {
        cx.before_children(id);
    }
    pass.enter(cx, id);

    cx.stack.push(id);
    let slot_count = cx.arena.kind(id).slots().len();
    for i in 0..slot_count {
        if scoped {
            cx.before_slot(id, i);
        }
        match cx.arena.kind(id).slot(i) {
            Some(SlotValue::One(child)) => visit_one(cx, pass, id, i, child),
            Some(SlotValue::Many(children)) => visit_many(cx, pass, id, i, &children),
            None => {}
        }
    }
    cx.stack.pop();

    if scoped {
        cx.after_children(id);
    }
    let rewrite = pass.leave(cx, id);
    if opened {
        cx.close_scope();
    }
    rewrite
}

fn visit_one(cx: &mut Cx<'_>, pass: &mut dyn Pass, parent: NodeId, slot: usize, child: NodeId) {
    if !child.is_valid() {
        return;
    }
    let new = match visit(cx, pass, child) {
        Rewrite::Keep => return,
        Rewrite::Replace(new) => new,
        Rewrite::Remove => NodeId::INVALID,
    };
    cx.arena
        .kind_mut(parent)
        .set_slot(slot, SlotValue::One(new));
}

fn visit_many(
    cx: &mut Cx<'_>,
    pass: &mut dyn Pass,
    parent: NodeId,
    slot: usize,
    children: &[NodeId],
) {
    let statements = is_statement_list(cx.arena.kind(parent), slot);
    if statements {
        cx.inserts.push(Vec::new());
    }
    let mut out: SmallVec<[NodeId; 8]> = SmallVec::with_capacity(children.len());
    let mut changed = false;
    for &child in children {
        let rewrite = visit(cx, pass, child);
        if statements {
            if let Some(frame) = cx.inserts.last_mut() {
                if !frame.is_empty() {
                    changed = true;
                    out.extend(frame.drain(..));
                }
            }
        }
        match rewrite {
            Rewrite::Keep => out.push(child),
            Rewrite::Replace(new) => {
                changed = true;
                out.push(new);
            }
            Rewrite::Remove => changed = true,
        }
    }
    if statements {
        cx.inserts.pop();
    }
    if changed {
        cx.arena
            .kind_mut(parent)
            .set_slot(slot, SlotValue::Many(out.into_vec()));
    }
}

/// Whether slot `slot` of `kind` holds statements.
fn is_statement_list(kind: &NodeKind, slot: usize) -> bool {
    matches!(
        (kind, slot),
        (NodeKind::BlockStmt { .. }, 0) | (NodeKind::CaseClause { .. }, 1)
    )
}

#[cfg(test)]
mod tests;
