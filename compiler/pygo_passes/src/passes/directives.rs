//! Directives left in the tree by templates.

use pygo_ir::{directive, GoArena, NodeId, NodeKind, Token};
use rustc_hash::FxHashMap;

use crate::walk::{Cx, Pass, Rewrite};

/// `PYGO_INIT := func() { ... }` statements become `func init()`
/// declarations, one per distinct initializer.
#[derive(Default)]
pub(crate) struct InsertUniqueInitializers {
    found: Vec<NodeId>,
    /// Structural hash to the initializers already found with it.
    seen: FxHashMap<u64, Vec<NodeId>>,
}

impl InsertUniqueInitializers {
    fn is_new(&mut self, cx: &Cx<'_>, lit: NodeId) -> bool {
        let hash = cx.arena.structural_hash(lit);
        let same = self.seen.entry(hash).or_default();
        if same.iter().any(|&other| cx.arena.structurally_eq(other, lit)) {
            return false;
        }
        same.push(lit);
        true
    }
}

/// The function literal of an initializer statement.
fn initializer(cx: &Cx<'_>, id: NodeId) -> Option<NodeId> {
    let NodeKind::AssignStmt { lhs, rhs, .. } = cx.arena.get(id)? else {
        return None;
    };
    match (lhs.as_slice(), rhs.as_slice()) {
        ([target], [lit]) if cx.arena.is_ident(*target, directive::INIT) => {
            matches!(cx.arena.get(*lit), Some(NodeKind::FuncLit { .. })).then_some(*lit)
        }
        _ => None,
    }
}

impl Pass for InsertUniqueInitializers {
    fn name(&self) -> &'static str {
        "InsertUniqueInitializers"
    }

    fn repeatable(&self) -> bool {
        false
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        let Some(lit) = initializer(cx, id) else {
            return Rewrite::Keep;
        };
        if self.is_new(cx, lit) {
            self.found.push(lit);
        }
        Rewrite::Remove
    }

    fn finish(&mut self, cx: &mut Cx<'_>) {
        if self.found.is_empty() {
            return;
        }
        let mut inits = Vec::with_capacity(self.found.len());
        for lit in self.found.drain(..) {
            let Some(NodeKind::FuncLit { ty, body }) = cx.arena.get(lit) else {
                continue;
            };
            let (ty, body) = (*ty, *body);
            inits.push(cx.arena.alloc(NodeKind::FuncDecl {
                recv: NodeId::INVALID,
                name: "init".to_owned(),
                ty,
                body,
            }));
        }
        tracing::debug!(count = inits.len(), "hoisted initializers");
        let root = cx.root;
        let at = leading_imports(cx.arena, root);
        if let NodeKind::File { decls, .. } = cx.arena.kind_mut(root) {
            decls.splice(at..at, inits);
        }
    }
}

/// Number of import declarations at the start of the file.
fn leading_imports(arena: &GoArena, file: NodeId) -> usize {
    let Some(NodeKind::File { decls, .. }) = arena.get(file) else {
        return 0;
    };
    decls
        .iter()
        .take_while(|&&d| {
            matches!(
                arena.get(d),
                Some(NodeKind::GenDecl {
                    tok: Token::Import,
                    ..
                })
            )
        })
        .count()
}

/// `PYGO_INLINE = x` queues `x`; the next `PYGO_INLINE` identifier
/// becomes it.
#[derive(Default)]
pub(crate) struct ApplyInlines {
    queued: Vec<NodeId>,
}

impl Pass for ApplyInlines {
    fn name(&self) -> &'static str {
        "ApplyInlines"
    }

    fn leave(&mut self, cx: &mut Cx<'_>, id: NodeId) -> Rewrite {
        match cx.arena.kind(id) {
            NodeKind::AssignStmt { lhs, tok, rhs } => match (lhs.as_slice(), rhs.as_slice()) {
                ([target], [value])
                    if matches!(tok, Token::Assign | Token::Define)
                        && cx.arena.is_ident(*target, directive::INLINE) =>
                {
                    self.queued.push(*value);
                    Rewrite::Remove
                }
                _ => Rewrite::Keep,
            },
            NodeKind::Ident { name } if name == directive::INLINE && !is_inline_target(cx, id) => {
                match self.queued.pop() {
                    Some(value) => Rewrite::Replace(value),
                    None => Rewrite::Keep,
                }
            }
            _ => Rewrite::Keep,
        }
    }
}

/// Whether `id` is the left-hand side of the statement that queues a value.
fn is_inline_target(cx: &Cx<'_>, id: NodeId) -> bool {
    cx.parent().is_some_and(|parent| {
        matches!(cx.arena.get(parent), Some(NodeKind::AssignStmt { lhs, .. }) if lhs.contains(&id))
    })
}

#[cfg(test)]
mod tests;
