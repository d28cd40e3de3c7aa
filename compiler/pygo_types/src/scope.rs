//! Lexical scopes.
//!
//! Scopes form a tree rooted at [`ScopeId::ROOT`]. Each walk of the syntax
//! tree builds a fresh `ScopeTree`, opening a child scope per lexical block
//! and discarding the whole tree when the walk ends.

use pygo_ir::{GoArena, GoType, NodeId};
use rustc_hash::FxHashMap;

/// Handle to a scope in a [`ScopeTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The package scope.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a declared name denotes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjKind {
    Bad,
    Package,
    Constant,
    Type,
    Variable,
    Function,
    Label,
}

/// A declared name.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,
    pub kind: ObjKind,
    /// Type known at declaration time.
    pub ty: Option<GoType>,
    /// Type expression node the declaration spells, if any. Read lazily so
    /// that in-place refinements of the declaration (inferred function
    /// results, narrowed parameters) are seen by later lookups.
    pub decl: NodeId,
}

impl Object {
    pub fn variable(name: &str, ty: Option<GoType>) -> Self {
        Object {
            name: name.to_owned(),
            kind: ObjKind::Variable,
            ty,
            decl: NodeId::INVALID,
        }
    }

    pub fn with_decl(name: &str, kind: ObjKind, decl: NodeId) -> Self {
        Object {
            name: name.to_owned(),
            kind,
            ty: None,
            decl,
        }
    }

    /// The object's type: its declaration node if that spells a type,
    /// else the type recorded at declaration.
    pub fn resolved_type(&self, arena: &GoArena) -> Option<GoType> {
        GoType::from_expr(arena, self.decl).or_else(|| self.ty.clone())
    }
}

#[derive(Clone, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    objects: FxHashMap<String, Object>,
}

/// All scopes opened during one walk.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope {
                parent: None,
                objects: FxHashMap::default(),
            }],
        }
    }

    /// Open a child scope of `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent: Some(parent),
            objects: FxHashMap::default(),
        });
        id
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.index()).and_then(|s| s.parent)
    }

    pub fn is_root(scope: ScopeId) -> bool {
        scope == ScopeId::ROOT
    }

    /// Insert `object` into `scope`. The first declaration of a name in a
    /// scope wins; returns `false` if the name was already bound there.
    pub fn declare(&mut self, scope: ScopeId, object: Object) -> bool {
        let Some(s) = self.scopes.get_mut(scope.index()) else {
            return false;
        };
        if s.objects.contains_key(&object.name) {
            return false;
        }
        tracing::trace!(name = %object.name, scope = scope.index(), "declare");
        s.objects.insert(object.name.clone(), object);
        true
    }

    /// Find `name` in `scope` or the nearest enclosing scope.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, &Object)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id.index())?;
            if let Some(obj) = s.objects.get(name) {
                return Some((id, obj));
            }
            current = s.parent;
        }
        None
    }

    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Object> {
        self.scopes.get(scope.index())?.objects.get(name)
    }

    pub fn object_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Object> {
        self.scopes.get_mut(scope.index())?.objects.get_mut(name)
    }

    /// Names bound directly in `scope`, sorted.
    pub fn names(&self, scope: ScopeId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .get(scope.index())
            .map(|s| s.objects.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Type of `name` as seen from `scope`.
    pub fn type_of_name(&self, arena: &GoArena, scope: ScopeId, name: &str) -> Option<GoType> {
        self.lookup(scope, name)
            .and_then(|(_, obj)| obj.resolved_type(arena))
    }
}

#[cfg(test)]
mod tests;
