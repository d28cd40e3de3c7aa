#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pygo_build::build;
use pygo_ir::{GoArena, NodeId, NodeKind, Token};
use pygo_py::{FunctionDef, Module, Stmt};
use pygo_snippets::SnippetRegistry;

use super::{
    call_args, callee_name, is_int_lit, method_call, qualified, replace_node, stage0, stage1,
    stage2,
};
use crate::walk::{walk, Pass, WalkReport};

/// A Go file assembled by hand, or built from Python, for running single
/// passes against.
pub(crate) struct Fixture {
    pub(crate) arena: GoArena,
    pub(crate) file: NodeId,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let mut arena = GoArena::new();
        let file = arena.alloc(NodeKind::File {
            package: "main".to_owned(),
            decls: Vec::new(),
        });
        Fixture { arena, file }
    }

    /// Build a module from Python statements.
    pub(crate) fn python(body: Vec<Stmt>) -> Self {
        let built =
            build(&Module { body }, &SnippetRegistry::standard()).expect("module should build");
        Fixture {
            arena: built.arena,
            file: built.file,
        }
    }

    /// Build `def main(): body`.
    pub(crate) fn python_main(body: Vec<Stmt>) -> Self {
        Self::python(vec![Stmt::FunctionDef(pygo_py::dsl::def("main", &[], body))])
    }

    /// Build a module of function definitions.
    pub(crate) fn python_defs(defs: Vec<FunctionDef>) -> Self {
        Self::python(defs.into_iter().map(Stmt::FunctionDef).collect())
    }

    pub(crate) fn push_decl(&mut self, decl: NodeId) {
        if let NodeKind::File { decls, .. } = self.arena.kind_mut(self.file) {
            decls.push(decl);
        }
    }

    /// Append `func name(params) results { body }`.
    pub(crate) fn func_with(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        results: NodeId,
        body: Vec<NodeId>,
    ) -> NodeId {
        let ty = self.arena.func_type(params, results);
        let body = self.arena.block(body);
        let decl = self.arena.alloc(NodeKind::FuncDecl {
            recv: NodeId::INVALID,
            name: name.to_owned(),
            ty,
            body,
        });
        self.push_decl(decl);
        decl
    }

    /// Append `func name() { body }`.
    pub(crate) fn func(&mut self, name: &str, body: Vec<NodeId>) -> NodeId {
        self.func_with(name, Vec::new(), NodeId::INVALID, body)
    }

    pub(crate) fn run(&mut self, pass: &mut dyn Pass) -> WalkReport {
        walk(&mut self.arena, self.file, pass)
    }

    pub(crate) fn decls(&self) -> Vec<NodeId> {
        match self.arena.kind(self.file) {
            NodeKind::File { decls, .. } => decls.clone(),
            other => panic!("expected a file, got {other:?}"),
        }
    }

    /// Sketch of the function declared as `name`.
    pub(crate) fn sketch_func(&self, name: &str) -> String {
        let decl = self
            .decls()
            .into_iter()
            .find(|&d| matches!(self.arena.kind(d), NodeKind::FuncDecl { name: n, .. } if n == name))
            .unwrap_or_else(|| panic!("no func {name} in {}", self.sketch()));
        self.arena.sketch(decl)
    }

    pub(crate) fn sketch(&self) -> String {
        self.arena.sketch(self.file)
    }
}

fn names(passes: &[Box<dyn Pass>]) -> Vec<&'static str> {
    passes.iter().map(|p| p.name()).collect()
}

#[test]
fn stage_order() {
    assert_eq!(
        names(&stage0()),
        vec!["InsertUniqueInitializers", "ApplyInlines"]
    );
    let stage1 = stage1();
    let order = names(&stage1);
    assert_eq!(order.len(), 40);
    assert_eq!(order.first(), Some(&"UseConstructorIfAvailable"));
    assert_eq!(order.last(), Some(&"MergeAdjacentInits"));
    let at = |name: &str| order.iter().position(|&n| n == name).unwrap();
    assert!(at("ScopeResolution") < at("IterFuncs"));
    assert!(at("HttpErrors") < at("HandleUnhandledErrorsAndDefers"));
    assert!(at("FillDefaultsAndSortKeywords") < at("PySnippetSwitches"));
    assert!(at("CallTypeInformation") < at("NarrowInterfaceTypes"));
    assert_eq!(names(&stage2()), vec!["RemoveIfNameEqualsMain"]);
}

#[test]
fn run_once_passes() {
    let once: Vec<&str> = stage0()
        .iter()
        .chain(stage1().iter())
        .filter(|p| !p.repeatable())
        .map(|p| p.name())
        .collect();
    assert_eq!(
        once,
        vec![
            "InsertUniqueInitializers",
            "YieldTransformer",
            "YieldRangeTransformer",
            "FileWritesAndErrors",
            "InitializeNamedParamMaps",
        ]
    );
}

#[test]
fn pass_names_are_unique() {
    let mut all: Vec<&str> = names(&stage0());
    all.extend(names(&stage1()));
    all.extend(names(&stage2()));
    let count = all.len();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), count);
}

#[test]
fn call_shapes() {
    let mut arena = GoArena::new();
    let x = arena.int_lit(1);
    let plain = arena.call_path("f", vec![x]);
    assert_eq!(callee_name(&arena, plain), Some("f"));
    assert_eq!(method_call(&arena, plain), None);
    assert_eq!(call_args(&arena, plain), vec![x]);

    let recv = arena.ident("xs");
    let fun = arena.sel(recv, "append");
    let method = arena.call(fun, Vec::new());
    assert_eq!(callee_name(&arena, method), None);
    assert_eq!(method_call(&arena, method), Some((recv, "append")));
    assert_eq!(qualified(&arena, fun), Some(("xs", "append")));
    assert!(call_args(&arena, recv).is_empty());
}

#[test]
fn qualified_needs_a_bare_package() {
    let mut arena = GoArena::new();
    let nested = arena.path("a.b.c");
    assert_eq!(qualified(&arena, nested), None);
    let ident = arena.ident("a");
    assert_eq!(qualified(&arena, ident), None);
}

#[test]
fn int_literal_match() {
    let mut arena = GoArena::new();
    let one = arena.int_lit(1);
    let text = arena.lit(Token::String, "\"1\"");
    assert!(is_int_lit(&arena, one, "1"));
    assert!(!is_int_lit(&arena, one, "2"));
    assert!(!is_int_lit(&arena, text, "1"));
}

#[test]
fn replace_node_finds_the_parent() {
    let mut fx = Fixture::new();
    let arg = fx.arena.ident("a");
    let call = fx.arena.call_path("f", vec![arg]);
    let stmt = fx.arena.expr_stmt(call);
    fx.func("main", vec![stmt]);
    let b = fx.arena.ident("b");
    assert!(replace_node(&mut fx.arena, fx.file, arg, b));
    assert_eq!(fx.sketch_func("main"), "func main() { f(b) }");

    let stray = fx.arena.ident("stray");
    assert!(!replace_node(&mut fx.arena, fx.file, stray, b));
}
