//! The rewrite passes, in pipeline order.
//!
//! Each pass is one rule family. Passes are constructed fresh for every
//! run, so state they collect never leaks between iterations.

mod calls;
mod cleanup;
mod directives;
mod errors;
mod generators;
mod idioms;
mod loops;
mod narrowing;
mod operators;

use pygo_ir::{GoArena, NodeId, NodeKind};

use crate::walk::Pass;

/// Stage 0: directives left by templates, resolved before any scoping.
pub(crate) fn stage0() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(directives::InsertUniqueInitializers::default()),
        Box::new(directives::ApplyInlines::default()),
    ]
}

/// Stage 1: the scope-aware bulk of the pipeline.
pub(crate) fn stage1() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(idioms::UseConstructorIfAvailable::default()),
        Box::new(idioms::PrintToFmtPrintln),
        Box::new(idioms::CapitalizeMathModuleCalls),
        Box::new(idioms::ReplacePythonStyleAppends),
        Box::new(idioms::PythonToGoTypes),
        Box::new(loops::UnpackRange),
        Box::new(loops::RangeRangeToFor),
        Box::new(operators::SpecialComparators),
        Box::new(narrowing::IndexExpressionsHelpTypeMaps),
        Box::new(operators::AppendSliceViaUnpacking),
        Box::new(generators::YieldTransformer),
        Box::new(loops::YieldRangeTransformer),
        Box::new(operators::ReplacePowWithMathPow),
        Box::new(cleanup::ScopeResolution),
        Box::new(loops::LoopThroughSetValuesNotKeys),
        Box::new(loops::LoopThroughFileLines),
        Box::new(calls::IterFuncs),
        Box::new(calls::IterMethods),
        Box::new(operators::NegativeIndexesSubtractFromLen),
        Box::new(operators::StringifyStringMember),
        Box::new(operators::HandleTypeCoercion),
        Box::new(idioms::RequestsToHttp),
        Box::new(errors::HttpErrors),
        Box::new(errors::FileWritesAndErrors::default()),
        Box::new(errors::HandleUnhandledErrorsAndDefers),
        Box::new(idioms::AddTextTemplateImportForFStrings::default()),
        Box::new(generators::AsyncTransformer),
        Box::new(cleanup::InitStmt),
        Box::new(calls::FillDefaultsAndSortKeywords),
        Box::new(operators::Truthiness),
        Box::new(cleanup::InitializeNamedParamMaps),
        Box::new(calls::PySnippetSwitches),
        Box::new(calls::CallTypeInformation),
        Box::new(calls::UntypedFunctionsTypedByCalls),
        Box::new(narrowing::NarrowInterfaceTypes::default()),
        Box::new(cleanup::TypeSwitchStatementsRedeclareWithType),
        Box::new(cleanup::RemoveUnnecessaryFunctionLiterals),
        Box::new(cleanup::RemoveGoCallReturns),
        Box::new(cleanup::RemoveBadStmt),
        Box::new(cleanup::MergeAdjacentInits),
    ]
}

/// Stage 2: scaffolding removed once, after convergence.
pub(crate) fn stage2() -> Vec<Box<dyn Pass>> {
    vec![Box::new(cleanup::RemoveIfNameEqualsMain)]
}

// Shape helpers shared by the passes.

/// Callee name of `f(...)` when `f` is a bare identifier.
fn callee_name(arena: &GoArena, call: NodeId) -> Option<&str> {
    match arena.get(call)? {
        NodeKind::CallExpr { fun, .. } => arena.ident_name(*fun),
        _ => None,
    }
}

/// `(x, sel)` of a call `x.sel(...)`.
fn method_call(arena: &GoArena, call: NodeId) -> Option<(NodeId, &str)> {
    let NodeKind::CallExpr { fun, .. } = arena.get(call)? else {
        return None;
    };
    match arena.get(*fun)? {
        NodeKind::SelectorExpr { x, sel } => Some((*x, sel)),
        _ => None,
    }
}

/// `(pkg, sel)` of a selector `pkg.sel` on a bare identifier.
fn qualified(arena: &GoArena, id: NodeId) -> Option<(&str, &str)> {
    match arena.get(id)? {
        NodeKind::SelectorExpr { x, sel } => Some((arena.ident_name(*x)?, sel)),
        _ => None,
    }
}

/// Arguments of a call, or an empty list.
fn call_args(arena: &GoArena, call: NodeId) -> Vec<NodeId> {
    match arena.get(call) {
        Some(NodeKind::CallExpr { args, .. }) => args.clone(),
        _ => Vec::new(),
    }
}

/// Replace `old` with `new` wherever the tree under `root` refers to it.
/// For rewrites decided after the walk has moved past the node.
fn replace_node(arena: &mut GoArena, root: NodeId, old: NodeId, new: NodeId) -> bool {
    let parents = arena.parents(root);
    match parents.parent(old) {
        Some(parent) => arena.kind_mut(parent).replace_child(old, new),
        None => false,
    }
}

/// Whether `id` is the integer literal `value`.
fn is_int_lit(arena: &GoArena, id: NodeId, value: &str) -> bool {
    matches!(arena.get(id), Some(NodeKind::BasicLit { kind: pygo_ir::Token::Int, value: v }) if v == value)
}

#[cfg(test)]
pub(crate) mod tests;
