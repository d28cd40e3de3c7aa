use pretty_assertions::assert_eq;

use super::*;

#[test]
fn first_declaration_wins() {
    let mut tree = ScopeTree::new();
    assert!(tree.declare(ScopeId::ROOT, Object::variable("x", Some(GoType::INT))));
    assert!(!tree.declare(ScopeId::ROOT, Object::variable("x", Some(GoType::STRING))));
    let arena = GoArena::new();
    assert_eq!(
        tree.type_of_name(&arena, ScopeId::ROOT, "x"),
        Some(GoType::INT)
    );
}

#[test]
fn lookup_walks_outward_and_shadowing_is_local() {
    let mut tree = ScopeTree::new();
    let arena = GoArena::new();
    tree.declare(ScopeId::ROOT, Object::variable("x", Some(GoType::INT)));
    let inner = tree.child(ScopeId::ROOT);
    let innermost = tree.child(inner);

    assert_eq!(tree.lookup(innermost, "x").map(|(s, _)| s), Some(ScopeId::ROOT));
    assert!(tree.lookup_local(innermost, "x").is_none());

    assert!(tree.declare(inner, Object::variable("x", Some(GoType::STRING))));
    assert_eq!(
        tree.type_of_name(&arena, innermost, "x"),
        Some(GoType::STRING)
    );
    assert_eq!(
        tree.type_of_name(&arena, ScopeId::ROOT, "x"),
        Some(GoType::INT)
    );
    assert_eq!(tree.parent(innermost), Some(inner));
    assert_eq!(tree.names(inner), vec!["x"]);
}

#[test]
fn declaration_node_is_read_lazily() {
    let mut arena = GoArena::new();
    let mut tree = ScopeTree::new();
    let results = arena.field_list(Vec::new());
    let func = arena.func_type(Vec::new(), results);
    tree.declare(
        ScopeId::ROOT,
        Object::with_decl("f", ObjKind::Function, func),
    );
    assert_eq!(
        tree.type_of_name(&arena, ScopeId::ROOT, "f"),
        Some(GoType::func(vec![], vec![]))
    );

    let int = arena.ident("int");
    let field = arena.field(&[], int);
    *arena.kind_mut(results) = pygo_ir::NodeKind::FieldList { list: vec![field] };
    assert_eq!(
        tree.type_of_name(&arena, ScopeId::ROOT, "f"),
        Some(GoType::func(vec![], vec![GoType::INT]))
    );
}

#[test]
fn missing_types_resolve_selectively() {
    let mut pending: crate::MissingTypes<&str> = crate::MissingTypes::new();
    for (i, action) in ["a", "b"].into_iter().enumerate() {
        pending.register(crate::MissingType {
            expr: NodeId::new(u32::try_from(i).unwrap_or_default()),
            source: NodeId::INVALID,
            scope: ScopeId::ROOT,
            name: None,
            actions: vec![action],
        });
    }
    let resolved = pending.take_resolved(|r| (r.actions == ["b"]).then_some(GoType::INT));
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].0.actions, vec!["b"]);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.take_all().len(), 1);
    assert!(pending.is_empty());
}
