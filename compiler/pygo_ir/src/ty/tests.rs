use pretty_assertions::assert_eq;

use super::*;

fn round_trip(ty: &GoType) -> Option<GoType> {
    let mut arena = GoArena::new();
    let id = arena.type_expr(ty);
    GoType::from_expr(&arena, id)
}

#[test]
fn basic_names_resolve() {
    assert_eq!(BasicKind::from_name("float64"), Some(BasicKind::Float64));
    assert_eq!(BasicKind::from_name("byte"), Some(BasicKind::Byte));
    assert_eq!(BasicKind::from_name("error"), None);
}

#[test]
fn composite_types_survive_materialization() {
    let cases = [
        GoType::slice(GoType::STRING),
        GoType::map(GoType::STRING, GoType::slice(GoType::INT)),
        GoType::Array(3, Box::new(GoType::FLOAT64)),
        GoType::pointer(GoType::qualified("os", "File")),
        GoType::chan(ChanDir::Recv, GoType::INT),
        GoType::map(GoType::Any, GoType::empty_struct()),
        GoType::func(vec![GoType::INT, GoType::STRING], vec![GoType::BOOL]),
    ];
    for ty in cases {
        assert_eq!(round_trip(&ty), Some(ty.clone()), "{ty}");
    }
}

#[test]
fn value_identifiers_are_not_types() {
    let mut arena = GoArena::new();
    let nil = arena.nil();
    let named = arena.ident("Point");
    assert_eq!(GoType::from_expr(&arena, nil), None);
    assert_eq!(
        GoType::from_expr(&arena, named),
        Some(GoType::Named("Point".into()))
    );
}

#[test]
fn variadic_signature_reads_ellipsis() {
    let ty = GoType::Func(FuncSig {
        params: vec![GoType::slice(GoType::Any)],
        results: vec![],
        variadic: true,
    });
    assert_eq!(round_trip(&ty), Some(ty));
}

#[test]
fn display_matches_go_syntax() {
    assert_eq!(
        GoType::map(GoType::STRING, GoType::slice(GoType::INT)).to_string(),
        "map[string][]int"
    );
    assert_eq!(GoType::Any.to_string(), "interface{}");
    assert_eq!(
        GoType::func(vec![], vec![GoType::chan(ChanDir::Recv, GoType::INT)]).to_string(),
        "func() <-chan int"
    );
}

#[test]
fn sized_and_deep_equal_predicates() {
    assert!(GoType::STRING.is_sized());
    assert!(GoType::map(GoType::INT, GoType::INT).is_sized());
    assert!(!GoType::INT.is_sized());
    assert!(GoType::slice(GoType::BYTE).is_byte_slice());
    assert!(GoType::slice(GoType::INT).needs_deep_equal());
    assert!(!GoType::STRING.needs_deep_equal());
    assert!(GoType::slice(GoType::Any).contains_any());
}
