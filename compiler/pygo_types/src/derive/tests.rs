use pretty_assertions::assert_eq;

use super::*;
use crate::Object;

struct Fixture {
    arena: GoArena,
    scopes: ScopeTree,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            arena: GoArena::new(),
            scopes: ScopeTree::new(),
        }
    }

    fn var(&mut self, name: &str, ty: GoType) {
        self.scopes
            .declare(ScopeId::ROOT, Object::variable(name, Some(ty)));
    }

    fn ty(&self, id: NodeId) -> Option<GoType> {
        TypeCx::new(&self.arena, &self.scopes, ScopeId::ROOT).type_of(id)
    }
}

#[test]
fn literals_follow_the_fixed_table() {
    let mut f = Fixture::new();
    let cases = [
        (Token::Int, GoType::INT),
        (Token::Float, GoType::FLOAT64),
        (Token::String, GoType::STRING),
        (Token::Imag, GoType::Basic(BasicKind::Complex128)),
        (Token::Char, GoType::BYTE),
    ];
    for (kind, expected) in cases {
        let lit = f.arena.lit(kind, "0");
        assert_eq!(f.ty(lit), Some(expected));
    }
}

#[test]
fn comparisons_are_bool_and_arithmetic_takes_operand_type() {
    let mut f = Fixture::new();
    f.var("x", GoType::FLOAT64);
    let x = f.arena.ident("x");
    let one = f.arena.int_lit(1);
    let sum = f.arena.binary(one, Token::Add, x);
    assert_eq!(f.ty(sum), Some(GoType::FLOAT64));

    let y = f.arena.ident("y");
    let two = f.arena.int_lit(2);
    let cmp = f.arena.binary(y, Token::Lss, two);
    assert_eq!(f.ty(cmp), Some(GoType::BOOL));

    let unknown = f.arena.ident("y");
    let three = f.arena.int_lit(3);
    let mixed = f.arena.binary(unknown, Token::Mul, three);
    assert_eq!(f.ty(mixed), Some(GoType::INT));
}

#[test]
fn indexing_rules() {
    let mut f = Fixture::new();
    f.var("s", GoType::STRING);
    f.var("xs", GoType::slice(GoType::STRING));
    f.var("m", GoType::map(GoType::STRING, GoType::INT));
    f.var("k", GoType::STRING);

    let s = f.arena.ident("s");
    let zero = f.arena.int_lit(0);
    let idx = f.arena.index(s, zero);
    assert_eq!(f.ty(idx), Some(GoType::BYTE));

    let xs = f.arena.ident("xs");
    let i = f.arena.int_lit(1);
    let elt = f.arena.index(xs, i);
    assert_eq!(f.ty(elt), Some(GoType::STRING));

    let xs = f.arena.ident("xs");
    let k = f.arena.ident("k");
    let odd = f.arena.index(xs, k);
    assert_eq!(f.ty(odd), Some(GoType::slice(GoType::STRING)));

    let m = f.arena.ident("m");
    let k = f.arena.ident("k");
    let value = f.arena.index(m, k);
    assert_eq!(f.ty(value), Some(GoType::INT));
}

#[test]
fn calls_use_declared_results_and_known_packages() {
    let mut f = Fixture::new();
    f.var("f", GoType::func(vec![], vec![GoType::STRING, GoType::BOOL]));
    let call = f.arena.call_path("f", vec![]);
    assert_eq!(
        f.ty(call),
        Some(GoType::Tuple(vec![GoType::STRING, GoType::BOOL]))
    );

    let contains = f.arena.call_path("strings.Contains", vec![]);
    assert_eq!(f.ty(contains), Some(GoType::BOOL));

    let n = f.arena.ident("n");
    let length = f.arena.call_path("len", vec![n]);
    assert_eq!(f.ty(length), Some(GoType::INT));

    let made = f.arena.make_call(&GoType::map(GoType::STRING, GoType::INT), vec![]);
    assert_eq!(f.ty(made), Some(GoType::map(GoType::STRING, GoType::INT)));

    let x = f.arena.ident("x");
    let conv = f.arena.convert(&GoType::FLOAT64, x);
    assert_eq!(f.ty(conv), Some(GoType::FLOAT64));

    let pi = f.arena.path("math.Pi");
    assert_eq!(f.ty(pi), Some(GoType::FLOAT64));
}

#[test]
fn library_calls_used_by_templates_are_typed() {
    let mut f = Fixture::new();
    let parsed = f.arena.call_path("strconv.ParseInt", vec![]);
    assert_eq!(
        f.ty(parsed),
        Some(GoType::Tuple(vec![
            GoType::Basic(BasicKind::Int64),
            GoType::Named("error".into())
        ]))
    );

    let trimmed = f.arena.call_path("strings.TrimLeftFunc", vec![]);
    assert_eq!(f.ty(trimmed), Some(GoType::STRING));

    let ints = f.arena.call_path("sort.IntSlice", vec![]);
    assert_eq!(f.ty(ints), Some(GoType::qualified("sort", "IntSlice")));

    f.var(
        "reader",
        GoType::pointer(GoType::qualified("bufio", "Reader")),
    );
    let reader = f.arena.ident("reader");
    let read = f.arena.sel(reader, "ReadString");
    let line = f.arena.call(read, vec![]);
    assert_eq!(
        f.ty(line),
        Some(GoType::Tuple(vec![
            GoType::STRING,
            GoType::Named("error".into())
        ]))
    );
}

#[test]
fn shadowed_builtin_uses_the_binding() {
    let mut f = Fixture::new();
    f.var("len", GoType::func(vec![], vec![GoType::STRING]));
    let call = f.arena.call_path("len", vec![]);
    assert_eq!(f.ty(call), Some(GoType::STRING));
}

#[test]
fn struct_fields_and_methods() {
    let mut f = Fixture::new();
    let struct_ty = f
        .arena
        .type_expr(&GoType::Struct(vec![("X".into(), GoType::INT)]));
    f.scopes.declare(
        ScopeId::ROOT,
        Object::with_decl("Point", ObjKind::Type, struct_ty),
    );
    let method = f.arena.type_expr(&GoType::func(vec![], vec![GoType::STRING]));
    f.scopes.declare(
        ScopeId::ROOT,
        Object::with_decl(&method_key("Point", "Name"), ObjKind::Function, method),
    );
    f.var("p", GoType::pointer(GoType::Named("Point".into())));

    let p = f.arena.ident("p");
    let x = f.arena.sel(p, "X");
    assert_eq!(f.ty(x), Some(GoType::INT));

    let p = f.arena.ident("p");
    let name = f.arena.sel(p, "Name");
    let call = f.arena.call(name, vec![]);
    assert_eq!(f.ty(call), Some(GoType::STRING));
}

#[test]
fn explicit_type_slot_wins() {
    let mut f = Fixture::new();
    let open = f.arena.call_path("custom", vec![]);
    assert_eq!(f.ty(open), None);
    f.arena
        .set_ty(open, GoType::pointer(GoType::qualified("os", "File")));
    assert_eq!(
        f.ty(open),
        Some(GoType::pointer(GoType::qualified("os", "File")))
    );
}
