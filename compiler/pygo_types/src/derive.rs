//! Bottom-up type derivation for Go expressions.
//!
//! `None` means "not known yet". The caller decides whether that becomes a
//! deferred [`MissingType`](crate::MissingType) or an `interface{}`.

use pygo_ir::{BasicKind, GoArena, GoType, NodeId, NodeKind, Token};

use crate::{ObjKind, ScopeId, ScopeTree};

/// Read-only view used to derive expression types in one scope.
#[derive(Copy, Clone)]
pub struct TypeCx<'a> {
    pub arena: &'a GoArena,
    pub scopes: &'a ScopeTree,
    pub scope: ScopeId,
}

impl<'a> TypeCx<'a> {
    pub fn new(arena: &'a GoArena, scopes: &'a ScopeTree, scope: ScopeId) -> Self {
        TypeCx {
            arena,
            scopes,
            scope,
        }
    }

    /// Type of the expression `id`.
    pub fn type_of(&self, id: NodeId) -> Option<GoType> {
        if let Some(ty) = self.arena.ty(id) {
            return Some(ty.clone());
        }
        match self.arena.get(id)? {
            NodeKind::Ident { name } => self.ident_type(name),
            NodeKind::BasicLit { kind, .. } => literal_type(*kind),
            NodeKind::CompositeLit { ty, .. } => GoType::from_expr(self.arena, *ty),
            NodeKind::FuncLit { ty, .. } => GoType::from_expr(self.arena, *ty),
            NodeKind::ParenExpr { x } => self.type_of(*x),
            NodeKind::SelectorExpr { x, sel } => self.selector_type(*x, sel),
            NodeKind::IndexExpr { x, index } => self.index_type(*x, *index),
            NodeKind::SliceExpr { x, .. } => match self.type_of(*x)? {
                GoType::Array(_, elt) => Some(GoType::Slice(elt)),
                other => Some(other),
            },
            NodeKind::TypeAssertExpr { ty, .. } => GoType::from_expr(self.arena, *ty),
            NodeKind::CallExpr { fun, args, .. } => self.call_type(*fun, args),
            NodeKind::StarExpr { x } => match self.type_of(*x)? {
                GoType::Pointer(elt) => Some(*elt),
                _ => None,
            },
            NodeKind::UnaryExpr { op, x } => match op {
                Token::Not => Some(GoType::BOOL),
                Token::Arrow => match self.type_of(*x)? {
                    GoType::Chan(_, elt) => Some(*elt),
                    _ => None,
                },
                Token::And => self.type_of(*x).map(GoType::pointer),
                _ => self.type_of(*x),
            },
            NodeKind::BinaryExpr { x, op, y } => {
                if op.is_comparison() || op.is_logical() {
                    return Some(GoType::BOOL);
                }
                if matches!(op, Token::Shl | Token::Shr) {
                    return self.type_of(*x);
                }
                self.operand_type(*x, *y)
            }
            _ => None,
        }
    }

    /// Arithmetic result: the non-literal operand's type wins, then the
    /// first operand that resolves.
    fn operand_type(&self, x: NodeId, y: NodeId) -> Option<GoType> {
        let is_lit = |id| matches!(self.arena.get(id), Some(NodeKind::BasicLit { .. }));
        let (first, second) = if is_lit(x) && !is_lit(y) { (y, x) } else { (x, y) };
        self.type_of(first).or_else(|| self.type_of(second))
    }

    fn ident_type(&self, name: &str) -> Option<GoType> {
        match name {
            "true" | "false" => return Some(GoType::BOOL),
            "nil" | "_" => return None,
            _ => {}
        }
        let (_, obj) = self.scopes.lookup(self.scope, name)?;
        if obj.kind == ObjKind::Type {
            return None;
        }
        obj.resolved_type(self.arena)
    }

    fn selector_type(&self, x: NodeId, sel: &str) -> Option<GoType> {
        if let Some(pkg) = self.package_name(x) {
            return package_value(pkg, sel);
        }
        let recv = self.type_of(x)?;
        let named = match &recv {
            GoType::Pointer(inner) => inner.as_ref(),
            other => other,
        };
        match named {
            GoType::Named(type_name) if type_name == "error" && sel == "Error" => {
                Some(GoType::func(Vec::new(), vec![GoType::STRING]))
            }
            GoType::Named(type_name) => {
                if let Some(GoType::Struct(fields)) = self.named_type(type_name) {
                    if let Some((_, ty)) = fields.iter().find(|(f, _)| f == sel) {
                        return Some(ty.clone());
                    }
                }
                self.scopes
                    .type_of_name(self.arena, ScopeId::ROOT, &method_key(type_name, sel))
            }
            GoType::Qualified { pkg, name } => known_method(pkg, name, sel).map(GoType::Func),
            GoType::Struct(fields) => fields
                .iter()
                .find(|(f, _)| f == sel)
                .map(|(_, ty)| ty.clone()),
            _ => None,
        }
    }

    fn index_type(&self, x: NodeId, index: NodeId) -> Option<GoType> {
        match self.type_of(x)? {
            GoType::Basic(BasicKind::String) => Some(GoType::BYTE),
            GoType::Slice(elt) | GoType::Array(_, elt) => match self.type_of(index) {
                Some(idx) if !idx.is_integer() => Some(GoType::Slice(elt)),
                _ => Some(*elt),
            },
            GoType::Map(_, value) => Some(*value),
            GoType::Pointer(inner) => match *inner {
                GoType::Slice(elt) | GoType::Array(_, elt) => Some(*elt),
                _ => None,
            },
            _ => None,
        }
    }

    fn call_type(&self, fun: NodeId, args: &[NodeId]) -> Option<GoType> {
        if let Some(ty) = self.conversion_type(fun) {
            return Some(ty);
        }
        if let NodeKind::Ident { name } = self.arena.kind(fun) {
            if self.scopes.lookup(self.scope, name).is_none() {
                if let Some(ty) = self.builtin_call_type(name, args) {
                    return ty;
                }
            }
        }
        if let Some(pkg) = self.selector_package(fun) {
            if let NodeKind::SelectorExpr { sel, .. } = self.arena.kind(fun) {
                if let Some(ty) = package_call(pkg, sel) {
                    return ty;
                }
            }
        }
        match self.type_of(fun)? {
            GoType::Func(sig) => results_type(sig.results),
            _ => None,
        }
    }

    /// `Some(result)` for a builtin (where `result` may itself be `None`
    /// for a statement-like builtin), `None` if `name` is not a builtin.
    fn builtin_call_type(&self, name: &str, args: &[NodeId]) -> Option<Option<GoType>> {
        let first = args.first().copied().unwrap_or(NodeId::INVALID);
        Some(match name {
            "len" | "cap" | "copy" => Some(GoType::INT),
            "append" => self.type_of(first),
            "make" => GoType::from_expr(self.arena, first),
            "new" => GoType::from_expr(self.arena, first).map(GoType::pointer),
            "complex" => Some(GoType::Basic(BasicKind::Complex128)),
            "real" | "imag" => Some(GoType::FLOAT64),
            "recover" => Some(GoType::Any),
            "panic" | "print" | "println" | "delete" | "close" => None,
            _ => return None,
        })
    }

    /// `T(x)` conversions: `fun` spells a type.
    fn conversion_type(&self, fun: NodeId) -> Option<GoType> {
        match self.arena.get(fun)? {
            NodeKind::Ident { name } => {
                if let Some(kind) = BasicKind::from_name(name) {
                    return Some(GoType::Basic(kind));
                }
                match self.scopes.lookup(self.scope, name) {
                    Some((_, obj)) if obj.kind == ObjKind::Type => Some(GoType::Named(name.clone())),
                    _ => None,
                }
            }
            NodeKind::ParenExpr { x } => match self.arena.get(*x)? {
                NodeKind::StarExpr { .. } | NodeKind::ChanType { .. } | NodeKind::FuncType { .. } => {
                    GoType::from_expr(self.arena, *x)
                }
                _ => None,
            },
            kind if kind.is_type_expr() => GoType::from_expr(self.arena, fun),
            _ => None,
        }
    }

    /// Package name if `x` is an identifier not bound in scope.
    fn package_name(&self, x: NodeId) -> Option<&'a str> {
        let name = self.arena.ident_name(x)?;
        if self.scopes.lookup(self.scope, name).is_some() {
            return None;
        }
        Some(name)
    }

    fn selector_package(&self, fun: NodeId) -> Option<&'a str> {
        match self.arena.get(fun)? {
            NodeKind::SelectorExpr { x, .. } => self.package_name(*x),
            _ => None,
        }
    }

    /// Underlying type of a type declared in this package.
    pub fn named_type(&self, name: &str) -> Option<GoType> {
        let (_, obj) = self.scopes.lookup(self.scope, name)?;
        if obj.kind != ObjKind::Type {
            return None;
        }
        GoType::from_expr(self.arena, obj.decl)
    }
}

/// Root-scope key under which a method is declared.
pub fn method_key(type_name: &str, method: &str) -> String {
    format!("{type_name}.{method}")
}

pub fn literal_type(kind: Token) -> Option<GoType> {
    Some(match kind {
        Token::Int => GoType::INT,
        Token::Float => GoType::FLOAT64,
        Token::Imag => GoType::Basic(BasicKind::Complex128),
        Token::Char => GoType::BYTE,
        Token::String => GoType::STRING,
        _ => return None,
    })
}

fn results_type(mut results: Vec<GoType>) -> Option<GoType> {
    match results.len() {
        0 => None,
        1 => results.pop(),
        _ => Some(GoType::Tuple(results)),
    }
}

fn tuple(types: &[GoType]) -> Option<GoType> {
    Some(GoType::Tuple(types.to_vec()))
}

fn error() -> GoType {
    GoType::Named("error".into())
}

/// Result type of a package-level function call. `Some(None)` marks a
/// known function without results.
fn package_call(pkg: &str, func: &str) -> Option<Option<GoType>> {
    let string = || Some(GoType::STRING);
    let boolean = || Some(GoType::BOOL);
    let int = || Some(GoType::INT);
    Some(match (pkg, func) {
        ("strings", "Contains" | "HasPrefix" | "HasSuffix" | "EqualFold" | "ContainsAny") => {
            boolean()
        }
        ("strings", "Index" | "LastIndex" | "Count" | "IndexAny") => int(),
        (
            "strings",
            "ToUpper" | "ToLower" | "TrimSpace" | "Trim" | "TrimLeft" | "TrimRight" | "TrimPrefix"
            | "TrimSuffix" | "TrimFunc" | "TrimLeftFunc" | "TrimRightFunc" | "Replace"
            | "ReplaceAll" | "Join" | "Repeat" | "Title" | "Map",
        ) => string(),
        ("strings", "Split" | "SplitN" | "Fields") => Some(GoType::slice(GoType::STRING)),
        ("strings", "NewReader") => Some(GoType::pointer(GoType::qualified("strings", "Reader"))),
        ("bytes", "Contains" | "HasPrefix" | "Equal") => boolean(),
        ("fmt", "Sprintf" | "Sprint" | "Sprintln") => string(),
        ("fmt", "Errorf") | ("errors", "New") => Some(error()),
        ("fmt", "Println" | "Printf" | "Print") => tuple(&[GoType::INT, error()]),
        ("math", "MaxInt" | "MinInt") => int(),
        ("math", _) => Some(GoType::FLOAT64),
        ("rand", "Float64") => Some(GoType::FLOAT64),
        ("rand", "Intn" | "Int") => int(),
        ("rand", "Perm") => Some(GoType::slice(GoType::INT)),
        ("rand", "Seed" | "Shuffle") => None,
        ("strconv", "Itoa" | "FormatInt" | "FormatFloat" | "Quote") => string(),
        ("strconv", "Atoi") => tuple(&[GoType::INT, error()]),
        ("strconv", "ParseInt") => tuple(&[GoType::Basic(BasicKind::Int64), error()]),
        ("strconv", "ParseFloat") => tuple(&[GoType::FLOAT64, error()]),
        ("strconv", "ParseBool") => tuple(&[GoType::BOOL, error()]),
        ("sort", "Ints" | "Strings" | "Float64s" | "Sort" | "Slice") => None,
        ("sort", "Reverse") => Some(GoType::qualified("sort", "Interface")),
        ("sort", kind @ ("IntSlice" | "StringSlice" | "Float64Slice")) => {
            Some(GoType::qualified("sort", kind))
        }
        ("os", "OpenFile" | "Open" | "Create") => {
            tuple(&[GoType::pointer(GoType::qualified("os", "File")), error()])
        }
        ("ioutil" | "io", "ReadAll") => tuple(&[GoType::slice(GoType::BYTE), error()]),
        ("json", "Marshal") => tuple(&[GoType::slice(GoType::BYTE), error()]),
        ("time", "Now") => Some(GoType::qualified("time", "Time")),
        ("time", "Since") => Some(GoType::qualified("time", "Duration")),
        ("time", "Sleep") => None,
        ("reflect", "DeepEqual") => boolean(),
        ("unicode", "IsUpper" | "IsLower" | "IsDigit" | "IsLetter" | "IsSpace" | "IsNumber") => {
            boolean()
        }
        ("unicode", "ToUpper" | "ToLower" | "ToTitle") => Some(GoType::Basic(BasicKind::Rune)),
        ("http", "Get" | "Head" | "Post" | "PostForm") => {
            tuple(&[GoType::pointer(GoType::qualified("http", "Response")), error()])
        }
        ("bufio", "NewScanner") => Some(GoType::pointer(GoType::qualified("bufio", "Scanner"))),
        ("bufio", "NewReader") => Some(GoType::pointer(GoType::qualified("bufio", "Reader"))),
        ("template", "Must" | "New") => {
            Some(GoType::pointer(GoType::qualified("template", "Template")))
        }
        ("log", "Println" | "Printf" | "Fatal") => None,
        _ => return None,
    })
}

/// Type of a package-level value such as `os.Args`.
fn package_value(pkg: &str, name: &str) -> Option<GoType> {
    Some(match (pkg, name) {
        ("os", "Args") => GoType::slice(GoType::STRING),
        ("os", "Stdin" | "Stdout" | "Stderr") => GoType::pointer(GoType::qualified("os", "File")),
        ("math", "Pi" | "E" | "Inf") => GoType::FLOAT64,
        ("math", "MaxInt" | "MinInt") => GoType::INT,
        ("time", "Second" | "Millisecond" | "Minute" | "Hour") => {
            GoType::qualified("time", "Duration")
        }
        _ => match package_call(pkg, name)? {
            Some(result) => GoType::func(Vec::new(), vec![result]),
            None => GoType::func(Vec::new(), Vec::new()),
        },
    })
}

/// Methods on standard-library types the lowered code calls.
fn known_method(pkg: &str, type_name: &str, method: &str) -> Option<pygo_ir::FuncSig> {
    let results = match (pkg, type_name, method) {
        ("os", "File", "WriteString" | "Write") => vec![GoType::INT, error()],
        ("os", "File", "Close") => vec![error()],
        ("os", "File", "Name") => vec![GoType::STRING],
        ("bufio", "Scanner", "Text") => vec![GoType::STRING],
        ("bufio", "Scanner", "Scan") => vec![GoType::BOOL],
        ("bufio", "Reader", "ReadString") => vec![GoType::STRING, error()],
        ("strings", "Builder", "String") => vec![GoType::STRING],
        ("strings", "Builder", "WriteRune" | "WriteString") => vec![GoType::INT, error()],
        ("bytes", "Buffer", "String") => vec![GoType::STRING],
        ("time", "Time", "Unix" | "UnixNano") => vec![GoType::Basic(BasicKind::Int64)],
        ("time", "Duration", "Seconds") => vec![GoType::FLOAT64],
        _ => return None,
    };
    Some(pygo_ir::FuncSig {
        params: Vec::new(),
        results,
        variadic: false,
    })
}

#[cfg(test)]
mod tests;
