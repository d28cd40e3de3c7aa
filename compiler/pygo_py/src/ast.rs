//! Python syntax tree.
//!
//! Mirrors the node classes of Python's `ast` module, restricted to the
//! fields the transpiler reads. The JSON form is `{"_type": "<Class>",
//! ...fields}`; unknown fields (locations, `ctx`, `type_comment`) are
//! ignored. Node classes the front-end does not model arrive as
//! `Unsupported { kind, source }`.

use serde::Deserialize;

/// A whole module.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "_type")]
pub enum Stmt {
    FunctionDef(FunctionDef),
    AsyncFunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return {
        value: Option<Expr>,
    },
    Delete {
        targets: Vec<Expr>,
    },
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        target: Expr,
        op: Operator,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    For(For),
    While {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Stmt>,
    },
    Match {
        subject: Expr,
        cases: Vec<MatchCase>,
    },
    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
    },
    Try(Try),
    Assert {
        test: Expr,
        msg: Option<Expr>,
    },
    Import {
        names: Vec<Alias>,
    },
    ImportFrom {
        module: Option<String>,
        names: Vec<Alias>,
    },
    Global {
        names: Vec<String>,
    },
    Nonlocal {
        names: Vec<String>,
    },
    Expr {
        value: Expr,
    },
    Pass,
    Break,
    Continue,
    Unsupported {
        kind: String,
        source: String,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "_type")]
pub enum Expr {
    BoolOp {
        op: BoolOperator,
        values: Vec<Expr>,
    },
    NamedExpr {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Lambda {
        args: Box<Arguments>,
        body: Box<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// A `None` key is a `**mapping` unpacking entry.
    Dict {
        keys: Vec<Option<Expr>>,
        values: Vec<Expr>,
    },
    Set {
        elts: Vec<Expr>,
    },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Await {
        value: Box<Expr>,
    },
    Yield {
        value: Option<Box<Expr>>,
    },
    YieldFrom {
        value: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOperator>,
        comparators: Vec<Expr>,
    },
    Call(Call),
    FormattedValue {
        value: Box<Expr>,
        #[serde(default = "no_conversion")]
        conversion: i64,
        format_spec: Option<Box<Expr>>,
    },
    JoinedStr {
        values: Vec<Expr>,
    },
    Constant {
        value: Constant,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
    },
    Starred {
        value: Box<Expr>,
    },
    Name {
        id: String,
    },
    List {
        elts: Vec<Expr>,
    },
    Tuple {
        elts: Vec<Expr>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Unsupported {
        kind: String,
        source: String,
    },
}

fn no_conversion() -> i64 {
    -1
}

/// A literal value. Numbers keep their source spelling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Constant {
    Int(String),
    Float(String),
    Str(String),
    Bool(bool),
    None,
    Bytes(Vec<u8>),
    Complex { real: String, imag: String },
    Ellipsis,
    /// A constant the front-end could not classify; carries its `repr`.
    Unsupported(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Call {
    pub func: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
    pub returns: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<Expr>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct For {
    pub target: Expr,
    pub iter: Expr,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Try {
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub handlers: Vec<ExceptHandler>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(default)]
    pub finalbody: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub posonlyargs: Vec<Arg>,
    #[serde(default)]
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    #[serde(default)]
    pub kwonlyargs: Vec<Arg>,
    #[serde(default)]
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Arg>,
    /// Defaults for the last `defaults.len()` positional parameters.
    #[serde(default)]
    pub defaults: Vec<Expr>,
}

impl Arguments {
    /// Positional parameters, positional-only first.
    pub fn positional(&self) -> impl Iterator<Item = &Arg> {
        self.posonlyargs.iter().chain(&self.args)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Arg {
    pub arg: String,
    pub annotation: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Keyword {
    /// `None` for `**kwargs` unpacking.
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WithItem {
    pub context_expr: Expr,
    pub optional_vars: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExceptHandler {
    #[serde(rename = "type")]
    pub typ: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    #[serde(default)]
    pub ifs: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "_type")]
pub enum Pattern {
    MatchValue {
        value: Expr,
    },
    MatchSingleton {
        value: Constant,
    },
    /// `case _:` when both fields are empty; `case x:` binds `name`.
    MatchAs {
        pattern: Option<Box<Pattern>>,
        name: Option<String>,
    },
    MatchOr {
        patterns: Vec<Pattern>,
    },
    Unsupported {
        kind: String,
        source: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "_type")]
pub enum Operator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "_type")]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "_type")]
pub enum UnaryOperator {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "_type")]
pub enum CmpOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Stmt {
    /// Python class name of this statement.
    pub fn kind_name(&self) -> &str {
        match self {
            Stmt::FunctionDef(_) => "FunctionDef",
            Stmt::AsyncFunctionDef(_) => "AsyncFunctionDef",
            Stmt::ClassDef(_) => "ClassDef",
            Stmt::Return { .. } => "Return",
            Stmt::Delete { .. } => "Delete",
            Stmt::Assign { .. } => "Assign",
            Stmt::AugAssign { .. } => "AugAssign",
            Stmt::AnnAssign { .. } => "AnnAssign",
            Stmt::For(_) => "For",
            Stmt::While { .. } => "While",
            Stmt::If { .. } => "If",
            Stmt::With { .. } => "With",
            Stmt::Match { .. } => "Match",
            Stmt::Raise { .. } => "Raise",
            Stmt::Try(_) => "Try",
            Stmt::Assert { .. } => "Assert",
            Stmt::Import { .. } => "Import",
            Stmt::ImportFrom { .. } => "ImportFrom",
            Stmt::Global { .. } => "Global",
            Stmt::Nonlocal { .. } => "Nonlocal",
            Stmt::Expr { .. } => "Expr",
            Stmt::Pass => "Pass",
            Stmt::Break => "Break",
            Stmt::Continue => "Continue",
            Stmt::Unsupported { kind, .. } => kind,
        }
    }
}

impl Expr {
    /// Python class name of this expression.
    pub fn kind_name(&self) -> &str {
        match self {
            Expr::BoolOp { .. } => "BoolOp",
            Expr::NamedExpr { .. } => "NamedExpr",
            Expr::BinOp { .. } => "BinOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::Lambda { .. } => "Lambda",
            Expr::IfExp { .. } => "IfExp",
            Expr::Dict { .. } => "Dict",
            Expr::Set { .. } => "Set",
            Expr::ListComp { .. } => "ListComp",
            Expr::SetComp { .. } => "SetComp",
            Expr::DictComp { .. } => "DictComp",
            Expr::GeneratorExp { .. } => "GeneratorExp",
            Expr::Await { .. } => "Await",
            Expr::Yield { .. } => "Yield",
            Expr::YieldFrom { .. } => "YieldFrom",
            Expr::Compare { .. } => "Compare",
            Expr::Call(_) => "Call",
            Expr::FormattedValue { .. } => "FormattedValue",
            Expr::JoinedStr { .. } => "JoinedStr",
            Expr::Constant { .. } => "Constant",
            Expr::Attribute { .. } => "Attribute",
            Expr::Subscript { .. } => "Subscript",
            Expr::Starred { .. } => "Starred",
            Expr::Name { .. } => "Name",
            Expr::List { .. } => "List",
            Expr::Tuple { .. } => "Tuple",
            Expr::Slice { .. } => "Slice",
            Expr::Unsupported { kind, .. } => kind,
        }
    }

    /// Identifier of a `Name` expression.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name { id } => Some(id),
            _ => None,
        }
    }

    /// Dotted text of a pure `Name`/`Attribute` chain, e.g. `os.path.join`.
    pub fn dotted(&self) -> Option<String> {
        match self {
            Expr::Name { id } => Some(id.clone()),
            Expr::Attribute { value, attr } => Some(format!("{}.{attr}", value.dotted()?)),
            _ => None,
        }
    }
}
