//! Kind → rule tables.
//!
//! Order within a table is priority order: the first rule that does not
//! decline wins. An empty table means the kind has no Go rendering in
//! that family.

use pygo_py::{Expr, Stmt};

use super::{
    calls, classes, comprehensions, decls, exceptions, exprs, literals, operators, snippets,
    stmts, ExprRule, Rule, StmtRule,
};

const NONE: &[ExprRule] = &[];
const NO_STMT: &[StmtRule] = &[];

const CONSTANT: &[ExprRule] = &[Rule {
    name: "constant",
    apply: literals::constant,
}];
const NAME: &[ExprRule] = &[
    Rule {
        name: "empty-struct",
        apply: literals::empty_struct,
    },
    Rule {
        name: "name",
        apply: literals::name,
    },
];
const LIST: &[ExprRule] = &[Rule {
    name: "list",
    apply: literals::list,
}];
const TUPLE: &[ExprRule] = &[Rule {
    name: "tuple",
    apply: literals::tuple,
}];
const DICT: &[ExprRule] = &[Rule {
    name: "dict",
    apply: literals::dict,
}];
const SET: &[ExprRule] = &[Rule {
    name: "set",
    apply: literals::set,
}];
const BOOL_OP: &[ExprRule] = &[Rule {
    name: "bool-op",
    apply: operators::bool_op,
}];
const BIN_OP: &[ExprRule] = &[
    Rule {
        name: "deref",
        apply: operators::deref,
    },
    Rule {
        name: "bin-op",
        apply: operators::bin_op,
    },
];
const UNARY_OP: &[ExprRule] = &[Rule {
    name: "unary-op",
    apply: operators::unary_op,
}];
const COMPARE: &[ExprRule] = &[Rule {
    name: "compare",
    apply: operators::compare,
}];
const CALL: &[ExprRule] = &[
    Rule {
        name: "rune",
        apply: calls::rune,
    },
    Rule {
        name: "no-snippet",
        apply: calls::no_snippet,
    },
    Rule {
        name: "zero-value-constructor",
        apply: calls::zero_value,
    },
    Rule {
        name: "snippet",
        apply: snippets::call,
    },
    Rule {
        name: "isinstance",
        apply: calls::isinstance,
    },
    Rule {
        name: "open",
        apply: calls::open,
    },
    Rule {
        name: "call",
        apply: calls::plain,
    },
];
const NAMED_EXPR: &[ExprRule] = &[Rule {
    name: "walrus",
    apply: exprs::walrus,
}];
const LAMBDA: &[ExprRule] = &[Rule {
    name: "lambda",
    apply: exprs::lambda,
}];
const IF_EXP: &[ExprRule] = &[Rule {
    name: "if-exp",
    apply: exprs::if_exp,
}];
const AWAIT: &[ExprRule] = &[Rule {
    name: "await",
    apply: exprs::await_,
}];
const JOINED_STR: &[ExprRule] = &[Rule {
    name: "f-string",
    apply: exprs::f_string,
}];
const ATTRIBUTE: &[ExprRule] = &[Rule {
    name: "attribute",
    apply: exprs::attribute,
}];
const SUBSCRIPT: &[ExprRule] = &[
    Rule {
        name: "slice",
        apply: exprs::slice,
    },
    Rule {
        name: "index",
        apply: exprs::index,
    },
];
const LIST_COMP: &[ExprRule] = &[Rule {
    name: "list-comp",
    apply: comprehensions::list_comp,
}];
const SET_COMP: &[ExprRule] = &[Rule {
    name: "set-comp",
    apply: comprehensions::set_comp,
}];
const DICT_COMP: &[ExprRule] = &[Rule {
    name: "dict-comp",
    apply: comprehensions::dict_comp,
}];
const GENERATOR_EXP: &[ExprRule] = &[Rule {
    name: "generator-exp",
    apply: comprehensions::generator_exp,
}];

pub(super) fn expr_rules(expr: &Expr) -> &'static [ExprRule] {
    match expr {
        Expr::Constant { .. } => CONSTANT,
        Expr::Name { .. } => NAME,
        Expr::List { .. } => LIST,
        Expr::Tuple { .. } => TUPLE,
        Expr::Dict { .. } => DICT,
        Expr::Set { .. } => SET,
        Expr::BoolOp { .. } => BOOL_OP,
        Expr::BinOp { .. } => BIN_OP,
        Expr::UnaryOp { .. } => UNARY_OP,
        Expr::Compare { .. } => COMPARE,
        Expr::Call(_) => CALL,
        Expr::NamedExpr { .. } => NAMED_EXPR,
        Expr::Lambda { .. } => LAMBDA,
        Expr::IfExp { .. } => IF_EXP,
        Expr::Await { .. } => AWAIT,
        Expr::JoinedStr { .. } => JOINED_STR,
        Expr::Attribute { .. } => ATTRIBUTE,
        Expr::Subscript { .. } => SUBSCRIPT,
        Expr::ListComp { .. } => LIST_COMP,
        Expr::SetComp { .. } => SET_COMP,
        Expr::DictComp { .. } => DICT_COMP,
        Expr::GeneratorExp { .. } => GENERATOR_EXP,
        Expr::Yield { .. }
        | Expr::YieldFrom { .. }
        | Expr::FormattedValue { .. }
        | Expr::Starred { .. }
        | Expr::Slice { .. }
        | Expr::Unsupported { .. } => NONE,
    }
}

const NESTED_DEF: &[StmtRule] = &[Rule {
    name: "nested-def",
    apply: decls::nested_def,
}];
const RETURN: &[StmtRule] = &[Rule {
    name: "return",
    apply: stmts::return_,
}];
const DELETE: &[StmtRule] = &[Rule {
    name: "delete",
    apply: stmts::delete,
}];
const ASSIGN: &[StmtRule] = &[Rule {
    name: "assign",
    apply: stmts::assign,
}];
const AUG_ASSIGN: &[StmtRule] = &[
    Rule {
        name: "store",
        apply: stmts::store,
    },
    Rule {
        name: "aug-assign",
        apply: stmts::aug_assign,
    },
];
const ANN_ASSIGN: &[StmtRule] = &[Rule {
    name: "ann-assign",
    apply: stmts::ann_assign,
}];
const FOR: &[StmtRule] = &[Rule {
    name: "for",
    apply: stmts::for_,
}];
const WHILE: &[StmtRule] = &[Rule {
    name: "while",
    apply: stmts::while_,
}];
const IF: &[StmtRule] = &[
    Rule {
        name: "type-switch",
        apply: stmts::type_switch,
    },
    Rule {
        name: "if",
        apply: stmts::if_,
    },
];
const MATCH: &[StmtRule] = &[Rule {
    name: "match",
    apply: stmts::match_,
}];
const WITH: &[StmtRule] = &[Rule {
    name: "with",
    apply: exceptions::with,
}];
const RAISE: &[StmtRule] = &[Rule {
    name: "raise",
    apply: exceptions::raise,
}];
const TRY: &[StmtRule] = &[Rule {
    name: "try",
    apply: exceptions::try_,
}];
const ASSERT: &[StmtRule] = &[Rule {
    name: "assert",
    apply: exceptions::assert,
}];
const GLOBAL: &[StmtRule] = &[Rule {
    name: "global",
    apply: stmts::global,
}];
const EXPR: &[StmtRule] = &[
    Rule {
        name: "bare-constant",
        apply: stmts::bare_constant,
    },
    Rule {
        name: "yield",
        apply: stmts::yield_,
    },
    Rule {
        name: "yield-from",
        apply: stmts::yield_from,
    },
    Rule {
        name: "snippet-stmts",
        apply: snippets::stmts,
    },
    Rule {
        name: "expr",
        apply: stmts::expr,
    },
];
const SIMPLE: &[StmtRule] = &[Rule {
    name: "simple",
    apply: stmts::simple,
}];

pub(super) fn stmt_rules(stmt: &Stmt) -> &'static [StmtRule] {
    match stmt {
        Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) => NESTED_DEF,
        Stmt::Return { .. } => RETURN,
        Stmt::Delete { .. } => DELETE,
        Stmt::Assign { .. } => ASSIGN,
        Stmt::AugAssign { .. } => AUG_ASSIGN,
        Stmt::AnnAssign { .. } => ANN_ASSIGN,
        Stmt::For(_) => FOR,
        Stmt::While { .. } => WHILE,
        Stmt::If { .. } => IF,
        Stmt::Match { .. } => MATCH,
        Stmt::With { .. } => WITH,
        Stmt::Raise { .. } => RAISE,
        Stmt::Try(_) => TRY,
        Stmt::Assert { .. } => ASSERT,
        Stmt::Global { .. } | Stmt::Nonlocal { .. } => GLOBAL,
        Stmt::Expr { .. } => EXPR,
        Stmt::Pass | Stmt::Break | Stmt::Continue => SIMPLE,
        Stmt::ClassDef(_)
        | Stmt::Import { .. }
        | Stmt::ImportFrom { .. }
        | Stmt::Unsupported { .. } => NO_STMT,
    }
}

const FUNC_DECL: &[StmtRule] = &[Rule {
    name: "func-decl",
    apply: decls::func_decl,
}];
const CLASS: &[StmtRule] = &[Rule {
    name: "class",
    apply: classes::class,
}];
const IMPORT: &[StmtRule] = &[Rule {
    name: "import",
    apply: decls::import,
}];
const TOP_ASSIGN: &[StmtRule] = &[
    Rule {
        name: "global-assign",
        apply: decls::global_assign,
    },
    Rule {
        name: "var",
        apply: decls::var,
    },
    Rule {
        name: "global-code",
        apply: decls::global_code,
    },
];
const TOP_EXPR: &[StmtRule] = &[
    Rule {
        name: "docstring",
        apply: decls::docstring,
    },
    Rule {
        name: "global-code",
        apply: decls::global_code,
    },
];
const GLOBAL_CODE: &[StmtRule] = &[Rule {
    name: "global-code",
    apply: decls::global_code,
}];

pub(super) fn decl_rules(stmt: &Stmt) -> &'static [StmtRule] {
    match stmt {
        Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) => FUNC_DECL,
        Stmt::ClassDef(_) => CLASS,
        Stmt::Import { .. } | Stmt::ImportFrom { .. } => IMPORT,
        Stmt::Assign { .. } | Stmt::AnnAssign { .. } => TOP_ASSIGN,
        Stmt::Expr { .. } => TOP_EXPR,
        _ => GLOBAL_CODE,
    }
}
