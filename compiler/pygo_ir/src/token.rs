//! Go token set, plus placeholder operators for Python constructs that
//! have no direct Go operator.
//!
//! The placeholders (`Pow`, `FloorDiv`, `Is`, `IsNot`, `In`, `NotIn`) are
//! produced by the builder and must be lowered by a rewrite pass before the
//! tree is serialized. The bridge renders any survivor as `token.ILLEGAL`.

/// A Go token, as used by `go/token`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Illegal,

    // Literal kinds
    Int,
    Float,
    Imag,
    Char,
    String,

    // Arithmetic and bitwise
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,

    // Op-assign
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,

    // Logical, comparison, misc
    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Lss,
    Gtr,
    Assign,
    Not,
    Neq,
    Leq,
    Geq,
    Define,

    // Keywords
    Break,
    Continue,
    Goto,
    Fallthrough,
    Import,
    Var,
    Const,
    Type,

    // Placeholders lowered by rewrite passes
    Pow,
    FloorDiv,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Token {
    /// The `go/token` constant name, e.g. `ADD_ASSIGN`.
    pub fn go_name(self) -> &'static str {
        match self {
            Token::Int => "INT",
            Token::Float => "FLOAT",
            Token::Imag => "IMAG",
            Token::Char => "CHAR",
            Token::String => "STRING",
            Token::Add => "ADD",
            Token::Sub => "SUB",
            Token::Mul => "MUL",
            Token::Quo => "QUO",
            Token::Rem => "REM",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Xor => "XOR",
            Token::Shl => "SHL",
            Token::Shr => "SHR",
            Token::AndNot => "AND_NOT",
            Token::AddAssign => "ADD_ASSIGN",
            Token::SubAssign => "SUB_ASSIGN",
            Token::MulAssign => "MUL_ASSIGN",
            Token::QuoAssign => "QUO_ASSIGN",
            Token::RemAssign => "REM_ASSIGN",
            Token::AndAssign => "AND_ASSIGN",
            Token::OrAssign => "OR_ASSIGN",
            Token::XorAssign => "XOR_ASSIGN",
            Token::ShlAssign => "SHL_ASSIGN",
            Token::ShrAssign => "SHR_ASSIGN",
            Token::AndNotAssign => "AND_NOT_ASSIGN",
            Token::LAnd => "LAND",
            Token::LOr => "LOR",
            Token::Arrow => "ARROW",
            Token::Inc => "INC",
            Token::Dec => "DEC",
            Token::Eql => "EQL",
            Token::Lss => "LSS",
            Token::Gtr => "GTR",
            Token::Assign => "ASSIGN",
            Token::Not => "NOT",
            Token::Neq => "NEQ",
            Token::Leq => "LEQ",
            Token::Geq => "GEQ",
            Token::Define => "DEFINE",
            Token::Break => "BREAK",
            Token::Continue => "CONTINUE",
            Token::Goto => "GOTO",
            Token::Fallthrough => "FALLTHROUGH",
            Token::Import => "IMPORT",
            Token::Var => "VAR",
            Token::Const => "CONST",
            Token::Type => "TYPE",
            Token::Illegal
            | Token::Pow
            | Token::FloorDiv
            | Token::Is
            | Token::IsNot
            | Token::In
            | Token::NotIn => "ILLEGAL",
        }
    }

    /// Source text of the operator, used in diagnostics and debug output.
    pub fn text(self) -> &'static str {
        match self {
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Quo => "/",
            Token::Rem => "%",
            Token::And => "&",
            Token::Or => "|",
            Token::Xor => "^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::AndNot => "&^",
            Token::AddAssign => "+=",
            Token::SubAssign => "-=",
            Token::MulAssign => "*=",
            Token::QuoAssign => "/=",
            Token::RemAssign => "%=",
            Token::AndAssign => "&=",
            Token::OrAssign => "|=",
            Token::XorAssign => "^=",
            Token::ShlAssign => "<<=",
            Token::ShrAssign => ">>=",
            Token::AndNotAssign => "&^=",
            Token::LAnd => "&&",
            Token::LOr => "||",
            Token::Arrow => "<-",
            Token::Inc => "++",
            Token::Dec => "--",
            Token::Eql => "==",
            Token::Lss => "<",
            Token::Gtr => ">",
            Token::Assign => "=",
            Token::Not => "!",
            Token::Neq => "!=",
            Token::Leq => "<=",
            Token::Geq => ">=",
            Token::Define => ":=",
            Token::Pow => "**",
            Token::FloorDiv => "//",
            Token::Is => "is",
            Token::IsNot => "is not",
            Token::In => "in",
            Token::NotIn => "not in",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Goto => "goto",
            Token::Fallthrough => "fallthrough",
            Token::Import => "import",
            Token::Var => "var",
            Token::Const => "const",
            Token::Type => "type",
            Token::Int | Token::Float | Token::Imag | Token::Char | Token::String => "literal",
            Token::Illegal => "ILLEGAL",
        }
    }

    /// Comparison operators always produce `bool`, including the
    /// membership and identity placeholders.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Token::Eql
                | Token::Neq
                | Token::Lss
                | Token::Leq
                | Token::Gtr
                | Token::Geq
                | Token::Is
                | Token::IsNot
                | Token::In
                | Token::NotIn
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Token::LAnd | Token::LOr)
    }

    /// Logical complement of a comparison, if there is one.
    pub fn negated(self) -> Option<Token> {
        Some(match self {
            Token::Eql => Token::Neq,
            Token::Neq => Token::Eql,
            Token::Lss => Token::Geq,
            Token::Geq => Token::Lss,
            Token::Gtr => Token::Leq,
            Token::Leq => Token::Gtr,
            Token::Is => Token::IsNot,
            Token::IsNot => Token::Is,
            Token::In => Token::NotIn,
            Token::NotIn => Token::In,
            _ => return None,
        })
    }

    /// The op-assign form of a binary operator (`+` → `+=`).
    pub fn to_assign(self) -> Option<Token> {
        Some(match self {
            Token::Add => Token::AddAssign,
            Token::Sub => Token::SubAssign,
            Token::Mul => Token::MulAssign,
            Token::Quo => Token::QuoAssign,
            Token::Rem => Token::RemAssign,
            Token::And => Token::AndAssign,
            Token::Or => Token::OrAssign,
            Token::Xor => Token::XorAssign,
            Token::Shl => Token::ShlAssign,
            Token::Shr => Token::ShrAssign,
            Token::AndNot => Token::AndNotAssign,
            _ => return None,
        })
    }

    /// The binary operator behind an op-assign (`+=` → `+`).
    pub fn from_assign(self) -> Option<Token> {
        Some(match self {
            Token::AddAssign => Token::Add,
            Token::SubAssign => Token::Sub,
            Token::MulAssign => Token::Mul,
            Token::QuoAssign => Token::Quo,
            Token::RemAssign => Token::Rem,
            Token::AndAssign => Token::And,
            Token::OrAssign => Token::Or,
            Token::XorAssign => Token::Xor,
            Token::ShlAssign => Token::Shl,
            Token::ShrAssign => Token::Shr,
            Token::AndNotAssign => Token::AndNot,
            _ => return None,
        })
    }

    /// Placeholders must not survive to serialization.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            Token::Pow | Token::FloorDiv | Token::Is | Token::IsNot | Token::In | Token::NotIn
        )
    }
}
