//! The LOLCODE abstract syntax tree.
//!
//! One variant per syntactic form, each carrying only the structural
//! children and the [`Span`] needed to report a runtime error against the
//! right source line — the parser discards everything else about the
//! token stream once a node is built.

use lolcode_util::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Noob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Numbr,
    Numbar,
    Yarn,
    Troof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    SumOf,
    DiffOf,
    ProduktOf,
    QuoshuntOf,
    ModOf,
    BiggrOf,
    SmallrOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolBinOp {
    BothOf,
    EitherOf,
    WonOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolTernaryOp {
    AllOf,
    AnyOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    BothSaem,
    Diffrint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStep {
    Uppin,
    Nerfin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCond {
    Til,
    Wile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Span,
    },
    VarAccess {
        name: String,
        span: Span,
    },
    ArithBin {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    BoolBin {
        op: BoolBinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    BoolUnary {
        operand: Box<Expr>,
        span: Span,
    },
    BoolTernary {
        op: BoolTernaryOp,
        operands: Vec<Expr>,
        span: Span,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    StrConcat {
        operands: Vec<Expr>,
        span: Span,
    },
    Typecast {
        source: Box<Expr>,
        target: TypeKeyword,
        span: Span,
    },
    FuncCall {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::VarAccess { span, .. }
            | Expr::ArithBin { span, .. }
            | Expr::BoolBin { span, .. }
            | Expr::BoolUnary { span, .. }
            | Expr::BoolTernary { span, .. }
            | Expr::Compare { span, .. }
            | Expr::StrConcat { span, .. }
            | Expr::Typecast { span, .. }
            | Expr::FuncCall { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A bare expression statement — covers plain `VarAccess`, standalone
    /// `func_call`, and any other expression evaluated for its `IT` value.
    Expr(Expr),
    Assign {
        name: String,
        value: Expr,
        span: Span,
    },
    Print {
        parts: Vec<Expr>,
        span: Span,
    },
    Input {
        name: String,
        span: Span,
    },
    Break(Span),
    If {
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
        span: Span,
    },
    Switch {
        cases: Vec<(Literal, Vec<Stmt>)>,
        default: Vec<Stmt>,
        span: Span,
    },
    Loop {
        label: String,
        var_name: String,
        step: LoopStep,
        condition: Option<(LoopCond, Expr)>,
        body: Vec<Stmt>,
        span: Span,
    },
    FuncDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        return_expr: Option<Expr>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub var_decls: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
}
