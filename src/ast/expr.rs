use crate::base::{Name, Span};
use crate::ast::ty::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn is_comparison_or_logical(self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

/// One segment of an interpolated string literal: either a literal chunk
/// or an embedded expression (`§4.B`: "string-interpolation segments are
/// scanned identifier-by-identifier; digits alone are ignored").
#[derive(Debug, Clone, PartialEq)]
pub enum StringSegment {
    Literal(String),
    Interp(Box<Expr>),
}

/// One `match` arm: a literal/enum pattern guarding a body expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wildcard,
    EnumVariant { enum_name: Option<Name>, variant: Name },
    IntLit(i64),
    BoolLit(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
    /// Populated post-analysis by the checker (§4.C inference table); the
    /// view compiler and emitter rely on this being `Some` after a
    /// successful type-check pass.
    pub inferred_ty: Option<Ty>,
}

pub type Expr = ExprNode;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StringLit(Vec<StringSegment>),
    BoolLit(bool),
    Ident(Name),
    Member {
        object: Box<Expr>,
        member: Name,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Call {
        /// The callee, as written (`foo`, `obj.method`, `Ns::func`).
        callee: Box<Expr>,
        args: Vec<CallArg>,
    },
    EnumAccess {
        enum_name: Option<Name>,
        variant: Name,
    },
    ArrayLit(Vec<Expr>),
    ArrayRepeat {
        value: Box<Expr>,
        count: usize,
    },
    /// `&expr` — takes a reference (§3, §4.C).
    Reference(Box<Expr>),
    /// `:expr` — moves a no-copy value (§3, §4.C).
    Move(Box<Expr>),
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Block(Box<crate::ast::stmt::Block>),
}

/// An argument at a call site, carrying the reference/move marker that the
/// checker validates against the callee's parameter list (§4.C substage 5).
#[derive(Debug, Clone, PartialEq)]
pub struct CallArg {
    pub expr: Expr,
    pub by_reference: bool,
    pub by_move: bool,
}

impl ExprNode {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            inferred_ty: None,
        }
    }

    /// The identifier this expression designates, if it is a bare name or
    /// a reference/move wrapping one — used to find "the outermost
    /// identifier" in assignment targets (§4.B rule 2).
    pub fn root_identifier(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => {
                object.root_identifier()
            }
            ExprKind::Reference(inner) | ExprKind::Move(inner) => inner.root_identifier(),
            _ => None,
        }
    }
}
