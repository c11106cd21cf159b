use crate::ast::expr::Expr;
use crate::ast::ty::Ty;
use crate::base::{Name, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Name,
    pub declared_ty: Option<Ty>,
    pub mutable: bool,
    pub by_reference: bool,
    pub init: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Name,
    pub value: Expr,
    pub span: Span,
}

/// `target[index] op= value` or `target[index] = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundIndexAssign {
    pub target: Expr,
    pub index: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `target.member = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAssign {
    pub target: Expr,
    pub member: Name,
    pub value: Expr,
    pub span: Span,
}

/// One binding slot in a tuple destructure: `_` is a wildcard that is not
/// bound (§4.C substage 5).
#[derive(Debug, Clone, PartialEq)]
pub enum DestructureSlot {
    Wildcard,
    Binding { name: Name, declared_ty: Option<Ty> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleDestructure {
    pub slots: Vec<DestructureSlot>,
    pub mutable: bool,
    pub call: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    Void,
    Single(Expr),
    Tuple(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// `for i in start..end { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFor {
    pub var: Name,
    pub start: Expr,
    pub end: Expr,
    pub body: Block,
    pub span: Span,
}

/// `for item in iterable { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct EachFor {
    pub var: Name,
    pub iterable: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assign(Assign),
    CompoundIndexAssign(CompoundIndexAssign),
    MemberAssign(MemberAssign),
    TupleDestructure(TupleDestructure),
    ExprStmt(Expr),
    Return { value: ReturnValue, span: Span },
    Block(Block),
    IfElse(IfElse),
    RangeFor(RangeFor),
    EachFor(EachFor),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::CompoundIndexAssign(s) => s.span,
            Stmt::MemberAssign(s) => s.span,
            Stmt::TupleDestructure(s) => s.span,
            Stmt::ExprStmt(e) => e.span,
            Stmt::Return { span, .. } => *span,
            Stmt::Block(b) => b.span,
            Stmt::IfElse(s) => s.span,
            Stmt::RangeFor(s) => s.span,
            Stmt::EachFor(s) => s.span,
        }
    }
}
