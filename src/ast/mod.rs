//! The abstract tree (component B, §4.B).
//!
//! Nodes are tagged-variant sums (one enum per category: expressions,
//! statements, view nodes) rather than a class hierarchy — emission and
//! analysis use pattern matching throughout, per the Design Notes (§9)
//! preference for explicit matching over virtual dispatch.

pub mod capabilities;
pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty;
pub mod view;

pub use capabilities::{FreeIdentifiers, MemberDep, Modifications, Staticness};
pub use decl::{
    CallbackSignature, Component, DataField, DataTypeDecl, EnumDecl, Method, Parameter, Program,
    ReturnShape, RouteEntry, RouterBlock, StateVar,
};
pub use expr::{BinOp, CallArg, Expr, ExprKind, MatchArm, Pattern, PostfixOp, StringSegment, UnaryOp};
pub use stmt::{
    Assign, Block, CompoundIndexAssign, DestructureSlot, EachFor, IfElse, MemberAssign, RangeFor,
    ReturnValue, Stmt, TupleDestructure, VarDecl,
};
pub use ty::Ty;
pub use view::{
    ComponentInstantiation, HtmlElement, RoutePlaceholder, TextNode, ViewArg, ViewAttr, ViewForEach,
    ViewForRange, ViewIf, ViewNode,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Position, Span};
    use rustc_hash::FxHashSet;

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Ident(name.into()), Span::synthetic())
    }

    fn member(object: Expr, member_name: &str) -> Expr {
        Expr::new(
            ExprKind::Member {
                object: Box::new(object),
                member: member_name.into(),
            },
            Span::synthetic(),
        )
    }

    #[test]
    fn free_identifiers_of_binary_union_both_sides() {
        let expr = Expr::new(
            ExprKind::Binary {
                op: BinOp::Add,
                lhs: Box::new(ident("a")),
                rhs: Box::new(ident("b")),
            },
            Span::synthetic(),
        );
        let ids = expr.free_identifiers();
        assert_eq!(ids, FxHashSet::from_iter(["a".into(), "b".into()]));
    }

    #[test]
    fn member_deps_record_object_and_member() {
        let expr = member(ident("profile"), "name");
        let deps = expr.member_deps();
        assert_eq!(deps, vec![("profile".into(), "name".into())]);
    }

    #[test]
    fn string_interpolation_scans_embedded_identifiers_only() {
        let expr = Expr::new(
            ExprKind::StringLit(vec![
                StringSegment::Literal("count: ".into()),
                StringSegment::Interp(Box::new(ident("count"))),
                StringSegment::Literal(" done".into()),
            ]),
            Span::synthetic(),
        );
        assert_eq!(expr.free_identifiers(), FxHashSet::from_iter(["count".into()]));
        assert!(!expr.is_static());
    }

    #[test]
    fn literal_string_is_static() {
        let expr = Expr::new(
            ExprKind::StringLit(vec![StringSegment::Literal("hello".into())]),
            Span::synthetic(),
        );
        assert!(expr.is_static());
    }

    #[test]
    fn postfix_increment_writes_its_operand() {
        let stmt = Stmt::ExprStmt(Expr::new(
            ExprKind::Postfix {
                op: PostfixOp::Increment,
                operand: Box::new(ident("count")),
            },
            Span::synthetic(),
        ));
        assert_eq!(stmt.modifications(), FxHashSet::from_iter(["count".into()]));
    }

    #[test]
    fn push_call_on_simple_receiver_writes_receiver() {
        let push_call = Expr::new(
            ExprKind::Call {
                callee: Box::new(member(ident("items"), "push")),
                args: vec![CallArg {
                    expr: ident("x"),
                    by_reference: false,
                    by_move: false,
                }],
            },
            Span::synthetic(),
        );
        let stmt = Stmt::ExprStmt(push_call);
        assert_eq!(stmt.modifications(), FxHashSet::from_iter(["items".into()]));
    }

    #[test]
    fn indexed_assignment_writes_outermost_identifier() {
        let stmt = Stmt::CompoundIndexAssign(CompoundIndexAssign {
            target: ident("rows"),
            index: ident("i"),
            value: ident("v"),
            span: Span::synthetic(),
        });
        assert_eq!(stmt.modifications(), FxHashSet::from_iter(["rows".into()]));
    }

    #[test]
    fn member_assignment_writes_outermost_identifier() {
        let stmt = Stmt::MemberAssign(MemberAssign {
            target: ident("profile"),
            member: "name".into(),
            value: ident("v"),
            span: Span::synthetic(),
        });
        assert_eq!(stmt.modifications(), FxHashSet::from_iter(["profile".into()]));
    }

    #[test]
    fn root_identifier_sees_through_reference_and_move() {
        let reffed = Expr::new(
            ExprKind::Reference(Box::new(ident("canvas"))),
            Span::synthetic(),
        );
        assert_eq!(reffed.root_identifier().map(|n| &**n), Some("canvas"));
    }

    #[test]
    fn position_ordering_supports_line_scan() {
        let a = Position::new(2, 3);
        let b = Position::new(2, 4);
        assert!(a < b);
    }
}
