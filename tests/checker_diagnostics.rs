//! Integration tests for move discipline and tuple destructuring
//! diagnostics, driven through the public pipeline entry point rather
//! than by calling checker internals directly.

use viewc_core::ast::decl::{Component, Method, Program, ReturnShape, StateVar};
use viewc_core::ast::expr::{Expr, ExprKind};
use viewc_core::ast::stmt::{Block, DestructureSlot, Stmt, TupleDestructure, VarDecl};
use viewc_core::ast::ty::Ty;
use viewc_core::base::{FileId, Span};
use viewc_core::pipeline::{compile_with_schema_dir, CoreError};
use viewc_core::checker::TypeError;

fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Ident(name.into()), Span::synthetic())
}

fn empty_component(name: &str) -> Component {
    Component {
        name: name.into(),
        module: "main".into(),
        file: FileId::new(0),
        public: false,
        params: vec![],
        state: vec![],
        methods: vec![],
        enums: vec![],
        data_types: vec![],
        view: vec![],
        router: None,
        span: Span::synthetic(),
    }
}

#[test]
fn reading_a_moved_variable_is_rejected() {
    let mut component = empty_component("Widget");
    component.state.push(StateVar {
        name: "value".into(),
        ty: Ty::Int32,
        mutable: true,
        by_reference: false,
        public: false,
        init: Expr::new(ExprKind::IntLit(0), Span::synthetic()),
        span: Span::synthetic(),
    });
    component.methods.push(Method {
        name: "run".into(),
        params: vec![],
        return_shape: ReturnShape::Void,
        span: Span::synthetic(),
        modifications: Default::default(),
        body: Block {
            span: Span::synthetic(),
            statements: vec![
                Stmt::VarDecl(VarDecl {
                    name: "taken".into(),
                    declared_ty: None,
                    mutable: false,
                    by_reference: false,
                    init: Expr::new(ExprKind::Move(Box::new(ident("value"))), Span::synthetic()),
                    span: Span::synthetic(),
                }),
                Stmt::ExprStmt(ident("value")),
            ],
        },
    });

    let mut program = Program {
        components: vec![component],
        ..Program::default()
    };

    let err = compile_with_schema_dir(&mut program, std::path::Path::new("/nonexistent"))
        .expect_err("reading a moved variable must fail to check");
    match err {
        CoreError::Type(TypeError::UseOfMoved { name, .. }) => assert_eq!(name.as_ref(), "value"),
        other => panic!("expected UseOfMoved, got {other:?}"),
    }
}

#[test]
fn destructuring_a_non_tuple_call_reports_arity_mismatch() {
    let mut component = empty_component("Widget");
    component.methods.push(Method {
        name: "run".into(),
        params: vec![],
        return_shape: ReturnShape::Void,
        span: Span::synthetic(),
        modifications: Default::default(),
        body: Block {
            span: Span::synthetic(),
            statements: vec![Stmt::TupleDestructure(TupleDestructure {
                slots: vec![
                    DestructureSlot::Binding { name: "a".into(), declared_ty: None },
                    DestructureSlot::Binding { name: "b".into(), declared_ty: None },
                ],
                mutable: false,
                call: Expr::new(
                    ExprKind::Call {
                        callee: Box::new(ident("foo")),
                        args: vec![],
                    },
                    Span::synthetic(),
                ),
                span: Span::synthetic(),
            })],
        },
    });

    let mut program = Program {
        components: vec![component],
        ..Program::default()
    };

    let err = compile_with_schema_dir(&mut program, std::path::Path::new("/nonexistent"))
        .expect_err("destructuring a non-tuple call must fail to check");
    match err {
        CoreError::Type(TypeError::TupleArityMismatch { expected, found, .. }) => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected TupleArityMismatch, got {other:?}"),
    }
}
