//! Type checker (component C, §4.C): one substage per submodule, applied
//! in order, fail-fast on the first [`TypeError`] (§7).

mod component;
mod error;
mod router;
mod scope;
mod types;
mod views;
mod visibility;

pub use error::TypeError;
pub use scope::Scope;

use std::collections::HashMap;

use crate::ast::decl::{Parameter, Program};
use crate::base::{FileId, Name};
use crate::schema::SchemaStore;
use rustc_hash::FxHashSet;

/// Per-component metadata retained for cross-component lookups
/// (substages 7/8), kept separate from the live `Component` so the
/// per-method pass (substage 5) can still borrow components mutably.
#[derive(Debug, Clone)]
pub struct ComponentMeta {
    pub name: Name,
    pub module: Name,
    pub file: FileId,
    pub public: bool,
    pub params: Vec<Parameter>,
}

/// Global registrations built once after parse (substage 2): enum names,
/// data-type field maps, and a (module, name) -> metadata index of every
/// component in the program.
pub struct GlobalContext {
    pub enums: FxHashSet<Name>,
    pub data_types: HashMap<Name, Vec<(Name, crate::ast::ty::Ty)>>,
    pub components: HashMap<(Name, Name), ComponentMeta>,
}

/// Runs all eight substages of §4.C in order over the whole program,
/// returning the first error encountered.
pub fn check_program(
    program: &mut Program,
    schema: &SchemaStore,
    default_module: &Name,
) -> Result<(), TypeError> {
    component::check_name_collisions(program, schema)?;
    let ctx = component::build_global_context(program);
    component::validate_data_types(program, schema)?;

    for c in &program.components {
        component::validate_component_decls(c, &ctx, schema)?;
    }
    for c in &mut program.components {
        component::check_methods(c, &ctx, schema)?;
    }
    for c in &program.components {
        views::check_component_views(c, &ctx, schema)?;
    }
    for c in &program.components {
        visibility::check_component_visibility(c, program, &ctx, default_module)?;
    }
    for c in &program.components {
        router::check_router(c, program, &ctx, default_module)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl::{Component, Method, ReturnShape};
    use crate::ast::expr::{ExprKind, ExprNode};
    use crate::ast::stmt::{Assign, Block, Stmt, VarDecl};
    use crate::ast::ty::Ty;
    use crate::base::Span;

    fn ident(name: &str) -> crate::ast::expr::Expr {
        ExprNode::new(ExprKind::Ident(name.into()), Span::synthetic())
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
    fn write_to_immutable_binding_is_rejected() {
        let mut component = empty_component("Counter");
        component.methods.push(Method {
            name: "tick".into(),
            params: vec![],
            return_shape: ReturnShape::Void,
            body: Block {
                statements: vec![
                    Stmt::VarDecl(VarDecl {
                        name: "x".into(),
                        declared_ty: Some(Ty::Int32),
                        mutable: false,
                        by_reference: false,
                        init: ExprNode::new(ExprKind::IntLit(0), Span::synthetic()),
                        span: Span::synthetic(),
                    }),
                    Stmt::Assign(Assign {
                        target: "x".into(),
                        value: ExprNode::new(ExprKind::IntLit(1), Span::synthetic()),
                        span: Span::synthetic(),
                    }),
                ],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
            modifications: Default::default(),
        });
        let mut program = Program {
            components: vec![component],
            enums: vec![],
            data_types: vec![],
            imports: Default::default(),
        };
        let schema = SchemaStore::new();
        let err = check_program(&mut program, &schema, &"main".into()).unwrap_err();
        assert!(matches!(err, TypeError::WriteToImmutable { .. }));
    }

    #[test]
    fn unresolved_identifier_is_rejected() {
        let mut component = empty_component("Widget");
        component.methods.push(Method {
            name: "compute".into(),
            params: vec![],
            return_shape: ReturnShape::Void,
            body: Block {
                statements: vec![Stmt::ExprStmt(ident("nonexistent"))],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
            modifications: Default::default(),
        });
        let mut program = Program {
            components: vec![component],
            enums: vec![],
            data_types: vec![],
            imports: Default::default(),
        };
        let schema = SchemaStore::new();
        let err = check_program(&mut program, &schema, &"main".into()).unwrap_err();
        assert!(matches!(err, TypeError::UnresolvedIdentifier { .. }));
    }

    #[test]
    fn component_name_colliding_with_handle_type_is_rejected() {
        let mut sink = crate::diagnostics::DiagnosticSink::new();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.def"), "type Canvas { def noop(): void }").unwrap();
        let schema = SchemaStore::load(dir.path(), &mut sink);
        let component = empty_component("Canvas");
        let mut program = Program {
            components: vec![component],
            enums: vec![],
            data_types: vec![],
            imports: Default::default(),
        };
        let err = check_program(&mut program, &schema, &"main".into()).unwrap_err();
        assert!(matches!(
            err,
            TypeError::ComponentNameCollidesWithHandle { .. }
        ));
    }
}
