//! Feature & header detector (component G, §4.G).
//!
//! A single read-only scanning pass over an already type-checked
//! [`Program`], producing a [`FeatureFlags`] record that downstream
//! emission gates runtime-support declarations and event-dispatch switch
//! arms on. Runs last in the pipeline (§5 ordering), after the tree's
//! `inferred_ty` fields have been populated by the checker.

use rustc_hash::FxHashSet;

use crate::ast::decl::Program;
use crate::ast::expr::{Expr, ExprKind};
use crate::ast::ty::Ty;
use crate::ast::view::{HtmlElement, ViewNode};
use crate::base::Name;
use crate::schema::SchemaStore;

/// One of the four event kinds the view compiler emits dispatch arms for
/// (§4.G).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    Change,
    KeyDown,
}

impl EventKind {
    fn from_attr(attr: &str) -> Option<Self> {
        match attr {
            "onclick" => Some(EventKind::Click),
            "oninput" => Some(EventKind::Input),
            "onchange" => Some(EventKind::Change),
            "onkeydown" => Some(EventKind::KeyDown),
            _ => None,
        }
    }
}

/// Namespaces whose presence gates a runtime-support declaration
/// (§4.G "specific namespace usages").
const TRACKED_NAMESPACES: &[&str] = &["keyboard", "router", "fetch", "websocket", "json"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub events: FxHashSet<EventKind>,
    pub namespaces: FxHashSet<String>,
    pub handle_types: FxHashSet<Name>,
}

/// Run the scan over the whole program (§4.G).
pub fn scan_program(program: &Program, schema: &SchemaStore) -> FeatureFlags {
    let mut flags = FeatureFlags::default();
    for component in &program.components {
        for param in &component.params {
            record_handle_type(&param.ty, &mut flags);
        }
        for state in &component.state {
            record_handle_type(&state.ty, &mut flags);
        }
        for data_type in &component.data_types {
            for field in &data_type.fields {
                record_handle_type(&field.ty, &mut flags);
            }
        }
        for method in &component.methods {
            scan_block(&method.body, schema, &mut flags);
        }
        for node in &component.view {
            scan_view_node(node, schema, &mut flags);
        }
    }
    flags
}

fn record_handle_type(ty: &Ty, flags: &mut FeatureFlags) {
    match ty.strip_arrays() {
        Ty::Handle(name) => {
            flags.handle_types.insert(name.clone());
        }
        _ => {}
    }
}

fn record_namespace_if_handle(expr: &Expr, schema: &SchemaStore, flags: &mut FeatureFlags) {
    if let Some(Ty::Handle(type_name)) = &expr.inferred_ty
        && let Some(namespace) = schema.get_namespace_for_type(type_name)
        && TRACKED_NAMESPACES.contains(&namespace.as_str())
    {
        flags.namespaces.insert(namespace);
    }
}

fn scan_expr(expr: &Expr, schema: &SchemaStore, flags: &mut FeatureFlags) {
    if let Some(ty) = &expr.inferred_ty {
        record_handle_type(ty, flags);
    }
    match &expr.kind {
        ExprKind::Member { object, .. } => {
            record_namespace_if_handle(object, schema, flags);
            scan_expr(object, schema, flags);
        }
        ExprKind::Index { object, index } => {
            scan_expr(object, schema, flags);
            scan_expr(index, schema, flags);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            scan_expr(lhs, schema, flags);
            scan_expr(rhs, schema, flags);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
            scan_expr(operand, schema, flags)
        }
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            scan_expr(cond, schema, flags);
            scan_expr(then_branch, schema, flags);
            scan_expr(else_branch, schema, flags);
        }
        ExprKind::Call { callee, args } => {
            if let ExprKind::Member { object, .. } = &callee.kind {
                record_namespace_if_handle(object, schema, flags);
            }
            scan_expr(callee, schema, flags);
            for arg in args {
                scan_expr(&arg.expr, schema, flags);
            }
        }
        ExprKind::ArrayLit(items) => {
            for item in items {
                scan_expr(item, schema, flags);
            }
        }
        ExprKind::ArrayRepeat { value, .. } => scan_expr(value, schema, flags),
        ExprKind::Reference(inner) | ExprKind::Move(inner) => scan_expr(inner, schema, flags),
        ExprKind::Match { scrutinee, arms } => {
            scan_expr(scrutinee, schema, flags);
            for arm in arms {
                scan_expr(&arm.body, schema, flags);
            }
        }
        ExprKind::Block(block) => scan_block(block, schema, flags),
        ExprKind::StringLit(segments) => {
            for seg in segments {
                if let crate::ast::expr::StringSegment::Interp(inner) = seg {
                    scan_expr(inner, schema, flags);
                }
            }
        }
        ExprKind::IntLit(_)
        | ExprKind::FloatLit(_)
        | ExprKind::BoolLit(_)
        | ExprKind::Ident(_)
        | ExprKind::EnumAccess { .. } => {}
    }
}

fn scan_block(block: &crate::ast::stmt::Block, schema: &SchemaStore, flags: &mut FeatureFlags) {
    for stmt in &block.statements {
        scan_stmt(stmt, schema, flags);
    }
}

fn scan_stmt(stmt: &crate::ast::stmt::Stmt, schema: &SchemaStore, flags: &mut FeatureFlags) {
    use crate::ast::stmt::{ReturnValue, Stmt};
    match stmt {
        Stmt::VarDecl(v) => scan_expr(&v.init, schema, flags),
        Stmt::Assign(a) => scan_expr(&a.value, schema, flags),
        Stmt::CompoundIndexAssign(a) => {
            scan_expr(&a.target, schema, flags);
            scan_expr(&a.index, schema, flags);
            scan_expr(&a.value, schema, flags);
        }
        Stmt::MemberAssign(a) => {
            scan_expr(&a.target, schema, flags);
            scan_expr(&a.value, schema, flags);
        }
        Stmt::TupleDestructure(t) => scan_expr(&t.call, schema, flags),
        Stmt::ExprStmt(e) => scan_expr(e, schema, flags),
        Stmt::Return { value, .. } => match value {
            ReturnValue::Void => {}
            ReturnValue::Single(e) => scan_expr(e, schema, flags),
            ReturnValue::Tuple(es) => {
                for e in es {
                    scan_expr(e, schema, flags);
                }
            }
        },
        Stmt::Block(b) => scan_block(b, schema, flags),
        Stmt::IfElse(i) => {
            scan_expr(&i.cond, schema, flags);
            scan_block(&i.then_block, schema, flags);
            if let Some(else_block) = &i.else_block {
                scan_block(else_block, schema, flags);
            }
        }
        Stmt::RangeFor(f) => {
            scan_expr(&f.start, schema, flags);
            scan_expr(&f.end, schema, flags);
            scan_block(&f.body, schema, flags);
        }
        Stmt::EachFor(f) => {
            scan_expr(&f.iterable, schema, flags);
            scan_block(&f.body, schema, flags);
        }
    }
}

fn scan_view_node(node: &ViewNode, schema: &SchemaStore, flags: &mut FeatureFlags) {
    match node {
        ViewNode::Html(el) => scan_html_element(el, schema, flags),
        ViewNode::Text(text) => scan_expr(&text.value, schema, flags),
        ViewNode::If(if_node) => {
            scan_expr(&if_node.cond, schema, flags);
            for child in if_node.then_branch.iter().chain(if_node.else_branch.iter()) {
                scan_view_node(child, schema, flags);
            }
        }
        ViewNode::ForRange(for_range) => {
            scan_expr(&for_range.start, schema, flags);
            scan_expr(&for_range.end, schema, flags);
            for child in &for_range.body {
                scan_view_node(child, schema, flags);
            }
        }
        ViewNode::ForEach(for_each) => {
            scan_expr(&for_each.iterable, schema, flags);
            if let Some(key) = &for_each.key {
                scan_expr(key, schema, flags);
            }
            for child in &for_each.body {
                scan_view_node(child, schema, flags);
            }
        }
        ViewNode::Instantiate(inst) => {
            for arg in &inst.args {
                scan_expr(&arg.value, schema, flags);
            }
        }
        ViewNode::Route(_) => {}
    }
}

fn scan_html_element(el: &HtmlElement, schema: &SchemaStore, flags: &mut FeatureFlags) {
    for attr in &el.attrs {
        if let Some(kind) = EventKind::from_attr(&attr.name) {
            flags.events.insert(kind);
        }
        scan_expr(&attr.value, schema, flags);
    }
    for child in &el.children {
        scan_view_node(child, schema, flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl::{Component, Method, ReturnShape};
    use crate::ast::expr::ExprNode;
    use crate::ast::stmt::Block;
    use crate::ast::view::{HtmlElement, ViewAttr};
    use crate::base::{FileId, Span};

    fn ident(name: &str) -> Expr {
        ExprNode::new(ExprKind::Ident(name.into()), Span::synthetic())
    }

    #[test]
    fn onclick_attr_records_click_event() {
        let el = ViewNode::Html(HtmlElement {
            tag: "button".into(),
            attrs: vec![ViewAttr {
                name: "onclick".into(),
                value: ident("increment"),
                span: Span::synthetic(),
            }],
            children: vec![],
            ref_binding: None,
            span: Span::synthetic(),
        });
        let component = Component {
            name: "Counter".into(),
            module: "main".into(),
            file: FileId::new(0),
            public: false,
            params: vec![],
            state: vec![],
            methods: vec![Method {
                name: "increment".into(),
                params: vec![],
                return_shape: ReturnShape::Void,
                body: Block {
                    statements: vec![],
                    span: Span::synthetic(),
                },
                span: Span::synthetic(),
                modifications: Default::default(),
            }],
            enums: vec![],
            data_types: vec![],
            view: vec![el],
            router: None,
            span: Span::synthetic(),
        };
        let program = Program {
            components: vec![component],
            enums: vec![],
            data_types: vec![],
            imports: Default::default(),
        };
        let schema = SchemaStore::new();
        let flags = scan_program(&program, &schema);
        assert!(flags.events.contains(&EventKind::Click));
    }

    #[test]
    fn handle_typed_param_is_recorded() {
        let component = Component {
            name: "Canvas".into(),
            module: "main".into(),
            file: FileId::new(0),
            public: false,
            params: vec![crate::ast::decl::Parameter {
                name: "surface".into(),
                ty: Ty::Handle("Canvas".into()),
                mutable: false,
                by_reference: false,
                callback: None,
                default: None,
                span: Span::synthetic(),
            }],
            state: vec![],
            methods: vec![],
            enums: vec![],
            data_types: vec![],
            view: vec![],
            router: None,
            span: Span::synthetic(),
        };
        let program = Program {
            components: vec![component],
            enums: vec![],
            data_types: vec![],
            imports: Default::default(),
        };
        let schema = SchemaStore::new();
        let flags = scan_program(&program, &schema);
        assert!(flags.handle_types.contains(&Name::from("Canvas")));
    }
}
