//! Substage 6: attribute typing in views (§4.C).

use crate::ast::view::{HtmlElement, ViewNode};
use crate::ast::decl::Component;
use crate::ast::ty::Ty;
use crate::schema::SchemaStore;

use super::component::infer_expr;
use super::error::TypeError;
use super::scope::Scope;
use super::GlobalContext;

fn event_value_ty(attr: &str) -> Option<Ty> {
    match attr {
        "oninput" | "onchange" => Some(Ty::String),
        "onkeydown" => Some(Ty::Int32),
        _ => None,
    }
}

pub fn check_component_views(
    component: &Component,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    let mut scope = Scope::new();
    for param in &component.params {
        scope.declare(param.name.clone(), param.ty.clone(), param.mutable, param.by_reference);
    }
    for state in &component.state {
        scope.declare(state.name.clone(), state.ty.clone(), state.mutable, state.by_reference);
    }
    for node in &component.view {
        check_view_node(node, component, &mut scope, ctx, schema)?;
    }
    Ok(())
}

fn check_view_node(
    node: &ViewNode,
    component: &Component,
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    match node {
        ViewNode::Html(el) => check_html_element(el, component, scope, ctx, schema),
        ViewNode::Text(text) => {
            infer_expr(&text.value, &component.methods, scope, ctx, schema)?;
            Ok(())
        }
        ViewNode::If(if_node) => {
            infer_expr(&if_node.cond, &component.methods, scope, ctx, schema)?;
            for child in &if_node.then_branch {
                check_view_node(child, component, scope, ctx, schema)?;
            }
            for child in &if_node.else_branch {
                check_view_node(child, component, scope, ctx, schema)?;
            }
            Ok(())
        }
        ViewNode::ForRange(for_range) => {
            infer_expr(&for_range.start, &component.methods, scope, ctx, schema)?;
            infer_expr(&for_range.end, &component.methods, scope, ctx, schema)?;
            scope.declare(for_range.var.clone(), Ty::Int32, false, false);
            for child in &for_range.body {
                check_view_node(child, component, scope, ctx, schema)?;
            }
            Ok(())
        }
        ViewNode::ForEach(for_each) => {
            let iter_ty = infer_expr(&for_each.iterable, &component.methods, scope, ctx, schema)?;
            let elem_ty = match iter_ty {
                Ty::Array { elem, .. } => *elem,
                _ => Ty::Unknown,
            };
            scope.declare(for_each.var.clone(), elem_ty, false, false);
            if let Some(key) = &for_each.key {
                infer_expr(key, &component.methods, scope, ctx, schema)?;
            }
            for child in &for_each.body {
                check_view_node(child, component, scope, ctx, schema)?;
            }
            Ok(())
        }
        ViewNode::Instantiate(_) | ViewNode::Route(_) => Ok(()),
    }
}

fn check_html_element(
    el: &HtmlElement,
    component: &Component,
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    for attr in &el.attrs {
        let found = infer_expr(&attr.value, &component.methods, scope, ctx, schema)?;
        if let Some(expected) = event_value_ty(&attr.name) {
            // Event attributes must bind to a method taking exactly that
            // value type as its single parameter.
            if let crate::ast::expr::ExprKind::Ident(method_name) = &attr.value.kind {
                let method = component.find_method(method_name);
                match method {
                    Some(m) if m.params.len() == 1 && m.params[0].ty == expected => {}
                    _ => {
                        return Err(TypeError::EventHandlerSignature {
                            attr: attr.name.clone(),
                            expected,
                            span: attr.span,
                        })
                    }
                }
            }
        } else if !matches!(found, Ty::String | Ty::Unknown) {
            return Err(TypeError::AttributeNotString {
                attr: attr.name.clone(),
                found,
                span: attr.span,
            });
        }
    }
    if el.ref_binding.is_some() {
        // Ref-bindings are introduced by the view compiler's creation
        // phase, not read here; nothing further to check.
    }
    for child in &el.children {
        check_view_node(child, component, scope, ctx, schema)?;
    }
    Ok(())
}
