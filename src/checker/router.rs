//! Substage 8: router validation (§4.C).

use crate::ast::decl::{Component, Program};
use crate::ast::view::ViewNode;
use crate::base::Name;

use super::error::TypeError;
use super::visibility::{check_instantiation_args, resolve_target};
use super::GlobalContext;

fn view_has_placeholder(nodes: &[ViewNode]) -> bool {
    nodes.iter().any(|n| match n {
        ViewNode::Route(_) => true,
        ViewNode::Html(el) => view_has_placeholder(&el.children),
        ViewNode::If(if_node) => {
            view_has_placeholder(&if_node.then_branch) || view_has_placeholder(&if_node.else_branch)
        }
        ViewNode::ForRange(for_range) => view_has_placeholder(&for_range.body),
        ViewNode::ForEach(for_each) => view_has_placeholder(&for_each.body),
        ViewNode::Instantiate(_) | ViewNode::Text(_) => false,
    })
}

pub fn check_router(
    component: &Component,
    _program: &Program,
    ctx: &GlobalContext,
    default_module: &Name,
) -> Result<(), TypeError> {
    let has_placeholder = view_has_placeholder(&component.view);
    match &component.router {
        Some(router) => {
            if !has_placeholder {
                return Err(TypeError::RouterWithoutPlaceholder { span: router.span });
            }
            for route in &router.routes {
                let target = resolve_target(&route.target, &component.module, default_module, ctx);
                let Some(target) = target else {
                    return Err(TypeError::RouteTargetMissing {
                        name: route.target.name.clone(),
                        span: route.span,
                    });
                };
                check_instantiation_args(&route.target, target)?;
            }
            Ok(())
        }
        None => {
            if has_placeholder {
                return Err(TypeError::PlaceholderWithoutRouter {
                    span: component.span,
                });
            }
            Ok(())
        }
    }
}
