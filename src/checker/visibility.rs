//! Substage 7: cross-component visibility (§4.C).

use crate::ast::decl::{Component, Program};
use crate::ast::view::{ComponentInstantiation, ViewNode};
use crate::base::Name;

use super::error::TypeError;
use super::{ComponentMeta, GlobalContext};

/// Locate the target of an instantiation: module-qualified lookup if a
/// prefix is present, otherwise same-module, otherwise the default module.
pub fn resolve_target<'a>(
    instantiation: &ComponentInstantiation,
    component_module: &Name,
    default_module: &Name,
    ctx: &'a GlobalContext,
) -> Option<&'a ComponentMeta> {
    if let Some(module) = &instantiation.module {
        return ctx.components.get(&(module.clone(), instantiation.name.clone()));
    }
    // TODO: an unqualified name that exists in both the current module
    // and the default module resolves to the current module's component.
    // Whether this should instead be a name-collision error is
    // unresolved.
    ctx.components
        .get(&(component_module.clone(), instantiation.name.clone()))
        .or_else(|| ctx.components.get(&(default_module.clone(), instantiation.name.clone())))
}

/// Enforce the visibility rule at one instantiation site (§4.C substage 7).
pub fn check_instantiation_visibility(
    component: &Component,
    instantiation: &ComponentInstantiation,
    program: &Program,
    ctx: &GlobalContext,
    default_module: &Name,
) -> Result<(), TypeError> {
    let target = resolve_target(instantiation, &component.module, default_module, ctx);
    let Some(target) = target else {
        return Err(TypeError::UnresolvedType {
            name: instantiation.name.clone(),
            span: instantiation.span,
        });
    };
    check_instantiation_args(instantiation, target)?;

    let same_file = target.file == component.file;
    let same_module = target.module == component.module;

    if same_file || same_module {
        return Ok(());
    }

    if instantiation.module.is_none() {
        return Err(TypeError::MissingModulePrefix {
            name: instantiation.name.clone(),
            span: instantiation.span,
        });
    }

    if !target.public {
        return Err(TypeError::NotPublic {
            name: instantiation.name.clone(),
            module: target.module.clone(),
            span: instantiation.span,
        });
    }

    let directly_imports = program
        .imports
        .get(&component.file)
        .is_some_and(|imports| imports.contains(&target.file));
    if !directly_imports {
        return Err(TypeError::NotDirectlyImported {
            name: instantiation.name.clone(),
            span: instantiation.span,
        });
    }

    Ok(())
}

/// Validate a named argument list against a target component's parameter
/// list: every supplied name must be a known parameter, every supplied
/// argument's `&`/`:` marker must match the parameter's reference-ness, and
/// every parameter without a default must be supplied — a reference
/// parameter with no default and no argument is an uninitialized reference,
/// not merely a missing prop (§4.C substage 5's call-site rule reused here,
/// and substage 8 for route args; §3 "a reference must be initialized").
pub fn check_instantiation_args(
    instantiation: &ComponentInstantiation,
    target: &ComponentMeta,
) -> Result<(), TypeError> {
    for arg in &instantiation.args {
        let Some(param) = target.params.iter().find(|p| p.name == arg.name) else {
            return Err(TypeError::UnknownProp {
                name: arg.name.clone(),
                span: arg.span,
            });
        };
        if param.by_reference {
            if arg.by_move {
                return Err(TypeError::MoveIntoReference {
                    param: param.name.clone(),
                    span: arg.span,
                });
            }
            if !arg.by_reference {
                return Err(TypeError::MissingReferenceMarker {
                    param: param.name.clone(),
                    span: arg.span,
                });
            }
        } else if arg.by_reference {
            return Err(TypeError::UnexpectedReferenceMarker {
                param: param.name.clone(),
                span: arg.span,
            });
        }
    }
    for param in &target.params {
        let supplied = instantiation.args.iter().any(|a| a.name == param.name);
        if supplied || param.default.is_some() {
            continue;
        }
        if param.by_reference {
            return Err(TypeError::UninitializedReference {
                name: param.name.clone(),
                span: instantiation.span,
            });
        }
        return Err(TypeError::MissingRequiredProp {
            name: param.name.clone(),
            span: instantiation.span,
        });
    }
    Ok(())
}

/// Walk a component's view, enforcing substage 7 at every instantiation.
pub fn check_component_visibility(
    component: &Component,
    program: &Program,
    ctx: &GlobalContext,
    default_module: &Name,
) -> Result<(), TypeError> {
    for node in &component.view {
        check_node_visibility(component, node, program, ctx, default_module)?;
    }
    Ok(())
}

fn check_node_visibility(
    component: &Component,
    node: &ViewNode,
    program: &Program,
    ctx: &GlobalContext,
    default_module: &Name,
) -> Result<(), TypeError> {
    match node {
        ViewNode::Instantiate(instantiation) => {
            check_instantiation_visibility(component, instantiation, program, ctx, default_module)
        }
        ViewNode::Html(el) => {
            for child in &el.children {
                check_node_visibility(component, child, program, ctx, default_module)?;
            }
            Ok(())
        }
        ViewNode::If(if_node) => {
            for child in if_node.then_branch.iter().chain(if_node.else_branch.iter()) {
                check_node_visibility(component, child, program, ctx, default_module)?;
            }
            Ok(())
        }
        ViewNode::ForRange(for_range) => {
            for child in &for_range.body {
                check_node_visibility(component, child, program, ctx, default_module)?;
            }
            Ok(())
        }
        ViewNode::ForEach(for_each) => {
            for child in &for_each.body {
                check_node_visibility(component, child, program, ctx, default_module)?;
            }
            Ok(())
        }
        ViewNode::Text(_) | ViewNode::Route(_) => Ok(()),
    }
}
