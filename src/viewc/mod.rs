//! View compiler (component F, §4.F).
//!
//! Walks a component's already type-checked view tree once (the
//! "creation phase") and produces a structured description of every
//! binding and reactive region it contains, plus the per-variable update
//! routines and method-wrapping metadata derived from it. What downstream
//! does with this description — how it actually renders a frame — is
//! outside this contract (§1, §6): the behavior this module guarantees is
//! the one exercised by the runtime state machines in [`ifregion`],
//! [`looprange`], and [`loopkeyed`].

pub mod binding;
pub mod emit;
pub mod ids;
pub mod ifregion;
pub mod loopkeyed;
pub mod looprange;

use rustc_hash::FxHashSet;

use crate::ast::decl::Component;
use crate::ast::view::{ComponentInstantiation, ViewIf, ViewNode};
use crate::base::Name;
use crate::deps::{self, DependencyIndex};

use binding::{Binding, BindingKind, needs_binding};
use emit::{ChangeSubscription, MethodWrapping, MountStep, UpdateRoutine};
use ids::{IdAllocator, IfRegionId};
use ifregion::{BranchContents, IfRegion};
use loopkeyed::KeyedLoopRegion;
use looprange::{LoopBodyKind, RangeLoopRegion};

/// Everything the view compiler produces for one component.
#[derive(Debug)]
pub struct ComponentEmission {
    pub bindings: Vec<Binding>,
    pub if_regions: Vec<IfRegion>,
    pub range_loops: Vec<RangeLoopRegion>,
    pub keyed_loops: Vec<KeyedLoopRegion>,
    pub update_routines: Vec<UpdateRoutine>,
    pub method_wrappings: Vec<(Name, MethodWrapping)>,
    pub change_subscriptions: Vec<ChangeSubscription>,
    pub mount_pipeline: Vec<MountStep>,
}

/// Creation-phase state threaded through the view-tree walk.
struct Builder {
    ids: IdAllocator,
    bindings: Vec<Binding>,
    if_regions: Vec<IfRegion>,
    range_loops: Vec<RangeLoopRegion>,
    keyed_loops: Vec<KeyedLoopRegion>,
}

/// Run the creation phase over `component.view` and derive every
/// per-variable routine and method-wrapping sequence from the result
/// (§4.F, in full).
pub fn compile_component(component: &Component) -> ComponentEmission {
    let mut builder = Builder {
        ids: IdAllocator::new(),
        bindings: Vec::new(),
        if_regions: Vec::new(),
        range_loops: Vec::new(),
        keyed_loops: Vec::new(),
    };
    let _root = walk_branch(&component.view, &mut builder, false, None);

    let mut index = DependencyIndex::new();
    for (i, b) in builder.bindings.iter().enumerate() {
        let deps = deps::BindingDeps {
            free_identifiers: b.free_identifiers.clone(),
        };
        index.record(i, &deps);
    }

    let update_routines = emit::build_update_routines(component, &index);
    let tracked_vars: FxHashSet<Name> = index.tracked_variables().cloned().collect();

    let mut loop_region_deps = Vec::new();
    for region in &builder.range_loops {
        loop_region_deps.push((region.id, emit::range_loop_free_identifiers(&region.start, &region.end)));
    }
    for region in &builder.keyed_loops {
        loop_region_deps.push((region.id, emit::keyed_loop_free_identifiers(&region.iterable)));
    }

    let reference_params: FxHashSet<Name> = component
        .params
        .iter()
        .filter(|p| p.by_reference)
        .map(|p| p.name.clone())
        .collect();

    let method_wrappings = component
        .methods
        .iter()
        .map(|m| {
            let wrapping = emit::compute_method_wrapping(
                m,
                &tracked_vars,
                &builder.if_regions,
                &loop_region_deps,
                &reference_params,
            );
            (m.name.clone(), wrapping)
        })
        .collect();

    let change_subscriptions = emit::collect_change_subscriptions(&builder.if_regions);
    let mount_pipeline = emit::mount_pipeline(component);

    ComponentEmission {
        bindings: builder.bindings,
        if_regions: builder.if_regions,
        range_loops: builder.range_loops,
        keyed_loops: builder.keyed_loops,
        update_routines,
        method_wrappings,
        change_subscriptions,
        mount_pipeline,
    }
}

/// Walk a sibling list that belongs to a single branch (an if-region arm,
/// or the component's own top-level view), returning everything created
/// directly in it so its owning region can tear it down as a unit.
fn walk_branch(nodes: &[ViewNode], b: &mut Builder, in_loop: bool, current_if: Option<(IfRegionId, bool)>) -> BranchContents {
    let mut contents = BranchContents::default();
    for node in nodes {
        walk_node(node, b, in_loop, current_if, &mut contents);
    }
    contents
}

fn walk_node(node: &ViewNode, b: &mut Builder, in_loop: bool, current_if: Option<(IfRegionId, bool)>, contents: &mut BranchContents) {
    match node {
        ViewNode::Html(el) => {
            let element = b.ids.next_element();
            contents.elements.push(element);
            for attr in &el.attrs {
                if needs_binding(&attr.value) {
                    b.bindings.push(Binding::new(
                        element,
                        BindingKind::Attribute,
                        Some(attr.name.clone()),
                        attr.value.clone(),
                        current_if,
                    ));
                }
            }
            for child in &el.children {
                walk_node(child, b, in_loop, current_if, contents);
            }
        }
        ViewNode::Instantiate(inst) => {
            record_instance(inst, b, contents);
        }
        ViewNode::Text(t) => {
            let element = b.ids.next_element();
            contents.elements.push(element);
            if needs_binding(&t.value) {
                b.bindings.push(Binding::new(element, BindingKind::Text, None, t.value.clone(), current_if));
            }
        }
        ViewNode::If(view_if) => walk_if(view_if, b, in_loop, current_if, contents),
        ViewNode::ForRange(range) => {
            let id = b.ids.next_loop_region();
            let body_kind = loop_body_kind(&range.body);
            b.range_loops
                .push(RangeLoopRegion::new(id, range.var.clone(), range.start.clone(), range.end.clone(), body_kind));
            let _ = walk_branch(&range.body, b, true, current_if);
            contents.loop_regions.push(id);
        }
        ViewNode::ForEach(each) => {
            let id = b.ids.next_loop_region();
            let child_type = loop_child_type(&each.body);
            // An each-for without an explicit key is reconciled by its
            // iteration index, which this compiler treats as an implicit
            // key (§9 Design Notes: unkeyed each-for resolution).
            let key_expr = each.key.clone().unwrap_or_else(|| {
                crate::ast::expr::Expr::new(crate::ast::expr::ExprKind::Ident(each.var.clone()), each.span)
            });
            b.keyed_loops.push(KeyedLoopRegion {
                id,
                var: each.var.clone(),
                iterable: each.iterable.clone(),
                key_expr,
                child_type,
            });
            let _ = walk_branch(&each.body, b, true, current_if);
            contents.loop_regions.push(id);
        }
        ViewNode::Route(_) => {}
    }
}

/// A `ViewIf` nested inside a loop body gets no standalone reactive
/// region — the loop's own sync drives re-evaluation per item, so its
/// created nodes fold straight into the enclosing branch ([`ifregion`]
/// module doc: "not nested inside a loop").
fn walk_if(view_if: &ViewIf, b: &mut Builder, in_loop: bool, current_if: Option<(IfRegionId, bool)>, contents: &mut BranchContents) {
    if in_loop {
        for node in &view_if.then_branch {
            walk_node(node, b, in_loop, current_if, contents);
        }
        for node in &view_if.else_branch {
            walk_node(node, b, in_loop, current_if, contents);
        }
        return;
    }

    let id = b.ids.next_if_region();
    let mut region = IfRegion::new(id, view_if.cond.clone());
    region.then_branch = walk_branch(&view_if.then_branch, b, in_loop, Some((id, true)));
    region.else_branch = walk_branch(&view_if.else_branch, b, in_loop, Some((id, false)));
    b.if_regions.push(region);
    contents.nested_ifs.push(id);
}

fn record_instance(inst: &ComponentInstantiation, b: &mut Builder, contents: &mut BranchContents) {
    let instance_id = b.ids.next_instance(&inst.name);
    contents.instances.push((inst.name.clone(), instance_id));
}

fn loop_body_kind(body: &[ViewNode]) -> LoopBodyKind {
    match body {
        [ViewNode::Instantiate(inst)] => LoopBodyKind::Component(inst.name.clone()),
        [ViewNode::Html(_)] => LoopBodyKind::HtmlRoot,
        _ => LoopBodyKind::Neither,
    }
}

fn loop_child_type(body: &[ViewNode]) -> Name {
    match body {
        [ViewNode::Instantiate(inst)] => inst.name.clone(),
        _ => Name::from("Item"),
    }
}
