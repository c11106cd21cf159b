//! Topological sorter (component E, §4.E).
//!
//! Orders components so every component is emitted after everything it
//! depends on, using a Kahn-style traversal that is stable on queue order
//! (ties broken by program declaration order, mirroring the teacher's
//! `populate_all` convention of processing a stable, sorted file list
//! rather than arbitrary hash-map order).

use std::collections::{HashMap, VecDeque};

use crate::ast::decl::Program;
use crate::ast::ty::Ty;
use crate::ast::view::ViewNode;
use crate::base::Name;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("circular dependency among components: {}", .remaining.join(", "))]
pub struct CycleError {
    pub remaining: Vec<Name>,
}

/// (module, name) uniquely identifies a component across the whole
/// program (two modules may declare components with the same bare name).
pub type ComponentKey = (Name, Name);

fn key_for(module: &Name, name: &Name) -> ComponentKey {
    (module.clone(), name.clone())
}

/// Build the dependency graph described in §4.E: view instantiation,
/// router targets, and parameter/state types that (after stripping array
/// decoration) name another component.
fn build_graph(program: &Program) -> HashMap<ComponentKey, Vec<ComponentKey>> {
    let known: std::collections::HashSet<ComponentKey> = program
        .components
        .iter()
        .map(|c| key_for(&c.module, &c.name))
        .collect();

    let mut graph = HashMap::new();
    for component in &program.components {
        let this_key = key_for(&component.module, &component.name);
        let mut deps = Vec::new();

        collect_view_deps(&component.view, &component.module, &known, &mut deps);

        if let Some(router) = &component.router {
            for route in &router.routes {
                record_instantiation_dep(&route.target, &component.module, &known, &mut deps);
            }
        }

        for param in &component.params {
            record_type_dep(&param.ty, &component.module, &known, &mut deps);
        }
        for state in &component.state {
            record_type_dep(&state.ty, &component.module, &known, &mut deps);
        }

        graph.entry(this_key).or_insert(deps);
    }
    graph
}

fn collect_view_deps(
    nodes: &[ViewNode],
    owner_module: &Name,
    known: &std::collections::HashSet<ComponentKey>,
    out: &mut Vec<ComponentKey>,
) {
    for node in nodes {
        match node {
            ViewNode::Instantiate(inst) => record_instantiation_dep(inst, owner_module, known, out),
            ViewNode::Html(el) => collect_view_deps(&el.children, owner_module, known, out),
            ViewNode::If(if_node) => {
                collect_view_deps(&if_node.then_branch, owner_module, known, out);
                collect_view_deps(&if_node.else_branch, owner_module, known, out);
            }
            ViewNode::ForRange(for_range) => collect_view_deps(&for_range.body, owner_module, known, out),
            ViewNode::ForEach(for_each) => collect_view_deps(&for_each.body, owner_module, known, out),
            ViewNode::Text(_) | ViewNode::Route(_) => {}
        }
    }
}

fn record_instantiation_dep(
    inst: &crate::ast::view::ComponentInstantiation,
    owner_module: &Name,
    known: &std::collections::HashSet<ComponentKey>,
    out: &mut Vec<ComponentKey>,
) {
    let module = inst.module.clone().unwrap_or_else(|| owner_module.clone());
    let key = key_for(&module, &inst.name);
    if known.contains(&key) {
        out.push(key);
    } else {
        let fallback = key_for(owner_module, &inst.name);
        if known.contains(&fallback) {
            out.push(fallback);
        }
    }
}

fn record_type_dep(
    ty: &Ty,
    owner_module: &Name,
    known: &std::collections::HashSet<ComponentKey>,
    out: &mut Vec<ComponentKey>,
) {
    if let Some(name) = ty.strip_arrays().named() {
        let key = key_for(owner_module, name);
        if known.contains(&key) {
            out.push(key);
        }
    }
}

/// Kahn's algorithm: components with no remaining unemitted dependency
/// are queued in program declaration order; repeat until every component
/// is emitted or no progress can be made (a cycle).
pub fn topological_order(program: &Program) -> Result<Vec<ComponentKey>, CycleError> {
    let graph = build_graph(program);
    let in_degree: HashMap<ComponentKey, usize> = graph
        .iter()
        .map(|(k, deps)| (k.clone(), deps.len()))
        .collect();

    let declaration_order: Vec<ComponentKey> = program
        .components
        .iter()
        .map(|c| key_for(&c.module, &c.name))
        .collect();

    let mut queue: VecDeque<ComponentKey> = declaration_order
        .iter()
        .filter(|k| in_degree.get(*k).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();

    // reverse edges: dependents[d] = components that depend on d
    let mut dependents: HashMap<ComponentKey, Vec<ComponentKey>> = HashMap::new();
    for (k, deps) in &graph {
        for d in deps {
            dependents.entry(d.clone()).or_default().push(k.clone());
        }
    }

    let mut order = Vec::new();
    let mut emitted: std::collections::HashSet<ComponentKey> = std::collections::HashSet::new();

    while let Some(next) = queue.pop_front() {
        if emitted.contains(&next) {
            continue;
        }
        emitted.insert(next.clone());
        order.push(next.clone());

        if let Some(deps) = dependents.get(&next) {
            // Stable: re-scan in declaration order so ties resolve the
            // same way every run.
            for candidate in &declaration_order {
                if deps.contains(candidate) && !emitted.contains(candidate) {
                    let remaining = graph[candidate]
                        .iter()
                        .filter(|d| !emitted.contains(*d))
                        .count();
                    if remaining == 0 && !queue.contains(candidate) {
                        queue.push_back(candidate.clone());
                    }
                }
            }
        }
    }

    if order.len() != declaration_order.len() {
        let remaining: Vec<Name> = declaration_order
            .iter()
            .filter(|k| !emitted.contains(*k))
            .map(|(_, name)| name.clone())
            .collect();
        tracing::warn!(count = remaining.len(), "circular dependency among components");
        return Err(CycleError { remaining });
    }

    Ok(order)
}
