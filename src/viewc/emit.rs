//! Per-variable update routines, method wrapping, and the mount pipeline
//! (§4.F "Per-variable update routines", "Method wrapping", "Mount
//! pipeline").

use rustc_hash::FxHashSet;

use crate::ast::capabilities::FreeIdentifiers;
use crate::ast::decl::{Component, Method};
use crate::base::Name;
use crate::deps::{self, DependencyIndex};

use super::ids::{IfRegionId, LoopRegionId};
use super::ifregion::IfRegion;

/// One `_update_<v>` routine: every binding index that must re-run when
/// `v` changes. Only emitted for variables that actually have a binding
/// reading them (§4.F "For each state variable v that any binding
/// reads").
#[derive(Debug, Clone)]
pub struct UpdateRoutine {
    pub var: Name,
    pub binding_indices: Vec<usize>,
    /// Set for a public mutable state variable: the notifier call appended
    /// after the binding updates run (§4.F "also invokes the `onVChange`
    /// notifier if set").
    pub change_notifier: bool,
}

/// Build the full set of update routines a component needs, in a
/// deterministic (sorted-by-name) order.
pub fn build_update_routines(component: &Component, index: &DependencyIndex) -> Vec<UpdateRoutine> {
    let mut vars: Vec<&Name> = index.tracked_variables().collect();
    vars.sort();
    vars.into_iter()
        .map(|var| {
            let public_mutable_state = component
                .state
                .iter()
                .any(|s| &s.name == var && s.public && s.mutable);
            UpdateRoutine {
                var: var.clone(),
                binding_indices: index.bindings_for(var).to_vec(),
                change_notifier: public_mutable_state,
            }
        })
        .collect()
}

/// The trailing call sequence appended after a user method's body
/// (§4.F "Method wrapping"). `init` never gets one (checked by the
/// caller via [`Method::is_lifecycle_hook`] plus a name check, since
/// `mount`/`tick` still wrap normally).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodWrapping {
    pub update_calls: Vec<Name>,
    pub if_syncs: Vec<IfRegionId>,
    pub loop_syncs: Vec<LoopRegionId>,
    pub change_notifications: Vec<Name>,
}

/// Compute the trailing call sequence for one method (§4.F order: update
/// calls, then if-syncs, then loop-syncs, then reference-param
/// notifications).
pub fn compute_method_wrapping(
    method: &Method,
    tracked_vars: &FxHashSet<Name>,
    if_regions: &[IfRegion],
    loop_region_deps: &[(LoopRegionId, FxHashSet<Name>)],
    reference_params: &FxHashSet<Name>,
) -> MethodWrapping {
    if method.name.as_ref() == "init" {
        return MethodWrapping::default();
    }

    let mut update_calls: Vec<Name> = method
        .modifications
        .iter()
        .filter(|v| tracked_vars.contains(*v))
        .cloned()
        .collect();
    update_calls.sort();

    let mut if_syncs: Vec<IfRegionId> = if_regions
        .iter()
        .filter(|region| region.free_identifiers.iter().any(|v| method.modifications.contains(v)))
        .map(|region| region.id)
        .collect();
    if_syncs.sort_by_key(|id| id.0);

    let mut loop_syncs: Vec<LoopRegionId> = loop_region_deps
        .iter()
        .filter(|(_, deps)| deps.iter().any(|v| method.modifications.contains(v)))
        .map(|(id, _)| *id)
        .collect();
    loop_syncs.sort_by_key(|id| id.0);

    let mut change_notifications: Vec<Name> = method
        .modifications
        .iter()
        .filter(|v| reference_params.contains(*v))
        .cloned()
        .collect();
    change_notifications.sort();

    MethodWrapping {
        update_calls,
        if_syncs,
        loop_syncs,
        change_notifications,
    }
}

/// A (child-instance, member) pair observed in a view-if condition, which
/// requires change-subscription wiring (§3 invariant "Public members used
/// in cross-component if conditions emit change-notification wiring").
pub type ChangeSubscription = (Name, Name);

/// Every change subscription a component's if-regions require, collected
/// from each condition's structured member dependencies.
pub fn collect_change_subscriptions(if_regions: &[IfRegion]) -> Vec<ChangeSubscription> {
    let mut subs = Vec::new();
    for region in if_regions {
        subs.extend(deps::analyze_if_condition_member_deps(&region.cond));
    }
    subs
}

/// The ordered steps of a component's `view(parent)` entry routine
/// (§4.F "Mount pipeline").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStep {
    RunInit,
    RunCreationPhase,
    RegisterClickHandlers,
    WireChangeSubscriptions,
    RunMount,
}

/// The mount pipeline for a component, omitting `RunInit`/`RunMount` when
/// the corresponding hook is absent.
pub fn mount_pipeline(component: &Component) -> Vec<MountStep> {
    let mut steps = Vec::new();
    if component.find_method("init").is_some() {
        steps.push(MountStep::RunInit);
    }
    steps.push(MountStep::RunCreationPhase);
    steps.push(MountStep::RegisterClickHandlers);
    steps.push(MountStep::WireChangeSubscriptions);
    if component.find_method("mount").is_some() {
        steps.push(MountStep::RunMount);
    }
    steps
}

/// Free identifiers read by a range-for region's start/end expressions,
/// used to decide which loops a method wrapping must re-sync (§4.F).
pub fn range_loop_free_identifiers(start: &crate::ast::expr::Expr, end: &crate::ast::expr::Expr) -> FxHashSet<Name> {
    let mut out = start.free_identifiers();
    out.extend(end.free_identifiers());
    out
}

/// Free identifiers read by a keyed each-for region's iterable expression
/// (the key expression is resolved against the loop variable, not outer
/// state, per §4.F).
pub fn keyed_loop_free_identifiers(iterable: &crate::ast::expr::Expr) -> FxHashSet<Name> {
    iterable.free_identifiers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl::{Component, Method, ReturnShape, StateVar};
    use crate::ast::expr::{Expr, ExprKind};
    use crate::ast::stmt::Block;
    use crate::ast::ty::Ty;
    use crate::base::{FileId, Span};

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Ident(name.into()), Span::synthetic())
    }

    fn empty_component() -> Component {
        Component {
            name: "Counter".into(),
            module: "main".into(),
            file: FileId::new(0),
            public: false,
            params: vec![],
            state: vec![StateVar {
                name: "count".into(),
                ty: Ty::Int32,
                mutable: true,
                by_reference: false,
                public: true,
                init: Expr::new(ExprKind::IntLit(0), Span::synthetic()),
                span: Span::synthetic(),
            }],
            methods: vec![],
            enums: vec![],
            data_types: vec![],
            view: vec![],
            router: None,
            span: Span::synthetic(),
        }
    }

    #[test]
    fn update_routine_built_for_variable_with_binding() {
        let component = empty_component();
        let mut index = DependencyIndex::new();
        let deps = deps::analyze_binding(&ident("count"));
        index.record(0, &deps);

        let routines = build_update_routines(&component, &index);
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].var, Name::from("count"));
        assert!(routines[0].change_notifier);
    }

    #[test]
    fn init_method_gets_no_wrapping() {
        let method = Method {
            name: "init".into(),
            params: vec![],
            return_shape: ReturnShape::Void,
            body: Block {
                statements: vec![],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
            modifications: FxHashSet::from_iter([Name::from("count")]),
        };
        let tracked = FxHashSet::from_iter([Name::from("count")]);
        let wrapping = compute_method_wrapping(&method, &tracked, &[], &[], &FxHashSet::default());
        assert_eq!(wrapping, MethodWrapping::default());
    }

    #[test]
    fn tick_method_gets_update_call_for_tracked_modification() {
        let method = Method {
            name: "tick".into(),
            params: vec![],
            return_shape: ReturnShape::Void,
            body: Block {
                statements: vec![],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
            modifications: FxHashSet::from_iter([Name::from("count")]),
        };
        let tracked = FxHashSet::from_iter([Name::from("count")]);
        let wrapping = compute_method_wrapping(&method, &tracked, &[], &[], &FxHashSet::default());
        assert_eq!(wrapping.update_calls, vec![Name::from("count")]);
    }

    #[test]
    fn mount_pipeline_includes_init_and_mount_only_when_present() {
        let mut component = empty_component();
        assert_eq!(
            mount_pipeline(&component),
            vec![
                MountStep::RunCreationPhase,
                MountStep::RegisterClickHandlers,
                MountStep::WireChangeSubscriptions,
            ]
        );
        component.methods.push(Method {
            name: "mount".into(),
            params: vec![],
            return_shape: ReturnShape::Void,
            body: Block {
                statements: vec![],
                span: Span::synthetic(),
            },
            span: Span::synthetic(),
            modifications: Default::default(),
        });
        assert_eq!(
            mount_pipeline(&component),
            vec![
                MountStep::RunCreationPhase,
                MountStep::RegisterClickHandlers,
                MountStep::WireChangeSubscriptions,
                MountStep::RunMount,
            ]
        );
    }
}
