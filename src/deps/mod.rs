//! Dependency analyzer (component D, §4.D).
//!
//! The three tree capabilities themselves — free-identifier collection,
//! modification collection, staticness — live on [`crate::ast::capabilities`]
//! as node methods. This module is the bidirectional index built on top of
//! them: it groups view bindings by the state variable they read (driving
//! `_update_<var>` routine generation in the view compiler) and records the
//! structured (object, member) pairs read by view-if conditions (driving
//! cross-component change-notification wiring). Modeled on the teacher's
//! reverse/forward index shape in `semantic::graphs::reference_index`,
//! trimmed to what a single-pass batch compiler needs — no incremental
//! re-resolution, no span-based lookup.

use crate::ast::capabilities::{FreeIdentifiers, MemberDep};
use crate::ast::expr::Expr;
use crate::base::Name;
use rustc_hash::FxHashSet;
use std::collections::HashMap;

/// The dependency set of a single binding expression (§4.D item 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingDeps {
    pub free_identifiers: FxHashSet<Name>,
}

pub fn analyze_binding(expr: &Expr) -> BindingDeps {
    BindingDeps {
        free_identifiers: expr.free_identifiers(),
    }
}

/// Structured member dependencies read by a view-if condition, for
/// cross-component change-notification wiring (§4.D item 2).
pub fn analyze_if_condition_member_deps(expr: &Expr) -> Vec<MemberDep> {
    expr.member_deps()
}

/// Groups bindings by the state variables they read. `binding_index` is an
/// opaque handle (an index into the view compiler's binding list) so this
/// module does not need to know the binding's own shape.
///
/// Built once per component during emission and consulted when generating
/// each `_update_<var>` routine: [`DependencyIndex::bindings_for`] returns
/// every binding that must run when `var` changes.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    /// variable name -> binding indices that read it
    reverse: HashMap<Name, Vec<usize>>,
    /// binding index -> variable names it reads
    forward: HashMap<usize, FxHashSet<Name>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, binding_index: usize, deps: &BindingDeps) {
        for name in &deps.free_identifiers {
            self.reverse
                .entry(name.clone())
                .or_default()
                .push(binding_index);
        }
        self.forward
            .insert(binding_index, deps.free_identifiers.clone());
    }

    /// Every binding index that reads `var`, in insertion order (stable,
    /// since the view compiler's update routines must emit deterministically).
    pub fn bindings_for(&self, var: &Name) -> &[usize] {
        self.reverse.get(var).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn variables_for_binding(&self, binding_index: usize) -> Option<&FxHashSet<Name>> {
        self.forward.get(&binding_index)
    }

    /// Every variable that has at least one dependent binding — the set
    /// the view compiler must emit an `_update_<var>` routine for.
    pub fn tracked_variables(&self) -> impl Iterator<Item = &Name> {
        self.reverse.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expr::{BinOp, ExprKind, ExprNode};
    use crate::base::Span;

    fn ident(name: &str) -> Expr {
        ExprNode::new(ExprKind::Ident(name.into()), Span::synthetic())
    }

    #[test]
    fn record_groups_by_free_identifier() {
        let mut index = DependencyIndex::new();
        let expr = ExprNode::new(
            ExprKind::Binary {
                op: BinOp::Add,
                lhs: Box::new(ident("count")),
                rhs: Box::new(ident("offset")),
            },
            Span::synthetic(),
        );
        let deps = analyze_binding(&expr);
        index.record(0, &deps);

        assert_eq!(index.bindings_for(&Name::from("count")), &[0]);
        assert_eq!(index.bindings_for(&Name::from("offset")), &[0]);
        assert!(index.bindings_for(&Name::from("unrelated")).is_empty());
    }

    #[test]
    fn two_bindings_sharing_a_variable_both_appear() {
        let mut index = DependencyIndex::new();
        let a = analyze_binding(&ident("count"));
        let b = analyze_binding(&ident("count"));
        index.record(0, &a);
        index.record(1, &b);
        assert_eq!(index.bindings_for(&Name::from("count")), &[0, 1]);
    }

    #[test]
    fn member_deps_recorded_for_if_condition() {
        let expr = ExprNode::new(
            ExprKind::Member {
                object: Box::new(ident("child")),
                member: Name::from("visible"),
            },
            Span::synthetic(),
        );
        let deps = analyze_if_condition_member_deps(&expr);
        assert_eq!(deps, vec![(Name::from("child"), Name::from("visible"))]);
    }
}
