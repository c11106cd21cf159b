//! Reactive if-regions (§4.F "View conditionals", reactive case).
//!
//! A region is allocated the first time a `ViewIf` is encountered in a
//! reactive position (not nested inside a loop, and with reactive
//! tracking enabled). The creation phase picks and builds the initial
//! branch directly; after that, [`IfRegionState::sync`] is the only way
//! the active branch changes.

use rustc_hash::FxHashSet;

use crate::ast::expr::Expr;
use crate::base::Name;

use super::ids::{ElementId, IfRegionId, InstanceId, LoopRegionId};

/// Everything a branch owns, torn down together when the branch becomes
/// inactive (§4.F "tears down the old branch — removing its elements,
/// destroying its component instances, draining its loop regions").
#[derive(Debug, Clone, Default)]
pub struct BranchContents {
    pub elements: Vec<ElementId>,
    pub instances: Vec<(Name, InstanceId)>,
    pub loop_regions: Vec<LoopRegionId>,
    pub nested_ifs: Vec<IfRegionId>,
}

impl BranchContents {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.instances.is_empty()
            && self.loop_regions.is_empty()
            && self.nested_ifs.is_empty()
    }
}

/// The static description of a reactive if-region, produced once during
/// creation-phase construction.
#[derive(Debug, Clone)]
pub struct IfRegion {
    pub id: IfRegionId,
    pub cond: Expr,
    pub free_identifiers: FxHashSet<Name>,
    pub then_branch: BranchContents,
    pub else_branch: BranchContents,
}

impl IfRegion {
    pub fn new(id: IfRegionId, cond: Expr) -> Self {
        use crate::ast::capabilities::FreeIdentifiers;
        let free_identifiers = cond.free_identifiers();
        Self {
            id,
            cond,
            free_identifiers,
            then_branch: BranchContents::default(),
            else_branch: BranchContents::default(),
        }
    }

    pub fn branch(&self, active: bool) -> &BranchContents {
        if active {
            &self.then_branch
        } else {
            &self.else_branch
        }
    }
}

/// The runtime state `_sync_if_<id>` operates on: which branch is
/// currently mounted. `_if_<id>_state` in §4.F is exactly this flag.
#[derive(Debug, Clone)]
pub struct IfRegionState {
    pub active_branch: bool,
}

/// Outcome of one `sync` call, used by tests to assert idempotence
/// (Testable Property 9) and the teardown-before-create ordering
/// (Property 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Switched { torn_down: bool, created: bool },
}

impl IfRegionState {
    /// The initial branch selection performed by the creation phase, not
    /// a sync (§4.F "executes the chosen branch initially").
    pub fn initial(active_branch: bool) -> Self {
        Self { active_branch }
    }

    /// `_sync_if_<id>`: recompute, and if the condition changed, tear down
    /// the active branch and create the other one. No-op on an unchanged
    /// condition (§4.F, Testable Property 9).
    pub fn sync(&mut self, new_cond: bool) -> SyncOutcome {
        if new_cond == self.active_branch {
            return SyncOutcome::Unchanged;
        }
        // TODO: when the torn-down branch owns nested if-regions
        // (`BranchContents::nested_ifs`), the order in which those are
        // torn down relative to the branch's own elements/instances is
        // unresolved.
        let torn_down = self.active_branch;
        self.active_branch = new_cond;
        SyncOutcome::Switched {
            torn_down,
            created: new_cond,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expr::ExprKind;
    use crate::base::Span;

    #[test]
    fn unchanged_condition_is_a_no_op() {
        let mut state = IfRegionState::initial(true);
        assert_eq!(state.sync(true), SyncOutcome::Unchanged);
        assert!(state.active_branch);
    }

    #[test]
    fn changed_condition_tears_down_and_creates() {
        let mut state = IfRegionState::initial(true);
        let outcome = state.sync(false);
        assert_eq!(
            outcome,
            SyncOutcome::Switched {
                torn_down: true,
                created: false
            }
        );
        assert!(!state.active_branch);
    }

    #[test]
    fn repeated_sync_with_no_change_between_is_idempotent() {
        let mut state = IfRegionState::initial(false);
        assert!(matches!(state.sync(true), SyncOutcome::Switched { .. }));
        assert_eq!(state.sync(true), SyncOutcome::Unchanged);
    }

    #[test]
    fn region_records_free_identifiers_of_condition() {
        let cond = Expr::new(ExprKind::Ident("visible".into()), Span::synthetic());
        let region = IfRegion::new(IfRegionId(0), cond);
        assert!(region.free_identifiers.contains(&Name::from("visible")));
    }
}
