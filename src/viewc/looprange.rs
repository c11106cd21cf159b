//! Reactive range-for loops (§4.F "View range-for").
//!
//! Index-based diffing: the region tracks only a count. Growing runs the
//! item-creation template for the new indices; shrinking destroys from
//! the back. Component-bodied loops rebind click handlers after growth
//! because a `Vec` growth may move existing items' addresses.

use crate::ast::expr::Expr;
use crate::base::Name;

use super::ids::LoopRegionId;

/// What the loop body is, which determines what kind of backing
/// collection the emitted code must track (§4.F "record whether the body
/// is a component instantiation... an HTML root... or neither").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopBodyKind {
    Component(Name),
    HtmlRoot,
    Neither,
}

/// Static description of a range-for region, built once during creation.
#[derive(Debug, Clone)]
pub struct RangeLoopRegion {
    pub id: LoopRegionId,
    pub var: Name,
    pub start: Expr,
    pub end: Expr,
    pub body_kind: LoopBodyKind,
}

impl RangeLoopRegion {
    pub fn new(id: LoopRegionId, var: Name, start: Expr, end: Expr, body_kind: LoopBodyKind) -> Self {
        Self {
            id,
            var,
            start,
            end,
            body_kind,
        }
    }

    /// Component-bodied loops require rebinding on growth; `HtmlRoot` and
    /// `Neither` loops don't hold anything with a stable address to lose
    /// (§4.F "rebind click handlers on all previously created items").
    fn rebinds_on_growth(&self) -> bool {
        matches!(self.body_kind, LoopBodyKind::Component(_))
    }
}

/// `_loop_<id>_parent` plus the tracked count `_sync_loop_<id>` reads and
/// writes.
#[derive(Debug, Clone)]
pub struct RangeLoopState {
    pub old_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSyncOutcome {
    Unchanged,
    Grew { from: usize, to: usize, rebind_previous: bool },
    Shrank { from: usize, to: usize, reran_item_update: bool },
}

impl RangeLoopState {
    pub fn new(initial_count: usize) -> Self {
        Self { old_count: initial_count }
    }

    /// `_sync_loop_<id>` for a range-for region (§4.F).
    ///
    /// Growing preserves identity of indices `[0, old_count)`; shrinking
    /// destroys from the back so surviving items never move (Testable
    /// Property 4).
    pub fn sync(&mut self, region: &RangeLoopRegion, new_count: usize) -> RangeSyncOutcome {
        let outcome = match new_count.cmp(&self.old_count) {
            std::cmp::Ordering::Equal => RangeSyncOutcome::Unchanged,
            std::cmp::Ordering::Greater => RangeSyncOutcome::Grew {
                from: self.old_count,
                to: new_count,
                rebind_previous: region.rebinds_on_growth(),
            },
            std::cmp::Ordering::Less => RangeSyncOutcome::Shrank {
                from: self.old_count,
                to: new_count,
                // item-update template reruns over the kept range only
                // when the body carries per-index prop derivation, i.e.
                // component bodies (§4.F "run the item-update template...
                // to propagate index-derived prop values").
                reran_item_update: matches!(region.body_kind, LoopBodyKind::Component(_)),
            },
        };
        self.old_count = new_count;
        outcome
    }
}
