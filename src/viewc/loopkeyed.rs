//! Keyed each-for loops (§4.F "View each-for with key").
//!
//! Reconciliation by key rather than by index: items whose key survives
//! between syncs keep their identity and are never moved, only created or
//! destroyed. The open question of whether a future implementation
//! reorders kept items to match new iteration order is left unresolved
//! (§9 Design Notes).

use indexmap::IndexMap;
use std::hash::Hash;

use crate::ast::expr::Expr;
use crate::base::Name;

use super::ids::{InstanceId, LoopRegionId};

/// Static description of a keyed each-for region.
#[derive(Debug, Clone)]
pub struct KeyedLoopRegion {
    pub id: LoopRegionId,
    pub var: Name,
    pub iterable: Expr,
    pub key_expr: Expr,
    pub child_type: Name,
}

/// The key -> live-item map a region's sync routine consults (§4.F "a
/// per-region key map tracks which keys currently have live items").
///
/// `K` is the resolved key value (e.g. an interned string or integer);
/// insertion order is preserved so iteration order stays stable between
/// syncs, matching the spec's "stable iteration order is assumed" note.
#[derive(Debug, Clone, Default)]
pub struct KeyedLoopState<K: Hash + Eq + Clone> {
    live: IndexMap<K, InstanceId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedSyncReport<K> {
    pub destroyed: Vec<K>,
    pub created: Vec<K>,
    /// Set when the region grew past its pre-sync size, meaning
    /// previously created items may have had their backing storage
    /// reallocated and their handlers must be rebound (§4.F).
    pub rebind_previous: bool,
}

impl<K: Hash + Eq + Clone> KeyedLoopState<K> {
    pub fn new() -> Self {
        Self { live: IndexMap::new() }
    }

    pub fn live_keys(&self) -> impl Iterator<Item = &K> {
        self.live.keys()
    }

    /// `_sync_loop_<id>` for a keyed region: destroy items whose key
    /// dropped out of `new_keys`, then create items for keys not yet
    /// tracked, in the order `new_keys` presents them (§4.F, Testable
    /// Property 5: no reordering of kept items).
    pub fn sync<F>(&mut self, new_keys: &[K], mut allocate: F) -> KeyedSyncReport<K>
    where
        F: FnMut(&K) -> InstanceId,
    {
        // TODO: kept items keep their current relative position rather
        // than being moved to match `new_keys`' order. Whether a future
        // implementation should reorder them is open.
        let new_set: std::collections::HashSet<&K> = new_keys.iter().collect();

        let stale: Vec<K> = self
            .live
            .keys()
            .filter(|k| !new_set.contains(*k))
            .cloned()
            .collect();
        let mut destroyed = Vec::with_capacity(stale.len());
        for key in stale.into_iter().rev() {
            self.live.shift_remove(&key);
            destroyed.push(key);
        }
        destroyed.reverse();

        let pre_growth_size = self.live.len();
        let mut created = Vec::new();
        for key in new_keys {
            if !self.live.contains_key(key) {
                let id = allocate(key);
                self.live.insert(key.clone(), id);
                created.push(key.clone());
            }
        }
        let rebind_previous = pre_growth_size < self.live.len() && pre_growth_size > 0;

        KeyedSyncReport {
            destroyed,
            created,
            rebind_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_id(counter: &mut u32) -> InstanceId {
        let id = InstanceId(*counter);
        *counter += 1;
        id
    }

    #[test]
    fn new_keys_are_created_in_order() {
        let mut state: KeyedLoopState<&str> = KeyedLoopState::new();
        let mut counter = 0;
        let report = state.sync(&["a", "b", "c"], |_| next_id(&mut counter));
        assert_eq!(report.created, vec!["a", "b", "c"]);
        assert!(report.destroyed.is_empty());
        assert_eq!(state.live_keys().collect::<Vec<_>>(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn dropped_keys_are_destroyed_and_kept_keys_survive() {
        let mut state: KeyedLoopState<&str> = KeyedLoopState::new();
        let mut counter = 0;
        state.sync(&["a", "b", "c"], |_| next_id(&mut counter));

        let report = state.sync(&["a", "c"], |_| next_id(&mut counter));
        assert_eq!(report.destroyed, vec!["b"]);
        assert!(report.created.is_empty());
        assert_eq!(state.live_keys().collect::<Vec<_>>(), vec![&"a", &"c"]);
    }

    #[test]
    fn growth_past_initial_size_requests_rebind() {
        let mut state: KeyedLoopState<&str> = KeyedLoopState::new();
        let mut counter = 0;
        state.sync(&["a"], |_| next_id(&mut counter));
        let report = state.sync(&["a", "b"], |_| next_id(&mut counter));
        assert!(report.rebind_previous);
    }

    #[test]
    fn kept_items_retain_their_instance_id() {
        let mut state: KeyedLoopState<&str> = KeyedLoopState::new();
        let mut counter = 0;
        state.sync(&["a", "b"], |_| next_id(&mut counter));
        let id_before = *state.live.get("a").unwrap();
        state.sync(&["a", "b", "c"], |_| next_id(&mut counter));
        let id_after = *state.live.get("a").unwrap();
        assert_eq!(id_before, id_after);
    }
}
