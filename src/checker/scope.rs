//! Per-method checking state (§4.C substage 5).
//!
//! Method-local and discarded per method: a scope map from identifier to
//! canonical type, a mutable-binding set, and a moved-identifier set. On
//! each node the checker first validates the use against this state, then
//! updates it atomically (§3 "Lifecycle").

use crate::ast::ty::Ty;
use crate::base::Name;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Ty>,
    mutable: FxHashSet<Name>,
    by_reference: FxHashSet<Name>,
    moved: FxHashSet<Name>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: Name, ty: Ty, mutable: bool, by_reference: bool) {
        self.moved.remove(&name);
        if mutable {
            self.mutable.insert(name.clone());
        } else {
            self.mutable.remove(&name);
        }
        if by_reference {
            self.by_reference.insert(name.clone());
        } else {
            self.by_reference.remove(&name);
        }
        self.bindings.insert(name, ty);
    }

    pub fn type_of(&self, name: &Name) -> Option<&Ty> {
        self.bindings.get(name)
    }

    pub fn is_mutable(&self, name: &Name) -> bool {
        self.mutable.contains(name)
    }

    pub fn is_reference(&self, name: &Name) -> bool {
        self.by_reference.contains(name)
    }

    pub fn is_moved(&self, name: &Name) -> bool {
        self.moved.contains(name)
    }

    pub fn mark_moved(&mut self, name: Name) {
        self.moved.insert(name);
    }

    pub fn unmark_moved(&mut self, name: &Name) {
        self.moved.remove(name);
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.bindings.contains_key(name)
    }
}
