//! Bindings: the wiring between state variables and the elements whose
//! attribute or text content depends on them (§4.F "Bindings").
//!
//! Attached to non-static attribute values and non-static text content
//! only — static values need no runtime wiring and are folded directly
//! into the creation phase.

use crate::ast::capabilities::{FreeIdentifiers, Staticness};
use crate::ast::expr::Expr;
use crate::base::Name;
use rustc_hash::FxHashSet;

use super::ids::{ElementId, IfRegionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Attribute,
    Text,
}

/// One binding record (§4.F "Data produced per component").
#[derive(Debug, Clone)]
pub struct Binding {
    pub element: ElementId,
    pub kind: BindingKind,
    pub attr_name: Option<Name>,
    pub expr: Expr,
    pub free_identifiers: FxHashSet<Name>,
    /// The if-region this binding belongs to, and whether it is the
    /// then-branch (`true`) or else-branch (`false`), if it sits inside a
    /// reactive conditional (§4.F "Per-variable update routines": guard by
    /// `_if_<id>_state`).
    pub if_region: Option<(IfRegionId, bool)>,
}

impl Binding {
    pub fn new(
        element: ElementId,
        kind: BindingKind,
        attr_name: Option<Name>,
        expr: Expr,
        if_region: Option<(IfRegionId, bool)>,
    ) -> Self {
        let free_identifiers = expr.free_identifiers();
        Self {
            element,
            kind,
            attr_name,
            expr,
            free_identifiers,
            if_region,
        }
    }
}

/// Attribute values and text content are bound only when they carry a
/// runtime dependency (§4.F "Bindings are attached to non-static...
/// values only").
pub fn needs_binding(expr: &Expr) -> bool {
    !expr.is_static()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expr::ExprKind;
    use crate::base::Span;

    #[test]
    fn literal_does_not_need_binding() {
        let expr = Expr::new(ExprKind::IntLit(3), Span::synthetic());
        assert!(!needs_binding(&expr));
    }

    #[test]
    fn identifier_needs_binding() {
        let expr = Expr::new(ExprKind::Ident("count".into()), Span::synthetic());
        assert!(needs_binding(&expr));
    }

    #[test]
    fn binding_captures_free_identifiers() {
        let expr = Expr::new(ExprKind::Ident("count".into()), Span::synthetic());
        let binding = Binding::new(ElementId(0), BindingKind::Text, None, expr, None);
        assert!(binding.free_identifiers.contains(&Name::from("count")));
    }
}
