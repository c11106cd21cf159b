//! Type-checker error kinds (component C, §7).
//!
//! The checker is fail-fast: the first error aborts the current phase and
//! is returned as `Err`, never collected in a [`crate::diagnostics::DiagnosticSink`]
//! (§7 "the checker uses a fail fast on first error discipline").

use crate::ast::ty::Ty;
use crate::base::{Name, Span};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("component '{name}' collides with a schema handle type of the same name")]
    ComponentNameCollidesWithHandle { name: Name, span: Span },

    #[error("data type '{name}' contains no-copy field '{field}' of type '{ty}'")]
    DataFieldIsNoCopy {
        name: Name,
        field: Name,
        ty: Ty,
        span: Span,
    },

    #[error("expected type '{expected}', found '{found}'")]
    Mismatch {
        expected: Ty,
        found: Ty,
        span: Span,
    },

    #[error("unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: Name, span: Span },

    #[error("unresolved type '{name}'")]
    UnresolvedType { name: Name, span: Span },

    #[error("use of moved variable '{name}'")]
    UseOfMoved { name: Name, span: Span },

    #[error("cannot move a reference binding '{name}'")]
    ReferenceToMoved { name: Name, span: Span },

    #[error("cannot copy no-copy type '{ty}' without move or reference")]
    CopyOfNoCopy { ty: Ty, span: Span },

    #[error("write to immutable binding '{name}'")]
    WriteToImmutable { name: Name, span: Span },

    #[error("mutating call on immutable binding '{name}'")]
    MutatingCallOnImmutable { name: Name, span: Span },

    #[error("reference state or parameter '{name}' cannot be public")]
    PublicReference { name: Name, span: Span },

    #[error("reference '{name}' must be initialized")]
    UninitializedReference { name: Name, span: Span },

    #[error("reference '{name}' cannot be rebound to a moved value")]
    ReferenceToMovedValue { name: Name, span: Span },

    #[error("state '{name}' holds an upward reference to child component member '{member}'")]
    UpwardReference {
        name: Name,
        member: Name,
        span: Span,
    },

    #[error("return type mismatch: expected '{expected}', found '{found}'")]
    ReturnMismatch {
        expected: Ty,
        found: Ty,
        span: Span,
    },

    #[error("bare 'return;' is only valid in a void, non-tuple method")]
    InvalidBareReturn { span: Span },

    #[error("tuple destructure expects {expected} elements, found {found}")]
    TupleArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("tuple element {index} expected '{expected}', found '{found}'")]
    TupleElementMismatch {
        index: usize,
        expected: Ty,
        found: Ty,
        span: Span,
    },

    #[error("argument to reference parameter '{param}' must use '&'")]
    MissingReferenceMarker { param: Name, span: Span },

    #[error("argument to non-reference parameter '{param}' must not use '&'")]
    UnexpectedReferenceMarker { param: Name, span: Span },

    #[error("cannot move into reference parameter '{param}'")]
    MoveIntoReference { param: Name, span: Span },

    #[error("non-event attribute '{attr}' must be of type 'string', found '{found}'")]
    AttributeNotString {
        attr: Name,
        found: Ty,
        span: Span,
    },

    #[error("event handler '{attr}' must take a single '{expected}' parameter")]
    EventHandlerSignature {
        attr: Name,
        expected: Ty,
        span: Span,
    },

    #[error("component '{name}' is not visible from this module without a module prefix")]
    MissingModulePrefix { name: Name, span: Span },

    #[error("component '{name}' in module '{module}' is not public")]
    NotPublic { name: Name, module: Name, span: Span },

    #[error("file does not directly import the module defining '{name}'")]
    NotDirectlyImported { name: Name, span: Span },

    #[error("component '{name}' cannot be instantiated: invalid up/downcast")]
    InvalidCast { name: Name, span: Span },

    #[error("router has a route but no matching <route/> placeholder in the view")]
    RouterWithoutPlaceholder { span: Span },

    #[error("<route/> placeholder present but no router block defined")]
    PlaceholderWithoutRouter { span: Span },

    #[error("route target component '{name}' does not exist")]
    RouteTargetMissing { name: Name, span: Span },

    #[error("missing required prop '{name}'")]
    MissingRequiredProp { name: Name, span: Span },

    #[error("unknown prop '{name}'")]
    UnknownProp { name: Name, span: Span },
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::ComponentNameCollidesWithHandle { span, .. }
            | TypeError::DataFieldIsNoCopy { span, .. }
            | TypeError::Mismatch { span, .. }
            | TypeError::UnresolvedIdentifier { span, .. }
            | TypeError::UnresolvedType { span, .. }
            | TypeError::UseOfMoved { span, .. }
            | TypeError::ReferenceToMoved { span, .. }
            | TypeError::CopyOfNoCopy { span, .. }
            | TypeError::WriteToImmutable { span, .. }
            | TypeError::MutatingCallOnImmutable { span, .. }
            | TypeError::PublicReference { span, .. }
            | TypeError::UninitializedReference { span, .. }
            | TypeError::ReferenceToMovedValue { span, .. }
            | TypeError::UpwardReference { span, .. }
            | TypeError::ReturnMismatch { span, .. }
            | TypeError::InvalidBareReturn { span }
            | TypeError::TupleArityMismatch { span, .. }
            | TypeError::TupleElementMismatch { span, .. }
            | TypeError::MissingReferenceMarker { span, .. }
            | TypeError::UnexpectedReferenceMarker { span, .. }
            | TypeError::MoveIntoReference { span, .. }
            | TypeError::AttributeNotString { span, .. }
            | TypeError::EventHandlerSignature { span, .. }
            | TypeError::MissingModulePrefix { span, .. }
            | TypeError::NotPublic { span, .. }
            | TypeError::NotDirectlyImported { span, .. }
            | TypeError::InvalidCast { span, .. }
            | TypeError::RouterWithoutPlaceholder { span }
            | TypeError::PlaceholderWithoutRouter { span }
            | TypeError::RouteTargetMissing { span, .. }
            | TypeError::MissingRequiredProp { span, .. }
            | TypeError::UnknownProp { span, .. } => *span,
        }
    }

    /// Render through the shared diagnostic format (§6): `Error: <sentence> at line <N>`.
    pub fn to_diagnostic(&self) -> crate::diagnostics::Diagnostic {
        crate::diagnostics::Diagnostic::error(self.to_string(), self.span())
    }
}
