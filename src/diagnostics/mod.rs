//! Shared diagnostic types.
//!
//! Every subsystem (`schema`, `checker`, `topo`) defines its own
//! `thiserror` error enum for the error *kinds* it can raise (§7); this
//! module defines the common [`Severity`]/[`Diagnostic`] shape those enums
//! render through, and [`DiagnosticSink`], the non-fatal collector used
//! for warnings that should not abort a phase (e.g. a single malformed
//! schema file, §4.A failure semantics).
//!
//! The checker itself does not use the sink for errors: per §7 the first
//! semantic error aborts the phase, so checker passes are `Result`-threaded
//! rather than collected (see [`crate::checker::TypeError`]).

mod error;
mod sink;

pub use error::{Diagnostic, Severity};
pub use sink::DiagnosticSink;
