//! # viewc-core
//!
//! Semantic analyzer, reactive view compiler, and schema layer for a
//! declarative, component-oriented UI language that compiles to a
//! back-end systems language with manual lifecycle and a DOM-style
//! runtime.
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! pipeline  → orchestrates the whole compilation
//!   ↓
//! viewc     → reactive view compiler (create phase, if/loop regions)
//! features  → event/namespace scan, runtime feature flags
//!   ↓
//! checker   → type checker (uses schema + deps)
//! topo      → component dependency ordering
//!   ↓
//! deps      → free-identifier / modification analysis
//! schema    → external type definitions (handle types, methods)
//!   ↓
//! ast       → typed tree: expressions, statements, views, declarations
//! diagnostics → error/severity types shared by every phase
//! config    → compiler-wide options
//!   ↓
//! base      → primitives: FileId, Name interning, Span/Position
//! ```

/// Foundation types: FileId, Name interning, Span/Position.
pub mod base;

/// Shared diagnostic types and the fail-fast collector.
pub mod diagnostics;

/// Compiler-wide configuration.
pub mod config;

/// The abstract tree: expressions, statements, view nodes, declarations.
pub mod ast;

/// Schema store: definition-file grammar, merge-on-load, binary cache.
pub mod schema;

/// Free-identifier and modification analysis over the tree.
pub mod deps;

/// Semantic analyzer / type checker.
pub mod checker;

/// Topological ordering of components.
pub mod topo;

/// Reactive view compiler.
pub mod viewc;

/// Event/namespace feature detector.
pub mod features;

/// End-to-end pipeline orchestration.
pub mod pipeline;

pub use base::{FileId, Name, Position, Span};
pub use diagnostics::{Diagnostic, Severity};
pub use pipeline::CoreError;
