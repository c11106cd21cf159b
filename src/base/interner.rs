//! The interned identifier type shared across every phase of the compiler.
//!
//! Identifiers arrive as [`Name`] already constructed by the upstream
//! parser (§1: this crate operates on an already-parsed typed tree), so
//! there is no in-crate construction path that would benefit from a
//! dedicated interning table — `Rc<str>` alone gives cheap cloning, and
//! equality falls back to content comparison rather than pointer identity.

use std::rc::Rc;

/// An interned identifier — cheap to clone (just an `Rc` increment).
pub type Name = Rc<str>;
