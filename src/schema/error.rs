use thiserror::Error;

/// Errors raised while lexing/parsing a definition file (§4.A, §7
/// "Parse/lex in definition files"). Cache I/O and decode failures are a
/// separate concern, carried by [`super::cache::CacheError`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A single malformed definition file. The loader logs this and
    /// continues scanning the rest of the directory — this variant is
    /// therefore always surfaced through a [`crate::diagnostics::DiagnosticSink`],
    /// never propagated as a hard failure (§4.A "Failure").
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
}
