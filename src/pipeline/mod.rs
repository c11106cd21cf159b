//! End-to-end pipeline orchestration (§5 ordering).
//!
//! The one place that threads state explicitly through the callchain
//! rather than through globals (§9 Design Notes): the schema store, the
//! global context, and the dependency index are all built once here and
//! passed down to each stage.

use std::path::Path;

use thiserror::Error;

use crate::ast::decl::Program;
use crate::checker::{self, TypeError};
use crate::config::CompilerConfig;
use crate::diagnostics::DiagnosticSink;
use crate::features::{self, FeatureFlags};
use crate::schema::SchemaStore;
use crate::topo::{self, ComponentKey};

/// The top-level error type a driver sees (§10.3): wraps the first hard
/// failure from any fail-fast stage.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Cycle(#[from] topo::CycleError),

    #[error(transparent)]
    Cache(#[from] crate::schema::CacheError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Render in the external diagnostic format (§6) when this error came
    /// from a phase that produces one.
    pub fn to_diagnostic(&self) -> Option<crate::diagnostics::Diagnostic> {
        match self {
            CoreError::Type(e) => Some(e.to_diagnostic()),
            _ => None,
        }
    }
}

/// Everything produced by a successful compilation run, handed back to
/// the external driver for back-end emission.
pub struct CompilationResult {
    pub order: Vec<ComponentKey>,
    pub feature_flags: FeatureFlags,
    pub schema_diagnostics: Vec<crate::diagnostics::Diagnostic>,
}

/// Load the schema store, honoring the cache if present and fresh
/// (§4.A, §6 "Cache file").
fn load_schema(config: &CompilerConfig, sink: &mut DiagnosticSink) -> Result<SchemaStore, CoreError> {
    if let Some(cache_path) = &config.cache_path
        && !config.force_refresh_cache
        && cache_path.exists()
        && !SchemaStore::cache_is_stale(cache_path, &config.schema_dirs)
    {
        tracing::trace!(path = %cache_path.display(), "schema cache hit");
        return Ok(SchemaStore::load_cache(cache_path)?);
    }

    tracing::trace!("schema cache miss, scanning definition directories");
    let mut store = SchemaStore::new();
    for dir in &config.schema_dirs {
        let loaded = SchemaStore::load(dir, sink);
        store.merge_from(loaded);
    }
    if let Some(cache_path) = &config.cache_path {
        store.save_cache(cache_path)?;
    }
    Ok(store)
}

/// Run the full pipeline (§5): schema load, type check, topological
/// sort, feature detection. View compilation (component F) is invoked
/// per component by the caller once components are known to be safe to
/// emit, in the order returned here.
pub fn compile(program: &mut Program, config: &CompilerConfig) -> Result<CompilationResult, CoreError> {
    let mut sink = DiagnosticSink::new();
    let schema = load_schema(config, &mut sink)?;

    let default_module: crate::base::Name = config.default_module.as_str().into();
    checker::check_program(program, &schema, &default_module)?;

    let order = topo::topological_order(program)?;
    let feature_flags = features::scan_program(program, &schema);

    Ok(CompilationResult {
        order,
        feature_flags,
        schema_diagnostics: sink.into_vec(),
    })
}

/// Convenience entry point that loads the schema from a single directory
/// without a cache, for drivers that don't need the full `CompilerConfig`
/// surface (e.g. tests, one-off invocations).
pub fn compile_with_schema_dir(
    program: &mut Program,
    schema_dir: &Path,
) -> Result<CompilationResult, CoreError> {
    let mut sink = DiagnosticSink::new();
    let schema = SchemaStore::load(schema_dir, &mut sink);

    checker::check_program(program, &schema, &"main".into())?;
    let order = topo::topological_order(program)?;
    let feature_flags = features::scan_program(program, &schema);

    Ok(CompilationResult {
        order,
        feature_flags,
        schema_diagnostics: sink.into_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_compiles_with_empty_schema() {
        let mut program = Program::default();
        let result = compile_with_schema_dir(&mut program, Path::new("/nonexistent")).unwrap();
        assert!(result.order.is_empty());
        assert!(result.feature_flags.events.is_empty());
    }
}
