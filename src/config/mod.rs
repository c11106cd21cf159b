//! Compiler-wide configuration.
//!
//! The core does not own a command-line driver (§1 Non-goals); this
//! struct is the surface an external driver sets before invoking
//! [`crate::pipeline`]. Mirrors the teacher's pattern of a small options
//! struct an external workspace loader populates, optionally merged from
//! a `compiler.toml` file via `serde`.

use std::path::PathBuf;

use serde::Deserialize;

/// Options controlling a single compilation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Directories scanned for schema definition files (§4.A `load(dir)`).
    pub schema_dirs: Vec<PathBuf>,
    /// Path of the binary schema cache snapshot (§6 Cache file).
    pub cache_path: Option<PathBuf>,
    /// Skip the cache's modification-time check and always reparse.
    pub force_refresh_cache: bool,
    /// Source roots used to resolve module-qualified imports.
    pub module_roots: Vec<PathBuf>,
    /// Default module name assigned to components with no explicit module.
    pub default_module: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_dirs: Vec::new(),
            cache_path: None,
            force_refresh_cache: false,
            module_roots: Vec::new(),
            default_module: "main".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a `compiler.toml` document on top of the defaults.
    ///
    /// Unknown keys are ignored; a malformed document is reported to the
    /// caller rather than silently discarded, per §7's habit of
    /// surfacing load failures instead of masking them.
    pub fn merge_toml(mut self, document: &str) -> Result<Self, toml::de::Error> {
        let overrides: CompilerConfig = toml::from_str(document)?;
        if !overrides.schema_dirs.is_empty() {
            self.schema_dirs = overrides.schema_dirs;
        }
        if overrides.cache_path.is_some() {
            self.cache_path = overrides.cache_path;
        }
        self.force_refresh_cache = overrides.force_refresh_cache;
        if !overrides.module_roots.is_empty() {
            self.module_roots = overrides.module_roots;
        }
        if overrides.default_module != "main" {
            self.default_module = overrides.default_module;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_module_is_main() {
        assert_eq!(CompilerConfig::new().default_module, "main");
    }

    #[test]
    fn merge_toml_overrides_schema_dirs() {
        let cfg = CompilerConfig::new()
            .merge_toml("schema_dirs = [\"schema\"]\ndefault_module = \"app\"\n")
            .unwrap();
        assert_eq!(cfg.schema_dirs, vec![PathBuf::from("schema")]);
        assert_eq!(cfg.default_module, "app");
    }
}
