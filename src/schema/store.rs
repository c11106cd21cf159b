//! The schema store (component A, §4.A).
//!
//! Process-wide, built once per run. The Design Notes (§9) ask for the
//! store's reverse indices to be built eagerly rather than lazily on
//! first query, to remove the "first-query populates state" edge case —
//! this implementation does that in [`SchemaStore::load`] /
//! [`SchemaStore::load_cache`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

use super::cache;
use super::model::SchemaType;
use super::parser;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::base::{Position, Span};

/// Lower-case with underscores inserted before each uppercase letter, or
/// between a letter and a digit (§4.A `to_snake_case`).
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        let boundary = match prev {
            Some(p) => {
                (p.is_lowercase() && c.is_uppercase())
                    || (p.is_alphabetic() && c.is_ascii_digit())
                    || (p.is_ascii_digit() && c.is_alphabetic() && c.is_uppercase())
            }
            None => false,
        };
        if boundary {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    out
}

#[derive(Debug, Default)]
pub struct SchemaStore {
    types: HashMap<String, SchemaType>,
    /// "ns::func" -> (type name, method index)
    by_mapped_identifier: HashMap<String, (String, usize)>,
    /// snake_case(method name) -> Vec<(type name, method index)>
    by_snake_name: HashMap<String, Vec<(String, usize)>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse all definition files under `dir`, recursively (§4.A `load`).
    /// Missing directories log and return an empty store; per-file parse
    /// errors are pushed to `sink` and do not abort the scan.
    pub fn load(dir: &Path, sink: &mut DiagnosticSink) -> Self {
        let mut store = Self::new();
        if !dir.exists() {
            tracing::warn!(path = %dir.display(), "schema directory does not exist");
            return store;
        }
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let contents = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read schema file");
                    continue;
                }
            };
            let outcome = parser::parse_file(&path.display().to_string(), &contents);
            for err in outcome.errors {
                let crate::schema::error::SchemaError::Parse { line, .. } = &err;
                let line = *line;
                let span = Span::new(Position::new(line.saturating_sub(1), 0), Position::new(line.saturating_sub(1), 0));
                sink.push(Diagnostic::new(err.to_string(), span, Severity::Warning));
            }
            for ty in outcome.types {
                store.merge_type(ty);
            }
        }
        store.rebuild_indices();
        store
    }

    /// Read a binary snapshot (§6 "Cache file"). The caller is responsible
    /// for first checking [`cache_is_stale`].
    pub fn load_cache(path: &Path) -> Result<Self, cache::CacheError> {
        let file = fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let types = cache::read_snapshot(&mut reader)?;
        let mut store = Self::new();
        for ty in types {
            store.types.insert(ty.name.clone(), ty);
        }
        store.rebuild_indices();
        Ok(store)
    }

    pub fn save_cache(&self, path: &Path) -> std::io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        let types: Vec<SchemaType> = self.types.values().cloned().collect();
        cache::write_snapshot(&mut writer, &types)
    }

    /// The cache is stale if any definition file under `dirs` is newer
    /// than the cache file itself (§4.A, §6).
    pub fn cache_is_stale(cache_path: &Path, dirs: &[std::path::PathBuf]) -> bool {
        let cache_mtime = match fs::metadata(cache_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        for dir in dirs {
            for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let source_mtime: Option<SystemTime> =
                    entry.metadata().ok().and_then(|m| m.modified().ok());
                if let Some(mtime) = source_mtime
                    && mtime > cache_mtime
                {
                    return true;
                }
            }
        }
        false
    }

    /// Fold another store's types into this one and rebuild the reverse
    /// indices (used when a run scans more than one schema directory,
    /// §10.4 `CompilerConfig::schema_dirs`).
    pub fn merge_from(&mut self, other: Self) {
        for ty in other.types.into_values() {
            self.merge_type(ty);
        }
        self.rebuild_indices();
    }

    fn merge_type(&mut self, ty: SchemaType) {
        match self.types.get_mut(&ty.name) {
            Some(existing) => existing.merge(ty),
            None => {
                self.types.insert(ty.name.clone(), ty);
            }
        }
    }

    fn rebuild_indices(&mut self) {
        self.by_mapped_identifier.clear();
        self.by_snake_name.clear();
        for ty in self.types.values() {
            for (idx, method) in ty.methods.iter().enumerate() {
                if let Some(id) = method.mapped_identifier() {
                    self.by_mapped_identifier
                        .insert(id.to_string(), (ty.name.clone(), idx));
                }
                let snake = to_snake_case(&method.name);
                self.by_snake_name
                    .entry(snake)
                    .or_default()
                    .push((ty.name.clone(), idx));
            }
        }
    }

    pub fn lookup_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// Walk `extends` chains looking for a method with the given name and
    /// arity (§4.A `lookup_method` "with parent-walk").
    pub fn lookup_method(
        &self,
        type_name: &str,
        method_name: &str,
    ) -> Option<(&SchemaType, &super::model::MethodEntry)> {
        let mut current = type_name;
        let mut seen = std::collections::HashSet::new();
        loop {
            if !seen.insert(current.to_string()) {
                return None; // cyclic extends chain; treat as not found
            }
            let ty = self.types.get(current)?;
            if let Some(m) = ty.methods.iter().find(|m| m.name == method_name) {
                return Some((ty, m));
            }
            match &ty.extends {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// A type with any mapped method, walking parents (§4.A `is_handle`).
    pub fn is_handle(&self, name: &str) -> bool {
        let mut current = name;
        let mut seen = std::collections::HashSet::new();
        while seen.insert(current.to_string()) {
            let Some(ty) = self.types.get(current) else {
                return false;
            };
            if ty.methods.iter().any(|m| m.mapped_identifier().is_some()) {
                return true;
            }
            match &ty.extends {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Walks parents and strips `[]`/`[N]` array decoration (§4.A
    /// `is_nocopy`).
    pub fn is_nocopy(&self, name: &str) -> bool {
        let stripped = name.trim_end_matches(']');
        let base = stripped
            .split('[')
            .next()
            .unwrap_or(stripped)
            .trim();
        let mut current = base;
        let mut seen = std::collections::HashSet::new();
        while seen.insert(current.to_string()) {
            let Some(ty) = self.types.get(current) else {
                return false;
            };
            if ty.nocopy {
                return true;
            }
            match &ty.extends {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    pub fn inherits_from(&self, derived: &str, base: &str) -> bool {
        if derived == base {
            return true;
        }
        let mut current = derived;
        let mut seen = std::collections::HashSet::new();
        while seen.insert(current.to_string()) {
            let Some(ty) = self.types.get(current) else {
                return false;
            };
            match &ty.extends {
                Some(parent) if parent == base => return true,
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Follows alias chains to the canonical name (§4.A `resolve_alias`).
    pub fn resolve_alias(&self, name: &str) -> String {
        let mut current = name.to_string();
        let mut seen = std::collections::HashSet::new();
        while seen.insert(current.clone()) {
            match self.types.get(&current).and_then(|t| t.alias_of.clone()) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// The namespace derived from a type's mapped method names, e.g. a
    /// type whose methods map to `"canvas::create"`, `"canvas::clear"`
    /// has namespace `"canvas"` (§3 "Handle type").
    pub fn get_namespace_for_type(&self, name: &str) -> Option<String> {
        let ty = self.types.get(name)?;
        ty.methods.iter().find_map(|m| {
            m.mapped_identifier()
                .and_then(|id| id.split_once("::"))
                .map(|(ns, _)| ns.to_string())
        })
    }

    pub fn lookup_by_mapped_identifier(&self, id: &str) -> Option<(&str, &super::model::MethodEntry)> {
        let (type_name, idx) = self.by_mapped_identifier.get(id)?;
        let ty = self.types.get(type_name)?;
        Some((type_name.as_str(), &ty.methods[*idx]))
    }

    pub fn lookup_by_snake_name(&self, snake: &str) -> &[(String, usize)] {
        self.by_snake_name
            .get(snake)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_inserts_before_uppercase_and_digits() {
        assert_eq!(to_snake_case("onClick"), "on_click");
        assert_eq!(to_snake_case("Canvas2D"), "canvas2_d");
        assert_eq!(to_snake_case("getX"), "get_x");
    }

    #[test]
    fn load_from_tempdir_merges_duplicate_types() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.def"),
            r#"type Canvas { def create(): Canvas }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.def"),
            r#"@nocopy type Canvas { def clear(Canvas self): void }"#,
        )
        .unwrap();
        let mut sink = DiagnosticSink::new();
        let store = SchemaStore::load(dir.path(), &mut sink);
        assert!(sink.is_empty());
        let ty = store.lookup_type("Canvas").unwrap();
        assert!(ty.nocopy);
        assert_eq!(ty.methods.len(), 2);
    }

    #[test]
    fn is_handle_walks_parent_chain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.def"),
            r#"
            type Resource {
                @map("res::alloc")
                def alloc(): Resource
            }
            type Canvas extends Resource {
                def width(Canvas self): int
            }
            "#,
        )
        .unwrap();
        let mut sink = DiagnosticSink::new();
        let store = SchemaStore::load(dir.path(), &mut sink);
        assert!(store.is_handle("Canvas"));
        assert!(store.inherits_from("Canvas", "Resource"));
    }

    #[test]
    fn resolve_alias_follows_chain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.def"),
            r#"
            type Widget { def noop(): void }
            @alias("Widget")
            type OldWidget { def noop(): void }
            "#,
        )
        .unwrap();
        let mut sink = DiagnosticSink::new();
        let store = SchemaStore::load(dir.path(), &mut sink);
        assert_eq!(store.resolve_alias("OldWidget"), "Widget");
    }

    #[test]
    fn cache_round_trip_preserves_lookup_behavior() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.def"),
            r#"
            @nocopy
            type Socket {
                @map("net::connect")
                def connect(): Socket
            }
            "#,
        )
        .unwrap();
        let mut sink = DiagnosticSink::new();
        let store = SchemaStore::load(dir.path(), &mut sink);
        let cache_path = dir.path().join("cache.bin");
        store.save_cache(&cache_path).unwrap();
        let reloaded = SchemaStore::load_cache(&cache_path).unwrap();
        assert_eq!(store.is_handle("Socket"), reloaded.is_handle("Socket"));
        assert_eq!(store.is_nocopy("Socket"), reloaded.is_nocopy("Socket"));
        assert_eq!(
            store.lookup_by_mapped_identifier("net::connect").is_some(),
            reloaded.lookup_by_mapped_identifier("net::connect").is_some()
        );
    }

    #[test]
    fn missing_directory_logs_and_returns_empty() {
        let mut sink = DiagnosticSink::new();
        let store = SchemaStore::load(Path::new("/nonexistent/path/xyz"), &mut sink);
        assert_eq!(store.type_names().count(), 0);
    }
}
