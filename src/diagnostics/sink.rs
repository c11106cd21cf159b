use super::Diagnostic;

/// Collects non-fatal diagnostics.
///
/// Used by the schema loader (§4.A: "missing file logs and returns empty;
/// parse errors are reported per-line but do not abort the load") where a
/// single bad input must not stop the whole directory scan. Fatal phases
/// (the checker, the topological sorter) do not use this type — they
/// thread `Result` and stop at the first error (§7).
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
