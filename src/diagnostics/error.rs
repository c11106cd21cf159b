use crate::base::Span;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error that aborts the current compilation phase (§7).
    #[default]
    Error,
    /// A warning that does not prevent compilation from continuing.
    Warning,
    /// An informational note.
    Hint,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Hint => "Hint",
        }
    }
}

/// A rendered diagnostic: `<Severity>: <message> at line <N>` (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span, severity: Severity) -> Self {
        Self {
            message: message.into(),
            span,
            severity,
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span, Severity::Error)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span, Severity::Warning)
    }

    /// Render in the external diagnostic format (§6):
    /// `Error: <sentence> at line <N>`.
    pub fn render(&self) -> String {
        format!(
            "{}: {} at line {}",
            self.severity.as_str(),
            self.message,
            self.span.line_number()
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;

    #[test]
    fn renders_error_format() {
        let span = Span::new(Position::new(9, 0), Position::new(9, 3));
        let diag = Diagnostic::error("use of moved variable 'c'", span);
        assert_eq!(diag.render(), "Error: use of moved variable 'c' at line 10");
    }
}
