//! Diagnostics sink for parser warnings.
//!
//! Malformed leaf values and structural anomalies never abort a parse; they
//! are recorded here and mirrored to `tracing` as they happen, so tests can
//! assert on captured warnings deterministically instead of scraping logs.

use std::fmt;

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// Recoverable problem; the offending leaf or shape was omitted.
    Warning,
    /// Stream-level failure reported by the XML tokenizer.
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single captured parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Ordered collection of diagnostics produced by one parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to `tracing::warn!`.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "capflow_cap", "{message}");
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            message,
        });
    }

    /// Record a stream-level error and mirror it to `tracing::error!`.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "capflow_cap", "{message}");
        self.entries.push(Diagnostic {
            level: DiagnosticLevel::Error,
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut diags = Diagnostics::new();
        diags.warn("first");
        diags.error("second");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.entries()[0].level, DiagnosticLevel::Warning);
        assert_eq!(diags.entries()[1].level, DiagnosticLevel::Error);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn display_includes_level() {
        let diag = Diagnostic {
            level: DiagnosticLevel::Warning,
            message: "bad circle".to_string(),
        };
        assert_eq!(diag.to_string(), "warning: bad circle");
    }
}
