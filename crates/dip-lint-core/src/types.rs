//! Core types for lint violations and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The two kinds of dependency-inversion findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A constructor declares a concrete result type.
    ConstructorReturnsConcrete,
    /// A binding keeps a constructor's concrete result without widening it.
    DirectConcreteBinding,
}

impl ViolationKind {
    /// Rule name reporting this kind.
    #[must_use]
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::ConstructorReturnsConcrete => "constructor-returns-concrete",
            Self::DirectConcreteBinding => "direct-concrete-binding",
        }
    }

    /// Rule code reporting this kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ConstructorReturnsConcrete => "DIP001",
            Self::DirectConcreteBinding => "DIP002",
        }
    }

    /// Looks up the kind from a rule name or rule code.
    #[must_use]
    pub fn from_rule(name_or_code: &str) -> Option<Self> {
        [Self::ConstructorReturnsConcrete, Self::DirectConcreteBinding]
            .into_iter()
            .find(|kind| kind.rule_name() == name_or_code || kind.code() == name_or_code)
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "DIP001").
    pub code: String,
    /// Rule name (e.g., "constructor-returns-concrete").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// The finding kind, when this violation comes from one of the DIP rules.
    #[must_use]
    pub fn kind(&self) -> Option<ViolationKind> {
        ViolationKind::from_rule(&self.rule)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation rendered as a miette diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations of the given kind.
    #[must_use]
    pub fn by_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.kind() == Some(kind))
            .collect()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(errors, warnings, infos), v| match v.severity {
                Severity::Error => (errors + 1, warnings, infos),
                Severity::Warning => (errors, warnings + 1, infos),
                Severity::Info => (errors, warnings, infos + 1),
            })
    }

    /// Sorts violations by file, then line, then column.
    ///
    /// The sort is stable, so violations at the same position keep the
    /// order in which rules reported them.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "DIP001",
            "constructor-returns-concrete",
            severity,
            Location::new(PathBuf::from("src/lib.rs"), 42, 10),
            "constructor 'NewService' returns concrete type 'Service'",
        )
    }

    #[test]
    fn kind_round_trips_through_rule_name_and_code() {
        for kind in [
            ViolationKind::ConstructorReturnsConcrete,
            ViolationKind::DirectConcreteBinding,
        ] {
            assert_eq!(ViolationKind::from_rule(kind.rule_name()), Some(kind));
            assert_eq!(ViolationKind::from_rule(kind.code()), Some(kind));
        }
        assert_eq!(ViolationKind::from_rule("no-unwrap"), None);
    }

    #[test]
    fn violation_kind_comes_from_rule_name() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.kind(), Some(ViolationKind::ConstructorReturnsConcrete));
    }

    #[test]
    fn violation_display_is_single_line() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/lib.rs:42:10: error [DIP001] constructor 'NewService' returns concrete type 'Service'"
        );
    }

    #[test]
    fn has_violations_at_respects_threshold() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));
        assert!(result.has_violations_at(Severity::Info));
    }

    #[test]
    fn count_by_severity_counts_each_level() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Info));
        assert_eq!(result.count_by_severity(), (2, 0, 1));
    }

    #[test]
    fn sort_orders_by_file_then_position() {
        let mut result = LintResult::new();
        let at = |file: &str, line, column| {
            let mut v = make_violation(Severity::Error);
            v.location = Location::new(PathBuf::from(file), line, column);
            v
        };
        result.violations.push(at("b.rs", 1, 1));
        result.violations.push(at("a.rs", 9, 2));
        result.violations.push(at("a.rs", 9, 1));
        result.violations.push(at("a.rs", 3, 5));
        result.sort();

        let order: Vec<(String, usize, usize)> = result
            .violations
            .iter()
            .map(|v| {
                (
                    v.location.file.display().to_string(),
                    v.location.line,
                    v.location.column,
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.rs".to_string(), 3, 5),
                ("a.rs".to_string(), 9, 1),
                ("a.rs".to_string(), 9, 2),
                ("b.rs".to_string(), 1, 1),
            ]
        );
    }

    #[test]
    fn diagnostic_carries_code_and_span() {
        let mut v = make_violation(Severity::Error);
        v.location = v.location.with_span(120, 10);
        let diag = ViolationDiagnostic::from(&v);
        assert_eq!(
            diag.to_string(),
            "[DIP001] constructor 'NewService' returns concrete type 'Service'"
        );
        assert_eq!(diag.span.offset(), 120);
        assert_eq!(diag.span.len(), 10);
    }
}
