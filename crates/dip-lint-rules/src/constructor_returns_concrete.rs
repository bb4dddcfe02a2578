//! Rule to forbid constructors that declare a concrete result.
//!
//! # Rationale
//!
//! A constructor that hands out a concrete type ties every caller to that
//! implementation. Returning `impl Trait` or `Box<dyn Trait>` lets the
//! implementation change without touching the callers.
//!
//! # Configuration
//!
//! The `[dip]` settings decide which names are constructors and which
//! files and names are in scope.
//!
//! # Suppression
//!
//! - `// dip-lint: allow(constructor-returns-concrete) reason="..."` comment

use dip_lint_core::scanner::declaration_sites;
use dip_lint_core::{
    classify, Declaration, FileContext, Policy, ResolvedType, Rule, Severity, Suggestion, Unit,
    Violation,
};
use std::sync::Arc;

/// Rule code for constructor-returns-concrete.
pub const CODE: &str = "DIP001";

/// Rule name for constructor-returns-concrete.
pub const NAME: &str = "constructor-returns-concrete";

/// Reports constructor-shaped functions that declare a concrete result.
///
/// A constructor with several concrete results is reported once per result.
#[derive(Debug, Clone)]
pub struct ConstructorReturnsConcrete {
    policy: Arc<Policy>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ConstructorReturnsConcrete {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructorReturnsConcrete {
    /// Creates the rule with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Arc::new(Policy::default()))
    }

    /// Creates the rule with a shared policy.
    #[must_use]
    pub fn with_policy(policy: Arc<Policy>) -> Self {
        Self {
            policy,
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn violation(&self, ctx: &FileContext, decl: &Declaration, ty: &ResolvedType) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(decl.position, decl.name.len()),
            format!(
                "constructor '{}' returns concrete type '{}'; return an abstraction (impl Trait or dyn Trait) instead",
                decl.name, ty.name
            ),
        )
        .with_suggestion(Suggestion::new(format!(
            "declare the result as `impl Trait` or `Box<dyn Trait>` for a trait that `{}` implements",
            ty.name
        )))
    }
}

impl Rule for ConstructorReturnsConcrete {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids constructors that return a concrete type"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &Unit) -> Vec<Violation> {
        let mut violations = Vec::new();

        for decl in declaration_sites(unit, self.policy.detector()) {
            if !self.policy.admits(&unit.path, &decl.name) {
                tracing::trace!("{} out of scope in {}", decl.name, unit.path.display());
                continue;
            }
            violations.extend(
                decl.results
                    .iter()
                    .filter(|ty| classify(*ty).is_concrete())
                    .map(|ty| self.violation(ctx, decl, ty)),
            );
        }

        violations
    }
}
