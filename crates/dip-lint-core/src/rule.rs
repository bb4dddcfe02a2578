//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::model::Unit;
use crate::types::{Severity, Violation};

/// A per-file lint rule over a lowered [`Unit`].
///
/// Rules are pure: the same context and unit always yield the same
/// violations, in the same order.
///
/// # Example
///
/// ```ignore
/// use dip_lint_core::{FileContext, Rule, Unit, Violation};
///
/// pub struct NoConstructors;
///
/// impl Rule for NoConstructors {
///     fn name(&self) -> &'static str { "no-constructors" }
///     fn code(&self) -> &'static str { "DIP900" }
///
///     fn check(&self, ctx: &FileContext, unit: &Unit) -> Vec<Violation> {
///         unit.declarations.iter().map(|d| /* ... */).collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "constructor-returns-concrete").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "DIP001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single unit and returns any violations found.
    fn check(&self, ctx: &FileContext, unit: &Unit) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
