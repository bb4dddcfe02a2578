//! Rule to forbid binding a constructor's concrete result without widening.
//!
//! # Rationale
//!
//! Even when a constructor legitimately returns a concrete type, the code
//! that calls it should hold the value behind an abstraction. Otherwise the
//! rest of the function depends on the implementation it was handed.
//!
//! A binding whose declared type is abstract (`let s: Box<dyn Store> = ...`)
//! is widened and passes. A constructor that already returns an abstraction
//! never triggers this rule.
//!
//! # Suppression
//!
//! - `// dip-lint: allow(direct-concrete-binding) reason="..."` comment

use dip_lint_core::scanner::{binding_sites, BindingCandidate};
use dip_lint_core::{
    classify, FileContext, Policy, ResolvedType, Rule, Severity, Shape, Suggestion, Unit,
    Violation,
};
use std::sync::Arc;
use tracing::trace;

/// Rule code for direct-concrete-binding.
pub const CODE: &str = "DIP002";

/// Rule name for direct-concrete-binding.
pub const NAME: &str = "direct-concrete-binding";

/// Reports bindings that keep a constructor's concrete result as-is.
#[derive(Debug, Clone)]
pub struct DirectConcreteBinding {
    policy: Arc<Policy>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for DirectConcreteBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectConcreteBinding {
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

    /// The concrete type the binding holds, if the candidate is a violation.
    ///
    /// That is the binding's own type when known, else the callee's first
    /// result.
    fn offending_result<'a>(
        &self,
        unit: &Unit,
        site: &BindingCandidate<'a>,
    ) -> Option<&'a ResolvedType> {
        let callee = site.callee;
        let result = callee.first_result()?;

        if !classify(result).is_concrete() || !self.policy.is_constructor(&callee.name) {
            return None;
        }
        if !self.policy.admits(&unit.path, &callee.name) {
            trace!("{} out of scope in {}", callee.name, unit.path.display());
            return None;
        }
        if !classify(site.target_ty).is_concrete() {
            trace!("'{}' widened to {}", site.target, site.target_ty.name);
            return None;
        }
        if site.target_ty.shape == Shape::Unresolved {
            Some(result)
        } else {
            Some(site.target_ty)
        }
    }
}

impl Rule for DirectConcreteBinding {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids binding a constructor's concrete result without widening it to an abstraction"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, unit: &Unit) -> Vec<Violation> {
        binding_sites(unit)
            .filter_map(|site| {
                let ty = self.offending_result(unit, &site)?;
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(site.binding.position, 0),
                        format!(
                            "'{}' binds concrete type '{}' returned by constructor '{}'; widen it to an abstraction instead",
                            site.target, ty.name, site.callee.name
                        ),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "annotate the binding, e.g. `let {}: Box<dyn Trait> = {}(..)`",
                        site.target, site.call.callee_path
                    ))),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_lint_core::frontend::lower_source;
    use dip_lint_core::Settings;
    use std::path::Path;

    fn check_with(settings: &Settings, path: &str, code: &str) -> Vec<Violation> {
        let unit = lower_source(path, code).expect("Failed to parse");
        let ctx = FileContext::new(Path::new(path), code, Path::new(""));
        let policy = Policy::from_settings(settings).expect("valid settings");
        DirectConcreteBinding::with_policy(Arc::new(policy)).check(&ctx, &unit)
    }

    fn check_code(code: &str) -> Vec<Violation> {
        check_with(&Settings::default(), "src/lib.rs", code)
    }

    const SERVICES: &str = r"
trait IService {}
struct ServiceA;
struct ServiceB;
impl IService for ServiceB {}
fn NewServiceA() -> ServiceA { ServiceA }
fn NewServiceB() -> Box<dyn IService> { Box::new(ServiceB) }
";

    #[test]
    fn test_detects_inferred_concrete_binding() {
        let code = format!("{SERVICES}fn run() {{\n    let a = NewServiceA();\n}}\n");
        let violations = check_code(&code);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!((violations[0].location.line, violations[0].location.column), (9, 5));
        insta::assert_snapshot!(
            violations[0].message,
            @"'a' binds concrete type 'ServiceA' returned by constructor 'NewServiceA'; widen it to an abstraction instead"
        );
    }

    #[test]
    fn test_abstract_results_never_fire() {
        let code = format!(
            "{SERVICES}fn run() {{\n    let b: Box<dyn IService> = NewServiceB();\n    let c = NewServiceB();\n}}\n"
        );
        assert!(check_code(&code).is_empty());
    }

    #[test]
    fn test_widened_binding_passes() {
        let code = r"
trait IService {}
struct ServiceA;
impl IService for ServiceA {}
fn NewServiceA() -> ServiceA { ServiceA }
fn run() {
    let a: Box<dyn IService> = Box::new(NewServiceA());
    let b: &dyn IService = &NewServiceA();
}
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_declared_types_decide_widening() {
        let code = format!(
            "{SERVICES}fn run(mut held: Box<dyn IService>) {{\n    held = NewServiceA();\n    let a: ServiceA = NewServiceA();\n}}\n"
        );
        let violations = check_code(&code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 10);
        assert!(violations[0].message.starts_with("'a'"));
    }

    #[test]
    fn test_assignment_and_tuple_slots() {
        let code = format!(
            "{SERVICES}fn run() {{\n    let mut s = NewServiceA();\n    s = NewServiceA();\n    let (x, _) = (NewServiceA(), NewServiceB());\n}}\n"
        );
        let violations = check_code(&code);
        let targets: Vec<_> = violations
            .iter()
            .map(|v| (v.location.line, v.message.split('\'').nth(1).unwrap_or_default()))
            .collect();
        assert_eq!(targets, vec![(9, "s"), (10, "s"), (11, "x")]);
    }

    #[test]
    fn test_external_and_non_constructor_calls_are_ignored() {
        let code = r"
struct Service;
fn build() -> Service { Service }
fn run() {
    let a = build();
    let b = String::new();
    let c = std::NewThing();
}
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_other_crates_never_resolve_to_local_constructors() {
        let code = r"
struct Client;
impl Client {
    fn NewClient() -> Client { Client }
}
fn NewClient() -> Client { Client }
fn run() {
    let a = reqwest::NewClient();
    let b = reqwest::Client::NewClient();
    let c = ::reqwest::NewClient();
    let d = Client::NewClient();
}
";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.starts_with("'d'"));
    }

    #[test]
    fn test_tuple_result_bound_whole() {
        let code = format!(
            "{SERVICES}fn NewPair() -> (ServiceA, ServiceB) {{ (ServiceA, ServiceB) }}
fn run() {{
    let pair = NewPair();
}}
"
        );
        let violations = check_code(&code);
        assert_eq!(violations.len(), 1);
        insta::assert_snapshot!(
            violations[0].message,
            @"'pair' binds concrete type '(ServiceA, ServiceB)' returned by constructor 'NewPair'; widen it to an abstraction instead"
        );
    }

    #[test]
    fn test_scope_uses_binding_path_and_callee_name() {
        let code = format!("{SERVICES}fn run() {{\n    let a = NewServiceA();\n}}\n");

        let include = Settings::new().include("pkg/core");
        assert!(check_with(&include, "pkg/other/x.rs", &code).is_empty());
        assert_eq!(check_with(&include, "pkg/core/x.rs", &code).len(), 1);

        let names = Settings::new().name_pattern("*Repo*");
        assert!(check_with(&names, "src/lib.rs", &code).is_empty());
    }

    #[test]
    fn test_is_idempotent() {
        let code = format!(
            "{SERVICES}fn run() {{\n    let a = NewServiceA();\n    let b = NewServiceA();\n}}\n"
        );
        let first = check_code(&code);
        assert_eq!(first.len(), 2);
        assert_eq!(first, check_code(&code));
    }
}
