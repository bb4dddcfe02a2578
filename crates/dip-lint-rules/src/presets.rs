//! Rule sets built from dependency-inversion settings.

use crate::{ConstructorReturnsConcrete, DirectConcreteBinding};
use dip_lint_core::{ConfigError, Policy, RuleBox, Settings};
use std::sync::Arc;

/// Returns both DIP rules sharing one policy.
///
/// Includes:
/// - `constructor-returns-concrete` (DIP001) - constructor declares a concrete result
/// - `direct-concrete-binding` (DIP002) - binding keeps a constructor's concrete result
#[must_use]
pub fn dip_rules(policy: Arc<Policy>) -> Vec<RuleBox> {
    vec![
        Box::new(ConstructorReturnsConcrete::with_policy(Arc::clone(&policy))),
        Box::new(DirectConcreteBinding::with_policy(policy)),
    ]
}

/// Compiles `settings` once and returns both DIP rules.
///
/// # Errors
///
/// Returns an error if a name pattern or the constructor prefix is invalid.
pub fn rules_from_settings(settings: &Settings) -> Result<Vec<RuleBox>, ConfigError> {
    let policy = Policy::from_settings(settings)?;
    tracing::debug!(
        "Compiled DIP policy with constructor prefix '{}'",
        settings.effective_prefix()
    );
    Ok(dip_rules(Arc::new(policy)))
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    dip_rules(Arc::new(Policy::default()))
}
