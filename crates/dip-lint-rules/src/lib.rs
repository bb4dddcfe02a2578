//! # dip-lint-rules
//!
//! Dependency-inversion lint rules for dip-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DIP001 | `constructor-returns-concrete` | Constructors must return an abstraction |
//! | DIP002 | `direct-concrete-binding` | Bindings must widen a constructor's concrete result |
//!
//! Both rules read the same [`Policy`], compiled once from the `[dip]`
//! settings, and may fire for the same underlying constructor.
//!
//! ## Usage
//!
//! ```ignore
//! use dip_lint_core::{Analyzer, Settings};
//! use dip_lint_rules::rules_from_settings;
//!
//! let mut builder = Analyzer::builder().root("./src");
//! for rule in rules_from_settings(&Settings::default())? {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod constructor_returns_concrete;
mod direct_concrete_binding;
mod presets;

pub use constructor_returns_concrete::ConstructorReturnsConcrete;
pub use direct_concrete_binding::DirectConcreteBinding;
pub use presets::{all_rules, dip_rules, rules_from_settings};

/// Re-export core types for convenience.
pub use dip_lint_core::{Policy, Rule, Settings, Severity, Violation};
