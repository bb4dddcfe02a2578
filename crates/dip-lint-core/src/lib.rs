//! # dip-lint-core
//!
//! Core engine for dependency-inversion linting based on `syn` AST analysis.
//!
//! This crate provides the program model and the building blocks the rules
//! are composed from:
//!
//! - [`frontend`] lowers Rust source into [`Unit`]s of a language-neutral model
//! - [`classify`] decides whether a resolved type is abstract or concrete
//! - [`ScopeFilter`] and [`ConstructorDetector`] restrict which sites are checked
//! - [`scanner`] yields the candidate sites of a unit
//! - [`Rule`] and [`Analyzer`] run rules over a whole source tree
//!
//! ## Example
//!
//! ```ignore
//! use dip_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod classify;
mod config;
mod context;
mod detector;
pub mod frontend;
pub mod model;
mod policy;
mod rule;
pub mod scanner;
mod scope;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use classify::{classify, classify_opt, TypeClass, TypeShape};
pub use config::{
    AnalyzerConfig, Config, ConfigError, RuleConfig, Settings, DEFAULT_CONSTRUCTOR_PREFIX,
};
pub use context::FileContext;
pub use detector::{ConstructorDetector, PrefixDetector};
pub use model::{
    BindingSite, CallSite, Declaration, Position, ResolvedType, Shape, Target, Unit, Value,
};
pub use policy::Policy;
pub use rule::{Rule, RuleBox};
pub use scope::ScopeFilter;
pub use types::{
    LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic, ViolationKind,
};
pub use utils::allowance::AllowCheck;
