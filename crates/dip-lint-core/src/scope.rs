//! Path and constructor-name scope filtering.
//!
//! A site is admitted when:
//! 1. `include` is empty, or the path starts with one of its prefixes;
//! 2. the path starts with none of the `exclude` prefixes;
//! 3. `name_patterns` is empty, or the name matches one of them.
//!
//! Include is checked first; an included path can still be excluded.

use crate::config::{ConfigError, Settings};
use crate::utils::paths::to_slash;
use glob::{MatchOptions, Pattern};
use std::path::Path;

const GLOB_META: &[char] = &['*', '?', '['];

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled constructor name pattern.
#[derive(Debug, Clone)]
enum NamePattern {
    /// Case-insensitive substring, stored lowercased.
    Substring(String),
    /// Case-insensitive shell glob over the whole name.
    Glob(Pattern),
}

impl NamePattern {
    fn compile(raw: &str) -> Result<Self, ConfigError> {
        if raw.contains(GLOB_META) {
            Pattern::new(raw)
                .map(Self::Glob)
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                })
        } else {
            Ok(Self::Substring(raw.to_lowercase()))
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Substring(needle) => name.to_lowercase().contains(needle.as_str()),
            Self::Glob(pattern) => pattern.matches_with(name, CASE_INSENSITIVE),
        }
    }
}

/// Decides whether a site is in scope for the rules.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    name_patterns: Vec<NamePattern>,
}

impl ScopeFilter {
    /// Compiles a filter from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a glob name pattern does not compile.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let name_patterns = settings
            .name_patterns
            .iter()
            .map(|raw| NamePattern::compile(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include: settings.include.clone(),
            exclude: settings.exclude.clone(),
            name_patterns,
        })
    }

    /// Returns true if the site at `path` (relative to the analysis root)
    /// for constructor `name` is in scope.
    #[must_use]
    pub fn admits(&self, path: &Path, name: &str) -> bool {
        self.admits_str(&to_slash(path), name)
    }

    /// Same as [`ScopeFilter::admits`] for an already `/`-separated path.
    #[must_use]
    pub fn admits_str(&self, path: &str, name: &str) -> bool {
        self.path_included(path) && !self.path_excluded(path) && self.name_matches(name)
    }

    fn path_included(&self, path: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|p| path.starts_with(p.as_str()))
    }

    fn path_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Returns true if `name` satisfies the configured name patterns.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name_patterns.is_empty() || self.name_patterns.iter().any(|p| p.matches(name))
    }
}
