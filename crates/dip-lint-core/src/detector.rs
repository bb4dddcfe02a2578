//! Constructor detection by naming convention.
//!
//! This is a heuristic: a function is treated as a constructor when its name
//! looks like one. Unconventional names produce false negatives and
//! conventional names on non-constructors produce false positives.

use crate::config::{ConfigError, DEFAULT_CONSTRUCTOR_PREFIX};

/// Decides whether a function name denotes a constructor.
pub trait ConstructorDetector: Send + Sync + std::fmt::Debug {
    /// Returns true if `name` is constructor-shaped.
    fn is_constructor(&self, name: &str) -> bool;
}

/// Names longer than the prefix that start with it (`NewService`, `new_client`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDetector {
    prefix: String,
}

impl PrefixDetector {
    /// Creates a detector for the given prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConstructorPrefix`] for an empty prefix.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ConfigError::EmptyConstructorPrefix);
        }
        Ok(Self { prefix })
    }

    /// The prefix this detector looks for.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixDetector {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CONSTRUCTOR_PREFIX.to_string(),
        }
    }
}

impl ConstructorDetector for PrefixDetector {
    fn is_constructor(&self, name: &str) -> bool {
        name.len() > self.prefix.len() && name.starts_with(&self.prefix)
    }
}
