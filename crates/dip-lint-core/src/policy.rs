//! Compiled rule settings shared by every rule in a run.

use crate::config::{ConfigError, Settings};
use crate::detector::{ConstructorDetector, PrefixDetector};
use crate::scope::ScopeFilter;
use std::path::Path;
use std::sync::Arc;

/// Scope filter and constructor detector built once from [`Settings`].
#[derive(Debug, Clone)]
pub struct Policy {
    scope: ScopeFilter,
    detector: Arc<dyn ConstructorDetector>,
}

impl Policy {
    /// Compiles settings into a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a name pattern or the constructor prefix is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            scope: ScopeFilter::new(settings)?,
            detector: Arc::new(PrefixDetector::new(settings.effective_prefix())?),
        })
    }

    /// Replaces the constructor detector.
    #[must_use]
    pub fn with_detector(mut self, detector: impl ConstructorDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Whether `name` is constructor-shaped.
    #[must_use]
    pub fn is_constructor(&self, name: &str) -> bool {
        self.detector.is_constructor(name)
    }

    /// Whether the site at `path` for constructor `name` is in scope.
    #[must_use]
    pub fn admits(&self, path: &Path, name: &str) -> bool {
        self.scope.admits(path, name)
    }

    /// The constructor detector.
    #[must_use]
    pub fn detector(&self) -> &dyn ConstructorDetector {
        self.detector.as_ref()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            scope: ScopeFilter::default(),
            detector: Arc::new(PrefixDetector::default()),
        }
    }
}
