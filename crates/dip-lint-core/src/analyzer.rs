//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::frontend::{self, ProgramIndex};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Severity, Suggestion, Violation};
use crate::utils::{check_allow_with_reason, to_slash, AllowCheck};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing Rust source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Error walking the source tree.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let exclude = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

/// A source file read from disk, before parsing.
struct Source {
    path: PathBuf,
    content: String,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let sources = files
            .into_iter()
            .map(|path| {
                let content = std::fs::read_to_string(&path)?;
                Ok(Source { path, content })
            })
            .collect::<Result<Vec<_>, AnalyzerError>>()?;

        let result = self.run(&sources)?;
        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );
        Ok(result)
    }

    /// Analyzes in-memory sources as if they were files under the root.
    ///
    /// Relative paths are taken relative to the root. Every source is part
    /// of the same program, so calls resolve across them.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse while
    /// `fail_on_parse_error` is set.
    pub fn check_sources<P, S>(
        &self,
        sources: impl IntoIterator<Item = (P, S)>,
    ) -> Result<LintResult, AnalyzerError>
    where
        P: AsRef<Path>,
        S: Into<String>,
    {
        let sources: Vec<Source> = sources
            .into_iter()
            .map(|(path, content)| Source {
                path: self.root.join(path),
                content: content.into(),
            })
            .collect();
        self.run(&sources)
    }

    fn run(&self, sources: &[Source]) -> Result<LintResult, AnalyzerError> {
        let mut parsed = Vec::with_capacity(sources.len());
        for source in sources {
            match syn::parse_file(&source.content) {
                Ok(ast) => parsed.push((source, ast)),
                Err(e) => {
                    warn!("Failed to parse {}: {}", source.path.display(), e);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse {
                            path: source.path.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        let files: Vec<(FileContext<'_>, syn::File)> = parsed
            .into_iter()
            .map(|(source, ast)| {
                let ctx = FileContext::new(&source.path, &source.content, &self.root);
                (ctx, ast)
            })
            .collect();
        let index = ProgramIndex::build(
            files
                .iter()
                .map(|(ctx, ast)| (ctx.relative_path.as_path(), ast)),
        );

        let mut result = LintResult::new();
        for (ctx, ast) in &files {
            debug!("Analyzing: {}", ctx.path.display());
            let unit = frontend::lower(&index, to_slash(&ctx.relative_path), ast);

            for rule in &self.rules {
                if !self.config.is_rule_enabled(rule.name()) {
                    debug!("Skipping disabled rule: {}", rule.name());
                    continue;
                }
                let violations = rule.check(&ctx, &unit);
                result
                    .violations
                    .extend(self.finish(rule.as_ref(), &ctx, violations));
            }
            result.files_checked += 1;
        }

        result.sort();
        Ok(result)
    }

    /// Applies severity overrides and allow directives to a rule's output.
    fn finish(
        &self,
        rule: &dyn Rule,
        ctx: &FileContext,
        violations: Vec<Violation>,
    ) -> Vec<Violation> {
        let severity = self
            .config
            .rule_severity(rule.name())
            .unwrap_or_else(|| rule.default_severity());
        let reason_required = match self.config.rule_severity(rule.name()) {
            Some(overridden) => overridden == Severity::Error,
            None => rule.requires_allow_reason(),
        };

        violations
            .into_iter()
            .filter_map(|mut v| {
                v.severity = severity;
                match check_allow_with_reason(ctx.content, v.location.line, rule.name()) {
                    AllowCheck::Denied => Some(v),
                    AllowCheck::Allowed { reason: None } if reason_required => {
                        trace!("Allow without reason at {}", v.location.line);
                        Some(missing_reason(rule, v))
                    }
                    AllowCheck::Allowed { .. } => {
                        trace!("Allowed {} at line {}", rule.name(), v.location.line);
                        None
                    }
                }
            })
            .collect()
    }

    /// Discovers all Rust source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .require_git(false)
            .ignore(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern, either as an absolute
    /// path or relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let absolute = to_slash(path);
        let relative = path
            .strip_prefix(&self.root)
            .map_or_else(|_| absolute.clone(), to_slash);

        self.exclude
            .iter()
            .any(|pattern| pattern.matches(&absolute) || pattern.matches(&relative))
    }
}

fn missing_reason(rule: &dyn Rule, violation: Violation) -> Violation {
    Violation::new(
        rule.code(),
        rule.name(),
        Severity::Warning,
        violation.location,
        format!(
            "allow directive for '{}' needs a reason; the finding was: {}",
            rule.name(),
            violation.message
        ),
    )
    .with_suggestion(Suggestion::new(
        "add reason=\"...\" to the dip-lint: allow(...) comment",
    ))
}
