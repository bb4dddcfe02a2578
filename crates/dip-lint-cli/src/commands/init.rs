//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "dip-lint.toml";

const DEFAULT_CONFIG: &str = r#"# dip-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

[dip]
# Only check files under these path prefixes (empty: everything)
include = []

# Skip files under these path prefixes
exclude = []

# Only check constructors whose name contains one of these substrings,
# or matches one of these globs (case-insensitive; empty: every constructor)
name_patterns = []

# Functions whose name starts with this prefix are constructors
constructor_prefix = "New"

# Each rule can be enabled/disabled and have its severity overridden

[rules.constructor-returns-concrete]
enabled = true
# severity = "warning"

[rules.direct-concrete-binding]
enabled = true
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_default(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to scope the checks");
    println!("  2. Run: dip-lint check");

    Ok(())
}

fn write_default(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
