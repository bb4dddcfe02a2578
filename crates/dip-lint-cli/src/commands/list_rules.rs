//! List rules command implementation.

use dip_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<30} Description", "Code", "Name");
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<10} {:<30} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nBoth rules read the [dip] table of dip-lint.toml:");
    println!("  include / exclude     path prefixes, relative to the checked directory");
    println!("  name_patterns         substrings or globs a constructor name must match");
    println!("  constructor_prefix    prefix that marks a constructor (default: \"New\")");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  dip-lint check --rules constructor-returns-concrete");
    println!("  dip-lint check --rules DIP002");
}
