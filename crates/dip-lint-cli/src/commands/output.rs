//! Shared output formatting for lint results.

use anyhow::Result;
use dip_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::fmt::Write;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analysis root; pretty output reads sources relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, _) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{summary_color}{}\x1b[0m", render_summary(result));
}

fn render_summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    )
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn render_compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .fold(String::new(), |mut out, violation| {
            let _ = writeln!(out, "{violation}");
            out
        })
}

fn print_pretty(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        eprintln!("{:?}", pretty_report(violation, root));
    }
    print_summary(result);
}

/// Builds a graphical report, attaching the source file when it can be read.
fn pretty_report(violation: &Violation, root: &Path) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    let file = &violation.location.file;
    match std::fs::read_to_string(root.join(file)) {
        Ok(content) => {
            report.with_source_code(NamedSource::new(file.display().to_string(), content))
        }
        Err(e) => {
            tracing::debug!("No source for {}: {}", file.display(), e);
            report
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dip_lint_core::{Location, Suggestion};
    use std::path::PathBuf;

    fn sample() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations = vec![
            Violation::new(
                "DIP002",
                "direct-concrete-binding",
                Severity::Error,
                Location::new(PathBuf::from("src/app.rs"), 4, 5),
                "'service' binds concrete type 'Service' returned by constructor 'NewService'; widen it to an abstraction instead",
            ),
            Violation::new(
                "DIP001",
                "constructor-returns-concrete",
                Severity::Warning,
                Location::new(PathBuf::from("src/example.rs"), 13, 8),
                "constructor 'NewService' returns concrete type 'Service'; return an abstraction (impl Trait or dyn Trait) instead",
            )
            .with_suggestion(Suggestion::new("declare the result as `impl Trait`")),
        ];
        result
    }

    #[test]
    fn compact_output() {
        insta::assert_snapshot!(render_compact(&sample()), @r"
        src/app.rs:4:5: error [DIP002] 'service' binds concrete type 'Service' returned by constructor 'NewService'; widen it to an abstraction instead
        src/example.rs:13:8: warning [DIP001] constructor 'NewService' returns concrete type 'Service'; return an abstraction (impl Trait or dyn Trait) instead
        ");
    }

    #[test]
    fn summary_counts_severities() {
        assert_eq!(
            render_summary(&sample()),
            "Found 1 error(s), 1 warning(s), 0 info(s) in 2 file(s)"
        );
    }

    #[test]
    fn json_output_shape() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(value["files_checked"], 2);
        assert_eq!(value["violations"][0]["code"], "DIP002");
        assert_eq!(value["violations"][1]["severity"], "warning");
        assert_eq!(value["violations"][1]["location"]["line"], 13);
    }

    #[test]
    fn pretty_report_without_source_still_renders() {
        let result = sample();
        let report = pretty_report(&result.violations[1], Path::new("/nonexistent"));
        assert!(report.to_string().contains("[DIP001]"));
    }
}
