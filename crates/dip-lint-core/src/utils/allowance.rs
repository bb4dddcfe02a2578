//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // dip-lint: allow(constructor-returns-concrete) reason="value object"
//! ```
//!
//! A directive applies to the line it is on and the line below it.

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "dip-lint:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
struct AllowDirective {
    rules: HashSet<String>,
    reason: Option<String>,
}

/// Checks source code for allowance comments with reason.
///
/// Looks at `line` (1-indexed) and the line before it for:
/// ```text
/// // dip-lint: allow(rule1, rule2) reason="explanation"
/// ```
/// `all` allows every rule.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line, trailing comments included.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    // `//` may also appear earlier on the line, e.g. inside a URL literal.
    let directive = line.match_indices("//").find_map(|(start, _)| {
        line[start..]
            .trim_start_matches('/')
            .trim()
            .strip_prefix(DIRECTIVE_PREFIX)
    })?;
    let directive = directive.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// dip-lint: allow(constructor-returns-concrete)")
            .expect("directive");
        assert!(directive.rules.contains("constructor-returns-concrete"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive = parse_allow_directive(
            "// dip-lint: allow(direct-concrete-binding) reason=\"test double\"",
        )
        .expect("directive");
        assert!(directive.rules.contains("direct-concrete-binding"));
        assert_eq!(directive.reason.as_deref(), Some("test double"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive =
            parse_allow_directive("/// dip-lint: allow(rule1, rule2 , rule3)").expect("directive");
        assert_eq!(directive.rules.len(), 3);
        assert!(directive.rules.contains("rule2"));
    }

    #[test]
    fn test_trailing_comment_directive() {
        let directive =
            parse_allow_directive("    let svc = NewService(); // dip-lint: allow(all)")
                .expect("directive");
        assert!(directive.rules.contains("all"));
    }

    #[test]
    fn test_rejects_other_tools_and_empty_lists() {
        assert!(parse_allow_directive("// clippy: allow(foo)").is_none());
        assert!(parse_allow_directive("// dip-lint: allow()").is_none());
        assert!(parse_allow_directive("let x = 1;").is_none());
    }

    #[test]
    fn test_directive_after_url_literal() {
        let directive = parse_allow_directive(
            r#"    let c = NewClient("http://x"); // dip-lint: allow(all) reason="edge""#,
        )
        .expect("directive");
        assert!(directive.rules.contains("all"));
        assert_eq!(directive.reason.as_deref(), Some("edge"));
    }

    #[test]
    fn test_directive_applies_to_own_and_next_line() {
        let content = r"struct Service;
// dip-lint: allow(constructor-returns-concrete)
fn NewService() -> Service { Service }
";

        assert!(check_allow_with_reason(content, 3, "constructor-returns-concrete").is_allowed());
        assert!(check_allow_with_reason(content, 2, "constructor-returns-concrete").is_allowed());
        assert_eq!(
            check_allow_with_reason(content, 3, "direct-concrete-binding"),
            AllowCheck::Denied
        );
        assert_eq!(
            check_allow_with_reason(content, 1, "constructor-returns-concrete"),
            AllowCheck::Denied
        );
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content = r#"fn main() {
    // dip-lint: allow(all) reason="composition root"
    let svc = NewService();
}"#;

        let result = check_allow_with_reason(content, 3, "direct-concrete-binding");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("composition root"));
    }

    #[test]
    fn test_out_of_range_lines_are_denied() {
        assert_eq!(check_allow_with_reason("", 0, "all"), AllowCheck::Denied);
        assert_eq!(check_allow_with_reason("x", 9, "all"), AllowCheck::Denied);
    }
}
