//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # stanza-lint: allow(stanza-grouping) reason="upstream layout"
//! ```
//!
//! A directive applies to the line it sits on (as a trailing comment) and to
//! the line right below it.

use std::collections::HashSet;

use crate::source::SourceText;

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
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks `line` (1-indexed) and the line above it for an allowance comment
/// naming `rule_name` (or `all`).
#[must_use]
pub fn check_allow_with_reason(source: &SourceText<'_>, line: usize, rule_name: &str) -> AllowCheck {
    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 {
            continue;
        }
        let Ok(text) = source.line(check_line - 1) else {
            continue;
        };
        if let Some(directive) = parse_allow_directive(text) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line with a `#` comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let marker = line.find("stanza-lint:")?;
    if !line[..marker].trim_end().ends_with('#') {
        return None;
    }

    let directive = line[marker + "stanza-lint:".len()..].trim();
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
