//! Rule enforcing blank-line separation between stanza groups.
//!
//! # Rationale
//!
//! Stanzas of one group read as a unit when they sit on consecutive lines,
//! and groups stand apart when exactly one empty line separates them.
//!
//! # Configuration
//!
//! - `allow_comments`: Honor allowance comments (default: true)
//!
//! # Suppression
//!
//! - `# stanza-lint: allow(stanza-grouping)` on the statement or right above it

use stanza_lint_core::edits::{plan_edit, PlannedEdit};
use stanza_lint_core::grouping::{check_block, SpacingKind, SpacingViolation};
use stanza_lint_core::utils::check_allow_with_reason;
use stanza_lint_core::{
    ConfigBlock, FileContext, Location, Replacement, Rule, Severity, Suggestion, Violation,
};
use tracing::{debug, warn};

/// Rule code for stanza-grouping.
pub const CODE: &str = "SL001";

/// Rule name for stanza-grouping.
pub const NAME: &str = "stanza-grouping";

/// Flags missing blank lines between groups and blank lines inside a group.
#[derive(Debug, Clone)]
pub struct StanzaGrouping {
    /// Honor allowance comments.
    pub allow_comments: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for StanzaGrouping {
    fn default() -> Self {
        Self::new()
    }
}

impl StanzaGrouping {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_comments: true,
            severity: Severity::Error,
        }
    }

    /// Sets whether allowance comments are honored.
    #[must_use]
    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_allowed(&self, ctx: &FileContext, found: &SpacingViolation, planned: &PlannedEdit) -> bool {
        if !self.allow_comments {
            return false;
        }

        [found.statement.first_line, planned.line]
            .into_iter()
            .map(|line| check_allow_with_reason(&ctx.source, line, NAME))
            .find(|check| check.is_allowed())
            .is_some_and(|check| {
                debug!(
                    "Allowed at {}:{} ({})",
                    ctx.relative_path.display(),
                    planned.line,
                    check.reason().unwrap_or("no reason")
                );
                true
            })
    }

    fn to_violation(&self, ctx: &FileContext, found: &SpacingViolation, planned: PlannedEdit) -> Violation {
        let location = Location::new(ctx.relative_path.clone(), planned.line, 1)
            .with_span(planned.offset, planned.length);

        let fix_location = Location::new(ctx.relative_path.clone(), planned.line, 1)
            .with_span(planned.edit.start, planned.edit.end - planned.edit.start);

        let help = match found.kind {
            SpacingKind::MissingSeparator => "Insert an empty line",
            SpacingKind::ExtraSeparator => "Remove the empty line",
        };

        Violation::new(CODE, NAME, self.severity, location, found.message()).with_suggestion(
            Suggestion::with_fix(help, Replacement::new(fix_location, planned.edit.replacement)),
        )
    }
}

impl Rule for StanzaGrouping {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Stanza groups are separated by one empty line; stanzas in a group are adjacent"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn is_fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, blocks: &[ConfigBlock]) -> Vec<Violation> {
        let mut violations = Vec::new();

        for block in blocks {
            for found in check_block(block, ctx.vocabulary, &ctx.source) {
                let planned = match plan_edit(&found, &ctx.source) {
                    Ok(planned) => planned,
                    Err(e) => {
                        warn!("Cannot plan fix in {}: {}", ctx.relative_path.display(), e);
                        continue;
                    }
                };

                if self.is_allowed(ctx, &found, &planned) {
                    continue;
                }

                violations.push(self.to_violation(ctx, &found, planned));
            }
        }

        violations
    }
}
