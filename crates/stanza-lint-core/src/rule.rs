//! Rule trait for defining lint rules.

use crate::block::ConfigBlock;
use crate::context::FileContext;
use crate::types::{Severity, Violation};

/// A per-file lint rule over parsed configuration blocks.
///
/// # Example
///
/// ```ignore
/// use stanza_lint_core::{ConfigBlock, FileContext, Rule, Violation};
///
/// pub struct NoEmptyBlocks;
///
/// impl Rule for NoEmptyBlocks {
///     fn name(&self) -> &'static str { "no-empty-blocks" }
///     fn code(&self) -> &'static str { "SL900" }
///
///     fn check(&self, ctx: &FileContext, blocks: &[ConfigBlock]) -> Vec<Violation> {
///         // ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "stanza-grouping").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether violations from this rule carry automatic fixes.
    fn is_fixable(&self) -> bool {
        false
    }

    /// Checks the blocks of a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, blocks: &[ConfigBlock]) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Vocabulary;
    use crate::statement::GroupKey;
    use crate::types::Location;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &FileContext, blocks: &[ConfigBlock]) -> Vec<Violation> {
            blocks
                .iter()
                .map(|b| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        Location::new(ctx.relative_path.clone(), b.span.first_line, 1),
                        "Test violation",
                    )
                })
                .collect()
        }
    }

    struct NoStanzas;

    impl Vocabulary for NoStanzas {
        fn group_of(&self, _kind: &str) -> Option<GroupKey> {
            None
        }
        fn is_conditional_dispatcher(&self, _kind: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(!rule.is_fixable());

        let ctx = FileContext::new(Path::new("a.rb"), "", Path::new("."), &NoStanzas);
        let block = ConfigBlock::new("cask", crate::Span::new(3, 5), Vec::new());
        let v = rule.check(&ctx, &[block]);
        assert_eq!(v[0].location.line, 3);
    }
}
