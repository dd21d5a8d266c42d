//! Rule sets.

use crate::StanzaGrouping;
use stanza_lint_core::{Config, RuleBox};

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(StanzaGrouping::new())]
}

/// Returns all rules with their options taken from `config`.
///
/// Enablement and severity overrides are applied later by the analyzer.
#[must_use]
pub fn configured_rules(config: &Config) -> Vec<RuleBox> {
    let mut grouping = StanzaGrouping::new();
    if let Some(allow) = config
        .rule(crate::stanza_grouping::NAME)
        .and_then(|rule| rule.flag("allow_comments"))
    {
        grouping = grouping.allow_comments(allow);
    }

    vec![Box::new(grouping)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rules_have_unique_codes() {
        let rules = all_rules();
        let mut codes: Vec<_> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
    }

    #[test]
    fn every_rule_is_fixable() {
        assert!(all_rules().iter().all(|r| r.is_fixable()));
    }

    #[test]
    fn configured_rules_read_options() {
        let config =
            Config::parse("[rules.stanza-grouping]\nallow_comments = false\n").unwrap();
        let rules = configured_rules(&config);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "stanza-grouping");
    }

    #[test]
    fn configured_rules_without_section_match_all_rules() {
        let names = |rules: Vec<RuleBox>| rules.iter().map(|r| r.name()).collect::<Vec<_>>();
        assert_eq!(names(configured_rules(&Config::default())), names(all_rules()));
    }
}
