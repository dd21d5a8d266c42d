//! Check command implementation.

use anyhow::{Context, Result};
use stanza_lint_cask::{CaskParser, CaskVocabulary};
use stanza_lint_core::{Analyzer, Config, RuleBox};
use stanza_lint_rules::configured_rules;
use std::path::Path;

use super::output::{self, FixSummary};
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Apply automatic fixes.
    pub fix: bool,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let analyzer = build_analyzer(path, options, config)?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let (result, fixes) = if options.fix {
        let report = analyzer.fix().context("Autofix failed")?;
        if report.edits_skipped > 0 {
            tracing::warn!(
                "{} overlapping edits were skipped; run again to apply them",
                report.edits_skipped
            );
        }
        let summary = FixSummary {
            files_fixed: report.files_fixed,
            edits_applied: report.edits_applied,
            edits_skipped: report.edits_skipped,
        };
        (report.remaining, Some(summary))
    } else {
        (analyzer.analyze().context("Analysis failed")?, None)
    };

    output::print(&result, fixes.as_ref(), options.format, analyzer.root())?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn build_analyzer(path: &Path, options: &CheckOptions, config: Config) -> Result<Analyzer> {
    let vocabulary =
        CaskVocabulary::new().with_extra_dispatchers(config.vocabulary.extra_dispatchers.clone());

    let rules = configured_rules(&config);
    let rules = match &options.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(rules, &names)
        }
        None => rules,
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .parser(CaskParser::with_vocabulary(vocabulary))
        .config(config);

    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }

    for rule in rules {
        builder = builder.rule_box(rule);
    }

    builder.build().context("Failed to build analyzer")
}

/// Keeps the rules selected by name or code, in `rules` order.
fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MESSY: &str = "cask \"foo\" do\n  version \"1\"\n\n  sha256 \"abc\"\n  url \"https://example.com\"\nend\n";

    #[test]
    fn filter_accepts_name_and_code() {
        let all = || configured_rules(&Config::default());
        assert_eq!(filter_rules(all(), &["stanza-grouping"]).len(), 1);
        assert_eq!(filter_rules(all(), &["SL001"]).len(), 1);
        assert_eq!(filter_rules(all(), &["SL001", "stanza-grouping"]).len(), 1);
        assert!(filter_rules(all(), &["no-such-rule"]).is_empty());
    }

    #[test]
    fn rule_filter_keeps_configured_options() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("foo.rb");
        std::fs::write(
            &file,
            "cask \"foo\" do\n  version \"1\" # stanza-lint: allow(stanza-grouping)\n  url \"x\"\nend\n",
        )
        .unwrap();

        let options = CheckOptions {
            rules: Some("stanza-grouping".to_string()),
            ..CheckOptions::default()
        };

        let analyzer = build_analyzer(&file, &options, Config::default()).unwrap();
        assert!(analyzer.analyze().unwrap().violations.is_empty());

        let config =
            Config::parse("[rules.stanza-grouping]\nallow_comments = false\n").unwrap();
        let analyzer = build_analyzer(&file, &options, config).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.line, 3);
    }

    #[test]
    fn analyzer_checks_and_fixes_directory() {
        let tmp = TempDir::new().unwrap();
        let casks = tmp.path().join("Casks");
        std::fs::create_dir(&casks).unwrap();
        std::fs::write(casks.join("foo.rb"), MESSY).unwrap();

        let options = CheckOptions::default();
        let analyzer = build_analyzer(&casks, &options, Config::default()).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 2);
        assert!(result.has_errors());

        let report = analyzer.fix().unwrap();
        assert_eq!(report.edits_applied, 2);
        assert!(report.remaining.violations.is_empty());
        assert_eq!(
            std::fs::read_to_string(casks.join("foo.rb")).unwrap(),
            "cask \"foo\" do\n  version \"1\"\n  sha256 \"abc\"\n\n  url \"https://example.com\"\nend\n"
        );
    }

    #[test]
    fn config_disables_rule() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("foo.rb");
        std::fs::write(&file, MESSY).unwrap();

        let config = Config::parse("[rules.stanza-grouping]\nenabled = false\n").unwrap();
        let analyzer = build_analyzer(&file, &CheckOptions::default(), config).unwrap();
        assert!(analyzer.analyze().unwrap().violations.is_empty());
    }

    #[test]
    fn extra_dispatchers_from_config_are_checked() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("foo.rb");
        std::fs::write(
            &file,
            "cask \"foo\" do\n  on_freebsd do\n    version \"1\"\n    url \"x\"\n  end\nend\n",
        )
        .unwrap();

        let config = Config::parse("[vocabulary]\nextra_dispatchers = [\"on_freebsd\"]\n").unwrap();
        let analyzer = build_analyzer(&file, &CheckOptions::default(), config).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.line, 4);
    }
}
