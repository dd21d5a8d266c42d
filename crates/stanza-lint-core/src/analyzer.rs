//! Core analyzer for orchestrating lint execution and autofix.

use crate::block::{BlockParser, ParseError};
use crate::config::Config;
use crate::context::FileContext;
use crate::fixes::{apply_edits, FixError, FixOutcome};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the directory tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        source: ParseError,
    },

    /// Error applying fixes to a source file.
    #[error("Fix error in {path}: {source}")]
    Fix {
        /// Path to the file being fixed.
        path: PathBuf,
        /// Underlying fix error.
        source: FixError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// No parser was registered.
    #[error("No block parser configured")]
    MissingParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn BlockParser>>,
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

    /// Sets the root directory (or single file) to analyze.
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

    /// Sets the block parser.
    #[must_use]
    pub fn parser<P: BlockParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
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
    /// Returns an error if no parser was set, an exclude pattern is invalid,
    /// or the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;

        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        let exclude = exclude_patterns
            .into_iter()
            .map(|p| glob::Pattern::new(&p).map(|compiled| (p, compiled)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            parser,
            exclude,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Summary of an autofix run.
#[derive(Debug, Default)]
pub struct FixReport {
    /// Files whose content changed.
    pub files_fixed: usize,
    /// Edits applied across all files.
    pub edits_applied: usize,
    /// Edits dropped because they overlapped another edit.
    pub edits_skipped: usize,
    /// Violations left after fixing.
    pub remaining: LintResult,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    parser: Box<dyn BlockParser>,
    exclude: Vec<(String, glob::Pattern)>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let content = std::fs::read_to_string(file_path)?;
            if let Some(violations) = self.check_tolerant(file_path, &content)? {
                result.violations.extend(violations);
                result.files_checked += 1;
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Applies every automatic fix of one pass to each file and writes the
    /// changed files back.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery, reading, parsing (when strict),
    /// applying or writing fails.
    pub fn fix(&self) -> Result<FixReport, AnalyzerError> {
        info!("Starting autofix at {:?}", self.root);

        let mut report = FixReport::default();

        for file_path in &self.discover_files()? {
            let content = std::fs::read_to_string(file_path)?;
            let Some(violations) = self.check_tolerant(file_path, &content)? else {
                continue;
            };

            let (outcome, remaining) = self.fix_violations(file_path, &content, &violations)?;
            if outcome.text != content {
                std::fs::write(file_path, &outcome.text)?;
                report.files_fixed += 1;
                debug!("Fixed {} ({} edits)", file_path.display(), outcome.applied);
            }

            report.edits_applied += outcome.applied;
            report.edits_skipped += outcome.skipped;
            report.remaining.violations.extend(remaining);
            report.remaining.files_checked += 1;
        }

        report.remaining.sort();

        info!(
            "Autofix complete: {} edits in {} files, {} violations remain",
            report.edits_applied,
            report.files_fixed,
            report.remaining.violations.len()
        );

        Ok(report)
    }

    /// Checks one file's content.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the content fails to parse.
    pub fn check_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let blocks = self
            .parser
            .parse(content)
            .map_err(|source| AnalyzerError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let ctx = FileContext::new(path, content, self.context_root(), self.parser.vocabulary());
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx, &blocks);
            let rule_violations = self.apply_severity_override(rule.name(), rule_violations);
            violations.extend(rule_violations);
        }

        Ok(violations)
    }

    /// Applies one pass of fixes to `content` and re-checks the result.
    ///
    /// Returns the fix outcome and the violations left in the fixed text.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or applying edits fails.
    pub fn fix_source(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<(FixOutcome, Vec<Violation>), AnalyzerError> {
        let violations = self.check_source(path, content)?;
        self.fix_violations(path, content, &violations)
    }

    fn fix_violations(
        &self,
        path: &Path,
        content: &str,
        violations: &[Violation],
    ) -> Result<(FixOutcome, Vec<Violation>), AnalyzerError> {
        let edits = violations
            .iter()
            .filter_map(Violation::replacement)
            .map(crate::types::Replacement::to_edit)
            .collect::<Vec<_>>();

        if edits.is_empty() {
            let outcome = FixOutcome {
                text: content.to_owned(),
                applied: 0,
                skipped: 0,
            };
            return Ok((outcome, violations.to_vec()));
        }

        let outcome = apply_edits(content, edits).map_err(|source| AnalyzerError::Fix {
            path: path.to_path_buf(),
            source,
        })?;
        let remaining = self.check_source(path, &outcome.text)?;

        Ok((outcome, remaining))
    }

    /// Checks a file, logging and skipping parse failures unless strict.
    fn check_tolerant(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<Option<Vec<Violation>>, AnalyzerError> {
        match self.check_source(path, content) {
            Ok(violations) => Ok(Some(violations)),
            Err(AnalyzerError::Parse { path, source }) => {
                warn!("Failed to parse {}: {}", path.display(), source);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Parse { path, source });
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Directory that reported paths are relative to.
    fn context_root(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        }
    }

    /// Discovers all source files the parser handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let extensions = self.parser.extensions();
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder.git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e));
            if !handled {
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

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.exclude.iter().any(|(raw, pattern)| {
            if pattern.matches(&path_str) {
                return true;
            }

            // Also check as substring for patterns like "**/vendor/**"
            let normalized = raw.replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ConfigBlock, Vocabulary};
    use crate::edits::plan_edit;
    use crate::grouping::check_block;
    use crate::statement::{GroupKey, Span};
    use crate::types::{Location, Replacement, Severity, Suggestion};

    /// Every non-blank line is a statement named by its first word.
    struct LineParser;

    impl Vocabulary for LineParser {
        fn group_of(&self, kind: &str) -> Option<GroupKey> {
            match kind {
                "a" | "b" => Some(GroupKey::new(0)),
                "c" => Some(GroupKey::new(1)),
                _ => None,
            }
        }

        fn is_conditional_dispatcher(&self, _kind: &str) -> bool {
            false
        }
    }

    impl BlockParser for LineParser {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn vocabulary(&self) -> &dyn Vocabulary {
            self
        }

        fn parse(&self, source: &str) -> Result<Vec<ConfigBlock>, ParseError> {
            let mut statements = Vec::new();
            for (idx, line) in source.lines().enumerate() {
                let Some(kind) = line.split_whitespace().next() else {
                    continue;
                };
                if kind == "!" {
                    return Err(ParseError::Syntax { line: idx + 1 });
                }
                if let Some(s) = self.statement(kind, Span::line(idx + 1)) {
                    statements.push(s);
                }
            }
            let last = source.lines().count().max(1);
            Ok(vec![ConfigBlock::new("lines", Span::new(1, last), statements)])
        }
    }

    struct Spacing;

    impl Rule for Spacing {
        fn name(&self) -> &'static str {
            "spacing"
        }

        fn code(&self) -> &'static str {
            "T001"
        }

        fn check(&self, ctx: &FileContext, blocks: &[ConfigBlock]) -> Vec<Violation> {
            blocks
                .iter()
                .flat_map(|b| check_block(b, ctx.vocabulary, &ctx.source))
                .filter_map(|v| {
                    let planned = plan_edit(&v, &ctx.source).ok()?;
                    let loc = Location::new(ctx.relative_path.clone(), planned.line, 1)
                        .with_span(planned.offset, planned.length);
                    let fix = Location::new(ctx.relative_path.clone(), planned.line, 1).with_span(
                        planned.edit.start,
                        planned.edit.end - planned.edit.start,
                    );
                    Some(
                        Violation::new(self.code(), self.name(), Severity::Error, loc, v.message())
                            .with_suggestion(Suggestion::with_fix(
                                "fix spacing",
                                Replacement::new(fix, planned.edit.replacement),
                            )),
                    )
                })
                .collect()
        }
    }

    fn tempdir() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("stanza-lint")
            .tempdir()
            .unwrap()
    }

    fn analyzer(root: &Path) -> Analyzer {
        Analyzer::builder()
            .root(root)
            .parser(LineParser)
            .rule(Spacing)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn build_requires_parser() {
        let err = Analyzer::builder().root(".").build().err();
        assert!(matches!(err, Some(AnalyzerError::MissingParser)));
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let err = Analyzer::builder()
            .root(".")
            .parser(LineParser)
            .exclude("[")
            .build()
            .err();
        assert!(matches!(err, Some(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .parser(LineParser)
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/vendor/cask.txt")));
        assert!(!analyzer.should_exclude(Path::new("/foo/Casks/cask.txt")));
    }

    #[test]
    fn check_source_reports_relative_violations() {
        let analyzer = analyzer(Path::new("/repo"));
        let v = analyzer
            .check_source(Path::new("/repo/x.txt"), "a\nc\n")
            .unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location.file, PathBuf::from("x.txt"));
        assert_eq!(v[0].location.line, 2);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let config = Config::parse("[rules.spacing]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/repo")
            .parser(LineParser)
            .rule(Spacing)
            .config(config)
            .build()
            .unwrap();
        assert!(analyzer
            .check_source(Path::new("/repo/x.txt"), "a\nc\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn severity_override_applies() {
        let config = Config::parse("[rules.spacing]\nseverity = \"info\"\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/repo")
            .parser(LineParser)
            .rule(Spacing)
            .config(config)
            .build()
            .unwrap();
        let v = analyzer
            .check_source(Path::new("/repo/x.txt"), "a\nc\n")
            .unwrap();
        assert_eq!(v[0].severity, Severity::Info);
    }

    #[test]
    fn fix_source_converges_in_one_pass() {
        let analyzer = analyzer(Path::new("/repo"));
        let (outcome, remaining) = analyzer
            .fix_source(Path::new("/repo/x.txt"), "a\nc\n\nb\nc\n")
            .unwrap();
        assert_eq!(outcome.text, "a\n\nc\n\nb\n\nc\n");
        assert_eq!(outcome.applied, 2);
        assert!(remaining.is_empty());
    }

    #[test]
    fn analyze_and_fix_directory() {
        let tmp = tempdir();
        std::fs::write(tmp.path().join("bad.txt"), "a\nc\n").unwrap();
        std::fs::write(tmp.path().join("good.txt"), "a\nb\n\nc\n").unwrap();
        std::fs::write(tmp.path().join("skip.md"), "a\nc\n").unwrap();
        std::fs::write(tmp.path().join("broken.txt"), "!\n").unwrap();

        let analyzer = analyzer(tmp.path());
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("bad.txt"));

        let report = analyzer.fix().unwrap();
        assert_eq!(report.files_fixed, 1);
        assert_eq!(report.edits_applied, 1);
        assert!(report.remaining.violations.is_empty());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("bad.txt")).unwrap(),
            "a\n\nc\n"
        );
    }

    #[test]
    fn strict_mode_fails_on_parse_error() {
        let tmp = tempdir();
        std::fs::write(tmp.path().join("broken.txt"), "!\n").unwrap();
        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .fail_on_parse_error(true)
            .build()
            .unwrap();
        assert!(matches!(
            analyzer.analyze(),
            Err(AnalyzerError::Parse { .. })
        ));
    }

    #[test]
    fn single_file_root() {
        let tmp = tempdir();
        let file = tmp.path().join("one.txt");
        std::fs::write(&file, "a\nc\n").unwrap();
        let result = analyzer(&file).analyze().unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("one.txt"));
    }
}
