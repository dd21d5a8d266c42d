//! # stanza-lint-core
//!
//! Core framework for stanza spacing lints.
//!
//! A configuration block is a sequence of declarative statements
//! ("stanzas"). Stanzas of one group sit on consecutive lines; different
//! groups are separated by exactly one blank line. This crate provides:
//!
//! - [`Statement`], [`Span`] and [`GroupKey`] for the statement model
//! - [`Vocabulary`] and [`BlockParser`] as the seams to a language frontend
//! - [`ConfigBlock::sequences`] for block traversal
//! - [`grouping`] for the pairwise violation detector
//! - [`edits`] and [`fixes`] for planning and applying corrections
//! - [`Rule`], [`Analyzer`] and [`Violation`] for running lints over files
//!
//! ## Example
//!
//! ```ignore
//! use stanza_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Casks")
//!     .parser(MyParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod block;
mod config;
mod context;
pub mod edits;
pub mod fixes;
pub mod grouping;
mod rule;
mod source;
mod statement;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FixReport};
pub use block::{BlockParser, ConfigBlock, ParseError, SequenceScope, StatementSequence, Vocabulary};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig, VocabularyConfig};
pub use context::FileContext;
pub use rule::{Rule, RuleBox};
pub use source::{LineEnding, SourceError, SourceText};
pub use statement::{GroupKey, Span, Statement};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
