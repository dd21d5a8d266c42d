//! # stanza-lint-cask
//!
//! Cask frontend for stanza-lint.
//!
//! [`CaskParser`] parses Ruby cask definitions with Tree-sitter and turns the
//! body of every `cask "token" do ... end` block into stanza statements.
//! [`CaskVocabulary`] assigns each stanza to its group and marks the `on_*`
//! system blocks as conditional dispatchers.
//!
//! ## Usage
//!
//! ```ignore
//! use stanza_lint_cask::CaskParser;
//! use stanza_lint_core::Analyzer;
//! use stanza_lint_rules::StanzaGrouping;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Casks")
//!     .parser(CaskParser::new())
//!     .rule(StanzaGrouping::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod parser;
mod vocabulary;

pub use parser::CaskParser;
pub use vocabulary::{CaskVocabulary, ON_SYSTEM_GROUP, ON_SYSTEM_METHODS, STANZA_GROUPS};
