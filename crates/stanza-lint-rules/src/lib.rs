//! # stanza-lint-rules
//!
//! Built-in lint rules for stanza-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | SL001 | `stanza-grouping` | One empty line between stanza groups, none inside a group |
//!
//! ## Usage
//!
//! ```ignore
//! use stanza_lint_core::Analyzer;
//! use stanza_lint_rules::StanzaGrouping;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Casks")
//!     .parser(parser)
//!     .rule(StanzaGrouping::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;
mod stanza_grouping;

pub use presets::{all_rules, configured_rules};
pub use stanza_grouping::StanzaGrouping;

/// Re-export core types for convenience.
pub use stanza_lint_core::{Rule, Severity, Violation};
