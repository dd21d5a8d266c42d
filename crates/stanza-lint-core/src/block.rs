//! Configuration blocks and their traversal.
//!
//! A [`ConfigBlock`] holds the top-level statements of one block (for example
//! one `cask "foo" do ... end`). [`ConfigBlock::sequences`] yields the
//! top-level sequence first, then the inner sequence of every conditional
//! dispatcher that carries an executable block. Each sequence is checked
//! independently.

use thiserror::Error;
use tracing::debug;

use crate::statement::{GroupKey, Span, Statement};

/// Classifies statement kinds for a configuration language.
///
/// Implementations define which kinds are stanzas at all, which of them
/// cluster into one group, and which introduce condition-gated sub-blocks.
pub trait Vocabulary: Send + Sync {
    /// Returns the group of `kind`, or `None` if `kind` is not a stanza.
    fn group_of(&self, kind: &str) -> Option<GroupKey>;

    /// Returns true if `kind` introduces a condition-gated sub-block.
    fn is_conditional_dispatcher(&self, kind: &str) -> bool;

    /// Builds a statement for `kind`, or `None` if `kind` is not a stanza.
    fn statement(&self, kind: &str, span: Span) -> Option<Statement> {
        self.group_of(kind)
            .map(|group| Statement::new(kind, group, span))
    }
}

/// Errors produced by a [`BlockParser`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The parser produced no tree.
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("syntax error at line {line}")]
    Syntax {
        /// First line (1-indexed) with an error.
        line: usize,
    },
}

/// Turns source text into configuration blocks.
pub trait BlockParser: Send + Sync {
    /// Language identifier (e.g. `"cask"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles (e.g. `&["rb"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Vocabulary used to classify statements.
    fn vocabulary(&self) -> &dyn Vocabulary;

    /// Parses `source` into its configuration blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the source cannot be parsed.
    fn parse(&self, source: &str) -> Result<Vec<ConfigBlock>, ParseError>;
}

/// An ordered run of statements checked as one unit.
#[derive(Debug, Clone, Copy)]
pub struct StatementSequence<'a> {
    /// Origin of the sequence.
    pub scope: SequenceScope<'a>,
    /// Statements in source order.
    pub statements: &'a [Statement],
}

/// Origin of a [`StatementSequence`], borrowing the dispatcher statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceScope<'a> {
    /// Direct contents of the block.
    TopLevel,
    /// Body of a conditional dispatcher.
    Conditional(&'a Statement),
}

/// One configuration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    /// Block header name (e.g. `cask`).
    pub name: String,
    /// Lines occupied by the block.
    pub span: Span,
    statements: Vec<Statement>,
}

impl ConfigBlock {
    /// Creates a block from its top-level statements.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span, statements: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            span,
            statements,
        }
    }

    /// Returns the top-level statements in source order.
    #[must_use]
    pub fn toplevel_statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Returns the top-level statements that are conditional dispatchers.
    pub fn conditional_dispatchers<'a>(
        &'a self,
        vocabulary: &'a dyn Vocabulary,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements
            .iter()
            .filter(move |s| vocabulary.is_conditional_dispatcher(&s.kind))
    }

    /// Returns every sequence to check: top-level first, then each
    /// dispatcher body in source order.
    ///
    /// Dispatchers without an executable block are skipped.
    #[must_use]
    pub fn sequences<'a>(&'a self, vocabulary: &'a dyn Vocabulary) -> Vec<StatementSequence<'a>> {
        let mut sequences = vec![StatementSequence {
            scope: SequenceScope::TopLevel,
            statements: &self.statements,
        }];

        for dispatcher in self.conditional_dispatchers(vocabulary) {
            match &dispatcher.body {
                Some(body) => sequences.push(StatementSequence {
                    scope: SequenceScope::Conditional(dispatcher),
                    statements: body,
                }),
                None => debug!(
                    "Skipping {} at line {}: no executable block",
                    dispatcher.kind, dispatcher.span.first_line
                ),
            }
        }

        sequences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Letters;

    impl Vocabulary for Letters {
        fn group_of(&self, kind: &str) -> Option<GroupKey> {
            match kind {
                "a" | "b" => Some(GroupKey::new(0)),
                "c" => Some(GroupKey::new(1)),
                "on_x" => Some(GroupKey::new(2)),
                _ => None,
            }
        }

        fn is_conditional_dispatcher(&self, kind: &str) -> bool {
            kind == "on_x"
        }
    }

    fn stmt(kind: &str, line: usize) -> Statement {
        Letters.statement(kind, Span::line(line)).unwrap()
    }

    #[test]
    fn unknown_kinds_are_not_stanzas() {
        assert!(Letters.statement("zzz", Span::line(1)).is_none());
    }

    #[test]
    fn sequences_start_with_toplevel() {
        let block = ConfigBlock::new("cask", Span::new(1, 4), vec![stmt("a", 2), stmt("c", 3)]);
        let seqs = block.sequences(&Letters);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].scope, SequenceScope::TopLevel);
        assert_eq!(seqs[0].statements.len(), 2);
    }

    #[test]
    fn dispatcher_body_becomes_own_sequence() {
        let on_x = Letters
            .statement("on_x", Span::new(3, 6))
            .unwrap()
            .with_body(vec![stmt("a", 4), stmt("c", 5)]);
        let block = ConfigBlock::new("cask", Span::new(1, 7), vec![stmt("a", 2), on_x]);

        let seqs = block.sequences(&Letters);
        assert_eq!(seqs.len(), 2);
        match seqs[1].scope {
            SequenceScope::Conditional(d) => assert_eq!(d.kind, "on_x"),
            SequenceScope::TopLevel => panic!("expected conditional scope"),
        }
        assert_eq!(seqs[1].statements[0].span.first_line, 4);
    }

    #[test]
    fn dispatcher_without_block_is_skipped() {
        let block = ConfigBlock::new("cask", Span::new(1, 4), vec![stmt("on_x", 2)]);
        assert_eq!(block.sequences(&Letters).len(), 1);
    }

    #[test]
    fn non_dispatcher_bodies_are_ignored() {
        let a = stmt("a", 2).with_body(vec![stmt("c", 3)]);
        let block = ConfigBlock::new("cask", Span::new(1, 5), vec![a]);
        assert_eq!(block.sequences(&Letters).len(), 1);
    }
}
