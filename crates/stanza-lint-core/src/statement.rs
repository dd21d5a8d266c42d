//! Statement model: one stanza with its group identity and source span.

use serde::{Deserialize, Serialize};

/// Opaque group identity of a statement.
///
/// Only equality is meaningful. Keys are handed out by a
/// [`Vocabulary`](crate::Vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(u16);

impl GroupKey {
    /// Creates a key from a vocabulary-defined id.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn id(self) -> u16 {
        self.0
    }
}

/// Inclusive range of 1-indexed source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First line (1-indexed).
    pub first_line: usize,
    /// Last line (1-indexed).
    pub last_line: usize,
}

impl Span {
    /// Creates a span. `last_line` is clamped to be at least `first_line`.
    #[must_use]
    pub fn new(first_line: usize, last_line: usize) -> Self {
        Self {
            first_line,
            last_line: last_line.max(first_line),
        }
    }

    /// Creates a single-line span.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }
}

/// One declarative entry in a configuration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Stanza name (e.g. `version`, `on_linux`).
    pub kind: String,
    /// Group identity used for adjacency checks.
    pub group: GroupKey,
    /// Source lines occupied by the statement.
    pub span: Span,
    /// Statements of an attached executable block (`do ... end`), one level deep.
    pub body: Option<Vec<Statement>>,
}

impl Statement {
    /// Creates a statement without an attached block.
    #[must_use]
    pub fn new(kind: impl Into<String>, group: GroupKey, span: Span) -> Self {
        Self {
            kind: kind.into(),
            group,
            span,
            body: None,
        }
    }

    /// Attaches the statements of an executable block.
    #[must_use]
    pub fn with_body(mut self, body: Vec<Statement>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns true if `other` belongs to the same group as `self`.
    #[must_use]
    pub fn same_group(&self, other: &Statement) -> bool {
        self.group == other.group
    }

    /// 0-based index of the line right after this statement.
    ///
    /// Numerically this is the statement's 1-based last line.
    #[must_use]
    pub fn anchor_line(&self) -> usize {
        self.span.last_line
    }
}
