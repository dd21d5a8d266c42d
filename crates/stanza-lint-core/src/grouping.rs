//! Stanza grouping detector.
//!
//! Walks a statement sequence pairwise. For each adjacent pair the grouping
//! predicate and the blankness of the line right after the first statement
//! decide the outcome:
//!
//! | same group | blank after | outcome            |
//! |------------|-------------|--------------------|
//! | no         | no          | `MissingSeparator` |
//! | yes        | yes         | `ExtraSeparator`   |
//! | no         | yes         | ok                 |
//! | yes        | no          | ok                 |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::block::{ConfigBlock, SequenceScope, Vocabulary};
use crate::source::{SourceError, SourceText};
use crate::statement::{Span, Statement};

/// Message for a missing blank line between groups.
pub const MISSING_LINE_MSG: &str = "stanza groups should be separated by a single empty line";

/// Message for a blank line inside a group.
pub const EXTRA_LINE_MSG: &str = "stanzas within the same group should have no lines between them";

/// Kind of spacing fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpacingKind {
    /// Two groups touch without a blank line.
    MissingSeparator,
    /// A blank line splits one group.
    ExtraSeparator,
}

impl SpacingKind {
    /// Returns the diagnostic message.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingSeparator => MISSING_LINE_MSG,
            Self::ExtraSeparator => EXTRA_LINE_MSG,
        }
    }

    /// Returns the line operation that corrects the fault.
    #[must_use]
    pub fn line_op(self) -> LineOp {
        match self {
            Self::MissingSeparator => LineOp::Insert,
            Self::ExtraSeparator => LineOp::Remove,
        }
    }
}

/// Classifies one adjacent pair.
#[must_use]
pub fn classify(grouped: bool, blank: bool) -> Option<SpacingKind> {
    match (grouped, blank) {
        (false, false) => Some(SpacingKind::MissingSeparator),
        (true, true) => Some(SpacingKind::ExtraSeparator),
        (false, true) | (true, false) => None,
    }
}

/// Planned operation on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOp {
    /// Insert a blank line before the anchor line.
    Insert,
    /// Remove the anchor line.
    Remove,
}

/// Outcome of registering a line operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// First operation for this line.
    New,
    /// Same operation already planned.
    Duplicate,
    /// A different operation is already planned.
    Conflict(LineOp),
}

/// Anchor line to operation registry for one check invocation.
#[derive(Debug, Default)]
pub struct LineOps {
    ops: BTreeMap<usize, LineOp>,
}

impl LineOps {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `op` for `anchor`. Existing plans are never overwritten.
    pub fn plan(&mut self, anchor: usize, op: LineOp) -> Plan {
        match self.ops.get(&anchor) {
            None => {
                self.ops.insert(anchor, op);
                Plan::New
            }
            Some(existing) if *existing == op => Plan::Duplicate,
            Some(existing) => Plan::Conflict(*existing),
        }
    }
}

/// Where a spacing violation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Top-level sequence of the block.
    TopLevel,
    /// Body of the dispatcher occupying `span`.
    Conditional {
        /// Dispatcher span.
        span: Span,
    },
}

impl From<SequenceScope<'_>> for Origin {
    fn from(scope: SequenceScope<'_>) -> Self {
        match scope {
            SequenceScope::TopLevel => Self::TopLevel,
            SequenceScope::Conditional(dispatcher) => Self::Conditional {
                span: dispatcher.span,
            },
        }
    }
}

/// A spacing fault between two adjacent statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingViolation {
    /// 0-based index of the line right after the first statement.
    pub anchor: usize,
    /// Fault kind.
    pub kind: SpacingKind,
    /// Span of the first statement of the pair.
    pub statement: Span,
    /// Sequence the pair belongs to.
    pub origin: Origin,
}

impl SpacingViolation {
    /// Returns the diagnostic message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Checks one statement sequence.
///
/// Sequences shorter than two produce nothing. Findings whose anchor already
/// has a plan in `ops` are dropped.
///
/// # Errors
///
/// Returns [`SourceError::OutOfRange`] if an anchor line is not addressable.
pub fn detect(
    statements: &[Statement],
    origin: Origin,
    source: &SourceText<'_>,
    ops: &mut LineOps,
) -> Result<Vec<SpacingViolation>, SourceError> {
    let mut found = Vec::new();

    for pair in statements.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let anchor = current.anchor_line();
        let grouped = current.same_group(next);
        let blank = source.is_blank(anchor)?;

        let Some(kind) = classify(grouped, blank) else {
            continue;
        };

        match ops.plan(anchor, kind.line_op()) {
            Plan::New => found.push(SpacingViolation {
                anchor,
                kind,
                statement: current.span,
                origin,
            }),
            Plan::Duplicate => debug!("Line {} already planned for {:?}", anchor + 1, kind),
            Plan::Conflict(existing) => warn!(
                "Conflicting plans for line {}: {:?} already planned, dropping {:?}",
                anchor + 1,
                existing,
                kind.line_op()
            ),
        }
    }

    Ok(found)
}

/// Checks every sequence of `block` with one shared registry.
///
/// A sequence whose anchors fall outside the source is logged and skipped.
#[must_use]
pub fn check_block(
    block: &ConfigBlock,
    vocabulary: &dyn Vocabulary,
    source: &SourceText<'_>,
) -> Vec<SpacingViolation> {
    let mut ops = LineOps::new();
    let mut violations = Vec::new();

    for sequence in block.sequences(vocabulary) {
        match detect(sequence.statements, sequence.scope.into(), source, &mut ops) {
            Ok(found) => violations.extend(found),
            Err(e) => warn!("Skipping sequence in `{}` block: {}", block.name, e),
        }
    }

    violations
}
