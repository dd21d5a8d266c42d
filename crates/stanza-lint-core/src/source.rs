//! Line-addressed view of source text.
//!
//! [`SourceText`] indexes a file once and answers the questions the spacing
//! checks ask: what is on line `n`, is it blank, and where does it start and
//! end in bytes. Line indices here are 0-based; [`Location`](crate::Location)
//! and [`Span`](crate::Span) use 1-based line numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when addressing lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The requested line does not exist.
    #[error("line index {index} is out of range (source has {line_count} lines)")]
    OutOfRange {
        /// Requested 0-based line index.
        index: usize,
        /// Number of lines in the source.
        line_count: usize,
    },
}

/// Line terminator used by a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Returns the terminator text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Detects the terminator from the first line break in `text`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => Self::CrLf,
            _ => Self::Lf,
        }
    }
}

/// Immutable, line-indexed source text.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    starts: Vec<usize>,
    line_ending: LineEnding,
}

impl<'a> SourceText<'a> {
    /// Indexes `text` by line.
    ///
    /// A trailing terminator does not start a new line, so `"a\nb\n"` has two
    /// lines.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut starts = Vec::new();
        if !text.is_empty() {
            starts.push(0);
        }
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' && idx + 1 < text.len() {
                starts.push(idx + 1);
            }
        }

        Self {
            text,
            starts,
            line_ending: LineEnding::detect(text),
        }
    }

    /// Returns the full text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Returns the line terminator the file uses.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Returns the text of line `index` without its terminator.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfRange`] if the line does not exist.
    pub fn line(&self, index: usize) -> Result<&'a str, SourceError> {
        let start = self.line_start(index)?;
        let end = self.line_end(index)?;
        let raw = &self.text[start..end];
        let raw = raw.strip_suffix('\n').unwrap_or(raw);
        Ok(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// Returns whether line `index` is blank (empty after trimming).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfRange`] if the line does not exist.
    pub fn is_blank(&self, index: usize) -> Result<bool, SourceError> {
        self.line(index).map(|line| line.trim().is_empty())
    }

    /// Returns the byte offset where line `index` starts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfRange`] if the line does not exist.
    pub fn line_start(&self, index: usize) -> Result<usize, SourceError> {
        self.starts
            .get(index)
            .copied()
            .ok_or(SourceError::OutOfRange {
                index,
                line_count: self.line_count(),
            })
    }

    /// Returns the byte offset just past line `index`, terminator included.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::OutOfRange`] if the line does not exist.
    pub fn line_end(&self, index: usize) -> Result<usize, SourceError> {
        self.line_start(index)?;
        Ok(self
            .starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_does_not_add_line() {
        let src = SourceText::new("a\nb\n");
        assert_eq!(src.line_count(), 2);
        assert_eq!(src.line(1).unwrap(), "b");
    }

    #[test]
    fn empty_text_has_no_lines() {
        let src = SourceText::new("");
        assert_eq!(src.line_count(), 0);
        assert_eq!(
            src.is_blank(0),
            Err(SourceError::OutOfRange {
                index: 0,
                line_count: 0
            })
        );
    }

    #[test]
    fn blank_means_trimmed_empty() {
        let src = SourceText::new("x\n\n   \n\ty\n");
        assert!(!src.is_blank(0).unwrap());
        assert!(src.is_blank(1).unwrap());
        assert!(src.is_blank(2).unwrap());
        assert!(!src.is_blank(3).unwrap());
    }

    #[test]
    fn out_of_range_reports_line_count() {
        let src = SourceText::new("one\ntwo\n");
        let err = src.is_blank(2).unwrap_err();
        assert_eq!(err.to_string(), "line index 2 is out of range (source has 2 lines)");
    }

    #[test]
    fn crlf_lines_strip_carriage_return() {
        let src = SourceText::new("a\r\n\r\nb\r\n");
        assert_eq!(src.line_ending(), LineEnding::CrLf);
        assert_eq!(src.line(0).unwrap(), "a");
        assert!(src.is_blank(1).unwrap());
        assert_eq!(src.line_start(1).unwrap(), 3);
        assert_eq!(src.line_end(1).unwrap(), 5);
    }

    #[test]
    fn last_line_without_terminator() {
        let src = SourceText::new("a\nbc");
        assert_eq!(src.line(1).unwrap(), "bc");
        assert_eq!(src.line_end(1).unwrap(), 4);
    }
}
