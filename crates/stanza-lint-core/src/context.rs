//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::block::Vocabulary;
use crate::source::SourceText;

/// Context provided to per-file rules.
///
/// Bundles the file's text, its line index and the vocabulary of the parser
/// that produced the blocks being checked.
pub struct FileContext<'a> {
    /// Path to the file.
    pub path: &'a Path,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// File contents as a string.
    pub content: &'a str,
    /// Line-indexed view of `content`.
    pub source: SourceText<'a>,
    /// Vocabulary classifying the file's statements.
    pub vocabulary: &'a dyn Vocabulary,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        root: &Path,
        vocabulary: &'a dyn Vocabulary,
    ) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            content,
            source: SourceText::new(content),
            vocabulary,
        }
    }
}

impl std::fmt::Debug for FileContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContext")
            .field("path", &self.path)
            .field("relative_path", &self.relative_path)
            .field("lines", &self.source.line_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::GroupKey;

    struct Empty;

    impl Vocabulary for Empty {
        fn group_of(&self, _kind: &str) -> Option<GroupKey> {
            None
        }

        fn is_conditional_dispatcher(&self, _kind: &str) -> bool {
            false
        }
    }

    #[test]
    fn relative_path_strips_root() {
        let path = Path::new("/repo/Casks/f/foo.rb");
        let ctx = FileContext::new(path, "cask \"foo\" do\nend\n", Path::new("/repo"), &Empty);
        assert_eq!(ctx.relative_path, PathBuf::from("Casks/f/foo.rb"));
        assert_eq!(ctx.source.line_count(), 2);
    }

    #[test]
    fn unrelated_root_keeps_full_path() {
        let path = Path::new("/elsewhere/foo.rb");
        let ctx = FileContext::new(path, "", Path::new("/repo"), &Empty);
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/foo.rb"));
    }
}
