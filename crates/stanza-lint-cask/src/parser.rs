//! Cask block parser using Tree-sitter.

use stanza_lint_core::{BlockParser, ConfigBlock, ParseError, Span, Statement, Vocabulary};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use crate::vocabulary::CaskVocabulary;

/// Node kinds of an attached `do ... end` or `{ ... }` block.
const BLOCK_KINDS: &[&str] = &["do_block", "block"];

/// Node kinds wrapping the statements of a block.
const BODY_KINDS: &[&str] = &["body_statement", "block_body"];

/// Extracts `cask "token" do ... end` blocks from Ruby source.
pub struct CaskParser {
    language: Language,
    vocabulary: CaskVocabulary,
}

impl CaskParser {
    /// Creates a parser with the built-in vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_vocabulary(CaskVocabulary::new())
    }

    /// Creates a parser classifying statements with `vocabulary`.
    #[must_use]
    pub fn with_vocabulary(vocabulary: CaskVocabulary) -> Self {
        Self {
            language: tree_sitter_ruby::LANGUAGE.into(),
            vocabulary,
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Name of a receiver-less method call.
    fn method_name<'a>(node: &Node<'_>, src: &'a [u8]) -> Option<&'a str> {
        if node.kind() != "call" || node.child_by_field_name("receiver").is_some() {
            return None;
        }
        node.child_by_field_name("method")
            .map(|method| Self::text(&method, src))
    }

    /// Statement kind of a body node: the method of a call, a bare
    /// identifier, or the variable of an assignment like `arch = ...`.
    fn stanza_name<'a>(node: &Node<'_>, src: &'a [u8]) -> Option<&'a str> {
        match node.kind() {
            "call" => Self::method_name(node, src),
            "identifier" => Some(Self::text(node, src)),
            "assignment" => node
                .child_by_field_name("left")
                .filter(|left| left.kind() == "identifier")
                .map(|left| Self::text(&left, src)),
            _ => None,
        }
    }

    fn attached_block<'t>(node: &Node<'t>) -> Option<Node<'t>> {
        if node.kind() != "call" {
            return None;
        }
        node.child_by_field_name("block")
            .filter(|block| BLOCK_KINDS.contains(&block.kind()))
    }

    fn block_body<'t>(block: &Node<'t>) -> Node<'t> {
        if let Some(body) = block.child_by_field_name("body") {
            return body;
        }
        let mut cursor = block.walk();
        let body = block
            .named_children(&mut cursor)
            .find(|child| BODY_KINDS.contains(&child.kind()));
        body.unwrap_or(*block)
    }

    /// Last line (1-indexed) of `node`. A node ending at column 0 ends on
    /// the previous line.
    fn end_line(node: &Node<'_>) -> usize {
        let start = node.start_position();
        let end = node.end_position();
        if end.column == 0 && end.row > start.row {
            end.row
        } else {
            end.row + 1
        }
    }

    fn span(node: &Node<'_>) -> Span {
        Span::new(node.start_position().row + 1, Self::end_line(node))
    }

    /// Collects the stanzas of `body`. With `nested`, stanzas carrying a
    /// block get the stanzas of that block as their body.
    fn statements(&self, body: &Node<'_>, src: &[u8], nested: bool) -> Vec<Statement> {
        let mut statements: Vec<Statement> = Vec::new();
        let mut after_stanza = false;

        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "comment" | "block_parameters" => continue,
                "heredoc_body" => {
                    if let Some(last) = statements.last_mut().filter(|_| after_stanza) {
                        last.span = Span::new(last.span.first_line, Self::end_line(&child));
                    }
                    continue;
                }
                _ => {}
            }

            let statement = Self::stanza_name(&child, src)
                .and_then(|kind| self.vocabulary.statement(kind, Self::span(&child)));
            after_stanza = statement.is_some();

            let Some(mut statement) = statement else {
                debug!(
                    "Skipping non-stanza `{}` at line {}",
                    child.kind(),
                    child.start_position().row + 1
                );
                continue;
            };

            if nested {
                if let Some(block) = Self::attached_block(&child) {
                    let inner = self.statements(&Self::block_body(&block), src, false);
                    statement = statement.with_body(inner);
                }
            }

            statements.push(statement);
        }

        statements
    }

    fn first_error_line(node: &Node<'_>) -> usize {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        let mut cursor = node.walk();
        let child = node
            .children(&mut cursor)
            .find(|child| child.has_error() || child.is_missing());
        child.map_or(node.start_position().row + 1, |child| {
            Self::first_error_line(&child)
        })
    }
}

impl Default for CaskParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for CaskParser {
    fn language_id(&self) -> &'static str {
        "cask"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn vocabulary(&self) -> &dyn Vocabulary {
        &self.vocabulary
    }

    fn parse(&self, source: &str) -> Result<Vec<ConfigBlock>, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language {
                language: "ruby",
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(ParseError::Syntax {
                line: Self::first_error_line(&root),
            });
        }

        let mut blocks = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if Self::method_name(&node, src) != Some("cask") {
                continue;
            }
            let Some(block) = Self::attached_block(&node) else {
                continue;
            };

            let statements = self.statements(&Self::block_body(&block), src, true);
            debug!("Parsed cask block with {} stanzas", statements.len());
            blocks.push(ConfigBlock::new("cask", Self::span(&node), statements));
        }

        Ok(blocks)
    }
}
