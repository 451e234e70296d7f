//! Token definitions for template source text
//!
//! This module defines the token types produced by the template lexer.
//! A token is an immutable value classifying one stretch of source text:
//! literal text, a variable expression, a block tag, or a comment.
//! Tokens derive serde Serialize so token streams can be dumped as JSON
//! by tooling and tests.

use serde::Serialize;
use std::fmt;

/// The four lexical classes of template source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Literal text outside any delimiter pair, passed through verbatim
    Text,
    /// A `{{ ... }}` variable expression
    Variable,
    /// A `{% ... %}` block tag
    Block,
    /// A `{# ... #}` comment
    Comment,
}

/// A classified lexical unit of template source
///
/// `content` holds the literal text for `Text` tokens, or the trimmed
/// text between delimiters for the other kinds. `line` is the 1-based
/// source line on which the token starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            content: content.into(),
            line,
        }
    }

    /// The first whitespace-delimited word of the content.
    ///
    /// For `Block` tokens this is the tag name. Returns `None` when the
    /// content is empty.
    pub fn tag_name(&self) -> Option<&str> {
        self.content.split_whitespace().next()
    }

    /// Check if this token is literal text
    pub fn is_text(&self) -> bool {
        matches!(self.kind, TokenKind::Text)
    }

    /// Check if this token is a block tag
    pub fn is_block(&self) -> bool {
        matches!(self.kind, TokenKind::Block)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Text => write!(f, "<text:{}>", self.content),
            TokenKind::Variable => write!(f, "<var:{}>", self.content),
            TokenKind::Block => write!(f, "<block:{}>", self.content),
            TokenKind::Comment => write!(f, "<comment:{}>", self.content),
        }
    }
}
