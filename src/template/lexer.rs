//! Lexer for template source text
//!
//! The lexer scans fully materialized source text into a lazy, finite,
//! non-restartable sequence of tokens. Text outside any delimiter pair
//! is emitted verbatim as `Text` tokens, whitespace and newlines
//! included. Three delimiter pairs classify the rest: `{{ }}` for
//! variable expressions, `{% %}` for block tags and `{# #}` for
//! comments. Delimiters do not nest and there is no escaping at this
//! layer; the first closing sequence after an opener always wins.
//!
//! An opening delimiter with no closing sequence is a scan error, not
//! literal text. The error carries the line of the opener.

use crate::template::error::TemplateError;
use crate::template::token::{Token, TokenKind};

pub const VARIABLE_OPEN: &str = "{{";
pub const VARIABLE_CLOSE: &str = "}}";
pub const BLOCK_OPEN: &str = "{%";
pub const BLOCK_CLOSE: &str = "%}";
pub const COMMENT_OPEN: &str = "{#";
pub const COMMENT_CLOSE: &str = "#}";

const DELIMITERS: [(&str, &str, TokenKind); 3] = [
    (VARIABLE_OPEN, VARIABLE_CLOSE, TokenKind::Variable),
    (BLOCK_OPEN, BLOCK_CLOSE, TokenKind::Block),
    (COMMENT_OPEN, COMMENT_CLOSE, TokenKind::Comment),
];

/// A single-pass scanner over template source
///
/// Iterates `Result<Token, TemplateError>`; after the first error the
/// stream is exhausted.
pub struct Lexer<'t> {
    rest: &'t str,
    line: usize,
    failed: bool,
}

fn newline_count(consumed: &str) -> usize {
    consumed.bytes().filter(|b| *b == b'\n').count()
}

impl<'t> Lexer<'t> {
    pub fn new(source: &'t str) -> Self {
        Lexer {
            rest: source,
            line: 1,
            failed: false,
        }
    }

    /// Position of the earliest opening delimiter in the remaining source
    fn next_opener(&self) -> Option<(usize, &'static str, &'static str, TokenKind)> {
        DELIMITERS
            .iter()
            .filter_map(|(open, close, kind)| {
                self.rest.find(open).map(|at| (at, *open, *close, *kind))
            })
            .min_by_key(|(at, _, _, _)| *at)
    }

    fn lex_text(&mut self, until: usize) -> Token {
        let text = &self.rest[..until];
        let token = Token::new(TokenKind::Text, text, self.line);
        self.line += newline_count(text);
        self.rest = &self.rest[until..];
        token
    }

    fn lex_delimited(
        &mut self,
        open: &'static str,
        close: &'static str,
        kind: TokenKind,
    ) -> Result<Token, TemplateError> {
        let inner = &self.rest[open.len()..];
        match inner.find(close) {
            None => {
                self.failed = true;
                Err(TemplateError::UnterminatedDelimiter {
                    delimiter: open,
                    line: self.line,
                })
            }
            Some(at) => {
                let token = Token::new(kind, inner[..at].trim(), self.line);
                let consumed = open.len() + at + close.len();
                self.line += newline_count(&self.rest[..consumed]);
                self.rest = &self.rest[consumed..];
                Ok(token)
            }
        }
    }
}

impl<'t> Iterator for Lexer<'t> {
    type Item = Result<Token, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match self.next_opener() {
            None => Some(Ok(self.lex_text(self.rest.len()))),
            Some((0, open, close, kind)) => Some(self.lex_delimited(open, close, kind)),
            Some((at, _, _, _)) => Some(Ok(self.lex_text(at))),
        }
    }
}

/// Tokenize a whole source string, stopping at the first scan error
pub fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_single_token() {
        let tokens = tokenize("hello world\n").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, "hello world\n", 1)]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn test_all_four_kinds() {
        let tokens = tokenize("A{{ name }}B{% load lib %}C{# note #}D").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Text, "A", 1),
                Token::new(TokenKind::Variable, "name", 1),
                Token::new(TokenKind::Text, "B", 1),
                Token::new(TokenKind::Block, "load lib", 1),
                Token::new(TokenKind::Text, "C", 1),
                Token::new(TokenKind::Comment, "note", 1),
                Token::new(TokenKind::Text, "D", 1),
            ]
        );
    }

    #[test]
    fn test_delimiter_content_is_trimmed() {
        let tokens = tokenize("{%   if x   %}").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Block, "if x", 1)]);
    }

    #[test]
    fn test_text_whitespace_is_preserved() {
        let tokens = tokenize("  a\n\n  b  ").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, "  a\n\n  b  ", 1)]);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("line one\nline two {{ x }}\n{% tag %}").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2); // {{ x }}
        assert_eq!(tokens[2].line, 2); // the newline after it
        assert_eq!(tokens[3].line, 3); // {% tag %}
    }

    #[test]
    fn test_newline_inside_delimiters_advances_line() {
        let tokens = tokenize("{% tag\narg %}{{ x }}").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Block, "tag\narg", 1));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_first_close_wins() {
        let tokens = tokenize("{{ a }} b }}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Variable, "a", 1),
                Token::new(TokenKind::Text, " b }}", 1),
            ]
        );
    }

    #[test]
    fn test_lone_braces_are_text() {
        let tokens = tokenize("a { b } c %} d").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, "a { b } c %} d", 1)]);
    }

    #[test]
    fn test_unterminated_variable_is_error() {
        let error = tokenize("text {{ name").unwrap_err();
        assert_eq!(
            error,
            TemplateError::UnterminatedDelimiter {
                delimiter: VARIABLE_OPEN,
                line: 1,
            }
        );
    }

    #[test]
    fn test_unterminated_block_reports_opener_line() {
        let error = tokenize("one\ntwo\n{% tag").unwrap_err();
        assert_eq!(
            error,
            TemplateError::UnterminatedDelimiter {
                delimiter: BLOCK_OPEN,
                line: 3,
            }
        );
    }

    #[test]
    fn test_lexer_stops_after_error() {
        let mut lexer = Lexer::new("{# open");
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_adjacent_delimiters_no_text_between() {
        let tokens = tokenize("{{ a }}{{ b }}").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].content, "a");
        assert_eq!(tokens[1].content, "b");
    }
}
