//! Errors raised while compiling a template
//!
//! A template either compiles fully to a node tree or fails with the
//! first error encountered, left to right. Errors carry the 1-based
//! source line of the offending construct where one exists. There is no
//! partial recovery: every error aborts the enclosing parse and
//! propagates to the caller that started the session.

use std::fmt;

/// Errors that can occur during template compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// An opening delimiter whose closing sequence never appears
    UnterminatedDelimiter {
        delimiter: &'static str,
        line: usize,
    },
    /// A block tag whose name is not registered in any active library
    InvalidTag { name: String, line: usize },
    /// A block tag with no content between its delimiters
    EmptyTag { line: usize },
    /// A filter name not registered in any active library
    InvalidFilter { name: String, line: usize },
    /// A variable expression that does not match the filter grammar
    InvalidVariable { content: String, line: usize },
    /// The stream ended before any tag in the stop set was seen
    UnclosedBlock { expected: Vec<String>, line: usize },
    /// The stream ended while skipping to a named tag
    UnexpectedEndOfStream { tag: String },
    /// The host's library lookup could not resolve a library name
    LibraryNotFound { name: String },
}

impl std::error::Error for TemplateError {}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnterminatedDelimiter { delimiter, line } => {
                write!(f, "Unterminated '{}' starting on line {}", delimiter, line)
            }
            TemplateError::InvalidTag { name, line } => {
                write!(f, "Invalid block tag '{}' on line {}", name, line)
            }
            TemplateError::EmptyTag { line } => {
                write!(f, "Empty block tag on line {}", line)
            }
            TemplateError::InvalidFilter { name, line } => {
                write!(f, "Invalid filter '{}' on line {}", name, line)
            }
            TemplateError::InvalidVariable { content, line } => {
                write!(f, "Could not parse variable '{}' on line {}", content, line)
            }
            TemplateError::UnclosedBlock { expected, line } => {
                write!(
                    f,
                    "Unclosed block on line {}, expected one of: {}",
                    line,
                    expected.join(", ")
                )
            }
            TemplateError::UnexpectedEndOfStream { tag } => {
                write!(f, "Unexpected end of template while skipping to '{}'", tag)
            }
            TemplateError::LibraryNotFound { name } => {
                write!(f, "Library '{}' could not be loaded", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_block_names_terminators() {
        let error = TemplateError::UnclosedBlock {
            expected: vec!["else".to_string(), "endif".to_string()],
            line: 4,
        };
        assert_eq!(
            format!("{}", error),
            "Unclosed block on line 4, expected one of: else, endif"
        );
    }

    #[test]
    fn test_invalid_tag_names_tag_and_line() {
        let error = TemplateError::InvalidTag {
            name: "bogus".to_string(),
            line: 2,
        };
        let message = format!("{}", error);
        assert!(message.contains("bogus"));
        assert!(message.contains("line 2"));
    }
}
