//! Recursive-descent template parser
//!
//! The parser drives node-tree construction from a token stream, given
//! a stop set of tag names that hand control back to the caller. Tag
//! factories own the grammar for their own tag bodies: a factory may
//! call [Parser::parse] again with its own stop set to consume a
//! nested body, then consume its terminator with [Parser::next_token]
//! or [Parser::delete_next_token]. The parser itself knows nothing
//! about compound constructs; the stop-set protocol is the whole
//! extensibility seam.
//!
//! Token protocol: every token is consumed exactly once. When a stop
//! tag is seen, its token is pushed back to the front of the stream so
//! the enclosing call (usually the factory that supplied the stop set)
//! can read it. A parse call always terminates once the stream is
//! finite: every iteration consumes a token, and stream end either
//! returns the accumulated list (empty stop set) or fails (unsatisfied
//! stop set).

use std::collections::VecDeque;
use std::sync::Arc;

use crate::template::error::TemplateError;
use crate::template::filterexpr::FilterExpression;
use crate::template::library::{Filter, Library, LibraryLoader, TagFactory};
use crate::template::node::{NodeList, TextNode, VariableNode};
use crate::template::token::{Token, TokenKind};

/// A single parse session over one token stream
///
/// Holds the pending tokens, the session's active libraries (base
/// snapshot plus session-local loads, most recent last) and the host's
/// library-lookup capability. Sessions are single-threaded; concurrent
/// parsing happens on independent sessions sharing immutable base
/// libraries.
pub struct Parser {
    tokens: VecDeque<Token>,
    libraries: Vec<Arc<Library>>,
    loader: Arc<dyn LibraryLoader>,
    last_line: usize,
}

impl Parser {
    pub fn new(
        tokens: Vec<Token>,
        base_libraries: Vec<Arc<Library>>,
        loader: Arc<dyn LibraryLoader>,
    ) -> Self {
        Parser {
            tokens: tokens.into(),
            libraries: base_libraries,
            loader,
            last_line: 1,
        }
    }

    /// Build a node list until a stop tag or the end of the stream
    ///
    /// Text becomes a literal node, variable expressions are compiled
    /// (filters resolve now, not at render time), comments vanish, and
    /// block tags dispatch to their factory. A block tag named in
    /// `stop_set` is pushed back unconsumed and the accumulated list is
    /// returned. Stream end with a non-empty stop set is an unclosed
    /// block.
    pub fn parse(&mut self, stop_set: &[&str]) -> Result<NodeList, TemplateError> {
        let mut nodes = NodeList::new();
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Text => {
                    nodes.push(Box::new(TextNode::new(token.content)));
                }
                TokenKind::Comment => {}
                TokenKind::Variable => {
                    let expr = FilterExpression::new(&token.content, token.line, self)?;
                    nodes.push(Box::new(VariableNode::new(expr)));
                }
                TokenKind::Block => {
                    let name = match token.tag_name() {
                        Some(name) => name.to_string(),
                        None => return Err(TemplateError::EmptyTag { line: token.line }),
                    };
                    if stop_set.contains(&name.as_str()) {
                        self.prepend_token(token);
                        return Ok(nodes);
                    }
                    let factory =
                        self.find_tag(&name)
                            .ok_or_else(|| TemplateError::InvalidTag {
                                name: name.clone(),
                                line: token.line,
                            })?;
                    let content = token.content[name.len()..].trim_start().to_string();
                    if let Some(node) = factory.create(&content, self)? {
                        nodes.push(node);
                    }
                }
            }
        }
        if stop_set.is_empty() {
            Ok(nodes)
        } else {
            Err(TemplateError::UnclosedBlock {
                expected: stop_set.iter().map(|name| name.to_string()).collect(),
                line: self.last_line,
            })
        }
    }

    /// Take the next token off the stream
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front();
        if let Some(token) = &token {
            self.last_line = token.line;
        }
        token
    }

    pub fn has_next_token(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Push a token back to the front of the pending stream
    pub fn prepend_token(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Discard the next token without dispatching it
    pub fn delete_next_token(&mut self) {
        self.tokens.pop_front();
    }

    /// Discard tokens up to and including the block tag named `tag`
    ///
    /// Nothing on the way is resolved or dispatched, so the skipped
    /// region may contain anything, known tags included. For constructs
    /// whose body is not template syntax.
    pub fn skip_past(&mut self, tag: &str) -> Result<(), TemplateError> {
        while let Some(token) = self.next_token() {
            if token.kind == TokenKind::Block && token.tag_name() == Some(tag) {
                return Ok(());
            }
        }
        Err(TemplateError::UnexpectedEndOfStream {
            tag: tag.to_string(),
        })
    }

    /// Resolve a library name through the host loader and activate it
    ///
    /// Effective for all subsequent tag and filter resolution in this
    /// session; never retroactive, never visible to other sessions.
    pub fn load_lib(&mut self, name: &str) -> Result<(), TemplateError> {
        let library = self.loader.load(name)?;
        self.libraries.push(library);
        Ok(())
    }

    /// Look a filter up across the active libraries
    ///
    /// The most recently loaded library wins on a name collision.
    pub fn get_filter(&self, name: &str, line: usize) -> Result<Arc<dyn Filter>, TemplateError> {
        self.libraries
            .iter()
            .rev()
            .find_map(|library| library.filter(name))
            .ok_or_else(|| TemplateError::InvalidFilter {
                name: name.to_string(),
                line,
            })
    }

    fn find_tag(&self, name: &str) -> Option<Arc<dyn TagFactory>> {
        self.libraries
            .iter()
            .rev()
            .find_map(|library| library.tag(name))
    }
}
