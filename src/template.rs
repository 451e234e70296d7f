//! Template compilation engine
//!
//! Turns template source text into a tree of renderable nodes. Source
//! flows through the lexer into typed tokens, then through the
//! recursive-descent parser, which consults the active libraries to
//! resolve block tags and filters and hands each tag factory a parser
//! handle so compound tags can own the grammar of their bodies. The
//! resulting node tree is the sole artifact handed to rendering.
//!
//! The grammar's vocabulary is open: libraries bundle tag factories
//! and filters, a base set is active from the start, and `{% load %}`
//! pulls more in mid-parse through a host-supplied lookup capability.
//! Name collisions resolve most-recently-loaded first.

pub mod defaults;
pub mod error;
pub mod filterexpr;
pub mod lexer;
pub mod library;
pub mod node;
pub mod parser;
pub mod testing;
pub mod token;

pub use defaults::default_library;
pub use error::TemplateError;
pub use filterexpr::{FilterExpression, Variable};
pub use lexer::{tokenize, Lexer};
pub use library::{smart_split, Filter, Library, LibraryLoader, RegistryLoader, TagFactory};
pub use node::{Context, Node, NodeList, TextNode, Value, VariableNode};
pub use parser::Parser;
pub use token::{Token, TokenKind};

use std::sync::Arc;

/// A fully compiled template
///
/// Owns the document-root node list produced by parsing.
pub struct Template {
    nodes: NodeList,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl Template {
    pub fn render(&self, context: &dyn Context) -> String {
        self.nodes.render(context)
    }

    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }
}

/// Compile template source into a [Template]
///
/// The session's active libraries are the default library, then the
/// caller's base snapshot (later entries shadow earlier ones), plus
/// whatever `{% load %}` adds along the way. This is the primary entry
/// point for embedding hosts.
pub fn compile(
    source: &str,
    base_libraries: Vec<Arc<Library>>,
    loader: Arc<dyn LibraryLoader>,
) -> Result<Template, TemplateError> {
    let tokens = tokenize(source)?;
    let mut libraries = vec![default_library()];
    libraries.extend(base_libraries);
    let mut parser = Parser::new(tokens, libraries, loader);
    let nodes = parser.parse(&[])?;
    Ok(Template { nodes })
}
