//! # stencil
//!
//! A Django-style template compiler: source text containing literal
//! text, `{{ variable }}` expressions, `{% block %}` tags and
//! `{# comments #}` compiles into a tree of renderable nodes, later
//! evaluated against a data context.
//!
//! The crate covers the parsing and extension engine only: the lexer,
//! the recursive-descent parser with its stop-set/pushback protocol,
//! and the library registry through which the tag and filter
//! vocabulary grows without touching the parser. Rendering semantics
//! beyond the node contract are the embedding host's business.
//!
//! ## Testing
//!
//! Parser tests share the tag and filter vocabulary in the
//! [testing module](template::testing) so template snippets mean the
//! same thing in every test.

pub mod template;
