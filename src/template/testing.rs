//! Testing vocabulary for the parsing engine
//!
//! The engine's own grammar is deliberately tiny; exercising the
//! parser needs a tag and filter vocabulary. This module supplies a
//! small, stable one, shared by unit and integration tests so template
//! snippets mean the same thing everywhere:
//!
//! - `wrap` / `endwrap`: a compound tag that parses its body with a
//!   stop set and renders it inside `[` `]` — the canonical exercise
//!   of the stop-set and pushback protocol.
//! - `raw` / `endraw`: skips its body wholesale via `skip_past`.
//! - `exclaim`: appends `!` to its input.
//! - `append`: appends its argument to its input.
//!
//! It also provides [SimpleContext], a map-backed render context, and
//! [sample_loader], a registry with the libraries the library-loading
//! tests expect (`strings`, `liba`, `libb` — the last two both define
//! filter `f`, for precedence tests).

use std::sync::Arc;

use crate::template::error::TemplateError;
use crate::template::library::{Filter, Library, RegistryLoader, TagFactory};
use crate::template::node::{value_text, Context, Node, NodeList, Value};
use crate::template::parser::Parser;

/// A render context backed by a JSON object
pub struct SimpleContext {
    data: Value,
}

impl SimpleContext {
    pub fn new(data: Value) -> Self {
        SimpleContext { data }
    }

    pub fn empty() -> Self {
        SimpleContext {
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

impl Context for SimpleContext {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.data.get(name).cloned()
    }
}

/// Appends a fixed suffix to the textual form of its input
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        SuffixFilter {
            suffix: suffix.into(),
        }
    }
}

impl Filter for SuffixFilter {
    fn apply(&self, input: Value, _arg: Option<Value>) -> Value {
        Value::String(format!("{}{}", value_text(&input), self.suffix))
    }
}

/// Appends the textual form of its argument to its input
pub struct AppendFilter;

impl Filter for AppendFilter {
    fn apply(&self, input: Value, arg: Option<Value>) -> Value {
        let suffix = arg.map(|value| value_text(&value)).unwrap_or_default();
        Value::String(format!("{}{}", value_text(&input), suffix))
    }
}

/// `{% wrap %}body{% endwrap %}` — parses the body, renders it bracketed
pub struct WrapTagFactory;

impl TagFactory for WrapTagFactory {
    fn create(
        &self,
        _content: &str,
        parser: &mut Parser,
    ) -> Result<Option<Box<dyn Node>>, TemplateError> {
        let body = parser.parse(&["endwrap"])?;
        // parse stopped on the endwrap token and pushed it back
        parser.delete_next_token();
        Ok(Some(Box::new(WrapNode { body })))
    }
}

struct WrapNode {
    body: NodeList,
}

impl Node for WrapNode {
    fn render(&self, context: &dyn Context) -> String {
        format!("[{}]", self.body.render(context))
    }
}

/// `{% raw %}...{% endraw %}` — the body is discarded unparsed
pub struct RawTagFactory;

impl TagFactory for RawTagFactory {
    fn create(
        &self,
        _content: &str,
        parser: &mut Parser,
    ) -> Result<Option<Box<dyn Node>>, TemplateError> {
        parser.skip_past("endraw")?;
        Ok(None)
    }
}

/// The library the engine's own tests parse against
pub fn testing_library() -> Arc<Library> {
    let mut library = Library::new("testlib");
    library.register_tag("wrap", Arc::new(WrapTagFactory));
    library.register_tag("raw", Arc::new(RawTagFactory));
    library.register_filter("exclaim", Arc::new(SuffixFilter::new("!")));
    library.register_filter("append", Arc::new(AppendFilter));
    Arc::new(library)
}

/// A loader with the libraries the `load`-tag tests expect
///
/// `liba` and `libb` both register filter `f` (suffixes `-a` and `-b`)
/// so precedence across load order is observable.
pub fn sample_loader() -> Arc<RegistryLoader> {
    let mut strings = Library::new("strings");
    strings.register_filter("exclaim", Arc::new(SuffixFilter::new("!")));

    let mut liba = Library::new("liba");
    liba.register_filter("f", Arc::new(SuffixFilter::new("-a")));

    let mut libb = Library::new("libb");
    libb.register_filter("f", Arc::new(SuffixFilter::new("-b")));

    let mut loader = RegistryLoader::new();
    loader.register(Arc::new(strings));
    loader.register(Arc::new(liba));
    loader.register(Arc::new(libb));
    Arc::new(loader)
}
