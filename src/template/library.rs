//! Tag and filter libraries
//!
//! A library is an immutable, named bundle of tag factories and
//! filters. The grammar grows by registering libraries, never by
//! touching the parser: a tag factory owns the syntax of its own tag
//! body by calling back into the parser handle it is given.
//!
//! Libraries are shared as `Arc<Library>` and never mutated after
//! construction, so a base set can be shared across concurrently
//! parsing sessions. Loading additional libraries mid-parse only ever
//! appends to the loading session's own active list.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::template::error::TemplateError;
use crate::template::node::{Node, Value};
use crate::template::parser::Parser;

/// A named, stateless value transform usable in filter pipelines
pub trait Filter: Send + Sync {
    fn apply(&self, input: Value, arg: Option<Value>) -> Value;
}

/// A named capability that turns a block tag into zero or one node
///
/// `content` is the tag's content with the leading tag name already
/// split off. The factory may reenter the parser through `parser` to
/// consume a nested body (`parse` with its own stop set), skip a
/// verbatim region (`skip_past`), or step tokens one at a time.
pub trait TagFactory: Send + Sync {
    fn create(
        &self,
        content: &str,
        parser: &mut Parser,
    ) -> Result<Option<Box<dyn Node>>, TemplateError>;
}

/// An immutable bundle of tag factories and filters
pub struct Library {
    name: String,
    tags: HashMap<String, Arc<dyn TagFactory>>,
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Library {
            name: name.into(),
            tags: HashMap::new(),
            filters: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register_tag(&mut self, name: impl Into<String>, factory: Arc<dyn TagFactory>) {
        self.tags.insert(name.into(), factory);
    }

    pub fn register_filter(&mut self, name: impl Into<String>, filter: Arc<dyn Filter>) {
        self.filters.insert(name.into(), filter);
    }

    pub fn tag(&self, name: &str) -> Option<Arc<dyn TagFactory>> {
        self.tags.get(name).cloned()
    }

    pub fn filter(&self, name: &str) -> Option<Arc<dyn Filter>> {
        self.filters.get(name).cloned()
    }
}

/// Host-supplied capability resolving library names to libraries
pub trait LibraryLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<Arc<Library>, TemplateError>;
}

/// A [LibraryLoader] over an up-front name-to-library registry
#[derive(Default)]
pub struct RegistryLoader {
    libraries: HashMap<String, Arc<Library>>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        RegistryLoader::default()
    }

    /// Register a library under its own name
    pub fn register(&mut self, library: Arc<Library>) {
        self.libraries.insert(library.name().to_string(), library);
    }
}

impl LibraryLoader for RegistryLoader {
    fn load(&self, name: &str) -> Result<Arc<Library>, TemplateError> {
        self.libraries
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::LibraryNotFound {
                name: name.to_string(),
            })
    }
}

static SMART_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'|\S+"#).expect("smart split pattern is valid"));

/// Split tag content on whitespace, keeping quoted runs intact
///
/// `title "a b" x` splits into `title`, `"a b"`, `x`. Quotes are kept
/// so factories can tell literals from names. Argument parsing beyond
/// this is each factory's own business.
pub fn smart_split(content: &str) -> Vec<String> {
    SMART_SPLIT_RE
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::testing::SuffixFilter;

    #[test]
    fn test_library_lookup() {
        let mut library = Library::new("strings");
        library.register_filter("exclaim", Arc::new(SuffixFilter::new("!")));
        assert!(library.filter("exclaim").is_some());
        assert!(library.filter("absent").is_none());
        assert!(library.tag("absent").is_none());
        assert_eq!(library.name(), "strings");
    }

    #[test]
    fn test_registry_loader_resolves_by_name() {
        let mut loader = RegistryLoader::new();
        loader.register(Arc::new(Library::new("strings")));
        assert!(loader.load("strings").is_ok());
        assert_eq!(
            loader.load("absent").unwrap_err(),
            TemplateError::LibraryNotFound {
                name: "absent".to_string(),
            }
        );
    }

    #[test]
    fn test_smart_split_plain_words() {
        assert_eq!(smart_split("a b  c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_smart_split_keeps_quoted_runs() {
        assert_eq!(
            smart_split(r#"title "a b" 'c d' x"#),
            vec!["title", "\"a b\"", "'c d'", "x"]
        );
    }

    #[test]
    fn test_smart_split_empty() {
        assert_eq!(smart_split(""), Vec::<String>::new());
        assert_eq!(smart_split("   "), Vec::<String>::new());
    }
}
