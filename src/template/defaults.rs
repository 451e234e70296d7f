//! The default library
//!
//! Every session starts with this library active. It carries only the
//! mechanism-level constructs: `load`, which pulls further libraries
//! into the session, `comment`, whose body is dropped without being
//! parsed as template syntax, and a handful of elementary string
//! filters. The full tag and filter vocabulary belongs to host-supplied
//! libraries.

use std::sync::Arc;

use crate::template::error::TemplateError;
use crate::template::library::{smart_split, Filter, Library, TagFactory};
use crate::template::node::{value_text, Node, Value};
use crate::template::parser::Parser;

/// Build the library every parse session starts with
pub fn default_library() -> Arc<Library> {
    let mut library = Library::new("defaults");
    library.register_tag("load", Arc::new(LoadTagFactory));
    library.register_tag("comment", Arc::new(CommentTagFactory));
    library.register_filter("upper", Arc::new(UpperFilter));
    library.register_filter("lower", Arc::new(LowerFilter));
    library.register_filter("default", Arc::new(DefaultFilter));
    Arc::new(library)
}

/// `{% load a b %}` — activate the named libraries for the rest of the session
struct LoadTagFactory;

impl TagFactory for LoadTagFactory {
    fn create(
        &self,
        content: &str,
        parser: &mut Parser,
    ) -> Result<Option<Box<dyn Node>>, TemplateError> {
        for name in smart_split(content) {
            parser.load_lib(&name)?;
        }
        Ok(None)
    }
}

/// `{% comment %} ... {% endcomment %}` — the body is never parsed
struct CommentTagFactory;

impl TagFactory for CommentTagFactory {
    fn create(
        &self,
        _content: &str,
        parser: &mut Parser,
    ) -> Result<Option<Box<dyn Node>>, TemplateError> {
        parser.skip_past("endcomment")?;
        Ok(None)
    }
}

struct UpperFilter;

impl Filter for UpperFilter {
    fn apply(&self, input: Value, _arg: Option<Value>) -> Value {
        Value::String(value_text(&input).to_uppercase())
    }
}

struct LowerFilter;

impl Filter for LowerFilter {
    fn apply(&self, input: Value, _arg: Option<Value>) -> Value {
        Value::String(value_text(&input).to_lowercase())
    }
}

/// `|default:fallback` — replace null, empty-string and false inputs
struct DefaultFilter;

impl Filter for DefaultFilter {
    fn apply(&self, input: Value, arg: Option<Value>) -> Value {
        let falsy = match &input {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !*b,
            _ => false,
        };
        if falsy {
            arg.unwrap_or(Value::Null)
        } else {
            input
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_library_registrations() {
        let library = default_library();
        assert_eq!(library.name(), "defaults");
        assert!(library.tag("load").is_some());
        assert!(library.tag("comment").is_some());
        assert!(library.filter("upper").is_some());
        assert!(library.filter("lower").is_some());
        assert!(library.filter("default").is_some());
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(UpperFilter.apply(json!("hi"), None), json!("HI"));
        assert_eq!(LowerFilter.apply(json!("HI"), None), json!("hi"));
    }

    #[test]
    fn test_default_filter_replaces_falsy() {
        let fallback = Some(json!("n/a"));
        assert_eq!(DefaultFilter.apply(Value::Null, fallback.clone()), json!("n/a"));
        assert_eq!(DefaultFilter.apply(json!(""), fallback.clone()), json!("n/a"));
        assert_eq!(DefaultFilter.apply(json!(false), fallback.clone()), json!("n/a"));
        assert_eq!(DefaultFilter.apply(json!("set"), fallback.clone()), json!("set"));
        assert_eq!(DefaultFilter.apply(json!(0), fallback), json!(0));
    }
}
