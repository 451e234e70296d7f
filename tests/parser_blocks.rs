//! Integration tests for block parsing and the stop-set protocol
//!
//! Parses against the shared testing vocabulary: `wrap`/`endwrap` is a
//! compound tag whose factory parses its body with a stop set, `raw`/
//! `endraw` skips its body wholesale.

use stencil::template::testing::{testing_library, SimpleContext};
use stencil::template::{compile, tokenize, Parser, RegistryLoader, TemplateError};
use std::sync::Arc;

fn compile_with_testlib(source: &str) -> Result<stencil::template::Template, TemplateError> {
    compile(source, vec![testing_library()], Arc::new(RegistryLoader::new()))
}

#[test]
fn test_stop_set_termination() {
    let template = compile_with_testlib("{% wrap %}BODY{% endwrap %}after").unwrap();
    // wrap node plus trailing text; no node for endwrap anywhere
    assert_eq!(template.nodes().len(), 2);
    assert_eq!(template.render(&SimpleContext::empty()), "[BODY]after");
}

#[test]
fn test_nested_compound_tags() {
    let template = compile_with_testlib("{% wrap %}a{% wrap %}b{% endwrap %}c{% endwrap %}").unwrap();
    assert_eq!(template.render(&SimpleContext::empty()), "[a[b]c]");
}

#[test]
fn test_unclosed_block_detection() {
    let error = compile_with_testlib("{% wrap %}BODY").unwrap_err();
    assert_eq!(
        error,
        TemplateError::UnclosedBlock {
            expected: vec!["endwrap".to_string()],
            line: 1,
        }
    );
}

#[test]
fn test_unknown_tag_names_tag_and_line() {
    let error = compile_with_testlib("line one\n{% bogus %}").unwrap_err();
    assert_eq!(
        error,
        TemplateError::InvalidTag {
            name: "bogus".to_string(),
            line: 2,
        }
    );
}

#[test]
fn test_comment_elision() {
    let template = compile_with_testlib("A{# ignored #}B").unwrap();
    assert_eq!(template.nodes().len(), 2);
    assert_eq!(template.render(&SimpleContext::empty()), "AB");
}

#[test]
fn test_comment_tag_body_never_parsed() {
    // bogus is unregistered, but a comment body is skipped, not parsed
    let source = "x{% comment %}{% bogus %}{{ no|such }}{% endcomment %}y";
    let template = compile_with_testlib(source).unwrap();
    assert_eq!(template.render(&SimpleContext::empty()), "xy");
}

#[test]
fn test_raw_region_skipped_wholesale() {
    let template = compile_with_testlib("{% raw %}{% bogus %}{% endraw %}tail").unwrap();
    assert_eq!(template.render(&SimpleContext::empty()), "tail");
}

#[test]
fn test_skip_past_unterminated() {
    let error = compile_with_testlib("{% raw %}never closed").unwrap_err();
    assert_eq!(
        error,
        TemplateError::UnexpectedEndOfStream {
            tag: "endraw".to_string(),
        }
    );
}

#[test]
fn test_empty_block_tag_rejected() {
    let error = compile_with_testlib("a{%   %}b").unwrap_err();
    assert_eq!(error, TemplateError::EmptyTag { line: 1 });
}

#[test]
fn test_first_error_wins() {
    // Unknown tag on line 1, unclosed block later: the leftmost error
    // is the one reported.
    let error = compile_with_testlib("{% bogus %}{% wrap %}no end").unwrap_err();
    assert_eq!(
        error,
        TemplateError::InvalidTag {
            name: "bogus".to_string(),
            line: 1,
        }
    );
}

#[test]
fn test_pushback_idempotence() {
    let source = "{% wrap %}BODY{% endwrap %}{{ x|exclaim }}";
    let plain = compile_with_testlib(source).unwrap();

    // The same parse with an artificial peek-and-pushback up front
    // must produce an identical tree.
    let tokens = tokenize(source).unwrap();
    let mut parser = Parser::new(
        tokens,
        vec![testing_library()],
        Arc::new(RegistryLoader::new()),
    );
    let peeked = parser.next_token().unwrap();
    parser.prepend_token(peeked);
    let nodes = parser.parse(&[]).unwrap();

    let context = SimpleContext::new(serde_json::json!({ "x": "hi" }));
    assert_eq!(nodes.len(), plain.nodes().len());
    assert_eq!(nodes.render(&context), plain.render(&context));
}

#[test]
fn test_render_ignores_unresolved_variables() {
    let template = compile_with_testlib("a{{ missing }}b").unwrap();
    assert_eq!(template.render(&SimpleContext::empty()), "ab");
}
