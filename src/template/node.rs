//! Renderable nodes and the node list
//!
//! Parsing produces a tree of nodes mirroring template nesting. The
//! parser treats nodes as opaque: it only accumulates them into a
//! `NodeList`, in parse order, and never inspects or mutates them
//! afterwards. Tree construction is append-only and single-writer;
//! ownership flows strictly downward, so the tree is acyclic by
//! construction. The root list is owned by whoever started the parse.
//!
//! Rendering consumes an opaque [Context] capability. The core never
//! constructs a context; the rendering layer supplies one. A variable
//! that the context cannot resolve renders as the empty string.

use crate::template::filterexpr::FilterExpression;

/// The value type flowing through contexts and filters
pub type Value = serde_json::Value;

/// Variable-resolution capability supplied by the rendering layer
pub trait Context {
    /// Resolve a top-level variable name to a value
    fn lookup(&self, name: &str) -> Option<Value>;
}

/// A renderable unit produced by parsing
pub trait Node {
    fn render(&self, context: &dyn Context) -> String;
}

/// An ordered, append-only sequence of nodes
///
/// Render order equals parse order.
#[derive(Default)]
pub struct NodeList {
    nodes: Vec<Box<dyn Node>>,
}

impl std::fmt::Debug for NodeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeList")
            .field("len", &self.nodes.len())
            .finish()
    }
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Box<dyn Node>) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Node> {
        self.nodes.get(index).map(|node| node.as_ref())
    }

    /// Render every node in insertion order and concatenate the output
    pub fn render(&self, context: &dyn Context) -> String {
        let mut output = String::new();
        for node in &self.nodes {
            output.push_str(&node.render(context));
        }
        output
    }
}

impl Node for NodeList {
    fn render(&self, context: &dyn Context) -> String {
        NodeList::render(self, context)
    }
}

/// Literal template text, rendered byte-for-byte
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        TextNode { text: text.into() }
    }
}

impl Node for TextNode {
    fn render(&self, _context: &dyn Context) -> String {
        self.text.clone()
    }
}

/// A compiled `{{ ... }}` expression
pub struct VariableNode {
    expr: FilterExpression,
}

impl VariableNode {
    pub fn new(expr: FilterExpression) -> Self {
        VariableNode { expr }
    }
}

impl Node for VariableNode {
    fn render(&self, context: &dyn Context) -> String {
        match self.expr.resolve(context) {
            Some(value) => value_text(&value),
            None => String::new(),
        }
    }
}

/// Textual form of a value for template output
///
/// Strings render without quotes; null renders empty; everything else
/// uses its JSON form.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
