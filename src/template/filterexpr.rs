//! Variable-expression and filter-pipeline compiler
//!
//! A `{{ ... }}` token carries an expression of the form
//! `term (|filter[:term])*`, where a term is a dotted variable path, a
//! quoted string literal or a numeric literal. The expression is lexed
//! with a logos mini-lexer and compiled at parse time: every filter
//! name is resolved through the parser's active libraries immediately,
//! so an unknown filter is a parse-time error, never a render-time one.
//!
//! Resolution against a context happens at render time. A dotted path
//! looks the head segment up through the context, then traverses
//! object keys and array indices for the remaining segments.

use logos::Logos;
use std::sync::Arc;

use crate::template::error::TemplateError;
use crate::template::library::Filter;
use crate::template::node::{Context, Value};
use crate::template::parser::Parser;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t]+")]
enum ExprToken {
    #[token("|")]
    Pipe,

    #[token(":")]
    Colon,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    StringLiteral,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    // Dotted path; segments after the head may be numeric (array indices)
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z0-9_]+)*")]
    Path,
}

/// A single term of an expression: a literal value or a variable path
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    Literal(Value),
    Path(Vec<String>),
}

impl Variable {
    /// Resolve this term against a context
    ///
    /// Returns `None` when any path segment is missing or traverses a
    /// value that has no members.
    pub fn resolve(&self, context: &dyn Context) -> Option<Value> {
        match self {
            Variable::Literal(value) => Some(value.clone()),
            Variable::Path(segments) => {
                let mut current = context.lookup(&segments[0])?;
                for segment in &segments[1..] {
                    current = match current {
                        Value::Object(map) => map.get(segment)?.clone(),
                        Value::Array(items) => {
                            let index: usize = segment.parse().ok()?;
                            items.get(index)?.clone()
                        }
                        _ => return None,
                    };
                }
                Some(current)
            }
        }
    }
}

fn term_variable(token: &ExprToken, slice: &str) -> Option<Variable> {
    match token {
        ExprToken::StringLiteral => Some(Variable::Literal(Value::String(
            slice[1..slice.len() - 1].to_string(),
        ))),
        ExprToken::Number => {
            if slice.contains('.') {
                slice.parse::<f64>().ok().map(|n| Variable::Literal(Value::from(n)))
            } else {
                slice.parse::<i64>().ok().map(|n| Variable::Literal(Value::from(n)))
            }
        }
        ExprToken::Path => Some(Variable::Path(
            slice.split('.').map(str::to_string).collect(),
        )),
        _ => None,
    }
}

/// A compiled expression: one variable term plus a chain of resolved filters
pub struct FilterExpression {
    variable: Variable,
    filters: Vec<(Arc<dyn Filter>, Option<Variable>)>,
}

impl std::fmt::Debug for FilterExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterExpression")
            .field("variable", &self.variable)
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl FilterExpression {
    /// Compile an expression, resolving every filter name through the parser
    pub fn new(content: &str, line: usize, parser: &Parser) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidVariable {
            content: content.to_string(),
            line,
        };

        let mut lexer = ExprToken::lexer(content);
        let mut tokens: Vec<(ExprToken, String)> = Vec::new();
        while let Some(result) = lexer.next() {
            let token = result.map_err(|_| invalid())?;
            tokens.push((token, lexer.slice().to_string()));
        }

        let (first, first_slice) = tokens.first().ok_or_else(invalid)?;
        let variable = term_variable(first, first_slice).ok_or_else(invalid)?;

        let mut filters = Vec::new();
        let mut at = 1;
        while at < tokens.len() {
            if tokens[at].0 != ExprToken::Pipe {
                return Err(invalid());
            }
            at += 1;
            let (token, slice) = tokens.get(at).ok_or_else(invalid)?;
            // Filter names are plain identifiers, never dotted
            if *token != ExprToken::Path || slice.contains('.') {
                return Err(invalid());
            }
            let filter = parser.get_filter(slice, line)?;
            at += 1;

            let mut argument = None;
            if at < tokens.len() && tokens[at].0 == ExprToken::Colon {
                at += 1;
                let (token, slice) = tokens.get(at).ok_or_else(invalid)?;
                argument = Some(term_variable(token, slice).ok_or_else(invalid)?);
                at += 1;
            }
            filters.push((filter, argument));
        }

        Ok(FilterExpression { variable, filters })
    }

    /// Resolve the variable and run it through the filter chain
    ///
    /// An unresolvable variable yields `None` and the chain is not run.
    /// An unresolvable filter argument is passed through as null.
    pub fn resolve(&self, context: &dyn Context) -> Option<Value> {
        let mut value = self.variable.resolve(context)?;
        for (filter, argument) in &self.filters {
            let argument = argument
                .as_ref()
                .map(|arg| arg.resolve(context).unwrap_or(Value::Null));
            value = filter.apply(value, argument);
        }
        Some(value)
    }
}
