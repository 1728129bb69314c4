//! Path queries over JSON plan documents.
//!
//! A path expression is a jq-style selector such as
//! `.planned_values.root_module` or `.resources[0].address`, or a full
//! JSONPath such as `$.resources[*].address`. Evaluation is done by
//! `jsonpath-rust`.
//!
//! Queries never mutate the input. A syntactically invalid expression or a
//! malformed document is an error; an expression that selects nothing yields
//! `Ok(None)`. One match yields that value, several yield an array of them.

mod path;
mod result;

pub use path::PathExpr;
pub use result::{QueryResult, ValueKind, scalar_text};

use serde_json::Value;
use tracing::debug;

use crate::error::{QueryError, Result};

/// Parses a JSON document from raw bytes.
///
/// # Errors
///
/// Returns [`QueryError::MalformedDocument`] if the bytes are not valid JSON.
pub fn parse_document(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        QueryError::MalformedDocument {
            message: e.to_string(),
        }
        .into()
    })
}

/// Evaluates a path expression against a JSON byte buffer.
///
/// # Errors
///
/// Returns an error if the expression is invalid or the document cannot be
/// parsed.
pub fn query(bytes: &[u8], expression: &str) -> Result<Option<QueryResult>> {
    let path = PathExpr::parse(expression)?;
    let document = parse_document(bytes)?;
    Ok(query_value(&document, &path))
}

/// Evaluates an already parsed path against an already parsed document.
#[must_use]
pub fn query_value(document: &Value, path: &PathExpr) -> Option<QueryResult> {
    let mut matches = path.select(document);
    match matches.len() {
        0 => {
            debug!("Path {path} matched nothing");
            None
        }
        1 => matches.pop().map(QueryResult::new),
        n => {
            debug!("Path {path} matched {n} values");
            Some(QueryResult::new(Value::Array(matches)))
        }
    }
}
