//! Path expressions.
//!
//! Expressions are written jq-style (`.planned_values.root_module`,
//! `.resources[0]`) or as JSONPath (`$.resources[*].address`). Both are
//! compiled by `jsonpath-rust`; the jq form is only a shorthand for a
//! JSONPath rooted at `$`.

use jsonpath_rust::JsonPath;
use serde_json::Value;
use std::fmt;

use crate::error::QueryError;

/// JSONPath of the document root.
const ROOT: &str = "$";

/// A compiled path expression.
#[derive(Debug)]
pub struct PathExpr {
    /// The expression as written.
    expression: String,
    /// The JSONPath it was compiled from.
    jsonpath: String,
    /// Compiled query.
    compiled: JsonPath,
}

impl PathExpr {
    /// Compiles a path expression.
    ///
    /// `.` and the empty string select the document root. Keys that are
    /// not plain identifiers use bracket form: `.labels.['app.kubernetes.io/name']`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidExpression`] if the expression is not
    /// valid JSONPath once the jq shorthand is expanded.
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let jsonpath = to_jsonpath(expression);
        let compiled = jsonpath
            .parse::<JsonPath>()
            .map_err(|e| QueryError::invalid(expression, e.to_string()))?;

        Ok(Self {
            expression: expression.trim().to_string(),
            jsonpath,
            compiled,
        })
    }

    /// Returns the expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// Returns the JSONPath the expression compiles to.
    #[must_use]
    pub fn jsonpath(&self) -> &str {
        &self.jsonpath
    }

    /// Returns true if the expression selects the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.jsonpath == ROOT
    }

    /// Returns every value the path selects, in document order.
    #[must_use]
    pub fn select(&self, root: &Value) -> Vec<Value> {
        match self.compiled.find(root) {
            Value::Array(matches) => matches,
            // `find` reports "no value" as a bare null rather than a match.
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expression.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

/// Expands the jq shorthand into a JSONPath rooted at `$`.
fn to_jsonpath(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.starts_with('$') {
        trimmed.to_string()
    } else if trimmed.is_empty() || trimmed == "." {
        ROOT.to_string()
    } else if trimmed.starts_with('.') || trimmed.starts_with('[') {
        format!("{ROOT}{trimmed}")
    } else {
        format!("{ROOT}.{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jq_shorthand_expansion() {
        assert_eq!(
            PathExpr::parse(".planned_values.root_module").unwrap().jsonpath(),
            "$.planned_values.root_module"
        );
        assert_eq!(PathExpr::parse("resources[2]").unwrap().jsonpath(), "$.resources[2]");
        assert_eq!(PathExpr::parse("$.a.b").unwrap().jsonpath(), "$.a.b");
    }

    #[test]
    fn test_parse_root() {
        assert!(PathExpr::parse(".").unwrap().is_root());
        assert!(PathExpr::parse("").unwrap().is_root());
        assert_eq!(PathExpr::parse("").unwrap().to_string(), ".");
    }

    #[test]
    fn test_parse_rejects_unsupported_syntax() {
        assert!(PathExpr::parse(".planned_values | .root_module").is_err());
        assert!(PathExpr::parse(".a[").is_err());
        assert!(PathExpr::parse(".a[x").is_err());
    }

    #[test]
    fn test_select_single() {
        let doc = json!({"a": {"b": [10, {"c": true}]}});
        let path = PathExpr::parse(".a.b[1].c").unwrap();
        assert_eq!(path.select(&doc), vec![json!(true)]);

        assert!(PathExpr::parse(".a.b[2]").unwrap().select(&doc).is_empty());
        assert!(PathExpr::parse(".a.missing").unwrap().select(&doc).is_empty());
    }

    #[test]
    fn test_select_slice_and_wildcard() {
        let doc = json!({"resources": [{"address": "a"}, {"address": "b"}, {"address": "c"}]});

        let path = PathExpr::parse(".resources[0:2]").unwrap();
        assert_eq!(path.select(&doc).len(), 2);

        let path = PathExpr::parse("$.resources[*].address").unwrap();
        assert_eq!(path.select(&doc), vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_select_bracket_key() {
        let doc = json!({"labels": {"app.kubernetes.io/name": "web"}});
        let path = PathExpr::parse(".labels.['app.kubernetes.io/name']").unwrap();
        assert_eq!(path.select(&doc), vec![json!("web")]);
    }

    #[test]
    fn test_select_null_value_is_a_match() {
        let doc = json!({"values": {"timeouts": null}});
        let path = PathExpr::parse(".values.timeouts").unwrap();
        assert_eq!(path.select(&doc), vec![Value::Null]);
    }
}
