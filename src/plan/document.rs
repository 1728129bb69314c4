//! Plan documents.
//!
//! A [`PlanDocument`] holds the raw bytes of a `terraform show -json` output.
//! [`Plan`] pairs a document with its flattened resource index.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PlanError, QueryError, Result};
use crate::query::{self, QueryResult};

use super::flatten::{FlattenReport, Flattener};
use super::index::ResourceIndex;
use super::node::RESOURCES_KEY;

/// Raw bytes of a plan document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    /// Document bytes.
    data: Vec<u8>,
    /// File the document was read from, if any.
    source: Option<PathBuf>,
}

impl PlanDocument {
    /// Wraps bytes already in memory.
    #[must_use]
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            source: None,
        }
    }

    /// Reads a plan document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading plan from: {}", path.display());

        if !path.exists() {
            return Err(PlanError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let data = std::fs::read(path).map_err(|e| PlanError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            data,
            source: Some(path.to_path_buf()),
        })
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the document size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the file the document was read from.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Evaluates a path expression against the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid or the document is
    /// malformed.
    pub fn query(&self, expression: &str) -> Result<Option<QueryResult>> {
        query::query(&self.data, expression)
    }

    /// Returns the compact JSON text selected by a path expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid, matches nothing, or
    /// the document is malformed.
    pub fn extract(&self, expression: &str) -> Result<String> {
        self.require(expression).map(|result| result.raw())
    }

    /// Counts the direct resources of the module selected by a path
    /// expression, e.g. `.planned_values.root_module`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression matches nothing or selects
    /// something without a `resources` array.
    pub fn count_resources(&self, expression: &str) -> Result<usize> {
        let result = self.require(expression)?;
        match result.value().get(RESOURCES_KEY) {
            Some(Value::Array(items)) => Ok(items.len()),
            _ => Err(PlanError::UnexpectedShape {
                expression: expression.to_string(),
                expected: String::from("an object with a resources array"),
            }
            .into()),
        }
    }

    fn require(&self, expression: &str) -> Result<QueryResult> {
        self.query(expression)?.ok_or_else(|| {
            QueryError::NotFound {
                expression: expression.to_string(),
            }
            .into()
        })
    }
}

/// A plan document together with its flattened resources.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The raw document.
    pub document: PlanDocument,
    /// Every resource in the plan, keyed by address.
    pub resources: ResourceIndex,
    /// Statistics from flattening.
    pub report: FlattenReport,
}

impl Plan {
    /// Reads and flattens a plan file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a plan.
    pub fn read(path: impl AsRef<Path>, max_depth: usize) -> Result<Self> {
        Self::from_document(PlanDocument::read(path)?, max_depth)
    }

    /// Flattens an already loaded document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a plan.
    pub fn from_document(document: PlanDocument, max_depth: usize) -> Result<Self> {
        let (resources, report) = Flattener::new(max_depth).flatten_with_report(document.data())?;
        Ok(Self {
            document,
            resources,
            report,
        })
    }
}
