//! Expected resource descriptions.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::plan::FieldMap;
use crate::query::scalar_text;

/// What the caller expects to find in the plan for one resource.
///
/// Field values may be written as any scalar or composite in YAML or JSON;
/// they are stored in the same textual form the flattener produces, so
/// `true`, `0` and `["dc1"]` compare equal to the plan's values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedResource {
    /// Resource address, e.g. `module.vpc.aws_eip.nat[0]`.
    pub address: String,
    /// Expected identity fields.
    #[serde(default, deserialize_with = "textual_fields")]
    pub metadata: FieldMap,
    /// Expected attribute values.
    #[serde(default, deserialize_with = "textual_fields")]
    pub values: FieldMap,
}

impl ExpectedResource {
    /// Creates an expectation that only asserts the address exists.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            metadata: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Adds an expected metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Adds an expected attribute value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns true if only the address is asserted.
    #[must_use]
    pub fn is_presence_only(&self) -> bool {
        self.metadata.is_empty() && self.values.is_empty()
    }
}

fn textual_fields<'de, D>(deserializer: D) -> Result<FieldMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, scalar_text(&value)))
        .collect())
}
