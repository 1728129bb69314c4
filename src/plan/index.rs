//! The flattened resource index.
//!
//! Every resource found anywhere in the plan's module tree is stored under
//! its address with two buckets: `Metadata` for identity fields (`type`,
//! `name`, `index`, ...) and `Values` for configured attributes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field key to normalized value.
pub type FieldMap = BTreeMap<String, String>;

/// Which bucket of a resource record a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Bucket {
    /// Resource identity fields.
    Metadata,
    /// Configured attribute values.
    Values,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Metadata => "Metadata",
            Self::Values => "Values",
        };
        write!(f, "{s}")
    }
}

/// The flattened fields of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    /// Identity fields.
    #[serde(rename = "Metadata")]
    pub metadata: FieldMap,
    /// Attribute values.
    #[serde(rename = "Values")]
    pub values: FieldMap,
}

impl ResourceRecord {
    /// Creates a record with both buckets empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            metadata: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Returns one bucket.
    #[must_use]
    pub const fn bucket(&self, bucket: Bucket) -> &FieldMap {
        match bucket {
            Bucket::Metadata => &self.metadata,
            Bucket::Values => &self.values,
        }
    }

    /// Returns one bucket mutably.
    pub const fn bucket_mut(&mut self, bucket: Bucket) -> &mut FieldMap {
        match bucket {
            Bucket::Metadata => &mut self.metadata,
            Bucket::Values => &mut self.values,
        }
    }

    /// Looks up a field in one bucket.
    #[must_use]
    pub fn field(&self, bucket: Bucket, key: &str) -> Option<&str> {
        self.bucket(bucket).get(key).map(String::as_str)
    }

    /// Returns the resource type, if recorded.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.field(Bucket::Metadata, "type")
    }

    /// Returns the resource name, if recorded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field(Bucket::Metadata, "name")
    }
}

/// Address-keyed index of every resource in a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceIndex {
    resources: BTreeMap<String, ResourceRecord>,
}

impl ResourceIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Inserts a record, returning the record it replaced.
    pub fn insert(
        &mut self,
        address: impl Into<String>,
        record: ResourceRecord,
    ) -> Option<ResourceRecord> {
        self.resources.insert(address.into(), record)
    }

    /// Starts a fresh record for an address.
    ///
    /// Returns true if an earlier record with the same address was dropped.
    pub(crate) fn start_record(&mut self, address: &str) -> bool {
        self.insert(address, ResourceRecord::new()).is_some()
    }

    /// Writes a field into an existing record.
    pub(crate) fn set_field(&mut self, address: &str, bucket: Bucket, key: &str, value: String) {
        if let Some(record) = self.resources.get_mut(address) {
            record.bucket_mut(bucket).insert(key.to_string(), value);
        }
    }

    /// Returns the record for an address.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&ResourceRecord> {
        self.resources.get(address)
    }

    /// Returns true if the address is indexed.
    #[must_use]
    pub fn contains_address(&self, address: &str) -> bool {
        self.resources.contains_key(address)
    }

    /// Iterates over addresses in sorted order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Iterates over records in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceRecord)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of indexed resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if no resources were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<(String, ResourceRecord)> for ResourceIndex {
    fn from_iter<I: IntoIterator<Item = (String, ResourceRecord)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}
