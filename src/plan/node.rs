//! Typed plan nodes and the traversal context.
//!
//! Raw JSON objects from the plan are classified into [`PlanNode`] variants
//! before they are visited. Reserved keys (`resources`, `child_modules`,
//! `address`, `values`) only carry meaning in the container where Terraform
//! reserves them; everywhere else they are ordinary fields.

use serde_json::{Map, Value};
use tracing::debug;

use super::index::Bucket;

/// Key holding the resources declared directly in a module.
pub const RESOURCES_KEY: &str = "resources";
/// Key holding the nested modules of a module.
pub const CHILD_MODULES_KEY: &str = "child_modules";
/// Key holding a resource's address.
pub const ADDRESS_KEY: &str = "address";
/// Key holding a resource's attribute values.
pub const VALUES_KEY: &str = "values";

/// One node of the plan tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanNode<'a> {
    /// An element of a `resources` array.
    ResourceEntry(&'a Map<String, Value>),
    /// The root module or an element of a `child_modules` array.
    ModuleEntry(&'a Map<String, Value>),
    /// The `values` object of a resource.
    ValuesBlock(&'a Map<String, Value>),
    /// A single field of a resource or of its values.
    ScalarField {
        /// Field key.
        key: &'a str,
        /// Field value.
        value: &'a Value,
    },
}

impl<'a> PlanNode<'a> {
    /// Returns the children of a module: its resources, then its child
    /// modules, each in document order.
    ///
    /// Module fields other than the two arrays (including the module's own
    /// `address`) are not resource data and are skipped.
    #[must_use]
    pub fn module_children(module: &'a Map<String, Value>) -> Vec<Self> {
        let mut children = Vec::new();
        for resource in object_items(module, RESOURCES_KEY) {
            children.push(Self::ResourceEntry(resource));
        }
        for child in object_items(module, CHILD_MODULES_KEY) {
            children.push(Self::ModuleEntry(child));
        }
        children
    }

    /// Returns the address of a resource entry.
    #[must_use]
    pub fn resource_address(resource: &'a Map<String, Value>) -> Option<&'a str> {
        resource.get(ADDRESS_KEY).and_then(Value::as_str)
    }

    /// Returns the fields of a resource entry, excluding its address.
    ///
    /// An object under `values` becomes a [`PlanNode::ValuesBlock`]; a
    /// `values` of any other shape carries no attributes and is skipped.
    #[must_use]
    pub fn resource_fields(resource: &'a Map<String, Value>) -> Vec<Self> {
        resource
            .iter()
            .filter_map(|(key, value)| match (key.as_str(), value) {
                (ADDRESS_KEY, _) => None,
                (VALUES_KEY, Value::Object(values)) => Some(Self::ValuesBlock(values)),
                (VALUES_KEY, _) => None,
                (key, value) => Some(Self::ScalarField { key, value }),
            })
            .collect()
    }

    /// Returns the fields of a values block. Every key is a plain field.
    #[must_use]
    pub fn values_fields(values: &'a Map<String, Value>) -> Vec<Self> {
        values
            .iter()
            .map(|(key, value)| Self::ScalarField {
                key: key.as_str(),
                value,
            })
            .collect()
    }
}

/// Returns the object elements of an array field, skipping anything else.
fn object_items<'a>(container: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    match container.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let object = item.as_object();
                if object.is_none() {
                    debug!("Skipping non-object entry in {key}");
                }
                object
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            debug!("Ignoring non-array {key} in module");
            Vec::new()
        }
    }
}

/// Per-call traversal state, threaded by value through the recursion.
///
/// Depth counts descents into `resources` and `child_modules` elements; the
/// root module sits at depth zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalContext<'a> {
    depth: usize,
    max_depth: usize,
    address: Option<&'a str>,
    bucket: Bucket,
}

impl<'a> TraversalContext<'a> {
    /// Creates the context for the root module.
    #[must_use]
    pub const fn root(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            address: None,
            bucket: Bucket::Metadata,
        }
    }

    /// Returns the context one level deeper, or `None` once the depth limit
    /// would be exceeded.
    #[must_use]
    pub const fn descend(self) -> Option<Self> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            None
        } else {
            Some(Self {
                depth,
                max_depth: self.max_depth,
                address: None,
                bucket: Bucket::Metadata,
            })
        }
    }

    /// Returns the context for populating a resource's metadata.
    #[must_use]
    pub const fn at_resource(self, address: &'a str) -> Self {
        Self {
            address: Some(address),
            bucket: Bucket::Metadata,
            ..self
        }
    }

    /// Returns the context for populating a resource's values.
    #[must_use]
    pub const fn in_values(self) -> Self {
        Self {
            bucket: Bucket::Values,
            ..self
        }
    }

    /// Current depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Address of the resource being populated.
    #[must_use]
    pub const fn address(&self) -> Option<&'a str> {
        self.address
    }

    /// Bucket that fields are written into.
    #[must_use]
    pub const fn bucket(&self) -> Bucket {
        self.bucket
    }
}
