//! Plan loading and flattening.
//!
//! This module turns a nested Terraform plan document into a flat,
//! address-keyed [`ResourceIndex`]:
//! - Reading plan documents and querying them by path
//! - Walking the module tree under a depth limit
//! - Normalizing values so formatting does not affect comparisons
//! - Fingerprinting plans for reports

mod document;
mod flatten;
mod hash;
mod index;
mod node;
mod normalize;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::{Plan, PlanDocument};
pub use flatten::{DEFAULT_MAX_DEPTH, FlattenReport, Flattener, ROOT_MODULE_PATH, flatten};
pub use hash::PlanHasher;
pub use index::{Bucket, FieldMap, ResourceIndex, ResourceRecord};
pub use node::{PlanNode, TraversalContext};
pub use normalize::normalize;
