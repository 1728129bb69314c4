//! Plan flattening.
//!
//! Walks `planned_values.root_module` and every nested `child_modules`
//! entry, indexing each resource under its address. Depth is bounded: a
//! branch that would go deeper than the configured maximum is skipped and
//! counted, never treated as an error.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PlanError, Result};
use crate::query::{self, scalar_text};

use super::index::ResourceIndex;
use super::node::{PlanNode, TraversalContext};
use super::normalize::normalize;

/// Where the module tree starts in a plan document.
pub const ROOT_MODULE_PATH: &str = ".planned_values.root_module";

/// Default maximum traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Statistics gathered during one flatten pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenReport {
    /// Resource entries visited, duplicates included.
    pub resources_visited: usize,
    /// Modules visited, the root module included.
    pub modules_visited: usize,
    /// Deepest level at which a resource was indexed.
    pub deepest_resource: usize,
    /// Entries skipped because they were beyond the depth limit.
    pub truncated_branches: usize,
    /// Resource entries skipped because they had no address.
    pub unaddressed_resources: usize,
    /// Addresses seen more than once; the last entry won.
    pub duplicate_addresses: Vec<String>,
}

impl FlattenReport {
    /// Returns true if any part of the plan was skipped or overwritten.
    #[must_use]
    pub fn is_lossy(&self) -> bool {
        self.truncated_branches > 0
            || self.unaddressed_resources > 0
            || !self.duplicate_addresses.is_empty()
    }
}

/// Builds a [`ResourceIndex`] from plan bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flattener {
    /// Maximum traversal depth.
    max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Flattener {
    /// Creates a flattener with the given depth limit.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Returns the depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flattens a plan into a resource index.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has no root module.
    pub fn flatten(&self, plan: &[u8]) -> Result<ResourceIndex> {
        self.flatten_with_report(plan).map(|(index, _)| index)
    }

    /// Flattens a plan, also returning traversal statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or has no root module.
    pub fn flatten_with_report(&self, plan: &[u8]) -> Result<(ResourceIndex, FlattenReport)> {
        debug!("Flattening plan ({} bytes, max depth {})", plan.len(), self.max_depth);

        let root = query::query(plan, ROOT_MODULE_PATH)?.ok_or_else(|| {
            PlanError::RootModuleNotFound {
                expression: ROOT_MODULE_PATH.to_string(),
            }
        })?;
        let Some(module) = root.value().as_object() else {
            return Err(PlanError::UnexpectedShape {
                expression: ROOT_MODULE_PATH.to_string(),
                expected: format!("an object, found {}", root.kind()),
            }
            .into());
        };

        let mut pass = FlattenPass::default();
        pass.visit(PlanNode::ModuleEntry(module), TraversalContext::root(self.max_depth));

        info!(
            "Indexed {} resources from {} modules",
            pass.index.len(),
            pass.report.modules_visited
        );
        Ok((pass.index, pass.report))
    }
}

/// Flattens a plan with the given depth limit.
///
/// # Errors
///
/// Returns an error if the document is malformed or has no root module.
pub fn flatten(plan: &[u8], max_depth: usize) -> Result<ResourceIndex> {
    Flattener::new(max_depth).flatten(plan)
}

/// Output of a single pass, owned by that pass until it returns.
#[derive(Debug, Default)]
struct FlattenPass {
    index: ResourceIndex,
    report: FlattenReport,
}

impl FlattenPass {
    fn visit<'a>(&mut self, node: PlanNode<'a>, ctx: TraversalContext<'a>) {
        match node {
            PlanNode::ModuleEntry(module) => {
                self.report.modules_visited += 1;
                let children = PlanNode::module_children(module);
                let Some(child_ctx) = ctx.descend() else {
                    if !children.is_empty() {
                        warn!(
                            "Depth limit reached at depth {}, skipping {} entries",
                            ctx.depth(),
                            children.len()
                        );
                        self.report.truncated_branches += children.len();
                    }
                    return;
                };
                for child in children {
                    self.visit(child, child_ctx);
                }
            }
            PlanNode::ResourceEntry(resource) => {
                let Some(address) = PlanNode::resource_address(resource) else {
                    warn!("Skipping resource without an address at depth {}", ctx.depth());
                    self.report.unaddressed_resources += 1;
                    return;
                };
                if self.index.start_record(address) {
                    warn!("Duplicate resource address {address}, keeping the last entry");
                    self.report.duplicate_addresses.push(address.to_string());
                }
                self.report.resources_visited += 1;
                self.report.deepest_resource = self.report.deepest_resource.max(ctx.depth());

                let ctx = ctx.at_resource(address);
                for field in PlanNode::resource_fields(resource) {
                    self.visit(field, ctx);
                }
            }
            PlanNode::ValuesBlock(values) => {
                let ctx = ctx.in_values();
                for field in PlanNode::values_fields(values) {
                    self.visit(field, ctx);
                }
            }
            PlanNode::ScalarField { key, value } => {
                // Fields only exist under a resource, which always sets the address.
                if let Some(address) = ctx.address() {
                    self.index
                        .set_field(address, ctx.bucket(), key, normalize(&scalar_text(value)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlanAssertError, QueryError};
    use crate::plan::fixtures;
    use crate::plan::index::Bucket;

    #[test]
    fn test_flatten_root_resource() {
        let index = flatten(fixtures::NOMAD_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(index.len(), 1);

        let record = index.get("module.job.test_job").unwrap();
        assert_eq!(record.field(Bucket::Metadata, "type"), Some("nomad_job"));
        assert_eq!(record.field(Bucket::Metadata, "name"), Some("test_job"));
        assert_eq!(record.field(Bucket::Values, "name"), Some("unit-test"));
        assert_eq!(record.field(Bucket::Values, "datacenters"), Some(r#"["dc1"]"#));
        assert_eq!(record.field(Bucket::Metadata, "address"), None);
    }

    #[test]
    fn test_flatten_indexes_every_depth_and_nothing_else() {
        let index = flatten(fixtures::MODULE_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();
        let addresses: Vec<&str> = index.addresses().collect();
        assert_eq!(
            addresses,
            vec![
                "aws_s3_bucket.logs",
                "module.db.module.db_subnet_group.aws_db_subnet_group.this[0]",
                "module.eks.aws_eks_cluster.this[0]",
                "module.vpc.aws_eip.nat[0]",
                "module.vpc.aws_eip.nat[1]",
            ]
        );
    }

    #[test]
    fn test_flatten_scalar_forms() {
        let index = flatten(fixtures::MODULE_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();

        let eip = index.get("module.vpc.aws_eip.nat[0]").unwrap();
        assert_eq!(eip.field(Bucket::Metadata, "index"), Some("0"));
        assert_eq!(eip.field(Bucket::Values, "vpc"), Some("true"));
        assert_eq!(eip.field(Bucket::Values, "timeouts"), Some(""));

        let eks = index.get("module.eks.aws_eks_cluster.this[0]").unwrap();
        assert_eq!(
            eks.field(Bucket::Values, "encryption_config"),
            Some(r#"[{"provider":[{}],"resources":["secrets"]}]"#)
        );
    }

    #[test]
    fn test_flatten_missing_values_gives_empty_bucket() {
        let index = flatten(fixtures::MODULE_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();
        let record = index.get("module.vpc.aws_eip.nat[1]").unwrap();
        assert!(record.values.is_empty());
        assert_eq!(record.resource_type(), Some("aws_eip"));
    }

    #[test]
    fn test_flatten_reserved_keys_inside_values() {
        let plan = r#"{"planned_values": {"root_module": {"resources": [
            {"address": "aws_eip.ip", "type": "aws_eip",
             "values": {"address": "10.0.0.1", "values": {"a": 1}, "resources": []}}
        ]}}}"#;
        let index = flatten(plan.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();

        assert_eq!(index.len(), 1);
        let record = index.get("aws_eip.ip").unwrap();
        assert_eq!(record.field(Bucket::Values, "address"), Some("10.0.0.1"));
        assert_eq!(record.field(Bucket::Values, "values"), Some(r#"{"a":1}"#));
        assert_eq!(record.field(Bucket::Values, "resources"), Some("[]"));
    }

    #[test]
    fn test_flatten_duplicate_address_last_wins() {
        let plan = r#"{"planned_values": {"root_module": {"resources": [
            {"address": "null_resource.x", "name": "first", "values": {"a": "1"}},
            {"address": "null_resource.x", "name": "second"}
        ]}}}"#;
        let (index, report) = Flattener::default()
            .flatten_with_report(plan.as_bytes())
            .unwrap();

        let record = index.get("null_resource.x").unwrap();
        assert_eq!(record.name(), Some("second"));
        assert!(record.values.is_empty());
        assert_eq!(report.duplicate_addresses, vec![String::from("null_resource.x")]);
        assert!(report.is_lossy());
    }

    #[test]
    fn test_flatten_depth_guard_drops_deepest_resource() {
        let plan = fixtures::nested_plan(4);

        let (index, report) = Flattener::new(5).flatten_with_report(plan.as_bytes()).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(report.truncated_branches, 0);
        assert_eq!(report.deepest_resource, 5);

        let (index, report) = Flattener::new(4).flatten_with_report(plan.as_bytes()).unwrap();
        assert_eq!(index.len(), 4);
        assert!(!index.contains_address(&fixtures::nested_address(4)));
        assert!(index.contains_address(&fixtures::nested_address(3)));
        assert_eq!(report.truncated_branches, 1);
    }

    #[test]
    fn test_flatten_zero_depth_indexes_nothing() {
        let (index, report) = Flattener::new(0)
            .flatten_with_report(fixtures::NOMAD_PLAN.as_bytes())
            .unwrap();
        assert!(index.is_empty());
        assert_eq!(report.truncated_branches, 1);
    }

    #[test]
    fn test_flatten_unaddressed_resource_skipped() {
        let plan = r#"{"planned_values": {"root_module": {"resources": [
            {"type": "aws_eip", "name": "orphan"},
            {"address": "aws_eip.ok", "type": "aws_eip"}
        ]}}}"#;
        let (index, report) = Flattener::default()
            .flatten_with_report(plan.as_bytes())
            .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(report.unaddressed_resources, 1);
    }

    #[test]
    fn test_flatten_missing_root_module() {
        let err = flatten(br#"{"format_version": "1.2"}"#, DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(
            err,
            PlanAssertError::Plan(PlanError::RootModuleNotFound { .. })
        ));
    }

    #[test]
    fn test_flatten_root_module_wrong_shape() {
        let err = flatten(br#"{"planned_values": {"root_module": []}}"#, DEFAULT_MAX_DEPTH)
            .unwrap_err();
        assert!(matches!(
            err,
            PlanAssertError::Plan(PlanError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_flatten_malformed_document() {
        let err = flatten(b"not json", DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(
            err,
            PlanAssertError::Query(QueryError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_flatten_empty_root_module() {
        let (index, report) = Flattener::default()
            .flatten_with_report(br#"{"planned_values": {"root_module": {}}}"#)
            .unwrap();
        assert!(index.is_empty());
        assert_eq!(report.modules_visited, 1);
        assert!(!report.is_lossy());
    }
}
