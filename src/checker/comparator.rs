//! Two-directional comparison of an expected resource set against a plan.

use std::collections::HashSet;
use tracing::debug;

use crate::plan::ResourceIndex;

use super::diff::{DiffEntry, DiffRecord, WANT_EXIST_IN_RESOURCES};
use super::expected::ExpectedResource;
use super::matcher::contains;

/// Checks that the index holds exactly the expected resources.
///
/// Every expectation must pass [`contains`]; the first failure stops the
/// comparison. Then every indexed address must appear among the
/// expectations; the first unexpected address is recorded and stops it.
pub fn equal(expected: &[ExpectedResource], index: &ResourceIndex, diff: &mut DiffRecord) -> bool {
    for resource in expected {
        if !contains(index, resource, diff) {
            return false;
        }
    }

    let wanted: HashSet<&str> = expected.iter().map(|r| r.address.as_str()).collect();
    if let Some(extra) = index.addresses().find(|address| !wanted.contains(address)) {
        debug!("Plan has unexpected resource {extra}");
        diff.push(DiffEntry::missing(extra, WANT_EXIST_IN_RESOURCES));
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DEFAULT_MAX_DEPTH, fixtures, flatten};

    fn module_index() -> ResourceIndex {
        flatten(fixtures::MODULE_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap()
    }

    fn all_module_resources() -> Vec<ExpectedResource> {
        vec![
            ExpectedResource::new("aws_s3_bucket.logs").with_metadata("type", "aws_s3_bucket"),
            ExpectedResource::new("module.vpc.aws_eip.nat[0]").with_value("vpc", "true"),
            ExpectedResource::new("module.vpc.aws_eip.nat[1]"),
            ExpectedResource::new("module.db.module.db_subnet_group.aws_db_subnet_group.this[0]")
                .with_value("name_prefix", "demodb-"),
            ExpectedResource::new("module.eks.aws_eks_cluster.this[0]"),
        ]
    }

    #[test]
    fn test_equal_identical_sets() {
        let mut diff = DiffRecord::new();
        assert!(equal(&all_module_resources(), &module_index(), &mut diff));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_equal_nomad_plan() {
        let index = flatten(fixtures::NOMAD_PLAN.as_bytes(), DEFAULT_MAX_DEPTH).unwrap();
        let expected = vec![
            ExpectedResource::new("module.job.test_job")
                .with_metadata("type", "nomad_job")
                .with_metadata("name", "test_job")
                .with_value("name", "unit-test")
                .with_value("datacenters", r#"["dc1"]"#),
        ];
        let mut diff = DiffRecord::new();
        assert!(equal(&expected, &index, &mut diff), "{diff}");
    }

    #[test]
    fn test_equal_unexpected_resource() {
        let mut expected = all_module_resources();
        expected.retain(|r| r.address != "module.vpc.aws_eip.nat[1]");

        let mut diff = DiffRecord::new();
        assert!(!equal(&expected, &module_index(), &mut diff));
        assert_eq!(
            diff.render(),
            "key \"module.vpc.aws_eip.nat[1]\": want \"exist in resources\", got \"nil\"\n"
        );
    }

    #[test]
    fn test_equal_short_circuits_on_first_failure() {
        let mut expected = all_module_resources();
        expected.insert(0, ExpectedResource::new("aws_instance.web"));
        expected.push(ExpectedResource::new("aws_instance.db"));

        let mut diff = DiffRecord::new();
        assert!(!equal(&expected, &module_index(), &mut diff));
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.entries()[0].key, "aws_instance.web");
    }

    #[test]
    fn test_equal_field_mismatch_skips_completeness() {
        let mut expected = all_module_resources();
        expected.truncate(1);
        expected[0] = expected[0].clone().with_metadata("name", "audit");

        let mut diff = DiffRecord::new();
        assert!(!equal(&expected, &module_index(), &mut diff));
        assert_eq!(diff.entries(), &[DiffEntry::new("name", "audit", "logs")]);
    }

    #[test]
    fn test_equal_empty_sets() {
        let mut diff = DiffRecord::new();
        assert!(equal(&[], &ResourceIndex::new(), &mut diff));
        assert!(!equal(&[], &module_index(), &mut diff));
        assert_eq!(diff.entries()[0].key, "aws_s3_bucket.logs");
    }
}
