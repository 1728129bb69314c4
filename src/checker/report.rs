//! Running a whole expectation set against a plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::plan::{Plan, PlanHasher};

use super::comparator::equal;
use super::diff::DiffRecord;
use super::expected::ExpectedResource;
use super::matcher::contains;

/// How an expectation set is compared with a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Every expectation must be found; extra plan resources are allowed.
    #[default]
    Contains,
    /// The plan must hold exactly the expected resources.
    Equal,
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Contains => "contains",
            Self::Equal => "equal",
        };
        write!(f, "{s}")
    }
}

/// Outcome of checking an expectation set against a plan.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Comparison mode used.
    pub mode: CheckMode,
    /// Whether every check passed.
    pub passed: bool,
    /// Number of expected resources.
    pub expected_resources: usize,
    /// Number of resources in the plan.
    pub indexed_resources: usize,
    /// Expected addresses that failed, in contains mode.
    pub failed_resources: Vec<String>,
    /// Mismatches, in detection order.
    pub diff: DiffRecord,
    /// SHA-256 of the plan bytes.
    pub plan_digest: String,
    /// Whether flattening skipped or overwrote part of the plan.
    pub lossy_flatten: bool,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    /// Checks an expectation set against a flattened plan.
    ///
    /// In [`CheckMode::Contains`] every expectation is checked and all
    /// mismatches are collected. In [`CheckMode::Equal`] the comparison
    /// stops at the first mismatch.
    #[must_use]
    pub fn run(mode: CheckMode, expected: &[ExpectedResource], plan: &Plan) -> Self {
        let index = &plan.resources;
        let mut diff = DiffRecord::new();
        let mut failed_resources = Vec::new();

        let passed = match mode {
            CheckMode::Contains => {
                for resource in expected {
                    if !contains(index, resource, &mut diff) {
                        failed_resources.push(resource.address.clone());
                    }
                }
                failed_resources.is_empty()
            }
            CheckMode::Equal => equal(expected, index, &mut diff),
        };

        if plan.report.is_lossy() {
            warn!("Plan was flattened lossily; results may be incomplete");
        }
        info!(
            "Checked {} expected resources against {} planned ({mode}): {}",
            expected.len(),
            index.len(),
            if passed { "passed" } else { "failed" }
        );

        Self {
            mode,
            passed,
            expected_resources: expected.len(),
            indexed_resources: index.len(),
            failed_resources,
            diff,
            plan_digest: PlanHasher::new().hash_bytes(plan.document.data()),
            lossy_flatten: plan.report.is_lossy(),
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DEFAULT_MAX_DEPTH, PlanDocument, fixtures};

    fn module_plan() -> Plan {
        Plan::from_document(PlanDocument::from_bytes(fixtures::MODULE_PLAN), DEFAULT_MAX_DEPTH)
            .unwrap()
    }

    #[test]
    fn test_contains_mode_collects_every_failure() {
        let expected = vec![
            ExpectedResource::new("aws_instance.web"),
            ExpectedResource::new("aws_s3_bucket.logs").with_value("acl", "private"),
            ExpectedResource::new("module.vpc.aws_eip.nat[0]").with_value("vpc", "false"),
        ];
        let report = CheckReport::run(CheckMode::Contains, &expected, &module_plan());

        assert!(!report.passed);
        assert_eq!(
            report.failed_resources,
            vec!["aws_instance.web", "module.vpc.aws_eip.nat[0]"]
        );
        assert_eq!(report.diff.len(), 2);
        assert_eq!(report.indexed_resources, 5);
        assert_eq!(report.plan_digest.len(), 64);
    }

    #[test]
    fn test_contains_mode_passes_on_subset() {
        let expected = vec![ExpectedResource::new("aws_s3_bucket.logs")];
        let report = CheckReport::run(CheckMode::Contains, &expected, &module_plan());

        assert!(report.passed);
        assert!(report.diff.is_empty());
        assert!(!report.lossy_flatten);
    }

    #[test]
    fn test_equal_mode_rejects_subset() {
        let expected = vec![ExpectedResource::new("aws_s3_bucket.logs")];
        let report = CheckReport::run(CheckMode::Equal, &expected, &module_plan());

        assert!(!report.passed);
        assert!(report.failed_resources.is_empty());
        assert_eq!(
            report.diff.render(),
            "key \"module.db.module.db_subnet_group.aws_db_subnet_group.this[0]\": \
             want \"exist in resources\", got \"nil\"\n"
        );
    }

    #[test]
    fn test_check_mode_serde() {
        let mode: CheckMode = serde_yaml::from_str("equal").unwrap();
        assert_eq!(mode, CheckMode::Equal);
        assert_eq!(CheckMode::default().to_string(), "contains");
    }
}
