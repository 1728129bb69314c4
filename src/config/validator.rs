//! Configuration validation for expectations files.
//!
//! This module checks an expectations file before any plan is read, so
//! mistakes in the file are reported as configuration errors instead of
//! surfacing as confusing diffs.

use crate::checker::CheckMode;
use crate::error::{ConfigError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::spec::AssertConfig;

/// Largest accepted traversal depth.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Validator for expectations files.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ValidationResult {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an expectations file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateAddress`] if an address is expected
    /// twice, otherwise the first error found, if any.
    pub fn validate(&self, config: &AssertConfig) -> Result<ValidationResult> {
        Self::ensure_unique_addresses(config)?;

        let result = self.check(config);
        if let Some(first_error) = result.errors.first() {
            return Err(
                ConfigError::validation(first_error.message.clone(), first_error.field.clone())
                    .into(),
            );
        }

        debug!("Configuration validation passed");
        Ok(result)
    }

    /// Collects every error and warning without failing.
    #[must_use]
    pub fn check(&self, config: &AssertConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_plan(config, &mut result);
        Self::validate_resources(config, &mut result);

        result
    }

    /// Fails on the first address that is expected twice.
    fn ensure_unique_addresses(config: &AssertConfig) -> Result<()> {
        let mut seen = HashSet::new();
        for resource in &config.resources {
            if !seen.insert(resource.address.as_str()) {
                return Err(ConfigError::DuplicateAddress {
                    address: resource.address.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Validates the plan section.
    fn validate_plan(config: &AssertConfig, result: &mut ValidationResult) {
        if config.plan.path.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("plan.path"),
                message: String::from("Plan path cannot be empty"),
            });
        }

        let depth = config.plan.max_depth;
        if depth == 0 {
            result.errors.push(ValidationError {
                field: String::from("plan.max_depth"),
                message: String::from("max_depth must be at least 1"),
            });
        } else if depth > MAX_DEPTH_LIMIT {
            result.errors.push(ValidationError {
                field: String::from("plan.max_depth"),
                message: format!(
                    "max_depth {depth} exceeds the limit of {MAX_DEPTH_LIMIT}"
                ),
            });
        }
    }

    /// Validates the expected resources.
    fn validate_resources(config: &AssertConfig, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, resource) in config.resources.iter().enumerate() {
            let field = format!("resources[{i}].address");

            if resource.address.trim().is_empty() {
                result.errors.push(ValidationError {
                    field,
                    message: String::from("Resource address cannot be empty"),
                });
                continue;
            }

            if !seen.insert(resource.address.as_str()) {
                result.errors.push(ValidationError {
                    field,
                    message: ConfigError::DuplicateAddress {
                        address: resource.address.clone(),
                    }
                    .to_string(),
                });
                continue;
            }

            if resource.is_presence_only() {
                result.warnings.push(format!(
                    "{} asserts no fields, only that it exists",
                    resource.address
                ));
            }
        }

        if config.mode == CheckMode::Equal && config.resources.is_empty() {
            result
                .warnings
                .push(String::from("equal mode with no resources only passes on an empty plan"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ExpectedResource;
    use crate::error::PlanAssertError;

    fn valid_config() -> AssertConfig {
        let mut config = AssertConfig::default();
        config.plan.path = String::from("terraform.plan.json");
        config.resources = vec![
            ExpectedResource::new("aws_s3_bucket.logs").with_metadata("type", "aws_s3_bucket"),
        ];
        config
    }

    #[test]
    fn test_valid_config() {
        let result = ConfigValidator::new().validate(&valid_config()).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_plan_path() {
        let mut config = valid_config();
        config.plan.path = String::new();

        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(
            err,
            PlanAssertError::Config(ConfigError::ValidationError { field: Some(ref f), .. }) if f == "plan.path"
        ));
    }

    #[test]
    fn test_depth_bounds() {
        let mut config = valid_config();
        config.plan.max_depth = 0;
        assert!(!ConfigValidator::new().check(&config).is_valid());

        config.plan.max_depth = MAX_DEPTH_LIMIT + 1;
        assert!(!ConfigValidator::new().check(&config).is_valid());

        config.plan.max_depth = MAX_DEPTH_LIMIT;
        assert!(ConfigValidator::new().check(&config).is_valid());
    }

    #[test]
    fn test_duplicate_addresses() {
        let mut config = valid_config();
        config.resources.push(ExpectedResource::new("aws_s3_bucket.logs"));

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "resources[1].address");

        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(
            err,
            PlanAssertError::Config(ConfigError::DuplicateAddress { .. })
        ));
    }

    #[test]
    fn test_warnings() {
        let mut config = valid_config();
        config.resources.push(ExpectedResource::new("aws_eip.nat"));
        let result = ConfigValidator::new().check(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);

        let mut config = valid_config();
        config.resources.clear();
        config.mode = CheckMode::Equal;
        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.warnings.len(), 1);
    }
}
