//! Configuration module for the plan assertion toolkit.
//!
//! This module handles the expectations file:
//! - Parsing and deserializing `tfplan-assert.yaml`
//! - Environment overrides and `.env` loading
//! - Validation of configuration values

mod parser;
mod spec;
mod validator;

pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_MAX_DEPTH, ENV_MODE, ENV_PLAN, find_config_file,
};
pub use spec::{AssertConfig, PlanConfig};
pub use validator::{ConfigValidator, MAX_DEPTH_LIMIT, ValidationError, ValidationResult};
