//! Configuration specification types.
//!
//! This module defines the structs that map to the `tfplan-assert.yaml`
//! expectations file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::checker::{CheckMode, ExpectedResource};
use crate::plan::DEFAULT_MAX_DEPTH;

/// The root structure of an expectations file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertConfig {
    /// Which plan to check and how to read it.
    #[serde(default)]
    pub plan: PlanConfig,
    /// Comparison mode.
    #[serde(default)]
    pub mode: CheckMode,
    /// Expected resources.
    #[serde(default)]
    pub resources: Vec<ExpectedResource>,
}

/// Plan source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanConfig {
    /// Path to the plan JSON, relative to the expectations file.
    #[serde(default)]
    pub path: String,
    /// Maximum module nesting depth to traverse.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl AssertConfig {
    /// Resolves the plan path against the directory of the expectations
    /// file. Absolute paths are returned unchanged.
    #[must_use]
    pub fn plan_path(&self, base_dir: Option<&Path>) -> PathBuf {
        let path = Path::new(&self.plan.path);
        match base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
