// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # tfplan-assert
//!
//! Assertions over Terraform plans, for infrastructure unit tests.
//!
//! ## Overview
//!
//! `terraform show -json` describes a plan as a tree of modules, each holding
//! a list of resources. This crate flattens that tree into a
//! [`ResourceIndex`] keyed by resource address, then checks expected
//! resources against it:
//!
//! - [`contains`] checks that one expected resource is in the plan
//! - [`equal`] checks that the plan holds exactly the expected set
//! - every mismatch is recorded in a [`DiffRecord`]
//!
//! Expected values are compared after [`normalize`], which strips spaces and
//! newlines, so `["dc1"]` and `[ "dc1" ]` compare equal.
//!
//! ## Modules
//!
//! - [`plan`]: Plan reading, flattening and hashing
//! - [`query`]: Path expressions over JSON documents
//! - [`checker`]: Matching, comparison and diff reporting
//! - [`config`]: Expectations file parsing and validation
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use tfplan_assert::{DiffRecord, ExpectedResource, Plan, contains};
//!
//! # fn main() -> tfplan_assert::Result<()> {
//! let plan = Plan::read("terraform.plan.json", tfplan_assert::DEFAULT_MAX_DEPTH)?;
//! let expected = ExpectedResource::new("module.job.nomad_job.test_job")
//!     .with_metadata("type", "nomad_job")
//!     .with_value("datacenters", r#"[ "dc1" ]"#);
//!
//! let mut diff = DiffRecord::new();
//! if !contains(&plan.resources, &expected, &mut diff) {
//!     eprint!("{}", diff.render());
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod plan;
pub mod query;

// ============================================================================
// Re-exports
// ============================================================================

pub use checker::{
    CheckMode, CheckReport, DiffEntry, DiffRecord, ExpectedResource, contains, equal,
};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{AssertConfig, ConfigParser, ConfigValidator};
pub use error::{PlanAssertError, Result};
pub use plan::{
    DEFAULT_MAX_DEPTH, FlattenReport, Flattener, Plan, PlanDocument, PlanHasher, ResourceIndex,
    ResourceRecord, flatten, normalize,
};
pub use query::{PathExpr, QueryResult};
