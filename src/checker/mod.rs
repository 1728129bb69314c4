//! Comparing flattened plans with expectations.
//!
//! This module checks a [`ResourceIndex`](crate::plan::ResourceIndex)
//! against caller-supplied expectations:
//! - [`contains`]: one expected resource, one-sided
//! - [`equal`]: a full expected set, in both directions
//! - [`CheckReport`]: a whole expectation file in either mode
//!
//! Mismatches are data, collected in a [`DiffRecord`], never errors.

mod comparator;
mod diff;
mod expected;
mod matcher;
mod report;

pub use comparator::equal;
pub use diff::{DiffEntry, DiffRecord, GOT_NIL, WANT_EXIST, WANT_EXIST_IN_RESOURCES};
pub use expected::ExpectedResource;
pub use matcher::contains;
pub use report::{CheckMode, CheckReport};
