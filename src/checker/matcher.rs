//! One-sided containment check for a single expected resource.

use tracing::debug;

use crate::plan::{FieldMap, ResourceIndex, normalize};

use super::diff::{DiffEntry, DiffRecord, WANT_EXIST};
use super::expected::ExpectedResource;

/// Checks that the index contains the expected resource.
///
/// The address must exist, then every expected metadata field and every
/// expected value must be present with a normalized-equal value. Fields in
/// the index that the expectation does not mention are ignored.
///
/// Stops at the first mismatch, which is appended to `diff`. Nothing is
/// appended when the check passes.
pub fn contains(index: &ResourceIndex, expected: &ExpectedResource, diff: &mut DiffRecord) -> bool {
    let Some(record) = index.get(&expected.address) else {
        debug!("Resource {} not found in plan", expected.address);
        diff.push(DiffEntry::missing(&expected.address, WANT_EXIST));
        return false;
    };

    fields_match(&record.metadata, &expected.metadata, diff)
        && fields_match(&record.values, &expected.values, diff)
}

fn fields_match(actual: &FieldMap, expected: &FieldMap, diff: &mut DiffRecord) -> bool {
    for (key, want) in expected {
        let want = normalize(want);
        match actual.get(key) {
            None => {
                diff.push(DiffEntry::missing(key, want));
                return false;
            }
            Some(got) if *got != want => {
                diff.push(DiffEntry::new(key, want, got));
                return false;
            }
            Some(_) => {}
        }
    }
    true
}
