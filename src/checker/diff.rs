//! Diff records.
//!
//! A [`DiffRecord`] collects mismatches in the order they were detected.
//! Rendering produces one line per mismatch:
//!
//! ```text
//! key "type": want "other_job", got "nomad_job"
//! ```

use serde::Serialize;
use std::fmt::{self, Write};

/// Wanted value recorded when an address is missing from the plan.
pub const WANT_EXIST: &str = "exist";
/// Wanted value recorded when the plan has an address nobody expected.
pub const WANT_EXIST_IN_RESOURCES: &str = "exist in resources";
/// Actual value recorded when something is missing.
pub const GOT_NIL: &str = "nil";

/// A single mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    /// Address or field key that differs.
    pub key: String,
    /// What the caller expected.
    pub want: String,
    /// What the plan contains.
    pub got: String,
}

impl DiffEntry {
    /// Creates a mismatch entry.
    #[must_use]
    pub fn new(key: impl Into<String>, want: impl Into<String>, got: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            want: want.into(),
            got: got.into(),
        }
    }

    /// Creates an entry for something absent from the plan.
    #[must_use]
    pub fn missing(key: impl Into<String>, want: impl Into<String>) -> Self {
        Self::new(key, want, GOT_NIL)
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key \"{}\": want \"{}\", got \"{}\"", self.key, self.want, self.got)
    }
}

/// Ordered, append-only list of mismatches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffRecord {
    entries: Vec<DiffEntry>,
}

impl DiffRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a mismatch.
    pub fn push(&mut self, entry: DiffEntry) {
        self.entries.push(entry);
    }

    /// Returns the mismatches in detection order.
    #[must_use]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Returns the first mismatch detected.
    #[must_use]
    pub fn first(&self) -> Option<&DiffEntry> {
        self.entries.first()
    }

    /// Returns the number of mismatches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing mismatched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every mismatch as one line, in detection order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            let _ = writeln!(output, "{entry}");
        }
        output
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<'a> IntoIterator for &'a DiffRecord {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(DiffRecord::new().render(), "");
    }

    #[test]
    fn test_render_insertion_order() {
        let mut diff = DiffRecord::new();
        diff.push(DiffEntry::new("type", "other_job", "nomad_job"));
        diff.push(DiffEntry::missing("module.vpc.aws_eip.nat[3]", WANT_EXIST));

        assert_eq!(
            diff.render(),
            "key \"type\": want \"other_job\", got \"nomad_job\"\n\
             key \"module.vpc.aws_eip.nat[3]\": want \"exist\", got \"nil\"\n"
        );
        assert_eq!(diff.to_string(), diff.render());
        assert_eq!(diff.first().map(|e| e.key.as_str()), Some("type"));
    }

    #[test]
    fn test_render_keeps_values_verbatim() {
        let mut diff = DiffRecord::new();
        diff.push(DiffEntry::new("datacenters", r#"["dc2"]"#, r#"["dc1"]"#));
        assert_eq!(
            diff.render(),
            "key \"datacenters\": want \"[\"dc2\"]\", got \"[\"dc1\"]\"\n"
        );
    }

    #[test]
    fn test_serialize() {
        let mut diff = DiffRecord::new();
        diff.push(DiffEntry::missing("abc", "xpto"));
        assert_eq!(
            serde_json::to_string(&diff).unwrap(),
            r#"[{"key":"abc","want":"xpto","got":"nil"}]"#
        );
    }
}
