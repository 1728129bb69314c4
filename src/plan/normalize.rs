//! Value normalization.
//!
//! Plans may pretty-print JSON-encoded attribute values (list literals,
//! policy documents) with incidental whitespace. Normalizing both sides of a
//! comparison keeps that formatting from affecting equality.

/// Removes every newline and space character from a scalar's text.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\n' && *c != ' ').collect()
}
