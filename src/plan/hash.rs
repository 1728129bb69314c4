//! Plan fingerprints.
//!
//! Two digests identify a plan in reports: one over the raw bytes and one
//! over the flattened index. The index digest ignores formatting, so the
//! same plan pretty-printed differently hashes the same.

use sha2::{Digest, Sha256};

use super::index::{Bucket, ResourceIndex};

/// Hasher for computing plan fingerprints.
#[derive(Debug, Default)]
pub struct PlanHasher;

impl PlanHasher {
    /// Creates a new plan hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of the raw plan bytes.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    /// Computes a hash of a flattened index.
    ///
    /// Iteration order of the index is sorted, so the digest is deterministic.
    #[must_use]
    pub fn hash_index(&self, index: &ResourceIndex) -> String {
        let mut hasher = Sha256::new();

        for (address, record) in index.iter() {
            hasher.update(address.as_bytes());
            hasher.update([0u8]);
            for bucket in [Bucket::Metadata, Bucket::Values] {
                hasher.update(bucket.to_string().as_bytes());
                hasher.update([0u8]);
                for (key, value) in record.bucket(bucket) {
                    hasher.update(key.as_bytes());
                    hasher.update([0u8]);
                    hasher.update(value.as_bytes());
                    hasher.update([0u8]);
                }
            }
            // Record terminator.
            hasher.update([0xffu8]);
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }
}
