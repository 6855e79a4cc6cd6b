use oix_types::ObjectId;

use crate::hasher::ContentHasher;

/// Integrity check applied to content fetched from a store.
///
/// `expected` is the hash the content must match. When a hash has been
/// redirected to a replacement, callers pass the replacement target here.
pub trait IntegrityCheck {
    /// Returns `true` if `data`, read as an object of kind `kind_name`,
    /// hashes to `expected`.
    fn verify(&self, expected: &ObjectId, data: &[u8], kind_name: &str) -> bool;
}

/// Verifies content by recomputing its domain-separated hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigestVerifier;

impl IntegrityCheck for DigestVerifier {
    fn verify(&self, expected: &ObjectId, data: &[u8], kind_name: &str) -> bool {
        ContentHasher::for_name(kind_name).verify(data, expected)
    }
}
