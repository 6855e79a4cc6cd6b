use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TypeError;

/// Content-addressed identifier for any indexed object.
///
/// An `ObjectId` is the 32-byte hash of an object's content. Identical
/// content always produces the same `ObjectId`. For probing, the hash can be
/// read as a sequence of little-endian 32-bit words (see [`ObjectId::word`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// Width of the hash in bytes.
    pub const LEN: usize = 32;

    /// Number of 32-bit words the hash can be split into.
    pub const WORDS: usize = Self::LEN / 4;

    /// Compute an `ObjectId` from raw bytes (plain BLAKE3, no domain tag).
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create an `ObjectId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// A random `ObjectId`, for tests and load generation.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// The null object ID (all zeros). Represents "no object".
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null object ID.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The `index`-th 32-bit word of the hash, little-endian.
    ///
    /// # Panics
    ///
    /// Panics if `index >= ObjectId::WORDS`.
    pub fn word(&self, index: usize) -> u32 {
        let start = index * 4;
        u32::from_le_bytes([
            self.0[start],
            self.0[start + 1],
            self.0[start + 2],
            self.0[start + 3],
        ])
    }

    /// Build an ID whose leading words are `words` (little-endian) and whose
    /// remaining bytes are taken from `tail`.
    ///
    /// Used to construct IDs that deliberately collide on probe slots.
    pub fn with_words(words: &[u32], tail: &[u8; 32]) -> Self {
        let mut bytes = *tail;
        for (i, w) in words.iter().take(Self::WORDS).enumerate() {
            bytes[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
        }
        Self(bytes)
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ObjectId> for [u8; 32] {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

// Content records reference objects by hex, the way they are displayed.
impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_bytes_is_deterministic() {
        let data = b"hello world";
        let id1 = ObjectId::from_bytes(data);
        let id2 = ObjectId::from_bytes(data);
        assert_eq!(id1, id2);
    }

    #[test]
    fn different_data_produces_different_ids() {
        let id1 = ObjectId::from_bytes(b"hello");
        let id2 = ObjectId::from_bytes(b"world");
        assert_ne!(id1, id2);
    }

    #[test]
    fn null_is_all_zeros() {
        let null = ObjectId::null();
        assert!(null.is_null());
        assert_eq!(null.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn hex_roundtrip() {
        let id = ObjectId::from_bytes(b"test");
        let parsed = ObjectId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_hex_rejects_short_input() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            ObjectId::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn words_are_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        bytes[4] = 0x02;
        bytes[7] = 0x80;
        let id = ObjectId::from_hash(bytes);
        assert_eq!(id.word(0), 1);
        assert_eq!(id.word(1), 0x8000_0002);
        assert_eq!(id.word(7), 0);
    }

    #[test]
    fn with_words_overrides_prefix_only() {
        let tail = [0xaa; 32];
        let id = ObjectId::with_words(&[7, 9], &tail);
        assert_eq!(id.word(0), 7);
        assert_eq!(id.word(1), 9);
        assert_eq!(id.word(2), 0xaaaa_aaaa);
    }

    #[test]
    fn ephemeral_ids_differ() {
        assert_ne!(ObjectId::ephemeral(), ObjectId::ephemeral());
    }

    #[test]
    fn display_is_full_hex() {
        let id = ObjectId::from_bytes(b"test");
        let display = format!("{id}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, id.to_hex());
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ObjectId::from_bytes(b"serde test");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    proptest! {
        #[test]
        fn words_reassemble_the_hash(bytes in proptest::array::uniform32(any::<u8>())) {
            let id = ObjectId::from_hash(bytes);
            let mut rebuilt = [0u8; 32];
            for i in 0..ObjectId::WORDS {
                rebuilt[i * 4..i * 4 + 4].copy_from_slice(&id.word(i).to_le_bytes());
            }
            prop_assert_eq!(rebuilt, bytes);
        }
    }
}
