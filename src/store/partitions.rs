/// Key layout and encoding utilities for Fjall partitions
///
/// Partition structure:
/// - `classes`: {oid:be64} -> ClassRecord (JSON)
/// - `states`: {oid:be64} -> StateRecord (JSON)
/// - `meta`: root -> {oid:be64}
///
/// Big-endian ids keep the partitions in numeric id order.
use crate::graph::ObjectId;

pub const CLASSES: &str = "classes";
pub const STATES: &str = "states";
pub const META: &str = "meta";

/// Metadata key holding the root object id
pub const ROOT_KEY: &[u8] = b"root";

/// Encode an object key: {oid:be64}
pub fn encode_oid_key(oid: ObjectId) -> [u8; 8] {
    oid.to_be_bytes()
}

/// Decode an object key; `None` unless exactly eight bytes
pub fn decode_oid_key(key: &[u8]) -> Option<ObjectId> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(ObjectId::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_key_encoding() {
        let key = encode_oid_key(0x0102);
        assert_eq!(key, [0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(decode_oid_key(&key), Some(0x0102));
    }

    #[test]
    fn test_oid_keys_sort_numerically() {
        assert!(encode_oid_key(9) < encode_oid_key(10));
        assert!(encode_oid_key(255) < encode_oid_key(256));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(decode_oid_key(b"root"), None);
        assert_eq!(decode_oid_key(&[0; 9]), None);
    }
}
