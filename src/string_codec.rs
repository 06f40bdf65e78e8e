//! A codec for UTF-8 strings, treated as a flat byte sequence (8 bits per
//! byte, most-significant bit first), giving a PATRICIA-style string trie
//! over the same one-bit-per-level engine used for CIDR blocks.
use crate::codec::BitCodec;

/// Codec for `String` keys. `max_length_in_bits` is fixed at construction so
/// the engine can reject keys that would not fit in a shared-length view
/// (sub-maps, etc.) the same way the CIDR codec rejects an out-of-range
/// mask.
#[derive(Clone, Debug)]
pub struct StringCodec {
    max_bytes: usize,
}

impl StringCodec {
    /// A codec that accepts strings up to `max_bytes` bytes long.
    pub fn new(max_bytes: usize) -> Self {
        StringCodec { max_bytes }
    }
}

impl Default for StringCodec {
    /// 256 bytes is generous for hostnames, short identifiers and the like,
    /// and keeps `max_length_in_bits` comfortably within `usize`.
    fn default() -> Self {
        StringCodec::new(256)
    }
}

impl BitCodec for StringCodec {
    type Key = String;

    fn length_in_bits(&self, key: &String) -> usize {
        key.as_bytes().len() * 8
    }

    fn bit_at(&self, key: &String, index: usize) -> bool {
        let bytes = key.as_bytes();
        let byte_index = index / 8;
        let bit_in_byte = index % 8;
        assert!(
            byte_index < bytes.len(),
            "bit index {index} out of range for {key:?} ({} bytes)",
            bytes.len()
        );
        (bytes[byte_index] >> (7 - bit_in_byte)) & 1 == 1
    }

    fn max_length_in_bits(&self) -> usize {
        self.max_bytes * 8
    }

    fn recreate_key(&self, bits: &[bool], length: usize) -> String {
        let mut bytes = Vec::with_capacity(length.div_ceil(8));
        let mut i = 0;
        while i < length {
            let mut byte = 0u8;
            for b in 0..8 {
                if i + b < length && bits[i + b] {
                    byte |= 1 << (7 - b);
                }
            }
            bytes.push(byte);
            i += 8;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trip() {
        let codec = StringCodec::default();
        for text in ["", "a", "hello", "hello.example.com"] {
            let key = text.to_string();
            let length = codec.length_in_bits(&key);
            let bits: Vec<bool> = (0..length).map(|i| codec.bit_at(&key, i)).collect();
            assert_eq!(codec.recreate_key(&bits, length), key);
        }
    }

    #[test]
    fn shared_prefix_bytes_compare_equal_up_to_shared_length() {
        let codec = StringCodec::default();
        let a = "hello".to_string();
        let b = "help".to_string();
        for i in 0..24 {
            assert_eq!(codec.bit_at(&a, i), codec.bit_at(&b, i), "bit {i} differs");
        }
    }
}
