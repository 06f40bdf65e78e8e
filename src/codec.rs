use std::cmp::Ordering;
use std::fmt::Debug;

/// Exposes a key as a fixed-length bit sequence and rebuilds a key from one.
///
/// Implementations must satisfy the round-trip law: for every legal key
/// `k`, `recreate_key(bits_of(k), length_in_bits(k)) == k`, where
/// `bits_of(k)[i] == bit_at(k, i)` for `0 <= i < length_in_bits(k)`.
pub trait BitCodec: Clone {
    /// The key type this codec knows how to turn into bits and back.
    type Key: Clone + Eq + Debug;

    /// Total bit length of `key`. Must be greater than zero and at most
    /// `max_length_in_bits()`.
    fn length_in_bits(&self, key: &Self::Key) -> usize;

    /// The `index`-th bit of `key`, `0 <= index < length_in_bits(key)`.
    ///
    /// # Panics
    ///
    /// Implementations should panic if `index` is out of range for `key`;
    /// this only happens if the engine itself has a bug, since it never
    /// calls `bit_at` outside `0..length_in_bits(key)`.
    fn bit_at(&self, key: &Self::Key, index: usize) -> bool;

    /// Upper bound on `length_in_bits` applied to every key this codec
    /// will ever be asked to encode.
    fn max_length_in_bits(&self) -> usize;

    /// Rebuild a key from its bit sequence and length. `bits` holds at
    /// least `length` entries; only the first `length` are significant.
    fn recreate_key(&self, bits: &[bool], length: usize) -> Self::Key;

    /// An ordering over keys that agrees with the lexicographic bit order
    /// `bit_at` induces: shorter keys sort before any of their strict
    /// extensions, and otherwise the first differing bit decides.
    ///
    /// The default implementation is correct for any codec and only needs
    /// overriding if a codec can compare keys more cheaply than bit by bit.
    fn comparator(&self, a: &Self::Key, b: &Self::Key) -> Ordering {
        let len_a = self.length_in_bits(a);
        let len_b = self.length_in_bits(b);
        let shared = len_a.min(len_b);
        for i in 0..shared {
            match (self.bit_at(a, i), self.bit_at(b, i)) {
                (false, true) => return Ordering::Less,
                (true, false) => return Ordering::Greater,
                _ => {}
            }
        }
        len_a.cmp(&len_b)
    }
}
