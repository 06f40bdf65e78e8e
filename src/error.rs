use thiserror::Error;

/// The error taxonomy for every fallible operation in this crate.
///
/// These are kinds, not a hierarchy of types: every operation that can
/// fail at all returns exactly one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An empty key where a non-empty key is required, a key longer than
    /// `max_length_in_bits`, or some other caller-supplied argument that
    /// the engine cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mutation through a bounded view (sub-map, head-map, tail-map,
    /// prefix-map) targeted a key outside that view's bounds.
    #[error("key is out of range for this view")]
    OutOfRange,

    /// A fail-fast iterator or view observed a structural change to the
    /// engine since it was created.
    #[error("trie was structurally modified since this iterator was created")]
    ConcurrentModification,

    /// `first_key`/`last_key` (or similar) was called on an empty map, or
    /// an iterator was advanced past its last element.
    #[error("no such element")]
    NotFound,

    /// A key or value failed to encode/decode during `to_bytes`/`from_bytes`
    /// (a malformed or truncated byte stream, or an `rmp_serde` failure).
    /// Note this is unrelated to `BitCodec::bit_at` being called with an
    /// out-of-range index: that is a codec implementation bug and panics,
    /// per `BitCodec`'s own contract, rather than raising this variant.
    #[error("codec error: {0}")]
    CodecError(String),
}

/// Convenience alias used throughout this crate's public API.
pub type Result<T> = std::result::Result<T, Error>;
