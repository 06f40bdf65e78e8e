//! The two serialization modes from this crate's binary format.
//!
//! `Options::write_keys == false` (the default) walks the tree in preorder
//! and writes one tag byte per node (`has_value | has_left<<1 |
//! has_right<<2`) followed by a msgpack-encoded value wherever `has_value`
//! is set; keys are never written; the decoder rebuilds each key from the
//! bit path it walked to reach that node, exactly as `resolve_key` does for
//! an in-memory node with no cached key. This is the compact form: it costs
//! one byte per trie node (including value-less routing nodes) plus the
//! encoded values, and nothing for keys.
//!
//! `Options::write_keys == true` writes a plain count followed by
//! `(key, value)` pairs in ascending order; larger on disk when keys are
//! short, but order-independent of the tree's internal shape and simpler
//! for a reader in another language to consume.
//!
//! Both interleave `rmp_serde` (msgpack is self-terminating, so no explicit
//! length prefix is needed around each value) with manual big-endian
//! framing for the handful of raw integers (tags, counts) the format needs.
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::BitCodec;
use crate::error::{Error, Result};
use crate::node::{Arena, NodeId};
use crate::trie::{BitTrie, Inner, Options};

const TAG_HAS_VALUE: u8 = 0b001;
const TAG_HAS_LEFT: u8 = 0b010;
const TAG_HAS_RIGHT: u8 = 0b100;

impl<C, V> BitTrie<C, V>
where
    C: BitCodec,
    C::Key: Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Serialize this trie to bytes, in the mode selected by
    /// `self.options().write_keys`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if self.options.write_keys {
            self.write_flat(&mut buf)?;
        } else {
            self.write_tree(&mut buf)?;
        }
        Ok(buf)
    }

    fn write_flat(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(&(self.len() as u64).to_be_bytes());
        for item in self.iter() {
            let (key, value) = item?;
            encode_value(buf, &key)?;
            encode_value(buf, &value)?;
        }
        Ok(())
    }

    fn write_tree(&self, buf: &mut Vec<u8>) -> Result<()> {
        let inner = self.borrow();
        if let Some(root) = inner.root {
            encode_node(buf, &inner.arena, root)?;
        }
        Ok(())
    }

    /// Rebuild a trie from bytes produced by [`BitTrie::to_bytes`].
    ///
    /// `options.write_keys` selects which of the two formats to expect; it
    /// must match what produced `bytes`.
    pub fn from_bytes(codec: C, options: Options, bytes: &[u8]) -> Result<Self> {
        let trie = BitTrie::with_options(codec, options);
        let mut cursor = bytes;
        if options.write_keys {
            read_flat(&mut cursor, &trie)?;
        } else if !cursor.is_empty() {
            let mut inner = trie.borrow_mut();
            let mut bits = Vec::new();
            let root = decode_node(&mut cursor, &mut inner, None, &mut bits, trie.codec(), options.cache_keys)?;
            inner.root = Some(root);
        }
        Ok(trie)
    }
}

fn encode_value<T: Serialize>(buf: &mut Vec<u8>, value: &T) -> Result<()> {
    let mut serializer = rmp_serde::Serializer::new(&mut *buf);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::CodecError(e.to_string()))
}

fn decode_value<T: DeserializeOwned>(cursor: &mut &[u8]) -> Result<T> {
    let mut deserializer = rmp_serde::Deserializer::new(&mut *cursor);
    serde::Deserialize::deserialize(&mut deserializer).map_err(|e| Error::CodecError(e.to_string()))
}

fn read_flat<C, V>(cursor: &mut &[u8], trie: &BitTrie<C, V>) -> Result<()>
where
    C: BitCodec,
    C::Key: Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    if cursor.len() < 8 {
        return Err(Error::CodecError("truncated entry count".into()));
    }
    let count = u64::from_be_bytes(cursor[..8].try_into().unwrap());
    *cursor = &cursor[8..];
    for _ in 0..count {
        let key: C::Key = decode_value(cursor)?;
        let value: V = decode_value(cursor)?;
        trie.put(&key, value)?;
    }
    Ok(())
}

fn encode_node<K: Serialize, V: Serialize>(
    buf: &mut Vec<u8>,
    arena: &Arena<K, V>,
    node: NodeId,
) -> Result<()> {
    let n = arena.get(node);
    let mut tag = 0u8;
    if n.value.is_some() {
        tag |= TAG_HAS_VALUE;
    }
    if n.left.is_some() {
        tag |= TAG_HAS_LEFT;
    }
    if n.right.is_some() {
        tag |= TAG_HAS_RIGHT;
    }
    buf.push(tag);
    if let Some(v) = &n.value {
        encode_value(buf, v)?;
    }
    if let Some(l) = n.left {
        encode_node(buf, arena, l)?;
    }
    if let Some(r) = n.right {
        encode_node(buf, arena, r)?;
    }
    Ok(())
}

/// Depth is bounded by the codec's `max_length_in_bits` (32 for the IPv4
/// CIDR codec, a few hundred at most for the string codec), so plain
/// recursion here never risks overflowing the stack the way an unbounded
/// user-supplied tree might.
fn decode_node<C, V>(
    cursor: &mut &[u8],
    inner: &mut Inner<C::Key, V>,
    parent: Option<NodeId>,
    bits: &mut Vec<bool>,
    codec: &C,
    cache_keys: bool,
) -> Result<NodeId>
where
    C: BitCodec,
    C::Key: Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    if cursor.is_empty() {
        return Err(Error::CodecError("truncated node tag".into()));
    }
    let tag = cursor[0];
    *cursor = &cursor[1..];
    let id = inner.arena.alloc(parent);

    if tag & TAG_HAS_VALUE != 0 {
        let value: V = decode_value(cursor)?;
        let node = inner.arena.get_mut(id);
        node.value = Some(value);
        if cache_keys {
            node.cached_key = Some(codec.recreate_key(bits, bits.len()));
        }
        inner.len += 1;
    }
    if tag & TAG_HAS_LEFT != 0 {
        bits.push(false);
        let child = decode_node(cursor, inner, Some(id), bits, codec, cache_keys)?;
        bits.pop();
        inner.arena.get_mut(id).left = Some(child);
    }
    if tag & TAG_HAS_RIGHT != 0 {
        bits.push(true);
        let child = decode_node(cursor, inner, Some(id), bits, codec, cache_keys)?;
        bits.pop();
        inner.arena.get_mut(id).right = Some(child);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr_codec::Ipv4CidrCodec;

    fn build() -> BitTrie<Ipv4CidrCodec, u32> {
        let trie = BitTrie::new(Ipv4CidrCodec);
        trie.put(&"10.0.0.0/8".parse().unwrap(), 1).unwrap();
        trie.put(&"10.1.0.0/16".parse().unwrap(), 2).unwrap();
        trie.put(&"192.168.0.0/16".parse().unwrap(), 3).unwrap();
        trie
    }

    #[test]
    fn tree_mode_round_trip() {
        let trie = build();
        let bytes = trie.to_bytes().unwrap();
        let restored =
            BitTrie::<Ipv4CidrCodec, u32>::from_bytes(Ipv4CidrCodec, Options::default(), &bytes)
                .unwrap();
        assert_eq!(restored.len(), trie.len());
        for item in trie.iter() {
            let (k, v) = item.unwrap();
            assert_eq!(restored.get(&k).unwrap(), Some(v));
        }
    }

    #[test]
    fn flat_mode_round_trip() {
        let options = Options {
            write_keys: true,
            cache_keys: false,
        };
        let trie = BitTrie::with_options(Ipv4CidrCodec, options);
        trie.put(&"10.0.0.0/8".parse().unwrap(), 1).unwrap();
        trie.put(&"192.168.0.0/16".parse().unwrap(), 3).unwrap();
        let bytes = trie.to_bytes().unwrap();
        let restored =
            BitTrie::<Ipv4CidrCodec, u32>::from_bytes(Ipv4CidrCodec, options, &bytes).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(&"10.0.0.0/8".parse().unwrap()).unwrap(), Some(1));
    }
}
