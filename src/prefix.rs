//! Prefix queries: "what value governs this key" (`longest_prefix_of`,
//! `shortest_prefix_of`) and "what keys/values live under this prefix"
//! (`prefix_of`, `prefixed_by`), plus the live [`crate::view::PrefixMap`]
//! view for the latter. Every operation here takes an `include_self` flag:
//! whether `key` itself, if present, counts as one of its own prefixes.
use crate::codec::BitCodec;
use crate::error::Result;
use crate::node::NodeId;
use crate::trie::BitTrie;
use crate::view::PrefixMap;

impl<C: BitCodec, V: Clone> BitTrie<C, V> {
    /// Every key-bearing node on the bit-by-bit walk from the root to
    /// `key`'s full depth, shallowest first. The node at exactly `key`'s
    /// own depth is included only if `include_self` is set.
    fn ancestors_with_values(&self, key: &C::Key, include_self: bool) -> Vec<NodeId> {
        let inner = self.borrow();
        let length = self.codec.length_in_bits(key);
        let mut cur = inner.root;
        let mut depth = 0;
        let mut found = Vec::new();
        while let Some(node) = cur {
            let n = inner.arena.get(node);
            if n.value.is_some() && (depth < length || include_self) {
                found.push(node);
            }
            if depth == length {
                break;
            }
            let bit = self.codec.bit_at(key, depth);
            cur = if bit { n.right } else { n.left };
            depth += 1;
        }
        found
    }

    /// The value of the longest key that is a prefix of `key`, or `None` if
    /// no such key is present.
    pub fn longest_prefix_of_value(&self, key: &C::Key, include_self: bool) -> Result<Option<V>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors.last().map(|n| inner.value_of(*n).clone()))
    }

    /// The longest key that is itself a prefix of `key`.
    pub fn longest_prefix_of_key(
        &self,
        key: &C::Key,
        include_self: bool,
    ) -> Result<Option<C::Key>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors.last().map(|n| inner.resolve_key(&self.codec, *n)))
    }

    /// The value of the shortest key that is a prefix of `key`.
    pub fn shortest_prefix_of_value(&self, key: &C::Key, include_self: bool) -> Result<Option<V>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors.first().map(|n| inner.value_of(*n).clone()))
    }

    /// The shortest key that is itself a prefix of `key`.
    pub fn shortest_prefix_of_key(
        &self,
        key: &C::Key,
        include_self: bool,
    ) -> Result<Option<C::Key>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors.first().map(|n| inner.resolve_key(&self.codec, *n)))
    }

    /// Every value whose key is a prefix of `key`, shallowest first.
    pub fn prefix_of_values(&self, key: &C::Key, include_self: bool) -> Result<Vec<V>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors
            .iter()
            .map(|n| inner.value_of(*n).clone())
            .collect())
    }

    /// Every key that is a prefix of `key`, shallowest first.
    pub fn prefix_of_keys(&self, key: &C::Key, include_self: bool) -> Result<Vec<C::Key>> {
        self.validate_key(key)?;
        let ancestors = self.ancestors_with_values(key, include_self);
        let inner = self.borrow();
        Ok(ancestors
            .iter()
            .map(|n| inner.resolve_key(&self.codec, *n))
            .collect())
    }

    /// The node whose path exactly matches `key`'s bits, whether or not it
    /// carries a value itself — the anchor for every `prefixed_by_*`
    /// operation.
    fn descend_to_anchor(&self, key: &C::Key) -> Option<NodeId> {
        let inner = self.borrow();
        let length = self.codec.length_in_bits(key);
        let mut cur = inner.root?;
        for depth in 0..length {
            let bit = self.codec.bit_at(key, depth);
            let n = inner.arena.get(cur);
            cur = if bit { n.right? } else { n.left? };
        }
        Some(cur)
    }

    /// Every `(key, value)` pair whose key is `key` itself (if
    /// `include_self`) or a strict extension of it, eagerly collected into
    /// a `Vec` in ascending order.
    pub fn prefixed_by_entries(
        &self,
        key: &C::Key,
        include_self: bool,
    ) -> Result<Vec<(C::Key, V)>> {
        self.validate_key(key)?;
        let Some(anchor) = self.descend_to_anchor(key) else {
            return Ok(Vec::new());
        };
        let inner = self.borrow();
        let mut out = Vec::new();
        let mut cur = inner.first_in_scope(anchor, include_self);
        while let Some(node) = cur {
            out.push((
                inner.resolve_key(&self.codec, node),
                inner.value_of(node).clone(),
            ));
            cur = inner.successor(node, Some(anchor));
        }
        Ok(out)
    }

    /// Every value whose key is `key` itself (if `include_self`) or a
    /// strict extension of it.
    pub fn prefixed_by_values(&self, key: &C::Key, include_self: bool) -> Result<Vec<V>> {
        Ok(self
            .prefixed_by_entries(key, include_self)?
            .into_iter()
            .map(|(_, v)| v)
            .collect())
    }

    /// Every key that is `key` itself (if `include_self`) or a strict
    /// extension of it.
    pub fn prefixed_by_keys(&self, key: &C::Key, include_self: bool) -> Result<Vec<C::Key>> {
        Ok(self
            .prefixed_by_entries(key, include_self)?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// A live view over every entry whose key is `key` itself (if
    /// `include_self`) or a strict extension of it. Unlike the
    /// `prefixed_by_*` methods, this reflects later mutation of the trie
    /// and supports `put`/`remove` through the view.
    pub fn prefixed_by_map(
        &self,
        key: &C::Key,
        include_self: bool,
    ) -> Result<PrefixMap<'_, C, V>> {
        self.validate_key(key)?;
        Ok(PrefixMap::new(self, key.clone(), include_self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr_codec::Ipv4CidrCodec;
    use crate::string_codec::StringCodec;

    #[test]
    fn prefix_of_values_orders_shallowest_first() {
        let trie = BitTrie::<Ipv4CidrCodec, &'static str>::new(Ipv4CidrCodec);
        trie.put(&"10.0.0.0/8".parse().unwrap(), "ten").unwrap();
        trie.put(&"10.1.0.0/16".parse().unwrap(), "ten-one")
            .unwrap();
        let probe = "10.1.0.5/32".parse().unwrap();
        let values = trie.prefix_of_values(&probe, true).unwrap();
        assert_eq!(values, vec!["ten", "ten-one"]);
    }

    #[test]
    fn longest_prefix_respects_include_self() {
        let trie = BitTrie::<StringCodec, &'static str>::new(StringCodec::default());
        trie.put(&"ante".to_string(), "ante").unwrap();
        trie.put(&"antecede".to_string(), "antecede").unwrap();
        let probe = "antecede".to_string();
        assert_eq!(
            trie.longest_prefix_of_value(&probe, true).unwrap(),
            Some("antecede")
        );
        assert_eq!(
            trie.longest_prefix_of_value(&probe, false).unwrap(),
            Some("ante")
        );
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let trie = BitTrie::<StringCodec, &'static str>::new(StringCodec::default());
        let err = trie.prefixed_by_map(&String::new(), true).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidArgument(_)));
    }
}
