//! The trie engine itself: `Inner` holds the arena and does all the
//! structural work; `BitTrie` wraps it in a `RefCell` so the public API can
//! be `&self`-based (see the crate's top-level docs for why).
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use crate::codec::BitCodec;
use crate::error::{Error, Result};
use crate::node::{Arena, NodeId};

/// Constructor-time knobs for a [`BitTrie`].
///
/// There is deliberately no builder here; both fields are public and the
/// type derives `Default`, the same shape as `ThrottleSpec` in the teacher
/// workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Cache each key alongside its value at `put()` time, so later key
    /// resolution (iteration, `keys()`, `Debug`) never has to walk back up
    /// the tree bit by bit. Costs one clone of `K` per `put`.
    pub cache_keys: bool,
    /// Serialize with explicit keys (a flat, order-independent encoding)
    /// rather than the compact tree-shape encoding. See [`crate::ser`].
    pub write_keys: bool,
}

/// The mutable guts of a [`BitTrie`]: the node arena, the root, and the
/// bookkeeping fail-fast iterators rely on.
pub(crate) struct Inner<K, V> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
    pub(crate) mod_count: u64,
}

impl<K: Clone, V> Inner<K, V> {
    fn new() -> Self {
        Inner {
            arena: Arena::new(),
            root: None,
            len: 0,
            mod_count: 0,
        }
    }

    /// The leftmost value-bearing node in the subtree rooted at `node`
    /// (including `node` itself). A node's own value, if any, always
    /// precedes both of its children in key order, so it is checked first.
    pub(crate) fn first_in_subtree(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if n.value.is_some() {
            return Some(node);
        }
        if let Some(l) = n.left {
            if let Some(v) = self.first_in_subtree(l) {
                return Some(v);
            }
        }
        if let Some(r) = n.right {
            if let Some(v) = self.first_in_subtree(r) {
                return Some(v);
            }
        }
        None
    }

    /// The rightmost value-bearing node in the subtree rooted at `node`.
    pub(crate) fn last_in_subtree(&self, node: NodeId) -> Option<NodeId> {
        let n = self.arena.get(node);
        if let Some(r) = n.right {
            if let Some(v) = self.last_in_subtree(r) {
                return Some(v);
            }
        }
        if let Some(l) = n.left {
            if let Some(v) = self.last_in_subtree(l) {
                return Some(v);
            }
        }
        if n.value.is_some() {
            return Some(node);
        }
        None
    }

    /// First value-bearing node strictly inside `anchor`'s scope: either its
    /// whole subtree (`include_self`) or just its descendants.
    pub(crate) fn first_in_scope(&self, anchor: NodeId, include_self: bool) -> Option<NodeId> {
        if include_self {
            return self.first_in_subtree(anchor);
        }
        let n = self.arena.get(anchor);
        if let Some(l) = n.left {
            if let Some(v) = self.first_in_subtree(l) {
                return Some(v);
            }
        }
        if let Some(r) = n.right {
            if let Some(v) = self.first_in_subtree(r) {
                return Some(v);
            }
        }
        None
    }

    pub(crate) fn last_in_scope(&self, anchor: NodeId, include_self: bool) -> Option<NodeId> {
        let n = self.arena.get(anchor);
        if let Some(r) = n.right {
            if let Some(v) = self.last_in_subtree(r) {
                return Some(v);
            }
        }
        if let Some(l) = n.left {
            if let Some(v) = self.last_in_subtree(l) {
                return Some(v);
            }
        }
        if include_self && n.value.is_some() {
            return Some(anchor);
        }
        None
    }

    /// The next value-bearing node after `x` in key order, never ascending
    /// past `stop_at` (used to keep prefix-scoped iteration inside its
    /// anchor's subtree). `stop_at = None` means "the whole trie".
    pub(crate) fn successor(&self, x: NodeId, stop_at: Option<NodeId>) -> Option<NodeId> {
        let n = self.arena.get(x);
        if let Some(l) = n.left {
            if let Some(v) = self.first_in_subtree(l) {
                return Some(v);
            }
        }
        if let Some(r) = n.right {
            if let Some(v) = self.first_in_subtree(r) {
                return Some(v);
            }
        }
        let mut cur = x;
        loop {
            if Some(cur) == stop_at {
                return None;
            }
            let parent = self.arena.get(cur).parent;
            let p = parent?;
            if Some(p) == stop_at {
                return None;
            }
            let p_node = self.arena.get(p);
            if p_node.left == Some(cur) {
                if let Some(r) = p_node.right {
                    if let Some(v) = self.first_in_subtree(r) {
                        return Some(v);
                    }
                }
            }
            cur = p;
        }
    }

    /// The previous value-bearing node before `x` in key order.
    pub(crate) fn predecessor(&self, x: NodeId, stop_at: Option<NodeId>) -> Option<NodeId> {
        let mut cur = x;
        loop {
            if Some(cur) == stop_at {
                return None;
            }
            let parent = self.arena.get(cur).parent;
            let p = parent?;
            if Some(p) == stop_at {
                return None;
            }
            let p_node = self.arena.get(p);
            if p_node.right == Some(cur) {
                if let Some(l) = p_node.left {
                    if let Some(v) = self.last_in_subtree(l) {
                        return Some(v);
                    }
                }
            }
            if p_node.value.is_some() {
                return Some(p);
            }
            cur = p;
        }
    }

    fn descend<C: BitCodec<Key = K>>(&self, codec: &C, key: &K, length: usize) -> Option<NodeId> {
        let mut cur = self.root?;
        for depth in 0..length {
            let bit = codec.bit_at(key, depth);
            let n = self.arena.get(cur);
            cur = if bit { n.right? } else { n.left? };
        }
        Some(cur)
    }

    /// The node whose path exactly matches `key` and that carries a value,
    /// or `None` if no such node exists.
    pub(crate) fn descend_exact<C: BitCodec<Key = K>>(&self, codec: &C, key: &K) -> Option<NodeId> {
        let length = codec.length_in_bits(key);
        let node = self.descend(codec, key, length)?;
        self.arena.get(node).value.is_some().then_some(node)
    }

    /// The greatest value-bearing node with key `<= key`.
    pub(crate) fn floor_node<C: BitCodec<Key = K>>(&self, codec: &C, key: &K) -> Option<NodeId> {
        let length = codec.length_in_bits(key);
        let mut cur = self.root;
        let mut best = None;
        let mut depth = 0;
        while let Some(node) = cur {
            let n = self.arena.get(node);
            if n.value.is_some() {
                best = Some(node);
            }
            if depth == length {
                break;
            }
            let bit = codec.bit_at(key, depth);
            if bit {
                if let Some(l) = n.left {
                    if let Some(v) = self.last_in_subtree(l) {
                        best = Some(v);
                    }
                }
                cur = n.right;
            } else {
                cur = n.left;
            }
            depth += 1;
        }
        best
    }

    /// The least value-bearing node with key `>= key`.
    pub(crate) fn ceiling_node<C: BitCodec<Key = K>>(&self, codec: &C, key: &K) -> Option<NodeId> {
        let length = codec.length_in_bits(key);
        let mut cur = self.root;
        let mut best = None;
        let mut depth = 0;
        while let Some(node) = cur {
            let n = self.arena.get(node);
            if depth == length {
                if n.value.is_some() {
                    best = Some(node);
                } else if let Some(v) = self.first_in_subtree(node) {
                    best = Some(v);
                }
                break;
            }
            let bit = codec.bit_at(key, depth);
            if bit {
                cur = n.right;
            } else {
                if let Some(r) = n.right {
                    if let Some(v) = self.first_in_subtree(r) {
                        best = Some(v);
                    }
                }
                cur = n.left;
            }
            depth += 1;
        }
        best
    }

    pub(crate) fn lower_node<C: BitCodec<Key = K>>(&self, codec: &C, key: &K) -> Option<NodeId> {
        match self.descend_exact(codec, key) {
            Some(exact) => self.predecessor(exact, None),
            None => self.floor_node(codec, key),
        }
    }

    pub(crate) fn higher_node<C: BitCodec<Key = K>>(&self, codec: &C, key: &K) -> Option<NodeId> {
        match self.descend_exact(codec, key) {
            Some(exact) => self.successor(exact, None),
            None => self.ceiling_node(codec, key),
        }
    }

    /// Rebuild the key stored at `node`, preferring the eagerly cached copy.
    pub(crate) fn resolve_key<C: BitCodec<Key = K>>(&self, codec: &C, node: NodeId) -> K {
        if let Some(k) = self.arena.get(node).cached_key.as_ref() {
            return k.clone();
        }
        let mut bits_rev = Vec::new();
        let mut cur = node;
        while let Some(p) = self.arena.get(cur).parent {
            let p_node = self.arena.get(p);
            bits_rev.push(p_node.right == Some(cur));
            cur = p;
        }
        bits_rev.reverse();
        let len = bits_rev.len();
        codec.recreate_key(&bits_rev, len)
    }

    pub(crate) fn value_of(&self, node: NodeId) -> &V {
        self.arena
            .get(node)
            .value
            .as_ref()
            .expect("iterator/navigation yielded a valueless node")
    }

    fn put<C: BitCodec<Key = K>>(
        &mut self,
        codec: &C,
        key: &K,
        value: V,
        cache_keys: bool,
    ) -> Option<V> {
        let length = codec.length_in_bits(key);
        if self.root.is_none() {
            self.root = Some(self.arena.alloc(None));
        }
        let mut cur = self.root.expect("root just populated");
        for depth in 0..length {
            let bit = codec.bit_at(key, depth);
            let existing = if bit {
                self.arena.get(cur).right
            } else {
                self.arena.get(cur).left
            };
            cur = match existing {
                Some(n) => n,
                None => {
                    let new_id = self.arena.alloc(Some(cur));
                    tracing::trace!(node = new_id.raw(), depth, "allocated trie node");
                    let parent = self.arena.get_mut(cur);
                    if bit {
                        parent.right = Some(new_id);
                    } else {
                        parent.left = Some(new_id);
                    }
                    new_id
                }
            };
        }
        let node = self.arena.get_mut(cur);
        let old = node.value.take();
        node.value = Some(value);
        if cache_keys {
            node.cached_key = Some(key.clone());
        }
        if old.is_none() {
            self.len += 1;
            self.mod_count = self.mod_count.wrapping_add(1);
        }
        old
    }

    fn remove<C: BitCodec<Key = K>>(&mut self, codec: &C, key: &K) -> Option<V> {
        let length = codec.length_in_bits(key);
        let node = self.descend(codec, key, length)?;
        let n = self.arena.get_mut(node);
        let old = n.value.take();
        n.cached_key = None;
        old.as_ref()?;
        self.len -= 1;
        self.mod_count = self.mod_count.wrapping_add(1);
        tracing::trace!(node = node.raw(), "collapsing from removed node");
        self.collapse_from(node);
        old
    }

    /// Walk upward from `node`, freeing value-less leaves. Stops as soon as
    /// it hits a node that either carries a value or still has a child;
    /// never merges a single remaining child into its grandparent, so the
    /// bit-index-equals-depth invariant `put`/`get` rely on is preserved.
    fn collapse_from(&mut self, mut node: NodeId) {
        loop {
            let n = self.arena.get(node);
            if n.value.is_some() || !n.is_leaf() {
                break;
            }
            match n.parent {
                None => {
                    self.arena.free(node);
                    self.root = None;
                    break;
                }
                Some(p) => {
                    self.arena.free(node);
                    let p_node = self.arena.get_mut(p);
                    if p_node.left == Some(node) {
                        p_node.left = None;
                    } else if p_node.right == Some(node) {
                        p_node.right = None;
                    }
                    node = p;
                }
            }
        }
    }

    fn clear(&mut self) {
        let dropped = self.len;
        tracing::debug!(dropped, "clearing trie");
        self.arena = Arena::new();
        self.root = None;
        self.len = 0;
        self.mod_count = self.mod_count.wrapping_add(1);
    }
}

impl<K: Clone, V: Clone> Clone for Inner<K, V> {
    fn clone(&self) -> Self {
        Inner {
            arena: self.arena.clone(),
            root: self.root,
            len: self.len,
            mod_count: self.mod_count,
        }
    }
}

/// A generic binary bit-trie: an ordered map whose keys are exposed to the
/// engine as fixed-length bit sequences through a [`BitCodec`], supporting
/// prefix queries and the `NavigableMap`-style approximate-match operations
/// (`floor`, `ceiling`, `lower`, `higher`) in addition to plain `get`/`put`.
///
/// Every method takes `&self`; interior mutability (a `RefCell` around the
/// node arena) is what lets live views and fail-fast iterators alias a
/// `BitTrie` that is still being mutated, the same way `sled::Db` or
/// `RefCell<BTreeMap<_>>` would. Borrows are always scoped to a single
/// method call, so no two overlapping borrows are ever held across a call
/// boundary and a `BorrowMutError` cannot happen under the single-threaded
/// usage this crate assumes.
pub struct BitTrie<C: BitCodec, V> {
    pub(crate) codec: C,
    pub(crate) options: Options,
    pub(crate) inner: RefCell<Inner<C::Key, V>>,
}

impl<C: BitCodec, V: Clone> BitTrie<C, V> {
    /// A new, empty trie using `codec` and default options.
    pub fn new(codec: C) -> Self {
        Self::with_options(codec, Options::default())
    }

    /// A new, empty trie using `codec` and the given [`Options`].
    pub fn with_options(codec: C, options: Options) -> Self {
        BitTrie {
            codec,
            options,
            inner: RefCell::new(Inner::new()),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    /// Check `key` against this trie's codec, returning its bit length.
    pub fn validate_key(&self, key: &C::Key) -> Result<usize> {
        let len = self.codec.length_in_bits(key);
        if len == 0 {
            return Err(Error::InvalidArgument(
                "key must have a non-zero bit length".into(),
            ));
        }
        if len > self.codec.max_length_in_bits() {
            return Err(Error::InvalidArgument(format!(
                "key length {len} exceeds this codec's max_length_in_bits {}",
                self.codec.max_length_in_bits()
            )));
        }
        Ok(len)
    }

    pub fn contains_key(&self, key: &C::Key) -> Result<bool> {
        self.validate_key(key)?;
        Ok(self.inner.borrow().descend_exact(&self.codec, key).is_some())
    }

    pub fn get(&self, key: &C::Key) -> Result<Option<V>> {
        self.validate_key(key)?;
        let inner = self.inner.borrow();
        Ok(inner
            .descend_exact(&self.codec, key)
            .map(|n| inner.value_of(n).clone()))
    }

    /// Insert `value` at `key`, returning the value it replaced, if any.
    pub fn put(&self, key: &C::Key, value: V) -> Result<Option<V>> {
        self.validate_key(key)?;
        Ok(self
            .inner
            .borrow_mut()
            .put(&self.codec, key, value, self.options.cache_keys))
    }

    /// Remove the value at `key`, returning it if it was present.
    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        self.validate_key(key)?;
        Ok(self.inner.borrow_mut().remove(&self.codec, key))
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Inner<C::Key, V>> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Inner<C::Key, V>> {
        self.inner.borrow_mut()
    }

    pub(crate) fn mod_count(&self) -> u64 {
        self.inner.borrow().mod_count
    }
}

impl<C: BitCodec, V: Clone> Clone for BitTrie<C, V> {
    fn clone(&self) -> Self {
        BitTrie {
            codec: self.codec.clone(),
            options: self.options,
            inner: RefCell::new(self.inner.borrow().clone()),
        }
    }
}

impl<C: BitCodec, V: Clone + fmt::Debug> fmt::Debug for BitTrie<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut map = f.debug_map();
        let mut cur = inner.root.and_then(|r| inner.first_in_subtree(r));
        while let Some(node) = cur {
            let key = inner.resolve_key(&self.codec, node);
            map.entry(&key, inner.value_of(node));
            cur = inner.successor(node, None);
        }
        map.finish()
    }
}

impl<C: BitCodec + Default, V: Clone> FromIterator<(C::Key, V)> for BitTrie<C, V> {
    fn from_iter<I: IntoIterator<Item = (C::Key, V)>>(iter: I) -> Self {
        let mut trie = BitTrie::new(C::default());
        trie.extend(iter);
        trie
    }
}

impl<C: BitCodec, V: Clone> Extend<(C::Key, V)> for BitTrie<C, V> {
    fn extend<I: IntoIterator<Item = (C::Key, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            let _ = self.put(&k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cidr_codec::Ipv4CidrCodec;

    fn cidr(s: &str) -> crate::cidr_codec::Ipv4Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn put_get_remove_round_trip() {
        let trie = BitTrie::<Ipv4CidrCodec, &'static str>::new(Ipv4CidrCodec);
        assert_eq!(trie.put(&cidr("10.0.0.0/8"), "ten").unwrap(), None);
        assert_eq!(trie.get(&cidr("10.0.0.0/8")).unwrap(), Some("ten"));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.remove(&cidr("10.0.0.0/8")).unwrap(), Some("ten"));
        assert_eq!(trie.len(), 0);
        assert!(trie.is_empty());
    }

    #[test]
    fn rejects_out_of_range_key() {
        let trie = BitTrie::<Ipv4CidrCodec, i32>::new(Ipv4CidrCodec);
        // Ipv4Cidr::new has no upper bound on prefix_len itself (only FromStr
        // enforces 0..=32), so this is the one way to build a key whose
        // length_in_bits exceeds the codec's max_length_in_bits of 32.
        let out_of_range = crate::cidr_codec::Ipv4Cidr::new(std::net::Ipv4Addr::new(0, 0, 0, 0), 200);
        let err = trie.validate_key(&out_of_range);
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn collapse_prunes_dead_routing_nodes() {
        let trie = BitTrie::<Ipv4CidrCodec, i32>::new(Ipv4CidrCodec);
        trie.put(&cidr("10.0.0.0/8"), 1).unwrap();
        trie.remove(&cidr("10.0.0.0/8")).unwrap();
        assert!(trie.inner.borrow().root.is_none());
    }

    #[test]
    fn mod_count_bumps_only_on_structural_change() {
        let trie = BitTrie::<Ipv4CidrCodec, i32>::new(Ipv4CidrCodec);
        let m0 = trie.mod_count();
        trie.put(&cidr("10.0.0.0/8"), 1).unwrap();
        let m1 = trie.mod_count();
        assert_ne!(m0, m1);
        trie.put(&cidr("10.0.0.0/8"), 2).unwrap();
        let m2 = trie.mod_count();
        assert_eq!(m1, m2, "overwriting an existing key is not structural");
    }
}
