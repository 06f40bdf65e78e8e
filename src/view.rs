//! Live, aliasing views over a [`BitTrie`]: the unbounded `KeySet` /
//! `ValueCollection` / `EntrySet`, the `Bound`-scoped `SubMap`, and the
//! prefix-scoped `PrefixMap`. Every view borrows its backing trie and reads
//! through the same `RefCell`, so mutating the trie directly is visible to
//! any view created from it, and mutating through a view is visible to the
//! trie and to any other outstanding iterator (which will surface that as
//! `Error::ConcurrentModification` on its next step).
use std::cmp::Ordering;
use std::ops::Bound;

use crate::codec::BitCodec;
use crate::error::{Error, Result};
use crate::iter::RangeIter;
use crate::node::NodeId;
use crate::trie::BitTrie;

/// A live view of every key in a [`BitTrie`].
pub struct KeySet<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
}

impl<'a, C: BitCodec, V: Clone> KeySet<'a, C, V> {
    pub(crate) fn new(trie: &'a BitTrie<C, V>) -> Self {
        KeySet { trie }
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.trie.contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<bool> {
        Ok(self.trie.remove(key)?.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<C::Key>> + 'a {
        self.trie.iter().map(|r| r.map(|(k, _)| k))
    }
}

/// A live view of every value in a [`BitTrie`]. Values are not necessarily
/// unique, so unlike `KeySet` there is no `contains`/`remove` by value.
pub struct ValueCollection<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
}

impl<'a, C: BitCodec, V: Clone> ValueCollection<'a, C, V> {
    pub(crate) fn new(trie: &'a BitTrie<C, V>) -> Self {
        ValueCollection { trie }
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<V>> + 'a {
        self.trie.iter().map(|r| r.map(|(_, v)| v))
    }
}

/// A live view of every `(key, value)` pair in a [`BitTrie`].
pub struct EntrySet<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
}

impl<'a, C: BitCodec, V: Clone> EntrySet<'a, C, V> {
    pub(crate) fn new(trie: &'a BitTrie<C, V>) -> Self {
        EntrySet { trie }
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.trie.contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        self.trie.remove(key)
    }

    pub fn iter(&self) -> RangeIter<'a, C, V> {
        self.trie.iter()
    }
}

fn bound_compare<C: BitCodec>(codec: &C, key: &C::Key, bound: &Bound<C::Key>, is_lower: bool) -> bool {
    match bound {
        Bound::Unbounded => true,
        Bound::Included(b) => {
            let ord = codec.comparator(key, b);
            if is_lower {
                ord != Ordering::Less
            } else {
                ord != Ordering::Greater
            }
        }
        Bound::Excluded(b) => {
            let ord = codec.comparator(key, b);
            if is_lower {
                ord == Ordering::Greater
            } else {
                ord == Ordering::Less
            }
        }
    }
}

fn bound_value<K>(b: &Bound<K>) -> Option<&K> {
    match b {
        Bound::Included(k) | Bound::Excluded(k) => Some(k),
        Bound::Unbounded => None,
    }
}

/// The tighter (more restrictive) of two lower bounds, under `codec`'s
/// ordering.
fn tighten_lower<C: BitCodec>(codec: &C, a: Bound<C::Key>, b: Bound<C::Key>) -> Bound<C::Key> {
    match (bound_value(&a), bound_value(&b)) {
        (None, _) => b,
        (_, None) => a,
        (Some(x), Some(y)) => match codec.comparator(x, y) {
            Ordering::Greater => a,
            Ordering::Less => b,
            Ordering::Equal => {
                if matches!(a, Bound::Excluded(_)) {
                    a
                } else {
                    b
                }
            }
        },
    }
}

/// The tighter (more restrictive) of two upper bounds, under `codec`'s
/// ordering.
fn tighten_upper<C: BitCodec>(codec: &C, a: Bound<C::Key>, b: Bound<C::Key>) -> Bound<C::Key> {
    match (bound_value(&a), bound_value(&b)) {
        (None, _) => b,
        (_, None) => a,
        (Some(x), Some(y)) => match codec.comparator(x, y) {
            Ordering::Less => a,
            Ordering::Greater => b,
            Ordering::Equal => {
                if matches!(a, Bound::Excluded(_)) {
                    a
                } else {
                    b
                }
            }
        },
    }
}

/// A live, `Bound`-scoped view over a contiguous key range, as produced by
/// [`BitTrie::sub_map`], [`BitTrie::head_map`], [`BitTrie::tail_map`] and
/// [`BitTrie::descending_map`]. `low`/`high` are always expressed in
/// ascending-key terms regardless of `descending`; only iteration order and
/// the meaning of `head_map`/`tail_map` flip when `descending` is set, per
/// the descending-duality property (`descending.head_map` restricts the
/// same way `ascending.tail_map` would).
pub struct SubMap<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    low: Bound<C::Key>,
    high: Bound<C::Key>,
    descending: bool,
}

impl<'a, C: BitCodec, V: Clone> SubMap<'a, C, V> {
    pub(crate) fn new(trie: &'a BitTrie<C, V>, low: Bound<C::Key>, high: Bound<C::Key>) -> Self {
        SubMap {
            trie,
            low,
            high,
            descending: false,
        }
    }

    pub(crate) fn new_descending(
        trie: &'a BitTrie<C, V>,
        low: Bound<C::Key>,
        high: Bound<C::Key>,
    ) -> Self {
        SubMap {
            trie,
            low,
            high,
            descending: true,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    fn in_bounds(&self, key: &C::Key) -> bool {
        let codec = self.trie.codec();
        bound_compare(codec, key, &self.low, true) && bound_compare(codec, key, &self.high, false)
    }

    pub fn get(&self, key: &C::Key) -> Result<Option<V>> {
        if !self.in_bounds(key) {
            return Ok(None);
        }
        self.trie.get(key)
    }

    pub fn contains_key(&self, key: &C::Key) -> Result<bool> {
        Ok(self.in_bounds(key) && self.trie.contains_key(key)?)
    }

    /// Insert `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::OutOfRange)` if `key` falls outside this view's
    /// bounds.
    pub fn put(&self, key: &C::Key, value: V) -> Result<Option<V>> {
        if !self.in_bounds(key) {
            return Err(Error::OutOfRange);
        }
        self.trie.put(key, value)
    }

    /// Remove the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::OutOfRange)` if `key` falls outside this view's
    /// bounds.
    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        if !self.in_bounds(key) {
            return Err(Error::OutOfRange);
        }
        self.trie.remove(key)
    }

    /// A further-restricted view of keys `< bound` (or `<=` if `inclusive`)
    /// in this view's own iteration order: in ascending order that means the
    /// same as [`BitTrie::head_map`]; in descending order (the greatest keys
    /// come first) it means the same as [`BitTrie::tail_map`] would in
    /// ascending order — the least keys are what iteration reaches last.
    pub fn head_map(&self, bound: C::Key, inclusive: bool) -> SubMap<'a, C, V> {
        let codec = self.trie.codec();
        let edge = if inclusive {
            Bound::Included(bound)
        } else {
            Bound::Excluded(bound)
        };
        if self.descending {
            let low = tighten_lower(codec, self.low.clone(), edge);
            SubMap::new_descending(self.trie, low, self.high.clone())
        } else {
            let high = tighten_upper(codec, self.high.clone(), edge);
            SubMap::new(self.trie, self.low.clone(), high)
        }
    }

    /// A further-restricted view of keys `>= bound` (or `>` unless
    /// `inclusive`); the descending mirror of `head_map` above.
    pub fn tail_map(&self, bound: C::Key, inclusive: bool) -> SubMap<'a, C, V> {
        let codec = self.trie.codec();
        let edge = if inclusive {
            Bound::Included(bound)
        } else {
            Bound::Excluded(bound)
        };
        if self.descending {
            let high = tighten_upper(codec, self.high.clone(), edge);
            SubMap::new_descending(self.trie, self.low.clone(), high)
        } else {
            let low = tighten_lower(codec, self.low.clone(), edge);
            SubMap::new(self.trie, low, self.high.clone())
        }
    }

    /// A further-restricted view over `(low, high)`, keeping this view's
    /// iteration direction.
    pub fn sub_map(&self, low: Bound<C::Key>, high: Bound<C::Key>) -> Result<SubMap<'a, C, V>> {
        let codec = self.trie.codec();
        let low = tighten_lower(codec, self.low.clone(), low);
        let high = tighten_upper(codec, self.high.clone(), high);
        if let (Some(l), Some(h)) = (bound_value(&low), bound_value(&high)) {
            if codec.comparator(l, h) == Ordering::Greater {
                return Err(Error::InvalidArgument(
                    "sub_map lower bound is greater than its upper bound".into(),
                ));
            }
        }
        Ok(if self.descending {
            SubMap::new_descending(self.trie, low, high)
        } else {
            SubMap::new(self.trie, low, high)
        })
    }

    fn start_node(&self) -> Option<NodeId> {
        let inner = self.trie.borrow();
        match &self.low {
            Bound::Unbounded => inner.root.and_then(|r| inner.first_in_subtree(r)),
            Bound::Included(k) => inner.ceiling_node(self.trie.codec(), k),
            Bound::Excluded(k) => inner.higher_node(self.trie.codec(), k),
        }
    }

    fn start_node_descending(&self) -> Option<NodeId> {
        let inner = self.trie.borrow();
        match &self.high {
            Bound::Unbounded => inner.root.and_then(|r| inner.last_in_subtree(r)),
            Bound::Included(k) => inner.floor_node(self.trie.codec(), k),
            Bound::Excluded(k) => inner.lower_node(self.trie.codec(), k),
        }
    }

    /// A live iterator over this view's entries, in ascending key order
    /// unless this view was produced by [`BitTrie::descending_map`], in
    /// which case it walks from the greatest key down to the least.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<(C::Key, V)>> + 'a> {
        let trie = self.trie;
        if self.descending {
            let start = self.start_node_descending();
            let low = self.low.clone();
            Box::new(
                RangeIter::new(trie, start, true, None).take_while(move |item| match item {
                    Ok((k, _)) => bound_compare(trie.codec(), k, &low, true),
                    Err(_) => true,
                }),
            )
        } else {
            let start = self.start_node();
            let high = self.high.clone();
            Box::new(
                RangeIter::new(trie, start, false, None).take_while(move |item| match item {
                    Ok((k, _)) => bound_compare(trie.codec(), k, &high, false),
                    Err(_) => true,
                }),
            )
        }
    }

    /// This view's keys, as their own scoped live view.
    pub fn keys(&self) -> SubMapKeys<'a, C, V> {
        SubMapKeys {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }

    /// This view's values, as their own scoped live view.
    pub fn values(&self) -> SubMapValues<'a, C, V> {
        SubMapValues {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }

    /// This view's entries, as their own scoped live view.
    pub fn entries(&self) -> SubMapEntries<'a, C, V> {
        SubMapEntries {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }
}

/// This `SubMap`'s keys, mirroring [`KeySet`] but scoped to the bounds.
pub struct SubMapKeys<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    low: Bound<C::Key>,
    high: Bound<C::Key>,
    descending: bool,
}

impl<'a, C: BitCodec, V: Clone> SubMapKeys<'a, C, V> {
    fn as_sub_map(&self) -> SubMap<'a, C, V> {
        SubMap {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_sub_map().iter().next().is_none()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.as_sub_map().contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<bool> {
        Ok(self.as_sub_map().remove(key)?.is_some())
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<C::Key>> + 'a> {
        Box::new(self.as_sub_map().iter().map(|r| r.map(|(k, _)| k)))
    }
}

/// This `SubMap`'s values, mirroring [`ValueCollection`] but scoped to the
/// bounds. Values are not necessarily unique, so there is no `contains`.
pub struct SubMapValues<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    low: Bound<C::Key>,
    high: Bound<C::Key>,
    descending: bool,
}

impl<'a, C: BitCodec, V: Clone> SubMapValues<'a, C, V> {
    fn as_sub_map(&self) -> SubMap<'a, C, V> {
        SubMap {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_sub_map().iter().next().is_none()
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<V>> + 'a> {
        Box::new(self.as_sub_map().iter().map(|r| r.map(|(_, v)| v)))
    }
}

/// This `SubMap`'s entries, mirroring [`EntrySet`] but scoped to the bounds.
pub struct SubMapEntries<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    low: Bound<C::Key>,
    high: Bound<C::Key>,
    descending: bool,
}

impl<'a, C: BitCodec, V: Clone> SubMapEntries<'a, C, V> {
    fn as_sub_map(&self) -> SubMap<'a, C, V> {
        SubMap {
            trie: self.trie,
            low: self.low.clone(),
            high: self.high.clone(),
            descending: self.descending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_sub_map().iter().next().is_none()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.as_sub_map().contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        self.as_sub_map().remove(key)
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<(C::Key, V)>> + 'a> {
        self.as_sub_map().iter()
    }
}

/// A live view over every entry whose key is `prefix` itself
/// (`include_self`) or a strict extension of it, as produced by
/// [`BitTrie::prefixed_by_map`].
///
/// The anchor node is recomputed from `prefix` on every call rather than
/// cached at construction time, so a `put` that creates the anchor's path
/// for the first time (as in scenario S3, where `Albertz` extends a prefix
/// that otherwise has entries already) is immediately visible to this same
/// view, not just to later views created from the trie.
pub struct PrefixMap<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    prefix: C::Key,
    prefix_len: usize,
    include_self: bool,
}

impl<'a, C: BitCodec, V: Clone> PrefixMap<'a, C, V> {
    pub(crate) fn new(trie: &'a BitTrie<C, V>, prefix: C::Key, include_self: bool) -> Self {
        let prefix_len = trie.codec().length_in_bits(&prefix);
        PrefixMap {
            trie,
            prefix,
            prefix_len,
            include_self,
        }
    }

    fn anchor(&self) -> Option<NodeId> {
        let inner = self.trie.borrow();
        let mut cur = inner.root?;
        for depth in 0..self.prefix_len {
            let bit = self.trie.codec().bit_at(&self.prefix, depth);
            let n = inner.arena.get(cur);
            cur = if bit { n.right? } else { n.left? };
        }
        Some(cur)
    }

    /// Whether `key` falls inside this view's scope: `key` itself (only if
    /// `include_self`) or a strict extension of `prefix`.
    fn in_scope(&self, key: &C::Key) -> bool {
        let codec = self.trie.codec();
        let key_len = codec.length_in_bits(key);
        if key_len < self.prefix_len {
            return false;
        }
        for depth in 0..self.prefix_len {
            if codec.bit_at(key, depth) != codec.bit_at(&self.prefix, depth) {
                return false;
            }
        }
        key_len > self.prefix_len || self.include_self
    }

    /// Insert `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::OutOfRange)` if `key` does not extend this
    /// view's prefix.
    pub fn put(&self, key: &C::Key, value: V) -> Result<Option<V>> {
        if !self.in_scope(key) {
            return Err(Error::OutOfRange);
        }
        self.trie.put(key, value)
    }

    /// Remove the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::OutOfRange)` if `key` does not extend this
    /// view's prefix.
    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        if !self.in_scope(key) {
            return Err(Error::OutOfRange);
        }
        self.trie.remove(key)
    }

    /// A live iterator over this view's entries, in ascending key order.
    pub fn iter(&self) -> RangeIter<'a, C, V> {
        let Some(anchor) = self.anchor() else {
            return RangeIter::new(self.trie, None, false, None);
        };
        let inner = self.trie.borrow();
        let start = inner.first_in_scope(anchor, self.include_self);
        drop(inner);
        RangeIter::new(self.trie, start, false, Some(anchor))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.iter().next().is_none())
    }

    pub fn contains_key(&self, key: &C::Key) -> Result<bool> {
        Ok(self.in_scope(key) && self.trie.contains_key(key)?)
    }

    /// This view's keys, as their own scoped live view.
    pub fn keys(&self) -> PrefixMapKeys<'a, C, V> {
        PrefixMapKeys {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }

    /// This view's values, as their own scoped live view.
    pub fn values(&self) -> PrefixMapValues<'a, C, V> {
        PrefixMapValues {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }

    /// This view's entries, as their own scoped live view.
    pub fn entries(&self) -> PrefixMapEntries<'a, C, V> {
        PrefixMapEntries {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }
}

/// This `PrefixMap`'s keys, mirroring [`KeySet`] but scoped to the prefix.
pub struct PrefixMapKeys<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    prefix: C::Key,
    prefix_len: usize,
    include_self: bool,
}

impl<'a, C: BitCodec, V: Clone> PrefixMapKeys<'a, C, V> {
    fn as_prefix_map(&self) -> PrefixMap<'a, C, V> {
        PrefixMap {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.as_prefix_map().is_empty()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.as_prefix_map().contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<bool> {
        Ok(self.as_prefix_map().remove(key)?.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<C::Key>> + 'a {
        self.as_prefix_map().iter().map(|r| r.map(|(k, _)| k))
    }
}

/// This `PrefixMap`'s values, mirroring [`ValueCollection`] but scoped to the
/// prefix. Values are not necessarily unique, so there is no `contains`.
pub struct PrefixMapValues<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    prefix: C::Key,
    prefix_len: usize,
    include_self: bool,
}

impl<'a, C: BitCodec, V: Clone> PrefixMapValues<'a, C, V> {
    fn as_prefix_map(&self) -> PrefixMap<'a, C, V> {
        PrefixMap {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.as_prefix_map().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<V>> + 'a {
        self.as_prefix_map().iter().map(|r| r.map(|(_, v)| v))
    }
}

/// This `PrefixMap`'s entries, mirroring [`EntrySet`] but scoped to the
/// prefix.
pub struct PrefixMapEntries<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    prefix: C::Key,
    prefix_len: usize,
    include_self: bool,
}

impl<'a, C: BitCodec, V: Clone> PrefixMapEntries<'a, C, V> {
    fn as_prefix_map(&self) -> PrefixMap<'a, C, V> {
        PrefixMap {
            trie: self.trie,
            prefix: self.prefix.clone(),
            prefix_len: self.prefix_len,
            include_self: self.include_self,
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.as_prefix_map().is_empty()
    }

    pub fn contains(&self, key: &C::Key) -> Result<bool> {
        self.as_prefix_map().contains_key(key)
    }

    pub fn remove(&self, key: &C::Key) -> Result<Option<V>> {
        self.as_prefix_map().remove(key)
    }

    pub fn iter(&self) -> RangeIter<'a, C, V> {
        self.as_prefix_map().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_codec::StringCodec;

    fn sample() -> BitTrie<StringCodec, i32> {
        let trie = BitTrie::new(StringCodec::default());
        for (i, name) in ["Akka", "Akko", "Amber", "Zed"].iter().enumerate() {
            trie.put(&name.to_string(), i as i32).unwrap();
        }
        trie
    }

    #[test]
    fn entry_set_contains() {
        let trie = sample();
        let entries = trie.entries();
        assert!(entries.contains(&"Akka".to_string()).unwrap());
        assert!(!entries.contains(&"Nope".to_string()).unwrap());
    }

    #[test]
    fn sub_map_keys_values_entries() {
        let trie = sample();
        let view = trie.head_map("Am".to_string(), false);

        let keys: Vec<String> = view.keys().iter().map(|r| r.unwrap()).collect();
        assert_eq!(keys, vec!["Akka".to_string(), "Akko".to_string()]);
        assert!(view.keys().contains(&"Akka".to_string()).unwrap());
        assert!(!view.keys().contains(&"Amber".to_string()).unwrap());

        let values: Vec<i32> = view.values().iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![0, 1]);

        let entries: Vec<(String, i32)> = view.entries().iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            entries,
            vec![("Akka".to_string(), 0), ("Akko".to_string(), 1)]
        );
        assert!(view.entries().remove(&"Akka".to_string()).unwrap().is_some());
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn prefix_map_keys_values_entries() {
        let trie = sample();
        let view = trie.prefixed_by_map(&"Ak".to_string(), true).unwrap();

        let keys: Vec<String> = view.keys().iter().map(|r| r.unwrap()).collect();
        assert_eq!(keys, vec!["Akka".to_string(), "Akko".to_string()]);
        assert!(view.keys().contains(&"Akka".to_string()).unwrap());

        let values: Vec<i32> = view.values().iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![0, 1]);

        let entries: Vec<(String, i32)> = view.entries().iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            entries,
            vec![("Akka".to_string(), 0), ("Akko".to_string(), 1)]
        );
        assert!(view.entries().contains(&"Akka".to_string()).unwrap());
    }
}
