//! The `NavigableMap`-style façade: exact bounds (`first`/`last`), the
//! approximate-match family (`lower`/`floor`/`ceiling`/`higher`), polling
//! removal, and the bounded/whole-trie view constructors.
use std::ops::Bound;

use crate::codec::BitCodec;
use crate::error::{Error, Result};
use crate::iter::RangeIter;
use crate::trie::BitTrie;
use crate::view::{EntrySet, KeySet, SubMap, ValueCollection};

impl<C: BitCodec, V: Clone> BitTrie<C, V> {
    /// The least key in the trie.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::NotFound)` if the trie is empty.
    pub fn first_key(&self) -> Result<C::Key> {
        let inner = self.borrow();
        inner
            .root
            .and_then(|r| inner.first_in_subtree(r))
            .map(|n| inner.resolve_key(&self.codec, n))
            .ok_or(Error::NotFound)
    }

    /// The greatest key in the trie.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::NotFound)` if the trie is empty.
    pub fn last_key(&self) -> Result<C::Key> {
        let inner = self.borrow();
        inner
            .root
            .and_then(|r| inner.last_in_subtree(r))
            .map(|n| inner.resolve_key(&self.codec, n))
            .ok_or(Error::NotFound)
    }

    /// The greatest key strictly less than `key`.
    pub fn lower(&self, key: &C::Key) -> Result<Option<(C::Key, V)>> {
        self.validate_key(key)?;
        let inner = self.borrow();
        Ok(inner
            .lower_node(&self.codec, key)
            .map(|n| (inner.resolve_key(&self.codec, n), inner.value_of(n).clone())))
    }

    /// The greatest key less than or equal to `key`.
    pub fn floor(&self, key: &C::Key) -> Result<Option<(C::Key, V)>> {
        self.validate_key(key)?;
        let inner = self.borrow();
        Ok(inner
            .floor_node(&self.codec, key)
            .map(|n| (inner.resolve_key(&self.codec, n), inner.value_of(n).clone())))
    }

    /// The least key greater than or equal to `key`.
    pub fn ceiling(&self, key: &C::Key) -> Result<Option<(C::Key, V)>> {
        self.validate_key(key)?;
        let inner = self.borrow();
        Ok(inner
            .ceiling_node(&self.codec, key)
            .map(|n| (inner.resolve_key(&self.codec, n), inner.value_of(n).clone())))
    }

    /// The least key strictly greater than `key`.
    pub fn higher(&self, key: &C::Key) -> Result<Option<(C::Key, V)>> {
        self.validate_key(key)?;
        let inner = self.borrow();
        Ok(inner
            .higher_node(&self.codec, key)
            .map(|n| (inner.resolve_key(&self.codec, n), inner.value_of(n).clone())))
    }

    /// Remove and return the least entry, if any.
    pub fn poll_first(&self) -> Result<Option<(C::Key, V)>> {
        let key = match self.first_key() {
            Ok(key) => key,
            Err(Error::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let value = self
            .remove(&key)?
            .expect("first_key resolved to a node that vanished before poll_first removed it");
        Ok(Some((key, value)))
    }

    /// Remove and return the greatest entry, if any.
    pub fn poll_last(&self) -> Result<Option<(C::Key, V)>> {
        let key = match self.last_key() {
            Ok(key) => key,
            Err(Error::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let value = self
            .remove(&key)?
            .expect("last_key resolved to a node that vanished before poll_last removed it");
        Ok(Some((key, value)))
    }

    /// A live view over every entry, in ascending key order.
    pub fn iter(&self) -> RangeIter<'_, C, V> {
        let inner = self.borrow();
        let start = inner.root.and_then(|r| inner.first_in_subtree(r));
        drop(inner);
        RangeIter::new(self, start, false, None)
    }

    /// A live view over every entry, in descending key order.
    pub fn iter_descending(&self) -> RangeIter<'_, C, V> {
        let inner = self.borrow();
        let start = inner.root.and_then(|r| inner.last_in_subtree(r));
        drop(inner);
        RangeIter::new(self, start, true, None)
    }

    pub fn keys(&self) -> KeySet<'_, C, V> {
        KeySet::new(self)
    }

    pub fn values(&self) -> ValueCollection<'_, C, V> {
        ValueCollection::new(self)
    }

    pub fn entries(&self) -> EntrySet<'_, C, V> {
        EntrySet::new(self)
    }

    /// A live view of every entry with key `< bound` (`head_map`) or
    /// `<= bound` depending on `inclusive`.
    pub fn head_map(&self, bound: C::Key, inclusive: bool) -> SubMap<'_, C, V> {
        let upper = if inclusive {
            Bound::Included(bound)
        } else {
            Bound::Excluded(bound)
        };
        SubMap::new(self, Bound::Unbounded, upper)
    }

    /// A live view of every entry with key `>= bound` (`tail_map`) or
    /// `> bound` depending on `inclusive`.
    pub fn tail_map(&self, bound: C::Key, inclusive: bool) -> SubMap<'_, C, V> {
        let lower = if inclusive {
            Bound::Included(bound)
        } else {
            Bound::Excluded(bound)
        };
        SubMap::new(self, lower, Bound::Unbounded)
    }

    /// A live view of every entry whose key falls within `(low, high)`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::InvalidArgument)` if `low` is greater than `high`
    /// under this trie's codec ordering.
    pub fn sub_map(&self, low: Bound<C::Key>, high: Bound<C::Key>) -> Result<SubMap<'_, C, V>> {
        if let (Some(l), Some(h)) = (bound_value(&low), bound_value(&high)) {
            if self.codec.comparator(l, h) == std::cmp::Ordering::Greater {
                return Err(Error::InvalidArgument(
                    "sub_map lower bound is greater than its upper bound".into(),
                ));
            }
        }
        Ok(SubMap::new(self, low, high))
    }

    /// A live view over the whole trie, walked from the greatest key to the
    /// least. `head_map`/`tail_map`/`sub_map` called on the result keep that
    /// direction; `head_map` on a descending view restricts the same way
    /// `tail_map` would ascending, and vice versa (the descending-duality
    /// property).
    pub fn descending_map(&self) -> SubMap<'_, C, V> {
        SubMap::new_descending(self, Bound::Unbounded, Bound::Unbounded)
    }
}

fn bound_value<K>(b: &Bound<K>) -> Option<&K> {
    match b {
        Bound::Included(k) | Bound::Excluded(k) => Some(k),
        Bound::Unbounded => None,
    }
}
