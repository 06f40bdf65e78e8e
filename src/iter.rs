//! The fail-fast iterator shared by every view in this crate.
//!
//! Every iterator snapshots the trie's modification counter when it is
//! created. Each call to `next()` or `remove()` re-checks that counter
//! against the live trie; a mismatch means some other `put`/`remove`/`clear`
//! call happened since, and the iterator raises
//! [`crate::error::Error::ConcurrentModification`] rather than silently
//! returning stale or inconsistent data.
use crate::codec::BitCodec;
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::trie::BitTrie;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Advanced(NodeId),
    Removed(Option<NodeId>),
    Exhausted,
    Poisoned,
}

/// A forward (ascending) or reverse (descending) walk over value-bearing
/// nodes, bounded to an optional ascent anchor (used by prefix-scoped
/// views); everything else (`KeySet`, `SubMap`, the top-level `iter()`) is
/// `stop_at: None`.
pub struct RangeIter<'a, C: BitCodec, V> {
    trie: &'a BitTrie<C, V>,
    descending: bool,
    stop_at: Option<NodeId>,
    /// The node to yield on the first `try_next` call from `Fresh`; bounds
    /// on later steps are enforced by the caller (`take_while` in
    /// `SubMap::iter`, `stop_at` above in `PrefixMap::iter`), not by this
    /// field.
    fence: Option<NodeId>,
    state: State,
    snapshot: u64,
}

impl<'a, C: BitCodec, V: Clone> RangeIter<'a, C, V> {
    pub(crate) fn new(
        trie: &'a BitTrie<C, V>,
        start: Option<NodeId>,
        descending: bool,
        stop_at: Option<NodeId>,
    ) -> Self {
        let snapshot = trie.mod_count();
        let state = match start {
            Some(_) => State::Fresh,
            None => State::Exhausted,
        };
        RangeIter {
            trie,
            descending,
            stop_at,
            fence: None,
            state,
            snapshot,
        }
        .seeded(start)
    }

    fn seeded(mut self, start: Option<NodeId>) -> Self {
        if let Some(n) = start {
            self.fence = Some(n);
            self.state = State::Fresh;
        }
        self
    }

    fn check_mod_count(&mut self) -> Result<()> {
        if self.trie.mod_count() != self.snapshot {
            self.state = State::Poisoned;
            tracing::warn!("fail-fast iterator observed a stale modification count");
            return Err(Error::ConcurrentModification);
        }
        Ok(())
    }

    fn step(&self, from: NodeId) -> Option<NodeId> {
        let inner = self.trie.borrow();
        if self.descending {
            inner.predecessor(from, self.stop_at)
        } else {
            inner.successor(from, self.stop_at)
        }
    }

    /// Advance and return the next `(key, value)` pair, or `None` once
    /// exhausted. Returns `Err` if the trie was structurally modified since
    /// this iterator (or its originating view) was created.
    pub fn try_next(&mut self) -> Result<Option<(C::Key, V)>> {
        if self.state == State::Poisoned {
            return Err(Error::ConcurrentModification);
        }
        self.check_mod_count()?;
        // `Fresh`/`Removed` already hold the node to yield next (computed by
        // `new`/`remove` respectively); only `Advanced` needs an actual step.
        let next_state = match self.state {
            State::Fresh => self.fence,
            State::Advanced(n) => self.step(n),
            State::Removed(resume) => resume,
            State::Exhausted => None,
            State::Poisoned => unreachable!(),
        };
        let Some(next_state) = next_state else {
            self.state = State::Exhausted;
            return Ok(None);
        };
        self.state = State::Advanced(next_state);
        let inner = self.trie.borrow();
        let key = inner.resolve_key(self.trie.codec(), next_state);
        let value = inner.value_of(next_state).clone();
        Ok(Some((key, value)))
    }

    /// Remove the element most recently returned by `try_next`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Error::NotFound)` if called before the first `try_next`
    /// or twice in a row without an intervening `try_next`, and
    /// `Err(Error::ConcurrentModification)` if the trie changed underneath
    /// this iterator in the meantime.
    pub fn remove(&mut self) -> Result<C::Key> {
        self.check_mod_count()?;
        let State::Advanced(node) = self.state else {
            return Err(Error::NotFound);
        };
        let resume = {
            let inner = self.trie.borrow();
            if self.descending {
                inner.predecessor(node, self.stop_at)
            } else {
                inner.successor(node, self.stop_at)
            }
        };
        let key = {
            let inner = self.trie.borrow();
            inner.resolve_key(self.trie.codec(), node)
        };
        self.trie.remove(&key)?;
        self.snapshot = self.trie.mod_count();
        self.state = State::Removed(resume);
        Ok(key)
    }
}

impl<'a, C: BitCodec, V: Clone> Iterator for RangeIter<'a, C, V> {
    type Item = Result<(C::Key, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
