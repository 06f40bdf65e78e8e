//! A generic binary bit-trie: an ordered map keyed by anything that can be
//! exposed as a fixed-length sequence of bits, with first-class support for
//! prefix queries (`longest_prefix_of`, `prefixed_by`) and the
//! approximate-match navigable-map operations (`floor`, `ceiling`, `lower`,
//! `higher`) on top of plain `get`/`put`/`remove`.
//!
//! [`codec::BitCodec`] is the seam between key types and the trie engine;
//! [`cidr_codec::Ipv4CidrCodec`] instantiates it for IPv4 CIDR blocks and
//! [`string_codec::StringCodec`] instantiates it for byte strings, giving a
//! PATRICIA-style string trie over the same engine.
//!
//! ```
//! use bittrie::{BitTrie, cidr_codec::{Ipv4Cidr, Ipv4CidrCodec}};
//!
//! let trie = BitTrie::new(Ipv4CidrCodec);
//! trie.put(&"10.0.0.0/8".parse::<Ipv4Cidr>().unwrap(), "reserved").unwrap();
//! trie.put(&"10.1.2.0/24".parse::<Ipv4Cidr>().unwrap(), "lab").unwrap();
//!
//! let probe: Ipv4Cidr = "10.1.2.17/32".parse().unwrap();
//! assert_eq!(trie.longest_prefix_of_value(&probe, true).unwrap(), Some("lab"));
//! ```
//!
//! ## Concurrency
//!
//! `BitTrie` is single-threaded: its public API takes `&self` so that
//! `put`/`remove` can alias live iterators and views, not so it can be
//! shared across threads. Mutating a trie while an iterator from it is
//! alive is legal and detected: the iterator raises
//! [`error::Error::ConcurrentModification`] the next time it is stepped,
//! rather than returning inconsistent data.

pub mod cidr_codec;
pub mod codec;
pub mod error;
pub mod iter;
mod navigable;
mod node;
mod prefix;
pub mod ser;
pub mod string_codec;
pub mod trie;
pub mod view;

pub use codec::BitCodec;
pub use error::{Error, Result};
pub use trie::{BitTrie, Options};
