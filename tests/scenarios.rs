//! The concrete scenarios this crate's ordering, tree-shape, prefix and
//! fail-fast behavior are built against.
use bittrie::cidr_codec::{Ipv4Cidr, Ipv4CidrCodec};
use bittrie::string_codec::StringCodec;
use bittrie::trie::Options;
use bittrie::BitTrie;

fn cidr(s: &str) -> Ipv4Cidr {
    s.parse().unwrap()
}

/// S1 — CIDR ordering: shuffled insertion yields a fixed ascending order,
/// and the reverse order descending.
#[test]
fn s1_cidr_ordering() {
    let shuffled = [
        "127.255.255.0/24",
        "0.0.0.2/32",
        "0.0.0.0/30",
        "127.0.0.0/8",
        "0.0.0.0/8",
        "127.255.255.255/32",
        "0.0.0.0/24",
        "0.0.0.0/31",
        "127.255.0.0/16",
        "0.0.0.0/16",
    ];
    let trie = BitTrie::<Ipv4CidrCodec, usize>::new(Ipv4CidrCodec);
    for (i, s) in shuffled.iter().enumerate() {
        trie.put(&cidr(s), i).unwrap();
    }

    let expected = [
        "0.0.0.0/8",
        "0.0.0.0/16",
        "0.0.0.0/24",
        "0.0.0.0/30",
        "0.0.0.0/31",
        "0.0.0.2/32",
        "127.0.0.0/8",
        "127.255.0.0/16",
        "127.255.255.0/24",
        "127.255.255.255/32",
    ];

    let ascending: Vec<String> = trie
        .iter()
        .map(|r| r.unwrap().0.to_string())
        .collect();
    assert_eq!(ascending, expected);

    let mut reversed = expected.to_vec();
    reversed.reverse();
    let descending: Vec<String> = trie
        .iter_descending()
        .map(|r| r.unwrap().0.to_string())
        .collect();
    assert_eq!(descending, reversed);
}

/// S2 — CIDR tree shape: a shorter prefix sits strictly above its
/// extensions, and removing a leaf collapses its now-dead routing
/// ancestors without disturbing unrelated branches.
#[test]
fn s2_cidr_tree_shape() {
    let trie = BitTrie::<Ipv4CidrCodec, &'static str>::new(Ipv4CidrCodec);
    trie.put(&cidr("0.0.0.0/1"), "0/1").unwrap();
    trie.put(&cidr("0.0.0.0/3"), "0/3").unwrap();
    trie.put(&cidr("128.0.0.0/1"), "128/1").unwrap();
    trie.put(&cidr("224.0.0.0/3"), "224/3").unwrap();
    assert_eq!(trie.len(), 4);

    // 0.0.0.0/2 is routing-only: its longest present prefix is 0.0.0.0/1,
    // not 0.0.0.0/3 (which lies below it, not above).
    assert_eq!(
        trie.longest_prefix_of_value(&cidr("0.0.0.0/2"), true).unwrap(),
        Some("0/1")
    );
    assert_eq!(
        trie.longest_prefix_of_value(&cidr("0.0.0.0/3"), true).unwrap(),
        Some("0/3")
    );

    trie.remove(&cidr("224.0.0.0/3")).unwrap();
    assert_eq!(trie.len(), 3);
    // The routing node above it (224.0.0.0/2, 224.0.0.0/1-right-of-root)
    // must have collapsed away: nothing remains under 128.0.0.0/1 besides
    // 128.0.0.0/1 itself.
    assert_eq!(
        trie.longest_prefix_of_value(&cidr("224.0.0.0/3"), true).unwrap(),
        Some("128/1")
    );
    assert_eq!(trie.get(&cidr("128.0.0.0/1")).unwrap(), Some("128/1"));
}

/// S3 — string prefix map: a live `prefixed_by_map` view supports size,
/// ordered iteration, insertion and removal, all without disturbing the
/// rest of the trie.
#[test]
fn s3_string_prefix_map() {
    let names = [
        "Albert", "Xavier", "XyZ", "Anna", "Alien", "Alberto", "Alberts", "Allie", "Alliese",
        "Alabama", "Banane", "Blabla", "Amber", "Ammun", "Akka", "Akko", "Albertoo", "Amma",
    ];
    let trie = BitTrie::<StringCodec, String>::new(StringCodec::default());
    for name in names {
        trie.put(&name.to_string(), name.to_string()).unwrap();
    }

    let view = trie.prefixed_by_map(&"Al".to_string(), true).unwrap();
    let keys: Vec<String> = view
        .iter()
        .map(|r| r.unwrap().0)
        .collect();
    assert_eq!(keys.len(), 8);
    assert_eq!(keys.first().unwrap(), "Alabama");
    assert_eq!(keys.last().unwrap(), "Alliese");
    assert_eq!(
        keys,
        vec![
            "Alabama", "Albert", "Alberto", "Albertoo", "Alberts", "Alien", "Allie", "Alliese",
        ]
    );

    let prior_size = trie.len();
    view.put(&"Albertz".to_string(), "Albertz".to_string())
        .unwrap();
    assert_eq!(
        trie.get(&"Albertz".to_string()).unwrap(),
        Some("Albertz".to_string())
    );
    view.remove(&"Albertz".to_string()).unwrap();
    assert_eq!(trie.len(), prior_size);
}

/// S4 — prefix-of queries over a family of keys sharing long common roots.
#[test]
fn s4_prefix_of_values() {
    let words = [
        "and",
        "ant",
        "antacid",
        "ante",
        "antecede",
        "anteceded",
        "antecededs",
        "antecededsic",
        "antecedent",
        "antewest",
        "awe",
    ];
    let trie = BitTrie::<StringCodec, String>::new(StringCodec::default());
    for w in words {
        trie.put(&w.to_string(), w.to_string()).unwrap();
    }

    let probe = "antecede".to_string();
    assert_eq!(
        trie.longest_prefix_of_value(&probe, true).unwrap(),
        Some("antecede".to_string())
    );
    assert_eq!(
        trie.longest_prefix_of_value(&probe, false).unwrap(),
        Some("ante".to_string())
    );
    assert_eq!(
        trie.shortest_prefix_of_value(&probe, true).unwrap(),
        Some("ant".to_string())
    );
    assert_eq!(
        trie.prefix_of_values(&probe, true).unwrap(),
        vec!["ant".to_string(), "ante".to_string(), "antecede".to_string()]
    );
    assert_eq!(
        trie.prefixed_by_values(&probe, false).unwrap(),
        vec![
            "anteceded".to_string(),
            "antecededs".to_string(),
            "antecededsic".to_string(),
            "antecedent".to_string(),
        ]
    );

    let entries = trie.prefixed_by_entries(&"ant".to_string(), false).unwrap();
    k9::snapshot!(
        entries,
        r#"
[
    (
        "antacid",
        "antacid",
    ),
    (
        "ante",
        "ante",
    ),
    (
        "antecede",
        "antecede",
    ),
    (
        "anteceded",
        "anteceded",
    ),
    (
        "antecededs",
        "antecededs",
    ),
    (
        "antecededsic",
        "antecededsic",
    ),
    (
        "antecedent",
        "antecedent",
    ),
    (
        "antewest",
        "antewest",
    ),
]
"#
    );
}

/// S5 — an empty key has no bits to walk and is rejected outright.
#[test]
fn s5_empty_prefix_rejected() {
    let trie = BitTrie::<StringCodec, String>::new(StringCodec::default());
    let err = trie.prefixed_by_map(&String::new(), true).unwrap_err();
    assert!(matches!(err, bittrie::Error::InvalidArgument(_)));
}

/// S6 — mutating the trie directly while a view's iterator is alive
/// surfaces as `ConcurrentModification` on the iterator's next step, never
/// as stale or inconsistent data.
#[test]
fn s6_fail_fast() {
    let trie = BitTrie::<StringCodec, String>::new(StringCodec::default());
    trie.put(&"Akka".to_string(), "Akka".to_string()).unwrap();
    trie.put(&"Akko".to_string(), "Akko".to_string()).unwrap();

    let view = trie.prefixed_by_map(&"Ak".to_string(), true).unwrap();
    let mut iter = view.iter();
    assert!(iter.next().is_some());

    trie.put(&"Amber".to_string(), "Amber".to_string()).unwrap();

    match iter.next() {
        Some(Err(bittrie::Error::ConcurrentModification)) => {}
        other => panic!("expected ConcurrentModification, got {other:?}"),
    }
}

/// Property 9 — descending duality: `descending_map().iter()` is the
/// reverse of `iter()`, and a descending view's `head_map` restricts the
/// way an ascending `tail_map` would.
#[test]
fn descending_map_duality() {
    let trie = BitTrie::<Ipv4CidrCodec, usize>::new(Ipv4CidrCodec);
    for (i, s) in ["10.0.0.0/8", "10.1.0.0/16", "192.168.0.0/16"]
        .iter()
        .enumerate()
    {
        trie.put(&cidr(s), i).unwrap();
    }

    let ascending: Vec<Ipv4Cidr> = trie.iter().map(|r| r.unwrap().0).collect();
    let mut expected_descending = ascending.clone();
    expected_descending.reverse();
    let descending: Vec<Ipv4Cidr> = trie
        .descending_map()
        .iter()
        .map(|r| r.unwrap().0)
        .collect();
    assert_eq!(descending, expected_descending);

    // descending_map().head_map(bound, true) keeps every key >= bound,
    // which is exactly what ascending tail_map(bound, true) keeps.
    let bound = cidr("10.1.0.0/16");
    let via_descending: Vec<Ipv4Cidr> = trie
        .descending_map()
        .head_map(bound, true)
        .iter()
        .map(|r| r.unwrap().0)
        .collect();
    let mut via_ascending: Vec<Ipv4Cidr> = trie
        .tail_map(bound, true)
        .iter()
        .map(|r| r.unwrap().0)
        .collect();
    via_ascending.reverse();
    assert_eq!(via_descending, via_ascending);
}

#[test]
fn serialization_round_trips_both_modes() {
    let trie = BitTrie::<Ipv4CidrCodec, u32>::new(Ipv4CidrCodec);
    trie.put(&cidr("10.0.0.0/8"), 1).unwrap();
    trie.put(&cidr("10.1.0.0/16"), 2).unwrap();

    let tree_bytes = trie.to_bytes().unwrap();
    let restored =
        BitTrie::<Ipv4CidrCodec, u32>::from_bytes(Ipv4CidrCodec, Options::default(), &tree_bytes)
            .unwrap();
    assert_eq!(restored.len(), trie.len());

    let flat_options = Options {
        write_keys: true,
        cache_keys: false,
    };
    let flat_trie = BitTrie::with_options(Ipv4CidrCodec, flat_options);
    flat_trie.put(&cidr("10.0.0.0/8"), 1).unwrap();
    let flat_bytes = flat_trie.to_bytes().unwrap();
    let restored_flat =
        BitTrie::<Ipv4CidrCodec, u32>::from_bytes(Ipv4CidrCodec, flat_options, &flat_bytes)
            .unwrap();
    assert_eq!(restored_flat.get(&cidr("10.0.0.0/8")).unwrap(), Some(1));
}
