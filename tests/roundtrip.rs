use bintag::prelude::*;
use proptest::{collection, prelude::*};

// NaN never compares equal, so float strategies exclude it; bit-exact
// preservation of NaN payloads is covered by the re-encode test below.
fn arb_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("NaN is not self-equal", |f| !f.is_nan())
}

fn arb_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN is not self-equal", |f| !f.is_nan())
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        any::<i8>().prop_map(Node::Byte),
        any::<i16>().prop_map(Node::Short),
        any::<i32>().prop_map(Node::Int),
        any::<i64>().prop_map(Node::Long),
        arb_f32().prop_map(Node::Float),
        arb_f64().prop_map(Node::Double),
        collection::vec(any::<u8>(), 0..64).prop_map(|v| Node::ByteArray(Bytes::from(v))),
        any::<String>().prop_map(Node::from),
        collection::vec(any::<i32>(), 0..64).prop_map(Node::IntArray),
        collection::vec(any::<i64>(), 0..64).prop_map(Node::LongArray),
    ]
}

/// Arbitrary trees a few levels deep, honoring list homogeneity by
/// dropping elements that do not match the first one generated.
fn arb_node() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(4, 48, 8, |inner| {
        prop_oneof![
            collection::vec(inner.clone(), 0..8).prop_map(|v| {
                let mut list = List::new();
                for node in v {
                    let _ = list.push(node);
                }
                Node::List(list)
            }),
            collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|entries| Node::Map(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, ..ProptestConfig::default() })]

    #[test]
    fn named_round_trip(name in any::<String>(), node in arb_node()) {
        let mut out = Vec::new();
        write_named(&mut out, &name, Some(&node)).unwrap();

        let mut limiter = Limiter::protocol();
        let (back_name, back) = read_named(&mut out.as_slice(), &mut limiter)
            .unwrap()
            .unwrap();

        prop_assert_eq!(back_name, name);
        prop_assert_eq!(back, node);
        // every push was matched by a pop
        prop_assert_eq!(limiter.depth(), 0);
        prop_assert_eq!(limiter.length(), out.len() as u64);
    }

    #[test]
    fn unnamed_round_trip(name in any::<String>(), node in arb_node()) {
        // a named stream read through the unnamed entry point drops the name
        let mut out = Vec::new();
        write_named(&mut out, &name, Some(&node)).unwrap();

        let mut limiter = Limiter::protocol();
        let back = read_unnamed(&mut out.as_slice(), &mut limiter).unwrap();
        prop_assert_eq!(back, Some(node));
    }

    #[test]
    fn plain_round_trip(node in arb_node()) {
        let mut out = Vec::new();
        write_plain(&mut out, Some(&node)).unwrap();

        let mut limiter = Limiter::protocol();
        let back = read_plain(&mut out.as_slice(), &mut limiter).unwrap();
        prop_assert_eq!(back, Some(node));
    }

    #[test]
    fn re_encoding_is_byte_identical(node in arb_node()) {
        // decode preserves map insertion order, so a decoded tree writes
        // back to exactly the bytes it came from
        let first = encode_full(Some(&node)).unwrap();
        let (_, back) = decode_full(&first, &mut Limiter::protocol())
            .unwrap()
            .unwrap();
        let second = encode_full(Some(&back)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unlimited_accepts_what_protocol_accepts(node in arb_node()) {
        let bytes = encode_full(Some(&node)).unwrap();
        let from_protocol = decode_full(&bytes, &mut Limiter::protocol()).unwrap();
        let from_unlimited = decode_full(&bytes, &mut Limiter::unlimited()).unwrap();
        prop_assert_eq!(from_protocol, from_unlimited);
    }
}
