//! Property-based tests for encoding round-trips.

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;

use lightweight::dynamic::{FieldShape, IntWidth, Shape, Shaped, Value};
use lightweight::*;

aggregate! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Account {
        pub owner: String,
        pub balance: i64,
        pub flags: [bool; 3],
        pub(crate) session: u32,
        pub history: Vec<(u16, String)>,
        pin: u16,
    }
}

fn arb_account() -> impl Strategy<Value = Account> {
    (
        ".*",
        any::<i64>(),
        any::<[bool; 3]>(),
        any::<u32>(),
        prop::collection::vec((any::<u16>(), "[a-z]{0,8}"), 0..8),
        any::<u16>(),
    )
        .prop_map(|(owner, balance, flags, session, history, pin)| Account {
            owner,
            balance,
            flags,
            session,
            history,
            pin,
        })
}

/// Strategy for generating dynamic values together with the shape they decode as.
fn arb_shaped_value() -> impl Strategy<Value = (Shape, Value)> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(|b| (Shape::Bool, Value::Bool(b))),
        any::<u64>().prop_map(|n| (Shape::Unsigned(IntWidth::SixtyFour), Value::Unsigned(n))),
        any::<i64>().prop_map(|n| (Shape::Signed(IntWidth::SixtyFour), Value::Signed(n))),
        any::<u8>().prop_map(|n| (Shape::Unsigned(IntWidth::Eight), Value::Unsigned(n as u64))),
        any::<i16>().prop_map(|n| (Shape::Signed(IntWidth::Sixteen), Value::Signed(n as i64))),
        // Filter out NaN since NaN != NaN
        any::<f64>()
            .prop_filter("not NaN", |f| !f.is_nan())
            .prop_map(|f| (Shape::F64, Value::F64(f))),
        ".*".prop_map(|s| (Shape::Text, Value::from(s))),
    ];

    leaf.prop_recursive(3, 64, 8, |inner| {
        prop_oneof![
            // Sequences of values sharing the shape of the first one.
            (inner.clone(), 0..6usize).prop_map(|((shape, value), len)| {
                (Shape::Seq(Box::new(shape)), Value::Seq(vec![value; len]))
            }),
            (inner.clone(), 0..4usize).prop_map(|((shape, value), len)| {
                (Shape::Array(Box::new(shape), len), Value::Seq(vec![value; len]))
            }),
            (inner.clone(), inner.clone()).prop_map(|((key_shape, key), (value_shape, value))| {
                (
                    Shape::Map(Box::new(key_shape), Box::new(value_shape)),
                    Value::Map(vec![(key, value)]),
                )
            }),
            prop::collection::vec(inner, 0..4).prop_map(|fields| {
                let (shapes, values): (Vec<_>, Vec<_>) = fields
                    .into_iter()
                    .enumerate()
                    .map(|(i, (shape, value))| {
                        let name = format!("f{}", i);
                        (
                            FieldShape::public(name.clone(), shape),
                            lightweight::dynamic::Field::public(name, value),
                        )
                    })
                    .unzip();
                (Shape::Aggregate(shapes), Value::Aggregate(values))
            }),
        ]
    })
}

proptest! {
    #[test]
    fn integer_roundtrip(a in any::<i64>(), b in any::<u64>(), c in any::<i8>(), d in any::<usize>()) {
        prop_assert_eq!(decode_from_slice::<i64>(&encode(&a).unwrap()), Ok(a));
        prop_assert_eq!(decode_from_slice::<u64>(&encode(&b).unwrap()), Ok(b));
        prop_assert_eq!(decode_from_slice::<i8>(&encode(&c).unwrap()), Ok(c));
        prop_assert_eq!(decode_from_slice::<usize>(&encode(&d).unwrap()), Ok(d));
    }

    #[test]
    fn integer_width_does_not_change_the_encoding(n in any::<i16>(), m in any::<u32>()) {
        prop_assert_eq!(encode(&n).unwrap(), encode(&(n as i64)).unwrap());
        prop_assert_eq!(encode(&m).unwrap(), encode(&(m as u64)).unwrap());
        prop_assert_eq!(decode_from_slice::<u64>(&encode(&m).unwrap()), Ok(m as u64));
    }

    #[test]
    fn narrowing_truncates(n in any::<u64>(), m in any::<i64>()) {
        prop_assert_eq!(decode_from_slice::<u16>(&encode(&n).unwrap()), Ok(n as u16));
        prop_assert_eq!(decode_from_slice::<i32>(&encode(&m).unwrap()), Ok(m as i32));
    }

    #[test]
    fn floats_are_bit_exact(a in any::<u64>(), b in any::<u32>()) {
        let a = f64::from_bits(a);
        let b = f32::from_bits(b);
        prop_assert_eq!(decode_from_slice::<f64>(&encode(&a).unwrap()).unwrap().to_bits(), a.to_bits());
        prop_assert_eq!(decode_from_slice::<f32>(&encode(&b).unwrap()).unwrap().to_bits(), b.to_bits());
    }

    #[test]
    fn text_roundtrip(s in ".*", raw in prop::collection::vec(any::<u8>(), 0..64)) {
        let enc = encode(&s).unwrap();
        prop_assert_eq!(enc.len(), s.len_of_encoding());
        prop_assert_eq!(decode_from_slice::<String>(&enc), Ok(s));

        let raw = RawText(raw);
        prop_assert_eq!(decode_from_slice::<RawText>(&encode(&raw).unwrap()), Ok(raw));
    }

    #[test]
    fn collection_roundtrip(
        items in prop::collection::vec(any::<i32>(), 0..100),
        map in prop::collection::hash_map(".*", any::<bool>(), 0..10),
        sorted in prop::collection::btree_map(any::<u8>(), prop::collection::vec(any::<i64>(), 0..4), 0..10),
    ) {
        prop_assert_eq!(decode_from_slice::<Vec<i32>>(&encode(&items).unwrap()), Ok(items));
        prop_assert_eq!(decode_from_slice::<HashMap<String, bool>>(&encode(&map).unwrap()), Ok(map));

        let enc = encode(&sorted).unwrap();
        prop_assert_eq!(enc.clone(), encode(&sorted.clone()).unwrap());
        prop_assert_eq!(decode_from_slice::<BTreeMap<u8, Vec<i64>>>(&enc), Ok(sorted));
    }

    #[test]
    fn aggregate_roundtrip(account in arb_account()) {
        let enc = encode(&account).unwrap();
        prop_assert_eq!(enc.len(), account.len_of_encoding());

        let mut decoded = Account { session: 77, pin: 4321, ..Account::default() };
        decode(&enc, &mut decoded).unwrap();
        prop_assert_eq!(
            decoded,
            Account { session: 77, pin: 4321, ..account.clone() }
        );
        prop_assert_eq!(
            decode_from_slice::<Account>(&enc),
            Ok(Account { session: 0, pin: 0, ..account.clone() })
        );

        let value = decode_value(&enc, &Account::shape()).unwrap();
        prop_assert_eq!(encode_value(&value).unwrap(), enc);
    }

    #[test]
    fn dynamic_roundtrip((shape, value) in arb_shaped_value()) {
        let enc = encode_value(&value).unwrap();
        prop_assert_eq!(decode_value(&enc, &shape), Ok(value));
    }

    #[test]
    fn truncated_input_is_an_unexpected_end(items in prop::collection::vec(".*", 1..8)) {
        let enc = encode(&items).unwrap();
        for cut in 0..enc.len() {
            prop_assert_eq!(
                decode_from_slice::<Vec<String>>(&enc[..cut]),
                Err(DecodeError::UnexpectedEndOfInput(()))
            );
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode_from_slice::<Vec<(String, i64)>>(&bytes);
        let _ = decode_from_slice::<HashMap<u32, [f32; 2]>>(&bytes);
        let _ = decode_from_slice::<Account>(&bytes);
    }
}
