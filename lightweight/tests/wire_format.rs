use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use lightweight::dynamic::{IntWidth, Shape, Shaped, Value};
use lightweight::*;

fn round_trip<T>(value: T) -> Vec<u8>
where
    T: Encodable + EncodableKnownSize + Decodable + Default + PartialEq + Debug,
{
    let enc = encode(&value).unwrap();
    assert_eq!(enc.len(), value.len_of_encoding());

    let mut out = T::default();
    decode(&enc, &mut out).unwrap();
    assert_eq!(out, value);
    enc
}

#[test]
fn scalar_vectors() {
    assert_eq!(round_trip(-2137isize), [0xb1, 0x21]);
    round_trip(127i8);
    round_trip(12744i16);
    round_trip(-241849124i32);
    round_trip(-4328494328943244324i64);
    round_trip(18238943342984432443u64);
    round_trip(234u8);
    round_trip(43289u16);
    round_trip(432942389u32);
    round_trip(5932849324429344324u64);
    assert_eq!(round_trip(true), [1]);
    assert_eq!(round_trip(false), [0]);
    round_trip(48912348912389231.3213123123f64);
    round_trip(321321332.3213123123f32);
}

#[test]
fn collection_vectors() {
    round_trip(vec![2i64, -1432478247832253454, 3, -7]);
    assert_eq!(round_trip(vec![2usize, 1, 3, 7]), [8, 2, 1, 3, 7]);
    round_trip([1isize, -43432, 3, 4, 5]);
    assert_eq!(round_trip([1u64, 2, 3, 4, 5]), [10, 1, 2, 3, 4, 5]);
}

#[test]
fn text_vectors() {
    let enc = round_trip(String::from("twoja stara XDDD"));
    assert_eq!(enc.len(), 17);
    assert_eq!(enc[0], 32);

    let text = String::from("źóżź∂ż∆ż∂");
    let enc = round_trip(text.clone());
    assert_eq!(enc[0] as usize, text.len() * 2);
}

#[test]
fn empty_containers_are_a_single_zero_byte() {
    assert_eq!(round_trip(String::new()), [0]);
    assert_eq!(round_trip(Vec::<u64>::new()), [0]);
    assert_eq!(round_trip(HashMap::<String, bool>::new()), [0]);
    assert_eq!(round_trip(BTreeMap::<i8, Vec<u8>>::new()), [0]);
    assert_eq!(round_trip(RawText::default()), [0]);
}

#[test]
fn static_and_dynamic_encodings_agree() {
    let mut map = BTreeMap::new();
    map.insert(String::from("k"), (-1i32, [true, false]));
    let enc = encode(&map).unwrap();

    let shape = BTreeMap::<String, (i32, [bool; 2])>::shape();
    let value = decode_value(&enc, &shape).unwrap();
    assert_eq!(encode_value(&value).unwrap(), enc);

    let Value::Map(pairs) = &value else {
        panic!("expected a map, got {:?}", value);
    };
    assert_eq!(pairs[0].0, Value::from("k"));

    let back: BTreeMap<String, (i32, [bool; 2])> = decode_from_slice(&enc).unwrap();
    assert_eq!(back, map);
}

#[test]
fn errors_are_reported_without_panicking() {
    // Negative length.
    assert_eq!(
        decode_from_slice::<Vec<u8>>(&[0x03]),
        Err(DecodeError::NegativeLength(-2))
    );
    // Eleven continuation bytes.
    assert_eq!(
        decode_from_slice::<u64>(&[0xff; 11]),
        Err(DecodeError::VarintOverflow)
    );
    assert_eq!(
        decode_value(&[0x01], &Shape::Text),
        Err(DecodeError::NegativeLength(-1))
    );
    assert_eq!(
        decode_value(&[6, 1, 1, 1], &Shape::Array(Box::new(Shape::Bool), 2)),
        Err(DecodeError::LengthMismatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(
        decode_value(&[], &Shape::Signed(IntWidth::Pointer)),
        Err(DecodeError::UnexpectedEndOfInput(()))
    );
}

#[test]
fn error_messages_are_readable() {
    let err = decode_from_slice::<String>(&[4, 0xff, 0xff]).unwrap_err();
    assert!(err.to_string().contains("UTF-8"));

    let err = encode_value(&Value::Opaque(String::from("Rc<Node>"))).unwrap_err();
    assert!(err.to_string().contains("Rc<Node>"));
}
