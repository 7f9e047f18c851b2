//! Checks for the properties that every codec of this crate upholds, meant to be fed with randomly generated inputs (see [`fuzz_invariants!`](crate::fuzz_invariants)).
//!
//! Values are compared with [`PartialEq`], so types containing floats should only be checked with inputs that contain no NaNs.

use core::fmt::Debug;
use core::num::NonZeroUsize;

use ufotofu::consumer::{IntoVec, TestConsumer};
use ufotofu::producer::{FromSlice, TestProducer, TestProducerBuilder};

use crate::dynamic::{Shape, Shaped, Value};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize};

/// Encodes into a vector, or returns `None` if the value cannot be encoded.
async fn encode_into_vec<T>(t: &T) -> Option<Vec<u8>>
where
    T: Encodable + ?Sized,
{
    let mut c = IntoVec::new();

    match t.encode(&mut c).await {
        Ok(()) => Some(c.into_vec()),
        Err(_) => None,
    }
}

/// Irrespective of the blocking/yielding and sizes of exposed slots of a consumer, encoding always produces the same encoding.
async fn assert_encoding_does_not_care_about_consumer_details<T>(
    t: &T,
    mut c1: TestConsumer<u8, (), ()>,
    mut c2: TestConsumer<u8, (), ()>,
) where
    T: Debug + Encodable + ?Sized,
{
    let res1 = t.encode(&mut c1).await;
    let res2 = t.encode(&mut c2).await;
    let consumed1 = c1.consumed();
    let consumed2 = c2.consumed();
    let common_len = core::cmp::min(consumed1.len(), consumed2.len());
    let status = format!(
        "First result after {} bytes: {:?}, second result after {} bytes: {:?}",
        consumed1.len(),
        res1,
        consumed2.len(),
        res2
    );
    assert_eq!(
        &consumed1[..common_len],
        &consumed2[..common_len],
        "The same value produced two different (prefixes of) encodings for two different consumers.\n\nValue: {:?}\n\n{status}\n\n\nFirst Consumer: {:?}\n\nFirst Encoding: {:?}\n\n\nSecond Consumer: {:?}\n\nSecond Encoding: {:?}", t, c1, consumed1, c2, consumed2,
    );
}

/// Irrespective of the blocking/yielding and sizes of exposed slots of a producer, decoding always produces the same value.
async fn assert_decoding_does_not_care_about_producer_details<T>(
    potential_encoding: &[u8],
    exposed_items_sizes1: Box<[NonZeroUsize]>,
    exposed_items_sizes2: Box<[NonZeroUsize]>,
    yield_pattern1: Box<[bool]>,
    yield_pattern2: Box<[bool]>,
) where
    T: Debug + PartialEq + Decodable,
{
    let mut p1: TestProducer<u8, (), ()> =
        TestProducerBuilder::new(potential_encoding.into(), Ok(()))
            .exposed_items_sizes(exposed_items_sizes1)
            .yield_pattern(yield_pattern1)
            .build();
    let mut p2: TestProducer<u8, (), ()> =
        TestProducerBuilder::new(potential_encoding.into(), Ok(()))
            .exposed_items_sizes(exposed_items_sizes2)
            .yield_pattern(yield_pattern2)
            .build();
    let res1 = T::decode(&mut p1).await;
    let res2 = T::decode(&mut p2).await;

    if res1 != res2 {
        panic!("Got different results from decoding the same bytestring because exposed item slot sizes and yield patterns of the producers differed.\n\nFirst Result: {:?}\n\nSecond Result: {:?}\n\nFirst TestProducer: {:?}\n\nSecond TestProducer: {:?}", res1, res2, p1, p2);
    }
}

/// Decoding never reads past the end of an encoding, so every byte it did read was necessary.
async fn assert_decoding_reads_no_excessive_bytes<T>(potential_encoding: &[u8])
where
    T: Debug + Decodable,
{
    let mut p = FromSlice::new(potential_encoding);

    if let Ok(t) = T::decode(&mut p).await {
        let minimal_enc = p.produced_so_far();
        if !minimal_enc.is_empty() {
            let mut p2 = FromSlice::new(&minimal_enc[..minimal_enc.len() - 1]);

            match T::decode(&mut p2).await {
                Err(DecodeError::UnexpectedEndOfInput(())) => {}
                res => panic!("Removing the final byte of a valid encoding and trying to decode again did not yield an UnexpectedEndOfInput error!\n\nThe Valid Encoding: {:?}\n\nWhat It Decoded To: {:?}\n\nThe Result After Decoding From One Less Byte: {:?}", minimal_enc, t, res),
            }
        }
    }
}

async fn assert_encoding_then_decoding_yields_the_original<T>(t: &T)
where
    T: Encodable + Decodable + PartialEq + Debug,
{
    let Some(enc) = encode_into_vec(t).await else {
        panic!("Failed to encode a statically typed value: {:?}", t);
    };

    let mut p = FromSlice::new(&enc[..]);
    match T::decode(&mut p).await {
        Ok(t2) => {
            if t != &t2 {
                panic!("Encoding then decoding a value yielded nonequal values.\n\nOriginal: {:?}\n\nEncoding: {:?}\n\nDecoded: {:?}", t, &enc[..], t2);
            }
            if p.produced_so_far().len() != enc.len() {
                panic!("Decoding did not read the full encoding.\n\nOriginal: {:?}\n\nEncoding: {:?}\n\nBytes Read: {:?}", t, &enc[..], p.produced_so_far().len());
            }
        }
        Err(err) => {
            panic!("Encoding then decoding a value resulted in failure to decode.\n\nOriginal: {:?}\n\nEncoding: {:?}\n\nDecoding Error: {:?}", t, &enc[..], err);
        }
    }
}

/// Panics if the input values (which should be generated randomly, so you do not need to know what they mean) certify a violation of any invariant of the [`Encodable`] or [`Decodable`] trait.
#[allow(clippy::too_many_arguments)]
pub async fn assert_basic_invariants<T>(
    t: &T,
    c1: TestConsumer<u8, (), ()>,
    c2: TestConsumer<u8, (), ()>,
    potential_encoding: &[u8],
    exposed_items_sizes1: Box<[NonZeroUsize]>,
    exposed_items_sizes2: Box<[NonZeroUsize]>,
    yield_pattern1: Box<[bool]>,
    yield_pattern2: Box<[bool]>,
) where
    T: Encodable + Decodable + PartialEq + Debug,
{
    assert_encoding_does_not_care_about_consumer_details(t, c1, c2).await;
    assert_decoding_does_not_care_about_producer_details::<T>(
        potential_encoding,
        exposed_items_sizes1,
        exposed_items_sizes2,
        yield_pattern1,
        yield_pattern2,
    )
    .await;
    assert_decoding_reads_no_excessive_bytes::<T>(potential_encoding).await;
    assert_encoding_then_decoding_yields_the_original(t).await;
}

/// Panics if [`EncodableKnownSize::len_of_encoding`] misreports the length of the encoding of `t`.
pub async fn assert_known_size_invariants<T>(t: &T)
where
    T: EncodableKnownSize + Debug + ?Sized,
{
    let Some(enc) = encode_into_vec(t).await else {
        panic!("Failed to encode a statically typed value: {:?}", t);
    };

    let claimed_len = t.len_of_encoding();

    if enc.len() != claimed_len {
        panic!("len_of_encoding reported an incorrect len.\n\nValue: {:?}\n\nClaimed Length: {:?}\n\nActual Encoding Length: {:?}\n\nEncoding: {:?}", t, claimed_len, enc.len(), &enc[..]);
    }
}

/// Panics if the runtime decoder, given the [`Shape`] of `T`, does not read the encoding of `t` into a [`Value`] that encodes to the very same bytes.
pub async fn assert_shape_invariants<T>(t: &T)
where
    T: Encodable + Shaped + Debug,
{
    let Some(enc) = encode_into_vec(t).await else {
        panic!("Failed to encode a statically typed value: {:?}", t);
    };
    let shape = T::shape();

    let mut p = FromSlice::new(&enc[..]);
    let value = match Value::decode_as(&shape, &mut p).await {
        Ok(value) => value,
        Err(err) => panic!("A static encoding failed to decode dynamically.\n\nValue: {:?}\n\nShape: {}\n\nEncoding: {:?}\n\nError: {:?}", t, shape, &enc[..], err),
    };

    if p.produced_so_far().len() != enc.len() {
        panic!("Decoding dynamically did not read the full static encoding.\n\nValue: {:?}\n\nShape: {}\n\nEncoding: {:?}\n\nDynamic Value: {:?}", t, shape, &enc[..], value);
    }

    match encode_into_vec(&value).await {
        Some(reencoded) if reencoded == enc => {}
        res => panic!("Reencoding a dynamically decoded value did not reproduce the static encoding.\n\nValue: {:?}\n\nShape: {}\n\nEncoding: {:?}\n\nDynamic Value: {:?}\n\nReencoding: {:?}", t, shape, &enc[..], value, res),
    }
}

/// Panics if decoding arbitrary bytes into a [`Value`] of the given [`Shape`] certifies a violation of the invariants of the runtime codec: decoded values must encode, the encoding must decode again, and doing so must be a fixpoint.
pub async fn assert_dynamic_invariants(shape: &Shape, potential_encoding: &[u8]) {
    let mut p = FromSlice::new(potential_encoding);
    let Ok(value) = Value::decode_as(shape, &mut p).await else {
        return;
    };

    let consumed = p.produced_so_far().len();
    if consumed > 0 {
        let mut p2 = FromSlice::new(&potential_encoding[..consumed - 1]);
        match Value::decode_as(shape, &mut p2).await {
            Err(DecodeError::UnexpectedEndOfInput(())) => {}
            res => panic!("Removing the final byte of a valid dynamic encoding did not yield an UnexpectedEndOfInput error.\n\nShape: {}\n\nEncoding: {:?}\n\nResult: {:?}", shape, &potential_encoding[..consumed], res),
        }
    }

    let Some(enc) = encode_into_vec(&value).await else {
        panic!("A decoded value could not be encoded.\n\nShape: {}\n\nValue: {:?}", shape, value);
    };

    let mut p3 = FromSlice::new(&enc[..]);
    match Value::decode_as(shape, &mut p3).await {
        Ok(value2) => match encode_into_vec(&value2).await {
            Some(enc2) if enc2 == enc => {}
            res => panic!("Decoding a reencoded value and encoding it again is not stable.\n\nShape: {}\n\nFirst Encoding: {:?}\n\nSecond Encoding: {:?}", shape, &enc[..], res),
        },
        Err(err) => panic!("The encoding of a decoded value failed to decode.\n\nShape: {}\n\nValue: {:?}\n\nEncoding: {:?}\n\nError: {:?}", shape, value, &enc[..], err),
    }
}

/// A macro for running fuzz tests that check all invariants of a statically typed codec. Usage:
///
/// ```rust,ignore
/// #![no_main]
///
/// lightweight::fuzz_invariants!(path::to_some::TypeToTest);
/// ```
///
/// Assumes that `libfuzzer_sys` and `pollster` are available.
#[macro_export]
macro_rules! fuzz_invariants {
    ($t:ty) => {
        use libfuzzer_sys::fuzz_target;

        use core::num::NonZeroUsize;

        use $crate::invariants::{
            assert_basic_invariants, assert_known_size_invariants, assert_shape_invariants,
        };
        use $crate::ufotofu::consumer::TestConsumer;

        fuzz_target!(|data: (
            $t,
            TestConsumer<u8, (), ()>,
            TestConsumer<u8, (), ()>,
            Box<[u8]>,
            Box<[NonZeroUsize]>,
            Box<[NonZeroUsize]>,
            Box<[bool]>,
            Box<[bool]>,
        )| {
            let (
                t,
                c1,
                c2,
                potential_encoding,
                exposed_items_sizes1,
                exposed_items_sizes2,
                yield_pattern1,
                yield_pattern2,
            ) = data;

            pollster::block_on(async {
                assert_basic_invariants(
                    &t,
                    c1,
                    c2,
                    &potential_encoding,
                    exposed_items_sizes1,
                    exposed_items_sizes2,
                    yield_pattern1,
                    yield_pattern2,
                )
                .await;

                assert_known_size_invariants(&t).await;

                assert_shape_invariants(&t).await;
            });
        });
    };
}
