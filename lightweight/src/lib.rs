//! # Lightweight
//!
//! A minimal, schema-less binary codec. A value is encoded into a compact bytestring that carries no type information at all; decoding requires a destination of matching shape, and it is that shape alone which decides how the bytes are interpreted.
//!
//! ```
//! use lightweight::*;
//!
//! let enc = encode(&vec![2i64, -1432478247832253454, 3, -7]).unwrap();
//!
//! let mut dest: Vec<i64> = vec![];
//! decode(&enc, &mut dest).unwrap();
//! assert_eq!(dest, vec![2, -1432478247832253454, 3, -7]);
//! ```
//!
//! ## Wire Format
//!
//! | Category | Encoding |
//! |---|---|
//! | `bool` | one byte, `1` for true and `0` for false; decoding treats every byte other than `1` as false |
//! | unsigned integers | LEB128 varint of the value, regardless of width |
//! | signed integers | zig-zag varint of the value, regardless of width |
//! | `f32`, `f64` | unsigned varint of the IEEE 754 bit pattern |
//! | text | length prefix, then the UTF-8 bytes |
//! | sequences and arrays | element count, then every element in order |
//! | maps | pair count, then key and value of every pair |
//! | aggregates | every public field in declaration order, nothing else |
//!
//! Every length and count is a *signed* zig-zag varint (see [`varint`]), so the empty text, sequence or map is the single byte `0x00`. Integer decoding narrows to the destination width with a truncating cast. Fixed-size arrays must find exactly their own length in the encoding.
//!
//! ## Traits
//!
//! The [`Encodable`] and [`Decodable`] traits describe how to convert between values and bytestrings. They are implemented for the closed set of supported categories: [`bool`], all primitive integers, [`f32`], [`f64`], [`String`], [`str`], [`RawText`], [`Vec`], slices, arrays, [`HashMap`](std::collections::HashMap), [`BTreeMap`](std::collections::BTreeMap), tuples, `()`, and structs declared with [`aggregate!`]. Types outside of that set do not implement the traits, so trying to encode them is a type error. [`EncodableKnownSize`] computes the size of an encoding without performing it.
//!
//! The traits encode into any [`BulkConsumer`](ufotofu::BulkConsumer) and decode from any [`BulkProducer`](ufotofu::BulkProducer) of bytes. Their methods are `async` only so that they can work with asynchronous byte sources and sinks; [`encode`], [`decode`] and friends drive them to completion on in-memory buffers.
//!
//! ## Dynamic Values
//!
//! When the shape of a value is only known at runtime, the [`dynamic`] module offers the [`Value`](dynamic::Value) and [`Shape`](dynamic::Shape) types, with [`encode_value`] and [`decode_value`] as entry points. Both representations share the same wire format.
//!
//! ## Property Testing
//!
//! When the `dev` feature is enabled, the [`invariants`] module provides helpers for checking the properties every codec of this crate upholds, and the crate root provides the [`fuzz_invariants!`] macro for [fuzz testing](https://rust-fuzz.github.io/book/introduction.html) them.

use core::convert::Infallible;

use ufotofu::consumer::IntoVec;
use ufotofu::producer::FromSlice;

pub use ufotofu;

#[cfg(feature = "dev")]
pub mod invariants;

mod error;
pub use error::*;

mod encode;
pub use encode::*;

mod decode;
pub use decode::*;

pub mod varint;

mod scalar;

mod text;
pub use text::RawText;

mod sequence;
pub use sequence::PREALLOCATION_LIMIT;

mod map;

mod aggregate;

pub mod dynamic;
use dynamic::{Shape, Value};

/// Encodes a value into a fresh byte vector.
///
/// ```
/// use lightweight::*;
///
/// assert_eq!(encode(&-2137i64).unwrap(), [0xb1, 0x21]);
/// assert_eq!(encode("").unwrap(), [0x00]);
/// ```
pub fn encode<T>(value: &T) -> Result<Vec<u8>, EncodeError<Infallible>>
where
    T: Encodable + ?Sized,
{
    let mut consumer = IntoVec::new();

    match pollster::block_on(value.encode(&mut consumer)) {
        Ok(()) => {
            let enc = consumer.into_vec();
            tracing::trace!(len = enc.len(), "encoded value");
            Ok(enc)
        }
        Err(EncodeError::UnsupportedType(name)) => {
            tracing::debug!(%name, "cannot encode value of unsupported type");
            Err(EncodeError::UnsupportedType(name))
        }
        Err(EncodeError::Consumer(_)) => unreachable!("IntoVec never errors"),
    }
}

/// Decodes `bytes` into the given destination, whose type determines how the bytes are read.
///
/// Decoding happens in place: the non-encoded fields of aggregates keep their values (see [`Decodable::decode_into`]). If decoding fails, an aggregate destination may be left partially updated, while any other destination is left as it was. Any bytes following the encoding are ignored; use [`decode_prefix`] to find out how many bytes were read.
///
/// ```
/// use lightweight::*;
///
/// let mut dest = String::new();
/// decode(&[32, b't', b'w', b'o', b'j', b'a', b' ', b's', b't', b'a', b'r', b'a', b' ', b'X', b'D', b'D', b'D'], &mut dest).unwrap();
/// assert_eq!(dest, "twoja stara XDDD");
///
/// assert_eq!(
///     decode(&[0xac], &mut 0u16),
///     Err(DecodeError::UnexpectedEndOfInput(()))
/// );
/// ```
pub fn decode<T>(bytes: &[u8], destination: &mut T) -> Result<(), DecodeError<(), Infallible>>
where
    T: Decodable,
{
    let mut producer = FromSlice::new(bytes);

    match pollster::block_on(destination.decode_into(&mut producer)) {
        Ok(()) => {
            let len = producer.produced_so_far().len();
            tracing::trace!(len, trailing = bytes.len() - len, "decoded value in place");
            Ok(())
        }
        Err(err) => {
            tracing::debug!(
                %err,
                consumed = producer.produced_so_far().len(),
                "failed to decode value in place"
            );
            Err(err)
        }
    }
}

/// Decodes a value of type `T` from the start of `bytes`, ignoring any trailing bytes.
pub fn decode_from_slice<T>(bytes: &[u8]) -> Result<T, DecodeError<(), Infallible>>
where
    T: Decodable,
{
    decode_prefix(bytes).map(|(value, _)| value)
}

/// Decodes a value of type `T` from the start of `bytes`, and returns it together with the number of bytes its encoding occupied.
///
/// ```
/// use lightweight::*;
///
/// let mut enc = encode(&300u32).unwrap();
/// enc.extend_from_slice(&[1, 2, 3]);
/// assert_eq!(decode_prefix::<u32>(&enc), Ok((300, 2)));
/// ```
pub fn decode_prefix<T>(bytes: &[u8]) -> Result<(T, usize), DecodeError<(), Infallible>>
where
    T: Decodable,
{
    let mut producer = FromSlice::new(bytes);

    match pollster::block_on(T::decode(&mut producer)) {
        Ok(value) => {
            let len = producer.produced_so_far().len();
            tracing::trace!(len, trailing = bytes.len() - len, "decoded value");
            Ok((value, len))
        }
        Err(err) => {
            tracing::debug!(
                %err,
                consumed = producer.produced_so_far().len(),
                "failed to decode value"
            );
            Err(err)
        }
    }
}

/// Encodes a dynamic [`Value`]. Fails with [`EncodeError::UnsupportedType`] if it reaches a [`Value::Opaque`].
///
/// ```
/// use lightweight::*;
/// use lightweight::dynamic::Value;
///
/// let value = Value::Seq(vec![Value::Signed(-1), Value::Signed(1)]);
/// assert_eq!(encode_value(&value).unwrap(), encode(&[-1i8, 1]).unwrap());
/// ```
pub fn encode_value(value: &Value) -> Result<Vec<u8>, EncodeError<Infallible>> {
    encode(value)
}

/// Decodes a dynamic [`Value`] of the given [`Shape`] from the start of `bytes`, ignoring any trailing bytes.
///
/// ```
/// use lightweight::*;
/// use lightweight::dynamic::{IntWidth, Shape, Value};
///
/// let shape = Shape::Seq(Box::new(Shape::Unsigned(IntWidth::Eight)));
/// assert_eq!(
///     decode_value(&[4, 7, 0xac, 0x02], &shape),
///     Ok(Value::Seq(vec![Value::Unsigned(7), Value::Unsigned(44)]))
/// );
/// ```
pub fn decode_value(bytes: &[u8], shape: &Shape) -> Result<Value, DecodeError<(), Infallible>> {
    let mut producer = FromSlice::new(bytes);

    match pollster::block_on(Value::decode_as(shape, &mut producer)) {
        Ok(value) => {
            tracing::trace!(
                len = producer.produced_so_far().len(),
                %shape,
                "decoded dynamic value"
            );
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(%err, %shape, "failed to decode dynamic value");
            Err(err)
        }
    }
}
