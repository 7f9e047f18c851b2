use core::cmp::min;

use ufotofu::{BulkConsumer, BulkProducer};

use crate::dynamic::{Shape, Shaped};
use crate::varint::{decode_len, encode_len, len_of_len};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize, EncodeError};

/// The maximal number of elements for which space is reserved up front when decoding a variable-length container. Longer containers grow as their elements are decoded, so that a corrupt count cannot trigger a huge allocation.
pub const PREALLOCATION_LIMIT: usize = 4096;

/// Writes an element count followed by every element in order.
pub(crate) async fn encode_items<'a, T, I, C>(
    len: usize,
    items: I,
    consumer: &mut C,
) -> Result<(), EncodeError<C::Error>>
where
    T: Encodable + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    C: BulkConsumer<Item = u8>,
{
    encode_len(len, consumer).await?;
    for item in items {
        item.encode(consumer).await?;
    }
    Ok(())
}

/// Decodes exactly `len` elements.
pub(crate) async fn decode_items<T, P>(
    len: usize,
    producer: &mut P,
) -> Result<Vec<T>, DecodeError<P::Final, P::Error>>
where
    T: Decodable,
    P: BulkProducer<Item = u8>,
{
    let mut items = Vec::with_capacity(min(len, PREALLOCATION_LIMIT));
    for _ in 0..len {
        items.push(T::decode(producer).await?);
    }
    Ok(items)
}

impl<T: Encodable> Encodable for [T] {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_items(self.len(), self.iter(), consumer).await
    }
}

impl<T: EncodableKnownSize> EncodableKnownSize for [T] {
    fn len_of_encoding(&self) -> usize {
        len_of_len(self.len())
            + self
                .iter()
                .map(EncodableKnownSize::len_of_encoding)
                .sum::<usize>()
    }
}

impl<T: Shaped> Shaped for [T] {
    fn shape() -> Shape {
        Shape::Seq(Box::new(T::shape()))
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        self.as_slice().encode(consumer).await
    }
}

impl<T: EncodableKnownSize> EncodableKnownSize for Vec<T> {
    fn len_of_encoding(&self) -> usize {
        self.as_slice().len_of_encoding()
    }
}

/// Decodes as many elements as the encoded count announces, reserving space for at most [`PREALLOCATION_LIMIT`] of them up front.
///
/// Elements whose encoding is empty, such as `()` or aggregates without public fields, read no input at all. A count in the encoding is then taken at face value, however large it is, and decoding takes time proportional to it. Only decode such sequences from trusted input.
///
/// ```
/// use lightweight::*;
///
/// // A count of three, and nothing else.
/// assert_eq!(decode_from_slice::<Vec<()>>(&[6]), Ok(vec![(), (), ()]));
/// ```
impl<T: Decodable> Decodable for Vec<T> {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let len = decode_len(producer).await?;
        decode_items(len, producer).await
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::Seq(Box::new(T::shape()))
    }
}

/// Arrays encode exactly like slices, including the element count.
impl<T: Encodable, const N: usize> Encodable for [T; N] {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        self.as_slice().encode(consumer).await
    }
}

impl<T: EncodableKnownSize, const N: usize> EncodableKnownSize for [T; N] {
    fn len_of_encoding(&self) -> usize {
        self.as_slice().len_of_encoding()
    }
}

/// The element count is still read, and must equal `N`; otherwise decoding fails with [`DecodeError::LengthMismatch`] before any element is read.
impl<T: Decodable, const N: usize> Decodable for [T; N] {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let len = decode_len(producer).await?;
        if len != N {
            return Err(DecodeError::LengthMismatch {
                expected: N,
                actual: len,
            });
        }

        let items: Vec<T> = decode_items(N, producer).await?;
        items
            .try_into()
            .map_err(|items: Vec<T>| DecodeError::LengthMismatch {
                expected: N,
                actual: items.len(),
            })
    }
}

impl<T: Shaped, const N: usize> Shaped for [T; N] {
    fn shape() -> Shape {
        Shape::Array(Box::new(T::shape()), N)
    }
}
