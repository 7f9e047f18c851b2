//! Associative collections: a pair count, followed by every key and its value.
//!
//! Pairs are written in the iteration order of the map. For a [`HashMap`] that order is unspecified, so two equal hash maps with more than one entry may well encode to different bytestrings. [`BTreeMap`]s encode in key order.
//!
//! When decoding, a key that occurs more than once is bound to the value of its last occurrence.

use core::cmp::min;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap};

use ufotofu::{BulkConsumer, BulkProducer};

use crate::dynamic::{Shape, Shaped};
use crate::sequence::PREALLOCATION_LIMIT;
use crate::varint::{decode_len, encode_len, len_of_len};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize, EncodeError};

/// Writes a pair count followed by every key and value.
pub(crate) async fn encode_pairs<'a, K, V, I, C>(
    len: usize,
    pairs: I,
    consumer: &mut C,
) -> Result<(), EncodeError<C::Error>>
where
    K: Encodable + 'a,
    V: Encodable + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
    C: BulkConsumer<Item = u8>,
{
    encode_len(len, consumer).await?;
    for (key, value) in pairs {
        key.encode(consumer).await?;
        value.encode(consumer).await?;
    }
    Ok(())
}

impl<K, V, S> Encodable for HashMap<K, V, S>
where
    K: Encodable,
    V: Encodable,
{
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_pairs(self.len(), self.iter(), consumer).await
    }
}

impl<K, V, S> EncodableKnownSize for HashMap<K, V, S>
where
    K: EncodableKnownSize,
    V: EncodableKnownSize,
{
    fn len_of_encoding(&self) -> usize {
        len_of_len(self.len())
            + self
                .iter()
                .map(|(key, value)| key.len_of_encoding() + value.len_of_encoding())
                .sum::<usize>()
    }
}

impl<K, V, S> Decodable for HashMap<K, V, S>
where
    K: Decodable + Eq + Hash,
    V: Decodable,
    S: BuildHasher + Default,
{
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let len = decode_len(producer).await?;
        let mut map =
            HashMap::with_capacity_and_hasher(min(len, PREALLOCATION_LIMIT), S::default());

        for _ in 0..len {
            let key = K::decode(producer).await?;
            let value = V::decode(producer).await?;
            map.insert(key, value);
        }

        Ok(map)
    }
}

impl<K: Shaped, V: Shaped, S> Shaped for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

impl<K, V> Encodable for BTreeMap<K, V>
where
    K: Encodable,
    V: Encodable,
{
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_pairs(self.len(), self.iter(), consumer).await
    }
}

impl<K, V> EncodableKnownSize for BTreeMap<K, V>
where
    K: EncodableKnownSize,
    V: EncodableKnownSize,
{
    fn len_of_encoding(&self) -> usize {
        len_of_len(self.len())
            + self
                .iter()
                .map(|(key, value)| key.len_of_encoding() + value.len_of_encoding())
                .sum::<usize>()
    }
}

impl<K, V> Decodable for BTreeMap<K, V>
where
    K: Decodable + Ord,
    V: Decodable,
{
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let len = decode_len(producer).await?;
        let mut map = BTreeMap::new();

        for _ in 0..len {
            let key = K::decode(producer).await?;
            let value = V::decode(producer).await?;
            map.insert(key, value);
        }

        Ok(map)
    }
}

impl<K: Shaped, V: Shaped> Shaped for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}
