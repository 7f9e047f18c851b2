use core::cmp::min;

use ufotofu::{BulkConsumer, BulkProducer};

use crate::dynamic::{Shape, Shaped};
use crate::varint::{decode_len, encode_len, len_of_len};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize, EncodeError};

/// How many payload bytes are requested from the producer at a time. Reading in chunks means a corrupt length prefix fails with an unexpected end of input instead of a huge allocation.
const CHUNK_SIZE: usize = 4096;

/// Writes a length prefix followed by the raw bytes.
pub(crate) async fn encode_bytes<C>(bytes: &[u8], consumer: &mut C) -> Result<(), EncodeError<C::Error>>
where
    C: BulkConsumer<Item = u8>,
{
    encode_len(bytes.len(), consumer).await?;
    consumer
        .bulk_consume_full_slice(bytes)
        .await
        .map_err(|err| err.into_reason())?;
    Ok(())
}

/// Reads a length prefix and then exactly that many raw bytes.
pub(crate) async fn decode_bytes<P>(producer: &mut P) -> Result<Vec<u8>, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let len = decode_len(producer).await?;
    let mut bytes = Vec::with_capacity(min(len, CHUNK_SIZE));

    while bytes.len() < len {
        let start = bytes.len();
        let end = min(len, start + CHUNK_SIZE);
        bytes.resize(end, 0);
        producer
            .bulk_overwrite_full_slice(&mut bytes[start..end])
            .await?;
    }

    Ok(bytes)
}

impl Encodable for str {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_bytes(self.as_bytes(), consumer).await
    }
}

impl EncodableKnownSize for str {
    fn len_of_encoding(&self) -> usize {
        len_of_len(self.len()) + self.len()
    }
}

impl Shaped for str {
    fn shape() -> Shape {
        Shape::Text
    }
}

impl Encodable for String {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        self.as_str().encode(consumer).await
    }
}

impl EncodableKnownSize for String {
    fn len_of_encoding(&self) -> usize {
        self.as_str().len_of_encoding()
    }
}

/// Errors with [`DecodeError::InvalidUtf8`] if the payload is not valid UTF-8. Use [`RawText`] to skip validation.
impl Decodable for String {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let bytes = decode_bytes(producer).await?;
        String::from_utf8(bytes).map_err(|err| DecodeError::InvalidUtf8(err.utf8_error()))
    }
}

impl Shaped for String {
    fn shape() -> Shape {
        Shape::Text
    }
}

/// Text as raw bytes, without any guarantee of being valid UTF-8.
///
/// Shares the wire format of [`String`] (a length prefix followed by the bytes), but decoding performs no validation, so any payload round-trips unchanged. Note that a `Vec<u8>` is a *sequence* of unsigned integers and is encoded differently.
///
/// ```
/// use lightweight::*;
///
/// let text = String::from("twoja stara XDDD");
/// let enc = encode(&text).unwrap();
/// assert_eq!(enc, encode(&RawText::from(text.clone())).unwrap());
///
/// let raw: RawText = decode_from_slice(&[4, 0xff, 0xfe]).unwrap();
/// assert_eq!(raw.as_bytes(), &[0xff, 0xfe]);
/// assert!(raw.to_str().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "dev", derive(arbitrary::Arbitrary))]
pub struct RawText(pub Vec<u8>);

impl RawText {
    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    /// Interprets the bytes as UTF-8.
    pub fn to_str(&self) -> Result<&str, core::str::Utf8Error> {
        core::str::from_utf8(&self.0)
    }
}

impl From<String> for RawText {
    fn from(value: String) -> Self {
        RawText(value.into_bytes())
    }
}

impl From<&str> for RawText {
    fn from(value: &str) -> Self {
        RawText(value.as_bytes().to_vec())
    }
}

impl From<RawText> for Vec<u8> {
    fn from(value: RawText) -> Self {
        value.0
    }
}

impl Encodable for RawText {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_bytes(&self.0, consumer).await
    }
}

impl EncodableKnownSize for RawText {
    fn len_of_encoding(&self) -> usize {
        len_of_len(self.0.len()) + self.0.len()
    }
}

impl Decodable for RawText {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        Ok(RawText(decode_bytes(producer).await?))
    }
}

impl Shaped for RawText {
    fn shape() -> Shape {
        Shape::Text
    }
}
