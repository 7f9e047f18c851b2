//! Variable-length integers, and the length prefixes built from them.
//!
//! Unsigned integers use LEB128: seven payload bits per byte, least significant group first, with the most significant bit of every byte but the last one set. Signed integers are zig-zag mapped onto unsigned integers first, so that numbers of small magnitude stay short regardless of their sign.
//!
//! ```
//! use lightweight::varint::*;
//!
//! assert_eq!(zigzag_encode(0), 0);
//! assert_eq!(zigzag_encode(-1), 1);
//! assert_eq!(zigzag_encode(1), 2);
//! assert_eq!(zigzag_decode(3), -2);
//! assert_eq!(len_of_unsigned(300), 2);
//! ```

use either::Either::*;
use ufotofu::{BulkConsumer, BulkProducer};

use crate::{DecodeError, EncodeError};

/// The maximal number of bytes of a varint holding a 64-bit integer.
pub const MAX_VARINT_LEN: usize = 10;

/// Maps signed integers onto unsigned integers such that `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
pub const fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub const fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Returns the number of bytes in the varint encoding of `n`.
pub const fn len_of_unsigned(n: u64) -> usize {
    let mut len = 1;
    let mut rest = n >> 7;
    while rest != 0 {
        len += 1;
        rest >>= 7;
    }
    len
}

/// Returns the number of bytes in the zig-zag varint encoding of `n`.
pub const fn len_of_signed(n: i64) -> usize {
    len_of_unsigned(zigzag_encode(n))
}

/// Returns the number of bytes taken up by a length prefix for `len`.
pub fn len_of_len(len: usize) -> usize {
    len_of_signed(len as i64)
}

/// Produce exactly one byte, or return a [`DecodeError`].
pub async fn produce_byte<P>(producer: &mut P) -> Result<u8, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    match producer.produce().await {
        Ok(Left(byte)) => Ok(byte),
        Ok(Right(fin)) => Err(DecodeError::UnexpectedEndOfInput(fin)),
        Err(err) => Err(DecodeError::Producer(err)),
    }
}

/// Writes `n` as an unsigned varint.
pub async fn encode_unsigned<C>(n: u64, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
where
    C: BulkConsumer<Item = u8>,
{
    let mut raw = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    let mut rest = n;

    while rest >= 0x80 {
        raw[len] = (rest as u8) | 0x80;
        rest >>= 7;
        len += 1;
    }
    raw[len] = rest as u8;
    len += 1;

    consumer
        .bulk_consume_full_slice(&raw[..len])
        .await
        .map_err(|err| err.into_reason())?;

    Ok(())
}

/// Writes `n` as a zig-zag varint.
pub async fn encode_signed<C>(n: i64, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
where
    C: BulkConsumer<Item = u8>,
{
    encode_unsigned(zigzag_encode(n), consumer).await
}

/// Reads an unsigned varint.
///
/// Non-minimal encodings are accepted. Errors with [`DecodeError::VarintOverflow`] if the varint does not end within [`MAX_VARINT_LEN`] bytes or if its value does not fit into 64 bits.
pub async fn decode_unsigned<P>(producer: &mut P) -> Result<u64, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let mut n: u64 = 0;
    let mut shift = 0;

    for i in 0..MAX_VARINT_LEN {
        let byte = produce_byte(producer).await?;

        if byte < 0x80 {
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeError::VarintOverflow);
            }
            return Ok(n | (byte as u64) << shift);
        }

        n |= ((byte & 0x7f) as u64) << shift;
        shift += 7;
    }

    Err(DecodeError::VarintOverflow)
}

/// Reads a zig-zag varint.
pub async fn decode_signed<P>(producer: &mut P) -> Result<i64, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    Ok(zigzag_decode(decode_unsigned(producer).await?))
}

/// Writes a length or count prefix.
///
/// Lengths are signed varints on the wire, so the empty container encodes as the single byte `0x00` and a length of three as `0x06`.
pub async fn encode_len<C>(len: usize, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
where
    C: BulkConsumer<Item = u8>,
{
    encode_signed(len as i64, consumer).await
}

/// Reads a length or count prefix.
pub async fn decode_len<P>(producer: &mut P) -> Result<usize, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let len = decode_signed(producer).await?;
    if len < 0 {
        return Err(DecodeError::NegativeLength(len));
    }

    Ok(usize::try_from(len as u64)?)
}
