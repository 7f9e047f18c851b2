use core::future::Future;

use ufotofu::BulkProducer;

use crate::DecodeError;

/// Methods for decoding a value of one of the supported categories.
///
/// The implementing type is the shape of the destination: since encodings carry no type information, every decision about how many bytes to read and how to interpret them is made by `Self`.
///
/// API contracts:
///
/// - The result of decoding must depend only on the decoded bytes, not on details of the producer such as when it yields or how many items it exposes at a time.
/// - For types that also implement [`Encodable`](crate::Encodable) and [`Eq`], encoding a value and then decoding it must yield a value equal to the original.
/// - `decode` must not read any bytes beyond the end of the encoding.
pub trait Decodable: Sized {
    /// Decodes the bytes produced by the given producer into a `Self`, or yields an error if the producer does not produce a valid encoding.
    fn decode<P>(
        producer: &mut P,
    ) -> impl Future<Output = Result<Self, DecodeError<P::Final, P::Error>>>
    where
        P: BulkProducer<Item = u8>;

    /// Decodes the bytes produced by the given producer into `self`.
    ///
    /// Aggregates only assign their encoded fields and leave all other fields as they are. Everything else is replaced by a freshly decoded value. If decoding fails, `self` may have been partially updated.
    fn decode_into<P>(
        &mut self,
        producer: &mut P,
    ) -> impl Future<Output = Result<(), DecodeError<P::Final, P::Error>>>
    where
        P: BulkProducer<Item = u8>,
    {
        async {
            *self = Self::decode(producer).await?;
            Ok(())
        }
    }
}
