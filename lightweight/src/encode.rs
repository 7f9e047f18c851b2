use core::future::Future;

use ufotofu::BulkConsumer;

use crate::EncodeError;

/// Methods for encoding a value of one of the supported categories.
///
/// API contracts:
///
/// - The encoding must not depend on details of the consumer such as when it yields or how many item slots it exposes at a time.
/// - The encoding carries no type information; it is the concatenation of the encodings of the value's parts, prefixed by a length where the category is variable-sized.
/// - For types that also implement [`Decodable`](crate::Decodable) and [`Eq`], encoding a value and then decoding it must yield a value equal to the original.
pub trait Encodable {
    /// Writes an encoding of `&self` into the given consumer.
    ///
    /// If this errors, the consumer may have received a partial encoding which must be discarded.
    fn encode<C>(&self, consumer: &mut C) -> impl Future<Output = Result<(), EncodeError<C::Error>>>
    where
        C: BulkConsumer<Item = u8>;
}

/// Encodables that can (efficiently and synchronously) precompute the length of their encoding.
///
/// API contract: `self.encode(c)` must write exactly `self.len_of_encoding()` many bytes into `c`.
pub trait EncodableKnownSize: Encodable {
    /// Computes the size of the encoding in bytes. Calling [`encode`](Encodable::encode) must feed exactly that many bytes into the consumer.
    fn len_of_encoding(&self) -> usize;
}

impl<T> Encodable for &T
where
    T: Encodable + ?Sized,
{
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        (**self).encode(consumer).await
    }
}

impl<T> EncodableKnownSize for &T
where
    T: EncodableKnownSize + ?Sized,
{
    fn len_of_encoding(&self) -> usize {
        (**self).len_of_encoding()
    }
}
