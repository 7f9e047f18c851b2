use core::fmt::{Debug, Display, Formatter};
use core::str::Utf8Error;
use std::error::Error;

use either::Either::*;
use ufotofu::ProduceAtLeastError;

/// Everything that can go wrong when encoding a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError<E> {
    /// The consumer of the encoded bytes errored.
    Consumer(E),
    /// The value (or one of its parts) has a shape outside the set of encodable categories. Carries a description of that shape.
    UnsupportedType(String),
}

impl<E> From<E> for EncodeError<E> {
    fn from(err: E) -> Self {
        EncodeError::Consumer(err)
    }
}

impl<E: Display> Display for EncodeError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::Consumer(err) => {
                write!(f, "The underlying consumer encountered an error: {}", err)
            }
            EncodeError::UnsupportedType(shape) => {
                write!(f, "Cannot encode a value of unsupported type {}", shape)
            }
        }
    }
}

impl<E> Error for EncodeError<E>
where
    E: 'static + Error,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Consumer(err) => Some(err),
            EncodeError::UnsupportedType(_) => None,
        }
    }
}

/// Everything that can go wrong when decoding a value.
///
/// `F` is the final value and `E` the error type of the producer the bytes are read from. Decoding from a slice reports `F = ()` and `E = Infallible`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError<F, E> {
    /// The producer emitted its final value before the encoding was complete.
    UnexpectedEndOfInput(F),
    /// The producer of the bytes to be decoded errored.
    Producer(E),
    /// The destination has a shape outside the set of decodable categories. Carries a description of that shape.
    UnsupportedType(String),
    /// The destination cannot be written to as described.
    InvalidDestination(String),
    /// A fixed-length destination was asked to hold a different number of elements than it has.
    LengthMismatch {
        /// The length of the destination.
        expected: usize,
        /// The length found in the encoding.
        actual: usize,
    },
    /// A length or count decoded to a negative number.
    NegativeLength(i64),
    /// Tried to use a u64 as a usize when the current compilation target's usize is not big enough.
    U64DoesNotFitUsize,
    /// A varint did not terminate within ten bytes, or its value exceeds 64 bits.
    VarintOverflow,
    /// Text decoded into a `String` was not valid UTF-8.
    InvalidUtf8(Utf8Error),
}

impl<F, E> From<ProduceAtLeastError<F, E>> for DecodeError<F, E> {
    fn from(err: ProduceAtLeastError<F, E>) -> Self {
        match err.reason {
            Left(fin) => DecodeError::UnexpectedEndOfInput(fin),
            Right(err) => DecodeError::Producer(err),
        }
    }
}

impl<F, E> From<core::num::TryFromIntError> for DecodeError<F, E> {
    fn from(_: core::num::TryFromIntError) -> Self {
        DecodeError::U64DoesNotFitUsize
    }
}

impl<F, E: Display> Display for DecodeError<F, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::UnexpectedEndOfInput(_) => {
                write!(f, "The input ended before the encoding was complete")
            }
            DecodeError::Producer(err) => {
                write!(f, "The underlying producer encountered an error: {}", err)
            }
            DecodeError::UnsupportedType(shape) => {
                write!(f, "Cannot decode into a destination of unsupported type {}", shape)
            }
            DecodeError::InvalidDestination(reason) => {
                write!(f, "Invalid decoding destination: {}", reason)
            }
            DecodeError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Encoded length {} does not match the fixed destination length {}",
                    actual, expected
                )
            }
            DecodeError::NegativeLength(len) => {
                write!(f, "Decoded a negative length: {}", len)
            }
            DecodeError::U64DoesNotFitUsize => {
                write!(f, "Tried (and failed) to decode a u64 to a 32-bit usize")
            }
            DecodeError::VarintOverflow => {
                write!(f, "A varint overflows a 64-bit integer")
            }
            DecodeError::InvalidUtf8(err) => {
                write!(f, "Decoded text is not valid UTF-8: {}", err)
            }
        }
    }
}

impl<F, E> Error for DecodeError<F, E>
where
    F: Debug,
    E: 'static + Error,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DecodeError::Producer(err) => Some(err),
            DecodeError::InvalidUtf8(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;

    #[test]
    fn display_mentions_the_lengths() {
        let err: DecodeError<(), Infallible> = DecodeError::LengthMismatch {
            expected: 5,
            actual: 3,
        };
        let message = err.to_string();
        assert!(message.contains('5'));
        assert!(message.contains('3'));
    }

    #[test]
    fn consumer_errors_convert() {
        let err: EncodeError<u8> = 7.into();
        assert_eq!(err, EncodeError::Consumer(7));
    }
}
