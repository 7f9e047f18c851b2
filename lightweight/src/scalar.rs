//! Booleans, integers of every width, and floats.
//!
//! Integer encodings do not depend on the width of the integer type: every unsigned integer is an unsigned varint and every signed integer a zig-zag varint. Decoding narrows the 64-bit varint into the destination with a truncating cast, without checking that the value fits. Floats are encoded as the unsigned varint of their IEEE 754 bit pattern.
//!
//! ```
//! use lightweight::*;
//!
//! assert_eq!(encode(&true).unwrap(), [1]);
//! assert_eq!(encode(&300u16).unwrap(), encode(&300u64).unwrap());
//! assert_eq!(decode_from_slice::<i8>(&encode(&-5i64).unwrap()).unwrap(), -5);
//! ```

use ufotofu::{BulkConsumer, BulkProducer};

use crate::dynamic::{IntWidth, Shape, Shaped};
use crate::varint::{self, produce_byte};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize, EncodeError};

impl Encodable for bool {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        consumer.consume(u8::from(*self)).await?;
        Ok(())
    }
}

impl EncodableKnownSize for bool {
    fn len_of_encoding(&self) -> usize {
        1
    }
}

/// Only the byte `1` decodes to `true`; every other byte decodes to `false`.
impl Decodable for bool {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        Ok(produce_byte(producer).await? == 1)
    }
}

impl Shaped for bool {
    fn shape() -> Shape {
        Shape::Bool
    }
}

macro_rules! unsigned_codec {
    (integer $int:ident; width $width:ident) => {
        impl Encodable for $int {
            async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
            where
                C: BulkConsumer<Item = u8>,
            {
                varint::encode_unsigned(*self as u64, consumer).await
            }
        }

        impl EncodableKnownSize for $int {
            fn len_of_encoding(&self) -> usize {
                varint::len_of_unsigned(*self as u64)
            }
        }

        impl Decodable for $int {
            async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
            where
                P: BulkProducer<Item = u8>,
            {
                Ok(varint::decode_unsigned(producer).await? as $int)
            }
        }

        impl Shaped for $int {
            fn shape() -> Shape {
                Shape::Unsigned(IntWidth::$width)
            }
        }
    };
}

macro_rules! signed_codec {
    (integer $int:ident; width $width:ident) => {
        impl Encodable for $int {
            async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
            where
                C: BulkConsumer<Item = u8>,
            {
                varint::encode_signed(*self as i64, consumer).await
            }
        }

        impl EncodableKnownSize for $int {
            fn len_of_encoding(&self) -> usize {
                varint::len_of_signed(*self as i64)
            }
        }

        impl Decodable for $int {
            async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
            where
                P: BulkProducer<Item = u8>,
            {
                Ok(varint::decode_signed(producer).await? as $int)
            }
        }

        impl Shaped for $int {
            fn shape() -> Shape {
                Shape::Signed(IntWidth::$width)
            }
        }
    };
}

macro_rules! float_codec {
    (float $float:ident; bits $bits:ident; shape $shape:ident) => {
        impl Encodable for $float {
            async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
            where
                C: BulkConsumer<Item = u8>,
            {
                varint::encode_unsigned(self.to_bits() as u64, consumer).await
            }
        }

        impl EncodableKnownSize for $float {
            fn len_of_encoding(&self) -> usize {
                varint::len_of_unsigned(self.to_bits() as u64)
            }
        }

        impl Decodable for $float {
            async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
            where
                P: BulkProducer<Item = u8>,
            {
                let bits = varint::decode_unsigned(producer).await? as $bits;
                Ok($float::from_bits(bits))
            }
        }

        impl Shaped for $float {
            fn shape() -> Shape {
                Shape::$shape
            }
        }
    };
}

unsigned_codec!(integer u8; width Eight);
unsigned_codec!(integer u16; width Sixteen);
unsigned_codec!(integer u32; width ThirtyTwo);
unsigned_codec!(integer u64; width SixtyFour);
unsigned_codec!(integer usize; width Pointer);

signed_codec!(integer i8; width Eight);
signed_codec!(integer i16; width Sixteen);
signed_codec!(integer i32; width ThirtyTwo);
signed_codec!(integer i64; width SixtyFour);
signed_codec!(integer isize; width Pointer);

float_codec!(float f32; bits u32; shape F32);
float_codec!(float f64; bits u64; shape F64);
