//! Aggregates: records of fields, encoded as the concatenation of their public fields in declaration order. Field names never appear in the encoding.
//!
//! Structs get their codec from the [`aggregate!`](crate::aggregate) macro. Tuples are aggregates whose fields are all public, and `()` is the aggregate without any fields.

use ufotofu::{BulkConsumer, BulkProducer};

use crate::dynamic::{FieldShape, Shape, Shaped};
use crate::{Decodable, DecodeError, Encodable, EncodableKnownSize, EncodeError};

/// Declares a struct together with its [`Encodable`](crate::Encodable), [`EncodableKnownSize`](crate::EncodableKnownSize), [`Decodable`](crate::Decodable) and [`Shaped`](crate::dynamic::Shaped) implementations.
///
/// Only fields declared with a plain `pub` are encoded, in declaration order. All other fields (private ones as well as `pub(crate)`, `pub(super)` and `pub(in path)` ones) are skipped: they are not encoded, [`decode`](crate::decode) leaves them as they are, and [`Decodable::decode`](crate::Decodable::decode) sets them to their [`Default`]. The type of every encoded field must implement the four traits itself; the types of skipped fields only need to implement [`Default`].
///
/// ```
/// use lightweight::*;
///
/// aggregate! {
///     #[derive(Debug, PartialEq)]
///     pub struct Entry {
///         pub key: String,
///         pub counts: Vec<u32>,
///         hits: u64,
///     }
/// }
///
/// let entry = Entry { key: "a".into(), counts: vec![1, 2], hits: 17 };
/// let enc = encode(&entry).unwrap();
/// assert_eq!(enc, [2, b'a', 4, 1, 2]);
///
/// let mut decoded = Entry { key: String::new(), counts: vec![], hits: 3 };
/// decode(&enc, &mut decoded).unwrap();
/// assert_eq!(decoded, Entry { key: "a".into(), counts: vec![1, 2], hits: 3 });
///
/// let fresh: Entry = decode_from_slice(&enc).unwrap();
/// assert_eq!(fresh.hits, 0);
/// ```
#[macro_export]
macro_rules! aggregate {
    // Restricted visibility: skipped.
    (@munch $name:ident [$($all:tt)*] [$($pubs:tt)*] [$($privs:tt)*]
        $(#[$m:meta])* pub ( $($restriction:tt)* ) $f:ident : $t:ty $(, $($rest:tt)*)?
    ) => {
        $crate::aggregate!(@munch $name
            [$($all)* $f : $t => false,]
            [$($pubs)*]
            [$($privs)* $f : $t,]
            $($($rest)*)?
        );
    };
    // Public: encoded.
    (@munch $name:ident [$($all:tt)*] [$($pubs:tt)*] [$($privs:tt)*]
        $(#[$m:meta])* pub $f:ident : $t:ty $(, $($rest:tt)*)?
    ) => {
        $crate::aggregate!(@munch $name
            [$($all)* $f : $t => true,]
            [$($pubs)* $f : $t,]
            [$($privs)*]
            $($($rest)*)?
        );
    };
    // Private: skipped.
    (@munch $name:ident [$($all:tt)*] [$($pubs:tt)*] [$($privs:tt)*]
        $(#[$m:meta])* $f:ident : $t:ty $(, $($rest:tt)*)?
    ) => {
        $crate::aggregate!(@munch $name
            [$($all)* $f : $t => false,]
            [$($pubs)*]
            [$($privs)* $f : $t,]
            $($($rest)*)?
        );
    };
    (@field_shape $f:ident, $t:ty, true) => {
        $crate::dynamic::FieldShape::public(
            ::core::stringify!($f),
            <$t as $crate::dynamic::Shaped>::shape(),
        )
    };
    (@field_shape $f:ident, $t:ty, false) => {
        $crate::dynamic::FieldShape::private(
            ::core::stringify!($f),
            $crate::dynamic::Shape::Opaque(::std::string::String::from(::core::stringify!($t))),
        )
    };
    (@munch $name:ident
        [$($f:ident : $t:ty => $public:tt,)*]
        [$($pf:ident : $pt:ty,)*]
        [$($xf:ident : $xt:ty,)*]
    ) => {
        impl $crate::Encodable for $name {
            #[allow(unused_variables)]
            async fn encode<C>(
                &self,
                consumer: &mut C,
            ) -> ::core::result::Result<(), $crate::EncodeError<C::Error>>
            where
                C: $crate::ufotofu::BulkConsumer<Item = u8>,
            {
                $(
                    $crate::Encodable::encode(&self.$pf, consumer).await?;
                )*
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::EncodableKnownSize for $name {
            fn len_of_encoding(&self) -> usize {
                0 $(+ $crate::EncodableKnownSize::len_of_encoding(&self.$pf))*
            }
        }

        impl $crate::Decodable for $name {
            #[allow(unused_variables)]
            async fn decode<P>(
                producer: &mut P,
            ) -> ::core::result::Result<Self, $crate::DecodeError<P::Final, P::Error>>
            where
                P: $crate::ufotofu::BulkProducer<Item = u8>,
            {
                $(
                    let $pf = <$pt as $crate::Decodable>::decode(producer).await?;
                )*
                ::core::result::Result::Ok($name {
                    $($pf,)*
                    $($xf: <$xt as ::core::default::Default>::default(),)*
                })
            }

            #[allow(unused_variables)]
            async fn decode_into<P>(
                &mut self,
                producer: &mut P,
            ) -> ::core::result::Result<(), $crate::DecodeError<P::Final, P::Error>>
            where
                P: $crate::ufotofu::BulkProducer<Item = u8>,
            {
                $(
                    $crate::Decodable::decode_into(&mut self.$pf, producer).await?;
                )*
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::dynamic::Shaped for $name {
            fn shape() -> $crate::dynamic::Shape {
                $crate::dynamic::Shape::Aggregate(::std::vec![
                    $($crate::aggregate!(@field_shape $f, $t, $public),)*
                ])
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($fields:tt)*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($fields)*
        }

        $crate::aggregate!(@munch $name [] [] [] $($fields)*);
    };
}

impl Encodable for () {
    async fn encode<C>(&self, _consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        Ok(())
    }
}

impl EncodableKnownSize for () {
    fn len_of_encoding(&self) -> usize {
        0
    }
}

impl Decodable for () {
    async fn decode<P>(_producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        Ok(())
    }
}

impl Shaped for () {
    fn shape() -> Shape {
        Shape::Aggregate(vec![])
    }
}

macro_rules! tuple_codec {
    ($($ty:ident $index:tt),+) => {
        impl<$($ty: Encodable),+> Encodable for ($($ty,)+) {
            async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
            where
                C: BulkConsumer<Item = u8>,
            {
                $(
                    self.$index.encode(consumer).await?;
                )+
                Ok(())
            }
        }

        impl<$($ty: EncodableKnownSize),+> EncodableKnownSize for ($($ty,)+) {
            fn len_of_encoding(&self) -> usize {
                0 $(+ self.$index.len_of_encoding())+
            }
        }

        impl<$($ty: Decodable),+> Decodable for ($($ty,)+) {
            async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Final, P::Error>>
            where
                P: BulkProducer<Item = u8>,
            {
                Ok(($($ty::decode(producer).await?,)+))
            }

            async fn decode_into<P>(&mut self, producer: &mut P) -> Result<(), DecodeError<P::Final, P::Error>>
            where
                P: BulkProducer<Item = u8>,
            {
                $(
                    self.$index.decode_into(producer).await?;
                )+
                Ok(())
            }
        }

        impl<$($ty: Shaped),+> Shaped for ($($ty,)+) {
            fn shape() -> Shape {
                Shape::Aggregate(vec![
                    $(FieldShape::public(stringify!($index), $ty::shape()),)+
                ])
            }
        }
    };
}

tuple_codec!(T0 0);
tuple_codec!(T0 0, T1 1);
tuple_codec!(T0 0, T1 1, T2 2);
tuple_codec!(T0 0, T1 1, T2 2, T3 3);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
tuple_codec!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use std::collections::BTreeMap;

    use super::*;
    use crate::dynamic::{Field, IntWidth, Value};
    use crate::{decode, decode_from_slice, decode_value, encode, encode_value};

    aggregate! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Reading {
            pub sensor: String,
            pub samples: Vec<f64>,
            pub(crate) calibrated: bool,
            retries: u8,
            pub offset: i16,
        }
    }

    aggregate! {
        #[derive(Debug, PartialEq)]
        struct Station {
            pub id: u32,
            pub readings: Vec<Reading>,
            pub tags: BTreeMap<String, String>,
            last_seen: Cell<u64>,
        }
    }

    aggregate! {
        #[derive(Debug, Default, PartialEq)]
        struct Nothing {}
    }

    aggregate! {
        #[derive(Debug, Default, PartialEq)]
        struct Hidden {
            secret: u64,
        }
    }

    fn reading() -> Reading {
        Reading {
            sensor: "thermo".to_string(),
            samples: vec![21.5, 22.0],
            calibrated: true,
            retries: 3,
            offset: -2,
        }
    }

    #[test]
    fn only_public_fields_are_encoded() {
        let enc = encode(&reading()).unwrap();
        assert_eq!(
            enc,
            encode(&("thermo", vec![21.5f64, 22.0], -2i16)).unwrap()
        );
        assert_eq!(enc.len(), reading().len_of_encoding());
    }

    #[test]
    fn skipped_fields_keep_their_value_in_place() {
        let enc = encode(&reading()).unwrap();

        let mut decoded = Reading {
            calibrated: false,
            retries: 9,
            ..Reading::default()
        };
        assert_eq!(decode(&enc, &mut decoded), Ok(()));
        assert_eq!(
            decoded,
            Reading {
                calibrated: false,
                retries: 9,
                ..reading()
            }
        );

        // Decoding a fresh value has nothing to keep.
        assert_eq!(
            decode_from_slice::<Reading>(&enc),
            Ok(Reading {
                calibrated: false,
                retries: 0,
                ..reading()
            })
        );
    }

    #[test]
    fn nested_skipped_fields_keep_their_value_in_place() {
        let station = Station {
            id: 5,
            readings: vec![reading()],
            tags: BTreeMap::new(),
            last_seen: Cell::new(1),
        };
        let enc = encode(&(station, reading())).unwrap();

        let mut dest = (
            Station {
                id: 0,
                readings: vec![Reading {
                    retries: 7,
                    ..Reading::default()
                }],
                tags: BTreeMap::new(),
                last_seen: Cell::new(9),
            },
            Reading {
                retries: 4,
                ..Reading::default()
            },
        );
        assert_eq!(decode(&enc, &mut dest), Ok(()));

        assert_eq!(dest.0.id, 5);
        assert_eq!(dest.0.last_seen.get(), 9);
        // Sequence elements are decoded afresh.
        assert_eq!(dest.0.readings[0].retries, 0);
        assert_eq!(dest.1.retries, 4);
        assert_eq!(dest.1.sensor, "thermo");
    }

    #[test]
    fn nested_aggregates() {
        let mut tags = BTreeMap::new();
        tags.insert("site".to_string(), "roof".to_string());
        let station = Station {
            id: 17,
            readings: vec![reading(), Reading::default()],
            tags,
            last_seen: Cell::new(1234),
        };

        let enc = encode(&station).unwrap();
        let decoded = decode_from_slice::<Station>(&enc).unwrap();
        assert_eq!(decoded.id, 17);
        assert_eq!(decoded.tags, station.tags);
        assert_eq!(decoded.readings[1], Reading::default());
        assert_eq!(decoded.readings[0].sensor, "thermo");
        assert_eq!(decoded.last_seen.get(), 0);
    }

    #[test]
    fn aggregates_without_public_fields_are_empty() {
        assert_eq!(encode(&Nothing {}).unwrap(), Vec::<u8>::new());
        assert_eq!(encode(&Hidden { secret: 42 }).unwrap(), Vec::<u8>::new());
        assert_eq!(encode(&()).unwrap(), Vec::<u8>::new());
        assert_eq!(decode_from_slice::<Hidden>(&[]), Ok(Hidden { secret: 0 }));
        assert_eq!(decode_from_slice::<()>(&[]), Ok(()));
    }

    #[test]
    fn tuples_are_aggregates() {
        let tuple = (true, -2137i64, "abc".to_string(), vec![1u8]);
        let enc = encode(&tuple).unwrap();
        assert_eq!(enc, [1, 0xb1, 0x21, 6, b'a', b'b', b'c', 2, 1]);
        assert_eq!(enc.len(), tuple.len_of_encoding());
        assert_eq!(
            decode_from_slice::<(bool, i64, String, Vec<u8>)>(&enc),
            Ok(tuple)
        );

        let twelve = (1u8, 2u16, 3u32, 4u64, 5usize, 6i8, 7i16, 8i32, 9i64, 10isize, 11.0f32, 12.0f64);
        let enc = encode(&twelve).unwrap();
        assert_eq!(decode_from_slice(&enc), Ok(twelve));
    }

    #[test]
    fn shapes_describe_the_encoding() {
        assert_eq!(
            Reading::shape(),
            Shape::Aggregate(vec![
                FieldShape::public("sensor", Shape::Text),
                FieldShape::public("samples", Shape::Seq(Box::new(Shape::F64))),
                FieldShape::private("calibrated", Shape::Opaque("bool".to_string())),
                FieldShape::private("retries", Shape::Opaque("u8".to_string())),
                FieldShape::public("offset", Shape::Signed(IntWidth::Sixteen)),
            ])
        );

        let enc = encode(&reading()).unwrap();
        let value = decode_value(&enc, &Reading::shape()).unwrap();
        match &value {
            Value::Aggregate(fields) => {
                assert_eq!(fields.len(), 5);
                assert_eq!(fields[0], Field::public("sensor", "thermo".into()));
                assert_eq!(fields[4], Field::public("offset", Value::Signed(-2)));
                assert!(!fields[3].public);
            }
            other => panic!("expected an aggregate, got {:?}", other),
        }
        assert_eq!(encode_value(&value).unwrap(), enc);
    }

    #[test]
    fn truncated_aggregate() {
        let enc = encode(&reading()).unwrap();
        assert_eq!(
            decode_from_slice::<Reading>(&enc[..enc.len() - 1]),
            Err(DecodeError::UnexpectedEndOfInput(()))
        );
    }
}
