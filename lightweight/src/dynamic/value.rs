use core::cmp::min;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;
use std::collections::HashMap;

use ufotofu::{BulkConsumer, BulkProducer};

use super::{FieldShape, Shape};
use crate::sequence::PREALLOCATION_LIMIT;
use crate::varint::{self, decode_len, encode_len};
use crate::{Decodable, DecodeError, Encodable, EncodeError, RawText};

/// A value whose shape is only known at runtime.
///
/// Integers are stored at their widest; the width only matters when decoding, where it is given by the [`Shape`] of the destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// An unsigned integer of any width.
    Unsigned(u64),
    /// A signed integer of any width.
    Signed(i64),
    /// A 32-bit float.
    F32(f32),
    /// A 64-bit float.
    F64(f64),
    /// Text, as raw bytes that need not be valid UTF-8.
    Text(RawText),
    /// A sequence of values, either of variable or of fixed length.
    Seq(Vec<Value>),
    /// An associative collection, as key-value pairs in encoding order.
    Map(Vec<(Value, Value)>),
    /// A record of fields, in declaration order.
    Aggregate(Vec<Field>),
    /// A value without an encoding, such as a handle to some external resource. Carries a description of its type.
    Opaque(String),
}

/// A named field of a [`Value::Aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The name of the field.
    pub name: String,
    /// Whether the field is externally accessible. Fields that are not are skipped when encoding and decoding.
    pub public: bool,
    /// The value of the field.
    pub value: Value,
}

impl Field {
    /// Creates an externally accessible field.
    pub fn public<N: Into<String>>(name: N, value: Value) -> Self {
        Field {
            name: name.into(),
            public: true,
            value,
        }
    }

    /// Creates a field that is skipped when encoding and decoding.
    pub fn private<N: Into<String>>(name: N, value: Value) -> Self {
        Field {
            name: name.into(),
            public: false,
            value,
        }
    }
}

/// Consistent with `PartialEq`: floats hash by their bits, except that both zeros hash alike.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Unsigned(n) => n.hash(state),
            Value::Signed(n) => n.hash(state),
            Value::F32(f) => (if *f == 0.0 { 0 } else { f.to_bits() }).hash(state),
            Value::F64(f) => (if *f == 0.0 { 0 } else { f.to_bits() }).hash(state),
            Value::Text(text) => text.hash(state),
            Value::Seq(items) => items.hash(state),
            Value::Map(pairs) => pairs.hash(state),
            Value::Aggregate(fields) => fields.hash(state),
            Value::Opaque(name) => name.hash(state),
        }
    }
}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.public.hash(state);
        self.value.hash(state);
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Unsigned(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Signed(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(RawText::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(RawText::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl Value {
    /// Decodes a value of the given shape.
    ///
    /// Errors with [`DecodeError::UnsupportedType`] upon reaching a [`Shape::Opaque`] that is not skipped, and with [`DecodeError::InvalidDestination`] upon reaching an aggregate that declares a field name more than once.
    ///
    /// Text is not validated. Map keys are deduplicated with `PartialEq`, the later duplicate winning. A sequence whose elements have an empty encoding takes time proportional to its encoded count.
    pub async fn decode_as<P>(
        shape: &Shape,
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Final, P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        decode_dynamic(shape, producer).await
    }
}

/// Errors with [`EncodeError::UnsupportedType`] upon reaching a [`Value::Opaque`] that is not skipped.
impl Encodable for Value {
    async fn encode<C>(&self, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
    where
        C: BulkConsumer<Item = u8>,
    {
        encode_dynamic(self, consumer).await
    }
}

async fn encode_dynamic<C>(value: &Value, consumer: &mut C) -> Result<(), EncodeError<C::Error>>
where
    C: BulkConsumer<Item = u8>,
{
    match value {
        Value::Bool(b) => b.encode(consumer).await,
        Value::Unsigned(n) => varint::encode_unsigned(*n, consumer).await,
        Value::Signed(n) => varint::encode_signed(*n, consumer).await,
        Value::F32(f) => f.encode(consumer).await,
        Value::F64(f) => f.encode(consumer).await,
        Value::Text(text) => text.encode(consumer).await,
        Value::Seq(items) => {
            encode_len(items.len(), consumer).await?;
            for item in items {
                Box::pin(encode_dynamic(item, consumer)).await?;
            }
            Ok(())
        }
        Value::Map(pairs) => {
            encode_len(pairs.len(), consumer).await?;
            for (key, value) in pairs {
                Box::pin(encode_dynamic(key, consumer)).await?;
                Box::pin(encode_dynamic(value, consumer)).await?;
            }
            Ok(())
        }
        Value::Aggregate(fields) => {
            for field in fields.iter().filter(|field| field.public) {
                Box::pin(encode_dynamic(&field.value, consumer)).await?;
            }
            Ok(())
        }
        Value::Opaque(name) => Err(EncodeError::UnsupportedType(name.clone())),
    }
}

async fn decode_dynamic<P>(
    shape: &Shape,
    producer: &mut P,
) -> Result<Value, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    match shape {
        Shape::Bool => Ok(Value::Bool(bool::decode(producer).await?)),
        Shape::Unsigned(width) => {
            let n = varint::decode_unsigned(producer).await?;
            Ok(Value::Unsigned(width.truncate_unsigned(n)))
        }
        Shape::Signed(width) => {
            let n = varint::decode_signed(producer).await?;
            Ok(Value::Signed(width.truncate_signed(n)))
        }
        Shape::F32 => Ok(Value::F32(f32::decode(producer).await?)),
        Shape::F64 => Ok(Value::F64(f64::decode(producer).await?)),
        Shape::Text => Ok(Value::Text(RawText::decode(producer).await?)),
        Shape::Seq(item) => {
            let len = decode_len(producer).await?;
            Ok(Value::Seq(decode_dynamic_items(item, len, producer).await?))
        }
        Shape::Array(item, expected) => {
            let len = decode_len(producer).await?;
            if len != *expected {
                return Err(DecodeError::LengthMismatch {
                    expected: *expected,
                    actual: len,
                });
            }
            Ok(Value::Seq(decode_dynamic_items(item, len, producer).await?))
        }
        Shape::Map(key_shape, value_shape) => {
            let len = decode_len(producer).await?;
            let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(min(len, PREALLOCATION_LIMIT));
            // Positions in `pairs`, by hash of the key.
            let mut index: HashMap<u64, Vec<usize>> = HashMap::new();
            let hasher = RandomState::new();

            for _ in 0..len {
                let key = Box::pin(decode_dynamic(key_shape, producer)).await?;
                let value = Box::pin(decode_dynamic(value_shape, producer)).await?;

                let positions = index.entry(hasher.hash_one(&key)).or_default();
                match positions.iter().copied().find(|&i| pairs[i].0 == key) {
                    Some(i) => pairs[i].1 = value,
                    None => {
                        positions.push(pairs.len());
                        pairs.push((key, value));
                    }
                }
            }

            Ok(Value::Map(pairs))
        }
        Shape::Aggregate(fields) => {
            ensure_distinct_names(fields)?;

            let mut decoded = Vec::with_capacity(fields.len());
            for field in fields {
                let value = if field.public {
                    Box::pin(decode_dynamic(&field.shape, producer)).await?
                } else {
                    field.shape.zero_value()
                };

                decoded.push(Field {
                    name: field.name.clone(),
                    public: field.public,
                    value,
                });
            }

            Ok(Value::Aggregate(decoded))
        }
        Shape::Opaque(name) => Err(DecodeError::UnsupportedType(name.clone())),
    }
}

async fn decode_dynamic_items<P>(
    item: &Shape,
    len: usize,
    producer: &mut P,
) -> Result<Vec<Value>, DecodeError<P::Final, P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let mut items = Vec::with_capacity(min(len, PREALLOCATION_LIMIT));
    for _ in 0..len {
        items.push(Box::pin(decode_dynamic(item, producer)).await?);
    }
    Ok(items)
}

/// An aggregate destination is addressed by field name, so every name may occur only once.
fn ensure_distinct_names<F, E>(fields: &[FieldShape]) -> Result<(), DecodeError<F, E>> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|earlier| earlier.name == field.name) {
            return Err(DecodeError::InvalidDestination(format!(
                "field `{}` is declared more than once",
                field.name
            )));
        }
    }
    Ok(())
}
