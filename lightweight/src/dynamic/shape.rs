use core::fmt::{Display, Formatter};

#[cfg(feature = "dev")]
use arbitrary::{Arbitrary, Unstructured};

use super::{Field, Value};
use crate::RawText;

/// The width of an integer destination. Decoded integers are truncated to this width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub enum IntWidth {
    /// `u8` or `i8`.
    Eight,
    /// `u16` or `i16`.
    Sixteen,
    /// `u32` or `i32`.
    ThirtyTwo,
    /// `u64` or `i64`.
    SixtyFour,
    /// `usize` or `isize`.
    Pointer,
}

impl IntWidth {
    /// Returns the number of bits of integers of this width on the current target.
    pub const fn bits(&self) -> u32 {
        match self {
            IntWidth::Eight => 8,
            IntWidth::Sixteen => 16,
            IntWidth::ThirtyTwo => 32,
            IntWidth::SixtyFour => 64,
            IntWidth::Pointer => usize::BITS,
        }
    }

    /// Keeps only the low [`bits`](IntWidth::bits) bits of `n`, like an `as` cast to an unsigned integer of this width.
    ///
    /// ```
    /// use lightweight::dynamic::IntWidth;
    ///
    /// assert_eq!(IntWidth::Eight.truncate_unsigned(300), 44);
    /// assert_eq!(IntWidth::SixtyFour.truncate_unsigned(300), 300);
    /// ```
    pub const fn truncate_unsigned(&self, n: u64) -> u64 {
        match self {
            IntWidth::Eight => n as u8 as u64,
            IntWidth::Sixteen => n as u16 as u64,
            IntWidth::ThirtyTwo => n as u32 as u64,
            IntWidth::SixtyFour => n,
            IntWidth::Pointer => n as usize as u64,
        }
    }

    /// Keeps only the low [`bits`](IntWidth::bits) bits of `n` and sign-extends them, like an `as` cast to a signed integer of this width.
    ///
    /// ```
    /// use lightweight::dynamic::IntWidth;
    ///
    /// assert_eq!(IntWidth::Eight.truncate_signed(-129), 127);
    /// assert_eq!(IntWidth::Sixteen.truncate_signed(-129), -129);
    /// ```
    pub const fn truncate_signed(&self, n: i64) -> i64 {
        match self {
            IntWidth::Eight => n as i8 as i64,
            IntWidth::Sixteen => n as i16 as i64,
            IntWidth::ThirtyTwo => n as i32 as i64,
            IntWidth::SixtyFour => n,
            IntWidth::Pointer => n as isize as i64,
        }
    }
}

/// The runtime description of a decoding destination.
///
/// Since encodings carry no type information, a [`Shape`] is what tells the runtime decoder how to interpret the bytes. Each variant corresponds to one category of the codec; [`Shape::Opaque`] stands for anything outside of those categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A boolean.
    Bool,
    /// An unsigned integer of the given width.
    Unsigned(IntWidth),
    /// A signed integer of the given width.
    Signed(IntWidth),
    /// A 32-bit float.
    F32,
    /// A 64-bit float.
    F64,
    /// Text.
    Text,
    /// A variable-length sequence of elements of the given shape.
    Seq(Box<Shape>),
    /// A sequence of exactly the given number of elements of the given shape.
    Array(Box<Shape>, usize),
    /// An associative collection from keys of the first to values of the second shape.
    Map(Box<Shape>, Box<Shape>),
    /// A record of fields, in declaration order.
    Aggregate(Vec<FieldShape>),
    /// A shape without an encoding, named by the given description.
    Opaque(String),
}

/// A named field of a [`Shape::Aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldShape {
    /// The name of the field.
    pub name: String,
    /// The shape of the field.
    pub shape: Shape,
    /// Whether the field is externally accessible. Fields that are not take no part in encoding or decoding.
    pub public: bool,
}

impl FieldShape {
    /// Creates an externally accessible field.
    pub fn public<N: Into<String>>(name: N, shape: Shape) -> Self {
        FieldShape {
            name: name.into(),
            shape,
            public: true,
        }
    }

    /// Creates a field that is skipped when encoding and decoding.
    pub fn private<N: Into<String>>(name: N, shape: Shape) -> Self {
        FieldShape {
            name: name.into(),
            shape,
            public: false,
        }
    }
}

impl Shape {
    /// Returns the value a destination of this shape holds before anything was decoded into it: `false`, zero, empty text and collections, arrays and aggregates of zero values.
    ///
    /// Fields that are skipped during decoding are set to this.
    pub fn zero_value(&self) -> Value {
        match self {
            Shape::Bool => Value::Bool(false),
            Shape::Unsigned(_) => Value::Unsigned(0),
            Shape::Signed(_) => Value::Signed(0),
            Shape::F32 => Value::F32(0.0),
            Shape::F64 => Value::F64(0.0),
            Shape::Text => Value::Text(RawText::default()),
            Shape::Seq(_) => Value::Seq(Vec::new()),
            Shape::Array(item, len) => Value::Seq((0..*len).map(|_| item.zero_value()).collect()),
            Shape::Map(_, _) => Value::Map(Vec::new()),
            Shape::Aggregate(fields) => Value::Aggregate(
                fields
                    .iter()
                    .map(|field| Field {
                        name: field.name.clone(),
                        public: field.public,
                        value: field.shape.zero_value(),
                    })
                    .collect(),
            ),
            Shape::Opaque(name) => Value::Opaque(name.clone()),
        }
    }
}

impl Display for IntWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            IntWidth::Pointer => write!(f, "size"),
            width => write!(f, "{}", width.bits()),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Shape::Bool => write!(f, "bool"),
            Shape::Unsigned(width) => write!(f, "u{}", width),
            Shape::Signed(width) => write!(f, "i{}", width),
            Shape::F32 => write!(f, "f32"),
            Shape::F64 => write!(f, "f64"),
            Shape::Text => write!(f, "text"),
            Shape::Seq(item) => write!(f, "[{}]", item),
            Shape::Array(item, len) => write!(f, "[{}; {}]", item, len),
            Shape::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            Shape::Aggregate(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if field.public {
                        write!(f, " pub")?;
                    }
                    write!(f, " {}: {}", field.name, field.shape)?;
                }
                write!(f, " }}")
            }
            Shape::Opaque(name) => write!(f, "{}", name),
        }
    }
}

/// Types whose values always encode according to one fixed [`Shape`].
///
/// The shape of a type describes exactly the bytes its [`Encodable`](crate::Encodable) implementation writes and its [`Decodable`](crate::Decodable) implementation reads, so encodings of statically typed values can be decoded at runtime with [`decode_value`](crate::decode_value), and the other way around.
pub trait Shaped {
    /// Returns the shape of all values of `Self`.
    fn shape() -> Shape;
}

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape() -> Shape {
        T::shape()
    }
}

/// Shapes nest at most this deep when generated by [`Arbitrary`].
#[cfg(feature = "dev")]
const MAX_ARBITRARY_DEPTH: usize = 4;

#[cfg(feature = "dev")]
fn arbitrary_shape(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Shape> {
    let max_variant = if depth >= MAX_ARBITRARY_DEPTH { 5 } else { 10 };

    Ok(match u.int_in_range(0u8..=max_variant)? {
        0 => Shape::Bool,
        1 => Shape::Unsigned(IntWidth::arbitrary(u)?),
        2 => Shape::Signed(IntWidth::arbitrary(u)?),
        3 => Shape::F32,
        4 => Shape::F64,
        5 => Shape::Text,
        6 => Shape::Seq(Box::new(arbitrary_shape(u, depth + 1)?)),
        7 => Shape::Array(
            Box::new(arbitrary_shape(u, depth + 1)?),
            u.int_in_range(0usize..=8)?,
        ),
        8 => Shape::Map(
            Box::new(arbitrary_shape(u, depth + 1)?),
            Box::new(arbitrary_shape(u, depth + 1)?),
        ),
        9 => {
            // Generated aggregates always read at least one field.
            let count = u.int_in_range(1usize..=6)?;
            let mut fields = Vec::with_capacity(count);
            for i in 0..count {
                fields.push(FieldShape {
                    name: String::arbitrary(u)?,
                    shape: arbitrary_shape(u, depth + 1)?,
                    public: i == 0 || bool::arbitrary(u)?,
                });
            }
            Shape::Aggregate(fields)
        }
        _ => Shape::Opaque(String::arbitrary(u)?),
    })
}

#[cfg(feature = "dev")]
impl<'a> Arbitrary<'a> for Shape {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self, arbitrary::Error> {
        arbitrary_shape(u, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        let shape = Shape::Aggregate(vec![
            FieldShape::public("flags", Shape::Array(Box::new(Shape::Bool), 2)),
            FieldShape::private("name", Shape::Text),
        ]);

        assert_eq!(
            shape.zero_value(),
            Value::Aggregate(vec![
                Field {
                    name: "flags".to_string(),
                    public: true,
                    value: Value::Seq(vec![Value::Bool(false), Value::Bool(false)]),
                },
                Field {
                    name: "name".to_string(),
                    public: false,
                    value: Value::Text(RawText::default()),
                },
            ])
        );
    }

    #[test]
    fn display() {
        let shape = Shape::Map(
            Box::new(Shape::Text),
            Box::new(Shape::Seq(Box::new(Shape::Signed(IntWidth::ThirtyTwo)))),
        );
        assert_eq!(shape.to_string(), "map<text, [i32]>");
        assert_eq!(Shape::Unsigned(IntWidth::Pointer).to_string(), "usize");
    }
}
