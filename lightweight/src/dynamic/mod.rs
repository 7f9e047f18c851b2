//! Encoding and decoding of values whose shape is only known at runtime.
//!
//! A [`Value`] is encoded by walking it; decoding requires a [`Shape`] describing the destination, since the bytes themselves say nothing about it. The wire format is the same as for the statically typed implementations, and every type with a fixed encoding reports its [`Shape`] through [`Shaped`], so the two can be mixed freely:
//!
//! ```
//! use lightweight::dynamic::*;
//! use lightweight::{decode_value, encode, encode_value};
//!
//! let enc = encode(&vec![-3i16, 7]).unwrap();
//! let value = decode_value(&enc, &Vec::<i16>::shape()).unwrap();
//! assert_eq!(value, Value::Seq(vec![Value::Signed(-3), Value::Signed(7)]));
//! assert_eq!(encode_value(&value).unwrap(), enc);
//! ```

mod shape;
pub use shape::*;

mod value;
pub use value::*;
