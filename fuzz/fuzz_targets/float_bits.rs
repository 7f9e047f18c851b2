#![no_main]

use libfuzzer_sys::fuzz_target;
use lightweight::{decode_from_slice, decode_value, encode};
use lightweight::dynamic::{Shape, Value};

fuzz_target!(|data: (u64, u32)| {
    let (bits64, bits32) = data;

    let f = f64::from_bits(bits64);
    let enc = encode(&f).unwrap();
    assert_eq!(decode_from_slice::<f64>(&enc).unwrap().to_bits(), bits64);
    match decode_value(&enc, &Shape::F64) {
        Ok(Value::F64(g)) => assert_eq!(g.to_bits(), bits64),
        res => panic!("Expected an f64, got {:?}", res),
    }
    // Reading the bits of an f64 into an f32 keeps the low half.
    assert_eq!(
        decode_from_slice::<f32>(&enc).unwrap().to_bits(),
        bits64 as u32
    );

    let f = f32::from_bits(bits32);
    let enc = encode(&f).unwrap();
    assert_eq!(decode_from_slice::<f32>(&enc).unwrap().to_bits(), bits32);
    assert_eq!(decode_from_slice::<u32>(&enc).unwrap(), bits32);
});
