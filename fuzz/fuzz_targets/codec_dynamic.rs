#![no_main]

use libfuzzer_sys::fuzz_target;
use lightweight::dynamic::Shape;
use lightweight::invariants::assert_dynamic_invariants;
use lightweight_fuzz::limit_time;

fuzz_target!(|data: (Shape, Box<[u8]>)| {
    let (shape, potential_encoding) = data;

    limit_time(10_000, || {
        pollster::block_on(assert_dynamic_invariants(&shape, &potential_encoding));
    });
});
