#![no_main]

lightweight::fuzz_invariants!([u32; 4]);
