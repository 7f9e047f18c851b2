#![no_main]

lightweight::fuzz_invariants!(String);
