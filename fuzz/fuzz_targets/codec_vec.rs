#![no_main]

lightweight::fuzz_invariants!(Vec<Vec<i16>>);
