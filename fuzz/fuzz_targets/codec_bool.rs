#![no_main]

lightweight::fuzz_invariants!(bool);
