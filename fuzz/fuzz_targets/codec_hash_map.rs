#![no_main]

use std::collections::HashMap;

lightweight::fuzz_invariants!(HashMap<String, Vec<bool>>);
