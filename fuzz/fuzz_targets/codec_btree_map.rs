#![no_main]

use std::collections::BTreeMap;

lightweight::fuzz_invariants!(BTreeMap<u8, String>);
