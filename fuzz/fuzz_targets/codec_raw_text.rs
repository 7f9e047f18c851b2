#![no_main]

use lightweight::RawText;

lightweight::fuzz_invariants!(RawText);
