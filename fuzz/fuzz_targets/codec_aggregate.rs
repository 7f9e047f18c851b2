#![no_main]

use lightweight_fuzz::Profile;

lightweight::fuzz_invariants!(Profile);
