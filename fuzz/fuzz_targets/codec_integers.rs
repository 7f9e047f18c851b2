#![no_main]

lightweight::fuzz_invariants!((u8, u16, u32, u64, usize, i8, i16, i32, i64, isize));
