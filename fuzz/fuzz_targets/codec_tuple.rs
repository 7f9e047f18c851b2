#![no_main]

use lightweight_fuzz::Contact;

lightweight::fuzz_invariants!((Contact, (), [bool; 2], Vec<Contact>));
