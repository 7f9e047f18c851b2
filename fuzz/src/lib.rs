use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use lightweight::aggregate;

aggregate! {
    #[derive(Debug, Clone, Default, Arbitrary)]
    #[allow(dead_code)]
    pub struct Contact {
        pub name: String,
        pub port: u16,
        retries: u8,
    }
}

aggregate! {
    /// Exercises every category of the codec except floats, whose NaNs defeat equality checks.
    #[derive(Debug, Clone, Default, Arbitrary)]
    #[allow(dead_code)]
    pub struct Profile {
        pub id: u64,
        pub active: bool,
        pub(crate) cached_len: usize,
        pub offset: i32,
        pub contacts: Vec<Contact>,
        pub labels: BTreeMap<String, Vec<i8>>,
        pub digest: [u8; 4],
        session: Option<u32>,
        pub note: lightweight::RawText,
    }
}

// Equality ignores the fields that are not encoded, so that decoded values compare equal to the originals.

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.port == other.port
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.active == other.active
            && self.offset == other.offset
            && self.contacts == other.contacts
            && self.labels == other.labels
            && self.digest == other.digest
            && self.note == other.note
    }
}

/// Runs a function and crashes the process if the function doesn't terminate within the given time limit.
pub fn limit_time<Fun: FnOnce()>(millis: u64, fun: Fun) {
    let success = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let success2 = success.clone();

    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(millis));
        if !success.load(std::sync::atomic::Ordering::Relaxed) {
            println!("Timeout!");
            std::process::exit(-1);
        }
    });

    fun();

    success2.store(true, std::sync::atomic::Ordering::Relaxed);
}
