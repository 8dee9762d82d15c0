use std::collections::HashMap;

use parking_lot::Mutex;

struct Entry {
    nonce: String,
    expire: i64,
}

/// Outstanding challenges keyed by client public key. Expiry is only
/// ever checked on lookup; there is no background sweep (matching the
/// source prototype's plain dict of `(nonce, expire)` tuples).
#[derive(Default)]
pub struct NonceStore {
    entries: Mutex<HashMap<String, Entry>>,
}

pub enum Lookup {
    Missing,
    Expired,
    Valid(String),
}

impl NonceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, client_pk: &str, nonce: String, expire: i64) {
        self.entries
            .lock()
            .insert(client_pk.to_string(), Entry { nonce, expire });
    }

    /// Looks up the pending challenge for `client_pk`. An expired entry
    /// is evicted as a side effect of this lookup.
    pub fn lookup(&self, client_pk: &str, now: i64) -> Lookup {
        let mut entries = self.entries.lock();
        match entries.get(client_pk) {
            None => Lookup::Missing,
            Some(entry) if entry.expire < now => {
                entries.remove(client_pk);
                Lookup::Expired
            }
            Some(entry) => Lookup::Valid(entry.nonce.clone()),
        }
    }

    pub fn remove(&self, client_pk: &str) {
        self.entries.lock().remove(client_pk);
    }
}
