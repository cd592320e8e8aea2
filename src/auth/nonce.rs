//! Seen-nonce store for digest replay detection.

use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe nonce store with TTL expiry, in epoch seconds.
///
/// Time is passed in by the caller so the store follows the same clock the
/// validator checks timestamps against.
pub struct NonceStore {
    /// Map of nonce key -> expiry second.
    nonces: Mutex<HashMap<String, u64>>,
    ttl_secs: u64,
}

impl NonceStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            nonces: Mutex::new(HashMap::new()),
            ttl_secs,
        }
    }

    /// Records `nonce` as seen at `now`.
    ///
    /// Returns `true` if the nonce is new, `false` if it was already used and
    /// has not expired yet.
    pub fn check_and_store(&self, nonce: &str, now: u64) -> bool {
        let mut nonces = match self.nonces.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Lazy cleanup
        nonces.retain(|_, expiry| *expiry > now);

        if nonces.contains_key(nonce) {
            return false;
        }
        nonces.insert(nonce.to_string(), now.saturating_add(self.ttl_secs));
        true
    }

    pub fn len(&self) -> usize {
        match self.nonces.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
