//! HMAC digest validator
//!
//! Recomputes the digest a client should have sent and compares it with the
//! one it did send. The signed message is `accessKey:epoch:nonce`, keyed with a
//! shared secret, HMAC-SHA256, hex encoded. Basic credentials are refused.
//!
//! A nonce is accepted once per access key while its timestamp could still pass
//! the skew check; a second use inside that window is a replay.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use log::debug;
use ring::hmac;

use super::exchange::{AUTH_TYPE_FIELD, CallbackRequest, CredentialSource};
use super::nonce::NonceStore;
use super::results::ExchangeOutcome;
use super::validator::{Validator, ValidatorOptions, exchange_failed};
use crate::error::AuthError;

pub const SHARED_SECRET_OPTION: &str = "sharedSecret";
pub const MAX_SKEW_OPTION: &str = "maxClockSkewSecs";

const DEFAULT_MAX_SKEW_SECS: u64 = 300;

fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Hex digest a client sends for `access_key` at `epoch` with `nonce`.
pub fn sign_digest(shared_secret: &str, access_key: &str, epoch: u64, nonce: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, shared_secret.as_bytes());
    let tag = hmac::sign(&key, signing_message(access_key, &epoch.to_string(), nonce).as_bytes());
    hex::encode(tag.as_ref())
}

fn signing_message(access_key: &str, epoch: &str, nonce: &str) -> String {
    format!("{}:{}:{}", access_key, epoch, nonce)
}

// An epoch up to `max_skew` ahead stays valid for `2 * max_skew` seconds.
fn nonce_store(max_skew_secs: u64) -> NonceStore {
    NonceStore::new(max_skew_secs.saturating_mul(2))
}

pub struct HmacValidator {
    key: Option<hmac::Key>,
    max_skew_secs: u64,
    clock: fn() -> u64,
    seen_nonces: NonceStore,
}

impl Default for HmacValidator {
    fn default() -> Self {
        Self {
            key: None,
            max_skew_secs: DEFAULT_MAX_SKEW_SECS,
            clock: system_clock,
            seen_nonces: nonce_store(DEFAULT_MAX_SKEW_SECS),
        }
    }
}

impl HmacValidator {
    pub fn new(shared_secret: &str, max_skew_secs: u64) -> Self {
        Self {
            key: Some(hmac::Key::new(hmac::HMAC_SHA256, shared_secret.as_bytes())),
            max_skew_secs,
            clock: system_clock,
            seen_nonces: nonce_store(max_skew_secs),
        }
    }
}

#[async_trait]
impl Validator for HmacValidator {
    fn name(&self) -> &'static str {
        "hmac"
    }

    fn initialize(&mut self, options: &ValidatorOptions) -> Result<(), AuthError> {
        let secret = options.require(SHARED_SECRET_OPTION)?;
        self.key = Some(hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()));

        if let Some(skew) = options.get(MAX_SKEW_OPTION) {
            self.max_skew_secs = skew.trim().parse().map_err(|_| {
                AuthError::Config(format!("{} must be a number of seconds", MAX_SKEW_OPTION))
            })?;
        }
        self.seen_nonces = nonce_store(self.max_skew_secs);
        Ok(())
    }

    async fn authenticate(&self, source: &dyn CredentialSource) -> ExchangeOutcome {
        let Some(key) = self.key.as_ref() else {
            return exchange_failed(AuthError::Config(format!(
                "{} validator used before initialization",
                self.name()
            )));
        };

        // Basic credentials carry no digest fields, so ask for the scheme alone first.
        match source.field(AUTH_TYPE_FIELD) {
            Ok("basic") => return ExchangeOutcome::Rejected("digest credentials required".into()),
            Ok(_) => {}
            Err(e) => return exchange_failed(e),
        }

        let answers = match source.handle(&[
            CallbackRequest::Name,
            CallbackRequest::field("digest"),
            CallbackRequest::field("epoch"),
            CallbackRequest::field("nonce"),
        ]) {
            Ok(answers) => answers,
            Err(e) => return exchange_failed(e),
        };
        let [access_key, digest, epoch, nonce] = answers.as_slice() else {
            return ExchangeOutcome::MalformedInput("incomplete credential exchange".into());
        };

        let Ok(epoch_secs) = epoch.parse::<u64>() else {
            return ExchangeOutcome::MalformedInput("invalid epoch".into());
        };
        let now = (self.clock)();
        if now.abs_diff(epoch_secs) > self.max_skew_secs {
            debug!("Digest for {} outside the clock skew window", access_key);
            return ExchangeOutcome::Rejected("stale timestamp".into());
        }

        let Ok(supplied) = hex::decode(digest) else {
            return ExchangeOutcome::Rejected("digest mismatch".into());
        };
        if hmac::verify(key, signing_message(access_key, epoch, nonce).as_bytes(), &supplied).is_err() {
            debug!("Digest mismatch for {}", access_key);
            return ExchangeOutcome::Rejected("digest mismatch".into());
        }

        // Only verified digests are recorded, so forged ones cannot burn a nonce.
        if !self.seen_nonces.check_and_store(&format!("{}:{}", access_key, nonce), now) {
            debug!("Nonce {} reused by {}", nonce, access_key);
            return ExchangeOutcome::Rejected("replayed nonce".into());
        }
        ExchangeOutcome::Accepted
    }
}
