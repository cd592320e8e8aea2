//! Authentication validators
//!
//! A validator decides accept/reject for one credential exchange. It only sees
//! the credential through [`CredentialSource`], so it cannot depend on which
//! wire encoding produced it. Implementations are selected by name from the
//! `login_module` configuration key and shared across all connections once
//! initialized.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use subtle::ConstantTimeEq;

use super::embedded::EmbeddedValidator;
use super::exchange::CredentialSource;
use super::hmac::HmacValidator;
use super::results::ExchangeOutcome;
use crate::error::AuthError;
use crate::error::handlers::log_auth_error;

/// Pluggable credential validator.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Reads validator-specific options. Called once, before any exchange.
    fn initialize(&mut self, options: &ValidatorOptions) -> Result<(), AuthError>;

    /// Runs one exchange against `source` and decides its outcome.
    async fn authenticate(&self, source: &dyn CredentialSource) -> ExchangeOutcome;
}

/// Opaque validator options.
///
/// Keys are matched case-insensitively; the configuration layer does not
/// preserve key case.
#[derive(Clone, Default)]
pub struct ValidatorOptions {
    entries: HashMap<String, String>,
}

impl ValidatorOptions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns a non-empty option value or a configuration error naming the key.
    pub fn require(&self, key: &str) -> Result<&str, AuthError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(AuthError::Config(format!("missing option {}", key))),
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ValidatorOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self { entries }
    }
}

impl From<&HashMap<String, String>> for ValidatorOptions {
    fn from(map: &HashMap<String, String>) -> Self {
        map.iter().map(|(k, v)| (k, v.clone())).collect()
    }
}

// Option values are usually secrets.
impl fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Instantiates and initializes the validator named `name`.
pub fn create_validator(
    name: &str,
    options: &ValidatorOptions,
) -> Result<Arc<dyn Validator>, AuthError> {
    let mut validator: Box<dyn Validator> = match name.trim().to_ascii_lowercase().as_str() {
        "embedded" | "embeddedloginmodule" => Box::new(EmbeddedValidator::default()),
        "hmac" => Box::new(HmacValidator::default()),
        _ => return Err(AuthError::UnknownValidator(name.to_string())),
    };

    validator.initialize(options)?;
    info!(
        "Initialized {} validator with options {:?}",
        validator.name(),
        options
    );
    Ok(Arc::from(validator))
}

/// Compares a supplied secret against the expected one.
///
/// Character counts are compared first; equal-length values are then compared
/// in constant time.
pub fn compare_secret(supplied: &str, expected: &str) -> ExchangeOutcome {
    if supplied.chars().count() != expected.chars().count() {
        return ExchangeOutcome::Rejected("length mismatch".into());
    }

    if bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())) {
        ExchangeOutcome::Accepted
    } else {
        ExchangeOutcome::Rejected("value mismatch".into())
    }
}

/// Converts a failed exchange batch into an outcome, logging it by kind.
pub fn exchange_failed(error: AuthError) -> ExchangeOutcome {
    log_auth_error(&error);
    ExchangeOutcome::MalformedInput(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_secret_equal() {
        assert_eq!(compare_secret("s3cret", "s3cret"), ExchangeOutcome::Accepted);
        assert_eq!(compare_secret("", ""), ExchangeOutcome::Accepted);
    }

    #[test]
    fn test_compare_secret_length_mismatch() {
        assert_eq!(
            compare_secret("wrong", "s3cret"),
            ExchangeOutcome::Rejected("length mismatch".into())
        );
        assert_eq!(
            compare_secret("s3cret!", "s3cret"),
            ExchangeOutcome::Rejected("length mismatch".into())
        );
    }

    #[test]
    fn test_compare_secret_single_char_difference() {
        for i in 0.."s3cret".len() {
            let mut tampered: Vec<char> = "s3cret".chars().collect();
            tampered[i] = 'X';
            let tampered: String = tampered.into_iter().collect();
            assert_eq!(
                compare_secret(&tampered, "s3cret"),
                ExchangeOutcome::Rejected("value mismatch".into()),
                "position {}",
                i
            );
        }
    }

    #[test]
    fn test_compare_secret_counts_characters() {
        // Same character count, different byte length.
        assert_eq!(
            compare_secret("é", "e"),
            ExchangeOutcome::Rejected("value mismatch".into())
        );
    }

    #[test]
    fn test_options_case_insensitive() {
        let options: ValidatorOptions = [("adminSecretKey", "s3cret")].into_iter().collect();
        assert_eq!(options.get("adminsecretkey"), Some("s3cret"));
        assert_eq!(options.get("ADMINSECRETKEY"), Some("s3cret"));
        assert!(options.require("sharedSecret").is_err());
        assert!(!format!("{:?}", options).contains("s3cret"));
    }

    #[test]
    fn test_create_validator_by_name() {
        let options: ValidatorOptions = [("adminSecretKey", "s3cret"), ("sharedSecret", "k")]
            .into_iter()
            .collect();
        assert_eq!(create_validator("embedded", &options).unwrap().name(), "embedded");
        assert_eq!(
            create_validator("EmbeddedLoginModule", &options).unwrap().name(),
            "embedded"
        );
        assert_eq!(create_validator("hmac", &options).unwrap().name(), "hmac");
        assert!(matches!(
            create_validator("ldap", &options),
            Err(AuthError::UnknownValidator(_))
        ));
    }

    #[test]
    fn test_create_validator_requires_options() {
        let options = ValidatorOptions::default();
        assert!(matches!(
            create_validator("embedded", &options),
            Err(AuthError::Config(_))
        ));
    }
}
