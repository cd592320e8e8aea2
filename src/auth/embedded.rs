//! Embedded validator
//!
//! Accepts any principal whose secret equals the configured admin secret.
//! Digest credentials reach it as their full digest blob.

use async_trait::async_trait;
use log::debug;

use super::exchange::{CallbackRequest, CredentialSource};
use super::results::ExchangeOutcome;
use super::validator::{Validator, ValidatorOptions, compare_secret, exchange_failed};
use crate::error::AuthError;

pub const ADMIN_SECRET_OPTION: &str = "adminSecretKey";

#[derive(Default)]
pub struct EmbeddedValidator {
    admin_secret_key: Option<String>,
}

impl EmbeddedValidator {
    pub fn new(admin_secret_key: impl Into<String>) -> Self {
        Self {
            admin_secret_key: Some(admin_secret_key.into()),
        }
    }
}

#[async_trait]
impl Validator for EmbeddedValidator {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn initialize(&mut self, options: &ValidatorOptions) -> Result<(), AuthError> {
        self.admin_secret_key = Some(options.require(ADMIN_SECRET_OPTION)?.to_string());
        Ok(())
    }

    async fn authenticate(&self, source: &dyn CredentialSource) -> ExchangeOutcome {
        let Some(expected) = self.admin_secret_key.as_deref() else {
            return exchange_failed(AuthError::Config(format!(
                "{} validator used before initialization",
                self.name()
            )));
        };

        let answers = match source.handle(&[CallbackRequest::Name, CallbackRequest::Secret]) {
            Ok(answers) => answers,
            Err(e) => return exchange_failed(e),
        };
        let [access_key, supplied] = answers.as_slice() else {
            return ExchangeOutcome::MalformedInput("incomplete credential exchange".into());
        };

        let outcome = compare_secret(supplied, expected);
        debug!("Embedded validation for {}: {}", access_key, outcome);
        outcome
    }
}
