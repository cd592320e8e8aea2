//! Authentication gate
//!
//! One gate sits in front of every connection. While it is [`GateState::Active`]
//! each inbound message is treated as an authentication attempt; the first
//! accepted attempt moves it to [`GateState::Passed`], after which the dispatch
//! loop stops consulting it. Anything other than acceptance ends the connection.

use std::sync::Arc;

use log::{debug, error, info};
use serde::Deserialize;

use super::exchange::CredentialBridge;
use super::extractor;
use super::results::ExchangeOutcome;
use super::validator::Validator;
use crate::error::AuthError;
use crate::error::handlers::log_auth_error;
use crate::protocol::InboundMessage;

/// Per-connection gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Active,
    Passed,
}

/// What to do with an HTTP request that carries no `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCredentialsPolicy {
    /// Close the connection.
    #[default]
    Reject,
    /// Forward the request downstream and keep the gate active.
    Allow,
}

/// Instruction for the dispatch loop after the gate has seen a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// The message was the authentication exchange and is consumed.
    /// The gate is now passed.
    Authenticated,
    /// Hand the message to the downstream handler untouched.
    Forward,
    /// Close the connection. The reason is for local diagnostics only.
    Close(String),
}

pub struct AuthenticationGate {
    state: GateState,
    validator: Arc<dyn Validator>,
    missing_credentials: MissingCredentialsPolicy,
}

impl AuthenticationGate {
    pub fn new(validator: Arc<dyn Validator>, missing_credentials: MissingCredentialsPolicy) -> Self {
        Self {
            state: GateState::Active,
            validator,
            missing_credentials,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_passed(&self) -> bool {
        self.state == GateState::Passed
    }

    /// Runs one message through the gate.
    ///
    /// Once passed, every message is forwarded without touching the extractor
    /// or the validator.
    pub async fn process(&mut self, message: &InboundMessage) -> GateAction {
        if self.is_passed() {
            return GateAction::Forward;
        }

        let credential = match extractor::extract(message) {
            Ok(credential) => credential,
            Err(AuthError::NoCredentialsPresent) => {
                log_auth_error(&AuthError::NoCredentialsPresent);
                return match self.missing_credentials {
                    MissingCredentialsPolicy::Allow => GateAction::Forward,
                    MissingCredentialsPolicy::Reject => {
                        GateAction::Close(AuthError::NoCredentialsPresent.to_string())
                    }
                };
            }
            Err(e) => {
                log_auth_error(&e);
                return GateAction::Close(e.to_string());
            }
        };
        debug!("Extracted credential {:?}", credential);

        match self.run_exchange(CredentialBridge::new(credential)).await {
            ExchangeOutcome::Accepted => {
                self.state = GateState::Passed;
                info!("Authentication completed");
                GateAction::Authenticated
            }
            outcome => GateAction::Close(outcome.to_string()),
        }
    }

    /// Runs the validator on its own task so it may finish on any worker.
    /// A panicked or cancelled validator counts as a rejection.
    async fn run_exchange(&self, bridge: CredentialBridge) -> ExchangeOutcome {
        let validator = Arc::clone(&self.validator);
        let task = tokio::spawn(async move { validator.authenticate(&bridge).await });

        match task.await {
            Ok(outcome) => {
                if let ExchangeOutcome::Rejected(reason) = &outcome {
                    log_auth_error(&AuthError::Rejected(reason.clone()));
                }
                outcome
            }
            Err(e) => {
                error!("{} validator did not complete: {}", self.validator.name(), e);
                ExchangeOutcome::MalformedInput("validator failure".into())
            }
        }
    }
}
