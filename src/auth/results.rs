//! Authentication result types
//!
//! Defines the terminal outcome of a credential exchange.

use std::fmt;

use crate::error::AuthError;

/// Result of running a validator over a credential exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Accepted,
    Rejected(String),
    MalformedInput(String),
}

impl ExchangeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ExchangeOutcome::Accepted)
    }
}

impl fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeOutcome::Accepted => write!(f, "accepted"),
            ExchangeOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
            ExchangeOutcome::MalformedInput(reason) => write!(f, "malformed input: {}", reason),
        }
    }
}

impl From<AuthError> for ExchangeOutcome {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Rejected(reason) => ExchangeOutcome::Rejected(reason),
            other => ExchangeOutcome::MalformedInput(other.to_string()),
        }
    }
}
