//! Error types
//!
//! Defines the authentication error taxonomy and the server-level error that wraps it.

use std::fmt;
use std::io;

/// Authentication module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The inbound message could not be parsed into a credential.
    MalformedInput(String),
    /// An HTTP request carried no `Authorization` header.
    NoCredentialsPresent,
    /// A validator asked for a digest field the credential does not carry.
    UnknownField(String),
    /// A validator issued a callback kind the bridge cannot answer.
    UnsupportedRequestKind(String),
    /// Credentials were well-formed but did not match.
    Rejected(String),
    /// The configured validator name has no implementation.
    UnknownValidator(String),
    /// Validator options were missing or invalid.
    Config(String),
}

impl AuthError {
    /// True for errors caused by a validator/bridge mismatch rather than by the client.
    pub fn is_contract_error(&self) -> bool {
        matches!(
            self,
            AuthError::UnknownField(_) | AuthError::UnsupportedRequestKind(_)
        )
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
            AuthError::NoCredentialsPresent => write!(f, "No credentials present"),
            AuthError::UnknownField(name) => write!(f, "Unknown credential field: {}", name),
            AuthError::UnsupportedRequestKind(kind) => {
                write!(f, "Unsupported callback request: {}", kind)
            }
            AuthError::Rejected(s) => write!(f, "Credentials rejected: {}", s),
            AuthError::UnknownValidator(name) => write!(f, "Unknown validator: {}", name),
            AuthError::Config(s) => write!(f, "Validator configuration error: {}", s),
        }
    }
}

impl std::error::Error for AuthError {}

/// General server error that encompasses startup and transport failures
#[derive(Debug)]
pub enum GateServerError {
    Auth(AuthError),
    Config(config::ConfigError),
    IoError(io::Error),
    ProtocolError(String),
}

impl fmt::Display for GateServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            GateServerError::Config(e) => write!(f, "Configuration error: {}", e),
            GateServerError::IoError(e) => write!(f, "I/O error: {}", e),
            GateServerError::ProtocolError(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl std::error::Error for GateServerError {}

impl From<AuthError> for GateServerError {
    fn from(error: AuthError) -> Self {
        GateServerError::Auth(error)
    }
}

impl From<config::ConfigError> for GateServerError {
    fn from(error: config::ConfigError) -> Self {
        GateServerError::Config(error)
    }
}

impl From<io::Error> for GateServerError {
    fn from(error: io::Error) -> Self {
        GateServerError::IoError(error)
    }
}
