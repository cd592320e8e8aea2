//! Authentication system
//!
//! Credential extraction, the credential exchange, pluggable validators and the
//! per-connection authentication gate.

pub mod credentials;
pub mod embedded;
pub mod exchange;
pub mod extractor;
pub mod gate;
pub mod hmac;
pub mod nonce;
pub mod results;
pub mod validator;

pub use credentials::{AuthScheme, NormalizedCredential};
pub use exchange::{CallbackRequest, CredentialBridge, CredentialSource};
pub use gate::{AuthenticationGate, GateAction, GateState, MissingCredentialsPolicy};
pub use results::ExchangeOutcome;
pub use validator::{Validator, ValidatorOptions, create_validator};
