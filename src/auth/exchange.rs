//! Credential exchange
//!
//! Validators never see how a credential was sourced. They issue a batch of
//! [`CallbackRequest`]s against a [`CredentialSource`] and receive one answer per
//! request, or a single error for the whole batch.

use log::trace;

use super::credentials::NormalizedCredential;
use crate::error::AuthError;

/// Field name that yields the credential's scheme instead of a digest field.
pub const AUTH_TYPE_FIELD: &str = "authType";

/// One step of a credential exchange, issued by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackRequest {
    /// The principal (access key).
    Name,
    /// The secret: plaintext for basic credentials, the digest blob otherwise.
    Secret,
    /// A named digest field, or `authType`.
    NamedField(String),
    /// Informational text for the remote party. Not served by this bridge.
    TextOutput(String),
    /// A yes/no prompt. Not served by this bridge.
    Confirmation(String),
}

impl CallbackRequest {
    pub fn field(name: impl Into<String>) -> Self {
        CallbackRequest::NamedField(name.into())
    }

    /// Request kind without its payload, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            CallbackRequest::Name => "name",
            CallbackRequest::Secret => "secret",
            CallbackRequest::NamedField(_) => "field",
            CallbackRequest::TextOutput(_) => "text-output",
            CallbackRequest::Confirmation(_) => "confirmation",
        }
    }
}

/// Read access to a credential, independent of its wire encoding.
pub trait CredentialSource: Send + Sync {
    fn principal(&self) -> &str;

    fn secret(&self) -> &str;

    /// `authType`, or one of the digest fields.
    fn field(&self, name: &str) -> Result<&str, AuthError>;

    /// Answers every request in order, or fails the whole batch.
    fn handle(&self, requests: &[CallbackRequest]) -> Result<Vec<String>, AuthError> {
        trace!(
            "Credential exchange batch: {:?}",
            requests.iter().map(CallbackRequest::kind).collect::<Vec<_>>()
        );

        requests
            .iter()
            .map(|request| match request {
                CallbackRequest::Name => Ok(self.principal().to_string()),
                CallbackRequest::Secret => Ok(self.secret().to_string()),
                CallbackRequest::NamedField(name) => self.field(name).map(str::to_string),
                other => Err(AuthError::UnsupportedRequestKind(other.kind().to_string())),
            })
            .collect()
    }
}

/// [`CredentialSource`] backed by an extracted credential.
///
/// Owns the credential so an exchange can be moved onto another task.
#[derive(Debug)]
pub struct CredentialBridge {
    credential: NormalizedCredential,
}

impl CredentialBridge {
    pub fn new(credential: NormalizedCredential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &NormalizedCredential {
        &self.credential
    }
}

impl CredentialSource for CredentialBridge {
    fn principal(&self) -> &str {
        self.credential.principal()
    }

    fn secret(&self) -> &str {
        match (self.credential.secret(), self.credential.digest_blob()) {
            (Some(secret), _) => secret,
            (None, Some(blob)) => blob,
            (None, None) => "",
        }
    }

    fn field(&self, name: &str) -> Result<&str, AuthError> {
        if name.eq_ignore_ascii_case(AUTH_TYPE_FIELD) {
            return Ok(self.credential.scheme().as_str());
        }

        self.credential
            .fields()
            .and_then(|fields| fields.get(name))
            .ok_or_else(|| AuthError::UnknownField(name.to_string()))
    }
}
