//! Error handlers
//!
//! Logs errors at a level matching who caused them.

use crate::error::types::{AuthError, GateServerError};
use log::{error, info, warn};

/// Handle a server error
pub fn handle_error(err: &GateServerError) {
    match err {
        GateServerError::Auth(e) => log_auth_error(e),
        GateServerError::ProtocolError(e) => warn!("Dropping connection: {}", e),
        other => error!("Auth gate server error: {}", other),
    }
}

/// Log an authentication error.
///
/// Validator/bridge contract errors point at a deployment bug and go to `error!`;
/// client mistakes stay at `warn!`. The reason never reaches the wire.
pub fn log_auth_error(err: &AuthError) {
    match err {
        e if e.is_contract_error() => error!("Validator contract violation: {}", e),
        AuthError::NoCredentialsPresent => info!("No Authorization header found"),
        AuthError::UnknownValidator(_) | AuthError::Config(_) => error!("{}", err),
        e => warn!("Authentication failed: {}", e),
    }
}
