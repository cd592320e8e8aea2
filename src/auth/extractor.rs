//! Credential extractor
//!
//! Turns one inbound message into a [`NormalizedCredential`]. Two encodings are
//! understood:
//!
//! - token commands: `auth basic <accessKey> <secret>` or
//!   `auth <algorithm> <accessKey>:<digest>:<epoch>:<nonce>`
//! - HTTP headers: `Authorization: OpenTSDB <accessKey>:<digest>:<epoch>:<nonce>`

use log::debug;

use super::credentials::{AuthScheme, NormalizedCredential};
use crate::error::AuthError;
use crate::protocol::{HttpRequest, InboundMessage};

const AUTH_COMMAND: &str = "auth";
const BASIC_SCHEME: &str = "basic";
const HTTP_SCHEME_TAG: &str = "opentsdb";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// Extracts a credential from any supported message shape.
pub fn extract(message: &InboundMessage) -> Result<NormalizedCredential, AuthError> {
    match message {
        InboundMessage::Command(tokens) => extract_from_command(tokens),
        InboundMessage::Http(request) => extract_from_http(request),
        InboundMessage::Other(kind) => Err(AuthError::MalformedInput(format!(
            "unsupported message type: {}",
            kind
        ))),
    }
}

/// Extracts a credential from a tokenized `auth` command.
pub fn extract_from_command(tokens: &[String]) -> Result<NormalizedCredential, AuthError> {
    if !(3..=4).contains(&tokens.len()) {
        return Err(AuthError::MalformedInput(format!(
            "invalid auth command length: {}",
            tokens.len()
        )));
    }

    let command = tokens[0].as_str();
    if command != AUTH_COMMAND {
        return Err(AuthError::MalformedInput(format!(
            "not an auth command: {}",
            command
        )));
    }

    let scheme = tokens[1].trim().to_lowercase();
    if scheme == BASIC_SCHEME {
        if tokens.len() != 4 {
            return Err(AuthError::MalformedInput(format!(
                "basic auth expects 4 tokens, got {}",
                tokens.len()
            )));
        }
        debug!("Extracted basic credential from auth command");
        return Ok(NormalizedCredential::basic(tokens[2].as_str(), tokens[3].as_str()));
    }

    if tokens.len() != 3 {
        return Err(AuthError::MalformedInput(format!(
            "{} auth expects 3 tokens, got {}",
            scheme,
            tokens.len()
        )));
    }
    debug!("Extracted {} digest credential from auth command", scheme);
    NormalizedCredential::digest(AuthScheme::DigestHmac(scheme), tokens[2].as_str())
}

/// Extracts a credential from the request's `Authorization` header.
pub fn extract_from_http(request: &HttpRequest) -> Result<NormalizedCredential, AuthError> {
    let value = request
        .header(AUTHORIZATION_HEADER)
        .ok_or(AuthError::NoCredentialsPresent)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [tag, blob] if tag.trim().eq_ignore_ascii_case(HTTP_SCHEME_TAG) => {
            debug!("Extracted digest credential from Authorization header");
            NormalizedCredential::digest(AuthScheme::HttpDigest, blob.trim())
        }
        _ => {
            // The raw value may carry a password; the error reason does not.
            debug!("Unparseable Authorization header: {}", value);
            Err(AuthError::MalformedInput(format!(
                "improperly formatted Authorization header: scheme '{}', {} parts",
                parts.first().copied().unwrap_or_default(),
                parts.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::exchange::{CallbackRequest, CredentialBridge, CredentialSource};

    fn command(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn malformed(result: Result<NormalizedCredential, AuthError>) -> String {
        match result {
            Err(AuthError::MalformedInput(reason)) => reason,
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_command() {
        let cred = extract_from_command(&command("auth basic adminKey s3cret")).unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::Basic);
        assert_eq!(cred.principal(), "adminKey");
        assert_eq!(cred.secret(), Some("s3cret"));
        assert!(cred.digest_blob().is_none());
    }

    #[test]
    fn test_basic_scheme_is_case_insensitive() {
        let cred = extract_from_command(&command("auth BASIC adminKey s3cret")).unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::Basic);
    }

    #[test]
    fn test_digest_command() {
        let cred =
            extract_from_command(&command("auth HmacSHA256 alice:deadbeef:1000:n1")).unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::DigestHmac("hmacsha256".into()));
        assert_eq!(cred.principal(), "alice");
        assert_eq!(cred.digest_blob(), Some("alice:deadbeef:1000:n1"));
        assert!(cred.secret().is_none());
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(malformed(extract_from_command(&command("bogus"))).contains("length: 1"));
        assert!(malformed(extract_from_command(&command("auth basic"))).contains("length: 2"));
        assert!(
            malformed(extract_from_command(&command("auth basic a b c"))).contains("length: 5")
        );
        let empty: Vec<String> = Vec::new();
        assert!(malformed(extract_from_command(&empty)).contains("length: 0"));
    }

    #[test]
    fn test_not_auth_command() {
        let reason = malformed(extract_from_command(&command("put basic a b")));
        assert_eq!(reason, "not an auth command: put");
        // The command word itself is case-sensitive.
        assert!(extract_from_command(&command("AUTH basic a b")).is_err());
    }

    #[test]
    fn test_scheme_token_count_mismatch() {
        assert!(extract_from_command(&command("auth basic adminKey")).is_err());
        assert!(extract_from_command(&command("auth hmacsha256 a:b:c:d extra")).is_err());
    }

    #[test]
    fn test_http_header() {
        let req = HttpRequest::new("GET", "/api/query", "HTTP/1.1")
            .with_header("authorization", "OpenTSDB alice:deadbeef:1000:n1");
        let cred = extract_from_http(&req).unwrap();
        assert_eq!(cred.scheme(), &AuthScheme::HttpDigest);
        assert_eq!(cred.principal(), "alice");
        assert_eq!(cred.fields().unwrap().get("epoch"), Some("1000"));
    }

    #[test]
    fn test_http_header_fields_through_bridge() {
        let req = HttpRequest::new("GET", "/api/query", "HTTP/1.1")
            .with_header("Authorization", "OpenTSDB alice:deadbeef:1000:n1");
        let bridge = CredentialBridge::new(extract_from_http(&req).unwrap());
        assert_eq!(
            bridge.handle(&[CallbackRequest::field("epoch")]).unwrap(),
            vec!["1000".to_string()]
        );
    }

    #[test]
    fn test_http_scheme_tag_case_insensitive() {
        let req = HttpRequest::new("GET", "/", "HTTP/1.1")
            .with_header("Authorization", "opentsdb bob:cafe:1:n");
        assert_eq!(extract_from_http(&req).unwrap().principal(), "bob");
    }

    #[test]
    fn test_http_malformed_header() {
        let req = HttpRequest::new("GET", "/", "HTTP/1.1")
            .with_header("Authorization", "Basic YWxpY2U6cHc=");
        let reason = malformed(extract_from_http(&req));
        assert_eq!(
            reason,
            "improperly formatted Authorization header: scheme 'Basic', 2 parts"
        );
        assert!(!reason.contains("YWxpY2U6cHc="));

        let req = HttpRequest::new("GET", "/", "HTTP/1.1")
            .with_header("Authorization", "OpenTSDB a:b:c:d extra");
        assert!(matches!(
            extract_from_http(&req),
            Err(AuthError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_http_missing_header() {
        let req = HttpRequest::new("GET", "/", "HTTP/1.1").with_header("Host", "tsd");
        assert_eq!(extract_from_http(&req), Err(AuthError::NoCredentialsPresent));
    }

    #[test]
    fn test_unsupported_message() {
        let reason = malformed(extract(&InboundMessage::Other("binary".into())));
        assert_eq!(reason, "unsupported message type: binary");
    }
}
