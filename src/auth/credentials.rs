//! Normalized credentials
//!
//! The single internal representation both wire encodings are reduced to.

use std::fmt;

use crate::error::AuthError;

/// Positional names of the colon-separated digest blob fields.
const DIGEST_FIELD_NAMES: [&str; 4] = ["accessKey", "digest", "epoch", "nonce"];

/// Field holding the principal inside a digest blob.
pub const ACCESS_KEY_FIELD: &str = "accessKey";

/// Which encoding and algorithm produced a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `auth basic <accessKey> <secret>`
    Basic,
    /// `auth <algorithm> <digest blob>`, algorithm lower-cased.
    DigestHmac(String),
    /// `Authorization: OpenTSDB <digest blob>`
    HttpDigest,
}

impl AuthScheme {
    pub fn as_str(&self) -> &str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::DigestHmac(algorithm) => algorithm,
            AuthScheme::HttpDigest => "http",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered named sub-fields of a digest blob.
#[derive(Clone, PartialEq, Eq)]
pub struct DigestFields {
    entries: Vec<(String, String)>,
}

impl DigestFields {
    /// Splits `blob` on `:` and names each position.
    ///
    /// The first four positions are `accessKey`, `digest`, `epoch` and `nonce`;
    /// any further ones are `field4`, `field5`, ...
    pub fn parse(blob: &str) -> Self {
        let entries = blob
            .split(':')
            .enumerate()
            .map(|(i, value)| {
                let name = match DIGEST_FIELD_NAMES.get(i) {
                    Some(name) => (*name).to_string(),
                    None => format!("field{}", i),
                };
                (name, value.to_string())
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl fmt::Debug for DigestFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
enum Material {
    Secret(String),
    Digest { blob: String, fields: DigestFields },
}

/// A credential extracted from one inbound message.
///
/// Exactly one of secret or digest is present: basic credentials carry a secret,
/// every other scheme carries a digest. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedCredential {
    scheme: AuthScheme,
    principal: String,
    material: Material,
}

impl NormalizedCredential {
    pub fn basic(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            scheme: AuthScheme::Basic,
            principal: principal.into(),
            material: Material::Secret(secret.into()),
        }
    }

    /// Builds a digest credential; the principal is the blob's `accessKey` field.
    ///
    /// `scheme` must not be [`AuthScheme::Basic`].
    pub fn digest(scheme: AuthScheme, blob: impl Into<String>) -> Result<Self, AuthError> {
        if scheme == AuthScheme::Basic {
            return Err(AuthError::MalformedInput(
                "basic scheme cannot carry a digest".into(),
            ));
        }

        let blob = blob.into();
        let fields = DigestFields::parse(&blob);
        let principal = match fields.get(ACCESS_KEY_FIELD) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(AuthError::MalformedInput(
                    "digest is missing accessKey".into(),
                ));
            }
        };

        Ok(Self {
            scheme,
            principal,
            material: Material::Digest { blob, fields },
        })
    }

    pub fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn secret(&self) -> Option<&str> {
        match &self.material {
            Material::Secret(secret) => Some(secret),
            Material::Digest { .. } => None,
        }
    }

    pub fn digest_blob(&self) -> Option<&str> {
        match &self.material {
            Material::Secret(_) => None,
            Material::Digest { blob, .. } => Some(blob),
        }
    }

    pub fn fields(&self) -> Option<&DigestFields> {
        match &self.material {
            Material::Secret(_) => None,
            Material::Digest { fields, .. } => Some(fields),
        }
    }
}

impl fmt::Debug for NormalizedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedCredential")
            .field("scheme", &self.scheme)
            .field("principal", &self.principal)
            .field("secret", &self.secret().map(|_| "<redacted>"))
            .field("digest", &self.digest_blob().map(|_| "<redacted>"))
            .finish()
    }
}
