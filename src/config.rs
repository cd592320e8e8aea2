//! Configuration management for the TSD authentication gate
//!
//! Loaded once at startup from `config.toml` with environment overrides.
//! Nothing here changes while the server runs.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::auth::{MissingCredentialsPolicy, ValidatorOptions};

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the listener
    /// Environment: TSD_AUTH__BIND_ADDRESS
    pub bind_address: String,

    /// Listener port
    /// Environment: TSD_AUTH__PORT
    pub port: u16,

    /// Maximum concurrent connections
    pub max_clients: usize,

    // ═══ FRAMING LIMITS ═══
    /// Longest accepted line, in bytes, including the terminator
    pub max_command_length: usize,

    /// Most headers read from one HTTP request head
    pub max_header_count: usize,

    /// Largest accepted HTTP `Content-Length`, in bytes
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,

    // ═══ AUTHENTICATION ═══
    /// Name of the validator implementation (`embedded`, `hmac`)
    /// Environment: TSD_AUTH__LOGIN_MODULE
    pub login_module: String,

    /// Handling of HTTP requests without an Authorization header
    #[serde(default)]
    pub missing_credentials: MissingCredentialsPolicy,

    /// Validator-specific options, passed through opaquely
    #[serde(default)]
    pub auth_options: HashMap<String, String>,
}

fn default_max_body_length() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 4242,
            max_clients: 100,
            max_command_length: 1024,
            max_header_count: 64,
            max_body_length: default_max_body_length(),
            login_module: "embedded".to_string(),
            missing_credentials: MissingCredentialsPolicy::Reject,
            auth_options: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["tsd-auth-gate/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("TSD_AUTH").separator("__"))
                .build()
            {
                Ok(settings) => {
                    let config: ServerConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(config::ConfigError::Message(format!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 || self.max_header_count == 0 || self.max_body_length == 0
        {
            return Err(config::ConfigError::Message(
                "framing limits must be greater than 0".into(),
            ));
        }

        if self.login_module.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "login_module cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Validator options with case-insensitive lookup
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions::from(&self.auth_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> ServerConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_deserialize_full() {
        let config = from_toml(
            r#"
            bind_address = "0.0.0.0"
            port = 4242
            max_clients = 10
            max_command_length = 512
            max_header_count = 32
            max_body_length = 4096
            login_module = "embedded"
            missing_credentials = "allow"

            [auth_options]
            adminSecretKey = "s3cret"
            "#,
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_socket(), "0.0.0.0:4242");
        assert_eq!(config.max_body_length, 4096);
        assert_eq!(config.missing_credentials, MissingCredentialsPolicy::Allow);
        assert_eq!(
            config.validator_options().get("adminSecretKey"),
            Some("s3cret")
        );
    }

    #[test]
    fn test_policy_defaults_to_reject() {
        let config = from_toml(
            r#"
            bind_address = "127.0.0.1"
            port = 4242
            max_clients = 10
            max_command_length = 512
            max_header_count = 32
            login_module = "hmac"
            "#,
        );
        assert_eq!(config.missing_credentials, MissingCredentialsPolicy::Reject);
        assert_eq!(config.max_body_length, 1024 * 1024);
        assert!(config.auth_options.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.login_module = "  ".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.max_clients = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.max_body_length = 0;
        assert!(config.validate().is_err());
    }
}
