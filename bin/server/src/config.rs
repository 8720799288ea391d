//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Each identity
//! provider is enabled and parameterized independently; the set of enabled
//! providers (in the fixed priority order below) becomes the adapter
//! registry.

use serde::Deserialize;

/// Server configuration composed from provider configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Identity provider configuration.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Per-provider configuration.
///
/// Declaration order here mirrors the registration (priority) order used
/// when building the registry: jwt, amplify, firebase, supabase.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    /// Token-based login.
    #[serde(default)]
    pub jwt: JwtProviderConfig,

    /// AWS Amplify hosted authentication.
    #[serde(default)]
    pub amplify: HostedProviderConfig,

    /// Firebase hosted authentication.
    #[serde(default)]
    pub firebase: HostedProviderConfig,

    /// Supabase hosted authentication.
    #[serde(default)]
    pub supabase: HostedProviderConfig,
}

/// Configuration for the token-based provider.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtProviderConfig {
    /// Whether the provider participates in reconciliation.
    #[serde(default = "default_jwt_enabled")]
    pub enabled: bool,

    /// A pre-issued token to seed the store with (development only).
    #[serde(default)]
    pub token: Option<String>,
}

fn default_jwt_enabled() -> bool {
    true
}

impl Default for JwtProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_jwt_enabled(),
            token: None,
        }
    }
}

/// Configuration for a hosted provider.
///
/// The real SDK integrations plug in behind the provider crate's backend
/// seam; this configuration drives the in-process static backend, which is
/// what development and test deployments run against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostedProviderConfig {
    /// Whether the provider participates in reconciliation.
    #[serde(default)]
    pub enabled: bool,

    /// User id of a fixed established session (development only).
    #[serde(default)]
    pub session_uid: Option<String>,

    /// Email of the fixed session user (development only).
    #[serde(default)]
    pub session_email: Option<String>,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_only_jwt() {
        let config = ProvidersConfig::default();
        assert!(config.jwt.enabled);
        assert!(!config.amplify.enabled);
        assert!(!config.firebase.enabled);
        assert!(!config.supabase.enabled);
    }

    #[test]
    fn default_listen_addr_is_local() {
        assert_eq!(default_listen_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn hosted_provider_deserializes_with_defaults() {
        let json = r#"{ "enabled": true }"#;
        let config: HostedProviderConfig = serde_json::from_str(json).expect("deserialize");
        assert!(config.enabled);
        assert!(config.session_uid.is_none());
        assert!(config.session_email.is_none());
    }
}
