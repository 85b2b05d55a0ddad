//! Error types for image object verification.
//!
//! Gateway failures follow a fixed taxonomy so callers can tell a bad upload
//! from a misconfigured provider, an unreachable provider, a provider that
//! refused the call, and a provider that answered in an unexpected shape.

use thiserror::Error;

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a single provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Image bytes missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Selected provider lacks a required credential/URL, or is unknown
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure or timeout reaching the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider API returned a structured error payload
    #[error("Provider error: {0}")]
    Provider(String),

    /// A response body without the expected reply field
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    /// Configuration error for a required field left empty.
    pub fn missing_field(provider: impl std::fmt::Display, field: &str) -> Self {
        Self::Configuration(format!("{provider} requires `{field}` to be configured"))
    }

    /// The bare message, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::Configuration(m)
            | Self::Transport(m)
            | Self::Provider(m)
            | Self::Protocol(m) => m,
        }
    }
}

/// Convenience type alias for gateway results.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
