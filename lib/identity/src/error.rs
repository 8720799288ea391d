//! Error types for the identity crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ProviderError`: failures surfaced by an adapter's backend
//! - `TokenError`: failures decoding or validating a stored token

use gatehouse_core::ProviderName;
use std::fmt;

/// Errors surfaced by a provider adapter's backend operations.
///
/// An adapter-internal resolution failure (a session lookup that errors)
/// is not represented here: per the adapter contract, adapters swallow it
/// and settle to unauthenticated. This type covers operations the caller
/// explicitly requested, such as sign-out and profile updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider's backend rejected or failed an operation.
    Backend {
        provider: ProviderName,
        reason: String,
    },
    /// A profile update was rejected by the backend.
    UpdateRejected {
        provider: ProviderName,
        reason: String,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { provider, reason } => {
                write!(f, "provider '{provider}' backend error: {reason}")
            }
            Self::UpdateRejected { provider, reason } => {
                write!(f, "provider '{provider}' rejected profile update: {reason}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors decoding or validating a stored authentication token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not structured as expected.
    Malformed { reason: String },
    /// The token payload could not be decoded.
    InvalidPayload { reason: String },
    /// The token's expiry claim is in the past.
    Expired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "malformed token: {reason}"),
            Self::InvalidPayload { reason } => write!(f, "invalid token payload: {reason}"),
            Self::Expired => write!(f, "token has expired"),
        }
    }
}

impl std::error::Error for TokenError {}
