//! Provider status reporting.
//!
//! Every adapter owns exactly one status value and mutates it only from its
//! own observation logic. The reconciler reads statuses, never writes them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle status of a single identity provider.
///
/// Adapters start in `Configuring` while their backend check is in flight
/// and must eventually settle to `Authenticated` or `Unauthenticated`.
/// An adapter that never leaves `Configuring` violates the adapter contract
/// and leaves the loading gate open indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// The adapter has not yet decided whether a user is signed in.
    #[default]
    Configuring,
    /// The adapter has a signed-in user.
    Authenticated,
    /// The adapter has determined no user is signed in.
    Unauthenticated,
}

impl ProviderStatus {
    /// Returns true while the adapter's backend check is still in flight.
    #[must_use]
    pub fn is_configuring(&self) -> bool {
        matches!(self, Self::Configuring)
    }

    /// Returns true if the adapter has a signed-in user.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Returns true if the adapter has decided no user is signed in.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Returns true once the adapter has reached a decision either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_configuring()
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuring => "configuring",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_configuring() {
        assert_eq!(ProviderStatus::default(), ProviderStatus::Configuring);
    }

    #[test]
    fn settled_excludes_configuring() {
        assert!(!ProviderStatus::Configuring.is_settled());
        assert!(ProviderStatus::Authenticated.is_settled());
        assert!(ProviderStatus::Unauthenticated.is_settled());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&ProviderStatus::Authenticated).expect("serialize");
        assert_eq!(json, "\"authenticated\"");

        let parsed: ProviderStatus =
            serde_json::from_str("\"configuring\"").expect("deserialize");
        assert_eq!(parsed, ProviderStatus::Configuring);
    }
}
