//! The SDK seam.
//!
//! Each hosted provider's real network integration lives behind
//! [`SessionBackend`]; the adapters in this crate only consume the trait.
//! [`StaticBackend`] is the in-process implementation used by development
//! configuration and tests.

use async_trait::async_trait;
use gatehouse_core::ProviderName;
use gatehouse_identity::{ProviderError, SourceUser, UserPatch};
use rootcause::Report;

/// Interface to one hosted provider's session backend.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Fetches the current backend session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable. Adapters treat this
    /// as "no session" and settle to unauthenticated.
    async fn fetch_session(&self) -> Result<Option<SourceUser>, Report<ProviderError>>;

    /// Revokes the backend session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; callers treat this as
    /// non-fatal.
    async fn sign_out(&self) -> Result<(), Report<ProviderError>>;

    /// Applies a profile update on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    async fn apply_update(&self, _patch: &UserPatch) -> Result<(), Report<ProviderError>> {
        Ok(())
    }
}

/// The fixed outcome a [`StaticBackend`] reports.
#[derive(Debug, Clone)]
enum StaticOutcome {
    SignedIn(SourceUser),
    SignedOut,
    Unavailable,
}

/// A backend with a fixed, in-process outcome.
///
/// Stands in for a hosted provider during development and in tests: a
/// signed-in user, a signed-out session, or an unreachable backend.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    provider: ProviderName,
    outcome: StaticOutcome,
}

impl StaticBackend {
    /// A backend with an established session for the given user.
    #[must_use]
    pub fn signed_in(provider: ProviderName, user: SourceUser) -> Self {
        Self {
            provider,
            outcome: StaticOutcome::SignedIn(user),
        }
    }

    /// A backend with no session.
    #[must_use]
    pub fn signed_out(provider: ProviderName) -> Self {
        Self {
            provider,
            outcome: StaticOutcome::SignedOut,
        }
    }

    /// A backend whose calls fail.
    #[must_use]
    pub fn unavailable(provider: ProviderName) -> Self {
        Self {
            provider,
            outcome: StaticOutcome::Unavailable,
        }
    }

    fn error(&self) -> ProviderError {
        ProviderError::Backend {
            provider: self.provider,
            reason: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SessionBackend for StaticBackend {
    async fn fetch_session(&self) -> Result<Option<SourceUser>, Report<ProviderError>> {
        match &self.outcome {
            StaticOutcome::SignedIn(user) => Ok(Some(user.clone())),
            StaticOutcome::SignedOut => Ok(None),
            StaticOutcome::Unavailable => Err(self.error().into()),
        }
    }

    async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
        match &self.outcome {
            StaticOutcome::Unavailable => Err(self.error().into()),
            _ => Ok(()),
        }
    }

    async fn apply_update(&self, _patch: &UserPatch) -> Result<(), Report<ProviderError>> {
        match &self.outcome {
            StaticOutcome::Unavailable => Err(self.error().into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signed_in_backend_returns_user() {
        let backend = StaticBackend::signed_in(
            ProviderName::Supabase,
            SourceUser::new("s1").with_email("a@b.com"),
        );
        let session = backend.fetch_session().await.expect("fetch succeeds");
        assert_eq!(session.map(|u| u.uid), Some("s1".to_string()));
    }

    #[tokio::test]
    async fn signed_out_backend_returns_none() {
        let backend = StaticBackend::signed_out(ProviderName::Supabase);
        assert!(backend.fetch_session().await.expect("fetch succeeds").is_none());
    }

    #[tokio::test]
    async fn unavailable_backend_errors() {
        let backend = StaticBackend::unavailable(ProviderName::Firebase);
        let err = backend.fetch_session().await.unwrap_err();
        assert!(err.to_string().contains("firebase"));
        assert!(backend.sign_out().await.is_err());
    }
}
