//! Amplify adapter.
//!
//! Amplify's authenticator reports sign-in state separately from the user's
//! profile attributes, so this adapter completes the attribute fetch itself
//! before publishing an authenticated user. A failed attribute fetch
//! settles the adapter as unauthenticated; a partially populated user is
//! never observable.

use crate::cell::AdapterCell;
use async_trait::async_trait;
use gatehouse_core::ProviderName;
use gatehouse_identity::{
    ChangeNotifier, ProviderAdapter, ProviderError, ProviderStatus, SourceUser,
};
use rootcause::Report;
use std::sync::Arc;

/// Source of Amplify user attributes.
///
/// Stands in for the attribute-fetch call of the real SDK.
#[async_trait]
pub trait AttributeSource: Send + Sync {
    /// Fetches the profile attributes for a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be fetched; the adapter
    /// then refuses to publish the user.
    async fn fetch_attributes(&self, user_id: &str) -> Result<SourceUser, Report<ProviderError>>;

    /// Revokes the hosted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; callers treat this as
    /// non-fatal.
    async fn sign_out(&self) -> Result<(), Report<ProviderError>>;
}

/// Attribute source with a fixed in-process outcome, for dev and tests.
#[derive(Debug, Clone)]
pub struct StaticAttributeSource {
    user: Option<SourceUser>,
}

impl StaticAttributeSource {
    /// A source that resolves attributes for any user id.
    #[must_use]
    pub fn with_user(user: SourceUser) -> Self {
        Self { user: Some(user) }
    }

    /// A source whose fetches fail.
    #[must_use]
    pub fn failing() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AttributeSource for StaticAttributeSource {
    async fn fetch_attributes(&self, user_id: &str) -> Result<SourceUser, Report<ProviderError>> {
        match &self.user {
            Some(user) => {
                let mut user = user.clone();
                user.uid = user_id.to_string();
                Ok(user)
            }
            None => Err(ProviderError::Backend {
                provider: ProviderName::Amplify,
                reason: "attribute fetch failed".to_string(),
            }
            .into()),
        }
    }

    async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
        Ok(())
    }
}

/// Adapter for AWS Amplify hosted authentication.
pub struct AmplifyAdapter {
    cell: AdapterCell,
    attributes: Arc<dyn AttributeSource>,
}

impl AmplifyAdapter {
    /// Creates the adapter in the configuring state.
    #[must_use]
    pub fn new(attributes: Arc<dyn AttributeSource>, notifier: ChangeNotifier) -> Self {
        Self {
            cell: AdapterCell::new(ProviderName::Amplify, notifier),
            attributes,
        }
    }

    /// Settles the adapter from the authenticator's initial state.
    ///
    /// `Some(user_id)` completes the attribute fetch before publishing;
    /// `None` settles straight to unauthenticated.
    pub async fn initialize(&self, signed_in_user: Option<&str>) {
        match signed_in_user {
            Some(user_id) => self.handle_sign_in(user_id).await,
            None => self.cell.settle_unauthenticated(),
        }
    }

    /// Handles a pushed sign-in for the given user id.
    ///
    /// The user is published only after the attribute fetch completes; a
    /// fetch failure settles the adapter as unauthenticated.
    pub async fn handle_sign_in(&self, user_id: &str) {
        match self.attributes.fetch_attributes(user_id).await {
            Ok(user) => self.cell.settle_authenticated(user),
            Err(error) => {
                tracing::warn!(%error, user_id, "attribute fetch failed; treating as signed out");
                self.cell.settle_unauthenticated();
            }
        }
    }

    /// Handles a pushed sign-out.
    pub fn handle_sign_out(&self) {
        self.cell.settle_unauthenticated();
    }
}

#[async_trait]
impl ProviderAdapter for AmplifyAdapter {
    fn name(&self) -> ProviderName {
        self.cell.name()
    }

    fn status(&self) -> ProviderStatus {
        self.cell.status()
    }

    fn current_user(&self) -> Option<SourceUser> {
        self.cell.current_user()
    }

    async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
        self.cell.settle_unauthenticated();
        self.attributes.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_identity::change_channel;

    fn attributes() -> SourceUser {
        SourceUser::new("placeholder")
            .with_display_name("Amy")
            .with_email("amy@example.com")
    }

    #[tokio::test]
    async fn initialize_signed_in_fetches_attributes() {
        let (notifier, _rx) = change_channel();
        let source = Arc::new(StaticAttributeSource::with_user(attributes()));
        let adapter = AmplifyAdapter::new(source, notifier);

        adapter.initialize(Some("a1")).await;

        assert_eq!(adapter.status(), ProviderStatus::Authenticated);
        let user = adapter.current_user().expect("user published");
        assert_eq!(user.uid, "a1");
        assert_eq!(user.display_name.as_deref(), Some("Amy"));
    }

    #[tokio::test]
    async fn initialize_signed_out_settles_unauthenticated() {
        let (notifier, _rx) = change_channel();
        let source = Arc::new(StaticAttributeSource::with_user(attributes()));
        let adapter = AmplifyAdapter::new(source, notifier);

        adapter.initialize(None).await;
        assert_eq!(adapter.status(), ProviderStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn attribute_fetch_failure_never_publishes_partial_user() {
        let (notifier, _rx) = change_channel();
        let source = Arc::new(StaticAttributeSource::failing());
        let adapter = AmplifyAdapter::new(source, notifier);

        adapter.initialize(Some("a1")).await;

        assert_eq!(adapter.status(), ProviderStatus::Unauthenticated);
        assert!(adapter.current_user().is_none());
    }

    #[tokio::test]
    async fn pushed_sign_out_drops_session() {
        let (notifier, _rx) = change_channel();
        let source = Arc::new(StaticAttributeSource::with_user(attributes()));
        let adapter = AmplifyAdapter::new(source, notifier);
        adapter.initialize(Some("a1")).await;

        adapter.handle_sign_out();
        assert_eq!(adapter.status(), ProviderStatus::Unauthenticated);
    }
}
