//! Firebase adapter.
//!
//! Firebase's SDK reports the signed-in user through a state-change
//! callback that also fires once with the current state on subscription.
//! [`FirebaseAdapter::initialize`] models that first callback as a backend
//! fetch; subsequent pushes arrive through
//! [`FirebaseAdapter::on_state_change`]. Profile updates are supported and
//! round-trip through the backend before the adapter republishes its user.

use crate::backend::SessionBackend;
use crate::cell::AdapterCell;
use async_trait::async_trait;
use gatehouse_core::ProviderName;
use gatehouse_identity::{
    ChangeNotifier, ProviderAdapter, ProviderError, ProviderStatus, SourceUser, UserPatch,
};
use rootcause::Report;
use std::sync::Arc;

/// Adapter for Firebase hosted authentication.
pub struct FirebaseAdapter {
    cell: AdapterCell,
    backend: Arc<dyn SessionBackend>,
}

impl FirebaseAdapter {
    /// Creates the adapter in the configuring state.
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>, notifier: ChangeNotifier) -> Self {
        Self {
            cell: AdapterCell::new(ProviderName::Firebase, notifier),
            backend,
        }
    }

    /// Resolves the initial auth state and settles the adapter.
    pub async fn initialize(&self) {
        match self.backend.fetch_session().await {
            Ok(Some(user)) => self.cell.settle_authenticated(user),
            Ok(None) => self.cell.settle_unauthenticated(),
            Err(error) => {
                tracing::warn!(%error, "auth state fetch failed; treating as signed out");
                self.cell.settle_unauthenticated();
            }
        }
    }

    /// Applies a pushed state change: `Some` user or signed out.
    pub fn on_state_change(&self, user: Option<SourceUser>) {
        match user {
            Some(user) => self.cell.settle_authenticated(user),
            None => self.cell.settle_unauthenticated(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for FirebaseAdapter {
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
        self.backend.sign_out().await
    }

    async fn update_user(&self, patch: UserPatch) -> Result<(), Report<ProviderError>> {
        let Some(mut user) = self.cell.current_user() else {
            tracing::debug!("profile update dropped: not signed in");
            return Ok(());
        };

        self.backend.apply_update(&patch).await?;

        user.apply_patch(patch);
        self.cell.settle_authenticated(user);
        Ok(())
    }
}
