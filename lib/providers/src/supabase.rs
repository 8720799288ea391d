//! Supabase adapter.
//!
//! Observes the backend two ways: an initial session fetch at startup, and
//! pushed auth-state events from the SDK subscription afterwards. Either
//! path settles the adapter; a fetch failure settles it as unauthenticated
//! rather than leaving it configuring.

use crate::backend::SessionBackend;
use crate::cell::AdapterCell;
use async_trait::async_trait;
use gatehouse_core::ProviderName;
use gatehouse_identity::{
    ChangeNotifier, ProviderAdapter, ProviderError, ProviderStatus, SourceUser,
};
use rootcause::Report;
use std::sync::Arc;

/// Auth-state change pushed by the backend subscription.
#[derive(Debug, Clone)]
pub enum AuthStateEvent {
    /// A user signed in (or an existing session was discovered).
    SignedIn(SourceUser),
    /// The session ended.
    SignedOut,
    /// The session's token was refreshed; carries the refreshed user.
    TokenRefreshed(SourceUser),
}

/// Adapter for Supabase hosted authentication.
pub struct SupabaseAdapter {
    cell: AdapterCell,
    backend: Arc<dyn SessionBackend>,
}

impl SupabaseAdapter {
    /// Creates the adapter in the configuring state.
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>, notifier: ChangeNotifier) -> Self {
        Self {
            cell: AdapterCell::new(ProviderName::Supabase, notifier),
            backend,
        }
    }

    /// Performs the initial session fetch and settles the adapter.
    pub async fn initialize(&self) {
        match self.backend.fetch_session().await {
            Ok(Some(user)) => self.cell.settle_authenticated(user),
            Ok(None) => self.cell.settle_unauthenticated(),
            Err(error) => {
                tracing::warn!(%error, "session fetch failed; treating as signed out");
                self.cell.settle_unauthenticated();
            }
        }
    }

    /// Applies a pushed auth-state event from the backend subscription.
    pub fn handle_event(&self, event: AuthStateEvent) {
        match event {
            AuthStateEvent::SignedIn(user) | AuthStateEvent::TokenRefreshed(user) => {
                self.cell.settle_authenticated(user);
            }
            AuthStateEvent::SignedOut => self.cell.settle_unauthenticated(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for SupabaseAdapter {
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
        // Local state drops first; the backend call is best-effort.
        self.cell.settle_unauthenticated();
        self.backend.sign_out().await
    }
}
