//! Outgoing operation routing.
//!
//! Application code never talks to a provider adapter directly; it goes
//! through [`AuthFacade`], which resolves the currently active provider
//! from the session and delegates to the matching adapter.

use crate::registry::ProviderRegistry;
use gatehouse_identity::{SessionContext, SessionSnapshot, UserPatch};
use std::sync::Arc;

/// Provider-agnostic entry point for sign-out and profile updates.
///
/// Both operations are routed, not applied: the adapter's own state-change
/// notification is what ultimately updates the session through the
/// reconciler. When no provider is active, both operations are no-ops.
#[derive(Clone)]
pub struct AuthFacade {
    registry: Arc<ProviderRegistry>,
    session: Arc<SessionContext>,
}

impl AuthFacade {
    /// Creates a facade over the registry and session cell.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, session: Arc<SessionContext>) -> Self {
        Self { registry, session }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        self.session.get()
    }

    /// Signs out of the active provider.
    ///
    /// Delegation only: the adapter drops its own state to unauthenticated
    /// and the reconciler clears the session when every provider has
    /// settled. A backend failure is logged and otherwise ignored.
    pub async fn sign_out(&self) {
        let Some(provider) = self.session.get().active_provider() else {
            tracing::debug!("sign-out requested with no active provider");
            return;
        };
        let Some(adapter) = self.registry.get(provider) else {
            tracing::warn!(%provider, "active provider missing from registry");
            return;
        };

        if let Err(error) = adapter.sign_out().await {
            tracing::warn!(%provider, %error, "sign-out delegation failed");
        }
    }

    /// Routes a profile update to the active provider.
    ///
    /// Adapters without update support silently drop the patch. An empty
    /// patch is not forwarded.
    pub async fn update_user(&self, patch: UserPatch) {
        if patch.is_empty() {
            return;
        }
        let Some(provider) = self.session.get().active_provider() else {
            tracing::debug!("profile update requested with no active provider");
            return;
        };
        let Some(adapter) = self.registry.get(provider) else {
            tracing::warn!(%provider, "active provider missing from registry");
            return;
        };

        if let Err(error) = adapter.update_user(patch).await {
            tracing::warn!(%provider, %error, "profile update delegation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gatehouse_core::ProviderName;
    use gatehouse_identity::{
        ProviderAdapter, ProviderError, ProviderStatus, SourceUser, UnifiedUser,
    };
    use rootcause::Report;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingAdapter {
        sign_outs: AtomicUsize,
        patches: RwLock<Vec<UserPatch>>,
    }

    struct Named {
        name: ProviderName,
        inner: Arc<CountingAdapter>,
    }

    #[async_trait]
    impl ProviderAdapter for Named {
        fn name(&self) -> ProviderName {
            self.name
        }

        fn status(&self) -> ProviderStatus {
            ProviderStatus::Authenticated
        }

        fn current_user(&self) -> Option<SourceUser> {
            Some(SourceUser::new("u1"))
        }

        async fn sign_out(&self) -> Result<(), Report<ProviderError>> {
            self.inner.sign_outs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn update_user(&self, patch: UserPatch) -> Result<(), Report<ProviderError>> {
            self.inner.patches.write().unwrap().push(patch);
            Ok(())
        }
    }

    fn facade_with(
        names: &[ProviderName],
    ) -> (AuthFacade, Arc<SessionContext>, Vec<Arc<CountingAdapter>>) {
        let mut registry = ProviderRegistry::new();
        let mut counters = Vec::new();
        for &name in names {
            let inner = Arc::new(CountingAdapter::default());
            counters.push(inner.clone());
            registry
                .register(Arc::new(Named { name, inner }))
                .expect("register");
        }
        let session = Arc::new(SessionContext::new());
        let facade = AuthFacade::new(Arc::new(registry), session.clone());
        (facade, session, counters)
    }

    fn sign_in(session: &SessionContext, provider: ProviderName) {
        session.set(
            provider,
            UnifiedUser::from_source(SourceUser::new("u1").with_email("a@b.com")),
        );
    }

    #[tokio::test]
    async fn sign_out_with_no_active_provider_is_a_no_op() {
        let (facade, _session, counters) =
            facade_with(&[ProviderName::Jwt, ProviderName::Firebase]);

        facade.sign_out().await;

        for counter in counters {
            assert_eq!(counter.sign_outs.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn sign_out_routes_to_active_provider_only() {
        let (facade, session, counters) =
            facade_with(&[ProviderName::Jwt, ProviderName::Firebase]);
        sign_in(&session, ProviderName::Firebase);

        facade.sign_out().await;

        assert_eq!(counters[0].sign_outs.load(Ordering::SeqCst), 0);
        assert_eq!(counters[1].sign_outs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn update_user_routes_to_active_provider() {
        let (facade, session, counters) =
            facade_with(&[ProviderName::Jwt, ProviderName::Firebase]);
        sign_in(&session, ProviderName::Jwt);

        let patch = UserPatch {
            display_name: Some("Alice".to_string()),
            ..UserPatch::default()
        };
        facade.update_user(patch.clone()).await;

        assert_eq!(counters[0].patches.read().unwrap().as_slice(), &[patch]);
        assert!(counters[1].patches.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_patch_is_not_forwarded() {
        let (facade, session, counters) = facade_with(&[ProviderName::Jwt]);
        sign_in(&session, ProviderName::Jwt);

        facade.update_user(UserPatch::default()).await;

        assert!(counters[0].patches.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_returns_current_snapshot() {
        let (facade, session, _counters) = facade_with(&[ProviderName::Jwt]);
        assert!(!facade.session().is_authenticated());

        sign_in(&session, ProviderName::Jwt);
        assert!(facade.session().is_authenticated());
    }
}
